//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod auth;
pub mod brigades;
pub mod conversions;
pub mod esg;
pub mod orders;
pub mod products;
pub mod projects;
pub mod species;
pub mod trees;
pub mod wallet;
pub mod webhooks;

pub use auth::{login, me, register};
pub use brigades::{
    actions_nearby, add_member, complete_task, create_brigade, create_task, get_brigade,
    list_actions, list_members, list_tasks, log_action, my_brigade,
};
pub use conversions::{convert, my_conversions};
pub use esg::{project_report, user_report};
pub use orders::{cancel_order, create_order, get_order, my_orders};
pub use products::{
    create_product, get_product, list_all_products, list_products, set_product_active,
};
pub use projects::{create_project, get_project, list_projects, update_project_status};
pub use species::{create_species, get_species, list_species, update_species_rate};
pub use trees::{get_tree, get_tree_metadata, list_trees, mint_tree, my_trees, validate_tree};
pub use wallet::{get_wallet, grant_green};
pub use webhooks::stripe_webhook;
