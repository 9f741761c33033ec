//! SeaORM entity models
//!
//! Database-shaped models, kept separate from the domain entities in
//! `domain::entities`. Adapters convert between the two.

pub mod brigade_actions;
pub mod brigade_tasks;
pub mod brigades;
pub mod brigadists;
pub mod chain_transactions;
pub mod conversions;
pub mod green_transactions;
pub mod nft_metadata;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod projects;
pub mod seed_transactions;
pub mod species;
pub mod stripe_payments;
pub mod trees;
pub mod users;
pub mod wallets;
