//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod auth_service;
pub mod brigade_service;
pub mod catalog_service;
pub mod conversion_service;
pub mod esg_service;
pub mod mint_service;
pub mod order_service;
pub mod wallet_service;

pub use auth_service::AuthService;
pub use brigade_service::BrigadeService;
pub use catalog_service::CatalogService;
pub use conversion_service::{ConversionOutcome, ConversionService};
pub use esg_service::{EsgService, ProjectReport, UserReport};
pub use mint_service::{MintOutcome, MintService};
pub use order_service::{OrderLine, OrderOutcome, OrderService, StripeEventResult};
pub use wallet_service::{WalletOverview, WalletService};
