//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod brigade;
pub mod mint;
pub mod order;
pub mod payment;
pub mod product;
pub mod project;
pub mod species;
pub mod tree;
pub mod user;
pub mod wallet;

pub use brigade::{
    ActionKind, Brigade, BrigadeAction, BrigadeId, BrigadeTask, Brigadist, BrigadistRole,
    GeoPoint, NewBrigade, NewBrigadeAction, NewBrigadeTask, TaskStatus,
};
pub use mint::{
    ChainTransaction, ChainTxKind, ChainTxStatus, NewChainTransaction, NewNftMetadata,
    NftMetadata,
};
pub use order::{
    order_total_cents, order_total_green, NewOrder, NewOrderItem, Order, OrderId, OrderItem,
    OrderStatus, PaymentMethod,
};
pub use payment::{NewStripePayment, StripePayment};
pub use product::{NewProduct, Product, ProductId};
pub use project::{NewProject, Project, ProjectId, ProjectStatus};
pub use species::{NewSpecies, Species, SpeciesId};
pub use tree::{NewTree, Tree, TreeId, TreeStatus};
pub use user::{NewUser, Role, User, UserId};
pub use wallet::{
    seeds_for_green, Conversion, ConversionId, GreenTransaction, NewConversion, NewLedgerEntry,
    SeedTransaction, TxKind, Wallet, WalletId,
};
