//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod chain;
pub mod repositories;

pub use chain::{ChainClient, ChainReceipt};
pub use repositories::{
    BrigadeRepository, MintRepository, OrderRepository, PaymentRepository, ProductRepository,
    ProjectRepository, SpeciesRepository, TreeRepository, UserRepository, WalletRepository,
};
