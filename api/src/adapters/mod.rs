//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod chain;
pub mod postgres;

pub use chain::StubChainClient;
pub use postgres::{
    PostgresBrigadeRepository, PostgresMintRepository, PostgresOrderRepository,
    PostgresPaymentRepository, PostgresProductRepository, PostgresProjectRepository,
    PostgresSpeciesRepository, PostgresTreeRepository, PostgresUserRepository,
    PostgresWalletRepository,
};
