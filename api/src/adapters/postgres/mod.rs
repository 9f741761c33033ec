//! PostgreSQL adapters

pub mod brigade_repo;
pub mod mint_repo;
pub mod order_repo;
pub mod payment_repo;
pub mod product_repo;
pub mod project_repo;
pub mod species_repo;
pub mod tree_repo;
pub mod user_repo;
pub mod wallet_repo;

pub use brigade_repo::PostgresBrigadeRepository;
pub use mint_repo::PostgresMintRepository;
pub use order_repo::PostgresOrderRepository;
pub use payment_repo::PostgresPaymentRepository;
pub use product_repo::PostgresProductRepository;
pub use project_repo::PostgresProjectRepository;
pub use species_repo::PostgresSpeciesRepository;
pub use tree_repo::PostgresTreeRepository;
pub use user_repo::PostgresUserRepository;
pub use wallet_repo::PostgresWalletRepository;
