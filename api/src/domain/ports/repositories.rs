//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{
    ActionKind, Brigade, BrigadeAction, BrigadeId, BrigadeTask, Brigadist, BrigadistRole,
    ChainTransaction, Conversion, GeoPoint, GreenTransaction, NewBrigade, NewBrigadeAction,
    NewBrigadeTask, NewChainTransaction, NewConversion, NewLedgerEntry, NewNftMetadata, NewOrder,
    NewProduct, NewProject, NewSpecies, NewStripePayment, NewTree, NewUser, NftMetadata, Order,
    OrderId, OrderItem, Product, ProductId, Project, ProjectId, ProjectStatus, SeedTransaction,
    Species, SpeciesId, StripePayment, Tree, TreeId, TreeStatus, User, UserId, Wallet, WalletId,
};
use crate::error::DomainError;

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by email (unique)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;
}

/// Repository for Species entities
#[async_trait]
pub trait SpeciesRepository: Send + Sync {
    /// Find a species by ID
    async fn find_by_id(&self, id: &SpeciesId) -> Result<Option<Species>, DomainError>;

    /// Find a species by name (unique)
    async fn find_by_name(&self, name: &str) -> Result<Option<Species>, DomainError>;

    /// List all species
    async fn find_all(&self) -> Result<Vec<Species>, DomainError>;

    /// Create a new species
    async fn create(&self, species: &NewSpecies) -> Result<Species, DomainError>;

    /// Update the absorption rate
    async fn update_co2_rate(&self, id: &SpeciesId, co2_kg_per_year: f64)
        -> Result<(), DomainError>;
}

/// Repository for Project entities
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Find a project by ID
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError>;

    /// Find a project by name
    async fn find_by_name(&self, name: &str) -> Result<Option<Project>, DomainError>;

    /// List projects with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Project>, DomainError>;

    /// Create a new project
    async fn create(&self, project: &NewProject) -> Result<Project, DomainError>;

    /// Update project status
    async fn update_status(&self, id: &ProjectId, status: ProjectStatus)
        -> Result<(), DomainError>;
}

/// Repository for Tree entities
#[async_trait]
pub trait TreeRepository: Send + Sync {
    /// Find a tree by ID
    async fn find_by_id(&self, id: &TreeId) -> Result<Option<Tree>, DomainError>;

    /// Find trees owned by a user
    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Tree>, DomainError>;

    /// Find trees in a project with pagination
    async fn find_by_project(
        &self,
        project_id: &ProjectId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tree>, DomainError>;

    /// Create a batch of trees (one order can plant many)
    async fn create_many(&self, trees: &[NewTree]) -> Result<Vec<Tree>, DomainError>;

    /// Mark a tree validated
    async fn mark_validated(&self, id: &TreeId, at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Mark a tree minted
    async fn mark_minted(&self, id: &TreeId) -> Result<(), DomainError>;

    /// Trees with their species, for CO₂ estimates
    async fn find_with_species_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<(Tree, Species)>, DomainError>;

    /// Trees with their species for a project
    async fn find_with_species_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<(Tree, Species)>, DomainError>;

    /// Tree counts per status for a project (aggregate SQL)
    async fn count_by_status(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<(TreeStatus, i64)>, DomainError>;

    /// Distinct tree owners contributing to a project
    async fn count_distinct_owners(&self, project_id: &ProjectId) -> Result<i64, DomainError>;
}

/// Repository for Product entities
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find a product by ID
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError>;

    /// List active products
    async fn find_active(&self) -> Result<Vec<Product>, DomainError>;

    /// List all products (admin)
    async fn find_all(&self) -> Result<Vec<Product>, DomainError>;

    /// Create a new product
    async fn create(&self, product: &NewProduct) -> Result<Product, DomainError>;

    /// Toggle product availability
    async fn set_active(&self, id: &ProductId, active: bool) -> Result<(), DomainError>;
}

/// Repository for Order entities
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find an order by ID
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError>;

    /// Find orders placed by a buyer
    async fn find_by_buyer(&self, buyer_id: &UserId) -> Result<Vec<Order>, DomainError>;

    /// Create an order with its items in one transaction
    async fn create(&self, order: &NewOrder) -> Result<Order, DomainError>;

    /// Items of an order
    async fn find_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, DomainError>;

    /// Mark an order paid
    async fn mark_paid(&self, id: &OrderId, at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Mark an order cancelled
    async fn mark_cancelled(&self, id: &OrderId) -> Result<(), DomainError>;
}

/// Repository for Wallet entities and the token ledgers
///
/// Balance mutations are atomic: the guarded balance update and its ledger
/// row commit together, and a debit that would go negative fails with
/// `DomainError::InsufficientBalance` without changing anything.
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Find a wallet by owning user
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Wallet>, DomainError>;

    /// Create an empty wallet for a user
    async fn create(&self, user_id: &UserId) -> Result<Wallet, DomainError>;

    /// Apply a green token credit or debit with its ledger row
    async fn apply_green(&self, entry: &NewLedgerEntry)
        -> Result<GreenTransaction, DomainError>;

    /// Apply a seed token credit or debit with its ledger row
    async fn apply_seed(&self, entry: &NewLedgerEntry) -> Result<SeedTransaction, DomainError>;

    /// Convert green to seed: debit, credit, and conversion row in one
    /// transaction
    async fn convert(&self, conversion: &NewConversion) -> Result<Conversion, DomainError>;

    /// Recent green ledger entries, newest first
    async fn green_history(
        &self,
        wallet_id: &WalletId,
        limit: i64,
    ) -> Result<Vec<GreenTransaction>, DomainError>;

    /// Recent seed ledger entries, newest first
    async fn seed_history(
        &self,
        wallet_id: &WalletId,
        limit: i64,
    ) -> Result<Vec<SeedTransaction>, DomainError>;

    /// Conversions for a wallet, newest first
    async fn conversions(&self, wallet_id: &WalletId) -> Result<Vec<Conversion>, DomainError>;
}

/// Repository for Brigade entities, members, actions, and tasks
#[async_trait]
pub trait BrigadeRepository: Send + Sync {
    /// Find a brigade by ID
    async fn find_by_id(&self, id: &BrigadeId) -> Result<Option<Brigade>, DomainError>;

    /// Find the brigade owned by a user (at most one)
    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Option<Brigade>, DomainError>;

    /// Find the brigade a user is a member of
    async fn find_by_member(&self, user_id: &UserId) -> Result<Option<Brigade>, DomainError>;

    /// Create a brigade and its lead membership in one transaction
    async fn create(&self, brigade: &NewBrigade) -> Result<Brigade, DomainError>;

    /// Add a member
    async fn add_member(
        &self,
        brigade_id: &BrigadeId,
        user_id: &UserId,
        role: BrigadistRole,
    ) -> Result<Brigadist, DomainError>;

    /// Check membership
    async fn is_member(
        &self,
        brigade_id: &BrigadeId,
        user_id: &UserId,
    ) -> Result<bool, DomainError>;

    /// Members of a brigade
    async fn members(&self, brigade_id: &BrigadeId) -> Result<Vec<Brigadist>, DomainError>;

    /// Log a geotagged action (PostGIS geography point)
    async fn create_action(
        &self,
        action: &NewBrigadeAction,
    ) -> Result<BrigadeAction, DomainError>;

    /// Actions of a brigade, optionally filtered by kind, newest first
    async fn actions(
        &self,
        brigade_id: &BrigadeId,
        kind: Option<ActionKind>,
        limit: i64,
    ) -> Result<Vec<BrigadeAction>, DomainError>;

    /// Actions within `radius_m` meters of a point (ST_DWithin)
    async fn actions_near(
        &self,
        center: GeoPoint,
        radius_m: f64,
        limit: i64,
    ) -> Result<Vec<BrigadeAction>, DomainError>;

    /// Assign a task
    async fn create_task(&self, task: &NewBrigadeTask) -> Result<BrigadeTask, DomainError>;

    /// Tasks of a brigade
    async fn tasks(&self, brigade_id: &BrigadeId) -> Result<Vec<BrigadeTask>, DomainError>;

    /// Find a task by ID
    async fn find_task(&self, task_id: &Uuid) -> Result<Option<BrigadeTask>, DomainError>;

    /// Mark a task done
    async fn complete_task(&self, task_id: &Uuid) -> Result<(), DomainError>;
}

/// Repository for StripePayment records
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Find a payment by Stripe event id (idempotency check)
    async fn find_by_event_id(
        &self,
        stripe_event_id: &str,
    ) -> Result<Option<StripePayment>, DomainError>;

    /// Record a payment event
    async fn create(&self, payment: &NewStripePayment) -> Result<StripePayment, DomainError>;
}

/// Repository for mint metadata and chain transaction receipts
#[async_trait]
pub trait MintRepository: Send + Sync {
    /// Store NFT metadata for a minted tree
    async fn create_metadata(&self, metadata: &NewNftMetadata)
        -> Result<NftMetadata, DomainError>;

    /// Metadata for a tree, if minted
    async fn find_metadata_by_tree(
        &self,
        tree_id: &TreeId,
    ) -> Result<Option<NftMetadata>, DomainError>;

    /// Record a chain call receipt
    async fn create_chain_tx(
        &self,
        tx: &NewChainTransaction,
    ) -> Result<ChainTransaction, DomainError>;

    /// Chain receipts touching a wallet, newest first
    async fn chain_txs_by_wallet(
        &self,
        wallet_id: &WalletId,
    ) -> Result<Vec<ChainTransaction>, DomainError>;
}
