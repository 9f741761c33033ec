//! Mock implementations of port traits
//!
//! In-memory implementations that can be configured for testing. They
//! mirror the Postgres adapters' behavior, including the guarded ledger
//! semantics (debits that would go negative fail without side effects).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::domain::entities::{
    ActionKind, Brigade, BrigadeAction, BrigadeId, BrigadeTask, Brigadist, BrigadistRole,
    ChainTransaction, Conversion, ConversionId, GeoPoint,
    GreenTransaction, NewBrigade, NewBrigadeAction, NewBrigadeTask, NewChainTransaction,
    NewConversion, NewLedgerEntry, NewNftMetadata, NewOrder, NewProduct, NewProject, NewSpecies,
    NewStripePayment, NewTree, NewUser, NftMetadata, Order, OrderId, OrderItem, OrderStatus,
    Product, ProductId, Project, ProjectId, ProjectStatus, SeedTransaction, Species, SpeciesId,
    StripePayment, TaskStatus, Tree, TreeId, TreeStatus, TxKind, User, UserId, Wallet, WalletId,
};
use crate::domain::ports::{
    BrigadeRepository, MintRepository, OrderRepository, PaymentRepository, ProductRepository,
    ProjectRepository, SpeciesRepository, TreeRepository, UserRepository, WalletRepository,
};
use crate::error::DomainError;

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.users.write().unwrap().insert(user.id, user);
        self
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        let user = User {
            id: UserId::new(),
            email: new_user.email.clone(),
            display_name: new_user.display_name.clone(),
            password_hash: new_user.password_hash.clone(),
            password_salt: new_user.password_salt.clone(),
            role: new_user.role,
            created_at: Utc::now(),
        };
        self.users.write().unwrap().insert(user.id, user.clone());
        Ok(user)
    }
}

// ============================================================================
// In-Memory Wallet Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryWalletRepository {
    wallets: Arc<RwLock<HashMap<WalletId, Wallet>>>,
    by_user: Arc<RwLock<HashMap<UserId, WalletId>>>,
    green_txs: Arc<RwLock<Vec<GreenTransaction>>>,
    seed_txs: Arc<RwLock<Vec<SeedTransaction>>>,
    conversion_rows: Arc<RwLock<Vec<Conversion>>>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn adjust(
        &self,
        wallet_id: &WalletId,
        green_delta: i64,
        seed_delta: i64,
    ) -> Result<(), DomainError> {
        let mut wallets = self.wallets.write().unwrap();
        let wallet = wallets
            .get_mut(wallet_id)
            .ok_or_else(|| DomainError::NotFound(format!("wallet {}", wallet_id)))?;

        if wallet.green_balance + green_delta < 0 {
            return Err(DomainError::InsufficientBalance(format!(
                "wallet {} cannot cover {} green",
                wallet_id, -green_delta
            )));
        }
        if wallet.seed_balance + seed_delta < 0 {
            return Err(DomainError::InsufficientBalance(format!(
                "wallet {} cannot cover {} seed",
                wallet_id, -seed_delta
            )));
        }

        wallet.green_balance += green_delta;
        wallet.seed_balance += seed_delta;
        Ok(())
    }
}

fn signed(kind: TxKind, amount: i64) -> i64 {
    match kind {
        TxKind::Credit => amount,
        TxKind::Debit => -amount,
    }
}

#[async_trait]
impl WalletRepository for InMemoryWalletRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Wallet>, DomainError> {
        let by_user = self.by_user.read().unwrap();
        let wallets = self.wallets.read().unwrap();
        Ok(by_user.get(user_id).and_then(|id| wallets.get(id)).cloned())
    }

    async fn create(&self, user_id: &UserId) -> Result<Wallet, DomainError> {
        let wallet = Wallet {
            id: WalletId::new(),
            user_id: *user_id,
            green_balance: 0,
            seed_balance: 0,
            created_at: Utc::now(),
        };
        self.by_user.write().unwrap().insert(*user_id, wallet.id);
        self.wallets.write().unwrap().insert(wallet.id, wallet.clone());
        Ok(wallet)
    }

    async fn apply_green(
        &self,
        entry: &NewLedgerEntry,
    ) -> Result<GreenTransaction, DomainError> {
        if entry.amount <= 0 {
            return Err(DomainError::Validation("amount must be positive".to_string()));
        }
        self.adjust(&entry.wallet_id, signed(entry.kind, entry.amount), 0)?;

        let tx = GreenTransaction {
            id: Uuid::new_v4(),
            wallet_id: entry.wallet_id,
            kind: entry.kind,
            amount: entry.amount,
            reason: entry.reason.clone(),
            reference_id: entry.reference_id,
            created_at: Utc::now(),
        };
        self.green_txs.write().unwrap().push(tx.clone());
        Ok(tx)
    }

    async fn apply_seed(&self, entry: &NewLedgerEntry) -> Result<SeedTransaction, DomainError> {
        if entry.amount <= 0 {
            return Err(DomainError::Validation("amount must be positive".to_string()));
        }
        self.adjust(&entry.wallet_id, 0, signed(entry.kind, entry.amount))?;

        let tx = SeedTransaction {
            id: Uuid::new_v4(),
            wallet_id: entry.wallet_id,
            kind: entry.kind,
            amount: entry.amount,
            reason: entry.reason.clone(),
            reference_id: entry.reference_id,
            created_at: Utc::now(),
        };
        self.seed_txs.write().unwrap().push(tx.clone());
        Ok(tx)
    }

    async fn convert(&self, conversion: &NewConversion) -> Result<Conversion, DomainError> {
        self.adjust(
            &conversion.wallet_id,
            -conversion.green_spent,
            conversion.seeds_minted,
        )?;

        let row = Conversion {
            id: ConversionId::new(),
            wallet_id: conversion.wallet_id,
            green_spent: conversion.green_spent,
            seeds_minted: conversion.seeds_minted,
            created_at: Utc::now(),
        };

        self.green_txs.write().unwrap().push(GreenTransaction {
            id: Uuid::new_v4(),
            wallet_id: conversion.wallet_id,
            kind: TxKind::Debit,
            amount: conversion.green_spent,
            reason: "conversion".to_string(),
            reference_id: Some(row.id.0),
            created_at: row.created_at,
        });
        self.seed_txs.write().unwrap().push(SeedTransaction {
            id: Uuid::new_v4(),
            wallet_id: conversion.wallet_id,
            kind: TxKind::Credit,
            amount: conversion.seeds_minted,
            reason: "conversion".to_string(),
            reference_id: Some(row.id.0),
            created_at: row.created_at,
        });
        self.conversion_rows.write().unwrap().push(row.clone());

        Ok(row)
    }

    async fn green_history(
        &self,
        wallet_id: &WalletId,
        limit: i64,
    ) -> Result<Vec<GreenTransaction>, DomainError> {
        let mut txs: Vec<_> = self
            .green_txs
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.wallet_id == *wallet_id)
            .cloned()
            .collect();
        txs.reverse();
        txs.truncate(limit as usize);
        Ok(txs)
    }

    async fn seed_history(
        &self,
        wallet_id: &WalletId,
        limit: i64,
    ) -> Result<Vec<SeedTransaction>, DomainError> {
        let mut txs: Vec<_> = self
            .seed_txs
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.wallet_id == *wallet_id)
            .cloned()
            .collect();
        txs.reverse();
        txs.truncate(limit as usize);
        Ok(txs)
    }

    async fn conversions(&self, wallet_id: &WalletId) -> Result<Vec<Conversion>, DomainError> {
        let mut rows: Vec<_> = self
            .conversion_rows
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.wallet_id == *wallet_id)
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows)
    }
}

// ============================================================================
// In-Memory Species Repository
// ============================================================================

#[derive(Default)]
pub struct InMemorySpeciesRepository {
    species: Arc<RwLock<HashMap<SpeciesId, Species>>>,
}

impl InMemorySpeciesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_species(self, species: Species) -> Self {
        self.species.write().unwrap().insert(species.id, species);
        self
    }
}

#[async_trait]
impl SpeciesRepository for InMemorySpeciesRepository {
    async fn find_by_id(&self, id: &SpeciesId) -> Result<Option<Species>, DomainError> {
        Ok(self.species.read().unwrap().get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Species>, DomainError> {
        Ok(self
            .species
            .read()
            .unwrap()
            .values()
            .find(|s| s.name == name)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Species>, DomainError> {
        let mut all: Vec<_> = self.species.read().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn create(&self, new_species: &NewSpecies) -> Result<Species, DomainError> {
        let species = Species {
            id: SpeciesId::new(),
            name: new_species.name.clone(),
            scientific_name: new_species.scientific_name.clone(),
            co2_kg_per_year: new_species.co2_kg_per_year,
            created_at: Utc::now(),
        };
        self.species
            .write()
            .unwrap()
            .insert(species.id, species.clone());
        Ok(species)
    }

    async fn update_co2_rate(
        &self,
        id: &SpeciesId,
        co2_kg_per_year: f64,
    ) -> Result<(), DomainError> {
        let mut species = self.species.write().unwrap();
        let entry = species
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("species {}", id)))?;
        entry.co2_kg_per_year = co2_kg_per_year;
        Ok(())
    }
}

// ============================================================================
// In-Memory Project Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: Arc<RwLock<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, project: Project) -> Self {
        self.projects.write().unwrap().insert(project.id, project);
        self
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        Ok(self.projects.read().unwrap().get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Project>, DomainError> {
        Ok(self
            .projects
            .read()
            .unwrap()
            .values()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Project>, DomainError> {
        let mut all: Vec<_> = self.projects.read().unwrap().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn create(&self, project: &NewProject) -> Result<Project, DomainError> {
        let project = Project {
            id: ProjectId::new(),
            name: project.name.clone(),
            description: project.description.clone(),
            region: project.region.clone(),
            target_trees: project.target_trees,
            status: ProjectStatus::Active,
            created_at: Utc::now(),
        };
        self.projects
            .write()
            .unwrap()
            .insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_status(
        &self,
        id: &ProjectId,
        status: ProjectStatus,
    ) -> Result<(), DomainError> {
        let mut projects = self.projects.write().unwrap();
        let entry = projects
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("project {}", id)))?;
        entry.status = status;
        Ok(())
    }
}

// ============================================================================
// In-Memory Tree Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryTreeRepository {
    trees: Arc<RwLock<HashMap<TreeId, Tree>>>,
    species: Arc<RwLock<HashMap<SpeciesId, Species>>>,
}

impl InMemoryTreeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a species so the with-species joins resolve
    pub fn with_species(self, species: Species) -> Self {
        self.add_species(species);
        self
    }

    /// Register a species on an already-shared repository
    pub fn add_species(&self, species: Species) {
        self.species.write().unwrap().insert(species.id, species);
    }

    fn join_species(&self, trees: Vec<Tree>) -> Vec<(Tree, Species)> {
        let species = self.species.read().unwrap();
        trees
            .into_iter()
            .filter_map(|t| species.get(&t.species_id).cloned().map(|s| (t, s)))
            .collect()
    }
}

#[async_trait]
impl TreeRepository for InMemoryTreeRepository {
    async fn find_by_id(&self, id: &TreeId) -> Result<Option<Tree>, DomainError> {
        Ok(self.trees.read().unwrap().get(id).cloned())
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Tree>, DomainError> {
        Ok(self
            .trees
            .read()
            .unwrap()
            .values()
            .filter(|t| t.owner_id == *owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tree>, DomainError> {
        let mut trees: Vec<_> = self
            .trees
            .read()
            .unwrap()
            .values()
            .filter(|t| t.project_id == *project_id)
            .cloned()
            .collect();
        trees.sort_by(|a, b| b.planted_at.cmp(&a.planted_at));
        Ok(trees
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn create_many(&self, new_trees: &[NewTree]) -> Result<Vec<Tree>, DomainError> {
        let now = Utc::now();
        let mut created = Vec::with_capacity(new_trees.len());
        let mut trees = self.trees.write().unwrap();

        for new_tree in new_trees {
            let tree = Tree {
                id: TreeId::new(),
                species_id: new_tree.species_id,
                project_id: new_tree.project_id,
                owner_id: new_tree.owner_id,
                status: TreeStatus::Planted,
                planted_at: now,
                validated_at: None,
            };
            trees.insert(tree.id, tree.clone());
            created.push(tree);
        }

        Ok(created)
    }

    async fn mark_validated(&self, id: &TreeId, at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut trees = self.trees.write().unwrap();
        let tree = trees
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("tree {}", id)))?;
        tree.status = TreeStatus::Validated;
        tree.validated_at = Some(at);
        Ok(())
    }

    async fn mark_minted(&self, id: &TreeId) -> Result<(), DomainError> {
        let mut trees = self.trees.write().unwrap();
        let tree = trees
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("tree {}", id)))?;
        tree.status = TreeStatus::Minted;
        Ok(())
    }

    async fn find_with_species_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<(Tree, Species)>, DomainError> {
        let trees = self.find_by_owner(owner_id).await?;
        Ok(self.join_species(trees))
    }

    async fn find_with_species_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<(Tree, Species)>, DomainError> {
        let trees = self.find_by_project(project_id, i64::MAX, 0).await?;
        Ok(self.join_species(trees))
    }

    async fn count_by_status(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<(TreeStatus, i64)>, DomainError> {
        let trees = self.trees.read().unwrap();
        let mut counts: HashMap<TreeStatus, i64> = HashMap::new();
        for tree in trees.values().filter(|t| t.project_id == *project_id) {
            *counts.entry(tree.status).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn count_distinct_owners(&self, project_id: &ProjectId) -> Result<i64, DomainError> {
        let trees = self.trees.read().unwrap();
        let owners: std::collections::HashSet<_> = trees
            .values()
            .filter(|t| t.project_id == *project_id)
            .map(|t| t.owner_id)
            .collect();
        Ok(owners.len() as i64)
    }
}

// ============================================================================
// In-Memory Product Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(self, product: Product) -> Self {
        self.products.write().unwrap().insert(product.id, product);
        self
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        Ok(self.products.read().unwrap().get(id).cloned())
    }

    async fn find_active(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .products
            .read()
            .unwrap()
            .values()
            .filter(|p| p.active)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.products.read().unwrap().values().cloned().collect())
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, DomainError> {
        let product = Product {
            id: ProductId::new(),
            name: product.name.clone(),
            description: product.description.clone(),
            price_cents: product.price_cents,
            price_green: product.price_green,
            green_reward: product.green_reward,
            species_id: product.species_id,
            trees_per_unit: product.trees_per_unit,
            active: true,
            created_at: Utc::now(),
        };
        self.products
            .write()
            .unwrap()
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn set_active(&self, id: &ProductId, active: bool) -> Result<(), DomainError> {
        let mut products = self.products.write().unwrap();
        let entry = products
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("product {}", id)))?;
        entry.active = active;
        Ok(())
    }
}

// ============================================================================
// In-Memory Order Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    items: Arc<RwLock<Vec<OrderItem>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.read().unwrap().get(id).cloned())
    }

    async fn find_by_buyer(&self, buyer_id: &UserId) -> Result<Vec<Order>, DomainError> {
        let mut orders: Vec<_> = self
            .orders
            .read()
            .unwrap()
            .values()
            .filter(|o| o.buyer_id == *buyer_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn create(&self, new_order: &NewOrder) -> Result<Order, DomainError> {
        let order = Order {
            id: OrderId::new(),
            buyer_id: new_order.buyer_id,
            project_id: new_order.project_id,
            status: OrderStatus::Pending,
            payment_method: new_order.payment_method,
            total_cents: new_order.total_cents,
            created_at: Utc::now(),
            paid_at: None,
        };

        let mut items = self.items.write().unwrap();
        for item in &new_order.items {
            items.push(OrderItem {
                id: Uuid::new_v4(),
                order_id: order.id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price_cents: item.unit_price_cents,
                unit_price_green: item.unit_price_green,
                unit_green_reward: item.unit_green_reward,
            });
        }

        self.orders.write().unwrap().insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, DomainError> {
        Ok(self
            .items
            .read()
            .unwrap()
            .iter()
            .filter(|i| i.order_id == *order_id)
            .cloned()
            .collect())
    }

    async fn mark_paid(&self, id: &OrderId, at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut orders = self.orders.write().unwrap();
        let order = orders
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("order {}", id)))?;
        order.status = OrderStatus::Paid;
        order.paid_at = Some(at);
        Ok(())
    }

    async fn mark_cancelled(&self, id: &OrderId) -> Result<(), DomainError> {
        let mut orders = self.orders.write().unwrap();
        let order = orders
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("order {}", id)))?;
        order.status = OrderStatus::Cancelled;
        Ok(())
    }
}

// ============================================================================
// In-Memory Brigade Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryBrigadeRepository {
    brigades: Arc<RwLock<HashMap<BrigadeId, Brigade>>>,
    members: Arc<RwLock<Vec<Brigadist>>>,
    actions: Arc<RwLock<Vec<BrigadeAction>>>,
    tasks: Arc<RwLock<Vec<BrigadeTask>>>,
}

impl InMemoryBrigadeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Great-circle distance in meters (haversine)
fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

#[async_trait]
impl BrigadeRepository for InMemoryBrigadeRepository {
    async fn find_by_id(&self, id: &BrigadeId) -> Result<Option<Brigade>, DomainError> {
        Ok(self.brigades.read().unwrap().get(id).cloned())
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Option<Brigade>, DomainError> {
        Ok(self
            .brigades
            .read()
            .unwrap()
            .values()
            .find(|b| b.owner_id == *owner_id)
            .cloned())
    }

    async fn find_by_member(&self, user_id: &UserId) -> Result<Option<Brigade>, DomainError> {
        let brigade_id = self
            .members
            .read()
            .unwrap()
            .iter()
            .find(|m| m.user_id == *user_id)
            .map(|m| m.brigade_id);

        match brigade_id {
            Some(id) => self.find_by_id(&id).await,
            None => Ok(None),
        }
    }

    async fn create(&self, new_brigade: &NewBrigade) -> Result<Brigade, DomainError> {
        let brigade = Brigade {
            id: BrigadeId::new(),
            owner_id: new_brigade.owner_id,
            name: new_brigade.name.clone(),
            region: new_brigade.region.clone(),
            created_at: Utc::now(),
        };

        self.members.write().unwrap().push(Brigadist {
            brigade_id: brigade.id,
            user_id: new_brigade.owner_id,
            role: BrigadistRole::Lead,
            joined_at: brigade.created_at,
        });
        self.brigades
            .write()
            .unwrap()
            .insert(brigade.id, brigade.clone());

        Ok(brigade)
    }

    async fn add_member(
        &self,
        brigade_id: &BrigadeId,
        user_id: &UserId,
        role: BrigadistRole,
    ) -> Result<Brigadist, DomainError> {
        let member = Brigadist {
            brigade_id: *brigade_id,
            user_id: *user_id,
            role,
            joined_at: Utc::now(),
        };
        self.members.write().unwrap().push(member.clone());
        Ok(member)
    }

    async fn is_member(
        &self,
        brigade_id: &BrigadeId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        Ok(self
            .members
            .read()
            .unwrap()
            .iter()
            .any(|m| m.brigade_id == *brigade_id && m.user_id == *user_id))
    }

    async fn members(&self, brigade_id: &BrigadeId) -> Result<Vec<Brigadist>, DomainError> {
        Ok(self
            .members
            .read()
            .unwrap()
            .iter()
            .filter(|m| m.brigade_id == *brigade_id)
            .cloned()
            .collect())
    }

    async fn create_action(
        &self,
        action: &NewBrigadeAction,
    ) -> Result<BrigadeAction, DomainError> {
        let action = BrigadeAction {
            id: Uuid::new_v4(),
            brigade_id: action.brigade_id,
            brigadist_id: action.brigadist_id,
            kind: action.kind,
            location: action.location,
            tree_id: action.tree_id,
            media_url: action.media_url.clone(),
            note: action.note.clone(),
            created_at: Utc::now(),
        };
        self.actions.write().unwrap().push(action.clone());
        Ok(action)
    }

    async fn actions(
        &self,
        brigade_id: &BrigadeId,
        kind: Option<ActionKind>,
        limit: i64,
    ) -> Result<Vec<BrigadeAction>, DomainError> {
        let mut actions: Vec<_> = self
            .actions
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.brigade_id == *brigade_id)
            .filter(|a| kind.map(|k| a.kind == k).unwrap_or(true))
            .cloned()
            .collect();
        actions.reverse();
        actions.truncate(limit as usize);
        Ok(actions)
    }

    async fn actions_near(
        &self,
        center: GeoPoint,
        radius_m: f64,
        limit: i64,
    ) -> Result<Vec<BrigadeAction>, DomainError> {
        let mut actions: Vec<_> = self
            .actions
            .read()
            .unwrap()
            .iter()
            .filter(|a| distance_m(a.location, center) <= radius_m)
            .cloned()
            .collect();
        actions.reverse();
        actions.truncate(limit as usize);
        Ok(actions)
    }

    async fn create_task(&self, task: &NewBrigadeTask) -> Result<BrigadeTask, DomainError> {
        let task = BrigadeTask {
            id: Uuid::new_v4(),
            brigade_id: task.brigade_id,
            title: task.title.clone(),
            detail: task.detail.clone(),
            due_on: task.due_on,
            status: TaskStatus::Open,
            created_at: Utc::now(),
        };
        self.tasks.write().unwrap().push(task.clone());
        Ok(task)
    }

    async fn tasks(&self, brigade_id: &BrigadeId) -> Result<Vec<BrigadeTask>, DomainError> {
        Ok(self
            .tasks
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.brigade_id == *brigade_id)
            .cloned()
            .collect())
    }

    async fn find_task(&self, task_id: &Uuid) -> Result<Option<BrigadeTask>, DomainError> {
        Ok(self
            .tasks
            .read()
            .unwrap()
            .iter()
            .find(|t| t.id == *task_id)
            .cloned())
    }

    async fn complete_task(&self, task_id: &Uuid) -> Result<(), DomainError> {
        let mut tasks = self.tasks.write().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == *task_id)
            .ok_or_else(|| DomainError::NotFound(format!("task {}", task_id)))?;
        task.status = TaskStatus::Done;
        Ok(())
    }
}

// ============================================================================
// In-Memory Payment Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: Arc<RwLock<Vec<StripePayment>>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn find_by_event_id(
        &self,
        stripe_event_id: &str,
    ) -> Result<Option<StripePayment>, DomainError> {
        Ok(self
            .payments
            .read()
            .unwrap()
            .iter()
            .find(|p| p.stripe_event_id == stripe_event_id)
            .cloned())
    }

    async fn create(&self, payment: &NewStripePayment) -> Result<StripePayment, DomainError> {
        let payment = StripePayment {
            id: Uuid::new_v4(),
            stripe_event_id: payment.stripe_event_id.clone(),
            order_id: payment.order_id,
            amount_cents: payment.amount_cents,
            received_at: Utc::now(),
        };
        self.payments.write().unwrap().push(payment.clone());
        Ok(payment)
    }
}

// ============================================================================
// In-Memory Mint Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryMintRepository {
    metadata: Arc<RwLock<Vec<NftMetadata>>>,
    chain_txs: Arc<RwLock<Vec<ChainTransaction>>>,
}

impl InMemoryMintRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MintRepository for InMemoryMintRepository {
    async fn create_metadata(
        &self,
        new_metadata: &NewNftMetadata,
    ) -> Result<NftMetadata, DomainError> {
        let mut metadata = self.metadata.write().unwrap();
        // Mirrors the unique index on tree_id
        if metadata.iter().any(|m| m.tree_id == new_metadata.tree_id) {
            return Err(DomainError::AlreadyExists(format!(
                "metadata for tree {}",
                new_metadata.tree_id
            )));
        }

        let row = NftMetadata {
            id: Uuid::new_v4(),
            tree_id: new_metadata.tree_id,
            token_uri: new_metadata.token_uri.clone(),
            name: new_metadata.name.clone(),
            attributes: new_metadata.attributes.clone(),
            created_at: Utc::now(),
        };
        metadata.push(row.clone());
        Ok(row)
    }

    async fn find_metadata_by_tree(
        &self,
        tree_id: &TreeId,
    ) -> Result<Option<NftMetadata>, DomainError> {
        Ok(self
            .metadata
            .read()
            .unwrap()
            .iter()
            .find(|m| m.tree_id == *tree_id)
            .cloned())
    }

    async fn create_chain_tx(
        &self,
        tx: &NewChainTransaction,
    ) -> Result<ChainTransaction, DomainError> {
        let row = ChainTransaction {
            id: Uuid::new_v4(),
            tx_hash: tx.tx_hash.clone(),
            kind: tx.kind,
            status: tx.status,
            wallet_id: tx.wallet_id,
            tree_id: tx.tree_id,
            created_at: Utc::now(),
        };
        self.chain_txs.write().unwrap().push(row.clone());
        Ok(row)
    }

    async fn chain_txs_by_wallet(
        &self,
        wallet_id: &WalletId,
    ) -> Result<Vec<ChainTransaction>, DomainError> {
        let mut txs: Vec<_> = self
            .chain_txs
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.wallet_id == *wallet_id)
            .cloned()
            .collect();
        txs.reverse();
        Ok(txs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_sanity() {
        let a = GeoPoint { lat: -16.5, lon: -64.9 };
        // ~1.11 km north
        let b = GeoPoint { lat: -16.49, lon: -64.9 };

        let d = distance_m(a, b);
        assert!(d > 1_000.0 && d < 1_250.0);
    }
}
