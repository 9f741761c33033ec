//! Marketplace product domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::species::SpeciesId;

/// Unique identifier for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ProductId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Something a user can buy: merch, donations, or tree plantings
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Price in cents (minor currency units)
    pub price_cents: i64,
    /// Price in Green Tokens when paying with tokens (0 = cash only)
    pub price_green: i64,
    /// Green Tokens credited per unit when a cash order is paid
    pub green_reward: i64,
    /// Set when buying a unit plants trees of this species
    pub species_id: Option<SpeciesId>,
    /// Trees planted per unit (0 for non-tree products)
    pub trees_per_unit: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether buying this product plants trees
    pub fn plants_trees(&self) -> bool {
        self.species_id.is_some() && self.trees_per_unit > 0
    }

    /// Whether this product can be paid for with Green Tokens
    pub fn purchasable_with_green(&self) -> bool {
        self.price_green > 0
    }
}

/// Data needed to create a product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub price_green: i64,
    pub green_reward: i64,
    pub species_id: Option<SpeciesId>,
    pub trees_per_unit: i32,
}
