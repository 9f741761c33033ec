//! Tree species domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeciesId(pub Uuid);

impl SpeciesId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SpeciesId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SpeciesId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A plantable tree species with its absorption profile
#[derive(Debug, Clone, Serialize)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
    pub scientific_name: String,
    /// Estimated CO₂ absorbed per mature tree, in kg per year
    pub co2_kg_per_year: f64,
    pub created_at: DateTime<Utc>,
}

impl Species {
    /// Estimated CO₂ absorbed by one tree of this species planted at
    /// `planted_at`, pro-rated by days elapsed.
    pub fn co2_absorbed_kg(&self, planted_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let days = (now - planted_at).num_days();
        if days <= 0 {
            return 0.0;
        }
        self.co2_kg_per_year * days as f64 / 365.25
    }
}

/// Data needed to create a species
#[derive(Debug, Clone)]
pub struct NewSpecies {
    pub name: String,
    pub scientific_name: String,
    pub co2_kg_per_year: f64,
}
