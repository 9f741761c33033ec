//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::{
    NewProduct, NewSpecies, Product, ProductId, Project, ProjectId, ProjectStatus, Role, Species,
    SpeciesId, User, UserId,
};

/// Create a test customer with default values
pub fn test_user() -> User {
    let id = Uuid::new_v4();
    User {
        id: UserId(id),
        email: format!("user-{}@example.com", id.simple()),
        display_name: "Test User".to_string(),
        password_hash: "hash".to_string(),
        password_salt: "salt".to_string(),
        role: Role::Customer,
        created_at: Utc::now(),
    }
}

/// Create a test admin
pub fn test_admin() -> User {
    User {
        role: Role::Admin,
        display_name: "Test Admin".to_string(),
        ..test_user()
    }
}

/// Create a test brigadist
pub fn test_brigadist() -> User {
    User {
        role: Role::Brigadist,
        display_name: "Test Brigadist".to_string(),
        ..test_user()
    }
}

/// Create a test species (22 kg CO₂ per year)
pub fn test_species() -> Species {
    Species {
        id: SpeciesId::new(),
        name: "Mahogany".to_string(),
        scientific_name: "Swietenia macrophylla".to_string(),
        co2_kg_per_year: 22.0,
        created_at: Utc::now(),
    }
}

/// Data for creating the test species
pub fn test_new_species() -> NewSpecies {
    NewSpecies {
        name: "Mahogany".to_string(),
        scientific_name: "Swietenia macrophylla".to_string(),
        co2_kg_per_year: 22.0,
    }
}

/// Create an active test project
pub fn test_project() -> Project {
    Project {
        id: ProjectId::new(),
        name: "Rio Verde Restoration".to_string(),
        description: "Reforestation along the Rio Verde banks".to_string(),
        region: "Beni".to_string(),
        target_trees: 10_000,
        status: ProjectStatus::Active,
        created_at: Utc::now(),
    }
}

/// Data for creating a tree product (references a random species id;
/// point it at a created species before use)
pub fn test_new_product() -> NewProduct {
    NewProduct {
        name: "Plant a Mahogany".to_string(),
        description: "One mahogany sapling planted and tracked".to_string(),
        price_cents: 1500,
        price_green: 150,
        green_reward: 30,
        species_id: Some(SpeciesId::new()),
        trees_per_unit: 1,
    }
}

/// Create an active tree product for a known species:
/// 1500 cents / 150 green, reward 30, one tree per unit
pub fn test_product_for_species(species_id: SpeciesId) -> Product {
    Product {
        id: ProductId::new(),
        name: "Plant a Mahogany".to_string(),
        description: "One mahogany sapling planted and tracked".to_string(),
        price_cents: 1500,
        price_green: 150,
        green_reward: 30,
        species_id: Some(species_id),
        trees_per_unit: 1,
        active: true,
        created_at: Utc::now(),
    }
}
