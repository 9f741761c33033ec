//! PostgreSQL adapter for SpeciesRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{NewSpecies, Species, SpeciesId};
use crate::domain::ports::SpeciesRepository;
use crate::entity::species;
use crate::error::DomainError;

/// PostgreSQL implementation of SpeciesRepository
pub struct PostgresSpeciesRepository {
    db: DatabaseConnection,
}

impl PostgresSpeciesRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SpeciesRepository for PostgresSpeciesRepository {
    async fn find_by_id(&self, id: &SpeciesId) -> Result<Option<Species>, DomainError> {
        let result = species::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Species>, DomainError> {
        let result = species::Entity::find()
            .filter(species::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_all(&self) -> Result<Vec<Species>, DomainError> {
        let results = species::Entity::find()
            .order_by_asc(species::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, new_species: &NewSpecies) -> Result<Species, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();

        let model = species::ActiveModel {
            id: Set(id),
            name: Set(new_species.name.clone()),
            scientific_name: Set(new_species.scientific_name.clone()),
            co2_kg_per_year: Set(new_species.co2_kg_per_year),
            created_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update_co2_rate(
        &self,
        id: &SpeciesId,
        co2_kg_per_year: f64,
    ) -> Result<(), DomainError> {
        species::ActiveModel {
            id: Set(id.0),
            co2_kg_per_year: Set(co2_kg_per_year),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<species::Model> for Species {
    fn from(model: species::Model) -> Self {
        Species {
            id: SpeciesId(model.id),
            name: model.name,
            scientific_name: model.scientific_name,
            co2_kg_per_year: model.co2_kg_per_year,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
