//! PostgreSQL adapter for ProductRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{NewProduct, Product, ProductId, SpeciesId};
use crate::domain::ports::ProductRepository;
use crate::entity::products;
use crate::error::DomainError;

/// PostgreSQL implementation of ProductRepository
pub struct PostgresProductRepository {
    db: DatabaseConnection,
}

impl PostgresProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        let result = products::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_active(&self) -> Result<Vec<Product>, DomainError> {
        let results = products::Entity::find()
            .filter(products::Column::Active.eq(true))
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        let results = products::Entity::find()
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();

        let model = products::ActiveModel {
            id: Set(id),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            price_cents: Set(product.price_cents),
            price_green: Set(product.price_green),
            green_reward: Set(product.green_reward),
            species_id: Set(product.species_id.map(|s| s.0)),
            trees_per_unit: Set(product.trees_per_unit),
            active: Set(true),
            created_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn set_active(&self, id: &ProductId, active: bool) -> Result<(), DomainError> {
        products::ActiveModel {
            id: Set(id.0),
            active: Set(active),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Product {
            id: ProductId(model.id),
            name: model.name,
            description: model.description,
            price_cents: model.price_cents,
            price_green: model.price_green,
            green_reward: model.green_reward,
            species_id: model.species_id.map(SpeciesId),
            trees_per_unit: model.trees_per_unit,
            active: model.active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
