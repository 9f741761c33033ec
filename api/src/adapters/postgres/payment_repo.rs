//! PostgreSQL adapter for PaymentRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::domain::entities::{NewStripePayment, OrderId, StripePayment};
use crate::domain::ports::PaymentRepository;
use crate::entity::stripe_payments;
use crate::error::DomainError;

/// PostgreSQL implementation of PaymentRepository
pub struct PostgresPaymentRepository {
    db: DatabaseConnection,
}

impl PostgresPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn find_by_event_id(
        &self,
        stripe_event_id: &str,
    ) -> Result<Option<StripePayment>, DomainError> {
        let result = stripe_payments::Entity::find()
            .filter(stripe_payments::Column::StripeEventId.eq(stripe_event_id))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, payment: &NewStripePayment) -> Result<StripePayment, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();

        let model = stripe_payments::ActiveModel {
            id: Set(id),
            stripe_event_id: Set(payment.stripe_event_id.clone()),
            order_id: Set(payment.order_id.0),
            amount_cents: Set(payment.amount_cents),
            received_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }
}

/// Convert SeaORM model to domain entity
impl From<stripe_payments::Model> for StripePayment {
    fn from(model: stripe_payments::Model) -> Self {
        StripePayment {
            id: model.id,
            stripe_event_id: model.stripe_event_id,
            order_id: OrderId(model.order_id),
            amount_cents: model.amount_cents,
            received_at: model.received_at.with_timezone(&Utc),
        }
    }
}
