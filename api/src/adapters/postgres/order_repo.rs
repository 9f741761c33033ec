//! PostgreSQL adapter for OrderRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    NewOrder, Order, OrderId, OrderItem, OrderStatus, PaymentMethod, ProductId, ProjectId, UserId,
};
use crate::domain::ports::OrderRepository;
use crate::entity::{order_items, orders};
use crate::error::DomainError;

/// PostgreSQL implementation of OrderRepository
pub struct PostgresOrderRepository {
    db: DatabaseConnection,
}

impl PostgresOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        let result = orders::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_buyer(&self, buyer_id: &UserId) -> Result<Vec<Order>, DomainError> {
        let results = orders::Entity::find()
            .filter(orders::Column::BuyerId.eq(buyer_id.0))
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, order: &NewOrder) -> Result<Order, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        // Order and its items commit together
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let model = orders::ActiveModel {
            id: Set(id),
            buyer_id: Set(order.buyer_id.0),
            project_id: Set(order.project_id.0),
            status: Set(OrderStatus::Pending.to_string()),
            payment_method: Set(order.payment_method.to_string()),
            total_cents: Set(order.total_cents),
            created_at: Set(now.fixed_offset()),
            paid_at: Set(None),
        };

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if !order.items.is_empty() {
            let item_models: Vec<order_items::ActiveModel> = order
                .items
                .iter()
                .map(|item| order_items::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    order_id: Set(id),
                    product_id: Set(item.product_id.0),
                    quantity: Set(item.quantity),
                    unit_price_cents: Set(item.unit_price_cents),
                    unit_price_green: Set(item.unit_price_green),
                    unit_green_reward: Set(item.unit_green_reward),
                })
                .collect();

            order_items::Entity::insert_many(item_models)
                .exec(&txn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(created.into())
    }

    async fn find_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, DomainError> {
        let results = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order_id.0))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn mark_paid(&self, id: &OrderId, at: DateTime<Utc>) -> Result<(), DomainError> {
        orders::ActiveModel {
            id: Set(id.0),
            status: Set(OrderStatus::Paid.to_string()),
            paid_at: Set(Some(at.fixed_offset())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn mark_cancelled(&self, id: &OrderId) -> Result<(), DomainError> {
        orders::ActiveModel {
            id: Set(id.0),
            status: Set(OrderStatus::Cancelled.to_string()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Order {
            id: OrderId(model.id),
            buyer_id: UserId(model.buyer_id),
            project_id: ProjectId(model.project_id),
            status: model.status.parse().unwrap_or(OrderStatus::Pending),
            payment_method: model
                .payment_method
                .parse()
                .unwrap_or(PaymentMethod::Stripe),
            total_cents: model.total_cents,
            created_at: model.created_at.with_timezone(&Utc),
            paid_at: model.paid_at.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        OrderItem {
            id: model.id,
            order_id: OrderId(model.order_id),
            product_id: ProductId(model.product_id),
            quantity: model.quantity,
            unit_price_cents: model.unit_price_cents,
            unit_price_green: model.unit_price_green,
            unit_green_reward: model.unit_green_reward,
        }
    }
}
