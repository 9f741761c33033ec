//! Order domain entities
//!
//! Orders snapshot product prices and rewards at creation time so later
//! catalog edits don't change what a buyer paid or earned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::ProductId;
use super::project::ProjectId;
use super::user::UserId;

/// Unique identifier for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrderId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Paid => write!(f, "paid"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

/// How the buyer settles the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    GreenTokens,
    Stripe,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::GreenTokens => write!(f, "green_tokens"),
            PaymentMethod::Stripe => write!(f, "stripe"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "green_tokens" => Ok(PaymentMethod::GreenTokens),
            "stripe" => Ok(PaymentMethod::Stripe),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

/// A purchase of one or more products, planted into a project
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub buyer_id: UserId,
    pub project_id: ProjectId,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// A line in an order, with price and reward snapshotted
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub unit_price_green: i64,
    pub unit_green_reward: i64,
}

impl OrderItem {
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity as i64
    }

    pub fn line_total_green(&self) -> i64 {
        self.unit_price_green * self.quantity as i64
    }

    pub fn line_green_reward(&self) -> i64 {
        self.unit_green_reward * self.quantity as i64
    }
}

/// Data needed to create an order
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub buyer_id: UserId,
    pub project_id: ProjectId,
    pub payment_method: PaymentMethod,
    pub total_cents: i64,
    pub items: Vec<NewOrderItem>,
}

/// Data for one order line
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub unit_price_green: i64,
    pub unit_green_reward: i64,
}

/// Sum of line totals across an order, in cents
pub fn order_total_cents(items: &[NewOrderItem]) -> i64 {
    items
        .iter()
        .map(|i| i.unit_price_cents * i.quantity as i64)
        .sum()
}

/// Sum of line totals across an order, in Green Tokens
pub fn order_total_green(items: &[NewOrderItem]) -> i64 {
    items
        .iter()
        .map(|i| i.unit_price_green * i.quantity as i64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_totals() {
        let item = OrderItem {
            id: Uuid::new_v4(),
            order_id: OrderId::new(),
            product_id: ProductId::new(),
            quantity: 3,
            unit_price_cents: 1500,
            unit_price_green: 150,
            unit_green_reward: 30,
        };

        assert_eq!(item.line_total_cents(), 4500);
        assert_eq!(item.line_total_green(), 450);
        assert_eq!(item.line_green_reward(), 90);
    }

    #[test]
    fn order_total_sums_lines() {
        let items = vec![
            NewOrderItem {
                product_id: ProductId::new(),
                quantity: 2,
                unit_price_cents: 1000,
                unit_price_green: 100,
                unit_green_reward: 20,
            },
            NewOrderItem {
                product_id: ProductId::new(),
                quantity: 1,
                unit_price_cents: 2500,
                unit_price_green: 0,
                unit_green_reward: 10,
            },
        ];

        assert_eq!(order_total_cents(&items), 4500);
        assert_eq!(order_total_green(&items), 200);
    }

    #[test]
    fn only_pending_orders_can_cancel() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(!OrderStatus::Paid.can_cancel());
        assert!(!OrderStatus::Cancelled.can_cancel());
    }
}
