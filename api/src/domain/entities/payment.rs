//! Stripe payment record
//!
//! Rows are written from verified webhook events, keyed by the Stripe event
//! id so redelivered events are no-ops.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::order::OrderId;

/// A recorded payment event from Stripe
#[derive(Debug, Clone, Serialize)]
pub struct StripePayment {
    pub id: Uuid,
    /// Stripe event id, unique per delivery
    pub stripe_event_id: String,
    pub order_id: OrderId,
    pub amount_cents: i64,
    pub received_at: DateTime<Utc>,
}

/// Data for recording a payment event
#[derive(Debug, Clone)]
pub struct NewStripePayment {
    pub stripe_event_id: String,
    pub order_id: OrderId,
    pub amount_cents: i64,
}
