//! Order handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::{OrderLine, OrderOutcome};
use crate::domain::entities::{Order, OrderItem, User};
use crate::error::AppError;
use crate::AppState;

/// One requested line in an order
#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Request body for creating an order
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub project_id: Uuid,
    /// "green_tokens" or "stripe"
    pub payment_method: String,
    pub items: Vec<OrderItemRequest>,
}

/// An order with its items
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub trees_planted: usize,
}

impl From<OrderOutcome> for OrderResponse {
    fn from(outcome: OrderOutcome) -> Self {
        OrderResponse {
            order: outcome.order,
            items: outcome.items,
            trees_planted: outcome.trees_planted,
        }
    }
}

/// POST /orders
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let payment_method: crate::domain::entities::PaymentMethod = request
        .payment_method
        .parse()
        .map_err(|_| {
            AppError::BadRequest(format!(
                "Unknown payment method: {}",
                request.payment_method
            ))
        })?;

    let lines: Vec<OrderLine> = request
        .items
        .iter()
        .map(|i| OrderLine {
            product_id: i.product_id.into(),
            quantity: i.quantity,
        })
        .collect();

    let outcome = state
        .order_service
        .create_order(&user, &request.project_id.into(), &lines, payment_method)
        .await?;

    Ok(Json(outcome.into()))
}

/// GET /orders/my
pub async fn my_orders(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.order_service.my_orders(&user).await?))
}

/// GET /orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let (order, items) = state.order_service.get_order(&user, &id.into()).await?;

    Ok(Json(OrderResponse {
        order,
        items,
        trees_planted: 0,
    }))
}

/// POST /orders/:id/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.order_service.cancel_order(&user, &id.into()).await?))
}
