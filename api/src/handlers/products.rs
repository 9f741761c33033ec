//! Product handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::entities::{NewProduct, Product};
use crate::error::AppError;
use crate::AppState;

/// Request body for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    /// Price when paying with Green Tokens (0 = cash only)
    #[serde(default)]
    pub price_green: i64,
    /// Green Tokens credited per unit on cash purchases
    #[serde(default)]
    pub green_reward: i64,
    #[serde(default)]
    pub species_id: Option<Uuid>,
    #[serde(default)]
    pub trees_per_unit: i32,
}

/// POST /products (admin)
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .catalog_service
        .create_product(&NewProduct {
            name: request.name,
            description: request.description,
            price_cents: request.price_cents,
            price_green: request.price_green,
            green_reward: request.green_reward,
            species_id: request.species_id.map(|s| s.into()),
            trees_per_unit: request.trees_per_unit,
        })
        .await?;

    Ok(Json(product))
}

/// GET /products — active products only
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.catalog_service.list_products(false).await?))
}

/// GET /products/all (admin) — includes deactivated products
pub async fn list_all_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.catalog_service.list_products(true).await?))
}

/// GET /products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.catalog_service.get_product(&id.into()).await?))
}

/// Request body for toggling availability
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// PATCH /products/:id/active (admin)
pub async fn set_product_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(
        state
            .catalog_service
            .set_product_active(&id.into(), request.active)
            .await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_create_product_defaults() {
        let json = r#"{"name":"Tote Bag","price_cents":2500}"#;
        let request: CreateProductRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.price_green, 0);
        assert_eq!(request.green_reward, 0);
        assert_eq!(request.trees_per_unit, 0);
        assert!(request.species_id.is_none());
    }
}
