//! Conversion handlers

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Conversion, User};
use crate::error::AppError;
use crate::AppState;

/// Request body for a conversion
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    /// Green tokens to convert; the ratio remainder stays in the balance
    pub green_amount: i64,
}

/// Response body for a conversion
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    #[serde(flatten)]
    pub conversion: Conversion,
    pub tx_hash: String,
    pub green_remaining: i64,
}

/// POST /conversions
pub async fn convert(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, AppError> {
    let outcome = state
        .conversion_service
        .convert(&user, request.green_amount)
        .await?;

    Ok(Json(ConvertResponse {
        conversion: outcome.conversion,
        tx_hash: outcome.tx_hash,
        green_remaining: outcome.green_remaining,
    }))
}

/// GET /conversions/my
pub async fn my_conversions(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Conversion>>, AppError> {
    Ok(Json(state.conversion_service.history(&user).await?))
}
