//! Wallet handlers

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{GreenTransaction, SeedTransaction, User, Wallet};
use crate::error::AppError;
use crate::AppState;

/// Balances plus recent ledger entries
#[derive(Debug, Serialize)]
pub struct WalletResponse {
    #[serde(flatten)]
    pub wallet: Wallet,
    pub green_history: Vec<GreenTransaction>,
    pub seed_history: Vec<SeedTransaction>,
}

/// GET /wallet
pub async fn get_wallet(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<WalletResponse>, AppError> {
    let overview = state.wallet_service.overview(&user).await?;

    Ok(Json(WalletResponse {
        wallet: overview.wallet,
        green_history: overview.green_history,
        seed_history: overview.seed_history,
    }))
}

/// Request body for an admin grant
#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub email: String,
    pub amount: i64,
    pub reason: String,
}

/// POST /wallet/grant (admin)
pub async fn grant_green(
    State(state): State<AppState>,
    Json(request): Json<GrantRequest>,
) -> Result<Json<GreenTransaction>, AppError> {
    Ok(Json(
        state
            .wallet_service
            .grant_green(&request.email, request.amount, &request.reason)
            .await?,
    ))
}
