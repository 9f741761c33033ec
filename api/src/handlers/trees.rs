//! Tree handlers
//!
//! Lifecycle endpoints: list/read, brigade validation, and minting.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::MintOutcome;
use crate::domain::entities::{NftMetadata, Tree, User};
use crate::error::AppError;
use crate::AppState;

/// Query for listing a project's trees
#[derive(Debug, Deserialize)]
pub struct TreesQuery {
    pub project_id: Uuid,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// GET /trees?project_id=...
pub async fn list_trees(
    State(state): State<AppState>,
    Query(query): Query<TreesQuery>,
) -> Result<Json<Vec<Tree>>, AppError> {
    Ok(Json(
        state
            .mint_service
            .project_trees(&query.project_id.into(), query.limit, query.offset)
            .await?,
    ))
}

/// GET /trees/my
pub async fn my_trees(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Tree>>, AppError> {
    Ok(Json(state.mint_service.my_trees(&user).await?))
}

/// GET /trees/:id
pub async fn get_tree(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tree>, AppError> {
    Ok(Json(state.mint_service.get_tree(&id.into()).await?))
}

/// GET /trees/:id/metadata
pub async fn get_tree_metadata(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NftMetadata>, AppError> {
    state
        .mint_service
        .metadata(&id.into())
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("tree {} has not minted", id)))
}

/// POST /trees/:id/validate (field roles)
pub async fn validate_tree(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tree>, AppError> {
    Ok(Json(
        state.mint_service.validate_tree(&user, &id.into()).await?,
    ))
}

/// Response body for a mint
#[derive(Debug, Serialize)]
pub struct MintResponse {
    pub tree: Tree,
    pub metadata: NftMetadata,
    pub tx_hash: String,
}

impl From<MintOutcome> for MintResponse {
    fn from(outcome: MintOutcome) -> Self {
        MintResponse {
            tree: outcome.tree,
            metadata: outcome.metadata,
            tx_hash: outcome.tx_hash,
        }
    }
}

/// POST /trees/:id/mint
pub async fn mint_tree(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Json<MintResponse>, AppError> {
    let outcome = state.mint_service.mint_tree(&user, &id.into()).await?;
    Ok(Json(outcome.into()))
}
