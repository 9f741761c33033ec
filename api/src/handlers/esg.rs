//! ESG report handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::app::{ProjectReport, UserReport};
use crate::domain::entities::User;
use crate::error::AppError;
use crate::AppState;

/// GET /esg/report — the caller's impact report
pub async fn user_report(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<UserReport>, AppError> {
    Ok(Json(state.esg_service.user_report(&user).await?))
}

/// GET /esg/projects/:id — a project's roll-up
pub async fn project_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectReport>, AppError> {
    // Unknown projects 404 instead of returning an all-zero report
    state.catalog_service.get_project(&id.into()).await?;

    Ok(Json(state.esg_service.project_report(&id.into()).await?))
}
