//! Project handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::entities::{NewProject, Project};
use crate::error::AppError;
use crate::AppState;

/// Request body for creating a project
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub region: String,
    pub target_trees: i32,
}

/// POST /projects (admin)
pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<Json<Project>, AppError> {
    let project = state
        .catalog_service
        .create_project(&NewProject {
            name: request.name,
            description: request.description,
            region: request.region,
            target_trees: request.target_trees,
        })
        .await?;

    Ok(Json(project))
}

/// Pagination query
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

/// GET /projects
pub async fn list_projects(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(
        state
            .catalog_service
            .list_projects(page.limit, page.offset)
            .await?,
    ))
}

/// GET /projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, AppError> {
    Ok(Json(state.catalog_service.get_project(&id.into()).await?))
}

/// Request body for a status change
#[derive(Debug, Deserialize)]
pub struct UpdateProjectStatusRequest {
    pub status: String,
}

/// PATCH /projects/:id/status (admin)
pub async fn update_project_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProjectStatusRequest>,
) -> Result<Json<Project>, AppError> {
    let status: crate::domain::entities::ProjectStatus = request
        .status
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown status: {}", request.status)))?;

    Ok(Json(
        state
            .catalog_service
            .update_project_status(&id.into(), status)
            .await?,
    ))
}
