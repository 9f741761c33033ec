//! Brigade handlers
//!
//! Field team endpoints: creation, membership, geotagged actions, and
//! tasks.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::entities::{
    ActionKind, Brigade, BrigadeAction, BrigadeTask, Brigadist, User,
};
use crate::error::AppError;
use crate::AppState;

/// Request body for creating a brigade
#[derive(Debug, Deserialize)]
pub struct CreateBrigadeRequest {
    pub name: String,
    pub region: String,
}

/// POST /brigades (field roles)
pub async fn create_brigade(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateBrigadeRequest>,
) -> Result<Json<Brigade>, AppError> {
    Ok(Json(
        state
            .brigade_service
            .create_brigade(&user, &request.name, &request.region)
            .await?,
    ))
}

/// GET /brigades/my
pub async fn my_brigade(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Option<Brigade>>, AppError> {
    Ok(Json(state.brigade_service.my_brigade(&user).await?))
}

/// GET /brigades/:id
pub async fn get_brigade(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Brigade>, AppError> {
    Ok(Json(state.brigade_service.get_brigade(&id.into()).await?))
}

/// GET /brigades/:id/members
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Brigadist>>, AppError> {
    Ok(Json(state.brigade_service.members(&id.into()).await?))
}

/// Request body for adding a member
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub email: String,
}

/// POST /brigades/:id/members (owner or admin)
pub async fn add_member(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddMemberRequest>,
) -> Result<Json<Brigadist>, AppError> {
    Ok(Json(
        state
            .brigade_service
            .add_member(&user, &id.into(), &request.email)
            .await?,
    ))
}

/// Request body for logging an action
#[derive(Debug, Deserialize)]
pub struct LogActionRequest {
    /// "planting", "inspection", or "fire_alert"
    pub kind: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tree_id: Option<Uuid>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub note: String,
}

/// POST /brigades/:id/actions (members)
pub async fn log_action(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(request): Json<LogActionRequest>,
) -> Result<Json<BrigadeAction>, AppError> {
    let kind: ActionKind = request
        .kind
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown action kind: {}", request.kind)))?;

    Ok(Json(
        state
            .brigade_service
            .log_action(
                &user,
                &id.into(),
                kind,
                request.lat,
                request.lon,
                request.tree_id.map(|t| t.into()),
                request.media_url,
                &request.note,
            )
            .await?,
    ))
}

/// Query for listing actions
#[derive(Debug, Deserialize)]
pub struct ActionsQuery {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// GET /brigades/:id/actions
pub async fn list_actions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ActionsQuery>,
) -> Result<Json<Vec<BrigadeAction>>, AppError> {
    let kind = match &query.kind {
        None => None,
        Some(raw) => Some(raw.parse::<ActionKind>().map_err(|_| {
            AppError::BadRequest(format!("Unknown action kind: {}", raw))
        })?),
    };

    Ok(Json(
        state
            .brigade_service
            .actions(&id.into(), kind, query.limit)
            .await?,
    ))
}

/// Query for the radius search
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius_m: f64,
}

/// GET /brigades/actions/nearby
pub async fn actions_nearby(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<BrigadeAction>>, AppError> {
    Ok(Json(
        state
            .brigade_service
            .actions_near(query.lat, query.lon, query.radius_m)
            .await?,
    ))
}

/// Request body for assigning a task
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub due_on: Option<NaiveDate>,
}

/// POST /brigades/:id/tasks (admin)
pub async fn create_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<Json<BrigadeTask>, AppError> {
    Ok(Json(
        state
            .brigade_service
            .assign_task(&id.into(), &request.title, &request.detail, request.due_on)
            .await?,
    ))
}

/// GET /brigades/:id/tasks (members or admin)
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<BrigadeTask>>, AppError> {
    Ok(Json(state.brigade_service.tasks(&user, &id.into()).await?))
}

/// POST /brigades/tasks/:task_id/complete (members or admin)
pub async fn complete_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<BrigadeTask>, AppError> {
    Ok(Json(
        state.brigade_service.complete_task(&user, &task_id).await?,
    ))
}
