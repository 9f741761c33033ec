//! Species handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::entities::{NewSpecies, Species};
use crate::error::AppError;
use crate::AppState;

/// Request body for creating a species
#[derive(Debug, Deserialize)]
pub struct CreateSpeciesRequest {
    pub name: String,
    pub scientific_name: String,
    pub co2_kg_per_year: f64,
}

/// POST /species (admin)
pub async fn create_species(
    State(state): State<AppState>,
    Json(request): Json<CreateSpeciesRequest>,
) -> Result<Json<Species>, AppError> {
    let species = state
        .catalog_service
        .create_species(&NewSpecies {
            name: request.name,
            scientific_name: request.scientific_name,
            co2_kg_per_year: request.co2_kg_per_year,
        })
        .await?;

    Ok(Json(species))
}

/// GET /species
pub async fn list_species(State(state): State<AppState>) -> Result<Json<Vec<Species>>, AppError> {
    Ok(Json(state.catalog_service.list_species().await?))
}

/// GET /species/:id
pub async fn get_species(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Species>, AppError> {
    Ok(Json(state.catalog_service.get_species(&id.into()).await?))
}

/// Request body for updating the absorption rate
#[derive(Debug, Deserialize)]
pub struct UpdateSpeciesRateRequest {
    pub co2_kg_per_year: f64,
}

/// PATCH /species/:id/rate (admin)
pub async fn update_species_rate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSpeciesRateRequest>,
) -> Result<Json<Species>, AppError> {
    Ok(Json(
        state
            .catalog_service
            .update_species_rate(&id.into(), request.co2_kg_per_year)
            .await?,
    ))
}
