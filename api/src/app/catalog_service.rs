//! Catalog service
//!
//! Admin-managed reference data: species, products, and planting projects.

use std::sync::Arc;

use crate::domain::entities::{
    NewProduct, NewProject, NewSpecies, Product, ProductId, Project, ProjectId, ProjectStatus,
    Species, SpeciesId,
};
use crate::domain::ports::{ProductRepository, ProjectRepository, SpeciesRepository};
use crate::error::{AppError, DomainError};

const MAX_PAGE_SIZE: i64 = 100;

/// Service for the marketplace catalog
pub struct CatalogService<SR, PR, JR>
where
    SR: SpeciesRepository,
    PR: ProductRepository,
    JR: ProjectRepository,
{
    species: Arc<SR>,
    products: Arc<PR>,
    projects: Arc<JR>,
}

impl<SR, PR, JR> CatalogService<SR, PR, JR>
where
    SR: SpeciesRepository,
    PR: ProductRepository,
    JR: ProjectRepository,
{
    pub fn new(species: Arc<SR>, products: Arc<PR>, projects: Arc<JR>) -> Self {
        Self {
            species,
            products,
            projects,
        }
    }

    // Species

    pub async fn create_species(&self, new_species: &NewSpecies) -> Result<Species, AppError> {
        if new_species.name.is_empty() || new_species.name.len() > 100 {
            return Err(AppError::BadRequest(
                "Species name must be between 1 and 100 characters".to_string(),
            ));
        }
        if new_species.co2_kg_per_year <= 0.0 {
            return Err(AppError::BadRequest(
                "CO2 absorption rate must be positive".to_string(),
            ));
        }

        if self.species.find_by_name(&new_species.name).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "Species '{}' already exists",
                new_species.name
            ))));
        }

        Ok(self.species.create(new_species).await?)
    }

    pub async fn list_species(&self) -> Result<Vec<Species>, AppError> {
        Ok(self.species.find_all().await?)
    }

    pub async fn get_species(&self, id: &SpeciesId) -> Result<Species, AppError> {
        self.species
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Domain(DomainError::NotFound(format!("species {}", id))))
    }

    pub async fn update_species_rate(
        &self,
        id: &SpeciesId,
        co2_kg_per_year: f64,
    ) -> Result<Species, AppError> {
        if co2_kg_per_year <= 0.0 {
            return Err(AppError::BadRequest(
                "CO2 absorption rate must be positive".to_string(),
            ));
        }

        // Ensure it exists before the blind column update
        self.get_species(id).await?;
        self.species.update_co2_rate(id, co2_kg_per_year).await?;
        self.get_species(id).await
    }

    // Products

    pub async fn create_product(&self, new_product: &NewProduct) -> Result<Product, AppError> {
        if new_product.name.is_empty() || new_product.name.len() > 200 {
            return Err(AppError::BadRequest(
                "Product name must be between 1 and 200 characters".to_string(),
            ));
        }
        if new_product.price_cents < 0
            || new_product.price_green < 0
            || new_product.green_reward < 0
        {
            return Err(AppError::BadRequest(
                "Prices and rewards cannot be negative".to_string(),
            ));
        }
        if new_product.trees_per_unit < 0 {
            return Err(AppError::BadRequest(
                "Trees per unit cannot be negative".to_string(),
            ));
        }
        if new_product.trees_per_unit > 0 && new_product.species_id.is_none() {
            return Err(AppError::BadRequest(
                "Tree products must name a species".to_string(),
            ));
        }

        if let Some(species_id) = &new_product.species_id {
            self.get_species(species_id).await?;
        }

        Ok(self.products.create(new_product).await?)
    }

    pub async fn list_products(&self, include_inactive: bool) -> Result<Vec<Product>, AppError> {
        if include_inactive {
            Ok(self.products.find_all().await?)
        } else {
            Ok(self.products.find_active().await?)
        }
    }

    pub async fn get_product(&self, id: &ProductId) -> Result<Product, AppError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Domain(DomainError::NotFound(format!("product {}", id))))
    }

    pub async fn set_product_active(
        &self,
        id: &ProductId,
        active: bool,
    ) -> Result<Product, AppError> {
        self.get_product(id).await?;
        self.products.set_active(id, active).await?;
        self.get_product(id).await
    }

    // Projects

    pub async fn create_project(&self, new_project: &NewProject) -> Result<Project, AppError> {
        if new_project.name.is_empty() || new_project.name.len() > 200 {
            return Err(AppError::BadRequest(
                "Project name must be between 1 and 200 characters".to_string(),
            ));
        }
        if new_project.target_trees <= 0 {
            return Err(AppError::BadRequest(
                "Target tree count must be positive".to_string(),
            ));
        }

        if self.projects.find_by_name(&new_project.name).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "Project '{}' already exists",
                new_project.name
            ))));
        }

        Ok(self.projects.create(new_project).await?)
    }

    pub async fn list_projects(&self, limit: i64, offset: i64) -> Result<Vec<Project>, AppError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let offset = offset.max(0);
        Ok(self.projects.find_all(limit, offset).await?)
    }

    pub async fn get_project(&self, id: &ProjectId) -> Result<Project, AppError> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Domain(DomainError::NotFound(format!("project {}", id))))
    }

    pub async fn update_project_status(
        &self,
        id: &ProjectId,
        status: ProjectStatus,
    ) -> Result<Project, AppError> {
        self.get_project(id).await?;
        self.projects.update_status(id, status).await?;
        self.get_project(id).await
    }
}
