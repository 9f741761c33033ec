//! ESG reporting service
//!
//! Roll-ups for users and projects: tree counts per lifecycle status and
//! the estimated CO₂ offset from each tree's species absorption rate,
//! pro-rated by how long it has been in the ground.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::domain::entities::{ProjectId, Species, Tree, TreeStatus, User};
use crate::domain::ports::{TreeRepository, WalletRepository};
use crate::error::{AppError, DomainError};

/// Per-user impact report
#[derive(Debug, Clone, Serialize)]
pub struct UserReport {
    pub trees_planted: i64,
    pub trees_validated: i64,
    pub trees_minted: i64,
    pub co2_offset_kg: f64,
    pub green_balance: i64,
    pub seed_balance: i64,
}

/// Per-project impact report
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub project_id: ProjectId,
    pub total_trees: i64,
    pub trees_planted: i64,
    pub trees_validated: i64,
    pub trees_minted: i64,
    pub co2_offset_kg: f64,
    pub contributors: i64,
}

/// Service for impact reports
pub struct EsgService<TR, WR>
where
    TR: TreeRepository,
    WR: WalletRepository,
{
    trees: Arc<TR>,
    wallets: Arc<WR>,
}

/// Total estimated CO₂ absorbed across trees and their species
fn co2_total_kg(rows: &[(Tree, Species)]) -> f64 {
    let now = Utc::now();
    rows.iter()
        .map(|(tree, species)| species.co2_absorbed_kg(tree.planted_at, now))
        .sum()
}

fn count_status(rows: &[(Tree, Species)], status: TreeStatus) -> i64 {
    rows.iter().filter(|(tree, _)| tree.status == status).count() as i64
}

impl<TR, WR> EsgService<TR, WR>
where
    TR: TreeRepository,
    WR: WalletRepository,
{
    pub fn new(trees: Arc<TR>, wallets: Arc<WR>) -> Self {
        Self { trees, wallets }
    }

    /// Impact report for one user
    pub async fn user_report(&self, user: &User) -> Result<UserReport, AppError> {
        let rows = self.trees.find_with_species_by_owner(&user.id).await?;
        let wallet = self
            .wallets
            .find_by_user(&user.id)
            .await?
            .ok_or_else(|| {
                AppError::Domain(DomainError::NotFound(format!("wallet of user {}", user.id)))
            })?;

        Ok(UserReport {
            trees_planted: rows.len() as i64,
            trees_validated: count_status(&rows, TreeStatus::Validated),
            trees_minted: count_status(&rows, TreeStatus::Minted),
            co2_offset_kg: co2_total_kg(&rows),
            green_balance: wallet.green_balance,
            seed_balance: wallet.seed_balance,
        })
    }

    /// Impact report for one project.
    ///
    /// Counts come from the aggregate SQL path; the CO₂ estimate walks the
    /// species join.
    pub async fn project_report(&self, project_id: &ProjectId) -> Result<ProjectReport, AppError> {
        let counts = self.trees.count_by_status(project_id).await?;
        let rows = self.trees.find_with_species_by_project(project_id).await?;
        let contributors = self.trees.count_distinct_owners(project_id).await?;

        let of = |status: TreeStatus| {
            counts
                .iter()
                .find(|(s, _)| *s == status)
                .map(|(_, n)| *n)
                .unwrap_or(0)
        };

        let planted = of(TreeStatus::Planted);
        let validated = of(TreeStatus::Validated);
        let minted = of(TreeStatus::Minted);

        Ok(ProjectReport {
            project_id: *project_id,
            total_trees: planted + validated + minted,
            trees_planted: planted,
            trees_validated: validated,
            trees_minted: minted,
            co2_offset_kg: co2_total_kg(&rows),
            contributors,
        })
    }
}
