//! PostgreSQL adapter for TreeRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::domain::entities::{
    NewTree, ProjectId, Species, SpeciesId, Tree, TreeId, TreeStatus, UserId,
};
use crate::domain::ports::TreeRepository;
use crate::entity::{species, trees};
use crate::error::DomainError;

/// PostgreSQL implementation of TreeRepository
pub struct PostgresTreeRepository {
    db: DatabaseConnection,
}

impl PostgresTreeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TreeRepository for PostgresTreeRepository {
    async fn find_by_id(&self, id: &TreeId) -> Result<Option<Tree>, DomainError> {
        let result = trees::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Tree>, DomainError> {
        let results = trees::Entity::find()
            .filter(trees::Column::OwnerId.eq(owner_id.0))
            .order_by_desc(trees::Column::PlantedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tree>, DomainError> {
        let results = trees::Entity::find()
            .filter(trees::Column::ProjectId.eq(project_id.0))
            .order_by_desc(trees::Column::PlantedAt)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create_many(&self, new_trees: &[NewTree]) -> Result<Vec<Tree>, DomainError> {
        if new_trees.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let mut created = Vec::with_capacity(new_trees.len());
        let mut models = Vec::with_capacity(new_trees.len());

        for new_tree in new_trees {
            let id = Uuid::new_v4();
            models.push(trees::ActiveModel {
                id: Set(id),
                species_id: Set(new_tree.species_id.0),
                project_id: Set(new_tree.project_id.0),
                owner_id: Set(new_tree.owner_id.0),
                status: Set(TreeStatus::Planted.to_string()),
                planted_at: Set(now.fixed_offset()),
                validated_at: Set(None),
            });
            created.push(Tree {
                id: TreeId(id),
                species_id: new_tree.species_id,
                project_id: new_tree.project_id,
                owner_id: new_tree.owner_id,
                status: TreeStatus::Planted,
                planted_at: now,
                validated_at: None,
            });
        }

        trees::Entity::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(created)
    }

    async fn mark_validated(&self, id: &TreeId, at: DateTime<Utc>) -> Result<(), DomainError> {
        trees::ActiveModel {
            id: Set(id.0),
            status: Set(TreeStatus::Validated.to_string()),
            validated_at: Set(Some(at.fixed_offset())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn mark_minted(&self, id: &TreeId) -> Result<(), DomainError> {
        trees::ActiveModel {
            id: Set(id.0),
            status: Set(TreeStatus::Minted.to_string()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_with_species_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<(Tree, Species)>, DomainError> {
        let results = trees::Entity::find()
            .filter(trees::Column::OwnerId.eq(owner_id.0))
            .find_also_related(species::Entity)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results
            .into_iter()
            .filter_map(|(tree, sp)| sp.map(|sp| (tree.into(), sp.into())))
            .collect())
    }

    async fn find_with_species_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<(Tree, Species)>, DomainError> {
        let results = trees::Entity::find()
            .filter(trees::Column::ProjectId.eq(project_id.0))
            .find_also_related(species::Entity)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results
            .into_iter()
            .filter_map(|(tree, sp)| sp.map(|sp| (tree.into(), sp.into())))
            .collect())
    }

    async fn count_by_status(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<(TreeStatus, i64)>, DomainError> {
        // Aggregate counts go through raw SQL
        let stmt = sea_orm::Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT status, COUNT(*) AS cnt FROM trees WHERE project_id = $1 GROUP BY status",
            [project_id.0.into()],
        );

        let rows = self
            .db
            .query_all(stmt)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut counts = Vec::with_capacity(rows.len());
        for row in rows {
            let status: String = row
                .try_get("", "status")
                .map_err(|e| DomainError::Database(e.to_string()))?;
            let cnt: i64 = row
                .try_get("", "cnt")
                .map_err(|e| DomainError::Database(e.to_string()))?;
            if let Ok(status) = status.parse::<TreeStatus>() {
                counts.push((status, cnt));
            }
        }

        Ok(counts)
    }

    async fn count_distinct_owners(&self, project_id: &ProjectId) -> Result<i64, DomainError> {
        let stmt = sea_orm::Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT COUNT(DISTINCT owner_id) AS cnt FROM trees WHERE project_id = $1",
            [project_id.0.into()],
        );

        let row = self
            .db
            .query_one(stmt)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match row {
            Some(row) => row
                .try_get("", "cnt")
                .map_err(|e| DomainError::Database(e.to_string())),
            None => Ok(0),
        }
    }
}

/// Convert SeaORM model to domain entity
impl From<trees::Model> for Tree {
    fn from(model: trees::Model) -> Self {
        Tree {
            id: TreeId(model.id),
            species_id: SpeciesId(model.species_id),
            project_id: ProjectId(model.project_id),
            owner_id: UserId(model.owner_id),
            status: model.status.parse().unwrap_or(TreeStatus::Planted),
            planted_at: model.planted_at.with_timezone(&Utc),
            validated_at: model.validated_at.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
