//! PostgreSQL adapter for BrigadeRepository
//!
//! Action inserts and radius lookups go through raw SQL so the PostGIS
//! `location geography(Point, 4326)` column stays in sync with the plain
//! lat/lon columns.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    ActionKind, Brigade, BrigadeAction, BrigadeId, BrigadeTask, Brigadist, BrigadistRole,
    GeoPoint, NewBrigade, NewBrigadeAction, NewBrigadeTask, TaskStatus, TreeId, UserId,
};
use crate::domain::ports::BrigadeRepository;
use crate::entity::{brigade_actions, brigade_tasks, brigades, brigadists};
use crate::error::DomainError;

/// PostgreSQL implementation of BrigadeRepository
pub struct PostgresBrigadeRepository {
    db: DatabaseConnection,
}

impl PostgresBrigadeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn action_from_row(row: &sea_orm::QueryResult) -> Result<BrigadeAction, DomainError> {
    let db_err = |e: sea_orm::DbErr| DomainError::Database(e.to_string());

    let kind: String = row.try_get("", "kind").map_err(db_err)?;
    let lat: f64 = row.try_get("", "lat").map_err(db_err)?;
    let lon: f64 = row.try_get("", "lon").map_err(db_err)?;
    let created_at: DateTime<FixedOffset> = row.try_get("", "created_at").map_err(db_err)?;

    Ok(BrigadeAction {
        id: row.try_get("", "id").map_err(db_err)?,
        brigade_id: BrigadeId(row.try_get("", "brigade_id").map_err(db_err)?),
        brigadist_id: UserId(row.try_get("", "brigadist_id").map_err(db_err)?),
        kind: kind
            .parse()
            .map_err(|e: String| DomainError::Database(e))?,
        location: GeoPoint { lat, lon },
        tree_id: row
            .try_get::<Option<Uuid>>("", "tree_id")
            .map_err(db_err)?
            .map(TreeId),
        media_url: row.try_get("", "media_url").map_err(db_err)?,
        note: row.try_get("", "note").map_err(db_err)?,
        created_at: created_at.with_timezone(&Utc),
    })
}

#[async_trait]
impl BrigadeRepository for PostgresBrigadeRepository {
    async fn find_by_id(&self, id: &BrigadeId) -> Result<Option<Brigade>, DomainError> {
        let result = brigades::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Option<Brigade>, DomainError> {
        let result = brigades::Entity::find()
            .filter(brigades::Column::OwnerId.eq(owner_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_member(&self, user_id: &UserId) -> Result<Option<Brigade>, DomainError> {
        let membership = brigadists::Entity::find()
            .filter(brigadists::Column::UserId.eq(user_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match membership {
            Some(m) => self.find_by_id(&BrigadeId(m.brigade_id)).await,
            None => Ok(None),
        }
    }

    async fn create(&self, brigade: &NewBrigade) -> Result<Brigade, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();

        // Brigade and its lead membership commit together
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let created = brigades::ActiveModel {
            id: Set(id),
            owner_id: Set(brigade.owner_id.0),
            name: Set(brigade.name.clone()),
            region: Set(brigade.region.clone()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        brigadists::ActiveModel {
            brigade_id: Set(id),
            user_id: Set(brigade.owner_id.0),
            role: Set(BrigadistRole::Lead.to_string()),
            joined_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(created.into())
    }

    async fn add_member(
        &self,
        brigade_id: &BrigadeId,
        user_id: &UserId,
        role: BrigadistRole,
    ) -> Result<Brigadist, DomainError> {
        let now = Utc::now().fixed_offset();

        let result = brigadists::ActiveModel {
            brigade_id: Set(brigade_id.0),
            user_id: Set(user_id.0),
            role: Set(role.to_string()),
            joined_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn is_member(
        &self,
        brigade_id: &BrigadeId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        let result = brigadists::Entity::find_by_id((brigade_id.0, user_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.is_some())
    }

    async fn members(&self, brigade_id: &BrigadeId) -> Result<Vec<Brigadist>, DomainError> {
        let results = brigadists::Entity::find()
            .filter(brigadists::Column::BrigadeId.eq(brigade_id.0))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create_action(
        &self,
        action: &NewBrigadeAction,
    ) -> Result<BrigadeAction, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let stmt = sea_orm::Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "INSERT INTO brigade_actions \
             (id, brigade_id, brigadist_id, kind, lat, lon, location, tree_id, media_url, note, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, \
             ST_SetSRID(ST_MakePoint($6, $5), 4326)::geography, $7, $8, $9, $10)",
            [
                id.into(),
                action.brigade_id.0.into(),
                action.brigadist_id.0.into(),
                action.kind.to_string().into(),
                action.location.lat.into(),
                action.location.lon.into(),
                action.tree_id.map(|t| t.0).into(),
                action.media_url.clone().into(),
                action.note.clone().into(),
                now.fixed_offset().into(),
            ],
        );

        self.db
            .execute(stmt)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(BrigadeAction {
            id,
            brigade_id: action.brigade_id,
            brigadist_id: action.brigadist_id,
            kind: action.kind,
            location: action.location,
            tree_id: action.tree_id,
            media_url: action.media_url.clone(),
            note: action.note.clone(),
            created_at: now,
        })
    }

    async fn actions(
        &self,
        brigade_id: &BrigadeId,
        kind: Option<ActionKind>,
        limit: i64,
    ) -> Result<Vec<BrigadeAction>, DomainError> {
        let mut query = brigade_actions::Entity::find()
            .filter(brigade_actions::Column::BrigadeId.eq(brigade_id.0));

        if let Some(kind) = kind {
            query = query.filter(brigade_actions::Column::Kind.eq(kind.to_string()));
        }

        let results = query
            .order_by_desc(brigade_actions::Column::CreatedAt)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn actions_near(
        &self,
        center: GeoPoint,
        radius_m: f64,
        limit: i64,
    ) -> Result<Vec<BrigadeAction>, DomainError> {
        let stmt = sea_orm::Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT id, brigade_id, brigadist_id, kind, lat, lon, tree_id, media_url, note, created_at \
             FROM brigade_actions \
             WHERE ST_DWithin(location, ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography, $3) \
             ORDER BY created_at DESC LIMIT $4",
            [
                center.lon.into(),
                center.lat.into(),
                radius_m.into(),
                limit.into(),
            ],
        );

        let rows = self
            .db
            .query_all(stmt)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        rows.iter().map(action_from_row).collect()
    }

    async fn create_task(&self, task: &NewBrigadeTask) -> Result<BrigadeTask, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();

        let result = brigade_tasks::ActiveModel {
            id: Set(id),
            brigade_id: Set(task.brigade_id.0),
            title: Set(task.title.clone()),
            detail: Set(task.detail.clone()),
            due_on: Set(task.due_on),
            status: Set(TaskStatus::Open.to_string()),
            created_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn tasks(&self, brigade_id: &BrigadeId) -> Result<Vec<BrigadeTask>, DomainError> {
        let results = brigade_tasks::Entity::find()
            .filter(brigade_tasks::Column::BrigadeId.eq(brigade_id.0))
            .order_by_desc(brigade_tasks::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_task(&self, task_id: &Uuid) -> Result<Option<BrigadeTask>, DomainError> {
        let result = brigade_tasks::Entity::find_by_id(*task_id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn complete_task(&self, task_id: &Uuid) -> Result<(), DomainError> {
        brigade_tasks::ActiveModel {
            id: Set(*task_id),
            status: Set(TaskStatus::Done.to_string()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<brigades::Model> for Brigade {
    fn from(model: brigades::Model) -> Self {
        Brigade {
            id: BrigadeId(model.id),
            owner_id: UserId(model.owner_id),
            name: model.name,
            region: model.region,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<brigadists::Model> for Brigadist {
    fn from(model: brigadists::Model) -> Self {
        Brigadist {
            brigade_id: BrigadeId(model.brigade_id),
            user_id: UserId(model.user_id),
            role: model.role.parse().unwrap_or(BrigadistRole::Member),
            joined_at: model.joined_at.with_timezone(&Utc),
        }
    }
}

impl From<brigade_actions::Model> for BrigadeAction {
    fn from(model: brigade_actions::Model) -> Self {
        BrigadeAction {
            id: model.id,
            brigade_id: BrigadeId(model.brigade_id),
            brigadist_id: UserId(model.brigadist_id),
            kind: model.kind.parse().unwrap_or(ActionKind::Inspection),
            location: GeoPoint {
                lat: model.lat,
                lon: model.lon,
            },
            tree_id: model.tree_id.map(TreeId),
            media_url: model.media_url,
            note: model.note,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<brigade_tasks::Model> for BrigadeTask {
    fn from(model: brigade_tasks::Model) -> Self {
        BrigadeTask {
            id: model.id,
            brigade_id: BrigadeId(model.brigade_id),
            title: model.title,
            detail: model.detail,
            due_on: model.due_on,
            status: model.status.parse().unwrap_or(TaskStatus::Open),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
