//! Brigade service
//!
//! Field teams: creation (one per owning user), membership, geotagged
//! planting/inspection/fire-alert actions, and admin-assigned tasks.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::entities::{
    ActionKind, Brigade, BrigadeAction, BrigadeId, BrigadeTask, Brigadist, BrigadistRole,
    GeoPoint, NewBrigade, NewBrigadeAction, NewBrigadeTask, Role, TaskStatus, TreeId, User,
};
use crate::domain::ports::{BrigadeRepository, TreeRepository, UserRepository};
use crate::error::{AppError, DomainError};

const MAX_ACTION_LIMIT: i64 = 100;
const DEFAULT_ACTION_LIMIT: i64 = 50;
const MAX_RADIUS_M: f64 = 50_000.0;
const MAX_NOTE_LEN: usize = 1000;

/// Service for brigades and field work
pub struct BrigadeService<BR, UR, TR>
where
    BR: BrigadeRepository,
    UR: UserRepository,
    TR: TreeRepository,
{
    brigades: Arc<BR>,
    users: Arc<UR>,
    trees: Arc<TR>,
}

impl<BR, UR, TR> BrigadeService<BR, UR, TR>
where
    BR: BrigadeRepository,
    UR: UserRepository,
    TR: TreeRepository,
{
    pub fn new(brigades: Arc<BR>, users: Arc<UR>, trees: Arc<TR>) -> Self {
        Self {
            brigades,
            users,
            trees,
        }
    }

    async fn brigade_or_404(&self, id: &BrigadeId) -> Result<Brigade, AppError> {
        self.brigades
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Domain(DomainError::NotFound(format!("brigade {}", id))))
    }

    /// Create a brigade; a user owns at most one
    pub async fn create_brigade(
        &self,
        owner: &User,
        name: &str,
        region: &str,
    ) -> Result<Brigade, AppError> {
        if name.is_empty() || name.len() > 100 {
            return Err(AppError::BadRequest(
                "Brigade name must be between 1 and 100 characters".to_string(),
            ));
        }

        if self.brigades.find_by_owner(&owner.id).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "user {} already owns a brigade",
                owner.id
            ))));
        }
        // A user belongs to at most one brigade
        if self.brigades.find_by_member(&owner.id).await?.is_some() {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "user {} already belongs to a brigade",
                owner.id
            ))));
        }

        let brigade = self
            .brigades
            .create(&NewBrigade {
                owner_id: owner.id,
                name: name.to_string(),
                region: region.to_string(),
            })
            .await?;

        tracing::info!(brigade = %brigade.id, owner = %owner.id, "Brigade created");

        Ok(brigade)
    }

    /// The brigade the actor belongs to, if any
    pub async fn my_brigade(&self, actor: &User) -> Result<Option<Brigade>, AppError> {
        Ok(self.brigades.find_by_member(&actor.id).await?)
    }

    /// A brigade by id
    pub async fn get_brigade(&self, id: &BrigadeId) -> Result<Brigade, AppError> {
        self.brigade_or_404(id).await
    }

    /// Members of a brigade
    pub async fn members(&self, id: &BrigadeId) -> Result<Vec<Brigadist>, AppError> {
        self.brigade_or_404(id).await?;
        Ok(self.brigades.members(id).await?)
    }

    /// Add a member by email (brigade owner or admin only)
    pub async fn add_member(
        &self,
        actor: &User,
        brigade_id: &BrigadeId,
        email: &str,
    ) -> Result<Brigadist, AppError> {
        let brigade = self.brigade_or_404(brigade_id).await?;

        if brigade.owner_id != actor.id && actor.role != Role::Admin {
            return Err(AppError::Forbidden);
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Domain(DomainError::NotFound(format!("user {}", email))))?;

        if self.brigades.is_member(brigade_id, &user.id).await? {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "user {} is already a member",
                user.id
            ))));
        }
        if self.brigades.find_by_member(&user.id).await?.is_some() {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "user {} already belongs to another brigade",
                user.id
            ))));
        }

        Ok(self
            .brigades
            .add_member(brigade_id, &user.id, BrigadistRole::Member)
            .await?)
    }

    /// Log a geotagged field action (members only)
    #[allow(clippy::too_many_arguments)]
    pub async fn log_action(
        &self,
        actor: &User,
        brigade_id: &BrigadeId,
        kind: ActionKind,
        lat: f64,
        lon: f64,
        tree_id: Option<TreeId>,
        media_url: Option<String>,
        note: &str,
    ) -> Result<BrigadeAction, AppError> {
        self.brigade_or_404(brigade_id).await?;

        if !self.brigades.is_member(brigade_id, &actor.id).await? {
            return Err(AppError::Forbidden);
        }

        let location =
            GeoPoint::new(lat, lon).map_err(AppError::BadRequest)?;

        if note.len() > MAX_NOTE_LEN {
            return Err(AppError::BadRequest(format!(
                "Note exceeds {} characters",
                MAX_NOTE_LEN
            )));
        }
        if let Some(url) = &media_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AppError::BadRequest(format!("Invalid media URL: {}", url)));
            }
        }
        if let Some(tree_id) = &tree_id {
            self.trees.find_by_id(tree_id).await?.ok_or_else(|| {
                AppError::Domain(DomainError::NotFound(format!("tree {}", tree_id)))
            })?;
        }

        let action = self
            .brigades
            .create_action(&NewBrigadeAction {
                brigade_id: *brigade_id,
                brigadist_id: actor.id,
                kind,
                location,
                tree_id,
                media_url,
                note: note.to_string(),
            })
            .await?;

        if kind == ActionKind::FireAlert {
            tracing::warn!(
                brigade = %brigade_id,
                lat,
                lon,
                "Fire alert logged"
            );
        }

        Ok(action)
    }

    /// A brigade's actions, optionally filtered by kind
    pub async fn actions(
        &self,
        brigade_id: &BrigadeId,
        kind: Option<ActionKind>,
        limit: Option<i64>,
    ) -> Result<Vec<BrigadeAction>, AppError> {
        self.brigade_or_404(brigade_id).await?;

        let limit = limit.unwrap_or(DEFAULT_ACTION_LIMIT).clamp(1, MAX_ACTION_LIMIT);
        Ok(self.brigades.actions(brigade_id, kind, limit).await?)
    }

    /// Actions within a radius of a point, across brigades
    pub async fn actions_near(
        &self,
        lat: f64,
        lon: f64,
        radius_m: f64,
    ) -> Result<Vec<BrigadeAction>, AppError> {
        let center = GeoPoint::new(lat, lon).map_err(AppError::BadRequest)?;

        if radius_m <= 0.0 || radius_m > MAX_RADIUS_M {
            return Err(AppError::BadRequest(format!(
                "Radius must be between 0 and {} meters",
                MAX_RADIUS_M
            )));
        }

        Ok(self
            .brigades
            .actions_near(center, radius_m, DEFAULT_ACTION_LIMIT)
            .await?)
    }

    /// Assign a task to a brigade (admin route)
    pub async fn assign_task(
        &self,
        brigade_id: &BrigadeId,
        title: &str,
        detail: &str,
        due_on: Option<NaiveDate>,
    ) -> Result<BrigadeTask, AppError> {
        self.brigade_or_404(brigade_id).await?;

        if title.is_empty() || title.len() > 200 {
            return Err(AppError::BadRequest(
                "Task title must be between 1 and 200 characters".to_string(),
            ));
        }

        Ok(self
            .brigades
            .create_task(&NewBrigadeTask {
                brigade_id: *brigade_id,
                title: title.to_string(),
                detail: detail.to_string(),
                due_on,
            })
            .await?)
    }

    /// Tasks of a brigade (members and admins)
    pub async fn tasks(
        &self,
        actor: &User,
        brigade_id: &BrigadeId,
    ) -> Result<Vec<BrigadeTask>, AppError> {
        self.brigade_or_404(brigade_id).await?;

        if actor.role != Role::Admin && !self.brigades.is_member(brigade_id, &actor.id).await? {
            return Err(AppError::Forbidden);
        }

        Ok(self.brigades.tasks(brigade_id).await?)
    }

    /// Mark a task done (members of the owning brigade, or admins)
    pub async fn complete_task(&self, actor: &User, task_id: &Uuid) -> Result<BrigadeTask, AppError> {
        let task = self
            .brigades
            .find_task(task_id)
            .await?
            .ok_or_else(|| AppError::Domain(DomainError::NotFound(format!("task {}", task_id))))?;

        if actor.role != Role::Admin
            && !self.brigades.is_member(&task.brigade_id, &actor.id).await?
        {
            return Err(AppError::Forbidden);
        }
        if task.status == TaskStatus::Done {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "task {} is already done",
                task_id
            ))));
        }

        self.brigades.complete_task(task_id).await?;

        self.brigades
            .find_task(task_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("task {} vanished", task_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        test_brigadist, test_user, InMemoryBrigadeRepository, InMemoryTreeRepository,
        InMemoryUserRepository,
    };

    fn create_service(
        users: InMemoryUserRepository,
    ) -> BrigadeService<InMemoryBrigadeRepository, InMemoryUserRepository, InMemoryTreeRepository>
    {
        BrigadeService::new(
            Arc::new(InMemoryBrigadeRepository::new()),
            Arc::new(users),
            Arc::new(InMemoryTreeRepository::new()),
        )
    }

    #[tokio::test]
    async fn create_brigade_makes_owner_a_lead() {
        let owner = test_brigadist();
        let service = create_service(InMemoryUserRepository::new().with_user(owner.clone()));

        let brigade = service
            .create_brigade(&owner, "Brigada Verde", "Beni")
            .await
            .unwrap();

        let members = service.members(&brigade.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, owner.id);
        assert_eq!(members[0].role, BrigadistRole::Lead);
    }

    #[tokio::test]
    async fn one_brigade_per_owner() {
        let owner = test_brigadist();
        let service = create_service(InMemoryUserRepository::new().with_user(owner.clone()));

        service
            .create_brigade(&owner, "Brigada Verde", "Beni")
            .await
            .unwrap();

        let result = service.create_brigade(&owner, "Second Brigade", "Pando").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn add_member_by_email() {
        let owner = test_brigadist();
        let member = test_user();
        let service = create_service(
            InMemoryUserRepository::new()
                .with_user(owner.clone())
                .with_user(member.clone()),
        );

        let brigade = service
            .create_brigade(&owner, "Brigada Verde", "Beni")
            .await
            .unwrap();

        let added = service
            .add_member(&owner, &brigade.id, &member.email)
            .await
            .unwrap();

        assert_eq!(added.role, BrigadistRole::Member);
        assert_eq!(service.members(&brigade.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn only_owner_or_admin_adds_members() {
        let owner = test_brigadist();
        let stranger = test_user();
        let service = create_service(
            InMemoryUserRepository::new()
                .with_user(owner.clone())
                .with_user(stranger.clone()),
        );

        let brigade = service
            .create_brigade(&owner, "Brigada Verde", "Beni")
            .await
            .unwrap();

        let result = service
            .add_member(&stranger, &brigade.id, &stranger.email)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn non_members_cannot_log_actions() {
        let owner = test_brigadist();
        let stranger = test_user();
        let service = create_service(
            InMemoryUserRepository::new()
                .with_user(owner.clone())
                .with_user(stranger.clone()),
        );

        let brigade = service
            .create_brigade(&owner, "Brigada Verde", "Beni")
            .await
            .unwrap();

        let result = service
            .log_action(
                &stranger,
                &brigade.id,
                ActionKind::Planting,
                -16.5,
                -64.9,
                None,
                None,
                "planted 12 saplings",
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn log_action_rejects_bad_coordinates() {
        let owner = test_brigadist();
        let service = create_service(InMemoryUserRepository::new().with_user(owner.clone()));
        let brigade = service
            .create_brigade(&owner, "Brigada Verde", "Beni")
            .await
            .unwrap();

        let result = service
            .log_action(
                &owner,
                &brigade.id,
                ActionKind::Inspection,
                123.0,
                -64.9,
                None,
                None,
                "",
            )
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn actions_filter_by_kind() {
        let owner = test_brigadist();
        let service = create_service(InMemoryUserRepository::new().with_user(owner.clone()));
        let brigade = service
            .create_brigade(&owner, "Brigada Verde", "Beni")
            .await
            .unwrap();

        service
            .log_action(&owner, &brigade.id, ActionKind::Planting, -16.5, -64.9, None, None, "")
            .await
            .unwrap();
        service
            .log_action(&owner, &brigade.id, ActionKind::FireAlert, -16.6, -64.8, None, None, "smoke NE")
            .await
            .unwrap();

        let fires = service
            .actions(&brigade.id, Some(ActionKind::FireAlert), None)
            .await
            .unwrap();

        assert_eq!(fires.len(), 1);
        assert_eq!(fires[0].kind, ActionKind::FireAlert);

        let all = service.actions(&brigade.id, None, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn tasks_complete_once() {
        let owner = test_brigadist();
        let service = create_service(InMemoryUserRepository::new().with_user(owner.clone()));
        let brigade = service
            .create_brigade(&owner, "Brigada Verde", "Beni")
            .await
            .unwrap();

        let task = service
            .assign_task(&brigade.id, "Inspect north slope", "", None)
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Open);

        let done = service.complete_task(&owner, &task.id).await.unwrap();
        assert_eq!(done.status, TaskStatus::Done);

        let again = service.complete_task(&owner, &task.id).await;
        assert!(again.is_err());
    }

    #[tokio::test]
    async fn actions_near_rejects_bad_radius() {
        let owner = test_brigadist();
        let service = create_service(InMemoryUserRepository::new().with_user(owner.clone()));

        assert!(service.actions_near(-16.5, -64.9, 0.0).await.is_err());
        assert!(service.actions_near(-16.5, -64.9, 60_000.0).await.is_err());
    }
}
