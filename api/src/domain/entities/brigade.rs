//! Brigade domain entities
//!
//! A brigade is a field team that plants, inspects, and raises fire alerts.
//! A user owns at most one brigade; the owner is always its lead brigadist.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tree::TreeId;
use super::user::UserId;

/// Unique identifier for a brigade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrigadeId(pub Uuid);

impl BrigadeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BrigadeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BrigadeId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BrigadeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A field team tied to a region
#[derive(Debug, Clone, Serialize)]
pub struct Brigade {
    pub id: BrigadeId,
    pub owner_id: UserId,
    pub name: String,
    pub region: String,
    pub created_at: DateTime<Utc>,
}

/// Data needed to create a brigade
#[derive(Debug, Clone)]
pub struct NewBrigade {
    pub owner_id: UserId,
    pub name: String,
    pub region: String,
}

/// Role of a member inside a brigade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrigadistRole {
    Lead,
    Member,
}

impl std::fmt::Display for BrigadistRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrigadistRole::Lead => write!(f, "lead"),
            BrigadistRole::Member => write!(f, "member"),
        }
    }
}

impl std::str::FromStr for BrigadistRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lead" => Ok(BrigadistRole::Lead),
            "member" => Ok(BrigadistRole::Member),
            _ => Err(format!("Unknown brigadist role: {}", s)),
        }
    }
}

/// Membership of a user in a brigade
#[derive(Debug, Clone, Serialize)]
pub struct Brigadist {
    pub brigade_id: BrigadeId,
    pub user_id: UserId,
    pub role: BrigadistRole,
    pub joined_at: DateTime<Utc>,
}

/// Kind of field action a brigade can log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Planting,
    Inspection,
    FireAlert,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Planting => write!(f, "planting"),
            ActionKind::Inspection => write!(f, "inspection"),
            ActionKind::FireAlert => write!(f, "fire_alert"),
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planting" => Ok(ActionKind::Planting),
            "inspection" => Ok(ActionKind::Inspection),
            "fire_alert" => Ok(ActionKind::FireAlert),
            _ => Err(format!("Unknown action kind: {}", s)),
        }
    }
}

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Build a point, rejecting out-of-range coordinates
    pub fn new(lat: f64, lon: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("Latitude out of range: {}", lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(format!("Longitude out of range: {}", lon));
        }
        Ok(Self { lat, lon })
    }
}

/// A geotagged action logged by a brigadist
#[derive(Debug, Clone, Serialize)]
pub struct BrigadeAction {
    pub id: Uuid,
    pub brigade_id: BrigadeId,
    pub brigadist_id: UserId,
    pub kind: ActionKind,
    pub location: GeoPoint,
    /// Tree this action refers to (inspections and plantings)
    pub tree_id: Option<TreeId>,
    /// URL of the geotagged photo or video evidence
    pub media_url: Option<String>,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// Data for logging a brigade action
#[derive(Debug, Clone)]
pub struct NewBrigadeAction {
    pub brigade_id: BrigadeId,
    pub brigadist_id: UserId,
    pub kind: ActionKind,
    pub location: GeoPoint,
    pub tree_id: Option<TreeId>,
    pub media_url: Option<String>,
    pub note: String,
}

/// Task assignment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Done,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Open => write!(f, "open"),
            TaskStatus::Done => write!(f, "done"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(TaskStatus::Open),
            "done" => Ok(TaskStatus::Done),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

/// Work assigned to a brigade by an admin
#[derive(Debug, Clone, Serialize)]
pub struct BrigadeTask {
    pub id: Uuid,
    pub brigade_id: BrigadeId,
    pub title: String,
    pub detail: String,
    pub due_on: Option<NaiveDate>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

/// Data for assigning a task
#[derive(Debug, Clone)]
pub struct NewBrigadeTask {
    pub brigade_id: BrigadeId,
    pub title: String,
    pub detail: String,
    pub due_on: Option<NaiveDate>,
}
