//! Tree domain entity
//!
//! Trees move through a one-way lifecycle: planted → validated → minted.
//! Only a validated tree may be minted, and minting is terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::ProjectId;
use super::species::SpeciesId;
use super::user::UserId;

/// Unique identifier for a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeId(pub Uuid);

impl TreeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TreeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TreeId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TreeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tree lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeStatus {
    Planted,
    Validated,
    Minted,
}

impl TreeStatus {
    /// Whether a tree in this status can be validated by a brigade
    pub fn can_validate(&self) -> bool {
        matches!(self, TreeStatus::Planted)
    }

    /// Whether a tree in this status can have its seed token minted
    pub fn can_mint(&self) -> bool {
        matches!(self, TreeStatus::Validated)
    }
}

impl std::fmt::Display for TreeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeStatus::Planted => write!(f, "planted"),
            TreeStatus::Validated => write!(f, "validated"),
            TreeStatus::Minted => write!(f, "minted"),
        }
    }
}

impl std::str::FromStr for TreeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planted" => Ok(TreeStatus::Planted),
            "validated" => Ok(TreeStatus::Validated),
            "minted" => Ok(TreeStatus::Minted),
            _ => Err(format!("Unknown tree status: {}", s)),
        }
    }
}

/// A single planted tree
#[derive(Debug, Clone, Serialize)]
pub struct Tree {
    pub id: TreeId,
    pub species_id: SpeciesId,
    pub project_id: ProjectId,
    pub owner_id: UserId,
    pub status: TreeStatus,
    pub planted_at: DateTime<Utc>,
    pub validated_at: Option<DateTime<Utc>>,
}

/// Data needed to create a tree
#[derive(Debug, Clone)]
pub struct NewTree {
    pub species_id: SpeciesId,
    pub project_id: ProjectId,
    pub owner_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_planted_trees_can_validate() {
        assert!(TreeStatus::Planted.can_validate());
        assert!(!TreeStatus::Validated.can_validate());
        assert!(!TreeStatus::Minted.can_validate());
    }

    #[test]
    fn only_validated_trees_can_mint() {
        assert!(!TreeStatus::Planted.can_mint());
        assert!(TreeStatus::Validated.can_mint());
        assert!(!TreeStatus::Minted.can_mint());
    }

    #[test]
    fn status_parse_roundtrip() {
        for status in [TreeStatus::Planted, TreeStatus::Validated, TreeStatus::Minted] {
            assert_eq!(status.to_string().parse::<TreeStatus>().unwrap(), status);
        }
        assert!("grown".parse::<TreeStatus>().is_err());
    }
}
