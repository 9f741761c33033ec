//! Minting domain entities
//!
//! NFT metadata and chain transaction receipts for seed token mints. The
//! chain itself is behind the `ChainClient` port; these rows are what the
//! platform persists about each mint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tree::TreeId;
use super::wallet::WalletId;

/// Metadata describing the token minted for one tree
#[derive(Debug, Clone, Serialize)]
pub struct NftMetadata {
    pub id: Uuid,
    /// One metadata row per tree
    pub tree_id: TreeId,
    pub token_uri: String,
    pub name: String,
    pub attributes: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Data for storing mint metadata
#[derive(Debug, Clone)]
pub struct NewNftMetadata {
    pub tree_id: TreeId,
    pub token_uri: String,
    pub name: String,
    pub attributes: serde_json::Value,
}

/// Kind of chain operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainTxKind {
    Mint,
    Transfer,
}

impl std::fmt::Display for ChainTxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainTxKind::Mint => write!(f, "mint"),
            ChainTxKind::Transfer => write!(f, "transfer"),
        }
    }
}

impl std::str::FromStr for ChainTxKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mint" => Ok(ChainTxKind::Mint),
            "transfer" => Ok(ChainTxKind::Transfer),
            _ => Err(format!("Unknown chain tx kind: {}", s)),
        }
    }
}

/// Chain transaction lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainTxStatus {
    Submitted,
    Confirmed,
}

impl std::fmt::Display for ChainTxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainTxStatus::Submitted => write!(f, "submitted"),
            ChainTxStatus::Confirmed => write!(f, "confirmed"),
        }
    }
}

impl std::str::FromStr for ChainTxStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "submitted" => Ok(ChainTxStatus::Submitted),
            "confirmed" => Ok(ChainTxStatus::Confirmed),
            _ => Err(format!("Unknown chain tx status: {}", s)),
        }
    }
}

/// A recorded chain call
#[derive(Debug, Clone, Serialize)]
pub struct ChainTransaction {
    pub id: Uuid,
    pub tx_hash: String,
    pub kind: ChainTxKind,
    pub status: ChainTxStatus,
    pub wallet_id: WalletId,
    pub tree_id: Option<TreeId>,
    pub created_at: DateTime<Utc>,
}

/// Data for recording a chain call
#[derive(Debug, Clone)]
pub struct NewChainTransaction {
    pub tx_hash: String,
    pub kind: ChainTxKind,
    pub status: ChainTxStatus,
    pub wallet_id: WalletId,
    pub tree_id: Option<TreeId>,
}
