//! Blockchain client port
//!
//! The platform's seed tokens are nominally backed by on-chain mint calls.
//! This trait is the seam; the current adapter is a deterministic stub and
//! the on-chain event listener is out of scope.

use async_trait::async_trait;

use crate::domain::entities::{ChainTxStatus, TreeId, WalletId};
use crate::error::ChainError;

/// Receipt returned by a chain call
#[derive(Debug, Clone)]
pub struct ChainReceipt {
    pub tx_hash: String,
    pub status: ChainTxStatus,
}

/// Client for the token chain
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Mint the NFT-backed seed token for one validated tree
    async fn mint_tree_token(
        &self,
        wallet_id: &WalletId,
        tree_id: &TreeId,
        token_uri: &str,
    ) -> Result<ChainReceipt, ChainError>;

    /// Mint fungible seed tokens (conversions)
    async fn mint_seed_tokens(
        &self,
        wallet_id: &WalletId,
        amount: i64,
        memo: &str,
    ) -> Result<ChainReceipt, ChainError>;
}
