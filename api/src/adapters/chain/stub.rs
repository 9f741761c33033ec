//! Stub blockchain client
//!
//! Seed tokens are nominally on-chain; until the chain integration is
//! deployed this stub fabricates receipts locally. Hashes are derived from
//! the call inputs plus a random nonce so they look like real tx hashes
//! and never collide across retries.

use async_trait::async_trait;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::domain::entities::{ChainTxStatus, TreeId, WalletId};
use crate::domain::ports::{ChainClient, ChainReceipt};
use crate::error::ChainError;

/// Chain client that fabricates receipts without touching a chain
pub struct StubChainClient;

impl StubChainClient {
    fn fake_tx_hash(parts: &[&str]) -> String {
        let mut rng = rand::thread_rng();
        let nonce: [u8; 8] = rng.gen();

        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part.as_bytes());
        }
        hasher.update(nonce);
        format!("0x{}", hex::encode(hasher.finalize()))
    }
}

#[async_trait]
impl ChainClient for StubChainClient {
    async fn mint_tree_token(
        &self,
        wallet_id: &WalletId,
        tree_id: &TreeId,
        token_uri: &str,
    ) -> Result<ChainReceipt, ChainError> {
        let wallet = wallet_id.to_string();
        let tree = tree_id.to_string();
        let tx_hash = Self::fake_tx_hash(&[&wallet, &tree, token_uri]);

        tracing::debug!(%wallet_id, %tree_id, %tx_hash, "Stub mint of tree token");

        Ok(ChainReceipt {
            tx_hash,
            status: ChainTxStatus::Confirmed,
        })
    }

    async fn mint_seed_tokens(
        &self,
        wallet_id: &WalletId,
        amount: i64,
        memo: &str,
    ) -> Result<ChainReceipt, ChainError> {
        let wallet = wallet_id.to_string();
        let amount_str = amount.to_string();
        let tx_hash = Self::fake_tx_hash(&[&wallet, &amount_str, memo]);

        tracing::debug!(%wallet_id, amount, %tx_hash, "Stub mint of seed tokens");

        Ok(ChainReceipt {
            tx_hash,
            status: ChainTxStatus::Confirmed,
        })
    }
}
