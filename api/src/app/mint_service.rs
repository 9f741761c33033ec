//! Mint service
//!
//! Tree lifecycle: brigades validate planted trees, and each validated
//! tree mints exactly one seed token. The chain call is stubbed; what the
//! platform guarantees is the metadata row, the receipt, the ledger
//! credit, and the terminal `minted` status.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::{
    ChainTxKind, NewChainTransaction, NewLedgerEntry, NewNftMetadata, NftMetadata, ProjectId,
    Role, Tree, TreeId, TxKind, User,
};
use crate::domain::ports::{ChainClient, MintRepository, TreeRepository, WalletRepository};
use crate::error::{AppError, DomainError};

const MAX_PAGE_SIZE: i64 = 100;

/// Result of minting a tree's seed token
#[derive(Debug, Clone)]
pub struct MintOutcome {
    pub tree: Tree,
    pub metadata: NftMetadata,
    pub tx_hash: String,
}

/// Service for tree validation and minting
pub struct MintService<TR, WR, MR, CC>
where
    TR: TreeRepository,
    WR: WalletRepository,
    MR: MintRepository,
    CC: ChainClient,
{
    trees: Arc<TR>,
    wallets: Arc<WR>,
    mints: Arc<MR>,
    chain: Arc<CC>,
    token_base_uri: String,
}

impl<TR, WR, MR, CC> MintService<TR, WR, MR, CC>
where
    TR: TreeRepository,
    WR: WalletRepository,
    MR: MintRepository,
    CC: ChainClient,
{
    pub fn new(
        trees: Arc<TR>,
        wallets: Arc<WR>,
        mints: Arc<MR>,
        chain: Arc<CC>,
        token_base_uri: String,
    ) -> Self {
        Self {
            trees,
            wallets,
            mints,
            chain,
            token_base_uri,
        }
    }

    async fn tree_or_404(&self, tree_id: &TreeId) -> Result<Tree, AppError> {
        self.trees
            .find_by_id(tree_id)
            .await?
            .ok_or_else(|| AppError::Domain(DomainError::NotFound(format!("tree {}", tree_id))))
    }

    /// Mark a planted tree validated (field roles only)
    pub async fn validate_tree(&self, actor: &User, tree_id: &TreeId) -> Result<Tree, AppError> {
        if !actor.role.is_field_role() {
            return Err(AppError::Forbidden);
        }

        let tree = self.tree_or_404(tree_id).await?;
        if !tree.status.can_validate() {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "tree {} is {}, only planted trees can be validated",
                tree.id, tree.status
            ))));
        }

        let now = Utc::now();
        self.trees.mark_validated(tree_id, now).await?;

        tracing::info!(tree = %tree_id, by = %actor.id, "Tree validated");

        self.tree_or_404(tree_id).await
    }

    /// Mint the seed token for a validated tree.
    ///
    /// One token per tree: the status check plus the unique metadata row
    /// keep a tree from minting twice.
    pub async fn mint_tree(&self, actor: &User, tree_id: &TreeId) -> Result<MintOutcome, AppError> {
        let tree = self.tree_or_404(tree_id).await?;

        if tree.owner_id != actor.id && actor.role != Role::Admin {
            return Err(AppError::Forbidden);
        }
        if !tree.status.can_mint() {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "tree {} is {}, it must be validated before minting",
                tree.id, tree.status
            ))));
        }

        let wallet = self
            .wallets
            .find_by_user(&tree.owner_id)
            .await?
            .ok_or_else(|| {
                AppError::Domain(DomainError::NotFound(format!(
                    "wallet of user {}",
                    tree.owner_id
                )))
            })?;

        let token_uri = format!("{}/trees/{}", self.token_base_uri, tree.id);
        let receipt = self
            .chain
            .mint_tree_token(&wallet.id, &tree.id, &token_uri)
            .await?;

        let metadata = self
            .mints
            .create_metadata(&NewNftMetadata {
                tree_id: tree.id,
                token_uri,
                name: format!("Canopy Tree {}", tree.id),
                attributes: serde_json::json!({
                    "species_id": tree.species_id.to_string(),
                    "project_id": tree.project_id.to_string(),
                    "planted_at": tree.planted_at.to_rfc3339(),
                }),
            })
            .await?;

        self.mints
            .create_chain_tx(&NewChainTransaction {
                tx_hash: receipt.tx_hash.clone(),
                kind: ChainTxKind::Mint,
                status: receipt.status,
                wallet_id: wallet.id,
                tree_id: Some(tree.id),
            })
            .await?;

        self.wallets
            .apply_seed(&NewLedgerEntry {
                wallet_id: wallet.id,
                kind: TxKind::Credit,
                amount: 1,
                reason: "tree mint".to_string(),
                reference_id: Some(tree.id.0),
            })
            .await?;

        self.trees.mark_minted(&tree.id).await?;

        tracing::info!(tree = %tree.id, tx_hash = %receipt.tx_hash, "Tree minted");

        let tree = self.tree_or_404(tree_id).await?;
        Ok(MintOutcome {
            tree,
            metadata,
            tx_hash: receipt.tx_hash,
        })
    }

    /// A single tree
    pub async fn get_tree(&self, tree_id: &TreeId) -> Result<Tree, AppError> {
        self.tree_or_404(tree_id).await
    }

    /// Mint metadata for a tree, if it has minted
    pub async fn metadata(&self, tree_id: &TreeId) -> Result<Option<NftMetadata>, AppError> {
        Ok(self.mints.find_metadata_by_tree(tree_id).await?)
    }

    /// Trees owned by the actor
    pub async fn my_trees(&self, actor: &User) -> Result<Vec<Tree>, AppError> {
        Ok(self.trees.find_by_owner(&actor.id).await?)
    }

    /// Trees in a project, paginated
    pub async fn project_trees(
        &self,
        project_id: &ProjectId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tree>, AppError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        Ok(self
            .trees
            .find_by_project(project_id, limit, offset.max(0))
            .await?)
    }
}
