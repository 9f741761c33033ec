//! PostgreSQL adapter for MintRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{
    ChainTransaction, ChainTxKind, ChainTxStatus, NewChainTransaction, NewNftMetadata,
    NftMetadata, TreeId, WalletId,
};
use crate::domain::ports::MintRepository;
use crate::entity::{chain_transactions, nft_metadata};
use crate::error::DomainError;

/// PostgreSQL implementation of MintRepository
pub struct PostgresMintRepository {
    db: DatabaseConnection,
}

impl PostgresMintRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MintRepository for PostgresMintRepository {
    async fn create_metadata(
        &self,
        metadata: &NewNftMetadata,
    ) -> Result<NftMetadata, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();

        let model = nft_metadata::ActiveModel {
            id: Set(id),
            tree_id: Set(metadata.tree_id.0),
            token_uri: Set(metadata.token_uri.clone()),
            name: Set(metadata.name.clone()),
            attributes: Set(metadata.attributes.clone()),
            created_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn find_metadata_by_tree(
        &self,
        tree_id: &TreeId,
    ) -> Result<Option<NftMetadata>, DomainError> {
        let result = nft_metadata::Entity::find()
            .filter(nft_metadata::Column::TreeId.eq(tree_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create_chain_tx(
        &self,
        tx: &NewChainTransaction,
    ) -> Result<ChainTransaction, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();

        let model = chain_transactions::ActiveModel {
            id: Set(id),
            tx_hash: Set(tx.tx_hash.clone()),
            kind: Set(tx.kind.to_string()),
            status: Set(tx.status.to_string()),
            wallet_id: Set(tx.wallet_id.0),
            tree_id: Set(tx.tree_id.map(|t| t.0)),
            created_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn chain_txs_by_wallet(
        &self,
        wallet_id: &WalletId,
    ) -> Result<Vec<ChainTransaction>, DomainError> {
        let results = chain_transactions::Entity::find()
            .filter(chain_transactions::Column::WalletId.eq(wallet_id.0))
            .order_by_desc(chain_transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<nft_metadata::Model> for NftMetadata {
    fn from(model: nft_metadata::Model) -> Self {
        NftMetadata {
            id: model.id,
            tree_id: TreeId(model.tree_id),
            token_uri: model.token_uri,
            name: model.name,
            attributes: model.attributes,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<chain_transactions::Model> for ChainTransaction {
    fn from(model: chain_transactions::Model) -> Self {
        ChainTransaction {
            id: model.id,
            tx_hash: model.tx_hash,
            kind: model.kind.parse().unwrap_or(ChainTxKind::Mint),
            status: model.status.parse().unwrap_or(ChainTxStatus::Submitted),
            wallet_id: WalletId(model.wallet_id),
            tree_id: model.tree_id.map(TreeId),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
