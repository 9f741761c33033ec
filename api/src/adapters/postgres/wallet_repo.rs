//! PostgreSQL adapter for WalletRepository
//!
//! Balance mutations run inside database transactions: the balance update
//! and its ledger row commit together. Debits go through a guarded raw
//! UPDATE (`... AND green_balance >= $1`) so a wallet can never be driven
//! negative, even by concurrent requests.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    Conversion, ConversionId, GreenTransaction, NewConversion, NewLedgerEntry, SeedTransaction,
    TxKind, UserId, Wallet, WalletId,
};
use crate::domain::ports::WalletRepository;
use crate::entity::{conversions, green_transactions, seed_transactions, wallets};
use crate::error::DomainError;

/// PostgreSQL implementation of WalletRepository
pub struct PostgresWalletRepository {
    db: DatabaseConnection,
}

impl PostgresWalletRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Apply a balance change on one wallet column inside `conn`.
///
/// Debits are guarded: zero rows affected means the balance could not
/// cover the amount (or the wallet does not exist).
async fn adjust_balance<C: ConnectionTrait>(
    conn: &C,
    column: &str,
    wallet_id: &WalletId,
    kind: TxKind,
    amount: i64,
) -> Result<(), DomainError> {
    let sql = match kind {
        TxKind::Credit => format!(
            "UPDATE wallets SET {col} = {col} + $1 WHERE id = $2",
            col = column
        ),
        TxKind::Debit => format!(
            "UPDATE wallets SET {col} = {col} - $1 WHERE id = $2 AND {col} >= $1",
            col = column
        ),
    };

    let stmt = sea_orm::Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Postgres,
        &sql,
        [amount.into(), wallet_id.0.into()],
    );

    let result = conn
        .execute(stmt)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    if result.rows_affected() == 0 {
        return match kind {
            TxKind::Debit => Err(DomainError::InsufficientBalance(format!(
                "wallet {} cannot cover {} {}",
                wallet_id, amount, column
            ))),
            TxKind::Credit => Err(DomainError::NotFound(format!("wallet {}", wallet_id))),
        };
    }

    Ok(())
}

fn validate_amount(amount: i64) -> Result<(), DomainError> {
    if amount <= 0 {
        return Err(DomainError::Validation(format!(
            "Ledger amounts must be positive, got {}",
            amount
        )));
    }
    Ok(())
}

#[async_trait]
impl WalletRepository for PostgresWalletRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Wallet>, DomainError> {
        let result = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, user_id: &UserId) -> Result<Wallet, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();

        let model = wallets::ActiveModel {
            id: Set(id),
            user_id: Set(user_id.0),
            green_balance: Set(0),
            seed_balance: Set(0),
            created_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn apply_green(
        &self,
        entry: &NewLedgerEntry,
    ) -> Result<GreenTransaction, DomainError> {
        validate_amount(entry.amount)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        adjust_balance(&txn, "green_balance", &entry.wallet_id, entry.kind, entry.amount).await?;

        let id = Uuid::new_v4();
        let now = Utc::now();
        green_transactions::ActiveModel {
            id: Set(id),
            wallet_id: Set(entry.wallet_id.0),
            kind: Set(entry.kind.to_string()),
            amount: Set(entry.amount),
            reason: Set(entry.reason.clone()),
            reference_id: Set(entry.reference_id),
            created_at: Set(now.fixed_offset()),
        }
        .insert(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(GreenTransaction {
            id,
            wallet_id: entry.wallet_id,
            kind: entry.kind,
            amount: entry.amount,
            reason: entry.reason.clone(),
            reference_id: entry.reference_id,
            created_at: now,
        })
    }

    async fn apply_seed(&self, entry: &NewLedgerEntry) -> Result<SeedTransaction, DomainError> {
        validate_amount(entry.amount)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        adjust_balance(&txn, "seed_balance", &entry.wallet_id, entry.kind, entry.amount).await?;

        let id = Uuid::new_v4();
        let now = Utc::now();
        seed_transactions::ActiveModel {
            id: Set(id),
            wallet_id: Set(entry.wallet_id.0),
            kind: Set(entry.kind.to_string()),
            amount: Set(entry.amount),
            reason: Set(entry.reason.clone()),
            reference_id: Set(entry.reference_id),
            created_at: Set(now.fixed_offset()),
        }
        .insert(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(SeedTransaction {
            id,
            wallet_id: entry.wallet_id,
            kind: entry.kind,
            amount: entry.amount,
            reason: entry.reason.clone(),
            reference_id: entry.reference_id,
            created_at: now,
        })
    }

    async fn convert(&self, conversion: &NewConversion) -> Result<Conversion, DomainError> {
        validate_amount(conversion.green_spent)?;
        validate_amount(conversion.seeds_minted)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        adjust_balance(
            &txn,
            "green_balance",
            &conversion.wallet_id,
            TxKind::Debit,
            conversion.green_spent,
        )
        .await?;
        adjust_balance(
            &txn,
            "seed_balance",
            &conversion.wallet_id,
            TxKind::Credit,
            conversion.seeds_minted,
        )
        .await?;

        let conversion_id = Uuid::new_v4();
        let now = Utc::now();

        green_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            wallet_id: Set(conversion.wallet_id.0),
            kind: Set(TxKind::Debit.to_string()),
            amount: Set(conversion.green_spent),
            reason: Set("conversion".to_string()),
            reference_id: Set(Some(conversion_id)),
            created_at: Set(now.fixed_offset()),
        }
        .insert(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        seed_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            wallet_id: Set(conversion.wallet_id.0),
            kind: Set(TxKind::Credit.to_string()),
            amount: Set(conversion.seeds_minted),
            reason: Set("conversion".to_string()),
            reference_id: Set(Some(conversion_id)),
            created_at: Set(now.fixed_offset()),
        }
        .insert(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        conversions::ActiveModel {
            id: Set(conversion_id),
            wallet_id: Set(conversion.wallet_id.0),
            green_spent: Set(conversion.green_spent),
            seeds_minted: Set(conversion.seeds_minted),
            created_at: Set(now.fixed_offset()),
        }
        .insert(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(Conversion {
            id: ConversionId(conversion_id),
            wallet_id: conversion.wallet_id,
            green_spent: conversion.green_spent,
            seeds_minted: conversion.seeds_minted,
            created_at: now,
        })
    }

    async fn green_history(
        &self,
        wallet_id: &WalletId,
        limit: i64,
    ) -> Result<Vec<GreenTransaction>, DomainError> {
        let results = green_transactions::Entity::find()
            .filter(green_transactions::Column::WalletId.eq(wallet_id.0))
            .order_by_desc(green_transactions::Column::CreatedAt)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn seed_history(
        &self,
        wallet_id: &WalletId,
        limit: i64,
    ) -> Result<Vec<SeedTransaction>, DomainError> {
        let results = seed_transactions::Entity::find()
            .filter(seed_transactions::Column::WalletId.eq(wallet_id.0))
            .order_by_desc(seed_transactions::Column::CreatedAt)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn conversions(&self, wallet_id: &WalletId) -> Result<Vec<Conversion>, DomainError> {
        let results = conversions::Entity::find()
            .filter(conversions::Column::WalletId.eq(wallet_id.0))
            .order_by_desc(conversions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<wallets::Model> for Wallet {
    fn from(model: wallets::Model) -> Self {
        Wallet {
            id: WalletId(model.id),
            user_id: UserId(model.user_id),
            green_balance: model.green_balance,
            seed_balance: model.seed_balance,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<green_transactions::Model> for GreenTransaction {
    fn from(model: green_transactions::Model) -> Self {
        GreenTransaction {
            id: model.id,
            wallet_id: WalletId(model.wallet_id),
            kind: model.kind.parse().unwrap_or(TxKind::Credit),
            amount: model.amount,
            reason: model.reason,
            reference_id: model.reference_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<seed_transactions::Model> for SeedTransaction {
    fn from(model: seed_transactions::Model) -> Self {
        SeedTransaction {
            id: model.id,
            wallet_id: WalletId(model.wallet_id),
            kind: model.kind.parse().unwrap_or(TxKind::Credit),
            amount: model.amount,
            reason: model.reason,
            reference_id: model.reference_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<conversions::Model> for Conversion {
    fn from(model: conversions::Model) -> Self {
        Conversion {
            id: ConversionId(model.id),
            wallet_id: WalletId(model.wallet_id),
            green_spent: model.green_spent,
            seeds_minted: model.seeds_minted,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
