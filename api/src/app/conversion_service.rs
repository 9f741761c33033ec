//! Conversion service
//!
//! Green → Seed conversion at a fixed integer ratio. The ledger moves in
//! one database transaction; the chain mint is a stub call recorded as a
//! receipt afterwards.

use std::sync::Arc;

use crate::domain::entities::{
    seeds_for_green, ChainTxKind, Conversion, NewChainTransaction, NewConversion, User,
};
use crate::domain::ports::{ChainClient, MintRepository, WalletRepository};
use crate::error::{AppError, DomainError};

/// Result of a conversion, with its chain receipt
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub conversion: Conversion,
    pub tx_hash: String,
    pub green_remaining: i64,
}

/// Service for Green → Seed conversions
pub struct ConversionService<WR, MR, CC>
where
    WR: WalletRepository,
    MR: MintRepository,
    CC: ChainClient,
{
    wallets: Arc<WR>,
    mints: Arc<MR>,
    chain: Arc<CC>,
    green_per_seed: i64,
}

impl<WR, MR, CC> ConversionService<WR, MR, CC>
where
    WR: WalletRepository,
    MR: MintRepository,
    CC: ChainClient,
{
    pub fn new(wallets: Arc<WR>, mints: Arc<MR>, chain: Arc<CC>, green_per_seed: i64) -> Self {
        Self {
            wallets,
            mints,
            chain,
            green_per_seed,
        }
    }

    /// Convert `green_amount` Green Tokens into whole Seed Tokens.
    ///
    /// Integer division at the configured ratio; the remainder stays in the
    /// green balance. Converting 250 at 100:1 yields 2 seeds and leaves 50.
    pub async fn convert(&self, user: &User, green_amount: i64) -> Result<ConversionOutcome, AppError> {
        if green_amount <= 0 {
            return Err(AppError::BadRequest(
                "Conversion amount must be positive".to_string(),
            ));
        }

        let (seeds, green_spent) = seeds_for_green(green_amount, self.green_per_seed);
        if seeds == 0 {
            return Err(AppError::BadRequest(format!(
                "At least {} green tokens are needed for one seed token",
                self.green_per_seed
            )));
        }

        let wallet = self
            .wallets
            .find_by_user(&user.id)
            .await?
            .ok_or_else(|| {
                AppError::Domain(DomainError::NotFound(format!("wallet of user {}", user.id)))
            })?;

        if !wallet.can_spend_green(green_spent) {
            return Err(AppError::Domain(DomainError::InsufficientBalance(format!(
                "need {} green, have {}",
                green_spent, wallet.green_balance
            ))));
        }

        // Debit, credit, and conversion row commit together; the repository
        // re-checks the balance under the transaction.
        let conversion = self
            .wallets
            .convert(&NewConversion {
                wallet_id: wallet.id,
                green_spent,
                seeds_minted: seeds,
            })
            .await?;

        let receipt = self
            .chain
            .mint_seed_tokens(&wallet.id, seeds, &format!("conversion {}", conversion.id))
            .await?;

        self.mints
            .create_chain_tx(&NewChainTransaction {
                tx_hash: receipt.tx_hash.clone(),
                kind: ChainTxKind::Mint,
                status: receipt.status,
                wallet_id: wallet.id,
                tree_id: None,
            })
            .await?;

        tracing::info!(
            user = %user.id,
            green_spent,
            seeds,
            tx_hash = %receipt.tx_hash,
            "Converted green tokens to seed tokens"
        );

        Ok(ConversionOutcome {
            conversion,
            tx_hash: receipt.tx_hash,
            green_remaining: wallet.green_balance - green_spent,
        })
    }

    /// Conversion history for a user, newest first
    pub async fn history(&self, user: &User) -> Result<Vec<Conversion>, AppError> {
        let wallet = self
            .wallets
            .find_by_user(&user.id)
            .await?
            .ok_or_else(|| {
                AppError::Domain(DomainError::NotFound(format!("wallet of user {}", user.id)))
            })?;

        Ok(self.wallets.conversions(&wallet.id).await?)
    }
}
