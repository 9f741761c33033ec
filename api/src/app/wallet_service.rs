//! Wallet service
//!
//! Read side of the token ledger plus admin grants. All mutations go
//! through the repository's guarded, transactional ledger operations.

use std::sync::Arc;

use crate::domain::entities::{
    GreenTransaction, NewLedgerEntry, SeedTransaction, TxKind, User, UserId, Wallet,
};
use crate::domain::ports::{UserRepository, WalletRepository};
use crate::error::{AppError, DomainError};

const HISTORY_LIMIT: i64 = 20;

/// Balances with recent ledger entries
#[derive(Debug, Clone)]
pub struct WalletOverview {
    pub wallet: Wallet,
    pub green_history: Vec<GreenTransaction>,
    pub seed_history: Vec<SeedTransaction>,
}

/// Service for wallets and the token ledgers
pub struct WalletService<WR, UR>
where
    WR: WalletRepository,
    UR: UserRepository,
{
    wallets: Arc<WR>,
    users: Arc<UR>,
}

impl<WR, UR> WalletService<WR, UR>
where
    WR: WalletRepository,
    UR: UserRepository,
{
    pub fn new(wallets: Arc<WR>, users: Arc<UR>) -> Self {
        Self { wallets, users }
    }

    /// A user's wallet, failing if it is missing
    pub async fn wallet_of(&self, user_id: &UserId) -> Result<Wallet, AppError> {
        self.wallets
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| {
                AppError::Domain(DomainError::NotFound(format!("wallet of user {}", user_id)))
            })
    }

    /// Balances plus recent ledger entries
    pub async fn overview(&self, user: &User) -> Result<WalletOverview, AppError> {
        let wallet = self.wallet_of(&user.id).await?;
        let green_history = self.wallets.green_history(&wallet.id, HISTORY_LIMIT).await?;
        let seed_history = self.wallets.seed_history(&wallet.id, HISTORY_LIMIT).await?;

        Ok(WalletOverview {
            wallet,
            green_history,
            seed_history,
        })
    }

    /// Admin grant of green tokens to a user, identified by email
    pub async fn grant_green(
        &self,
        email: &str,
        amount: i64,
        reason: &str,
    ) -> Result<GreenTransaction, AppError> {
        if amount <= 0 {
            return Err(AppError::BadRequest(
                "Grant amount must be positive".to_string(),
            ));
        }
        if reason.is_empty() {
            return Err(AppError::BadRequest(
                "Grants must carry a reason".to_string(),
            ));
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Domain(DomainError::NotFound(format!("user {}", email))))?;

        let wallet = self.wallet_of(&user.id).await?;

        let entry = NewLedgerEntry {
            wallet_id: wallet.id,
            kind: TxKind::Credit,
            amount,
            reason: format!("admin grant: {}", reason),
            reference_id: None,
        };

        let tx = self.wallets.apply_green(&entry).await?;
        tracing::info!(user = %user.id, amount, "Green tokens granted");

        Ok(tx)
    }
}
