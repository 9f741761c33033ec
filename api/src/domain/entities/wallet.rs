//! Wallet and token ledger domain entities
//!
//! Each user owns one wallet holding Green Token and Seed Token balances.
//! Every balance change is explained by an append-only ledger row; the
//! invariant throughout is that balances never go negative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Unique identifier for a wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletId(pub Uuid);

impl WalletId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WalletId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for WalletId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for WalletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Token ledger direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Credit,
    Debit,
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxKind::Credit => write!(f, "credit"),
            TxKind::Debit => write!(f, "debit"),
        }
    }
}

impl std::str::FromStr for TxKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "credit" => Ok(TxKind::Credit),
            "debit" => Ok(TxKind::Debit),
            _ => Err(format!("Unknown tx kind: {}", s)),
        }
    }
}

/// A user's token wallet
#[derive(Debug, Clone, Serialize)]
pub struct Wallet {
    pub id: WalletId,
    pub user_id: UserId,
    pub green_balance: i64,
    pub seed_balance: i64,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    /// Whether the wallet can cover a green token debit
    pub fn can_spend_green(&self, amount: i64) -> bool {
        amount > 0 && self.green_balance >= amount
    }

    /// Whether the wallet can cover a seed token debit
    pub fn can_spend_seed(&self, amount: i64) -> bool {
        amount > 0 && self.seed_balance >= amount
    }
}

/// An entry in the Green Token ledger
#[derive(Debug, Clone, Serialize)]
pub struct GreenTransaction {
    pub id: Uuid,
    pub wallet_id: WalletId,
    pub kind: TxKind,
    pub amount: i64,
    pub reason: String,
    /// Order, conversion, or grant that produced this entry
    pub reference_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// An entry in the Seed Token ledger
#[derive(Debug, Clone, Serialize)]
pub struct SeedTransaction {
    pub id: Uuid,
    pub wallet_id: WalletId,
    pub kind: TxKind,
    pub amount: i64,
    pub reason: String,
    /// Tree or conversion that produced this entry
    pub reference_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Data for a new ledger entry (green or seed)
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub wallet_id: WalletId,
    pub kind: TxKind,
    pub amount: i64,
    pub reason: String,
    pub reference_id: Option<Uuid>,
}

/// Unique identifier for a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversionId(pub Uuid);

impl ConversionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A completed Green → Seed conversion
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub id: ConversionId,
    pub wallet_id: WalletId,
    pub green_spent: i64,
    pub seeds_minted: i64,
    pub created_at: DateTime<Utc>,
}

/// Data for recording a conversion
#[derive(Debug, Clone)]
pub struct NewConversion {
    pub wallet_id: WalletId,
    pub green_spent: i64,
    pub seeds_minted: i64,
}

/// Split a green token amount into whole seeds plus change.
///
/// Integer division: the remainder stays in the green balance.
pub fn seeds_for_green(green_amount: i64, green_per_seed: i64) -> (i64, i64) {
    if green_amount <= 0 || green_per_seed <= 0 {
        return (0, 0);
    }
    let seeds = green_amount / green_per_seed;
    (seeds, seeds * green_per_seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_for_green_exact() {
        assert_eq!(seeds_for_green(200, 100), (2, 200));
    }

    #[test]
    fn seeds_for_green_keeps_remainder() {
        // 250 green at 100:1 yields 2 seeds, spending 200 and leaving 50
        assert_eq!(seeds_for_green(250, 100), (2, 200));
    }

    #[test]
    fn seeds_for_green_below_one_seed() {
        assert_eq!(seeds_for_green(99, 100), (0, 0));
    }

    #[test]
    fn seeds_for_green_rejects_nonpositive() {
        assert_eq!(seeds_for_green(0, 100), (0, 0));
        assert_eq!(seeds_for_green(-50, 100), (0, 0));
    }

    #[test]
    fn wallet_can_spend_green() {
        let wallet = Wallet {
            id: WalletId::new(),
            user_id: UserId::new(),
            green_balance: 100,
            seed_balance: 0,
            created_at: Utc::now(),
        };

        assert!(wallet.can_spend_green(100));
        assert!(wallet.can_spend_green(1));
        assert!(!wallet.can_spend_green(101));
        assert!(!wallet.can_spend_green(0));
        assert!(!wallet.can_spend_green(-5));
    }

    #[test]
    fn wallet_can_spend_seed() {
        let wallet = Wallet {
            id: WalletId::new(),
            user_id: UserId::new(),
            green_balance: 0,
            seed_balance: 3,
            created_at: Utc::now(),
        };

        assert!(wallet.can_spend_seed(3));
        assert!(!wallet.can_spend_seed(4));
    }

    #[test]
    fn tx_kind_parse() {
        assert_eq!("credit".parse::<TxKind>().unwrap(), TxKind::Credit);
        assert_eq!("DEBIT".parse::<TxKind>().unwrap(), TxKind::Debit);
        assert!("transfer".parse::<TxKind>().is_err());
    }
}
