//! Transaction record between two accounts.

use std::fmt;
use std::str::FromStr;

use crate::error::BankError;

/// Category of a money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransactionKind {
    /// Domestic transfer between accounts
    #[default]
    Transfer,
    /// Cross-border transfer; flagged for priority review
    International,
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Transfer => "TRANSFER",
            TransactionKind::International => "INTERNATIONAL",
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdrawal => "WITHDRAWAL",
        }
    }

    /// Categories that get boosted review priority and risk scores
    #[inline]
    pub fn is_flagged(self) -> bool {
        matches!(self, TransactionKind::International)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRANSFER" => Ok(TransactionKind::Transfer),
            "INTERNATIONAL" => Ok(TransactionKind::International),
            "DEPOSIT" => Ok(TransactionKind::Deposit),
            "WITHDRAWAL" => Ok(TransactionKind::Withdrawal),
            _ => Err(BankError::invalid("transaction_type", "unknown transaction type")),
        }
    }
}

/// Lifecycle state of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// A money movement between two accounts.
///
/// `amount` is in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Immutable transaction id (short token)
    pub transaction_id: String,
    pub from_account: String,
    pub to_account: String,
    pub amount: u64,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    /// Creation time, Unix millis
    pub timestamp: u64,
}

impl Transaction {
    /// Create a pending transaction
    pub fn new(
        transaction_id: impl Into<String>,
        from_account: impl Into<String>,
        to_account: impl Into<String>,
        amount: u64,
        kind: TransactionKind,
        timestamp: u64,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            from_account: from_account.into(),
            to_account: to_account.into(),
            amount,
            kind,
            status: TransactionStatus::Pending,
            timestamp,
        }
    }

    /// Mark completed if the record is well formed, otherwise failed
    ///
    /// Returns the resulting status.
    pub fn complete(&mut self) -> TransactionStatus {
        self.status = if self.amount > 0
            && !self.from_account.is_empty()
            && !self.to_account.is_empty()
        {
            TransactionStatus::Completed
        } else {
            TransactionStatus::Failed
        };
        self.status
    }

    /// True when `account` is the source or destination
    #[inline]
    pub fn involves(&self, account: &str) -> bool {
        self.from_account == account || self.to_account == account
    }
}
