//! Bank account entity.
//!
//! ## Fixed-Point Representation
//!
//! `balance` and `overdraft_limit` are minor units (see
//! [`money`](crate::types::money)). A withdrawal succeeds while
//! `balance + overdraft_limit >= amount`; the balance itself never goes
//! below zero in this model because overdraft usage is tracked as
//! `overdraft_used`.

use std::fmt;
use std::str::FromStr;

use crate::error::{BankError, BankResult};
use crate::types::money;

// ============================================================================
// AccountType enum
// ============================================================================

/// Product type of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AccountType {
    /// Interest-bearing savings account
    #[default]
    Savings,
    /// Everyday checking account
    Checking,
    /// Business account
    Business,
}

impl AccountType {
    /// Display name, as used by attribute search
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Savings => "Savings",
            AccountType::Checking => "Checking",
            AccountType::Business => "Business",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "savings" => Ok(AccountType::Savings),
            "checking" => Ok(AccountType::Checking),
            "business" => Ok(AccountType::Business),
            _ => Err(BankError::invalid("account_type", "unknown account type")),
        }
    }
}

// ============================================================================
// Account struct
// ============================================================================

/// A bank account.
///
/// ## Example
///
/// ```
/// use vault_index::types::{Account, AccountType};
/// use vault_index::types::money::units;
///
/// let mut account = Account::new("ab12cd34", "cust-1", AccountType::Checking, units(100), 0);
/// account.withdraw(units(40)).unwrap();
/// assert_eq!(account.balance, units(60));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Immutable account number (short token)
    pub account_number: String,

    /// Owning customer identifier
    pub customer_id: String,

    /// Product type
    pub account_type: AccountType,

    /// Current balance in minor units
    pub balance: u64,

    /// Maximum overdraft in minor units
    pub overdraft_limit: u64,

    /// Portion of the overdraft currently drawn
    pub overdraft_used: u64,

    /// Closed accounts refuse deposits and withdrawals
    pub is_active: bool,

    /// Creation time, Unix millis
    pub created_at: u64,
}

impl Account {
    /// Create a new active account
    pub fn new(
        account_number: impl Into<String>,
        customer_id: impl Into<String>,
        account_type: AccountType,
        balance: u64,
        created_at: u64,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            customer_id: customer_id.into(),
            account_type,
            balance,
            overdraft_limit: 0,
            overdraft_used: 0,
            is_active: true,
            created_at,
        }
    }

    /// Builder-style overdraft limit
    #[must_use]
    pub fn with_overdraft(mut self, limit: u64) -> Self {
        self.overdraft_limit = limit;
        self
    }

    /// Funds available for withdrawal: balance plus unused overdraft
    #[inline]
    pub fn available_funds(&self) -> u64 {
        self.balance
            .saturating_add(self.overdraft_limit.saturating_sub(self.overdraft_used))
    }

    /// Credit the account
    ///
    /// Repays drawn overdraft before increasing the balance.
    pub fn deposit(&mut self, amount: u64) -> BankResult<()> {
        self.ensure_active()?;
        if !money::is_valid_transfer_amount(amount) {
            return Err(BankError::InvalidAmount(amount));
        }

        let repaid = amount.min(self.overdraft_used);
        let credited = money::checked_add(self.balance, amount - repaid)
            .ok_or(BankError::InvalidAmount(amount))?;
        self.overdraft_used -= repaid;
        self.balance = credited;
        Ok(())
    }

    /// Debit the account, drawing on the overdraft if needed
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - zero or out-of-range amount
    /// * `InsufficientFunds` - amount exceeds [`available_funds`](Self::available_funds)
    pub fn withdraw(&mut self, amount: u64) -> BankResult<()> {
        self.ensure_active()?;
        if !money::is_valid_transfer_amount(amount) {
            return Err(BankError::InvalidAmount(amount));
        }

        let available = self.available_funds();
        if amount > available {
            return Err(BankError::InsufficientFunds {
                account: self.account_number.clone(),
                requested: amount,
                available,
            });
        }

        if amount <= self.balance {
            self.balance -= amount;
        } else {
            self.overdraft_used += amount - self.balance;
            self.balance = 0;
        }
        Ok(())
    }

    fn ensure_active(&self) -> BankResult<()> {
        if self.is_active {
            Ok(())
        } else {
            Err(BankError::invalid("account", "account is closed"))
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
