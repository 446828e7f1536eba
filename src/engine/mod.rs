//! Bank facade module for Vault Index.
//!
//! ## Design Principles
//!
//! 1. **Single owner**: [`Bank`] owns one instance of every service
//! 2. **Fixed-Point Money**: amounts are `u64` minor units, never floats
//! 3. **Synchronous Execution**: plain `&mut self`, no interior locking
//! 4. **All-or-nothing transfers**: a failed transfer changes no balance
//!
//! ## Transfer Rules
//!
//! - The amount must be positive and within [`MAX_AMOUNT`](crate::types::money::MAX_AMOUNT)
//! - Both accounts must exist and differ
//! - The debit honours balance plus overdraft
//! - A completed transfer adds a network edge, a review entry and a risk
//!   assessment
//!
//! ## Example
//!
//! ```
//! use vault_index::engine::Bank;
//! use vault_index::types::AccountType;
//!
//! let mut bank = Bank::default();
//! let a = bank.create_account("cust-1", AccountType::Checking, 10_000).unwrap().account_number.clone();
//! let b = bank.create_account("cust-2", AccountType::Savings, 0).unwrap().account_number.clone();
//!
//! let tx = bank.transfer(&a, &b, 2_500).unwrap();
//! assert_eq!(tx.amount, 2_500);
//! assert_eq!(bank.find_account(&a).unwrap().balance, 7_500);
//! assert!(bank.reachable_from(&a).contains(&b));
//! ```

pub mod bank;

pub use bank::Bank;
