//! Domain entities for the index kernel.
//!
//! ## Types
//!
//! - [`Account`]: a bank account with balance and overdraft
//! - [`Customer`]: the owner of one or more accounts
//! - [`User`] / [`Credential`]: a login principal and its salted keyed hash
//! - [`Transaction`]: a money movement between two accounts
//!
//! ## Fixed-Point Arithmetic
//!
//! All money values are `u64` minor units scaled by 10^2.
//! Example: 1250.75 is stored as 125_075u64. See [`money`].

mod account;
mod customer;
mod transaction;
mod user;
pub mod ids;
pub mod money;

// Re-export all types at module level
pub use account::{Account, AccountType};
pub use customer::Customer;
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
pub use user::{Credential, Role, User, DEFAULT_SALT_LEN};
