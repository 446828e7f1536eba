//! Fixed-point money utilities.
//!
//! ## Overview
//!
//! Balances, transfer amounts and graph weights are stored as `u64` minor
//! units (cents) scaled by 10^2. Negative amounts are unrepresentable.
//!
//! Conversions and any non-integer scaling go through `rust_decimal` so the
//! results are identical on every platform.
//!
//! ## Examples
//!
//! ```
//! use vault_index::types::money::{to_amount, from_amount, units};
//!
//! let amount = to_amount("1250.75").unwrap();
//! assert_eq!(amount, 125_075);
//! assert_eq!(from_amount(amount), "1250.75");
//! assert_eq!(units(40), 4_000);
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor: 10^2 minor units per whole unit
pub const SCALE: u64 = 100;

/// Largest amount accepted by money-moving operations.
///
/// Leaves headroom so that sums of a few balances and priority boosts
/// cannot overflow `u64`.
pub const MAX_AMOUNT: u64 = u64::MAX / (SCALE * 1_000);

// ============================================================================
// Conversion Functions
// ============================================================================

/// Whole units to minor units (saturating)
///
/// ```
/// use vault_index::types::money::units;
///
/// assert_eq!(units(100), 10_000);
/// ```
#[inline]
pub const fn units(whole: u64) -> u64 {
    whole.saturating_mul(SCALE)
}

/// Parse a decimal string into minor units
///
/// Values with more than two decimal places are rounded half-to-even
/// (banker's rounding, the `rust_decimal` default).
///
/// # Returns
///
/// * `Some(u64)` - The amount in minor units
/// * `None` - If parsing fails, the value is negative, or out of range
///
/// # Example
///
/// ```
/// use vault_index::types::money::to_amount;
///
/// assert_eq!(to_amount("1.00"), Some(100));
/// assert_eq!(to_amount("0.01"), Some(1));
/// assert_eq!(to_amount("-5"), None);
/// ```
pub fn to_amount(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s.trim()).ok()?;
    decimal_to_amount(decimal)
}

/// Convert a `Decimal` in whole units to minor units
pub fn decimal_to_amount(d: Decimal) -> Option<u64> {
    if d.is_zero() {
        return Some(0);
    }
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Convert minor units to a `Decimal` in whole units
pub fn amount_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Format minor units with exactly two decimal places
///
/// # Example
///
/// ```
/// use vault_index::types::money::from_amount;
///
/// assert_eq!(from_amount(100), "1.00");
/// assert_eq!(from_amount(5), "0.05");
/// ```
pub fn from_amount(value: u64) -> String {
    format!("{:.2}", amount_to_decimal(value))
}

// ============================================================================
// Arithmetic
// ============================================================================

/// Scale an amount by a decimal factor, rounding to the nearest minor unit
///
/// Used for priority multipliers (e.g. 1.5x for cross-border transfers).
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use vault_index::types::money::scale_by;
///
/// assert_eq!(scale_by(1_000, Decimal::new(15, 1)), Some(1_500));
/// ```
pub fn scale_by(amount: u64, factor: Decimal) -> Option<u64> {
    if factor.is_sign_negative() {
        return None;
    }
    let result = Decimal::from(amount).checked_mul(factor)?;
    result.round_dp(0).to_u64()
}

/// Add two amounts, `None` on overflow
#[inline]
pub fn checked_add(a: u64, b: u64) -> Option<u64> {
    a.checked_add(b)
}

/// Subtract two amounts, `None` on underflow
#[inline]
pub fn checked_sub(a: u64, b: u64) -> Option<u64> {
    a.checked_sub(b)
}

/// True when `amount` may be moved by a deposit, withdrawal or transfer
#[inline]
pub fn is_valid_transfer_amount(amount: u64) -> bool {
    amount > 0 && amount <= MAX_AMOUNT
}

// ============================================================================
// Unit Tests
// ============================================================================
