//! Bank configuration.

use rust_decimal::Decimal;

use crate::collections::hash_table::{DEFAULT_BUCKETS, DEFAULT_MAX_LOAD_FACTOR};
use crate::types::money::units;
use crate::types::{ids, DEFAULT_SALT_LEN};

/// Tunables shared by every service.
///
/// Money fields are minor units (see [`crate::types::money`]).
#[derive(Debug, Clone, PartialEq)]
pub struct BankConfig {
    /// Initial bucket count of every identifier cache.
    pub cache_buckets: usize,

    /// Load factor that triggers a cache rehash.
    pub max_load_factor: f64,

    /// Random salt bytes per credential.
    pub salt_len: usize,

    /// Length of generated account, customer and transaction ids.
    pub id_len: usize,

    /// Overdraft limit granted to new accounts.
    pub default_overdraft: u64,

    /// Review priority multiplier for international transfers.
    pub international_multiplier: Decimal,

    /// Amounts above this get [`high_value_boost`](Self::high_value_boost).
    pub high_value_threshold: u64,

    /// Additive review priority boost for high-value transfers.
    pub high_value_boost: u64,

    /// Amounts above this are reported as suspicious.
    pub suspicious_threshold: u64,

    /// Whether recorded transactions are queued for review.
    pub review_queue: bool,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            cache_buckets: DEFAULT_BUCKETS,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            salt_len: DEFAULT_SALT_LEN,
            id_len: ids::SHORT_ID_LEN,
            default_overdraft: 0,
            international_multiplier: Decimal::new(15, 1), // 1.5
            high_value_threshold: units(10_000),
            high_value_boost: units(50),
            suspicious_threshold: units(50_000),
            review_queue: true,
        }
    }
}

impl BankConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial cache bucket count.
    #[must_use]
    pub const fn cache_buckets(mut self, buckets: usize) -> Self {
        self.cache_buckets = buckets;
        self
    }

    /// Sets the cache rehash threshold.
    #[must_use]
    pub fn max_load_factor(mut self, factor: f64) -> Self {
        self.max_load_factor = factor;
        self
    }

    /// Sets the credential salt length in bytes.
    #[must_use]
    pub const fn salt_len(mut self, len: usize) -> Self {
        self.salt_len = len;
        self
    }

    /// Sets the generated identifier length.
    #[must_use]
    pub const fn id_len(mut self, len: usize) -> Self {
        self.id_len = len;
        self
    }

    /// Sets the overdraft limit for new accounts.
    #[must_use]
    pub const fn default_overdraft(mut self, amount: u64) -> Self {
        self.default_overdraft = amount;
        self
    }

    /// Sets the international review multiplier.
    #[must_use]
    pub fn international_multiplier(mut self, factor: Decimal) -> Self {
        self.international_multiplier = factor;
        self
    }

    /// Sets the high-value threshold and its priority boost.
    #[must_use]
    pub const fn high_value(mut self, threshold: u64, boost: u64) -> Self {
        self.high_value_threshold = threshold;
        self.high_value_boost = boost;
        self
    }

    /// Sets the suspicious-amount threshold.
    #[must_use]
    pub const fn suspicious_threshold(mut self, amount: u64) -> Self {
        self.suspicious_threshold = amount;
        self
    }

    /// Enables or disables the review queue.
    #[must_use]
    pub const fn review_queue(mut self, enabled: bool) -> Self {
        self.review_queue = enabled;
        self
    }
}
