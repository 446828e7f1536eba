//! Error types for the index kernel.
//!
//! Two layers, mirroring the crate layout:
//!
//! - [`CollectionError`]: raised by the generic data structures
//!   (missing key, empty queue, empty tree).
//! - [`BankError`]: raised by the domain services and the [`Bank`](crate::Bank)
//!   facade. Collection errors convert into it with `?`.
//!
//! Every variant is recoverable. Contract violations (unsorted input to a
//! sorted search) are debug assertions, not error values.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Result type for collection operations.
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Result type for service and facade operations.
pub type BankResult<T> = Result<T, BankError>;

/// Errors raised by the generic data structures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// Lookup or removal of a key the structure does not hold.
    #[error("key not found")]
    KeyNotFound,

    /// `pop`/`peek` on an empty priority scheduler.
    #[error("priority queue is empty")]
    EmptyQueue,

    /// Operation that needs at least one element (e.g. `min` on a tree).
    #[error("structure is empty")]
    EmptyStructure,
}

/// Field-level validation failures, keyed by field name.
///
/// Kept ordered so error messages are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Create an empty error set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an error set holding a single field failure
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record a failure for `field`. The first message for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    /// True when no field failed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of failed fields
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Message recorded for `field`, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Iterate `(field, message)` pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// `Ok(())` when empty, otherwise `Err(BankError::ValidationFailed)`
    pub fn into_result(self) -> BankResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(BankError::ValidationFailed(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Errors raised by the domain services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// Lookup miss on a domain entity.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind ("account", "user", ...)
        entity: &'static str,
        /// Identifier that missed
        id: String,
    },

    /// Duplicate key on insert.
    #[error("{entity} already exists: {id}")]
    AlreadyExists {
        /// Entity kind
        entity: &'static str,
        /// Identifier that collided
        id: String,
    },

    /// Registration with a username that is already indexed.
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// Malformed input.
    #[error("validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    /// Zero or out-of-range money amount (minor units).
    #[error("invalid amount: {0}")]
    InvalidAmount(u64),

    /// Withdrawal or transfer exceeding balance plus overdraft.
    #[error("insufficient funds in {account}: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Debited account
        account: String,
        /// Requested amount (minor units)
        requested: u64,
        /// Balance plus overdraft (minor units)
        available: u64,
    },

    /// Authentication mismatch. Never says which part failed.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Every identifier of the configured length has been issued.
    #[error("no unused {entity} identifier left")]
    IdsExhausted {
        /// Entity kind
        entity: &'static str,
    },

    /// Failure from the underlying data structures.
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

impl BankError {
    /// Shorthand for [`BankError::NotFound`]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        BankError::NotFound { entity, id: id.into() }
    }

    /// Shorthand for [`BankError::AlreadyExists`]
    pub fn already_exists(entity: &'static str, id: impl Into<String>) -> Self {
        BankError::AlreadyExists { entity, id: id.into() }
    }

    /// Shorthand for a single-field [`BankError::ValidationFailed`]
    pub fn invalid(field: &str, message: &str) -> Self {
        BankError::ValidationFailed(ValidationErrors::single(field, message))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
