//! # Vault Index
//!
//! In-memory indexing kernel for a retail banking back office.
//!
//! ## Architecture
//!
//! The kernel consists of:
//! - **Collections**: AVL index, chained hash cache, registry, graph, scheduler
//! - **Algorithms**: sorts and searches over slices
//! - **Types**: Account, Customer, User, Transaction and fixed-point money
//! - **Services**: accounts, authentication, registration, transactions,
//!   risk and analytics
//! - **Engine**: the [`Bank`] facade
//!
//! ## Design Principles
//!
//! 1. **Determinism**: ordered indexes iterate in key order; equal review
//!    priorities pop in insertion order
//! 2. **No Floating Point in money**: amounts are `u64` minor units (10^2 scaling)
//! 3. **Arena storage**: entities live in a slab; indexes hold slab keys
//! 4. **Synchronous Execution**: single owner, `&mut self` mutation
//!
//! ## Logging
//!
//! Every service logs through `tracing`. Binaries install a subscriber;
//! the library never does.

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for collections and services
pub mod error;

/// Shared service configuration
pub mod config;

/// Domain entities and money helpers
pub mod types;

/// Generic indexing structures
pub mod collections;

/// Sorting and searching
pub mod algorithms;

/// Domain services
pub mod services;

/// Bank facade
pub mod engine;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use collections::{FastLookupCache, KeyedIndex, PriorityScheduler, Registry, RelationshipGraph};
pub use config::BankConfig;
pub use engine::Bank;
pub use error::{BankError, BankResult, CollectionError, ValidationErrors};
pub use types::{Account, AccountType, Customer, Role, Transaction, TransactionKind, User};
