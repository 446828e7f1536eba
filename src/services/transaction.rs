//! Transaction recording, review queue and transfer network.
//!
//! Every recorded transaction:
//!
//! 1. is stored in a [`Registry`] under a fresh short id,
//! 2. is queued for review in a [`PriorityScheduler`] (id payload),
//! 3. adds a `from -> to` edge weighted by its amount to the
//!    [`RelationshipGraph`].
//!
//! ## Review priority
//!
//! ```text
//! priority = amount
//!          × international_multiplier      (international only)
//!          + high_value_boost              (amount > high_value_threshold)
//! ```
//!
//! Equal priorities are reviewed in recording order.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::algorithms::sort::quick_sort_by_key;
use crate::collections::{PriorityScheduler, Registry, RelationshipGraph, ShortestPaths};
use crate::config::BankConfig;
use crate::error::{BankError, BankResult};
use crate::types::ids::{now_millis, IdIssuer};
use crate::types::money;
use crate::types::{Transaction, TransactionKind, TransactionStatus};

/// Reachability and distances from one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkAnalysis {
    /// Accounts reachable from the start (inclusive), sorted
    pub connected: Vec<String>,
    /// Shortest transfer-weighted distances from the start
    pub distances: ShortestPaths<String>,
}

#[derive(Debug, Clone)]
pub struct TransactionService {
    transactions: Registry<String, Transaction>,
    review_queue: PriorityScheduler<String>,
    network: RelationshipGraph<String>,
    ids: IdIssuer,
    review_enabled: bool,
    international_multiplier: Decimal,
    high_value_threshold: u64,
    high_value_boost: u64,
}

impl Default for TransactionService {
    fn default() -> Self {
        Self::new(&BankConfig::default())
    }
}

impl TransactionService {
    pub fn new(config: &BankConfig) -> Self {
        Self {
            transactions: Registry::with_cache_config(config.cache_buckets, config.max_load_factor),
            review_queue: PriorityScheduler::new(),
            network: RelationshipGraph::new(),
            ids: IdIssuer::new(config.id_len),
            review_enabled: config.review_queue,
            international_multiplier: config.international_multiplier,
            high_value_threshold: config.high_value_threshold,
            high_value_boost: config.high_value_boost,
        }
    }

    /// Record a completed money movement
    ///
    /// Balances are not touched here; the caller moves funds first.
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - zero or above [`money::MAX_AMOUNT`]
    /// * `ValidationFailed` - empty account id
    /// * `IdsExhausted` - no unused transaction id left
    pub fn record(
        &mut self,
        from: &str,
        to: &str,
        amount: u64,
        kind: TransactionKind,
    ) -> BankResult<&Transaction> {
        Self::check(from, to, amount)?;
        let id = self.reserve_id()?;
        self.record_reserved(id, from, to, amount, kind)
    }

    /// Claim the next transaction id ahead of moving funds
    ///
    /// An id that ends up unused is still never issued again.
    pub fn reserve_id(&mut self) -> BankResult<String> {
        self.ids
            .issue()
            .ok_or(BankError::IdsExhausted { entity: "transaction" })
    }

    /// [`record`](Self::record) under an id from [`reserve_id`](Self::reserve_id)
    pub fn record_reserved(
        &mut self,
        id: String,
        from: &str,
        to: &str,
        amount: u64,
        kind: TransactionKind,
    ) -> BankResult<&Transaction> {
        Self::check(from, to, amount)?;
        if self.transactions.contains(id.as_str()) {
            return Err(BankError::already_exists("transaction", id));
        }

        let mut transaction = Transaction::new(id.clone(), from, to, amount, kind, now_millis());
        if transaction.complete() != TransactionStatus::Completed {
            return Err(BankError::invalid("transaction", "malformed transaction"));
        }

        let priority = self.review_priority(&transaction);
        if self.review_enabled {
            self.review_queue.push(id.clone(), priority);
        }
        self.network.add_edge(from.to_string(), to.to_string(), amount);
        self.transactions.insert(id.clone(), transaction);

        info!(
            transaction = %id,
            from = %from,
            to = %to,
            amount,
            kind = %kind,
            priority,
            "transaction recorded"
        );
        self.find_transaction(&id)
    }

    fn check(from: &str, to: &str, amount: u64) -> BankResult<()> {
        if !money::is_valid_transfer_amount(amount) {
            warn!(from = %from, to = %to, amount, "rejected transaction amount");
            return Err(BankError::InvalidAmount(amount));
        }
        if from.is_empty() || to.is_empty() {
            return Err(BankError::invalid("account", "account id is required"));
        }
        Ok(())
    }

    /// Review priority for `transaction`
    pub fn review_priority(&self, transaction: &Transaction) -> u64 {
        let mut priority = transaction.amount;
        if transaction.kind.is_flagged() {
            priority = money::scale_by(priority, self.international_multiplier).unwrap_or(priority);
        }
        if transaction.amount > self.high_value_threshold {
            priority = priority.saturating_add(self.high_value_boost);
        }
        priority
    }

    pub fn find_transaction(&self, transaction_id: &str) -> BankResult<&Transaction> {
        self.transactions
            .find(transaction_id)
            .ok_or_else(|| BankError::not_found("transaction", transaction_id))
    }

    // ========================================================================
    // Review queue
    // ========================================================================

    /// Dequeue the most urgent transaction
    ///
    /// # Errors
    ///
    /// * `Collection(EmptyQueue)` - nothing awaiting review
    pub fn next_for_review(&mut self) -> BankResult<&Transaction> {
        let id = self.review_queue.pop()?;
        debug!(transaction = %id, remaining = self.review_queue.len(), "review dequeued");
        self.find_transaction(&id)
    }

    /// Most urgent transaction, left in the queue
    pub fn peek_next(&self) -> BankResult<&Transaction> {
        let id = self.review_queue.peek()?;
        self.find_transaction(id)
    }

    #[inline]
    pub fn pending_reviews(&self) -> usize {
        self.review_queue.len()
    }

    // ========================================================================
    // Network
    // ========================================================================

    /// Transactions touching `account`, largest first, at most `limit`
    pub fn account_transactions(&self, account: &str, limit: usize) -> Vec<&Transaction> {
        let mut related: Vec<&Transaction> = self
            .transactions
            .values()
            .filter(|tx| tx.involves(account))
            .collect();
        quick_sort_by_key(&mut related, |tx| std::cmp::Reverse(tx.amount));
        related.truncate(limit);
        related
    }

    /// Accounts reachable by following transfers out of `account`
    pub fn reachable_from(&self, account: &str) -> HashSet<String> {
        self.network.depth_first_search(&account.to_string())
    }

    pub fn shortest_paths_from(&self, account: &str) -> ShortestPaths<String> {
        self.network.dijkstra(&account.to_string())
    }

    pub fn analyze_network(&self, account: &str) -> NetworkAnalysis {
        let mut connected: Vec<String> = self.reachable_from(account).into_iter().collect();
        connected.sort_unstable();
        NetworkAnalysis {
            connected,
            distances: self.shortest_paths_from(account),
        }
    }

    /// Transfer network, for analysis
    pub fn network(&self) -> &RelationshipGraph<String> {
        &self.network
    }

    /// Every transaction, ascending by id
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.values()
    }

    #[inline]
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectionError;
    use crate::types::money::units;

    fn service() -> TransactionService {
        TransactionService::new(&BankConfig::default())
    }

    #[test]
    fn test_record_adds_edge_and_queues() {
        let mut service = service();
        let tx = service.record("A", "B", units(40), TransactionKind::Transfer).unwrap();

        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.transaction_id.len(), 8);
        assert_eq!(service.network().total_weight(&"A".into(), &"B".into()), units(40));
        assert_eq!(service.pending_reviews(), 1);
    }

    #[test]
    fn test_record_rejects_zero() {
        let mut service = service();
        assert_eq!(
            service.record("A", "B", 0, TransactionKind::Transfer).unwrap_err(),
            BankError::InvalidAmount(0)
        );
        assert_eq!(service.transaction_count(), 0);
        assert_eq!(service.network().edge_count(), 0);
    }

    #[test]
    fn test_review_priority() {
        let service = service();
        let tx = |amount, kind| Transaction::new("t", "a", "b", amount, kind, 0);

        assert_eq!(service.review_priority(&tx(units(100), TransactionKind::Transfer)), units(100));
        assert_eq!(service.review_priority(&tx(units(100), TransactionKind::International)), units(150));
        assert_eq!(
            service.review_priority(&tx(units(20_000), TransactionKind::Transfer)),
            units(20_050)
        );
        assert_eq!(
            service.review_priority(&tx(units(20_000), TransactionKind::International)),
            units(30_050)
        );
    }

    #[test]
    fn test_review_order() {
        let mut service = service();
        let small = service.record("A", "B", units(10), TransactionKind::Transfer).unwrap().transaction_id.clone();
        let big = service.record("A", "C", units(500), TransactionKind::Transfer).unwrap().transaction_id.clone();
        let tie = service.record("B", "C", units(10), TransactionKind::Transfer).unwrap().transaction_id.clone();

        assert_eq!(service.peek_next().unwrap().transaction_id, big);
        assert_eq!(service.next_for_review().unwrap().transaction_id, big);
        assert_eq!(service.next_for_review().unwrap().transaction_id, small);
        assert_eq!(service.next_for_review().unwrap().transaction_id, tie);
        assert_eq!(
            service.next_for_review().unwrap_err(),
            BankError::Collection(CollectionError::EmptyQueue)
        );
    }

    #[test]
    fn test_transaction_ids_exhaust_cleanly() {
        let mut service = TransactionService::new(&BankConfig::new().id_len(1));
        let mut ids = HashSet::new();
        for _ in 0..16 {
            let id = service.record("A", "B", 1, TransactionKind::Transfer).unwrap().transaction_id.clone();
            assert!(ids.insert(id));
        }

        assert_eq!(
            service.record("A", "B", 1, TransactionKind::Transfer).unwrap_err(),
            BankError::IdsExhausted { entity: "transaction" }
        );
        assert_eq!(service.transaction_count(), 16);
        assert_eq!(service.network().edge_count(), 16);
    }

    #[test]
    fn test_record_reserved_rejects_duplicate_id() {
        let mut service = service();
        let id = service.reserve_id().unwrap();
        service.record_reserved(id.clone(), "A", "B", 5, TransactionKind::Transfer).unwrap();
        assert!(matches!(
            service.record_reserved(id, "A", "B", 5, TransactionKind::Transfer),
            Err(BankError::AlreadyExists { .. })
        ));
        assert_eq!(service.pending_reviews(), 1);
    }

    #[test]
    fn test_review_queue_disabled() {
        let mut service = TransactionService::new(&BankConfig::new().review_queue(false));
        service.record("A", "B", 1, TransactionKind::Transfer).unwrap();
        assert_eq!(service.pending_reviews(), 0);
        assert_eq!(service.transaction_count(), 1);
    }

    #[test]
    fn test_account_transactions_largest_first() {
        let mut service = service();
        for amount in [5, 50, 20, 40] {
            service.record("A", "B", units(amount), TransactionKind::Transfer).unwrap();
        }
        service.record("C", "A", units(30), TransactionKind::Transfer).unwrap();
        service.record("C", "D", units(99), TransactionKind::Transfer).unwrap();

        let amounts: Vec<u64> = service
            .account_transactions("A", 3)
            .iter()
            .map(|tx| tx.amount)
            .collect();
        assert_eq!(amounts, vec![units(50), units(40), units(30)]);
    }

    #[test]
    fn test_network_analysis() {
        let mut service = service();
        service.record("A", "B", 5, TransactionKind::Transfer).unwrap();
        service.record("B", "C", 3, TransactionKind::Transfer).unwrap();
        service.record("A", "C", 10, TransactionKind::Transfer).unwrap();
        service.record("D", "A", 1, TransactionKind::Transfer).unwrap();

        let analysis = service.analyze_network("A");
        assert_eq!(analysis.connected, vec!["A", "B", "C"]);
        assert_eq!(analysis.distances.distance(&"C".to_string()), Some(8));
        assert_eq!(analysis.distances.distance(&"D".to_string()), None);
        assert!(service.reachable_from("Z").contains("Z"));
    }
}
