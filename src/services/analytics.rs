//! Customer relationship analytics and batch prioritization.
//!
//! The customer network is separate from the account-level transfer graph:
//! vertices are customer ids, and each edge accumulates money moved between
//! two customers' accounts.

use tracing::debug;

use crate::algorithms::search::{binary_search_by_key, linear_search};
use crate::algorithms::sort::merge_sort_by;
use crate::collections::{PriorityScheduler, RelationshipGraph};
use crate::config::BankConfig;
use crate::services::transaction::NetworkAnalysis;
use crate::types::money::units;
use crate::types::{Customer, Transaction};

/// Flat boost for international transfers in batch prioritization
const INTERNATIONAL_BOOST: u64 = units(100);

#[derive(Debug, Clone)]
pub struct AnalyticsService {
    customers: RelationshipGraph<String>,
    high_value_threshold: u64,
    high_value_boost: u64,
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new(&BankConfig::default())
    }
}

impl AnalyticsService {
    pub fn new(config: &BankConfig) -> Self {
        Self {
            customers: RelationshipGraph::new(),
            high_value_threshold: config.high_value_threshold,
            high_value_boost: config.high_value_boost,
        }
    }

    /// Add one weighted relationship per `(other_customer, weight)` pair
    pub fn map_customer_network(&mut self, customer: &str, related: &[(String, u64)]) {
        self.customers.add_vertex(customer.to_string());
        for (other, weight) in related {
            self.customers
                .add_edge(customer.to_string(), other.clone(), *weight);
        }
        debug!(customer = %customer, links = related.len(), "customer network mapped");
    }

    /// Record money flowing between two customers
    pub fn link_customers(&mut self, from: &str, to: &str, amount: u64) {
        if from == to {
            return;
        }
        self.customers.add_edge(from.to_string(), to.to_string(), amount);
    }

    /// Connected customers (DFS) and weighted distances (Dijkstra)
    pub fn analyze_customer_network(&self, customer: &str) -> NetworkAnalysis {
        let start = customer.to_string();
        let mut connected: Vec<String> = self.customers.depth_first_search(&start).into_iter().collect();
        connected.sort_unstable();
        let distances = self.customers.dijkstra(&start);
        debug!(customer = %customer, connected = connected.len(), "customer network analyzed");
        NetworkAnalysis { connected, distances }
    }

    pub fn customer_network(&self) -> &RelationshipGraph<String> {
        &self.customers
    }

    /// `amount`, plus a flat boost for international and high-value transfers
    pub fn priority(&self, transaction: &Transaction) -> u64 {
        let mut priority = transaction.amount;
        if transaction.kind.is_flagged() {
            priority = priority.saturating_add(INTERNATIONAL_BOOST);
        }
        if transaction.amount > self.high_value_threshold {
            priority = priority.saturating_add(self.high_value_boost);
        }
        priority
    }

    /// `transactions` in processing order: highest priority first, ties in
    /// input order
    pub fn prioritize<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let mut queue: PriorityScheduler<usize> = PriorityScheduler::new();
        for (idx, transaction) in transactions.iter().enumerate() {
            queue.push(idx, self.priority(transaction));
        }
        queue
            .drain_ordered()
            .into_iter()
            .map(|idx| &transactions[idx])
            .collect()
    }

    /// Find a customer by id
    ///
    /// Runs a linear scan over the input and a binary search over a
    /// merge-sorted copy; both must agree.
    pub fn search_customers<'a, I>(&self, customers: I, customer_id: &str) -> Option<&'a Customer>
    where
        I: IntoIterator<Item = &'a Customer>,
    {
        let customers: Vec<&Customer> = customers.into_iter().collect();

        let ids: Vec<&str> = customers.iter().map(|c| c.customer_id.as_str()).collect();
        let linear = linear_search(&ids, &customer_id).map(|idx| customers[idx]);

        let mut sorted = customers.clone();
        merge_sort_by(&mut sorted, |a, b| a.customer_id.cmp(&b.customer_id));
        let binary = binary_search_by_key(&sorted, customer_id, |c| c.customer_id.as_str())
            .map(|idx| sorted[idx]);

        debug_assert_eq!(
            linear.map(|c| c.customer_id.as_str()),
            binary.map(|c| c.customer_id.as_str()),
        );
        debug!(customer = %customer_id, found = binary.is_some(), scanned = customers.len(), "customer search");
        binary
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;

    fn tx(id: &str, amount: u64, kind: TransactionKind) -> Transaction {
        Transaction::new(id, "a", "b", amount, kind, 0)
    }

    #[test]
    fn test_customer_network() {
        let mut analytics = AnalyticsService::default();
        analytics.map_customer_network("c1", &[("c2".to_string(), 5), ("c3".to_string(), 10)]);
        analytics.link_customers("c2", "c3", 3);
        analytics.link_customers("c4", "c4", 1);

        let analysis = analytics.analyze_customer_network("c1");
        assert_eq!(analysis.connected, vec!["c1", "c2", "c3"]);
        assert_eq!(analysis.distances.distance(&"c3".to_string()), Some(8));
        assert!(!analytics.customer_network().contains_vertex(&"c4".to_string()));
    }

    #[test]
    fn test_prioritize_order() {
        let analytics = AnalyticsService::default();
        let batch = vec![
            tx("small", units(10), TransactionKind::Transfer),
            tx("intl", units(10), TransactionKind::International),
            tx("large", units(20_000), TransactionKind::Transfer),
            tx("tie", units(10), TransactionKind::Transfer),
        ];

        assert_eq!(analytics.priority(&batch[1]), units(110));
        assert_eq!(analytics.priority(&batch[2]), units(20_050));

        let order: Vec<&str> = analytics
            .prioritize(&batch)
            .iter()
            .map(|t| t.transaction_id.as_str())
            .collect();
        assert_eq!(order, vec!["large", "intl", "small", "tie"]);
    }

    #[test]
    fn test_search_customers() {
        let analytics = AnalyticsService::default();
        let customers: Vec<Customer> = ["m", "c", "x", "a"]
            .iter()
            .map(|id| Customer::new(*id, "First", "Last", "f@x.com", 0))
            .collect();

        let found = analytics.search_customers(&customers, "x").unwrap();
        assert_eq!(found.customer_id, "x");
        assert!(analytics.search_customers(&customers, "zz").is_none());
        assert!(analytics.search_customers(Vec::<&Customer>::new(), "a").is_none());
    }
}
