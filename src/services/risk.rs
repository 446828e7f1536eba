//! Transaction risk scoring and per-account risk profiles.
//!
//! ## Score
//!
//! A score in `0..=100`, summed from:
//!
//! | Factor | Points |
//! |--------|--------|
//! | amount | 1 per 500.00, at most 50 |
//! | international | 25 |
//! | above the high-value threshold | 15 |
//! | above the suspicious threshold | 10 |
//!
//! Levels: `< 40` low, `< 70` medium, otherwise high.

use std::fmt;

use tracing::{debug, info};

use crate::algorithms::sort::{heap_sort_by, quick_sort_by_key};
use crate::collections::KeyedIndex;
use crate::config::BankConfig;
use crate::error::{BankError, BankResult};
use crate::types::money::units;
use crate::types::Transaction;

const AMOUNT_STEP: u64 = units(500);
const MAX_AMOUNT_POINTS: u64 = 50;
const INTERNATIONAL_POINTS: u8 = 25;
const HIGH_VALUE_POINTS: u8 = 15;
const SUSPICIOUS_POINTS: u8 = 10;
const MAX_SCORE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => RiskLevel::Low,
            40..=69 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        })
    }
}

/// Outcome of scoring one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAssessment {
    pub transaction_id: String,
    /// Debited account the score is recorded against
    pub account: String,
    pub score: u8,
    pub level: RiskLevel,
}

/// Running risk state of one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskProfile {
    pub account: String,
    pub latest_score: u8,
    pub peak_score: u8,
    pub assessments: u32,
}

#[derive(Debug, Clone)]
pub struct RiskAnalysisService {
    profiles: KeyedIndex<String, RiskProfile>,
    high_value_threshold: u64,
    suspicious_threshold: u64,
}

impl Default for RiskAnalysisService {
    fn default() -> Self {
        Self::new(&BankConfig::default())
    }
}

impl RiskAnalysisService {
    pub fn new(config: &BankConfig) -> Self {
        Self {
            profiles: KeyedIndex::new(),
            high_value_threshold: config.high_value_threshold,
            suspicious_threshold: config.suspicious_threshold,
        }
    }

    /// Score `transaction` and fold it into the source account's profile
    pub fn assess(&mut self, transaction: &Transaction) -> RiskAssessment {
        let score = self.score(transaction);
        let account = transaction.from_account.clone();

        match self.profiles.find_mut(account.as_str()) {
            Some(profile) => {
                profile.latest_score = score;
                profile.peak_score = profile.peak_score.max(score);
                profile.assessments += 1;
            }
            None => {
                self.profiles.insert(
                    account.clone(),
                    RiskProfile {
                        account: account.clone(),
                        latest_score: score,
                        peak_score: score,
                        assessments: 1,
                    },
                );
            }
        }

        let level = RiskLevel::from_score(score);
        if level == RiskLevel::High {
            info!(transaction = %transaction.transaction_id, account = %account, score, "high risk transaction");
        } else {
            debug!(transaction = %transaction.transaction_id, score, level = %level, "risk assessed");
        }

        RiskAssessment {
            transaction_id: transaction.transaction_id.clone(),
            account,
            score,
            level,
        }
    }

    /// Score without recording
    pub fn score(&self, transaction: &Transaction) -> u8 {
        let amount_points = (transaction.amount / AMOUNT_STEP).min(MAX_AMOUNT_POINTS) as u8;
        let mut score = amount_points;
        if transaction.kind.is_flagged() {
            score += INTERNATIONAL_POINTS;
        }
        if transaction.amount > self.high_value_threshold {
            score += HIGH_VALUE_POINTS;
        }
        if transaction.amount > self.suspicious_threshold {
            score += SUSPICIOUS_POINTS;
        }
        score.min(MAX_SCORE)
    }

    /// True for amounts above the suspicious threshold and for
    /// international transfers
    pub fn is_suspicious(&self, transaction: &Transaction) -> bool {
        transaction.amount > self.suspicious_threshold || transaction.kind.is_flagged()
    }

    /// Suspicious transactions from `transactions`, ascending by amount
    pub fn detect_suspicious<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let mut by_amount: Vec<&Transaction> = transactions.iter().collect();
        quick_sort_by_key(&mut by_amount, |tx| tx.amount);

        let flagged: Vec<&Transaction> = by_amount
            .into_iter()
            .filter(|tx| self.is_suspicious(tx))
            .collect();
        debug!(checked = transactions.len(), flagged = flagged.len(), "suspicious scan");
        flagged
    }

    pub fn profile(&self, account: &str) -> BankResult<&RiskProfile> {
        self.profiles
            .find(account)
            .ok_or_else(|| BankError::not_found("risk profile", account))
    }

    /// Up to `n` profiles by latest score, highest first; ties by account
    pub fn highest_risk_accounts(&self, n: usize) -> Vec<&RiskProfile> {
        let mut profiles = self.profiles.values();
        heap_sort_by(&mut profiles, |a, b| {
            b.latest_score
                .cmp(&a.latest_score)
                .then_with(|| a.account.cmp(&b.account))
        });
        profiles.truncate(n);
        profiles
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;

    fn tx(id: &str, from: &str, amount: u64, kind: TransactionKind) -> Transaction {
        Transaction::new(id, from, "dest", amount, kind, 0)
    }

    #[test]
    fn test_scores_and_levels() {
        let service = RiskAnalysisService::default();

        let small = tx("t1", "a", units(100), TransactionKind::Transfer);
        assert_eq!(service.score(&small), 0);

        let medium = tx("t2", "a", units(20_000), TransactionKind::Transfer);
        assert_eq!(service.score(&medium), 40 + 15);

        let huge = tx("t3", "a", units(60_000), TransactionKind::International);
        assert_eq!(service.score(&huge), 100);

        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(55), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn test_assess_updates_profile() {
        let mut service = RiskAnalysisService::default();

        let first = service.assess(&tx("t1", "acc", units(60_000), TransactionKind::International));
        assert_eq!(first.level, RiskLevel::High);
        service.assess(&tx("t2", "acc", units(10), TransactionKind::Transfer));

        let profile = service.profile("acc").unwrap();
        assert_eq!(profile.latest_score, 0);
        assert_eq!(profile.peak_score, 100);
        assert_eq!(profile.assessments, 2);
        assert!(service.profile("other").is_err());
    }

    #[test]
    fn test_detect_suspicious_sorted() {
        let service = RiskAnalysisService::default();
        let batch = vec![
            tx("t1", "a", units(70_000), TransactionKind::Transfer),
            tx("t2", "a", units(100), TransactionKind::Transfer),
            tx("t3", "a", units(200), TransactionKind::International),
            tx("t4", "a", units(50_000), TransactionKind::Transfer),
        ];

        let ids: Vec<&str> = service
            .detect_suspicious(&batch)
            .iter()
            .map(|t| t.transaction_id.as_str())
            .collect();
        assert_eq!(ids, vec!["t3", "t1"]);
    }

    #[test]
    fn test_highest_risk_accounts() {
        let mut service = RiskAnalysisService::default();
        service.assess(&tx("t1", "b", units(20_000), TransactionKind::Transfer));
        service.assess(&tx("t2", "a", units(20_000), TransactionKind::Transfer));
        service.assess(&tx("t3", "c", units(60_000), TransactionKind::International));
        service.assess(&tx("t4", "d", units(10), TransactionKind::Transfer));

        let top: Vec<&str> = service
            .highest_risk_accounts(3)
            .iter()
            .map(|p| p.account.as_str())
            .collect();
        assert_eq!(top, vec!["c", "a", "b"]);
    }
}
