use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::collections::ShortestPaths;
use crate::config::BankConfig;
use crate::error::{BankError, BankResult};
use crate::services::{
    AccountService, AnalyticsService, AuthenticationService, NetworkAnalysis, RegistrationRequest,
    RegistrationService, RiskAnalysisService, TransactionService,
};
use crate::types::money;
use crate::types::{Account, AccountType, Customer, Transaction, TransactionKind, User};

/// External call surface of the index kernel
#[derive(Debug, Clone)]
pub struct Bank {
    config: BankConfig,
    accounts: AccountService,
    registration: RegistrationService,
    transactions: TransactionService,
    risk: RiskAnalysisService,
    analytics: AnalyticsService,
}

impl Default for Bank {
    fn default() -> Self {
        Self::new(BankConfig::default())
    }
}

impl Bank {
    pub fn new(config: BankConfig) -> Self {
        info!(
            cache_buckets = config.cache_buckets,
            review_queue = config.review_queue,
            "bank initialized"
        );
        Self {
            accounts: AccountService::new(&config),
            registration: RegistrationService::new(&config),
            transactions: TransactionService::new(&config),
            risk: RiskAnalysisService::new(&config),
            analytics: AnalyticsService::new(&config),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    pub fn create_account(
        &mut self,
        customer_id: &str,
        account_type: AccountType,
        initial_balance: u64,
    ) -> BankResult<&Account> {
        self.accounts.create_account(customer_id, account_type, initial_balance)
    }

    pub fn find_account(&self, account_number: &str) -> BankResult<&Account> {
        self.accounts.find_account(account_number)
    }

    /// Accounts of `customer_id`, ascending by balance
    pub fn accounts_for_customer(&self, customer_id: &str) -> Vec<&Account> {
        self.accounts.accounts_for_customer(customer_id)
    }

    /// Remove an account; its number is never issued again
    pub fn close_account(&mut self, account_number: &str) -> BankResult<Account> {
        self.accounts.close_account(account_number)
    }

    pub fn add_customer(&mut self, first_name: &str, last_name: &str, email: &str) -> BankResult<&Customer> {
        self.accounts.add_customer(first_name, last_name, email)
    }

    pub fn find_customer(&self, customer_id: &str) -> BankResult<&Customer> {
        self.accounts.find_customer(customer_id)
    }

    /// Returns the new balance
    pub fn deposit(&mut self, account_number: &str, amount: u64) -> BankResult<u64> {
        self.accounts.deposit(account_number, amount)
    }

    /// Returns the new balance
    pub fn withdraw(&mut self, account_number: &str, amount: u64) -> BankResult<u64> {
        self.accounts.withdraw(account_number, amount)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Sign up with the minimal form; the password doubles as confirmation
    pub fn register(&mut self, username: &str, password: &str, email: &str) -> BankResult<&User> {
        self.register_with(RegistrationRequest::new(username, password, email))
    }

    /// Sign up with the full form
    ///
    /// When both names are given a [`Customer`] is created as well.
    ///
    /// The form is checked in full before anything is stored, so a rejected
    /// request leaves neither a user nor a customer behind.
    pub fn register_with(&mut self, request: RegistrationRequest) -> BankResult<&User> {
        self.registration.check(&request)?;

        let customer_id = match (request.first_name.as_deref(), request.last_name.as_deref()) {
            (Some(first), Some(last)) => {
                let customer_id = self
                    .accounts
                    .add_customer(first, last, request.email.trim())?
                    .customer_id
                    .clone();
                if let Some(phone) = request.phone_number.as_deref().filter(|p| !p.is_empty()) {
                    self.accounts.find_customer_mut(&customer_id)?.phone_number = Some(phone.to_string());
                }
                Some(customer_id)
            }
            _ => None,
        };

        let user = self.registration.register(&request)?;
        if let Some(customer_id) = customer_id {
            debug!(user = %user.username, customer = %customer_id, "customer profile created");
        }
        Ok(user)
    }

    pub fn authenticate(&mut self, username: &str, password: &str) -> BankResult<&User> {
        self.registration.auth_mut().authenticate(username, password)
    }

    pub fn change_password(&mut self, username: &str, old_password: &str, new_password: &str) -> BankResult<()> {
        self.registration
            .auth_mut()
            .change_password(username, old_password, new_password)
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Domestic transfer
    pub fn transfer(&mut self, from: &str, to: &str, amount: u64) -> BankResult<Transaction> {
        self.transfer_with_kind(from, to, amount, TransactionKind::Transfer)
    }

    /// Move `amount` between two accounts and record it
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - zero or above the money ceiling
    /// * `ValidationFailed` - `from == to`
    /// * `NotFound` - either account is unknown
    /// * `InsufficientFunds` - debit exceeds balance plus overdraft
    /// * `IdsExhausted` - no unused transaction id left
    ///
    /// On error no balance, edge or review entry changes.
    pub fn transfer_with_kind(
        &mut self,
        from: &str,
        to: &str,
        amount: u64,
        kind: TransactionKind,
    ) -> BankResult<Transaction> {
        if !money::is_valid_transfer_amount(amount) {
            warn!(from = %from, to = %to, amount, "transfer rejected: invalid amount");
            return Err(BankError::InvalidAmount(amount));
        }
        if from == to {
            warn!(account = %from, "transfer rejected: same account");
            return Err(BankError::invalid("to_account", "cannot transfer to the same account"));
        }
        let from_customer = self.accounts.find_account(from)?.customer_id.clone();
        let to_customer = self.accounts.find_account(to)?.customer_id.clone();

        // Claimed before funds move so an exhausted id space cannot strand a transfer.
        let transaction_id = self.transactions.reserve_id()?;
        if let Err(err) = self.accounts.move_funds(from, to, amount) {
            warn!(from = %from, to = %to, amount, error = %err, "transfer failed");
            return Err(err);
        }

        let transaction = self
            .transactions
            .record_reserved(transaction_id, from, to, amount, kind)?
            .clone();
        let assessment = self.risk.assess(&transaction);
        self.analytics.link_customers(&from_customer, &to_customer, amount);

        info!(
            transaction = %transaction.transaction_id,
            from = %from,
            to = %to,
            amount,
            risk = %assessment.level,
            "transfer completed"
        );
        Ok(transaction)
    }

    // ========================================================================
    // Network and review
    // ========================================================================

    /// Accounts reachable from `account` through recorded transfers
    pub fn reachable_from(&self, account: &str) -> HashSet<String> {
        self.transactions.reachable_from(account)
    }

    pub fn shortest_paths_from(&self, account: &str) -> ShortestPaths<String> {
        self.transactions.shortest_paths_from(account)
    }

    pub fn analyze_customer_network(&self, customer_id: &str) -> NetworkAnalysis {
        self.analytics.analyze_customer_network(customer_id)
    }

    /// Dequeue the most urgent transaction awaiting review
    pub fn next_for_review(&mut self) -> BankResult<Transaction> {
        self.transactions.next_for_review().cloned()
    }

    /// Recorded transactions flagged as suspicious, ascending by amount
    pub fn suspicious_transactions(&self) -> Vec<Transaction> {
        let all: Vec<Transaction> = self.transactions.transactions().cloned().collect();
        self.risk
            .detect_suspicious(&all)
            .into_iter()
            .cloned()
            .collect()
    }

    // ========================================================================
    // Services
    // ========================================================================

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn registration(&self) -> &RegistrationService {
        &self.registration
    }

    pub fn auth(&self) -> &AuthenticationService {
        self.registration.auth()
    }

    pub fn transactions(&self) -> &TransactionService {
        &self.transactions
    }

    pub fn risk(&self) -> &RiskAnalysisService {
        &self.risk
    }

    pub fn analytics(&self) -> &AnalyticsService {
        &self.analytics
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

    fn bank_with_two() -> (Bank, String, String) {
        let mut bank = Bank::default();
        let a = bank
            .create_account("c1", AccountType::Checking, units(100))
            .unwrap()
            .account_number
            .clone();
        let b = bank
            .create_account("c2", AccountType::Savings, units(10))
            .unwrap()
            .account_number
            .clone();
        (bank, a, b)
    }

    #[test]
    fn test_transfer_moves_funds() {
        let (mut bank, a, b) = bank_with_two();
        let tx = bank.transfer(&a, &b, units(40)).unwrap();

        assert_eq!(tx.from_account, a);
        assert_eq!(bank.find_account(&a).unwrap().balance, units(60));
        assert_eq!(bank.find_account(&b).unwrap().balance, units(50));
        assert!(bank.reachable_from(&a).contains(&b));
        assert_eq!(bank.risk().profile(&a).unwrap().assessments, 1);
        assert!(bank.analytics().customer_network().has_edge(&"c1".to_string(), &"c2".to_string()));
    }

    #[test]
    fn test_failed_transfer_changes_nothing() {
        let (mut bank, a, b) = bank_with_two();

        let err = bank.transfer(&a, &b, units(500)).unwrap_err();
        assert!(matches!(err, BankError::InsufficientFunds { .. }));
        assert_eq!(bank.transfer(&a, &b, 0).unwrap_err(), BankError::InvalidAmount(0));
        assert!(matches!(bank.transfer(&a, &a, 1), Err(BankError::ValidationFailed(_))));
        assert!(matches!(bank.transfer(&a, "missing", 1), Err(BankError::NotFound { .. })));

        assert_eq!(bank.find_account(&a).unwrap().balance, units(100));
        assert_eq!(bank.find_account(&b).unwrap().balance, units(10));
        assert_eq!(bank.transactions().transaction_count(), 0);
        assert_eq!(
            bank.next_for_review().unwrap_err(),
            BankError::Collection(CollectionError::EmptyQueue)
        );
    }

    #[test]
    fn test_register_and_login() {
        let mut bank = Bank::default();
        bank.register("johndoe", "SecurePass123!", "john@example.com").unwrap();

        assert!(bank.authenticate("JohnDoe", "SecurePass123!").is_ok());
        assert_eq!(
            bank.authenticate("johndoe", "wrong").unwrap_err(),
            BankError::InvalidCredentials
        );
        assert!(matches!(
            bank.register("johndoe", "SecurePass123!", "other@example.com"),
            Err(BankError::UsernameTaken(_))
        ));
    }

    #[test]
    fn test_register_with_creates_customer() {
        let mut bank = Bank::default();
        let request = RegistrationRequest::new("janedoe", "SecurePass123!", "jane@example.com")
            .name("Jane", "Doe")
            .phone("+15551234567");
        bank.register_with(request).unwrap();

        let customer = bank.accounts().customers().next().unwrap();
        assert_eq!(customer.full_name(), "Jane Doe");
        assert_eq!(customer.phone_number.as_deref(), Some("+15551234567"));
    }

    #[test]
    fn test_rejected_registration_stores_nothing() {
        let mut bank = Bank::default();
        let blank = RegistrationRequest::new("janedoe", "SecurePass123!", "jane@example.com").name(" ", "Doe");

        let err = bank.register_with(blank).unwrap_err();
        match err {
            BankError::ValidationFailed(errors) => assert!(errors.get("first_name").is_some()),
            other => panic!("unexpected error: {other}"),
        }
        assert!(bank.auth().find_user("janedoe").is_err());
        assert_eq!(bank.accounts().customers().count(), 0);

        let fixed = RegistrationRequest::new("janedoe", "SecurePass123!", "jane@example.com").name("Jane", "Doe");
        assert_eq!(bank.register_with(fixed).unwrap().username, "janedoe");
        assert_eq!(bank.accounts().customers().count(), 1);
    }

    #[test]
    fn test_change_password_needs_strong_password() {
        let mut bank = Bank::default();
        bank.register("alice", "Secr3t!@x", "alice@example.com").unwrap();

        assert!(matches!(
            bank.change_password("alice", "Secr3t!@x", "a"),
            Err(BankError::ValidationFailed(_))
        ));
        assert!(bank.authenticate("alice", "a").is_err());
        assert!(bank.authenticate("alice", "Secr3t!@x").is_ok());
    }

    #[test]
    fn test_closed_account_number_not_reissued() {
        let mut bank = Bank::new(BankConfig::new().id_len(1));
        let a = bank.create_account("c1", AccountType::Checking, units(100)).unwrap().account_number.clone();
        let b = bank.create_account("c2", AccountType::Checking, 0).unwrap().account_number.clone();
        bank.transfer(&a, &b, units(5)).unwrap();
        bank.close_account(&a).unwrap();

        let mut created = 0;
        loop {
            match bank.create_account("c3", AccountType::Savings, 0) {
                Ok(account) => {
                    assert_ne!(account.account_number, a);
                    assert_ne!(account.account_number, b);
                    created += 1;
                }
                Err(err) => {
                    assert_eq!(err, BankError::IdsExhausted { entity: "account" });
                    break;
                }
            }
        }
        assert_eq!(created, 14);
        assert!(bank.find_account(&a).is_err());
    }

    #[test]
    fn test_exhausted_transaction_ids_keep_balances() {
        let mut bank = Bank::new(BankConfig::new().id_len(1));
        let a = bank.create_account("c1", AccountType::Checking, units(100)).unwrap().account_number.clone();
        let b = bank.create_account("c2", AccountType::Checking, 0).unwrap().account_number.clone();
        for _ in 0..16 {
            bank.transfer(&a, &b, units(1)).unwrap();
        }

        assert_eq!(
            bank.transfer(&a, &b, units(1)).unwrap_err(),
            BankError::IdsExhausted { entity: "transaction" }
        );
        assert_eq!(bank.find_account(&a).unwrap().balance, units(84));
        assert_eq!(bank.find_account(&b).unwrap().balance, units(16));
        assert_eq!(bank.transactions().transaction_count(), 16);
    }

    #[test]
    fn test_review_and_suspicious() {
        let mut bank = Bank::default();
        let a = bank
            .create_account("c1", AccountType::Business, units(200_000))
            .unwrap()
            .account_number
            .clone();
        let b = bank
            .create_account("c2", AccountType::Business, 0)
            .unwrap()
            .account_number
            .clone();

        bank.transfer(&a, &b, units(10)).unwrap();
        let big = bank.transfer(&a, &b, units(60_000)).unwrap();
        bank.transfer_with_kind(&a, &b, units(20), TransactionKind::International)
            .unwrap();

        assert_eq!(bank.next_for_review().unwrap(), big);
        let suspicious: Vec<u64> = bank.suspicious_transactions().iter().map(|t| t.amount).collect();
        assert_eq!(suspicious, vec![units(20), units(60_000)]);
    }
}
