//! Account and customer management.
//!
//! Accounts and customers each live in a [`Registry`]: one arena indexed by
//! both an AVL tree (ordered scans) and a hash table (point lookups).

use tracing::{debug, info};

use crate::algorithms::sort::merge_sort_by_key;
use crate::collections::Registry;
use crate::config::BankConfig;
use crate::error::{BankError, BankResult, ValidationErrors};
use crate::types::ids::{now_millis, IdIssuer};
use crate::types::money::MAX_AMOUNT;
use crate::types::{Account, AccountType, Customer};

/// Account search criteria
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountQuery {
    /// Exact account number, resolved through the registry
    AccountNumber(String),
    /// Case-insensitive substring of the owning customer id
    CustomerId(String),
    /// Case-insensitive substring of the account type name
    AccountType(String),
}

/// Owns every account and customer
#[derive(Debug, Clone)]
pub struct AccountService {
    accounts: Registry<String, Account>,
    customers: Registry<String, Customer>,
    account_ids: IdIssuer,
    customer_ids: IdIssuer,
    default_overdraft: u64,
}

impl Default for AccountService {
    fn default() -> Self {
        Self::new(&BankConfig::default())
    }
}

impl AccountService {
    pub fn new(config: &BankConfig) -> Self {
        Self {
            accounts: Registry::with_cache_config(config.cache_buckets, config.max_load_factor),
            customers: Registry::with_cache_config(config.cache_buckets, config.max_load_factor),
            account_ids: IdIssuer::new(config.id_len),
            customer_ids: IdIssuer::new(config.id_len),
            default_overdraft: config.default_overdraft,
        }
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Open an account for `customer_id`
    ///
    /// The account number is a fresh short token. If the customer is
    /// registered, the account is linked to them.
    ///
    /// # Errors
    ///
    /// * `ValidationFailed` - empty customer id
    /// * `InvalidAmount` - initial balance above [`MAX_AMOUNT`]
    pub fn create_account(
        &mut self,
        customer_id: &str,
        account_type: AccountType,
        initial_balance: u64,
    ) -> BankResult<&Account> {
        let customer_id = customer_id.trim();
        if customer_id.is_empty() {
            return Err(BankError::invalid("customer_id", "customer id is required"));
        }
        if initial_balance > MAX_AMOUNT {
            return Err(BankError::InvalidAmount(initial_balance));
        }

        let number = self
            .account_ids
            .issue()
            .ok_or(BankError::IdsExhausted { entity: "account" })?;
        let account = Account::new(
            number.clone(),
            customer_id,
            account_type,
            initial_balance,
            now_millis(),
        )
        .with_overdraft(self.default_overdraft);

        if let Some(customer) = self.customers.find_mut(customer_id) {
            customer.add_account(&number);
        }
        self.accounts.insert(number.clone(), account);

        info!(
            account = %number,
            customer = %customer_id,
            kind = %account_type,
            balance = initial_balance,
            "account created"
        );
        self.find_account(&number)
    }

    /// Look up an account: cache first, tree fallback
    pub fn find_account(&self, account_number: &str) -> BankResult<&Account> {
        debug!(account = %account_number, "account lookup");
        self.accounts
            .find(account_number)
            .ok_or_else(|| BankError::not_found("account", account_number))
    }

    pub fn find_account_mut(&mut self, account_number: &str) -> BankResult<&mut Account> {
        self.accounts
            .find_mut(account_number)
            .ok_or_else(|| BankError::not_found("account", account_number))
    }

    /// Accounts owned by `customer_id`, ascending by balance
    pub fn accounts_for_customer(&self, customer_id: &str) -> Vec<&Account> {
        let mut owned: Vec<&Account> = self
            .accounts
            .values()
            .filter(|account| account.customer_id == customer_id)
            .collect();
        merge_sort_by_key(&mut owned, |account| account.balance);
        owned
    }

    /// Search accounts by number, customer or type
    pub fn search(&self, query: &AccountQuery) -> Vec<&Account> {
        match query {
            AccountQuery::AccountNumber(number) => self.accounts.find(number.as_str()).into_iter().collect(),
            AccountQuery::CustomerId(term) => {
                let needle = term.to_lowercase();
                self.accounts
                    .values()
                    .filter(|a| a.customer_id.to_lowercase().contains(&needle))
                    .collect()
            }
            AccountQuery::AccountType(term) => {
                let needle = term.to_lowercase();
                self.accounts
                    .values()
                    .filter(|a| a.account_type.as_str().to_lowercase().contains(&needle))
                    .collect()
            }
        }
    }

    /// Credit an account, returning the new balance
    pub fn deposit(&mut self, account_number: &str, amount: u64) -> BankResult<u64> {
        let account = self.find_account_mut(account_number)?;
        account.deposit(amount)?;
        info!(account = %account_number, amount, balance = account.balance, "deposit");
        Ok(account.balance)
    }

    /// Debit an account (overdraft permitting), returning the new balance
    pub fn withdraw(&mut self, account_number: &str, amount: u64) -> BankResult<u64> {
        let account = self.find_account_mut(account_number)?;
        account.withdraw(amount)?;
        info!(account = %account_number, amount, balance = account.balance, "withdrawal");
        Ok(account.balance)
    }

    /// Move `amount` from one account to another
    ///
    /// Both legs are applied to copies first and written back only when
    /// both succeed, so a failure leaves either balance untouched.
    pub fn move_funds(&mut self, from: &str, to: &str, amount: u64) -> BankResult<()> {
        let mut debit = self.find_account(from)?.clone();
        let mut credit = self.find_account(to)?.clone();

        debit.withdraw(amount)?;
        credit.deposit(amount)?;

        self.accounts.insert(debit.account_number.clone(), debit);
        self.accounts.insert(credit.account_number.clone(), credit);
        Ok(())
    }

    /// Remove an account from every index and unlink it from its customer
    pub fn close_account(&mut self, account_number: &str) -> BankResult<Account> {
        let mut account = self
            .accounts
            .remove(account_number)
            .ok_or_else(|| BankError::not_found("account", account_number))?;
        account.is_active = false;

        if let Some(customer) = self.customers.find_mut(account.customer_id.as_str()) {
            customer.remove_account(account_number);
        }
        info!(account = %account_number, balance = account.balance, "account closed");
        Ok(account)
    }

    /// Every account, ascending by account number
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    #[inline]
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Backing registry, for index diagnostics
    pub fn account_registry(&self) -> &Registry<String, Account> {
        &self.accounts
    }

    // ========================================================================
    // Customers
    // ========================================================================

    /// Register a customer under a fresh id
    pub fn add_customer(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> BankResult<&Customer> {
        let mut errors = ValidationErrors::new();
        if first_name.trim().is_empty() {
            errors.add("first_name", "first name is required");
        }
        if last_name.trim().is_empty() {
            errors.add("last_name", "last name is required");
        }
        if !email.contains('@') {
            errors.add("email", "invalid email address");
        }
        errors.into_result()?;

        let id = self
            .customer_ids
            .issue()
            .ok_or(BankError::IdsExhausted { entity: "customer" })?;
        let customer = Customer::new(
            id.clone(),
            first_name.trim(),
            last_name.trim(),
            email.trim(),
            now_millis(),
        );
        self.customers.insert(id.clone(), customer);

        info!(customer = %id, "customer registered");
        self.find_customer(&id)
    }

    pub fn find_customer(&self, customer_id: &str) -> BankResult<&Customer> {
        self.customers
            .find(customer_id)
            .ok_or_else(|| BankError::not_found("customer", customer_id))
    }

    pub fn find_customer_mut(&mut self, customer_id: &str) -> BankResult<&mut Customer> {
        self.customers
            .find_mut(customer_id)
            .ok_or_else(|| BankError::not_found("customer", customer_id))
    }

    /// Every customer, ascending by id
    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
