//! Customer entity: the person or business that owns accounts.

/// A bank customer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Customer {
    /// Immutable customer identifier (short token)
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    /// Account numbers owned by this customer, in opening order
    pub accounts: Vec<String>,
    pub is_active: bool,
    /// Registration time, Unix millis
    pub registered_at: u64,
}

impl Customer {
    /// Create an active customer with no accounts
    pub fn new(
        customer_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        registered_at: u64,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: None,
            accounts: Vec::new(),
            is_active: true,
            registered_at,
        }
    }

    /// Link an account. Returns false if it was already linked.
    pub fn add_account(&mut self, account_number: &str) -> bool {
        if self.accounts.iter().any(|a| a == account_number) {
            return false;
        }
        self.accounts.push(account_number.to_string());
        true
    }

    /// Unlink an account. Returns false if it was not linked.
    pub fn remove_account(&mut self, account_number: &str) -> bool {
        match self.accounts.iter().position(|a| a == account_number) {
            Some(pos) => {
                self.accounts.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
