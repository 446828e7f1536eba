//! User registration and password authentication.
//!
//! ## Credentials
//!
//! Each user carries a [`Credential`]: a fresh random salt and the
//! HMAC-SHA256 of the password keyed by that salt. Verification is constant
//! time.
//!
//! ## Failure reporting
//!
//! `authenticate` returns [`BankError::InvalidCredentials`] for an unknown
//! user, a wrong password and a deactivated user alike, and emits the same
//! log line in all three cases. An unknown user is still checked against a
//! decoy credential so the three paths cost the same.

use tracing::{debug, info, warn};

use crate::collections::Registry;
use crate::config::BankConfig;
use crate::error::{BankError, BankResult};
use crate::types::ids::{long_id, now_millis};
use crate::types::{Credential, Role, User};

const MIN_PASSWORD_LEN: usize = 8;
const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Password strength rules, shared by sign-up and password change
///
/// Returns the first rule the password breaks.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.is_empty() {
        Err("password is required")
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        Err("password must be at least 8 characters")
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Err("password must contain an uppercase letter")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Err("password must contain a number")
    } else if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        Err("password must contain a special character")
    } else {
        Ok(())
    }
}

/// Usernames are case-insensitive; the lower-cased form is the index key.
#[inline]
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Owns every user and their credential
#[derive(Debug, Clone)]
pub struct AuthenticationService {
    users: Registry<String, User>,
    salt_len: usize,
    decoy: Credential,
}

impl Default for AuthenticationService {
    fn default() -> Self {
        Self::new(&BankConfig::default())
    }
}

impl AuthenticationService {
    pub fn new(config: &BankConfig) -> Self {
        Self {
            users: Registry::with_cache_config(config.cache_buckets, config.max_load_factor),
            salt_len: config.salt_len,
            decoy: Credential::derive("", config.salt_len),
        }
    }

    /// Create a user with a freshly salted credential
    ///
    /// # Errors
    ///
    /// * `ValidationFailed` - blank username or empty password
    /// * `UsernameTaken` - the lower-cased username is already registered
    pub fn register(
        &mut self,
        username: &str,
        password: &str,
        email: &str,
        role: Role,
    ) -> BankResult<&User> {
        let username = normalize_username(username);
        if username.is_empty() {
            return Err(BankError::invalid("username", "username is required"));
        }
        if password.is_empty() {
            return Err(BankError::invalid("password", "password is required"));
        }
        if self.users.contains(username.as_str()) {
            debug!(user = %username, "username already registered");
            return Err(BankError::UsernameTaken(username));
        }

        let credential = Credential::derive(password, self.salt_len);
        let user = User::new(long_id(), username.clone(), email.trim(), role, credential, now_millis());
        self.users.insert(username.clone(), user);

        info!(user = %username, role = %role, "user registered");
        self.find_user(&username)
    }

    /// Verify `password` for `username`
    ///
    /// On success `last_login` is updated and the user returned.
    pub fn authenticate(&mut self, username: &str, password: &str) -> BankResult<&User> {
        let username = normalize_username(username);

        let verified = match self.lookup(&username) {
            Some(user) => user.credential.verify(password) && user.is_active,
            None => {
                let _ = self.decoy.verify(password);
                false
            }
        };
        if !verified {
            warn!(user = %username, "authentication failed");
            return Err(BankError::InvalidCredentials);
        }

        let user = self
            .users
            .find_mut(username.as_str())
            .ok_or(BankError::InvalidCredentials)?;
        user.last_login = Some(now_millis());
        info!(user = %username, "authenticated");
        Ok(&*user)
    }

    /// Replace the credential after re-checking the old password
    ///
    /// # Errors
    ///
    /// * `InvalidCredentials` - old password does not verify
    /// * `ValidationFailed` - new password breaks a [`validate_password`] rule
    pub fn change_password(
        &mut self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> BankResult<()> {
        let username = self.authenticate(username, old_password)?.username.clone();
        if let Err(problem) = validate_password(new_password) {
            debug!(user = %username, "new password rejected");
            return Err(BankError::invalid("password", problem));
        }

        let salt_len = self.salt_len;
        let user = self
            .users
            .find_mut(username.as_str())
            .ok_or(BankError::InvalidCredentials)?;
        user.credential = Credential::derive(new_password, salt_len);

        info!(user = %username, "password changed");
        Ok(())
    }

    pub fn find_user(&self, username: &str) -> BankResult<&User> {
        let username = normalize_username(username);
        self.lookup(&username)
            .ok_or_else(|| BankError::not_found("user", username))
    }

    /// Users holding `role`, ascending by username
    pub fn users_with_role(&self, role: Role) -> Vec<&User> {
        let users: Vec<&User> = self.users.values().filter(|u| u.role == role).collect();
        debug!(role = %role, count = users.len(), "users by role");
        users
    }

    /// Block further logins for `username`
    pub fn deactivate_user(&mut self, username: &str) -> BankResult<()> {
        let username = normalize_username(username);
        let user = self
            .users
            .find_mut(username.as_str())
            .ok_or_else(|| BankError::not_found("user", username.as_str()))?;
        user.is_active = false;
        info!(user = %username, "user deactivated");
        Ok(())
    }

    /// Every user, ascending by username
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    #[inline]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Backing registry, for index diagnostics
    pub fn user_registry(&self) -> &Registry<String, User> {
        &self.users
    }

    /// Cache first, ordered index as fallback
    fn lookup(&self, username: &str) -> Option<&User> {
        self.users.find_cached(username).or_else(|| {
            let user = self.users.find_indexed(username);
            if user.is_some() {
                debug!(user = %username, "user resolved by ordered index");
            }
            user
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
