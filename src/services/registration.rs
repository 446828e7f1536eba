//! Self-service sign-up: form validation, duplicate checks, secondary
//! indexes.
//!
//! ## Field rules
//!
//! | Field | Rule |
//! |-------|------|
//! | username | 3+ characters of `[A-Za-z0-9_]` |
//! | password | 8+ characters, one upper-case letter, one digit, one of `!@#$%^&*(),.?":{}\|<>` |
//! | confirm_password | equals password |
//! | email | `local@domain.tld` |
//! | first_name, last_name | optional, but both or neither, non-blank |
//! | phone_number | optional, `^\+?1?\d{10,14}$` |
//!
//! Every failing field is reported, one message per field.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::collections::{FastLookupCache, KeyedIndex};
use crate::config::BankConfig;
use crate::error::{BankError, BankResult, ValidationErrors};
use crate::services::auth::{normalize_username, validate_password, AuthenticationService};
use crate::types::{Role, User};

const MIN_USERNAME_LEN: usize = 3;

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid username pattern"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?1?\d{10,14}$").expect("valid phone pattern"))
}

// ============================================================================
// Request
// ============================================================================

/// Sign-up form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Role,
}

impl RegistrationRequest {
    /// Minimal form; the confirmation is pre-filled with `password`
    pub fn new(username: impl Into<String>, password: impl Into<String>, email: impl Into<String>) -> Self {
        let password = password.into();
        Self {
            username: username.into(),
            confirm_password: password.clone(),
            password,
            email: email.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn confirm(mut self, confirm_password: impl Into<String>) -> Self {
        self.confirm_password = confirm_password.into();
        self
    }

    #[must_use]
    pub fn name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Check every field; empty when the form is acceptable
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.add("username", "username is required");
        } else if username.chars().count() < MIN_USERNAME_LEN {
            errors.add("username", "username must be at least 3 characters");
        } else if !username_pattern().is_match(username) {
            errors.add("username", "username can only contain letters, numbers and underscores");
        }

        if let Err(problem) = validate_password(&self.password) {
            errors.add("password", problem);
        }

        if self.password != self.confirm_password {
            errors.add("confirm_password", "passwords do not match");
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.add("email", "email is required");
        } else if !email_pattern().is_match(email) {
            errors.add("email", "invalid email format");
        }

        // Names are optional as a pair; one without the other is an error.
        if self.first_name.is_some() || self.last_name.is_some() {
            if self.first_name.as_deref().map_or(true, |n| n.trim().is_empty()) {
                errors.add("first_name", "first name is required");
            }
            if self.last_name.as_deref().map_or(true, |n| n.trim().is_empty()) {
                errors.add("last_name", "last name is required");
            }
        }

        if let Some(phone) = self.phone_number.as_deref().filter(|p| !p.is_empty()) {
            if !phone_pattern().is_match(phone) {
                errors.add("phone_number", "invalid phone number format");
            }
        }

        errors
    }
}

/// Filter for [`RegistrationService::users_matching`]. Unset fields match
/// anything; set fields compare case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCriteria {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UserCriteria {
    fn matches(&self, user: &User) -> bool {
        let eq = |want: &Option<String>, have: &str| {
            want.as_deref().map_or(true, |w| w.eq_ignore_ascii_case(have))
        };
        eq(&self.username, &user.username)
            && eq(&self.email, &user.email)
            && self.role.map_or(true, |r| r == user.role)
            && self.is_active.map_or(true, |a| a == user.is_active)
    }
}

// ============================================================================
// Service
// ============================================================================

/// Validates sign-ups and keeps the id and email indexes
#[derive(Debug, Clone)]
pub struct RegistrationService {
    auth: AuthenticationService,
    /// user id -> username
    users_by_id: KeyedIndex<String, String>,
    /// lower-cased email -> username
    email_index: FastLookupCache<String, String>,
}

impl Default for RegistrationService {
    fn default() -> Self {
        Self::new(&BankConfig::default())
    }
}

impl RegistrationService {
    pub fn new(config: &BankConfig) -> Self {
        Self::with_auth(AuthenticationService::new(config), config)
    }

    /// Wrap an existing authentication service
    pub fn with_auth(auth: AuthenticationService, config: &BankConfig) -> Self {
        Self {
            auth,
            users_by_id: KeyedIndex::new(),
            email_index: FastLookupCache::with_config(config.cache_buckets, config.max_load_factor),
        }
    }

    /// Validate and register a new user
    ///
    /// # Errors
    ///
    /// * `ValidationFailed` - with every failing field
    /// * `UsernameTaken` - username already registered
    /// * `AlreadyExists` - email already registered
    pub fn register(&mut self, request: &RegistrationRequest) -> BankResult<&User> {
        self.check(request)?;

        let username = normalize_username(&request.username);
        let email_key = request.email.trim().to_lowercase();

        let user_id = self
            .auth
            .register(&username, &request.password, request.email.trim(), request.role)?
            .user_id
            .clone();
        self.users_by_id.insert(user_id.clone(), username.clone());
        self.email_index.insert(email_key, username.clone());

        info!(user = %username, id = %user_id, "registration complete");
        self.auth.find_user(&username)
    }

    /// Everything [`register`](Self::register) rejects, without registering
    pub fn check(&self, request: &RegistrationRequest) -> BankResult<()> {
        request.validate().into_result()?;

        let username = normalize_username(&request.username);
        if self.auth.find_user(&username).is_ok() {
            return Err(BankError::UsernameTaken(username));
        }
        if self.email_index.contains(request.email.trim().to_lowercase().as_str()) {
            debug!(user = %username, "email already registered");
            return Err(BankError::already_exists("email", request.email.trim()));
        }
        Ok(())
    }

    pub fn find_by_email(&self, email: &str) -> BankResult<&User> {
        let username = self
            .email_index
            .get(email.trim().to_lowercase().as_str())
            .map_err(|_| BankError::not_found("user", email))?;
        self.auth.find_user(username)
    }

    pub fn find_by_id(&self, user_id: &str) -> BankResult<&User> {
        let username = self
            .users_by_id
            .find(user_id)
            .ok_or_else(|| BankError::not_found("user", user_id))?;
        self.auth.find_user(username)
    }

    /// Registered users matching `criteria`, ascending by user id
    pub fn users_matching(&self, criteria: &UserCriteria) -> Vec<&User> {
        self.users_by_id
            .iter()
            .filter_map(|(_, username)| self.auth.find_user(username).ok())
            .filter(|user| criteria.matches(user))
            .collect()
    }

    #[inline]
    pub fn registered_count(&self) -> usize {
        self.users_by_id.len()
    }

    pub fn auth(&self) -> &AuthenticationService {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthenticationService {
        &mut self.auth
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
