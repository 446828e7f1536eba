//! User entity and password credential.
//!
//! ## Credential Format
//!
//! - `salt`: `salt_len` random bytes from the OS RNG, hex encoded
//! - `password_hash`: HMAC-SHA256 keyed by the salt over the UTF-8
//!   password, hex encoded
//!
//! The plaintext password is never stored. Verification recomputes the MAC
//! and compares it in constant time (`Mac::verify_slice`).

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::error::BankError;

type HmacSha256 = Hmac<Sha256>;

/// Default salt length in bytes
pub const DEFAULT_SALT_LEN: usize = 16;

// ============================================================================
// Role enum
// ============================================================================

/// Authorization role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Role {
    #[default]
    Customer,
    Teller,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Teller => "teller",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "teller" => Ok(Role::Teller),
            "admin" => Ok(Role::Admin),
            _ => Err(BankError::invalid("role", "unknown role")),
        }
    }
}

// ============================================================================
// Credential
// ============================================================================

/// Salted keyed hash of a password.
///
/// Salt and hash are only ever replaced together.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    password_hash: String,
    salt: String,
}

impl Credential {
    /// Derive a credential for `password` under a fresh random salt
    ///
    /// # Example
    ///
    /// ```
    /// use vault_index::types::Credential;
    ///
    /// let credential = Credential::derive("Secr3t!@", 16);
    /// assert!(credential.verify("Secr3t!@"));
    /// assert!(!credential.verify("secr3t!@"));
    /// ```
    pub fn derive(password: &str, salt_len: usize) -> Self {
        let mut salt = vec![0u8; salt_len.max(1)];
        OsRng.fill_bytes(&mut salt);
        Self::with_salt(password, &salt)
    }

    /// Derive a credential under a caller-supplied salt
    pub fn with_salt(password: &str, salt: &[u8]) -> Self {
        let mac = Self::keyed_hash(password, salt);
        Self {
            password_hash: hex::encode(mac),
            salt: hex::encode(salt),
        }
    }

    /// Constant-time check of `password` against the stored hash
    pub fn verify(&self, password: &str) -> bool {
        let (Ok(salt), Ok(expected)) = (hex::decode(&self.salt), hex::decode(&self.password_hash))
        else {
            return false;
        };

        let mut mac = Self::mac(&salt);
        mac.update(password.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }

    /// Hex-encoded password hash
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Hex-encoded salt
    pub fn salt(&self) -> &str {
        &self.salt
    }

    fn keyed_hash(password: &str, salt: &[u8]) -> [u8; 32] {
        let mut mac = Self::mac(salt);
        mac.update(password.as_bytes());
        mac.finalize().into_bytes().into()
    }

    fn mac(key: &[u8]) -> HmacSha256 {
        HmacSha256::new_from_slice(key).expect("HMAC can take key of any size")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("password_hash", &"<redacted>")
            .field("salt", &self.salt)
            .finish()
    }
}

// ============================================================================
// User struct
// ============================================================================

/// An authenticated principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Immutable user id (UUID)
    pub user_id: String,

    /// Lower-cased login name, the index key
    pub username: String,

    pub email: String,

    pub role: Role,

    /// Password material
    pub credential: Credential,

    pub is_active: bool,

    /// Last successful login, Unix millis
    pub last_login: Option<u64>,

    /// Creation time, Unix millis
    pub created_at: u64,
}

impl User {
    /// Create an active user
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        credential: Credential,
        created_at: u64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            email: email.into(),
            role,
            credential,
            is_active: true,
            last_login: None,
            created_at,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
