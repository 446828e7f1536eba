//! Identifier and timestamp helpers.
//!
//! Account, customer and transaction identifiers are short tokens: the
//! first `len` hex characters of a random v4 UUID. Each service draws its
//! ids from an [`IdIssuer`], which remembers every token it has handed
//! out. Removing an entity never frees its id, so a closed account's number
//! is not given to a new account.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

/// Default length of short identifiers (account numbers, transaction ids)
pub const SHORT_ID_LEN: usize = 8;

/// Random draws before an issuer reports its id space as exhausted
pub const MAX_TOKEN_ATTEMPTS: usize = 1_000;

/// Generate a short random token of `len` hex characters (1 to 32)
pub fn short_token(len: usize) -> String {
    let simple = Uuid::new_v4().simple().to_string();
    simple[..len.clamp(1, simple.len())].to_string()
}

/// Hands out short tokens, never the same one twice
#[derive(Debug, Clone, Default)]
pub struct IdIssuer {
    len: usize,
    issued: HashSet<String>,
}

impl IdIssuer {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            issued: HashSet::new(),
        }
    }

    /// Draw a token this issuer has never returned before
    ///
    /// `None` once [`MAX_TOKEN_ATTEMPTS`] draws in a row collide, which in
    /// practice means the id space of this length is used up.
    pub fn issue(&mut self) -> Option<String> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = short_token(self.len);
            if !self.issued.contains(&token) {
                self.issued.insert(token.clone());
                return Some(token);
            }
        }
        None
    }

    #[inline]
    pub fn was_issued(&self, token: &str) -> bool {
        self.issued.contains(token)
    }

    #[inline]
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}

/// Full hyphenated v4 UUID, used for user ids
pub fn long_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current Unix time in milliseconds
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
