use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default lifetime of a contact token
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(300);

/// Errors surfaced to reveal callers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token not found")]
    NotFound,
    #[error("token expired")]
    Expired,
}

#[derive(Debug)]
struct TokenEntry {
    phone: String,
    expires_at: Instant,
}

/// Ephemeral one-time contact token store
///
/// Maps opaque 128-bit tokens to a donor's phone number for at most one
/// reveal within the TTL window. All state lives behind a single lock; the
/// expected cardinality (tokens minted in the last five minutes) is small
/// enough that per-key sharding would buy nothing.
///
/// Expiry is evaluated lazily at reveal time. [`TokenStore::sweep_expired`]
/// exists for an optional periodic reclaim and does not change observable
/// semantics.
pub struct TokenStore {
    entries: Mutex<HashMap<String, TokenEntry>>,
    ttl: Duration,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TOKEN_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Mint a token bound to a phone number
    ///
    /// Tokens are 128 random bits, hex-encoded. A collision with a live
    /// token is vanishingly unlikely but checked anyway; the draw repeats
    /// until the identifier is unused.
    pub fn issue(&self, phone: &str) -> String {
        let expires_at = Instant::now() + self.ttl;
        let mut entries = self.entries.lock();

        loop {
            let token = format!("{:032x}", rand::thread_rng().gen::<u128>());
            if entries.contains_key(&token) {
                continue;
            }
            entries.insert(
                token.clone(),
                TokenEntry {
                    phone: phone.to_string(),
                    expires_at,
                },
            );
            return token;
        }
    }

    /// Reveal the phone number behind a token, consuming it
    ///
    /// Existence check, expiry check, and removal happen under one lock
    /// acquisition, so concurrent reveals of the same token can never both
    /// succeed. Detecting expiry deletes the entry as a side effect.
    pub fn reveal(&self, token: &str) -> Result<String, TokenError> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        match entries.remove(token) {
            None => Err(TokenError::NotFound),
            Some(entry) if entry.expires_at <= now => Err(TokenError::Expired),
            Some(entry) => Ok(entry.phone),
        }
    }

    /// Drop every expired entry, returning how many were reclaimed
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of live entries (includes not-yet-swept expired ones)
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}
