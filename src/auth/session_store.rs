//! In-memory session store: opaque token to user id.
//!
//! Sessions live for the lifetime of the process; there is no expiry or
//! persistence. All operations go through one async mutex so that token
//! uniqueness holds under concurrent logins and destroy cannot race a lookup.

use anyhow::{Context, Result};
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Owned, lockable mapping from session token to user id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Uuid>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a session for `user_id` and return its fresh token.
    ///
    /// On the theoretical token collision the token is regenerated until
    /// unique. A user may hold any number of live sessions.
    pub async fn create(&self, user_id: Uuid) -> Result<String> {
        let mut sessions = self.sessions.lock().await;
        loop {
            let token = generate_token()?;
            if !sessions.contains_key(&token) {
                sessions.insert(token.clone(), user_id);
                return Ok(token);
            }
        }
    }

    /// Resolve a token to its user id; `None` for unknown tokens.
    pub async fn lookup(&self, token: &str) -> Option<Uuid> {
        self.sessions.lock().await.get(token).copied()
    }

    /// Remove a session. Returns `false` when the token is unknown, so a
    /// second destroy of the same token reports `false`. A destroyed token
    /// never resolves again.
    pub async fn destroy(&self, token: &str) -> bool {
        self.sessions.lock().await.remove(token).is_some()
    }
}

/// Create a new session token for the auth cookie.
/// The raw value is only handed to the client; nothing else is derived from it.
fn generate_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}
