//! Session account cache
//!
//! Holds the observed identity (a hex public key) and a cached snapshot of
//! its ledger account. The cache is keyed by public key: whenever the
//! observed key differs from the cached account's key the snapshot is
//! refetched, never served stale across an identity change. With no key
//! set, the session is anonymous and `account()` yields `None` - a normal
//! state, not an error.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::ledger_client::{ApiError, LedgerClient};
use crate::models::Account;

pub struct Session {
    client: Arc<LedgerClient>,
    /// Observed identity; `None` while logged out
    public_key: RwLock<Option<String>>,
    /// Cached account snapshot for the observed identity
    cached: RwLock<Option<Account>>,
}

impl Session {
    /// Create a session, optionally already logged in.
    pub fn new(client: Arc<LedgerClient>, public_key: Option<String>) -> Result<Self> {
        if let Some(key) = &public_key {
            validate_public_key(key)?;
        }
        Ok(Self {
            client,
            public_key: RwLock::new(public_key),
            cached: RwLock::new(None),
        })
    }

    /// Switch the session to a new identity. The cached account is left in
    /// place; the key mismatch makes the next `account()` call refetch.
    pub async fn login(&self, public_key: &str) -> Result<()> {
        validate_public_key(public_key)?;
        info!(public_key, "session identity changed");
        *self.public_key.write().await = Some(public_key.to_string());
        Ok(())
    }

    /// Clear the identity and the cached account.
    pub async fn logout(&self) {
        *self.public_key.write().await = None;
        *self.cached.write().await = None;
    }

    /// The currently observed public key, if any.
    pub async fn public_key(&self) -> Option<String> {
        self.public_key.read().await.clone()
    }

    /// The session account: `None` while anonymous, the cached snapshot
    /// while the identity matches, a fresh fetch otherwise.
    ///
    /// A key the ledger has no account for also yields `None`: an
    /// unregistered identity disables actions the same way no identity
    /// does.
    pub async fn account(&self) -> Result<Option<Account>, ApiError> {
        let Some(public_key) = self.public_key().await else {
            return Ok(None);
        };

        {
            let cached = self.cached.read().await;
            if let Some(account) = cached.as_ref() {
                if account.public_key == public_key {
                    return Ok(Some(account.clone()));
                }
            }
        }

        debug!(public_key, "session cache miss, fetching account");
        let account = match self.client.get_account(&public_key).await {
            Ok(account) => account,
            Err(err) if err.is_not_found() => {
                *self.cached.write().await = None;
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        *self.cached.write().await = Some(account.clone());
        Ok(Some(account))
    }

    /// Drop the cached snapshot so the next read refetches. Flows call
    /// this after a submission settles, since asset quantities will have
    /// changed on the ledger.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }
}

fn validate_public_key(key: &str) -> Result<()> {
    if key.is_empty() {
        anyhow::bail!("public key must not be empty");
    }
    hex::decode(key).with_context(|| format!("public key {} is not valid hex", key))?;
    Ok(())
}
