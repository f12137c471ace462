//! # Credential store contract
//!
//! The gateway never owns user/role data. It reaches the credential domain
//! through this trait; the persistent implementation lives with the
//! consumer. An in-memory implementation is provided for tests and for the
//! default binary wiring.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::auth::types::Principal;
use crate::error::{GateError, Result};

/// Abstract lookup of principal data by refresh token, plus the single-slot
/// refresh-token overwrite.
///
/// `overwrite_refresh_token` must be effectively atomic per principal:
/// concurrent rotations for the same principal may race, and last-writer-
/// wins is acceptable, but the stored value must never be corrupted.
/// I/O failures surface as [`GateError::Store`] and are never folded into
/// "not found".
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find the principal currently holding `token` as its refresh token.
    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Principal>>;

    /// Replace the principal's refresh token. The prior value becomes
    /// permanently unusable.
    async fn overwrite_refresh_token(&self, email: &str, new_token: &str) -> Result<()>;
}

/// One stored account: live principal data plus the single refresh slot.
#[derive(Debug, Clone)]
struct Account {
    principal: Principal,
    refresh_token: Option<String>,
}

/// In-memory credential store keyed by principal email.
///
/// Per-principal atomicity comes from the map's per-entry locking.
#[derive(Default)]
pub struct MemoryCredentialStore {
    accounts: DashMap<String, Account>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a principal, clearing any stored refresh token.
    pub fn upsert_principal(&self, principal: Principal) {
        self.accounts.insert(
            principal.email.clone(),
            Account {
                principal,
                refresh_token: None,
            },
        );
    }

    /// Update the role set of an existing principal in place.
    ///
    /// Returns false when the principal is unknown.
    pub fn update_roles(&self, email: &str, roles: Vec<crate::auth::types::Role>) -> bool {
        self.accounts.get_mut(email).is_some_and(|mut account| {
            account.principal.roles = roles;
            true
        })
    }

    /// Current refresh token of a principal, if any. Test and demo helper.
    #[must_use]
    pub fn refresh_token_of(&self, email: &str) -> Option<String> {
        self.accounts
            .get(email)
            .and_then(|account| account.refresh_token.clone())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Principal>> {
        if token.is_empty() {
            return Ok(None);
        }

        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.refresh_token.as_deref() == Some(token))
            .map(|entry| entry.principal.clone()))
    }

    async fn overwrite_refresh_token(&self, email: &str, new_token: &str) -> Result<()> {
        let mut account = self
            .accounts
            .get_mut(email)
            .ok_or_else(|| GateError::principal_not_found(email.to_string()))?;
        account.refresh_token = Some(new_token.to_string());
        Ok(())
    }
}
