//! # Refresh-token rotation
//!
//! Exchanges a still-valid refresh token for a new token pair, consuming
//! the old one. Together with [`grant`](RefreshCoordinator::grant) (the
//! login-time mint) this is the only place session tokens are created.

use std::sync::Arc;
use uuid::Uuid;

use crate::auth::jwt::TokenCodec;
use crate::auth::store::CredentialStore;
use crate::auth::types::{Principal, RotateOutcome, TokenPair};
use crate::error::Result;
use crate::logging::sanitize_token;

/// Coordinates single-slot refresh-token rotation against the credential
/// store.
///
/// Concurrent rotations for the same principal are not coordinated by a
/// lock: both may overwrite the refresh slot, the last write wins, and the
/// loser's newly issued refresh token is dead on its next use. This is an
/// accepted consistency gap, not a bug to paper over here.
pub struct RefreshCoordinator {
    codec: Arc<TokenCodec>,
    store: Arc<dyn CredentialStore>,
}

impl RefreshCoordinator {
    /// Create a new coordinator.
    #[must_use]
    pub fn new(codec: Arc<TokenCodec>, store: Arc<dyn CredentialStore>) -> Self {
        Self { codec, store }
    }

    /// Exchange `old_refresh_token` for a fresh token pair.
    ///
    /// The new access token is minted from the principal's live role and
    /// identity snapshot, re-fetched from the store rather than taken from
    /// the expired token's claims, so role changes take effect immediately.
    /// An unknown refresh token yields [`RotateOutcome::NoSuchPrincipal`];
    /// callers must reject the request rather than rotate blindly.
    pub async fn rotate(&self, old_refresh_token: &str) -> Result<RotateOutcome> {
        let Some(principal) = self.store.find_by_refresh_token(old_refresh_token).await? else {
            tracing::warn!(
                token = %sanitize_token(old_refresh_token),
                "refresh token matched no principal"
            );
            return Ok(RotateOutcome::NoSuchPrincipal);
        };

        let pair = self.mint_pair(&principal).await?;

        tracing::info!(
            email = %principal.email,
            old = %sanitize_token(old_refresh_token),
            "rotated refresh token"
        );

        Ok(RotateOutcome::Rotated(pair))
    }

    /// Mint and persist the initial token pair for an already-verified
    /// principal (the login path). Credential checking is the caller's
    /// concern.
    pub async fn grant(&self, principal: &Principal) -> Result<TokenPair> {
        let pair = self.mint_pair(principal).await?;
        tracing::info!(email = %principal.email, "granted new session");
        Ok(pair)
    }

    async fn mint_pair(&self, principal: &Principal) -> Result<TokenPair> {
        let access_token = self.codec.issue_default(principal)?;
        let refresh_token = Uuid::new_v4().to_string();

        self.store
            .overwrite_refresh_token(&principal.email, &refresh_token)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}
