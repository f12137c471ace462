//! # Authentication type definitions
//!
//! Data structures shared by the token codec, the refresh coordinator and
//! the request gate.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// An authenticated identity and its role set.
///
/// Produced by [`CredentialStore`](crate::auth::store::CredentialStore)
/// lookups, embedded as the session-token payload and attached to requests
/// as part of [`AuthContext`]. Immutable once attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Primary identifier
    pub email: String,
    /// Display name
    pub username: String,
    /// Roles granted to this principal
    pub roles: Vec<Role>,
}

/// A named role owning a set of URL permission rules.
///
/// Owned by the credential domain; read-only to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role name
    pub name: String,
    /// Permitted URL patterns
    pub rules: Vec<PermissionRule>,
}

/// A single permitted URL pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    /// URL pattern; matching semantics live in
    /// [`can_access`](crate::auth::permissions::can_access)
    pub url: String,
}

impl PermissionRule {
    /// Convenience constructor.
    pub fn new<T: Into<String>>(url: T) -> Self {
        Self { url: url.into() }
    }
}

/// JWT payload for a session token.
///
/// Created only by the token codec; callers never pre-check expiry — it is
/// discovered at verify time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Principal identifier (email)
    pub sub: String,
    /// Display name
    pub username: String,
    /// Role snapshot at issue time
    pub roles: Vec<Role>,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims for `principal` expiring `expires_in_seconds` from now.
    #[must_use]
    pub fn new(principal: &Principal, expires_in_seconds: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: principal.email.clone(),
            username: principal.username.clone(),
            roles: principal.roles.clone(),
            iat: now,
            exp: now + expires_in_seconds,
        }
    }

    /// Reconstruct the principal embedded in these claims.
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal {
            email: self.sub.clone(),
            username: self.username.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// Outcome of verifying a session token.
///
/// A three-way result rather than a boolean: only `Expired` triggers
/// refresh rotation, so callers must branch on it distinctly from
/// `Invalid`.
#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    /// Signature and expiry both check out
    Valid(SessionClaims),
    /// Signature checks out but the token is past its expiry
    Expired,
    /// Malformed token or bad signature; terminal
    Invalid,
}

/// A freshly minted access/refresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed session token
    pub access_token: String,
    /// Opaque single-slot refresh token
    pub refresh_token: String,
}

/// Outcome of a refresh-token rotation attempt.
#[derive(Debug, Clone)]
pub enum RotateOutcome {
    /// Rotation succeeded; the old refresh token is now dead
    Rotated(TokenPair),
    /// The presented refresh token matched no stored principal
    NoSuchPrincipal,
}

/// Identity attached to a request by the authenticate layer.
///
/// Threaded to downstream handlers through request extensions instead of
/// mutating ad-hoc fields onto the request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The verified principal
    pub principal: Principal,
    /// Raw access token the request carried
    pub access_token: String,
    /// Raw refresh token cookie, when present
    pub refresh_token: Option<String>,
}
