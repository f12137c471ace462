//! # Access gate middleware
//!
//! Request-level decision engine. `authenticate` establishes identity from
//! the access-token cookie or bearer header, rotating expired sessions
//! through the refresh token; `authorize` checks the principal's roles
//! against the requested path. Both pass allow-listed paths straight
//! through.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::auth::jwt::TokenCodec;
use crate::auth::permissions;
use crate::auth::refresh::RefreshCoordinator;
use crate::auth::store::CredentialStore;
use crate::auth::types::{AuthContext, Principal, RotateOutcome, TokenPair, VerifyOutcome};
use crate::config::AuthConfig;
use crate::error::Result;
use crate::gate::cookies::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, session_cookies};
use crate::gate::response;
use crate::logging::sanitize_token;

/// Path that skips authorization (but not authentication).
const AUTHORIZE_EXEMPT_PATH: &str = "/account";

/// Transient outcome of the authentication pass for one request.
#[derive(Debug)]
pub enum AuthDecision {
    /// Allow-listed path; no identity established or required
    Bypass,
    /// Token verified; identity established
    Authenticated(AuthContext),
    /// Access token expired and rotation was attempted. `Some` carries the
    /// fresh pair; `None` means the refresh token matched no principal.
    /// Either way the caller must answer the retry contract.
    RefreshRequired(Option<TokenPair>),
    /// No usable credentials on the request
    Rejected,
}

/// Shared state threaded through the gate middlewares and handlers.
#[derive(Clone)]
pub struct GateState {
    config: Arc<AuthConfig>,
    codec: Arc<TokenCodec>,
    coordinator: Arc<RefreshCoordinator>,
}

impl GateState {
    /// Build the gate state from configuration and a credential store.
    ///
    /// Fails when the signing secret is unusable; callers must treat that
    /// as fatal at startup.
    pub fn new(config: Arc<AuthConfig>, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let codec = Arc::new(TokenCodec::new(Arc::clone(&config))?);
        let coordinator = Arc::new(RefreshCoordinator::new(Arc::clone(&codec), store));

        Ok(Self {
            config,
            codec,
            coordinator,
        })
    }

    /// Configuration reference.
    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Token codec reference.
    #[must_use]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Refresh coordinator reference.
    #[must_use]
    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Run the authentication state machine for one request.
    ///
    /// Pure decision logic: no response is produced here, and the only side
    /// effect is the refresh rotation itself. Store failures propagate as
    /// errors; they are not decisions.
    pub async fn decide(
        &self,
        jar: &CookieJar,
        headers: &HeaderMap,
        path: &str,
    ) -> Result<AuthDecision> {
        if self.config.is_non_secure_path(path) {
            return Ok(AuthDecision::Bypass);
        }

        let cookie_token = jar
            .get(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string());
        let header_token = extract_bearer_token(headers);

        let Some(access_token) = cookie_token.or(header_token) else {
            return Ok(AuthDecision::Rejected);
        };

        match self.codec.verify(&access_token) {
            VerifyOutcome::Valid(claims) => Ok(AuthDecision::Authenticated(AuthContext {
                principal: claims.principal(),
                access_token,
                refresh_token: jar
                    .get(REFRESH_TOKEN_COOKIE)
                    .map(|cookie| cookie.value().to_string()),
            })),
            VerifyOutcome::Invalid => {
                tracing::debug!(
                    %path,
                    token = %sanitize_token(&access_token),
                    "rejected invalid access token"
                );
                Ok(AuthDecision::Rejected)
            }
            VerifyOutcome::Expired => {
                let Some(refresh_token) = jar
                    .get(REFRESH_TOKEN_COOKIE)
                    .map(|cookie| cookie.value().to_string())
                else {
                    return Ok(AuthDecision::Rejected);
                };

                match self.coordinator.rotate(&refresh_token).await? {
                    RotateOutcome::Rotated(pair) => {
                        Ok(AuthDecision::RefreshRequired(Some(pair)))
                    }
                    RotateOutcome::NoSuchPrincipal => Ok(AuthDecision::RefreshRequired(None)),
                }
            }
        }
    }

    /// Mint a session for an already-verified principal and return the
    /// token pair together with the cookie jar carrying both session
    /// cookies. For use by a consumer's login handler after its own
    /// credential check.
    pub async fn grant_session(
        &self,
        principal: &Principal,
        jar: CookieJar,
    ) -> Result<(TokenPair, CookieJar)> {
        let pair = self.coordinator.grant(principal).await?;
        let (access, refresh) = session_cookies(&pair, &self.config);
        Ok((pair, jar.add(access).add(refresh)))
    }
}

/// Authentication middleware.
///
/// Maps [`AuthDecision`] onto the wire contract: pass-through, attached
/// identity, 401 rejection, or the 405 retry answer with fresh cookies on
/// successful rotation.
pub async fn authenticate(
    State(state): State<GateState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let decision = match state.decide(&jar, request.headers(), &path).await {
        Ok(decision) => decision,
        Err(e) => return response::app_error(&e),
    };

    match decision {
        AuthDecision::Bypass => next.run(request).await,
        AuthDecision::Authenticated(context) => {
            request.extensions_mut().insert(Arc::new(context));
            next.run(request).await
        }
        AuthDecision::RefreshRequired(Some(pair)) => {
            let (access, refresh) = session_cookies(&pair, state.config());
            (
                jar.add(access).add(refresh),
                response::retry_with_new_token(),
            )
                .into_response()
        }
        // A failed lookup answers the same retry status as success, just
        // without new cookies. Existing contract, kept as-is; see DESIGN.md.
        AuthDecision::RefreshRequired(None) => response::retry_with_new_token(),
        AuthDecision::Rejected => response::not_authenticated(),
    }
}

/// Authorization middleware.
///
/// Runs after [`authenticate`]. Requires an attached [`AuthContext`] and a
/// role set covering the requested path; the allow-list and the account
/// page are exempt.
pub async fn authorize(State(state): State<GateState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if state.config().is_non_secure_path(&path) || path == AUTHORIZE_EXEMPT_PATH {
        return next.run(request).await;
    }

    let Some(context) = request.extensions().get::<Arc<AuthContext>>().cloned() else {
        return response::not_authenticated();
    };

    if context.principal.roles.is_empty() {
        tracing::warn!(%path, email = %context.principal.email, "principal has no roles");
        return response::permission_denied();
    }

    if permissions::can_access(&context.principal.roles, &path) {
        next.run(request).await
    } else {
        tracing::warn!(
            %path,
            email = %context.principal.email,
            "no permission rule covers path"
        );
        response::permission_denied()
    }
}

/// Extract a bearer token from the `Authorization` header.
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    if auth_header.starts_with("Bearer ") && auth_header.len() > 7 {
        Some(auth_header[7..].to_string())
    } else {
        None
    }
}
