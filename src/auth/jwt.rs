//! # Session token codec
//!
//! Signs and verifies compact, time-bounded session tokens. Pure function
//! of the configured key and its input; no side effects.

use chrono::Duration;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};
use std::sync::Arc;

use crate::auth::types::{Principal, SessionClaims, VerifyOutcome};
use crate::config::AuthConfig;
use crate::error::{GateError, Result};

/// Session token codec.
pub struct TokenCodec {
    /// Encoding key
    encoding_key: EncodingKey,
    /// Decoding key
    decoding_key: DecodingKey,
    /// Validation configuration
    validation: Validation,
    /// Authentication configuration
    config: Arc<AuthConfig>,
}

impl TokenCodec {
    /// Create a new codec from the process configuration.
    ///
    /// Fails when the signing secret is unavailable. This is fatal at
    /// startup: the process must not serve traffic without it.
    pub fn new(config: Arc<AuthConfig>) -> Result<Self> {
        if config.jwt_secret.trim().is_empty() {
            return Err(GateError::signing("signing secret is empty"));
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = config.leeway;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    /// Sign a session token for `principal` with the given lifetime.
    ///
    /// The expiry is embedded at creation; it is discovered again only at
    /// verify time.
    pub fn issue(&self, principal: &Principal, ttl: Duration) -> Result<String> {
        let claims = SessionClaims::new(principal, ttl.num_seconds());
        let header = Header::new(Algorithm::HS256);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| GateError::signing_with_source("token generation failed", e))
    }

    /// Sign a session token with the configured default lifetime.
    pub fn issue_default(&self, principal: &Principal) -> Result<String> {
        self.issue(principal, Duration::seconds(self.config.jwt_expires_in))
    }

    /// Verify a session token.
    ///
    /// Signature and expiry are checked atomically in one decode pass. A
    /// token signed with the wrong key is `Invalid`, never `Expired`; only
    /// a well-signed token past its expiry reports `Expired`.
    #[must_use]
    pub fn verify(&self, token: &str) -> VerifyOutcome {
        let decoded: std::result::Result<TokenData<SessionClaims>, _> =
            decode(token, &self.decoding_key, &self.validation);

        match decoded {
            Ok(data) => VerifyOutcome::Valid(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => VerifyOutcome::Expired,
                _ => VerifyOutcome::Invalid,
            },
        }
    }

    /// Get the configuration reference.
    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}
