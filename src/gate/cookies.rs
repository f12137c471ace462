//! # Session cookie builders

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use crate::auth::types::TokenPair;
use crate::config::AuthConfig;

/// Name of the access-token cookie.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Name of the refresh-token cookie.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Build the access/refresh cookie pair for a freshly minted session.
///
/// Both cookies are httpOnly; max-age comes from configuration, each cookie
/// from its own setting.
pub(crate) fn session_cookies(
    pair: &TokenPair,
    config: &AuthConfig,
) -> (Cookie<'static>, Cookie<'static>) {
    let access = Cookie::build((ACCESS_TOKEN_COOKIE, pair.access_token.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(config.max_age_access_token))
        .build();

    let refresh = Cookie::build((REFRESH_TOKEN_COOKIE, pair.refresh_token.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(config.max_age_refresh_token))
        .build();

    (access, refresh)
}

/// Build removal cookies for both session cookies (logout).
pub(crate) fn clear_session_cookies() -> (Cookie<'static>, Cookie<'static>) {
    let access = Cookie::build((ACCESS_TOKEN_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build();

    let refresh = Cookie::build((REFRESH_TOKEN_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build();

    (access, refresh)
}
