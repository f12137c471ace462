//! # Gate integration tests
//!
//! Drives the assembled router end to end: allow-list bypass, the
//! authenticate/authorize chain, refresh rotation with its retry contract,
//! and the peer-service verification probe.

use axum::{
    Extension, Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::get,
};
use chrono::Duration;
use std::sync::Arc;
use tower::ServiceExt;

use auth_gate::auth::jwt::TokenCodec;
use auth_gate::auth::store::{CredentialStore, MemoryCredentialStore};
use auth_gate::auth::types::{AuthContext, PermissionRule, Principal, Role};
use auth_gate::config::AuthConfig;
use auth_gate::error::GateError;
use auth_gate::gate::{GateState, gate_router};

/// Shared test environment: seeded store, assembled router and a codec
/// signing with the same secret as the gate.
struct GateTestSuite {
    router: Router,
    codec: TokenCodec,
    store: Arc<MemoryCredentialStore>,
}

impl GateTestSuite {
    fn setup() -> Self {
        let config = Arc::new(AuthConfig {
            jwt_secret: "gate-flow-test-secret-key".to_string(),
            ..AuthConfig::default()
        });

        let store = Arc::new(MemoryCredentialStore::new());
        store.upsert_principal(member());
        store.upsert_principal(admin());
        store.upsert_principal(roleless());

        let dyn_store: Arc<dyn CredentialStore> = Arc::clone(&store) as Arc<dyn CredentialStore>;
        let state = GateState::new(Arc::clone(&config), dyn_store).unwrap();
        let router = gate_router(state.clone(), demo_app(state));
        let codec = TokenCodec::new(config).unwrap();

        Self {
            router,
            codec,
            store,
        }
    }

    async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

fn member() -> Principal {
    Principal {
        email: "member@test.com".to_string(),
        username: "member".to_string(),
        roles: vec![Role {
            name: "member".to_string(),
            rules: vec![PermissionRule::new("/user/read")],
        }],
    }
}

fn admin() -> Principal {
    Principal {
        email: "admin@test.com".to_string(),
        username: "admin".to_string(),
        roles: vec![Role {
            name: "admin".to_string(),
            rules: vec![PermissionRule::new("/admin")],
        }],
    }
}

fn roleless() -> Principal {
    Principal {
        email: "norole@test.com".to_string(),
        username: "norole".to_string(),
        roles: vec![],
    }
}

/// Downstream application router. The login handler stands in for a
/// consumer that has already verified credentials and asks the gate for a
/// session.
fn demo_app(state: GateState) -> Router {
    use axum::extract::State;
    use axum::response::IntoResponse;
    use axum_extra::extract::cookie::CookieJar;

    async fn login_page() -> &'static str {
        "login page"
    }
    async fn login(State(state): State<GateState>, jar: CookieJar) -> axum::response::Response {
        let (_, jar) = state.grant_session(&member(), jar).await.unwrap();
        (jar, "logged in").into_response()
    }
    async fn user_read(Extension(context): Extension<Arc<AuthContext>>) -> String {
        context.principal.email.clone()
    }
    async fn account_page() -> &'static str {
        "account"
    }
    async fn admin_users() -> &'static str {
        "admin users"
    }

    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/user/read", get(user_read))
        .route("/account", get(account_page))
        .route("/admin/users", get(admin_users))
        .with_state(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn set_cookies(response: &axum::response::Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn cookie_value(set_cookies: &[String], name: &str) -> Option<String> {
    set_cookies.iter().find_map(|raw| {
        let (pair, _) = raw.split_once(';').unwrap_or((raw, ""));
        let (cookie_name, value) = pair.split_once('=')?;
        (cookie_name == name).then(|| value.to_string())
    })
}

#[tokio::test]
async fn allow_listed_path_reaches_downstream_without_credentials() {
    let suite = GateTestSuite::setup();

    let response = suite
        .send(Request::builder().uri("/login").body(Body::empty()).unwrap())
        .await;

    // Status comes from the handler, not from the gate.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "login page");
}

#[tokio::test]
async fn missing_credentials_are_rejected() {
    let suite = GateTestSuite::setup();

    let response = suite
        .send(
            Request::builder()
                .uri("/user/read")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["EC"], -1);
    assert_eq!(body["EM"], "Not authenticated the user");
}

#[tokio::test]
async fn valid_cookie_token_reaches_the_handler() {
    let suite = GateTestSuite::setup();
    let token = suite.codec.issue(&member(), Duration::hours(1)).unwrap();

    let response = suite
        .send(
            Request::builder()
                .uri("/user/read")
                .header(header::COOKIE, format!("access_token={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    // The handler sees the typed AuthContext, not raw claims.
    assert_eq!(body_text(response).await, "member@test.com");
}

#[tokio::test]
async fn bearer_header_is_accepted_as_alternative() {
    let suite = GateTestSuite::setup();
    let token = suite.codec.issue(&member(), Duration::hours(1)).unwrap();

    let response = suite
        .send(
            Request::builder()
                .uri("/user/read")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn invalid_token_is_rejected() {
    let suite = GateTestSuite::setup();

    let response = suite
        .send(
            Request::builder()
                .uri("/user/read")
                .header(header::COOKIE, "access_token=not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_with_refresh_rotates_and_demands_retry() {
    let suite = GateTestSuite::setup();
    suite
        .store
        .overwrite_refresh_token("member@test.com", "rt-initial")
        .await
        .unwrap();

    let expired = suite
        .codec
        .issue(&member(), Duration::seconds(-120))
        .unwrap();

    let response = suite
        .send(
            Request::builder()
                .uri("/user/read")
                .header(
                    header::COOKIE,
                    format!("access_token={expired}; refresh_token=rt-initial"),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let cookies = set_cookies(&response);
    let new_access = cookie_value(&cookies, "access_token").expect("new access cookie");
    let new_refresh = cookie_value(&cookies, "refresh_token").expect("new refresh cookie");
    assert_ne!(new_refresh, "rt-initial");
    assert!(
        matches!(
            suite.codec.verify(&new_access),
            auth_gate::auth::types::VerifyOutcome::Valid(_)
        ),
        "rotated access token must verify"
    );

    let body = body_json(response).await;
    assert_eq!(body["EM"], "Need to retry with new token!");

    // The consumed refresh token must not rotate again: same retry status,
    // but no cookies this time.
    let replay = suite
        .send(
            Request::builder()
                .uri("/user/read")
                .header(
                    header::COOKIE,
                    format!("access_token={expired}; refresh_token=rt-initial"),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(replay.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(set_cookies(&replay).is_empty());
}

#[tokio::test]
async fn expired_token_without_refresh_is_rejected() {
    let suite = GateTestSuite::setup();
    let expired = suite
        .codec
        .issue(&member(), Duration::seconds(-120))
        .unwrap();

    let response = suite
        .send(
            Request::builder()
                .uri("/user/read")
                .header(header::COOKIE, format!("access_token={expired}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_not_covering_path_is_forbidden() {
    let suite = GateTestSuite::setup();
    let token = suite.codec.issue(&member(), Duration::hours(1)).unwrap();

    let response = suite
        .send(
            Request::builder()
                .uri("/admin/users")
                .header(header::COOKIE, format!("access_token={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["EM"], "you don't permission to access this resource...");
}

#[tokio::test]
async fn admin_role_covers_admin_paths_by_containment() {
    let suite = GateTestSuite::setup();
    let token = suite.codec.issue(&admin(), Duration::hours(1)).unwrap();

    let response = suite
        .send(
            Request::builder()
                .uri("/admin/users")
                .header(header::COOKIE, format!("access_token={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "admin users");
}

#[tokio::test]
async fn empty_role_set_is_forbidden() {
    let suite = GateTestSuite::setup();
    let token = suite.codec.issue(&roleless(), Duration::hours(1)).unwrap();

    let response = suite
        .send(
            Request::builder()
                .uri("/user/read")
                .header(header::COOKIE, format!("access_token={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn account_page_skips_authorization_but_not_authentication() {
    let suite = GateTestSuite::setup();

    // Authenticated principal whose roles do not cover /account.
    let token = suite.codec.issue(&roleless(), Duration::hours(1)).unwrap();
    let response = suite
        .send(
            Request::builder()
                .uri("/account")
                .header(header::COOKIE, format!("access_token={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "account");

    // Anonymous requests still fail authentication.
    let anonymous = suite
        .send(
            Request::builder()
                .uri("/account")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn service_token_probe_acknowledges_valid_bearer() {
    let suite = GateTestSuite::setup();
    let token = suite.codec.issue(&member(), Duration::hours(1)).unwrap();

    let response = suite
        .send(
            Request::builder()
                .uri("/verify-service-jwt")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["EC"], 0);
    assert_eq!(body["EM"], "verify the user");
}

#[tokio::test]
async fn service_token_probe_rejects_tampered_and_missing_tokens() {
    let suite = GateTestSuite::setup();
    let token = suite.codec.issue(&member(), Duration::hours(1)).unwrap();
    let mut tampered = token.clone();
    tampered.push('x');

    let bad = suite
        .send(
            Request::builder()
                .uri("/verify-service-jwt")
                .header(header::AUTHORIZATION, format!("Bearer {tampered}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);

    let missing = suite
        .send(
            Request::builder()
                .uri("/verify-service-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    // Expired tokens are not acceptable for the peer probe either.
    let expired = suite
        .codec
        .issue(&member(), Duration::seconds(-120))
        .unwrap();
    let stale = suite
        .send(
            Request::builder()
                .uri("/verify-service-jwt")
                .header(header::AUTHORIZATION, format!("Bearer {expired}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn granted_session_cookies_authenticate_subsequent_requests() {
    let suite = GateTestSuite::setup();

    let login = suite
        .send(
            Request::builder()
                .method("POST")
                .uri("/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(login.status(), StatusCode::OK);

    let cookies = set_cookies(&login);
    let access = cookie_value(&cookies, "access_token").expect("access cookie");
    let refresh = cookie_value(&cookies, "refresh_token").expect("refresh cookie");

    // The granted refresh token landed in the store's single slot.
    assert_eq!(
        suite.store.refresh_token_of("member@test.com").as_deref(),
        Some(refresh.as_str())
    );

    let response = suite
        .send(
            Request::builder()
                .uri("/user/read")
                .header(
                    header::COOKIE,
                    format!("access_token={access}; refresh_token={refresh}"),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "member@test.com");
}

#[tokio::test]
async fn logout_clears_both_session_cookies() {
    let suite = GateTestSuite::setup();

    let response = suite
        .send(
            Request::builder()
                .uri("/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("access_token=")));
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=")));
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
}

mod store_outage {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        Store {}

        #[async_trait]
        impl CredentialStore for Store {
            async fn find_by_refresh_token(
                &self,
                token: &str,
            ) -> auth_gate::Result<Option<Principal>>;
            async fn overwrite_refresh_token(
                &self,
                email: &str,
                new_token: &str,
            ) -> auth_gate::Result<()>;
        }
    }

    #[tokio::test]
    async fn store_outage_during_rotation_is_a_server_error() {
        let config = Arc::new(AuthConfig {
            jwt_secret: "gate-flow-test-secret-key".to_string(),
            ..AuthConfig::default()
        });
        let codec = TokenCodec::new(Arc::clone(&config)).unwrap();

        let mut store = MockStore::new();
        store
            .expect_find_by_refresh_token()
            .returning(|_| Err(GateError::store("connection refused")));

        let state = GateState::new(Arc::clone(&config), Arc::new(store)).unwrap();
        let router = gate_router(state.clone(), demo_app(state));

        let expired = codec.issue(&member(), Duration::seconds(-120)).unwrap();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/user/read")
                    .header(
                        header::COOKIE,
                        format!("access_token={expired}; refresh_token=rt-any"),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Never "not found", never a retry: the outage surfaces as 5xx.
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["EC"], -2);
    }
}
