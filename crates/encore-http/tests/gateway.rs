//! Gateway tests against a mock API server.
//!
//! These cover the session hooks end to end: token attachment, the
//! pre-dispatch expiry check, and session teardown on rejected requests.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{NaiveDate, Utc};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use encore_core::error::{AuthError, Error, TransportError};
use encore_core::models::{
    AuthResponse, EmailVerificationRequest, SearchFilters, SignInRequest, User,
};
use encore_core::{
    AccessToken, ApiUrl, AuthApi, LOGIN_PATH, MemoryNavigator, MemoryStorage, MissingExpiry,
    Navigator, PerformanceApi, ReviewApi, SessionStore, TokenInspector, UserApi,
};
use encore_http::{ApiGateway, GatewayConfig};

fn token_expiring_in(seconds: i64) -> String {
    let payload = format!(r#"{{"exp":{},"sub":"7"}}"#, Utc::now().timestamp() + seconds);
    format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(payload))
}

fn user_json() -> Value {
    json!({"id": 7, "email": "alice@example.com", "name": "Alice"})
}

fn auth_response(token: &str) -> AuthResponse {
    serde_json::from_value(json!({
        "accessToken": token,
        "tokenType": "Bearer",
        "user": user_json()
    }))
    .unwrap()
}

fn performance_json(id: i64, date: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Show {}", id),
        "content": "Live set",
        "genre": "ROCK",
        "bandName": "The Encores",
        "venue": "Hall A",
        "performanceDate": date,
        "startTime": "19:00",
        "endTime": "21:00",
        "status": "UPCOMING",
        "userId": 7
    })
}

struct Harness {
    gateway: ApiGateway,
    session: Arc<SessionStore>,
    navigator: Arc<MemoryNavigator>,
}

fn harness(server: &MockServer, at: &str) -> Harness {
    let base_url = ApiUrl::new(server.uri()).unwrap();
    harness_for(base_url, at)
}

fn harness_for(base_url: ApiUrl, at: &str) -> Harness {
    let session = Arc::new(SessionStore::restore(Arc::new(MemoryStorage::new())));
    harness_with(base_url, session, at)
}

fn harness_with(base_url: ApiUrl, session: Arc<SessionStore>, at: &str) -> Harness {
    let navigator = Arc::new(MemoryNavigator::at(at));
    let gateway = ApiGateway::new(
        GatewayConfig::new(base_url),
        session.clone(),
        navigator.clone(),
    )
    .unwrap();
    Harness {
        gateway,
        session,
        navigator,
    }
}

// ============================================================================
// Outgoing hook
// ============================================================================

#[tokio::test]
async fn anonymous_request_has_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/performances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "/");
    let performances = h.gateway.list_performances().await.unwrap();
    assert!(performances.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn valid_token_is_attached_as_bearer() {
    let server = MockServer::start().await;
    let token = token_expiring_in(3600);

    Mock::given(method("GET"))
        .and(path("/api/users/profile"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "/profile");
    h.session.set_auth(auth_response(&token));

    let user = h.gateway.profile().await.unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert!(h.session.is_authenticated());
}

#[tokio::test]
async fn expired_token_is_never_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reviews/my"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, "/reviews");
    h.session.set_auth(auth_response(&token_expiring_in(-60)));

    let err = h.gateway.my_reviews().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::SessionExpired)));
    assert!(err.ended_session());
    assert!(!h.session.is_authenticated());
    assert!(h.session.token().is_none());
    assert_eq!(h.navigator.current_path(), LOGIN_PATH);
}

#[tokio::test]
async fn malformed_token_is_never_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/performances/my"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, "/performances/manage");
    h.session.set_auth(AuthResponse {
        access_token: AccessToken::new("not-a-jwt"),
        ..auth_response("placeholder")
    });

    let err = h.gateway.my_performances().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::MalformedToken)));
    assert!(!h.session.is_authenticated());
}

// ============================================================================
// Incoming hook
// ============================================================================

#[tokio::test]
async fn unauthorized_response_ends_session_and_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/performances/my"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Unauthorized",
            "message": "Token revoked"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, "/performances/manage");
    h.session.set_auth(auth_response(&token_expiring_in(3600)));

    let err = h.gateway.my_performances().await.unwrap_err();
    match &err {
        Error::Auth(AuthError::Rejected(api)) => {
            assert_eq!(api.status, 401);
            assert_eq!(api.message.as_deref(), Some("Token revoked"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!h.session.is_authenticated());
    assert_eq!(h.navigator.history(), vec![LOGIN_PATH.to_string()]);
}

#[tokio::test]
async fn forbidden_response_ends_session() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/reviews/3"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let h = harness(&server, "/reviews");
    h.session.set_auth(auth_response(&token_expiring_in(3600)));

    let err = h.gateway.delete_review(3).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(err.ended_session());
    assert!(!h.session.is_authenticated());
}

#[tokio::test]
async fn failed_sign_in_keeps_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid email or password"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, "/auth/login");
    let token = token_expiring_in(3600);
    h.session.set_auth(auth_response(&token));

    let err = h
        .gateway
        .sign_in(&SignInRequest {
            email: "alice@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    match &err {
        Error::Api(api) => {
            assert_eq!(api.status, 401);
            assert_eq!(api.message_or("sign-in failed"), "Invalid email or password");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(h.session.is_authenticated());
    assert_eq!(h.session.token().unwrap().as_str(), token);
    assert!(h.navigator.history().is_empty());
}

#[tokio::test]
async fn failed_email_verification_keeps_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/email/verify"))
        .and(body_json(json!({
            "email": "alice@example.com",
            "verificationCode": "000000"
        })))
        .respond_with(ResponseTemplate::new(401).set_body_string("Code mismatch"))
        .mount(&server)
        .await;

    let h = harness(&server, "/auth/verify-email");
    h.session.set_auth(auth_response(&token_expiring_in(3600)));

    let err = h
        .gateway
        .verify_email(&EmailVerificationRequest {
            email: "alice@example.com".to_string(),
            verification_code: "000000".to_string(),
        })
        .await
        .unwrap_err();

    match &err {
        Error::Api(api) => assert_eq!(api.message.as_deref(), Some("Code mismatch")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(h.session.is_authenticated());
}

#[tokio::test]
async fn server_error_is_a_domain_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reviews/performance/9"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let h = harness(&server, "/performances/9");
    h.session.set_auth(auth_response(&token_expiring_in(3600)));

    let err = h.gateway.reviews_for_performance(9).await.unwrap_err();
    match &err {
        Error::Api(api) => {
            assert_eq!(api.status, 500);
            assert_eq!(api.error.as_deref(), Some("Internal Server Error"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!err.ended_session());
    assert!(h.session.is_authenticated());
    assert!(h.navigator.history().is_empty());
}

#[tokio::test]
async fn server_error_can_be_configured_as_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/profile"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = Arc::new(SessionStore::restore(Arc::new(MemoryStorage::new())));
    let navigator = Arc::new(MemoryNavigator::at("/profile"));
    let config = GatewayConfig::new(ApiUrl::new(server.uri()).unwrap())
        .with_auth_failure_statuses([401, 403, 500]);
    let gateway = ApiGateway::new(config, session.clone(), navigator.clone()).unwrap();
    session.set_auth(auth_response(&token_expiring_in(3600)));

    let err = gateway.profile().await.unwrap_err();
    assert!(err.ended_session());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn concurrent_rejections_redirect_once() {
    let server = MockServer::start().await;
    for endpoint in ["/api/performances/my", "/api/reviews/my", "/api/users/profile"] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
    }

    let h = harness(&server, "/dashboard");
    h.session.set_auth(auth_response(&token_expiring_in(3600)));

    let (a, b, c) = tokio::join!(
        h.gateway.my_performances(),
        h.gateway.my_reviews(),
        h.gateway.profile()
    );
    assert!(a.is_err() && b.is_err() && c.is_err());
    assert!(!h.session.is_authenticated());
    assert_eq!(h.navigator.history(), vec![LOGIN_PATH.to_string()]);
}

#[tokio::test]
async fn rejection_on_login_page_does_not_navigate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/profile"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = harness(&server, LOGIN_PATH);
    h.session.set_auth(auth_response(&token_expiring_in(3600)));

    h.gateway.profile().await.unwrap_err();
    assert!(!h.session.is_authenticated());
    assert!(h.navigator.history().is_empty());
}

#[tokio::test]
async fn connection_failure_keeps_session() {
    // Nothing listens on port 1.
    let h = harness_for(ApiUrl::new("http://127.0.0.1:1").unwrap(), "/");
    h.session.set_auth(auth_response(&token_expiring_in(3600)));

    let err = h.gateway.list_performances().await.unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Connection { .. })));
    assert!(h.session.is_authenticated());
    assert!(h.navigator.history().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn late_rejection_of_replaced_token_keeps_new_session() {
    let server = MockServer::start().await;
    let old = token_expiring_in(3600);
    let new = token_expiring_in(7200);
    Mock::given(method("GET"))
        .and(path("/api/performances/my"))
        .and(header("authorization", format!("Bearer {}", old).as_str()))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "/dashboard");
    h.session.set_auth(auth_response(&old));

    let gateway = h.gateway.clone();
    let pending = tokio::spawn(async move { gateway.my_performances().await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    h.session.set_auth(auth_response(&new));

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, Error::Api(ref e) if e.status == 401));
    assert!(!err.ended_session());
    assert_eq!(h.session.token(), Some(AccessToken::new(new)));
    assert!(h.session.is_authenticated());
    assert!(h.navigator.history().is_empty());
}

#[tokio::test]
async fn token_without_expiry_follows_session_policy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reviews/my"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let no_exp = format!(
        "eyJhbGciOiJIUzI1NiJ9.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"sub":"7"}"#)
    );

    let trusting = harness(&server, "/");
    trusting.session.set_auth(auth_response(&no_exp));
    trusting.gateway.my_reviews().await.unwrap();
    assert!(trusting.session.check_token_expiry());

    let session = Arc::new(
        SessionStore::new(Arc::new(MemoryStorage::new()))
            .with_inspector(TokenInspector::new(MissingExpiry::Reject)),
    );
    session.rehydrate();
    let strict = harness_with(ApiUrl::new(server.uri()).unwrap(), session, "/");
    strict.session.set_auth(auth_response(&no_exp));

    let err = strict.gateway.my_reviews().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::MalformedToken)));
    assert!(!strict.session.is_authenticated());
    assert!(!strict.session.check_token_expiry());
    assert_eq!(strict.navigator.history(), vec![LOGIN_PATH.to_string()]);
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn sign_in_then_logout_changes_outgoing_headers() {
    let server = MockServer::start().await;
    let token = token_expiring_in(3600);

    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .and(body_json(json!({
            "email": "alice@example.com",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": token,
            "tokenType": "Bearer",
            "expiresIn": 3600,
            "user": user_json()
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/performances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let h = harness(&server, "/auth/login");
    let auth = h
        .gateway
        .sign_in(&SignInRequest {
            email: "alice@example.com".to_string(),
            password: "secret123".to_string(),
        })
        .await
        .unwrap();
    h.session.set_auth(auth);
    assert!(h.session.is_authenticated());

    h.gateway.list_performances().await.unwrap();
    h.session.logout();
    h.gateway.list_performances().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let listed: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/api/performances")
        .collect();
    assert_eq!(listed.len(), 2);
    assert_eq!(
        listed[0].headers.get("authorization").unwrap().to_str().unwrap(),
        format!("Bearer {}", token)
    );
    assert!(listed[1].headers.get("authorization").is_none());
}

#[tokio::test]
async fn refresh_token_posts_with_current_token() {
    let server = MockServer::start().await;
    let old = token_expiring_in(60);
    let new = token_expiring_in(7200);

    Mock::given(method("POST"))
        .and(path("/api/users/refresh-token"))
        .and(header("authorization", format!("Bearer {}", old).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": new,
            "user": user_json()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "/");
    h.session.set_auth(auth_response(&old));

    let refreshed = h.gateway.refresh_token().await.unwrap();
    assert_eq!(refreshed.access_token.as_str(), new);
    assert_eq!(refreshed.token_type, "Bearer");
    // Storing the new token is left to the caller.
    assert_eq!(h.session.token().unwrap().as_str(), old);
}

// ============================================================================
// Domain queries
// ============================================================================

#[tokio::test]
async fn search_sends_only_non_blank_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/performances/search"))
        .and(query_param("keyword", "jazz"))
        .and(query_param("bandName", "Blue Notes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([performance_json(1, "2030-05-01")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "/");
    let filters = SearchFilters {
        keyword: Some("jazz".to_string()),
        genre: Some("   ".to_string()),
        band_name: Some("Blue Notes".to_string()),
    };
    let found = h.gateway.search_performances(&filters).await.unwrap();
    assert_eq!(found.len(), 1);

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].url.query().unwrap_or_default().contains("genre"));
}

#[tokio::test]
async fn calendar_range_uses_iso_dates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/performances/calendar"))
        .and(query_param("startDate", "2030-05-01"))
        .and(query_param("endDate", "2030-05-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            performance_json(1, "2030-05-03"),
            performance_json(2, "2030-05-20T00:00:00")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "/calendar");
    let start = NaiveDate::from_ymd_opt(2030, 5, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2030, 5, 31).unwrap();
    let performances = h.gateway.performances_between(start, end).await.unwrap();

    assert_eq!(performances.len(), 2);
    assert_eq!(
        performances[1].date(),
        NaiveDate::from_ymd_opt(2030, 5, 20)
    );
}

#[tokio::test]
async fn send_verification_posts_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/email/send-verification"))
        .and(body_json(json!({"email": "alice@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("sent"))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "/auth/signup");
    h.gateway
        .send_verification_email("alice@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_performance_accepts_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/performances/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "/performances/manage");
    h.session.set_auth(auth_response(&token_expiring_in(3600)));
    h.gateway.delete_performance(42).await.unwrap();
    assert!(h.session.is_authenticated());
}

#[tokio::test]
async fn public_user_lookup_decodes_profile_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12,
            "email": "band@example.com",
            "name": "Band Leader",
            "nickname": "Leader",
            "bandName": "The Encores"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, "/");
    let user: User = h.gateway.user(12).await.unwrap();
    assert_eq!(user.display_name(), "Leader");
    assert_eq!(user.band_name.as_deref(), Some("The Encores"));
}

#[tokio::test]
async fn unexpected_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/performances"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let h = harness(&server, "/");
    let err = h.gateway.list_performances().await.unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Decode { .. })));
}
