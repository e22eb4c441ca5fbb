mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use hoops_academy::api::{create_routes, create_routes_with_login_limit};
use hoops_academy::auth::{JwtService, RateLimitConfig, UserRole};
use serde_json::json;
use std::net::IpAddr;
use tower::ServiceExt;
use uuid::Uuid;

use common::{lazy_pool, ApiTestHelpers, TEST_JWT_SECRET};

fn app() -> axum::Router {
    create_routes(lazy_pool(), TEST_JWT_SECRET)
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let response = app()
        .oneshot(ApiTestHelpers::request(Method::GET, "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let body = ApiTestHelpers::json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "hoops-academy");
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    for uri in [
        "/api/v1/shifts",
        "/api/v1/exercises",
        "/api/v1/sessions",
        "/api/v1/auth/profile",
        "/api/v1/admin/users",
    ] {
        let response = app()
            .oneshot(ApiTestHelpers::request(Method::GET, uri, None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let response = app()
        .oneshot(ApiTestHelpers::request(
            Method::GET,
            "/api/v1/shifts",
            Some("not-a-jwt"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let foreign = JwtService::new("some-other-secret")
        .create_access_token(Uuid::new_v4(), "coach@example.com", UserRole::Coach)
        .unwrap();

    let response = app()
        .oneshot(ApiTestHelpers::request(Method::GET, "/api/v1/shifts", Some(&foreign), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_cannot_be_used_as_bearer() {
    let refresh = JwtService::new(TEST_JWT_SECRET)
        .create_refresh_token(Uuid::new_v4(), "lucia@example.com", UserRole::Athlete)
        .unwrap();

    let response = app()
        .oneshot(ApiTestHelpers::request(
            Method::GET,
            "/api/v1/auth/profile",
            Some(&refresh),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_login_body_is_a_client_error() {
    let response = app()
        .oneshot(ApiTestHelpers::request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "lucia@example.com" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = ApiTestHelpers::json_body(response).await;
    assert_eq!(body["error_code"], "INVALID_BODY");
}

fn login_from(peer: IpAddr, forwarded_for: Option<&str>) -> Request<Body> {
    let mut request = ApiTestHelpers::from_peer(
        ApiTestHelpers::request(Method::POST, "/api/v1/auth/login", None, Some(json!({}))),
        peer,
    );
    if let Some(forwarded_for) = forwarded_for {
        request
            .headers_mut()
            .insert("x-forwarded-for", forwarded_for.parse().unwrap());
    }
    request
}

#[tokio::test]
async fn test_login_is_rate_limited_per_client() {
    let app = app();
    let client = IpAddr::from([203, 0, 113, 7]);

    let mut statuses = Vec::new();
    for _ in 0..6 {
        let response = app.clone().oneshot(login_from(client, None)).await.unwrap();
        statuses.push(response.status());
    }

    assert!(statuses[..5].iter().all(|status| *status != StatusCode::TOO_MANY_REQUESTS));
    assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);

    // Another client is unaffected
    let response = app
        .clone()
        .oneshot(login_from(IpAddr::from([203, 0, 113, 8]), None))
        .await
        .unwrap();
    assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_forged_forwarding_headers_do_not_reset_the_limit() {
    let app = app();
    let attacker = IpAddr::from([198, 51, 100, 66]);

    let mut limited = 0;
    for i in 0..20 {
        let forged = format!("10.0.0.{i}");
        let response = app.clone().oneshot(login_from(attacker, Some(&forged))).await.unwrap();
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            limited += 1;
        }
    }

    assert_eq!(limited, 15);
}

#[tokio::test]
async fn test_trusted_proxy_limits_by_forwarded_client() {
    let login_limit = RateLimitConfig {
        trust_proxy_headers: true,
        ..RateLimitConfig::default()
    };
    let app = create_routes_with_login_limit(lazy_pool(), TEST_JWT_SECRET, &login_limit);
    let proxy = IpAddr::from([10, 0, 0, 2]);

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(login_from(proxy, Some("203.0.113.7")))
            .await
            .unwrap();
        assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    let blocked = app
        .clone()
        .oneshot(login_from(proxy, Some("203.0.113.7")))
        .await
        .unwrap();
    assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);

    // Same proxy, different client behind it
    let other = app
        .clone()
        .oneshot(login_from(proxy, Some("203.0.113.9")))
        .await
        .unwrap();
    assert_ne!(other.status(), StatusCode::TOO_MANY_REQUESTS);
}
