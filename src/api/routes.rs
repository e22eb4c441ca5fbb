use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use super::admin::admin_routes;
use super::analytics::analytics_routes;
use super::attendance::attendance_routes;
use super::auth::auth_routes;
use super::exercises::exercise_routes;
use super::health::{health_check, readiness_check};
use super::plans::plan_routes;
use super::sessions::session_routes;
use super::shifts::shift_routes;
use crate::auth::{cors_layer, security_headers_layer, AuthService, RateLimitConfig};

/// Router with the default login limit, keyed on the TCP peer address.
pub fn create_routes(db: PgPool, jwt_secret: &str) -> Router {
    create_routes_with_login_limit(db, jwt_secret, &RateLimitConfig::default())
}

pub fn create_routes_with_login_limit(db: PgPool, jwt_secret: &str, login_limit: &RateLimitConfig) -> Router {
    let auth_service = AuthService::new(db.clone(), jwt_secret);

    let api = Router::new()
        .nest("/auth", auth_routes(auth_service.clone(), login_limit))
        .nest("/admin", admin_routes(db.clone(), auth_service.clone()))
        .nest("/shifts", shift_routes(db.clone(), auth_service.clone()))
        .nest("/attendance", attendance_routes(db.clone(), auth_service.clone()))
        .nest("/exercises", exercise_routes(db.clone(), auth_service.clone()))
        .nest("/plans", plan_routes(db.clone(), auth_service.clone()))
        .nest("/sessions", session_routes(db.clone(), auth_service.clone()))
        .nest("/analytics", analytics_routes(db.clone(), auth_service));

    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check).with_state(db))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(security_headers_layer())
        .layer(cors_layer())
}
