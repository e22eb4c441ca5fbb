use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use axum_extra::extract::WithRejection;

use super::error::ApiError;
use crate::auth::{
    jwt_auth_middleware, rate_limit_middleware, AuthError, AuthResponse, AuthService, ChangePasswordRequest,
    LoginRequest, MessageResponse, RateLimitConfig, RateLimiter, RefreshTokenRequest, TokenResponse, UserInfo,
    UserSession,
};

/// Authentication routes
pub fn auth_routes(auth_service: AuthService, login_limit: &RateLimitConfig) -> Router {
    let login_limiter = RateLimiter::from_config(login_limit);

    Router::new()
        .route(
            "/login",
            post(login).route_layer(middleware::from_fn_with_state(login_limiter, rate_limit_middleware)),
        )
        .route("/refresh", post(refresh_token))
        .route(
            "/logout",
            post(logout).route_layer(middleware::from_fn_with_state(
                auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .route(
            "/profile",
            get(get_profile).route_layer(middleware::from_fn_with_state(
                auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .route(
            "/change-password",
            post(change_password).route_layer(middleware::from_fn_with_state(
                auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .with_state(auth_service)
}

/// Login user
#[tracing::instrument(skip_all)]
async fn login(
    State(auth_service): State<AuthService>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = auth_service.login(request).await?;
    Ok(Json(response))
}

/// Refresh access token
#[tracing::instrument(skip_all)]
async fn refresh_token(
    State(auth_service): State<AuthService>,
    WithRejection(Json(request), _): WithRejection<Json<RefreshTokenRequest>, ApiError>,
) -> Result<Json<TokenResponse>, AuthError> {
    let response = auth_service.refresh_token(request).await?;
    Ok(Json(response))
}

/// Logout user
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn logout(
    State(auth_service): State<AuthService>,
    session: UserSession,
) -> Result<Json<MessageResponse>, AuthError> {
    let response = auth_service.logout(&session).await?;
    Ok(Json(response))
}

/// Get user profile
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn get_profile(
    State(auth_service): State<AuthService>,
    session: UserSession,
) -> Result<Json<UserInfo>, AuthError> {
    let profile = auth_service.profile(session.user_id).await?;
    Ok(Json(profile))
}

/// Change user password
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn change_password(
    State(auth_service): State<AuthService>,
    session: UserSession,
    WithRejection(Json(request), _): WithRejection<Json<ChangePasswordRequest>, ApiError>,
) -> Result<Json<MessageResponse>, AuthError> {
    let response = auth_service.change_password(&session, request).await?;
    Ok(Json(response))
}
