use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, put},
    Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::error::{bad_request, not_found, service_error, ApiError, ApiRejection, ApiResult};
use crate::auth::{admin_only_middleware, jwt_auth_middleware, AuthService, MessageResponse, UserRole, UserSession};
use crate::models::{CreateUser, UpdateUser, UserResponse};
use crate::services::UserService;

#[derive(Clone)]
pub struct AdminAppState {
    pub user_service: UserService,
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub role: Option<UserRole>,
    #[serde(default)]
    pub include_inactive: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub user: UserResponse,
    /// Only present when the server generated the password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}

pub fn admin_routes(db: PgPool, auth_service: AuthService) -> Router {
    let state = AdminAppState {
        user_service: UserService::new(db),
    };

    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:user_id", get(get_user).put(update_user).delete(deactivate_user))
        .route("/users/:user_id/role", put(update_role))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(state)
}

async fn list_users(
    State(state): State<AdminAppState>,
    WithRejection(Query(query), _): WithRejection<Query<UserListQuery>, ApiError>,
) -> ApiResult<Vec<UserResponse>> {
    let users = state
        .user_service
        .list_users(query.role, query.include_inactive, query.limit, query.offset)
        .await
        .map_err(service_error)?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[tracing::instrument(skip_all, fields(admin_id = %session.user_id))]
async fn create_user(
    State(state): State<AdminAppState>,
    session: UserSession,
    WithRejection(Json(request), _): WithRejection<Json<CreateUser>, ApiError>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiRejection> {
    let (user, temporary_password) = state.user_service.create_user(request).await.map_err(service_error)?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            user: user.into(),
            temporary_password,
        }),
    ))
}

async fn get_user(
    State(state): State<AdminAppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<UserResponse> {
    let user = state
        .user_service
        .get_user(user_id)
        .await
        .map_err(service_error)?
        .ok_or_else(|| not_found("User"))?;

    Ok(Json(user.into()))
}

async fn update_user(
    State(state): State<AdminAppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateUser>, ApiError>,
) -> ApiResult<UserResponse> {
    let user = state
        .user_service
        .update_user(user_id, request)
        .await
        .map_err(service_error)?
        .ok_or_else(|| not_found("User"))?;

    Ok(Json(user.into()))
}

#[tracing::instrument(skip_all, fields(admin_id = %session.user_id))]
async fn update_role(
    State(state): State<AdminAppState>,
    session: UserSession,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateRoleRequest>, ApiError>,
) -> ApiResult<UserResponse> {
    if user_id == session.user_id && request.role != UserRole::Admin {
        return Err(bad_request("Administrators cannot demote themselves"));
    }

    let user = state
        .user_service
        .update_role(user_id, request.role)
        .await
        .map_err(service_error)?
        .ok_or_else(|| not_found("User"))?;

    Ok(Json(user.into()))
}

#[tracing::instrument(skip_all, fields(admin_id = %session.user_id))]
async fn deactivate_user(
    State(state): State<AdminAppState>,
    session: UserSession,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<MessageResponse> {
    if user_id == session.user_id {
        return Err(bad_request("Administrators cannot deactivate their own account"));
    }

    if !state.user_service.deactivate_user(user_id).await.map_err(service_error)? {
        return Err(not_found("User"));
    }

    Ok(Json(MessageResponse::new("User deactivated")))
}
