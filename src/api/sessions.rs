use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::error::{
    bad_request, ensure_can_view, ensure_staff, not_found, service_error, ApiError, ApiRejection, ApiResult,
};
use crate::auth::{jwt_auth_middleware, AuthService, MessageResponse, UserSession};
use crate::models::{CreateTrainingSession, SessionQuery, SessionReport, TrainingSession, TrendMatching};
use crate::services::{AnalyticsService, TrainingSessionService};

#[derive(Clone)]
pub struct SessionsAppState {
    pub session_service: TrainingSessionService,
    pub analytics_service: AnalyticsService,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub matching: TrendMatching,
}

pub fn session_routes(db: PgPool, auth_service: AuthService) -> Router {
    let state = SessionsAppState {
        session_service: TrainingSessionService::new(db.clone()),
        analytics_service: AnalyticsService::new(db),
    };

    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/:session_id", get(get_session).delete(delete_session))
        .route("/:session_id/report", get(get_session_report))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(state)
}

/// Athletes record their own sessions; staff name the athlete.
fn target_athlete(session: &UserSession, requested: Option<Uuid>) -> Result<Uuid, ApiRejection> {
    match requested {
        Some(athlete_id) => {
            ensure_can_view(session, athlete_id)?;
            Ok(athlete_id)
        }
        None if session.is_staff() => Err(bad_request("athlete_id is required")),
        None => Ok(session.user_id),
    }
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn create_session(
    State(state): State<SessionsAppState>,
    session: UserSession,
    WithRejection(Json(request), _): WithRejection<Json<CreateTrainingSession>, ApiError>,
) -> Result<(StatusCode, Json<TrainingSession>), ApiRejection> {
    let athlete_id = target_athlete(&session, request.athlete_id)?;

    let training_session = state
        .session_service
        .create_session(athlete_id, request)
        .await
        .map_err(service_error)?;

    Ok((StatusCode::CREATED, Json(training_session)))
}

async fn list_sessions(
    State(state): State<SessionsAppState>,
    session: UserSession,
    WithRejection(Query(query), _): WithRejection<Query<SessionQuery>, ApiError>,
) -> ApiResult<Vec<TrainingSession>> {
    let athlete_id = target_athlete(&session, query.athlete_id)?;

    let sessions = state
        .session_service
        .list_sessions(athlete_id, &query)
        .await
        .map_err(service_error)?;

    Ok(Json(sessions))
}

async fn get_session(
    State(state): State<SessionsAppState>,
    session: UserSession,
    WithRejection(Path(session_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<TrainingSession> {
    let training_session = state
        .session_service
        .get_session_by_id(session_id)
        .await
        .map_err(service_error)?
        .ok_or_else(|| not_found("Training session"))?;
    ensure_can_view(&session, training_session.athlete_id)?;

    Ok(Json(training_session))
}

async fn delete_session(
    State(state): State<SessionsAppState>,
    session: UserSession,
    WithRejection(Path(session_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<MessageResponse> {
    ensure_staff(&session)?;

    if !state
        .session_service
        .delete_session(session_id)
        .await
        .map_err(service_error)?
    {
        return Err(not_found("Training session"));
    }

    Ok(Json(MessageResponse::new("Training session deleted")))
}

/// Per-exercise accuracy with the trend against earlier sessions
async fn get_session_report(
    State(state): State<SessionsAppState>,
    session: UserSession,
    WithRejection(Path(session_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<ReportQuery>, ApiError>,
) -> ApiResult<SessionReport> {
    let report = state
        .analytics_service
        .session_report(session_id, query.matching)
        .await
        .map_err(service_error)?
        .ok_or_else(|| not_found("Training session"))?;
    ensure_can_view(&session, report.athlete_id)?;

    Ok(Json(report))
}
