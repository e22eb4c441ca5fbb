use axum::{
    extract::{Path, Query, State},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use axum_extra::extract::WithRejection;
use sqlx::PgPool;
use uuid::Uuid;

use super::error::{ensure_can_view, ensure_staff, service_error, ApiError, ApiResult};
use crate::auth::{jwt_auth_middleware, AuthService, UserSession};
use crate::models::{AttendanceQuery, AttendanceRecord, SubmitAttendance};
use crate::services::AttendanceService;

#[derive(Clone)]
pub struct AttendanceAppState {
    pub attendance_service: AttendanceService,
}

pub fn attendance_routes(db: PgPool, auth_service: AuthService) -> Router {
    let state = AttendanceAppState {
        attendance_service: AttendanceService::new(db),
    };

    Router::new()
        .route("/", post(submit_attendance))
        .route("/shifts/:shift_id", get(shift_attendance))
        .route("/athletes/:athlete_id", get(athlete_attendance))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(state)
}

/// Mark a roll call; resubmitting the same day overwrites earlier marks.
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn submit_attendance(
    State(state): State<AttendanceAppState>,
    session: UserSession,
    WithRejection(Json(request), _): WithRejection<Json<SubmitAttendance>, ApiError>,
) -> ApiResult<Vec<AttendanceRecord>> {
    ensure_staff(&session)?;

    let records = state
        .attendance_service
        .submit(session.user_id, request)
        .await
        .map_err(service_error)?;

    Ok(Json(records))
}

async fn shift_attendance(
    State(state): State<AttendanceAppState>,
    session: UserSession,
    WithRejection(Path(shift_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<AttendanceQuery>, ApiError>,
) -> ApiResult<Vec<AttendanceRecord>> {
    ensure_staff(&session)?;

    let records = state
        .attendance_service
        .records_for_shift(shift_id, &query)
        .await
        .map_err(service_error)?;

    Ok(Json(records))
}

async fn athlete_attendance(
    State(state): State<AttendanceAppState>,
    session: UserSession,
    WithRejection(Path(athlete_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<AttendanceQuery>, ApiError>,
) -> ApiResult<Vec<AttendanceRecord>> {
    ensure_can_view(&session, athlete_id)?;

    let records = state
        .attendance_service
        .records_for_athlete(athlete_id, &query)
        .await
        .map_err(service_error)?;

    Ok(Json(records))
}
