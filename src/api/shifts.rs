use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::error::{ensure_staff, not_found, service_error, ApiError, ApiRejection, ApiResult};
use crate::auth::{jwt_auth_middleware, AuthService, MessageResponse, UserSession};
use crate::models::{CreateShift, Section, Shift, ShiftRoster, UpdateShift};
use crate::services::ShiftService;

#[derive(Clone)]
pub struct ShiftsAppState {
    pub shift_service: ShiftService,
}

#[derive(Debug, Deserialize)]
pub struct ShiftListQuery {
    pub section: Option<Section>,
    pub coach_id: Option<Uuid>,
}

pub fn shift_routes(db: PgPool, auth_service: AuthService) -> Router {
    let state = ShiftsAppState {
        shift_service: ShiftService::new(db),
    };

    Router::new()
        .route("/", get(list_shifts).post(create_shift))
        .route("/mine", get(my_shifts))
        .route("/:shift_id", get(get_shift).put(update_shift).delete(delete_shift))
        .route("/:shift_id/athletes", get(get_roster))
        .route("/:shift_id/athletes/:athlete_id", post(enroll_athlete).delete(remove_athlete))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(state)
}

async fn list_shifts(
    State(state): State<ShiftsAppState>,
    WithRejection(Query(query), _): WithRejection<Query<ShiftListQuery>, ApiError>,
) -> ApiResult<Vec<Shift>> {
    let shifts = state
        .shift_service
        .list_shifts(query.section, query.coach_id)
        .await
        .map_err(service_error)?;

    Ok(Json(shifts))
}

/// Shifts the caller is enrolled in
async fn my_shifts(State(state): State<ShiftsAppState>, session: UserSession) -> ApiResult<Vec<Shift>> {
    let shifts = state
        .shift_service
        .shifts_for_athlete(session.user_id)
        .await
        .map_err(service_error)?;

    Ok(Json(shifts))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn create_shift(
    State(state): State<ShiftsAppState>,
    session: UserSession,
    WithRejection(Json(request), _): WithRejection<Json<CreateShift>, ApiError>,
) -> Result<(StatusCode, Json<Shift>), ApiRejection> {
    ensure_staff(&session)?;

    let shift = state.shift_service.create_shift(request).await.map_err(service_error)?;
    Ok((StatusCode::CREATED, Json(shift)))
}

async fn get_shift(
    State(state): State<ShiftsAppState>,
    WithRejection(Path(shift_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Shift> {
    let shift = state
        .shift_service
        .get_shift(shift_id)
        .await
        .map_err(service_error)?
        .ok_or_else(|| not_found("Shift"))?;

    Ok(Json(shift))
}

async fn update_shift(
    State(state): State<ShiftsAppState>,
    session: UserSession,
    WithRejection(Path(shift_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateShift>, ApiError>,
) -> ApiResult<Shift> {
    ensure_staff(&session)?;

    let shift = state
        .shift_service
        .update_shift(shift_id, request)
        .await
        .map_err(service_error)?
        .ok_or_else(|| not_found("Shift"))?;

    Ok(Json(shift))
}

async fn delete_shift(
    State(state): State<ShiftsAppState>,
    session: UserSession,
    WithRejection(Path(shift_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<MessageResponse> {
    ensure_staff(&session)?;

    if !state.shift_service.delete_shift(shift_id).await.map_err(service_error)? {
        return Err(not_found("Shift"));
    }

    Ok(Json(MessageResponse::new("Shift deleted")))
}

async fn get_roster(
    State(state): State<ShiftsAppState>,
    session: UserSession,
    WithRejection(Path(shift_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<ShiftRoster> {
    ensure_staff(&session)?;

    let roster = state
        .shift_service
        .roster(shift_id)
        .await
        .map_err(service_error)?
        .ok_or_else(|| not_found("Shift"))?;

    Ok(Json(roster))
}

/// 201 when the athlete joins, 200 when they were already enrolled.
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn enroll_athlete(
    State(state): State<ShiftsAppState>,
    session: UserSession,
    WithRejection(Path((shift_id, athlete_id)), _): WithRejection<Path<(Uuid, Uuid)>, ApiError>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiRejection> {
    ensure_staff(&session)?;

    let enrolled = state
        .shift_service
        .enroll_athlete(shift_id, athlete_id)
        .await
        .map_err(service_error)?;

    if enrolled {
        Ok((StatusCode::CREATED, Json(MessageResponse::new("Athlete enrolled"))))
    } else {
        Ok((StatusCode::OK, Json(MessageResponse::new("Athlete already enrolled"))))
    }
}

async fn remove_athlete(
    State(state): State<ShiftsAppState>,
    session: UserSession,
    WithRejection(Path((shift_id, athlete_id)), _): WithRejection<Path<(Uuid, Uuid)>, ApiError>,
) -> ApiResult<MessageResponse> {
    ensure_staff(&session)?;

    if !state
        .shift_service
        .remove_athlete(shift_id, athlete_id)
        .await
        .map_err(service_error)?
    {
        return Err(not_found("Enrollment"));
    }

    Ok(Json(MessageResponse::new("Athlete removed from shift")))
}
