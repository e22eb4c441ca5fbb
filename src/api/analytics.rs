use axum::{
    extract::{Path, Query, State},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::error::{ensure_can_view, ensure_staff, service_error, ApiError, ApiResult};
use crate::auth::{jwt_auth_middleware, AuthService, UserSession};
use crate::models::{AthleteDashboard, AttendanceQuery, TrendMatching};
use crate::services::{AnalyticsService, ShiftAttendanceReport};

#[derive(Clone)]
pub struct AnalyticsAppState {
    pub analytics_service: AnalyticsService,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub matching: TrendMatching,
}

impl AnalyticsQuery {
    fn range(&self) -> AttendanceQuery {
        AttendanceQuery {
            date: None,
            from: self.from,
            to: self.to,
        }
    }
}

pub fn analytics_routes(db: PgPool, auth_service: AuthService) -> Router {
    let state = AnalyticsAppState {
        analytics_service: AnalyticsService::new(db),
    };

    Router::new()
        .route("/athletes/:athlete_id", get(athlete_dashboard))
        .route("/shifts/:shift_id/attendance", get(shift_attendance))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(state)
}

async fn athlete_dashboard(
    State(state): State<AnalyticsAppState>,
    session: UserSession,
    WithRejection(Path(athlete_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<AnalyticsQuery>, ApiError>,
) -> ApiResult<AthleteDashboard> {
    ensure_can_view(&session, athlete_id)?;

    let dashboard = state
        .analytics_service
        .athlete_dashboard(athlete_id, &query.range(), query.matching)
        .await
        .map_err(service_error)?;

    Ok(Json(dashboard))
}

async fn shift_attendance(
    State(state): State<AnalyticsAppState>,
    session: UserSession,
    WithRejection(Path(shift_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<AnalyticsQuery>, ApiError>,
) -> ApiResult<ShiftAttendanceReport> {
    ensure_staff(&session)?;

    let report = state
        .analytics_service
        .shift_attendance(shift_id, &query.range())
        .await
        .map_err(service_error)?;

    Ok(Json(report))
}
