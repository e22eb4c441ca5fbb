use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;
use sqlx::PgPool;
use uuid::Uuid;

use super::error::{ensure_staff, not_found, service_error, ApiError, ApiRejection, ApiResult};
use crate::auth::{jwt_auth_middleware, AuthService, MessageResponse, UserSession};
use crate::models::{CreateTrainingPlan, PlanQuery, TrainingPlan, UpdateTrainingPlan};
use crate::services::TrainingPlanService;

#[derive(Clone)]
pub struct PlansAppState {
    pub plan_service: TrainingPlanService,
}

pub fn plan_routes(db: PgPool, auth_service: AuthService) -> Router {
    let state = PlansAppState {
        plan_service: TrainingPlanService::new(db),
    };

    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/:plan_id", get(get_plan).put(update_plan).delete(delete_plan))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(state)
}

async fn list_plans(
    State(state): State<PlansAppState>,
    WithRejection(Query(query), _): WithRejection<Query<PlanQuery>, ApiError>,
) -> ApiResult<Vec<TrainingPlan>> {
    let plans = state.plan_service.list_plans(&query).await.map_err(service_error)?;
    Ok(Json(plans))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn create_plan(
    State(state): State<PlansAppState>,
    session: UserSession,
    WithRejection(Json(request), _): WithRejection<Json<CreateTrainingPlan>, ApiError>,
) -> Result<(StatusCode, Json<TrainingPlan>), ApiRejection> {
    ensure_staff(&session)?;

    let plan = state
        .plan_service
        .create_plan(session.user_id, request)
        .await
        .map_err(service_error)?;

    Ok((StatusCode::CREATED, Json(plan)))
}

async fn get_plan(
    State(state): State<PlansAppState>,
    WithRejection(Path(plan_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<TrainingPlan> {
    let plan = state
        .plan_service
        .get_plan(plan_id)
        .await
        .map_err(service_error)?
        .ok_or_else(|| not_found("Training plan"))?;

    Ok(Json(plan))
}

async fn update_plan(
    State(state): State<PlansAppState>,
    session: UserSession,
    WithRejection(Path(plan_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateTrainingPlan>, ApiError>,
) -> ApiResult<TrainingPlan> {
    ensure_staff(&session)?;

    let plan = state
        .plan_service
        .update_plan(plan_id, request)
        .await
        .map_err(service_error)?
        .ok_or_else(|| not_found("Training plan"))?;

    Ok(Json(plan))
}

async fn delete_plan(
    State(state): State<PlansAppState>,
    session: UserSession,
    WithRejection(Path(plan_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<MessageResponse> {
    ensure_staff(&session)?;

    if !state.plan_service.delete_plan(plan_id).await.map_err(service_error)? {
        return Err(not_found("Training plan"));
    }

    Ok(Json(MessageResponse::new("Training plan deleted")))
}
