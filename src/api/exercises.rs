use axum::{
    extract::{Path, State},
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
use crate::models::{CreateShootingExercise, ShootingExercise, UpdateShootingExercise};
use crate::services::ExerciseService;

#[derive(Clone)]
pub struct ExercisesAppState {
    pub exercise_service: ExerciseService,
}

pub fn exercise_routes(db: PgPool, auth_service: AuthService) -> Router {
    let state = ExercisesAppState {
        exercise_service: ExerciseService::new(db),
    };

    Router::new()
        .route("/", get(list_exercises).post(create_exercise))
        .route("/:exercise_id", get(get_exercise).put(update_exercise).delete(delete_exercise))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(state)
}

async fn list_exercises(State(state): State<ExercisesAppState>) -> ApiResult<Vec<ShootingExercise>> {
    let exercises = state.exercise_service.list_exercises().await.map_err(service_error)?;
    Ok(Json(exercises))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn create_exercise(
    State(state): State<ExercisesAppState>,
    session: UserSession,
    WithRejection(Json(request), _): WithRejection<Json<CreateShootingExercise>, ApiError>,
) -> Result<(StatusCode, Json<ShootingExercise>), ApiRejection> {
    ensure_staff(&session)?;

    let exercise = state
        .exercise_service
        .create_exercise(session.user_id, request)
        .await
        .map_err(service_error)?;

    Ok((StatusCode::CREATED, Json(exercise)))
}

async fn get_exercise(
    State(state): State<ExercisesAppState>,
    WithRejection(Path(exercise_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<ShootingExercise> {
    let exercise = state
        .exercise_service
        .get_exercise(exercise_id)
        .await
        .map_err(service_error)?
        .ok_or_else(|| not_found("Shooting exercise"))?;

    Ok(Json(exercise))
}

async fn update_exercise(
    State(state): State<ExercisesAppState>,
    session: UserSession,
    WithRejection(Path(exercise_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateShootingExercise>, ApiError>,
) -> ApiResult<ShootingExercise> {
    ensure_staff(&session)?;

    let exercise = state
        .exercise_service
        .update_exercise(exercise_id, request)
        .await
        .map_err(service_error)?
        .ok_or_else(|| not_found("Shooting exercise"))?;

    Ok(Json(exercise))
}

async fn delete_exercise(
    State(state): State<ExercisesAppState>,
    session: UserSession,
    WithRejection(Path(exercise_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<MessageResponse> {
    ensure_staff(&session)?;

    if !state
        .exercise_service
        .delete_exercise(exercise_id)
        .await
        .map_err(service_error)?
    {
        return Err(not_found("Shooting exercise"));
    }

    Ok(Json(MessageResponse::new("Shooting exercise deleted")))
}
