use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::auth::UserRole;
use crate::models::{
    validate_results_against_plan, validate_session, CreateTrainingSession, PlannedExercise, SessionQuery,
    TrainingSession,
};
use crate::services::errors::DomainError;
use crate::services::ExerciseService;

const SESSION_COLUMNS: &str = "id, athlete_id, plan_id, date, duration_minutes, observations, results, created_at";

#[derive(Clone)]
pub struct TrainingSessionService {
    db: PgPool,
    exercises: ExerciseService,
}

impl TrainingSessionService {
    pub fn new(db: PgPool) -> Self {
        Self {
            exercises: ExerciseService::new(db.clone()),
            db,
        }
    }

    pub async fn create_session(
        &self,
        athlete_id: Uuid,
        session_data: CreateTrainingSession,
    ) -> Result<TrainingSession> {
        validate_session(&session_data).map_err(DomainError::invalid)?;

        let role: Option<UserRole> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1 AND active")
            .bind(athlete_id)
            .fetch_optional(&self.db)
            .await?;
        match role {
            Some(UserRole::Athlete) => {}
            Some(_) => return Err(DomainError::Invalid("Sessions can only be recorded for athletes".to_string()).into()),
            None => return Err(DomainError::NotFound("Athlete").into()),
        }

        if let Some(plan_id) = session_data.plan_id {
            let planned: Json<Vec<PlannedExercise>> =
                sqlx::query_scalar("SELECT exercises FROM training_plans WHERE id = $1")
                    .bind(plan_id)
                    .fetch_optional(&self.db)
                    .await?
                    .ok_or(DomainError::NotFound("Training plan"))?;
            validate_results_against_plan(&session_data.results, &planned.0).map_err(DomainError::invalid)?;
        } else {
            let referenced: Vec<Uuid> = session_data.results.iter().filter_map(|result| result.exercise_id).collect();
            let missing = self.exercises.missing_ids(&referenced).await?;
            if let Some(exercise_id) = missing.first() {
                return Err(DomainError::Invalid(format!("Shooting exercise {exercise_id} does not exist")).into());
            }
        }

        let session = sqlx::query_as::<_, TrainingSession>(&format!(
            "INSERT INTO training_sessions (id, athlete_id, plan_id, date, duration_minutes, observations, results)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {SESSION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(athlete_id)
        .bind(session_data.plan_id)
        .bind(session_data.date)
        .bind(session_data.duration_minutes)
        .bind(session_data.observations.trim())
        .bind(Json(session_data.results))
        .fetch_one(&self.db)
        .await?;

        tracing::info!(session_id = %session.id, %athlete_id, date = %session.date, "Recorded training session");
        Ok(session)
    }

    pub async fn get_session_by_id(&self, session_id: Uuid) -> Result<Option<TrainingSession>> {
        let session = sqlx::query_as::<_, TrainingSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM training_sessions WHERE id = $1"
        ))
        .bind(session_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(session)
    }

    /// Newest first, paginated.
    pub async fn list_sessions(&self, athlete_id: Uuid, query: &SessionQuery) -> Result<Vec<TrainingSession>> {
        let limit = query.limit.unwrap_or(50).clamp(1, 200);
        let offset = query.offset.unwrap_or(0).max(0);

        let sessions = sqlx::query_as::<_, TrainingSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM training_sessions
             WHERE athlete_id = $1
               AND ($2::date IS NULL OR date >= $2)
               AND ($3::date IS NULL OR date <= $3)
             ORDER BY date DESC, created_at DESC
             LIMIT $4 OFFSET $5"
        ))
        .bind(athlete_id)
        .bind(query.from)
        .bind(query.to)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(sessions)
    }

    /// Every session of the athlete up to and including `until`, oldest
    /// first. Used as trend history for reports and dashboards.
    pub async fn history(&self, athlete_id: Uuid, until: Option<NaiveDate>) -> Result<Vec<TrainingSession>> {
        let sessions = sqlx::query_as::<_, TrainingSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM training_sessions
             WHERE athlete_id = $1 AND ($2::date IS NULL OR date <= $2)
             ORDER BY date ASC, created_at ASC"
        ))
        .bind(athlete_id)
        .bind(until)
        .fetch_all(&self.db)
        .await?;

        Ok(sessions)
    }

    pub async fn delete_session(&self, session_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM training_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
