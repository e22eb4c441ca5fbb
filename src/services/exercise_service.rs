use anyhow::Result;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::models::{
    validate_name, validate_shot_targets, CreateShootingExercise, ShootingExercise, UpdateShootingExercise,
};
use crate::services::errors::DomainError;

const EXERCISE_COLUMNS: &str = "id, title, description, targets, created_by, created_at, updated_at";

/// Library of reusable shooting exercise templates.
#[derive(Clone)]
pub struct ExerciseService {
    db: PgPool,
}

impl ExerciseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_exercise(
        &self,
        created_by: Uuid,
        exercise_data: CreateShootingExercise,
    ) -> Result<ShootingExercise> {
        validate_name(&exercise_data.title, "Title").map_err(DomainError::invalid)?;
        validate_shot_targets(&exercise_data.targets).map_err(DomainError::invalid)?;

        let exercise = sqlx::query_as::<_, ShootingExercise>(&format!(
            "INSERT INTO shooting_exercises (id, title, description, targets, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {EXERCISE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(exercise_data.title.trim())
        .bind(exercise_data.description)
        .bind(Json(exercise_data.targets))
        .bind(created_by)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(exercise_id = %exercise.id, "Created shooting exercise");
        Ok(exercise)
    }

    pub async fn get_exercise(&self, exercise_id: Uuid) -> Result<Option<ShootingExercise>> {
        let exercise = sqlx::query_as::<_, ShootingExercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM shooting_exercises WHERE id = $1"
        ))
        .bind(exercise_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(exercise)
    }

    pub async fn list_exercises(&self) -> Result<Vec<ShootingExercise>> {
        let exercises = sqlx::query_as::<_, ShootingExercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM shooting_exercises ORDER BY title"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(exercises)
    }

    pub async fn update_exercise(
        &self,
        exercise_id: Uuid,
        exercise_data: UpdateShootingExercise,
    ) -> Result<Option<ShootingExercise>> {
        if let Some(title) = &exercise_data.title {
            validate_name(title, "Title").map_err(DomainError::invalid)?;
        }
        if let Some(targets) = &exercise_data.targets {
            validate_shot_targets(targets).map_err(DomainError::invalid)?;
        }

        let exercise = sqlx::query_as::<_, ShootingExercise>(&format!(
            "UPDATE shooting_exercises
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 targets = COALESCE($4, targets),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {EXERCISE_COLUMNS}"
        ))
        .bind(exercise_id)
        .bind(exercise_data.title.map(|title| title.trim().to_string()))
        .bind(exercise_data.description)
        .bind(exercise_data.targets.map(Json))
        .fetch_optional(&self.db)
        .await?;

        Ok(exercise)
    }

    pub async fn delete_exercise(&self, exercise_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM shooting_exercises WHERE id = $1")
            .bind(exercise_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Ids from `ids` that have no exercise behind them.
    pub async fn missing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM shooting_exercises WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.db)
            .await?;

        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }
}
