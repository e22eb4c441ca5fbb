use anyhow::Result;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::models::{
    validate_name, validate_plan_exercises, CreateTrainingPlan, PlanQuery, PlannedExercise, TrainingPlan,
    UpdateTrainingPlan,
};
use crate::services::errors::DomainError;
use crate::services::ExerciseService;

const PLAN_COLUMNS: &str = "id, coach_id, shift_id, title, session_date, exercises, created_at, updated_at";

#[derive(Clone)]
pub struct TrainingPlanService {
    db: PgPool,
    exercises: ExerciseService,
}

impl TrainingPlanService {
    pub fn new(db: PgPool) -> Self {
        Self {
            exercises: ExerciseService::new(db.clone()),
            db,
        }
    }

    pub async fn create_plan(&self, coach_id: Uuid, plan_data: CreateTrainingPlan) -> Result<TrainingPlan> {
        validate_name(&plan_data.title, "Title").map_err(DomainError::invalid)?;
        self.check_exercises(&plan_data.exercises).await?;

        let shift_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM shifts WHERE id = $1)")
            .bind(plan_data.shift_id)
            .fetch_one(&self.db)
            .await?;
        if !shift_exists {
            return Err(DomainError::NotFound("Shift").into());
        }

        let plan = sqlx::query_as::<_, TrainingPlan>(&format!(
            "INSERT INTO training_plans (id, coach_id, shift_id, title, session_date, exercises)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(coach_id)
        .bind(plan_data.shift_id)
        .bind(plan_data.title.trim())
        .bind(plan_data.session_date)
        .bind(Json(plan_data.exercises))
        .fetch_one(&self.db)
        .await?;

        tracing::info!(plan_id = %plan.id, shift_id = %plan.shift_id, "Created training plan");
        Ok(plan)
    }

    pub async fn get_plan(&self, plan_id: Uuid) -> Result<Option<TrainingPlan>> {
        let plan = sqlx::query_as::<_, TrainingPlan>(&format!("SELECT {PLAN_COLUMNS} FROM training_plans WHERE id = $1"))
            .bind(plan_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(plan)
    }

    pub async fn list_plans(&self, query: &PlanQuery) -> Result<Vec<TrainingPlan>> {
        let plans = sqlx::query_as::<_, TrainingPlan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM training_plans
             WHERE ($1::uuid IS NULL OR shift_id = $1)
               AND ($2::date IS NULL OR session_date >= $2)
               AND ($3::date IS NULL OR session_date <= $3)
             ORDER BY session_date DESC, created_at DESC"
        ))
        .bind(query.shift_id)
        .bind(query.from)
        .bind(query.to)
        .fetch_all(&self.db)
        .await?;

        Ok(plans)
    }

    pub async fn update_plan(&self, plan_id: Uuid, plan_data: UpdateTrainingPlan) -> Result<Option<TrainingPlan>> {
        if let Some(title) = &plan_data.title {
            validate_name(title, "Title").map_err(DomainError::invalid)?;
        }
        if let Some(exercises) = &plan_data.exercises {
            self.check_exercises(exercises).await?;
        }

        let plan = sqlx::query_as::<_, TrainingPlan>(&format!(
            "UPDATE training_plans
             SET title = COALESCE($2, title),
                 session_date = COALESCE($3, session_date),
                 exercises = COALESCE($4, exercises),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(plan_id)
        .bind(plan_data.title.map(|title| title.trim().to_string()))
        .bind(plan_data.session_date)
        .bind(plan_data.exercises.map(Json))
        .fetch_optional(&self.db)
        .await?;

        Ok(plan)
    }

    pub async fn delete_plan(&self, plan_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM training_plans WHERE id = $1")
            .bind(plan_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn check_exercises(&self, exercises: &[PlannedExercise]) -> Result<()> {
        validate_plan_exercises(exercises).map_err(DomainError::invalid)?;

        let referenced: Vec<Uuid> = exercises.iter().filter_map(|exercise| exercise.exercise_id).collect();
        let missing = self.exercises.missing_ids(&referenced).await?;
        if let Some(id) = missing.first() {
            return Err(DomainError::Invalid(format!("Shooting exercise {id} does not exist")).into());
        }

        Ok(())
    }
}
