use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

/// One step of a plan, pointing at a shooting exercise template or a
/// free-form drill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedExercise {
    pub exercise_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingPlan {
    pub id: Uuid,
    pub coach_id: Uuid,
    pub shift_id: Uuid,
    pub title: String,
    pub session_date: NaiveDate,
    pub exercises: Json<Vec<PlannedExercise>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTrainingPlan {
    pub shift_id: Uuid,
    pub title: String,
    pub session_date: NaiveDate,
    pub exercises: Vec<PlannedExercise>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTrainingPlan {
    pub title: Option<String>,
    pub session_date: Option<NaiveDate>,
    pub exercises: Option<Vec<PlannedExercise>>,
}

#[derive(Debug, Deserialize)]
pub struct PlanQuery {
    pub shift_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
