use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use super::ShotPoint;

/// Outcome of one exercise inside a submitted session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseResult {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Template the result was recorded against, when the plan provided one
    #[serde(default, alias = "exerciseId")]
    pub exercise_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default, alias = "shotPoints")]
    pub shot_points: Vec<ShotPoint>,
}

impl ExerciseResult {
    pub fn has_shots(&self) -> bool {
        !self.shot_points.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingSession {
    pub id: Uuid,
    pub athlete_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub date: NaiveDate,
    pub duration_minutes: i32,
    pub observations: String,
    pub results: Json<Vec<ExerciseResult>>,
    pub created_at: DateTime<Utc>,
}

impl TrainingSession {
    pub fn results(&self) -> &[ExerciseResult] {
        &self.results.0
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTrainingSession {
    /// Filled from the token for athletes; staff must provide it
    pub athlete_id: Option<Uuid>,
    pub plan_id: Option<Uuid>,
    pub date: NaiveDate,
    pub duration_minutes: i32,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub results: Vec<ExerciseResult>,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub athlete_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
