use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Training track a shift belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "training_section", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Section {
    #[sqlx(rename = "preparacion_fisica")]
    #[serde(rename = "preparacion_fisica")]
    PhysicalPreparation,
    #[sqlx(rename = "tecnica_individual")]
    #[serde(rename = "tecnica_individual")]
    IndividualTechnique,
    #[sqlx(rename = "personalizado")]
    #[serde(rename = "personalizado")]
    Personalized,
}

impl Section {
    /// Largest roster a shift in this section may have.
    pub fn max_capacity(&self) -> i32 {
        match self {
            Section::PhysicalPreparation => 20,
            Section::IndividualTechnique => 8,
            Section::Personalized => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::PhysicalPreparation => "preparacion_fisica",
            Section::IndividualTechnique => "tecnica_individual",
            Section::Personalized => "personalizado",
        }
    }
}

/// A recurring training slot (turno).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Shift {
    pub id: Uuid,
    pub name: String,
    pub section: Section,
    /// ISO weekday, 1 = Monday
    pub weekday: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub coach_id: Option<Uuid>,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateShift {
    pub name: String,
    pub section: Section,
    pub weekday: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub coach_id: Option<Uuid>,
    /// Defaults to the section cap
    pub capacity: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateShift {
    pub name: Option<String>,
    pub weekday: Option<i16>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub coach_id: Option<Uuid>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRoster {
    pub shift: Shift,
    pub athletes: Vec<super::UserResponse>,
    pub free_places: i32,
}
