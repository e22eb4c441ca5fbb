use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One athlete's presence mark for one shift on one day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub athlete_id: Uuid,
    pub shift_id: Uuid,
    pub date: NaiveDate,
    pub present: bool,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub athlete_id: Uuid,
    pub present: bool,
}

/// Marks for a whole shift roster on a given day.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAttendance {
    pub shift_id: Uuid,
    pub date: NaiveDate,
    pub marks: Vec<AttendanceMark>,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
