use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CourtZone;

/// Shooting percentages for a single target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointAccuracy {
    pub zone: CourtZone,
    pub left: u32,
    pub right: u32,
    pub combined: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneAccuracy {
    pub zone: CourtZone,
    pub makes: u64,
    pub attempts: u64,
    pub accuracy: u32,
}

/// Comparison of an exercise against the athlete's earlier sessions.
///
/// `average` and `improvement` are `None` when there is no history to
/// compare against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalTrend {
    pub average: Option<u32>,
    pub prior_count: usize,
    pub improvement: Option<i32>,
}

/// How exercises are recognised as "the same" across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendMatching {
    /// Exact title equality
    #[default]
    Title,
    /// Exercise template id, falling back to title for free-form results
    Template,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseReport {
    pub result_id: Uuid,
    pub exercise_id: Option<Uuid>,
    pub title: String,
    pub completed: bool,
    pub accuracy: u32,
    pub points: Vec<PointAccuracy>,
    pub trend: HistoricalTrend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub athlete_id: Uuid,
    pub date: NaiveDate,
    pub completion: u32,
    pub overall_accuracy: u32,
    pub exercises: Vec<ExerciseReport>,
    pub zones: Vec<ZoneAccuracy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAccuracy {
    pub session_id: Uuid,
    pub date: NaiveDate,
    pub completion: u32,
    pub accuracy: u32,
    pub shots_recorded: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteAttendance {
    pub athlete_id: Uuid,
    pub summary: AttendanceSummary,
}

/// Everything the athlete dashboard shows in one payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteDashboard {
    pub athlete_id: Uuid,
    pub sessions: usize,
    pub average_completion: u32,
    pub attendance: AttendanceSummary,
    pub timeline: Vec<SessionAccuracy>,
    pub zones: Vec<ZoneAccuracy>,
    pub last_session: Option<SessionReport>,
}
