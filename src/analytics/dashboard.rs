use uuid::Uuid;

use super::{accuracy_timeline, attendance_summary, completion_ratio, round_half_up, session_report, zone_breakdown};
use crate::models::{AthleteDashboard, AttendanceRecord, ExerciseResult, TrainingSession, TrendMatching};

/// Roll an athlete's whole history into the dashboard payload. The most
/// recent session gets a full report with trends against everything
/// before it.
pub fn athlete_dashboard(
    athlete_id: Uuid,
    sessions: &[TrainingSession],
    attendance: &[AttendanceRecord],
    matching: TrendMatching,
) -> AthleteDashboard {
    let average_completion = if sessions.is_empty() {
        0
    } else {
        let sum: u32 = sessions.iter().map(completion_ratio).sum();
        round_half_up(f64::from(sum) / sessions.len() as f64) as u32
    };

    let all_results: Vec<ExerciseResult> = sessions
        .iter()
        .flat_map(|session| session.results().iter().cloned())
        .collect();

    let last_session = sessions
        .iter()
        .max_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)))
        .map(|latest| session_report(sessions, latest, matching));

    AthleteDashboard {
        athlete_id,
        sessions: sessions.len(),
        average_completion,
        attendance: attendance_summary(attendance),
        timeline: accuracy_timeline(sessions),
        zones: zone_breakdown(&all_results),
        last_session,
    }
}
