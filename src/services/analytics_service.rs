use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::analytics;
use crate::models::{
    AthleteAttendance, AthleteDashboard, AttendanceQuery, AttendanceSummary, SessionReport, TrendMatching,
};
use crate::services::errors::DomainError;
use crate::services::{AttendanceService, ShiftService, TrainingSessionService};

/// Attendance figures for one shift over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftAttendanceReport {
    pub shift_id: Uuid,
    pub overall: AttendanceSummary,
    pub athletes: Vec<AthleteAttendance>,
}

/// Loads records and hands them to the pure calculators in
/// [`crate::analytics`].
#[derive(Clone)]
pub struct AnalyticsService {
    sessions: TrainingSessionService,
    attendance: AttendanceService,
    shifts: ShiftService,
}

impl AnalyticsService {
    pub fn new(db: PgPool) -> Self {
        Self {
            sessions: TrainingSessionService::new(db.clone()),
            attendance: AttendanceService::new(db.clone()),
            shifts: ShiftService::new(db),
        }
    }

    pub async fn session_report(&self, session_id: Uuid, matching: TrendMatching) -> Result<Option<SessionReport>> {
        let Some(session) = self.sessions.get_session_by_id(session_id).await? else {
            return Ok(None);
        };

        let history = self.sessions.history(session.athlete_id, Some(session.date)).await?;
        Ok(Some(analytics::session_report(&history, &session, matching)))
    }

    pub async fn athlete_dashboard(
        &self,
        athlete_id: Uuid,
        query: &AttendanceQuery,
        matching: TrendMatching,
    ) -> Result<AthleteDashboard> {
        let sessions = self.sessions.history(athlete_id, query.to).await?;
        let sessions: Vec<_> = match query.from {
            Some(from) => sessions.into_iter().filter(|session| session.date >= from).collect(),
            None => sessions,
        };
        let attendance = self.attendance.records_for_athlete(athlete_id, query).await?;

        tracing::debug!(%athlete_id, sessions = sessions.len(), "Building athlete dashboard");
        Ok(analytics::athlete_dashboard(athlete_id, &sessions, &attendance, matching))
    }

    pub async fn shift_attendance(&self, shift_id: Uuid, query: &AttendanceQuery) -> Result<ShiftAttendanceReport> {
        if self.shifts.get_shift(shift_id).await?.is_none() {
            return Err(DomainError::NotFound("Shift").into());
        }

        let records = self.attendance.records_for_shift(shift_id, query).await?;
        Ok(ShiftAttendanceReport {
            shift_id,
            overall: analytics::attendance_summary(&records),
            athletes: analytics::rate_by_athlete(&records),
        })
    }
}
