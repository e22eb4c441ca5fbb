use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{validate_attendance, AttendanceQuery, AttendanceRecord, SubmitAttendance};
use crate::services::errors::DomainError;

const ATTENDANCE_COLUMNS: &str = "id, athlete_id, shift_id, date, present, recorded_by, created_at";

#[derive(Clone)]
pub struct AttendanceService {
    db: PgPool,
}

impl AttendanceService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a day of attendance for a shift. Marks for the same athlete,
    /// shift and date overwrite the previous one, so the coach can correct
    /// a roll call by submitting it again.
    pub async fn submit(&self, recorded_by: Uuid, submission: SubmitAttendance) -> Result<Vec<AttendanceRecord>> {
        validate_attendance(&submission).map_err(DomainError::invalid)?;

        let shift_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM shifts WHERE id = $1)")
            .bind(submission.shift_id)
            .fetch_one(&self.db)
            .await?;
        if !shift_exists {
            return Err(DomainError::NotFound("Shift").into());
        }

        let enrolled: HashSet<Uuid> =
            sqlx::query_scalar::<_, Uuid>("SELECT athlete_id FROM shift_athletes WHERE shift_id = $1")
                .bind(submission.shift_id)
                .fetch_all(&self.db)
                .await?
                .into_iter()
                .collect();
        if let Some(mark) = submission.marks.iter().find(|mark| !enrolled.contains(&mark.athlete_id)) {
            return Err(DomainError::Invalid(format!("Athlete {} is not enrolled in this shift", mark.athlete_id)).into());
        }

        let mut tx = self.db.begin().await?;
        let mut records = Vec::with_capacity(submission.marks.len());
        for mark in &submission.marks {
            let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
                "INSERT INTO attendance (id, athlete_id, shift_id, date, present, recorded_by)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 ON CONFLICT (athlete_id, shift_id, date)
                 DO UPDATE SET present = EXCLUDED.present, recorded_by = EXCLUDED.recorded_by
                 RETURNING {ATTENDANCE_COLUMNS}"
            ))
            .bind(Uuid::new_v4())
            .bind(mark.athlete_id)
            .bind(submission.shift_id)
            .bind(submission.date)
            .bind(mark.present)
            .bind(recorded_by)
            .fetch_one(&mut *tx)
            .await?;
            records.push(record);
        }
        tx.commit().await?;

        tracing::info!(
            shift_id = %submission.shift_id,
            date = %submission.date,
            marks = records.len(),
            "Recorded attendance"
        );
        Ok(records)
    }

    pub async fn records_for_shift(&self, shift_id: Uuid, query: &AttendanceQuery) -> Result<Vec<AttendanceRecord>> {
        let (from, to) = date_bounds(query);

        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance
             WHERE shift_id = $1
               AND ($2::date IS NULL OR date >= $2)
               AND ($3::date IS NULL OR date <= $3)
             ORDER BY date, athlete_id"
        ))
        .bind(shift_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;

        Ok(records)
    }

    pub async fn records_for_athlete(
        &self,
        athlete_id: Uuid,
        query: &AttendanceQuery,
    ) -> Result<Vec<AttendanceRecord>> {
        let (from, to) = date_bounds(query);

        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance
             WHERE athlete_id = $1
               AND ($2::date IS NULL OR date >= $2)
               AND ($3::date IS NULL OR date <= $3)
             ORDER BY date"
        ))
        .bind(athlete_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;

        Ok(records)
    }
}

/// A single `date` narrows the range to that day.
fn date_bounds(query: &AttendanceQuery) -> (Option<NaiveDate>, Option<NaiveDate>) {
    match query.date {
        Some(date) => (Some(date), Some(date)),
        None => (query.from, query.to),
    }
}
