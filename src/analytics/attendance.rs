use std::collections::BTreeMap;

use uuid::Uuid;

use super::percentage;
use crate::models::{AthleteAttendance, AttendanceRecord, AttendanceSummary};

/// Percentage of records marked present; 0 for an empty list.
pub fn attendance_rate(records: &[AttendanceRecord]) -> u32 {
    attendance_summary(records.iter()).rate
}

pub fn attendance_summary<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> AttendanceSummary {
    let (total, present) = records
        .into_iter()
        .fold((0usize, 0usize), |(total, present), record| {
            (total + 1, present + usize::from(record.present))
        });

    AttendanceSummary {
        total,
        present,
        absent: total - present,
        rate: percentage(present as u64, total as u64),
    }
}

/// Summary per athlete, ordered by athlete id.
pub fn rate_by_athlete(records: &[AttendanceRecord]) -> Vec<AthleteAttendance> {
    let mut by_athlete: BTreeMap<Uuid, Vec<&AttendanceRecord>> = BTreeMap::new();
    for record in records {
        by_athlete.entry(record.athlete_id).or_default().push(record);
    }

    by_athlete
        .into_iter()
        .map(|(athlete_id, records)| AthleteAttendance {
            athlete_id,
            summary: attendance_summary(records),
        })
        .collect()
}
