use anyhow::{anyhow, Result};
use std::collections::HashSet;

use super::{
    CreateShift, CreateTrainingSession, ExerciseResult, PlannedExercise, Section, ShotTarget, SubmitAttendance,
};

/// Upper bound for makes and attempts on a single side of a shot point
pub const MAX_SHOTS_PER_SIDE: u32 = 10_000;

/// Email validation
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(anyhow!("Email cannot be empty"));
    }

    if !email.contains('@') || !email.contains('.') {
        return Err(anyhow!("Invalid email format"));
    }

    if email.len() > 255 {
        return Err(anyhow!("Email cannot be longer than 255 characters"));
    }

    Ok(())
}

pub fn validate_name(name: &str, field_name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{} cannot be empty", field_name));
    }
    if trimmed.len() > 100 {
        return Err(anyhow!("{} cannot be longer than 100 characters", field_name));
    }
    Ok(())
}

/// Capacity must fit the section cap
pub fn validate_capacity(section: Section, capacity: i32) -> Result<()> {
    if capacity < 1 || capacity > section.max_capacity() {
        return Err(anyhow!(
            "Capacity for {} must be between 1 and {}",
            section.as_str(),
            section.max_capacity()
        ));
    }
    Ok(())
}

pub fn validate_weekday(weekday: i16) -> Result<()> {
    if !(1..=7).contains(&weekday) {
        return Err(anyhow!("Weekday must be between 1 (Monday) and 7 (Sunday)"));
    }
    Ok(())
}

pub fn validate_shift(shift: &CreateShift) -> Result<()> {
    validate_name(&shift.name, "Shift name")?;
    validate_weekday(shift.weekday)?;

    if shift.end_time <= shift.start_time {
        return Err(anyhow!("Shift must end after it starts"));
    }

    if let Some(capacity) = shift.capacity {
        validate_capacity(shift.section, capacity)?;
    }

    Ok(())
}

pub fn validate_shot_targets(targets: &[ShotTarget]) -> Result<()> {
    if targets.is_empty() {
        return Err(anyhow!("A shooting exercise needs at least one target"));
    }

    if let Some(target) = targets.iter().find(|target| target.target_makes == 0) {
        return Err(anyhow!("Target at {} must require at least one make", target.zone.as_str()));
    }

    if let Some(target) = targets.iter().find(|target| target.target_makes > MAX_SHOTS_PER_SIDE) {
        return Err(anyhow!(
            "Target at {} cannot require more than {} makes",
            target.zone.as_str(),
            MAX_SHOTS_PER_SIDE
        ));
    }

    Ok(())
}

pub fn validate_plan_exercises(exercises: &[PlannedExercise]) -> Result<()> {
    if exercises.is_empty() {
        return Err(anyhow!("A training plan needs at least one exercise"));
    }

    if exercises.iter().any(|exercise| exercise.title.trim().is_empty()) {
        return Err(anyhow!("Planned exercises need a title"));
    }

    Ok(())
}

/// Validate session duration in minutes
pub fn validate_duration(minutes: i32) -> Result<()> {
    if !(1..=600).contains(&minutes) {
        return Err(anyhow!("Duration must be between 1 and 600 minutes"));
    }
    Ok(())
}

/// Every result must correspond to a step of the plan: by template when the
/// result names one, by title otherwise.
pub fn validate_results_against_plan(results: &[ExerciseResult], planned: &[PlannedExercise]) -> Result<()> {
    for result in results {
        let in_plan = planned.iter().any(|step| match result.exercise_id {
            Some(exercise_id) => step.exercise_id == Some(exercise_id),
            None => step.title.trim() == result.title.trim(),
        });
        if !in_plan {
            return Err(anyhow!("Exercise '{}' is not part of the training plan", result.title.trim()));
        }
    }
    Ok(())
}

pub fn validate_session(session: &CreateTrainingSession) -> Result<()> {
    validate_duration(session.duration_minutes)?;

    if session.results.iter().any(|result| result.title.trim().is_empty()) {
        return Err(anyhow!("Every exercise result needs a title"));
    }

    for result in &session.results {
        let oversized = result.shot_points.iter().find(|point| {
            [point.target_makes, point.attempts_left, point.attempts_right]
                .into_iter()
                .flatten()
                .any(|count| count > MAX_SHOTS_PER_SIDE)
        });
        if let Some(point) = oversized {
            return Err(anyhow!(
                "Shot counts at {} in '{}' cannot exceed {} per side",
                point.zone.as_str(),
                result.title.trim(),
                MAX_SHOTS_PER_SIDE
            ));
        }
    }

    Ok(())
}

/// An athlete may appear only once per submission
pub fn validate_attendance(submission: &SubmitAttendance) -> Result<()> {
    if submission.marks.is_empty() {
        return Err(anyhow!("Attendance submission has no marks"));
    }

    let mut seen = HashSet::new();
    for mark in &submission.marks {
        if !seen.insert(mark.athlete_id) {
            return Err(anyhow!("Athlete {} is marked more than once", mark.athlete_id));
        }
    }

    Ok(())
}
