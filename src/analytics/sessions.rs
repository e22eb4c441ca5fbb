use uuid::Uuid;

use super::shooting::{exercise_accuracy, point_accuracy, totals, zone_breakdown};
use super::{percentage, round_half_up};
use crate::models::{
    ExerciseReport, ExerciseResult, HistoricalTrend, SessionAccuracy, SessionReport,
    TrainingSession, TrendMatching,
};

/// Share of a session's exercises marked completed; 0 for an empty session.
pub fn completion_ratio(session: &TrainingSession) -> u32 {
    let results = session.results();
    let completed = results.iter().filter(|result| result.completed).count();
    percentage(completed as u64, results.len() as u64)
}

/// Identity used to recognise one exercise across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseKey<'a> {
    Title(&'a str),
    Template(Uuid),
}

impl<'a> ExerciseKey<'a> {
    /// Key for `result` under the given matching mode. Results without a
    /// template id always match by title.
    pub fn for_result(result: &'a ExerciseResult, matching: TrendMatching) -> Self {
        match (matching, result.exercise_id) {
            (TrendMatching::Template, Some(id)) => ExerciseKey::Template(id),
            _ => ExerciseKey::Title(&result.title),
        }
    }

    pub fn matches(&self, result: &ExerciseResult) -> bool {
        match self {
            ExerciseKey::Title(title) => result.title == *title,
            ExerciseKey::Template(id) => result.exercise_id == Some(*id),
        }
    }
}

/// Compare an exercise in `current` against the same exercise in the
/// athlete's earlier sessions, matching by exact title.
pub fn historical_average(
    history: &[TrainingSession],
    current: &TrainingSession,
    exercise_title: &str,
) -> HistoricalTrend {
    historical_average_by(history, current, ExerciseKey::Title(exercise_title))
}

/// Same as [`historical_average`] with an explicit matching key.
///
/// Only sessions dated strictly before `current` count, and only their
/// first matching result when it recorded shots.
pub fn historical_average_by(
    history: &[TrainingSession],
    current: &TrainingSession,
    key: ExerciseKey<'_>,
) -> HistoricalTrend {
    let prior: Vec<u32> = history
        .iter()
        .filter(|session| session.date < current.date && session.id != current.id)
        .filter_map(|session| session.results().iter().find(|result| key.matches(result)))
        .filter(|result| result.has_shots())
        .map(|result| exercise_accuracy(&result.shot_points))
        .collect();

    if prior.is_empty() {
        return HistoricalTrend::default();
    }

    let mean = prior.iter().map(|&accuracy| f64::from(accuracy)).sum::<f64>() / prior.len() as f64;

    let improvement = current
        .results()
        .iter()
        .find(|result| key.matches(result))
        .map(|result| {
            let now = f64::from(exercise_accuracy(&result.shot_points));
            round_half_up(now - mean) as i32
        });

    HistoricalTrend {
        average: Some(round_half_up(mean) as u32),
        prior_count: prior.len(),
        improvement,
    }
}

/// Full breakdown of one session with a trend line per exercise.
pub fn session_report(
    history: &[TrainingSession],
    current: &TrainingSession,
    matching: TrendMatching,
) -> SessionReport {
    let exercises = current
        .results()
        .iter()
        .map(|result| ExerciseReport {
            result_id: result.id,
            exercise_id: result.exercise_id,
            title: result.title.clone(),
            completed: result.completed,
            accuracy: exercise_accuracy(&result.shot_points),
            points: result.shot_points.iter().map(point_accuracy).collect(),
            trend: historical_average_by(history, current, ExerciseKey::for_result(result, matching)),
        })
        .collect();

    SessionReport {
        session_id: current.id,
        athlete_id: current.athlete_id,
        date: current.date,
        completion: completion_ratio(current),
        overall_accuracy: session_accuracy(current),
        exercises,
        zones: zone_breakdown(current.results()),
    }
}

/// Accuracy over every shot recorded in the session.
pub fn session_accuracy(session: &TrainingSession) -> u32 {
    let (makes, attempts) = totals(session.results().iter().flat_map(|result| result.shot_points.iter()));
    percentage(makes, attempts)
}

/// One point per session, oldest first.
pub fn accuracy_timeline(sessions: &[TrainingSession]) -> Vec<SessionAccuracy> {
    let mut timeline: Vec<SessionAccuracy> = sessions
        .iter()
        .map(|session| SessionAccuracy {
            session_id: session.id,
            date: session.date,
            completion: completion_ratio(session),
            accuracy: session_accuracy(session),
            shots_recorded: session.results().iter().any(ExerciseResult::has_shots),
        })
        .collect();

    timeline.sort_by_key(|point| point.date);
    timeline
}
