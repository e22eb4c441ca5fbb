//! Shooting, session and attendance aggregation.
//!
//! Everything in here is a pure function over records the caller has already
//! fetched. Nothing can fail: a zero denominator yields 0% and missing numbers
//! count as zero.

pub mod attendance;
pub mod dashboard;
pub mod sessions;
pub mod shooting;

pub use attendance::{attendance_rate, attendance_summary, rate_by_athlete};
pub use dashboard::athlete_dashboard;
pub use sessions::{
    accuracy_timeline, completion_ratio, historical_average, historical_average_by,
    session_accuracy, session_report, ExerciseKey,
};
pub use shooting::{exercise_accuracy, point_accuracy, zone_breakdown};

/// Round half toward positive infinity, so -2.5 becomes -2 and 2.5 becomes 3.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// `part / whole * 100`, rounded; 0 when `whole` is 0.
pub fn percentage(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    round_half_up(part as f64 / whole as f64 * 100.0) as u32
}
