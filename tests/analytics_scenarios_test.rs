mod common;

use chrono::NaiveDate;
use hoops_academy::analytics::*;
use hoops_academy::models::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use uuid::Uuid;

use common::MockDataGenerator;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
}

#[test]
fn test_single_side_target() {
    let points = vec![ShotPoint::one_side(CourtZone::CornerLeft, 5, 10)];
    assert_eq!(exercise_accuracy(&points), 50);
}

#[test]
fn test_two_sided_target_counts_makes_twice() {
    let points = vec![ShotPoint::both_sides(CourtZone::Top, 8, 20, 16)];
    assert_eq!(exercise_accuracy(&points), 44);

    let accuracy = point_accuracy(&points[0]);
    assert_eq!(accuracy.left, 40);
    assert_eq!(accuracy.right, 50);
    assert_eq!(accuracy.combined, 44);
}

#[test]
fn test_completion_of_partly_finished_session() {
    let athlete = Uuid::new_v4();
    let results = (0..5)
        .map(|i| MockDataGenerator::exercise_result(&format!("Ejercicio {i}"), i < 3, vec![]))
        .collect();
    let session = MockDataGenerator::training_session(athlete, day(2), results);

    assert_eq!(completion_ratio(&session), 60);
}

#[test]
fn test_free_throw_trend_against_history() {
    let athlete = Uuid::new_v4();
    let free_throws = |makes, attempts| {
        vec![MockDataGenerator::exercise_result(
            "Tiro libre",
            true,
            vec![ShotPoint::one_side(CourtZone::FreeThrow, makes, attempts)],
        )]
    };

    let history = vec![
        MockDataGenerator::training_session(athlete, day(3), free_throws(4, 10)),
        MockDataGenerator::training_session(athlete, day(5), free_throws(6, 10)),
        // Later than the current session, ignored
        MockDataGenerator::training_session(athlete, day(20), free_throws(1, 10)),
    ];
    let current = MockDataGenerator::training_session(athlete, day(10), free_throws(7, 10));

    let trend = historical_average(&history, &current, "Tiro libre");
    assert_eq!(trend.average, Some(50));
    assert_eq!(trend.prior_count, 2);
    assert_eq!(trend.improvement, Some(20));

    let report = session_report(&history, &current, TrendMatching::Title);
    assert_eq!(report.overall_accuracy, 70);
    assert_eq!(report.exercises[0].trend, trend);
}

#[test]
fn test_template_matching_survives_renames() {
    let athlete = Uuid::new_v4();
    let template = Uuid::new_v4();
    let mut before = MockDataGenerator::exercise_result(
        "Triples esquina",
        true,
        vec![ShotPoint::one_side(CourtZone::CornerRight, 3, 10)],
    );
    before.exercise_id = Some(template);
    let mut now = MockDataGenerator::exercise_result(
        "Triples desde la esquina",
        true,
        vec![ShotPoint::one_side(CourtZone::CornerRight, 5, 10)],
    );
    now.exercise_id = Some(template);

    let history = vec![MockDataGenerator::training_session(athlete, day(1), vec![before])];
    let current = MockDataGenerator::training_session(athlete, day(8), vec![now]);

    let by_title = session_report(&history, &current, TrendMatching::Title);
    assert_eq!(by_title.exercises[0].trend, HistoricalTrend::default());

    let by_template = session_report(&history, &current, TrendMatching::Template);
    assert_eq!(by_template.exercises[0].trend.average, Some(30));
    assert_eq!(by_template.exercises[0].trend.improvement, Some(20));
}

#[test]
fn test_attendance_rate_over_ten_days() {
    let athlete = Uuid::new_v4();
    let shift = Uuid::new_v4();
    let records: Vec<_> = (1..=10)
        .map(|d| MockDataGenerator::attendance(athlete, shift, day(d), d <= 7))
        .collect();

    assert_eq!(attendance_rate(&records), 70);
    assert_eq!(attendance_rate(&[]), 0);

    let summary = attendance_summary(&records);
    assert_eq!(summary.present, 7);
    assert_eq!(summary.absent, 3);
}

#[test]
fn test_dashboard_over_random_sessions() {
    let athlete = Uuid::new_v4();
    let sessions: Vec<_> = (1..=6)
        .map(|d| {
            let points = (0..3).map(|_| MockDataGenerator::shot_point()).collect();
            MockDataGenerator::training_session(
                athlete,
                day(d),
                vec![MockDataGenerator::exercise_result("Rueda de triples", d % 2 == 0, points)],
            )
        })
        .collect();

    let dashboard = athlete_dashboard(athlete, &sessions, &[], TrendMatching::Title);
    assert_eq!(dashboard.sessions, 6);
    assert_eq!(dashboard.average_completion, 50);
    assert_eq!(dashboard.timeline.len(), 6);
    assert!(dashboard.timeline.windows(2).all(|pair| pair[0].date <= pair[1].date));

    let last = dashboard.last_session.unwrap();
    assert_eq!(last.date, day(6));
    assert_eq!(last.exercises[0].trend.prior_count, 5);
}

proptest! {
    #[test]
    fn prop_accuracy_is_a_percentage_when_makes_fit(
        makes in 0u32..50,
        extra_left in 0u32..50,
        extra_right in 0u32..50,
    ) {
        let point = ShotPoint::both_sides(CourtZone::WingRight, makes, makes + extra_left, makes + extra_right);
        let accuracy = point_accuracy(&point);
        prop_assert!(accuracy.left <= 100);
        prop_assert!(accuracy.right <= 100);
        prop_assert!(accuracy.combined <= 100);
        prop_assert_eq!(accuracy.combined, exercise_accuracy(&[point]));
    }
}
