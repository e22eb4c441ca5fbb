mod common;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use chrono::{NaiveDate, NaiveTime};
use hoops_academy::api::create_routes;
use hoops_academy::auth::UserRole;
use hoops_academy::models::*;
use hoops_academy::services::*;
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

use common::{ApiTestHelpers, DatabaseTestHelpers, MockDataGenerator, TestDatabase, TEST_JWT_SECRET};

fn at(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
}

fn shift(section: Section, coach_id: uuid::Uuid) -> CreateShift {
    CreateShift {
        name: format!("Turno {}", section.as_str()),
        section,
        weekday: 2,
        start_time: at(17),
        end_time: at(18),
        coach_id: Some(coach_id),
        capacity: None,
    }
}

#[tokio::test]
#[serial]
async fn test_enrollment_respects_section_capacity() {
    let Some(test_db) = TestDatabase::connect().await else {
        return;
    };
    DatabaseTestHelpers::clean_database(&test_db.pool).await.unwrap();

    let users = UserService::new(test_db.pool.clone());
    let shifts = ShiftService::new(test_db.pool.clone());

    let (coach, _) = users.create_user(MockDataGenerator::create_user(UserRole::Coach)).await.unwrap();
    let (first, _) = users.create_user(MockDataGenerator::create_user(UserRole::Athlete)).await.unwrap();
    let (second, _) = users.create_user(MockDataGenerator::create_user(UserRole::Athlete)).await.unwrap();

    let personal = shifts.create_shift(shift(Section::Personalized, coach.id)).await.unwrap();
    assert_eq!(personal.capacity, 1);

    assert!(shifts.enroll_athlete(personal.id, first.id).await.unwrap());
    // Enrolling twice is a no-op
    assert!(!shifts.enroll_athlete(personal.id, first.id).await.unwrap());

    let err = shifts.enroll_athlete(personal.id, second.id).await.unwrap_err();
    assert_matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Conflict(_)));

    let err = shifts.enroll_athlete(personal.id, coach.id).await.unwrap_err();
    assert_matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Invalid(_)));

    let roster = shifts.roster(personal.id).await.unwrap().unwrap();
    assert_eq!(roster.athletes.len(), 1);
    assert_eq!(roster.free_places, 0);

    let mut oversized = shift(Section::IndividualTechnique, coach.id);
    oversized.capacity = Some(9);
    let err = shifts.create_shift(oversized).await.unwrap_err();
    assert_matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Invalid(_)));
}

#[tokio::test]
#[serial]
async fn test_attendance_resubmission_overwrites() {
    let Some(test_db) = TestDatabase::connect().await else {
        return;
    };
    DatabaseTestHelpers::clean_database(&test_db.pool).await.unwrap();

    let users = UserService::new(test_db.pool.clone());
    let shifts = ShiftService::new(test_db.pool.clone());
    let attendance = AttendanceService::new(test_db.pool.clone());
    let analytics = AnalyticsService::new(test_db.pool.clone());

    let (coach, _) = users.create_user(MockDataGenerator::create_user(UserRole::Coach)).await.unwrap();
    let (athlete, _) = users.create_user(MockDataGenerator::create_user(UserRole::Athlete)).await.unwrap();
    let group = shifts.create_shift(shift(Section::PhysicalPreparation, coach.id)).await.unwrap();
    shifts.enroll_athlete(group.id, athlete.id).await.unwrap();

    for present in [false, true] {
        attendance
            .submit(
                coach.id,
                SubmitAttendance {
                    shift_id: group.id,
                    date: day(1),
                    marks: vec![AttendanceMark { athlete_id: athlete.id, present }],
                },
            )
            .await
            .unwrap();
    }
    attendance
        .submit(
            coach.id,
            SubmitAttendance {
                shift_id: group.id,
                date: day(8),
                marks: vec![AttendanceMark { athlete_id: athlete.id, present: false }],
            },
        )
        .await
        .unwrap();

    let query = AttendanceQuery { date: None, from: None, to: None };
    let records = attendance.records_for_athlete(athlete.id, &query).await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].present);

    let report = analytics.shift_attendance(group.id, &query).await.unwrap();
    assert_eq!(report.overall.total, 2);
    assert_eq!(report.overall.rate, 50);

    // Only enrolled athletes can be marked
    let (outsider, _) = users.create_user(MockDataGenerator::create_user(UserRole::Athlete)).await.unwrap();
    let err = attendance
        .submit(
            coach.id,
            SubmitAttendance {
                shift_id: group.id,
                date: day(8),
                marks: vec![AttendanceMark { athlete_id: outsider.id, present: true }],
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Invalid(_)));
}

#[tokio::test]
#[serial]
async fn test_athlete_logs_in_and_reads_dashboard() {
    let Some(test_db) = TestDatabase::connect().await else {
        return;
    };
    DatabaseTestHelpers::clean_database(&test_db.pool).await.unwrap();

    let users = UserService::new(test_db.pool.clone());
    let sessions = TrainingSessionService::new(test_db.pool.clone());

    let athlete_data = MockDataGenerator::create_user(UserRole::Athlete);
    let email = athlete_data.email.clone();
    let (athlete, _) = users.create_user(athlete_data).await.unwrap();
    let (other, _) = users.create_user(MockDataGenerator::create_user(UserRole::Athlete)).await.unwrap();

    for (d, makes) in [(1, 4), (3, 6)] {
        sessions
            .create_session(
                athlete.id,
                CreateTrainingSession {
                    athlete_id: None,
                    plan_id: None,
                    date: day(d),
                    duration_minutes: 60,
                    observations: String::new(),
                    results: vec![MockDataGenerator::exercise_result(
                        "Tiro libre",
                        true,
                        vec![ShotPoint::one_side(CourtZone::FreeThrow, makes, 10)],
                    )],
                },
            )
            .await
            .unwrap();
    }

    let app = create_routes(test_db.pool.clone(), TEST_JWT_SECRET);

    let login = app
        .clone()
        .oneshot(ApiTestHelpers::request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email.to_uppercase(), "password": "Canasta2024" })),
        ))
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    let token = ApiTestHelpers::json_body(login).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let dashboard = app
        .clone()
        .oneshot(ApiTestHelpers::request(
            Method::GET,
            &format!("/api/v1/analytics/athletes/{}", athlete.id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(dashboard.status(), StatusCode::OK);
    let body = ApiTestHelpers::json_body(dashboard).await;
    assert_eq!(body["sessions"], 2);
    assert_eq!(body["last_session"]["exercises"][0]["trend"]["average"], 40);
    assert_eq!(body["last_session"]["exercises"][0]["trend"]["improvement"], 20);

    let forbidden = app
        .clone()
        .oneshot(ApiTestHelpers::request(
            Method::GET,
            &format!("/api/v1/analytics/athletes/{}", other.id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let too_long = app
        .clone()
        .oneshot(ApiTestHelpers::request(
            Method::POST,
            "/api/v1/sessions",
            Some(&token),
            Some(json!({ "date": "2024-10-05", "duration_minutes": 601 })),
        ))
        .await
        .unwrap();
    assert_eq!(too_long.status(), StatusCode::BAD_REQUEST);

    let logout = app
        .clone()
        .oneshot(ApiTestHelpers::request(Method::POST, "/api/v1/auth/logout", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(logout.status(), StatusCode::OK);

    let after_logout = app
        .oneshot(ApiTestHelpers::request(Method::GET, "/api/v1/auth/profile", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(after_logout.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_session_results_must_come_from_the_plan() {
    let Some(test_db) = TestDatabase::connect().await else {
        return;
    };
    DatabaseTestHelpers::clean_database(&test_db.pool).await.unwrap();

    let users = UserService::new(test_db.pool.clone());
    let shifts = ShiftService::new(test_db.pool.clone());
    let plans = TrainingPlanService::new(test_db.pool.clone());
    let sessions = TrainingSessionService::new(test_db.pool.clone());

    let (coach, _) = users.create_user(MockDataGenerator::create_user(UserRole::Coach)).await.unwrap();
    let (athlete, _) = users.create_user(MockDataGenerator::create_user(UserRole::Athlete)).await.unwrap();
    let group = shifts.create_shift(shift(Section::IndividualTechnique, coach.id)).await.unwrap();
    let plan = plans
        .create_plan(
            coach.id,
            CreateTrainingPlan {
                shift_id: group.id,
                title: "Martes de tiro".to_string(),
                session_date: day(15),
                exercises: vec![PlannedExercise { exercise_id: None, title: "Tiro libre".to_string(), notes: None }],
            },
        )
        .await
        .unwrap();

    let submission = |result: ExerciseResult, plan_id: Option<uuid::Uuid>| CreateTrainingSession {
        athlete_id: None,
        plan_id,
        date: day(15),
        duration_minutes: 45,
        observations: String::new(),
        results: vec![result],
    };
    let free_throws = || {
        MockDataGenerator::exercise_result("Tiro libre", true, vec![ShotPoint::one_side(CourtZone::FreeThrow, 7, 10)])
    };

    let recorded = sessions.create_session(athlete.id, submission(free_throws(), Some(plan.id))).await.unwrap();
    assert_eq!(recorded.plan_id, Some(plan.id));

    let mut forged = free_throws();
    forged.exercise_id = Some(uuid::Uuid::new_v4());
    let err = sessions
        .create_session(athlete.id, submission(forged.clone(), Some(plan.id)))
        .await
        .unwrap_err();
    assert_matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Invalid(_)));

    let off_plan = MockDataGenerator::exercise_result("Mates", true, vec![]);
    let err = sessions.create_session(athlete.id, submission(off_plan, Some(plan.id))).await.unwrap_err();
    assert_matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Invalid(_)));

    // Without a plan the template must still exist
    let err = sessions.create_session(athlete.id, submission(forged, None)).await.unwrap_err();
    assert_matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Invalid(_)));
}

#[tokio::test]
#[serial]
async fn test_capacity_never_drops_below_roster() {
    let Some(test_db) = TestDatabase::connect().await else {
        return;
    };
    DatabaseTestHelpers::clean_database(&test_db.pool).await.unwrap();

    let users = UserService::new(test_db.pool.clone());
    let shifts = ShiftService::new(test_db.pool.clone());

    let (coach, _) = users.create_user(MockDataGenerator::create_user(UserRole::Coach)).await.unwrap();
    let (first, _) = users.create_user(MockDataGenerator::create_user(UserRole::Athlete)).await.unwrap();
    let (second, _) = users.create_user(MockDataGenerator::create_user(UserRole::Athlete)).await.unwrap();
    let (third, _) = users.create_user(MockDataGenerator::create_user(UserRole::Athlete)).await.unwrap();

    let group = shifts.create_shift(shift(Section::IndividualTechnique, coach.id)).await.unwrap();
    shifts.enroll_athlete(group.id, first.id).await.unwrap();
    shifts.enroll_athlete(group.id, second.id).await.unwrap();

    let shrink = |capacity| UpdateShift { capacity: Some(capacity), ..UpdateShift::default() };

    let err = shifts.update_shift(group.id, shrink(1)).await.unwrap_err();
    assert_matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Conflict(_)));

    // Shrinking to the roster size races a new enrollment; one of them loses
    let (updated, enrolled) = tokio::join!(
        shifts.update_shift(group.id, shrink(2)),
        shifts.enroll_athlete(group.id, third.id),
    );
    assert!(updated.is_ok() != enrolled.is_ok());

    let roster = shifts.roster(group.id).await.unwrap().unwrap();
    assert!(roster.athletes.len() as i32 <= roster.shift.capacity);
}
