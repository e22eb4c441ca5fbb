use anyhow::Result;
use chrono::{Duration, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::UserRole;
use crate::models::*;
use crate::services::*;

pub struct DatabaseSeeder {
    pool: PgPool,
}

impl DatabaseSeeder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Make sure the configured administrator exists and holds the admin
    /// role. Existing accounts keep their password.
    pub async fn seed_admin(&self, email: &str, password: &str) -> Result<()> {
        let user_service = UserService::new(self.pool.clone());

        match user_service.get_user_by_email(email).await? {
            Some(user) if user.role == UserRole::Admin => {
                tracing::debug!(user_id = %user.id, "Bootstrap admin already present");
            }
            Some(user) => {
                user_service.update_role(user.id, UserRole::Admin).await?;
                tracing::info!(user_id = %user.id, "Promoted bootstrap account to admin");
            }
            None => {
                let (user, _) = user_service
                    .create_user(CreateUser {
                        email: email.to_string(),
                        password: Some(password.to_string()),
                        first_name: "Admin".to_string(),
                        last_name: "Academia".to_string(),
                        role: Some(UserRole::Admin),
                        phone: None,
                        birth_date: None,
                    })
                    .await?;
                tracing::info!(user_id = %user.id, "Created bootstrap admin");
            }
        }

        Ok(())
    }

    /// Demo roster for local development: one coach, a handful of athletes
    /// and one shift per section.
    pub async fn seed_demo_data(&self) -> Result<()> {
        tracing::info!("Starting database seeding...");

        let user_service = UserService::new(self.pool.clone());
        let shift_service = ShiftService::new(self.pool.clone());
        let exercise_service = ExerciseService::new(self.pool.clone());
        let session_service = TrainingSessionService::new(self.pool.clone());

        let coach = match user_service.get_user_by_email("entrenador@example.com").await? {
            Some(coach) => coach,
            None => {
                let (coach, _) = user_service
                    .create_user(CreateUser {
                        email: "entrenador@example.com".to_string(),
                        password: Some("Entrenador2024".to_string()),
                        first_name: "Marta".to_string(),
                        last_name: "Ruiz".to_string(),
                        role: Some(UserRole::Coach),
                        phone: None,
                        birth_date: None,
                    })
                    .await?;
                coach
            }
        };

        let mut athletes = Vec::new();
        for (email, first_name, last_name) in [
            ("lucia.gomez@example.com", "Lucía", "Gómez"),
            ("pablo.serrano@example.com", "Pablo", "Serrano"),
            ("irene.molina@example.com", "Irene", "Molina"),
        ] {
            let athlete = match user_service.get_user_by_email(email).await? {
                Some(athlete) => athlete,
                None => {
                    let (athlete, _) = user_service
                        .create_user(CreateUser {
                            email: email.to_string(),
                            password: Some("Canasta2024".to_string()),
                            first_name: first_name.to_string(),
                            last_name: last_name.to_string(),
                            role: None,
                            phone: None,
                            birth_date: None,
                        })
                        .await?;
                    tracing::info!("Created demo athlete");
                    athlete
                }
            };
            athletes.push(athlete);
        }

        if shift_service.list_shifts(None, Some(coach.id)).await?.is_empty() {
            let slots = [
                ("Físico lunes", Section::PhysicalPreparation, 1, 17),
                ("Técnica miércoles", Section::IndividualTechnique, 3, 18),
                ("Personal viernes", Section::Personalized, 5, 19),
            ];
            for (name, section, weekday, hour) in slots {
                let (Some(start_time), Some(end_time)) =
                    (NaiveTime::from_hms_opt(hour, 0, 0), NaiveTime::from_hms_opt(hour + 1, 30, 0))
                else {
                    continue;
                };
                let shift = shift_service
                    .create_shift(CreateShift {
                        name: name.to_string(),
                        section,
                        weekday,
                        start_time,
                        end_time,
                        coach_id: Some(coach.id),
                        capacity: None,
                    })
                    .await?;

                for athlete in athletes.iter().take(shift.capacity as usize) {
                    shift_service.enroll_athlete(shift.id, athlete.id).await?;
                }
                tracing::info!(shift_id = %shift.id, "Created demo shift");
            }
        }

        if exercise_service.list_exercises().await?.is_empty() {
            exercise_service
                .create_exercise(
                    coach.id,
                    CreateShootingExercise {
                        title: "Rueda de triples".to_string(),
                        description: Some("Cinco posiciones alrededor de la línea de tres".to_string()),
                        targets: vec![
                            ShotTarget { zone: CourtZone::CornerLeft, target_makes: 5, both_sides: false },
                            ShotTarget { zone: CourtZone::WingLeft, target_makes: 5, both_sides: true },
                            ShotTarget { zone: CourtZone::TopThree, target_makes: 5, both_sides: false },
                        ],
                    },
                )
                .await?;
            tracing::info!("Created demo shooting exercise");
        }

        let recent = SessionQuery { athlete_id: None, from: None, to: None, limit: Some(1), offset: None };
        for (athlete, days_ago) in athletes.iter().zip([7, 3, 1]) {
            if !session_service.list_sessions(athlete.id, &recent).await?.is_empty() {
                continue;
            }
            let session = session_service
                .create_session(
                    athlete.id,
                    CreateTrainingSession {
                        athlete_id: None,
                        plan_id: None,
                        date: Utc::now().date_naive() - Duration::days(days_ago),
                        duration_minutes: 60,
                        observations: String::new(),
                        results: vec![
                            ExerciseResult {
                                id: Uuid::new_v4(),
                                exercise_id: None,
                                title: "Tiro libre".to_string(),
                                completed: true,
                                notes: String::new(),
                                shot_points: vec![ShotPoint::one_side(CourtZone::FreeThrow, 7, 10 + days_ago as u32)],
                            },
                            ExerciseResult {
                                id: Uuid::new_v4(),
                                exercise_id: None,
                                title: "Laterales".to_string(),
                                completed: days_ago < 5,
                                notes: String::new(),
                                shot_points: vec![ShotPoint::both_sides(CourtZone::WingLeft, 5, 9, 11)],
                            },
                        ],
                    },
                )
                .await?;
            tracing::info!(session_id = %session.id, "Created demo training session");
        }

        tracing::info!("Database seeding completed!");
        Ok(())
    }
}
