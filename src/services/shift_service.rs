use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::UserRole;
use crate::models::{
    validate_capacity, validate_name, validate_shift, validate_weekday, CreateShift, Section, Shift, ShiftRoster,
    UpdateShift, User, UserResponse,
};
use crate::services::errors::DomainError;

const SHIFT_COLUMNS: &str =
    "id, name, section, weekday, start_time, end_time, coach_id, capacity, created_at, updated_at";

#[derive(Clone)]
pub struct ShiftService {
    db: PgPool,
}

impl ShiftService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_shift(&self, shift_data: CreateShift) -> Result<Shift> {
        validate_shift(&shift_data).map_err(DomainError::invalid)?;
        if let Some(coach_id) = shift_data.coach_id {
            self.ensure_staff(coach_id).await?;
        }

        let capacity = shift_data.capacity.unwrap_or_else(|| shift_data.section.max_capacity());

        let shift = sqlx::query_as::<_, Shift>(&format!(
            "INSERT INTO shifts (id, name, section, weekday, start_time, end_time, coach_id, capacity)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {SHIFT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(shift_data.name.trim())
        .bind(shift_data.section)
        .bind(shift_data.weekday)
        .bind(shift_data.start_time)
        .bind(shift_data.end_time)
        .bind(shift_data.coach_id)
        .bind(capacity)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(shift_id = %shift.id, section = shift.section.as_str(), "Created shift");
        Ok(shift)
    }

    pub async fn get_shift(&self, shift_id: Uuid) -> Result<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(&format!("SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = $1"))
            .bind(shift_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(shift)
    }

    pub async fn list_shifts(&self, section: Option<Section>, coach_id: Option<Uuid>) -> Result<Vec<Shift>> {
        let shifts = sqlx::query_as::<_, Shift>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts
             WHERE ($1::training_section IS NULL OR section = $1)
               AND ($2::uuid IS NULL OR coach_id = $2)
             ORDER BY weekday, start_time"
        ))
        .bind(section)
        .bind(coach_id)
        .fetch_all(&self.db)
        .await?;

        Ok(shifts)
    }

    /// Shifts the athlete is enrolled in.
    pub async fn shifts_for_athlete(&self, athlete_id: Uuid) -> Result<Vec<Shift>> {
        let shifts = sqlx::query_as::<_, Shift>(
            "SELECT s.id, s.name, s.section, s.weekday, s.start_time, s.end_time, s.coach_id, s.capacity,
                    s.created_at, s.updated_at
             FROM shifts s
             JOIN shift_athletes sa ON sa.shift_id = s.id
             WHERE sa.athlete_id = $1
             ORDER BY s.weekday, s.start_time",
        )
        .bind(athlete_id)
        .fetch_all(&self.db)
        .await?;

        Ok(shifts)
    }

    /// The shift row is locked for the capacity check so a concurrent
    /// enrollment cannot leave more athletes than places.
    pub async fn update_shift(&self, shift_id: Uuid, shift_data: UpdateShift) -> Result<Option<Shift>> {
        if let Some(name) = &shift_data.name {
            validate_name(name, "Shift name").map_err(DomainError::invalid)?;
        }
        if let Some(weekday) = shift_data.weekday {
            validate_weekday(weekday).map_err(DomainError::invalid)?;
        }
        if let Some(coach_id) = shift_data.coach_id {
            self.ensure_staff(coach_id).await?;
        }

        let mut tx = self.db.begin().await?;

        let Some(current) = sqlx::query_as::<_, Shift>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = $1 FOR UPDATE"
        ))
        .bind(shift_id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let start_time = shift_data.start_time.unwrap_or(current.start_time);
        let end_time = shift_data.end_time.unwrap_or(current.end_time);
        if end_time <= start_time {
            return Err(DomainError::Invalid("Shift must end after it starts".to_string()).into());
        }
        if let Some(capacity) = shift_data.capacity {
            validate_capacity(current.section, capacity).map_err(DomainError::invalid)?;
            let enrolled: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shift_athletes WHERE shift_id = $1")
                .bind(shift_id)
                .fetch_one(&mut *tx)
                .await?;
            if i64::from(capacity) < enrolled {
                return Err(DomainError::Conflict(format!(
                    "Capacity {capacity} is below the {enrolled} athletes already enrolled"
                ))
                .into());
            }
        }

        let shift = sqlx::query_as::<_, Shift>(&format!(
            "UPDATE shifts
             SET name = COALESCE($2, name),
                 weekday = COALESCE($3, weekday),
                 start_time = $4,
                 end_time = $5,
                 coach_id = COALESCE($6, coach_id),
                 capacity = COALESCE($7, capacity),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {SHIFT_COLUMNS}"
        ))
        .bind(shift_id)
        .bind(shift_data.name.map(|name| name.trim().to_string()))
        .bind(shift_data.weekday)
        .bind(start_time)
        .bind(end_time)
        .bind(shift_data.coach_id)
        .bind(shift_data.capacity)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(%shift_id, capacity = shift.capacity, "Updated shift");
        Ok(Some(shift))
    }

    pub async fn delete_shift(&self, shift_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM shifts WHERE id = $1")
            .bind(shift_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn roster(&self, shift_id: Uuid) -> Result<Option<ShiftRoster>> {
        let Some(shift) = self.get_shift(shift_id).await? else {
            return Ok(None);
        };

        let athletes = sqlx::query_as::<_, User>(
            "SELECT u.id, u.email, u.password_hash, u.first_name, u.last_name, u.role, u.phone, u.birth_date,
                    u.active, u.created_at, u.updated_at
             FROM users u
             JOIN shift_athletes sa ON sa.athlete_id = u.id
             WHERE sa.shift_id = $1
             ORDER BY u.last_name, u.first_name",
        )
        .bind(shift_id)
        .fetch_all(&self.db)
        .await?;

        let free_places = (shift.capacity - athletes.len() as i32).max(0);
        Ok(Some(ShiftRoster {
            shift,
            athletes: athletes.into_iter().map(UserResponse::from).collect(),
            free_places,
        }))
    }

    /// Enroll an athlete, returning `false` when they were already on the
    /// roster. The shift row is locked so concurrent enrollments cannot
    /// overshoot the capacity.
    pub async fn enroll_athlete(&self, shift_id: Uuid, athlete_id: Uuid) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        let capacity: i32 = sqlx::query_scalar("SELECT capacity FROM shifts WHERE id = $1 FOR UPDATE")
            .bind(shift_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DomainError::NotFound("Shift"))?;

        let role: Option<UserRole> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1 AND active")
            .bind(athlete_id)
            .fetch_optional(&mut *tx)
            .await?;
        match role {
            Some(UserRole::Athlete) => {}
            Some(_) => return Err(DomainError::Invalid("Only athletes can be enrolled in a shift".to_string()).into()),
            None => return Err(DomainError::NotFound("Athlete").into()),
        }

        let already_enrolled: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM shift_athletes WHERE shift_id = $1 AND athlete_id = $2)",
        )
        .bind(shift_id)
        .bind(athlete_id)
        .fetch_one(&mut *tx)
        .await?;
        if already_enrolled {
            tx.commit().await?;
            return Ok(false);
        }

        let enrolled: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shift_athletes WHERE shift_id = $1")
            .bind(shift_id)
            .fetch_one(&mut *tx)
            .await?;
        if enrolled >= i64::from(capacity) {
            return Err(DomainError::Conflict(format!("Shift is full ({capacity} places)")).into());
        }

        sqlx::query("INSERT INTO shift_athletes (shift_id, athlete_id) VALUES ($1, $2)")
            .bind(shift_id)
            .bind(athlete_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(%shift_id, %athlete_id, "Enrolled athlete");
        Ok(true)
    }

    pub async fn remove_athlete(&self, shift_id: Uuid, athlete_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM shift_athletes WHERE shift_id = $1 AND athlete_id = $2")
            .bind(shift_id)
            .bind(athlete_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ensure_staff(&self, user_id: Uuid) -> Result<()> {
        let role: Option<UserRole> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1 AND active")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        match role {
            Some(role) if role.is_staff() => Ok(()),
            Some(_) => Err(DomainError::Invalid("Shifts can only be assigned to a coach".to_string()).into()),
            None => Err(DomainError::NotFound("Coach").into()),
        }
    }
}
