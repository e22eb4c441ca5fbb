use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{generate_temporary_password, hash_password, UserRole};
use crate::models::{validate_email, validate_name, CreateUser, UpdateUser, User};
use crate::services::errors::{is_unique_violation, DomainError};

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, role, phone, birth_date, active, created_at, updated_at";

/// Academy roster: athletes, coaches and administrators.
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an account. When no password is supplied a temporary one is
    /// generated and returned so staff can hand it over.
    pub async fn create_user(&self, user_data: CreateUser) -> Result<(User, Option<String>)> {
        validate_email(&user_data.email).map_err(DomainError::invalid)?;
        validate_name(&user_data.first_name, "First name").map_err(DomainError::invalid)?;
        validate_name(&user_data.last_name, "Last name").map_err(DomainError::invalid)?;

        let (password, temporary) = match user_data.password {
            Some(password) => (password, None),
            None => {
                let generated = generate_temporary_password();
                (generated.clone(), Some(generated))
            }
        };
        let password_hash = hash_password(&password).map_err(|err| {
            if err.is_policy_violation() {
                anyhow::Error::new(DomainError::invalid(&err))
            } else {
                anyhow::Error::new(err)
            }
        })?;
        let role = user_data.role.unwrap_or(UserRole::Athlete);

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, role, phone, birth_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_data.email.trim().to_lowercase())
        .bind(password_hash)
        .bind(user_data.first_name.trim())
        .bind(user_data.last_name.trim())
        .bind(role)
        .bind(user_data.phone)
        .bind(user_data.birth_date)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                anyhow::Error::new(DomainError::Conflict("Email already exists".to_string()))
            } else {
                err.into()
            }
        })?;

        tracing::info!(user_id = %user.id, role = role.as_str(), "Created user");
        Ok((user, temporary))
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    pub async fn list_users(
        &self,
        role: Option<UserRole>,
        include_inactive: bool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>> {
        let limit = limit.unwrap_or(50).clamp(1, 200);
        let offset = offset.unwrap_or(0).max(0);

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE ($1::user_role IS NULL OR role = $1) AND ($2 OR active)
             ORDER BY last_name, first_name
             LIMIT $3 OFFSET $4"
        ))
        .bind(role)
        .bind(include_inactive)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    pub async fn update_user(&self, user_id: Uuid, user_data: UpdateUser) -> Result<Option<User>> {
        if let Some(email) = &user_data.email {
            validate_email(email).map_err(DomainError::invalid)?;
        }
        if let Some(first_name) = &user_data.first_name {
            validate_name(first_name, "First name").map_err(DomainError::invalid)?;
        }
        if let Some(last_name) = &user_data.last_name {
            validate_name(last_name, "Last name").map_err(DomainError::invalid)?;
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET email = COALESCE($2, email),
                 first_name = COALESCE($3, first_name),
                 last_name = COALESCE($4, last_name),
                 phone = COALESCE($5, phone),
                 birth_date = COALESCE($6, birth_date),
                 active = COALESCE($7, active),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(user_data.email.map(|email| email.trim().to_lowercase()))
        .bind(user_data.first_name)
        .bind(user_data.last_name)
        .bind(user_data.phone)
        .bind(user_data.birth_date)
        .bind(user_data.active)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    pub async fn update_role(&self, user_id: Uuid, role: UserRole) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(role)
        .fetch_optional(&self.db)
        .await?;

        if let Some(user) = &user {
            tracing::info!(user_id = %user.id, role = role.as_str(), "Changed user role");
        }
        Ok(user)
    }

    /// Accounts with history are deactivated rather than removed so that
    /// attendance and session records stay intact.
    pub async fn deactivate_user(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET active = false, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        sqlx::query("DELETE FROM shift_athletes WHERE athlete_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
