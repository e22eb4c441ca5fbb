use thiserror::Error;

/// Business-rule failures the API layer maps to 4xx responses. Services
/// return them inside `anyhow::Error`; anything else is a 500.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Invalid(String),
}

impl DomainError {
    pub fn invalid(err: impl std::fmt::Display) -> Self {
        DomainError::Invalid(err.to_string())
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
