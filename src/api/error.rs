use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::UserSession;
use crate::services::DomainError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub error_code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details (optional)
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            error_code: code.to_string(),
            message: message.to_string(),
            details: None,
        }
    }
}

pub type ApiRejection = (StatusCode, Json<ApiError>);
pub type ApiResult<T> = Result<Json<T>, ApiRejection>;

/// A bare `ApiError` is what extractors reject malformed input with.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new("INVALID_BODY", &rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::new("INVALID_QUERY", &rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::new("INVALID_PATH", &rejection.body_text())
    }
}

pub fn bad_request(message: &str) -> ApiRejection {
    (StatusCode::BAD_REQUEST, Json(ApiError::new("VALIDATION_ERROR", message)))
}

pub fn not_found(what: &str) -> ApiRejection {
    (StatusCode::NOT_FOUND, Json(ApiError::new("NOT_FOUND", &format!("{what} not found"))))
}

pub fn forbidden() -> ApiRejection {
    (
        StatusCode::FORBIDDEN,
        Json(ApiError::new("FORBIDDEN", "Insufficient permissions")),
    )
}

/// Translate a service failure. Business-rule errors keep their message;
/// anything else is logged and reported as a bare 500.
pub fn service_error(err: anyhow::Error) -> ApiRejection {
    match err.downcast_ref::<DomainError>() {
        Some(DomainError::NotFound(what)) => not_found(what),
        Some(DomainError::Conflict(message)) => (StatusCode::CONFLICT, Json(ApiError::new("CONFLICT", message))),
        Some(DomainError::Invalid(message)) => bad_request(message),
        None => {
            tracing::error!(error = %err, "Service call failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("INTERNAL_ERROR", "Internal server error")),
            )
        }
    }
}

pub fn ensure_staff(session: &UserSession) -> Result<(), ApiRejection> {
    if session.is_staff() {
        Ok(())
    } else {
        Err(forbidden())
    }
}

pub fn ensure_can_view(session: &UserSession, athlete_id: Uuid) -> Result<(), ApiRejection> {
    if session.can_view_athlete(athlete_id) {
        Ok(())
    } else {
        Err(forbidden())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_domain_errors_map_to_client_statuses() {
        let (status, body) = service_error(DomainError::NotFound("Shift").into());
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Shift not found");

        let (status, body) = service_error(DomainError::Conflict("Shift is full (8 places)".into()).into());
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error_code, "CONFLICT");

        let (status, _) = service_error(DomainError::invalid("Duration must be between 1 and 600 minutes").into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unexpected_errors_hide_details() {
        let (status, body) = service_error(anyhow::anyhow!("connection reset by peer"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Internal server error");
        assert_matches!(body.details, None);
    }

    #[test]
    fn test_athletes_only_see_themselves() {
        let athlete_id = Uuid::new_v4();
        let session = UserSession {
            user_id: athlete_id,
            email: "lucia@example.com".to_string(),
            role: crate::auth::UserRole::Athlete,
            jti: "jti".to_string(),
            expires_at: 0,
        };

        assert!(ensure_can_view(&session, athlete_id).is_ok());
        assert_matches!(ensure_can_view(&session, Uuid::new_v4()), Err((StatusCode::FORBIDDEN, _)));
        assert!(ensure_staff(&session).is_err());
    }
}
