use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use sqlx::PgPool;

pub async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "hoops-academy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

/// Ready once the database answers.
pub async fn readiness_check(State(db): State<PgPool>) -> Result<Json<Value>, StatusCode> {
    sqlx::query("SELECT 1").execute(&db).await.map_err(|err| {
        tracing::warn!(error = %err, "Database not reachable");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok(Json(json!({ "status": "ready", "database": "up" })))
}
