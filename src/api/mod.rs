// API routes and handlers

pub mod admin;
pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod error;
pub mod exercises;
pub mod health;
pub mod plans;
pub mod routes;
pub mod sessions;
pub mod shifts;

pub use error::{ApiError, ApiRejection, ApiResult};
pub use routes::{create_routes, create_routes_with_login_limit};
