// Business logic services

pub mod analytics_service;
pub mod attendance_service;
pub mod errors;
pub mod exercise_service;
pub mod shift_service;
pub mod training_plan_service;
pub mod training_session_service;
pub mod user_service;

pub use analytics_service::{AnalyticsService, ShiftAttendanceReport};
pub use attendance_service::AttendanceService;
pub use errors::DomainError;
pub use exercise_service::ExerciseService;
pub use shift_service::ShiftService;
pub use training_plan_service::TrainingPlanService;
pub use training_session_service::TrainingSessionService;
pub use user_service::UserService;
