// Data models shared by services and API handlers

pub mod user;
pub mod shift;
pub mod attendance;
pub mod shooting;
pub mod training_plan;
pub mod training_session;
pub mod analytics;
pub mod validation;

pub use user::*;
pub use shift::*;
pub use attendance::*;
pub use shooting::*;
pub use training_plan::*;
pub use training_session::*;
pub use analytics::*;
pub use validation::*;
