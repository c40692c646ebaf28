pub mod health;
pub mod signup;

pub use health::{health_check, readiness_check};
pub use signup::{notify_signup, preflight};
