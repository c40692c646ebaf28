pub mod signup;

pub use signup::{SignupRequest, SIGNUP_SUBJECT};
