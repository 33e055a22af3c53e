pub mod auth_service;
pub mod dispatcher;
pub mod login_limiter;
pub mod password;

pub use auth_service::{AuthService, LoginOutcome, RoleCache};
pub use dispatcher::{dispatch, LandingView};
pub use login_limiter::LoginAttemptLimiter;
