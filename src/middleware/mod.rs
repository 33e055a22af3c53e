pub mod auth;
pub mod error_handler;
pub mod rate_limit;
pub mod request_id;

pub use auth::{SessionAuth, SessionToken};
pub use rate_limit::RateLimiter;
pub use request_id::{RequestId, RequestIdMiddlewareFactory};
