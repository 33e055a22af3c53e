pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{AuthenticatedUser, Permission, Role};
pub use services::{AuthService, LoginAttemptLimiter, RoleCache};
