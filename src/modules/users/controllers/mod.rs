mod admin_controller;
mod auth_controller;

use actix_web::web;

pub use admin_controller::{create_user, update_user_role, UpdateRoleRequest};
pub use auth_controller::{login, logout, me, CurrentUserResponse, LoginRequest};

pub fn configure(cfg: &mut web::ServiceConfig) {
    auth_controller::configure(cfg);
    admin_controller::configure(cfg);
}
