use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::middleware::auth::SessionToken;
use crate::modules::users::models::{AuthenticatedUser, Role};
use crate::modules::users::services::{dispatch, AuthService, LandingView};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user_id: String,
    pub role: Role,
    pub landing: LandingView,
    pub redirect: &'static str,
}

/// POST /auth/login
pub async fn login(
    auth: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let outcome = auth.login(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "data": outcome })))
}

/// POST /auth/logout
pub async fn logout(auth: web::Data<AuthService>, token: SessionToken) -> Result<HttpResponse> {
    auth.logout(&token.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /auth/me
pub async fn me(user: AuthenticatedUser) -> Result<HttpResponse> {
    let landing = dispatch(user.role);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "data": CurrentUserResponse {
            user_id: user.user_id,
            role: user.role,
            landing,
            redirect: landing.path(),
        }
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/login", web::post().to(login))
        .route("/auth/logout", web::post().to(logout))
        .route("/auth/me", web::get().to(me));
}
