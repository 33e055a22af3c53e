use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::Result;
use crate::modules::users::models::{AuthenticatedUser, NewUser, Permission, Role};
use crate::modules::users::services::AuthService;

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// POST /admin/users
pub async fn create_user(
    auth: web::Data<AuthService>,
    user: AuthenticatedUser,
    body: web::Json<NewUser>,
) -> Result<HttpResponse> {
    user.require(Permission::ManageUsers)?;
    let created = auth.create_user(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "data": created })))
}

/// PUT /admin/users/{id}/role
pub async fn update_user_role(
    auth: web::Data<AuthService>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateRoleRequest>,
) -> Result<HttpResponse> {
    user.require(Permission::ManageUsers)?;
    let user_id = path.into_inner();
    auth.update_role(&user_id, body.role).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "data": { "id": user_id, "role": body.role }
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/admin/users", web::post().to(create_user))
        .route("/admin/users/{id}/role", web::put().to(update_user_role));
}
