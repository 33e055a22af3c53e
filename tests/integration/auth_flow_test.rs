// Login, session lifecycle, lockout and role administration over HTTP.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, App};
use federal_invest::middleware::SessionAuth;
use federal_invest::modules::users::models::Role;
use helpers::{bearer, json_body, seed_session, seed_user, services, PASSWORD};
use serde_json::json;

#[actix_web::test]
async fn test_login_returns_token_and_role_redirect() {
    let services = services();
    seed_user(&services, "investor@federal.invest", Role::Investor).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "Investor@Federal.Invest ", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body = json_body(resp).await;
    assert_eq!(body["data"]["user"]["role"], "investor");
    assert_eq!(body["data"]["landing"], "investor_dashboard");
    assert_eq!(body["data"]["redirect"], "/investor/dashboard");
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    assert_eq!(body["data"]["role"], "investor");
    assert_eq!(body["data"]["redirect"], "/investor/dashboard");
}

#[actix_web::test]
async fn test_logout_revokes_session() {
    let services = services();
    let token = seed_session(&services, "viewer@federal.invest", Role::Viewer).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);
}

#[actix_web::test]
async fn test_repeated_failures_lock_the_account() {
    let services = services();
    seed_user(&services, "editor@federal.invest", Role::Editor).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    for attempt in 1..=5 {
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "editor@federal.invest", "password": "wrong-password" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            401,
            "attempt {}",
            attempt
        );
    }

    // Locked even with the right password until the window passes
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "editor@federal.invest", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 429);
    assert!(resp.headers().get("Retry-After").is_some());
}

#[actix_web::test]
async fn test_unknown_email_is_unauthorized() {
    let services = services();
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "nobody@federal.invest", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], 401);
}

#[actix_web::test]
async fn test_admin_creates_user_and_changes_role() {
    let services = services();
    let admin = seed_session(&services, "admin@federal.invest", Role::Admin).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/admin/users")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "email": "analyst@federal.invest",
            "name": "Analyst",
            "password": "analyst-pass",
            "role": "editor",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body = json_body(resp).await;
    let user_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["role"], "editor");
    assert!(body["data"].get("password_hash").is_none());

    let analyst = services
        .auth
        .login("analyst@federal.invest", "analyst-pass")
        .await
        .unwrap()
        .token;

    let write = || {
        test::TestRequest::post()
            .uri("/finance/monthly-tax-deduction")
            .insert_header(bearer(&analyst))
            .set_json(json!({ "year": 2024, "month": 1, "value": "10" }))
            .to_request()
    };
    assert_eq!(test::call_service(&app, write()).await.status(), 200);

    let req = test::TestRequest::put()
        .uri(&format!("/admin/users/{}/role", user_id))
        .insert_header(bearer(&admin))
        .set_json(json!({ "role": "viewer" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    // The role cache entry is dropped, so the demotion applies immediately
    assert_eq!(test::call_service(&app, write()).await.status(), 403);
}

#[actix_web::test]
async fn test_duplicate_email_rejected() {
    let services = services();
    let admin = seed_session(&services, "admin@federal.invest", Role::Admin).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/admin/users")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "email": "admin@federal.invest",
            "name": "Second admin",
            "password": "another-pass",
            "role": "admin",
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}

#[actix_web::test]
async fn test_role_change_for_unknown_user_is_not_found() {
    let services = services();
    let admin = seed_session(&services, "admin@federal.invest", Role::Admin).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/admin/users/does-not-exist/role")
        .insert_header(bearer(&admin))
        .set_json(json!({ "role": "viewer" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_non_admin_cannot_manage_users() {
    let services = services();
    let editor = seed_session(&services, "editor@federal.invest", Role::Editor).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/admin/users")
        .insert_header(bearer(&editor))
        .set_json(json!({
            "email": "someone@federal.invest",
            "name": "Someone",
            "password": "someone-pass",
            "role": "admin",
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);
}

#[actix_web::test]
async fn test_health_is_public() {
    let services = services();
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
}
