// HTTP tests for the deduction endpoints: period fan-out on write,
// aggregation on read, validation and role checks.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, App};
use federal_invest::middleware::SessionAuth;
use federal_invest::modules::users::models::Role;
use helpers::{bearer, decimal, json_body, seed_session, services};
use rust_decimal_macros::dec;
use serde_json::json;

#[actix_web::test]
async fn test_quarterly_write_splits_into_months() {
    let services = services();
    let token = seed_session(&services, "editor@federal.invest", Role::Editor).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/finance/tax_deduction")
        .insert_header(bearer(&token))
        .set_json(json!({ "year": 2024, "quarter": 1, "value": "9000" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    assert_eq!(decimal(&body["data"]["value"]), dec!(9000));

    for month in 1..=3 {
        let req = test::TestRequest::get()
            .uri(&format!("/finance/monthly-tax-deduction?year=2024&month={}", month))
            .insert_header(bearer(&token))
            .to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(decimal(&body["data"]["value"]), dec!(3000), "month {}", month);
    }

    let req = test::TestRequest::get()
        .uri("/finance/tax_deduction/breakdown?period_type=quarterly&year=2024&quarter=1")
        .insert_header(bearer(&token))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["months"].as_array().unwrap().len(), 3);
    assert_eq!(decimal(&body["data"]["total"]), dec!(9000));
}

#[actix_web::test]
async fn test_uneven_quarter_reads_back_exactly() {
    let services = services();
    let token = seed_session(&services, "admin@federal.invest", Role::Admin).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/finance/tax_deduction")
        .insert_header(bearer(&token))
        .set_json(json!({ "year": 2024, "quarter": 2, "value": "10000" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get()
        .uri("/finance/tax_deduction?year=2024&quarter=2")
        .insert_header(bearer(&token))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(decimal(&body["data"]["value"]), dec!(10000));
}

#[actix_web::test]
async fn test_annual_write_and_read() {
    let services = services();
    let token = seed_session(&services, "editor@federal.invest", Role::Editor).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/finance/annual-tax-deduction")
        .insert_header(bearer(&token))
        .set_json(json!({ "year": 2023, "value": "120000" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get()
        .uri("/finance/annual-tax-deduction?year=2023")
        .insert_header(bearer(&token))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(decimal(&body["data"]["value"]), dec!(120000));

    let req = test::TestRequest::get()
        .uri("/finance/tax_deduction?year=2023&quarter=4")
        .insert_header(bearer(&token))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(decimal(&body["data"]["value"]), dec!(30000));
}

#[actix_web::test]
async fn test_negative_value_rejected_without_writing() {
    let services = services();
    let token = seed_session(&services, "editor@federal.invest", Role::Editor).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/finance/monthly-tax-deduction")
        .insert_header(bearer(&token))
        .set_json(json!({ "year": 2024, "month": 5, "value": "-1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], 400);

    let req = test::TestRequest::get()
        .uri("/finance/monthly-tax-deduction?year=2024&month=5")
        .insert_header(bearer(&token))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(decimal(&body["data"]["value"]), dec!(0));
}

#[actix_web::test]
async fn test_out_of_range_quarter_rejected() {
    let services = services();
    let token = seed_session(&services, "editor@federal.invest", Role::Editor).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/finance/tax_deduction")
        .insert_header(bearer(&token))
        .set_json(json!({ "year": 2024, "quarter": 5, "value": "100" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}

#[actix_web::test]
async fn test_viewer_can_read_but_not_write() {
    let services = services();
    let token = seed_session(&services, "viewer@federal.invest", Role::Viewer).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/finance/tax_deduction?year=2024&quarter=1")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::post()
        .uri("/finance/tax_deduction")
        .insert_header(bearer(&token))
        .set_json(json!({ "year": 2024, "quarter": 1, "value": "100" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);
}

#[actix_web::test]
async fn test_investor_is_forbidden_from_finance() {
    let services = services();
    let token = seed_session(&services, "investor@federal.invest", Role::Investor).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/finance/tax_deduction?year=2024&quarter=1")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    let services = services();
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/finance/tax_deduction?year=2024&quarter=1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}
