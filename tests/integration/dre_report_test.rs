// HTTP tests for the DRE report: ledger aggregation, derived taxes and cache
// invalidation after deduction and ledger writes.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, App};
use federal_invest::core::Period;
use federal_invest::middleware::SessionAuth;
use federal_invest::modules::users::models::Role;
use helpers::{bearer, decimal, json_body, seed_session, services};
use rust_decimal_macros::dec;
use serde_json::json;

#[actix_web::test]
async fn test_monthly_deduction_shows_in_dre() {
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
        .set_json(json!({ "year": 2024, "month": 8, "value": "8000" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get()
        .uri("/finance/dre?period_type=monthly&year=2024&month=8")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body = json_body(resp).await;
    assert_eq!(decimal(&body["data"]["deducaoFiscal"]), dec!(8000));
    assert_eq!(body["display"]["deducaoFiscal"], "R$ 8.000,00");
}

#[actix_web::test]
async fn test_dre_recomputes_taxes_from_ledger() {
    let services = services();
    let token = seed_session(&services, "admin@federal.invest", Role::Admin).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let entries = [
        ("revenue_operations", "Operações de fomento", "100000", "2024-01-15"),
        ("expense", "Folha de pagamento", "10000", "2024-02-10"),
        ("revenue_other", "Rendimentos financeiros", "5000", "2024-03-20"),
    ];
    for (category, description, amount, date) in entries {
        let req = test::TestRequest::post()
            .uri("/finance/entries")
            .insert_header(bearer(&token))
            .set_json(json!({
                "category": category,
                "description": description,
                "amount": amount,
                "competence_date": date,
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);
    }

    let req = test::TestRequest::post()
        .uri("/finance/tax_deduction")
        .insert_header(bearer(&token))
        .set_json(json!({ "year": 2024, "quarter": 1, "value": "20000" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get()
        .uri("/finance/dre?period_type=quarterly&year=2024&quarter=1")
        .insert_header(bearer(&token))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    let data = &body["data"];

    assert_eq!(decimal(&data["resultadoBruto"]), dec!(100000));
    assert_eq!(decimal(&data["resultadoOperacional"]), dec!(90000));
    assert_eq!(decimal(&data["impostos"]["ir"]), dec!(12000));
    assert_eq!(decimal(&data["impostos"]["csll"]), dec!(7200));
    assert_eq!(decimal(&data["resultadoLiquido"]), dec!(75800));
    assert_eq!(decimal(&data["receitas"]["total"]), dec!(105000));
}

#[actix_web::test]
async fn test_deduction_write_invalidates_containing_periods() {
    let services = services();
    let token = seed_session(&services, "editor@federal.invest", Role::Editor).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    for uri in [
        "/finance/dre?period_type=annual&year=2024",
        "/finance/dre?period_type=quarterly&year=2024&quarter=3",
        "/finance/dre?period_type=monthly&year=2024&month=8",
        "/finance/dre?period_type=monthly&year=2024&month=2",
    ] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);
    }
    assert_eq!(services.dre_cache.len(), 4);

    let req = test::TestRequest::post()
        .uri("/finance/monthly-tax-deduction")
        .insert_header(bearer(&token))
        .set_json(json!({ "year": 2024, "month": 8, "value": "1200" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    assert_eq!(services.dre_cache.len(), 1);
    assert!(services
        .dre_cache
        .get(&Period::monthly(2024, 2).unwrap())
        .is_some());

    let req = test::TestRequest::get()
        .uri("/finance/dre?period_type=annual&year=2024")
        .insert_header(bearer(&token))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(decimal(&body["data"]["deducaoFiscal"]), dec!(1200));
}

#[actix_web::test]
async fn test_ledger_entry_invalidates_cached_month() {
    let services = services();
    let token = seed_session(&services, "editor@federal.invest", Role::Editor).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let dre_uri = "/finance/dre?period_type=monthly&year=2024&month=4";
    let req = test::TestRequest::get()
        .uri(dre_uri)
        .insert_header(bearer(&token))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(decimal(&body["data"]["receitas"]["operacoes"]), dec!(0));

    let req = test::TestRequest::post()
        .uri("/finance/entries")
        .insert_header(bearer(&token))
        .set_json(json!({
            "category": "revenue_operations",
            "description": "Desconto de duplicatas",
            "amount": "2500.50",
            "competence_date": "2024-04-03",
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::get()
        .uri(dre_uri)
        .insert_header(bearer(&token))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(decimal(&body["data"]["receitas"]["operacoes"]), dec!(2500.50));

    let req = test::TestRequest::get()
        .uri("/finance/entries?period_type=quarterly&year=2024&quarter=2")
        .insert_header(bearer(&token))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["category"], "revenue_operations");
}

#[actix_web::test]
async fn test_invalid_period_query_rejected() {
    let services = services();
    let token = seed_session(&services, "viewer@federal.invest", Role::Viewer).await;
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone())),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/finance/dre?period_type=monthly&year=2024")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::get()
        .uri("/finance/dre?period_type=weekly&year=2024")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}
