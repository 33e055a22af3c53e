use actix_web::{web, HttpResponse};

use crate::core::period::PeriodParts;
use crate::core::{Period, Result};
use crate::modules::ledger::models::NewLedgerEntry;
use crate::modules::ledger::services::LedgerService;
use crate::modules::users::models::{AuthenticatedUser, Permission};

/// POST /finance/entries
pub async fn create_entry(
    service: web::Data<LedgerService>,
    user: AuthenticatedUser,
    body: web::Json<NewLedgerEntry>,
) -> Result<HttpResponse> {
    user.require(Permission::FinanceWrite)?;
    let entry = service.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "data": entry })))
}

/// GET /finance/entries?period_type=..&year=..[&month=..|&quarter=..]
pub async fn list_entries(
    service: web::Data<LedgerService>,
    user: AuthenticatedUser,
    query: web::Query<PeriodParts>,
) -> Result<HttpResponse> {
    user.require(Permission::FinanceRead)?;
    let period = Period::try_from(query.into_inner())?;
    let entries = service.list(&period).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "data": entries,
        "count": entries.len(),
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/finance/entries")
            .route(web::get().to(list_entries))
            .route(web::post().to(create_entry)),
    );
}
