//! HTTP endpoints for fiscal deductions.
//!
//! Quarterly and annual values are accepted and reported as if stored at that
//! granularity, but every write lands in monthly rows.

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::period::PeriodParts;
use crate::core::{Period, Result};
use crate::modules::deductions::models::MonthlyDeduction;
use crate::modules::deductions::services::AggregationEngine;
use crate::modules::users::models::{AuthenticatedUser, Permission};

#[derive(Debug, Deserialize)]
pub struct QuarterQuery {
    pub year: i32,
    pub quarter: u32,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct QuarterlyDeductionRequest {
    pub year: i32,
    pub quarter: u32,
    pub value: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyDeductionRequest {
    pub year: i32,
    pub month: u32,
    pub value: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct AnnualDeductionRequest {
    pub year: i32,
    pub value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct QuarterlyDeductionResponse {
    pub year: i32,
    pub quarter: u32,
    pub value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MonthlyDeductionResponse {
    pub year: i32,
    pub month: u32,
    pub value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct AnnualDeductionResponse {
    pub year: i32,
    pub value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub period: Period,
    pub total: Decimal,
    pub months: Vec<MonthlyDeductionResponse>,
}

impl From<&MonthlyDeduction> for MonthlyDeductionResponse {
    fn from(row: &MonthlyDeduction) -> Self {
        Self {
            year: row.year,
            month: row.month,
            value: row.value,
        }
    }
}

fn data<T: Serialize>(payload: T) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "data": payload }))
}

/// GET /finance/tax_deduction?year=Y&quarter=Q
pub async fn get_quarterly_deduction(
    engine: web::Data<AggregationEngine>,
    user: AuthenticatedUser,
    query: web::Query<QuarterQuery>,
) -> Result<HttpResponse> {
    user.require(Permission::FinanceRead)?;
    let period = Period::quarterly(query.year, query.quarter)?;
    let value = engine.read(&period).await?;

    Ok(data(QuarterlyDeductionResponse {
        year: query.year,
        quarter: query.quarter,
        value,
    }))
}

/// POST /finance/tax_deduction
pub async fn save_quarterly_deduction(
    engine: web::Data<AggregationEngine>,
    user: AuthenticatedUser,
    body: web::Json<QuarterlyDeductionRequest>,
) -> Result<HttpResponse> {
    user.require(Permission::FinanceWrite)?;
    let period = Period::quarterly(body.year, body.quarter)?;
    engine.write(&period, body.value).await?;

    Ok(data(QuarterlyDeductionResponse {
        year: body.year,
        quarter: body.quarter,
        value: engine.read(&period).await?,
    }))
}

/// GET /finance/monthly-tax-deduction?year=Y&month=M
pub async fn get_monthly_deduction(
    engine: web::Data<AggregationEngine>,
    user: AuthenticatedUser,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse> {
    user.require(Permission::FinanceRead)?;
    let period = Period::monthly(query.year, query.month)?;
    let value = engine.read(&period).await?;

    Ok(data(MonthlyDeductionResponse {
        year: query.year,
        month: query.month,
        value,
    }))
}

/// POST /finance/monthly-tax-deduction
pub async fn save_monthly_deduction(
    engine: web::Data<AggregationEngine>,
    user: AuthenticatedUser,
    body: web::Json<MonthlyDeductionRequest>,
) -> Result<HttpResponse> {
    user.require(Permission::FinanceWrite)?;
    let period = Period::monthly(body.year, body.month)?;
    engine.write(&period, body.value).await?;

    Ok(data(MonthlyDeductionResponse {
        year: body.year,
        month: body.month,
        value: engine.read(&period).await?,
    }))
}

/// GET /finance/annual-tax-deduction?year=Y
pub async fn get_annual_deduction(
    engine: web::Data<AggregationEngine>,
    user: AuthenticatedUser,
    query: web::Query<YearQuery>,
) -> Result<HttpResponse> {
    user.require(Permission::FinanceRead)?;
    let period = Period::annual(query.year)?;
    let value = engine.read(&period).await?;

    Ok(data(AnnualDeductionResponse {
        year: query.year,
        value,
    }))
}

/// POST /finance/annual-tax-deduction
pub async fn save_annual_deduction(
    engine: web::Data<AggregationEngine>,
    user: AuthenticatedUser,
    body: web::Json<AnnualDeductionRequest>,
) -> Result<HttpResponse> {
    user.require(Permission::FinanceWrite)?;
    let period = Period::annual(body.year)?;
    engine.write(&period, body.value).await?;

    Ok(data(AnnualDeductionResponse {
        year: body.year,
        value: engine.read(&period).await?,
    }))
}

/// GET /finance/tax_deduction/breakdown?period_type=..&year=..[&month=..|&quarter=..]
pub async fn get_deduction_breakdown(
    engine: web::Data<AggregationEngine>,
    user: AuthenticatedUser,
    query: web::Query<PeriodParts>,
) -> Result<HttpResponse> {
    user.require(Permission::FinanceRead)?;
    let period = Period::try_from(query.into_inner())?;
    let rows = engine.breakdown(&period).await?;

    Ok(data(BreakdownResponse {
        period,
        total: rows.iter().map(|row| row.value).sum(),
        months: rows.iter().map(MonthlyDeductionResponse::from).collect(),
    }))
}

/// POST /finance/tax_deduction/migrate-legacy
pub async fn migrate_legacy_deductions(
    engine: web::Data<AggregationEngine>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    user.require(Permission::RunMigrations)?;
    let report = engine.migrate_legacy_quarterly().await?;
    Ok(data(report))
}

/// Configure deduction routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/finance/tax_deduction")
            .route(web::get().to(get_quarterly_deduction))
            .route(web::post().to(save_quarterly_deduction)),
    )
    .service(
        web::resource("/finance/monthly-tax-deduction")
            .route(web::get().to(get_monthly_deduction))
            .route(web::post().to(save_monthly_deduction)),
    )
    .service(
        web::resource("/finance/annual-tax-deduction")
            .route(web::get().to(get_annual_deduction))
            .route(web::post().to(save_annual_deduction)),
    )
    .route(
        "/finance/tax_deduction/breakdown",
        web::get().to(get_deduction_breakdown),
    )
    .route(
        "/finance/tax_deduction/migrate-legacy",
        web::post().to(migrate_legacy_deductions),
    );
}
