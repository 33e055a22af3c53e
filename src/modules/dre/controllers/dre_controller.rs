use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::core::period::PeriodParts;
use crate::core::{format_brl, Period, Result};
use crate::modules::dre::models::DreData;
use crate::modules::dre::services::DreService;
use crate::modules::users::models::{AuthenticatedUser, Permission};

/// Display strings for the headline DRE figures
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DreDisplay {
    pub receitas_total: String,
    pub resultado_bruto: String,
    pub deducao_fiscal: String,
    pub impostos_total: String,
    pub resultado_operacional: String,
    pub resultado_liquido: String,
}

impl From<&DreData> for DreDisplay {
    fn from(report: &DreData) -> Self {
        Self {
            receitas_total: format_brl(report.receitas.total),
            resultado_bruto: format_brl(report.resultado_bruto),
            deducao_fiscal: format_brl(report.deducao_fiscal),
            impostos_total: format_brl(report.impostos.total),
            resultado_operacional: format_brl(report.resultado_operacional),
            resultado_liquido: format_brl(report.resultado_liquido),
        }
    }
}

/// GET /finance/dre?period_type=..&year=..[&month=..|&quarter=..]
pub async fn get_dre(
    service: web::Data<DreService>,
    user: AuthenticatedUser,
    query: web::Query<PeriodParts>,
) -> Result<HttpResponse> {
    user.require(Permission::FinanceRead)?;
    let period = Period::try_from(query.into_inner())?;
    let report = service.report(&period).await?;
    let display = DreDisplay::from(&report);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "data": report,
        "display": display,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/finance/dre", web::get().to(get_dre));
}
