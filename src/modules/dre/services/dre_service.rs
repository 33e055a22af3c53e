use std::sync::Arc;
use tracing::{debug, info};

use crate::core::{AppError, Period, Result};
use crate::modules::deductions::services::AggregationEngine;
use crate::modules::dre::models::{Custos, Despesas, DreData, DreInputs, Impostos, Receitas};
use crate::modules::dre::services::tax_recalculation::{recompute, TaxInputs};
use crate::modules::dre::services::DreCache;
use crate::modules::ledger::models::{CategoryTotal, EntryCategory};
use crate::modules::ledger::services::LedgerService;

/// Builds the DRE for a period from ledger sums and the period's fiscal deduction
#[derive(Clone)]
pub struct DreService {
    ledger: LedgerService,
    deductions: AggregationEngine,
    cache: Arc<DreCache>,
}

impl DreService {
    pub fn new(ledger: LedgerService, deductions: AggregationEngine, cache: Arc<DreCache>) -> Self {
        Self {
            ledger,
            deductions,
            cache,
        }
    }

    /// DRE for `period`, served from cache when a fresh copy exists
    pub async fn report(&self, period: &Period) -> Result<DreData> {
        if let Some(cached) = self.cache.get(period) {
            debug!(period = %period, "DRE cache hit");
            return Ok(cached);
        }

        let generation = self.cache.generation();
        let totals = self.ledger.totals(period).await?;
        let inputs = inputs_from_totals(&totals)?;
        let deducao_fiscal = self.deductions.read(period).await?;

        let report = build_report(*period, &inputs, deducao_fiscal)?;
        let cached = self.cache.put_if_current(period, generation, report.clone());

        info!(
            period = %period,
            resultado_liquido = %report.resultado_liquido,
            deducao_fiscal = %report.deducao_fiscal,
            cached,
            "DRE computed"
        );
        Ok(report)
    }
}

/// Collapse per-category ledger sums into DRE inputs
pub fn inputs_from_totals(totals: &[CategoryTotal]) -> Result<DreInputs> {
    let mut inputs = DreInputs::default();
    for CategoryTotal { category, total } in totals {
        let slot = match category {
            EntryCategory::RevenueOperations => &mut inputs.receitas_operacoes,
            EntryCategory::RevenueOther => &mut inputs.receitas_outras,
            EntryCategory::CostFator => &mut inputs.custo_fator,
            EntryCategory::CostAdValorem => &mut inputs.custo_ad_valorem,
            EntryCategory::CostIof => &mut inputs.custo_iof,
            EntryCategory::Expense => &mut inputs.despesas,
            EntryCategory::TaxPis => &mut inputs.pis,
            EntryCategory::TaxCofins => &mut inputs.cofins,
            EntryCategory::TaxIssqn => &mut inputs.issqn,
        };
        *slot = slot
            .checked_add(*total)
            .ok_or_else(|| AppError::validation(format!("{:?} total overflowed", category)))?;
    }
    Ok(inputs)
}

pub fn build_report(
    period: Period,
    inputs: &DreInputs,
    deducao_fiscal: rust_decimal::Decimal,
) -> Result<DreData> {
    let resultado_bruto = inputs.resultado_bruto()?;
    let resultado_operacional = inputs.resultado_operacional()?;
    let receitas_total = inputs
        .receitas_operacoes
        .checked_add(inputs.receitas_outras)
        .ok_or_else(|| AppError::validation("DRE computation overflowed"))?;

    let taxes = recompute(&TaxInputs {
        resultado_bruto,
        resultado_operacional,
        outras_receitas: inputs.receitas_outras,
        deducao_fiscal,
        pis: inputs.pis,
        cofins: inputs.cofins,
        issqn: inputs.issqn,
    })?;

    Ok(DreData {
        period,
        receitas: Receitas {
            operacoes: inputs.receitas_operacoes,
            outras: inputs.receitas_outras,
            total: receitas_total,
        },
        custos: Custos {
            fator: inputs.custo_fator,
            ad_valorem: inputs.custo_ad_valorem,
            iof: inputs.custo_iof,
            total: inputs.custos_total()?,
        },
        despesas: Despesas {
            total: inputs.despesas,
        },
        impostos: Impostos {
            pis: inputs.pis,
            cofins: inputs.cofins,
            issqn: inputs.issqn,
            ir: taxes.ir,
            csll: taxes.csll,
            total: taxes.imposto_total,
        },
        resultado_bruto,
        resultado_operacional,
        resultado_liquido: taxes.resultado_liquido,
        deducao_fiscal,
    })
}
