use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Period, Result};

/// Revenue lines of the income statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receitas {
    pub operacoes: Decimal,
    pub outras: Decimal,
    pub total: Decimal,
}

/// Operation cost lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Custos {
    pub fator: Decimal,
    pub ad_valorem: Decimal,
    pub iof: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Despesas {
    pub total: Decimal,
}

/// Tax lines. PIS, COFINS and ISSQN come from the ledger; IR and CSLL are derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Impostos {
    pub pis: Decimal,
    pub cofins: Decimal,
    pub issqn: Decimal,
    pub ir: Decimal,
    pub csll: Decimal,
    pub total: Decimal,
}

/// DRE (income statement) for one period. Computed per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreData {
    pub period: Period,
    pub receitas: Receitas,
    pub custos: Custos,
    pub despesas: Despesas,
    pub impostos: Impostos,
    pub resultado_bruto: Decimal,
    pub resultado_operacional: Decimal,
    pub resultado_liquido: Decimal,
    pub deducao_fiscal: Decimal,
}

/// Ledger sums a DRE is built from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DreInputs {
    pub receitas_operacoes: Decimal,
    pub receitas_outras: Decimal,
    pub custo_fator: Decimal,
    pub custo_ad_valorem: Decimal,
    pub custo_iof: Decimal,
    pub despesas: Decimal,
    pub pis: Decimal,
    pub cofins: Decimal,
    pub issqn: Decimal,
}

impl DreInputs {
    pub fn custos_total(&self) -> Result<Decimal> {
        sum(&[self.custo_fator, self.custo_ad_valorem, self.custo_iof])
    }

    /// Taxes charged on revenue, before IR/CSLL
    pub fn impostos_sobre_receita(&self) -> Result<Decimal> {
        sum(&[self.pis, self.cofins, self.issqn])
    }

    /// Operating revenue minus costs and revenue taxes
    pub fn resultado_bruto(&self) -> Result<Decimal> {
        let custos = self.custos_total()?;
        let impostos = self.impostos_sobre_receita()?;
        self.receitas_operacoes
            .checked_sub(custos)
            .and_then(|v| v.checked_sub(impostos))
            .ok_or_else(overflow)
    }

    pub fn resultado_operacional(&self) -> Result<Decimal> {
        self.resultado_bruto()?
            .checked_sub(self.despesas)
            .ok_or_else(overflow)
    }
}

fn overflow() -> AppError {
    AppError::validation("DRE computation overflowed")
}

fn sum(values: &[Decimal]) -> Result<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(overflow)
}
