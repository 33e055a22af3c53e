use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{round_cents, AppError, Result};

/// IR rate on the deduction-adjusted base
pub const IR_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);
/// CSLL rate on the deduction-adjusted base
pub const CSLL_RATE: Decimal = Decimal::from_parts(9, 0, 0, false, 2);

/// Inputs of the IR/CSLL recalculation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaxInputs {
    pub resultado_bruto: Decimal,
    pub resultado_operacional: Decimal,
    pub outras_receitas: Decimal,
    pub deducao_fiscal: Decimal,
    pub pis: Decimal,
    pub cofins: Decimal,
    pub issqn: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTaxes {
    pub base: Decimal,
    pub ir: Decimal,
    pub csll: Decimal,
    pub imposto_total: Decimal,
    pub resultado_liquido: Decimal,
}

/// Recompute IR and CSLL after the fiscal deduction and roll them into net result.
///
/// `base = max(0, resultado_bruto - deducao_fiscal)`, so a deduction larger than
/// the gross result never yields negative tax.
///
/// # Errors
/// Returns a validation error if any intermediate value overflows `Decimal`.
pub fn recompute(inputs: &TaxInputs) -> Result<DerivedTaxes> {
    let overflow = || AppError::validation("tax recalculation overflowed");

    let residual = inputs
        .resultado_bruto
        .checked_sub(inputs.deducao_fiscal)
        .ok_or_else(overflow)?;
    let base = residual.max(Decimal::ZERO);

    let ir = round_cents(base.checked_mul(IR_RATE).ok_or_else(overflow)?);
    let csll = round_cents(base.checked_mul(CSLL_RATE).ok_or_else(overflow)?);

    let imposto_total = [inputs.pis, inputs.cofins, inputs.issqn, ir, csll]
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
        .ok_or_else(overflow)?;

    let resultado_liquido = inputs
        .resultado_operacional
        .checked_add(inputs.outras_receitas)
        .and_then(|value| value.checked_sub(ir))
        .and_then(|value| value.checked_sub(csll))
        .ok_or_else(overflow)?;

    Ok(DerivedTaxes {
        base,
        ir,
        csll,
        imposto_total,
        resultado_liquido,
    })
}
