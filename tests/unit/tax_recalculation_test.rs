// Property tests for the IR/CSLL recalculation after fiscal deduction.

use federal_invest::dre::services::tax_recalculation::{recompute, TaxInputs, CSLL_RATE, IR_RATE};
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

fn cents() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_000i64).prop_map(|c| Decimal::new(c, 2))
}

fn signed_cents() -> impl Strategy<Value = Decimal> {
    (-10_000_000_000i64..10_000_000_000i64).prop_map(|c| Decimal::new(c, 2))
}

proptest! {
    #[test]
    fn test_deduction_at_or_above_gross_zeroes_derived_taxes(
        bruto in signed_cents(),
        extra in cents(),
    ) {
        let inputs = TaxInputs {
            resultado_bruto: bruto,
            resultado_operacional: bruto,
            deducao_fiscal: bruto.max(Decimal::ZERO) + extra,
            ..TaxInputs::default()
        };

        let taxes = recompute(&inputs).unwrap();

        prop_assert_eq!(taxes.ir, Decimal::ZERO);
        prop_assert_eq!(taxes.csll, Decimal::ZERO);
    }

    #[test]
    fn test_derived_taxes_never_negative(
        bruto in signed_cents(),
        deducao in cents(),
    ) {
        let inputs = TaxInputs {
            resultado_bruto: bruto,
            resultado_operacional: bruto,
            deducao_fiscal: deducao,
            ..TaxInputs::default()
        };

        let taxes = recompute(&inputs).unwrap();

        prop_assert!(taxes.ir >= Decimal::ZERO);
        prop_assert!(taxes.csll >= Decimal::ZERO);
        prop_assert!(taxes.base >= Decimal::ZERO);
    }

    #[test]
    fn test_taxes_follow_fixed_rates(
        bruto in cents(),
        deducao in cents(),
    ) {
        let inputs = TaxInputs {
            resultado_bruto: bruto,
            resultado_operacional: bruto,
            deducao_fiscal: deducao,
            ..TaxInputs::default()
        };

        let taxes = recompute(&inputs).unwrap();
        let base = (bruto - deducao).max(Decimal::ZERO);

        let to_cents = |v: Decimal| v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        prop_assert_eq!(taxes.base, base);
        prop_assert_eq!(taxes.ir, to_cents(base * IR_RATE));
        prop_assert_eq!(taxes.csll, to_cents(base * CSLL_RATE));
    }

    #[test]
    fn test_larger_deduction_never_raises_net_result(
        bruto in cents(),
        deducao in cents(),
        extra in cents(),
    ) {
        let base = TaxInputs {
            resultado_bruto: bruto,
            resultado_operacional: bruto,
            deducao_fiscal: deducao,
            ..TaxInputs::default()
        };
        let more = TaxInputs {
            deducao_fiscal: deducao + extra,
            ..base
        };

        let before = recompute(&base).unwrap();
        let after = recompute(&more).unwrap();

        prop_assert!(after.resultado_liquido >= before.resultado_liquido);
    }
}

#[test]
fn test_reference_scenario() {
    let taxes = recompute(&TaxInputs {
        resultado_bruto: dec!(100000),
        resultado_operacional: dec!(90000),
        outras_receitas: dec!(5000),
        deducao_fiscal: dec!(20000),
        ..TaxInputs::default()
    })
    .unwrap();

    assert_eq!(taxes.ir, dec!(12000));
    assert_eq!(taxes.csll, dec!(7200));
    assert_eq!(taxes.resultado_liquido, dec!(75800));
}

#[test]
fn test_deduction_above_gross_result() {
    let taxes = recompute(&TaxInputs {
        resultado_bruto: dec!(1000),
        resultado_operacional: dec!(1000),
        deducao_fiscal: dec!(1500),
        ..TaxInputs::default()
    })
    .unwrap();

    assert_eq!(taxes.base, dec!(0));
    assert_eq!(taxes.ir, dec!(0));
    assert_eq!(taxes.csll, dec!(0));
    assert_eq!(taxes.resultado_liquido, dec!(1000));
}

#[test]
fn test_revenue_taxes_roll_into_total() {
    let taxes = recompute(&TaxInputs {
        resultado_bruto: dec!(1000),
        resultado_operacional: dec!(1000),
        deducao_fiscal: dec!(0),
        pis: dec!(6.50),
        cofins: dec!(30),
        issqn: dec!(50),
        ..TaxInputs::default()
    })
    .unwrap();

    assert_eq!(taxes.imposto_total, dec!(6.50) + dec!(30) + dec!(50) + dec!(150) + dec!(90));
}

#[test]
fn test_overflow_is_rejected() {
    let result = recompute(&TaxInputs {
        resultado_bruto: Decimal::MAX,
        resultado_operacional: Decimal::MAX,
        outras_receitas: Decimal::MAX,
        ..TaxInputs::default()
    });

    assert!(result.is_err());
}
