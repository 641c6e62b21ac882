//! Property-based tests for the VAT engine's arithmetic laws.
//!
//! Run with: `cargo test --features all --test proptest_tests`

#![cfg(feature = "core")]

use efactura::compliance::{build_context, calculate_vat};
use efactura::config::{RoundingMode, VatPolicy};
use efactura::core::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn policy(rounding: RoundingMode) -> VatPolicy {
    VatPolicy {
        standard_rate: dec!(20),
        reduced_rates: vec![dec!(10), dec!(5.5)],
        default_rate: dec!(20),
        rounding,
        reverse_charge_text: "Reverse charge".into(),
    }
}

const RATES: [Decimal; 5] = [
    Decimal::from_parts(0, 0, 0, false, 0),    // 0
    Decimal::from_parts(55, 0, 0, false, 1),   // 5.5
    Decimal::from_parts(10, 0, 0, false, 0),   // 10
    Decimal::from_parts(20, 0, 0, false, 0),   // 20
    Decimal::from_parts(23, 0, 0, false, 0),   // 23
];

fn arb_line() -> impl Strategy<Value = LineItem> {
    // quantity: -99.999..99.999 (3 dp), price: 0..9999.9999 (4 dp)
    (
        -99_999i64..100_000,
        0i64..100_000_000,
        0usize..RATES.len(),
        prop::bool::ANY,
    )
        .prop_map(|(qty_milli, price_tenthmilli, rate_idx, services)| {
            let mut line = LineItemBuilder::new(
                "Property line",
                Decimal::new(qty_milli, 3),
                Decimal::new(price_tenthmilli, 4),
            )
            .vat_rate(RATES[rate_idx])
            .build();
            if services {
                line.kind = ItemKind::Services;
            }
            line
        })
}

fn assert_consistent(result: &VatResult) {
    let vat_sum: Decimal = result.breakdown.iter().map(|b| b.vat_amount).sum();
    assert_eq!(vat_sum, result.total_vat);
    assert_eq!(result.total_net + result.total_vat, result.total_gross);
}

proptest! {
    /// sum(breakdown.vat) == total_vat and net + vat == gross, both modes,
    /// for arbitrary line sets including credit lines and zero amounts.
    #[test]
    fn vat_consistency_laws(lines in prop::collection::vec(arb_line(), 0..20)) {
        for mode in [RoundingMode::Line, RoundingMode::Total] {
            let result = calculate_vat(&lines, &policy(mode), None);
            assert_consistent(&result);
        }
    }

    /// Every amount in the result has at most 2 decimal places.
    #[test]
    fn results_are_minor_unit_precise(lines in prop::collection::vec(arb_line(), 0..20)) {
        for mode in [RoundingMode::Line, RoundingMode::Total] {
            let result = calculate_vat(&lines, &policy(mode), None);
            prop_assert_eq!(result.total_net, result.total_net.round_dp(2));
            prop_assert_eq!(result.total_vat, result.total_vat.round_dp(2));
            prop_assert_eq!(result.total_gross, result.total_gross.round_dp(2));
            for entry in &result.breakdown {
                prop_assert_eq!(entry.base_amount, entry.base_amount.round_dp(2));
                prop_assert_eq!(entry.vat_amount, entry.vat_amount.round_dp(2));
            }
        }
    }

    /// Breakdown keys are exactly the distinct input rates (base calculation).
    #[test]
    fn breakdown_keys_match_input_rates(lines in prop::collection::vec(arb_line(), 1..20)) {
        let result = calculate_vat(&lines, &policy(RoundingMode::Total), None);
        let mut expected: Vec<Decimal> = lines.iter().map(|l| l.vat_rate).collect();
        expected.sort();
        expected.dedup();
        let got: Vec<Decimal> = result.breakdown.iter().map(|b| b.rate).collect();
        prop_assert_eq!(got, expected);
    }

    /// Reverse charge zeroes VAT for any input whatsoever.
    #[test]
    fn reverse_charge_always_zeroes_vat(lines in prop::collection::vec(arb_line(), 0..20)) {
        let supplier = PartyBuilder::new("S", "Paris", "75002", "FR")
            .vat_number("FR40123456824")
            .company(true)
            .build();
        let customer = PartyBuilder::new("C", "Berlin", "10115", "DE")
            .vat_number("DE123456789")
            .company(true)
            .build();
        let ctx = build_context(&supplier, &customer, &lines);

        for mode in [RoundingMode::Line, RoundingMode::Total] {
            let result = calculate_vat(&lines, &policy(mode), Some(&ctx));
            prop_assert!(result.reverse_charge);
            prop_assert_eq!(result.total_vat, Decimal::ZERO);
            prop_assert_eq!(result.total_gross, result.total_net);
            assert_consistent(&result);
        }
    }

    /// Doubling every line doubles the unrounded relationship only loosely,
    /// but scaling by concatenation is exact: calculating over A ++ A gives
    /// the same totals as 2× each line amount grouped per rate.
    #[test]
    fn concatenation_accumulates(lines in prop::collection::vec(arb_line(), 1..8)) {
        let doubled: Vec<LineItem> = lines.iter().chain(lines.iter()).cloned().collect();
        let single = calculate_vat(&lines, &policy(RoundingMode::Total), None);
        let double = calculate_vat(&doubled, &policy(RoundingMode::Total), None);
        // Unrounded sums double exactly, so document-level rounding of the
        // double is within one cent of twice the rounded single per rate.
        for (s, d) in single.breakdown.iter().zip(double.breakdown.iter()) {
            prop_assert_eq!(s.rate, d.rate);
            let diff = (d.base_amount - s.base_amount * dec!(2)).abs();
            prop_assert!(diff <= dec!(0.01), "base diff {diff}");
        }
    }
}
