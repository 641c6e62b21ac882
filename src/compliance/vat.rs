//! VAT calculation engine.
//!
//! Pure function of the line items, the jurisdiction VAT policy, and the
//! optional transaction context. The consistency invariants
//! (`Σ breakdown.vat == total_vat`, `net + vat == gross`) hold by
//! construction: totals are always sums over the rounded breakdown.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::context::ComplianceContext;
use crate::config::{RoundingMode, VatPolicy};
use crate::core::{LineItem, RateBreakdown, VatResult};

/// Round to 2 decimals, half-up (commercial rounding).
fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Compute the tax breakdown for a set of lines under a country VAT policy.
///
/// Rounding follows the policy's mode:
/// - [`RoundingMode::Line`]: each line's net and VAT are rounded to 2
///   decimals before summation (per-line tax jurisdictions, e.g. ES/PT).
/// - [`RoundingMode::Total`]: lines accumulate unrounded and only the
///   per-rate aggregates are rounded (document-level jurisdictions,
///   e.g. FR/DE/BE/IT).
///
/// When `context` marks an intra-EU B2B transaction, the reverse-charge
/// override is applied *after* the base calculation: VAT collapses to zero,
/// gross equals net, and the breakdown becomes a single zero-rate entry
/// carrying the policy's reverse-charge wording.
///
/// Zero quantities/prices are valid (zero-amount lines); negative quantities
/// are credit lines and flow through the same rounding path sign-unchanged.
pub fn calculate_vat(
    items: &[LineItem],
    policy: &VatPolicy,
    context: Option<&ComplianceContext>,
) -> VatResult {
    // Group by rate. BTreeMap keeps the breakdown sorted by rate.
    let mut groups: BTreeMap<Decimal, (Decimal, Decimal)> = BTreeMap::new();

    for item in items {
        let net = item.net_amount();
        let vat = item.vat_amount();
        let entry = groups.entry(item.vat_rate).or_insert((dec!(0), dec!(0)));
        match policy.rounding {
            RoundingMode::Line => {
                entry.0 += round_half_up(net);
                entry.1 += round_half_up(vat);
            }
            RoundingMode::Total => {
                entry.0 += net;
                entry.1 += vat;
            }
        }
    }

    let breakdown: Vec<RateBreakdown> = groups
        .into_iter()
        .map(|(rate, (base, vat))| match policy.rounding {
            // Line mode already rounded per line; sums of 2-dp values stay 2-dp.
            RoundingMode::Line => RateBreakdown {
                rate,
                base_amount: base,
                vat_amount: vat,
            },
            RoundingMode::Total => RateBreakdown {
                rate,
                base_amount: round_half_up(base),
                vat_amount: round_half_up(vat),
            },
        })
        .collect();

    let total_net: Decimal = breakdown.iter().map(|b| b.base_amount).sum();
    let total_vat: Decimal = breakdown.iter().map(|b| b.vat_amount).sum();

    let base = VatResult {
        total_net,
        total_vat,
        total_gross: total_net + total_vat,
        breakdown,
        reverse_charge: false,
        reverse_charge_text: None,
    };

    // Reverse charge is a uniform override on top of the base result,
    // not a different formula.
    match context {
        Some(ctx) if ctx.reverse_charge_applies() => apply_reverse_charge(base, policy),
        _ => base,
    }
}

fn apply_reverse_charge(base: VatResult, policy: &VatPolicy) -> VatResult {
    VatResult {
        total_net: base.total_net,
        total_vat: dec!(0.00),
        total_gross: base.total_net,
        breakdown: vec![RateBreakdown {
            rate: dec!(0),
            base_amount: base.total_net,
            vat_amount: dec!(0.00),
        }],
        reverse_charge: true,
        reverse_charge_text: Some(policy.reverse_charge_text.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::context::build_context;
    use crate::core::{ItemKind, PartyBuilder};

    fn policy(rounding: RoundingMode) -> VatPolicy {
        VatPolicy {
            standard_rate: dec!(20),
            reduced_rates: vec![dec!(10), dec!(5.5)],
            default_rate: dec!(20),
            rounding,
            reverse_charge_text: "Reverse charge".into(),
        }
    }

    fn line(qty: Decimal, price: Decimal, rate: Decimal) -> LineItem {
        LineItem {
            description: "item".into(),
            quantity: qty,
            unit_price: price,
            vat_rate: rate,
            kind: ItemKind::Goods,
            unit: None,
        }
    }

    fn assert_consistent(result: &VatResult) {
        let vat_sum: Decimal = result.breakdown.iter().map(|b| b.vat_amount).sum();
        assert_eq!(vat_sum, result.total_vat, "breakdown VAT must sum to total");
        assert_eq!(
            result.total_net + result.total_vat,
            result.total_gross,
            "net + vat must equal gross"
        );
    }

    #[test]
    fn simple_single_rate() {
        let result = calculate_vat(
            &[line(dec!(1), dec!(100.00), dec!(20))],
            &policy(RoundingMode::Total),
            None,
        );
        assert_eq!(result.total_net, dec!(100.00));
        assert_eq!(result.total_vat, dec!(20.00));
        assert_eq!(result.total_gross, dec!(120.00));
        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.breakdown[0].rate, dec!(20));
        assert_eq!(result.breakdown[0].base_amount, dec!(100.00));
        assert_eq!(result.breakdown[0].vat_amount, dec!(20.00));
        assert_consistent(&result);
    }

    #[test]
    fn groups_by_distinct_rate() {
        let result = calculate_vat(
            &[
                line(dec!(2), dec!(50), dec!(20)),
                line(dec!(1), dec!(30), dec!(5.5)),
                line(dec!(1), dec!(70), dec!(20)),
            ],
            &policy(RoundingMode::Total),
            None,
        );
        assert_eq!(result.breakdown.len(), 2);
        // Sorted by rate
        assert_eq!(result.breakdown[0].rate, dec!(5.5));
        assert_eq!(result.breakdown[1].rate, dec!(20));
        assert_eq!(result.breakdown[1].base_amount, dec!(170.00));
        assert_consistent(&result);
    }

    #[test]
    fn rounding_modes_diverge_but_stay_consistent() {
        // 3 lines of 10.005 net at 20%: per-line rounding pushes each line to
        // 10.01 / VAT 2.00; document rounding keeps 30.015 → 30.02 / 6.00.
        let items = [
            line(dec!(1), dec!(10.005), dec!(20)),
            line(dec!(1), dec!(10.005), dec!(20)),
            line(dec!(1), dec!(10.005), dec!(20)),
        ];

        let per_line = calculate_vat(&items, &policy(RoundingMode::Line), None);
        let per_total = calculate_vat(&items, &policy(RoundingMode::Total), None);

        assert_eq!(per_line.total_net, dec!(30.03));
        assert_eq!(per_total.total_net, dec!(30.02));
        assert_ne!(per_line.total_net, per_total.total_net);

        assert_consistent(&per_line);
        assert_consistent(&per_total);
    }

    #[test]
    fn reverse_charge_override() {
        let supplier = PartyBuilder::new("ACME SARL", "Paris", "75002", "FR")
            .vat_number("FR40123456824")
            .company(true)
            .build();
        let customer = PartyBuilder::new("Kunde AG", "Berlin", "10115", "DE")
            .vat_number("DE123456789")
            .company(true)
            .build();
        let items = [line(dec!(3), dec!(100), dec!(20))];
        let ctx = build_context(&supplier, &customer, &items);

        let base = calculate_vat(&items, &policy(RoundingMode::Total), None);
        let reversed = calculate_vat(&items, &policy(RoundingMode::Total), Some(&ctx));

        // Same inputs, same net; only the override differs.
        assert_eq!(base.total_net, reversed.total_net);
        assert_eq!(base.total_vat, dec!(60.00));

        assert!(reversed.reverse_charge);
        assert_eq!(reversed.total_vat, dec!(0.00));
        assert_eq!(reversed.total_gross, reversed.total_net);
        assert_eq!(reversed.breakdown.len(), 1);
        assert_eq!(reversed.breakdown[0].rate, dec!(0));
        assert_eq!(reversed.reverse_charge_text.as_deref(), Some("Reverse charge"));
        assert_consistent(&reversed);
    }

    #[test]
    fn domestic_context_does_not_override() {
        let supplier = PartyBuilder::new("ACME SARL", "Paris", "75002", "FR")
            .vat_number("FR40123456824")
            .company(true)
            .build();
        let customer = PartyBuilder::new("Client SARL", "Lyon", "69001", "FR")
            .vat_number("FR12345678901")
            .company(true)
            .build();
        let items = [line(dec!(1), dec!(100), dec!(20))];
        let ctx = build_context(&supplier, &customer, &items);
        let result = calculate_vat(&items, &policy(RoundingMode::Total), Some(&ctx));
        assert!(!result.reverse_charge);
        assert_eq!(result.total_vat, dec!(20.00));
    }

    #[test]
    fn zero_amount_line_is_valid() {
        let result = calculate_vat(
            &[line(dec!(0), dec!(100), dec!(20)), line(dec!(1), dec!(0), dec!(20))],
            &policy(RoundingMode::Total),
            None,
        );
        assert_eq!(result.total_net, dec!(0.00));
        assert_eq!(result.total_vat, dec!(0.00));
        assert_consistent(&result);
    }

    #[test]
    fn negative_quantity_credit_line() {
        let result = calculate_vat(
            &[
                line(dec!(2), dec!(100), dec!(20)),
                line(dec!(-1), dec!(100), dec!(20)),
            ],
            &policy(RoundingMode::Total),
            None,
        );
        assert_eq!(result.total_net, dec!(100.00));
        assert_eq!(result.total_vat, dec!(20.00));
        assert_consistent(&result);
    }

    #[test]
    fn negative_rounding_is_symmetric() {
        // Half-up rounding away from zero keeps a credit line the exact
        // mirror of its debit twin in both modes.
        for mode in [RoundingMode::Line, RoundingMode::Total] {
            let debit = calculate_vat(&[line(dec!(1), dec!(10.005), dec!(20))], &policy(mode), None);
            let credit =
                calculate_vat(&[line(dec!(-1), dec!(10.005), dec!(20))], &policy(mode), None);
            assert_eq!(debit.total_net, -credit.total_net);
            assert_eq!(debit.total_vat, -credit.total_vat);
            assert_consistent(&credit);
        }
    }

    #[test]
    fn empty_items_yield_zero_totals() {
        let result = calculate_vat(&[], &policy(RoundingMode::Total), None);
        assert_eq!(result.total_net, dec!(0));
        assert_eq!(result.total_gross, dec!(0));
        assert!(result.breakdown.is_empty());
    }
}
