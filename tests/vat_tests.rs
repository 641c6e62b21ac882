#![cfg(feature = "core")]

use efactura::compliance::{build_context, calculate_vat};
use efactura::config::{self, RoundingMode};
use efactura::core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn line(qty: Decimal, price: Decimal, rate: Decimal) -> LineItem {
    LineItemBuilder::new("Item", qty, price).vat_rate(rate).build()
}

fn fr_supplier() -> Party {
    PartyBuilder::new("ACME SARL", "Paris", "75002", "FR")
        .vat_number("FR40123456824")
        .company(true)
        .build()
}

fn assert_consistent(result: &VatResult) {
    let vat_sum: Decimal = result.breakdown.iter().map(|b| b.vat_amount).sum();
    assert_eq!(vat_sum, result.total_vat);
    assert_eq!(result.total_net + result.total_vat, result.total_gross);
}

// ---------------------------------------------------------------------------
// Worked examples
// ---------------------------------------------------------------------------

#[test]
fn french_domestic_invoice_example() {
    // supplier FR, customer FR, one line (qty=1, unitPrice=100.00, vatRate=20)
    let fr = config::get("FR");
    let customer = PartyBuilder::new("Client SA", "Lyon", "69001", "FR").build();
    let items = [line(dec!(1), dec!(100.00), dec!(20))];
    let ctx = build_context(&fr_supplier(), &customer, &items);

    let result = calculate_vat(&items, &fr.vat, Some(&ctx));

    assert_eq!(result.total_net, dec!(100.00));
    assert_eq!(result.total_vat, dec!(20.00));
    assert_eq!(result.total_gross, dec!(120.00));
    assert_eq!(result.breakdown.len(), 1);
    assert_eq!(result.breakdown[0].rate, dec!(20));
    assert_eq!(result.breakdown[0].base_amount, dec!(100.00));
    assert_eq!(result.breakdown[0].vat_amount, dec!(20.00));
    assert!(!result.reverse_charge);
}

#[test]
fn intra_eu_b2b_reverse_charge_example() {
    // supplier FR, customer DE (company, VAT-registered)
    let fr = config::get("FR");
    let customer = PartyBuilder::new("Kunde AG", "Berlin", "10115", "DE")
        .vat_number("DE123456789")
        .company(true)
        .build();
    let items = [
        line(dec!(2), dec!(250), dec!(20)),
        line(dec!(1), dec!(100), dec!(10)),
    ];
    let ctx = build_context(&fr_supplier(), &customer, &items);
    assert!(ctx.is_intra_eu);

    let result = calculate_vat(&items, &fr.vat, Some(&ctx));

    assert!(result.reverse_charge);
    assert_eq!(result.total_vat, dec!(0.00));
    assert_eq!(result.total_gross, result.total_net);
    assert_eq!(result.total_net, dec!(600.00));
    assert_eq!(result.breakdown.len(), 1);
    assert_eq!(result.breakdown[0].rate, dec!(0));
    assert_eq!(
        result.reverse_charge_text.as_deref(),
        Some("Autoliquidation — TVA due par le preneur (art. 283-2 du CGI)")
    );
    assert_consistent(&result);
}

#[test]
fn reverse_charge_ignores_input_rates() {
    // Any mix of input rates collapses to the same zero-VAT result
    let fr = config::get("FR");
    let customer = PartyBuilder::new("Kunde AG", "Berlin", "10115", "DE")
        .vat_number("DE123456789")
        .company(true)
        .build();
    for rate in [dec!(0), dec!(5.5), dec!(20), dec!(99)] {
        let items = [line(dec!(1), dec!(100), rate)];
        let ctx = build_context(&fr_supplier(), &customer, &items);
        let result = calculate_vat(&items, &fr.vat, Some(&ctx));
        assert_eq!(result.total_vat, dec!(0.00), "rate {rate}");
        assert_eq!(result.total_gross, result.total_net, "rate {rate}");
    }
}

// ---------------------------------------------------------------------------
// Rounding modes
// ---------------------------------------------------------------------------

#[test]
fn spanish_line_rounding_vs_french_total_rounding() {
    let es = config::get("ES");
    let fr = config::get("FR");
    assert_eq!(es.vat.rounding, RoundingMode::Line);
    assert_eq!(fr.vat.rounding, RoundingMode::Total);

    // Fractional per-line VAT: 7 lines of 0.33 at 21% → per-line VAT 0.0693
    // rounds to 0.07 each (0.49 total); document-level keeps 0.4851 → 0.49?
    // Use values that actually diverge: 3 × 10.005.
    let items = [
        line(dec!(1), dec!(10.005), dec!(21)),
        line(dec!(1), dec!(10.005), dec!(21)),
        line(dec!(1), dec!(10.005), dec!(21)),
    ];

    let per_line = calculate_vat(&items, &es.vat, None);
    let per_total = calculate_vat(&items, &fr.vat, None);

    // ES: each line net rounds 10.005 → 10.01, so base is 30.03
    assert_eq!(per_line.total_net, dec!(30.03));
    // FR: sum 30.015 rounds once → 30.02
    assert_eq!(per_total.total_net, dec!(30.02));

    assert_consistent(&per_line);
    assert_consistent(&per_total);
}

#[test]
fn both_modes_satisfy_consistency_for_awkward_inputs() {
    let items = [
        line(dec!(3), dec!(0.333), dec!(21)),
        line(dec!(7), dec!(1.111), dec!(10)),
        line(dec!(1), dec!(99.999), dec!(21)),
        line(dec!(-2), dec!(0.505), dec!(10)),
    ];
    for country in ["ES", "FR", "DE", "PT", "IT"] {
        let config = config::get(country);
        let result = calculate_vat(&items, &config.vat, None);
        assert_consistent(&result);
    }
}

// ---------------------------------------------------------------------------
// Edge cases
// ---------------------------------------------------------------------------

#[test]
fn zero_quantity_and_zero_price_lines() {
    let fr = config::get("FR");
    let result = calculate_vat(
        &[
            line(dec!(0), dec!(50), dec!(20)),
            line(dec!(5), dec!(0), dec!(20)),
        ],
        &fr.vat,
        None,
    );
    assert_eq!(result.total_gross, dec!(0.00));
    assert_consistent(&result);
}

#[test]
fn credit_lines_flow_sign_unchanged() {
    let fr = config::get("FR");
    let result = calculate_vat(
        &[
            line(dec!(1), dec!(100), dec!(20)),
            line(dec!(-1), dec!(40), dec!(20)),
        ],
        &fr.vat,
        None,
    );
    assert_eq!(result.total_net, dec!(60.00));
    assert_eq!(result.total_vat, dec!(12.00));
    assert_consistent(&result);
}

#[test]
fn fully_negative_document() {
    // A credit note is all-negative; invariants must still hold
    let fr = config::get("FR");
    let result = calculate_vat(&[line(dec!(-3), dec!(45.50), dec!(20))], &fr.vat, None);
    assert_eq!(result.total_net, dec!(-136.50));
    assert_eq!(result.total_vat, dec!(-27.30));
    assert_consistent(&result);
}

#[test]
fn breakdown_keys_are_distinct_rates() {
    let fr = config::get("FR");
    let result = calculate_vat(
        &[
            line(dec!(1), dec!(10), dec!(20)),
            line(dec!(1), dec!(20), dec!(20)),
            line(dec!(1), dec!(30), dec!(10)),
            line(dec!(1), dec!(40), dec!(5.5)),
        ],
        &fr.vat,
        None,
    );
    let rates: Vec<Decimal> = result.breakdown.iter().map(|b| b.rate).collect();
    assert_eq!(rates, vec![dec!(5.5), dec!(10), dec!(20)]);
}
