use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use efactura::compliance::{build_context, calculate_vat};
use efactura::config;
use efactura::core::*;
use efactura::formats::{self, FormatConfig};
use efactura::render;

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn build_invoice(line_count: usize) -> DocumentData {
    let mut builder = DocumentDataBuilder::new(DocumentType::Invoice, "BENCH-001", test_date())
        .due_date(NaiveDate::from_ymd_opt(2025, 4, 10).unwrap())
        .supplier(
            PartyBuilder::new("Benchmark SARL", "Paris", "75002", "FR")
                .street("1 rue du Test")
                .vat_number("FR40123456824")
                .legal_id("123456824")
                .company(true)
                .build(),
        )
        .customer(
            PartyBuilder::new("Client SA", "Lyon", "69001", "FR")
                .vat_number("FR12345678901")
                .company(true)
                .build(),
        );

    for i in 1..=line_count {
        builder = builder.add_line(
            LineItemBuilder::new(format!("Service item {i}"), dec!(5), dec!(120))
                .vat_rate(if i % 3 == 0 { dec!(10) } else { dec!(20) })
                .services()
                .build(),
        );
    }

    let mut doc = builder.build().unwrap();
    let fr = config::get("FR");
    let ctx = build_context(&doc.supplier, &doc.customer, &doc.lines);
    doc.totals = Some(calculate_vat(&doc.lines, &fr.vat, Some(&ctx)));
    doc
}

fn bench_vat(c: &mut Criterion) {
    let fr = config::get("FR");
    let small = build_invoice(10);
    let large = build_invoice(1000);

    c.bench_function("vat_10_lines", |b| {
        b.iter(|| calculate_vat(black_box(&small.lines), &fr.vat, None))
    });
    c.bench_function("vat_1000_lines", |b| {
        b.iter(|| calculate_vat(black_box(&large.lines), &fr.vat, None))
    });
}

fn bench_formats(c: &mut Criterion) {
    let doc = build_invoice(10);
    for (name, format) in [
        ("ubl_10_lines", OutputFormat::Ubl),
        ("cii_10_lines", OutputFormat::Cii),
    ] {
        let format_config = FormatConfig {
            format,
            country_code: "FR".into(),
        };
        c.bench_function(name, |b| {
            b.iter(|| formats::generate(black_box(&doc), &format_config))
        });
    }
}

fn bench_render(c: &mut Criterion) {
    let doc = build_invoice(10);
    let fr = config::get("FR");
    let build_result = efactura::document::build(
        &efactura::document::BuildRequest {
            data: &doc,
            format: OutputFormat::FacturX,
            style: None,
        },
        &fr,
    )
    .unwrap();

    c.bench_function("render_facturx_hybrid", |b| {
        b.iter(|| render::render(black_box(&build_result), OutputFormat::FacturX))
    });
}

criterion_group!(benches, bench_vat, bench_formats, bench_render);
criterion_main!(benches);
