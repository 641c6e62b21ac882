#![cfg(feature = "core")]

use efactura::config::{self, BuilderKind, RoundingMode, TransmissionModel};
use efactura::core::{DocumentType, OutputFormat};
use rust_decimal_macros::dec;

#[test]
fn unknown_country_gets_generic_with_code_substituted() {
    let xx = config::get("XX");
    assert_eq!(xx.code, "XX");
    assert!(!xx.is_eu);
    assert_eq!(xx.vat.default_rate, dec!(20));
}

#[test]
fn fallback_idempotence() {
    let a = config::get("ZZ");
    let b = config::get("ZZ");
    assert_eq!(a.code, "ZZ");
    assert_eq!(b.code, "ZZ");
    // All fields other than the code equal the generic template's
    let other = config::get("QQ");
    assert_eq!(a.name, other.name);
    assert_eq!(a.currency, other.currency);
    assert_eq!(a.locale, other.locale);
    assert_eq!(a.vat.standard_rate, other.vat.standard_rate);
    assert_eq!(a.archiving.retention_years, other.archiving.retention_years);
}

#[test]
fn lookup_never_partial() {
    // Every resolved config, known or not, is complete enough to drive the
    // whole pipeline: it has a default format, a builder kind, and VAT rates.
    for code in ["FR", "DE", "IT", "ES", "PT", "BE", "NL", "AT", "PL", "LU", "XX", "US", "JP"] {
        let config = config::get(code);
        assert!(!config.currency.is_empty(), "{code}: currency");
        assert!(!config.vat.reverse_charge_text.is_empty(), "{code}: rc text");
        assert!(config.vat.standard_rate > dec!(0), "{code}: standard rate");
    }
}

#[test]
fn case_insensitive_has_and_get() {
    assert!(config::has("fr"));
    assert!(config::has("Fr"));
    assert_eq!(config::get("pl").code, "PL");
    assert_eq!(config::get(" de ").code, "DE");
}

#[test]
fn list_is_sorted_and_eu_subset() {
    let all = config::list();
    assert!(all.windows(2).all(|w| w[0] < w[1]));
    let eu = config::list_eu();
    for code in &eu {
        assert!(all.contains(code));
        assert!(config::get(code).is_eu);
    }
}

#[test]
fn builder_kinds() {
    assert_eq!(config::get("FR").documents.builder, BuilderKind::Regional);
    assert_eq!(config::get("DE").documents.builder, BuilderKind::Regional);
    assert_eq!(config::get("IT").documents.builder, BuilderKind::Regional);
    assert_eq!(config::get("PL").documents.builder, BuilderKind::Regional);
    assert_eq!(config::get("ES").documents.builder, BuilderKind::Generic);
    assert_eq!(config::get("PT").documents.builder, BuilderKind::Generic);
    assert_eq!(config::get("XX").documents.builder, BuilderKind::Generic);
}

#[test]
fn default_formats_match_national_mandates() {
    assert_eq!(config::get("IT").documents.default_format, OutputFormat::FatturaPa);
    assert_eq!(config::get("PL").documents.default_format, OutputFormat::Ksef);
    assert_eq!(config::get("DE").documents.default_format, OutputFormat::Zugferd);
    assert_eq!(config::get("XX").documents.default_format, OutputFormat::Pdf);
}

#[test]
fn clearance_countries() {
    assert_eq!(
        config::get("IT").transmission.b2b.model,
        TransmissionModel::Clearance
    );
    assert_eq!(
        config::get("PL").transmission.b2b.model,
        TransmissionModel::Clearance
    );
    assert_eq!(
        config::get("XX").transmission.b2b.model,
        TransmissionModel::NotRegulated
    );
}

#[test]
fn rounding_modes() {
    for (code, expected) in [
        ("ES", RoundingMode::Line),
        ("PT", RoundingMode::Line),
        ("FR", RoundingMode::Total),
        ("DE", RoundingMode::Total),
        ("BE", RoundingMode::Total),
        ("IT", RoundingMode::Total),
    ] {
        assert_eq!(config::get(code).vat.rounding, expected, "{code}");
    }
}

#[test]
fn quote_is_never_an_e_invoice() {
    for code in config::list() {
        let config = config::get(code);
        let formats = config.documents.supported_formats(DocumentType::Quote);
        assert!(
            formats.iter().all(|f| *f == OutputFormat::Pdf),
            "{code}: quotes must be PDF-only, got {formats:?}"
        );
    }
}

#[test]
fn supported_formats_include_the_default() {
    for code in config::list() {
        let config = config::get(code);
        let invoice_formats = config.documents.supported_formats(DocumentType::Invoice);
        assert!(
            invoice_formats.contains(&config.documents.default_format),
            "{code}: default format must be supported for invoices"
        );
    }
}
