//! Country configuration registry.
//!
//! A fixed, immutable table of per-jurisdiction rule sets, built once at
//! first use. Lookup never fails: unknown codes degrade atomically to the
//! generic template with the requested code substituted, so downstream code
//! treats "generic" as a first-class result rather than an error.

mod countries;
mod policy;

pub use policy::*;

use std::collections::HashMap;
use std::sync::LazyLock;

static REGISTRY: LazyLock<CountryRegistry> = LazyLock::new(CountryRegistry::new);

/// Immutable lookup table of country configs.
pub struct CountryRegistry {
    table: HashMap<&'static str, CountryConfig>,
}

impl CountryRegistry {
    fn new() -> Self {
        let mut table: HashMap<&'static str, CountryConfig> = HashMap::new();
        table.insert("FR", countries::france());
        table.insert("DE", countries::germany());
        table.insert("IT", countries::italy());
        table.insert("ES", countries::spain());
        table.insert("PT", countries::portugal());
        table.insert("BE", countries::belgium());
        table.insert("NL", countries::netherlands());
        table.insert("AT", countries::austria());
        table.insert("PL", countries::poland());
        table.insert("LU", countries::luxembourg());
        Self { table }
    }

    /// The process-wide registry.
    pub fn global() -> &'static CountryRegistry {
        &REGISTRY
    }

    /// Resolve a config. Case-insensitive; a miss returns the generic
    /// template with `code` overwritten — never a partial merge, never an error.
    pub fn get(&self, code: &str) -> CountryConfig {
        let upper = code.trim().to_uppercase();
        match self.table.get(upper.as_str()) {
            Some(config) => config.clone(),
            None => {
                let mut generic = countries::generic();
                generic.code = upper;
                generic
            }
        }
    }

    /// Whether a dedicated (non-generic) config exists for `code`.
    pub fn has(&self, code: &str) -> bool {
        self.table.contains_key(code.trim().to_uppercase().as_str())
    }

    /// All configured country codes, sorted.
    pub fn list(&self) -> Vec<&'static str> {
        let mut codes: Vec<&'static str> = self.table.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Configured EU member codes, sorted.
    pub fn list_eu(&self) -> Vec<&'static str> {
        let mut codes: Vec<&'static str> = self
            .table
            .iter()
            .filter(|(_, c)| c.is_eu)
            .map(|(k, _)| *k)
            .collect();
        codes.sort_unstable();
        codes
    }
}

/// Resolve the config for a country code via the global registry.
pub fn get(code: &str) -> CountryConfig {
    CountryRegistry::global().get(code)
}

/// Whether a dedicated config exists for `code`.
pub fn has(code: &str) -> bool {
    CountryRegistry::global().has(code)
}

/// All configured country codes.
pub fn list() -> Vec<&'static str> {
    CountryRegistry::global().list()
}

/// Configured EU member codes.
pub fn list_eu() -> Vec<&'static str> {
    CountryRegistry::global().list_eu()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DocumentType, OutputFormat};
    use rust_decimal_macros::dec;

    #[test]
    fn known_country_lookup() {
        let fr = get("FR");
        assert_eq!(fr.code, "FR");
        assert!(fr.is_eu);
        assert_eq!(fr.vat.standard_rate, dec!(20));
        assert_eq!(fr.vat.rounding, RoundingMode::Total);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let lower = get("fr");
        assert_eq!(lower.code, "FR");
        assert_eq!(lower.name, "France");
    }

    #[test]
    fn unknown_code_falls_back_to_generic() {
        let xx = get("XX");
        assert_eq!(xx.code, "XX");
        assert!(!xx.is_eu);
        assert_eq!(xx.vat.default_rate, dec!(20));
        assert_eq!(xx.documents.builder, BuilderKind::Generic);
    }

    #[test]
    fn fallback_is_idempotent() {
        let a = get("ZZ");
        let b = get("ZZ");
        assert_eq!(a.code, b.code);
        assert_eq!(a.name, b.name);
        assert_eq!(a.vat.standard_rate, b.vat.standard_rate);
        // Identical to the generic template apart from the code
        let generic = get("QQ");
        assert_eq!(a.name, generic.name);
        assert_eq!(a.currency, generic.currency);
    }

    #[test]
    fn has_and_list() {
        assert!(has("FR"));
        assert!(has("pl"));
        assert!(!has("XX"));
        let codes = list();
        assert!(codes.contains(&"DE"));
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn eu_list_subset() {
        let eu = list_eu();
        assert!(eu.contains(&"FR"));
        assert!(eu.contains(&"PL"));
        for code in eu {
            assert!(get(code).is_eu);
        }
    }

    #[test]
    fn rounding_modes_match_jurisdiction_practice() {
        assert_eq!(get("ES").vat.rounding, RoundingMode::Line);
        assert_eq!(get("PT").vat.rounding, RoundingMode::Line);
        assert_eq!(get("FR").vat.rounding, RoundingMode::Total);
        assert_eq!(get("DE").vat.rounding, RoundingMode::Total);
        assert_eq!(get("IT").vat.rounding, RoundingMode::Total);
    }

    #[test]
    fn format_policies() {
        let de = get("DE");
        assert!(de
            .documents
            .supports(DocumentType::Invoice, OutputFormat::Zugferd));
        assert_eq!(de.documents.default_format, OutputFormat::Zugferd);

        let it = get("IT");
        assert!(it
            .documents
            .supports(DocumentType::Invoice, OutputFormat::FatturaPa));

        // Generic-builder countries declare nothing → PDF only
        let es = get("ES");
        assert_eq!(
            es.documents.supported_formats(DocumentType::Invoice),
            &[OutputFormat::Pdf]
        );
    }

    #[test]
    fn portugal_requires_chained_series() {
        let pt = get("PT");
        assert!(pt.numbering.series_required);
        assert!(pt.numbering.hash_chained);
        assert!(pt.qr.required);
    }

    #[test]
    fn mandate_effective_dates() {
        let fr = get("FR");
        let before = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let after = chrono::NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        assert!(!fr.transmission.b2b.mandatory_on(before));
        assert!(fr.transmission.b2b.mandatory_on(after));
    }
}
