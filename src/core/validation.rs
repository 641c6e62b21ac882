use regex::Regex;
use rust_decimal::Decimal;

use super::error::ValidationError;
use super::types::*;
use super::{currencies, units};
use crate::config::CountryConfig;

/// Validate a canonical document against a jurisdiction's rules.
///
/// Checks the config's required-field list for the document type, its
/// identifier patterns, the reference tables (currency, country, unit
/// codes), and — when totals are present — the VAT consistency laws.
/// Returns all errors found, not just the first. An empty result means the
/// document satisfies the jurisdiction's onboarding-level requirements; it
/// is not a substitute for schema validation of generated XML.
pub fn validate_document(doc: &DocumentData, config: &CountryConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if doc.number.trim().is_empty() {
        errors.push(ValidationError::new("number", "document number must not be empty"));
    }

    if doc.currency.len() != 3 {
        errors.push(ValidationError::new(
            "currency",
            "currency code must be 3 characters (ISO 4217)",
        ));
    } else if !currencies::is_known_currency_code(&doc.currency) {
        errors.push(ValidationError::new(
            "currency",
            format!("currency code '{}' is not a known ISO 4217 code", doc.currency),
        ));
    }

    validate_party(&doc.supplier, "supplier", &mut errors);
    validate_party(&doc.customer, "customer", &mut errors);

    // Required fields declared by the jurisdiction for this document type
    if let Some(required) = config.required_fields.get(&doc.doc_type) {
        for field in required {
            if !field_present(doc, field) {
                errors.push(ValidationError::with_rule(
                    field.clone(),
                    "required by jurisdiction",
                    format!("{}-REQ", config.code),
                ));
            }
        }
    }

    // Identifier patterns
    for rule in &config.identifiers {
        match field_value(doc, &rule.field) {
            Some(value) => match Regex::new(&rule.pattern) {
                Ok(re) => {
                    if !re.is_match(value) {
                        errors.push(ValidationError::with_rule(
                            rule.field.clone(),
                            format!(
                                "'{value}' does not match the expected format (e.g. {})",
                                rule.example
                            ),
                            format!("{}-ID", config.code),
                        ));
                    }
                }
                Err(e) => {
                    errors.push(ValidationError::new(
                        rule.field.clone(),
                        format!("invalid identifier pattern in config: {e}"),
                    ));
                }
            },
            None => {
                if rule.required {
                    errors.push(ValidationError::with_rule(
                        rule.field.clone(),
                        format!("identifier is required (e.g. {})", rule.example),
                        format!("{}-ID", config.code),
                    ));
                }
            }
        }
    }

    // Lines
    for (i, line) in doc.lines.iter().enumerate() {
        let prefix = format!("lines[{i}]");
        if line.description.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("{prefix}.description"),
                "line description must not be empty",
            ));
        }
        if line.vat_rate.is_sign_negative() {
            errors.push(ValidationError::new(
                format!("{prefix}.vat_rate"),
                "VAT rate must not be negative",
            ));
        }
        if let Some(unit) = &line.unit {
            if !units::is_known_unit_code(unit) {
                errors.push(ValidationError::new(
                    format!("{prefix}.unit"),
                    format!("unit code '{unit}' is not a known UN/CEFACT Rec 20 code"),
                ));
            }
        }
    }

    // Totals consistency, when computed
    if let Some(totals) = &doc.totals {
        errors.extend(validate_totals(totals));
    }

    errors
}

/// Check the VAT consistency laws on a computed result.
pub fn validate_totals(totals: &VatResult) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let vat_sum: Decimal = totals.breakdown.iter().map(|b| b.vat_amount).sum();
    if vat_sum != totals.total_vat {
        errors.push(ValidationError::new(
            "totals.total_vat",
            format!(
                "VAT total {} does not match sum of breakdown amounts {}",
                totals.total_vat, vat_sum
            ),
        ));
    }

    if totals.total_net + totals.total_vat != totals.total_gross {
        errors.push(ValidationError::new(
            "totals.total_gross",
            format!(
                "gross total {} does not match net {} + VAT {}",
                totals.total_gross, totals.total_net, totals.total_vat
            ),
        ));
    }

    if totals.reverse_charge {
        if !totals.total_vat.is_zero() {
            errors.push(ValidationError::new(
                "totals.total_vat",
                "reverse-charge documents must carry zero VAT",
            ));
        }
        if totals.reverse_charge_text.is_none() {
            errors.push(ValidationError::new(
                "totals.reverse_charge_text",
                "reverse-charge documents must carry the jurisdiction wording",
            ));
        }
    }

    errors
}

fn validate_party(party: &Party, prefix: &str, errors: &mut Vec<ValidationError>) {
    if party.name.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.name"),
            "name must not be empty",
        ));
    }
    if party.country_code.len() != 2 {
        errors.push(ValidationError::new(
            format!("{prefix}.country_code"),
            "country code must be 2 characters (ISO 3166-1 alpha-2)",
        ));
    }
}

/// Whether a dot-path field carries a value on the document.
fn field_present(doc: &DocumentData, path: &str) -> bool {
    match path {
        "lines" => !doc.lines.is_empty(),
        "issue_date" => true,
        "due_date" => doc.due_date.is_some(),
        "valid_until" => doc.valid_until.is_some(),
        "payment_date" => doc.payment_date.is_some(),
        _ => field_value(doc, path).is_some_and(|v| !v.trim().is_empty()),
    }
}

/// Resolve a dot-path to its string value, when the field is string-shaped.
fn field_value<'a>(doc: &'a DocumentData, path: &str) -> Option<&'a str> {
    let party_field = |party: &'a Party, field: &str| -> Option<&'a str> {
        match field {
            "name" => Some(party.name.as_str()),
            "vat_number" => party.vat_number.as_deref(),
            "legal_id" => party.legal_id.as_deref(),
            "street" => party.street.as_deref(),
            "city" => Some(party.city.as_str()),
            "postal_code" => Some(party.postal_code.as_str()),
            "country_code" => Some(party.country_code.as_str()),
            "peppol_id" => party.peppol_id.as_deref(),
            "routing_code" => party.routing_code.as_deref(),
            "email" => party.email.as_deref(),
            _ => None,
        }
    };

    match path.split_once('.') {
        Some(("supplier", rest)) => party_field(&doc.supplier, rest),
        Some(("customer", rest)) => party_field(&doc.customer, rest),
        _ => match path {
            "number" => Some(doc.number.as_str()),
            "id" => Some(doc.id.as_str()),
            "currency" => Some(doc.currency.as_str()),
            "related_number" => doc.related_number.as_deref(),
            "correction_reason" => doc.correction_reason.as_deref(),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::core::{DocumentDataBuilder, LineItemBuilder, PartyBuilder};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn fr_invoice(vat_number: Option<&str>, legal_id: Option<&str>) -> DocumentData {
        let mut supplier = PartyBuilder::new("ACME SARL", "Paris", "75002", "FR").company(true);
        if let Some(v) = vat_number {
            supplier = supplier.vat_number(v);
        }
        if let Some(l) = legal_id {
            supplier = supplier.legal_id(l);
        }
        DocumentDataBuilder::new(DocumentType::Invoice, "FA-2025-001", date())
            .due_date(NaiveDate::from_ymd_opt(2025, 4, 10).unwrap())
            .supplier(supplier.build())
            .customer(PartyBuilder::new("Client SA", "Lyon", "69001", "FR").build())
            .add_line(LineItemBuilder::new("Widget", dec!(1), dec!(100)).build())
            .build()
            .unwrap()
    }

    #[test]
    fn valid_french_invoice() {
        let doc = fr_invoice(Some("FR40123456824"), Some("123456824"));
        let errors = validate_document(&doc, &config::get("FR"));
        assert!(errors.is_empty(), "expected no errors, got: {errors:?}");
    }

    #[test]
    fn missing_required_identifier() {
        let doc = fr_invoice(None, Some("123456824"));
        let errors = validate_document(&doc, &config::get("FR"));
        assert!(errors.iter().any(|e| e.field == "supplier.vat_number"));
    }

    #[test]
    fn malformed_identifier() {
        let doc = fr_invoice(Some("FR-not-a-vat"), Some("123456824"));
        let errors = validate_document(&doc, &config::get("FR"));
        assert!(errors
            .iter()
            .any(|e| e.field == "supplier.vat_number" && e.message.contains("expected format")));
    }

    #[test]
    fn generic_config_requires_little() {
        let doc = fr_invoice(None, None);
        // Generic fallback has no required identifiers
        let errors = validate_document(&doc, &config::get("XX"));
        assert!(errors.is_empty(), "generic config should accept: {errors:?}");
    }

    #[test]
    fn unknown_unit_code_flagged() {
        let mut doc = fr_invoice(Some("FR40123456824"), Some("123456824"));
        doc.lines[0].unit = Some("BOGUS".into());
        let errors = validate_document(&doc, &config::get("FR"));
        assert!(errors.iter().any(|e| e.field == "lines[0].unit"));
    }

    #[test]
    fn inconsistent_totals_flagged() {
        let mut doc = fr_invoice(Some("FR40123456824"), Some("123456824"));
        doc.totals = Some(VatResult {
            total_net: dec!(100),
            total_vat: dec!(20),
            total_gross: dec!(119), // wrong on purpose
            breakdown: vec![RateBreakdown {
                rate: dec!(20),
                base_amount: dec!(100),
                vat_amount: dec!(20),
            }],
            reverse_charge: false,
            reverse_charge_text: None,
        });
        let errors = validate_document(&doc, &config::get("FR"));
        assert!(errors.iter().any(|e| e.field == "totals.total_gross"));
    }
}
