use serde::{Deserialize, Serialize};

use crate::core::{ItemKind, LineItem, Party};

/// EU member state country codes (ISO 3166-1 alpha-2).
const EU_COUNTRIES: &[&str] = &[
    "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GR", "HR", "HU", "IE", "IT",
    "LT", "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK",
];

/// Whether `country` is an EU member state. Independent of the config
/// registry — membership is a fact, not a policy.
pub fn is_eu_member(country: &str) -> bool {
    EU_COUNTRIES.contains(&country.to_uppercase().as_str())
}

/// Transaction classification driving transmission policy and reverse charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    B2B,
    B2G,
    B2C,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::B2B => "b2b",
            Self::B2G => "b2g",
            Self::B2C => "b2c",
        }
    }
}

/// Snapshot of the facts the rules resolver reasons over. Computed fresh per
/// document operation, never cached or mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceContext {
    pub supplier_country: String,
    pub customer_country: String,
    /// Both parties in the EU, in different member states.
    pub is_intra_eu: bool,
    /// Customer outside the EU.
    pub is_export: bool,
    pub transaction_type: TransactionType,
    pub supplier_is_company: bool,
    pub customer_is_company: bool,
    pub customer_is_public_entity: bool,
    pub customer_has_vat_number: bool,
    pub has_goods: bool,
    pub has_services: bool,
}

/// Classify a transaction from its parties and lines.
///
/// `transaction_type` is B2G when the customer is flagged as a public
/// entity, B2B when the customer is a company carrying a jurisdiction
/// identifier, otherwise B2C.
pub fn build_context(supplier: &Party, customer: &Party, items: &[LineItem]) -> ComplianceContext {
    let supplier_country = supplier.country_code.to_uppercase();
    let customer_country = customer.country_code.to_uppercase();

    let supplier_eu = is_eu_member(&supplier_country);
    let customer_eu = is_eu_member(&customer_country);

    let is_intra_eu = supplier_eu && customer_eu && supplier_country != customer_country;
    let is_export = supplier_eu && !customer_eu;

    let customer_has_vat_number = customer
        .vat_number
        .as_deref()
        .is_some_and(|v| !v.trim().is_empty());

    let transaction_type = if customer.is_public_entity {
        TransactionType::B2G
    } else if customer.is_company && customer_has_vat_number {
        TransactionType::B2B
    } else {
        TransactionType::B2C
    };

    ComplianceContext {
        supplier_country,
        customer_country,
        is_intra_eu,
        is_export,
        transaction_type,
        supplier_is_company: supplier.is_company,
        customer_is_company: customer.is_company,
        customer_is_public_entity: customer.is_public_entity,
        customer_has_vat_number,
        has_goods: items.iter().any(|i| i.kind == ItemKind::Goods),
        has_services: items.iter().any(|i| i.kind == ItemKind::Services),
    }
}

impl ComplianceContext {
    /// Whether the intra-EU B2B reverse charge applies to this transaction.
    pub fn reverse_charge_applies(&self) -> bool {
        self.is_intra_eu && self.transaction_type == TransactionType::B2B
    }

    /// Look up a named context property for mention predicates
    /// ("transaction.type", "supplier.country", ...).
    pub fn property(&self, path: &str) -> Option<String> {
        match path.trim() {
            "transaction.type" => Some(self.transaction_type.as_str().to_string()),
            "transaction.reverse_charge" => Some(self.reverse_charge_applies().to_string()),
            "transaction.intra_eu" => Some(self.is_intra_eu.to_string()),
            "transaction.export" => Some(self.is_export.to_string()),
            "supplier.country" => Some(self.supplier_country.clone()),
            "customer.country" => Some(self.customer_country.clone()),
            "customer.is_company" => Some(self.customer_is_company.to_string()),
            "customer.is_public_entity" => Some(self.customer_is_public_entity.to_string()),
            _ => None,
        }
    }
}
