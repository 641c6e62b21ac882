//! Compliance rules resolver.
//!
//! Combines the transaction context with the supplier's country config into
//! an [`ApplicableRules`] snapshot: VAT policy, required fields, the
//! transmission channel for the transaction type, and the legal mentions
//! whose predicates hold. Pure — the only date involved is supplied by the
//! caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::context::{ComplianceContext, TransactionType};
use crate::config::{
    ChannelPolicy, CountryConfig, LegalMention, MentionCondition, PartyFlag, TransactionFlag,
    VatPolicy,
};
use crate::core::DocumentType;

/// A legal mention resolved for a concrete transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMention {
    pub key: String,
    pub text: String,
}

/// Snapshot of the rules applicable to one document operation.
/// Computed fresh per call; never cached or mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicableRules {
    /// Country the rules were resolved for (the supplier's jurisdiction).
    pub country_code: String,
    /// VAT policy snapshot.
    pub vat: VatPolicy,
    /// Required canonical fields for the document type.
    pub required_fields: Vec<String>,
    /// Transmission channel policy matching the transaction type.
    pub transmission: ChannelPolicy,
    /// Whether that channel's mandate is in force on the supplied date.
    pub transmission_mandatory: bool,
    /// Legal mentions to print: all mandatory ones plus the conditional
    /// ones whose predicate holds.
    pub legal_mentions: Vec<ResolvedMention>,
    /// Whether the intra-EU B2B reverse charge applies.
    pub reverse_charge: bool,
}

/// Resolve the applicable rules for a document operation.
///
/// `today` is supplied by the caller — policy effective dates
/// (`mandatory_from`) are the only time-dependent inputs, and the resolver
/// never reads the clock itself.
pub fn resolve_rules(
    context: &ComplianceContext,
    config: &CountryConfig,
    doc_type: DocumentType,
    today: NaiveDate,
) -> ApplicableRules {
    let transmission = match context.transaction_type {
        TransactionType::B2B => config.transmission.b2b.clone(),
        TransactionType::B2G => config.transmission.b2g.clone(),
        TransactionType::B2C => config.transmission.b2c.clone(),
    };
    let transmission_mandatory = transmission.mandatory_on(today);

    let legal_mentions = config
        .legal_mentions
        .iter()
        .filter(|m| mention_applies(m, context))
        .map(|m| ResolvedMention {
            key: m.key.clone(),
            text: m.text.clone(),
        })
        .collect();

    let required_fields = config
        .required_fields
        .get(&doc_type)
        .cloned()
        .unwrap_or_default();

    ApplicableRules {
        country_code: config.code.clone(),
        vat: config.vat.clone(),
        required_fields,
        transmission,
        transmission_mandatory,
        legal_mentions,
        reverse_charge: context.reverse_charge_applies(),
    }
}

fn mention_applies(mention: &LegalMention, context: &ComplianceContext) -> bool {
    match &mention.condition {
        None => true,
        Some(condition) => evaluate_condition(condition, context),
    }
}

fn evaluate_condition(condition: &MentionCondition, context: &ComplianceContext) -> bool {
    match condition {
        MentionCondition::FieldEquals { field, value } => {
            context.property(field).as_deref() == Some(value.as_str())
        }
        MentionCondition::TransactionIs(flag) => match flag {
            TransactionFlag::ReverseCharge => context.reverse_charge_applies(),
            TransactionFlag::IntraEu => context.is_intra_eu,
            TransactionFlag::Export => context.is_export,
        },
        MentionCondition::CustomerIs(flag) => match flag {
            PartyFlag::PublicEntity => context.customer_is_public_entity,
            PartyFlag::Company => context.customer_is_company,
            PartyFlag::Individual => !context.customer_is_company,
        },
        MentionCondition::SupplierIs(flag) => match flag {
            PartyFlag::PublicEntity => false,
            PartyFlag::Company => context.supplier_is_company,
            PartyFlag::Individual => !context.supplier_is_company,
        },
        MentionCondition::Expr(expr) => evaluate_expr(expr, context),
    }
}

/// Evaluate a `property == literal` expression against the context.
/// Unknown properties and malformed expressions evaluate false.
fn evaluate_expr(expr: &str, context: &ComplianceContext) -> bool {
    let Some((lhs, rhs)) = expr.split_once("==") else {
        return false;
    };
    let rhs = rhs.trim().trim_matches('"').trim_matches('\'');
    context.property(lhs).as_deref() == Some(rhs)
}
