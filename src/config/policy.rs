use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{DocumentType, OutputFormat};

/// Where VAT rounding happens for a jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Round each line's net and VAT to minor units before summation
    /// (authorities that compute tax per line, e.g. ES/PT).
    Line,
    /// Sum unrounded, round only the per-rate aggregates
    /// (document-level rounding, e.g. FR/DE/BE/IT).
    Total,
}

/// VAT policy of a jurisdiction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VatPolicy {
    /// Standard rate percentage.
    pub standard_rate: Decimal,
    /// Reduced rates available in the jurisdiction.
    pub reduced_rates: Vec<Decimal>,
    /// Default rate applied when a line carries none meaningful.
    pub default_rate: Decimal,
    /// Rounding mode.
    pub rounding: RoundingMode,
    /// Wording attached when the intra-EU B2B reverse charge applies.
    pub reverse_charge_text: String,
}

/// Per-field identifier requirement (VAT number, registration id, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifierRule {
    /// Dot-separated field path on the canonical document ("supplier.vat_number").
    pub field: String,
    /// Validation regex (anchored by the validator).
    pub pattern: String,
    /// Whether the identifier is required on tax documents.
    pub required: bool,
    /// Example value for error messages.
    pub example: String,
}

/// E-invoicing transmission model of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransmissionModel {
    /// No e-invoicing regulation for this channel.
    NotRegulated,
    /// Invoice exchanged freely, reported/audited after the fact.
    PostAudit,
    /// Invoice must clear a government platform before it is valid (SdI, KSeF).
    Clearance,
    /// Invoice routed through a centralized national exchange (FR PPF model).
    CentralizedExchange,
    /// Peppol network delivery.
    Peppol,
}

/// Transmission requirements for one channel (B2B, B2G or B2C).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelPolicy {
    pub model: TransmissionModel,
    /// Whether the channel mandates e-invoicing at all.
    pub mandatory: bool,
    /// Date the mandate takes (or took) effect; compared against a
    /// caller-supplied "today", never the wall clock.
    pub mandatory_from: Option<NaiveDate>,
}

impl ChannelPolicy {
    pub fn not_regulated() -> Self {
        Self {
            model: TransmissionModel::NotRegulated,
            mandatory: false,
            mandatory_from: None,
        }
    }

    /// Whether the mandate is in force on `today`.
    pub fn mandatory_on(&self, today: NaiveDate) -> bool {
        self.mandatory
            && match self.mandatory_from {
                Some(from) => today >= from,
                None => true,
            }
    }
}

/// Transmission policy across the three channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmissionPolicy {
    pub b2b: ChannelPolicy,
    pub b2g: ChannelPolicy,
    pub b2c: ChannelPolicy,
}

/// Counter reset cadence for document numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetPeriod {
    Never,
    Yearly,
}

/// Numbering requirements of a jurisdiction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberingPolicy {
    /// Whether documents must carry a declared series.
    pub series_required: bool,
    /// Whether issued numbers must be hash-chained (tamper evidence).
    pub hash_chained: bool,
    /// Counter reset cadence.
    pub reset: ResetPeriod,
}

/// Which builder assembles documents for a jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuilderKind {
    /// PDF-only, no structured e-invoice syntax.
    Generic,
    /// PDF plus one or more structured XML syntaxes.
    Regional,
}

/// Document-format policy: what the jurisdiction can produce, per type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPolicy {
    pub builder: BuilderKind,
    /// Supported output formats per document type. Types absent from the
    /// map support plain PDF only.
    pub formats: HashMap<DocumentType, Vec<OutputFormat>>,
    /// Format used when the caller does not request one.
    pub default_format: OutputFormat,
    /// Whether issued invoices may be edited directly.
    pub issued_editable: bool,
    /// Whether corrections must go through a credit note.
    pub correction_requires_credit_note: bool,
}

const PDF_ONLY: &[OutputFormat] = &[OutputFormat::Pdf];

impl DocumentPolicy {
    /// Declared formats for a document type (plain PDF when undeclared).
    pub fn supported_formats(&self, doc_type: DocumentType) -> &[OutputFormat] {
        self.formats
            .get(&doc_type)
            .map(Vec::as_slice)
            .unwrap_or(PDF_ONLY)
    }

    pub fn supports(&self, doc_type: DocumentType, format: OutputFormat) -> bool {
        self.supported_formats(doc_type).contains(&format)
    }
}

/// Electronic signature requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignaturePolicy {
    pub required: bool,
}

/// QR-code-on-document requirement (PT ATCUD, CH QR-bill, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrPolicy {
    pub required: bool,
}

/// Legal archiving requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivingPolicy {
    pub retention_years: u8,
}

/// Peppol participation policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeppolPolicy {
    pub enabled: bool,
    /// EAS scheme identifier for participant addressing (e.g. "0009" SIRENE).
    pub scheme_id: Option<String>,
}

/// Flags a mention condition can test on the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionFlag {
    ReverseCharge,
    IntraEu,
    Export,
}

/// Flags a mention condition can test on a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyFlag {
    PublicEntity,
    Company,
    Individual,
}

/// Predicate attached to a conditional legal mention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MentionCondition {
    /// A named context property equals a literal value.
    FieldEquals { field: String, value: String },
    /// A transaction-level flag holds.
    TransactionIs(TransactionFlag),
    /// The customer matches a party flag.
    CustomerIs(PartyFlag),
    /// The supplier matches a party flag.
    SupplierIs(PartyFlag),
    /// Free-form `property == literal` expression, evaluated against the
    /// compliance context ("transaction.type == b2g").
    Expr(String),
}

/// A legal mention the jurisdiction requires on documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalMention {
    /// Stable key ("late-payment-penalty", "reverse-charge").
    pub key: String,
    /// Text printed on the document.
    pub text: String,
    /// `None` = mandatory, always included. Otherwise included when the
    /// predicate evaluates true against the compliance context.
    pub condition: Option<MentionCondition>,
}

/// Complete rule set for one jurisdiction. Every lookup resolves to a full,
/// non-partial config — unknown codes fall back atomically to the generic
/// template with the code substituted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryConfig {
    /// ISO 3166-1 alpha-2 code (uppercase).
    pub code: String,
    /// English short name.
    pub name: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// BCP 47 locale used for date/number formatting.
    pub locale: String,
    /// IANA timezone.
    pub timezone: String,
    /// EU membership.
    pub is_eu: bool,
    pub vat: VatPolicy,
    pub identifiers: Vec<IdentifierRule>,
    pub transmission: TransmissionPolicy,
    pub numbering: NumberingPolicy,
    pub documents: DocumentPolicy,
    pub signature: SignaturePolicy,
    pub qr: QrPolicy,
    pub archiving: ArchivingPolicy,
    pub peppol: PeppolPolicy,
    /// Required canonical fields per document type.
    pub required_fields: HashMap<DocumentType, Vec<String>>,
    pub legal_mentions: Vec<LegalMention>,
}
