use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Business document kind handled by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Final commercial invoice.
    Invoice,
    /// Quote / estimate — not a tax document.
    Quote,
    /// Payment receipt referencing a settled invoice.
    Receipt,
    /// Credit note correcting or cancelling an invoice.
    CreditNote,
    /// Proforma invoice — informational, pre-sale.
    Proforma,
    /// Corrective invoice (jurisdictions that amend in place instead of crediting).
    CorrectiveInvoice,
    /// Deposit / advance-payment invoice.
    DepositInvoice,
}

impl DocumentType {
    /// Stable wire token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Quote => "quote",
            Self::Receipt => "receipt",
            Self::CreditNote => "credit-note",
            Self::Proforma => "proforma",
            Self::CorrectiveInvoice => "corrective-invoice",
            Self::DepositInvoice => "deposit-invoice",
        }
    }

    /// Parse from the wire token.
    pub fn from_str_token(token: &str) -> Option<Self> {
        match token {
            "invoice" => Some(Self::Invoice),
            "quote" => Some(Self::Quote),
            "receipt" => Some(Self::Receipt),
            "credit-note" => Some(Self::CreditNote),
            "proforma" => Some(Self::Proforma),
            "corrective-invoice" => Some(Self::CorrectiveInvoice),
            "deposit-invoice" => Some(Self::DepositInvoice),
            _ => None,
        }
    }

    /// Filename prefix used by the orchestrator.
    pub fn filename_prefix(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Quote => "quote",
            Self::Receipt => "receipt",
            Self::CreditNote => "credit-note",
            Self::Proforma => "proforma",
            Self::CorrectiveInvoice => "corrective-invoice",
            Self::DepositInvoice => "deposit-invoice",
        }
    }

    /// UNTDID 1001 type code where the document maps onto one.
    pub fn untdid_code(&self) -> u16 {
        match self {
            Self::Invoice => 380,
            Self::Quote => 310,
            Self::Receipt => 380,
            Self::CreditNote => 381,
            Self::Proforma => 325,
            Self::CorrectiveInvoice => 384,
            Self::DepositInvoice => 386,
        }
    }
}

/// Output format tokens — the stable wire vocabulary of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Plain rasterized PDF, no machine-readable payload.
    Pdf,
    /// Factur-X hybrid: PDF/A-3 with embedded CII XML.
    FacturX,
    /// ZUGFeRD hybrid: PDF/A-3 with embedded CII XML (German naming).
    Zugferd,
    /// XRechnung: UBL XML embedded in a PDF shell for German public sector.
    XRechnung,
    /// Standalone UBL 2.1 XML.
    Ubl,
    /// Standalone UN/CEFACT CII XML.
    Cii,
    /// Standalone FatturaPA XML for the Italian SdI.
    FatturaPa,
    /// Polish KSeF FA(2) XML.
    Ksef,
    /// Polish KSeF FA(3) XML.
    KsefFa3,
}

impl OutputFormat {
    /// Stable wire token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::FacturX => "facturx",
            Self::Zugferd => "zugferd",
            Self::XRechnung => "xrechnung",
            Self::Ubl => "ubl",
            Self::Cii => "cii",
            Self::FatturaPa => "fatturapa",
            Self::Ksef => "ksef",
            Self::KsefFa3 => "ksef-fa3",
        }
    }

    /// Parse from the wire token.
    pub fn from_str_token(token: &str) -> Option<Self> {
        match token {
            "pdf" => Some(Self::Pdf),
            "facturx" => Some(Self::FacturX),
            "zugferd" => Some(Self::Zugferd),
            "xrechnung" => Some(Self::XRechnung),
            "ubl" => Some(Self::Ubl),
            "cii" => Some(Self::Cii),
            "fatturapa" => Some(Self::FatturaPa),
            "ksef" => Some(Self::Ksef),
            "ksef-fa3" => Some(Self::KsefFa3),
            _ => None,
        }
    }

    /// MIME type of the final artifact. Fixed per format, independent of
    /// document type — hybrid formats are PDF-shaped even though they carry XML.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf | Self::FacturX | Self::Zugferd | Self::XRechnung => "application/pdf",
            Self::Ubl | Self::Cii | Self::FatturaPa | Self::Ksef | Self::KsefFa3 => {
                "application/xml"
            }
        }
    }

    /// Canonical file extension. Fixed per format, parallel to [`mime_type`](Self::mime_type).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf | Self::FacturX | Self::Zugferd | Self::XRechnung => "pdf",
            Self::Ubl | Self::Cii | Self::FatturaPa | Self::Ksef | Self::KsefFa3 => "xml",
        }
    }

    /// The structured XML syntax this format carries, if any.
    pub fn xml_syntax(&self) -> Option<XmlSyntax> {
        match self {
            Self::Pdf => None,
            Self::FacturX | Self::Zugferd | Self::Cii => Some(XmlSyntax::Cii),
            Self::XRechnung | Self::Ubl => Some(XmlSyntax::Ubl),
            Self::FatturaPa => Some(XmlSyntax::FatturaPa),
            Self::Ksef => Some(XmlSyntax::KsefFa2),
            Self::KsefFa3 => Some(XmlSyntax::KsefFa3),
        }
    }

    /// True for PDF containers that embed an XML payload (PDF/A-3 hybrids).
    pub fn is_hybrid(&self) -> bool {
        matches!(self, Self::FacturX | Self::Zugferd | Self::XRechnung)
    }

    /// True for formats whose artifact is the XML itself.
    pub fn is_xml_only(&self) -> bool {
        self.xml_syntax().is_some() && !self.is_hybrid()
    }
}

/// Structured XML syntaxes the format generators can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XmlSyntax {
    Ubl,
    Cii,
    FatturaPa,
    KsefFa2,
    KsefFa3,
}

impl XmlSyntax {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ubl => "UBL",
            Self::Cii => "CII",
            Self::FatturaPa => "FatturaPA",
            Self::KsefFa2 => "KSeF FA",
            Self::KsefFa3 => "KSeF FA",
        }
    }

    pub fn version(&self) -> &'static str {
        match self {
            Self::Ubl => "2.1",
            Self::Cii => "D16B",
            Self::FatturaPa => "1.2",
            Self::KsefFa2 => "2",
            Self::KsefFa3 => "3",
        }
    }
}

/// A party to the document (supplier or customer). Immutable per document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    /// Legal name.
    pub name: String,
    /// VAT identifier with country prefix (e.g. "FR40123456824").
    pub vat_number: Option<String>,
    /// Legal / registration identifier (SIREN, HRB, REGON, ...).
    pub legal_id: Option<String>,
    /// Street and number.
    pub street: Option<String>,
    /// City.
    pub city: String,
    /// Postal code.
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: String,
    /// Whether the party is a registered company (vs. an individual).
    pub is_company: bool,
    /// Whether the party is a public-sector entity (drives B2G).
    pub is_public_entity: bool,
    /// Peppol participant identifier.
    pub peppol_id: Option<String>,
    /// Jurisdiction routing identifier (SdI codice destinatario, Leitweg-ID, ...).
    pub routing_code: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}

/// Whether a line bills goods or services — drives unit-of-measure defaults
/// and place-of-supply reasoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Goods,
    Services,
}

/// A single billed line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Free-text description.
    pub description: String,
    /// Quantity. Negative quantities are credit lines.
    pub quantity: Decimal,
    /// Net unit price.
    pub unit_price: Decimal,
    /// VAT rate percentage (e.g. 20 for 20%).
    pub vat_rate: Decimal,
    /// Goods or services.
    pub kind: ItemKind,
    /// Explicit UN/CEFACT Rec 20 unit code; defaulted from `kind` when absent.
    pub unit: Option<String>,
}

impl LineItem {
    /// Unrounded net amount (quantity × unit price). Rounding is the
    /// VAT engine's concern, not the line's.
    pub fn net_amount(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    /// Unrounded VAT amount for this line.
    pub fn vat_amount(&self) -> Decimal {
        self.net_amount() * self.vat_rate / dec!(100)
    }
}

/// Per-rate slice of the VAT breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBreakdown {
    /// VAT rate percentage.
    pub rate: Decimal,
    /// Taxable base at this rate.
    pub base_amount: Decimal,
    /// VAT charged at this rate.
    pub vat_amount: Decimal,
}

/// Result of a VAT calculation over a set of lines.
///
/// Invariants (held by construction, at 2 decimals):
/// `sum(breakdown.vat_amount) == total_vat` and
/// `total_net + total_vat == total_gross`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatResult {
    /// Net total (HT).
    pub total_net: Decimal,
    /// VAT total.
    pub total_vat: Decimal,
    /// Gross total (TTC).
    pub total_gross: Decimal,
    /// One entry per distinct VAT rate present, sorted by rate.
    pub breakdown: Vec<RateBreakdown>,
    /// True when the intra-EU B2B reverse-charge override was applied.
    pub reverse_charge: bool,
    /// Jurisdiction reverse-charge wording, present iff `reverse_charge`.
    pub reverse_charge_text: Option<String>,
}

/// Payment method descriptor rendered on the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMeans {
    /// Human-readable label ("Virement bancaire", "SEPA credit transfer", ...).
    pub label: String,
    /// IBAN, when paying by transfer.
    pub iban: Option<String>,
    /// BIC.
    pub bic: Option<String>,
}

/// The canonical document — the single structure every builder, generator,
/// and renderer consumes. Constructed once per generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentData {
    /// Document kind.
    pub doc_type: DocumentType,
    /// Opaque internal identifier.
    pub id: String,
    /// Human-readable document number.
    pub number: String,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Payment due date (invoices).
    pub due_date: Option<NaiveDate>,
    /// Offer validity end (quotes).
    pub valid_until: Option<NaiveDate>,
    /// Date payment was received (receipts).
    pub payment_date: Option<NaiveDate>,
    /// Referenced original document number (receipts, credit/corrective notes).
    pub related_number: Option<String>,
    /// Reason for correction (credit/corrective notes).
    pub correction_reason: Option<String>,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Issuing party.
    pub supplier: Party,
    /// Receiving party.
    pub customer: Party,
    /// Billed lines.
    pub lines: Vec<LineItem>,
    /// Computed totals. Set by the VAT engine before generation.
    pub totals: Option<VatResult>,
    /// Free-text notes.
    pub notes: Vec<String>,
    /// Payment method descriptor.
    pub payment: Option<PaymentMeans>,
    /// Resolved legal mention texts to print.
    pub legal_mentions: Vec<String>,
    /// Caller-supplied transmission sequence identifier (e.g. FatturaPA
    /// ProgressivoInvio). Jurisdictions that mandate gapless sequences must
    /// supply this from their sequencing authority; the engine never derives
    /// it from the clock or randomness.
    pub transmission_sequence: Option<String>,
}
