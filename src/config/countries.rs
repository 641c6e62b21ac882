//! Static per-country rule sets.
//!
//! One function per jurisdiction, each returning a complete [`CountryConfig`].
//! Countries not listed here resolve to [`generic`] with the requested code
//! substituted. Rates and mandates reflect the state of the national rules
//! as modeled; effective dates are carried in the transmission policies so
//! the resolver can compare them against a caller-supplied date.

use std::collections::HashMap;

use rust_decimal_macros::dec;

use super::policy::*;
use crate::core::{DocumentType, OutputFormat};

fn formats(entries: &[(DocumentType, &[OutputFormat])]) -> HashMap<DocumentType, Vec<OutputFormat>> {
    entries
        .iter()
        .map(|(t, f)| (*t, f.to_vec()))
        .collect()
}

fn required(entries: &[(DocumentType, &[&str])]) -> HashMap<DocumentType, Vec<String>> {
    entries
        .iter()
        .map(|(t, f)| (*t, f.iter().map(|s| s.to_string()).collect()))
        .collect()
}

fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).expect("static config date")
}

/// Baseline required fields shared by all tax documents.
const BASE_INVOICE_FIELDS: &[&str] = &[
    "number",
    "issue_date",
    "supplier.name",
    "supplier.country_code",
    "customer.name",
    "lines",
];

/// Generic fallback template. Used verbatim (code substituted) for every
/// country without a dedicated rule set, so it must be complete and safe:
/// PDF-only, post-audit, no mandates.
pub fn generic() -> CountryConfig {
    CountryConfig {
        code: "ZZ".into(),
        name: "Generic".into(),
        currency: "EUR".into(),
        locale: "en".into(),
        timezone: "UTC".into(),
        is_eu: false,
        vat: VatPolicy {
            standard_rate: dec!(20),
            reduced_rates: vec![],
            default_rate: dec!(20),
            rounding: RoundingMode::Total,
            reverse_charge_text: "Reverse charge — VAT to be accounted for by the recipient \
                                  (Article 196, Council Directive 2006/112/EC)"
                .into(),
        },
        identifiers: vec![IdentifierRule {
            field: "supplier.vat_number".into(),
            pattern: "^[A-Z]{2}[A-Za-z0-9+*.]{2,12}$".into(),
            required: false,
            example: "XX123456789".into(),
        }],
        transmission: TransmissionPolicy {
            b2b: ChannelPolicy::not_regulated(),
            b2g: ChannelPolicy::not_regulated(),
            b2c: ChannelPolicy::not_regulated(),
        },
        numbering: NumberingPolicy {
            series_required: false,
            hash_chained: false,
            reset: ResetPeriod::Never,
        },
        documents: DocumentPolicy {
            builder: BuilderKind::Generic,
            formats: HashMap::new(),
            default_format: OutputFormat::Pdf,
            issued_editable: false,
            correction_requires_credit_note: true,
        },
        signature: SignaturePolicy { required: false },
        qr: QrPolicy { required: false },
        archiving: ArchivingPolicy { retention_years: 10 },
        peppol: PeppolPolicy {
            enabled: false,
            scheme_id: None,
        },
        required_fields: required(&[(DocumentType::Invoice, BASE_INVOICE_FIELDS)]),
        legal_mentions: vec![],
    }
}

pub fn france() -> CountryConfig {
    CountryConfig {
        code: "FR".into(),
        name: "France".into(),
        currency: "EUR".into(),
        locale: "fr-FR".into(),
        timezone: "Europe/Paris".into(),
        is_eu: true,
        vat: VatPolicy {
            standard_rate: dec!(20),
            reduced_rates: vec![dec!(10), dec!(5.5), dec!(2.1)],
            default_rate: dec!(20),
            rounding: RoundingMode::Total,
            reverse_charge_text: "Autoliquidation — TVA due par le preneur (art. 283-2 du CGI)"
                .into(),
        },
        identifiers: vec![
            IdentifierRule {
                field: "supplier.vat_number".into(),
                pattern: "^FR[0-9A-Z]{2}[0-9]{9}$".into(),
                required: true,
                example: "FR40303265045".into(),
            },
            IdentifierRule {
                field: "supplier.legal_id".into(),
                pattern: "^[0-9]{9}$".into(),
                required: true,
                example: "303265045".into(),
            },
        ],
        transmission: TransmissionPolicy {
            b2b: ChannelPolicy {
                model: TransmissionModel::CentralizedExchange,
                mandatory: true,
                mandatory_from: Some(date(2026, 9, 1)),
            },
            b2g: ChannelPolicy {
                model: TransmissionModel::CentralizedExchange,
                mandatory: true,
                mandatory_from: Some(date(2020, 1, 1)),
            },
            b2c: ChannelPolicy::not_regulated(),
        },
        numbering: NumberingPolicy {
            series_required: false,
            hash_chained: false,
            reset: ResetPeriod::Yearly,
        },
        documents: DocumentPolicy {
            builder: BuilderKind::Regional,
            formats: formats(&[
                (
                    DocumentType::Invoice,
                    &[
                        OutputFormat::Pdf,
                        OutputFormat::FacturX,
                        OutputFormat::Ubl,
                        OutputFormat::Cii,
                    ],
                ),
                (
                    DocumentType::CreditNote,
                    &[OutputFormat::Pdf, OutputFormat::FacturX],
                ),
                (
                    DocumentType::DepositInvoice,
                    &[OutputFormat::Pdf, OutputFormat::FacturX],
                ),
                (DocumentType::Quote, &[OutputFormat::Pdf]),
                (DocumentType::Receipt, &[OutputFormat::Pdf]),
                (DocumentType::Proforma, &[OutputFormat::Pdf]),
            ]),
            default_format: OutputFormat::Pdf,
            issued_editable: false,
            correction_requires_credit_note: true,
        },
        signature: SignaturePolicy { required: false },
        qr: QrPolicy { required: false },
        archiving: ArchivingPolicy { retention_years: 10 },
        peppol: PeppolPolicy {
            enabled: true,
            scheme_id: Some("0009".into()),
        },
        required_fields: required(&[
            (
                DocumentType::Invoice,
                &[
                    "number",
                    "issue_date",
                    "due_date",
                    "supplier.name",
                    "supplier.vat_number",
                    "supplier.legal_id",
                    "customer.name",
                    "lines",
                ],
            ),
            (
                DocumentType::CreditNote,
                &["number", "issue_date", "related_number", "lines"],
            ),
            (DocumentType::Quote, &["number", "issue_date", "valid_until"]),
        ]),
        legal_mentions: vec![
            LegalMention {
                key: "late-payment-penalty".into(),
                text: "En cas de retard de paiement, indemnité forfaitaire pour frais de \
                       recouvrement de 40 € (art. L441-10 du Code de commerce)"
                    .into(),
                condition: None,
            },
            LegalMention {
                key: "no-discount".into(),
                text: "Pas d'escompte pour règlement anticipé".into(),
                condition: None,
            },
            LegalMention {
                key: "reverse-charge".into(),
                text: "Autoliquidation — TVA due par le preneur (art. 283-2 du CGI)".into(),
                condition: Some(MentionCondition::TransactionIs(TransactionFlag::ReverseCharge)),
            },
            LegalMention {
                key: "b2g-portal".into(),
                text: "Facture transmise via le portail public de facturation".into(),
                condition: Some(MentionCondition::Expr("transaction.type == b2g".into())),
            },
        ],
    }
}

pub fn germany() -> CountryConfig {
    CountryConfig {
        code: "DE".into(),
        name: "Germany".into(),
        currency: "EUR".into(),
        locale: "de-DE".into(),
        timezone: "Europe/Berlin".into(),
        is_eu: true,
        vat: VatPolicy {
            standard_rate: dec!(19),
            reduced_rates: vec![dec!(7)],
            default_rate: dec!(19),
            rounding: RoundingMode::Total,
            reverse_charge_text: "Steuerschuldnerschaft des Leistungsempfängers (§13b UStG)".into(),
        },
        identifiers: vec![IdentifierRule {
            field: "supplier.vat_number".into(),
            pattern: "^DE[0-9]{9}$".into(),
            required: true,
            example: "DE123456789".into(),
        }],
        transmission: TransmissionPolicy {
            b2b: ChannelPolicy {
                model: TransmissionModel::PostAudit,
                mandatory: true,
                mandatory_from: Some(date(2025, 1, 1)),
            },
            b2g: ChannelPolicy {
                model: TransmissionModel::Peppol,
                mandatory: true,
                mandatory_from: Some(date(2020, 11, 27)),
            },
            b2c: ChannelPolicy::not_regulated(),
        },
        numbering: NumberingPolicy {
            series_required: false,
            hash_chained: false,
            reset: ResetPeriod::Yearly,
        },
        documents: DocumentPolicy {
            builder: BuilderKind::Regional,
            formats: formats(&[
                (
                    DocumentType::Invoice,
                    &[
                        OutputFormat::Pdf,
                        OutputFormat::Zugferd,
                        OutputFormat::XRechnung,
                        OutputFormat::FacturX,
                        OutputFormat::Ubl,
                        OutputFormat::Cii,
                    ],
                ),
                (
                    DocumentType::CreditNote,
                    &[
                        OutputFormat::Pdf,
                        OutputFormat::Zugferd,
                        OutputFormat::XRechnung,
                    ],
                ),
                (DocumentType::Quote, &[OutputFormat::Pdf]),
                (DocumentType::Receipt, &[OutputFormat::Pdf]),
                (DocumentType::Proforma, &[OutputFormat::Pdf]),
                (
                    DocumentType::DepositInvoice,
                    &[OutputFormat::Pdf, OutputFormat::Zugferd],
                ),
            ]),
            default_format: OutputFormat::Zugferd,
            issued_editable: false,
            correction_requires_credit_note: true,
        },
        signature: SignaturePolicy { required: false },
        qr: QrPolicy { required: false },
        archiving: ArchivingPolicy { retention_years: 10 },
        peppol: PeppolPolicy {
            enabled: true,
            scheme_id: Some("9930".into()),
        },
        required_fields: required(&[
            (
                DocumentType::Invoice,
                &[
                    "number",
                    "issue_date",
                    "supplier.name",
                    "supplier.vat_number",
                    "customer.name",
                    "lines",
                ],
            ),
            (
                DocumentType::CreditNote,
                &["number", "issue_date", "related_number", "lines"],
            ),
        ]),
        legal_mentions: vec![
            LegalMention {
                key: "reverse-charge".into(),
                text: "Steuerschuldnerschaft des Leistungsempfängers (§13b UStG)".into(),
                condition: Some(MentionCondition::TransactionIs(TransactionFlag::ReverseCharge)),
            },
            LegalMention {
                key: "b2g-xrechnung".into(),
                text: "Rechnung an öffentliche Auftraggeber — Übermittlung als XRechnung".into(),
                condition: Some(MentionCondition::CustomerIs(PartyFlag::PublicEntity)),
            },
        ],
    }
}

pub fn italy() -> CountryConfig {
    CountryConfig {
        code: "IT".into(),
        name: "Italy".into(),
        currency: "EUR".into(),
        locale: "it-IT".into(),
        timezone: "Europe/Rome".into(),
        is_eu: true,
        vat: VatPolicy {
            standard_rate: dec!(22),
            reduced_rates: vec![dec!(10), dec!(5), dec!(4)],
            default_rate: dec!(22),
            rounding: RoundingMode::Total,
            reverse_charge_text: "Inversione contabile — art. 17 DPR 633/72".into(),
        },
        identifiers: vec![IdentifierRule {
            field: "supplier.vat_number".into(),
            pattern: "^IT[0-9]{11}$".into(),
            required: true,
            example: "IT12345678901".into(),
        }],
        transmission: TransmissionPolicy {
            b2b: ChannelPolicy {
                model: TransmissionModel::Clearance,
                mandatory: true,
                mandatory_from: Some(date(2019, 1, 1)),
            },
            b2g: ChannelPolicy {
                model: TransmissionModel::Clearance,
                mandatory: true,
                mandatory_from: Some(date(2015, 3, 31)),
            },
            b2c: ChannelPolicy {
                model: TransmissionModel::Clearance,
                mandatory: true,
                mandatory_from: Some(date(2019, 1, 1)),
            },
        },
        numbering: NumberingPolicy {
            series_required: false,
            hash_chained: false,
            reset: ResetPeriod::Yearly,
        },
        documents: DocumentPolicy {
            builder: BuilderKind::Regional,
            formats: formats(&[
                (
                    DocumentType::Invoice,
                    &[OutputFormat::Pdf, OutputFormat::FatturaPa],
                ),
                (
                    DocumentType::CreditNote,
                    &[OutputFormat::Pdf, OutputFormat::FatturaPa],
                ),
                (
                    DocumentType::DepositInvoice,
                    &[OutputFormat::Pdf, OutputFormat::FatturaPa],
                ),
                (DocumentType::Quote, &[OutputFormat::Pdf]),
                (DocumentType::Receipt, &[OutputFormat::Pdf]),
                (DocumentType::Proforma, &[OutputFormat::Pdf]),
            ]),
            default_format: OutputFormat::FatturaPa,
            issued_editable: false,
            correction_requires_credit_note: true,
        },
        signature: SignaturePolicy { required: true },
        qr: QrPolicy { required: false },
        archiving: ArchivingPolicy { retention_years: 10 },
        peppol: PeppolPolicy {
            enabled: true,
            scheme_id: Some("0211".into()),
        },
        required_fields: required(&[
            (
                DocumentType::Invoice,
                &[
                    "number",
                    "issue_date",
                    "supplier.name",
                    "supplier.vat_number",
                    "customer.name",
                    "customer.routing_code",
                    "lines",
                ],
            ),
            (
                DocumentType::CreditNote,
                &["number", "issue_date", "related_number", "lines"],
            ),
        ]),
        legal_mentions: vec![
            LegalMention {
                key: "reverse-charge".into(),
                text: "Inversione contabile — art. 17 DPR 633/72".into(),
                condition: Some(MentionCondition::TransactionIs(TransactionFlag::ReverseCharge)),
            },
            LegalMention {
                key: "split-payment".into(),
                text: "Scissione dei pagamenti — art. 17-ter DPR 633/72".into(),
                condition: Some(MentionCondition::Expr("transaction.type == b2g".into())),
            },
        ],
    }
}

pub fn spain() -> CountryConfig {
    CountryConfig {
        code: "ES".into(),
        name: "Spain".into(),
        currency: "EUR".into(),
        locale: "es-ES".into(),
        timezone: "Europe/Madrid".into(),
        is_eu: true,
        vat: VatPolicy {
            standard_rate: dec!(21),
            reduced_rates: vec![dec!(10), dec!(4)],
            default_rate: dec!(21),
            rounding: RoundingMode::Line,
            reverse_charge_text: "Inversión del sujeto pasivo — art. 84 LIVA".into(),
        },
        identifiers: vec![IdentifierRule {
            field: "supplier.vat_number".into(),
            pattern: "^ES[A-Z0-9][0-9]{7}[A-Z0-9]$".into(),
            required: true,
            example: "ESB12345674".into(),
        }],
        transmission: TransmissionPolicy {
            b2b: ChannelPolicy {
                model: TransmissionModel::PostAudit,
                mandatory: false,
                mandatory_from: None,
            },
            b2g: ChannelPolicy {
                model: TransmissionModel::CentralizedExchange,
                mandatory: true,
                mandatory_from: Some(date(2015, 1, 15)),
            },
            b2c: ChannelPolicy::not_regulated(),
        },
        numbering: NumberingPolicy {
            series_required: true,
            hash_chained: false,
            reset: ResetPeriod::Yearly,
        },
        documents: DocumentPolicy {
            builder: BuilderKind::Generic,
            formats: HashMap::new(),
            default_format: OutputFormat::Pdf,
            issued_editable: false,
            correction_requires_credit_note: true,
        },
        signature: SignaturePolicy { required: false },
        qr: QrPolicy { required: false },
        archiving: ArchivingPolicy { retention_years: 6 },
        peppol: PeppolPolicy {
            enabled: false,
            scheme_id: None,
        },
        required_fields: required(&[(
            DocumentType::Invoice,
            &[
                "number",
                "issue_date",
                "supplier.name",
                "supplier.vat_number",
                "customer.name",
                "lines",
            ],
        )]),
        legal_mentions: vec![LegalMention {
            key: "reverse-charge".into(),
            text: "Inversión del sujeto pasivo — art. 84 LIVA".into(),
            condition: Some(MentionCondition::TransactionIs(TransactionFlag::ReverseCharge)),
        }],
    }
}

pub fn portugal() -> CountryConfig {
    CountryConfig {
        code: "PT".into(),
        name: "Portugal".into(),
        currency: "EUR".into(),
        locale: "pt-PT".into(),
        timezone: "Europe/Lisbon".into(),
        is_eu: true,
        vat: VatPolicy {
            standard_rate: dec!(23),
            reduced_rates: vec![dec!(13), dec!(6)],
            default_rate: dec!(23),
            rounding: RoundingMode::Line,
            reverse_charge_text: "Autoliquidação — art. 2.º do CIVA".into(),
        },
        identifiers: vec![IdentifierRule {
            field: "supplier.vat_number".into(),
            pattern: "^PT[0-9]{9}$".into(),
            required: true,
            example: "PT501964843".into(),
        }],
        transmission: TransmissionPolicy {
            b2b: ChannelPolicy::not_regulated(),
            b2g: ChannelPolicy {
                model: TransmissionModel::CentralizedExchange,
                mandatory: true,
                mandatory_from: Some(date(2021, 1, 1)),
            },
            b2c: ChannelPolicy::not_regulated(),
        },
        // Certified software rules: declared series, tamper-evident chaining.
        numbering: NumberingPolicy {
            series_required: true,
            hash_chained: true,
            reset: ResetPeriod::Yearly,
        },
        documents: DocumentPolicy {
            builder: BuilderKind::Generic,
            formats: HashMap::new(),
            default_format: OutputFormat::Pdf,
            issued_editable: false,
            correction_requires_credit_note: true,
        },
        signature: SignaturePolicy { required: true },
        qr: QrPolicy { required: true },
        archiving: ArchivingPolicy { retention_years: 10 },
        peppol: PeppolPolicy {
            enabled: false,
            scheme_id: None,
        },
        required_fields: required(&[(
            DocumentType::Invoice,
            &[
                "number",
                "issue_date",
                "supplier.name",
                "supplier.vat_number",
                "customer.name",
                "lines",
            ],
        )]),
        legal_mentions: vec![LegalMention {
            key: "reverse-charge".into(),
            text: "Autoliquidação — art. 2.º do CIVA".into(),
            condition: Some(MentionCondition::TransactionIs(TransactionFlag::ReverseCharge)),
        }],
    }
}

pub fn belgium() -> CountryConfig {
    CountryConfig {
        code: "BE".into(),
        name: "Belgium".into(),
        currency: "EUR".into(),
        locale: "nl-BE".into(),
        timezone: "Europe/Brussels".into(),
        is_eu: true,
        vat: VatPolicy {
            standard_rate: dec!(21),
            reduced_rates: vec![dec!(12), dec!(6)],
            default_rate: dec!(21),
            rounding: RoundingMode::Total,
            reverse_charge_text: "Btw verlegd — art. 51 §2 WBTW".into(),
        },
        identifiers: vec![IdentifierRule {
            field: "supplier.vat_number".into(),
            pattern: "^BE0[0-9]{9}$".into(),
            required: true,
            example: "BE0123456749".into(),
        }],
        transmission: TransmissionPolicy {
            b2b: ChannelPolicy {
                model: TransmissionModel::Peppol,
                mandatory: true,
                mandatory_from: Some(date(2026, 1, 1)),
            },
            b2g: ChannelPolicy {
                model: TransmissionModel::Peppol,
                mandatory: true,
                mandatory_from: Some(date(2023, 3, 1)),
            },
            b2c: ChannelPolicy::not_regulated(),
        },
        numbering: NumberingPolicy {
            series_required: false,
            hash_chained: false,
            reset: ResetPeriod::Yearly,
        },
        documents: DocumentPolicy {
            builder: BuilderKind::Regional,
            formats: formats(&[
                (
                    DocumentType::Invoice,
                    &[OutputFormat::Pdf, OutputFormat::Ubl],
                ),
                (
                    DocumentType::CreditNote,
                    &[OutputFormat::Pdf, OutputFormat::Ubl],
                ),
            ]),
            default_format: OutputFormat::Pdf,
            issued_editable: false,
            correction_requires_credit_note: true,
        },
        signature: SignaturePolicy { required: false },
        qr: QrPolicy { required: false },
        archiving: ArchivingPolicy { retention_years: 7 },
        peppol: PeppolPolicy {
            enabled: true,
            scheme_id: Some("0208".into()),
        },
        required_fields: required(&[(
            DocumentType::Invoice,
            &[
                "number",
                "issue_date",
                "supplier.name",
                "supplier.vat_number",
                "customer.name",
                "lines",
            ],
        )]),
        legal_mentions: vec![LegalMention {
            key: "reverse-charge".into(),
            text: "Btw verlegd — art. 51 §2 WBTW".into(),
            condition: Some(MentionCondition::TransactionIs(TransactionFlag::ReverseCharge)),
        }],
    }
}

pub fn netherlands() -> CountryConfig {
    CountryConfig {
        code: "NL".into(),
        name: "Netherlands".into(),
        currency: "EUR".into(),
        locale: "nl-NL".into(),
        timezone: "Europe/Amsterdam".into(),
        is_eu: true,
        vat: VatPolicy {
            standard_rate: dec!(21),
            reduced_rates: vec![dec!(9)],
            default_rate: dec!(21),
            rounding: RoundingMode::Total,
            reverse_charge_text: "Btw verlegd — art. 12 Wet OB 1968".into(),
        },
        identifiers: vec![IdentifierRule {
            field: "supplier.vat_number".into(),
            pattern: "^NL[0-9]{9}B[0-9]{2}$".into(),
            required: true,
            example: "NL123456789B01".into(),
        }],
        transmission: TransmissionPolicy {
            b2b: ChannelPolicy::not_regulated(),
            b2g: ChannelPolicy {
                model: TransmissionModel::Peppol,
                mandatory: true,
                mandatory_from: Some(date(2017, 1, 1)),
            },
            b2c: ChannelPolicy::not_regulated(),
        },
        numbering: NumberingPolicy {
            series_required: false,
            hash_chained: false,
            reset: ResetPeriod::Never,
        },
        documents: DocumentPolicy {
            builder: BuilderKind::Regional,
            formats: formats(&[
                (
                    DocumentType::Invoice,
                    &[OutputFormat::Pdf, OutputFormat::Ubl],
                ),
                (
                    DocumentType::CreditNote,
                    &[OutputFormat::Pdf, OutputFormat::Ubl],
                ),
            ]),
            default_format: OutputFormat::Pdf,
            issued_editable: false,
            correction_requires_credit_note: true,
        },
        signature: SignaturePolicy { required: false },
        qr: QrPolicy { required: false },
        archiving: ArchivingPolicy { retention_years: 7 },
        peppol: PeppolPolicy {
            enabled: true,
            scheme_id: Some("0106".into()),
        },
        required_fields: required(&[(
            DocumentType::Invoice,
            &[
                "number",
                "issue_date",
                "supplier.name",
                "supplier.vat_number",
                "customer.name",
                "lines",
            ],
        )]),
        legal_mentions: vec![LegalMention {
            key: "reverse-charge".into(),
            text: "Btw verlegd — art. 12 Wet OB 1968".into(),
            condition: Some(MentionCondition::TransactionIs(TransactionFlag::ReverseCharge)),
        }],
    }
}

pub fn austria() -> CountryConfig {
    CountryConfig {
        code: "AT".into(),
        name: "Austria".into(),
        currency: "EUR".into(),
        locale: "de-AT".into(),
        timezone: "Europe/Vienna".into(),
        is_eu: true,
        vat: VatPolicy {
            standard_rate: dec!(20),
            reduced_rates: vec![dec!(13), dec!(10)],
            default_rate: dec!(20),
            rounding: RoundingMode::Total,
            reverse_charge_text: "Übergang der Steuerschuld (§19 UStG)".into(),
        },
        identifiers: vec![IdentifierRule {
            field: "supplier.vat_number".into(),
            pattern: "^ATU[0-9]{8}$".into(),
            required: true,
            example: "ATU12345675".into(),
        }],
        transmission: TransmissionPolicy {
            b2b: ChannelPolicy::not_regulated(),
            b2g: ChannelPolicy {
                model: TransmissionModel::CentralizedExchange,
                mandatory: true,
                mandatory_from: Some(date(2014, 1, 1)),
            },
            b2c: ChannelPolicy::not_regulated(),
        },
        numbering: NumberingPolicy {
            series_required: false,
            hash_chained: false,
            reset: ResetPeriod::Yearly,
        },
        documents: DocumentPolicy {
            builder: BuilderKind::Generic,
            formats: HashMap::new(),
            default_format: OutputFormat::Pdf,
            issued_editable: false,
            correction_requires_credit_note: true,
        },
        signature: SignaturePolicy { required: false },
        qr: QrPolicy { required: false },
        archiving: ArchivingPolicy { retention_years: 7 },
        peppol: PeppolPolicy {
            enabled: true,
            scheme_id: Some("9915".into()),
        },
        required_fields: required(&[(
            DocumentType::Invoice,
            &[
                "number",
                "issue_date",
                "supplier.name",
                "supplier.vat_number",
                "customer.name",
                "lines",
            ],
        )]),
        legal_mentions: vec![LegalMention {
            key: "reverse-charge".into(),
            text: "Übergang der Steuerschuld (§19 UStG)".into(),
            condition: Some(MentionCondition::TransactionIs(TransactionFlag::ReverseCharge)),
        }],
    }
}

pub fn poland() -> CountryConfig {
    CountryConfig {
        code: "PL".into(),
        name: "Poland".into(),
        currency: "PLN".into(),
        locale: "pl-PL".into(),
        timezone: "Europe/Warsaw".into(),
        is_eu: true,
        vat: VatPolicy {
            standard_rate: dec!(23),
            reduced_rates: vec![dec!(8), dec!(5)],
            default_rate: dec!(23),
            rounding: RoundingMode::Total,
            reverse_charge_text: "Odwrotne obciążenie — art. 17 ustawy o VAT".into(),
        },
        identifiers: vec![IdentifierRule {
            field: "supplier.vat_number".into(),
            pattern: "^PL[0-9]{10}$".into(),
            required: true,
            example: "PL5260250995".into(),
        }],
        transmission: TransmissionPolicy {
            b2b: ChannelPolicy {
                model: TransmissionModel::Clearance,
                mandatory: true,
                mandatory_from: Some(date(2026, 2, 1)),
            },
            b2g: ChannelPolicy {
                model: TransmissionModel::Peppol,
                mandatory: true,
                mandatory_from: Some(date(2019, 4, 18)),
            },
            b2c: ChannelPolicy::not_regulated(),
        },
        numbering: NumberingPolicy {
            series_required: false,
            hash_chained: false,
            reset: ResetPeriod::Yearly,
        },
        documents: DocumentPolicy {
            builder: BuilderKind::Regional,
            formats: formats(&[
                (
                    DocumentType::Invoice,
                    &[OutputFormat::Pdf, OutputFormat::Ksef, OutputFormat::KsefFa3],
                ),
                (
                    DocumentType::CreditNote,
                    &[OutputFormat::Pdf, OutputFormat::Ksef, OutputFormat::KsefFa3],
                ),
                (
                    DocumentType::CorrectiveInvoice,
                    &[OutputFormat::Pdf, OutputFormat::Ksef, OutputFormat::KsefFa3],
                ),
            ]),
            default_format: OutputFormat::Ksef,
            issued_editable: false,
            // Polish practice amends with a faktura korygująca instead.
            correction_requires_credit_note: false,
        },
        signature: SignaturePolicy { required: false },
        qr: QrPolicy { required: false },
        archiving: ArchivingPolicy { retention_years: 5 },
        peppol: PeppolPolicy {
            enabled: true,
            scheme_id: Some("9945".into()),
        },
        required_fields: required(&[
            (
                DocumentType::Invoice,
                &[
                    "number",
                    "issue_date",
                    "supplier.name",
                    "supplier.vat_number",
                    "customer.name",
                    "lines",
                ],
            ),
            (
                DocumentType::CorrectiveInvoice,
                &[
                    "number",
                    "issue_date",
                    "related_number",
                    "correction_reason",
                    "lines",
                ],
            ),
        ]),
        legal_mentions: vec![LegalMention {
            key: "reverse-charge".into(),
            text: "Odwrotne obciążenie — art. 17 ustawy o VAT".into(),
            condition: Some(MentionCondition::TransactionIs(TransactionFlag::ReverseCharge)),
        }],
    }
}

pub fn luxembourg() -> CountryConfig {
    CountryConfig {
        code: "LU".into(),
        name: "Luxembourg".into(),
        currency: "EUR".into(),
        locale: "fr-LU".into(),
        timezone: "Europe/Luxembourg".into(),
        is_eu: true,
        vat: VatPolicy {
            standard_rate: dec!(17),
            reduced_rates: vec![dec!(14), dec!(8), dec!(3)],
            default_rate: dec!(17),
            rounding: RoundingMode::Total,
            reverse_charge_text: "Autoliquidation — art. 61 de la loi TVA".into(),
        },
        identifiers: vec![IdentifierRule {
            field: "supplier.vat_number".into(),
            pattern: "^LU[0-9]{8}$".into(),
            required: true,
            example: "LU12345613".into(),
        }],
        transmission: TransmissionPolicy {
            b2b: ChannelPolicy::not_regulated(),
            b2g: ChannelPolicy {
                model: TransmissionModel::Peppol,
                mandatory: true,
                mandatory_from: Some(date(2023, 3, 18)),
            },
            b2c: ChannelPolicy::not_regulated(),
        },
        numbering: NumberingPolicy {
            series_required: false,
            hash_chained: false,
            reset: ResetPeriod::Never,
        },
        documents: DocumentPolicy {
            builder: BuilderKind::Generic,
            formats: HashMap::new(),
            default_format: OutputFormat::Pdf,
            issued_editable: false,
            correction_requires_credit_note: true,
        },
        signature: SignaturePolicy { required: false },
        qr: QrPolicy { required: false },
        archiving: ArchivingPolicy { retention_years: 10 },
        peppol: PeppolPolicy {
            enabled: true,
            scheme_id: Some("9938".into()),
        },
        required_fields: required(&[(
            DocumentType::Invoice,
            &[
                "number",
                "issue_date",
                "supplier.name",
                "supplier.vat_number",
                "customer.name",
                "lines",
            ],
        )]),
        legal_mentions: vec![],
    }
}
