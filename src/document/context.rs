//! Deterministic template-context assembly.
//!
//! Turns the canonical document into the strings a renderer prints: dates
//! formatted per locale, money formatted to 2 decimals with the currency
//! symbol, per-line totals computed with the same arithmetic as the VAT
//! engine, and the document-type-specific extra fields.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{DocumentData, DocumentType, currencies};
use crate::formats::xml::round2;

/// Style and label configuration for rendered documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// BCP 47 locale driving labels and date format ("fr-FR", "de", ...).
    pub locale: String,
    /// strftime pattern overriding the locale default.
    pub date_format: Option<String>,
}

impl StyleConfig {
    pub fn for_locale(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            date_format: None,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::for_locale("en")
    }
}

/// Printable labels for one locale.
#[derive(Debug, Clone)]
pub struct Labels {
    pub issue_date: &'static str,
    pub due_date: &'static str,
    pub valid_until: &'static str,
    pub payment_date: &'static str,
    pub refers_to: &'static str,
    pub correction_reason: &'static str,
    pub supplier: &'static str,
    pub customer: &'static str,
    pub description: &'static str,
    pub quantity: &'static str,
    pub unit_price: &'static str,
    pub vat: &'static str,
    pub line_total: &'static str,
    pub total_net: &'static str,
    pub total_vat: &'static str,
    pub total_gross: &'static str,
    pub payment: &'static str,
}

impl Labels {
    /// Labels for a locale; the language subtag decides, unknown languages
    /// fall back to English.
    pub fn for_locale(locale: &str) -> Self {
        let lang = locale
            .split(['-', '_'])
            .next()
            .unwrap_or("en")
            .to_lowercase();
        match lang.as_str() {
            "fr" => Self {
                issue_date: "Date d'émission",
                due_date: "Date d'échéance",
                valid_until: "Valable jusqu'au",
                payment_date: "Date de paiement",
                refers_to: "Référence",
                correction_reason: "Motif de correction",
                supplier: "Émetteur",
                customer: "Client",
                description: "Désignation",
                quantity: "Qté",
                unit_price: "PU HT",
                vat: "TVA",
                line_total: "Total HT",
                total_net: "Total HT",
                total_vat: "Total TVA",
                total_gross: "Total TTC",
                payment: "Paiement",
            },
            "de" => Self {
                issue_date: "Rechnungsdatum",
                due_date: "Fällig am",
                valid_until: "Gültig bis",
                payment_date: "Zahlungsdatum",
                refers_to: "Referenz",
                correction_reason: "Korrekturgrund",
                supplier: "Aussteller",
                customer: "Kunde",
                description: "Bezeichnung",
                quantity: "Menge",
                unit_price: "Einzelpreis",
                vat: "USt.",
                line_total: "Netto",
                total_net: "Nettobetrag",
                total_vat: "Umsatzsteuer",
                total_gross: "Bruttobetrag",
                payment: "Zahlung",
            },
            "it" => Self {
                issue_date: "Data di emissione",
                due_date: "Scadenza",
                valid_until: "Valido fino al",
                payment_date: "Data di pagamento",
                refers_to: "Riferimento",
                correction_reason: "Motivo della rettifica",
                supplier: "Fornitore",
                customer: "Cliente",
                description: "Descrizione",
                quantity: "Qtà",
                unit_price: "Prezzo unitario",
                vat: "IVA",
                line_total: "Imponibile",
                total_net: "Totale imponibile",
                total_vat: "Totale IVA",
                total_gross: "Totale documento",
                payment: "Pagamento",
            },
            "pl" => Self {
                issue_date: "Data wystawienia",
                due_date: "Termin płatności",
                valid_until: "Ważne do",
                payment_date: "Data zapłaty",
                refers_to: "Dotyczy",
                correction_reason: "Przyczyna korekty",
                supplier: "Sprzedawca",
                customer: "Nabywca",
                description: "Nazwa",
                quantity: "Ilość",
                unit_price: "Cena netto",
                vat: "VAT",
                line_total: "Wartość netto",
                total_net: "Razem netto",
                total_vat: "Razem VAT",
                total_gross: "Razem brutto",
                payment: "Płatność",
            },
            _ => Self {
                issue_date: "Issue date",
                due_date: "Due date",
                valid_until: "Valid until",
                payment_date: "Payment date",
                refers_to: "Refers to",
                correction_reason: "Correction reason",
                supplier: "Supplier",
                customer: "Customer",
                description: "Description",
                quantity: "Qty",
                unit_price: "Unit price",
                vat: "VAT",
                line_total: "Net total",
                total_net: "Total (net)",
                total_vat: "Total VAT",
                total_gross: "Total (gross)",
                payment: "Payment",
            },
        }
    }

    /// Document title in this locale's language.
    pub fn title(&self, doc_type: DocumentType) -> &'static str {
        // Titles keyed off the supplier label language
        match (self.supplier, doc_type) {
            ("Émetteur", DocumentType::Invoice) => "FACTURE",
            ("Émetteur", DocumentType::Quote) => "DEVIS",
            ("Émetteur", DocumentType::Receipt) => "REÇU",
            ("Émetteur", DocumentType::CreditNote) => "AVOIR",
            ("Émetteur", DocumentType::Proforma) => "FACTURE PROFORMA",
            ("Émetteur", DocumentType::CorrectiveInvoice) => "FACTURE RECTIFICATIVE",
            ("Émetteur", DocumentType::DepositInvoice) => "FACTURE D'ACOMPTE",
            ("Aussteller", DocumentType::Invoice) => "RECHNUNG",
            ("Aussteller", DocumentType::Quote) => "ANGEBOT",
            ("Aussteller", DocumentType::Receipt) => "QUITTUNG",
            ("Aussteller", DocumentType::CreditNote) => "GUTSCHRIFT",
            ("Aussteller", DocumentType::Proforma) => "PROFORMA-RECHNUNG",
            ("Aussteller", DocumentType::CorrectiveInvoice) => "RECHNUNGSKORREKTUR",
            ("Aussteller", DocumentType::DepositInvoice) => "ANZAHLUNGSRECHNUNG",
            ("Fornitore", DocumentType::Invoice) => "FATTURA",
            ("Fornitore", DocumentType::Quote) => "PREVENTIVO",
            ("Fornitore", DocumentType::Receipt) => "RICEVUTA",
            ("Fornitore", DocumentType::CreditNote) => "NOTA DI CREDITO",
            ("Fornitore", DocumentType::Proforma) => "FATTURA PROFORMA",
            ("Fornitore", DocumentType::CorrectiveInvoice) => "FATTURA RETTIFICATIVA",
            ("Fornitore", DocumentType::DepositInvoice) => "FATTURA DI ACCONTO",
            ("Sprzedawca", DocumentType::Invoice) => "FAKTURA",
            ("Sprzedawca", DocumentType::Quote) => "OFERTA",
            ("Sprzedawca", DocumentType::Receipt) => "POKWITOWANIE",
            ("Sprzedawca", DocumentType::CreditNote) => "FAKTURA KORYGUJĄCA",
            ("Sprzedawca", DocumentType::Proforma) => "FAKTURA PROFORMA",
            ("Sprzedawca", DocumentType::CorrectiveInvoice) => "FAKTURA KORYGUJĄCA",
            ("Sprzedawca", DocumentType::DepositInvoice) => "FAKTURA ZALICZKOWA",
            (_, DocumentType::Invoice) => "INVOICE",
            (_, DocumentType::Quote) => "QUOTE",
            (_, DocumentType::Receipt) => "RECEIPT",
            (_, DocumentType::CreditNote) => "CREDIT NOTE",
            (_, DocumentType::Proforma) => "PROFORMA INVOICE",
            (_, DocumentType::CorrectiveInvoice) => "CORRECTIVE INVOICE",
            (_, DocumentType::DepositInvoice) => "DEPOSIT INVOICE",
        }
    }
}

/// Default strftime pattern for a locale.
fn default_date_format(locale: &str) -> &'static str {
    let lang = locale
        .split(['-', '_'])
        .next()
        .unwrap_or("en")
        .to_lowercase();
    match lang.as_str() {
        "fr" | "it" => "%d/%m/%Y",
        "de" | "pl" => "%d.%m.%Y",
        _ => "%Y-%m-%d",
    }
}

/// Format a date per the style.
pub fn format_date(date: NaiveDate, style: &StyleConfig) -> String {
    let pattern = style
        .date_format
        .as_deref()
        .unwrap_or_else(|| default_date_format(&style.locale));
    date.format(pattern).to_string()
}

/// Format an amount to 2 decimals with the currency symbol.
pub fn format_money(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {}", round2(amount), currencies::currency_symbol(currency))
}

/// One formatted line row.
#[derive(Debug, Clone)]
pub struct LineRow {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub vat_rate: String,
    pub total: String,
}

/// Fully formatted template context, ready for rasterization.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub title: String,
    pub number: String,
    /// (label, value) header fields in display order.
    pub header_fields: Vec<(String, String)>,
    pub supplier_label: String,
    pub supplier_block: Vec<String>,
    pub customer_label: String,
    pub customer_block: Vec<String>,
    pub column_headers: (String, String, String, String, String),
    pub lines: Vec<LineRow>,
    /// (label, value) totals rows in display order.
    pub totals_rows: Vec<(String, String)>,
    pub payment: Option<String>,
    pub notes: Vec<String>,
    pub legal_mentions: Vec<String>,
}

/// Assemble the render context for a document. Deterministic: same data and
/// style always produce the same context.
pub fn assemble_context(data: &DocumentData, style: &StyleConfig) -> RenderContext {
    let labels = Labels::for_locale(&style.locale);
    let currency = data.currency.as_str();

    let mut header_fields = vec![(
        labels.issue_date.to_string(),
        format_date(data.issue_date, style),
    )];

    // Type-specific extras
    match data.doc_type {
        DocumentType::Invoice | DocumentType::DepositInvoice | DocumentType::Proforma => {
            if let Some(due) = data.due_date {
                header_fields.push((labels.due_date.to_string(), format_date(due, style)));
            }
        }
        DocumentType::Quote => {
            if let Some(until) = data.valid_until {
                header_fields.push((labels.valid_until.to_string(), format_date(until, style)));
            }
        }
        DocumentType::Receipt => {
            if let Some(paid) = data.payment_date {
                header_fields.push((labels.payment_date.to_string(), format_date(paid, style)));
            }
            if let Some(related) = &data.related_number {
                header_fields.push((labels.refers_to.to_string(), related.clone()));
            }
        }
        DocumentType::CreditNote | DocumentType::CorrectiveInvoice => {
            if let Some(related) = &data.related_number {
                header_fields.push((labels.refers_to.to_string(), related.clone()));
            }
            if let Some(reason) = &data.correction_reason {
                header_fields.push((labels.correction_reason.to_string(), reason.clone()));
            }
        }
    }

    let lines = data
        .lines
        .iter()
        .map(|line| LineRow {
            description: line.description.clone(),
            quantity: format!("{}", line.quantity.normalize()),
            unit_price: format_money(line.unit_price, currency),
            vat_rate: format!("{}%", line.vat_rate.normalize()),
            // Same formula and rounding as the VAT engine's line mode
            total: format_money(round2(line.net_amount()), currency),
        })
        .collect();

    let mut totals_rows = Vec::new();
    if let Some(totals) = &data.totals {
        totals_rows.push((
            labels.total_net.to_string(),
            format_money(totals.total_net, currency),
        ));
        for entry in &totals.breakdown {
            totals_rows.push((
                format!("{} {}%", labels.vat, entry.rate.normalize()),
                format_money(entry.vat_amount, currency),
            ));
        }
        totals_rows.push((
            labels.total_vat.to_string(),
            format_money(totals.total_vat, currency),
        ));
        totals_rows.push((
            labels.total_gross.to_string(),
            format_money(totals.total_gross, currency),
        ));
    }

    let mut legal_mentions = data.legal_mentions.clone();
    if let Some(totals) = &data.totals {
        if let Some(text) = &totals.reverse_charge_text {
            if !legal_mentions.contains(text) {
                legal_mentions.push(text.clone());
            }
        }
    }

    RenderContext {
        title: labels.title(data.doc_type).to_string(),
        number: data.number.clone(),
        header_fields,
        supplier_label: labels.supplier.to_string(),
        supplier_block: party_block(&data.supplier),
        customer_label: labels.customer.to_string(),
        customer_block: party_block(&data.customer),
        column_headers: (
            labels.description.to_string(),
            labels.quantity.to_string(),
            labels.unit_price.to_string(),
            labels.vat.to_string(),
            labels.line_total.to_string(),
        ),
        lines,
        totals_rows,
        payment: data.payment.as_ref().map(|p| {
            let mut s = format!("{}: {}", labels.payment, p.label);
            if let Some(iban) = &p.iban {
                s.push_str(&format!(" — IBAN {iban}"));
            }
            s
        }),
        notes: data.notes.clone(),
        legal_mentions,
    }
}

fn party_block(party: &crate::core::Party) -> Vec<String> {
    let mut block = vec![party.name.clone()];
    if let Some(street) = &party.street {
        block.push(street.clone());
    }
    block.push(format!(
        "{} {} ({})",
        party.postal_code, party.city, party.country_code
    ));
    if let Some(vat) = &party.vat_number {
        block.push(format!("VAT: {vat}"));
    }
    if let Some(legal_id) = &party.legal_id {
        block.push(format!("Reg: {legal_id}"));
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DocumentDataBuilder, LineItemBuilder, PartyBuilder};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn doc(doc_type: DocumentType) -> DocumentData {
        DocumentDataBuilder::new(doc_type, "FA-2025-001", date(2025, 3, 10))
            .due_date(date(2025, 4, 10))
            .valid_until(date(2025, 5, 1))
            .payment_date(date(2025, 3, 20))
            .related_number("FA-2024-118")
            .correction_reason("Pricing error")
            .supplier(
                PartyBuilder::new("ACME SARL", "Paris", "75002", "FR")
                    .vat_number("FR40123456824")
                    .company(true)
                    .build(),
            )
            .customer(PartyBuilder::new("Client SA", "Lyon", "69001", "FR").build())
            .add_line(
                LineItemBuilder::new("Widget", dec!(2), dec!(10.50))
                    .vat_rate(dec!(20))
                    .build(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn french_locale_formats() {
        let style = StyleConfig::for_locale("fr-FR");
        let ctx = assemble_context(&doc(DocumentType::Invoice), &style);
        assert_eq!(ctx.title, "FACTURE");
        assert!(ctx
            .header_fields
            .iter()
            .any(|(label, value)| label == "Date d'émission" && value == "10/03/2025"));
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(dec!(1234.5), "EUR"), "1234.50 €");
        assert_eq!(format_money(dec!(0), "PLN"), "0.00 zł");
    }

    #[test]
    fn line_totals_use_engine_formula() {
        let style = StyleConfig::default();
        let ctx = assemble_context(&doc(DocumentType::Invoice), &style);
        assert_eq!(ctx.lines[0].total, "21.00 €");
        assert_eq!(ctx.lines[0].vat_rate, "20%");
    }

    #[test]
    fn quote_shows_validity_not_due_date() {
        let style = StyleConfig::default();
        let ctx = assemble_context(&doc(DocumentType::Quote), &style);
        assert!(ctx.header_fields.iter().any(|(l, _)| l == "Valid until"));
        assert!(!ctx.header_fields.iter().any(|(l, _)| l == "Due date"));
    }

    #[test]
    fn credit_note_carries_reference_and_reason() {
        let style = StyleConfig::default();
        let ctx = assemble_context(&doc(DocumentType::CreditNote), &style);
        assert!(ctx
            .header_fields
            .iter()
            .any(|(l, v)| l == "Refers to" && v == "FA-2024-118"));
        assert!(ctx
            .header_fields
            .iter()
            .any(|(l, v)| l == "Correction reason" && v == "Pricing error"));
    }

    #[test]
    fn receipt_carries_payment_date() {
        let style = StyleConfig::default();
        let ctx = assemble_context(&doc(DocumentType::Receipt), &style);
        assert!(ctx.header_fields.iter().any(|(l, _)| l == "Payment date"));
    }

    #[test]
    fn assembly_is_deterministic() {
        let style = StyleConfig::for_locale("de");
        let d = doc(DocumentType::Invoice);
        let a = assemble_context(&d, &style);
        let b = assemble_context(&d, &style);
        assert_eq!(a.title, b.title);
        assert_eq!(a.header_fields, b.header_fields);
        assert_eq!(a.totals_rows, b.totals_rows);
    }
}
