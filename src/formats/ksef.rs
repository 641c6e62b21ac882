//! Polish KSeF FA(2)/FA(3) invoice generation.
//!
//! One generator covers both schema variants; the variant is picked by the
//! requested format token (`ksef` → FA(2), `ksef-fa3` → FA(3)). Both carry
//! the same canonical amounts — only the schema envelope differs.

use rust_decimal::Decimal;

use super::xml::{XmlWriter, format_decimal, round2};
use super::{FormatConfig, FormatGenerator, FormatResult};
use crate::core::{DocumentData, DocumentType, EngineError, OutputFormat, Party, XmlSyntax};

/// FA(2) schema namespace (in force since 2023-09-01).
pub const FA2_NS: &str = "http://crd.gov.pl/wzor/2023/06/29/12648/";
/// FA(3) schema namespace.
pub const FA3_NS: &str = "http://crd.gov.pl/wzor/2025/06/25/13775/";

struct Variant {
    ns: &'static str,
    kod_systemowy: &'static str,
    wariant: &'static str,
    syntax: XmlSyntax,
}

const FA2: Variant = Variant {
    ns: FA2_NS,
    kod_systemowy: "FA (2)",
    wariant: "2",
    syntax: XmlSyntax::KsefFa2,
};

const FA3: Variant = Variant {
    ns: FA3_NS,
    kod_systemowy: "FA (3)",
    wariant: "3",
    syntax: XmlSyntax::KsefFa3,
};

/// Generator for the KSeF FA syntaxes.
pub struct KsefGenerator;

impl FormatGenerator for KsefGenerator {
    fn name(&self) -> &'static str {
        "ksef"
    }

    fn supports(&self, format: OutputFormat) -> bool {
        matches!(format, OutputFormat::Ksef | OutputFormat::KsefFa3)
    }

    fn generate(&self, data: &DocumentData, config: &FormatConfig) -> FormatResult {
        let Some(rodzaj) = rodzaj_faktury(data.doc_type) else {
            return FormatResult::fail(format!(
                "KSeF has no RodzajFaktury for document type '{}'",
                data.doc_type.as_str()
            ));
        };
        let variant = if config.format == OutputFormat::KsefFa3 {
            &FA3
        } else {
            &FA2
        };
        match to_ksef_xml(data, variant, rodzaj) {
            Ok(xml) => FormatResult::ok(variant.syntax, xml),
            Err(e) => FormatResult::fail(e.to_string()),
        }
    }
}

/// KSeF invoice kind, where one exists.
fn rodzaj_faktury(doc_type: DocumentType) -> Option<&'static str> {
    match doc_type {
        DocumentType::Invoice => Some("VAT"),
        DocumentType::CreditNote | DocumentType::CorrectiveInvoice => Some("KOR"),
        DocumentType::DepositInvoice => Some("ZAL"),
        DocumentType::Quote | DocumentType::Receipt | DocumentType::Proforma => None,
    }
}

/// P_12 rate marker: "oo" for reverse charge, otherwise the bare rate.
fn p12_marker(rate: Decimal, reverse_charge: bool) -> String {
    if reverse_charge {
        "oo".to_string()
    } else {
        rate.normalize().to_string()
    }
}

/// Strip the country prefix from a Polish VAT number to get the bare NIP.
fn nip_of(party: &Party) -> Option<String> {
    party.vat_number.as_ref().map(|v| {
        let trimmed = v.trim();
        if trimmed.len() > 2 && trimmed[..2].eq_ignore_ascii_case("PL") {
            trimmed[2..].to_string()
        } else {
            trimmed.to_string()
        }
    })
}

fn to_ksef_xml(
    data: &DocumentData,
    variant: &Variant,
    rodzaj: &str,
) -> Result<String, EngineError> {
    let totals = data.totals.as_ref().ok_or_else(|| {
        EngineError::Builder("totals must be calculated before XML generation".into())
    })?;
    let supplier_nip = nip_of(&data.supplier).ok_or_else(|| {
        EngineError::Validation("KSeF requires the supplier NIP (VAT number)".into())
    })?;

    let mut w = XmlWriter::new()?;
    w.start_element_with_attrs("Faktura", &[("xmlns", variant.ns)])?;

    w.start_element("Naglowek")?;
    w.text_element_with_attrs(
        "KodFormularza",
        "FA",
        &[
            ("kodSystemowy", variant.kod_systemowy),
            ("wersjaSchemy", "1-0E"),
        ],
    )?;
    w.text_element("WariantFormularza", variant.wariant)?;
    // Deterministic: derived from the issue date, not the wall clock.
    w.text_element(
        "DataWytworzeniaFa",
        &format!("{}T00:00:00Z", data.issue_date),
    )?;
    w.text_element("SystemInfo", "efactura")?;
    w.end_element("Naglowek")?;

    write_podmiot(&mut w, &data.supplier, "Podmiot1", Some(supplier_nip.as_str()))?;
    write_podmiot(&mut w, &data.customer, "Podmiot2", nip_of(&data.customer).as_deref())?;

    w.start_element("Fa")?;
    w.text_element("KodWaluty", &data.currency)?;
    w.text_element("P_1", &data.issue_date.to_string())?;
    w.text_element("P_2", &data.number)?;

    // Per-rate aggregates. Slot n carries the n-th breakdown entry,
    // highest rate first, reusing the engine's amounts verbatim.
    let mut entries: Vec<_> = totals.breakdown.iter().collect();
    entries.sort_by(|a, b| b.rate.cmp(&a.rate));
    for (i, entry) in entries.iter().enumerate() {
        let slot = i + 1;
        w.text_element(
            &format!("P_13_{slot}"),
            &format_decimal(entry.base_amount),
        )?;
        w.text_element(&format!("P_14_{slot}"), &format_decimal(entry.vat_amount))?;
    }
    w.text_element("P_15", &format_decimal(totals.total_gross))?;

    w.start_element("Adnotacje")?;
    // P_18: reverse charge marker (1 = yes, 2 = no)
    w.text_element("P_18", if totals.reverse_charge { "1" } else { "2" })?;
    w.end_element("Adnotacje")?;

    w.text_element("RodzajFaktury", rodzaj)?;
    if rodzaj == "KOR" {
        if let Some(reason) = &data.correction_reason {
            w.text_element("PrzyczynaKorekty", reason)?;
        }
        if let Some(related) = &data.related_number {
            w.start_element("DaneFaKorygowanej")?;
            w.text_element("NrFaKorygowanej", related)?;
            w.end_element("DaneFaKorygowanej")?;
        }
    }

    for (i, line) in data.lines.iter().enumerate() {
        w.start_element("FaWiersz")?;
        w.text_element("NrWierszaFa", &(i + 1).to_string())?;
        w.text_element("P_7", &line.description)?;
        w.text_element("P_8A", super::xml::unit_code(line))?;
        w.text_element("P_8B", &format_decimal(line.quantity))?;
        w.text_element("P_9A", &format_decimal(line.unit_price))?;
        w.text_element("P_11", &format_decimal(round2(line.net_amount())))?;
        w.text_element("P_12", &p12_marker(line.vat_rate, totals.reverse_charge))?;
        w.end_element("FaWiersz")?;
    }

    if let Some(payment) = &data.payment {
        w.start_element("Platnosc")?;
        if let Some(due) = &data.due_date {
            w.start_element("TerminPlatnosci")?;
            w.text_element("Termin", &due.to_string())?;
            w.end_element("TerminPlatnosci")?;
        }
        if let Some(iban) = &payment.iban {
            w.start_element("RachunekBankowy")?;
            w.text_element("NrRB", iban)?;
            w.end_element("RachunekBankowy")?;
        }
        w.end_element("Platnosc")?;
    }

    w.end_element("Fa")?;
    w.end_element("Faktura")?;

    w.into_string()
}

fn write_podmiot(
    w: &mut XmlWriter,
    party: &Party,
    wrapper: &str,
    nip: Option<&str>,
) -> Result<(), EngineError> {
    w.start_element(wrapper)?;

    w.start_element("DaneIdentyfikacyjne")?;
    if let Some(nip) = nip {
        w.text_element("NIP", nip)?;
    }
    w.text_element("Nazwa", &party.name)?;
    w.end_element("DaneIdentyfikacyjne")?;

    w.start_element("Adres")?;
    w.text_element(
        "KodKraju",
        &super::xml::normalize_country_code(&party.country_code),
    )?;
    w.text_element("AdresL1", party.street.as_deref().unwrap_or("-"))?;
    w.text_element(
        "AdresL2",
        &format!("{} {}", party.postal_code, party.city),
    )?;
    w.end_element("Adres")?;

    w.end_element(wrapper)?;
    Ok(())
}
