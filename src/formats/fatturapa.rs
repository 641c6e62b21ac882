//! FatturaPA 1.2 generation for the Italian SdI exchange system.

use rust_decimal::Decimal;

use super::xml::{XmlWriter, format_decimal, normalize_country_code, round2};
use super::{FormatConfig, FormatGenerator, FormatResult};
use crate::core::{DocumentData, DocumentType, EngineError, OutputFormat, Party, XmlSyntax};

/// FatturaPA schema namespace.
pub const FATTURAPA_NS: &str =
    "http://ivaservizi.agenziaentrate.gov.it/docs/xsd/fatture/v1.2";

/// Transmission format code for invoices between private parties.
const FORMATO_FPR12: &str = "FPR12";

/// Default recipient code when the customer has no SdI routing code
/// (SdI then delivers to the customer's registered channel).
const DEFAULT_CODICE_DESTINATARIO: &str = "0000000";

/// Generator for the FatturaPA syntax.
pub struct FatturaPaGenerator;

impl FormatGenerator for FatturaPaGenerator {
    fn name(&self) -> &'static str {
        "fatturapa"
    }

    fn supports(&self, format: OutputFormat) -> bool {
        format == OutputFormat::FatturaPa
    }

    fn generate(&self, data: &DocumentData, _config: &FormatConfig) -> FormatResult {
        let Some(tipo) = tipo_documento(data.doc_type) else {
            return FormatResult::fail(format!(
                "FatturaPA has no TipoDocumento for document type '{}'",
                data.doc_type.as_str()
            ));
        };
        match to_fatturapa_xml(data, tipo) {
            Ok(xml) => FormatResult::ok(XmlSyntax::FatturaPa, xml),
            Err(e) => FormatResult::fail(e.to_string()),
        }
    }
}

/// SdI document type code, where one exists.
fn tipo_documento(doc_type: DocumentType) -> Option<&'static str> {
    match doc_type {
        DocumentType::Invoice => Some("TD01"),
        DocumentType::DepositInvoice => Some("TD02"),
        DocumentType::CreditNote => Some("TD04"),
        DocumentType::CorrectiveInvoice => Some("TD05"),
        DocumentType::Quote | DocumentType::Receipt | DocumentType::Proforma => None,
    }
}

/// Natura code for a zero-VAT breakdown entry.
fn natura_code(reverse_charge: bool) -> &'static str {
    if reverse_charge {
        "N6.9" // inversione contabile — altri casi
    } else {
        "N2.2" // non soggette — altri casi
    }
}

/// Transmission sequence: caller-supplied, else squeezed from the document
/// number. Never derived from the clock or randomness — sequencing is the
/// caller's authority.
fn progressivo_invio(data: &DocumentData) -> String {
    match &data.transmission_sequence {
        Some(seq) => seq.clone(),
        None => {
            let squeezed: String = data
                .number
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect();
            squeezed.chars().rev().take(10).collect::<Vec<_>>().into_iter().rev().collect()
        }
    }
}

/// Split an "IT12345678901"-style VAT number into (country, code).
fn split_vat(vat: &str) -> (String, String) {
    let trimmed = vat.trim();
    if trimmed.len() > 2 && trimmed[..2].chars().all(|c| c.is_ascii_alphabetic()) {
        (trimmed[..2].to_uppercase(), trimmed[2..].to_string())
    } else {
        ("IT".to_string(), trimmed.to_string())
    }
}

fn to_fatturapa_xml(data: &DocumentData, tipo: &str) -> Result<String, EngineError> {
    let totals = data.totals.as_ref().ok_or_else(|| {
        EngineError::Builder("totals must be calculated before XML generation".into())
    })?;
    let supplier_vat = data.supplier.vat_number.as_ref().ok_or_else(|| {
        EngineError::Validation("FatturaPA requires the supplier VAT number".into())
    })?;

    let mut w = XmlWriter::new()?;
    w.start_element_with_attrs(
        "p:FatturaElettronica",
        &[("versione", FORMATO_FPR12), ("xmlns:p", FATTURAPA_NS)],
    )?;

    // Header
    w.start_element("FatturaElettronicaHeader")?;

    w.start_element("DatiTrasmissione")?;
    let (id_paese, id_codice) = split_vat(supplier_vat);
    w.start_element("IdTrasmittente")?;
    w.text_element("IdPaese", &id_paese)?;
    w.text_element("IdCodice", &id_codice)?;
    w.end_element("IdTrasmittente")?;
    w.text_element("ProgressivoInvio", &progressivo_invio(data))?;
    w.text_element("FormatoTrasmissione", FORMATO_FPR12)?;
    w.text_element(
        "CodiceDestinatario",
        data.customer
            .routing_code
            .as_deref()
            .unwrap_or(DEFAULT_CODICE_DESTINATARIO),
    )?;
    w.end_element("DatiTrasmissione")?;

    write_fatturapa_party(&mut w, &data.supplier, "CedentePrestatore", true)?;
    write_fatturapa_party(&mut w, &data.customer, "CessionarioCommittente", false)?;

    w.end_element("FatturaElettronicaHeader")?;

    // Body
    w.start_element("FatturaElettronicaBody")?;

    w.start_element("DatiGenerali")?;
    w.start_element("DatiGeneraliDocumento")?;
    w.text_element("TipoDocumento", tipo)?;
    w.text_element("Divisa", &data.currency)?;
    w.text_element("Data", &data.issue_date.to_string())?;
    w.text_element("Numero", &data.number)?;
    for note in data.notes.iter().chain(data.legal_mentions.iter()) {
        w.text_element("Causale", note)?;
    }
    if let Some(reason) = &data.correction_reason {
        w.text_element("Causale", reason)?;
    }
    w.end_element("DatiGeneraliDocumento")?;
    if let Some(related) = &data.related_number {
        w.start_element("DatiFattureCollegate")?;
        w.text_element("IdDocumento", related)?;
        w.end_element("DatiFattureCollegate")?;
    }
    w.end_element("DatiGenerali")?;

    w.start_element("DatiBeniServizi")?;
    for (i, line) in data.lines.iter().enumerate() {
        let rate = if totals.reverse_charge {
            Decimal::ZERO
        } else {
            line.vat_rate
        };
        w.start_element("DettaglioLinee")?;
        w.text_element("NumeroLinea", &(i + 1).to_string())?;
        w.text_element("Descrizione", &line.description)?;
        w.text_element("Quantita", &format_decimal(line.quantity))?;
        w.text_element("PrezzoUnitario", &format_decimal(line.unit_price))?;
        w.text_element("PrezzoTotale", &format_decimal(round2(line.net_amount())))?;
        w.text_element("AliquotaIVA", &format_decimal(rate))?;
        if rate.is_zero() {
            w.text_element("Natura", natura_code(totals.reverse_charge))?;
        }
        w.end_element("DettaglioLinee")?;
    }
    for entry in &totals.breakdown {
        w.start_element("DatiRiepilogo")?;
        w.text_element("AliquotaIVA", &format_decimal(entry.rate))?;
        if entry.rate.is_zero() {
            w.text_element("Natura", natura_code(totals.reverse_charge))?;
        }
        w.text_element("ImponibileImporto", &format_decimal(entry.base_amount))?;
        w.text_element("Imposta", &format_decimal(entry.vat_amount))?;
        w.text_element("EsigibilitaIVA", "I")?;
        w.end_element("DatiRiepilogo")?;
    }
    w.end_element("DatiBeniServizi")?;

    w.start_element("DatiPagamento")?;
    w.text_element("CondizioniPagamento", "TP02")?;
    w.start_element("DettaglioPagamento")?;
    w.text_element("ModalitaPagamento", "MP05")?;
    if let Some(due) = &data.due_date {
        w.text_element("DataScadenzaPagamento", &due.to_string())?;
    }
    w.text_element("ImportoPagamento", &format_decimal(totals.total_gross))?;
    if let Some(iban) = data.payment.as_ref().and_then(|p| p.iban.as_deref()) {
        w.text_element("IBAN", iban)?;
    }
    w.end_element("DettaglioPagamento")?;
    w.end_element("DatiPagamento")?;

    w.end_element("FatturaElettronicaBody")?;
    w.end_element("p:FatturaElettronica")?;

    w.into_string()
}

fn write_fatturapa_party(
    w: &mut XmlWriter,
    party: &Party,
    wrapper: &str,
    is_supplier: bool,
) -> Result<(), EngineError> {
    w.start_element(wrapper)?;

    w.start_element("DatiAnagrafici")?;
    if let Some(vat) = &party.vat_number {
        let (paese, codice) = split_vat(vat);
        w.start_element("IdFiscaleIVA")?;
        w.text_element("IdPaese", &paese)?;
        w.text_element("IdCodice", &codice)?;
        w.end_element("IdFiscaleIVA")?;
    } else if let Some(legal_id) = &party.legal_id {
        w.text_element("CodiceFiscale", legal_id)?;
    }
    w.start_element("Anagrafica")?;
    w.text_element("Denominazione", &party.name)?;
    w.end_element("Anagrafica")?;
    if is_supplier {
        w.text_element("RegimeFiscale", "RF01")?;
    }
    w.end_element("DatiAnagrafici")?;

    w.start_element("Sede")?;
    w.text_element("Indirizzo", party.street.as_deref().unwrap_or("-"))?;
    w.text_element("CAP", &party.postal_code)?;
    w.text_element("Comune", &party.city)?;
    w.text_element("Nazione", &normalize_country_code(&party.country_code))?;
    w.end_element("Sede")?;

    w.end_element(wrapper)?;
    Ok(())
}
