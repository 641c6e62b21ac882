//! UBL 2.1 invoice/credit-note generation (Peppol BIS Billing 3.0,
//! XRechnung profile on request).

use super::xml::{XmlWriter, format_decimal, normalize_country_code, round2, unit_code,
                 vat_category_code};
use super::{FormatConfig, FormatGenerator, FormatResult};
use crate::core::{
    DocumentData, DocumentType, EngineError, OutputFormat, Party, VatResult, XmlSyntax,
};

/// Peppol BIS Billing 3.0 customization identifier (BT-24).
pub const PEPPOL_CUSTOMIZATION_ID: &str =
    "urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0";

/// XRechnung 3.0 customization identifier (BT-24).
pub const XRECHNUNG_CUSTOMIZATION_ID: &str =
    "urn:cen.eu:en16931:2017#compliant#urn:xeinkauf.de:kosit:xrechnung_3.0";

/// Peppol BIS Billing 3.0 profile identifier (BT-23).
pub const PEPPOL_PROFILE_ID: &str = "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0";

/// UBL 2.1 namespace URIs.
pub mod ns {
    pub const INVOICE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";
    pub const CREDIT_NOTE: &str = "urn:oasis:names:specification:ubl:schema:xsd:CreditNote-2";
    pub const CAC: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
    pub const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
}

/// Generator for the UBL syntax (standalone `ubl` and the `xrechnung` profile).
pub struct UblGenerator;

impl FormatGenerator for UblGenerator {
    fn name(&self) -> &'static str {
        "ubl"
    }

    fn supports(&self, format: OutputFormat) -> bool {
        matches!(format, OutputFormat::Ubl | OutputFormat::XRechnung)
    }

    fn generate(&self, data: &DocumentData, config: &FormatConfig) -> FormatResult {
        match data.doc_type {
            DocumentType::Quote | DocumentType::Receipt => {
                return FormatResult::fail(format!(
                    "UBL generation is not defined for document type '{}'",
                    data.doc_type.as_str()
                ));
            }
            _ => {}
        }
        match to_ubl_xml(data, config) {
            Ok(xml) => FormatResult::ok(XmlSyntax::Ubl, xml),
            Err(e) => FormatResult::fail(e.to_string()),
        }
    }
}

fn to_ubl_xml(data: &DocumentData, config: &FormatConfig) -> Result<String, EngineError> {
    let totals = data.totals.as_ref().ok_or_else(|| {
        EngineError::Builder("totals must be calculated before XML generation".into())
    })?;

    let currency = data.currency.as_str();
    let is_credit_note = data.doc_type == DocumentType::CreditNote;
    let (root_tag, root_ns) = if is_credit_note {
        ("ubl:CreditNote", ns::CREDIT_NOTE)
    } else {
        ("ubl:Invoice", ns::INVOICE)
    };
    let customization_id = if config.format == OutputFormat::XRechnung {
        XRECHNUNG_CUSTOMIZATION_ID
    } else {
        PEPPOL_CUSTOMIZATION_ID
    };

    let mut w = XmlWriter::new()?;
    w.start_element_with_attrs(
        root_tag,
        &[
            ("xmlns:ubl", root_ns),
            ("xmlns:cac", ns::CAC),
            ("xmlns:cbc", ns::CBC),
        ],
    )?;

    w.text_element("cbc:CustomizationID", customization_id)?;
    w.text_element("cbc:ProfileID", PEPPOL_PROFILE_ID)?;
    w.text_element("cbc:ID", &data.number)?;
    w.text_element("cbc:IssueDate", &data.issue_date.to_string())?;
    if !is_credit_note {
        if let Some(due) = &data.due_date {
            w.text_element("cbc:DueDate", &due.to_string())?;
        }
    }
    let type_code_tag = if is_credit_note {
        "cbc:CreditNoteTypeCode"
    } else {
        "cbc:InvoiceTypeCode"
    };
    w.text_element(type_code_tag, &data.doc_type.untdid_code().to_string())?;
    for note in &data.notes {
        w.text_element("cbc:Note", note)?;
    }
    for mention in &data.legal_mentions {
        w.text_element("cbc:Note", mention)?;
    }
    if let Some(text) = &totals.reverse_charge_text {
        w.text_element("cbc:Note", text)?;
    }
    w.text_element("cbc:DocumentCurrencyCode", currency)?;
    if let Some(routing) = &data.customer.routing_code {
        w.text_element("cbc:BuyerReference", routing)?;
    }

    // Original document reference (credit/corrective notes, receipts)
    if let Some(related) = &data.related_number {
        w.start_element("cac:BillingReference")?;
        w.start_element("cac:InvoiceDocumentReference")?;
        w.text_element("cbc:ID", related)?;
        w.end_element("cac:InvoiceDocumentReference")?;
        w.end_element("cac:BillingReference")?;
    }

    write_party(&mut w, &data.supplier, "cac:AccountingSupplierParty")?;
    write_party(&mut w, &data.customer, "cac:AccountingCustomerParty")?;

    if let Some(payment) = &data.payment {
        w.start_element("cac:PaymentMeans")?;
        w.text_element_with_attrs(
            "cbc:PaymentMeansCode",
            "30",
            &[("name", payment.label.as_str())],
        )?;
        if let Some(iban) = &payment.iban {
            w.start_element("cac:PayeeFinancialAccount")?;
            w.text_element("cbc:ID", iban)?;
            if let Some(bic) = &payment.bic {
                w.start_element("cac:FinancialInstitutionBranch")?;
                w.text_element("cbc:ID", bic)?;
                w.end_element("cac:FinancialInstitutionBranch")?;
            }
            w.end_element("cac:PayeeFinancialAccount")?;
        }
        w.end_element("cac:PaymentMeans")?;
    }

    write_tax_total(&mut w, totals, currency)?;

    w.start_element("cac:LegalMonetaryTotal")?;
    w.amount_element("cbc:LineExtensionAmount", totals.total_net, currency)?;
    w.amount_element("cbc:TaxExclusiveAmount", totals.total_net, currency)?;
    w.amount_element("cbc:TaxInclusiveAmount", totals.total_gross, currency)?;
    w.amount_element("cbc:PayableAmount", totals.total_gross, currency)?;
    w.end_element("cac:LegalMonetaryTotal")?;

    let (line_tag, qty_tag) = if is_credit_note {
        ("cac:CreditNoteLine", "cbc:CreditedQuantity")
    } else {
        ("cac:InvoiceLine", "cbc:InvoicedQuantity")
    };
    for (i, line) in data.lines.iter().enumerate() {
        w.start_element(line_tag)?;
        w.text_element("cbc:ID", &(i + 1).to_string())?;
        w.quantity_element(qty_tag, line.quantity, unit_code(line))?;
        w.amount_element("cbc:LineExtensionAmount", round2(line.net_amount()), currency)?;

        w.start_element("cac:Item")?;
        w.text_element("cbc:Name", &line.description)?;
        w.start_element("cac:ClassifiedTaxCategory")?;
        let category = vat_category_code(line.vat_rate, false, totals.reverse_charge);
        let rate = if totals.reverse_charge {
            rust_decimal::Decimal::ZERO
        } else {
            line.vat_rate
        };
        w.text_element("cbc:ID", category)?;
        w.text_element("cbc:Percent", &format_decimal(rate))?;
        w.start_element("cac:TaxScheme")?;
        w.text_element("cbc:ID", "VAT")?;
        w.end_element("cac:TaxScheme")?;
        w.end_element("cac:ClassifiedTaxCategory")?;
        w.end_element("cac:Item")?;

        w.start_element("cac:Price")?;
        w.amount_element("cbc:PriceAmount", line.unit_price, currency)?;
        w.end_element("cac:Price")?;

        w.end_element(line_tag)?;
    }

    w.end_element(root_tag)?;
    w.into_string()
}

fn write_party(w: &mut XmlWriter, party: &Party, wrapper: &str) -> Result<(), EngineError> {
    w.start_element(wrapper)?;
    w.start_element("cac:Party")?;

    if let Some(peppol_id) = &party.peppol_id {
        w.text_element_with_attrs("cbc:EndpointID", peppol_id, &[("schemeID", "0088")])?;
    }

    w.start_element("cac:PostalAddress")?;
    if let Some(street) = &party.street {
        w.text_element("cbc:StreetName", street)?;
    }
    w.text_element("cbc:CityName", &party.city)?;
    w.text_element("cbc:PostalZone", &party.postal_code)?;
    w.start_element("cac:Country")?;
    w.text_element(
        "cbc:IdentificationCode",
        &normalize_country_code(&party.country_code),
    )?;
    w.end_element("cac:Country")?;
    w.end_element("cac:PostalAddress")?;

    if let Some(vat) = &party.vat_number {
        w.start_element("cac:PartyTaxScheme")?;
        w.text_element("cbc:CompanyID", vat)?;
        w.start_element("cac:TaxScheme")?;
        w.text_element("cbc:ID", "VAT")?;
        w.end_element("cac:TaxScheme")?;
        w.end_element("cac:PartyTaxScheme")?;
    }

    w.start_element("cac:PartyLegalEntity")?;
    w.text_element("cbc:RegistrationName", &party.name)?;
    if let Some(legal_id) = &party.legal_id {
        w.text_element("cbc:CompanyID", legal_id)?;
    }
    w.end_element("cac:PartyLegalEntity")?;

    if let Some(email) = &party.email {
        w.start_element("cac:Contact")?;
        w.text_element("cbc:ElectronicMail", email)?;
        w.end_element("cac:Contact")?;
    }

    w.end_element("cac:Party")?;
    w.end_element(wrapper)?;
    Ok(())
}

fn write_tax_total(
    w: &mut XmlWriter,
    totals: &VatResult,
    currency: &str,
) -> Result<(), EngineError> {
    w.start_element("cac:TaxTotal")?;
    w.amount_element("cbc:TaxAmount", totals.total_vat, currency)?;
    for entry in &totals.breakdown {
        w.start_element("cac:TaxSubtotal")?;
        w.amount_element("cbc:TaxableAmount", entry.base_amount, currency)?;
        w.amount_element("cbc:TaxAmount", entry.vat_amount, currency)?;
        w.start_element("cac:TaxCategory")?;
        w.text_element(
            "cbc:ID",
            vat_category_code(entry.rate, false, totals.reverse_charge),
        )?;
        w.text_element("cbc:Percent", &format_decimal(entry.rate))?;
        if totals.reverse_charge {
            if let Some(text) = &totals.reverse_charge_text {
                w.text_element("cbc:TaxExemptionReason", text)?;
            }
        }
        w.start_element("cac:TaxScheme")?;
        w.text_element("cbc:ID", "VAT")?;
        w.end_element("cac:TaxScheme")?;
        w.end_element("cac:TaxCategory")?;
        w.end_element("cac:TaxSubtotal")?;
    }
    w.end_element("cac:TaxTotal")?;
    Ok(())
}
