//! UN/CEFACT Cross-Industry Invoice generation — the syntax underneath
//! Factur-X and ZUGFeRD hybrids as well as standalone `cii` output.

use chrono::NaiveDate;

use super::xml::{XmlWriter, format_decimal, normalize_country_code, round2, unit_code,
                 vat_category_code};
use super::{FormatConfig, FormatGenerator, FormatResult};
use crate::core::{DocumentData, DocumentType, EngineError, OutputFormat, Party, XmlSyntax};

/// EN 16931 guideline identifier carried in the document context.
pub const EN16931_GUIDELINE_URN: &str = "urn:cen.eu:en16931:2017";

/// CII namespace URIs.
pub mod ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100";
    pub const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100";
}

/// Generator for the CII syntax (`cii`, `facturx`, `zugferd`).
pub struct CiiGenerator;

impl FormatGenerator for CiiGenerator {
    fn name(&self) -> &'static str {
        "cii"
    }

    fn supports(&self, format: OutputFormat) -> bool {
        matches!(
            format,
            OutputFormat::Cii | OutputFormat::FacturX | OutputFormat::Zugferd
        )
    }

    fn generate(&self, data: &DocumentData, _config: &FormatConfig) -> FormatResult {
        match data.doc_type {
            DocumentType::Quote | DocumentType::Receipt => {
                return FormatResult::fail(format!(
                    "CII generation is not defined for document type '{}'",
                    data.doc_type.as_str()
                ));
            }
            _ => {}
        }
        match to_cii_xml(data) {
            Ok(xml) => FormatResult::ok(XmlSyntax::Cii, xml),
            Err(e) => FormatResult::fail(e.to_string()),
        }
    }
}

fn to_cii_xml(data: &DocumentData) -> Result<String, EngineError> {
    let totals = data.totals.as_ref().ok_or_else(|| {
        EngineError::Builder("totals must be calculated before XML generation".into())
    })?;

    let currency = data.currency.as_str();
    let mut w = XmlWriter::new()?;

    w.start_element_with_attrs(
        "rsm:CrossIndustryInvoice",
        &[
            ("xmlns:rsm", ns::RSM),
            ("xmlns:ram", ns::RAM),
            ("xmlns:qdt", ns::QDT),
            ("xmlns:udt", ns::UDT),
        ],
    )?;

    // ExchangedDocumentContext
    w.start_element("rsm:ExchangedDocumentContext")?;
    w.start_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.text_element("ram:ID", EN16931_GUIDELINE_URN)?;
    w.end_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.end_element("rsm:ExchangedDocumentContext")?;

    // ExchangedDocument
    w.start_element("rsm:ExchangedDocument")?;
    w.text_element("ram:ID", &data.number)?;
    w.text_element("ram:TypeCode", &data.doc_type.untdid_code().to_string())?;
    write_cii_date(&mut w, "ram:IssueDateTime", &data.issue_date)?;
    for note in data.notes.iter().chain(data.legal_mentions.iter()) {
        w.start_element("ram:IncludedNote")?;
        w.text_element("ram:Content", note)?;
        w.end_element("ram:IncludedNote")?;
    }
    if let Some(text) = &totals.reverse_charge_text {
        w.start_element("ram:IncludedNote")?;
        w.text_element("ram:Content", text)?;
        w.end_element("ram:IncludedNote")?;
    }
    w.end_element("rsm:ExchangedDocument")?;

    // SupplyChainTradeTransaction — lines first, then agreement/delivery/settlement
    w.start_element("rsm:SupplyChainTradeTransaction")?;

    for (i, line) in data.lines.iter().enumerate() {
        w.start_element("ram:IncludedSupplyChainTradeLineItem")?;

        w.start_element("ram:AssociatedDocumentLineDocument")?;
        w.text_element("ram:LineID", &(i + 1).to_string())?;
        w.end_element("ram:AssociatedDocumentLineDocument")?;

        w.start_element("ram:SpecifiedTradeProduct")?;
        w.text_element("ram:Name", &line.description)?;
        w.end_element("ram:SpecifiedTradeProduct")?;

        w.start_element("ram:SpecifiedLineTradeAgreement")?;
        w.start_element("ram:NetPriceProductTradePrice")?;
        w.text_element("ram:ChargeAmount", &format_decimal(line.unit_price))?;
        w.end_element("ram:NetPriceProductTradePrice")?;
        w.end_element("ram:SpecifiedLineTradeAgreement")?;

        w.start_element("ram:SpecifiedLineTradeDelivery")?;
        w.text_element_with_attrs(
            "ram:BilledQuantity",
            &format_decimal(line.quantity),
            &[("unitCode", unit_code(line))],
        )?;
        w.end_element("ram:SpecifiedLineTradeDelivery")?;

        w.start_element("ram:SpecifiedLineTradeSettlement")?;
        w.start_element("ram:ApplicableTradeTax")?;
        w.text_element("ram:TypeCode", "VAT")?;
        let category = vat_category_code(line.vat_rate, false, totals.reverse_charge);
        let rate = if totals.reverse_charge {
            rust_decimal::Decimal::ZERO
        } else {
            line.vat_rate
        };
        w.text_element("ram:CategoryCode", category)?;
        w.text_element("ram:RateApplicablePercent", &format_decimal(rate))?;
        w.end_element("ram:ApplicableTradeTax")?;
        w.start_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
        w.text_element("ram:LineTotalAmount", &format_decimal(round2(line.net_amount())))?;
        w.end_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
        w.end_element("ram:SpecifiedLineTradeSettlement")?;

        w.end_element("ram:IncludedSupplyChainTradeLineItem")?;
    }

    // ApplicableHeaderTradeAgreement
    w.start_element("ram:ApplicableHeaderTradeAgreement")?;
    if let Some(routing) = &data.customer.routing_code {
        w.text_element("ram:BuyerReference", routing)?;
    }
    write_cii_party(&mut w, &data.supplier, "ram:SellerTradeParty")?;
    write_cii_party(&mut w, &data.customer, "ram:BuyerTradeParty")?;
    w.end_element("ram:ApplicableHeaderTradeAgreement")?;

    // ApplicableHeaderTradeDelivery
    w.start_element("ram:ApplicableHeaderTradeDelivery")?;
    w.end_element("ram:ApplicableHeaderTradeDelivery")?;

    // ApplicableHeaderTradeSettlement
    w.start_element("ram:ApplicableHeaderTradeSettlement")?;
    w.text_element("ram:InvoiceCurrencyCode", currency)?;

    if let Some(payment) = &data.payment {
        w.start_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
        w.text_element("ram:TypeCode", "30")?;
        w.text_element("ram:Information", &payment.label)?;
        if let Some(iban) = &payment.iban {
            w.start_element("ram:PayeePartyCreditorFinancialAccount")?;
            w.text_element("ram:IBANID", iban)?;
            w.end_element("ram:PayeePartyCreditorFinancialAccount")?;
        }
        w.end_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
    }

    for entry in &totals.breakdown {
        w.start_element("ram:ApplicableTradeTax")?;
        w.text_element("ram:CalculatedAmount", &format_decimal(entry.vat_amount))?;
        w.text_element("ram:TypeCode", "VAT")?;
        if totals.reverse_charge {
            if let Some(text) = &totals.reverse_charge_text {
                w.text_element("ram:ExemptionReason", text)?;
            }
        }
        w.text_element("ram:BasisAmount", &format_decimal(entry.base_amount))?;
        w.text_element(
            "ram:CategoryCode",
            vat_category_code(entry.rate, false, totals.reverse_charge),
        )?;
        w.text_element("ram:RateApplicablePercent", &format_decimal(entry.rate))?;
        w.end_element("ram:ApplicableTradeTax")?;
    }

    if data.due_date.is_some() || data.payment.is_some() {
        w.start_element("ram:SpecifiedTradePaymentTerms")?;
        if let Some(due) = &data.due_date {
            write_cii_date(&mut w, "ram:DueDateDateTime", due)?;
        }
        w.end_element("ram:SpecifiedTradePaymentTerms")?;
    }

    w.start_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
    w.text_element("ram:LineTotalAmount", &format_decimal(totals.total_net))?;
    w.text_element("ram:TaxBasisTotalAmount", &format_decimal(totals.total_net))?;
    w.text_element_with_attrs(
        "ram:TaxTotalAmount",
        &format_decimal(totals.total_vat),
        &[("currencyID", currency)],
    )?;
    w.text_element("ram:GrandTotalAmount", &format_decimal(totals.total_gross))?;
    w.text_element("ram:DuePayableAmount", &format_decimal(totals.total_gross))?;
    w.end_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;

    w.end_element("ram:ApplicableHeaderTradeSettlement")?;
    w.end_element("rsm:SupplyChainTradeTransaction")?;
    w.end_element("rsm:CrossIndustryInvoice")?;

    w.into_string()
}

fn write_cii_date(w: &mut XmlWriter, element: &str, date: &NaiveDate) -> Result<(), EngineError> {
    w.start_element(element)?;
    w.text_element_with_attrs(
        "udt:DateTimeString",
        &date.format("%Y%m%d").to_string(),
        &[("format", "102")],
    )?;
    w.end_element(element)?;
    Ok(())
}

fn write_cii_party(w: &mut XmlWriter, party: &Party, element: &str) -> Result<(), EngineError> {
    w.start_element(element)?;
    w.text_element("ram:Name", &party.name)?;

    if let Some(legal_id) = &party.legal_id {
        w.start_element("ram:SpecifiedLegalOrganization")?;
        w.text_element("ram:ID", legal_id)?;
        w.end_element("ram:SpecifiedLegalOrganization")?;
    }

    w.start_element("ram:PostalTradeAddress")?;
    w.text_element("ram:PostcodeCode", &party.postal_code)?;
    if let Some(street) = &party.street {
        w.text_element("ram:LineOne", street)?;
    }
    w.text_element("ram:CityName", &party.city)?;
    w.text_element("ram:CountryID", &normalize_country_code(&party.country_code))?;
    w.end_element("ram:PostalTradeAddress")?;

    if let Some(vat) = &party.vat_number {
        w.start_element("ram:SpecifiedTaxRegistration")?;
        w.text_element_with_attrs("ram:ID", vat, &[("schemeID", "VA")])?;
        w.end_element("ram:SpecifiedTaxRegistration")?;
    }

    w.end_element(element)?;
    Ok(())
}
