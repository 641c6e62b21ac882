use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::EngineError;
use super::types::*;

/// Builder for the canonical [`DocumentData`].
///
/// ```
/// use chrono::NaiveDate;
/// use efactura::core::*;
/// use rust_decimal_macros::dec;
///
/// let doc = DocumentDataBuilder::new(
///         DocumentType::Invoice,
///         "FA-2025-001",
///         NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
///     )
///     .supplier(PartyBuilder::new("ACME SARL", "Paris", "75002", "FR")
///         .vat_number("FR40123456824")
///         .legal_id("123456824")
///         .company(true)
///         .build())
///     .customer(PartyBuilder::new("Kunde AG", "Berlin", "10115", "DE").build())
///     .add_line(LineItemBuilder::new("Consulting", dec!(10), dec!(150))
///         .vat_rate(dec!(20))
///         .services()
///         .build())
///     .build()
///     .unwrap();
///
/// assert_eq!(doc.lines.len(), 1);
/// ```
pub struct DocumentDataBuilder {
    doc_type: DocumentType,
    id: Option<String>,
    number: String,
    issue_date: NaiveDate,
    due_date: Option<NaiveDate>,
    valid_until: Option<NaiveDate>,
    payment_date: Option<NaiveDate>,
    related_number: Option<String>,
    correction_reason: Option<String>,
    currency: String,
    supplier: Option<Party>,
    customer: Option<Party>,
    lines: Vec<LineItem>,
    notes: Vec<String>,
    payment: Option<PaymentMeans>,
    legal_mentions: Vec<String>,
    transmission_sequence: Option<String>,
}

impl DocumentDataBuilder {
    pub fn new(doc_type: DocumentType, number: impl Into<String>, issue_date: NaiveDate) -> Self {
        Self {
            doc_type,
            id: None,
            number: number.into(),
            issue_date,
            due_date: None,
            valid_until: None,
            payment_date: None,
            related_number: None,
            correction_reason: None,
            currency: "EUR".to_string(),
            supplier: None,
            customer: None,
            lines: Vec::new(),
            notes: Vec::new(),
            payment: None,
            legal_mentions: Vec::new(),
            transmission_sequence: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn valid_until(mut self, date: NaiveDate) -> Self {
        self.valid_until = Some(date);
        self
    }

    pub fn payment_date(mut self, date: NaiveDate) -> Self {
        self.payment_date = Some(date);
        self
    }

    pub fn related_number(mut self, number: impl Into<String>) -> Self {
        self.related_number = Some(number.into());
        self
    }

    pub fn correction_reason(mut self, reason: impl Into<String>) -> Self {
        self.correction_reason = Some(reason.into());
        self
    }

    pub fn supplier(mut self, party: Party) -> Self {
        self.supplier = Some(party);
        self
    }

    pub fn customer(mut self, party: Party) -> Self {
        self.customer = Some(party);
        self
    }

    pub fn add_line(mut self, line: LineItem) -> Self {
        self.lines.push(line);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn payment(mut self, payment: PaymentMeans) -> Self {
        self.payment = Some(payment);
        self
    }

    pub fn legal_mention(mut self, text: impl Into<String>) -> Self {
        self.legal_mentions.push(text.into());
        self
    }

    pub fn transmission_sequence(mut self, seq: impl Into<String>) -> Self {
        self.transmission_sequence = Some(seq.into());
        self
    }

    /// Build the document. Totals stay unset — run the VAT engine to fill them.
    pub fn build(self) -> Result<DocumentData, EngineError> {
        let supplier = self
            .supplier
            .ok_or_else(|| EngineError::Builder("supplier is required".into()))?;
        let customer = self
            .customer
            .ok_or_else(|| EngineError::Builder("customer is required".into()))?;

        if self.lines.is_empty() {
            return Err(EngineError::Builder(
                "at least one line item is required".into(),
            ));
        }

        // Input limits to prevent abuse
        if self.lines.len() > 10_000 {
            return Err(EngineError::Builder(
                "document cannot have more than 10,000 line items".into(),
            ));
        }
        if self.number.len() > 200 {
            return Err(EngineError::Builder(
                "document number cannot exceed 200 characters".into(),
            ));
        }
        if self.notes.len() > 100 {
            return Err(EngineError::Builder(
                "document cannot have more than 100 notes".into(),
            ));
        }

        let id = self.id.unwrap_or_else(|| self.number.clone());

        Ok(DocumentData {
            doc_type: self.doc_type,
            id,
            number: self.number,
            issue_date: self.issue_date,
            due_date: self.due_date,
            valid_until: self.valid_until,
            payment_date: self.payment_date,
            related_number: self.related_number,
            correction_reason: self.correction_reason,
            currency: self.currency,
            supplier,
            customer,
            lines: self.lines,
            totals: None,
            notes: self.notes,
            payment: self.payment,
            legal_mentions: self.legal_mentions,
            transmission_sequence: self.transmission_sequence,
        })
    }
}

/// Builder for [`Party`].
pub struct PartyBuilder {
    name: String,
    vat_number: Option<String>,
    legal_id: Option<String>,
    street: Option<String>,
    city: String,
    postal_code: String,
    country_code: String,
    is_company: bool,
    is_public_entity: bool,
    peppol_id: Option<String>,
    routing_code: Option<String>,
    email: Option<String>,
}

impl PartyBuilder {
    pub fn new(
        name: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            vat_number: None,
            legal_id: None,
            street: None,
            city: city.into(),
            postal_code: postal_code.into(),
            country_code: country_code.into(),
            is_company: false,
            is_public_entity: false,
            peppol_id: None,
            routing_code: None,
            email: None,
        }
    }

    pub fn vat_number(mut self, id: impl Into<String>) -> Self {
        self.vat_number = Some(id.into());
        self
    }

    pub fn legal_id(mut self, id: impl Into<String>) -> Self {
        self.legal_id = Some(id.into());
        self
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn company(mut self, yes: bool) -> Self {
        self.is_company = yes;
        self
    }

    pub fn public_entity(mut self, yes: bool) -> Self {
        self.is_public_entity = yes;
        self
    }

    pub fn peppol_id(mut self, id: impl Into<String>) -> Self {
        self.peppol_id = Some(id.into());
        self
    }

    pub fn routing_code(mut self, code: impl Into<String>) -> Self {
        self.routing_code = Some(code.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn build(self) -> Party {
        Party {
            name: self.name,
            vat_number: self.vat_number,
            legal_id: self.legal_id,
            street: self.street,
            city: self.city,
            postal_code: self.postal_code,
            country_code: self.country_code,
            is_company: self.is_company,
            is_public_entity: self.is_public_entity,
            peppol_id: self.peppol_id,
            routing_code: self.routing_code,
            email: self.email,
        }
    }
}

/// Builder for [`LineItem`]. Defaults: VAT 20%, goods, no explicit unit.
pub struct LineItemBuilder {
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    vat_rate: Decimal,
    kind: ItemKind,
    unit: Option<String>,
}

impl LineItemBuilder {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            vat_rate: Decimal::new(20, 0),
            kind: ItemKind::Goods,
            unit: None,
        }
    }

    pub fn vat_rate(mut self, rate: Decimal) -> Self {
        self.vat_rate = rate;
        self
    }

    pub fn services(mut self) -> Self {
        self.kind = ItemKind::Services;
        self
    }

    pub fn goods(mut self) -> Self {
        self.kind = ItemKind::Goods;
        self
    }

    pub fn unit(mut self, code: impl Into<String>) -> Self {
        self.unit = Some(code.into());
        self
    }

    pub fn build(self) -> LineItem {
        LineItem {
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            vat_rate: self.vat_rate,
            kind: self.kind,
            unit: self.unit,
        }
    }
}
