//! Shared XML plumbing for the format generators.
//!
//! Every generator writes through [`XmlWriter`], so escaping of free text is
//! applied uniformly by the quick-xml event writer. The cross-cutting coding
//! rules (country normalization, VAT category letters, unit defaulting) live
//! here so no generator drifts from the others.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;
use std::io::Cursor;

use crate::core::{EngineError, LineItem, units};

pub type XmlResult = Result<String, EngineError>;

fn xml_io(e: std::io::Error) -> EngineError {
    EngineError::Xml(format!("XML write error: {e}"))
}

/// Thin stateful wrapper over the quick-xml event writer.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, EngineError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String, EngineError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| EngineError::Xml(format!("XML UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, EngineError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, EngineError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, EngineError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, EngineError> {
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, EngineError> {
        self.start_element_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write a decimal amount with a currencyID attribute.
    pub fn amount_element(
        &mut self,
        name: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<&mut Self, EngineError> {
        self.text_element_with_attrs(name, &format_decimal(amount), &[("currencyID", currency)])
    }

    /// Write a quantity with a unitCode attribute.
    pub fn quantity_element(
        &mut self,
        name: &str,
        qty: Decimal,
        unit: &str,
    ) -> Result<&mut Self, EngineError> {
        self.text_element_with_attrs(name, &format_decimal(qty), &[("unitCode", unit)])
    }
}

/// Format a Decimal for XML output — at least 2 decimal places, trailing
/// zeros beyond that stripped.
pub fn format_decimal(d: Decimal) -> String {
    let s = d.normalize().to_string();
    if let Some(dot_pos) = s.find('.') {
        let decimals = s.len() - dot_pos - 1;
        if decimals < 2 {
            format!("{s}{}", "0".repeat(2 - decimals))
        } else {
            s
        }
    } else {
        format!("{s}.00")
    }
}

/// Round to 2 decimals, half-up — the same strategy the VAT engine uses.
pub fn round2(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Normalize a country designation to ISO 3166-1 alpha-2.
///
/// Already-2-letter codes pass through uppercased; known full names map via
/// a fixed table; anything else is best-effort truncated to its first two
/// letters.
pub fn normalize_country_code(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.len() == 2 {
        return trimmed.to_uppercase();
    }
    let upper = trimmed.to_uppercase();
    for (name, code) in COUNTRY_NAMES {
        if upper == *name {
            return (*code).to_string();
        }
    }
    upper.chars().filter(|c| c.is_ascii_alphabetic()).take(2).collect()
}

static COUNTRY_NAMES: &[(&str, &str)] = &[
    ("AUSTRIA", "AT"),
    ("BELGIUM", "BE"),
    ("FRANCE", "FR"),
    ("GERMANY", "DE"),
    ("ITALY", "IT"),
    ("LUXEMBOURG", "LU"),
    ("NETHERLANDS", "NL"),
    ("POLAND", "PL"),
    ("PORTUGAL", "PT"),
    ("SPAIN", "ES"),
    ("SWITZERLAND", "CH"),
    ("UNITED KINGDOM", "GB"),
    ("UNITED STATES", "US"),
];

/// UNTDID 5305 VAT category letter for a line or breakdown entry.
///
/// Reverse charge takes precedence over exemption, which takes precedence
/// over a literal zero rate; everything else is standard-rated.
pub fn vat_category_code(rate: Decimal, exempt: bool, reverse_charge: bool) -> &'static str {
    if reverse_charge {
        "AE"
    } else if exempt {
        "E"
    } else if rate.is_zero() {
        "Z"
    } else {
        "S"
    }
}

/// Unit code for a line: its explicit code, or the kind default.
pub fn unit_code(line: &LineItem) -> &str {
    line.unit
        .as_deref()
        .unwrap_or_else(|| units::default_unit_code(line.kind))
}
