//! Format generator registry.
//!
//! Each structured-XML syntax is an independent generator obeying one
//! contract: `supports(format)` and `generate(data, config)`. Generators
//! never talk to each other, never recompute totals (all amounts come from
//! the [`VatResult`](crate::core::VatResult) the VAT engine produced), and
//! are searched through a flat, immutable registry built at compile time.

mod cii;
mod fatturapa;
mod ksef;
mod ubl;
pub(crate) mod xml;

pub use cii::CiiGenerator;
pub use fatturapa::FatturaPaGenerator;
pub use ksef::KsefGenerator;
pub use ubl::UblGenerator;
pub use xml::{format_decimal, normalize_country_code, unit_code, vat_category_code};

use serde::{Deserialize, Serialize};

use crate::core::{DocumentData, OutputFormat, XmlSyntax};

/// Per-generation configuration handed to a generator.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// The concrete requested format (distinguishes e.g. `facturx` from
    /// `zugferd`, or `ksef` from `ksef-fa3`, within one generator).
    pub format: OutputFormat,
    /// Supplier jurisdiction code.
    pub country_code: String,
}

/// Outcome of a generation attempt. XML and error are mutually exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatResult {
    pub success: bool,
    /// Generated XML, present iff `success`.
    pub xml: Option<String>,
    /// Syntax of the generated payload.
    pub syntax: Option<XmlSyntax>,
    /// Error description, present iff `!success`.
    pub error: Option<String>,
}

impl FormatResult {
    pub fn ok(syntax: XmlSyntax, xml: String) -> Self {
        Self {
            success: true,
            xml: Some(xml),
            syntax: Some(syntax),
            error: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            xml: None,
            syntax: None,
            error: Some(message.into()),
        }
    }
}

/// A self-contained mapping from the canonical model to one XML syntax.
pub trait FormatGenerator: Sync {
    /// Generator name for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this generator produces the given output format.
    fn supports(&self, format: OutputFormat) -> bool;

    /// Map the canonical document into this generator's syntax.
    fn generate(&self, data: &DocumentData, config: &FormatConfig) -> FormatResult;
}

/// The immutable generator registry, built once from an explicit list.
static GENERATORS: &[&dyn FormatGenerator] = &[
    &UblGenerator,
    &CiiGenerator,
    &FatturaPaGenerator,
    &KsefGenerator,
];

/// All registered generators.
pub fn registry() -> &'static [&'static dyn FormatGenerator] {
    GENERATORS
}

/// Find the generator responsible for a format.
pub fn generator_for(format: OutputFormat) -> Option<&'static dyn FormatGenerator> {
    GENERATORS.iter().find(|g| g.supports(format)).copied()
}

/// Generate the XML payload for a format, as a structured result — an
/// unsupported format yields `success = false`, never a panic or error,
/// so batch callers can continue past one bad format.
pub fn generate(data: &DocumentData, config: &FormatConfig) -> FormatResult {
    match generator_for(config.format) {
        Some(generator) => generator.generate(data, config),
        None => FormatResult::fail(format!(
            "no generator supports format '{}'",
            config.format.as_str()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_xml_format() {
        for format in [
            OutputFormat::Ubl,
            OutputFormat::XRechnung,
            OutputFormat::Cii,
            OutputFormat::FacturX,
            OutputFormat::Zugferd,
            OutputFormat::FatturaPa,
            OutputFormat::Ksef,
            OutputFormat::KsefFa3,
        ] {
            assert!(
                generator_for(format).is_some(),
                "no generator for {format:?}"
            );
        }
    }

    #[test]
    fn pdf_has_no_generator() {
        assert!(generator_for(OutputFormat::Pdf).is_none());
    }

    #[test]
    fn generators_do_not_overlap() {
        for format in [
            OutputFormat::Ubl,
            OutputFormat::Cii,
            OutputFormat::FatturaPa,
            OutputFormat::Ksef,
        ] {
            let matching = registry().iter().filter(|g| g.supports(format)).count();
            assert_eq!(matching, 1, "{format:?} matched {matching} generators");
        }
    }
}
