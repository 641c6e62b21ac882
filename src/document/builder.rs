//! Document builder pipeline.
//!
//! Two builder kinds exist, selected by the country's document policy:
//! generic (PDF-only) and regional (PDF plus structured XML syntaxes). Both
//! assemble the same deterministic render context; the regional builder
//! additionally delegates to the format registry when the requested output
//! format carries an XML payload.

use serde::{Deserialize, Serialize};

use super::context::{RenderContext, StyleConfig, assemble_context};
use crate::config::{BuilderKind, CountryConfig};
use crate::core::{DocumentData, EngineError, OutputFormat, XmlSyntax};
use crate::formats::{self, FormatConfig};

/// A build request: canonical data plus output selection.
#[derive(Debug, Clone)]
pub struct BuildRequest<'a> {
    pub data: &'a DocumentData,
    pub format: OutputFormat,
    pub style: Option<&'a StyleConfig>,
}

/// Metadata the renderer needs to finish the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildMeta {
    /// Which builder kind produced this result.
    pub builder: BuilderKind,
    /// True when the renderer must embed the XML payload into the PDF.
    pub requires_embedding: bool,
    /// Syntax of the attached XML payload, if any.
    pub syntax: Option<XmlSyntax>,
}

/// Builder output: rendered markup for rasterization, plus the optional
/// structured payload.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Plain-text markup consumed by the PDF rasterizer.
    pub markup: String,
    /// Render context the markup was produced from.
    pub context: RenderContext,
    /// Generated XML payload, when the format carries one.
    pub xml: Option<String>,
    pub meta: BuildMeta,
}

/// Build the renderable form of a document.
///
/// The builder kind comes from the country's document policy, not from the
/// document type. A generic builder refuses structured formats outright —
/// that is a policy violation, not a soft mismatch.
pub fn build(request: &BuildRequest<'_>, config: &CountryConfig) -> Result<BuildResult, EngineError> {
    let builder = config.documents.builder;

    if builder == BuilderKind::Generic && request.format != OutputFormat::Pdf {
        return Err(EngineError::UnsupportedFormat(format!(
            "country {} uses the generic builder, which only produces plain PDF (requested '{}')",
            config.code,
            request.format.as_str()
        )));
    }

    let default_style;
    let style = match request.style {
        Some(style) => style,
        None => {
            default_style = StyleConfig::for_locale(config.locale.clone());
            &default_style
        }
    };

    let context = assemble_context(request.data, style);
    let markup = render_markup(&context);

    let (xml, syntax) = match request.format.xml_syntax() {
        Some(_) => {
            let format_config = FormatConfig {
                format: request.format,
                country_code: config.code.clone(),
            };
            let result = formats::generate(request.data, &format_config);
            if !result.success {
                return Err(EngineError::Xml(
                    result
                        .error
                        .unwrap_or_else(|| "format generation failed".into()),
                ));
            }
            (result.xml, result.syntax)
        }
        None => (None, None),
    };

    Ok(BuildResult {
        markup,
        context,
        meta: BuildMeta {
            builder,
            requires_embedding: request.format.is_hybrid() && xml.is_some(),
            syntax,
        },
        xml,
    })
}

/// Render the context into the internal plain-text markup the rasterizer
/// consumes: one element per line, block separators between sections.
fn render_markup(ctx: &RenderContext) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push(format!("# {} {}", ctx.title, ctx.number));
    out.push(String::new());

    for (label, value) in &ctx.header_fields {
        out.push(format!("{label}: {value}"));
    }
    out.push(String::new());

    out.push(format!("## {}", ctx.supplier_label));
    out.extend(ctx.supplier_block.iter().cloned());
    out.push(String::new());
    out.push(format!("## {}", ctx.customer_label));
    out.extend(ctx.customer_block.iter().cloned());
    out.push(String::new());

    let (desc, qty, price, vat, total) = &ctx.column_headers;
    out.push(format!("| {desc} | {qty} | {price} | {vat} | {total} |"));
    for line in &ctx.lines {
        out.push(format!(
            "| {} | {} | {} | {} | {} |",
            line.description, line.quantity, line.unit_price, line.vat_rate, line.total
        ));
    }
    out.push(String::new());

    for (label, value) in &ctx.totals_rows {
        out.push(format!("{label}: {value}"));
    }

    if let Some(payment) = &ctx.payment {
        out.push(String::new());
        out.push(payment.clone());
    }

    if !ctx.notes.is_empty() {
        out.push(String::new());
        out.extend(ctx.notes.iter().cloned());
    }

    if !ctx.legal_mentions.is_empty() {
        out.push(String::new());
        out.extend(ctx.legal_mentions.iter().cloned());
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::{build_context, calculate_vat};
    use crate::config;
    use crate::core::{DocumentDataBuilder, DocumentType, LineItemBuilder, PartyBuilder};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn invoice(country: &str) -> DocumentData {
        let supplier = PartyBuilder::new("ACME", "Paris", "75002", country)
            .vat_number(match country {
                "FR" => "FR40123456824",
                "DE" => "DE123456789",
                _ => "XX123456789",
            })
            .legal_id("123456824")
            .company(true)
            .build();
        let customer = PartyBuilder::new("Client", "Lyon", "69001", "FR").build();
        let mut doc = DocumentDataBuilder::new(
            DocumentType::Invoice,
            "FA-2025-001",
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        )
        .supplier(supplier)
        .customer(customer)
        .add_line(
            LineItemBuilder::new("Consulting", dec!(2), dec!(500))
                .vat_rate(dec!(20))
                .services()
                .build(),
        )
        .build()
        .unwrap();

        let config = config::get(country);
        let ctx = build_context(&doc.supplier, &doc.customer, &doc.lines);
        doc.totals = Some(calculate_vat(&doc.lines, &config.vat, Some(&ctx)));
        doc
    }

    #[test]
    fn pdf_build_has_no_xml() {
        let doc = invoice("FR");
        let config = config::get("FR");
        let result = build(
            &BuildRequest {
                data: &doc,
                format: OutputFormat::Pdf,
                style: None,
            },
            &config,
        )
        .unwrap();
        assert!(result.xml.is_none());
        assert!(!result.meta.requires_embedding);
        assert!(result.markup.contains("FACTURE FA-2025-001"));
    }

    #[test]
    fn facturx_build_attaches_cii() {
        let doc = invoice("FR");
        let config = config::get("FR");
        let result = build(
            &BuildRequest {
                data: &doc,
                format: OutputFormat::FacturX,
                style: None,
            },
            &config,
        )
        .unwrap();
        assert!(result.meta.requires_embedding);
        assert_eq!(result.meta.syntax, Some(XmlSyntax::Cii));
        assert!(result.xml.unwrap().contains("CrossIndustryInvoice"));
    }

    #[test]
    fn xml_only_build_does_not_require_embedding() {
        let doc = invoice("FR");
        let config = config::get("FR");
        let result = build(
            &BuildRequest {
                data: &doc,
                format: OutputFormat::Ubl,
                style: None,
            },
            &config,
        )
        .unwrap();
        assert!(!result.meta.requires_embedding);
        assert_eq!(result.meta.syntax, Some(XmlSyntax::Ubl));
        assert!(result.xml.is_some());
    }

    #[test]
    fn generic_builder_refuses_structured_formats() {
        let doc = invoice("ES");
        let config = config::get("ES");
        let err = build(
            &BuildRequest {
                data: &doc,
                format: OutputFormat::Ubl,
                style: None,
            },
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat(_)));
    }

    #[test]
    fn builder_selection_follows_config_not_doc_type() {
        // Same document type, different countries, different builder kinds
        let fr = build(
            &BuildRequest {
                data: &invoice("FR"),
                format: OutputFormat::Pdf,
                style: None,
            },
            &config::get("FR"),
        )
        .unwrap();
        let es = build(
            &BuildRequest {
                data: &invoice("ES"),
                format: OutputFormat::Pdf,
                style: None,
            },
            &config::get("ES"),
        )
        .unwrap();
        assert_eq!(fr.meta.builder, crate::config::BuilderKind::Regional);
        assert_eq!(es.meta.builder, crate::config::BuilderKind::Generic);
    }

    #[test]
    fn markup_contains_legal_mentions() {
        let mut doc = invoice("FR");
        doc.legal_mentions.push("Pas d'escompte pour règlement anticipé".into());
        let config = config::get("FR");
        let result = build(
            &BuildRequest {
                data: &doc,
                format: OutputFormat::Pdf,
                style: None,
            },
            &config,
        )
        .unwrap();
        assert!(result.markup.contains("Pas d'escompte"));
    }
}
