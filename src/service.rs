//! Document service orchestrator.
//!
//! Wires the config registry, compliance resolver, VAT engine, builder
//! pipeline, format generators, and renderer behind one `generate()` call,
//! and composes the output filename and metadata.

use chrono::{DateTime, Utc};

use crate::compliance::{build_context, calculate_vat, resolve_rules};
use crate::config::{self, BuilderKind};
use crate::core::{DocumentData, DocumentType, EngineError, OutputFormat};
use crate::document::{BuildRequest, StyleConfig, build};
use crate::render;
use tracing::{debug, warn};

/// A generation request — the engine's inbound boundary contract.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub data: DocumentData,
    pub format: OutputFormat,
    /// Supplier jurisdiction (ISO 3166-1 alpha-2).
    pub country: String,
    pub style: Option<StyleConfig>,
}

/// Metadata attached to a generated document.
#[derive(Debug, Clone)]
pub struct GenerationMetadata {
    pub generated_at: DateTime<Utc>,
    pub builder: BuilderKind,
    pub xml_embedded: bool,
    pub warning: Option<String>,
}

/// A generated document — the engine's outbound boundary contract.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub mime_type: &'static str,
    pub filename: String,
    pub metadata: GenerationMetadata,
}

/// Payload handed to the transmission collaborator alongside the rendered
/// buffer. This engine never performs network transmission itself.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TransmissionPayload {
    /// Sender identifier (VAT number, NIP, Peppol participant id, ...).
    pub sender_id: String,
    /// Recipient identifier.
    pub recipient_id: String,
    pub format: OutputFormat,
    pub filename: String,
    pub mime_type: String,
}

/// Result reported back by the transmission collaborator.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TransmissionResult {
    pub success: bool,
    /// Identifier assigned by the receiving platform (SdI, KSeF, ...).
    pub external_id: Option<String>,
    pub status: Option<String>,
    /// Verification / QR URL, when the platform provides one.
    pub validation_url: Option<String>,
}

/// Stateless orchestrator over the generation pipeline.
#[derive(Debug, Default)]
pub struct DocumentService;

impl DocumentService {
    pub fn new() -> Self {
        Self
    }

    /// Generate a document artifact.
    ///
    /// Config lookup never fails (unknown countries fall back to the
    /// generic policy, logged as a warning). A format outside the country's
    /// declared list is a soft mismatch — many callers intentionally
    /// override the default — so it proceeds with a warning. Hard failures
    /// are builder policy violations and rendering errors.
    pub fn generate(&self, request: GenerateRequest) -> Result<GeneratedDocument, EngineError> {
        let GenerateRequest {
            mut data,
            format,
            country,
            style,
        } = request;

        if !config::has(&country) {
            warn!(country = %country, "no dedicated config for country, using generic policy");
        }
        let config = config::get(&country);

        if !config.documents.supports(data.doc_type, format) {
            warn!(
                country = %config.code,
                doc_type = data.doc_type.as_str(),
                format = format.as_str(),
                "format not in the country's declared list, proceeding anyway"
            );
        }

        // Fill in what the caller left to the engine: totals and resolved
        // legal mentions. The issue date is the reference date for
        // effective-date checks — the resolver never reads the clock.
        let context = build_context(&data.supplier, &data.customer, &data.lines);
        if data.totals.is_none() {
            data.totals = Some(calculate_vat(&data.lines, &config.vat, Some(&context)));
        }
        if data.legal_mentions.is_empty() {
            let rules = resolve_rules(&context, &config, data.doc_type, data.issue_date);
            data.legal_mentions = rules.legal_mentions.into_iter().map(|m| m.text).collect();
        }

        debug!(
            doc_type = data.doc_type.as_str(),
            format = format.as_str(),
            country = %config.code,
            "building document"
        );

        let build_result = build(
            &BuildRequest {
                data: &data,
                format,
                style: style.as_ref(),
            },
            &config,
        )?;

        let artifact = render::render(&build_result, format)?;
        let filename = compose_filename(data.doc_type, &data.number, artifact.extension);

        Ok(GeneratedDocument {
            mime_type: artifact.mime_type,
            filename,
            format,
            metadata: GenerationMetadata {
                generated_at: Utc::now(),
                builder: build_result.meta.builder,
                xml_embedded: artifact.xml_embedded,
                warning: artifact.warning.clone(),
            },
            bytes: artifact.bytes,
        })
    }
}

/// Generate a document, defaulting the format from the country's document
/// policy when none is requested.
pub fn generate_document(
    data: DocumentData,
    country: &str,
    format: Option<OutputFormat>,
    style: Option<StyleConfig>,
) -> Result<GeneratedDocument, EngineError> {
    let format = format.unwrap_or_else(|| config::get(country).documents.default_format);
    DocumentService::new().generate(GenerateRequest {
        data,
        format,
        country: country.to_string(),
        style,
    })
}

/// `{type-prefix}-{number with non-alphanumerics replaced}.{extension}`.
fn compose_filename(doc_type: DocumentType, number: &str, extension: &str) -> String {
    let sanitized: String = number
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("{}-{}.{}", doc_type.filename_prefix(), sanitized, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_composition() {
        assert_eq!(
            compose_filename(DocumentType::Invoice, "FA 2025/001", "pdf"),
            "invoice-FA-2025-001.pdf"
        );
        assert_eq!(
            compose_filename(DocumentType::CreditNote, "AV-7", "xml"),
            "credit-note-AV-7.xml"
        );
    }
}
