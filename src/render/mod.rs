//! Renderer pipeline: build result → final binary artifact.
//!
//! A small state machine keyed by output format: plain rasterization,
//! hybrid rasterization + PDF/A-3 embedding, or XML pass-through. MIME type
//! and extension always come from the format's fixed tables, independent of
//! the artifact's actual shape.

mod embed;
pub(crate) mod pdf;
mod xmp;

pub use embed::{attachment_filename, embed_xml};
pub use pdf::rasterize;

use tracing::warn;

use crate::core::{EngineError, OutputFormat};
use crate::document::BuildResult;

/// Final rendered artifact plus its wire metadata.
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub extension: &'static str,
    /// True when an XML payload was embedded into the PDF container.
    pub xml_embedded: bool,
    /// Non-fatal problem encountered while finishing the artifact
    /// (e.g. embedding failed and the plain PDF was returned instead).
    pub warning: Option<String>,
}

/// Render the final artifact for a build result.
///
/// Hybrid formats degrade gracefully: when embedding fails the caller gets
/// the plain PDF plus a warning — never a corrupt or partially-written
/// container. Rasterization failures are fatal.
pub fn render(build: &BuildResult, format: OutputFormat) -> Result<RenderedArtifact, EngineError> {
    let mime_type = format.mime_type();
    let extension = format.extension();

    if format.is_xml_only() {
        let xml = build.xml.as_ref().ok_or_else(|| {
            EngineError::Xml(format!(
                "format '{}' requires an XML payload but the builder produced none",
                format.as_str()
            ))
        })?;
        return Ok(RenderedArtifact {
            bytes: xml.clone().into_bytes(),
            mime_type,
            extension,
            xml_embedded: false,
            warning: None,
        });
    }

    let pdf_bytes = pdf::rasterize(&build.markup)?;

    if format.is_hybrid() {
        if let (Some(xml), Some(syntax)) = (&build.xml, build.meta.syntax) {
            match embed::embed_xml(&pdf_bytes, xml, syntax) {
                Ok(hybrid) => {
                    return Ok(RenderedArtifact {
                        bytes: hybrid,
                        mime_type,
                        extension,
                        xml_embedded: true,
                        warning: None,
                    });
                }
                Err(e) => {
                    // Embedding failure is non-fatal: plain PDF + warning.
                    warn!(format = format.as_str(), error = %e, "XML embedding failed, returning plain PDF");
                    return Ok(RenderedArtifact {
                        bytes: pdf_bytes,
                        mime_type,
                        extension,
                        xml_embedded: false,
                        warning: Some(format!("XML embedding failed: {e}")),
                    });
                }
            }
        }
    }

    Ok(RenderedArtifact {
        bytes: pdf_bytes,
        mime_type,
        extension,
        xml_embedded: false,
        warning: None,
    })
}
