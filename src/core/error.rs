use thiserror::Error;

/// Errors that can occur while building, validating, or generating documents.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Builder encountered invalid or missing input.
    #[error("builder error: {0}")]
    Builder(String),

    /// Document number sequencing error.
    #[error("numbering error: {0}")]
    Numbering(String),

    /// The requested output format cannot be produced for this document.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// XML generation or parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// PDF rasterization failed. Fatal — no retry is attempted.
    #[error("render error: {0}")]
    Render(String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "supplier.vat_number").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Jurisdiction rule identifier if applicable (e.g. "FR-SIREN").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule ID.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error carrying a jurisdiction rule ID.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}
