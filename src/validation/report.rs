//! Per-attachment validation results.

use serde::Serialize;

use crate::config::ValidationMode;
use crate::error::{Error, Result};
use crate::version::PdfVersion;

/// One attachment that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentFailure {
    /// Key of the attachment in the embedded files name tree
    pub name: String,
    /// Stable error code, see [`Error::code`]
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Outcome of validating every embedded file of a document.
///
/// # Example
///
/// ```
/// use pdf_attest::config::ValidationMode;
/// use pdf_attest::validation::ValidationReport;
/// use pdf_attest::version::PdfVersion;
///
/// let report = ValidationReport::new(PdfVersion::V1_7, ValidationMode::Strict);
/// assert!(report.is_valid());
///
/// let json = report.to_json()?;
/// assert!(json.contains("\"mode\": \"strict\""));
/// # Ok::<(), pdf_attest::error::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Document version the pass ran against
    pub version: String,
    /// Enforcement mode
    pub mode: ValidationMode,
    /// Number of attachments visited
    pub attachments_checked: usize,
    /// Attachments that failed, in tree order
    pub failures: Vec<AttachmentFailure>,
}

impl ValidationReport {
    /// Empty report.
    pub fn new(version: PdfVersion, mode: ValidationMode) -> Self {
        Self {
            version: version.to_string(),
            mode,
            attachments_checked: 0,
            failures: Vec::new(),
        }
    }

    /// Count one attachment, recording its error if it failed.
    pub fn record(&mut self, name: &str, outcome: Result<()>) {
        self.attachments_checked += 1;
        if let Err(e) = outcome {
            log::warn!("Attachment {:?} failed validation: {}", name, e);
            self.failures.push(AttachmentFailure {
                name: name.to_string(),
                code: e.code().to_string(),
                message: e.to_string(),
            });
        }
    }

    /// True if no attachment failed.
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("Failed to serialize report to JSON: {}", e)))
    }
}
