//! Document Normalizer: turns an uploaded file into clean, trimmed plain text.
//!
//! Pipeline: classify the declared media type → dispatch to the format's extractor →
//! trim and reject blank output. Three failure exits, one success exit.
//!
//! Parser faults never leave this module as anything other than `ExtractionFailure`.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

pub mod extract;
pub mod pool;

pub use extract::ExtractError;
pub use pool::ExtractionPool;

// ────────────────────────────────────────────────────────────────────────────
// Media types
// ────────────────────────────────────────────────────────────────────────────

const TEXT_PLAIN: &str = "text/plain";
const APPLICATION_PDF: &str = "application/pdf";
const APPLICATION_MSWORD: &str = "application/msword";
const APPLICATION_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The fixed allow-list of declared media types the normalizer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    PlainText,
    Pdf,
    /// Legacy binary `.doc`.
    MsWord,
    /// Office Open XML `.docx`.
    Docx,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [
        MediaType::PlainText,
        MediaType::Pdf,
        MediaType::MsWord,
        MediaType::Docx,
    ];

    /// Resolves a caller-declared content type against the allow-list.
    ///
    /// Only the MIME essence is compared (`type/subtype`, case-insensitive), so
    /// `text/plain; charset=utf-8` is accepted as plain text. Returns `None` for
    /// anything unparsable or outside the list.
    pub fn from_declared(declared: &str) -> Option<Self> {
        let parsed: mime::Mime = declared.trim().parse().ok()?;
        match parsed.essence_str() {
            TEXT_PLAIN => Some(MediaType::PlainText),
            APPLICATION_PDF => Some(MediaType::Pdf),
            APPLICATION_MSWORD => Some(MediaType::MsWord),
            APPLICATION_DOCX => Some(MediaType::Docx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::PlainText => TEXT_PLAIN,
            MediaType::Pdf => APPLICATION_PDF,
            MediaType::MsWord => APPLICATION_MSWORD,
            MediaType::Docx => APPLICATION_DOCX,
        }
    }

    /// Comma-separated allow-list, used in user-facing rejection messages.
    pub fn accepted_list() -> String {
        Self::ALL
            .iter()
            .map(MediaType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Inputs and outputs
// ────────────────────────────────────────────────────────────────────────────

/// A single uploaded file as received from the caller. Everything here is untrusted.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Advisory only: used for logs and per-file reporting, never for dispatch.
    pub filename: String,
    pub declared_media_type: String,
    pub content: Bytes,
}

impl UploadedDocument {
    pub fn new(
        filename: impl Into<String>,
        declared_media_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            declared_media_type: declared_media_type.into(),
            content: content.into(),
        }
    }
}

/// Trimmed document text. Never empty or whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Trims `raw`; returns `None` when nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Coarse classification of a failed normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    UnsupportedType,
    ExtractionError,
    EmptyContent,
}

/// Why a document could not be normalized.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionFailure {
    #[error("unsupported media type '{0}'")]
    UnsupportedType(String),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("document contains no text")]
    EmptyContent,
}

impl ExtractionFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExtractionFailure::UnsupportedType(_) => FailureKind::UnsupportedType,
            ExtractionFailure::Extraction(_) => FailureKind::ExtractionError,
            ExtractionFailure::EmptyContent => FailureKind::EmptyContent,
        }
    }

    /// Message safe to show an end user. Parser detail is deliberately absent.
    pub fn user_message(&self) -> String {
        match self {
            ExtractionFailure::UnsupportedType(_) => format!(
                "Unsupported file format. Accepted formats: {}",
                MediaType::accepted_list()
            ),
            ExtractionFailure::Extraction(_) => "Failed to extract text from file".to_string(),
            ExtractionFailure::EmptyContent => "File content is empty".to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Normalizes one document. Synchronous and CPU-bound; see [`ExtractionPool`] for the
/// async, bounded wrapper used by request handlers.
pub fn normalize(document: &UploadedDocument) -> Result<NormalizedText, ExtractionFailure> {
    let Some(media_type) = MediaType::from_declared(&document.declared_media_type) else {
        warn!(
            filename = %document.filename,
            declared = %document.declared_media_type,
            "Unsupported file type"
        );
        return Err(ExtractionFailure::UnsupportedType(
            document.declared_media_type.clone(),
        ));
    };

    info!(
        filename = %document.filename,
        media_type = %media_type,
        size = document.content.len(),
        "Processing file"
    );

    let raw = extract::extract_text(media_type, &document.content).map_err(|e| {
        error!(
            filename = %document.filename,
            media_type = %media_type,
            error = %e,
            "Text extraction failed"
        );
        ExtractionFailure::from(e)
    })?;

    NormalizedText::new(&raw).ok_or_else(|| {
        warn!(filename = %document.filename, "File content is empty");
        ExtractionFailure::EmptyContent
    })
}
