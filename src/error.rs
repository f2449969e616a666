//! Error types for the marksheet-extract library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`MarksheetError`] — **Fatal**: the batch cannot proceed at all (results
//!   directory missing, output directory not writable, invalid config). Also
//!   used by [`crate::dispatch::try_dispatch`] to name an unknown board.
//!
//! * [`DocumentError`] — **Non-fatal**: a single document could not be
//!   extracted (missing input file, unknown board) but every other document
//!   in the batch is fine. Stored inside [`crate::output::DocumentResult`].
//!
//! Data-quality problems in the OCR text are neither: the extractors express
//! them as absent fields in the returned record.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the marksheet-extract library.
#[derive(Debug, Error)]
pub enum MarksheetError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The OCR results directory does not exist.
    #[error("OCR results directory not found: '{path}'\nRun the OCR step first or pass --results-dir.")]
    ResultsDirNotFound { path: PathBuf },

    /// The OCR results directory exists but could not be listed.
    #[error("Failed to list OCR results in '{path}': {source}")]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single text block could not be read.
    #[error("Failed to read '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Dispatch errors ───────────────────────────────────────────────────
    /// The board hint did not normalise to any supported dialect.
    #[error("No extractor for board '{hint}'\nSupported boards: CBSE, ICSE, Uttarakhand.")]
    UnknownBoard { hint: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create the output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write an output JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be encoded as JSON.
    #[error("Failed to serialise record: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single document in a batch.
///
/// The batch continues with the remaining documents.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// One of `X_info.txt` / `X_marks.txt` is missing. Counted as a skip.
    #[error("{document}: missing input file '{path}'")]
    MissingInput { document: String, path: PathBuf },

    /// An input file exists but could not be read as UTF-8 text.
    #[error("{document}: failed to read input: {detail}")]
    ReadFailed { document: String, detail: String },

    /// The board hint for this document maps to no extractor.
    #[error("{document}: no extractor for board '{}'", hint.as_deref().unwrap_or("<none>"))]
    UnknownBoard {
        document: String,
        hint: Option<String>,
    },

    /// The record was extracted but could not be written.
    #[error("{document}: failed to write output: {detail}")]
    WriteFailed { document: String, detail: String },
}

impl DocumentError {
    /// `true` when the document was skipped rather than failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, DocumentError::MissingInput { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_board_display() {
        let e = MarksheetError::UnknownBoard {
            hint: "State Board of Kerala".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("State Board of Kerala"), "got: {msg}");
        assert!(msg.contains("CBSE"));
    }

    #[test]
    fn results_dir_display() {
        let e = MarksheetError::ResultsDirNotFound {
            path: PathBuf::from("data/output/ocr_results"),
        };
        assert!(e.to_string().contains("data/output/ocr_results"));
    }

    #[test]
    fn document_unknown_board_without_hint() {
        let e = DocumentError::UnknownBoard {
            document: "scan_07".into(),
            hint: None,
        };
        let msg = e.to_string();
        assert!(msg.contains("scan_07"));
        assert!(msg.contains("<none>"));
    }

    #[test]
    fn missing_input_is_skip() {
        let skip = DocumentError::MissingInput {
            document: "a".into(),
            path: PathBuf::from("a_marks.txt"),
        };
        let fail = DocumentError::ReadFailed {
            document: "a".into(),
            detail: "invalid UTF-8".into(),
        };
        assert!(skip.is_skip());
        assert!(!fail.is_skip());
    }

    #[test]
    fn document_error_serialises() {
        let e = DocumentError::WriteFailed {
            document: "b".into(),
            detail: "disk full".into(),
        };
        let json = serde_json::to_string(&e).expect("serialise");
        assert!(json.contains("WriteFailed"));
        assert!(json.contains("disk full"));
    }
}
