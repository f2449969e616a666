//! Result types returned by the batch driver.

use crate::error::DocumentError;
use crate::record::{Board, CanonicalRecord};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome for one document of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Document name, e.g. `scan_01` for `scan_01_info.txt`.
    pub name: String,

    /// Board the document was dispatched to, once the hint was resolved.
    pub board: Option<Board>,

    /// The extracted record. `None` when the document was skipped or failed.
    pub record: Option<CanonicalRecord>,

    /// Where the record was written. `None` when output is disabled.
    pub output_path: Option<PathBuf>,

    pub error: Option<DocumentError>,

    /// Wall-clock time spent on this document.
    pub duration_ms: u64,
}

impl DocumentResult {
    pub(crate) fn failed(name: &str, error: DocumentError, duration_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            board: None,
            record: None,
            output_path: None,
            error: Some(error),
            duration_ms,
        }
    }

    /// `true` when a record was extracted.
    pub fn is_extracted(&self) -> bool {
        self.record.is_some() && self.error.is_none()
    }

    /// `true` when an input file was missing.
    pub fn is_skipped(&self) -> bool {
        self.error.as_ref().is_some_and(DocumentError::is_skip)
    }

    /// `true` for any error other than a skip.
    pub fn is_failed(&self) -> bool {
        self.error.as_ref().is_some_and(|e| !e.is_skip())
    }
}

/// Aggregate counters for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_documents: usize,
    pub extracted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Subjects across every extracted record.
    pub total_subjects: usize,
    pub total_duration_ms: u64,
}

impl BatchStats {
    /// Tally `documents`; `total_duration_ms` is the batch's wall-clock time.
    pub fn from_results(documents: &[DocumentResult], total_duration_ms: u64) -> Self {
        Self {
            total_documents: documents.len(),
            extracted: documents.iter().filter(|d| d.is_extracted()).count(),
            skipped: documents.iter().filter(|d| d.is_skipped()).count(),
            failed: documents.iter().filter(|d| d.is_failed()).count(),
            total_subjects: documents
                .iter()
                .filter_map(|d| d.record.as_ref())
                .map(|r| r.subjects.len())
                .sum(),
            total_duration_ms,
        }
    }
}

/// Everything a batch run produced, documents sorted by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutput {
    pub documents: Vec<DocumentResult>,
    pub stats: BatchStats,
}

impl BatchOutput {
    /// Look up a document's result by name.
    pub fn document(&self, name: &str) -> Option<&DocumentResult> {
        self.documents.iter().find(|d| d.name == name)
    }
}
