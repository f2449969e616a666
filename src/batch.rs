//! Eager batch extraction over an OCR results directory.
//!
//! The OCR step leaves two text blocks per document in one directory:
//!
//! ```text
//! ocr_results/
//!   scan_01_info.txt    identity region
//!   scan_01_marks.txt   results table
//!   scan_01_board.txt   optional board hint from the logo classifier
//! ```
//!
//! [`run_batch`] extracts every document and writes `scan_01.json` into the
//! output directory. Use [`crate::stream::batch_stream`] instead to receive
//! results as each document finishes.

use crate::config::BatchConfig;
use crate::dispatch::dispatch;
use crate::error::{DocumentError, MarksheetError};
use crate::output::{BatchOutput, BatchStats, DocumentResult};
use crate::pipeline::board::normalize_board;
use crate::record::CanonicalRecord;
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

const INFO_SUFFIX: &str = "_info.txt";
const MARKS_SUFFIX: &str = "_marks.txt";
const BOARD_SUFFIX: &str = "_board.txt";

/// Input and output locations for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
    pub info: PathBuf,
    pub marks: PathBuf,
    pub board: PathBuf,
    pub output: PathBuf,
}

impl DocumentPaths {
    pub fn new(config: &BatchConfig, name: &str) -> Self {
        let dir = &config.results_dir;
        Self {
            info: dir.join(format!("{name}{INFO_SUFFIX}")),
            marks: dir.join(format!("{name}{MARKS_SUFFIX}")),
            board: dir.join(format!("{name}{BOARD_SUFFIX}")),
            output: config.output_dir.join(format!("{name}.json")),
        }
    }
}

/// List document names in `results_dir`, sorted.
///
/// A name is included when either of its text blocks exists, so a document
/// with only one block is reported as skipped rather than silently ignored.
pub async fn discover_documents(results_dir: &Path) -> Result<Vec<String>, MarksheetError> {
    if !tokio::fs::metadata(results_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        return Err(MarksheetError::ResultsDirNotFound {
            path: results_dir.to_path_buf(),
        });
    }

    let read_dir_err = |source: std::io::Error| MarksheetError::ReadDirFailed {
        path: results_dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(results_dir).await.map_err(read_dir_err)?;

    let mut names = BTreeSet::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_dir_err)? {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let stem = file_name
            .strip_suffix(INFO_SUFFIX)
            .or_else(|| file_name.strip_suffix(MARKS_SUFFIX));
        if let Some(stem) = stem.filter(|s| !s.is_empty()) {
            names.insert(stem.to_string());
        }
    }

    debug!(count = names.len(), dir = %results_dir.display(), "discovered documents");
    Ok(names.into_iter().collect())
}

/// Extract every selected document in `config.results_dir`.
///
/// # Returns
/// `Ok(BatchOutput)` even when individual documents were skipped or failed
/// (check `output.stats`). Documents are sorted by name.
///
/// # Errors
/// Only fatal conditions: the results directory is missing or unreadable,
/// or the output directory cannot be created.
pub async fn run_batch(config: &BatchConfig) -> Result<BatchOutput, MarksheetError> {
    let batch_start = Instant::now();
    let names = prepare(config).await?;
    let total = names.len();

    let mut documents: Vec<DocumentResult> = stream::iter(names.iter())
        .map(|name| process_document(name, config, total))
        .buffer_unordered(config.concurrency)
        .collect()
        .await;
    documents.sort_by(|a, b| a.name.cmp(&b.name));

    let stats = BatchStats::from_results(&documents, batch_start.elapsed().as_millis() as u64);
    info!(
        total = stats.total_documents,
        extracted = stats.extracted,
        skipped = stats.skipped,
        failed = stats.failed,
        subjects = stats.total_subjects,
        "batch complete in {}ms",
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, stats.extracted);
    }

    Ok(BatchOutput { documents, stats })
}

/// Synchronous wrapper around [`run_batch`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_batch_sync(config: &BatchConfig) -> Result<BatchOutput, MarksheetError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| MarksheetError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(run_batch(config))
}

/// Discover and select documents, create the output directory and fire
/// `on_batch_start`. Shared with the streaming driver.
pub(crate) async fn prepare(config: &BatchConfig) -> Result<Vec<String>, MarksheetError> {
    let discovered = discover_documents(&config.results_dir).await?;
    let names = config.documents.apply(discovered);
    info!(
        documents = names.len(),
        results_dir = %config.results_dir.display(),
        "starting batch"
    );

    if config.write_output {
        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .map_err(|source| MarksheetError::OutputDirFailed {
                path: config.output_dir.clone(),
                source,
            })?;
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(names.len());
    }
    Ok(names)
}

/// Read, extract and (optionally) write one document.
///
/// Never fails: problems are recorded in [`DocumentResult::error`] and
/// reported to the progress callback.
pub async fn process_document(name: &str, config: &BatchConfig, total: usize) -> DocumentResult {
    let start = Instant::now();
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_start(name, total);
    }

    let result = match extract_document(name, config).await {
        Ok((record, output_path)) => DocumentResult {
            name: name.to_string(),
            board: Some(record.board),
            record: Some(record),
            output_path,
            error: None,
            duration_ms: start.elapsed().as_millis() as u64,
        },
        Err(error) => DocumentResult::failed(name, error, start.elapsed().as_millis() as u64),
    };

    match (&result.error, &config.progress_callback) {
        (None, Some(cb)) => {
            let subjects = result.record.as_ref().map_or(0, |r| r.subjects.len());
            cb.on_document_complete(name, total, subjects);
        }
        (Some(e), cb) if e.is_skip() => {
            warn!(document = name, "skipping: {e}");
            if let Some(cb) = cb {
                cb.on_document_skipped(name, total, &e.to_string());
            }
        }
        (Some(e), cb) => {
            warn!(document = name, "failed: {e}");
            if let Some(cb) = cb {
                cb.on_document_error(name, total, &e.to_string());
            }
        }
        (None, None) => {}
    }

    result
}

async fn extract_document(
    name: &str,
    config: &BatchConfig,
) -> Result<(CanonicalRecord, Option<PathBuf>), DocumentError> {
    let paths = DocumentPaths::new(config, name);
    let info_text = read_block(name, &paths.info).await?;
    let marks_text = read_block(name, &paths.marks).await?;

    let hint = match config.board_override {
        Some(ref hint) => Some(hint.clone()),
        None => read_board_hint(&paths.board).await,
    };
    debug!(document = name, hint = ?hint, board = %normalize_board(hint.as_deref()), "board resolved");

    let record = dispatch(hint.as_deref(), &info_text, &marks_text).ok_or_else(|| {
        DocumentError::UnknownBoard {
            document: name.to_string(),
            hint: hint.clone(),
        }
    })?;

    if !config.write_output {
        return Ok((record, None));
    }

    write_record(&paths.output, &record, config.pretty)
        .await
        .map_err(|e| DocumentError::WriteFailed {
            document: name.to_string(),
            detail: e.to_string(),
        })?;
    debug!(document = name, path = %paths.output.display(), "record written");
    Ok((record, Some(paths.output)))
}

async fn read_block(name: &str, path: &Path) -> Result<String, DocumentError> {
    tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => DocumentError::MissingInput {
            document: name.to_string(),
            path: path.to_path_buf(),
        },
        _ => DocumentError::ReadFailed {
            document: name.to_string(),
            detail: format!("{}: {e}", path.display()),
        },
    })
}

/// The optional board hint file; absent, unreadable or blank means no hint.
async fn read_board_hint(path: &Path) -> Option<String> {
    let text = tokio::fs::read_to_string(path).await.ok()?;
    let hint = text.trim();
    (!hint.is_empty()).then(|| hint.to_string())
}

/// Serialise `record` to `path` as JSON.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn write_record(
    path: &Path,
    record: &CanonicalRecord,
    pretty: bool,
) -> Result<(), MarksheetError> {
    let mut json = if pretty {
        serde_json::to_vec_pretty(record)?
    } else {
        serde_json::to_vec(record)?
    };
    json.push(b'\n');

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, &json)
        .await
        .map_err(|source| MarksheetError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        })?;

    if let Err(source) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(MarksheetError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
