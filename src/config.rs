//! Configuration for batch extraction.
//!
//! All batch behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. Single-document calls ([`crate::dispatch`]) take
//! no configuration at all.

use crate::error::MarksheetError;
use crate::pipeline::board::normalize_board;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default location of the OCR step's text blocks.
pub const DEFAULT_RESULTS_DIR: &str = "data/output/ocr_results";

/// Default location for extracted JSON records.
pub const DEFAULT_OUTPUT_DIR: &str = "data/output/final_json";

/// Configuration for a batch run over an OCR results directory.
///
/// # Example
/// ```rust
/// use marksheet_extract::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .results_dir("scans/ocr")
///     .output_dir("scans/json")
///     .board_override("cbse")
///     .concurrency(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.concurrency, 4);
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Directory holding `X_info.txt`, `X_marks.txt` and optional
    /// `X_board.txt`. Default: `data/output/ocr_results`.
    pub results_dir: PathBuf,

    /// Directory that receives `X.json`. Created if missing.
    /// Default: `data/output/final_json`.
    pub output_dir: PathBuf,

    /// Board hint applied to every document, taking precedence over any
    /// per-document `X_board.txt`.
    pub board_override: Option<String>,

    /// Documents processed at once. Default: 8.
    pub concurrency: usize,

    /// Which documents to process. Default: all discovered.
    pub documents: DocumentSelection,

    /// Pretty-print the JSON output. Default: true.
    pub pretty: bool,

    /// Write `X.json` files. When false the batch only extracts and reports.
    /// Default: true.
    pub write_output: bool,

    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            board_override: None,
            concurrency: 8,
            documents: DocumentSelection::default(),
            pretty: true,
            write_output: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("results_dir", &self.results_dir)
            .field("output_dir", &self.output_dir)
            .field("board_override", &self.board_override)
            .field("concurrency", &self.concurrency)
            .field("documents", &self.documents)
            .field("pretty", &self.pretty)
            .field("write_output", &self.write_output)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.results_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn board_override(mut self, hint: impl Into<String>) -> Self {
        self.config.board_override = Some(hint.into());
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn documents(mut self, selection: DocumentSelection) -> Self {
        self.config.documents = selection;
        self
    }

    pub fn pretty(mut self, v: bool) -> Self {
        self.config.pretty = v;
        self
    }

    pub fn write_output(mut self, v: bool) -> Self {
        self.config.write_output = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, MarksheetError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(MarksheetError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if let Some(ref hint) = c.board_override {
            if !normalize_board(Some(hint)).is_known() {
                return Err(MarksheetError::InvalidConfig(format!(
                    "Board override '{hint}' matches no supported board (CBSE, ICSE, Uttarakhand)"
                )));
            }
        }
        if let DocumentSelection::Named(names) = &c.documents {
            if names.is_empty() {
                return Err(MarksheetError::InvalidConfig(
                    "Document selection is empty".into(),
                ));
            }
            if let Some(bad) = names
                .iter()
                .find(|n| n.trim().is_empty() || n.contains(['/', '\\']))
            {
                return Err(MarksheetError::InvalidConfig(format!(
                    "Invalid document name '{bad}': expected a bare name such as 'scan_01'"
                )));
            }
        }
        Ok(self.config)
    }
}

/// Which documents of the results directory a batch processes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentSelection {
    /// Every document discovered in the results directory (default).
    #[default]
    All,
    /// Only these document names, e.g. `scan_01` for `scan_01_info.txt`.
    Named(Vec<String>),
}

impl DocumentSelection {
    /// Narrow the discovered names to this selection, sorted and deduplicated.
    ///
    /// Named documents that were not discovered are kept, so the batch can
    /// report their missing inputs.
    pub fn apply(&self, discovered: Vec<String>) -> Vec<String> {
        let mut names = match self {
            DocumentSelection::All => discovered,
            DocumentSelection::Named(names) => names.clone(),
        };
        names.sort_unstable();
        names.dedup();
        names
    }
}
