//! # marksheet-extract
//!
//! Recover structured student records from OCR'd academic marksheets.
//!
//! Every examination board prints its certificates in its own undocumented
//! layout, and OCR adds misplaced tokens, missing fields and irregular
//! whitespace on top. This crate turns two blocks of OCR text, an
//! *information* block (name, parents, school, roll number) and a *marks*
//! block (the subject table), into one [`CanonicalRecord`] whose shape is the
//! same for every board.
//!
//! ## Pipeline Overview
//!
//! ```text
//! board hint + info text + marks text
//!  │
//!  ├─ 1. Board     free-form hint → CBSE | ICSE | UTTARAKHAND | UNKNOWN
//!  ├─ 2. Dialect   board-specific extractor selected (UNKNOWN → None)
//!  ├─ 3. Identity  ordered field rules over the info text
//!  ├─ 4. Scan      two-state scanner isolates the subject table
//!  ├─ 5. Rows      ordered row patterns, placeholder policy, dedup
//!  └─ 6. Record    CanonicalRecord (serde, JSON)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use marksheet_extract::dispatch;
//!
//! let info = "Name ANANYA ROY\nof LA MARTINIERE FOR GIRLS\nUnique ID 7412589\n";
//! let marks = "SUBJECTS\nMATHEMATICS 089 89 EIGHT NINE\n";
//!
//! let record = dispatch(Some("ICSE"), info, marks).expect("ICSE is supported");
//! let maths = record.subject("MATHEMATICS").unwrap();
//! assert_eq!(maths.marks(), Some(89));
//! assert_eq!(maths.marks_in_words(), Some("EIGHT NINE"));
//! ```
//!
//! For a whole directory of OCR output, see [`run_batch`] and
//! [`batch_stream`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `marksheet` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! marksheet-extract = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod dialect;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod record;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{discover_documents, process_document, run_batch, run_batch_sync, write_record};
pub use config::{BatchConfig, BatchConfigBuilder, DocumentSelection};
pub use dialect::DialectExtractor;
pub use dispatch::{dispatch, try_dispatch};
pub use error::{DocumentError, MarksheetError};
pub use output::{BatchOutput, BatchStats, DocumentResult};
pub use pipeline::board::normalize_board;
pub use pipeline::text::{digits_to_words, normalize, words_to_digits};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use record::{Board, CanonicalRecord, SubjectRecord};
pub use stream::{batch_stream, DocumentStream};
