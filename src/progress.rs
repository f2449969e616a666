//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive events
//! as the batch driver works through a results directory.
//!
//! # Example
//!
//! ```rust
//! use marksheet_extract::{BatchConfig, BatchProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, name: &str, total: usize, subjects: usize) {
//!         let done = self.written.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("{name}: {subjects} subjects ({done}/{total})");
//!     }
//! }
//!
//! let config = BatchConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { written: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the batch driver as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
///
/// # Thread safety
///
/// Documents are processed concurrently, so the per-document methods may be
/// called from different tasks at once. Protect shared mutable state with
/// `Mutex` or atomics.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after discovery, before any document is read.
    ///
    /// # Arguments
    /// * `total` — number of documents that will be attempted
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called before a document's text blocks are read.
    fn on_document_start(&self, name: &str, total: usize) {
        let _ = (name, total);
    }

    /// Called when a record was extracted (and written, unless disabled).
    ///
    /// # Arguments
    /// * `name`     — document name, e.g. `scan_01`
    /// * `total`    — documents in the batch
    /// * `subjects` — number of subjects in the extracted record
    fn on_document_complete(&self, name: &str, total: usize, subjects: usize) {
        let _ = (name, total, subjects);
    }

    /// Called when a document is skipped because an input file is missing.
    fn on_document_skipped(&self, name: &str, total: usize, reason: &str) {
        let _ = (name, total, reason);
    }

    /// Called when a document fails (unreadable input, unknown board,
    /// write failure).
    fn on_document_error(&self, name: &str, total: usize, error: &str) {
        let _ = (name, total, error);
    }

    /// Called once after every document has been attempted.
    ///
    /// # Arguments
    /// * `total`     — documents in the batch
    /// * `extracted` — documents that produced a record
    fn on_batch_complete(&self, total: usize, extracted: usize) {
        let _ = (total, extracted);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
