//! Streaming batch API: emit documents as they complete.
//!
//! Unlike the eager [`crate::batch::run_batch`], which returns only after
//! every document finishes and sorts the results, [`batch_stream`] yields
//! each [`DocumentResult`] as soon as it is ready. Documents arrive in
//! completion order; sort by `name` if order matters.

use crate::batch::{prepare, process_document};
use crate::config::BatchConfig;
use crate::error::MarksheetError;
use crate::output::DocumentResult;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-document results.
pub type DocumentStream = Pin<Box<dyn Stream<Item = DocumentResult> + Send>>;

/// Extract every selected document, streaming results as they are ready.
///
/// Discovery and output-directory creation happen before this returns, so
/// fatal errors surface here rather than inside the stream. Per-document
/// problems are carried in [`DocumentResult::error`].
///
/// `on_batch_complete` is not fired; the caller knows when the stream ends.
///
/// # Example
/// ```rust,no_run
/// use marksheet_extract::{batch_stream, BatchConfig};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = BatchConfig::builder().results_dir("ocr_results").build()?;
/// let mut docs = batch_stream(&config).await?;
/// while let Some(doc) = docs.next().await {
///     match doc.error {
///         None => println!("{}: ok", doc.name),
///         Some(e) => eprintln!("{e}"),
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub async fn batch_stream(config: &BatchConfig) -> Result<DocumentStream, MarksheetError> {
    let names = prepare(config).await?;
    let total = names.len();
    info!(documents = total, "streaming batch");

    let concurrency = config.concurrency;
    let config = Arc::new(config.clone());

    let s = stream::iter(names.into_iter().map(move |name| {
        let cfg = Arc::clone(&config);
        async move { process_document(&name, &cfg, total).await }
    }))
    .buffer_unordered(concurrency);

    Ok(Box::pin(s))
}
