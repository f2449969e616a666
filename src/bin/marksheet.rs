//! CLI binary for marksheet-extract.
//!
//! A thin shim over the library crate that maps CLI flags to `BatchConfig`
//! (batch mode) or calls `try_dispatch` directly (single-document mode).

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use marksheet_extract::{
    run_batch, try_dispatch, BatchConfig, BatchOutput, BatchProgressCallback, DocumentSelection,
    MarksheetError, ProgressCallback,
};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per document.
/// Documents complete out of order, so start times are keyed by name.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<String, Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn elapsed(&self, name: &str) -> String {
        let ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(name)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);
        dim(&format!("{ms}ms"))
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Extracting {total} documents…"))
        ));
    }

    fn on_document_start(&self, name: &str, _total: usize) {
        self.start_times
            .lock()
            .unwrap()
            .insert(name.to_string(), Instant::now());
        self.bar.set_message(name.to_string());
    }

    fn on_document_complete(&self, name: &str, _total: usize, subjects: usize) {
        let elapsed = self.elapsed(name);
        self.bar.println(format!(
            "  {} {:<24} {:<14} {}",
            green("✓"),
            name,
            dim(&format!("{subjects:>2} subjects")),
            elapsed,
        ));
        self.bar.inc(1);
    }

    fn on_document_skipped(&self, name: &str, _total: usize, reason: &str) {
        let elapsed = self.elapsed(name);
        self.bar
            .println(format!("  {} {}  {}", yellow("–"), yellow(reason), elapsed));
        self.bar.inc(1);
    }

    fn on_document_error(&self, name: &str, _total: usize, error: &str) {
        let elapsed = self.elapsed(name);
        let msg = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar
            .println(format!("  {} {}  {}", red("✗"), red(&msg), elapsed));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, extracted: usize) {
        self.bar.finish_and_clear();
        let missed = total.saturating_sub(extracted);
        if missed == 0 {
            eprintln!(
                "{} {} documents extracted",
                green("✔"),
                bold(&extracted.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} documents extracted  ({} skipped or failed)",
                if extracted == 0 { red("✘") } else { cyan("⚠") },
                bold(&extracted.to_string()),
                total,
                red(&missed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract every document in the default results directory
  marksheet

  # Only two documents, forcing the CBSE layout
  marksheet scan_01 scan_07 --board cbse

  # Custom directories, compact JSON
  marksheet --results-dir scans/ocr --output-dir scans/json --compact

  # See what would be extracted without writing anything
  marksheet --dry-run --json > summary.json

  # One document from explicit files, record printed to stdout
  marksheet --info a_info.txt --marks a_marks.txt --board icse

INPUT LAYOUT:
  <results-dir>/X_info.txt    identity block OCR text
  <results-dir>/X_marks.txt   marks table OCR text
  <results-dir>/X_board.txt   optional board hint (ignored when --board is set)
  → <output-dir>/X.json

SUPPORTED BOARDS (--board accepts any text containing one of these):
  CBSE          cbse, central board of secondary education
  ICSE          icse, cisce, indian school certificate
  UTTARAKHAND   uttarakhand, ubse, uk

ENVIRONMENT VARIABLES:
  RUST_LOG                 Override log filter (e.g. marksheet_extract=debug)
  MARKSHEET_RESULTS_DIR    Default for --results-dir
  MARKSHEET_OUTPUT_DIR     Default for --output-dir
  MARKSHEET_BOARD          Default for --board
"#;

/// Extract structured student records from OCR'd marksheets.
#[derive(Parser, Debug)]
#[command(
    name = "marksheet",
    version,
    about = "Extract structured student records from OCR'd marksheets",
    long_about = "Turn the OCR text of academic marksheets (CBSE, ICSE, Uttarakhand) into \
uniform JSON records. Batch mode walks an OCR results directory; single mode reads one \
information/marks pair and prints the record.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document names to process (e.g. scan_01). Default: every document found.
    documents: Vec<String>,

    /// Directory holding X_info.txt / X_marks.txt / X_board.txt.
    #[arg(long, env = "MARKSHEET_RESULTS_DIR", default_value = marksheet_extract::config::DEFAULT_RESULTS_DIR)]
    results_dir: PathBuf,

    /// Directory that receives X.json (created if missing).
    #[arg(long, env = "MARKSHEET_OUTPUT_DIR", default_value = marksheet_extract::config::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Board for every document; overrides X_board.txt.
    #[arg(short, long, env = "MARKSHEET_BOARD")]
    board: Option<String>,

    /// Documents processed at once.
    #[arg(short, long, env = "MARKSHEET_CONCURRENCY", default_value_t = 8)]
    concurrency: usize,

    /// Write single-line JSON instead of pretty-printed.
    #[arg(long, env = "MARKSHEET_COMPACT")]
    compact: bool,

    /// Extract and report only; write no files.
    #[arg(long)]
    dry_run: bool,

    /// Print the batch result (records, errors, stats) as JSON to stdout.
    #[arg(long, env = "MARKSHEET_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "MARKSHEET_NO_PROGRESS")]
    no_progress: bool,

    /// Single mode: information block file.
    #[arg(long, requires_all = ["marks", "board"], conflicts_with = "documents")]
    info: Option<PathBuf>,

    /// Single mode: marks block file.
    #[arg(long, requires = "info")]
    marks: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MARKSHEET_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MARKSHEET_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let single = cli.info.is_some();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !single && !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let (Some(info), Some(marks)) = (&cli.info, &cli.marks) {
        return extract_single(info, marks, cli.board.as_deref(), !cli.compact).await;
    }

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    let output = run_batch(&config).await.context("Batch extraction failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet && !show_progress {
        print_summary(&output);
    }

    if output.stats.total_documents > 0 && output.stats.extracted == 0 {
        anyhow::bail!(
            "No document could be extracted ({} skipped, {} failed)",
            output.stats.skipped,
            output.stats.failed
        );
    }
    Ok(())
}

/// Single-document mode: print the record to stdout.
async fn extract_single(
    info: &Path,
    marks: &Path,
    board: Option<&str>,
    pretty: bool,
) -> Result<()> {
    let read = |path: &Path| {
        let path = path.to_path_buf();
        async move {
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| MarksheetError::InputReadFailed { path, source })
        }
    };
    let info_text = read(info).await.context("Failed to read information block")?;
    let marks_text = read(marks).await.context("Failed to read marks block")?;

    let record = try_dispatch(board, &info_text, &marks_text)?;
    let json = if pretty {
        serde_json::to_string_pretty(&record)
    } else {
        serde_json::to_string(&record)
    }
    .context("Failed to serialise record")?;
    println!("{json}");
    Ok(())
}

/// Map CLI args to `BatchConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<BatchConfig> {
    let documents = if cli.documents.is_empty() {
        DocumentSelection::All
    } else {
        DocumentSelection::Named(cli.documents.clone())
    };

    let mut builder = BatchConfig::builder()
        .results_dir(&cli.results_dir)
        .output_dir(&cli.output_dir)
        .concurrency(cli.concurrency)
        .documents(documents)
        .pretty(!cli.compact)
        .write_output(!cli.dry_run);

    if let Some(ref board) = cli.board {
        builder = builder.board_override(board);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Plain per-document summary, used when the progress bar is off.
fn print_summary(output: &BatchOutput) {
    for doc in &output.documents {
        match (&doc.error, &doc.output_path) {
            (Some(e), _) if e.is_skip() => eprintln!("  {} {e}", yellow("–")),
            (Some(e), _) => eprintln!("  {} {e}", red("✗")),
            (None, Some(path)) => eprintln!("  {} {} → {}", green("✓"), doc.name, path.display()),
            (None, None) => eprintln!("  {} {}", green("✓"), doc.name),
        }
    }
    let s = &output.stats;
    eprintln!(
        "Extracted {}/{} documents ({} skipped, {} failed, {} subjects) in {}ms",
        s.extracted, s.total_documents, s.skipped, s.failed, s.total_subjects, s.total_duration_ms
    );
}
