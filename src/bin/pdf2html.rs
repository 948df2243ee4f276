//! CLI binary for pdf2html.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2html::{
    convert, convert_to_file, inspect, ChapterDetection, ChapterRecord, ConversionConfig,
    ConversionProgressCallback, ProgressCallback,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
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

/// Terminal progress callback: a live progress bar plus one log line per
/// detected chapter.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_conversion_start
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Converting");
    }

    fn on_page_start(&self, page_num: usize, _total_pages: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, _page_num: usize, _total_pages: usize, _html_len: usize) {
        self.bar.inc(1);
    }

    fn on_chapter_detected(&self, chapter: &ChapterRecord) {
        self.bar.println(format!(
            "  {} p.{:<4} {}",
            cyan("§"),
            chapter.start_page,
            chapter.title
        ));
    }

    fn on_conversion_complete(&self, total_pages: usize, chapter_count: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages converted, {} chapters",
            green("✔"),
            bold(&total_pages.to_string()),
            chapter_count
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # JSON result (pages + chapters) to stdout
  pdf2html document.pdf

  # Write the JSON result to a file
  pdf2html document.pdf -o document.json

  # Only the page markup, concatenated
  pdf2html --html-only document.pdf > document.html

  # Ignore the embedded outline and use the legacy title heuristic
  pdf2html --no-outline --chapters legacy handbook.pdf

  # Sharper embedded images
  pdf2html --image-scale 2 brochure.pdf -o brochure.json

  # Inspect PDF metadata only
  pdf2html --inspect-only document.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (otherwise ./ then the system library path)
  RUST_LOG          Override the log filter (e.g. pdf2html=debug)
"#;

/// Convert PDF files to absolutely-positioned HTML with a chapter outline.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2html",
    version,
    about = "Convert PDF files to absolutely-positioned HTML with a chapter outline",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Write the JSON result to this file instead of stdout.
    #[arg(short, long, env = "PDF2HTML_OUTPUT")]
    output: Option<PathBuf>,

    /// Chapter heuristic used when the PDF has no outline.
    #[arg(long, env = "PDF2HTML_CHAPTERS", value_enum, default_value = "heuristic")]
    chapters: ChaptersArg,

    /// Ignore the embedded outline even when present.
    #[arg(long, env = "PDF2HTML_NO_OUTLINE")]
    no_outline: bool,

    /// Do not crop and embed raster images.
    #[arg(long, env = "PDF2HTML_NO_IMAGES")]
    no_images: bool,

    /// Raster pixels per point for embedded images (0.5–4.0).
    #[arg(long, env = "PDF2HTML_IMAGE_SCALE", default_value_t = 1.0)]
    image_scale: f32,

    /// Draw the gradient cover decoration on page 1.
    #[arg(long, env = "PDF2HTML_COVER_DECORATION")]
    cover_decoration: bool,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2HTML_PASSWORD")]
    password: Option<String>,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,

    /// Print only the concatenated page markup instead of JSON.
    #[arg(long, conflicts_with = "output")]
    html_only: bool,

    /// Print PDF metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2HTML_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2HTML_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2HTML_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum ChaptersArg {
    Heuristic,
    Legacy,
}

impl From<ChaptersArg> for ChapterDetection {
    fn from(v: ChaptersArg) -> Self {
        match v {
            ChaptersArg::Heuristic => ChapterDetection::Heuristic,
            ChaptersArg::Legacy => ChapterDetection::Legacy,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; verbose always wins.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.inspect_only;
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

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input, cli.password.as_deref())
            .await
            .context("Failed to inspect PDF")?;

        println!("File:         {}", cli.input.display());
        if let Some(ref t) = meta.title {
            println!("Title:        {}", t);
        }
        if let Some(ref a) = meta.author {
            println!("Author:       {}", a);
        }
        if let Some(ref s) = meta.subject {
            println!("Subject:      {}", s);
        }
        println!("Pages:        {}", meta.page_count);
        println!("PDF Version:  {}", meta.pdf_version);
        println!("Outline:      {}", if meta.has_outline { "yes" } else { "no" });
        if let Some(ref p) = meta.producer {
            println!("Producer:     {}", p);
        }
        if let Some(ref c) = meta.creator {
            println!("Creator:      {}", c);
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let started = Instant::now();
    if let Some(ref output_path) = cli.output {
        let result = convert_to_file(&cli.input, output_path, &config)
            .await
            .context("Conversion failed")?;

        if print_summary(&cli, show_progress) {
            eprintln!(
                "{}  {} pages, {} chapters  {}ms  →  {}",
                green("✔"),
                result.total_pages,
                result.chapters.len(),
                started.elapsed().as_millis(),
                bold(&output_path.display().to_string()),
            );
        }
    } else {
        let result = convert(&cli.input, &config)
            .await
            .context("Conversion failed")?;

        let body = if cli.html_only {
            result.html()
        } else if cli.pretty {
            serde_json::to_string_pretty(&result).context("Failed to serialise output")?
        } else {
            serde_json::to_string(&result).context("Failed to serialise output")?
        };

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(body.as_bytes())
            .context("Failed to write to stdout")?;
        handle.write_all(b"\n").ok();

        if print_summary(&cli, show_progress) {
            eprintln!(
                "{}",
                dim(&format!(
                    "Converted {} pages ({} chapters) in {}ms",
                    result.total_pages,
                    result.chapters.len(),
                    started.elapsed().as_millis()
                ))
            );
        }
    }

    Ok(())
}

/// Whether `main` prints its own completion line. The progress bar already
/// reports completion when it is shown.
fn print_summary(cli: &Cli, show_progress: bool) -> bool {
    !cli.quiet && !show_progress
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .chapter_detection(cli.chapters.clone().into())
        .use_outline(!cli.no_outline)
        .include_images(!cli.no_images)
        .image_scale(cli.image_scale)
        .cover_decoration(cli.cover_decoration);

    if let Some(ref password) = cli.password {
        builder = builder.password(password.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
