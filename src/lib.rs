//! # pdf2html
//!
//! Convert PDF documents to absolutely-positioned HTML, with a chapter
//! outline taken from the document's table of contents or inferred from its
//! typography.
//!
//! Every page becomes one `relative` container holding `absolute` children
//! for background shapes, text runs and images, placed at their source
//! coordinates (points converted to CSS pixels). Nothing is reflowed.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Decode     page geometry, outline (pdfium)
//!  ├─ 2. Normalise  text spans, shapes (+ shadow detection), cropped images
//!  ├─ 3. Chapters   outline, or heuristic fold over pages
//!  ├─ 4. Render     Tailwind-styled positioned markup per page
//!  └─ 5. Output     pages + total page count + chapters
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2html::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let result = convert("document.pdf", &config).await?;
//!     for chapter in &result.chapters {
//!         println!("{} (p. {})", chapter.title, chapter.start_page);
//!     }
//!     println!("{}", result.pages[0].html);
//!     Ok(())
//! }
//! ```
//!
//! ## Bring your own decoder
//!
//! The pipeline depends only on [`PdfDecoder`]. Implement it over any PDF
//! library (or an in-memory fixture) and call [`convert_document`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2html` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod units;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_bytes, convert_document, convert_sync, convert_to_file, inspect};
pub use error::{ElementError, Pdf2HtmlError};
pub use model::{BackgroundShape, ImageBlock, PageModel, Rgb, ShapeKind, TextSpan};
pub use output::{DocumentMetadata, DocumentResult, RenderedPage};
pub use pipeline::chapters::{ChapterDetection, ChapterRecord, ChapterStrategy};
pub use pipeline::decode::{
    OutlineEntry, PageRaster, PdfDecoder, RawColor, RawImageRegion, RawPageContent, RawPath,
    RawTextRun, Rect,
};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use units::to_pixels;
