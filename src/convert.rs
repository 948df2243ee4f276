//! Conversion entry points and the page-loop orchestrator.
//!
//! [`convert_document`] is the core: it walks any [`PdfDecoder`] page by
//! page and folds each page through normalise → chapter step → render. The
//! remaining functions are thin wrappers that bind PDFium, read input files,
//! hop onto Tokio's blocking pool, or write the result to disk.
//!
//! ## Why strictly sequential?
//!
//! Heuristic chapter detection compares each page's title with the previous
//! page's and extends the open chapter page by page. Reordering or
//! parallelising pages would corrupt both, so one document is always one
//! in-order loop. Separate documents share nothing and can be converted
//! concurrently.

use crate::config::ConversionConfig;
use crate::error::Pdf2HtmlError;
use crate::output::{DocumentMetadata, DocumentResult, RenderedPage};
use crate::pipeline::chapters::ChapterStrategy;
use crate::pipeline::decode::PdfDecoder;
use crate::pipeline::{input, normalize, pdfium, render};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a decoded document.
///
/// Fails as a whole if any page cannot be decoded; per-image failures are
/// absorbed by the normaliser and never surface here.
pub fn convert_document<D>(decoder: &D, config: &ConversionConfig) -> Result<DocumentResult, Pdf2HtmlError>
where
    D: PdfDecoder + ?Sized,
{
    let total_pages = decoder.page_count();

    let outline = if config.use_outline {
        decoder.outline()
    } else {
        Vec::new()
    };
    let (strategy, mut state) =
        ChapterStrategy::select(outline, config.use_outline, config.chapter_detection);
    info!(
        "Converting {} pages, chapter strategy: {:?}",
        total_pages, strategy
    );

    let callback = config.progress_callback.as_ref();
    if let Some(cb) = callback {
        cb.on_conversion_start(total_pages);
    }

    let render_options = config.render_options();
    let mut pages = Vec::with_capacity(total_pages);

    for index in 0..total_pages {
        let page_num = index + 1;
        if let Some(cb) = callback {
            cb.on_page_start(page_num, total_pages);
        }

        let raw = decoder.page(index)?;
        let model = normalize::normalize(raw, page_num);

        let known = state.chapters().len();
        state = strategy.process_page(state, &model);
        if state.chapters().len() > known {
            if let Some(chapter) = state.current() {
                debug!("Page {}: chapter '{}' opened", page_num, chapter.title);
                if let Some(cb) = callback {
                    cb.on_chapter_detected(chapter);
                }
            }
        }

        let html = render::render_page(&model, page_num, &render_options);
        if let Some(cb) = callback {
            cb.on_page_complete(page_num, total_pages, html.len());
        }

        pages.push(RenderedPage {
            page_number: page_num,
            html,
        });
    }

    let chapters = state.into_chapters();
    if let Some(cb) = callback {
        cb.on_conversion_complete(total_pages, chapters.len());
    }

    Ok(DocumentResult {
        pages,
        total_pages,
        chapters,
    })
}

/// Convert PDF bytes already in memory.
///
/// Synchronous and CPU-bound; call it from a blocking context.
pub fn convert_bytes(bytes: &[u8], config: &ConversionConfig) -> Result<DocumentResult, Pdf2HtmlError> {
    config.validate()?;
    let pdfium = pdfium::bind_pdfium()?;
    let document = pdfium::open_document(&pdfium, bytes, config.password.as_deref())?;
    let decoder = pdfium::PdfiumDecoder::new(document, config.image_scale, config.include_images);
    convert_document(&decoder, config)
}

/// Convert a PDF file to positioned HTML.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Returns `Err(Pdf2HtmlError)` for any fatal error: unreadable input, not a
/// PDF, wrong password, or a page that cannot be decoded. No partial result
/// is returned.
pub async fn convert(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<DocumentResult, Pdf2HtmlError> {
    config.validate()?;
    let start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting conversion: {}", input_path.display());

    let bytes = input::read_input(input_path).await?;
    let config = config.clone();

    let result = tokio::task::spawn_blocking(move || convert_bytes(&bytes, &config))
        .await
        .map_err(|e| Pdf2HtmlError::Internal(format!("Conversion task panicked: {}", e)))??;

    info!(
        "Conversion complete: {} pages, {} chapters, {}ms",
        result.total_pages,
        result.chapters.len(),
        start.elapsed().as_millis()
    );
    Ok(result)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<DocumentResult, Pdf2HtmlError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2HtmlError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input_path, config))
}

/// Convert a PDF and write the JSON result to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<DocumentResult, Pdf2HtmlError> {
    let result = convert(input_path, config).await?;
    let json = serde_json::to_vec_pretty(&result)
        .map_err(|e| Pdf2HtmlError::Internal(format!("Failed to serialise result: {}", e)))?;
    write_atomic(output_path.as_ref(), &json).await?;
    Ok(result)
}

/// Extract PDF metadata without converting content.
pub async fn inspect(
    input_path: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<DocumentMetadata, Pdf2HtmlError> {
    let bytes = input::read_input(input_path).await?;
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        let pdfium = pdfium::bind_pdfium()?;
        let document = pdfium::open_document(&pdfium, &bytes, password.as_deref())?;
        let meta = pdfium::PdfiumDecoder::new(document, 1.0, false).metadata();
        Ok(meta)
    })
    .await
    .map_err(|e| Pdf2HtmlError::Internal(format!("Metadata task panicked: {}", e)))?
}

pub(crate) async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), Pdf2HtmlError> {
    let write_err = |source| Pdf2HtmlError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, contents).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_atomic_creates_parents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out.json");
        write_atomic(&target, b"{}").await.unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"{}");
        assert!(!dir.path().join("nested/out.json.tmp").exists());
    }

    #[tokio::test]
    async fn convert_reports_missing_input() {
        let err = convert("/no/such/file.pdf", &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2HtmlError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn inspect_rejects_non_pdf_input() {
        use std::io::Write;
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"GIF89a not a pdf").unwrap();

        let err = inspect(tmp.path(), None).await.unwrap_err();
        assert!(matches!(err, Pdf2HtmlError::NotAPdf { .. }), "got {err:?}");
    }

    #[test]
    fn convert_bytes_validates_hand_built_config() {
        let config = ConversionConfig {
            image_scale: 9.0,
            ..ConversionConfig::default()
        };
        let err = convert_bytes(b"%PDF-1.4\n", &config).unwrap_err();
        assert!(matches!(err, Pdf2HtmlError::InvalidConfig(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn convert_validates_before_reading_input() {
        let config = ConversionConfig {
            image_scale: 0.1,
            ..ConversionConfig::default()
        };
        let err = convert("/no/such/file.pdf", &config).await.unwrap_err();
        assert!(matches!(err, Pdf2HtmlError::InvalidConfig(_)), "got {err:?}");
    }
}
