//! Error types for the pdf2html library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2HtmlError`] — **Fatal**: the conversion cannot proceed at all
//!   (bad input file, wrong password, undecodable page). Returned as
//!   `Err(Pdf2HtmlError)` from every top-level `convert*` function. No
//!   partial result is ever returned alongside it.
//!
//! * [`ElementError`] — **Non-fatal**: a single element (today: an embedded
//!   image) could not be extracted. The normaliser logs it and drops the
//!   element; it never reaches the caller.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2html library.
#[derive(Debug, Error)]
pub enum Pdf2HtmlError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input was read, but is not a PDF.
    #[error("Input is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The document bytes could not be decoded.
    #[error("PDF is corrupt: {detail}")]
    CorruptPdf { detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired,

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF")]
    WrongPassword,

    /// The decoder could not produce geometry for a page.
    #[error("Failed to decode page {page}: {detail}")]
    PageDecodeFailed { page: usize, detail: String },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the binary, install it system-wide, or set\n\
PDFIUM_LIB_PATH=/path/to/libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure extracting one element of a page.
#[derive(Debug, Error)]
pub enum ElementError {
    /// The decoder reported image regions but no page raster to crop from.
    #[error("page {page}: no raster available to crop image from")]
    MissingRaster { page: usize },

    /// The region's bounding box does not intersect the page raster.
    #[error("page {page}: image crop ({x},{y} {width}x{height}px) falls outside the raster")]
    CropOutOfBounds {
        page: usize,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// PNG encoding of the cropped bitmap failed.
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
