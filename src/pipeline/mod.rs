//! Pipeline stages for PDF-to-HTML conversion.
//!
//! Each submodule implements exactly one transformation step. Only
//! [`pdfium`] knows which PDF library is in use; every other stage works on
//! the [`decode`] contract types, so they are testable without a PDF.
//!
//! ## Data Flow
//!
//! ```text
//!                                  ┌──▶ chapters ──┐
//! input ──▶ pdfium ──▶ normalize ──┤               ├──▶ convert (result)
//! (bytes)   (decode)   (+ encode)  └──▶ render ────┘
//! ```
//!
//! 1. [`input`]     — read the user-supplied path and check it is a PDF
//! 2. [`pdfium`]    — the [`decode::PdfDecoder`] implementation
//! 3. [`normalize`] — raw geometry → [`crate::model::PageModel`]; image
//!    crops go through [`encode`]
//! 4. [`chapters`]  — per-page chapter state transitions
//! 5. [`render`]    — page model → positioned markup

pub mod chapters;
pub mod decode;
pub mod encode;
pub mod input;
pub mod normalize;
pub mod pdfium;
pub mod render;
