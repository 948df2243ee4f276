//! The decoder contract: raw page geometry as a PDF backend reports it.
//!
//! Everything downstream of this module depends only on [`PdfDecoder`] and
//! the `Raw*` types, never on a particular PDF library. The shipped backend
//! lives in [`crate::pipeline::pdfium`]; tests plug in in-memory decoders.
//!
//! All coordinates are PDF points with a **top-left** origin. Backends whose
//! native space is bottom-left (PDFium) flip before handing geometry over.

use crate::error::Pdf2HtmlError;
use crate::model::Rgb;
use image::DynamicImage;

/// Axis-aligned bounding box in points, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self { x0, top, x1, bottom }
    }

    /// Width, clamped to zero for inverted boxes.
    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Height, clamped to zero for inverted boxes.
    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }
}

/// Fill colour as the backend encodes it.
///
/// Backends disagree on colour representation, so each form gets its own
/// decode rule and anything unrecognised decodes to black.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RawColor {
    /// `0xRRGGBB` packed into an integer.
    Packed(u32),
    /// Channels in `0.0..=1.0`.
    Normalized([f32; 3]),
    /// Present but in a form we do not decode (CMYK, pattern, …).
    Unsupported,
    /// No colour reported.
    #[default]
    Missing,
}

impl RawColor {
    /// Decode to 8-bit RGB; unsupported or missing colours become black.
    pub fn decode(self) -> Rgb {
        match self {
            RawColor::Packed(c) => decode_packed(c),
            RawColor::Normalized(rgb) => decode_normalized(rgb),
            RawColor::Unsupported | RawColor::Missing => Rgb::BLACK,
        }
    }
}

fn decode_packed(c: u32) -> Rgb {
    Rgb::new(
        ((c >> 16) & 255) as u8,
        ((c >> 8) & 255) as u8,
        (c & 255) as u8,
    )
}

fn decode_normalized([r, g, b]: [f32; 3]) -> Rgb {
    let channel = |v: f32| {
        if v.is_finite() {
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        } else {
            0
        }
    };
    Rgb::new(channel(r), channel(g), channel(b))
}

/// One text run (a span of uniformly styled text).
#[derive(Debug, Clone, PartialEq)]
pub struct RawTextRun {
    pub text: String,
    pub bbox: Rect,
    pub font_size: f64,
    pub font_name: Option<String>,
    pub color: RawColor,
}

/// One vector path; `fill == None` means the path is stroked only.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPath {
    pub bbox: Rect,
    pub fill: Option<RawColor>,
}

/// Where an embedded raster image sits on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawImageRegion {
    pub bbox: Rect,
}

/// A rendering of the whole page that image regions are cropped from.
#[derive(Debug, Clone)]
pub struct PageRaster {
    pub image: DynamicImage,
    /// Raster pixels per PDF point.
    pub pixels_per_point: f64,
}

/// Everything the decoder reports for one page.
#[derive(Debug, Clone, Default)]
pub struct RawPageContent {
    pub width: f64,
    pub height: f64,
    pub text_runs: Vec<RawTextRun>,
    pub paths: Vec<RawPath>,
    pub images: Vec<RawImageRegion>,
    /// Only needed when `images` is non-empty.
    pub raster: Option<PageRaster>,
}

/// One entry of the document's table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Nesting depth, 1 for top-level entries.
    pub level: u32,
    pub title: String,
    /// 1-indexed page the entry points at.
    pub start_page: usize,
}

/// A decoded document the pipeline can walk page by page.
pub trait PdfDecoder {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Raw geometry for the 0-indexed page `index`.
    fn page(&self, index: usize) -> Result<RawPageContent, Pdf2HtmlError>;

    /// The embedded outline in document order; empty when there is none.
    fn outline(&self) -> Vec<OutlineEntry>;
}
