//! Normalised per-page content model.
//!
//! A [`PageModel`] is what the normaliser produces from raw decoder output
//! and what the layout renderer and chapter inferencer consume. All geometry
//! is in PDF points with a top-left origin; conversion to pixels happens only
//! when markup is emitted.

use serde::{Deserialize, Serialize};

/// Darkest channel value (exclusive) that still counts as a shadow colour.
pub const SHADOW_MAX_CHANNEL: u8 = 100;

/// Minimum width and height (exclusive, points) for a dark shape to be a shadow.
pub const SHADOW_MIN_SIZE_PT: f64 = 30.0;

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS `rgb(r,g,b)` notation.
    pub fn css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// One positioned run of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub font_name: String,
    pub color: Rgb,
}

/// How a filled vector shape is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Shape,
    Shadow,
}

impl ShapeKind {
    /// Classify a filled shape by darkness and size.
    ///
    /// A shape is a shadow when every channel is below
    /// [`SHADOW_MAX_CHANNEL`] and both sides exceed [`SHADOW_MIN_SIZE_PT`].
    /// The source format carries no such marker; this is purely visual.
    pub fn classify(color: Rgb, width: f64, height: f64) -> Self {
        let dark = color.r < SHADOW_MAX_CHANNEL
            && color.g < SHADOW_MAX_CHANNEL
            && color.b < SHADOW_MAX_CHANNEL;
        if dark && width > SHADOW_MIN_SIZE_PT && height > SHADOW_MIN_SIZE_PT {
            ShapeKind::Shadow
        } else {
            ShapeKind::Shape
        }
    }
}

/// A filled vector path reduced to its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Rgb,
    pub kind: ShapeKind,
}

/// An embedded raster image, already cropped and encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// `data:image/png;base64,…` URI, embeddable as an `<img src>`.
    pub bitmap_payload: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Everything the renderer needs to draw one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageModel {
    pub width_pt: f64,
    pub height_pt: f64,
    /// Source reading order.
    pub text_spans: Vec<TextSpan>,
    /// Source emission order.
    pub shapes: Vec<BackgroundShape>,
    /// Source emission order.
    pub images: Vec<ImageBlock>,
    /// 1-indexed.
    pub page_number: usize,
}
