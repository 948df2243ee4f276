//! Layout rendering: [`PageModel`] → absolutely-positioned HTML.
//!
//! Output is Tailwind-flavoured markup: one `relative` container per page
//! and one `absolute` child per element, positioned in CSS pixels from the
//! container's top-left corner. Rendering is a pure function of its inputs,
//! so the same page always renders to the same string.
//!
//! ## Stacking
//!
//! ```text
//! z-index 2   images
//! z-index 1   text
//! z-index 0   shapes, shadows, cover decoration
//! ```
//!
//! Passes run in the same bottom-to-top order, so document order agrees
//! with the explicit z-index.

use crate::model::{BackgroundShape, ImageBlock, PageModel, Rgb, ShapeKind, TextSpan};
use crate::units::to_pixels;

/// Channels at or below this value are near-black.
pub const NEAR_BLACK_MAX: u8 = 40;

/// Channels at or above this value are near-white.
pub const NEAR_WHITE_MIN: u8 = 225;

/// Text larger than this (pixels, exclusive) gets the gradient treatment.
pub const GRADIENT_MIN_FONT_PX: f64 = 53.0;

const CONTAINER_CLASS: &str =
    "relative bg-white dark:bg-gray-900 border shadow-md rounded-md overflow-hidden";
const TEXT_BASE_CLASS: &str = "absolute whitespace-pre font-sans";
const SEMANTIC_TEXT_CLASS: &str = "text-black dark:text-white";
const GRADIENT_TEXT_CLASS: &str =
    "bg-gradient-to-r from-blue-500 via-purple-500 to-pink-500 text-transparent bg-clip-text font-bold";
const SHAPE_CLASS: &str = "absolute rounded-md";
const SHADOW_CLASS: &str = "absolute rounded-md shadow-lg";

const Z_SHAPES: u8 = 0;
const Z_TEXT: u8 = 1;
const Z_IMAGES: u8 = 2;

const COVER_DECORATION: &str = r##"<svg class="absolute" style="bottom: 0; right: 0; width: 50%; height: 50%; z-index: 0;" viewBox="0 0 100 100" preserveAspectRatio="none">
  <defs>
    <linearGradient id="coverGradient" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" stop-color="#2196F3" />
      <stop offset="100%" stop-color="#9C27B0" />
    </linearGradient>
  </defs>
  <path d="M0,100 Q50,0 100,100 Z" fill="url(#coverGradient)" />
</svg>"##;

/// Presentation switches that do not affect positioning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Draw a gradient wave in the bottom-right corner of page 1.
    pub cover_decoration: bool,
}

/// How a span's colour is expressed in the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    /// Near-black or near-white: a theme-aware class that flips in dark mode.
    Semantic,
    /// Anything else: the literal colour inline.
    Literal(Rgb),
}

impl TextColor {
    pub fn classify(c: Rgb) -> Self {
        if is_near_black(c) || is_near_white(c) {
            TextColor::Semantic
        } else {
            TextColor::Literal(c)
        }
    }
}

pub fn is_near_black(c: Rgb) -> bool {
    c.r <= NEAR_BLACK_MAX && c.g <= NEAR_BLACK_MAX && c.b <= NEAR_BLACK_MAX
}

pub fn is_near_white(c: Rgb) -> bool {
    c.r >= NEAR_WHITE_MIN && c.g >= NEAR_WHITE_MIN && c.b >= NEAR_WHITE_MIN
}

/// Render one page to markup.
pub fn render_page(page: &PageModel, page_number: usize, options: &RenderOptions) -> String {
    let mut parts = Vec::with_capacity(
        2 + page.shapes.len() + page.text_spans.len() + page.images.len(),
    );

    parts.push(format!(
        "<div class='{CONTAINER_CLASS}' style='width:{}px; height:{}px;'>",
        to_pixels(page.width_pt),
        to_pixels(page.height_pt)
    ));

    if options.cover_decoration && page_number == 1 {
        parts.push(COVER_DECORATION.to_string());
    }

    parts.extend(page.shapes.iter().map(render_shape));
    parts.extend(page.text_spans.iter().map(render_text));
    parts.extend(page.images.iter().map(render_image));

    parts.push("</div>".to_string());
    parts.join("\n")
}

fn render_shape(shape: &BackgroundShape) -> String {
    let geometry = box_style(shape.x, shape.y, shape.width, shape.height);
    match shape.kind {
        ShapeKind::Shadow => format!(
            "<div class='{SHADOW_CLASS}' style='{geometry} z-index:{Z_SHAPES};'></div>"
        ),
        ShapeKind::Shape => format!(
            "<div class='{SHAPE_CLASS}' style='{geometry} background-color:{}; z-index:{Z_SHAPES};'></div>",
            shape.color.css()
        ),
    }
}

fn render_text(span: &TextSpan) -> String {
    let font_size = to_pixels(span.font_size);
    let gradient = font_size > GRADIENT_MIN_FONT_PX;

    let mut class = String::from(TEXT_BASE_CLASS);
    let mut style = format!(
        "left:{}px; top:{}px; font-size:{}px; font-family:{}; z-index:{Z_TEXT};",
        to_pixels(span.x),
        to_pixels(span.y),
        font_size,
        sanitize_font_family(&span.font_name)
    );

    if gradient {
        class.push(' ');
        class.push_str(GRADIENT_TEXT_CLASS);
    } else {
        match TextColor::classify(span.color) {
            TextColor::Semantic => {
                class.push(' ');
                class.push_str(SEMANTIC_TEXT_CLASS);
            }
            TextColor::Literal(c) => {
                style.push_str(&format!(" color:{};", c.css()));
            }
        }
    }

    format!(
        "<div class='{class}' style='{style}'>{}</div>",
        escape_text(&span.text)
    )
}

fn render_image(image: &ImageBlock) -> String {
    format!(
        "<img src='{}' class='absolute' style='{} z-index:{Z_IMAGES};' />",
        image.bitmap_payload,
        box_style(image.x, image.y, image.width, image.height)
    )
}

fn box_style(x: f64, y: f64, width: f64, height: f64) -> String {
    format!(
        "left:{}px; top:{}px; width:{}px; height:{}px;",
        to_pixels(x),
        to_pixels(y),
        to_pixels(width),
        to_pixels(height)
    )
}

/// Escape the three characters that would otherwise be read as markup.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Keep font names from breaking out of the single-quoted style attribute.
fn sanitize_font_family(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '+' | ',' | '.'))
        .collect();
    if cleaned.trim().is_empty() {
        "sans-serif".to_string()
    } else {
        cleaned
    }
}
