//! Page content normalisation: raw decoder geometry → [`PageModel`].
//!
//! Three independent passes, each preserving source order:
//!
//! 1. text runs → [`TextSpan`] with decoded colour
//! 2. filled paths → [`BackgroundShape`] with a shadow/shape classification
//! 3. image regions → cropped, PNG-encoded [`ImageBlock`]
//!
//! Image extraction is the only pass that can fail, and a failure only ever
//! costs that one image. The page itself always normalises.

use crate::error::ElementError;
use crate::model::{BackgroundShape, ImageBlock, PageModel, ShapeKind, TextSpan};
use crate::pipeline::decode::{PageRaster, RawImageRegion, RawPageContent, RawPath, RawTextRun, Rect};
use crate::pipeline::encode;
use image::DynamicImage;
use tracing::{debug, warn};

/// Images at or below this size (points) in either dimension are dropped.
pub const MIN_IMAGE_SIZE_PT: f64 = 1.0;

/// Font name used when the decoder cannot name the font.
const UNKNOWN_FONT: &str = "unknown";

/// Normalise one page of raw geometry.
pub fn normalize(raw: RawPageContent, page_number: usize) -> PageModel {
    let RawPageContent {
        width,
        height,
        text_runs,
        paths,
        images,
        raster,
    } = raw;

    let text_spans: Vec<TextSpan> = text_runs.into_iter().map(text_span).collect();
    let shapes: Vec<BackgroundShape> = paths.iter().filter_map(background_shape).collect();
    let images = extract_images(&images, raster.as_ref(), page_number);

    debug!(
        "Normalised page {}: {} spans, {} shapes, {} images",
        page_number,
        text_spans.len(),
        shapes.len(),
        images.len()
    );

    PageModel {
        width_pt: width,
        height_pt: height,
        text_spans,
        shapes,
        images,
        page_number,
    }
}

fn text_span(run: RawTextRun) -> TextSpan {
    TextSpan {
        x: run.bbox.x0,
        y: run.bbox.top,
        width: run.bbox.width(),
        height: run.bbox.height(),
        font_size: run.font_size.max(0.0),
        font_name: run
            .font_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_FONT.to_string()),
        color: run.color.decode(),
        text: run.text,
    }
}

fn background_shape(path: &RawPath) -> Option<BackgroundShape> {
    let fill = path.fill?;
    let color = fill.decode();
    let (width, height) = (path.bbox.width(), path.bbox.height());
    Some(BackgroundShape {
        x: path.bbox.x0,
        y: path.bbox.top,
        width,
        height,
        color,
        kind: ShapeKind::classify(color, width, height),
    })
}

/// Crop and encode every non-degenerate image region, skipping failures.
fn extract_images(
    regions: &[RawImageRegion],
    raster: Option<&PageRaster>,
    page_number: usize,
) -> Vec<ImageBlock> {
    let mut blocks = Vec::with_capacity(regions.len());

    for region in regions {
        let bbox = region.bbox;
        if is_degenerate(&bbox) {
            continue;
        }

        match image_block(&bbox, raster, page_number) {
            Ok(block) => blocks.push(block),
            Err(e) => warn!("Skipping image on page {}: {}", page_number, e),
        }
    }

    blocks
}

fn is_degenerate(bbox: &Rect) -> bool {
    bbox.width() <= MIN_IMAGE_SIZE_PT || bbox.height() <= MIN_IMAGE_SIZE_PT
}

fn image_block(
    bbox: &Rect,
    raster: Option<&PageRaster>,
    page_number: usize,
) -> Result<ImageBlock, ElementError> {
    let raster = raster.ok_or(ElementError::MissingRaster { page: page_number })?;
    let cropped = crop(raster, bbox, page_number)?;
    let bitmap_payload = encode::encode_data_uri(&cropped)?;

    Ok(ImageBlock {
        bitmap_payload,
        x: bbox.x0,
        y: bbox.top,
        width: bbox.width(),
        height: bbox.height(),
    })
}

/// Cut `bbox` (points) out of the page raster, clipped to the raster edges.
fn crop(raster: &PageRaster, bbox: &Rect, page_number: usize) -> Result<DynamicImage, ElementError> {
    let scale = raster.pixels_per_point;
    let (rw, rh) = (raster.image.width() as f64, raster.image.height() as f64);

    // NaN survives clamp but `as u32` maps it to 0, which the size check rejects.
    let x0 = (bbox.x0 * scale).floor().clamp(0.0, rw) as u32;
    let y0 = (bbox.top * scale).floor().clamp(0.0, rh) as u32;
    let x1 = (bbox.x1 * scale).ceil().clamp(0.0, rw) as u32;
    let y1 = (bbox.bottom * scale).ceil().clamp(0.0, rh) as u32;

    if x1 <= x0 || y1 <= y0 {
        return Err(ElementError::CropOutOfBounds {
            page: page_number,
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        });
    }

    Ok(raster.image.crop_imm(x0, y0, x1 - x0, y1 - y0))
}
