//! Image encoding: `DynamicImage` → base64 PNG data URI.
//!
//! Cropped images are embedded straight into the page markup as
//! `data:image/png;base64,…` so the output never references external files.
//! PNG keeps the crop lossless.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Prefix of every payload produced by [`encode_data_uri`].
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Encode a bitmap as an embeddable PNG data URI.
pub fn encode_data_uri(img: &DynamicImage) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded {}x{} image → {} bytes base64", img.width(), img.height(), b64.len());

    Ok(format!("{PNG_DATA_URI_PREFIX}{b64}"))
}
