//! PDFium-backed [`PdfDecoder`].
//!
//! ## Coordinate flip
//!
//! PDFium reports object bounds in page space with a bottom-left origin.
//! Everything downstream expects top-left, so every box is flipped against
//! the page height here, once, before it leaves this module.
//!
//! ## Why rasterise at all?
//!
//! Embedded images can be stored in any colour space, with masks, decode
//! arrays and transforms applied on top. Rendering the page and cropping the
//! image's box gives exactly what a viewer would show, so a page is only
//! rendered when it actually contains image objects.
//!
//! ## Threading
//!
//! pdfium keeps thread-local state and is not async-safe. The async entry
//! points in [`crate::convert`] run everything in this module inside
//! `spawn_blocking`.

use crate::error::Pdf2HtmlError;
use crate::output::DocumentMetadata;
use crate::pipeline::decode::{
    OutlineEntry, PageRaster, PdfDecoder, RawColor, RawImageRegion, RawPageContent, RawPath,
    RawTextRun, Rect,
};
use pdfium_render::prelude::*;
use tracing::{debug, info, warn};

/// Upper bound on outline entries walked, guarding against cyclic outlines.
const MAX_OUTLINE_ENTRIES: usize = 10_000;

/// Deepest form XObject nesting followed when collecting page objects.
const MAX_FORM_DEPTH: usize = 16;

/// Bind to a pdfium library.
///
/// Search order: `PDFIUM_LIB_PATH`, the working directory, then the system
/// library path.
pub fn bind_pdfium() -> Result<Pdfium, Pdf2HtmlError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(path) if !path.is_empty() => Pdfium::bind_to_library(&path),
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| Pdf2HtmlError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Load a document from memory, mapping pdfium's errors onto ours.
pub fn open_document<'a>(
    pdfium: &'a Pdfium,
    bytes: &'a [u8],
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, Pdf2HtmlError> {
    pdfium.load_pdf_from_byte_slice(bytes, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                Pdf2HtmlError::WrongPassword
            } else {
                Pdf2HtmlError::PasswordRequired
            }
        } else {
            Pdf2HtmlError::CorruptPdf { detail: err_str }
        }
    })
}

/// A loaded document walked through pdfium.
pub struct PdfiumDecoder<'a> {
    document: PdfDocument<'a>,
    /// Raster pixels per point for image crops.
    image_scale: f32,
    include_images: bool,
}

impl<'a> PdfiumDecoder<'a> {
    pub fn new(document: PdfDocument<'a>, image_scale: f32, include_images: bool) -> Self {
        let decoder = Self {
            document,
            image_scale,
            include_images,
        };
        info!("PDF loaded: {} pages", decoder.page_count());
        decoder
    }

    /// Document-level metadata, without touching page content.
    pub fn metadata(&self) -> DocumentMetadata {
        let metadata = self.document.metadata();

        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata.get(tag).and_then(|t| {
                let v = t.value().to_string();
                if v.is_empty() {
                    None
                } else {
                    Some(v)
                }
            })
        };

        DocumentMetadata {
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            subject: get_meta(PdfDocumentMetadataTagType::Subject),
            creator: get_meta(PdfDocumentMetadataTagType::Creator),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            page_count: self.page_count(),
            pdf_version: format!("{:?}", self.document.version()),
            has_outline: self.document.bookmarks().root().is_some(),
        }
    }

    /// Dispatch page objects into `content`, descending into form XObjects.
    ///
    /// Children of a form report bounds in the form's own space, so
    /// `transform` carries the accumulated form matrices down to page space.
    fn collect_objects(
        &self,
        objects: Vec<PdfPageObject<'_>>,
        transform: Affine,
        depth: usize,
        page_num: usize,
        content: &mut RawPageContent,
    ) {
        for object in objects {
            if let Some(form) = object.as_x_object_form_object() {
                if depth >= MAX_FORM_DEPTH {
                    warn!("Page {}: form nesting deeper than {} skipped", page_num, MAX_FORM_DEPTH);
                    continue;
                }
                let inner = object
                    .matrix()
                    .map(|m| Affine::from(&m))
                    .unwrap_or(Affine::IDENTITY)
                    .then(transform);
                let children: Vec<PdfPageObject> =
                    (0..form.len()).filter_map(|i| form.get(i).ok()).collect();
                self.collect_objects(children, inner, depth + 1, page_num, content);
                continue;
            }

            let bbox = match object.bounds() {
                Ok(bounds) => {
                    let (left, bottom, right, top) = transform.apply_bounds(
                        bounds.left().value as f64,
                        bounds.bottom().value as f64,
                        bounds.right().value as f64,
                        bounds.top().value as f64,
                    );
                    flip(left, top, right, bottom, content.height)
                }
                Err(e) => {
                    debug!("Page {}: object without bounds skipped: {:?}", page_num, e);
                    continue;
                }
            };

            if let Some(text) = object.as_text_object() {
                content.text_runs.push(RawTextRun {
                    text: text.text(),
                    bbox,
                    font_size: text.scaled_font_size().value as f64 * transform.scale(),
                    font_name: Some(text.font().name()),
                    color: object.fill_color().map(packed).unwrap_or_default(),
                });
            } else if let Some(path) = object.as_path_object() {
                let filled = path
                    .fill_mode()
                    .map(|mode| !matches!(mode, PdfPathFillMode::None))
                    .unwrap_or(false);
                let fill = if filled {
                    Some(object.fill_color().map(packed).unwrap_or(RawColor::Unsupported))
                } else {
                    None
                };
                content.paths.push(RawPath { bbox, fill });
            } else if object.as_image_object().is_some() && self.include_images {
                content.images.push(RawImageRegion { bbox });
            }
        }
    }

    fn rasterise(&self, page: &PdfPage, page_num: usize) -> Option<PageRaster> {
        let config = PdfRenderConfig::new().scale_page_by_factor(self.image_scale);
        match page.render_with_config(&config) {
            Ok(bitmap) => {
                let image = bitmap.as_image();
                debug!(
                    "Rasterised page {} → {}x{} px for image crops",
                    page_num,
                    image.width(),
                    image.height()
                );
                Some(PageRaster {
                    image,
                    pixels_per_point: self.image_scale as f64,
                })
            }
            Err(e) => {
                warn!("Could not rasterise page {} for images: {:?}", page_num, e);
                None
            }
        }
    }
}

impl PdfDecoder for PdfiumDecoder<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page(&self, index: usize) -> Result<RawPageContent, Pdf2HtmlError> {
        let page_num = index + 1;
        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| Pdf2HtmlError::PageDecodeFailed {
                page: page_num,
                detail: format!("{:?}", e),
            })?;

        let height = page.height().value as f64;
        let mut content = RawPageContent {
            width: page.width().value as f64,
            height,
            ..Default::default()
        };

        let objects: Vec<PdfPageObject> = page.objects().iter().collect();
        self.collect_objects(objects, Affine::IDENTITY, 0, page_num, &mut content);

        if !content.images.is_empty() {
            content.raster = self.rasterise(&page, page_num);
        }

        Ok(content)
    }

    fn outline(&self) -> Vec<OutlineEntry> {
        let mut entries = Vec::new();
        collect_bookmarks(self.document.bookmarks().root(), 1, &mut entries);
        entries
    }
}

/// Depth-first walk of a sibling chain and its children.
fn collect_bookmarks(first: Option<PdfBookmark<'_>>, level: u32, out: &mut Vec<OutlineEntry>) {
    let mut current = first;
    while let Some(bookmark) = current {
        if out.len() >= MAX_OUTLINE_ENTRIES {
            warn!("Outline truncated at {} entries", MAX_OUTLINE_ENTRIES);
            return;
        }

        let page = bookmark
            .destination()
            .and_then(|dest| dest.page_index().ok())
            .map(|idx| idx as usize + 1);

        match (bookmark.title(), page) {
            (Some(title), Some(start_page)) => out.push(OutlineEntry {
                level,
                title,
                start_page,
            }),
            (title, _) => debug!("Outline entry {:?} has no page destination", title),
        }

        collect_bookmarks(bookmark.first_child(), level + 1, out);
        current = bookmark.next_sibling();
    }
}

/// PDF affine matrix `[a b c d e f]`, mapping `(x, y)` to
/// `(a·x + c·y + e, b·x + d·y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Affine {
    const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// `self` applied first, then `outer`.
    fn then(self, outer: Affine) -> Affine {
        Affine {
            a: self.a * outer.a + self.b * outer.c,
            b: self.a * outer.b + self.b * outer.d,
            c: self.c * outer.a + self.d * outer.c,
            d: self.c * outer.b + self.d * outer.d,
            e: self.e * outer.a + self.f * outer.c + outer.e,
            f: self.e * outer.b + self.f * outer.d + outer.f,
        }
    }

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Axis-aligned bounds of the transformed box, as `(left, bottom, right, top)`.
    fn apply_bounds(&self, left: f64, bottom: f64, right: f64, top: f64) -> (f64, f64, f64, f64) {
        let corners = [
            self.apply(left, bottom),
            self.apply(left, top),
            self.apply(right, bottom),
            self.apply(right, top),
        ];
        corners.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(l, b, r, t), &(x, y)| (l.min(x), b.min(y), r.max(x), t.max(y)),
        )
    }

    /// Uniform scale factor, used for font sizes inside scaled forms.
    fn scale(&self) -> f64 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

impl From<&PdfMatrix> for Affine {
    fn from(m: &PdfMatrix) -> Self {
        Affine {
            a: m.a() as f64,
            b: m.b() as f64,
            c: m.c() as f64,
            d: m.d() as f64,
            e: m.e() as f64,
            f: m.f() as f64,
        }
    }
}

/// Bottom-left page space → top-left [`Rect`].
fn flip(left: f64, top: f64, right: f64, bottom: f64, page_height: f64) -> Rect {
    Rect::new(left, page_height - top, right, page_height - bottom)
}

fn packed(color: PdfColor) -> RawColor {
    RawColor::Packed(
        (color.red() as u32) << 16 | (color.green() as u32) << 8 | color.blue() as u32,
    )
}
