//! Configuration types for PDF-to-HTML conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The layout thresholds (unit ratio,
//! title cut-offs, colour buckets, shadow and gradient limits) are
//! compile-time constants in their modules and deliberately absent here.

use crate::error::Pdf2HtmlError;
use crate::pipeline::chapters::ChapterDetection;
use crate::pipeline::render::RenderOptions;
use crate::progress::ProgressCallback;
use std::fmt;

/// Configuration for a PDF-to-HTML conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2html::{ChapterDetection, ConversionConfig};
///
/// let config = ConversionConfig::builder()
///     .chapter_detection(ChapterDetection::Legacy)
///     .image_scale(2.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Content heuristic used when the document has no outline.
    /// Default: [`ChapterDetection::Heuristic`].
    pub chapter_detection: ChapterDetection,

    /// Take chapters from the embedded outline when there is one. Default: true.
    ///
    /// Turning this off forces the content heuristic even on documents with
    /// a table of contents, which is mostly useful for comparing the two.
    pub use_outline: bool,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Crop and embed raster images. Default: true.
    ///
    /// Pages with images are rendered once to crop from; disabling this skips
    /// that render entirely.
    pub include_images: bool,

    /// Raster pixels per PDF point used for image crops. Range: 0.5–4.0. Default: 1.0.
    ///
    /// 1.0 matches the 72 DPI page raster; raise it for sharper embedded
    /// images at the cost of larger data URIs.
    pub image_scale: f32,

    /// Draw the gradient cover decoration on page 1. Default: false.
    pub cover_decoration: bool,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            chapter_detection: ChapterDetection::default(),
            use_outline: true,
            password: None,
            include_images: true,
            image_scale: 1.0,
            cover_decoration: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("chapter_detection", &self.chapter_detection)
            .field("use_outline", &self.use_outline)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("include_images", &self.include_images)
            .field("image_scale", &self.image_scale)
            .field("cover_decoration", &self.cover_decoration)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Check the constraints `build()` enforces.
    ///
    /// Entry points call this too, since the fields are public and a config
    /// can be assembled without the builder.
    pub fn validate(&self) -> Result<(), Pdf2HtmlError> {
        let scale = self.image_scale;
        if !(0.5..=4.0).contains(&scale) {
            return Err(Pdf2HtmlError::InvalidConfig(format!(
                "Image scale must be 0.5–4.0, got {}",
                scale
            )));
        }
        Ok(())
    }

    pub(crate) fn render_options(&self) -> RenderOptions {
        RenderOptions {
            cover_decoration: self.cover_decoration,
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn chapter_detection(mut self, detection: ChapterDetection) -> Self {
        self.config.chapter_detection = detection;
        self
    }

    pub fn use_outline(mut self, v: bool) -> Self {
        self.config.use_outline = v;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn include_images(mut self, v: bool) -> Self {
        self.config.include_images = v;
        self
    }

    pub fn image_scale(mut self, scale: f32) -> Self {
        self.config.image_scale = scale;
        self
    }

    pub fn cover_decoration(mut self, v: bool) -> Self {
        self.config.cover_decoration = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2HtmlError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
