//! Whole-pipeline tests against an in-memory decoder.
//!
//! These exercise `convert_document` end to end (normalise → chapters →
//! render → result) without needing pdfium or a PDF file.

use image::{DynamicImage, Rgba, RgbaImage};
use pdf2html::{
    convert_document, ChapterDetection, ChapterRecord, ConversionConfig,
    ConversionProgressCallback, OutlineEntry, PageRaster, Pdf2HtmlError, PdfDecoder, RawColor,
    RawImageRegion, RawPageContent, RawPath, RawTextRun, Rect,
};
use std::cell::Cell;
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct FakeDecoder {
    pages: Vec<RawPageContent>,
    outline: Vec<OutlineEntry>,
    fail_on: Option<usize>,
    outline_calls: Cell<usize>,
}

impl FakeDecoder {
    fn with_pages(pages: Vec<RawPageContent>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }
}

impl PdfDecoder for FakeDecoder {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<RawPageContent, Pdf2HtmlError> {
        if self.fail_on == Some(index) {
            return Err(Pdf2HtmlError::PageDecodeFailed {
                page: index + 1,
                detail: "broken content stream".into(),
            });
        }
        Ok(self.pages[index].clone())
    }

    fn outline(&self) -> Vec<OutlineEntry> {
        self.outline_calls.set(self.outline_calls.get() + 1);
        self.outline.clone()
    }
}

fn text(s: &str, font_size: f64, top: f64) -> RawTextRun {
    RawTextRun {
        text: s.to_string(),
        bbox: Rect::new(72.0, top, 300.0, top + font_size),
        font_size,
        font_name: Some("Helvetica".into()),
        color: RawColor::Packed(0x000000),
    }
}

fn letter_page(text_runs: Vec<RawTextRun>) -> RawPageContent {
    RawPageContent {
        width: 612.0,
        height: 792.0,
        text_runs,
        ..Default::default()
    }
}

fn raster() -> PageRaster {
    PageRaster {
        image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(612, 792, Rgba([10, 20, 30, 255]))),
        pixels_per_point: 1.0,
    }
}

fn chapter(id: Option<u32>, title: &str, start: usize, end: Option<usize>) -> ChapterRecord {
    ChapterRecord {
        id,
        title: title.to_string(),
        start_page: start,
        end_page: end,
    }
}

// ── Ordering ─────────────────────────────────────────────────────────────────

#[test]
fn pages_are_numbered_in_order() {
    for n in 0..6 {
        let pages = (0..n).map(|_| letter_page(vec![])).collect();
        let result = convert_document(&FakeDecoder::with_pages(pages), &ConversionConfig::default())
            .expect("conversion should succeed");

        assert_eq!(result.total_pages, n);
        assert_eq!(result.pages.len(), n);
        for (i, page) in result.pages.iter().enumerate() {
            assert_eq!(page.page_number, i + 1);
        }
    }
}

// ── Chapters ─────────────────────────────────────────────────────────────────

#[test]
fn heuristic_chapters_span_pages() {
    let decoder = FakeDecoder::with_pages(vec![
        letter_page(vec![text("Introduction", 24.0, 50.0), text("body", 11.0, 300.0)]),
        letter_page(vec![text("Introduction", 24.0, 50.0)]),
        letter_page(vec![text("Methods", 20.0, 60.0)]),
    ]);

    let result = convert_document(&decoder, &ConversionConfig::default()).unwrap();
    assert_eq!(
        result.chapters,
        vec![
            chapter(Some(1), "Introduction", 1, Some(2)),
            chapter(Some(2), "Methods", 3, Some(3)),
        ]
    );
}

#[test]
fn outline_takes_precedence_over_page_text() {
    let decoder = FakeDecoder {
        pages: vec![
            letter_page(vec![text("Introduction", 24.0, 50.0)]),
            letter_page(vec![text("Methods", 24.0, 50.0)]),
        ],
        outline: vec![
            OutlineEntry {
                level: 1,
                title: " Part One ".into(),
                start_page: 1,
            },
            OutlineEntry {
                level: 2,
                title: "Section 1.1".into(),
                start_page: 1,
            },
        ],
        ..Default::default()
    };

    let result = convert_document(&decoder, &ConversionConfig::default()).unwrap();
    assert_eq!(
        result.chapters,
        vec![
            chapter(None, "Part One", 1, None),
            chapter(None, "Section 1.1", 1, None),
        ]
    );
}

#[test]
fn disabling_outline_skips_it_entirely() {
    let decoder = FakeDecoder {
        pages: vec![letter_page(vec![text("Results", 24.0, 50.0)])],
        outline: vec![OutlineEntry {
            level: 1,
            title: "Ignored".into(),
            start_page: 1,
        }],
        ..Default::default()
    };
    let config = ConversionConfig::builder().use_outline(false).build().unwrap();

    let result = convert_document(&decoder, &config).unwrap();
    assert_eq!(decoder.outline_calls.get(), 0);
    assert_eq!(result.chapters, vec![chapter(Some(1), "Results", 1, Some(1))]);
}

#[test]
fn legacy_detection_is_selectable() {
    let decoder = FakeDecoder::with_pages(vec![
        letter_page(vec![text("ACME", 40.0, 20.0), text("Getting Started Guide", 14.0, 400.0)]),
        letter_page(vec![text("Body text only", 10.0, 400.0)]),
        letter_page(vec![text("ACME", 40.0, 20.0), text("Getting Started Guide", 14.0, 400.0)]),
    ]);
    let config = ConversionConfig::builder()
        .chapter_detection(ChapterDetection::Legacy)
        .build()
        .unwrap();

    let result = convert_document(&decoder, &config).unwrap();
    assert_eq!(
        result.chapters,
        vec![
            chapter(None, "Getting Started Guide", 1, None),
            chapter(None, "Body text only", 2, None),
        ]
    );
}

// ── Element handling ─────────────────────────────────────────────────────────

#[test]
fn images_are_embedded_and_degenerate_ones_dropped() {
    let mut page = letter_page(vec![text("Figure", 12.0, 100.0)]);
    page.images = vec![
        RawImageRegion {
            bbox: Rect::new(100.0, 200.0, 300.0, 350.0),
        },
        RawImageRegion {
            bbox: Rect::new(100.0, 200.0, 100.5, 350.0),
        },
    ];
    page.raster = Some(raster());

    let result = convert_document(&FakeDecoder::with_pages(vec![page]), &ConversionConfig::default())
        .unwrap();
    let html = &result.pages[0].html;
    assert_eq!(html.matches("<img ").count(), 1);
    assert!(html.contains("src='data:image/png;base64,"));
    assert!(html.contains("left:133.3px; top:266.6px; width:266.6px; height:199.95px; z-index:2;"), "{html}");
}

#[test]
fn image_failures_do_not_abort_the_page() {
    let mut page = letter_page(vec![text("Still here", 12.0, 100.0)]);
    page.images = vec![RawImageRegion {
        bbox: Rect::new(100.0, 200.0, 300.0, 350.0),
    }];
    page.raster = None;

    let result = convert_document(&FakeDecoder::with_pages(vec![page]), &ConversionConfig::default())
        .unwrap();
    let html = &result.pages[0].html;
    assert!(!html.contains("<img"));
    assert!(html.contains("Still here"));
}

#[test]
fn markup_stacks_shapes_then_text_then_images() {
    let mut page = letter_page(vec![text("Caption", 12.0, 100.0)]);
    page.paths = vec![
        RawPath {
            bbox: Rect::new(0.0, 0.0, 612.0, 80.0),
            fill: Some(RawColor::Normalized([0.1, 0.1, 0.1])),
        },
        RawPath {
            bbox: Rect::new(0.0, 0.0, 612.0, 80.0),
            fill: None,
        },
    ];
    page.images = vec![RawImageRegion {
        bbox: Rect::new(10.0, 10.0, 50.0, 50.0),
    }];
    page.raster = Some(raster());

    let result = convert_document(&FakeDecoder::with_pages(vec![page]), &ConversionConfig::default())
        .unwrap();
    let html = &result.pages[0].html;

    let shadow = html.find("shadow-lg").expect("shadow box");
    let caption = html.find("Caption").expect("text");
    let img = html.find("<img").expect("image");
    assert!(shadow < caption && caption < img);
    // The stroked-only path never renders.
    assert_eq!(html.matches("rounded-md'").count() + html.matches("shadow-lg'").count(), 1);
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[test]
fn undecodable_page_fails_whole_document() {
    let decoder = FakeDecoder {
        pages: vec![letter_page(vec![]), letter_page(vec![]), letter_page(vec![])],
        fail_on: Some(1),
        ..Default::default()
    };

    let err = convert_document(&decoder, &ConversionConfig::default()).unwrap_err();
    assert!(matches!(err, Pdf2HtmlError::PageDecodeFailed { page: 2, .. }), "got {err:?}");
}

// ── Progress & output ────────────────────────────────────────────────────────

#[derive(Default)]
struct EventLog(Mutex<Vec<String>>);

impl ConversionProgressCallback for EventLog {
    fn on_conversion_start(&self, total_pages: usize) {
        self.0.lock().unwrap().push(format!("start {total_pages}"));
    }
    fn on_page_start(&self, page_num: usize, _total_pages: usize) {
        self.0.lock().unwrap().push(format!("page {page_num}"));
    }
    fn on_page_complete(&self, page_num: usize, _total_pages: usize, html_len: usize) {
        assert!(html_len > 0);
        self.0.lock().unwrap().push(format!("done {page_num}"));
    }
    fn on_chapter_detected(&self, chapter: &ChapterRecord) {
        self.0.lock().unwrap().push(format!("chapter {}", chapter.title));
    }
    fn on_conversion_complete(&self, total_pages: usize, chapter_count: usize) {
        self.0
            .lock()
            .unwrap()
            .push(format!("complete {total_pages} {chapter_count}"));
    }
}

#[test]
fn progress_events_arrive_in_page_order() {
    let log = Arc::new(EventLog::default());
    let config = ConversionConfig::builder()
        .progress_callback(log.clone())
        .build()
        .unwrap();
    let decoder = FakeDecoder::with_pages(vec![
        letter_page(vec![text("Overview", 24.0, 30.0)]),
        letter_page(vec![]),
    ]);

    convert_document(&decoder, &config).unwrap();
    assert_eq!(
        *log.0.lock().unwrap(),
        vec![
            "start 2",
            "page 1",
            "chapter Overview",
            "done 1",
            "page 2",
            "done 2",
            "complete 2 1",
        ]
    );
}

#[test]
fn result_serialises_to_expected_json_shape() {
    let decoder = FakeDecoder::with_pages(vec![letter_page(vec![text("Intro & <Setup>", 24.0, 30.0)])]);
    let result = convert_document(&decoder, &ConversionConfig::default()).unwrap();

    let v: serde_json::Value = serde_json::to_value(&result).unwrap();
    assert_eq!(v["total_pages"], 1);
    assert_eq!(v["pages"][0]["page_number"], 1);
    assert!(v["pages"][0]["html"]
        .as_str()
        .unwrap()
        .contains("Intro &amp; &lt;Setup&gt;"));
    assert_eq!(v["chapters"][0]["title"], "Intro & <Setup>");
    assert_eq!(v["chapters"][0]["start_page"], 1);
    assert_eq!(v["chapters"][0]["end_page"], 1);
}
