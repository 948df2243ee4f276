//! Chapter inference: outline-driven, heuristic and legacy strategies.
//!
//! A [`ChapterStrategy`] is chosen once per document. The orchestrator then
//! folds every page, in order, through [`ChapterStrategy::process_page`],
//! threading a [`ChapterState`] accumulator from page to page. Only the
//! heuristic strategies look at page content; the outline strategy seeds the
//! state from the table of contents and leaves it untouched afterwards.
//!
//! ## Heuristic vs legacy
//!
//! The two heuristics disagree on purpose and both remain selectable:
//!
//! | | Heuristic | Legacy |
//! |---|---|---|
//! | candidates | top 200pt, ≥ 16pt | every span |
//! | preference | largest font | keyword match, then largest font |
//! | new chapter when | title differs from last detected | title never seen before |
//! | end page | extended page by page | not tracked |

use crate::model::{PageModel, TextSpan};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::decode::OutlineEntry;

/// Spans must start above this line (points from the top) to be a title.
pub const TITLE_MAX_Y_PT: f64 = 200.0;

/// Smallest font size (points) a heuristic title may use.
pub const TITLE_MIN_FONT_PT: f64 = 16.0;

/// Title used by the legacy heuristic for a page without any text.
const UNTITLED: &str = "Untitled";

static LEGACY_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(chapter|guide|section|intro|handbook)").unwrap());

/// A detected or declared chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    /// Synthetic id, assigned only by the heuristic strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub title: String,
    /// 1-indexed.
    pub start_page: usize,
    /// 1-indexed, inclusive. Only tracked by the heuristic strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_page: Option<usize>,
}

/// Which content heuristic to fall back on when there is no outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterDetection {
    /// Large text near the top of the page opens a chapter spanning until
    /// the next distinct title. (default)
    #[default]
    Heuristic,
    /// Keyword-weighted largest text; a chapter opens the first time a title
    /// is seen. Kept for output compatibility with earlier releases.
    Legacy,
}

/// The per-document chapter strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterStrategy {
    Outline,
    Heuristic,
    Legacy,
}

impl ChapterStrategy {
    /// Pick the strategy for a document and build its initial state.
    ///
    /// A non-empty outline wins when `use_outline` is set; otherwise the
    /// configured content heuristic runs.
    pub fn select(
        outline: Vec<OutlineEntry>,
        use_outline: bool,
        detection: ChapterDetection,
    ) -> (Self, ChapterState) {
        if use_outline && !outline.is_empty() {
            return (ChapterStrategy::Outline, ChapterState::from_outline(outline));
        }
        let strategy = match detection {
            ChapterDetection::Heuristic => ChapterStrategy::Heuristic,
            ChapterDetection::Legacy => ChapterStrategy::Legacy,
        };
        (strategy, ChapterState::default())
    }

    /// Advance the chapter state by one page.
    ///
    /// Pages must be fed in increasing page order.
    pub fn process_page(&self, state: ChapterState, page: &PageModel) -> ChapterState {
        match self {
            ChapterStrategy::Outline => state,
            ChapterStrategy::Heuristic => heuristic_step(state, page),
            ChapterStrategy::Legacy => legacy_step(state, page),
        }
    }
}

/// Running chapter state carried across the page loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterState {
    chapters: Vec<ChapterRecord>,
    last_title: Option<String>,
    seen: HashSet<String>,
    next_id: u32,
}

impl ChapterState {
    fn from_outline(outline: Vec<OutlineEntry>) -> Self {
        let chapters = outline
            .into_iter()
            .map(|entry| ChapterRecord {
                id: None,
                title: entry.title.trim().to_string(),
                start_page: entry.start_page,
                end_page: None,
            })
            .collect();
        Self {
            chapters,
            ..Self::default()
        }
    }

    pub fn chapters(&self) -> &[ChapterRecord] {
        &self.chapters
    }

    pub fn into_chapters(self) -> Vec<ChapterRecord> {
        self.chapters
    }

    /// The chapter opened most recently, if any.
    pub fn current(&self) -> Option<&ChapterRecord> {
        self.chapters.last()
    }

    fn open(&mut self, title: String, page: usize, id: Option<u32>, end_page: Option<usize>) {
        self.chapters.push(ChapterRecord {
            id,
            title,
            start_page: page,
            end_page,
        });
    }
}

// ── Heuristic ────────────────────────────────────────────────────────────

fn heuristic_step(mut state: ChapterState, page: &PageModel) -> ChapterState {
    let page_num = page.page_number;

    match heuristic_title(&page.text_spans) {
        Some(title) if state.last_title.as_deref() != Some(title.as_str()) => {
            state.next_id += 1;
            let id = state.next_id;
            state.open(title.clone(), page_num, Some(id), Some(page_num));
            state.last_title = Some(title);
        }
        _ => {
            if let Some(last) = state.chapters.last_mut() {
                last.end_page = Some(page_num);
            }
        }
    }

    state
}

/// The page's title under the heuristic rules, already trimmed.
pub fn heuristic_title(spans: &[TextSpan]) -> Option<String> {
    let mut best: Option<&TextSpan> = None;
    for span in spans
        .iter()
        .filter(|s| s.y < TITLE_MAX_Y_PT && s.font_size >= TITLE_MIN_FONT_PT)
    {
        // Strict comparison keeps the first span on ties.
        if best.is_none_or(|b| span.font_size > b.font_size) {
            best = Some(span);
        }
    }

    let title = best?.text.trim();
    if title.is_empty() || title.to_lowercase().starts_with("page") {
        return None;
    }
    Some(title.to_string())
}

// ── Legacy ───────────────────────────────────────────────────────────────

fn legacy_step(mut state: ChapterState, page: &PageModel) -> ChapterState {
    let title = legacy_title(&page.text_spans);
    if state.seen.insert(title.clone()) {
        state.open(title, page.page_number, None, None);
    }
    state
}

/// The page's title under the legacy rules; every page yields one.
pub fn legacy_title(spans: &[TextSpan]) -> String {
    let mut by_size: Vec<&TextSpan> = spans.iter().collect();
    // Stable sort: equal sizes keep reading order.
    by_size.sort_by(|a, b| b.font_size.total_cmp(&a.font_size));

    let keyword_match = by_size.iter().map(|s| s.text.trim()).find(|text| {
        text.chars().count() > 3 && LEGACY_KEYWORDS.is_match(text)
    });

    match (keyword_match, by_size.first()) {
        (Some(text), _) => text.to_string(),
        (None, Some(largest)) => largest.text.trim().to_string(),
        (None, None) => UNTITLED.to_string(),
    }
}
