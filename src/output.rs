//! Conversion output types.

use crate::pipeline::chapters::ChapterRecord;
use serde::{Deserialize, Serialize};

/// One rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    /// 1-indexed.
    pub page_number: usize,
    /// Positioned markup for the page.
    pub html: String,
}

/// The result of converting one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Every page, in page order.
    pub pages: Vec<RenderedPage>,
    pub total_pages: usize,
    pub chapters: Vec<ChapterRecord>,
}

impl DocumentResult {
    /// All page markup concatenated, one page per block.
    pub fn html(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.html.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Document metadata, available without converting any page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
    /// Whether the document embeds a table of contents.
    pub has_outline: bool,
}
