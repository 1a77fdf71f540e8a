//! The document record emitted for every harvested FAQ entry
//!
//! The field set of [`DocumentItem`] is the schema the downstream
//! persistence pipeline (and the RAG ingest that consumes its output)
//! accepts. `url` is the unique key across a run; `content` is never empty.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Human-readable name of the crawled site, recorded on every item
pub const SOURCE_NAME: &str = "한국에너지공단 신재생에너지센터";

/// Document type constant for FAQ entries
pub const DOCUMENT_TYPE_FAQ: &str = "FAQ";

/// Sentinel content used when neither the detail page nor the listing
/// preview yielded any text
pub const CONTENT_UNAVAILABLE: &str = "내용을 추출할 수 없습니다.";

/// A single harvested FAQ document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentItem {
    /// Listing page number this entry was discovered on (1-based)
    pub page: u32,

    /// Question title
    pub title: String,

    /// Full answer text; falls back to the listing preview or
    /// [`CONTENT_UNAVAILABLE`], never empty
    pub content: String,

    /// Absolute detail-page URL; unique across the emitted stream
    pub url: String,

    /// Site name ([`SOURCE_NAME`])
    pub source: String,

    /// Document type ([`DOCUMENT_TYPE_FAQ`])
    pub document_type: String,

    /// Publication date as observed at crawl time
    pub date_published: NaiveDate,

    /// Timestamp of the crawl that produced this item
    pub crawled_at: DateTime<Utc>,

    /// Attachment URLs to be fetched by the download sink
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_urls: Vec<String>,
}
