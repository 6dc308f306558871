//! Content extraction: URL classification, website scraping, and YouTube
//! transcript retrieval. The processing pipeline is never invoked on a
//! failed extraction.

pub mod urls;
pub mod website;
pub mod youtube;

use serde::Serialize;

pub use urls::{detect_source_kind, extract_video_id, validate_url};
pub use website::WebsiteExtractor;
pub use youtube::YoutubeExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Youtube,
    Website,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SourceKind::Youtube => "youtube",
            SourceKind::Website => "website",
        })
    }
}

/// Successfully extracted source content, ready for cleaning and chunking.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedContent {
    pub kind: SourceKind,
    pub title: Option<String>,
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("page returned status {0}")]
    Status(u16),
    #[error("no readable content found on the page")]
    EmptyContent,
    #[error("transcripts are disabled for this video")]
    TranscriptsDisabled,
    #[error("no transcript found for this video")]
    NoTranscript,
}
