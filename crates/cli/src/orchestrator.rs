//! End-to-end pipeline wiring: source loading (URL or file) through
//! extraction, cleaning, and the engine operations.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use gist_core::Config;
use gist_engine::{ContentOps, InstructionSet, Source, Summarizer};
use gist_extract::{
    detect_source_kind, extract_video_id, validate_url, SourceKind, WebsiteExtractor,
    YoutubeExtractor,
};
use gist_llm::{LlmClient, ProviderInfo};
use gist_text::{clean, TokenCounter};

/// Per-source character cap applied before a multi-URL comparison.
const COMPARE_FETCH_CHARS: usize = 3000;

/// Cleaned content with provenance, ready for any engine operation.
pub struct ProcessedContent {
    pub title: Option<String>,
    pub content: String,
    pub token_count: usize,
}

pub struct Orchestrator {
    config: Config,
    website: WebsiteExtractor,
    youtube: YoutubeExtractor,
    summarizer: Summarizer,
    ops: ContentOps,
    counter: TokenCounter,
    info: ProviderInfo,
}

impl Orchestrator {
    /// Wire the full pipeline. Configuration problems (missing API key,
    /// inconsistent thresholds) surface here, before any processing.
    pub fn new(config: Config) -> Result<Self> {
        config.validate().context("invalid configuration")?;

        let client = LlmClient::from_config(&config.llm).context("failed to create LLM provider")?;
        let info = client.info();
        let client = Arc::new(client);

        let summarizer = Summarizer::new(
            Arc::clone(&client),
            &config.processing,
            InstructionSet::default(),
        )
        .context("failed to build summarization engine")?;
        let ops = ContentOps::new(Arc::clone(&client));

        let website = WebsiteExtractor::new(&config.extract)?;
        let youtube = YoutubeExtractor::new(&config.extract)?;
        let counter = TokenCounter::new().context("failed to load tokenizer")?;

        Ok(Self {
            config,
            website,
            youtube,
            summarizer,
            ops,
            counter,
            info,
        })
    }

    pub fn provider_info(&self) -> &ProviderInfo {
        &self.info
    }

    /// Load content from a URL (website or YouTube) or a local file path.
    pub async fn load_source(&self, source: &str) -> Result<ProcessedContent> {
        let extracted = if looks_like_url(source) {
            let url = validate_url(source)?;
            match detect_source_kind(url.as_str()) {
                SourceKind::Youtube => {
                    let video_id = extract_video_id(url.as_str())
                        .context("could not extract a video id from the URL")?;
                    info!(%video_id, "extracting YouTube transcript");
                    self.youtube.extract(&video_id).await?
                }
                SourceKind::Website => {
                    info!(url = url.as_str(), "extracting website content");
                    self.website.extract(url.as_str()).await?
                }
            }
        } else {
            let text = std::fs::read_to_string(source)
                .with_context(|| format!("failed to read file {source}"))?;
            gist_extract::ExtractedContent {
                kind: SourceKind::Website,
                title: Some(source.to_string()),
                content: text,
            }
        };

        let content = clean(&extracted.content);
        if content.is_empty() {
            bail!("extracted content is empty");
        }
        let token_count = self.counter.count(&content);
        info!(token_count, "content ready");

        Ok(ProcessedContent {
            title: extracted.title,
            content,
            token_count,
        })
    }

    pub async fn summarize(&self, source: &str, depth: &str, style: &str) -> Result<String> {
        let processed = self.load_source(source).await?;
        info!(
            title = processed.title.as_deref().unwrap_or("untitled"),
            tokens = processed.token_count,
            "summarizing"
        );
        let summary = self
            .summarizer
            .summarize(&processed.content, depth, style)
            .await?;
        Ok(summary)
    }

    pub async fn insights(&self, source: &str) -> Result<String> {
        let processed = self.load_source(source).await?;
        Ok(self.ops.extract_insights(&processed.content).await?)
    }

    pub async fn questions(&self, source: &str, kind: &str) -> Result<String> {
        let processed = self.load_source(source).await?;
        Ok(self.ops.generate_questions(&processed.content, kind).await?)
    }

    pub async fn transform(&self, source: &str, format: &str) -> Result<String> {
        let processed = self.load_source(source).await?;
        Ok(self.ops.transform(&processed.content, format).await?)
    }

    /// Compare several URLs. Sources that fail to extract are skipped with
    /// a warning; the comparison runs over whatever remains.
    pub async fn compare(&self, urls: &[String]) -> Result<String> {
        let limit = self.config.extract.max_comparison_urls;
        if urls.len() > limit {
            bail!("too many URLs: {} (limit {})", urls.len(), limit);
        }

        let mut sources = Vec::new();
        for url in urls {
            match self.load_source(url).await {
                Ok(processed) => sources.push(Source {
                    url: url.clone(),
                    content: processed.content.chars().take(COMPARE_FETCH_CHARS).collect(),
                }),
                Err(e) => warn!(%url, error = %e, "skipping source"),
            }
        }

        if sources.is_empty() {
            bail!("no valid sources to compare");
        }
        Ok(self.ops.compare_sources(&sources).await?)
    }
}

fn looks_like_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_detection() {
        assert!(looks_like_url("https://example.com"));
        assert!(looks_like_url("http://example.com"));
        assert!(!looks_like_url("notes.txt"));
        assert!(!looks_like_url("/tmp/transcript.txt"));
    }
}
