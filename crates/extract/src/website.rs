//! Website content extraction: fetch the page, find the main content
//! container, and collect readable text.

use std::time::Duration;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use gist_core::config::ExtractConfig;

use crate::{ExtractError, ExtractedContent, SourceKind};

/// Containers tried in order when no `<article>` or `<main>` is present.
const CONTENT_CLASSES: &[&str] = &["content", "main-content", "article", "post", "entry"];

/// Elements whose subtree is navigation or boilerplate, never body text.
const EXCLUDED_ANCESTORS: &[&str] = &["nav", "footer", "aside", "header"];

pub struct WebsiteExtractor {
    client: reqwest::Client,
}

impl WebsiteExtractor {
    pub fn new(config: &ExtractConfig) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch `url` and extract its main readable content.
    pub async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractError> {
        debug!(url, "fetching website");
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(ExtractError::Status(status));
        }
        let body = response.text().await?;

        // Parsing happens in one synchronous pass: the DOM handle is not
        // Send and must not live across an await point.
        let (title, content) = parse_page(&body);
        if content.trim().is_empty() {
            return Err(ExtractError::EmptyContent);
        }

        Ok(ExtractedContent {
            kind: SourceKind::Website,
            title,
            content,
        })
    }
}

/// Extract (title, readable text) from an HTML document.
fn parse_page(html: &str) -> (Option<String>, String) {
    let doc = Html::parse_document(html);

    let title = select_first_text(&doc, "title").or_else(|| select_first_text(&doc, "h1"));

    let container = find_content_container(&doc);
    let content = match container {
        Some(root) => collect_text(root),
        None => String::new(),
    };

    (title, content)
}

fn select_first_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Pick the most article-like container: `<article>`, then `<main>`, then
/// well-known content classes, then `<body>` as the last resort.
fn find_content_container(doc: &Html) -> Option<ElementRef<'_>> {
    for tag in ["article", "main"] {
        if let Ok(sel) = Selector::parse(tag) {
            if let Some(el) = doc.select(&sel).next() {
                return Some(el);
            }
        }
    }
    for class in CONTENT_CLASSES {
        for selector in [format!("div.{class}"), format!("section.{class}")] {
            if let Ok(sel) = Selector::parse(&selector) {
                if let Some(el) = doc.select(&sel).next() {
                    return Some(el);
                }
            }
        }
    }
    Selector::parse("body").ok().and_then(|sel| doc.select(&sel).next())
}

/// Collect text from paragraph-like elements inside `root`, skipping
/// anything nested in navigation or boilerplate containers.
fn collect_text(root: ElementRef<'_>) -> String {
    let sel = match Selector::parse("p, h1, h2, h3, h4, h5, h6, li") {
        Ok(sel) => sel,
        Err(_) => return String::new(),
    };

    let mut blocks: Vec<String> = Vec::new();
    for el in root.select(&sel) {
        if has_excluded_ancestor(el) {
            continue;
        }
        let text = el
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if !text.is_empty() {
            blocks.push(text);
        }
    }
    blocks.join("\n\n")
}

fn has_excluded_ancestor(el: ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| EXCLUDED_ANCESTORS.contains(&a.value().name()))
}
