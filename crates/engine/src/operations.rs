//! Secondary content operations sharing the summarizer's LLM client:
//! insight extraction, question generation, format transformation, and
//! multi-source comparison.

use std::sync::Arc;

use tracing::debug;

use gist_llm::{LlmClient, LlmError};

const INSIGHTS_INSTRUCTION: &str = "Analyze this content and extract:

1. Key Ideas: Main concepts and themes
2. Arguments: Primary arguments made
3. Evidence: Supporting evidence provided
4. Implications: What this means or suggests
5. Limitations: Any gaps or limitations noted

Be specific and cite relevant points.";

const COMPARE_INSTRUCTION: &str = "Compare these sources and provide:

1. Common Themes: What ideas appear across multiple sources?
2. Differing Viewpoints: Where do sources disagree?
3. Unique Insights: What unique points does each source make?
4. Synthesis: What conclusions can be drawn from all sources together?

Create a comparison table format where possible.";

const QUESTION_KINDS: &[(&str, &str)] = &[
    (
        "study",
        "Generate 10 study questions that test understanding of this content.",
    ),
    (
        "discussion",
        "Generate 5 thought-provoking discussion questions.",
    ),
    (
        "interview",
        "Generate potential interview questions based on this content.",
    ),
    (
        "mcq",
        "Generate 5 multiple-choice questions with 4 options each (mark correct answer).",
    ),
];

const TRANSFORM_FORMATS: &[(&str, &str)] = &[
    (
        "blog",
        "Transform this into a well-structured blog post with introduction, body sections, and conclusion.",
    ),
    (
        "linkedin",
        "Create an engaging LinkedIn post (max 1300 characters) with relevant hashtags.",
    ),
    (
        "email",
        "Draft a professional email summarizing this content.",
    ),
    (
        "meeting_notes",
        "Format this as structured meeting notes with action items.",
    ),
    (
        "notion",
        "Create a Notion-style structured document with headers, sections, and bullet points.",
    ),
];

/// Per-source character cap inside a comparison prompt.
const COMPARE_SOURCE_CHARS: usize = 2000;

/// One input to a multi-source comparison.
#[derive(Debug, Clone)]
pub struct Source {
    pub url: String,
    pub content: String,
}

/// Stateless operations over a shared LLM client.
pub struct ContentOps {
    client: Arc<LlmClient>,
}

impl ContentOps {
    pub fn new(client: Arc<LlmClient>) -> Self {
        Self { client }
    }

    /// Extract key ideas, arguments, evidence, implications, and limitations.
    pub async fn extract_insights(&self, content: &str) -> Result<String, LlmError> {
        self.client
            .generate_with_context(content, INSIGHTS_INSTRUCTION, None)
            .await
    }

    /// Generate a question set. Unknown kinds fall back to study questions.
    pub async fn generate_questions(&self, content: &str, kind: &str) -> Result<String, LlmError> {
        let instruction = lookup(QUESTION_KINDS, kind);
        debug!(kind, "generating questions");
        self.client
            .generate_with_context(content, instruction, None)
            .await
    }

    /// Rewrite content into another format. Unknown formats fall back to blog.
    pub async fn transform(&self, content: &str, format: &str) -> Result<String, LlmError> {
        let instruction = lookup(TRANSFORM_FORMATS, format);
        debug!(format, "transforming content");
        self.client
            .generate_with_context(content, instruction, None)
            .await
    }

    /// Compare sources: numbered, truncated blocks joined by `---` rules,
    /// analyzed in one call.
    pub async fn compare_sources(&self, sources: &[Source]) -> Result<String, LlmError> {
        let formatted: Vec<String> = sources
            .iter()
            .enumerate()
            .map(|(i, source)| {
                let excerpt: String = source.content.chars().take(COMPARE_SOURCE_CHARS).collect();
                format!("Source {} ({}):\n{}", i + 1, source.url, excerpt)
            })
            .collect();
        let combined = formatted.join("\n\n---\n\n");

        self.client
            .generate_with_context(&combined, COMPARE_INSTRUCTION, None)
            .await
    }
}

/// First-column lookup with fallback to the table's first entry.
fn lookup(table: &[(&str, &'static str)], key: &str) -> &'static str {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .or_else(|| table.first())
        .map(|(_, v)| *v)
        .unwrap_or_default()
}
