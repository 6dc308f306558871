//! Strategy execution: stuff, refine, and map-reduce summarization.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use gist_core::config::ProcessingConfig;
use gist_llm::{LlmClient, LlmError};
use gist_text::{clean, Chunk, Chunker, TextError, TokenCounter};

use crate::instruction::InstructionSet;
use crate::strategy::Strategy;

const MAP_INSTRUCTION: &str =
    "Summarize the following content concisely, preserving key points:";

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("chunking failed: {0}")]
    Chunking(#[from] TextError),
    #[error("LLM generation failed: {0}")]
    Generation(#[from] LlmError),
    #[error("no content to summarize")]
    EmptyInput,
}

/// Multi-strategy summarization engine.
///
/// Configuration (budget, overlap, thresholds, tables) is fixed at
/// construction; the engine holds no per-request state and can serve
/// concurrent requests from behind an `Arc`.
pub struct Summarizer {
    client: Arc<LlmClient>,
    chunker: Chunker,
    instructions: InstructionSet,
    stuff_threshold: usize,
    refine_threshold: usize,
    map_concurrency: usize,
}

impl Summarizer {
    pub fn new(
        client: Arc<LlmClient>,
        config: &ProcessingConfig,
        instructions: InstructionSet,
    ) -> Result<Self, EngineError> {
        let counter = TokenCounter::new()?;
        Ok(Self {
            client,
            chunker: Chunker::new(counter, config.max_chunk_size, config.overlap),
            instructions,
            stuff_threshold: config.stuff_threshold,
            refine_threshold: config.refine_threshold,
            map_concurrency: config.map_concurrency,
        })
    }

    pub fn instructions(&self) -> &InstructionSet {
        &self.instructions
    }

    /// Token count of `text` after cleaning — the number every strategy
    /// decision is based on.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.chunker.counter().count(&clean(text))
    }

    /// Summarize `content` at the requested depth and style. Strategy is
    /// picked from the cleaned text's token count; any LLM failure aborts
    /// the whole request with no partial output.
    pub async fn summarize(
        &self,
        content: &str,
        depth: &str,
        style: &str,
    ) -> Result<String, EngineError> {
        let cleaned = clean(content);
        if cleaned.is_empty() {
            return Err(EngineError::EmptyInput);
        }

        let token_count = self.chunker.counter().count(&cleaned);
        let strategy = Strategy::select(token_count, self.stuff_threshold, self.refine_threshold);
        info!(token_count, %strategy, "strategy selected");

        match strategy {
            Strategy::Stuff => self.stuff(&cleaned, depth, style).await,
            Strategy::Refine => self.refine(&cleaned, depth, style).await,
            Strategy::MapReduce => self.map_reduce(&cleaned, depth, style).await,
        }
    }

    /// Single-pass: the whole text goes into one prompt.
    async fn stuff(&self, content: &str, depth: &str, style: &str) -> Result<String, EngineError> {
        let instruction = self.instructions.compose(depth, style);
        let summary = self
            .client
            .generate_with_context(content, &instruction, style_directive(style))
            .await?;
        Ok(summary)
    }

    /// Iterative refinement: seed a summary from the first chunk, then fold
    /// the remaining chunks into it one call at a time.
    ///
    /// Strictly sequential — every step consumes the previous step's output,
    /// so chunk order must match emission order and must never be
    /// parallelized.
    async fn refine(&self, content: &str, depth: &str, style: &str) -> Result<String, EngineError> {
        let chunks = self.chunker.build(content)?;
        let (first, rest) = chunks.split_first().ok_or(EngineError::EmptyInput)?;
        let instruction = self.instructions.compose(depth, style);

        let mut summary = self
            .client
            .generate_with_context(&first.text, &instruction, style_directive(style))
            .await?;

        for chunk in rest {
            debug!(chunk_id = chunk.chunk_id, total = chunk.total_chunks, "refining");
            let prompt = refine_prompt(&instruction, &summary, chunk);
            summary = self.client.generate(&prompt, None).await?;
        }

        Ok(summary)
    }

    /// Map-reduce: per-chunk summaries produced independently (bounded
    /// concurrency, reassembled in chunk order regardless of completion
    /// order), then one style/depth-aware reduce call over the combination.
    /// The map phase is depth/style-agnostic by design; only the reduce
    /// call sees the composed instruction.
    async fn map_reduce(
        &self,
        content: &str,
        depth: &str,
        style: &str,
    ) -> Result<String, EngineError> {
        let chunks = self.chunker.build(content)?;
        debug!(chunks = chunks.len(), concurrency = self.map_concurrency, "map phase");

        // `buffered` keeps at most `map_concurrency` calls in flight and
        // yields results in input order; the first failure short-circuits
        // `try_collect` and drops the outstanding calls.
        let partials: Vec<String> = stream::iter(chunks.iter().map(|chunk| {
            let client = Arc::clone(&self.client);
            let prompt = format!("{}\n\n{}", MAP_INSTRUCTION, chunk.text);
            async move { client.generate(&prompt, None).await }
        }))
        .buffered(self.map_concurrency)
        .try_collect()
        .await?;

        let combined = partials.join("\n\n");
        let instruction = self.instructions.compose(depth, style);
        debug!(map_summaries = partials.len(), "reduce phase");

        let summary = self
            .client
            .generate_with_context(&combined, &instruction, style_directive(style))
            .await?;
        Ok(summary)
    }
}

/// Prompt for one refine step: instruction, running summary, new chunk.
fn refine_prompt(instruction: &str, current_summary: &str, chunk: &Chunk) -> String {
    format!(
        "{}\n\nPrevious summary:\n{}\n\nAdditional content:\n{}\n\nRefine and expand the previous summary to incorporate this new information.",
        instruction, current_summary, chunk.text
    )
}

fn style_directive(style: &str) -> Option<&str> {
    (!style.is_empty()).then_some(style)
}
