//! Greedy token-budget bin-packing with sentence-level overlap.

use serde::Serialize;
use tracing::debug;

use crate::clean::clean;
use crate::sections::split_sections;
use crate::tokens::{TextError, TokenCounter};

/// A token-budget-bounded span of text ready for LLM consumption.
#[derive(Debug, Clone, Serialize)]
pub struct Chunk {
    pub text: String,
    /// 0-based emission order.
    pub chunk_id: usize,
    /// Count of chunks produced by the same `build` call; identical on every
    /// chunk of one result.
    pub total_chunks: usize,
    /// Token count of `text`, recomputed at emission.
    pub token_count: usize,
}

/// Token-budget bin-packer. Configuration is immutable after construction;
/// an instance holds no per-request state and is safe to share.
pub struct Chunker {
    counter: TokenCounter,
    max_chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    pub fn new(counter: TokenCounter, max_chunk_size: usize, overlap: usize) -> Self {
        Self {
            counter,
            max_chunk_size,
            overlap,
        }
    }

    pub fn counter(&self) -> &TokenCounter {
        &self.counter
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Chunk `text` under the token budget.
    ///
    /// Sections are packed greedily; a section that alone exceeds the budget
    /// degrades to sentence-level packing, and only those sentence-level
    /// breaks carry an overlap seed (the last `overlap` tokens of the closed
    /// chunk, decoded back to text). Plain section-boundary breaks carry no
    /// overlap — intentional asymmetry preserved from the shipped behavior.
    ///
    /// A single sentence larger than the budget is emitted oversized rather
    /// than split mid-word (escape valve, not an error).
    pub fn build(&self, text: &str) -> Result<Vec<Chunk>, TextError> {
        let text = clean(text);
        let total_tokens = self.counter.count(&text);

        if total_tokens <= self.max_chunk_size {
            return Ok(vec![Chunk {
                text,
                chunk_id: 0,
                total_chunks: 1,
                token_count: total_tokens,
            }]);
        }

        let sections = split_sections(&text);
        debug!(
            total_tokens,
            sections = sections.len(),
            "input exceeds budget, packing sections"
        );

        let mut chunks: Vec<Chunk> = Vec::new();
        let mut buf = String::new();
        let mut buf_tokens = 0usize;

        for section in &sections {
            let section_tokens = self.counter.count(section);

            if section_tokens > self.max_chunk_size {
                // Degrade to sentence-level packing inside this section.
                for sentence in split_sentences(section) {
                    let sentence_tokens = self.counter.count(&sentence);
                    if buf_tokens + sentence_tokens > self.max_chunk_size {
                        if buf.is_empty() {
                            // Atomic oversized sentence: keep it whole.
                            buf = sentence;
                            buf_tokens = sentence_tokens;
                        } else {
                            let seed = self.counter.decode_last_n(&buf, self.overlap)?;
                            self.emit(&mut chunks, &buf);
                            buf = format!("{seed} {sentence}");
                            buf_tokens = self.counter.count(&buf);
                        }
                    } else {
                        if !buf.is_empty() {
                            buf.push(' ');
                        }
                        buf.push_str(&sentence);
                        buf_tokens += sentence_tokens;
                    }
                }
            } else if buf_tokens + section_sep_tokens(&buf) + section_tokens
                <= self.max_chunk_size
            {
                if !buf.is_empty() {
                    buf_tokens += section_sep_tokens(&buf);
                    buf.push_str("\n\n");
                }
                buf.push_str(section);
                buf_tokens += section_tokens;
            } else {
                // Section boundary break: no overlap seed here.
                self.emit(&mut chunks, &buf);
                buf = section.clone();
                buf_tokens = section_tokens;
            }
        }

        if !buf.trim().is_empty() {
            self.emit(&mut chunks, &buf);
        }

        let total = chunks.len();
        for chunk in &mut chunks {
            chunk.total_chunks = total;
        }
        debug!(chunks = total, "chunking complete");
        Ok(chunks)
    }

    fn emit(&self, chunks: &mut Vec<Chunk>, buf: &str) {
        let text = buf.trim().to_string();
        if text.is_empty() {
            return;
        }
        let token_count = self.counter.count(&text);
        chunks.push(Chunk {
            chunk_id: chunks.len(),
            total_chunks: 0, // backfilled once the count is known
            token_count,
            text,
        });
    }
}

/// Budget cost of the `\n\n` joiner (one cl100k token) when the buffer
/// already holds content.
fn section_sep_tokens(buf: &str) -> usize {
    usize::from(!buf.is_empty())
}

/// Split on sentence-terminal punctuation (`.`, `!`, `?`) followed by
/// whitespace. The terminal character stays with its sentence; the
/// separating whitespace is consumed.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(_, next)) = iter.peek() {
                if next.is_whitespace() {
                    let end = i + c.len_utf8();
                    let sentence = text[start..end].trim();
                    if !sentence.is_empty() {
                        sentences.push(sentence.to_string());
                    }
                    // Consume the whitespace run.
                    start = end;
                    while let Some(&(j, w)) = iter.peek() {
                        if w.is_whitespace() {
                            iter.next();
                            start = j + w.len_utf8();
                        } else {
                            start = j;
                            break;
                        }
                    }
                }
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(max_chunk_size: usize, overlap: usize) -> Chunker {
        Chunker::new(TokenCounter::new().unwrap(), max_chunk_size, overlap)
    }

    // ── Sentence splitting ──────────────────────────────────────────

    #[test]
    fn splits_sentences_on_terminal_punctuation() {
        let sents = split_sentences("First sentence. Second one! Third here? Tail without end");
        assert_eq!(sents.len(), 4);
        assert_eq!(sents[0], "First sentence.");
        assert_eq!(sents[1], "Second one!");
        assert_eq!(sents[2], "Third here?");
        assert_eq!(sents[3], "Tail without end");
    }

    #[test]
    fn terminal_punctuation_without_whitespace_does_not_split() {
        let sents = split_sentences("Version 1.5 is out. Done.");
        assert_eq!(sents.len(), 2);
        assert_eq!(sents[0], "Version 1.5 is out.");
    }

    // ── Single chunk ────────────────────────────────────────────────

    #[test]
    fn small_text_is_one_chunk_of_cleaned_text() {
        let c = chunker(8000, 500);
        let raw = "Some   short  text.\r\n\r\n\r\nWith messy whitespace.";
        let chunks = c.build(raw).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, clean(raw));
        assert_eq!(chunks[0].chunk_id, 0);
        assert_eq!(chunks[0].total_chunks, 1);
        assert_eq!(chunks[0].token_count, c.counter().count(&chunks[0].text));
    }

    // ── Identity invariants ─────────────────────────────────────────

    #[test]
    fn ids_are_sequential_and_totals_consistent() {
        let c = chunker(30, 5);
        let text = (0..40)
            .map(|i| format!("Paragraph number {i} has a handful of words in it."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = c.build(&text).unwrap();
        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_id, i);
            assert_eq!(chunk.total_chunks, chunks.len());
            assert_eq!(chunk.token_count, c.counter().count(&chunk.text));
        }
    }

    #[test]
    fn section_packed_chunks_respect_budget() {
        let c = chunker(40, 5);
        let text = (0..20)
            .map(|i| format!("Section {i} body sentence with several words inside."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = c.build(&text).unwrap();
        for chunk in &chunks {
            assert!(
                chunk.token_count <= 40,
                "chunk {} has {} tokens",
                chunk.chunk_id,
                chunk.token_count
            );
        }
    }

    // ── Sentence-level degradation and overlap ──────────────────────

    #[test]
    fn oversized_section_degrades_to_sentences_with_overlap() {
        let c = chunker(60, 10);
        // One giant section: no blank lines, every line long.
        let text = (0..40)
            .map(|i| format!("Sentence number {i} talks about topic {i} in moderate detail."))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = c.build(&text).unwrap();
        assert!(chunks.len() > 1);
        // Each chunk after the first starts with the overlap seed, so its
        // opening text must occur verbatim inside the previous chunk.
        for pair in chunks.windows(2) {
            let head: String = pair[1].text.chars().take(25).collect();
            assert!(
                pair[0].text.contains(&head),
                "chunk {} does not open with overlap from chunk {}: {head:?}",
                pair[1].chunk_id,
                pair[0].chunk_id
            );
        }
    }

    #[test]
    fn section_boundary_breaks_carry_no_overlap() {
        let c = chunker(20, 10);
        let text = "Alpha section sentence with distinct marker words inside it.\n\nBravo section sentence with other marker words inside it.\n\nCharlie section sentence with more marker words inside it.";
        let chunks = c.build(&text).unwrap();
        assert!(chunks.len() > 1);
        // Section-packed chunks never repeat the previous chunk's unique marker.
        assert!(!chunks[1].text.contains("Alpha"));
    }

    #[test]
    fn atomic_oversized_sentence_is_emitted_whole() {
        let c = chunker(10, 2);
        // A single sentence far over budget, no terminal punctuation inside.
        let big = format!(
            "{} end.",
            (0..60).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ")
        );
        let chunks = c.build(&big).unwrap();
        let oversized: Vec<_> = chunks.iter().filter(|c| c.token_count > 10).collect();
        assert!(!oversized.is_empty(), "escape valve chunk expected");
    }

    // ── Large input end-to-end ──────────────────────────────────────

    #[test]
    fn large_transcript_chunks_near_budget_with_overlap() {
        let c = chunker(800, 50);
        // ~6000+ tokens of continuous prose (single section).
        let text = (0..400)
            .map(|i| {
                format!("Sentence {i} describes the experiment stage {i} and its measured outcome in plain words.")
            })
            .collect::<Vec<_>>()
            .join(" ");
        let total = c.counter().count(&text);
        assert!(total > 4800, "fixture too small: {total}");

        let chunks = c.build(&text).unwrap();
        assert!(chunks.len() >= 6, "got {} chunks", chunks.len());
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.token_count <= 800 + 50, "chunk over budget");
            assert!(chunk.token_count > 800 / 2, "chunk far below budget");
        }
        // Adjacent sentence-split chunks share overlap text: chunk 1 opens
        // with the decoded tail of chunk 0.
        let head: String = chunks[1].text.chars().take(25).collect();
        assert!(chunks[0].text.contains(&head), "missing overlap: {head:?}");
    }

    #[test]
    fn fifty_thousand_tokens_at_production_defaults() {
        let c = chunker(8000, 500);
        let text = (0..3200)
            .map(|i| {
                format!("Transcript line {i} covers the speaker's point about subject {i} with a few supporting remarks.")
            })
            .collect::<Vec<_>>()
            .join(" ");
        let total = c.counter().count(&text);
        assert!(total > 50_000, "fixture too small: {total}");

        let chunks = c.build(&text).unwrap();
        assert!(chunks.len() >= 6, "got {} chunks", chunks.len());
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.token_count <= 8000 + 100, "chunk over budget");
            assert!(chunk.token_count > 7000, "chunk far below budget");
        }
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_id, i);
            assert_eq!(chunk.total_chunks, chunks.len());
        }
        // Every sentence-level boundary carries measurable shared overlap.
        for pair in chunks.windows(2) {
            let head: String = pair[1].text.chars().take(40).collect();
            assert!(pair[0].text.contains(&head), "missing overlap: {head:?}");
        }
    }
}
