//! Subword token counting via tiktoken (cl100k_base).
//!
//! Every budget decision downstream (chunk sizes, overlap, strategy
//! thresholds) is expressed in these tokens, so counts must be
//! byte-for-byte reproducible for identical input.

use tiktoken_rs::{cl100k_base, CoreBPE};

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("tokenizer unavailable: {0}")]
    Tokenizer(String),
    #[error("failed to decode tokens: {0}")]
    Decode(String),
}

/// Deterministic subword tokenizer wrapper.
pub struct TokenCounter {
    bpe: CoreBPE,
}

impl TokenCounter {
    /// Load the cl100k_base encoding. Construction is the only fallible
    /// step; counting itself is total.
    pub fn new() -> Result<Self, TextError> {
        let bpe = cl100k_base().map_err(|e| TextError::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }

    /// Count tokens in `text`. Pure and deterministic.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Reconstruct the text spanned by the last `n` tokens of `text`'s
    /// encoding. Used to seed overlap across sentence-level chunk breaks.
    ///
    /// A token-boundary cut can land inside a multi-byte codepoint; when
    /// decoding fails, leading tokens are dropped until it succeeds rather
    /// than surfacing replacement characters.
    pub fn decode_last_n(&self, text: &str, n: usize) -> Result<String, TextError> {
        let tokens = self.bpe.encode_ordinary(text);
        if tokens.is_empty() || n == 0 {
            return Ok(String::new());
        }
        let start = tokens.len().saturating_sub(n);
        let mut tail = &tokens[start..];
        let mut last_err = None;
        while !tail.is_empty() {
            match self.bpe.decode(tail.to_vec()) {
                Ok(decoded) => return Ok(decoded),
                Err(e) => {
                    last_err = Some(e.to_string());
                    tail = &tail[1..];
                }
            }
        }
        Err(TextError::Decode(
            last_err.unwrap_or_else(|| "no decodable suffix".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_is_deterministic() {
        let counter = TokenCounter::new().unwrap();
        let text = "The quick brown fox jumps over the lazy dog.";
        assert_eq!(counter.count(text), counter.count(text));
        assert!(counter.count(text) > 0);
    }

    #[test]
    fn empty_text_counts_zero() {
        let counter = TokenCounter::new().unwrap();
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn decode_last_n_returns_suffix() {
        let counter = TokenCounter::new().unwrap();
        let text = "one two three four five six seven eight nine ten";
        let tail = counter.decode_last_n(text, 3).unwrap();
        assert!(!tail.is_empty());
        assert!(text.ends_with(tail.trim_start()), "got {tail:?}");
    }

    #[test]
    fn decode_last_n_with_large_n_returns_whole_text() {
        let counter = TokenCounter::new().unwrap();
        let text = "short text";
        assert_eq!(counter.decode_last_n(text, 10_000).unwrap(), text);
    }

    #[test]
    fn decode_last_n_zero_is_empty() {
        let counter = TokenCounter::new().unwrap();
        assert_eq!(counter.decode_last_n("anything here", 0).unwrap(), "");
    }

    #[test]
    fn decode_handles_multibyte_text() {
        let counter = TokenCounter::new().unwrap();
        let text = "naïve café résumé — ünïcödé everywhere";
        for n in 1..8 {
            let tail = counter.decode_last_n(text, n).unwrap();
            assert!(!tail.contains('\u{FFFD}'), "n={n} produced {tail:?}");
        }
    }
}
