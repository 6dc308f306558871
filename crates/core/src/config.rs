use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub processing: ProcessingConfig,
    pub extract: ExtractConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            llm: LlmConfig::from_env(),
            processing: ProcessingConfig::from_env(),
            extract: ExtractConfig::from_env(),
        }
    }

    /// Validate cross-field constraints before any processing starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.processing.validate()
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  llm:         provider={}, mode={}, configured={}",
            self.llm.provider,
            self.llm.mode,
            self.llm.is_configured()
        );
        tracing::info!(
            "  processing:  max_chunk_size={}, overlap={}, thresholds={}/{}",
            self.processing.max_chunk_size,
            self.processing.overlap,
            self.processing.stuff_threshold,
            self.processing.refine_threshold
        );
        tracing::info!(
            "  extract:     timeout={}s, max_comparison_urls={}",
            self.extract.request_timeout_secs,
            self.extract.max_comparison_urls
        );
    }
}

// ── LLM (Groq / Gemini) ──────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "groq", "gemini", or "auto" (first provider with a key wins).
    pub provider: String,
    /// "fast", "balanced", or "accurate" — maps to a per-provider model.
    pub mode: String,
    pub groq_api_key: Option<String>,
    pub groq_model: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_env() -> Self {
        Self {
            provider: env_or("LLM_PROVIDER", "auto"),
            mode: env_or("PROCESSING_MODE", "balanced").to_lowercase(),
            groq_api_key: env_opt("GROQ_API_KEY"),
            groq_model: env_opt("GROQ_MODEL"),
            gemini_api_key: env_opt("GOOGLE_API_KEY"),
            gemini_model: env_opt("GEMINI_MODEL"),
            temperature: env_or("LLM_TEMPERATURE", "0.3").parse().unwrap_or(0.3),
            max_tokens: env_or("LLM_MAX_TOKENS", "4000").parse().unwrap_or(4000),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "groq" => self.groq_api_key.is_some(),
            "gemini" => self.gemini_api_key.is_some(),
            "auto" => self.groq_api_key.is_some() || self.gemini_api_key.is_some(),
            _ => false,
        }
    }
}

// ── Text processing ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Token budget per chunk.
    pub max_chunk_size: usize,
    /// Tokens carried across sentence-level chunk boundaries.
    pub overlap: usize,
    /// Below this token count a single-pass summary is used.
    pub stuff_threshold: usize,
    /// Below this token count (and at or above `stuff_threshold`) the
    /// iterative refine strategy is used; at or above it, map-reduce.
    pub refine_threshold: usize,
    /// Concurrent LLM calls during the map-reduce map phase.
    pub map_concurrency: usize,
}

impl ProcessingConfig {
    fn from_env() -> Self {
        Self {
            max_chunk_size: env_usize("MAX_CHUNK_SIZE", 8000),
            overlap: env_usize("CHUNK_OVERLAP", 500),
            stuff_threshold: env_usize("STUFF_THRESHOLD", 4000),
            refine_threshold: env_usize("REFINE_THRESHOLD", 15000),
            map_concurrency: env_usize("MAP_CONCURRENCY", 4),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chunk_size == 0 {
            return Err(ConfigError::Invalid("MAX_CHUNK_SIZE must be > 0".into()));
        }
        if self.overlap >= self.max_chunk_size {
            return Err(ConfigError::Invalid(format!(
                "CHUNK_OVERLAP ({}) must be smaller than MAX_CHUNK_SIZE ({})",
                self.overlap, self.max_chunk_size
            )));
        }
        if self.stuff_threshold >= self.refine_threshold {
            return Err(ConfigError::Invalid(format!(
                "STUFF_THRESHOLD ({}) must be smaller than REFINE_THRESHOLD ({})",
                self.stuff_threshold, self.refine_threshold
            )));
        }
        if self.map_concurrency == 0 {
            return Err(ConfigError::Invalid("MAP_CONCURRENCY must be > 0".into()));
        }
        Ok(())
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 8000,
            overlap: 500,
            stuff_threshold: 4000,
            refine_threshold: 15000,
            map_concurrency: 4,
        }
    }
}

// ── Content extraction ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Upper bound on URLs accepted by the compare operation.
    pub max_comparison_urls: usize,
}

impl ExtractConfig {
    fn from_env() -> Self {
        Self {
            request_timeout_secs: env_u64("EXTRACT_TIMEOUT_SECS", 10),
            user_agent: env_or(
                "EXTRACT_USER_AGENT",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            ),
            max_comparison_urls: env_usize("MAX_COMPARISON_URLS", 5),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            max_comparison_urls: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_defaults_are_valid() {
        assert!(ProcessingConfig::default().validate().is_ok());
    }

    #[test]
    fn overlap_must_stay_below_chunk_size() {
        let cfg = ProcessingConfig {
            max_chunk_size: 100,
            overlap: 100,
            ..ProcessingConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn thresholds_must_be_ordered() {
        let cfg = ProcessingConfig {
            stuff_threshold: 15000,
            refine_threshold: 4000,
            ..ProcessingConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn llm_auto_needs_at_least_one_key() {
        let cfg = LlmConfig {
            provider: "auto".into(),
            mode: "balanced".into(),
            groq_api_key: None,
            groq_model: None,
            gemini_api_key: None,
            gemini_model: None,
            temperature: 0.3,
            max_tokens: 4000,
        };
        assert!(!cfg.is_configured());
        let cfg = LlmConfig {
            gemini_api_key: Some("key".into()),
            ..cfg
        };
        assert!(cfg.is_configured());
    }
}
