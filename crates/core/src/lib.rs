pub mod config;

pub use config::{Config, ConfigError, ExtractConfig, LlmConfig, ProcessingConfig};
