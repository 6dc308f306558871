//! Multi-strategy summarization over token-budgeted chunks, plus the
//! secondary content operations (insights, questions, transforms,
//! comparisons) that share the same LLM client.

pub mod instruction;
pub mod operations;
pub mod strategy;
pub mod summarizer;

pub use instruction::InstructionSet;
pub use operations::{ContentOps, Source};
pub use strategy::Strategy;
pub use summarizer::{EngineError, Summarizer};
