//! Token-aware text preparation: cleaning, section splitting, and chunking
//! under a hard token budget.
//!
//! The chunker packs heuristically detected sections greedily, degrading to
//! sentence-level packing (with a token overlap seed) when a single section
//! exceeds the budget.

pub mod chunker;
pub mod clean;
pub mod sections;
pub mod tokens;

pub use chunker::{Chunk, Chunker};
pub use clean::clean;
pub use sections::split_sections;
pub use tokens::{TextError, TokenCounter};
