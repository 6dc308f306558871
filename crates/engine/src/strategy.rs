//! Strategy selection by input token count.

/// How a summarization request is executed, picked once per request from
/// the token count of the cleaned full text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Single-pass: the whole text fits one prompt.
    Stuff,
    /// Sequential chunk-by-chunk refinement of a running summary.
    Refine,
    /// Independent per-chunk summaries combined by a final reduce call.
    MapReduce,
}

impl Strategy {
    /// Half-open tiers: `count < stuff_threshold` → Stuff,
    /// `stuff_threshold <= count < refine_threshold` → Refine,
    /// `count >= refine_threshold` → MapReduce.
    pub fn select(token_count: usize, stuff_threshold: usize, refine_threshold: usize) -> Self {
        if token_count < stuff_threshold {
            Strategy::Stuff
        } else if token_count < refine_threshold {
            Strategy::Refine
        } else {
            Strategy::MapReduce
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::Stuff => "stuff",
            Strategy::Refine => "refine",
            Strategy::MapReduce => "map-reduce",
        };
        f.write_str(name)
    }
}
