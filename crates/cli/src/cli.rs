use clap::{Parser, Subcommand};

/// gist — summarize, question, and transform long-form content with an LLM.
#[derive(Parser, Debug)]
#[command(name = "gist", version, about)]
pub struct Cli {
    /// Processing mode: fast, balanced, or accurate.
    #[arg(long, env = "PROCESSING_MODE", default_value = "balanced", global = true)]
    pub mode: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize a URL or local text file.
    Summarize {
        /// URL (website or YouTube video) or path to a text file.
        source: String,
        /// Summary depth: "TL;DR (1-2 lines)", "Bullet Points",
        /// "Executive Summary", "Detailed Summary", or "Structured Outline".
        #[arg(long, default_value = "Executive Summary")]
        depth: String,
        /// Writing style, e.g. "Casual Tone", "Technical Explanation",
        /// "LinkedIn Post".
        #[arg(long, default_value = "Executive Tone")]
        style: String,
    },
    /// Extract key ideas, arguments, evidence, and implications.
    Insights {
        source: String,
    },
    /// Generate a question set from the content.
    Questions {
        source: String,
        /// study, discussion, interview, or mcq.
        #[arg(long, default_value = "study")]
        kind: String,
    },
    /// Rewrite the content into another format.
    Transform {
        source: String,
        /// blog, linkedin, email, meeting_notes, or notion.
        #[arg(long, default_value = "blog")]
        format: String,
    },
    /// Compare multiple URLs for common themes and disagreements.
    Compare {
        /// Two or more URLs.
        #[arg(required = true, num_args = 2..)]
        urls: Vec<String>,
    },
    /// Show the active provider, mode, and model.
    Info,
}
