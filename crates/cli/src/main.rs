mod cli;
mod orchestrator;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use gist_core::{config, Config};

use crate::cli::{Cli, Command};
use crate::orchestrator::Orchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    config::load_dotenv();
    let args = Cli::parse();

    let mut config = Config::from_env();
    config.llm.mode = args.mode.to_lowercase();
    config.log_summary();

    let orchestrator = Orchestrator::new(config)?;

    let output = match &args.command {
        Command::Summarize {
            source,
            depth,
            style,
        } => {
            info!(%source, %depth, %style, "summarizing");
            orchestrator.summarize(source, depth, style).await?
        }
        Command::Insights { source } => orchestrator.insights(source).await?,
        Command::Questions { source, kind } => orchestrator.questions(source, kind).await?,
        Command::Transform { source, format } => orchestrator.transform(source, format).await?,
        Command::Compare { urls } => orchestrator.compare(urls).await?,
        Command::Info => {
            let info = orchestrator.provider_info();
            serde_json::to_string_pretty(info)?
        }
    };

    println!("{output}");
    Ok(())
}
