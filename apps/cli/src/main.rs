//! WeCreate CLI - terminal studio for AI-assisted article writing.
//!
//! This CLI provides a `wecreate` command that walks from a keyword to a
//! finished, illustrated article, either interactively or as a one-shot
//! pipeline.

mod commands;
mod render;
mod setup;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::types::ConfigCommand;
use commands::{config, generate, health, studio};
use setup::GlobalOptions;

/// WeCreate CLI - AI article studio
///
/// Researches a keyword, proposes topics, drafts an outline, writes every
/// section, polishes the result and illustrates it.
#[derive(Parser, Debug)]
#[command(
    name = "wecreate",
    author,
    version,
    about = "WeCreate - AI article studio",
    long_about = "WeCreate turns a keyword into a finished article: topic ideas, an editable outline,\nsection-by-section writing, an optional polish pass and a cover illustration."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Use the offline generator instead of the generation service
    #[arg(long, global = true)]
    mock: bool,

    /// Generation service URL (overrides config and WECREATE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Model provider: gemini or openai (overrides config and WECREATE_PROVIDER)
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Extra configuration file layered over the discovered ones
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the interactive article wizard (default)
    Studio,

    /// Generate an article without prompts
    ///
    /// Researches the keyword, picks the chosen topic idea, accepts the
    /// outline as proposed and writes the article.
    Generate {
        /// Keyword or theme to research
        #[arg(short, long)]
        keyword: String,

        /// Which topic idea to write (1-based)
        #[arg(short, long, default_value_t = 1)]
        topic: usize,

        /// Also run the polish pass
        #[arg(long)]
        polish: bool,

        /// Write the article markdown to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the final workflow snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the generation service is reachable
    Health {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or create configuration files
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let global = GlobalOptions {
        mock: args.mock,
        api_url: args.api_url,
        provider: args.provider,
        config: args.config,
    };

    match args.command.unwrap_or(Command::Studio) {
        Command::Studio => studio::execute(&global).await?,
        Command::Generate { keyword, topic, polish, output, json } => {
            generate::execute(&global, keyword, topic, polish, output, json).await?;
        }
        Command::Health { json } => health::execute(&global, json).await?,
        Command::Config(cmd) => config::execute(&global, cmd)?,
    }

    Ok(())
}
