//! Glimpse - caption every image in a folder over HTTP.
//!
//! Glimpse loads an image-captioning model once at startup and answers
//! `POST /caption-images/` requests with a per-file and aggregate report.
//!
//! # Usage
//!
//! ```bash
//! # Start the HTTP service
//! glimpse serve --port 8000
//!
//! # Caption one folder without the server
//! glimpse caption ./photos/ --pretty
//!
//! # View configuration
//! glimpse config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;
mod server;

/// Glimpse - caption every image in a folder.
#[derive(Parser, Debug)]
#[command(name = "glimpse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "GLIMPSE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Load the caption engine and serve the HTTP API
    Serve(cli::serve::ServeArgs),

    /// Caption a folder once and print the report
    Caption(cli::caption::CaptionArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let loaded = match &cli.config {
        Some(path) => glimpse_core::Config::load_from(path),
        None => glimpse_core::Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        // An explicit --config must load, except for `config` itself (init creates it).
        Err(e) if cli.config.is_some() && !matches!(cli.command, Commands::Config(_)) => {
            return Err(e.into())
        }
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `glimpse config path`."
            );
            glimpse_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Glimpse v{}", glimpse_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Caption(args) => cli::caption::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, cli.config, config).await,
    }
}
