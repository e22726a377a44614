//! The `glimpse caption` command: run one batch without the HTTP layer.

use clap::Args;
use glimpse_core::{BatchProcessor, Config, EngineHandle};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the `caption` command.
#[derive(Args, Debug)]
pub struct CaptionArgs {
    /// Folder whose images should be captioned
    #[arg(required = true)]
    pub folder: PathBuf,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the caption command.
pub async fn execute(args: CaptionArgs, config: Config) -> anyhow::Result<()> {
    let folder = glimpse_core::config::expand_path(&args.folder);

    let engine = Arc::new(EngineHandle::from_config(&config.engine).await);
    let processor = BatchProcessor::new(&config, engine);
    let report = processor.process(&folder).await?;

    let mut stdout = std::io::stdout().lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut stdout, &report)?;
    } else {
        serde_json::to_writer(&mut stdout, &report)?;
    }
    writeln!(stdout)?;

    tracing::info!("{}", report.message);
    Ok(())
}
