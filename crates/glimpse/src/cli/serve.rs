//! The `glimpse serve` command.

use clap::Args;
use glimpse_core::{BatchProcessor, Config, EngineHandle};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::server::{self, AppState};

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Execute the serve command.
///
/// The engine is initialized before the listener opens. A failed
/// initialization does not stop the server; every caption request is then
/// answered as unavailable.
pub async fn execute(args: ServeArgs, config: Config) -> anyhow::Result<()> {
    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address '{host}:{port}': {e}"))?;

    let engine = Arc::new(EngineHandle::from_config(&config.engine).await);
    let processor = BatchProcessor::new(&config, engine);

    server::serve(addr, AppState::new(processor)).await
}
