use anyhow::Result;
use clap::Parser;
use statement_kit::config::{CliArgs, ServerConfig};
use statement_kit::state::AppState;
use statement_kit::{server, telemetry};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init("statement_kit=info");

    let args = CliArgs::parse();
    let config = Arc::new(ServerConfig::from_args(args)?);
    tracing::debug!(?config, "resolved configuration");

    let state = Arc::new(AppState::new(config));
    server::serve(state).await
}
