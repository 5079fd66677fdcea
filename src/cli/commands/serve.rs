use crate::cli::CommandOutput;
use crate::config::ServerConfig;
use crate::server;
use crate::state::AppState;
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn serve(bind: Option<SocketAddr>) -> Result<CommandOutput> {
    let mut config = ServerConfig::default();
    if let Some(bind) = bind {
        config.http_bind_address = bind;
    }
    let state = Arc::new(AppState::new(Arc::new(config)));
    server::serve(state).await?;
    Ok(CommandOutput::Rendered(String::new()))
}
