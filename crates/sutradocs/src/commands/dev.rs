//! Development server command.

use anyhow::Result;
use sutradocs_server::DevServer;

use super::config::ConfigFile;

/// Run the dev server.
pub async fn run(config: &ConfigFile, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    DevServer::new(config.dev(port, open)).start().await?;

    Ok(())
}
