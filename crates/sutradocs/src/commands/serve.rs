//! Preview server command.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// Run the serve command.
pub async fn run(port: u16, dir: PathBuf, open: bool) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'sutradocs build' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let not_found = ServeFile::new(dir.join("404.html"));
    let app = Router::new().fallback_service(ServeDir::new(&dir).not_found_service(not_found));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    if open {
        let url = format!("http://{}", addr);
        if let Err(e) = open::that(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    axum::serve(listener, app).await?;

    Ok(())
}
