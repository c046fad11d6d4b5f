//! Static site build command.

use std::path::PathBuf;

use anyhow::Result;
use sutradocs_static::StaticBuilder;

use super::config::ConfigFile;

/// Run the build command.
pub async fn run(config: &ConfigFile, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let result = StaticBuilder::new(config.build(output, minify)).build().await?;

    tracing::info!("Built {} pages in {}ms", result.pages, result.duration_ms);
    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
