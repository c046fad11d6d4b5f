//! Sidebar consistency check.

use anyhow::{Context, Result};
use sutradocs_nav::check_catalog;
use sutradocs_static::Site;

use super::config::ConfigFile;

/// Run the check command.
///
/// Fails when any sidebar entry has no page or a category has nothing to link to.
pub async fn run(config: &ConfigFile) -> Result<()> {
    let site = Site::load(config.site()).context("Failed to load site")?;

    let issues = check_catalog(site.catalog(), site.docs());
    for issue in &issues {
        tracing::error!("{}", issue);
    }

    if !issues.is_empty() {
        anyhow::bail!("Found {} sidebar issue(s)", issues.len());
    }

    tracing::info!(
        "Sidebar OK: {} categories, {} pages",
        site.catalog().categories().len(),
        site.docs().len()
    );

    Ok(())
}
