//! Initialize documentation in a project.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Run the init command in the current directory.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing sutradocs...");

    let created = scaffold(Path::new("."), yes)?;
    if created.is_empty() {
        tracing::warn!("Nothing to do: files already exist. Use --yes to overwrite.");
        return Ok(());
    }

    for path in &created {
        tracing::info!("Created {}", path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'sutradocs dev' to start the development server.");

    Ok(())
}

/// Write the starter files under `root`, returning the ones written.
///
/// Existing files are kept unless `overwrite` is set.
fn scaffold(root: &Path, overwrite: bool) -> Result<Vec<PathBuf>> {
    let files = [
        ("docs.toml", DEFAULT_CONFIG),
        ("sidebar.yml", DEFAULT_SIDEBAR),
        ("content/docs/index.mdx", DEFAULT_INTRODUCTION),
        ("content/docs/quickstart.mdx", DEFAULT_QUICKSTART),
        ("content/docs/guides/streaming.mdx", DEFAULT_STREAMING),
        ("content/cookbooks/first-agent.mdx", DEFAULT_COOKBOOK),
    ];

    let mut created = Vec::new();
    for (relative, contents) in files {
        let path = root.join(relative);
        if path.exists() && !overwrite {
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", relative))?;
        created.push(PathBuf::from(relative));
    }

    Ok(created)
}

const DEFAULT_CONFIG: &str = r#"# sutradocs configuration

[site]
title = "My Documentation"
# Base URL (for deployment)
base_url = "/"

[docs]
# Source directory for documentation pages
dir = "content/docs"
# Ordered sidebar that drives previous/next links
sidebar = "sidebar.yml"
# Output directory for built site
output = "dist"

[cookbooks]
dir = "content/cookbooks"

[build]
minify = true
"#;

const DEFAULT_SIDEBAR: &str = r#"introduction: /docs

categories:
  - title: Get Started
    entries:
      - title: Introduction
        path: /docs
      - title: Quickstart
        path: /docs/quickstart

  - title: Guides
    entries:
      - title: Streaming
        path: /docs/guides/streaming
"#;

const DEFAULT_INTRODUCTION: &str = r#"---
title: Introduction
description: Start here
---

Welcome to your documentation site, powered by **sutradocs**.

## Next steps

Follow the [Quickstart](/docs/quickstart) to make your first request.
"#;

const DEFAULT_QUICKSTART: &str = r#"---
title: Quickstart
description: Make your first request
---

## Install

```bash
pip install sutra
```

## Make a request

```python
from sutra import Sutra

client = Sutra()
print(client.chat("Hello"))
```
"#;

const DEFAULT_STREAMING: &str = r#"---
title: Streaming
description: Receive tokens as they are generated
---

Pass `stream=True` to receive the response incrementally.
"#;

const DEFAULT_COOKBOOK: &str = r#"---
title: Your first agent
description: Build a small agent end to end
---

Cookbooks are listed in their own sidebar and have no previous/next links.
"#;
