//! docs.toml configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use sutradocs_server::DevServerConfig;
use sutradocs_static::{ApiFiles, BuildConfig, EditLink, SiteConfig};

/// Configuration file structure (docs.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    site: SiteSettings,
    #[serde(default)]
    docs: DocsSettings,
    #[serde(default)]
    cookbooks: CookbookSettings,
    #[serde(default)]
    api: ApiSettings,
    edit: Option<EditSettings>,
    #[serde(default)]
    build: BuildSettings,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct SiteSettings {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_base_url")]
    base_url: String,
    /// Paths to CSS stylesheets to include
    #[serde(default)]
    styles: Vec<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            base_url: default_base_url(),
            styles: vec![],
        }
    }
}

#[derive(Debug, Deserialize)]
struct DocsSettings {
    #[serde(default = "default_docs_dir")]
    dir: String,
    #[serde(default = "default_sidebar")]
    sidebar: String,
    #[serde(default = "default_output")]
    output: String,
}

impl Default for DocsSettings {
    fn default() -> Self {
        Self {
            dir: default_docs_dir(),
            sidebar: default_sidebar(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct CookbookSettings {
    dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiSettings {
    openapi: Option<String>,
    service: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EditSettings {
    owner: String,
    repo: String,
    #[serde(default = "default_sha")]
    sha: String,
    #[serde(default)]
    dir: String,
}

#[derive(Debug, Deserialize)]
struct BuildSettings {
    #[serde(default = "default_minify")]
    minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

fn default_title() -> String {
    "Documentation".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_docs_dir() -> String {
    "content/docs".to_string()
}
fn default_sidebar() -> String {
    "sidebar.yml".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_sha() -> String {
    "main".to_string()
}
fn default_minify() -> bool {
    true
}

impl ConfigFile {
    /// Load configuration from `path` if it exists.
    ///
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();

        if !path.exists() {
            tracing::debug!("{} not found, using defaults", path.display());
            return Ok(Self {
                root,
                ..Default::default()
            });
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.root = root;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Where the site content and sidebar live.
    pub fn site(&self) -> SiteConfig {
        SiteConfig {
            title: self.site.title.clone(),
            base_url: self.site.base_url.clone(),
            styles: self
                .site
                .styles
                .iter()
                .map(|s| self.resolve(s).to_string_lossy().into_owned())
                .collect(),
            docs_dir: self.resolve(&self.docs.dir),
            sidebar: self.resolve(&self.docs.sidebar),
            cookbooks_dir: self.cookbooks.dir.as_deref().map(|d| self.resolve(d)),
            edit: self.edit.as_ref().map(|e| EditLink {
                owner: e.owner.clone(),
                repo: e.repo.clone(),
                sha: e.sha.clone(),
                dir: e.dir.clone(),
            }),
            ..Default::default()
        }
    }

    pub fn api(&self) -> ApiFiles {
        ApiFiles {
            openapi: self.api.openapi.as_deref().map(|p| self.resolve(p)),
            service: self.api.service.as_deref().map(|p| self.resolve(p)),
        }
    }

    /// Build settings, with command line overrides applied.
    pub fn build(&self, output: Option<PathBuf>, minify: Option<bool>) -> BuildConfig {
        BuildConfig {
            site: self.site(),
            output_dir: output.unwrap_or_else(|| self.resolve(&self.docs.output)),
            minify: minify.unwrap_or(self.build.minify),
            api: self.api(),
        }
    }

    pub fn dev(&self, port: u16, open: bool) -> DevServerConfig {
        DevServerConfig {
            site: SiteConfig {
                live_reload: true,
                ..self.site()
            },
            api: self.api(),
            port,
            open,
            ..Default::default()
        }
    }
}
