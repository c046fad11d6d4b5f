//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::assets::AssetPipeline;
use crate::data::{load_json, load_openapi_spec, ApiFiles, DataError};
use crate::site::{Collection, Site, SiteConfig, SiteError};
use crate::source::Page;
use crate::templates::site_href;

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// What to render
    pub site: SiteConfig,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// API data files published as JSON
    pub api: ApiFiles,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            output_dir: PathBuf::from("dist"),
            minify: true,
            api: ApiFiles::default(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Site(#[from] SiteError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Failed to read {0}")]
    ReadError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let site = Site::load(self.config.site.clone())?;

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let pages: Vec<(Collection, &Page)> = site.pages().collect();

        // Render and write pages in parallel
        let results: Vec<Result<(), BuildError>> = pages
            .par_iter()
            .map(|(collection, page)| self.build_page(&site, *collection, page))
            .collect();

        for result in results {
            result?;
        }

        self.write_not_found(&site)?;
        self.write_root_redirect(&site)?;
        self.generate_assets()?;
        self.generate_search_index(&pages)?;
        self.generate_sitemap(&pages)?;
        self.publish_api_data()?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: pages.len(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Output file for a page URL: `/docs/a` -> `<out>/docs/a/index.html`.
    fn output_path(&self, url: &str) -> PathBuf {
        let relative = url.trim_matches('/');
        if relative.is_empty() {
            self.config.output_dir.join("index.html")
        } else {
            self.config.output_dir.join(relative).join("index.html")
        }
    }

    fn build_page(&self, site: &Site, collection: Collection, page: &Page) -> Result<(), BuildError> {
        let html = site.render_page(collection, page)?;
        let output_path = self.output_path(&page.url);

        tracing::debug!("Rendering {} -> {}", page.url, output_path.display());

        write_file(&output_path, html)
    }

    fn write_not_found(&self, site: &Site) -> Result<(), BuildError> {
        let html = site.render_not_found()?;
        write_file(&self.config.output_dir.join("404.html"), html)
    }

    /// Send visitors of the bare site root to the introduction page.
    fn write_root_redirect(&self, site: &Site) -> Result<(), BuildError> {
        let index = self.config.output_dir.join("index.html");
        if index.exists() {
            return Ok(());
        }

        let introduction = site.catalog().introduction();
        let target = if site.find(introduction).is_some() {
            introduction
        } else {
            site.docs().base_url()
        };
        let href = site_href(&self.config.site.base_url, target);

        let html = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta http-equiv="refresh" content="0; url={href}">
  <link rel="canonical" href="{href}">
</head>
<body><a href="{href}">{href}</a></body>
</html>"#
        );

        write_file(&index, html)
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Skipping CSS minification: {}", e);
                css
            })
        } else {
            css
        };
        write_file(&assets_dir.join("main.css"), css)?;
        write_file(&assets_dir.join("main.js"), AssetPipeline::generate_js())?;

        // Copy configured stylesheets
        for style_path in &self.config.site.styles {
            let source_path = PathBuf::from(style_path);
            if source_path.exists() {
                let filename = source_path
                    .file_name()
                    .and_then(|f| f.to_str())
                    .unwrap_or("style.css");
                let content = fs::read_to_string(&source_path).map_err(|e| {
                    BuildError::ReadError(format!("stylesheet {}: {}", style_path, e))
                })?;
                write_file(&assets_dir.join(filename), content)?;
                tracing::info!("Copied stylesheet from {}", style_path);
            } else {
                tracing::warn!("Stylesheet not found: {}", style_path);
            }
        }

        Ok(())
    }

    /// Generate search index.
    fn generate_search_index(&self, pages: &[(Collection, &Page)]) -> Result<(), BuildError> {
        let index: Vec<serde_json::Value> = pages
            .iter()
            .map(|(collection, page)| {
                // Leading prose only; headings and code are skipped
                let content = page
                    .doc
                    .content
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with("```"))
                    .take(10)
                    .collect::<Vec<_>>()
                    .join(" ");

                serde_json::json!({
                    "title": page.title(),
                    "description": page.description().unwrap_or_default(),
                    "url": site_href(&self.config.site.base_url, &page.url),
                    "section": match collection {
                        Collection::Docs => "docs",
                        Collection::Cookbooks => "cookbook",
                    },
                    "headings": page.doc.toc.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(),
                    "content": content,
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&index)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        write_file(&self.config.output_dir.join("search-index.json"), json)
    }

    /// Generate sitemap.
    fn generate_sitemap(&self, pages: &[(Collection, &Page)]) -> Result<(), BuildError> {
        let urls: Vec<String> = pages
            .iter()
            .map(|(_, page)| {
                format!(
                    "  <url>\n    <loc>{}</loc>\n  </url>",
                    site_href(&self.config.site.base_url, &page.url)
                )
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        write_file(&self.config.output_dir.join("sitemap.xml"), sitemap)?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}",
            site_href(&self.config.site.base_url, "sitemap.xml")
        );
        write_file(&self.config.output_dir.join("robots.txt"), robots)
    }

    /// Publish the API data files as JSON next to the pages.
    fn publish_api_data(&self) -> Result<(), BuildError> {
        let api_dir = self.config.output_dir.join("api");

        if let Some(path) = &self.config.api.openapi {
            let spec = load_openapi_spec(path)?;
            write_json(&api_dir.join("openapi-spec.json"), &spec)?;
            tracing::info!("Published OpenAPI spec from {}", path.display());
        }

        if let Some(path) = &self.config.api.service {
            let data = load_json(path)?;
            write_json(&api_dir.join("sutra-api.json"), &data)?;
            tracing::info!("Published API service data from {}", path.display());
        }

        Ok(())
    }
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<(), BuildError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| BuildError::WriteError(e.to_string()))?;
    write_file(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site_fixture(root: &Path) -> SiteConfig {
        write(
            &root.join("content/docs/index.mdx"),
            "---\ntitle: Introduction\ndescription: Sutra models overview\n---\nSutra models speak 50+ languages.",
        );
        write(
            &root.join("content/docs/getting-started.mdx"),
            "---\ntitle: Getting Started\n---\n## Get an API key",
        );
        write(
            &root.join("sidebar.yml"),
            "categories:\n  - title: Get Started\n    entries:\n      - { title: Introduction, path: /docs }\n      - { title: Getting Started, path: /docs/getting-started }\n",
        );

        SiteConfig {
            docs_dir: root.join("content/docs"),
            sidebar: root.join("sidebar.yml"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn builds_simple_site() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");

        let builder = StaticBuilder::new(BuildConfig {
            site: site_fixture(temp.path()),
            output_dir: out.clone(),
            ..Default::default()
        });
        let result = builder.build().await.unwrap();

        assert_eq!(result.pages, 2);
        assert!(out.join("docs/index.html").exists());
        assert!(out.join("docs/getting-started/index.html").exists());
        assert!(out.join("404.html").exists());
        assert!(out.join("assets/main.css").exists());
        assert!(out.join("sitemap.xml").exists());

        let redirect = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(redirect.contains("url=/docs"));

        let started = fs::read_to_string(out.join("docs/getting-started/index.html")).unwrap();
        assert!(started.contains("footer-card prev"));
        assert!(started.contains("Sutra models overview"));
    }

    #[tokio::test]
    async fn generates_search_index() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");

        let builder = StaticBuilder::new(BuildConfig {
            site: site_fixture(temp.path()),
            output_dir: out.clone(),
            ..Default::default()
        });
        builder.build().await.unwrap();

        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("search-index.json")).unwrap())
                .unwrap();
        let entries = index.as_array().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["title"], "Introduction");
        assert_eq!(entries[0]["content"], "Sutra models speak 50+ languages.");
        assert_eq!(entries[1]["headings"][0], "Get an API key");
    }

    #[tokio::test]
    async fn publishes_api_data() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        let openapi = temp.path().join("data/sutra.yml");
        let service = temp.path().join("data/sutra-api-service.json");
        write(&openapi, "openapi: 3.0.0\ninfo:\n  title: Sutra\n  version: v2\n");
        write(&service, r#"{"name": "sutra"}"#);

        let builder = StaticBuilder::new(BuildConfig {
            site: site_fixture(temp.path()),
            output_dir: out.clone(),
            api: ApiFiles {
                openapi: Some(openapi),
                service: Some(service),
            },
            ..Default::default()
        });
        builder.build().await.unwrap();

        let spec = fs::read_to_string(out.join("api/openapi-spec.json")).unwrap();
        assert!(spec.contains("\"openapi\": \"3.0.0\""));
        assert!(out.join("api/sutra-api.json").exists());
    }

    #[tokio::test]
    async fn fails_on_missing_docs_dir() {
        let temp = tempdir().unwrap();

        let builder = StaticBuilder::new(BuildConfig {
            site: SiteConfig {
                docs_dir: temp.path().join("nope"),
                sidebar: temp.path().join("sidebar.yml"),
                ..Default::default()
            },
            output_dir: temp.path().join("dist"),
            ..Default::default()
        });

        assert!(matches!(builder.build().await, Err(BuildError::Site(_))));
    }
}
