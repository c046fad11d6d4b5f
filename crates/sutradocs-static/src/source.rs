//! Page source: content files mapped to URLs.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use sutradocs_mdx::{parse_mdx, ParsedDoc};
use sutradocs_nav::{PageLookup, PageSummary};

/// A content page.
#[derive(Debug, Clone)]
pub struct Page {
    /// URL path (e.g. `/docs/models/overview`)
    pub url: String,

    /// URL segments below the collection base
    pub slug: Vec<String>,

    /// Source file path
    pub source_path: PathBuf,

    /// Path relative to the collection directory
    pub relative_path: PathBuf,

    /// Parsed document
    pub doc: ParsedDoc,
}

impl Page {
    pub fn title(&self) -> String {
        self.doc.title().unwrap_or_else(|| {
            self.slug
                .last()
                .map(|s| capitalize(s))
                .unwrap_or_else(|| "Untitled".to_string())
        })
    }

    pub fn description(&self) -> Option<String> {
        self.doc.description().map(str::to_string)
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary {
            url: self.url.clone(),
            title: self.title(),
            description: self.description(),
        }
    }
}

/// A node in a directory-derived page tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeItem {
    pub title: String,
    pub url: String,
    pub children: Vec<TreeItem>,
}

/// Errors that can occur when loading pages.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Content directory not found: {0}")]
    NotFound(String),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse MDX: {path}: {message}")]
    Parse { path: String, message: String },
}

/// All pages of one content collection mounted under a base URL.
#[derive(Debug, Clone)]
pub struct PageSource {
    base_url: String,
    pages: Vec<Page>,
    by_url: HashMap<String, usize>,
}

impl PageSource {
    /// Scan `root` for `.md`/`.mdx` files and mount them under `base_url`.
    pub fn scan(root: &Path, base_url: &str) -> Result<Self, SourceError> {
        if !root.exists() {
            return Err(SourceError::NotFound(root.display().to_string()));
        }

        let mut pages = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "mdx" && ext != "md" {
                continue;
            }

            let content = fs::read_to_string(path).map_err(|e| SourceError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let doc = parse_mdx(&content).map_err(|e| SourceError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            let slug = slug_for(&relative_path);
            let url = url_for(base_url, &slug);

            pages.push(Page {
                url,
                slug,
                source_path: path.to_path_buf(),
                relative_path,
                doc,
            });
        }

        pages.sort_by(|a, b| a.slug.cmp(&b.slug));

        let mut by_url = HashMap::new();
        for (index, page) in pages.iter().enumerate() {
            if let Some(previous) = by_url.insert(page.url.clone(), index) {
                tracing::warn!(
                    "{} and {} both map to {}",
                    pages[previous].source_path.display(),
                    page.source_path.display(),
                    page.url
                );
            }
        }

        tracing::debug!("Loaded {} pages from {}", pages.len(), root.display());

        Ok(Self {
            base_url: normalize_url(base_url),
            pages,
            by_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Look up a page by its slug segments; an empty slug is the index page.
    pub fn get_page(&self, slug: &[&str]) -> Option<&Page> {
        let slug: Vec<String> = slug.iter().map(|s| s.to_string()).collect();
        self.get_page_by_url(&url_for(&self.base_url, &slug))
    }

    /// Look up a page by URL. Trailing slashes are ignored.
    pub fn get_page_by_url(&self, url: &str) -> Option<&Page> {
        let index = self.by_url.get(&normalize_url(url))?;
        self.pages.get(*index)
    }

    /// Whether `url` falls under this collection's base URL.
    pub fn contains_url(&self, url: &str) -> bool {
        let url = normalize_url(url);
        url == self.base_url
            || self.base_url == "/"
            || url.starts_with(&format!("{}/", self.base_url))
    }

    /// Slugs of every page, for pre-rendering.
    pub fn generate_params(&self) -> Vec<Vec<String>> {
        self.pages.iter().map(|p| p.slug.clone()).collect()
    }

    /// Sidebar tree grouped by directory: top-level pages first, then one
    /// section per subdirectory.
    pub fn page_tree(&self) -> Vec<TreeItem> {
        let mut root = Vec::new();
        let mut sections: BTreeMap<String, Vec<TreeItem>> = BTreeMap::new();

        for page in &self.pages {
            let item = TreeItem {
                title: page.title(),
                url: page.url.clone(),
                children: Vec::new(),
            };

            match page.slug.split_first() {
                Some((section, rest)) if !rest.is_empty() => {
                    sections.entry(section.clone()).or_default().push(item);
                }
                _ => root.push(item),
            }
        }

        for (section, children) in sections {
            let url = url_for(&self.base_url, std::slice::from_ref(&section));

            // A directory with its own index page nests under that page.
            if let Some(index_item) = root.iter_mut().find(|item| item.url == url) {
                index_item.children = children;
                continue;
            }

            root.push(TreeItem {
                title: capitalize(&section.replace('-', " ")),
                url,
                children,
            });
        }

        root
    }
}

impl PageLookup for PageSource {
    fn lookup(&self, url: &str) -> Option<PageSummary> {
        self.get_page_by_url(url).map(Page::summary)
    }
}

/// `a/b.mdx` -> `["a", "b"]`, `a/index.mdx` -> `["a"]`.
fn slug_for(relative: &Path) -> Vec<String> {
    let mut slug: Vec<String> = relative
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();

    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("index");

    if stem != "index" {
        slug.push(stem.to_string());
    }

    slug
}

fn url_for(base_url: &str, slug: &[String]) -> String {
    let base = normalize_url(base_url);
    if slug.is_empty() {
        return base;
    }
    format!("{}/{}", base.trim_end_matches('/'), slug.join("/"))
}

/// Ensure a leading slash and drop trailing ones (except for the root).
fn normalize_url(url: &str) -> String {
    let trimmed = url.trim().trim_matches('/');
    format!("/{trimmed}")
}

/// Capitalize first letter of a string.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> (tempfile::TempDir, PageSource) {
        let temp = tempdir().unwrap();
        let root = temp.path();
        write(root, "index.mdx", "---\ntitle: Introduction\n---\n# Intro");
        write(
            root,
            "getting-started.mdx",
            "---\ntitle: Getting Started\ndescription: First request\n---\n",
        );
        write(root, "models/overview.mdx", "---\ntitle: Overview\n---\n");
        write(root, "models/index.md", "# Models");
        write(root, "notes.txt", "ignored");

        let source = PageSource::scan(root, "/docs").unwrap();
        (temp, source)
    }

    #[test]
    fn maps_files_to_urls() {
        let (_temp, source) = fixture();

        let urls: Vec<_> = source.pages().iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["/docs", "/docs/getting-started", "/docs/models", "/docs/models/overview"]
        );
    }

    #[test]
    fn looks_up_by_slug_and_url() {
        let (_temp, source) = fixture();

        assert_eq!(source.get_page(&[]).unwrap().title(), "Introduction");
        assert_eq!(source.get_page(&["models", "overview"]).unwrap().title(), "Overview");
        assert_eq!(source.get_page_by_url("/docs/models/").unwrap().title(), "Models");
        assert!(source.get_page(&["missing"]).is_none());
    }

    #[test]
    fn implements_page_lookup() {
        let (_temp, source) = fixture();

        let summary = source.lookup("/docs/getting-started").unwrap();
        assert_eq!(summary.title, "Getting Started");
        assert_eq!(summary.description.as_deref(), Some("First request"));
        assert!(source.lookup("/docs/nope").is_none());
    }

    #[test]
    fn generates_params() {
        let (_temp, source) = fixture();

        let params = source.generate_params();
        assert!(params.contains(&vec![]));
        assert!(params.contains(&vec!["models".to_string(), "overview".to_string()]));
    }

    #[test]
    fn builds_directory_tree() {
        let (_temp, source) = fixture();

        let tree = source.page_tree();

        let titles: Vec<_> = tree.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Introduction", "Getting Started", "Models"]);
        assert_eq!(tree[2].url, "/docs/models");
        assert_eq!(tree[2].children[0].title, "Overview");
    }

    #[test]
    fn checks_url_membership() {
        let (_temp, source) = fixture();

        assert!(source.contains_url("/docs/anything"));
        assert!(source.contains_url("/docs/"));
        assert!(!source.contains_url("/cookbook/x"));
        assert!(!source.contains_url("/docsx"));
    }

    #[test]
    fn errors_on_missing_directory() {
        let result = PageSource::scan(Path::new("/definitely/not/here"), "/docs");

        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[test]
    fn errors_on_bad_frontmatter() {
        let temp = tempdir().unwrap();
        write(temp.path(), "broken.mdx", "---\ntitle: x\n");

        let result = PageSource::scan(temp.path(), "/docs");

        assert!(matches!(result, Err(SourceError::Parse { .. })));
    }
}
