//! A loaded documentation site: catalog, page sources and templates.

use std::path::{Path, PathBuf};

use sutradocs_mdx::render_html;
use sutradocs_nav::{footer_links, Catalog, CatalogError, FooterLinks};

use crate::source::{Page, PageSource, SourceError};
use crate::templates::{
    sidebar_from_catalog, sidebar_from_tree, Context, FooterCard, SidebarSection, TemplateEngine,
};

/// Where "Edit on GitHub" links point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditLink {
    pub owner: String,
    pub repo: String,
    /// Branch, tag or commit
    pub sha: String,
    /// Content directory inside the repository
    pub dir: String,
}

impl EditLink {
    /// GitHub URL for a content file, given its path relative to the content directory.
    pub fn url_for(&self, relative: &Path) -> String {
        let file = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let dir = self.dir.trim_matches('/');

        if dir.is_empty() {
            format!(
                "https://github.com/{}/{}/blob/{}/{}",
                self.owner, self.repo, self.sha, file
            )
        } else {
            format!(
                "https://github.com/{}/{}/blob/{}/{}/{}",
                self.owner, self.repo, self.sha, dir, file
            )
        }
    }
}

/// Configuration for loading a site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Site title
    pub title: String,

    /// Base URL the site is deployed under
    pub base_url: String,

    /// Paths to CSS stylesheets to include
    pub styles: Vec<String>,

    /// Docs content directory
    pub docs_dir: PathBuf,

    /// URL the docs collection is mounted at
    pub docs_url: String,

    /// Sidebar catalog file
    pub sidebar: PathBuf,

    /// Cookbook content directory
    pub cookbooks_dir: Option<PathBuf>,

    /// URL the cookbook collection is mounted at
    pub cookbooks_url: String,

    /// "Edit on GitHub" target for docs pages
    pub edit: Option<EditLink>,

    /// Include the dev server reload client in pages
    pub live_reload: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_string(),
            base_url: "/".to_string(),
            styles: vec![],
            docs_dir: PathBuf::from("content/docs"),
            docs_url: "/docs".to_string(),
            sidebar: PathBuf::from("sidebar.yml"),
            cookbooks_dir: None,
            cookbooks_url: "/cookbook".to_string(),
            edit: None,
            live_reload: false,
        }
    }
}

/// Which collection a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Docs,
    Cookbooks,
}

/// Errors that can occur when loading or rendering a site.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Failed to render template: {0}")]
    Template(String),
}

/// A documentation site ready to render.
#[derive(Clone)]
pub struct Site {
    config: SiteConfig,
    catalog: Catalog,
    docs: PageSource,
    cookbooks: Option<PageSource>,
    templates: TemplateEngine,
}

impl Site {
    /// Load the catalog and scan every collection.
    pub fn load(config: SiteConfig) -> Result<Self, SiteError> {
        let catalog = load_catalog(&config.sidebar)?;
        let docs = PageSource::scan(&config.docs_dir, &config.docs_url)?;
        let cookbooks = load_cookbooks(&config)?;

        Ok(Self::new(config, catalog, docs, cookbooks))
    }

    pub fn new(
        config: SiteConfig,
        catalog: Catalog,
        docs: PageSource,
        cookbooks: Option<PageSource>,
    ) -> Self {
        Self {
            config,
            catalog,
            docs,
            cookbooks,
            templates: TemplateEngine::new(),
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn docs(&self) -> &PageSource {
        &self.docs
    }

    pub fn cookbooks(&self) -> Option<&PageSource> {
        self.cookbooks.as_ref()
    }

    /// Re-read the sidebar file.
    pub fn reload_catalog(&mut self) -> Result<(), SiteError> {
        self.catalog = load_catalog(&self.config.sidebar)?;
        Ok(())
    }

    /// Re-scan all content directories.
    pub fn reload_pages(&mut self) -> Result<(), SiteError> {
        self.docs = PageSource::scan(&self.config.docs_dir, &self.config.docs_url)?;
        self.cookbooks = load_cookbooks(&self.config)?;
        Ok(())
    }

    /// Every page with its collection, docs first.
    pub fn pages(&self) -> impl Iterator<Item = (Collection, &Page)> {
        let docs = self.docs.pages().iter().map(|p| (Collection::Docs, p));
        let cookbooks = self
            .cookbooks
            .iter()
            .flat_map(|c| c.pages().iter().map(|p| (Collection::Cookbooks, p)));
        docs.chain(cookbooks)
    }

    /// Find the page at `url` in any collection.
    pub fn find(&self, url: &str) -> Option<(Collection, &Page)> {
        if let Some(page) = self.docs.get_page_by_url(url) {
            return Some((Collection::Docs, page));
        }
        self.cookbooks
            .as_ref()?
            .get_page_by_url(url)
            .map(|p| (Collection::Cookbooks, p))
    }

    /// Render the page at `url`, or `None` if there is no such page.
    pub fn render(&self, url: &str) -> Result<Option<String>, SiteError> {
        match self.find(url) {
            Some((collection, page)) => self.render_page(collection, page).map(Some),
            None => Ok(None),
        }
    }

    /// Previous/next links for a page. Only docs pages are linked.
    pub fn footer(&self, collection: Collection, page: &Page) -> FooterLinks {
        match collection {
            Collection::Docs => footer_links(&self.catalog, &self.docs, &page.url),
            Collection::Cookbooks => FooterLinks::default(),
        }
    }

    /// Render one page to HTML.
    pub fn render_page(&self, collection: Collection, page: &Page) -> Result<String, SiteError> {
        let base_url = &self.config.base_url;
        let footer = self.footer(collection, page);

        let edit_url = match collection {
            Collection::Docs => self
                .config
                .edit
                .as_ref()
                .map(|e| e.url_for(&page.relative_path)),
            Collection::Cookbooks => None,
        };

        let context = Context {
            title: page.title(),
            description: page.description(),
            site_title: self.config.title.clone(),
            content: render_html(&page.doc.content),
            sidebar: self.sidebar(collection, &page.url),
            toc: page.doc.toc.clone(),
            base_url: base_url.clone(),
            styles: self.style_hrefs(),
            previous: footer.previous.map(|s| FooterCard::from_summary(s, base_url)),
            next: footer.next.map(|s| FooterCard::from_summary(s, base_url)),
            edit_url,
            full: page.doc.frontmatter.as_ref().is_some_and(|f| f.full),
            live_reload: self.config.live_reload,
        };

        self.templates
            .render_page("doc.html", &context)
            .map_err(|e| SiteError::Template(e.to_string()))
    }

    /// Render the "page not found" page.
    pub fn render_not_found(&self) -> Result<String, SiteError> {
        let context = Context {
            title: "Page not found".to_string(),
            description: None,
            site_title: self.config.title.clone(),
            content: String::new(),
            sidebar: self.sidebar(Collection::Docs, ""),
            toc: vec![],
            base_url: self.config.base_url.clone(),
            styles: self.style_hrefs(),
            previous: None,
            next: None,
            edit_url: None,
            full: true,
            live_reload: self.config.live_reload,
        };

        self.templates
            .render_page("404.html", &context)
            .map_err(|e| SiteError::Template(e.to_string()))
    }

    fn sidebar(&self, collection: Collection, current: &str) -> Vec<SidebarSection> {
        let base_url = &self.config.base_url;
        match (collection, &self.cookbooks) {
            (Collection::Cookbooks, Some(cookbooks)) => {
                sidebar_from_tree("Cookbooks", &cookbooks.page_tree(), current, base_url)
            }
            _ if self.catalog.is_empty() => {
                sidebar_from_tree("Documentation", &self.docs.page_tree(), current, base_url)
            }
            _ => sidebar_from_catalog(&self.catalog, current, base_url),
        }
    }

    fn style_hrefs(&self) -> Vec<String> {
        self.config
            .styles
            .iter()
            .map(|s| {
                let filename = Path::new(s)
                    .file_name()
                    .and_then(|f| f.to_str())
                    .unwrap_or("style.css");
                format!("{}assets/{}", self.config.base_url, filename)
            })
            .collect()
    }
}

fn load_catalog(path: &Path) -> Result<Catalog, SiteError> {
    if !path.exists() {
        tracing::warn!(
            "Sidebar file {} not found, using directory navigation",
            path.display()
        );
        return Ok(Catalog::new(vec![])?);
    }
    Ok(Catalog::load(path)?)
}

fn load_cookbooks(config: &SiteConfig) -> Result<Option<PageSource>, SiteError> {
    match &config.cookbooks_dir {
        Some(dir) if dir.exists() => Ok(Some(PageSource::scan(dir, &config.cookbooks_url)?)),
        Some(dir) => {
            tracing::warn!("Cookbook directory {} not found", dir.display());
            Ok(None)
        }
        None => Ok(None),
    }
}
