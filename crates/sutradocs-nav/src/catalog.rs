//! Catalog data model and loading.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Path of the landing page when the sidebar file does not name one.
pub const DEFAULT_INTRODUCTION: &str = "/docs";

/// A sidebar item: either a page link or a group header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Display title
    pub title: String,

    /// URL path, unique across the catalog
    pub path: String,

    /// Section header rather than a page
    #[serde(default)]
    pub group: bool,
}

impl Entry {
    /// Create a navigable page entry.
    pub fn page(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            group: false,
        }
    }

    /// Create a group header entry.
    pub fn group(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            group: true,
        }
    }

    /// Whether this entry can be a prev/next target.
    pub fn is_navigable(&self) -> bool {
        !self.group
    }
}

/// A titled run of entries shown together in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,

    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Category {
    pub fn new(title: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            title: title.into(),
            entries,
        }
    }

    /// Entries that are real pages, in sidebar order.
    pub fn navigable(&self) -> impl DoubleEndedIterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_navigable())
    }

    pub fn first_navigable(&self) -> Option<&Entry> {
        self.navigable().next()
    }

    pub fn last_navigable(&self) -> Option<&Entry> {
        self.navigable().next_back()
    }
}

/// The full, ordered sidebar used for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    categories: Vec<Category>,
    introduction: String,
}

/// On-disk shape of `sidebar.yml`.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default = "default_introduction")]
    introduction: String,

    #[serde(default)]
    categories: Vec<Category>,
}

fn default_introduction() -> String {
    DEFAULT_INTRODUCTION.to_string()
}

impl Catalog {
    /// Build a catalog, rejecting empty or duplicate entry paths.
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();

        for category in &categories {
            for entry in &category.entries {
                if entry.path.trim().is_empty() {
                    return Err(CatalogError::EmptyPath {
                        category: category.title.clone(),
                        title: entry.title.clone(),
                    });
                }
                if !seen.insert(entry.path.as_str()) {
                    return Err(CatalogError::DuplicatePath(entry.path.clone()));
                }
            }
        }

        Ok(Self {
            categories,
            introduction: default_introduction(),
        })
    }

    /// Override the landing page that never gets a previous link.
    pub fn with_introduction(mut self, path: impl Into<String>) -> Self {
        self.introduction = path.into();
        self
    }

    /// Parse a catalog from `sidebar.yml` content.
    pub fn from_yaml(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_yaml::from_str(source).map_err(|e| CatalogError::InvalidYaml(e.to_string()))?;

        Ok(Self::new(file.categories)?.with_introduction(file.introduction))
    }

    /// Load a catalog from a YAML file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let source = fs::read_to_string(path).map_err(|e| CatalogError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let catalog = Self::from_yaml(&source)?;

        tracing::debug!(
            "Loaded {} categories ({} entries) from {}",
            catalog.categories.len(),
            catalog.entries().count(),
            path.display()
        );

        Ok(catalog)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn introduction(&self) -> &str {
        &self.introduction
    }

    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.entries.is_empty())
    }

    /// All entries, group headers included, in traversal order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.categories.iter().flat_map(|c| c.entries.iter())
    }

    /// Navigable entries across every category, in traversal order.
    pub fn navigable(&self) -> impl Iterator<Item = &Entry> {
        self.categories.iter().flat_map(Category::navigable)
    }

    /// Position of the entry with this path as (category index, entry index).
    pub fn locate(&self, path: &str) -> Option<(usize, usize)> {
        self.categories.iter().enumerate().find_map(|(ci, category)| {
            category
                .entries
                .iter()
                .position(|e| e.path == path)
                .map(|ei| (ci, ei))
        })
    }

    /// Look up an entry by path.
    pub fn find(&self, path: &str) -> Option<&Entry> {
        let (ci, ei) = self.locate(path)?;
        self.categories.get(ci)?.entries.get(ei)
    }
}

/// Errors that can occur when building or loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read sidebar file {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid YAML in sidebar file: {0}")]
    InvalidYaml(String),

    #[error("Duplicate sidebar path: {0}")]
    DuplicatePath(String),

    #[error("Entry '{title}' in category '{category}' has an empty path")]
    EmptyPath { category: String, title: String },
}
