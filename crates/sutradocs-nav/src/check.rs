//! Consistency checks between a catalog and the pages on disk.

use std::fmt;

use crate::catalog::Catalog;
use crate::links::PageLookup;

/// A problem found while checking a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// A page entry points at a URL with no page behind it
    MissingPage { category: String, path: String },

    /// A category has nothing that prev/next links can land on
    NoNavigableEntries { category: String },
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPage { category, path } => {
                write!(f, "{category}: no page found for {path}")
            }
            Self::NoNavigableEntries { category } => {
                write!(f, "{category}: category has no navigable entries")
            }
        }
    }
}

/// Check every catalog entry against `pages`.
///
/// Group headers are not required to have a page.
pub fn check_catalog<L>(catalog: &Catalog, pages: &L) -> Vec<CatalogIssue>
where
    L: PageLookup + ?Sized,
{
    let mut issues = Vec::new();

    for category in catalog.categories() {
        if category.first_navigable().is_none() {
            issues.push(CatalogIssue::NoNavigableEntries {
                category: category.title.clone(),
            });
        }

        for entry in category.navigable() {
            if pages.lookup(&entry.path).is_none() {
                issues.push(CatalogIssue::MissingPage {
                    category: category.title.clone(),
                    path: entry.path.clone(),
                });
            }
        }
    }

    issues
}
