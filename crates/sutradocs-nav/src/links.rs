//! Footer links: resolved entries joined with the pages they point at.

use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::{Catalog, Entry};
use crate::resolve::resolve_adjacent;

/// What a footer card needs to know about a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
}

/// Looks up rendered pages by URL.
pub trait PageLookup {
    /// Return the page at `url`, or `None` if no such page exists.
    fn lookup(&self, url: &str) -> Option<PageSummary>;
}

impl PageLookup for HashMap<String, PageSummary> {
    fn lookup(&self, url: &str) -> Option<PageSummary> {
        self.get(url).cloned()
    }
}

/// Previous and next cards for a page footer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FooterLinks {
    pub previous: Option<PageSummary>,
    pub next: Option<PageSummary>,
}

/// Resolve the footer links for `current_path`.
///
/// An entry whose page cannot be found produces no card.
pub fn footer_links<L>(catalog: &Catalog, pages: &L, current_path: &str) -> FooterLinks
where
    L: PageLookup + ?Sized,
{
    let adjacent = resolve_adjacent(catalog, current_path);

    FooterLinks {
        previous: adjacent.previous.and_then(|e| lookup_entry(pages, e)),
        next: adjacent.next.and_then(|e| lookup_entry(pages, e)),
    }
}

fn lookup_entry<L>(pages: &L, entry: &Entry) -> Option<PageSummary>
where
    L: PageLookup + ?Sized,
{
    let page = pages.lookup(&entry.path);
    if page.is_none() {
        tracing::warn!("Sidebar entry '{}' has no page at {}", entry.title, entry.path);
    }
    page
}
