//! Sidebar catalog and previous/next page resolution.
//!
//! The catalog is an ordered list of categories, each holding page entries
//! and group headers. It is built once (usually from `sidebar.yml`) and passed
//! explicitly to whatever needs to resolve footer links for a page.

pub mod catalog;
pub mod check;
pub mod links;
pub mod resolve;

pub use catalog::{Catalog, CatalogError, Category, Entry, DEFAULT_INTRODUCTION};
pub use check::{check_catalog, CatalogIssue};
pub use links::{footer_links, FooterLinks, PageLookup, PageSummary};
pub use resolve::{resolve_adjacent, Adjacent};
