//! Site loading, rendering and static builds for sutradocs.
//!
//! Content collections are scanned into [`PageSource`]s, combined with the
//! sidebar catalog into a [`Site`], and rendered either on demand (dev server)
//! or all at once by the [`StaticBuilder`].

pub mod assets;
pub mod builder;
pub mod data;
pub mod site;
pub mod source;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use data::{load_json, load_openapi_spec, ApiFiles, DataError};
pub use site::{Collection, EditLink, Site, SiteConfig, SiteError};
pub use source::{Page, PageSource, SourceError, TreeItem};
