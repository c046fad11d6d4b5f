//! MDX reader for documentation pages.
//!
//! Extracts YAML frontmatter, reduces MDX to plain Markdown, builds a table
//! of contents and renders the result to HTML.

pub mod frontmatter;
pub mod parser;
pub mod render;
pub mod strip;

pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
pub use parser::{parse_mdx, slugify, ParseError, ParsedDoc, TocEntry};
pub use render::render_html;
pub use strip::strip_mdx;
