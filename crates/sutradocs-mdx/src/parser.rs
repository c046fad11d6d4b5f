//! MDX document parser.

use std::collections::HashMap;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
use crate::strip::strip_mdx;

/// A parsed MDX document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content, without frontmatter and MDX-only syntax
    pub content: String,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

impl ParsedDoc {
    /// Title from frontmatter, falling back to the first top-level heading.
    pub fn title(&self) -> Option<String> {
        self.frontmatter
            .as_ref()
            .map(|f| f.title.clone())
            .or_else(|| first_heading(&self.content))
    }

    pub fn description(&self) -> Option<&str> {
        self.frontmatter.as_ref()?.description.as_deref()
    }
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (2-6)
    pub level: u8,
}

/// Errors that can occur when parsing MDX.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Markdown extensions enabled for docs content.
pub(crate) fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Parse an MDX document.
///
/// Extracts frontmatter, strips MDX syntax and builds the table of contents.
pub fn parse_mdx(source: &str) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, body) = extract_frontmatter(source)?;
    let content = strip_mdx(body);

    let toc = headings(&content)
        .into_iter()
        .filter(|h| h.level >= 2)
        .collect();

    Ok(ParsedDoc {
        frontmatter,
        content,
        toc,
    })
}

/// All headings in `content`, in document order, with unique anchor ids.
pub(crate) fn headings(content: &str) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    let mut slugger = Slugger::default();
    let mut current: Option<(u8, Option<String>, String)> = None; // (level, explicit id, text)

    for event in Parser::new_ext(content, markdown_options()) {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                current = Some((level as u8, id.map(|i| i.to_string()), String::new()));
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut heading_text)) = current {
                    heading_text.push_str(&text);
                }
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, explicit, title)) = current.take() {
                    let id = match explicit {
                        Some(id) => id,
                        None => slugger.slug(&title),
                    };
                    entries.push(TocEntry { title, id, level });
                }
            }

            _ => {}
        }
    }

    entries
}

fn first_heading(content: &str) -> Option<String> {
    headings(content)
        .into_iter()
        .find(|h| h.level == 1)
        .map(|h| h.title)
}

/// Hands out unique slugs, suffixing repeats with `-1`, `-2`, ...
#[derive(Debug, Default)]
struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        slug
    }
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_complete_mdx() {
        let source = r#"---
title: Streaming
description: Token streaming with server-sent events
---
import { Callout } from 'fumadocs-ui/components/callout';

# Streaming

<Callout type="info">
  Streaming is supported on every model.
</Callout>

## Enable streaming

```python
client.chat.completions.create(stream=True)
```

## Handling `delta` chunks

Read each chunk.
"#;

        let doc = parse_mdx(source).unwrap();

        let fm = doc.frontmatter.as_ref().unwrap();
        assert_eq!(fm.title, "Streaming");
        assert_eq!(doc.description(), Some("Token streaming with server-sent events"));

        assert!(!doc.content.contains("import"));
        assert!(!doc.content.contains("<Callout"));
        assert!(doc.content.contains("Streaming is supported on every model."));

        assert_eq!(
            doc.toc,
            vec![
                TocEntry {
                    title: "Enable streaming".to_string(),
                    id: "enable-streaming".to_string(),
                    level: 2,
                },
                TocEntry {
                    title: "Handling delta chunks".to_string(),
                    id: "handling-delta-chunks".to_string(),
                    level: 2,
                },
            ]
        );
    }

    #[test]
    fn title_falls_back_to_first_heading() {
        let doc = parse_mdx("# Just Markdown\n\nNo frontmatter.").unwrap();

        assert!(doc.frontmatter.is_none());
        assert_eq!(doc.title(), Some("Just Markdown".to_string()));
        assert!(doc.toc.is_empty());
    }

    #[test]
    fn repeated_headings_get_unique_ids() {
        let doc = parse_mdx("## Example\n\n## Example\n\n### Example").unwrap();

        let ids: Vec<_> = doc.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["example", "example-1", "example-2"]);
    }

    #[test]
    fn keeps_explicit_heading_ids() {
        let doc = parse_mdx("## Rate limits {#limits}").unwrap();

        assert_eq!(doc.toc[0].id, "limits");
        assert_eq!(doc.toc[0].title, "Rate limits");
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("SUTRA (V2) Guide"), "sutra-v2-guide");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
