//! Markdown to HTML rendering.

use pulldown_cmark::{html, CowStr, Event, Parser, Tag};

use crate::parser::{headings, markdown_options};

/// Render Markdown to HTML.
///
/// Headings get `id` attributes matching the ids in the table of contents.
pub fn render_html(content: &str) -> String {
    let mut ids = headings(content).into_iter().map(|h| h.id);

    let parser = Parser::new_ext(content, markdown_options()).map(|event| match event {
        Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs,
        }) => {
            let generated = ids.next();
            Event::Start(Tag::Heading {
                level,
                id: id.or_else(|| generated.map(CowStr::from)),
                classes,
                attrs,
            })
        }
        other => other,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}
