//! Template engine for rendering documentation pages.

use minijinja::Environment;
use serde::Serialize;

use sutradocs_mdx::TocEntry;
use sutradocs_nav::{Catalog, PageSummary};

use crate::source::TreeItem;

/// A titled block of sidebar links.
#[derive(Debug, Clone, Serialize)]
pub struct SidebarSection {
    pub title: String,
    pub items: Vec<SidebarItem>,
}

/// A sidebar link or group label.
#[derive(Debug, Clone, Serialize)]
pub struct SidebarItem {
    /// Display title
    pub title: String,
    /// Link target, prefixed with the base URL
    pub href: String,
    /// Rendered as a label, not a link
    pub group: bool,
    /// Whether this is the current page
    pub active: bool,
    /// Nested items
    pub children: Vec<SidebarItem>,
}

/// A previous/next card in the page footer.
#[derive(Debug, Clone, Serialize)]
pub struct FooterCard {
    pub href: String,
    pub title: String,
    pub description: Option<String>,
}

impl FooterCard {
    pub fn from_summary(summary: PageSummary, base_url: &str) -> Self {
        Self {
            href: site_href(base_url, &summary.url),
            title: summary.title,
            description: summary.description,
        }
    }
}

/// Context for rendering a page template.
#[derive(Debug, Clone, Serialize)]
pub struct Context {
    /// Page title
    pub title: String,
    /// Page description
    pub description: Option<String>,
    /// Site title
    pub site_title: String,
    /// Rendered content HTML
    pub content: String,
    /// Sidebar sections
    pub sidebar: Vec<SidebarSection>,
    /// Table of contents
    pub toc: Vec<TocEntry>,
    /// Base URL
    pub base_url: String,
    /// Paths to CSS stylesheets to include
    pub styles: Vec<String>,
    /// Footer card linking back
    pub previous: Option<FooterCard>,
    /// Footer card linking forward
    pub next: Option<FooterCard>,
    /// "Edit on GitHub" link
    pub edit_url: Option<String>,
    /// Hide the table of contents column
    pub full: bool,
    /// Include the dev server reload client
    pub live_reload: bool,
}

/// Prefix a site path with the base URL.
pub fn site_href(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Sidebar sections for a catalog-driven collection.
pub fn sidebar_from_catalog(catalog: &Catalog, current: &str, base_url: &str) -> Vec<SidebarSection> {
    catalog
        .categories()
        .iter()
        .map(|category| SidebarSection {
            title: category.title.clone(),
            items: category
                .entries
                .iter()
                .map(|entry| SidebarItem {
                    title: entry.title.clone(),
                    href: site_href(base_url, &entry.path),
                    group: entry.group,
                    active: entry.path == current,
                    children: Vec::new(),
                })
                .collect(),
        })
        .collect()
}

/// A single sidebar section for a directory-derived collection.
pub fn sidebar_from_tree(
    title: &str,
    tree: &[TreeItem],
    current: &str,
    base_url: &str,
) -> Vec<SidebarSection> {
    fn convert(item: &TreeItem, current: &str, base_url: &str) -> SidebarItem {
        SidebarItem {
            title: item.title.clone(),
            href: site_href(base_url, &item.url),
            group: false,
            active: item.url == current,
            children: item
                .children
                .iter()
                .map(|c| convert(c, current, base_url))
                .collect(),
        }
    }

    vec![SidebarSection {
        title: title.to_string(),
        items: tree.iter().map(|i| convert(i, current, base_url)).collect(),
    }]
}

/// Template engine using minijinja.
#[derive(Clone)]
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with default templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template("base.html", BASE_TEMPLATE)
            .expect("Failed to add base template");
        env.add_template("doc.html", DOC_TEMPLATE)
            .expect("Failed to add doc template");
        env.add_template("nav.html", NAV_TEMPLATE)
            .expect("Failed to add nav template");
        env.add_template("footer.html", FOOTER_TEMPLATE)
            .expect("Failed to add footer template");
        env.add_template("404.html", NOT_FOUND_TEMPLATE)
            .expect("Failed to add not found template");

        Self { env }
    }

    /// Render a page using the specified template.
    pub fn render_page(&self, template: &str, context: &Context) -> Result<String, minijinja::Error> {
        self.env.get_template(template)?.render(context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site_title }}</title>
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}{% for style in styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}<link rel="stylesheet" href="{{ base_url }}assets/main.css">
</head>
<body>
  <div class="layout{% if full %} full{% endif %}">
    <nav class="sidebar">
      {% include "nav.html" %}
    </nav>
    <main class="main">
      {% block content %}{% endblock %}
    </main>
  </div>
  <script src="{{ base_url }}assets/main.js"></script>
  {% if live_reload %}<script src="/__reload.js"></script>{% endif %}
</body>
</html>"##;

const DOC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="doc">
  <h1 class="doc-title">{{ title }}</h1>
  {% if description %}<p class="doc-description">{{ description }}</p>{% endif %}
  <div class="content">
    {{ content | safe }}
  </div>
  {% include "footer.html" %}
</article>

{% if toc and not full %}
<aside class="toc">
  <h2>On this page</h2>
  <ul>
  {% for entry in toc %}
    <li class="toc-level-{{ entry.level }}">
      <a href="#{{ entry.id }}">{{ entry.title }}</a>
    </li>
  {% endfor %}
  </ul>
  {% if edit_url %}<a class="edit-link" href="{{ edit_url }}">Edit on GitHub</a>{% endif %}
</aside>
{% elif edit_url %}
<aside class="toc"><a class="edit-link" href="{{ edit_url }}">Edit on GitHub</a></aside>
{% endif %}
{% endblock %}"##;

const NAV_TEMPLATE: &str = r##"<div class="nav-header">
  <a href="{{ base_url }}" class="nav-logo">{{ site_title }}</a>
</div>
{% for section in sidebar %}
<div class="nav-section">
  <p class="nav-section-title">{{ section.title }}</p>
  <ul class="nav-list">
  {% for item in section.items %}
    {% if item.group %}
    <li class="nav-group">{{ item.title }}</li>
    {% else %}
    <li class="nav-item{% if item.active %} active{% endif %}">
      <a href="{{ item.href }}">{{ item.title }}</a>
      {% if item.children %}
      <ul class="nav-children">
        {% for child in item.children %}
        <li class="nav-item{% if child.active %} active{% endif %}">
          <a href="{{ child.href }}">{{ child.title }}</a>
        </li>
        {% endfor %}
      </ul>
      {% endif %}
    </li>
    {% endif %}
  {% endfor %}
  </ul>
</div>
{% endfor %}"##;

const FOOTER_TEMPLATE: &str = r##"<nav class="page-footer">
  {% if previous %}
  <a class="footer-card prev" href="{{ previous.href }}">
    <span class="footer-title"><span class="chevron">&lsaquo;</span> {{ previous.title }}</span>
    {% if previous.description %}<p>{{ previous.description }}</p>{% endif %}
  </a>
  {% else %}
  <div></div>
  {% endif %}
  {% if next %}
  <a class="footer-card next" href="{{ next.href }}">
    <span class="footer-title">{{ next.title }} <span class="chevron">&rsaquo;</span></span>
    {% if next.description %}<p>{{ next.description }}</p>{% endif %}
  </a>
  {% else %}
  <div></div>
  {% endif %}
</nav>"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="doc not-found">
  <h1 class="doc-title">{{ title }}</h1>
  <p>The page you are looking for does not exist.</p>
  <p><a href="{{ base_url }}">Back to the documentation</a></p>
</article>
{% endblock %}"##;
