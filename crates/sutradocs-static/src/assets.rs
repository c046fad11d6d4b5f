//! Asset pipeline for CSS and JavaScript processing.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the main JavaScript file.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* sutradocs theme */

:root {
  --sidebar-width: 268px;
  --toc-width: 220px;
  --content-max-width: 760px;
  --background: #ffffff;
  --foreground: #0a0a0a;
  --muted: #f5f5f4;
  --muted-foreground: #57534e;
  --border: #e7e5e4;
  --accent: #ede9fe;
  --primary: #6d28d9;
  --radius: 0.5rem;
}

@media (prefers-color-scheme: dark) {
  :root {
    --background: #0c0a09;
    --foreground: #fafaf9;
    --muted: #1c1917;
    --muted-foreground: #a8a29e;
    --border: #292524;
    --accent: #2e1065;
    --primary: #a78bfa;
  }
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.65;
}

.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr var(--toc-width);
  min-height: 100vh;
}

.layout.full {
  grid-template-columns: var(--sidebar-width) 1fr;
}

/* Sidebar */
.sidebar {
  border-right: 1px solid var(--border);
  padding: 1.5rem 1rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
}

.nav-logo {
  font-weight: 700;
  font-size: 1.15rem;
  color: var(--foreground);
  text-decoration: none;
}

.nav-section {
  margin-top: 1.5rem;
}

.nav-section-title {
  font-size: 0.8rem;
  font-weight: 600;
  text-transform: uppercase;
  letter-spacing: 0.04em;
  color: var(--muted-foreground);
  margin-bottom: 0.5rem;
}

.nav-list,
.nav-children {
  list-style: none;
}

.nav-children {
  margin-left: 0.75rem;
}

.nav-group {
  font-size: 0.85rem;
  font-weight: 600;
  padding: 0.75rem 0.5rem 0.25rem;
}

.nav-item a {
  display: block;
  padding: 0.3rem 0.5rem;
  color: var(--muted-foreground);
  text-decoration: none;
  border-radius: var(--radius);
}

.nav-item a:hover {
  background: var(--muted);
  color: var(--foreground);
}

.nav-item.active > a {
  background: var(--accent);
  color: var(--primary);
  font-weight: 500;
}

/* Content */
.main {
  display: contents;
}

.doc {
  padding: 3rem 2.5rem;
  max-width: var(--content-max-width);
  width: 100%;
  margin: 0 auto;
}

.doc-title {
  font-size: 2rem;
  line-height: 1.2;
}

.doc-description {
  color: var(--muted-foreground);
  margin-top: 0.5rem;
}

.content {
  margin-top: 2rem;
}

.content h2 {
  margin: 2.5rem 0 1rem;
  font-size: 1.4rem;
}

.content h3 {
  margin: 2rem 0 0.75rem;
  font-size: 1.15rem;
}

.content p,
.content ul,
.content ol,
.content table {
  margin-bottom: 1rem;
}

.content ul,
.content ol {
  padding-left: 1.5rem;
}

.content a {
  color: var(--primary);
  font-weight: 500;
  text-underline-offset: 4px;
}

.content pre {
  background: var(--muted);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  overflow-x: auto;
  margin-bottom: 1rem;
  font-size: 0.875rem;
}

.content code {
  font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
}

.content table {
  border-collapse: collapse;
  width: 100%;
}

.content th,
.content td {
  border: 1px solid var(--border);
  padding: 0.5rem 0.75rem;
  text-align: left;
}

/* Footer cards */
.page-footer {
  display: grid;
  grid-template-columns: 1fr 1fr;
  gap: 1rem;
  margin-top: 4rem;
}

.footer-card {
  display: block;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  color: var(--foreground);
  text-decoration: none;
  min-width: 0;
}

.footer-card:hover {
  background: var(--muted);
}

.footer-card.next {
  text-align: right;
}

.footer-title {
  font-weight: 500;
}

.footer-card p {
  color: var(--muted-foreground);
  font-size: 0.875rem;
  margin-top: 0.25rem;
  white-space: nowrap;
  overflow: hidden;
  text-overflow: ellipsis;
}

/* Table of contents */
.toc {
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
  padding: 3rem 1rem;
  font-size: 0.85rem;
}

.toc h2 {
  font-size: 0.85rem;
  margin-bottom: 0.75rem;
}

.toc ul {
  list-style: none;
}

.toc a {
  color: var(--muted-foreground);
  text-decoration: none;
}

.toc a.active {
  color: var(--primary);
}

.toc-level-3 {
  padding-left: 0.75rem;
}

.toc-level-4,
.toc-level-5,
.toc-level-6 {
  padding-left: 1.5rem;
}

.edit-link {
  display: inline-block;
  margin-top: 1.5rem;
  color: var(--muted-foreground);
}

@media (max-width: 1100px) {
  .layout {
    grid-template-columns: var(--sidebar-width) 1fr;
  }

  .toc {
    display: none;
  }
}

@media (max-width: 768px) {
  .layout {
    grid-template-columns: 1fr;
  }

  .sidebar {
    position: static;
    height: auto;
    border-right: none;
    border-bottom: 1px solid var(--border);
  }
}
"#;

const DEFAULT_JS: &str = r##"// sutradocs client
(function () {
  'use strict';

  // Highlight the table of contents entry for the heading in view.
  const links = Array.from(document.querySelectorAll('.toc a[href^="#"]'));
  if (links.length === 0 || !('IntersectionObserver' in window)) {
    return;
  }

  const byId = new Map(links.map(function (a) {
    return [decodeURIComponent(a.getAttribute('href').slice(1)), a];
  }));

  const observer = new IntersectionObserver(function (entries) {
    entries.forEach(function (entry) {
      if (!entry.isIntersecting) return;
      links.forEach(function (a) { a.classList.remove('active'); });
      const link = byId.get(entry.target.id);
      if (link) link.classList.add('active');
    });
  }, { rootMargin: '0px 0px -70% 0px' });

  byId.forEach(function (_, id) {
    const heading = document.getElementById(id);
    if (heading) observer.observe(heading);
  });
})();
"##;
