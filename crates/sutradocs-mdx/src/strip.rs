//! Reduce MDX to plain Markdown.
//!
//! ESM lines (`import`/`export`) are dropped and JSX component tags are
//! removed, keeping whatever Markdown they wrap. Fenced code is left alone.

use std::sync::LazyLock;

use regex::Regex;

/// Matches a JSX component tag: opening, closing or self-closing.
/// Component tags start with an uppercase letter; lowercase tags are HTML.
static COMPONENT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[A-Z][A-Za-z0-9_.]*(?:\s+[^<>]*?)?\s*/?>").expect("valid component tag regex")
});

static ESM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:import|export)\s").expect("valid esm regex"));

/// An opening component tag whose props continue on the next line.
static UNCLOSED_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[A-Z][A-Za-z0-9_.]*(?:\s[^<>]*)?$").expect("valid unclosed tag regex")
});

/// Strip MDX-only syntax from `content`.
pub fn strip_mdx(content: &str) -> String {
    let mut output = Vec::new();
    let mut depth: usize = 0;
    let mut fence: Option<(String, usize)> = None; // (marker, indent)
    let mut esm_brackets: Option<i32> = None;
    let mut pending_tag: Option<String> = None;

    for line in content.lines() {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if let Some((marker, fence_indent)) = &fence {
            let closes = trimmed.starts_with(marker.as_str());
            output.push(dedent(line, *fence_indent).to_string());
            if closes {
                fence = None;
            }
            continue;
        }

        // Inside a multi-line import/export: drop lines until brackets balance.
        if let Some(open) = esm_brackets {
            let open = open + bracket_balance(line);
            esm_brackets = (open > 0).then_some(open);
            continue;
        }

        let chunk = match pending_tag.take() {
            // Props never contain blank lines; this was not a tag after all.
            Some(buffered) if trimmed.is_empty() => {
                output.extend(buffered.lines().map(str::to_string));
                output.push(line.to_string());
                continue;
            }
            Some(mut buffered) => {
                buffered.push('\n');
                buffered.push_str(line);
                buffered
            }
            None => {
                if let Some(marker) = fence_marker(trimmed) {
                    let fence_indent = if depth > 0 { indent } else { 0 };
                    output.push(dedent(line, fence_indent).to_string());
                    fence = Some((marker, fence_indent));
                    continue;
                }

                if depth == 0 && ESM_LINE.is_match(line) {
                    let open = bracket_balance(line);
                    esm_brackets = (open > 0).then_some(open);
                    continue;
                }

                line.to_string()
            }
        };

        if UNCLOSED_TAG.is_match(&chunk) {
            pending_tag = Some(chunk);
            continue;
        }

        output.push(strip_tags(&chunk, &mut depth));
    }

    if let Some(buffered) = pending_tag {
        output.extend(buffered.lines().map(str::to_string));
    }

    output.join("\n")
}

/// Remove component tags from `text`, tracking how deep inside components we are.
fn strip_tags(text: &str, depth: &mut usize) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut last = 0;
    for tag in COMPONENT_TAG.find_iter(text) {
        stripped.push_str(&text[last..tag.start()]);
        last = tag.end();

        let tag = tag.as_str();
        if tag.starts_with("</") {
            *depth = depth.saturating_sub(1);
        } else if !tag.ends_with("/>") {
            *depth += 1;
        }
    }
    stripped.push_str(&text[last..]);

    if *depth > 0 || last > 0 {
        stripped.trim().to_string()
    } else {
        stripped
    }
}

/// Opening minus closing brackets on one line.
fn bracket_balance(line: &str) -> i32 {
    line.chars().fold(0, |balance, c| match c {
        '{' | '(' | '[' => balance + 1,
        '}' | ')' | ']' => balance - 1,
        _ => balance,
    })
}

fn fence_marker(trimmed: &str) -> Option<String> {
    for marker in ["```", "~~~"] {
        if trimmed.starts_with(marker) {
            let len = trimmed.chars().take_while(|c| *c == marker.as_bytes()[0] as char).count();
            return Some(marker[..1].repeat(len));
        }
    }
    None
}

/// Remove up to `count` leading whitespace characters.
fn dedent(line: &str, count: usize) -> &str {
    let skip = line
        .char_indices()
        .take(count)
        .take_while(|(_, c)| c.is_whitespace())
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &line[skip..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drops_esm_lines() {
        let source = "import { Card } from 'fumadocs-ui/components/card';\nexport const meta = {};\n\n# Title";

        assert_eq!(strip_mdx(source), "\n# Title");
    }

    #[test]
    fn keeps_content_inside_components() {
        let source = "<Steps>\n  <Step>\n    ### Install the SDK\n  </Step>\n</Steps>";

        assert_eq!(strip_mdx(source), "\n\n### Install the SDK\n\n");
    }

    #[test]
    fn removes_self_closing_components() {
        let source = "Before <Endpoint method=\"POST\" path=\"/v2/chat\" /> after";

        assert_eq!(strip_mdx(source), "Before  after");
    }

    #[test]
    fn leaves_html_tags_alone() {
        let source = "<div class=\"note\">plain html</div>";

        assert_eq!(strip_mdx(source), source);
    }

    #[test]
    fn leaves_fenced_code_alone() {
        let source = "```tsx\nimport { Card } from 'ui';\n<Card title=\"x\" />\n```";

        assert_eq!(strip_mdx(source), source);
    }

    #[test]
    fn dedents_fences_nested_in_components() {
        let source = "<Tab>\n    ```python\n    def f():\n        return 1\n    ```\n</Tab>";

        assert_eq!(
            strip_mdx(source),
            "\n```python\ndef f():\n    return 1\n```\n"
        );
    }

    #[test]
    fn drops_multi_line_imports() {
        let source = "import {\n  Card,\n  Cards,\n} from 'fumadocs-ui/components/card';\n\nHello";

        assert_eq!(strip_mdx(source), "\nHello");
    }

    #[test]
    fn drops_multi_line_exports() {
        let source = "export const meta = {\n  title: 'Models',\n};\n# Models";

        assert_eq!(strip_mdx(source), "# Models");
    }

    #[test]
    fn removes_components_with_props_on_several_lines() {
        let source = "<ResourceCard\n  title=\"Python SDK\"\n  href=\"/docs/supported-sdks/python\"\n/>\n\nAfter";

        assert_eq!(strip_mdx(source), "\n\nAfter");
    }

    #[test]
    fn keeps_content_of_multi_line_opening_tags() {
        let source = "<Card\n  title=\"Streaming\"\n>\n  Tokens arrive as generated.\n</Card>";

        assert_eq!(strip_mdx(source), "\nTokens arrive as generated.\n");
    }

    #[test]
    fn unterminated_tag_is_kept_as_text() {
        let source = "Compare a <B\n\nnext";

        assert_eq!(strip_mdx(source), "Compare a <B\n\nnext");
    }
}
