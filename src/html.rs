use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::block::Block;
use crate::config::Config;
use crate::escape::push_escaped;

// Heading markup that ended up inside a code body
static STRAY_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<h[1-6]>([^<]+)</h[1-6]>").expect("valid regex"));

/// Convert blocks to an HTML fragment
pub fn blocks_to_html(blocks: &[Block], config: &Config) -> String {
    let mut out = String::new();

    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];

        // The newline before a list item belongs to the list marker
        if i > 0 && !block.is_list_item() {
            out.push('\n');
        }

        i = match block {
            Block::UnorderedListItem { .. } | Block::OrderedListItem { .. } => {
                emit_list(blocks, i, &mut out)
            }
            Block::TableRow { .. } => emit_table(blocks, i, config, &mut out),
            _ => {
                emit_block(block, config, &mut out);
                i + 1
            }
        };
    }

    out
}

fn emit_block(block: &Block, config: &Config, out: &mut String) {
    match block {
        Block::Heading { level, text } => {
            out.push_str(&format!("<h{level}>"));
            push_escaped(out, text);
            out.push_str(&format!("</h{level}>"));
        }
        Block::CodeBlock { language, lines } => {
            emit_code_block(language, lines, config, out);
        }
        Block::PlainText { text } => {
            push_escaped(out, text);
        }
        Block::TableRow { .. }
        | Block::UnorderedListItem { .. }
        | Block::OrderedListItem { .. } => {
            // Grouped by the caller
        }
    }
}

fn emit_code_block(language: &str, lines: &[String], config: &Config, out: &mut String) {
    let body = lines.join("\n");
    let body = if is_markup_language(language) {
        body
    } else {
        comment_stray_headings(&body, comment_prefix(language))
    };

    out.push_str("<div class=\"code-block\"><span class=\"language-indicator\">");
    push_escaped(out, language);
    out.push_str("</span><pre><code>");
    push_escaped(out, &body);
    out.push_str("</code></pre>");
    if config.code.copy_button {
        out.push_str("<button class=\"copy-btn\" onclick=\"copyCode(this)\">");
        push_escaped(out, &config.code.copy_label);
        out.push_str("</button>");
    }
    out.push_str("</div>");
}

/// Comment prefix used when re-annotating stray headings inside code.
pub fn comment_prefix(language: &str) -> &'static str {
    match language.to_lowercase().as_str() {
        "javascript" | "js" | "typescript" | "ts" | "java" | "c" | "cpp" | "csharp" | "cs"
        | "c#" | "go" | "rust" | "php" | "kotlin" | "swift" => "// ",
        "sql" | "mysql" | "postgresql" | "sqlite" => "-- ",
        // python, ruby, perl, bash, shell, yaml, dockerfile, powershell
        _ => "# ",
    }
}

/// Heading tags are legitimate source in these languages.
fn is_markup_language(language: &str) -> bool {
    matches!(
        language.to_lowercase().as_str(),
        "html" | "htm" | "xhtml" | "xml" | "svg"
    )
}

/// Rewrite `<hN>text</hN>` inside a code body as comment lines.
fn comment_stray_headings(code: &str, prefix: &str) -> String {
    STRAY_HEADING
        .replace_all(code, |caps: &Captures| {
            caps[1]
                .split('\n')
                .map(|line| format!("{prefix}{line}"))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .into_owned()
}

/// Emit consecutive same-kind list items as one list. Whitespace-only text
/// between two items of the same kind is absorbed.
fn emit_list(blocks: &[Block], start: usize, out: &mut String) -> usize {
    let ordered = matches!(blocks[start], Block::OrderedListItem { .. });
    let same_kind = |block: &Block| match block {
        Block::OrderedListItem { .. } => ordered,
        Block::UnorderedListItem { .. } => !ordered,
        _ => false,
    };
    let tag = if ordered { "ol" } else { "ul" };

    out.push_str(&format!("<{tag}>"));
    let mut i = start;
    loop {
        if let Block::UnorderedListItem { text } | Block::OrderedListItem { text } = &blocks[i] {
            out.push_str("<li>");
            push_escaped(out, text);
            out.push_str("</li>");
        }
        i += 1;

        match blocks.get(i) {
            Some(next) if same_kind(next) => {}
            Some(next) if next.is_blank() && blocks.get(i + 1).is_some_and(same_kind) => i += 1,
            _ => break,
        }
    }
    out.push_str(&format!("</{tag}>"));
    i
}

/// Emit consecutive same-width table rows as one table, first row as header.
fn emit_table(blocks: &[Block], start: usize, config: &Config, out: &mut String) -> usize {
    let mut width = None;
    let rows: Vec<&[String]> = blocks[start..]
        .iter()
        .map_while(|block| match block {
            Block::TableRow { cells } => Some(cells.as_slice()),
            _ => None,
        })
        .take_while(|row| *width.get_or_insert(row.len()) == row.len())
        .collect();

    let Some((header, body)) = rows.split_first() else {
        return start + 1;
    };

    if body.is_empty() {
        // A lone row is not a table; give it back as text
        push_escaped(out, &format!("|{}|", header.join("|")));
        return start + 1;
    }

    out.push_str("<table class=\"");
    push_escaped(out, &config.tables.class);
    out.push_str("\"><thead><tr>");
    for cell in *header {
        out.push_str("<th>");
        push_escaped(out, cell);
        out.push_str("</th>");
    }
    out.push_str("</tr></thead><tbody>");
    for row in body {
        out.push_str("<tr>");
        for cell in *row {
            out.push_str("<td>");
            push_escaped(out, cell);
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");

    start + rows.len()
}

#[cfg(test)]
mod tests {
    use crate::reply_to_html;

    const COPY: &str = "<button class=\"copy-btn\" onclick=\"copyCode(this)\">Copy</button>";

    #[test]
    fn headings() {
        assert_eq!(
            reply_to_html("# Title\n## Sub"),
            "<h1>Title</h1>\n<h2>Sub</h2>"
        );
    }

    #[test]
    fn heading_text_is_escaped() {
        assert_eq!(
            reply_to_html("### a <b> & c"),
            "<h3>a &lt;b&gt; &amp; c</h3>"
        );
    }

    #[test]
    fn plain_text_passthrough() {
        assert_eq!(
            reply_to_html("Hello world\n\nsecond line\n"),
            "Hello world\n\nsecond line\n"
        );
    }

    #[test]
    fn plain_text_is_escaped() {
        assert_eq!(
            reply_to_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(reply_to_html(""), "");
    }

    #[test]
    fn code_block_default_language() {
        assert_eq!(
            reply_to_html("```\nif a < b {}\n```"),
            format!(
                "<div class=\"code-block\"><span class=\"language-indicator\">plaintext</span><pre><code>if a &lt; b {{}}</code></pre>{COPY}</div>"
            )
        );
    }

    #[test]
    fn code_block_keeps_hash_lines() {
        assert_eq!(
            reply_to_html("```python\n# Setup\nx = \"1\"\n```"),
            format!(
                "<div class=\"code-block\"><span class=\"language-indicator\">python</span><pre><code># Setup\nx = &quot;1&quot;</code></pre>{COPY}</div>"
            )
        );
    }

    #[test]
    fn stray_headings_become_comments() {
        let html = reply_to_html("```rust\n<h2>Setup</h2>\nfn main() {}\n```");
        assert!(html.contains("<code>// Setup\nfn main() {}</code>"), "html = {html}");

        let html = reply_to_html("```sql\n<h1>Query</h1>\n```");
        assert!(html.contains("<code>-- Query</code>"), "html = {html}");

        let html = reply_to_html("```yaml\n<h3>a\nb</h3>\n```");
        assert!(html.contains("<code># a\n# b</code>"), "html = {html}");
    }

    #[test]
    fn comment_prefix_table() {
        use super::comment_prefix;
        assert_eq!(comment_prefix("JavaScript"), "// ");
        assert_eq!(comment_prefix("go"), "// ");
        assert_eq!(comment_prefix("php"), "// ");
        assert_eq!(comment_prefix("postgresql"), "-- ");
        assert_eq!(comment_prefix("bash"), "# ");
        assert_eq!(comment_prefix("plaintext"), "# ");
    }

    #[test]
    fn text_around_code_block() {
        assert_eq!(
            reply_to_html("Before\n```js\nx\n```\nAfter"),
            format!(
                "Before\n<div class=\"code-block\"><span class=\"language-indicator\">js</span><pre><code>x</code></pre>{COPY}</div>\nAfter"
            )
        );
    }

    #[test]
    fn unordered_list_merges() {
        let html = reply_to_html("\n* a\n* b\n* c");
        assert_eq!(html, "<ul><li>a</li><li>b</li><li>c</li></ul>");
        assert_eq!(html.matches("<ul>").count(), 1);
    }

    #[test]
    fn ordered_list_merges() {
        assert_eq!(
            reply_to_html("Steps:\n1. one\n2. two"),
            "Steps:<ol><li>one</li><li>two</li></ol>"
        );
    }

    #[test]
    fn blank_lines_between_items_do_not_split_lists() {
        assert_eq!(
            reply_to_html("* a\n\n* b\nafter"),
            "<ul><li>a</li><li>b</li></ul>\nafter"
        );
    }

    #[test]
    fn blank_lines_between_ordered_items_do_not_split_lists() {
        let html = reply_to_html("1. one\n   \n2. two\n\n3. three");
        assert_eq!(html, "<ol><li>one</li><li>two</li><li>three</li></ol>");
        assert_eq!(html.matches("<ol>").count(), 1);
    }

    #[test]
    fn markup_fences_keep_heading_tags() {
        let html = reply_to_html("```html\n<h1>Title</h1>\n```");
        assert!(
            html.contains("<code>&lt;h1&gt;Title&lt;/h1&gt;</code>"),
            "html = {html}"
        );

        let html = reply_to_html("```XML\n<h2>x</h2>\n```");
        assert!(html.contains("<code>&lt;h2&gt;x&lt;/h2&gt;</code>"), "html = {html}");
    }

    #[test]
    fn different_list_kinds_stay_separate() {
        assert_eq!(
            reply_to_html("* a\n1. b"),
            "<ul><li>a</li></ul><ol><li>b</li></ol>"
        );
    }

    #[test]
    fn list_text_is_escaped() {
        assert_eq!(
            reply_to_html("* <i>x</i>"),
            "<ul><li>&lt;i&gt;x&lt;/i&gt;</li></ul>"
        );
    }

    #[test]
    fn table() {
        assert_eq!(
            reply_to_html("| A | B |\n|---|---|\n| 1 | <2> |\n| 3 | 4 |"),
            "<table class=\"ai-table\"><thead><tr><th>A</th><th>B</th></tr></thead><tbody><tr><td>1</td><td>&lt;2&gt;</td></tr><tr><td>3</td><td>4</td></tr></tbody></table>"
        );
    }

    #[test]
    fn adjacent_tables_of_different_width() {
        let html = reply_to_html("|a|b|\n|1|2|\n|x|\n|y|");
        assert_eq!(html.matches("<table").count(), 2, "html = {html}");
        assert!(html.contains("</table>\n<table"), "html = {html}");
    }

    #[test]
    fn config_controls_markup() {
        let mut config = crate::Config::default();
        config.code.copy_button = false;
        config.code.default_language = "text".to_string();
        config.tables.class = "grid".to_string();
        let html = crate::reply_to_html_with_config("```\nx\n```\n|a|\n|b|", &config);
        assert!(!html.contains("copy-btn"));
        assert!(html.contains(">text</span>"));
        assert!(html.contains("<table class=\"grid\">"));
    }

    #[test]
    fn lone_table_row_block_renders_as_text() {
        let blocks = vec![crate::Block::TableRow {
            cells: vec!["a".to_string(), "b".to_string()],
        }];
        assert_eq!(
            super::blocks_to_html(&blocks, &crate::Config::default()),
            "|a|b|"
        );
    }
}
