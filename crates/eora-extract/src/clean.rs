use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Node};

/// Subtrees whose text never reaches the LLM.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "meta", "link", "template"];

/// Page builders embed widget configs as `[{...}]` inside visible text.
static INLINE_JSON: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"(?s)\[\{.*?\}\]") {
    Ok(regex) => regex,
    Err(err) => panic!("inline JSON regex is invalid: {err}"),
});

/// Reduces an HTML document to its visible text.
///
/// Text nodes are trimmed and joined with a single space, bracketed JSON
/// blobs are removed, and the result keeps only non-blank lines.
pub fn clean_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut pieces: Vec<&str> = Vec::new();
    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else { continue };
        let skipped = node.ancestors().any(|a| {
            a.value().as_element().is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if skipped {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            pieces.push(trimmed);
        }
    }
    let raw = pieces.join(" ");
    let without_json = INLINE_JSON.replace_all(&raw, "");
    without_json
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_scripts_styles_and_metadata() {
        let html = r#"<html><head><meta charset="utf-8"><title>Кейс</title>
            <style>body { color: red }</style><link rel="stylesheet" href="x.css">
            <script>var tracking = 1;</script></head>
            <body><noscript>Включите JS</noscript><h1>Lamoda</h1><p>Поиск   одежды</p></body></html>"#;
        assert_eq!(clean_html(html), "Кейс Lamoda Поиск   одежды");
    }

    #[test]
    fn removes_inline_json_blocks_across_lines() {
        let html = "<body><p>До</p><div>[{\"id\": 1,\n \"title\": \"x\"}]</div><p>После</p></body>";
        let cleaned = clean_html(html);
        assert!(!cleaned.contains("title"));
        assert!(cleaned.starts_with("До"));
        assert!(cleaned.ends_with("После"));
    }

    #[test]
    fn text_split_across_lines_keeps_non_blank_lines_only() {
        let html = "<body><pre>первая\n\n   \nвторая</pre></body>";
        assert_eq!(clean_html(html), "первая\nвторая");
    }

    #[test]
    fn empty_document_cleans_to_empty_string() {
        assert_eq!(clean_html("<html><body><script>x()</script></body></html>"), "");
    }
}
