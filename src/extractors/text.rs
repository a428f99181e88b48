// src/extractors/text.rs

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Node;
use scraper::Html;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+").expect("Failed to compile WORD_RE"));

// Tables are dropped along with scripts and styles: filing tables are
// numeric noise, not disclosure language.
const STRIPPED_TAGS: [&str; 3] = ["script", "style", "table"];

/// Extracts visible plain text from a raw HTML/SGML document.
///
/// Parsing is html5ever-based and tolerant of the malformed markup common in
/// older filings; it never fails outright. Subtrees under `script`, `style`
/// and `table` elements are dropped entirely, every remaining text node is
/// trimmed, and the pieces are joined with single spaces. An empty result
/// means the caller should skip the document.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut pieces: Vec<&str> = Vec::new();
    collect_text(document.tree.root(), &mut pieces);
    pieces.join(" ")
}

fn collect_text<'a>(node: ego_tree::NodeRef<'a, Node>, pieces: &mut Vec<&'a str>) {
    match node.value() {
        Node::Element(element) if STRIPPED_TAGS.contains(&element.name()) => {}
        Node::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed);
            }
        }
        _ => {
            for child in node.children() {
                collect_text(child, pieces);
            }
        }
    }
}

/// Counts `\w+` runs in the extracted text. Computed once per document from
/// the full text; section contents are never re-counted.
pub fn word_count(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}
