//! HTML entity decoding and tag stripping for plain-text node titles.

use std::sync::OnceLock;

use regex::Regex;

static TAG: OnceLock<Regex> = OnceLock::new();

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("tag pattern is valid"))
}

/// Decodes numeric references and every HTML5 named entity in one pass.
///
/// Unknown names are left as written.
pub fn decode_html_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    html_escape::decode_html_entities(text).into_owned()
}

/// Plain text of an HTML fragment.
///
/// Entities are decoded before tags are removed and once more afterwards,
/// so double-escaped text such as `&amp;lt;` ends up as `<`.
pub fn strip_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let decoded = decode_html_entities(html);
    let tag = pattern(&TAG, r"<[^>]*>");
    let without_tags = tag.replace_all(&decoded, "");
    decode_html_entities(&without_tags)
}
