// src/util/text.rs
use html_escape::decode_html_entities;
use regex::Regex;
use std::sync::LazyLock;

static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?(p|div|br|li|h[1-6])[^>]*>").expect("valid block tag pattern")
});
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

const ELLIPSIS: char = '…';

/// Extract the first line of plain text from possibly HTML formatted content.
///
/// Entities are decoded, tags removed and surrounding whitespace trimmed.
///
/// # Examples
///
/// ```
/// use skillboard::util::text::extract_first_line;
///
/// let html = "<p>Teach &amp; learn</p><p>Second line</p>";
/// assert_eq!(extract_first_line(html), "Teach & learn");
/// ```
pub fn extract_first_line(html: &str) -> String {
    let decoded = decode_html_entities(html).to_string();

    // Block-level tags become line breaks
    let with_newlines = BLOCK_TAG.replace_all(&decoded, "\n");
    let no_tags = ANY_TAG.replace_all(&with_newlines, "");

    no_tags
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .to_string()
}

/// First line of `text`, cut to at most `max_chars` characters.
///
/// A truncated line ends in an ellipsis which counts towards the limit.
pub fn summary_line(text: &str, max_chars: usize) -> String {
    let line = extract_first_line(text);
    if line.chars().count() <= max_chars {
        return line;
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut cut: String = line.chars().take(max_chars - 1).collect();
    cut.truncate(cut.trim_end().len());
    cut.push(ELLIPSIS);
    cut
}
