use html2text::from_read;

use once_cell::sync::Lazy;
use regex::Regex;

static IMG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img\s+[^>]*alt=["']([^"']*)["'][^>]*>"#).unwrap());

const TEXT_WIDTH: usize = 80;

/// Flatten a comment's HTML body into readable text.
/// Strips tags and decodes basic entities using the `html2text` crate,
/// replacing <img> tags with [Image: alt] placeholders.
pub fn comment_to_text(html: &str) -> String {
    // Pre-process HTML to replace images with text placeholders
    let html_with_placeholders = IMG_REGEX.replace_all(html, "[Image: $1]");

    let mut bytes = html_with_placeholders.as_bytes();
    from_read(&mut bytes, TEXT_WIDTH).unwrap_or_default()
}

/// Single-line preview of a comment body, ellipsized at `max_len`.
pub fn comment_preview(html: &str, max_len: usize) -> String {
    let text = comment_to_text(html);
    let line: String = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if line.chars().count() <= max_len {
        return line;
    }
    let truncated: String = line.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text() {
        let html = "<p>Hello <strong>World</strong> &amp; friends</p>";
        let out = comment_to_text(html);
        assert!(out.contains("Hello"));
        assert!(out.contains("World"));
        assert!(out.contains("& friends"));
    }

    #[test]
    fn replaces_images_with_placeholders() {
        let html = "<p>Check this out: <img src=\"foo.jpg\" alt=\"Cool Image\" /></p>";
        let out = comment_to_text(html);
        assert!(out.contains("Check this out:"));
        assert!(out.contains("[Image: Cool Image]"));

        let html_single = "<img src='foo.jpg' alt='Single Quote' />";
        let out_single = comment_to_text(html_single);
        assert!(out_single.contains("[Image: Single Quote]"));
    }

    #[test]
    fn preview_collapses_whitespace_and_truncates() {
        let html = "<p>First paragraph</p><p>Second paragraph</p>";
        let preview = comment_preview(html, 80);
        assert!(!preview.contains('\n'));
        assert!(preview.contains("First paragraph"));
        assert!(preview.contains("Second paragraph"));

        let long = format!("<p>{}</p>", "word ".repeat(50));
        let preview = comment_preview(&long, 20);
        assert!(preview.chars().count() <= 20);
        assert!(preview.ends_with("..."));
    }
}
