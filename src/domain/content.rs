//! Body and metadata normalisation applied when posts are written.

use std::collections::HashSet;
use std::sync::OnceLock;

use ammonia::Builder as AmmoniaBuilder;

/// Maximum characters kept when an excerpt is derived from the body.
pub const EXCERPT_LENGTH: usize = 150;
const ELLIPSIS: &str = "...";

static BODY_SANITIZER: OnceLock<AmmoniaBuilder<'static>> = OnceLock::new();

fn body_sanitizer() -> &'static AmmoniaBuilder<'static> {
    BODY_SANITIZER.get_or_init(|| {
        let mut builder = AmmoniaBuilder::default();
        let tags: HashSet<&'static str> = HashSet::from([
            "a",
            "blockquote",
            "br",
            "code",
            "em",
            "figcaption",
            "figure",
            "h1",
            "h2",
            "h3",
            "h4",
            "h5",
            "h6",
            "hr",
            "i",
            "img",
            "li",
            "ol",
            "p",
            "pre",
            "s",
            "span",
            "strong",
            "sub",
            "sup",
            "u",
            "table",
            "tbody",
            "td",
            "th",
            "thead",
            "tr",
            "ul",
        ]);
        builder.tags(tags);
        builder.link_rel(Some("noopener noreferrer"));
        builder
    })
}

/// Strip scripts, event handlers and unknown markup from rich-text bodies.
pub fn sanitize_body(html: &str) -> String {
    body_sanitizer().clean(html).to_string()
}

/// Collapse markup into whitespace-normalised plain text.
pub fn plain_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Excerpt derived from a body: the first 150 characters of its text, with an
/// ellipsis appended when anything was cut.
pub fn derive_excerpt(body_html: &str) -> String {
    let text = plain_text(body_html);
    if text.chars().count() <= EXCERPT_LENGTH {
        return text;
    }

    let mut truncated: String = text.chars().take(EXCERPT_LENGTH).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Wrap plain-text paragraphs (one per line) into `<p>` elements.
pub fn paragraphs_to_html(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("<p>{}</p>", escape_text(line)))
        .collect()
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Trim tags, drop empty entries and keep the first occurrence of duplicates.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();
    for tag in tags {
        let trimmed = tag.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_string()) {
            normalized.push(trimmed.to_string());
        }
    }
    normalized
}

/// Split a comma-separated tag list as typed into an editor field.
pub fn split_tag_list(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(','))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_body_drops_scripts_and_handlers() {
        let cleaned = sanitize_body(r#"<p onclick="steal()">Hi</p><script>alert(1)</script>"#);
        assert_eq!(cleaned, "<p>Hi</p>");
    }

    #[test]
    fn plain_text_collapses_markup() {
        assert_eq!(
            plain_text("<p>Fish &amp; chips</p>\n<p>  today</p>"),
            "Fish & chips today"
        );
    }

    #[test]
    fn derive_excerpt_truncates_long_bodies() {
        let body = format!("<p>{}</p>", "a".repeat(200));
        let excerpt = derive_excerpt(&body);
        assert_eq!(excerpt.chars().count(), EXCERPT_LENGTH + ELLIPSIS.len());
        assert!(excerpt.ends_with("..."));
        assert_eq!(derive_excerpt("<p>short</p>"), "short");
    }

    #[test]
    fn paragraphs_are_wrapped_and_escaped() {
        assert_eq!(
            paragraphs_to_html("First line\n\nSecond <b>line</b>\n"),
            "<p>First line</p><p>Second &lt;b&gt;line&lt;/b&gt;</p>"
        );
    }

    #[test]
    fn tag_lists_are_trimmed_and_deduplicated() {
        assert_eq!(
            split_tag_list(" AI, Space,,AI , Research "),
            vec!["AI", "Space", "Research"]
        );
    }
}
