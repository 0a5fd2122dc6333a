//! Context-aware text escaping.
//!
//! Two independent escapers: one for HTML markup and attribute values, one for
//! the strict XML syntax of the rss feed. Each raw field must be escaped
//! exactly once; applying an escaper twice double-encodes `&`.

use std::borrow::Cow;

const SPECIAL: [char; 5] = ['&', '<', '>', '"', '\''];

/// Escape text for HTML content and attribute values.
///
/// `'` becomes `&#039;`.
#[inline]
pub fn escape_markup(s: &str) -> Cow<'_, str> {
    escape_with(s, "&#039;")
}

/// Escape text for the rss feed.
///
/// `'` becomes `&apos;`, which strict XML consumers accept.
#[inline]
pub fn escape_feed_text(s: &str) -> Cow<'_, str> {
    escape_with(s, "&apos;")
}

/// Display form of a tag: hyphens become spaces.
pub fn format_tag(tag: &str) -> String {
    tag.replace('-', " ")
}

fn escape_with<'a>(s: &'a str, apostrophe: &str) -> Cow<'a, str> {
    // Fast path: nothing to escape
    if !s.contains(SPECIAL) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + s.len() / 4);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str(apostrophe),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
