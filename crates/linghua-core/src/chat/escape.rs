//! Markup escaping for user-supplied chat text.

/// Replace the five markup-significant characters with character references.
///
/// `&` is replaced first so references introduced by the later substitutions
/// are not re-encoded. Not idempotent: escaping already-escaped text encodes
/// its ampersands a second time.
pub fn escape(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Decode the references produced by [`escape`] for display on a plain-text
/// surface such as a terminal. Never applied to stored content.
pub fn unescape_for_terminal(text: &str) -> String {
    text.replace("&#039;", "'")
        .replace("&quot;", "\"")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&amp;", "&")
}
