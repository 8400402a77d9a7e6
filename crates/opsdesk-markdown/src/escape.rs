//! HTML escaping helpers.

/// Escapes the three characters that matter inside element content.
pub fn escape_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes a value placed inside a double-quoted attribute.
pub fn escape_attr(text: &str) -> String {
    escape_code(text).replace('"', "&quot;")
}

/// Escapes user-authored text for display as plain text.
///
/// User messages never go through the markdown renderer.
pub fn escape_text(text: &str) -> String {
    escape_attr(text).replace('\'', "&#39;")
}
