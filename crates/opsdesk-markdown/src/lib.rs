//! Markdown-to-HTML rendering for assistant messages.
//!
//! Only the subset assistants actually produce is supported: fenced code,
//! `#`–`####` headers, pipe tables, bold, italic, inline code, images, links
//! and flat lists. Rendering is total: input that does not match a construct
//! is emitted as literal text, never as an error.
//!
//! Precedence, highest first:
//!
//! 1. fenced code blocks (body escaped, never touched again)
//! 2. headers, longest marker first
//! 3. tables (cells get inline rendering)
//! 4. unordered lists, then ordered lists
//! 5. inline: code spans, images, links, bold, italic
//!
//! Line breaks are never emitted next to a block element, and every other run
//! of newlines collapses into a single `<br>`. Output without block elements is
//! wrapped in a `<span>`.
//!
//! ```
//! let html = opsdesk_markdown::render("1. first\n2. second");
//! assert_eq!(html, "<ol><li>first</li><li>second</li></ol>");
//! ```

mod block;
mod escape;
mod inline;
mod sanitize;

use block::{Block, tokenize};
use inline::{PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN, render_inline};

pub use escape::escape_text;
pub use sanitize::sanitize;

/// Renders raw assistant markdown into an HTML fragment.
///
/// Must only be given raw model output: re-rendering HTML is undefined, and
/// user-authored text belongs in [`escape_text`].
pub fn render(raw: &str) -> String {
    let text: String = raw
        .replace("\r\n", "\n")
        .chars()
        .filter(|c| *c != PLACEHOLDER_OPEN && *c != PLACEHOLDER_CLOSE)
        .collect();

    let blocks = tokenize(&text);
    let has_block = blocks.iter().any(Block::is_block_level);

    let mut html = String::with_capacity(text.len() + 32);
    let mut previous_was_text = false;
    for block in &blocks {
        match block {
            Block::Blank => continue,
            Block::Text(line) => {
                if previous_was_text {
                    html.push_str("<br>");
                }
                html.push_str(&render_inline(line));
                previous_was_text = true;
            }
            other => {
                html.push_str(&render_block(other));
                previous_was_text = false;
            }
        }
    }

    if has_block {
        html
    } else {
        format!("<span>{html}</span>")
    }
}

/// Renders and then runs the allow-list sanitizer.
pub fn render_untrusted(raw: &str) -> String {
    sanitize(&render(raw))
}

fn render_block(block: &Block<'_>) -> String {
    match block {
        Block::Code { lang, body } => {
            let body = escape::escape_code(body);
            if lang.is_empty() {
                format!("<pre><code>{body}</code></pre>")
            } else {
                format!(
                    r#"<pre><code class="language-{}">{body}</code></pre>"#,
                    escape::escape_attr(lang)
                )
            }
        }
        Block::Heading { level, text } => {
            format!("<h{level}>{}</h{level}>", render_inline(text))
        }
        Block::Table { header, rows } => {
            let mut html = String::from("<table><thead><tr>");
            for cell in header {
                html.push_str(&format!("<th>{}</th>", render_inline(cell)));
            }
            html.push_str("</tr></thead><tbody>");
            for row in rows {
                html.push_str("<tr>");
                for cell in row {
                    html.push_str(&format!("<td>{}</td>", render_inline(cell)));
                }
                html.push_str("</tr>");
            }
            html.push_str("</tbody></table>");
            html
        }
        Block::UnorderedList(items) => list("ul", items),
        Block::OrderedList(items) => list("ol", items),
        Block::Text(line) => render_inline(line),
        Block::Blank => String::new(),
    }
}

fn list(tag: &str, items: &[&str]) -> String {
    let body: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", render_inline(item)))
        .collect();
    format!("<{tag}>{body}</{tag}>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_wrapped() {
        assert_eq!(render("Shipment confirmed."), "<span>Shipment confirmed.</span>");
        assert_eq!(render(""), "<span></span>");
    }

    #[test]
    fn blank_lines_collapse_to_one_break() {
        assert_eq!(render("one\n\n\ntwo\nthree"), "<span>one<br>two<br>three</span>");
    }

    #[test]
    fn no_breaks_next_to_blocks() {
        assert_eq!(
            render("Intro\n\n## Steps\n\n- cut\n- weld\n\nDone\n"),
            "Intro<h2>Steps</h2><ul><li>cut</li><li>weld</li></ul>Done"
        );
    }

    #[test]
    fn leading_and_trailing_newlines_are_trimmed() {
        assert_eq!(render("\n\nhello\n\n"), "<span>hello</span>");
    }

    #[test]
    fn crlf_input_is_normalized() {
        assert_eq!(render("a\r\nb"), "<span>a<br>b</span>");
    }

    #[test]
    fn placeholder_characters_in_input_are_dropped() {
        assert_eq!(render("x\u{E000}0\u{E001}y"), "<span>x0y</span>");
    }
}
