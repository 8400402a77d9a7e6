//! Inline span resolution.
//!
//! Spans are resolved by precedence rather than by rewriting the whole string
//! repeatedly: code spans, images and links are lifted out into placeholders
//! first, so the emphasis passes that follow never see their contents.
//! Emphasis resolves bold-italic, then bold, then italic; each finished
//! `<strong>` span is lifted out as well, so an italic match can never cross
//! its boundary. Placeholders are expanded at the end.

use crate::escape::{escape_attr, escape_code};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub(crate) const PLACEHOLDER_OPEN: char = '\u{E000}';
pub(crate) const PLACEHOLDER_CLOSE: char = '\u{E001}';

static CODE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+)`").unwrap());
static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]\n]*)\]\(([^)\s]*)\)").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]\n]+)\]\(([^)\s]+)\)").unwrap());
static BOLD_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*").unwrap());
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").unwrap());

/// Renders the inline spans of a single line of text.
pub(crate) fn render_inline(text: &str) -> String {
    let mut stash: Vec<String> = Vec::new();

    let text = CODE_SPAN.replace_all(text, |caps: &Captures| {
        hold(&mut stash, format!("<code>{}</code>", escape_code(&caps[1])))
    });

    let text = IMAGE.replace_all(&text, |caps: &Captures| {
        hold(
            &mut stash,
            format!(
                r#"<img src="{}" alt="{}">"#,
                escape_attr(&caps[2]),
                escape_attr(&caps[1])
            ),
        )
    });

    let text = LINK.replace_all(&text, |caps: &Captures| {
        let label = emphasis(&caps[1], &mut stash);
        hold(
            &mut stash,
            format!(r#"<a href="{}">{}</a>"#, escape_attr(&caps[2]), label),
        )
    });

    let text = emphasis(&text, &mut stash);
    expand(&text, &stash)
}

fn emphasis(text: &str, stash: &mut Vec<String>) -> String {
    let text = BOLD_ITALIC.replace_all(text, |caps: &Captures| {
        let inner = emphasis(&caps[1], stash);
        hold(stash, format!("<strong><em>{inner}</em></strong>"))
    });
    let text = BOLD.replace_all(&text, |caps: &Captures| {
        let inner = italic(&caps[1]);
        hold(stash, format!("<strong>{inner}</strong>"))
    });
    italic(&text)
}

fn italic(text: &str) -> String {
    ITALIC.replace_all(text, "<em>$1</em>").into_owned()
}

fn hold(stash: &mut Vec<String>, html: String) -> String {
    stash.push(html);
    format!("{}{}{}", PLACEHOLDER_OPEN, stash.len() - 1, PLACEHOLDER_CLOSE)
}

/// Expands placeholders; stashed HTML may itself contain placeholders (a code
/// span inside link text).
fn expand(text: &str, stash: &[String]) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| stash.get(index))
                .map(|html| expand(html, stash))
                .unwrap_or_default()
        })
        .into_owned()
}
