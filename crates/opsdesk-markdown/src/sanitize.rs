//! Allow-list sanitizer for rendered assistant HTML.
//!
//! The renderer trusts its input: raw HTML in assistant text passes straight
//! through. When the assistant is not trusted, run its output through
//! [`sanitize`], which keeps only the tags and attributes the renderer emits.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TAG_CANDIDATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").unwrap());
static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(/?)([A-Za-z][A-Za-z0-9]*)((?:\s[^<>]*)?)>$").unwrap());
static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z][A-Za-z0-9-]*)\s*=\s*"([^"]*)""#).unwrap());
static CHAR_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#[xX]([0-9a-fA-F]{1,6})|#([0-9]{1,7})|([A-Za-z]+));?").unwrap()
});
static CODE_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^language-[\w+#.-]*$").unwrap());

const ALLOWED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "span", "pre", "code", "table", "thead", "tbody", "tr", "th", "td",
    "ul", "ol", "li", "strong", "em", "img", "a", "br",
];

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Keeps allow-listed tags and attributes; escapes everything else.
pub fn sanitize(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;

    for candidate in TAG_CANDIDATE.find_iter(html) {
        out.push_str(&escape_brackets(&html[last..candidate.start()]));
        match clean_tag(candidate.as_str()) {
            Some(tag) => out.push_str(&tag),
            None => out.push_str(&escape_brackets(candidate.as_str())),
        }
        last = candidate.end();
    }
    out.push_str(&escape_brackets(&html[last..]));
    out
}

fn clean_tag(raw: &str) -> Option<String> {
    let caps = TAG.captures(raw)?;
    let closing = !caps[1].is_empty();
    let name = caps[2].to_ascii_lowercase();
    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return None;
    }
    if closing {
        return Some(format!("</{name}>"));
    }

    let mut tag = format!("<{name}");
    let attributes = caps.get(3).map_or("", |m| m.as_str());
    for attr in ATTRIBUTE.captures_iter(attributes) {
        let key = attr[1].to_ascii_lowercase();
        let value = &attr[2];
        if allowed_attribute(&name, &key, value) {
            tag.push_str(&format!(r#" {key}="{value}""#));
        }
    }
    tag.push('>');
    Some(tag)
}

fn allowed_attribute(tag: &str, key: &str, value: &str) -> bool {
    match (tag, key) {
        ("code", "class") => CODE_CLASS.is_match(value),
        ("img", "alt") => true,
        ("img", "src") | ("a", "href") => is_safe_url(value),
        _ => false,
    }
}

/// Relative URLs and an explicit set of schemes are allowed. Anything that
/// looks like a scheme but is not on the list is refused.
///
/// The check runs on the value a browser would see: character references
/// decoded, tab and newline removed, surrounding controls trimmed.
fn is_safe_url(url: &str) -> bool {
    let decoded: String = decode_char_refs(url)
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();
    let lower = decoded
        .trim_matches(|c: char| c <= ' ')
        .to_ascii_lowercase();
    match lower.find(':') {
        None => true,
        Some(idx) => {
            let scheme = &lower[..idx];
            scheme.contains(['/', '?', '#']) || SAFE_SCHEMES.contains(&scheme)
        }
    }
}

/// Decodes numeric and common named character references.
fn decode_char_refs(value: &str) -> String {
    CHAR_REF
        .replace_all(value, |caps: &Captures| {
            let decoded = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_char(&caps[3])
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_char(name: &str) -> Option<char> {
    let c = match name.to_ascii_lowercase().as_str() {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "colon" => ':',
        "tab" => '\t',
        "newline" => '\n',
        "sol" => '/',
        "num" => '#',
        "quest" => '?',
        _ => return None,
    };
    Some(c)
}

fn escape_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}
