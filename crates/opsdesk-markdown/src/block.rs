//! Line tokenizer producing block-level tokens.
//!
//! One pass over the lines decides what each line belongs to. Checks run in
//! precedence order: fenced code, headers, tables, unordered lists, ordered
//! lists, then plain text. Anything that does not fully match a construct
//! (an unclosed fence, a table without a separator row) is plain text.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,4})\s+(\S.*?)\s*$").unwrap());
static TABLE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\|?[\s:|-]*-[\s:|-]*$").unwrap());
static UNORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-*]\s+(.*?)\s*$").unwrap());
static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+\.\s+(.*?)\s*$").unwrap());

const FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block<'a> {
    Code { lang: &'a str, body: String },
    Heading { level: usize, text: &'a str },
    Table {
        header: Vec<&'a str>,
        rows: Vec<Vec<&'a str>>,
    },
    UnorderedList(Vec<&'a str>),
    OrderedList(Vec<&'a str>),
    Text(&'a str),
    Blank,
}

impl Block<'_> {
    pub(crate) fn is_block_level(&self) -> bool {
        !matches!(self, Block::Text(_) | Block::Blank)
    }
}

pub(crate) fn tokenize(text: &str) -> Vec<Block<'_>> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some((block, next)) = fenced_code(&lines, i) {
            blocks.push(block);
            i = next;
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            let level = caps.get(1).map_or(1, |m| m.len());
            let text = caps.get(2).map_or("", |m| m.as_str());
            blocks.push(Block::Heading { level, text });
            i += 1;
            continue;
        }

        if let Some((block, next)) = table(&lines, i) {
            blocks.push(block);
            i = next;
            continue;
        }

        if UNORDERED_ITEM.is_match(line) {
            let (items, next) = collect_items(&lines, i, &UNORDERED_ITEM);
            blocks.push(Block::UnorderedList(items));
            i = next;
            continue;
        }

        if ORDERED_ITEM.is_match(line) {
            let (items, next) = collect_items(&lines, i, &ORDERED_ITEM);
            blocks.push(Block::OrderedList(items));
            i = next;
            continue;
        }

        if line.trim().is_empty() {
            blocks.push(Block::Blank);
        } else {
            blocks.push(Block::Text(line.trim_end()));
        }
        i += 1;
    }

    blocks
}

/// Matches a fence opening at `start`; returns the block and the index after
/// the closing fence.
fn fenced_code<'a>(lines: &[&'a str], start: usize) -> Option<(Block<'a>, usize)> {
    let opening = lines[start].trim();
    let rest = opening.strip_prefix(FENCE)?;

    // ```inline body``` on a single line
    if let Some(body) = rest.strip_suffix(FENCE) {
        return Some((
            Block::Code {
                lang: "",
                body: body.to_string(),
            },
            start + 1,
        ));
    }

    let lang = rest.trim();
    if lang.contains(char::is_whitespace) || lang.contains('`') {
        return None;
    }

    let close = (start + 1..lines.len()).find(|&j| lines[j].trim_start().starts_with(FENCE))?;
    let body = lines[start + 1..close].join("\n");
    Some((Block::Code { lang, body }, close + 1))
}

fn table<'a>(lines: &[&'a str], start: usize) -> Option<(Block<'a>, usize)> {
    let header_line = lines[start];
    if !header_line.trim_start().starts_with('|') {
        return None;
    }
    let separator = lines.get(start + 1).copied()?;
    if !separator.contains('|') || !TABLE_SEPARATOR.is_match(separator) {
        return None;
    }

    let header = split_row(header_line);
    let mut rows = Vec::new();
    let mut next = start + 2;
    while let Some(line) = lines.get(next).copied() {
        if !line.trim_start().starts_with('|') {
            break;
        }
        rows.push(split_row(line));
        next += 1;
    }

    Some((Block::Table { header, rows }, next))
}

fn split_row(line: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = line.trim().split('|').map(str::trim).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

fn collect_items<'a>(lines: &[&'a str], start: usize, pattern: &Regex) -> (Vec<&'a str>, usize) {
    let mut items = Vec::new();
    let mut next = start;
    while let Some(caps) = lines.get(next).copied().and_then(|line| pattern.captures(line)) {
        items.push(caps.get(1).map_or("", |m| m.as_str()));
        next += 1;
    }
    (items, next)
}
