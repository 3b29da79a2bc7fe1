//! Quote detection and classification.
//!
//! Extraction runs an ordered set of independent matchers over normalized
//! text:
//!
//! 1. Inline matchers (double, then single quotes) produce confirmed quotes.
//! 2. The standalone matcher finds a quoted line followed by an attribution
//!    line.
//! 3. The blockquote matcher finds `>` runs followed by an attribution line.
//!
//! Matchers 2 and 3 produce suspected quotes only. Conflicts are resolved by
//! span containment against the confirmed quotes; no matcher mutates shared
//! state.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Quote, SuspectKind, SuspectedQuote};

/// `"text" (Name)` with an optional dash before the parenthesis.
/// Whitespace around the dash is horizontal so the attribution stays on the
/// quote's line.
static DOUBLE_QUOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([^"]+)"[^\S\r\n]*(?:[-–—][^\S\r\n]*)?\(([^)]+)\)"#).unwrap()
});

/// `'text' (Name)`, same shape as [`DOUBLE_QUOTE_RE`]
static SINGLE_QUOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"'([^']+)'[^\S\r\n]*(?:[-–—][^\S\r\n]*)?\(([^)]+)\)"#).unwrap()
});

/// Next-line attribution cues for standalone quotes
static PAREN_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\(([^)]+)\)").unwrap());
static DASH_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-–—]?\s*\w+").unwrap());

/// Parenthesized attribution anywhere in a line
static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)").unwrap());

/// A blockquote run that already carries a `"..." (...)` quote
static FORMED_QUOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]+".*\([^)]+\)"#).unwrap());

/// Attribution lines this long are treated as prose
const MAX_ATTRIBUTION_LINE_CHARS: usize = 100;

/// Result of one extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Confirmed quotes: double-quoted matches first, then single-quoted
    pub quotes: Vec<Quote>,

    /// Suspected quotes in document order
    pub suspected: Vec<SuspectedQuote>,
}

impl Extraction {
    pub fn has_suspects(&self) -> bool {
        !self.suspected.is_empty()
    }
}

/// Extract confirmed and suspected quotes from normalized text
pub fn extract_quotes(text: &str) -> Extraction {
    let quotes = find_inline_quotes(text);

    let lines: Vec<&str> = text.split('\n').collect();
    let offsets = line_offsets(&lines);

    let mut suspected = find_standalone_quotes(&lines, &offsets, &quotes);
    suspected.extend(find_blockquotes(&lines, &offsets, &quotes));
    suspected.sort_by_key(|s| s.line_number);

    debug!(
        confirmed = quotes.len(),
        suspected = suspected.len(),
        "Extraction finished"
    );

    Extraction { quotes, suspected }
}

/// Confirmed quotes from both inline matchers.
///
/// A single-quoted match overlapping a double-quoted one is dropped, so the
/// returned spans are pairwise disjoint.
pub fn find_inline_quotes(text: &str) -> Vec<Quote> {
    let mut quotes = inline_matches(&DOUBLE_QUOTE_RE, text);

    let singles: Vec<Quote> = inline_matches(&SINGLE_QUOTE_RE, text)
        .into_iter()
        .filter(|single| {
            let nested = quotes.iter().any(|double| double.overlaps(single));
            if nested {
                debug!(start = single.start, "Dropping single-quoted match inside another quote");
            }
            !nested
        })
        .collect();

    quotes.extend(singles);
    quotes
}

fn inline_matches(pattern: &Regex, text: &str) -> Vec<Quote> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let full = caps.get(0)?;
            Some(Quote {
                text: caps.get(1)?.as_str().to_string(),
                attribution: caps.get(2)?.as_str().to_string(),
                start: full.start(),
                end: full.end(),
                full_match: full.as_str().to_string(),
            })
        })
        .collect()
}

/// Byte offset of each line start; every newline counts one byte
fn line_offsets(lines: &[&str]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(lines.len());
    let mut pos = 0;
    for line in lines {
        offsets.push(pos);
        pos += line.len() + 1;
    }
    offsets
}

fn is_dash_or_space(c: char) -> bool {
    matches!(c, '-' | '–' | '—' | ' ')
}

fn is_quoted_line(trimmed: &str) -> bool {
    (trimmed.starts_with('"') && trimmed.ends_with('"'))
        || (trimmed.starts_with('\'') && trimmed.ends_with('\''))
}

fn find_standalone_quotes(
    lines: &[&str],
    offsets: &[usize],
    quotes: &[Quote],
) -> Vec<SuspectedQuote> {
    let mut suspected = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || !is_quoted_line(trimmed) || line.contains('(') {
            continue;
        }

        let span: Range<usize> = offsets[i]..offsets[i] + line.len();
        if quotes.iter().any(|q| q.contains(&span)) {
            continue;
        }

        let Some(next) = lines.get(i + 1) else {
            continue;
        };
        let next_line = next.trim();
        if !PAREN_LINE_RE.is_match(next_line) && !DASH_WORD_RE.is_match(next_line) {
            continue;
        }

        let stripped = next_line.trim_start_matches(is_dash_or_space);
        let attribution = stripped
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(stripped);

        suspected.push(SuspectedQuote {
            line_number: i + 2,
            kind: SuspectKind::Standalone,
            quote_text: trimmed.to_string(),
            attribution_line: next_line.to_string(),
            attribution: attribution.to_string(),
            suggestion: format!("{} ({})", trimmed, attribution),
        });
    }

    suspected
}

pub(crate) fn is_blockquote_line(line: &str) -> bool {
    line.trim().starts_with('>')
}

/// Content of a blockquote line without its `>` markers
pub(crate) fn strip_blockquote_marker(line: &str) -> &str {
    line.trim_start()
        .trim_start_matches(|c| c == '>' || c == ' ')
        .trim()
}

fn is_list_item(line: &str) -> bool {
    line.starts_with('*') || line.starts_with('+')
}

/// Wrap joined blockquote content in double quotes
pub(crate) fn delimit_blockquote(text: &str) -> String {
    let wrapped_in = |mark: char| text.len() >= 2 && text.starts_with(mark) && text.ends_with(mark);

    if wrapped_in('\'') {
        format!("\"{}\"", &text[1..text.len() - 1])
    } else if !text.starts_with('"') && !text.starts_with('\'') {
        format!("\"{}\"", text)
    } else if text.starts_with('"') && !wrapped_in('"') {
        format!("{}\"", text)
    } else {
        text.to_string()
    }
}

/// Attribution from the line after a blockquote.
///
/// Prefers a `(Name)` substring; otherwise the first word, or the first two
/// when the first is capitalized.
pub(crate) fn blockquote_attribution(line: &str) -> Option<String> {
    if let Some(caps) = PAREN_RE.captures(line) {
        return Some(caps[1].to_string());
    }

    let words: Vec<&str> = line
        .trim_start_matches(is_dash_or_space)
        .split_whitespace()
        .collect();
    let first = *words.first()?;
    if first.starts_with(['#', '*', '-']) {
        return None;
    }

    let capitalized = first.chars().next().is_some_and(char::is_uppercase);
    if capitalized && words.len() > 1 {
        Some(format!("{} {}", words[0], words[1]))
    } else {
        Some(first.to_string())
    }
}

fn find_blockquotes(lines: &[&str], offsets: &[usize], quotes: &[Quote]) -> Vec<SuspectedQuote> {
    let mut suspected = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        // only the first line of a run
        if !is_blockquote_line(line) || (i > 0 && is_blockquote_line(lines[i - 1])) {
            continue;
        }

        let end = lines[i..]
            .iter()
            .position(|l| !is_blockquote_line(l))
            .map_or(lines.len(), |n| i + n);

        let joined = lines[i..end]
            .iter()
            .map(|l| strip_blockquote_marker(l))
            .collect::<Vec<_>>()
            .join(" ");
        if joined.trim().is_empty() || FORMED_QUOTE_RE.is_match(&joined) {
            continue;
        }

        let Some(next) = lines.get(end) else {
            continue;
        };
        let attribution_line = next.trim();
        if attribution_line.is_empty()
            || attribution_line.starts_with('#')
            || is_list_item(attribution_line)
            || attribution_line.chars().count() >= MAX_ATTRIBUTION_LINE_CHARS
        {
            continue;
        }

        let Some(attribution) = blockquote_attribution(attribution_line) else {
            continue;
        };

        if quotes.iter().any(|q| q.covers(offsets[end])) {
            continue;
        }

        let quote_text = delimit_blockquote(&joined);
        suspected.push(SuspectedQuote {
            line_number: end + 1,
            kind: SuspectKind::Blockquote,
            suggestion: format!("{} ({})", quote_text, attribution),
            quote_text,
            attribution_line: attribution_line.to_string(),
            attribution,
        });
    }

    suspected
}
