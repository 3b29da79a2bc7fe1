//! Quote records produced by extraction.
//!
//! Confirmed quotes are span-addressed (byte offsets into the normalized
//! document); suspected quotes are line-addressed because the fixer rewrites
//! whole lines.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A quote in the strict `"text" (Attribution)` format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Quoted content without the surrounding quote marks
    pub text: String,

    /// Parenthesized attribution, verbatim
    pub attribution: String,

    /// Start byte offset into the normalized document
    pub start: usize,

    /// End byte offset (exclusive) into the normalized document
    pub end: usize,

    /// Exact normalized substring at `start..end`
    pub full_match: String,
}

impl Quote {
    /// Byte range of the full match in the normalized document
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether `range` lies entirely inside this quote's span
    pub fn contains(&self, range: &Range<usize>) -> bool {
        self.start <= range.start && self.end >= range.end
    }

    /// Whether `offset` falls inside this quote's span (end inclusive)
    pub fn covers(&self, offset: usize) -> bool {
        self.start <= offset && self.end >= offset
    }

    /// Whether the two spans share at least one byte
    pub fn overlaps(&self, other: &Quote) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether the quote was written with single quote marks
    pub fn uses_single_quotes(&self) -> bool {
        self.full_match.starts_with('\'')
    }
}

/// Which heuristic produced a suspected quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspectKind {
    /// A quoted line followed by an attribution line
    Standalone,

    /// A `>` blockquote run followed by an attribution line
    Blockquote,
}

/// A quote candidate that does not match the strict format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspectedQuote {
    /// 1-based line number of the attribution line
    pub line_number: usize,

    pub kind: SuspectKind,

    /// The quote candidate, with or without quote marks
    pub quote_text: String,

    /// Raw (trimmed) line suspected of carrying the attribution
    pub attribution_line: String,

    /// Attribution derived from `attribution_line`
    pub attribution: String,

    /// Canonical rendering that would replace the candidate
    pub suggestion: String,
}

impl SuspectedQuote {
    /// 0-based index of the attribution line
    pub fn line_index(&self) -> usize {
        self.line_number.saturating_sub(1)
    }
}

/// Distinct attributions, sorted
pub fn attributions(quotes: &[Quote]) -> BTreeSet<&str> {
    quotes.iter().map(|q| q.attribution.as_str()).collect()
}

/// Number of confirmed quotes per attribution, sorted by name
pub fn quote_counts(quotes: &[Quote]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for quote in quotes {
        *counts.entry(quote.attribution.as_str()).or_insert(0) += 1;
    }
    counts
}
