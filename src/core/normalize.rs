//! Quote glyph normalization.
//!
//! Maps typographic quotation marks to ASCII `"` and `'`. The mapping is
//! per character, so it is order-independent and idempotent.

use std::ops::Range;

/// Canonical ASCII form of a quote-like glyph, if `c` is one
pub fn canonical_quote(c: char) -> Option<char> {
    match c {
        // curly, double prime, ornamental, CJK, low-9 / high-reversed-9
        '\u{201C}' | '\u{201D}' | '\u{2033}' | '\u{275D}' | '\u{275E}' | '\u{301D}'
        | '\u{301E}' | '\u{201E}' | '\u{201F}' => Some('"'),
        // curly, prime, ornamental, low-9 / high-reversed-9
        '\u{2018}' | '\u{2019}' | '\u{2032}' | '\u{275B}' | '\u{275C}' | '\u{201A}'
        | '\u{201B}' => Some('\''),
        _ => None,
    }
}

/// Replace every recognized quote glyph with its ASCII equivalent
pub fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| canonical_quote(c).unwrap_or(c))
        .collect()
}

/// Normalized copy of a document that remembers where each byte came from.
///
/// Extraction works on [`NormalizedText::as_str`]; redaction maps the
/// resulting spans back with [`NormalizedText::original_range`] and splices
/// the untouched original.
#[derive(Debug, Clone)]
pub struct NormalizedText<'a> {
    original: &'a str,
    text: String,
    /// `origin[i]` is the original byte offset of normalized byte `i`;
    /// one extra entry maps `text.len()` to `original.len()`
    origin: Vec<usize>,
}

impl<'a> NormalizedText<'a> {
    pub fn new(original: &'a str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len() + 1);

        for (offset, c) in original.char_indices() {
            let mapped = canonical_quote(c).unwrap_or(c);
            origin.extend(std::iter::repeat(offset).take(mapped.len_utf8()));
            text.push(mapped);
        }
        origin.push(original.len());

        Self {
            original,
            text,
            origin,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn original(&self) -> &'a str {
        self.original
    }

    /// Whether normalization changed anything
    pub fn is_unchanged(&self) -> bool {
        self.text == self.original
    }

    /// Original byte offset for a normalized byte offset on a char boundary
    pub fn to_original(&self, offset: usize) -> usize {
        self.origin[offset.min(self.text.len())]
    }

    /// Map a normalized byte range to the original document
    pub fn original_range(&self, range: Range<usize>) -> Range<usize> {
        self.to_original(range.start)..self.to_original(range.end)
    }
}
