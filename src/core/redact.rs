//! Per-person redaction.
//!
//! Every confirmed quote not attributed to the kept person is replaced by a
//! marker. Splices are computed up front against the original document and
//! applied from the highest offset down, so earlier offsets stay valid.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::normalize::NormalizedText;
use crate::domain::Quote;

/// Marker used when attributions are dropped
pub const REDACTED_MARKER: &str = "[QUOTE REDACTED]";

/// Marker used when attributions are kept for review
pub const REVIEW_MARKER: &str = "[QUOTE REDACTED FOR REVIEW]";

/// How redacted quotes are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionStyle {
    /// `"[QUOTE REDACTED]"`, attribution removed
    #[default]
    DropNames,

    /// `"[QUOTE REDACTED FOR REVIEW]" (Name)`
    KeepNames,
}

impl RedactionStyle {
    pub fn from_keep_names(keep_names: bool) -> Self {
        if keep_names {
            Self::KeepNames
        } else {
            Self::DropNames
        }
    }
}

/// A pending replacement in original-document coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
struct Splice {
    range: Range<usize>,
    replacement: String,
}

/// Builds redacted document variants
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    style: RedactionStyle,
}

impl Redactor {
    pub fn new(style: RedactionStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> RedactionStyle {
        self.style
    }

    /// Replacement text for a redacted quote, in the quote's own punctuation
    pub fn marker(&self, quote: &Quote) -> String {
        let delim = if quote.uses_single_quotes() { '\'' } else { '"' };
        match self.style {
            RedactionStyle::DropNames => format!("{delim}{REDACTED_MARKER}{delim}"),
            RedactionStyle::KeepNames => format!(
                "{delim}{REVIEW_MARKER}{delim}{}({})",
                separator(quote),
                quote.attribution
            ),
        }
    }

    /// The document as seen by `person`: their quotes intact, all others
    /// replaced by markers
    pub fn redact_for(&self, doc: &NormalizedText<'_>, quotes: &[Quote], person: &str) -> String {
        let mut splices: Vec<Splice> = quotes
            .iter()
            .filter(|q| q.attribution != person)
            .map(|q| Splice {
                range: doc.original_range(q.span()),
                replacement: self.marker(q),
            })
            .collect();
        splices.sort_by(|a, b| b.range.start.cmp(&a.range.start));

        let mut content = doc.original().to_string();
        let mut floor = content.len();
        for splice in splices {
            if splice.range.end > floor {
                warn!(
                    start = splice.range.start,
                    end = splice.range.end,
                    "Skipping redaction that overlaps an earlier one"
                );
                continue;
            }
            content.replace_range(splice.range.clone(), &splice.replacement);
            floor = splice.range.start;
        }

        debug!(person, "Built redacted variant");
        content
    }
}

/// Text between the closing quote mark and `(`, if it carries a dash;
/// otherwise a single space
fn separator(quote: &Quote) -> &str {
    let after_quote = quote.text.len() + 2;
    let before_paren = quote
        .full_match
        .len()
        .saturating_sub(quote.attribution.len() + 2);

    quote
        .full_match
        .get(after_quote..before_paren)
        .filter(|sep| sep.contains(['-', '–', '—']))
        .unwrap_or(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::extract_quotes;

    fn variant(text: &str, person: &str, style: RedactionStyle) -> String {
        let doc = NormalizedText::new(text);
        let extraction = extract_quotes(doc.as_str());
        Redactor::new(style).redact_for(&doc, &extraction.quotes, person)
    }

    #[test]
    fn test_drop_names() {
        let text = "A: 'Solo quote text' (Jane)\nB: \"Other quote\" (Bob)\n";
        let out = variant(text, "Jane", RedactionStyle::DropNames);
        assert_eq!(out, "A: 'Solo quote text' (Jane)\nB: \"[QUOTE REDACTED]\"\n");
    }

    #[test]
    fn test_keep_names() {
        let text = "A: 'Solo quote text' (Jane)\nB: \"Other quote\" (Bob)\n";
        let out = variant(text, "Jane", RedactionStyle::KeepNames);
        assert_eq!(
            out,
            "A: 'Solo quote text' (Jane)\nB: \"[QUOTE REDACTED FOR REVIEW]\" (Bob)\n"
        );
    }

    #[test]
    fn test_single_quote_style_preserved() {
        let out = variant("'Hers' (Ann) and \"His\" (Ben)", "Ben", RedactionStyle::DropNames);
        assert_eq!(out, "'[QUOTE REDACTED]' and \"His\" (Ben)");
    }

    #[test]
    fn test_dash_separator_reused() {
        let out = variant("\"Mine\" (Me)\n\"Yours\" — (You)", "Me", RedactionStyle::KeepNames);
        assert_eq!(out, "\"Mine\" (Me)\n\"[QUOTE REDACTED FOR REVIEW]\" — (You)");

        let out = variant("\"Yours\"(You)", "Me", RedactionStyle::KeepNames);
        assert_eq!(out, "\"[QUOTE REDACTED FOR REVIEW]\" (You)");

        let out = variant("'Hers'  –  (Ann) \"His\" (Ben)", "Ben", RedactionStyle::KeepNames);
        assert_eq!(out, "'[QUOTE REDACTED FOR REVIEW]'  –  (Ann) \"His\" (Ben)");
    }

    #[test]
    fn test_curly_original_is_spliced_in_place() {
        let text = "\u{201C}Kept\u{201D} (Kim) \u{201C}Gone\u{201D} (Lee) tail";
        let out = variant(text, "Kim", RedactionStyle::DropNames);
        assert_eq!(out, "\u{201C}Kept\u{201D} (Kim) \"[QUOTE REDACTED]\" tail");
    }

    #[test]
    fn test_multiple_redactions_do_not_collide() {
        let text = "\"a\" (X) \"b\" (Y) \"c\" (X) \"d\" (Z)";
        let out = variant(text, "Y", RedactionStyle::DropNames);
        assert_eq!(
            out,
            "\"[QUOTE REDACTED]\" \"b\" (Y) \"[QUOTE REDACTED]\" \"[QUOTE REDACTED]\""
        );
    }

    #[test]
    fn test_deterministic() {
        let text = "\"a\" (X) and 'b' - (Y)";
        let first = variant(text, "X", RedactionStyle::KeepNames);
        let second = variant(text, "X", RedactionStyle::KeepNames);
        assert_eq!(first, second);
    }
}
