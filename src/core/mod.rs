//! Quote processing.
//!
//! This module contains:
//! - Normalize: quote glyph canonicalization with an offset map
//! - Extract: confirmed and suspected quote detection
//! - Redact: per-person redacted variants
//! - Fixer: rewriting suspected quotes into the confirmed format
//! - Personalize: writing variants to disk and converting them

pub mod extract;
pub mod fixer;
pub mod normalize;
pub mod personalize;
pub mod redact;

// Re-export commonly used types
pub use extract::{extract_quotes, find_inline_quotes, Extraction};
pub use fixer::{fix_document, fix_file, FixOutcome};
pub use normalize::{normalize_quotes, NormalizedText};
pub use personalize::{output_path, Conversion, PersonalizedFile, Personalizer};
pub use redact::{RedactionStyle, Redactor, REDACTED_MARKER, REVIEW_MARKER};
