//! pullquotes - attributed quote extraction and per-person redaction
//!
//! Finds quotes of the form `"quote text" (Person)` in a markdown document
//! and writes one copy of the document per quoted person, with everyone
//! else's quotes replaced by a redaction marker.
//!
//! # Pipeline
//!
//! - Quote glyphs are normalized to ASCII `"` and `'`, keeping an offset map
//!   back to the original text
//! - Confirmed quotes are matched inline; quote lines and blockquotes with a
//!   detached attribution are reported as suspected quotes
//! - Suspected quotes can be rewritten into the confirmed format in place
//! - Redacted variants are written beside the input and converted (pandoc)
//!
//! # Modules
//!
//! - `adapters`: External converters (pandoc)
//! - `core`: Normalization, extraction, redaction, fixing
//! - `domain`: Data structures (Quote, SuspectedQuote)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Check formatting only
//! pullquotes interview.md --test
//!
//! # Fix suspected quotes, then write interview_<person>.md/.docx
//! pullquotes interview.md --fix --keep-names
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{ConvertError, Converter, PandocConverter};
pub use crate::core::{extract_quotes, normalize_quotes, Extraction, NormalizedText, Redactor};
pub use domain::{Quote, SuspectKind, SuspectedQuote};
