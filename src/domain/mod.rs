//! Domain types for pullquotes.
//!
//! - Quote: a confirmed, span-addressed quote
//! - SuspectedQuote: a line-addressed candidate awaiting correction

pub mod quote;

// Re-export commonly used types
pub use quote::{attributions, quote_counts, Quote, SuspectKind, SuspectedQuote};
