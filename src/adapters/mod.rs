//! Adapter interfaces for external document converters.
//!
//! Redacted markdown is handed to a converter that produces a secondary
//! document format (docx by default, via pandoc).

pub mod pandoc;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

// Re-export the pandoc adapter
pub use pandoc::PandocConverter;

/// Errors from a converter invocation
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Converter '{binary}' not found; install it to produce converted documents")]
    NotFound { binary: String },

    #[error("Converter failed with exit code {code}: {stderr}")]
    Failed { code: i32, stderr: String },

    #[error("Converter timed out after {seconds}s")]
    TimedOut { seconds: u64 },

    #[error("Failed to run converter: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Whether the converter binary itself is missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConvertError::NotFound { .. })
    }
}

/// Trait for markdown-to-document converters
#[async_trait]
pub trait Converter: Send + Sync {
    /// Human-readable converter name
    fn name(&self) -> &str;

    /// File extension of the produced document, without the dot
    fn extension(&self) -> &str;

    /// Convert `input` into `output`
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConvertError>;
}
