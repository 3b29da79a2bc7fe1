//! Pandoc adapter for markdown conversion.
//!
//! Runs `pandoc <input> -o <output>` as a subprocess; the output format is
//! inferred by pandoc from the output extension.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::{ConvertError, Converter};

/// Pandoc converter using subprocess mode
#[derive(Debug, Clone)]
pub struct PandocConverter {
    /// Path to the pandoc binary (default: "pandoc")
    binary_path: String,

    /// Extension of the produced document
    extension: String,

    timeout: Duration,
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl PandocConverter {
    /// Create a converter producing docx with the default binary
    pub fn new() -> Self {
        Self {
            binary_path: "pandoc".to_string(),
            extension: "docx".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Create a converter with a custom binary path
    pub fn with_binary_path(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            ..Self::new()
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Converter for PandocConverter {
    fn name(&self) -> &str {
        "pandoc"
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConvertError> {
        debug!(input = %input.display(), output = %output.display(), "Running pandoc");

        let child = Command::new(&self.binary_path)
            .arg(input)
            .arg("-o")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ConvertError::NotFound {
                    binary: self.binary_path.clone(),
                },
                _ => ConvertError::Io(e),
            })?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ConvertError::TimedOut {
                seconds: self.timeout.as_secs(),
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::Failed {
                code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}
