//! Configuration for pullquotes.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (`--keep-names`, `--no-convert`)
//! 2. Environment variables (PULLQUOTES_CONVERTER, PULLQUOTES_NO_CONVERT)
//! 3. Config file (.pullquotes/config.yaml)
//! 4. Defaults (pandoc, docx, 120s timeout)
//!
//! Config file discovery searches the current directory and its parents for
//! `.pullquotes/config.yaml`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::PandocConverter;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const ENV_CONVERTER: &str = "PULLQUOTES_CONVERTER";
const ENV_NO_CONVERT: &str = "PULLQUOTES_NO_CONVERT";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub converter: Option<ConverterConfig>,
    #[serde(default)]
    pub redaction: Option<RedactionConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConverterConfig {
    /// Converter binary (name on PATH or absolute path)
    pub binary: Option<String>,
    pub enabled: Option<bool>,
    pub timeout_seconds: Option<u64>,
    /// Output extension, e.g. "docx" or "odt"
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedactionConfig {
    pub keep_names: Option<bool>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub converter: ConverterSettings,
    /// Default for `--keep-names`
    pub keep_names: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterSettings {
    pub binary: String,
    pub enabled: bool,
    pub timeout_seconds: u64,
    pub extension: String,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            binary: "pandoc".to_string(),
            enabled: true,
            timeout_seconds: 120,
            extension: "docx".to_string(),
        }
    }
}

impl ConverterSettings {
    /// Build the converter these settings describe
    pub fn converter(&self) -> PandocConverter {
        PandocConverter::with_binary_path(&self.binary)
            .with_extension(&self.extension)
            .with_timeout(Duration::from_secs(self.timeout_seconds))
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".pullquotes").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge file settings and environment over defaults
fn resolve(
    config_file: Option<PathBuf>,
    file: ConfigFile,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let defaults = ConverterSettings::default();
    let converter = file.converter.unwrap_or_default();

    let binary = env(ENV_CONVERTER)
        .or(converter.binary)
        .unwrap_or(defaults.binary);
    let enabled = env(ENV_NO_CONVERT).is_none() && converter.enabled.unwrap_or(defaults.enabled);

    ResolvedConfig {
        config_file,
        converter: ConverterSettings {
            binary,
            enabled,
            timeout_seconds: converter.timeout_seconds.unwrap_or(defaults.timeout_seconds),
            extension: converter.format.unwrap_or(defaults.extension),
        },
        keep_names: file
            .redaction
            .and_then(|r| r.keep_names)
            .unwrap_or(false),
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let config_file = find_config_file_from(&cwd);

    let file = match config_file {
        Some(ref path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    Ok(resolve(config_file, file, |key| std::env::var(key).ok()))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, ConfigFile::default(), no_env);
        assert_eq!(config.converter, ConverterSettings::default());
        assert!(!config.keep_names);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".pullquotes");
        std::fs::create_dir_all(&dir).unwrap();

        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1"
converter:
  binary: /opt/pandoc/bin/pandoc
  timeout_seconds: 30
  format: odt
redaction:
  keep_names: true
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        let config = resolve(Some(config_path), parsed, no_env);
        assert_eq!(config.converter.binary, "/opt/pandoc/bin/pandoc");
        assert_eq!(config.converter.timeout_seconds, 30);
        assert_eq!(config.converter.extension, "odt");
        assert!(config.converter.enabled);
        assert!(config.keep_names);
    }

    #[test]
    fn test_config_discovery_walks_up() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".pullquotes");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.yaml"), "version: \"1\"\n").unwrap();

        let nested = temp.path().join("docs").join("drafts");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_config_file_from(&nested).unwrap();
        assert_eq!(found, dir.join("config.yaml"));
    }

    #[test]
    fn test_env_overrides_file() {
        let file: ConfigFile = serde_yaml::from_str(
            "converter:\n  binary: from-file\n  enabled: true\n",
        )
        .unwrap();

        let config = resolve(None, file, |key| match key {
            ENV_CONVERTER => Some("from-env".to_string()),
            ENV_NO_CONVERT => Some("1".to_string()),
            _ => None,
        });
        assert_eq!(config.converter.binary, "from-env");
        assert!(!config.converter.enabled);
    }
}
