//! Command-line interface for pullquotes.
//!
//! Extracts attributed quotes from a markdown file, reports malformed ones,
//! optionally fixes them in place, and writes one redacted copy of the file
//! per quoted person.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use crate::config::{config, ResolvedConfig};
use crate::core::{
    extract_quotes, fix_file, normalize_quotes, Extraction, Personalizer, RedactionStyle,
};

pub mod report;

use report::JsonReport;

/// pullquotes - per-person redacted copies of quoted markdown
#[derive(Parser, Debug)]
#[command(name = "pullquotes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Markdown file containing `"quote" (Person)` quotes
    pub input: PathBuf,

    /// Rewrite suspected quotes into the confirmed format in place
    #[arg(long)]
    pub fix: bool,

    /// Keep attributions in redacted quotes
    #[arg(long)]
    pub keep_names: bool,

    /// Only check formatting; write no files
    #[arg(long)]
    pub test: bool,

    /// Skip document conversion and only write markdown
    #[arg(long)]
    pub no_convert: bool,

    /// Print the extraction report as JSON
    #[arg(long)]
    pub json: bool,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,

    /// Input file does not exist
    InputMissing,

    /// Test mode found quotes that still need formatting
    NeedsFormatting,
}

impl From<RunOutcome> for ExitCode {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::Success => ExitCode::SUCCESS,
            RunOutcome::InputMissing | RunOutcome::NeedsFormatting => ExitCode::FAILURE,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<RunOutcome> {
        let settings = config()?;
        debug!(config_file = ?settings.config_file, "Loaded configuration");
        self.run(settings).await
    }

    /// Run against explicit settings
    pub async fn run(&self, settings: &ResolvedConfig) -> Result<RunOutcome> {
        if !self.input.is_file() {
            eprintln!("Error: File '{}' not found.", self.input.display());
            return Ok(RunOutcome::InputMissing);
        }

        self.announce_modes();

        let (mut text, mut extraction) = read_and_extract(&self.input).await?;
        self.print(&report::suspects_report(&extraction.suspected));

        let mut fixed = false;
        if self.fix && extraction.has_suspects() {
            if self.test {
                info!("Test mode, leaving suspected quotes unfixed");
            } else if fix_file(&self.input, &extraction.suspected).await? {
                fixed = true;
                self.print(&format!(
                    "Updated {} with fixed quote formatting.\n",
                    self.input.display()
                ));
                self.print("Quotes have been fixed. Running extraction again with updated file.\n");

                (text, extraction) = read_and_extract(&self.input).await?;
                if extraction.has_suspects() {
                    self.print("\nSome quotes still need fixing after auto-fix attempt:\n");
                    self.print(&report::suspects_report(&extraction.suspected));
                }
            }
        }

        if self.json {
            let json = JsonReport::new(&self.input, fixed, &extraction.quotes, &extraction.suspected);
            println!(
                "{}",
                serde_json::to_string_pretty(&json).context("Failed to serialize report")?
            );
        }

        if extraction.quotes.is_empty() {
            self.print(&report::no_quotes(extraction.has_suspects()));
            return Ok(self.test_outcome(&extraction));
        }

        self.print(&report::summary(&extraction.quotes));

        if self.test {
            if extraction.has_suspects() {
                self.print(
                    "\nTest mode: File contains quotes that need formatting. Please fix them or use --fix.\n",
                );
            } else {
                self.print("\nTest mode: All quotes in the file are properly formatted.\n");
            }
            return Ok(self.test_outcome(&extraction));
        }

        let style = RedactionStyle::from_keep_names(self.keep_names || settings.keep_names);
        let mut personalizer = Personalizer::new(style);
        if settings.converter.enabled && !self.no_convert {
            personalizer = personalizer.with_converter(settings.converter.converter());
        }

        let files = personalizer
            .personalize(&self.input, &text, &extraction.quotes)
            .await?;
        for file in &files {
            self.print(&report::personalized(file));
        }

        Ok(RunOutcome::Success)
    }

    fn announce_modes(&self) {
        if self.fix {
            self.print("Fix mode enabled - will attempt to auto-fix suspected quotes.\n");
        }
        if self.keep_names {
            self.print("Keep names mode enabled - will keep quotee names in redacted quotes.\n");
        }
        if self.test {
            self.print(
                "Test mode enabled - will check for quotes without generating output files.\n",
            );
        }
    }

    fn test_outcome(&self, extraction: &Extraction) -> RunOutcome {
        if self.test && extraction.has_suspects() {
            RunOutcome::NeedsFormatting
        } else {
            RunOutcome::Success
        }
    }

    /// Human report text; suppressed when JSON is requested
    fn print(&self, text: &str) {
        if !self.json && !text.is_empty() {
            print!("{}", text);
        }
    }
}

async fn read_and_extract(path: &Path) -> Result<(String, Extraction)> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let extraction = extract_quotes(&normalize_quotes(&text));
    Ok((text, extraction))
}
