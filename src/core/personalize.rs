//! Per-person document generation.
//!
//! For every distinct attribution a redacted markdown variant is written
//! beside the input and, when a converter is configured, converted into a
//! secondary document format. Converter failures are recorded per person and
//! never stop the remaining variants from being produced.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::{ConvertError, Converter};
use crate::core::normalize::NormalizedText;
use crate::core::redact::{RedactionStyle, Redactor};
use crate::domain::{attributions, Quote};

/// What happened to the converted document for one person
#[derive(Debug)]
pub enum Conversion {
    /// No converter configured for this run
    Skipped,

    /// Converted document written to this path
    Created(PathBuf),

    /// Converter failed; the markdown variant still exists
    Failed(ConvertError),
}

/// Files produced for one attribution
#[derive(Debug)]
pub struct PersonalizedFile {
    pub person: String,
    pub markdown: PathBuf,
    pub conversion: Conversion,
}

/// Writes redacted variants of a document, one per attributed person
pub struct Personalizer {
    redactor: Redactor,
    converter: Option<Box<dyn Converter>>,
}

impl Personalizer {
    pub fn new(style: RedactionStyle) -> Self {
        Self {
            redactor: Redactor::new(style),
            converter: None,
        }
    }

    /// Convert every written variant with `converter`
    pub fn with_converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converter = Some(Box::new(converter));
        self
    }

    /// Write all variants of `original` (the contents of `input`)
    pub async fn personalize(
        &self,
        input: &Path,
        original: &str,
        quotes: &[Quote],
    ) -> Result<Vec<PersonalizedFile>> {
        let doc = NormalizedText::new(original);
        let mut files = Vec::new();

        for (person, file_name) in file_names(attributions(quotes)) {
            let content = self.redactor.redact_for(&doc, quotes, person);

            let markdown = output_path(input, &file_name, "md");
            tokio::fs::write(&markdown, content)
                .await
                .with_context(|| format!("Failed to write {}", markdown.display()))?;
            info!(person, path = %markdown.display(), "Wrote redacted markdown");

            let conversion = match &self.converter {
                Some(converter) => {
                    self.convert(converter.as_ref(), input, &markdown, person, &file_name)
                        .await
                }
                None => Conversion::Skipped,
            };

            files.push(PersonalizedFile {
                person: person.to_string(),
                markdown,
                conversion,
            });
        }

        Ok(files)
    }

    async fn convert(
        &self,
        converter: &dyn Converter,
        input: &Path,
        markdown: &Path,
        person: &str,
        file_name: &str,
    ) -> Conversion {
        let output = output_path(input, file_name, converter.extension());

        match converter.convert(markdown, &output).await {
            Ok(()) => {
                info!(person, converter = converter.name(), path = %output.display(), "Converted");
                Conversion::Created(output)
            }
            Err(e) => {
                warn!(person, converter = converter.name(), error = %e, "Conversion failed");
                Conversion::Failed(e)
            }
        }
    }
}

/// `<input without extension>_<person>.<extension>`
pub fn output_path(input: &Path, person: &str, extension: &str) -> PathBuf {
    let mut name: OsString = input.with_extension("").into_os_string();
    name.push("_");
    name.push(file_safe(person));
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Person names land in file names; path separators must not
fn file_safe(person: &str) -> String {
    person.replace(['/', '\\'], "_")
}

/// File-safe name per person; names that collide once made file-safe get a
/// numeric suffix in sorted order
fn file_names<'a>(people: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, String)> {
    let mut taken = HashSet::new();

    people
        .into_iter()
        .map(|person| {
            let base = file_safe(person);
            let mut name = base.clone();
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{base}_{n}");
                n += 1;
            }
            (person, name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::extract_quotes;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Copies the markdown through, failing for one chosen person
    struct FakeConverter {
        fail_for: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Converter for FakeConverter {
        fn name(&self) -> &str {
            "fake"
        }

        fn extension(&self) -> &str {
            "docx"
        }

        async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConvertError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(person) = self.fail_for {
                let name = input.file_name().unwrap().to_string_lossy();
                if name.contains(person) {
                    return Err(ConvertError::Failed {
                        code: 1,
                        stderr: "boom".to_string(),
                    });
                }
            }
            tokio::fs::copy(input, output).await?;
            Ok(())
        }
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("/tmp/notes.md"), "Jane Doe", "docx"),
            PathBuf::from("/tmp/notes_Jane Doe.docx")
        );
        assert_eq!(
            output_path(Path::new("draft"), "A/B", "md"),
            PathBuf::from("draft_A_B.md")
        );
    }

    #[tokio::test]
    async fn test_one_variant_per_person() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("story.md");
        let text = "'Solo quote text' (Jane)\n\"Other quote\" (Bob)\n";
        std::fs::write(&input, text).unwrap();

        let quotes = extract_quotes(text).quotes;
        let files = Personalizer::new(RedactionStyle::DropNames)
            .personalize(&input, text, &quotes)
            .await
            .unwrap();

        let people: Vec<&str> = files.iter().map(|f| f.person.as_str()).collect();
        assert_eq!(people, vec!["Bob", "Jane"]);
        assert!(files.iter().all(|f| matches!(f.conversion, Conversion::Skipped)));

        let jane = std::fs::read_to_string(dir.path().join("story_Jane.md")).unwrap();
        assert_eq!(jane, "'Solo quote text' (Jane)\n\"[QUOTE REDACTED]\"\n");
        let bob = std::fs::read_to_string(dir.path().join("story_Bob.md")).unwrap();
        assert_eq!(bob, "'[QUOTE REDACTED]'\n\"Other quote\" (Bob)\n");
    }

    #[tokio::test]
    async fn test_colliding_names_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("story.md");
        let text = "\"x\" (A/B) \"y\" (A_B)";
        std::fs::write(&input, text).unwrap();

        let quotes = extract_quotes(text).quotes;
        let files = Personalizer::new(RedactionStyle::DropNames)
            .personalize(&input, text, &quotes)
            .await
            .unwrap();

        assert_eq!(files[0].markdown, dir.path().join("story_A_B.md"));
        assert_eq!(files[1].markdown, dir.path().join("story_A_B_2.md"));
        assert_eq!(
            std::fs::read_to_string(&files[0].markdown).unwrap(),
            "\"x\" (A/B) \"[QUOTE REDACTED]\""
        );
        assert_eq!(
            std::fs::read_to_string(&files[1].markdown).unwrap(),
            "\"[QUOTE REDACTED]\" \"y\" (A_B)"
        );
    }

    #[tokio::test]
    async fn test_converter_failure_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("story.md");
        let text = "\"a\" (Ann) \"b\" (Ben) \"c\" (Cid)";
        std::fs::write(&input, text).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let converter = FakeConverter {
            fail_for: Some("Ben"),
            calls: Arc::clone(&calls),
        };

        let quotes = extract_quotes(text).quotes;
        let files = Personalizer::new(RedactionStyle::KeepNames)
            .with_converter(converter)
            .personalize(&input, text, &quotes)
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(files[0].conversion, Conversion::Created(_)));
        assert!(matches!(files[1].conversion, Conversion::Failed(_)));
        assert!(matches!(files[2].conversion, Conversion::Created(_)));
        assert!(dir.path().join("story_Cid.docx").exists());
        assert!(!dir.path().join("story_Ben.docx").exists());
        assert!(dir.path().join("story_Ben.md").exists());
    }
}
