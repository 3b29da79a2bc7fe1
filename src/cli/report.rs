//! Human-readable and JSON reports for the CLI.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::core::{Conversion, PersonalizedFile};
use crate::domain::{quote_counts, Quote, SuspectedQuote};

const RULE_WIDTH: usize = 80;
const ENTRY_RULE_WIDTH: usize = 40;

/// Listing of suspected quotes with suggested rewrites
pub fn suspects_report(suspects: &[SuspectedQuote]) -> String {
    if suspects.is_empty() {
        return String::new();
    }

    let mut out = String::from("\nSuspected quotes that may need formatting:\n");
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');

    for (i, suspect) in suspects.iter().enumerate() {
        out.push_str(&format!("Line {}:\n", suspect.line_number));
        out.push_str(&format!("  Quote: {}\n", suspect.quote_text));
        out.push_str(&format!("  Attribution: {}\n", suspect.attribution_line));
        out.push_str(&format!("  Suggested format: {}\n", suspect.suggestion));
        if i + 1 < suspects.len() {
            out.push_str(&"-".repeat(ENTRY_RULE_WIDTH));
            out.push('\n');
        }
    }

    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(
        "To properly format these quotes, edit them to follow the pattern: \"quote text\" (Person)\n",
    );
    out.push_str("This will ensure all quotes are properly extracted and processed.\n");
    out
}

/// Quote totals per person, sorted by name
pub fn summary(quotes: &[Quote]) -> String {
    let counts = quote_counts(quotes);
    let mut out = format!(
        "\nSummary: Found {} quotes from {} people.\n",
        quotes.len(),
        counts.len()
    );
    for (person, count) in counts {
        out.push_str(&format!("- {}: {} quotes\n", person, count));
    }
    out
}

/// Guidance printed when nothing could be extracted
pub fn no_quotes(has_suspects: bool) -> String {
    let mut out = String::from("No quotes found in the document.\n");
    if has_suspects {
        out.push_str("Please format the suspected quotes correctly and try again.\n");
        out.push_str(
            "You can run with --fix flag to attempt automatic fixing: pullquotes file.md --fix\n",
        );
    }
    out
}

/// One line (or two) per produced variant
pub fn personalized(file: &PersonalizedFile) -> String {
    match &file.conversion {
        Conversion::Created(path) => format!("Created {} for {}\n", path.display(), file.person),
        Conversion::Skipped => format!(
            "Created markdown file {} for {}\n",
            file.markdown.display(),
            file.person
        ),
        Conversion::Failed(e) if e.is_not_found() => format!(
            "Error: {}\nCreated markdown file {} for {}\n",
            e,
            file.markdown.display(),
            file.person
        ),
        Conversion::Failed(e) => format!(
            "Error converting {}: {}\n",
            file.markdown.display(),
            e
        ),
    }
}

/// Machine-readable extraction report
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub input: &'a Path,
    pub fixed: bool,
    pub people: BTreeMap<&'a str, usize>,
    pub quotes: &'a [Quote],
    pub suspected: &'a [SuspectedQuote],
}

impl<'a> JsonReport<'a> {
    pub fn new(
        input: &'a Path,
        fixed: bool,
        quotes: &'a [Quote],
        suspected: &'a [SuspectedQuote],
    ) -> Self {
        Self {
            input,
            fixed,
            people: quote_counts(quotes),
            quotes,
            suspected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ConvertError;
    use crate::core::extract_quotes;
    use std::path::PathBuf;

    #[test]
    fn test_suspects_report_layout() {
        let extraction = extract_quotes("\"Just words.\"\n(Alex)\n\n> Hello there.\n- Taylor Smith\n");
        let report = suspects_report(&extraction.suspected);

        assert!(report.starts_with("\nSuspected quotes that may need formatting:\n"));
        assert!(report.contains("Line 2:\n  Quote: \"Just words.\"\n  Attribution: (Alex)\n"));
        assert!(report.contains("  Suggested format: \"Hello there.\" (Taylor Smith)\n"));
        assert_eq!(report.matches(&"-".repeat(RULE_WIDTH)).count(), 2);
        assert!(report.contains(&format!("\n{}\nLine 5:", "-".repeat(ENTRY_RULE_WIDTH))));
        assert!(report.ends_with("properly extracted and processed.\n"));
    }

    #[test]
    fn test_empty_suspects_report() {
        assert_eq!(suspects_report(&[]), "");
    }

    #[test]
    fn test_summary() {
        let extraction = extract_quotes("\"a\" (Zed) \"b\" (Amy) \"c\" (Zed)");
        assert_eq!(
            summary(&extraction.quotes),
            "\nSummary: Found 3 quotes from 2 people.\n- Amy: 1 quotes\n- Zed: 2 quotes\n"
        );
    }

    #[test]
    fn test_no_quotes_guidance() {
        assert_eq!(no_quotes(false), "No quotes found in the document.\n");
        assert!(no_quotes(true).contains("--fix"));
    }

    #[test]
    fn test_personalized_lines() {
        let file = PersonalizedFile {
            person: "Jane".to_string(),
            markdown: PathBuf::from("doc_Jane.md"),
            conversion: Conversion::Failed(ConvertError::NotFound {
                binary: "pandoc".to_string(),
            }),
        };
        let line = personalized(&file);
        assert!(line.starts_with("Error: Converter 'pandoc' not found"));
        assert!(line.ends_with("Created markdown file doc_Jane.md for Jane\n"));

        let file = PersonalizedFile {
            conversion: Conversion::Created(PathBuf::from("doc_Jane.docx")),
            ..file
        };
        assert_eq!(personalized(&file), "Created doc_Jane.docx for Jane\n");
    }

    #[test]
    fn test_json_report() {
        let extraction = extract_quotes("\"Q\" (A)\n\"Loose\"\n(B)\n");
        let report = JsonReport::new(
            Path::new("doc.md"),
            false,
            &extraction.quotes,
            &extraction.suspected,
        );
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["input"], "doc.md");
        assert_eq!(value["people"]["A"], 1);
        assert_eq!(value["quotes"][0]["text"], "Q");
        assert_eq!(value["suspected"][0]["kind"], "standalone");
        assert_eq!(value["suspected"][0]["line_number"], 3);
    }
}
