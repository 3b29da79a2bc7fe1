//! Automatic rewriting of suspected quotes into the confirmed format.
//!
//! Fixes are planned as line edits against the unchanged input lines and
//! then applied in one pass, producing a new line sequence. A suspect whose
//! edits would touch a line already claimed by another suspect is left alone
//! and is judged again on re-extraction.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::extract::{delimit_blockquote, is_blockquote_line, strip_blockquote_marker};
use crate::core::normalize::normalize_quotes;
use crate::domain::{SuspectKind, SuspectedQuote};

/// How far above the attribution line a blockquote may start
const BLOCKQUOTE_LOOKBACK: usize = 10;

/// Result of fixing a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Rewritten document
    pub content: String,

    /// Number of suspected quotes rewritten
    pub fixed: usize,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        self.fixed > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LineEdit {
    Replace(String),
    Remove,
}

type Plan = Vec<(usize, LineEdit)>;

/// Rewrite every fixable suspect in `content`
pub fn fix_document(content: &str, suspects: &[SuspectedQuote]) -> FixOutcome {
    let lines: Vec<&str> = content.split('\n').collect();

    let mut by_line: BTreeMap<usize, Vec<&SuspectedQuote>> = BTreeMap::new();
    for suspect in suspects {
        by_line.entry(suspect.line_number).or_default().push(suspect);
    }

    let mut edits: BTreeMap<usize, LineEdit> = BTreeMap::new();
    let mut fixed = 0;

    for (line_number, group) in by_line.iter().rev() {
        for suspect in group {
            let plan = match suspect.kind {
                SuspectKind::Standalone => plan_standalone(&lines, suspect),
                SuspectKind::Blockquote => plan_blockquote(&lines, suspect),
            };

            let Some(plan) = plan else {
                debug!(line = line_number, "No source lines found for suspected quote");
                continue;
            };
            if plan.iter().any(|(idx, _)| edits.contains_key(idx)) {
                debug!(line = line_number, "Suspected quote overlaps another fix, skipping");
                continue;
            }

            edits.extend(plan);
            fixed += 1;
        }
    }

    let content = lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| match edits.get(&idx) {
            // keep CRLF documents consistent
            Some(LineEdit::Replace(text)) if line.ends_with('\r') => {
                Some(Cow::Owned(format!("{text}\r")))
            }
            Some(LineEdit::Replace(text)) => Some(Cow::Borrowed(text.as_str())),
            Some(LineEdit::Remove) => None,
            None => Some(Cow::Borrowed(*line)),
        })
        .collect::<Vec<_>>()
        .join("\n");

    FixOutcome { content, fixed }
}

/// Replace the quoted line with the suggestion and drop the attribution line
fn plan_standalone(lines: &[&str], suspect: &SuspectedQuote) -> Option<Plan> {
    let attribution_idx = suspect.line_index();
    if attribution_idx == 0 || attribution_idx >= lines.len() {
        return None;
    }

    let quote_idx = (0..attribution_idx)
        .rev()
        .find(|&idx| normalize_quotes(lines[idx].trim()) == suspect.quote_text)?;

    Some(vec![
        (quote_idx, LineEdit::Replace(suspect.suggestion.clone())),
        (attribution_idx, LineEdit::Remove),
    ])
}

/// Collapse the blockquote run and its attribution line into one quote line
fn plan_blockquote(lines: &[&str], suspect: &SuspectedQuote) -> Option<Plan> {
    let attribution_idx = suspect.line_index();
    if attribution_idx >= lines.len() {
        return None;
    }

    let key_words: Vec<&str> = suspect
        .quote_text
        .trim_matches('"')
        .split_whitespace()
        .take(2)
        .collect();
    if key_words.is_empty() {
        return None;
    }

    // the run must end right above the attribution line
    let floor = attribution_idx.saturating_sub(BLOCKQUOTE_LOOKBACK);
    let start = (floor..attribution_idx)
        .rev()
        .take_while(|&idx| is_blockquote_line(lines[idx]))
        .last()?;
    let end = attribution_idx;

    let has_key_word = lines[start..end].iter().any(|line| {
        let line = normalize_quotes(line);
        key_words.iter().any(|word| line.contains(word))
    });
    if !has_key_word {
        return None;
    }

    let content = lines[start..end]
        .iter()
        .map(|line| normalize_quotes(strip_blockquote_marker(line)))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let attribution_line = suspect.attribution_line.trim();
    let attribution = if attribution_line.starts_with('(') && attribution_line.ends_with(')') {
        attribution_line.to_string()
    } else {
        format!("({})", suspect.attribution)
    };

    let mut plan = vec![(
        start,
        LineEdit::Replace(format!("{} {}", delimit_blockquote(&content), attribution)),
    )];
    plan.extend((start + 1..end).map(|idx| (idx, LineEdit::Remove)));
    plan.push((attribution_idx, LineEdit::Remove));
    Some(plan)
}

/// Fix suspected quotes in a file in place; returns whether it changed
pub async fn fix_file(path: &Path, suspects: &[SuspectedQuote]) -> Result<bool> {
    if suspects.is_empty() {
        return Ok(false);
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let outcome = fix_document(&content, suspects);
    if !outcome.changed() {
        return Ok(false);
    }

    tokio::fs::write(path, &outcome.content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), fixed = outcome.fixed, "Rewrote suspected quotes");
    Ok(true)
}
