//! Per-document outcomes and the batch summary.

use std::fmt;
use std::path::PathBuf;

use owo_colors::OwoColorize;

use crate::{log, utils::plural_count};

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Stylesheet written and document rewritten.
    Updated { stylesheet: PathBuf },
    /// No `<style>` element; nothing written.
    Skipped,
    /// Not transformed; nothing written.
    Failed { reason: String },
}

/// Outcome for a single input path.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
    /// Whether files were left untouched on purpose.
    pub dry_run: bool,
}

impl BatchReport {
    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Updated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Outcome recorded for a path, if it was part of the batch.
    #[cfg(test)]
    pub fn outcome_of(&self, path: &std::path::Path) -> Option<&Outcome> {
        self.documents
            .iter()
            .find(|doc| doc.path == path)
            .map(|doc| &doc.outcome)
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.documents.iter().filter(|doc| pred(&doc.outcome)).count()
    }

    /// Print one line per document, then the summary.
    pub fn print(&self) {
        for (prefix, message) in self.lines() {
            log!(prefix; "{}", message);
        }
        log!("done"; "{}", self);
    }

    /// Log prefix and message for every document, in input order.
    ///
    /// Dry runs describe what would have been written.
    fn lines(&self) -> Vec<(&'static str, String)> {
        let (created, updated) = if self.dry_run {
            ("would create", "would update")
        } else {
            ("created", "updated")
        };

        let mut lines = Vec::new();
        for doc in &self.documents {
            let path = doc.path.display();
            match &doc.outcome {
                Outcome::Updated { stylesheet } => {
                    lines.push((created, stylesheet.display().to_string()));
                    lines.push((updated, path.to_string()));
                }
                Outcome::Skipped => lines.push(("skipped", format!("{path} (no <style> tag)"))),
                Outcome::Failed { reason } => lines.push(("error", format!("{path}: {reason}"))),
            }
        }
        lines
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let updated = format!("{} updated", plural_count(self.updated(), "document"));
        let skipped = format!("{} skipped", self.skipped());
        let failed = format!("{} failed", self.failed());

        write!(f, "{}, {}, ", updated.green(), skipped.dimmed())?;
        if self.has_failures() {
            write!(f, "{}", failed.red().bold())?;
        } else {
            write!(f, "{failed}")?;
        }
        if self.dry_run {
            write!(f, " {}", "(dry run, nothing written)".yellow())?;
        }
        Ok(())
    }
}
