//! Batch extraction over a list of documents.
//!
//! Phases:
//! - **Setup** - create the stylesheet directory (skipped on dry run)
//! - **Process** - every document in parallel: read → extract → write
//! - **Report** - outcomes collected in input order
//!
//! Documents are fully independent: a failure is recorded for that document
//! and the rest of the batch carries on. Per document, the stylesheet is only
//! written once the extractor has produced the rewritten markup, and it is
//! removed again if the document itself cannot be written, unless other
//! documents in the batch map onto the same stylesheet file.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;

use super::report::{BatchReport, DocumentReport, Outcome};
use crate::{
    config::StyliftConfig,
    debug,
    extract::{ExtractOptions, extract_style, naming::stylesheet_file_name},
    log,
    logger::ProgressLine,
};

/// Run the extractor over `files` and collect one outcome per file.
///
/// Only setup errors (the stylesheet directory cannot be created) abort the
/// run; everything else is reported per document.
pub fn run(config: &StyliftConfig, files: &[PathBuf], quiet: bool) -> Result<BatchReport> {
    let css_dir = &config.extract.css_dir;

    if !config.dry_run {
        fs::create_dir_all(css_dir).with_context(|| {
            format!("failed to create stylesheet directory {}", css_dir.display())
        })?;
        debug!("extract"; "stylesheet directory: {}", css_dir.display());
    }

    let shared = shared_names(files);
    if !quiet {
        warn_shared_names(&shared);
    }

    let options = config.extract.options();
    let progress = create_progress(files.len(), quiet);

    let documents = files
        .par_iter()
        .map(|path| {
            let result = process_document(path, css_dir, &options, &shared, config.dry_run);
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(err) => Outcome::Failed {
                    reason: format!("{err:#}"),
                },
            };
            if let Some(p) = &progress {
                p.inc();
            }
            DocumentReport {
                path: path.clone(),
                outcome,
            }
        })
        .collect();

    if let Some(p) = progress {
        p.finish();
    }

    Ok(BatchReport {
        documents,
        dry_run: config.dry_run,
    })
}

/// Progress line for batches worth watching.
fn create_progress(total: usize, quiet: bool) -> Option<ProgressLine> {
    if quiet || total < 2 {
        return None;
    }
    Some(ProgressLine::new("extract", total))
}

/// Transform one document and write its results.
fn process_document(
    path: &Path,
    css_dir: &Path,
    options: &ExtractOptions,
    shared: &BTreeMap<String, Vec<&Path>>,
    dry_run: bool,
) -> Result<Outcome> {
    if !path.is_file() {
        return Err(anyhow!("file not found"));
    }

    let html = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let extraction = extract_style(&html, path, options)?;
    let Some(stylesheet) = extraction.stylesheet else {
        debug!("extract"; "no <style> in {}", path.display());
        return Ok(Outcome::Skipped);
    };

    let css_path = css_dir.join(&stylesheet.file_name);
    if dry_run {
        return Ok(Outcome::Updated {
            stylesheet: css_path,
        });
    }

    fs::write(&css_path, &stylesheet.text)
        .with_context(|| format!("failed to write {}", css_path.display()))?;

    if let Err(err) = fs::write(path, &extraction.document) {
        rollback_stylesheet(&css_path, shared.contains_key(&stylesheet.file_name));
        return Err(err).with_context(|| format!("failed to write {}", path.display()));
    }

    debug!("extract"; "{} -> {}", path.display(), stylesheet.href);
    if extraction.remaining_styles > 0 {
        debug!("extract"; "{}: {} more <style> left inline", path.display(), extraction.remaining_styles);
    }
    Ok(Outcome::Updated {
        stylesheet: css_path,
    })
}

/// Remove a stylesheet whose document could not be rewritten.
///
/// A shared stylesheet may already be linked from another document, so it
/// is left in place. Returns whether the file was removed.
fn rollback_stylesheet(css_path: &Path, shared: bool) -> bool {
    if shared {
        log!("warning"; "kept {}, other documents share it", css_path.display());
        return false;
    }
    match fs::remove_file(css_path) {
        Ok(()) => {
            debug!("extract"; "removed {}", css_path.display());
            true
        }
        Err(err) => {
            log!("warning"; "could not remove {}: {}", css_path.display(), err);
            false
        }
    }
}

/// Stylesheet names that more than one document maps onto.
fn shared_names(files: &[PathBuf]) -> BTreeMap<String, Vec<&Path>> {
    let mut by_name: BTreeMap<String, Vec<&Path>> = BTreeMap::new();
    for path in files {
        by_name
            .entry(stylesheet_file_name(path))
            .or_default()
            .push(path);
    }
    by_name.retain(|_, paths| paths.len() > 1);
    by_name
}

/// Warn about documents that map onto the same stylesheet file.
fn warn_shared_names(shared: &BTreeMap<String, Vec<&Path>>) {
    for (name, paths) in shared {
        let list: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();
        log!("warning"; "{} all write {}: {}", paths.len(), name, list.join(", "));
    }
}

// ============================================================================
// Tests
// ============================================================================
