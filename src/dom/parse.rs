//! Lenient HTML parsing.
//!
//! Two passes over the source:
//! - html5ever builds the tree, repairing markup with the standard rules
//! - lol_html scans the raw token stream for an explicit `<head>` start tag,
//!   which the tree alone cannot tell apart from a synthesized one
//!
//! Both honor raw text, so a `<head>` inside a script string or a comment
//! does not count.

use std::cell::Cell;

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use lol_html::{RewriteStrSettings, element, rewrite_str};
use markup5ever_rcdom::RcDom;
use thiserror::Error;

use super::Document;

/// The source could not be scanned at all.
#[derive(Debug, Error)]
#[error("unparseable markup: {reason}")]
pub struct ParseError {
    reason: String,
}

/// Parse markup into a [`Document`].
pub fn parse(html: &str) -> Result<Document, ParseError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let has_head = has_head_tag(html)?;
    Ok(Document { dom, has_head })
}

/// Whether the source contains a `<head>` start tag.
fn has_head_tag(html: &str) -> Result<bool, ParseError> {
    let seen = Cell::new(false);

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("head", |_el| {
                seen.set(true);
                Ok(())
            })],
            strict: false,
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| ParseError {
        reason: err.to_string(),
    })?;

    Ok(seen.get())
}

// ============================================================================
// Tests
// ============================================================================
