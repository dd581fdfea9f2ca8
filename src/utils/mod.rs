//! Shared helpers for markup handling and terminal output.

pub mod html;

/// Format a count with its noun, adding an `s` unless the count is one.
///
/// - `plural_count(0, "document")` -> `"0 documents"`
/// - `plural_count(1, "document")` -> `"1 document"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
