//! Stylesheet naming.
//!
//! Maps a document path to the stylesheet file it gets split into and to the
//! versioned `href` the document links it with:
//!
//! ```text
//! site/about.html  ->  about.css  ->  css/about.css?v=1.0.0
//! ```

use std::path::Path;

/// Stylesheet file name for a document.
///
/// Takes the basename and swaps the first literal `.html` for `.css`. A name
/// without `.html` is returned as-is.
pub fn stylesheet_file_name(document: &Path) -> String {
    let base = document
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| document.to_string_lossy());
    base.replacen(".html", ".css", 1)
}

/// Versioned link target for a stylesheet file name.
///
/// Returns `prefix/file?v=version` (cache busting through the query string).
pub fn stylesheet_href(file_name: &str, prefix: &str, version: &str) -> String {
    if prefix.is_empty() {
        format!("{file_name}?v={version}")
    } else {
        format!("{prefix}/{file_name}?v={version}")
    }
}
