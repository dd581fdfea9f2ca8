//! HTML utility functions.
//!
//! Provides the element classification and escaping helpers used by the
//! indented serializer:
//! - `escape_attr()` - attribute value escaping
//! - `is_void_element()` - Self-closing elements (br, img, etc.)
//! - `is_raw_text_element()` - Raw text elements (script, style)
//! - `is_preformatted_element()` - Whitespace-significant elements (pre, textarea)
//! - `is_block_element()` / `is_inline_element()` - layout classification

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Escape a double-quoted attribute value.
///
/// Same character set html5ever's serializer escapes, so tags written by
/// hand and tags written by html5ever agree. Uses `Cow` to avoid allocation
/// when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape_attr("a\"b"), "a&quot;b");
/// assert_eq!(escape_attr("css/index.css"), "css/index.css"); // No allocation
/// ```
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '"', '\u{a0}']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\u{a0}' => result.push_str("&nbsp;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// Element Classification
// =============================================================================

/// Check if an HTML tag is a void element (self-closing).
///
/// Void elements cannot have children and are rendered without a closing tag.
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Check if tag is a raw text element (content is never escaped or reflowed).
///
/// Script and style content is "raw text" in HTML.
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

/// Check if tag keeps its whitespace significant.
#[inline]
pub fn is_preformatted_element(tag: &str) -> bool {
    matches!(tag, "pre" | "textarea" | "listing" | "plaintext")
}

/// Check if tag belongs to the document frame rather than the body flow.
#[inline]
pub fn is_document_element(tag: &str) -> bool {
    matches!(
        tag,
        "html"
            | "head"
            | "body"
            | "title"
            | "meta"
            | "link"
            | "base"
            | "script"
            | "style"
            | "noscript"
            | "template"
    )
}

/// Check if tag is a block-level element.
///
/// Block elements create line breaks and take full width by default.
#[inline]
pub fn is_block_element(tag: &str) -> bool {
    matches!(
        tag,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "canvas"
            | "caption"
            | "dd"
            | "details"
            | "dialog"
            | "div"
            | "dl"
            | "dt"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hgroup"
            | "hr"
            | "li"
            | "main"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "summary"
            | "table"
            | "tbody"
            | "td"
            | "tfoot"
            | "th"
            | "thead"
            | "tr"
            | "ul"
            | "video"
    )
}

/// Check if tag flows inline with surrounding text.
#[inline]
pub fn is_inline_element(tag: &str) -> bool {
    !is_block_element(tag) && !is_document_element(tag)
}

// =============================================================================
// Tests
// =============================================================================
