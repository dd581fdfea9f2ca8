//! Inline style extraction (markup → markup + stylesheet).
//!
//! Moves the first `<style>` block of a document into its own stylesheet and
//! links it back from `<head>`:
//!
//! ```text
//! <head></head>                          <head>
//! <body>                                   <link rel="stylesheet" href="css/page.css?v=1.0.0">
//!   <style>body{color:red}</style>   ->  </head>
//! </body>                                <body></body>
//! ```
//!
//! All-or-nothing per document: the head is located before anything is
//! detached, so a document that cannot take the link yields no stylesheet
//! and no changes.

pub mod naming;

use std::path::Path;

use thiserror::Error;

use crate::dom::{Document, NodeExt, ParseError, new_element};
use naming::{stylesheet_file_name, stylesheet_href};

/// Default directory part of the link `href`.
pub const DEFAULT_HREF_PREFIX: &str = "css";

/// Default cache-busting version appended as `?v=`.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Why a document could not be transformed.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("found <style> but no <head> to link the stylesheet from")]
    MissingHeadElement,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Link settings for extracted stylesheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Directory part of the `href` (`css` → `css/page.css`).
    pub href_prefix: String,
    /// Value of the `?v=` query suffix.
    pub version: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            href_prefix: DEFAULT_HREF_PREFIX.into(),
            version: DEFAULT_VERSION.into(),
        }
    }
}

/// An externalized stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    /// File name the stylesheet is written under (`page.css`).
    pub file_name: String,
    /// Link target written into the document.
    pub href: String,
    /// Verbatim body of the `<style>` element.
    pub text: String,
}

/// Result of running the extractor over one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// `Some` when a style block was moved out.
    pub stylesheet: Option<Stylesheet>,
    /// Updated document text, or the input unchanged.
    pub document: String,
    /// `<style>` elements after the first, left inline.
    pub remaining_styles: usize,
}

#[cfg(test)]
impl Extraction {
    /// Whether the document was rewritten.
    pub fn changed(&self) -> bool {
        self.stylesheet.is_some()
    }
}

/// Split the first inline style block out of a document.
///
/// `destination` is the document's path; only its file name is used to name
/// the stylesheet. No filesystem access happens here.
pub fn extract_style(
    html: &str,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let doc = Document::parse(html)?;

    let Some(style) = doc.find_first("style") else {
        return Ok(Extraction {
            stylesheet: None,
            document: html.to_string(),
            remaining_styles: 0,
        });
    };
    let text = style.text_content();

    let Some(head) = doc.head() else {
        return Err(ExtractError::MissingHeadElement);
    };

    let file_name = stylesheet_file_name(destination);
    let href = stylesheet_href(&file_name, &options.href_prefix, &options.version);

    style.detach();
    head.append_child(new_element(
        "link",
        &[("rel", "stylesheet"), ("href", href.as_str())],
    ));

    Ok(Extraction {
        stylesheet: Some(Stylesheet {
            file_name,
            href,
            text,
        }),
        document: doc.to_html_pretty(),
        remaining_styles: doc.count("style"),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use markup5ever_rcdom::Handle;

    fn extract(html: &str, destination: &str) -> Result<Extraction, ExtractError> {
        extract_style(html, Path::new(destination), &ExtractOptions::default())
    }

    fn reparse(extraction: &Extraction) -> Document {
        Document::parse(&extraction.document).expect("output should re-parse")
    }

    fn child_tags(node: &Handle) -> Vec<String> {
        node.child_elements()
            .iter()
            .filter_map(|child| child.tag().map(str::to_string))
            .collect()
    }

    fn last_head_child(doc: &Document) -> Handle {
        doc.head()
            .expect("should have head")
            .child_elements()
            .pop()
            .expect("head should not be empty")
    }

    #[test]
    fn test_style_in_body_moves_to_head_link() {
        let html = "<html><head></head><body><style>body{color:red}</style></body></html>";
        let result = extract(html, "page.html").unwrap();

        assert!(result.changed());
        let sheet = result.stylesheet.as_ref().unwrap();
        assert_eq!(sheet.text, "body{color:red}");
        assert_eq!(sheet.file_name, "page.css");
        assert!(!result.document.contains("<style"));
        assert!(result.document.contains(
            "<head>\n    <link rel=\"stylesheet\" href=\"css/page.css?v=1.0.0\">\n  </head>"
        ));
    }

    #[test]
    fn test_no_style_returns_input_untouched() {
        let html = "<html>\n<head><title>x</title></head>\n<body><p>hi</p></body></html>";
        let result = extract(html, "index.html").unwrap();

        assert!(!result.changed());
        assert!(result.stylesheet.is_none());
        assert_eq!(result.document, html);

        let before = Document::parse(html).unwrap().to_html_pretty();
        let after = reparse(&result).to_html_pretty();
        assert_eq!(before, after);
    }

    #[test]
    fn test_missing_head_yields_nothing() {
        let html = "<style>a{}</style><body></body>";
        let err = extract(html, "page.html").unwrap_err();
        assert!(matches!(err, ExtractError::MissingHeadElement));
    }

    #[test]
    fn test_stylesheet_text_is_verbatim() {
        let css = "\n    :root { --gap: 4px; }\n    a:hover > span { color: #fff; }\n  ";
        let html = format!(
            "<html><head><title>t</title><style media=\"screen\">{css}</style></head><body></body></html>"
        );
        let result = extract(&html, "t.html").unwrap();
        assert_eq!(result.stylesheet.unwrap().text, css);
    }

    #[test]
    fn test_link_is_appended_last_in_head() {
        let html = "<html><head><meta charset=\"utf-8\"><style>p{}</style><title>t</title></head><body></body></html>";
        let result = extract(html, "index.html").unwrap();
        let doc = reparse(&result);

        assert_eq!(doc.count("style"), 0);
        assert_eq!(doc.count("link"), 1);
        assert_eq!(child_tags(&doc.head().unwrap()), ["meta", "title", "link"]);

        let link = last_head_child(&doc);
        assert_eq!(link.attr("rel").as_deref(), Some("stylesheet"));
        assert_eq!(link.attr("href").as_deref(), Some("css/index.css?v=1.0.0"));
    }

    #[test]
    fn test_existing_links_are_kept() {
        let html = "<html><head><link rel=\"icon\" href=\"f.ico\"><style>p{}</style></head><body></body></html>";
        let result = extract(html, "a.html").unwrap();
        let doc = reparse(&result);

        let rels: Vec<_> = doc
            .head()
            .unwrap()
            .child_elements()
            .iter()
            .filter_map(|e| e.attr("rel"))
            .collect();
        assert_eq!(rels, ["icon", "stylesheet"]);
    }

    #[test]
    fn test_only_first_style_is_extracted() {
        let html = "<html><head><style>a{}</style></head><body><style>b{}</style></body></html>";
        let result = extract(html, "two.html").unwrap();
        assert_eq!(result.stylesheet.as_ref().unwrap().text, "a{}");

        assert_eq!(result.remaining_styles, 1);
        let doc = reparse(&result);
        assert_eq!(doc.count("style"), 1);
        assert_eq!(doc.find_first("style").unwrap().text_content(), "b{}");
    }

    #[test]
    fn test_empty_style_still_extracted() {
        let html = "<html><head><style></style></head><body></body></html>";
        let result = extract(html, "e.html").unwrap();
        assert!(result.changed());
        assert_eq!(result.stylesheet.unwrap().text, "");
        assert!(!result.document.contains("<style"));
    }

    #[test]
    fn test_uppercase_tags_match() {
        let html = "<HTML><HEAD></HEAD><BODY><STYLE>h1{}</STYLE></BODY></HTML>";
        let result = extract(html, "up.html").unwrap();
        assert_eq!(result.stylesheet.unwrap().text, "h1{}");
        assert!(result.document.contains("href=\"css/up.css?v=1.0.0\""));
    }

    #[test]
    fn test_custom_options() {
        let options = ExtractOptions {
            href_prefix: "static/styles".into(),
            version: "42".into(),
        };
        let html = "<html><head><style>a{}</style></head></html>";
        let result = extract_style(html, Path::new("site/home.html"), &options).unwrap();
        let sheet = result.stylesheet.unwrap();
        assert_eq!(sheet.file_name, "home.css");
        assert_eq!(sheet.href, "static/styles/home.css?v=42");
    }

    #[test]
    fn test_default_href_for_index() {
        let html = "<html><head><style>a{}</style></head></html>";
        let result = extract(html, "index.html").unwrap();
        assert_eq!(result.stylesheet.unwrap().href, "css/index.css?v=1.0.0");
    }

    #[test]
    fn test_doctype_survives() {
        let html = "<!DOCTYPE html>\n<html><head><style>a{}</style></head><body></body></html>";
        let result = extract(html, "d.html").unwrap();
        assert!(result.document.starts_with("<!DOCTYPE html>\n"));
    }

    #[test]
    fn test_malformed_markup_does_not_panic() {
        let html = "<html><head><style>a{}</style><body><div><span></p></b></body>";
        let result = extract(html, "m.html").unwrap();
        assert!(result.changed());
        assert_eq!(reparse(&result).count("style"), 0);
    }

    #[test]
    fn test_script_with_less_than_keeps_body() {
        let script = "if (a<b) { go(); }";
        let html = format!(
            "<html><head><style>a{{}}</style></head><body><script>{script}</script><p>keep me</p></body></html>"
        );
        let result = extract(&html, "s.html").unwrap();

        assert!(result.document.contains(&format!("<script>{script}</script>")));
        assert!(result.document.contains("<p>keep me</p>"));
    }

    #[test]
    fn test_less_than_in_text_keeps_body() {
        let html = "<html><head><style>a{}</style></head><body><p>1 < 2 and keep me</p></body></html>";
        let result = extract(html, "lt.html").unwrap();

        assert!(result.document.contains("<p>1 &lt; 2 and keep me</p>"));
        let doc = reparse(&result);
        assert_eq!(doc.find_first("p").unwrap().text_content(), "1 < 2 and keep me");
    }

    #[test]
    fn test_markup_inside_style_is_stylesheet_text() {
        let css = "a::before{content:\"<i>\"}";
        let html = format!("<html><head><style>{css}</style></head><body><p>keep me</p></body></html>");
        let result = extract(&html, "q.html").unwrap();

        assert_eq!(result.stylesheet.as_ref().unwrap().text, css);
        let doc = reparse(&result);
        assert_eq!(doc.find_first("p").unwrap().text_content(), "keep me");
        assert_eq!(doc.count("i"), 0);
    }

    #[test]
    fn test_script_before_style_in_head_is_not_a_noop() {
        let html = "<html><head><script>if (a<b) go();</script><style>p{}</style></head><body></body></html>";
        let result = extract(html, "order.html").unwrap();

        assert!(result.changed());
        assert_eq!(result.stylesheet.as_ref().unwrap().text, "p{}");
        let doc = reparse(&result);
        assert_eq!(child_tags(&doc.head().unwrap()), ["script", "link"]);
        assert_eq!(
            doc.find_first("script").unwrap().text_content(),
            "if (a<b) go();"
        );
    }

    #[test]
    fn test_gt_in_style_attribute_not_in_text() {
        let html = "<html><head><style data-note=\"a>b\">p{}</style></head><body></body></html>";
        let result = extract(html, "attr.html").unwrap();
        assert_eq!(result.stylesheet.unwrap().text, "p{}");
    }

    #[test]
    fn test_unclosed_head_gets_link_before_body() {
        let html = "<html><head><title>t</title><style>a{}</style><body><p>x</p></body></html>";
        let result = extract(html, "open.html").unwrap();
        let doc = reparse(&result);

        assert_eq!(child_tags(&doc.head().unwrap()), ["title", "link"]);
        let body = doc.find_first("body").unwrap();
        assert_eq!(child_tags(&body), ["p"]);
        assert!(body.find_first("link").is_none());
    }
}
