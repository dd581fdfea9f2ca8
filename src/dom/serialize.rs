//! Indented serialization.
//!
//! Structural elements go on their own line with two-space indentation.
//! Anything whitespace-sensitive is handed to html5ever's serializer whole
//! and written on one line: raw text (`script`, `style`), preformatted
//! content, and elements holding only inline content.

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use markup5ever_rcdom::{Handle, NodeData, SerializableHandle};

use super::{Document, NodeExt};
use crate::utils::html::{
    escape_attr, is_inline_element, is_preformatted_element, is_raw_text_element,
    is_void_element,
};

const INDENT: &str = "  ";

impl Document {
    /// Serialize with one structural node per line.
    pub fn to_html_pretty(&self) -> String {
        let mut out = String::new();
        for child in self.root().children.borrow().iter() {
            write_pretty(&mut out, child, 0);
        }
        out
    }
}

fn write_pretty(out: &mut String, node: &Handle, depth: usize) {
    match &node.data {
        NodeData::Text { contents } => {
            if contents.borrow().trim().is_empty() {
                return;
            }
            push_indent(out, depth);
            out.push_str(serialize_node(node).trim());
            out.push('\n');
        }
        NodeData::Element { attrs, .. } if needs_block_layout(node) => {
            let tag = node.tag().unwrap_or_default();

            push_indent(out, depth);
            out.push('<');
            out.push_str(tag);
            for attr in attrs.borrow().iter() {
                out.push(' ');
                if let Some(prefix) = &attr.name.prefix {
                    out.push_str(prefix);
                    out.push(':');
                }
                out.push_str(&attr.name.local);
                out.push_str("=\"");
                out.push_str(&escape_attr(&attr.value));
                out.push('"');
            }
            out.push_str(">\n");

            for child in node.children.borrow().iter() {
                write_pretty(out, child, depth + 1);
            }

            push_indent(out, depth);
            out.push_str("</");
            out.push_str(tag);
            out.push_str(">\n");
        }
        NodeData::Document => {
            for child in node.children.borrow().iter() {
                write_pretty(out, child, depth);
            }
        }
        _ => {
            push_indent(out, depth);
            out.push_str(&serialize_node(node));
            out.push('\n');
        }
    }
}

/// Whether the element's children go on their own lines.
///
/// True once any descendant is structural (block or document-level), unless
/// the element's content is whitespace-sensitive.
fn needs_block_layout(node: &Handle) -> bool {
    let Some(tag) = node.tag() else {
        return false;
    };
    if is_void_element(tag) || is_raw_text_element(tag) || is_preformatted_element(tag) {
        return false;
    }
    node.child_elements().iter().any(|child| {
        child.tag().is_some_and(|tag| !is_inline_element(tag)) || needs_block_layout(child)
    })
}

/// Serialize one node and its subtree without reformatting.
fn serialize_node(node: &Handle) -> String {
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..SerializeOpts::default()
    };
    let mut bytes = Vec::new();
    // Writing into a Vec cannot fail
    let _ = serialize(&mut bytes, &SerializableHandle::from(node.clone()), opts);
    String::from_utf8_lossy(&bytes).into_owned()
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

// ============================================================================
// Tests
// ============================================================================
