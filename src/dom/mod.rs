//! HTML document tree.
//!
//! Parsing goes through html5ever's tree builder, so markup is repaired the
//! way browsers repair it: raw text in `script`/`style`, stray `<` in text,
//! quoted `>` in attributes, and implied end tags such as a `</head>` that
//! never appears before `<body>`.
//!
//! ```text
//! Document
//! ├── dom        RcDom (Handle = Rc<Node>, parent links are weak)
//! └── has_head   whether the source spelled out a <head> start tag
//! ```
//!
//! The tree builder always synthesizes `<html>`, `<head>` and `<body>`.
//! [`Document::head`] only hands out the head when the source had one, so a
//! missing head stays missing.

mod parse;
mod serialize;

pub use parse::ParseError;

use std::cell::RefCell;
use std::rc::Rc;

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A parsed HTML document.
pub struct Document {
    dom: RcDom,
    has_head: bool,
}

impl Document {
    /// Parse markup into a tree. Malformed markup is repaired, not rejected.
    pub fn parse(html: &str) -> Result<Self, ParseError> {
        parse::parse(html)
    }

    /// The document node.
    pub fn root(&self) -> &Handle {
        &self.dom.document
    }

    /// The `<head>` element, if the source had one.
    pub fn head(&self) -> Option<Handle> {
        if !self.has_head {
            return None;
        }
        self.find_first("head")
    }

    /// First element with the given tag, in document order.
    pub fn find_first(&self, tag: &str) -> Option<Handle> {
        self.root().find_first(tag)
    }

    /// Number of elements with the given tag anywhere in the tree.
    pub fn count(&self, tag: &str) -> usize {
        self.root().count(tag)
    }
}

// ============================================================================
// Node helpers
// ============================================================================

/// Queries and mutations on tree nodes.
pub trait NodeExt {
    /// Lower-cased tag name, or `None` for non-element nodes.
    fn tag(&self) -> Option<&str>;

    #[cfg(test)]
    fn attr(&self, name: &str) -> Option<String>;

    /// Concatenated text of all descendant text nodes, in document order.
    fn text_content(&self) -> String;

    /// Child elements, skipping text and comments.
    fn child_elements(&self) -> Vec<Handle>;

    /// First descendant element with the given tag, in document order.
    fn find_first(&self, tag: &str) -> Option<Handle>;

    fn count(&self, tag: &str) -> usize;

    /// Append `child` as the last child, detaching it from any old parent.
    fn append_child(&self, child: Handle);

    /// Remove this node from its parent.
    fn detach(&self);
}

impl NodeExt for Handle {
    fn tag(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    #[cfg(test)]
    fn attr(&self, name: &str) -> Option<String> {
        let NodeData::Element { attrs, .. } = &self.data else {
            return None;
        };
        attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string())
    }

    fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    fn child_elements(&self) -> Vec<Handle> {
        self.children
            .borrow()
            .iter()
            .filter(|child| child.tag().is_some())
            .cloned()
            .collect()
    }

    fn find_first(&self, tag: &str) -> Option<Handle> {
        self.children.borrow().iter().find_map(|child| {
            if child.tag() == Some(tag) {
                Some(child.clone())
            } else {
                child.find_first(tag)
            }
        })
    }

    fn count(&self, tag: &str) -> usize {
        self.children
            .borrow()
            .iter()
            .map(|child| usize::from(child.tag() == Some(tag)) + child.count(tag))
            .sum()
    }

    fn append_child(&self, child: Handle) {
        child.detach();
        child.parent.set(Some(Rc::downgrade(self)));
        self.children.borrow_mut().push(child);
    }

    fn detach(&self) {
        let Some(parent) = self.parent.take().and_then(|weak| weak.upgrade()) else {
            return;
        };
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, self));
    }
}

fn collect_text(node: &Handle, out: &mut String) {
    for child in node.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => collect_text(child, out),
            _ => {}
        }
    }
}

/// Create a detached HTML element with plain-text attribute values.
///
/// Values are escaped on serialization.
pub fn new_element(tag: &str, attrs: &[(&str, &str)]) -> Handle {
    let attrs = attrs
        .iter()
        .map(|&(name, value)| Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
            value: StrTendril::from_slice(value),
        })
        .collect();

    Node::new(NodeData::Element {
        name: QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag)),
        attrs: RefCell::new(attrs),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

// ============================================================================
// Tests
// ============================================================================
