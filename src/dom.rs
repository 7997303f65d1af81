//! # Document Model
//!
//! A minimal, owned node tree standing in for the browser DOM. Components
//! build [`Node`]s; the composer appends them to a [`Document`], whose
//! single `body` root is the only append target.
//!
//! Children of the root are never removed or reordered, so a top-level
//! node's [`NodeId`] is simply its position among the body's children.
//! Serialized pages carry the id of bound elements in a [`NODE_ATTR`]
//! attribute, since a page template may put other elements around them.

use crate::core::error::{MenagerieError, Result};
use std::fmt::Write as _;

/// Selector of the document's single append target.
pub const ROOT_SELECTOR: &str = "body";

/// Attribute holding a top-level element's [`NodeId`] in serialized HTML.
pub const NODE_ATTR: &str = "data-menagerie-node";

/// List of HTML5 void elements that don't need closing tags
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Position of a top-level node among the root's children.
pub type NodeId = usize;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with attributes and children.
    Element(Element),
    /// A plain text node.
    Text(String),
}

impl Node {
    /// Creates a text node.
    pub fn text<S: Into<String>>(text: S) -> Self {
        Node::Text(text.into())
    }

    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Concatenated text content of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Element(element) => element.text_content(),
        }
    }

    /// Serializes the node as HTML, escaping text and attribute values.
    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => {
                out.push_str(&handlebars::html_escape(text))
            }
            Node::Element(element) => element.write_html(out),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An HTML element.
///
/// Attributes keep their insertion order so serialized output is stable.
/// The class list is kept apart from the other attributes, mirroring
/// `classList` in the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an empty element with the given tag name.
    pub fn new<S: Into<String>>(tag: S) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute, replacing any previous value.
    pub fn with_attr<K: Into<String>, V: ToString>(
        mut self,
        key: K,
        value: V,
    ) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Adds a class to the class list. Duplicates are ignored.
    pub fn with_class<S: Into<String>>(mut self, class: S) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Appends a text child.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.children.push(Node::text(text));
        self
    }

    /// Appends a child node.
    pub fn with_child<N: Into<Node>>(mut self, child: N) -> Self {
        self.children.push(child.into());
        self
    }

    /// Sets an attribute in place, replacing any previous value.
    pub fn set_attr<K: Into<String>, V: ToString>(
        &mut self,
        key: K,
        value: V,
    ) {
        let key = key.into();
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// The element's tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Looks up an attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The class list, in insertion order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// The element's children.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    /// Serializes the element as HTML.
    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in &self.attributes {
            let _ = write!(
                out,
                r#" {}="{}""#,
                key,
                handlebars::html_escape(value)
            );
        }
        if !self.classes.is_empty() {
            let _ = write!(
                out,
                r#" class="{}""#,
                handlebars::html_escape(&self.classes.join(" "))
            );
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// A page document with a single `body` root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    title: String,
    body: Option<Vec<Node>>,
}

impl Document {
    /// Creates a document with an empty body.
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
            body: Some(Vec::new()),
        }
    }

    /// Creates a document with no body.
    ///
    /// Every append fails with [`MenagerieError::RootNotFound`].
    pub fn without_root<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
            body: None,
        }
    }

    /// The document title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Appends a node at the end of the root and returns its id.
    pub fn append(&mut self, node: Node) -> Result<NodeId> {
        let body = self
            .body
            .as_mut()
            .ok_or_else(|| MenagerieError::root_not_found(ROOT_SELECTOR))?;
        body.push(node);
        Ok(body.len() - 1)
    }

    /// The root's children, in append order.
    pub fn children(&self) -> Result<&[Node]> {
        self.body
            .as_deref()
            .ok_or_else(|| MenagerieError::root_not_found(ROOT_SELECTOR))
    }

    /// Looks up a top-level node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.body.as_ref().and_then(|body| body.get(id))
    }

    /// Number of top-level nodes; zero when there is no root.
    pub fn len(&self) -> usize {
        self.body.as_ref().map_or(0, Vec::len)
    }

    /// Whether the root has no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializes the root's children as an HTML fragment.
    pub fn body_html(&self) -> Result<String> {
        self.body_html_marked(&[])
    }

    /// Serializes the root's children, tagging every element in `marked`
    /// with its id in [`NODE_ATTR`].
    pub fn body_html_marked(&self, marked: &[NodeId]) -> Result<String> {
        let mut out = String::new();
        for (id, node) in self.children()?.iter().enumerate() {
            match node {
                Node::Element(element) if marked.contains(&id) => element
                    .clone()
                    .with_attr(NODE_ATTR, id)
                    .write_html(&mut out),
                _ => node.write_html(&mut out),
            }
        }
        Ok(out)
    }
}
