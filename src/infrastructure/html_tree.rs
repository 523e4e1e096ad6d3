//! Owned markup tree with structural search
//!
//! Wraps a parsed HTML document in a plain recursive node structure that
//! exposes its children as an ordered list, and provides pre-order
//! single/multi-match search by node kind, tag name, namespace, attribute
//! key and attribute value.

use ego_tree::NodeRef;
use ego_tree::iter::Edge;
use scraper::Html;
use serde::{Deserialize, Serialize};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Kind of a markup node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Document,
    Fragment,
    Doctype,
    Element,
    Text,
    Comment,
    ProcessingInstruction,
}

/// Single key/value attribute pair, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// A node of a parsed document.
///
/// `tag` holds the local element name and is empty for non-element nodes.
/// `data` holds the character data of text, comment, doctype and
/// processing-instruction nodes. Children are owned and kept in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub tag: String,
    pub namespace: String,
    pub attrs: Vec<Attribute>,
    pub data: String,
    pub children: Vec<Node>,
}

/// Search criteria for [`Node::search_first`] and [`Node::search_all`].
///
/// Every field left as `None` is not checked. The attribute key and the
/// attribute value are checked independently: a node matches when any of its
/// attributes carries the key and any of its attributes carries the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSpec {
    pub kind: Option<NodeKind>,
    pub tag: Option<String>,
    pub namespace: Option<String>,
    pub attr_key: Option<String>,
    pub attr_value: Option<String>,
}

impl MatchSpec {
    /// Matches every node
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches element nodes with the given tag name
    pub fn element(tag: &str) -> Self {
        Self::any().kind(NodeKind::Element).tag(tag)
    }

    /// Matches text nodes
    pub fn text() -> Self {
        Self::any().kind(NodeKind::Text)
    }

    pub fn kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn attr_key(mut self, key: &str) -> Self {
        self.attr_key = Some(key.to_string());
        self
    }

    pub fn attr_value(mut self, value: &str) -> Self {
        self.attr_value = Some(value.to_string());
        self
    }

    /// Check a single node against every populated field
    pub fn matches(&self, node: &Node) -> bool {
        if self.kind.is_some_and(|kind| node.kind != kind) {
            return false;
        }

        if self.tag.as_deref().is_some_and(|tag| node.tag != tag) {
            return false;
        }

        if self.namespace.as_deref().is_some_and(|ns| node.namespace != ns) {
            return false;
        }

        if let Some(key) = self.attr_key.as_deref() {
            if !node.attrs.iter().any(|attr| attr.key == key) {
                return false;
            }
        }

        if let Some(value) = self.attr_value.as_deref() {
            if !node.attrs.iter().any(|attr| attr.value == value) {
                return false;
            }
        }

        true
    }
}

impl Node {
    /// Parse a full HTML document into an owned tree rooted at the document node
    pub fn parse_document(html: &str) -> Self {
        let document = Html::parse_document(html);
        Self::from_tree_node(document.tree.root())
    }

    /// Parse raw response bytes, replacing invalid UTF-8 sequences
    pub fn parse_bytes(bytes: &[u8]) -> Self {
        Self::parse_document(&String::from_utf8_lossy(bytes))
    }

    /// Copy an html5ever tree into owned nodes, walking open/close edges so
    /// nesting depth never grows the call stack
    fn from_tree_node(root: NodeRef<'_, scraper::Node>) -> Self {
        let mut open: Vec<Node> = Vec::new();
        for edge in root.traverse() {
            match edge {
                Edge::Open(node) => open.push(Self::from_value(node.value())),
                Edge::Close(_) => {
                    let Some(done) = open.pop() else { continue };
                    match open.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => return done,
                    }
                }
            }
        }

        Self::empty(NodeKind::Document)
    }

    fn from_value(value: &scraper::Node) -> Self {
        match value {
            scraper::Node::Document => Self::empty(NodeKind::Document),
            scraper::Node::Fragment => Self::empty(NodeKind::Fragment),
            scraper::Node::Doctype(doctype) => {
                Self::with_data(NodeKind::Doctype, doctype.name())
            }
            scraper::Node::Comment(comment) => Self::with_data(NodeKind::Comment, comment),
            scraper::Node::Text(text) => Self::with_data(NodeKind::Text, text),
            scraper::Node::ProcessingInstruction(pi) => {
                Self::with_data(NodeKind::ProcessingInstruction, pi)
            }
            scraper::Node::Element(element) => Self {
                kind: NodeKind::Element,
                tag: element.name().to_string(),
                namespace: short_namespace(&element.name.ns).to_string(),
                attrs: element
                    .attrs()
                    .map(|(key, value)| Attribute {
                        key: key.to_string(),
                        value: value.to_string(),
                    })
                    .collect(),
                data: String::new(),
                children: Vec::new(),
            },
        }
    }

    fn empty(kind: NodeKind) -> Self {
        Self {
            kind,
            tag: String::new(),
            namespace: String::new(),
            attrs: Vec::new(),
            data: String::new(),
            children: Vec::new(),
        }
    }

    fn with_data(kind: NodeKind, data: &str) -> Self {
        let mut node = Self::empty(kind);
        node.data = data.to_string();
        node
    }

    /// Every node of the subtree, self first, in pre-order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First node of the subtree (self included) matching `spec`, in pre-order
    pub fn search_first(&self, spec: &MatchSpec) -> Option<&Node> {
        self.descendants().find(|node| spec.matches(node))
    }

    /// Every node of the subtree (self included) matching `spec`, in pre-order
    pub fn search_all(&self, spec: &MatchSpec) -> Vec<&Node> {
        self.descendants().filter(|node| spec.matches(node)).collect()
    }

    /// Value of the first attribute named `key`
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }

    /// Character data of the first child, when that child is a text node
    pub fn first_text(&self) -> Option<&str> {
        self.children
            .first()
            .filter(|child| child.kind == NodeKind::Text)
            .map(|child| child.data.as_str())
    }

    /// Concatenated character data of every descendant text node
    pub fn text_content(&self) -> String {
        self.search_all(&MatchSpec::text())
            .into_iter()
            .map(|node| node.data.as_str())
            .collect()
    }

    /// Number of nodes in the subtree, self included
    pub fn subtree_len(&self) -> usize {
        self.descendants().count()
    }
}

// Children are detached onto a work list so dropping a deep tree stays flat
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Pre-order walk over a subtree, see [`Node::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

fn short_namespace(ns: &str) -> &str {
    match ns {
        HTML_NAMESPACE => "",
        SVG_NAMESPACE => "svg",
        MATHML_NAMESPACE => "math",
        other => other,
    }
}
