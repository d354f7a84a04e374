//! Plain hierarchical data for persisting and restoring documents.
//!
//! The raw types mirror the tree without keys, selection or history. They
//! serialize with serde as internally tagged objects:
//!
//! ```json
//! { "nodes": [
//!     { "object": "container", "kind": "paragraph", "nodes": [
//!         { "object": "text", "ranges": [
//!             { "text": "Hello " },
//!             { "text": "world", "marks": ["bold"] }
//!         ] }
//!     ] }
//! ] }
//! ```
//!
//! Converting back through [`Document::from_raw`] assigns fresh keys and
//! rejects data that breaks a structural invariant.

use crate::document::{Document, PARAGRAPH_KIND};
use crate::error::{Error, Result};
use crate::marks::Marks;
use crate::node::{Container, Node, Text, TextRange};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A whole document: the root's children.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    pub nodes: Vec<RawNode>,
}

/// One node of a raw document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "lowercase")]
pub enum RawNode {
    Container { kind: String, nodes: Vec<RawNode> },
    Text { ranges: Vec<RawRange> },
}

/// One marked range of a raw Text node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRange {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<String>,
}

impl RawNode {
    /// A container of `kind` holding `nodes`.
    #[must_use]
    pub fn container(kind: impl Into<String>, nodes: Vec<Self>) -> Self {
        Self::Container {
            kind: kind.into(),
            nodes,
        }
    }

    /// An unmarked Text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            ranges: vec![RawRange::plain(text)],
        }
    }

    /// A paragraph holding one unmarked Text node.
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::container(PARAGRAPH_KIND, vec![Self::text(text)])
    }
}

impl RawRange {
    /// An unmarked range.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// A range carrying `marks`.
    #[must_use]
    pub fn marked(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks: marks.names().map(str::to_string).collect(),
        }
    }

    fn to_text_range(&self) -> Result<TextRange> {
        let marks = Marks::from_names(self.marks.iter().map(String::as_str))
            .map_err(|name| Error::InvalidDocument(format!("unknown mark `{name}`")))?;
        Ok(TextRange::new(self.text.clone(), marks))
    }
}

impl From<&TextRange> for RawRange {
    fn from(range: &TextRange) -> Self {
        Self::marked(range.text.clone(), range.marks)
    }
}

impl Document {
    /// Build a document from plain data, assigning fresh keys.
    pub fn from_raw(raw: &RawDocument) -> Result<Self> {
        let mut doc = Self::empty();
        let children = raw
            .nodes
            .iter()
            .map(|node| doc.node_from_raw(node).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        *doc.root_mut().children_mut() = children;
        doc.validate()?;
        Ok(doc)
    }

    /// The plain-data form of this document.
    #[must_use]
    pub fn to_raw(&self) -> RawDocument {
        RawDocument {
            nodes: self.nodes().iter().map(|node| node_to_raw(node)).collect(),
        }
    }

    fn node_from_raw(&mut self, raw: &RawNode) -> Result<Node> {
        match raw {
            RawNode::Container { kind, nodes } => {
                let key = self.alloc_key();
                let children = nodes
                    .iter()
                    .map(|node| self.node_from_raw(node).map(Arc::new))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Node::Container(Container::new(key, kind.clone(), children)))
            }
            RawNode::Text { ranges } => {
                let ranges = ranges
                    .iter()
                    .map(RawRange::to_text_range)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Node::Text(self.new_text(&ranges)))
            }
        }
    }
}

fn node_to_raw(node: &Node) -> RawNode {
    match node {
        Node::Text(text) => text_to_raw(text),
        Node::Container(container) => RawNode::Container {
            kind: container.kind().to_string(),
            nodes: container
                .children()
                .iter()
                .map(|child| node_to_raw(child))
                .collect(),
        },
    }
}

fn text_to_raw(text: &Text) -> RawNode {
    RawNode::Text {
        ranges: text.ranges().iter().map(RawRange::from).collect(),
    }
}
