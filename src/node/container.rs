//! Container nodes holding ordered children.

use crate::node::{Key, Node, Text};
use std::sync::Arc;

/// A node holding an ordered sequence of children.
///
/// Children sit behind [`Arc`] so a cloned container shares every subtree
/// until one is edited. `kind` names the block type (`"paragraph"`,
/// `"heading"`, ...) for the rendering layer; the document model itself does
/// not interpret it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    key: Key,
    kind: String,
    children: Vec<Arc<Node>>,
}

impl Container {
    pub(crate) fn new(key: Key, kind: impl Into<String>, children: Vec<Arc<Node>>) -> Self {
        Self {
            key,
            kind: kind.into(),
            children,
        }
    }

    /// Key of this node.
    #[must_use]
    pub fn key(&self) -> Key {
        self.key
    }

    /// Block type name.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Ordered children.
    #[must_use]
    pub fn children(&self) -> &[Arc<Node>] {
        &self.children
    }

    /// Child at `index`.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index).map(AsRef::as_ref)
    }

    /// First child.
    #[must_use]
    pub fn first_child(&self) -> Option<&Node> {
        self.child(0)
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if the container has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Position of the direct child with `key`.
    #[must_use]
    pub fn index_of(&self, key: Key) -> Option<usize> {
        self.children.iter().position(|child| child.key() == key)
    }

    /// First Text node in document order.
    #[must_use]
    pub fn first_text(&self) -> Option<&Text> {
        self.children.iter().find_map(|child| child.first_text())
    }

    /// Last Text node in document order.
    #[must_use]
    pub fn last_text(&self) -> Option<&Text> {
        self.children.iter().rev().find_map(|child| child.last_text())
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Arc<Node>> {
        &mut self.children
    }
}
