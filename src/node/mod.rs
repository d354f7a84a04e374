//! Document tree nodes.
//!
//! A tree is made of two node variants:
//!
//! - [`Text`]: a leaf holding characters partitioned into marked ranges
//! - [`Container`]: an ordered list of child nodes
//!
//! Every node carries a [`Key`] that is unique within its document and stays
//! the same across edits that do not destroy the node. Selections refer to
//! positions by key rather than by path, so they survive edits elsewhere in
//! the tree.

mod container;
mod text;

pub use container::Container;
pub use text::{Text, TextRange};

use std::fmt;

/// Stable node identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(u64);

impl Key {
    /// Create a key from a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k{}", self.0)
    }
}

/// Anything with a first and last Text node: the target of
/// "move to start/end of" and "is at start/end of" queries.
pub trait TextBounds {
    /// Key of the bounding node.
    fn bounds_key(&self) -> Key;
    /// First Text node in document order.
    fn first_text(&self) -> Option<&Text>;
    /// Last Text node in document order.
    fn last_text(&self) -> Option<&Text>;
}

impl TextBounds for Text {
    fn bounds_key(&self) -> Key {
        self.key()
    }

    fn first_text(&self) -> Option<&Text> {
        Some(self)
    }

    fn last_text(&self) -> Option<&Text> {
        Some(self)
    }
}

impl TextBounds for Container {
    fn bounds_key(&self) -> Key {
        self.key()
    }

    fn first_text(&self) -> Option<&Text> {
        Container::first_text(self)
    }

    fn last_text(&self) -> Option<&Text> {
        Container::last_text(self)
    }
}

impl TextBounds for Node {
    fn bounds_key(&self) -> Key {
        self.key()
    }

    fn first_text(&self) -> Option<&Text> {
        Node::first_text(self)
    }

    fn last_text(&self) -> Option<&Text> {
        Node::last_text(self)
    }
}

/// A tree element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Text(Text),
    Container(Container),
}

impl Node {
    /// Key of this node.
    #[must_use]
    pub fn key(&self) -> Key {
        match self {
            Self::Text(text) => text.key(),
            Self::Container(container) => container.key(),
        }
    }

    /// The Text variant, if this is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Self::Text(text) => Some(text),
            Self::Container(_) => None,
        }
    }

    /// The Container variant, if this is one.
    #[must_use]
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Text(_) => None,
            Self::Container(container) => Some(container),
        }
    }

    /// Check if this is a Text node.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// First Text node at or below this node.
    #[must_use]
    pub fn first_text(&self) -> Option<&Text> {
        match self {
            Self::Text(text) => Some(text),
            Self::Container(container) => container.first_text(),
        }
    }

    /// Last Text node at or below this node.
    #[must_use]
    pub fn last_text(&self) -> Option<&Text> {
        match self {
            Self::Text(text) => Some(text),
            Self::Container(container) => container.last_text(),
        }
    }

    /// Every Text node at or below this node, in document order.
    #[must_use]
    pub fn texts(&self) -> Vec<&Text> {
        let mut out = Vec::new();
        self.collect_texts(&mut out);
        out
    }

    fn collect_texts<'a>(&'a self, out: &mut Vec<&'a Text>) {
        match self {
            Self::Text(text) => out.push(text),
            Self::Container(container) => {
                for child in container.children() {
                    child.collect_texts(out);
                }
            }
        }
    }

    /// Plain text of this subtree.
    ///
    /// Text siblings are concatenated. A newline separates two siblings
    /// whenever either of them is a container.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.text(),
            Self::Container(container) => {
                let mut out = String::new();
                let mut prev_was_block = None;
                for child in container.children() {
                    let is_block = !child.is_text();
                    if prev_was_block.is_some_and(|prev| prev || is_block) {
                        out.push('\n');
                    }
                    out.push_str(&child.text());
                    prev_was_block = Some(is_block);
                }
                out
            }
        }
    }

    /// Find the node with `key` at or below this node.
    #[must_use]
    pub fn find(&self, key: Key) -> Option<&Self> {
        if self.key() == key {
            return Some(self);
        }
        match self {
            Self::Text(_) => None,
            Self::Container(container) => {
                container.children().iter().find_map(|child| child.find(key))
            }
        }
    }

    /// Child-index path from this node to the node with `key`.
    ///
    /// The path to this node itself is empty.
    #[must_use]
    pub fn path_to(&self, key: Key) -> Option<Vec<usize>> {
        if self.key() == key {
            return Some(Vec::new());
        }
        let Self::Container(container) = self else {
            return None;
        };
        container
            .children()
            .iter()
            .enumerate()
            .find_map(|(idx, child)| {
                child.path_to(key).map(|mut path| {
                    path.insert(0, idx);
                    path
                })
            })
    }

    /// Check whether any node in this subtree has a key in `keys`.
    pub(crate) fn contains_any(&self, keys: &std::collections::HashSet<Key>) -> bool {
        if keys.contains(&self.key()) {
            return true;
        }
        match self {
            Self::Text(_) => false,
            Self::Container(container) => container
                .children()
                .iter()
                .any(|child| child.contains_any(keys)),
        }
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Self::Text(text)
    }
}

impl From<Container> for Node {
    fn from(container: Container) -> Self {
        Self::Container(container)
    }
}
