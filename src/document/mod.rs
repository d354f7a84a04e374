//! The document tree and its range-oriented operations.
//!
//! A [`Document`] owns a root container whose children are blocks
//! (containers), which in turn hold Text leaves or further containers.
//! Documents are immutable values: every edit in [`RangeEditing`] returns a
//! new document and leaves the receiver untouched. Unchanged subtrees are
//! shared between the two through [`Arc`].
//!
//! Structural invariants, upheld by every constructor and edit:
//!
//! - the root only holds containers
//! - every container has at least one child
//! - the document holds at least one Text node
//! - keys are unique
//!
//! # Examples
//!
//! ```
//! use richdoc::{Document, Point, RangeEditing, Selection};
//!
//! let doc = Document::builder()
//!     .paragraph("Hello World")
//!     .build()
//!     .unwrap();
//! let key = doc.get_first_text().unwrap().key();
//! let caret = Selection::collapsed(Point::new(key, 5));
//!
//! let edited = doc.insert_at_range(&caret, ",").unwrap();
//! assert_eq!(edited.text(), "Hello, World");
//! assert_eq!(doc.text(), "Hello World");
//! ```

mod builder;
mod edit;

pub use builder::DocumentBuilder;
pub use edit::RangeEditing;

use crate::error::{Error, Result};
use crate::node::{Container, Key, Node, Text, TextBounds, TextRange};
use crate::selection::{Point, Selection};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Kind name of the root container.
pub const ROOT_KIND: &str = "document";

/// Kind name used for blocks created without an explicit kind.
pub const PARAGRAPH_KIND: &str = "paragraph";

/// A Text node together with the key of its parent.
#[derive(Clone, Copy)]
struct TextEntry<'a> {
    text: &'a Text,
    parent: Key,
}

/// Immutable rich-text document.
#[derive(Clone, Debug)]
pub struct Document {
    root: Container,
    next_key: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Eq for Document {}

impl Document {
    /// Create a document holding one empty paragraph.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self::empty();
        let text_key = doc.alloc_key();
        let block_key = doc.alloc_key();
        let block = Container::new(
            block_key,
            PARAGRAPH_KIND,
            vec![Arc::new(Node::Text(Text::empty(text_key)))],
        );
        doc.root.children_mut().push(Arc::new(Node::Container(block)));
        doc
    }

    /// Start building a document.
    #[must_use]
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    /// A root with no children; callers must fill it before handing it out.
    pub(crate) fn empty() -> Self {
        Self {
            root: Container::new(Key::new(0), ROOT_KIND, Vec::new()),
            next_key: 1,
        }
    }

    pub(crate) fn alloc_key(&mut self) -> Key {
        let key = Key::new(self.next_key);
        self.next_key += 1;
        key
    }

    pub(crate) fn root_mut(&mut self) -> &mut Container {
        &mut self.root
    }

    /// The root container.
    #[must_use]
    pub fn root(&self) -> &Container {
        &self.root
    }

    /// Key of the root container.
    #[must_use]
    pub fn key(&self) -> Key {
        self.root.key()
    }

    /// Top-level blocks.
    #[must_use]
    pub fn nodes(&self) -> &[Arc<Node>] {
        self.root.children()
    }

    /// Plain text of the whole document, blocks separated by `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.nodes()
            .iter()
            .map(|node| node.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check whether a node (or the root) has `key`.
    #[must_use]
    pub fn has_key(&self, key: Key) -> bool {
        key == self.key() || self.get_node(key).is_some()
    }

    /// Find a node below the root.
    ///
    /// The root itself is not a [`Node`]; use [`Document::root`] for it.
    #[must_use]
    pub fn get_node(&self, key: Key) -> Option<&Node> {
        self.nodes().iter().find_map(|node| node.find(key))
    }

    /// The container directly holding `key`.
    ///
    /// Top-level blocks have the root as their parent.
    #[must_use]
    pub fn get_parent_node(&self, key: Key) -> Option<&Container> {
        let path = self.path_of(key)?;
        let (_, parent) = path.split_last()?;
        self.container_at(parent)
    }

    /// The sibling immediately before `key` under the same parent.
    #[must_use]
    pub fn get_previous_node(&self, key: Key) -> Option<&Node> {
        let parent = self.get_parent_node(key)?;
        let index = parent.index_of(key)?;
        parent.child(index.checked_sub(1)?)
    }

    /// The sibling immediately after `key` under the same parent.
    #[must_use]
    pub fn get_next_node(&self, key: Key) -> Option<&Node> {
        let parent = self.get_parent_node(key)?;
        let index = parent.index_of(key)?;
        parent.child(index + 1)
    }

    /// The container holding the Text node `key`.
    pub fn get_closest_block(&self, key: Key) -> Result<&Container> {
        self.get_text(key)?;
        self.get_parent_node(key).ok_or(Error::UnknownKey { key })
    }

    /// The Text node with `key`.
    pub fn get_text(&self, key: Key) -> Result<&Text> {
        match self.get_node(key) {
            Some(Node::Text(text)) => Ok(text),
            Some(Node::Container(_)) => Err(Error::NotText { key }),
            None if key == self.key() => Err(Error::NotText { key }),
            None => Err(Error::UnknownKey { key }),
        }
    }

    /// First Text node in the document.
    #[must_use]
    pub fn get_first_text(&self) -> Option<&Text> {
        self.root.first_text()
    }

    /// Last Text node in the document.
    #[must_use]
    pub fn get_last_text(&self) -> Option<&Text> {
        self.root.last_text()
    }

    /// Every Text node in document order.
    #[must_use]
    pub fn texts(&self) -> Vec<&Text> {
        self.text_entries().into_iter().map(|entry| entry.text).collect()
    }

    /// Check every structural invariant.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        seen.insert(self.key());
        for node in self.nodes() {
            if node.is_text() {
                return Err(Error::InvalidDocument(format!(
                    "text node {} directly under the root",
                    node.key()
                )));
            }
            validate_node(node, &mut seen)?;
        }
        if self.get_first_text().is_none() {
            return Err(Error::InvalidDocument(
                "document has no text nodes".to_string(),
            ));
        }
        Ok(())
    }

    /// Check that `point` names a Text node and an offset inside it.
    pub fn check_point(&self, point: Point) -> Result<()> {
        let text = self.get_text(point.key)?;
        if point.offset > text.len() {
            return Err(Error::OffsetOutOfBounds {
                key: point.key,
                offset: point.offset,
                len: text.len(),
            });
        }
        Ok(())
    }

    /// Order two points by document position.
    pub fn compare_points(&self, a: Point, b: Point) -> Result<Ordering> {
        if a.key == b.key {
            self.get_text(a.key)?;
            return Ok(a.offset.cmp(&b.offset));
        }
        let entries = self.text_entries();
        let a_index = entry_index(&entries, a.key, self)?;
        let b_index = entry_index(&entries, b.key, self)?;
        Ok(a_index.cmp(&b_index))
    }

    /// Validate both endpoints of `range` and return them in document order.
    pub fn ordered_points(&self, range: &Selection) -> Result<(Point, Point)> {
        let (anchor, focus) = (range.anchor(), range.focus());
        self.check_point(anchor)?;
        self.check_point(focus)?;
        if self.compare_points(anchor, focus)? == Ordering::Greater {
            Ok((focus, anchor))
        } else {
            Ok((anchor, focus))
        }
    }

    /// `point` is the first position of its block.
    pub fn is_at_block_start(&self, point: Point) -> Result<bool> {
        let block = self.get_closest_block(point.key)?;
        Ok(point.offset == 0 && block.first_text().is_some_and(|text| text.key() == point.key))
    }

    /// `point` is the last position of its block.
    pub fn is_at_block_end(&self, point: Point) -> Result<bool> {
        let block = self.get_closest_block(point.key)?;
        Ok(block
            .last_text()
            .is_some_and(|text| text.key() == point.key && text.len() == point.offset))
    }

    /// Walk `n` characters back from `point`.
    ///
    /// Moving between Text nodes of the same block is free; moving into a
    /// different block costs one character. Clamps at the document start.
    pub fn point_backward(&self, point: Point, n: usize) -> Result<Point> {
        self.check_point(point)?;
        let entries = self.text_entries();
        let mut index = entry_index(&entries, point.key, self)?;
        let mut offset = point.offset;
        let mut remaining = n;
        loop {
            if offset >= remaining {
                return Ok(Point::new(entries[index].text.key(), offset - remaining));
            }
            remaining -= offset;
            if index == 0 {
                return Ok(Point::new(entries[0].text.key(), 0));
            }
            let crossing = entries[index - 1].parent != entries[index].parent;
            index -= 1;
            offset = entries[index].text.len();
            if crossing {
                remaining -= 1;
            }
        }
    }

    /// Walk `n` characters forward from `point`.
    ///
    /// Mirror of [`point_backward`](Self::point_backward); clamps at the
    /// document end.
    pub fn point_forward(&self, point: Point, n: usize) -> Result<Point> {
        self.check_point(point)?;
        let entries = self.text_entries();
        let mut index = entry_index(&entries, point.key, self)?;
        let mut offset = point.offset;
        let mut remaining = n;
        loop {
            let len = entries[index].text.len();
            if len - offset >= remaining {
                return Ok(Point::new(entries[index].text.key(), offset + remaining));
            }
            remaining -= len - offset;
            if index + 1 == entries.len() {
                return Ok(Point::new(entries[index].text.key(), len));
            }
            let crossing = entries[index + 1].parent != entries[index].parent;
            index += 1;
            offset = 0;
            if crossing {
                remaining -= 1;
            }
        }
    }

    fn text_entries(&self) -> Vec<TextEntry<'_>> {
        let mut out = Vec::new();
        collect_entries(&self.root, &mut out);
        out
    }

    pub(crate) fn path_of(&self, key: Key) -> Option<Vec<usize>> {
        if key == self.key() {
            return Some(Vec::new());
        }
        self.nodes().iter().enumerate().find_map(|(idx, node)| {
            node.path_to(key).map(|mut path| {
                path.insert(0, idx);
                path
            })
        })
    }

    fn container_at(&self, path: &[usize]) -> Option<&Container> {
        let mut container = &self.root;
        for &idx in path {
            container = container.child(idx)?.as_container()?;
        }
        Some(container)
    }

    /// Mutable access to the container at `path`, unsharing every node on
    /// the way down.
    pub(crate) fn container_at_mut(&mut self, path: &[usize]) -> Option<&mut Container> {
        let mut container = &mut self.root;
        for &idx in path {
            let child = container.children_mut().get_mut(idx)?;
            match Arc::make_mut(child) {
                Node::Container(inner) => container = inner,
                Node::Text(_) => return None,
            }
        }
        Some(container)
    }

    /// Mutable access to the Text node `key`.
    pub(crate) fn text_mut(&mut self, key: Key) -> Result<&mut Text> {
        let path = self.path_of(key).ok_or(Error::UnknownKey { key })?;
        let Some((&index, parent)) = path.split_last() else {
            return Err(Error::NotText { key });
        };
        let container = self
            .container_at_mut(parent)
            .ok_or(Error::UnknownKey { key })?;
        match container.children_mut().get_mut(index).map(Arc::make_mut) {
            Some(Node::Text(text)) => Ok(text),
            Some(Node::Container(_)) => Err(Error::NotText { key }),
            None => Err(Error::UnknownKey { key }),
        }
    }

    /// Build a Text node with a fresh key.
    pub(crate) fn new_text(&mut self, ranges: &[TextRange]) -> Text {
        let key = self.alloc_key();
        Text::from_ranges(key, ranges)
    }
}

impl TextBounds for Document {
    fn bounds_key(&self) -> Key {
        self.key()
    }

    fn first_text(&self) -> Option<&Text> {
        self.get_first_text()
    }

    fn last_text(&self) -> Option<&Text> {
        self.get_last_text()
    }
}

fn collect_entries<'a>(container: &'a Container, out: &mut Vec<TextEntry<'a>>) {
    for child in container.children() {
        match child.as_ref() {
            Node::Text(text) => out.push(TextEntry {
                text,
                parent: container.key(),
            }),
            Node::Container(inner) => collect_entries(inner, out),
        }
    }
}

fn entry_index(entries: &[TextEntry<'_>], key: Key, doc: &Document) -> Result<usize> {
    entries
        .iter()
        .position(|entry| entry.text.key() == key)
        .ok_or_else(|| {
            if doc.has_key(key) {
                Error::NotText { key }
            } else {
                Error::UnknownKey { key }
            }
        })
}

fn validate_node(node: &Node, seen: &mut HashSet<Key>) -> Result<()> {
    if !seen.insert(node.key()) {
        return Err(Error::InvalidDocument(format!(
            "duplicate key {}",
            node.key()
        )));
    }
    if let Node::Container(container) = node {
        if container.is_empty() {
            return Err(Error::InvalidDocument(format!(
                "container {} has no children",
                container.key()
            )));
        }
        for child in container.children() {
            validate_node(child, seen)?;
        }
    }
    Ok(())
}
