//! Range edits over the document tree.
//!
//! [`RangeEditing`] is the raw editing surface: each operation takes an
//! explicit range and returns a new value. [`Document`] implements the tree
//! mutations; [`State`](crate::State) and [`Transform`](crate::Transform)
//! forward to it without touching their selection.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};
use crate::marks::Marks;
use crate::node::{Container, Key, Node};
use crate::selection::{Point, Selection};
use std::collections::HashSet;
use std::sync::Arc;

/// Range-oriented edits.
///
/// All methods are pure: they return a new value and leave `self`
/// unchanged. Ranges are validated against the document; a key that is not
/// in the document or an offset past the end of its Text node is an error.
pub trait RangeEditing: Sized {
    /// Remove everything spanned by `range`, merging the surviving
    /// fragments into the node at the range start.
    fn delete_at_range(&self, range: &Selection) -> Result<Self>;

    /// Remove `n` characters before a collapsed `range`, or the spanned
    /// content of an expanded one. At the start of a block this merges the
    /// block into its previous sibling.
    fn delete_backward_at_range(&self, range: &Selection, n: usize) -> Result<Self>;

    /// Remove `n` characters after a collapsed `range`, or the spanned
    /// content of an expanded one. At the end of a block this merges the
    /// next sibling into the block.
    fn delete_forward_at_range(&self, range: &Selection, n: usize) -> Result<Self>;

    /// Insert `text` at the range start, after removing the spanned content.
    fn insert_at_range(&self, range: &Selection, text: &str) -> Result<Self>;

    /// Split the block holding the range start into two sibling blocks.
    fn split_at_range(&self, range: &Selection) -> Result<Self>;

    /// Add `marks` to every character in `range`.
    fn add_mark_at_range(&self, range: &Selection, marks: Marks) -> Result<Self>;

    /// Remove `marks` from every character in `range`.
    fn remove_mark_at_range(&self, range: &Selection, marks: Marks) -> Result<Self>;
}

impl RangeEditing for Document {
    fn delete_at_range(&self, range: &Selection) -> Result<Self> {
        let (start, end) = self.ordered_points(range)?;
        let mut doc = self.clone();
        doc.remove_between(start, end)?;
        Ok(doc)
    }

    fn delete_backward_at_range(&self, range: &Selection, n: usize) -> Result<Self> {
        if range.is_expanded() {
            return self.delete_at_range(range);
        }
        let point = range.anchor();
        self.check_point(point)?;
        if n == 0 {
            return Ok(self.clone());
        }

        if self.is_at_block_start(point)? {
            let block = self.get_closest_block(point.key)?;
            let Some(previous) = self.get_previous_node(block.key()) else {
                emit_log(
                    LogLevel::Debug,
                    &format!("delete backward at {}: no previous block to merge into", block.key()),
                );
                return Ok(self.clone());
            };
            let target = previous.last_text().ok_or(Error::NotText {
                key: previous.key(),
            })?;
            let target = Point::new(target.key(), target.len());
            let mut doc = self.clone();
            doc.remove_between(target, point)?;
            return Ok(doc);
        }

        let start = self.point_backward(point, n)?;
        let mut doc = self.clone();
        doc.remove_between(start, point)?;
        Ok(doc)
    }

    fn delete_forward_at_range(&self, range: &Selection, n: usize) -> Result<Self> {
        if range.is_expanded() {
            return self.delete_at_range(range);
        }
        let point = range.anchor();
        self.check_point(point)?;
        if n == 0 {
            return Ok(self.clone());
        }

        if self.is_at_block_end(point)? {
            let block = self.get_closest_block(point.key)?;
            let Some(next) = self.get_next_node(block.key()) else {
                emit_log(
                    LogLevel::Debug,
                    &format!("delete forward at {}: no next block to merge", block.key()),
                );
                return Ok(self.clone());
            };
            let target = next
                .first_text()
                .ok_or(Error::NotText { key: next.key() })?;
            let target = Point::new(target.key(), 0);
            let mut doc = self.clone();
            doc.remove_between(point, target)?;
            return Ok(doc);
        }

        let end = self.point_forward(point, n)?;
        let mut doc = self.clone();
        doc.remove_between(point, end)?;
        Ok(doc)
    }

    fn insert_at_range(&self, range: &Selection, text: &str) -> Result<Self> {
        let (start, end) = self.ordered_points(range)?;
        let mut doc = self.clone();
        doc.remove_between(start, end)?;
        doc.text_mut(start.key)?.insert(start.offset, text);
        Ok(doc)
    }

    fn split_at_range(&self, range: &Selection) -> Result<Self> {
        let (start, end) = self.ordered_points(range)?;
        let mut doc = self.clone();
        doc.remove_between(start, end)?;
        doc.split_block_at(start)?;
        Ok(doc)
    }

    fn add_mark_at_range(&self, range: &Selection, marks: Marks) -> Result<Self> {
        let mut doc = self.clone();
        for (key, span) in self.spans(range)? {
            doc.text_mut(key)?.add_marks(span, marks);
        }
        Ok(doc)
    }

    fn remove_mark_at_range(&self, range: &Selection, marks: Marks) -> Result<Self> {
        let mut doc = self.clone();
        for (key, span) in self.spans(range)? {
            doc.text_mut(key)?.remove_marks(span, marks);
        }
        Ok(doc)
    }
}

impl Document {
    /// Remove the content between two ordered, validated points.
    ///
    /// The Text node at `start` keeps its key and receives whatever follows
    /// `end` in its node. When `end` sits in a different block, the siblings
    /// following it move into `start`'s block. Containers left without
    /// children are pruned.
    fn remove_between(&mut self, start: Point, end: Point) -> Result<()> {
        if start == end {
            return Ok(());
        }
        if start.key == end.key {
            self.text_mut(start.key)?.remove(start.offset..end.offset);
            return Ok(());
        }

        let keys: Vec<Key> = self.texts().iter().map(|text| text.key()).collect();
        let start_index = position(&keys, start.key)?;
        let end_index = position(&keys, end.key)?;

        let mut tail = self.get_text(end.key)?.clone();
        tail.remove(0..end.offset);

        let start_parent = self.get_closest_block(start.key)?.key();
        let end_parent = self.get_closest_block(end.key)?;
        let moved: Vec<Arc<Node>> = if end_parent.key() == start_parent {
            Vec::new()
        } else {
            let index = end_parent
                .index_of(end.key)
                .ok_or(Error::UnknownKey { key: end.key })?;
            end_parent.children()[index + 1..].to_vec()
        };

        let mut doomed: HashSet<Key> = keys[start_index + 1..=end_index].iter().copied().collect();
        doomed.extend(moved.iter().map(|node| node.key()));

        {
            let text = self.text_mut(start.key)?;
            let len = text.len();
            text.remove(start.offset..len);
            text.append(&tail);
        }

        prune(self.root_mut(), &doomed);

        if !moved.is_empty() {
            let path = self
                .path_of(start.key)
                .ok_or(Error::UnknownKey { key: start.key })?;
            let Some((&index, parent)) = path.split_last() else {
                return Err(Error::NotText { key: start.key });
            };
            let block = self
                .container_at_mut(parent)
                .ok_or(Error::NotContainer { key: start_parent })?;
            let children = block.children_mut();
            let rest = children.split_off(index + 1);
            children.extend(moved);
            children.extend(rest);
        }
        Ok(())
    }

    /// Split the Text node at `point` and its block.
    ///
    /// The left halves keep their keys; the right halves get fresh ones and
    /// the new block is inserted right after the old one.
    fn split_block_at(&mut self, point: Point) -> Result<()> {
        let path = self
            .path_of(point.key)
            .ok_or(Error::UnknownKey { key: point.key })?;
        let Some((&text_index, block_path)) = path.split_last() else {
            return Err(Error::NotText { key: point.key });
        };
        let Some((&block_index, parent_path)) = block_path.split_last() else {
            return Err(Error::NotContainer { key: self.key() });
        };

        let right_text_key = self.alloc_key();
        let right_block_key = self.alloc_key();

        let block = self
            .container_at_mut(block_path)
            .ok_or(Error::UnknownKey { key: point.key })?;
        let kind = block.kind().to_string();
        let following = block.children_mut().split_off(text_index + 1);
        let right_text = match block
            .children_mut()
            .get_mut(text_index)
            .map(Arc::make_mut)
        {
            Some(Node::Text(text)) => text.split_off(point.offset, right_text_key),
            _ => return Err(Error::NotText { key: point.key }),
        };

        let mut children = Vec::with_capacity(following.len() + 1);
        children.push(Arc::new(Node::Text(right_text)));
        children.extend(following);
        let right_block = Container::new(right_block_key, kind, children);

        let parent = self
            .container_at_mut(parent_path)
            .ok_or(Error::UnknownKey { key: point.key })?;
        parent
            .children_mut()
            .insert(block_index + 1, Arc::new(Node::Container(right_block)));
        Ok(())
    }

    /// Per-node character spans covered by `range`.
    fn spans(&self, range: &Selection) -> Result<Vec<(Key, std::ops::Range<usize>)>> {
        let (start, end) = self.ordered_points(range)?;
        if start.key == end.key {
            return Ok(vec![(start.key, start.offset..end.offset)]);
        }
        let texts = self.texts();
        let keys: Vec<Key> = texts.iter().map(|text| text.key()).collect();
        let first = position(&keys, start.key)?;
        let last = position(&keys, end.key)?;
        Ok(texts[first..=last]
            .iter()
            .map(|text| {
                let from = if text.key() == start.key { start.offset } else { 0 };
                let to = if text.key() == end.key { end.offset } else { text.len() };
                (text.key(), from..to)
            })
            .collect())
    }
}

fn position(keys: &[Key], key: Key) -> Result<usize> {
    keys.iter()
        .position(|candidate| *candidate == key)
        .ok_or(Error::UnknownKey { key })
}

/// Drop every node whose key is in `doomed`, then any container that ends up
/// without children. Subtrees without doomed keys stay shared.
fn prune(container: &mut Container, doomed: &HashSet<Key>) {
    container
        .children_mut()
        .retain(|child| !doomed.contains(&child.key()));
    for child in container.children_mut().iter_mut() {
        if child.contains_any(doomed) {
            if let Node::Container(inner) = Arc::make_mut(child) {
                prune(inner, doomed);
            }
        }
    }
    container
        .children_mut()
        .retain(|child| child.as_container().is_none_or(|inner| !inner.is_empty()));
}
