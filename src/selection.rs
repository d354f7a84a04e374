//! Selections: validated pointers into a document.
//!
//! A [`Selection`] has two endpoints, the anchor (where the selection
//! started) and the focus (where it ends, usually the caret). Each endpoint
//! is a [`Point`]: a Text node key plus a character offset inside that node.
//!
//! Selections are plain values. Every method returns a new selection; the
//! ones that need to walk the tree take the [`Document`] they are moving
//! through. A selection built by hand is only trustworthy after
//! [`Selection::normalize`] has checked it against a document.
//!
//! # Examples
//!
//! ```
//! use richdoc::{Document, Point, Selection};
//!
//! let doc = Document::builder().paragraph("Hello").build().unwrap();
//! let key = doc.get_first_text().unwrap().key();
//!
//! let selection = Selection::new(Point::new(key, 4), Point::new(key, 1))
//!     .normalize(&doc)
//!     .unwrap();
//! assert!(selection.is_backward());
//! assert_eq!(selection.start().offset, 1);
//!
//! let caret = selection.move_to_start();
//! assert!(caret.is_collapsed());
//! ```

use crate::document::Document;
use crate::error::{Error, Result};
use crate::node::{Key, TextBounds};
use std::cmp::Ordering;

/// A position inside a Text node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    /// Key of the Text node.
    pub key: Key,
    /// Character offset within the node, in `[0, len]`.
    pub offset: usize,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(key: Key, offset: usize) -> Self {
        Self { key, offset }
    }
}

/// Two endpoints in a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    anchor: Point,
    focus: Point,
    is_backward: bool,
}

impl Selection {
    /// Create a selection from anchor to focus.
    ///
    /// Direction is unknown until [`normalize`](Self::normalize) is called;
    /// until then the selection is treated as forward.
    #[must_use]
    pub const fn new(anchor: Point, focus: Point) -> Self {
        Self {
            anchor,
            focus,
            is_backward: false,
        }
    }

    /// Create a collapsed selection at `point`.
    #[must_use]
    pub const fn collapsed(point: Point) -> Self {
        Self::new(point, point)
    }

    /// Collapsed selection at the start of `node`.
    pub fn at_start_of(node: &impl TextBounds) -> Result<Self> {
        let text = node.first_text().ok_or(Error::NotText {
            key: node.bounds_key(),
        })?;
        Ok(Self::collapsed(Point::new(text.key(), 0)))
    }

    /// Collapsed selection at the end of `node`.
    pub fn at_end_of(node: &impl TextBounds) -> Result<Self> {
        let text = node.last_text().ok_or(Error::NotText {
            key: node.bounds_key(),
        })?;
        Ok(Self::collapsed(Point::new(text.key(), text.len())))
    }

    /// Check both endpoints against `document` and compute the direction.
    ///
    /// Fails if either endpoint names a missing key, a container, or an
    /// offset past the end of its Text node.
    pub fn normalize(&self, document: &Document) -> Result<Self> {
        document.check_point(self.anchor)?;
        document.check_point(self.focus)?;
        let order = document.compare_points(self.anchor, self.focus)?;
        Ok(Self {
            anchor: self.anchor,
            focus: self.focus,
            is_backward: order == Ordering::Greater,
        })
    }

    /// Where the selection started.
    #[must_use]
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Where the selection ends.
    #[must_use]
    pub fn focus(&self) -> Point {
        self.focus
    }

    /// The endpoint that comes first in the document.
    #[must_use]
    pub fn start(&self) -> Point {
        if self.is_backward {
            self.focus
        } else {
            self.anchor
        }
    }

    /// The endpoint that comes last in the document.
    #[must_use]
    pub fn end(&self) -> Point {
        if self.is_backward {
            self.anchor
        } else {
            self.focus
        }
    }

    /// Key of the start endpoint.
    #[must_use]
    pub fn start_key(&self) -> Key {
        self.start().key
    }

    /// Key of the end endpoint.
    #[must_use]
    pub fn end_key(&self) -> Key {
        self.end().key
    }

    /// Both endpoints are equal.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The endpoints differ.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        !self.is_collapsed()
    }

    /// The focus comes before the anchor.
    #[must_use]
    pub fn is_backward(&self) -> bool {
        self.is_backward
    }

    /// The anchor comes before (or at) the focus.
    #[must_use]
    pub fn is_forward(&self) -> bool {
        !self.is_backward
    }

    /// Collapsed at the first position of `node`.
    #[must_use]
    pub fn is_at_start_of(&self, node: &impl TextBounds) -> bool {
        if self.is_expanded() {
            return false;
        }
        let start = self.start();
        start.offset == 0 && node.first_text().is_some_and(|text| text.key() == start.key)
    }

    /// Collapsed at the last position of `node`.
    #[must_use]
    pub fn is_at_end_of(&self, node: &impl TextBounds) -> bool {
        if self.is_expanded() {
            return false;
        }
        let end = self.end();
        node.last_text()
            .is_some_and(|text| text.key() == end.key && text.len() == end.offset)
    }

    /// Collapse to the start endpoint.
    #[must_use]
    pub fn move_to_start(&self) -> Self {
        Self::collapsed(self.start())
    }

    /// Collapse to the end endpoint.
    #[must_use]
    pub fn move_to_end(&self) -> Self {
        Self::collapsed(self.end())
    }

    /// Collapse to the start of `node`.
    pub fn move_to_start_of(&self, node: &impl TextBounds) -> Result<Self> {
        Self::at_start_of(node)
    }

    /// Collapse to the end of `node`.
    pub fn move_to_end_of(&self, node: &impl TextBounds) -> Result<Self> {
        Self::at_end_of(node)
    }

    /// Move both endpoints `n` characters back, clamping at the document
    /// start.
    pub fn move_backward(&self, document: &Document, n: usize) -> Result<Self> {
        Ok(Self {
            anchor: document.point_backward(self.anchor, n)?,
            focus: document.point_backward(self.focus, n)?,
            is_backward: self.is_backward,
        })
    }

    /// Move both endpoints `n` characters forward, clamping at the document
    /// end.
    pub fn move_forward(&self, document: &Document, n: usize) -> Result<Self> {
        Ok(Self {
            anchor: document.point_forward(self.anchor, n)?,
            focus: document.point_forward(self.focus, n)?,
            is_backward: self.is_backward,
        })
    }

    /// Move only the focus `n` characters back.
    pub fn extend_backward(&self, document: &Document, n: usize) -> Result<Self> {
        let focus = document.point_backward(self.focus, n)?;
        Self::new(self.anchor, focus).normalize(document)
    }

    /// Move only the focus `n` characters forward.
    pub fn extend_forward(&self, document: &Document, n: usize) -> Result<Self> {
        let focus = document.point_forward(self.focus, n)?;
        Self::new(self.anchor, focus).normalize(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blocks() -> Document {
        Document::builder()
            .paragraph("Foo")
            .paragraph("Bar")
            .build()
            .unwrap()
    }

    #[test]
    fn test_normalize_computes_direction() {
        let doc = two_blocks();
        let texts = doc.texts();
        let (foo, bar) = (texts[0].key(), texts[1].key());

        let forward = Selection::new(Point::new(foo, 1), Point::new(bar, 2))
            .normalize(&doc)
            .unwrap();
        assert!(forward.is_forward());
        assert_eq!(forward.start(), Point::new(foo, 1));

        let backward = Selection::new(Point::new(bar, 2), Point::new(foo, 1))
            .normalize(&doc)
            .unwrap();
        assert!(backward.is_backward());
        assert_eq!(backward.start(), Point::new(foo, 1));
        assert_eq!(backward.end(), Point::new(bar, 2));
        assert_eq!(backward.start_key(), foo);
    }

    #[test]
    fn test_normalize_rejects_bad_points() {
        let doc = two_blocks();
        let foo = doc.get_first_text().unwrap().key();

        let err = Selection::collapsed(Point::new(foo, 4))
            .normalize(&doc)
            .unwrap_err();
        assert_eq!(
            err,
            Error::OffsetOutOfBounds {
                key: foo,
                offset: 4,
                len: 3
            }
        );

        let missing = Key::new(999);
        let err = Selection::collapsed(Point::new(missing, 0))
            .normalize(&doc)
            .unwrap_err();
        assert_eq!(err, Error::UnknownKey { key: missing });

        let block = doc.root().children()[0].key();
        let err = Selection::collapsed(Point::new(block, 0))
            .normalize(&doc)
            .unwrap_err();
        assert_eq!(err, Error::NotText { key: block });
    }

    #[test]
    fn test_start_and_end_of_nodes() {
        let doc = two_blocks();
        let first_block = doc.root().child(0).unwrap();
        let at_start = Selection::at_start_of(first_block).unwrap();
        assert!(at_start.is_at_start_of(first_block));
        assert!(!at_start.is_at_end_of(first_block));

        let at_end = at_start.move_to_end_of(&doc).unwrap();
        assert!(at_end.is_at_end_of(&doc));
        assert_eq!(at_end.focus().offset, 3);
    }

    #[test]
    fn test_expanded_is_never_at_an_edge() {
        let doc = two_blocks();
        let foo = doc.get_first_text().unwrap();
        let selection = Selection::new(Point::new(foo.key(), 0), Point::new(foo.key(), 3))
            .normalize(&doc)
            .unwrap();
        assert!(selection.is_expanded());
        assert!(!selection.is_at_start_of(foo));
        assert!(!selection.is_at_end_of(foo));
    }

    #[test]
    fn test_movement_crosses_blocks_and_clamps() {
        let doc = two_blocks();
        let texts = doc.texts();
        let (foo, bar) = (texts[0].key(), texts[1].key());
        let caret = Selection::collapsed(Point::new(bar, 1));

        // One step back lands on the block start, one more crosses the boundary.
        assert_eq!(caret.move_backward(&doc, 1).unwrap().focus(), Point::new(bar, 0));
        assert_eq!(caret.move_backward(&doc, 2).unwrap().focus(), Point::new(foo, 3));
        assert_eq!(caret.move_backward(&doc, 100).unwrap().focus(), Point::new(foo, 0));
        assert_eq!(caret.move_forward(&doc, 100).unwrap().focus(), Point::new(bar, 3));
    }

    #[test]
    fn test_extend_keeps_anchor() {
        let doc = two_blocks();
        let foo = doc.get_first_text().unwrap().key();
        let caret = Selection::collapsed(Point::new(foo, 2));

        let extended = caret.extend_backward(&doc, 2).unwrap();
        assert_eq!(extended.anchor(), Point::new(foo, 2));
        assert_eq!(extended.focus(), Point::new(foo, 0));
        assert!(extended.is_backward());

        let extended = caret.extend_forward(&doc, 1).unwrap();
        assert!(extended.is_forward());
        assert_eq!(extended.end(), Point::new(foo, 3));
    }
}
