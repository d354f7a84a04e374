//! Undo/redo stacks of document snapshots.
//!
//! History is a value like everything else in the editor: pushing, undoing
//! and redoing return a new [`History`]. Each stack is a persistent linked
//! list of [`Arc`] frames, so a new History shares every older entry with
//! the one it came from and a commit never copies the stack.

use crate::document::Document;
use crate::selection::Selection;
use std::fmt;
use std::sync::Arc;

/// Default maximum number of undo entries to retain.
pub const DEFAULT_MAX_HISTORY_DEPTH: usize = 1000;

/// The part of a State that undo and redo restore.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub document: Document,
    pub selection: Selection,
}

impl Snapshot {
    #[must_use]
    pub fn new(document: Document, selection: Selection) -> Self {
        Self {
            document,
            selection,
        }
    }
}

/// History configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryOptions {
    /// Maximum number of undo entries. Oldest entries are dropped when
    /// exceeded; `0` turns recording off.
    pub max_depth: usize,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_HISTORY_DEPTH,
        }
    }
}

/// Undo and redo stacks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    undos: Stack,
    redos: Stack,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_options(HistoryOptions::default())
    }
}

impl History {
    /// Empty history with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty history with custom options.
    #[must_use]
    pub fn with_options(options: HistoryOptions) -> Self {
        Self {
            undos: Stack::default(),
            redos: Stack::default(),
            max_depth: options.max_depth,
        }
    }

    /// Empty history keeping at most `max_depth` undo entries.
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self::with_options(HistoryOptions { max_depth })
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Entries that undo would restore, newest first.
    pub fn undos(&self) -> impl ExactSizeIterator<Item = &Snapshot> + '_ {
        self.undos.iter()
    }

    /// Entries that redo would restore, newest first.
    pub fn redos(&self) -> impl ExactSizeIterator<Item = &Snapshot> + '_ {
        self.redos.iter()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undos.len > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.redos.len > 0
    }

    /// Record `snapshot` as the state before a new edit.
    ///
    /// A new edit invalidates everything that could have been redone.
    #[must_use]
    pub fn push(&self, snapshot: Snapshot) -> Self {
        let undos = if self.max_depth > 0 {
            self.undos.pushed(snapshot, self.max_depth)
        } else {
            self.undos.clone()
        };
        Self {
            undos,
            redos: Stack::default(),
            max_depth: self.max_depth,
        }
    }

    /// Step back: pop the newest undo entry and remember `current` for redo.
    ///
    /// Returns `None` when there is nothing to undo.
    #[must_use]
    pub fn undo(&self, current: Snapshot) -> Option<(Self, Snapshot)> {
        let previous = self.undos.peek()?.clone();
        let next = Self {
            undos: self.undos.popped(),
            redos: self.redos.pushed(current, usize::MAX),
            max_depth: self.max_depth,
        };
        Some((next, previous))
    }

    /// Step forward: pop the newest redo entry and remember `current` for
    /// undo.
    #[must_use]
    pub fn redo(&self, current: Snapshot) -> Option<(Self, Snapshot)> {
        let following = self.redos.peek()?.clone();
        let next = Self {
            undos: self.undos.pushed(current, self.max_depth.max(1)),
            redos: self.redos.popped(),
            max_depth: self.max_depth,
        };
        Some((next, following))
    }

    /// Drop every entry, keeping the configuration.
    #[must_use]
    pub fn clear(&self) -> Self {
        Self::with_max_depth(self.max_depth)
    }
}

struct Frame {
    snapshot: Snapshot,
    below: Option<Arc<Frame>>,
}

impl Drop for Frame {
    // Unlink iteratively so a long chain does not recurse once per frame.
    fn drop(&mut self) {
        let mut below = self.below.take();
        while let Some(frame) = below {
            match Arc::try_unwrap(frame) {
                Ok(mut frame) => below = frame.below.take(),
                Err(_) => break,
            }
        }
    }
}

/// Persistent stack of snapshots.
///
/// Only the newest `len` frames are live. Frames past the depth limit stay
/// linked until `frames` reaches twice the limit, then the live part is
/// relinked on its own.
#[derive(Clone, Default)]
struct Stack {
    top: Option<Arc<Frame>>,
    len: usize,
    frames: usize,
}

impl Stack {
    fn peek(&self) -> Option<&Snapshot> {
        if self.len == 0 {
            return None;
        }
        self.top.as_deref().map(|frame| &frame.snapshot)
    }

    fn iter(&self) -> Entries<'_> {
        Entries {
            next: self.top.as_deref(),
            remaining: self.len,
        }
    }

    fn pushed(&self, snapshot: Snapshot, max_depth: usize) -> Self {
        let next = Self {
            top: Some(Arc::new(Frame {
                snapshot,
                below: self.top.clone(),
            })),
            len: (self.len + 1).min(max_depth),
            frames: self.frames + 1,
        };
        if next.frames > max_depth.saturating_mul(2) {
            next.compacted()
        } else {
            next
        }
    }

    fn popped(&self) -> Self {
        match &self.top {
            Some(frame) if self.len > 0 => Self {
                top: frame.below.clone(),
                len: self.len - 1,
                frames: self.frames - 1,
            },
            _ => self.clone(),
        }
    }

    fn compacted(&self) -> Self {
        let live: Vec<Snapshot> = self.iter().cloned().collect();
        let top = live.into_iter().rev().fold(None, |below, snapshot| {
            Some(Arc::new(Frame { snapshot, below }))
        });
        Self {
            top,
            len: self.len,
            frames: self.len,
        }
    }
}

impl PartialEq for Stack {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for Stack {}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

struct Entries<'a> {
    next: Option<&'a Frame>,
    remaining: usize,
}

impl<'a> Iterator for Entries<'a> {
    type Item = &'a Snapshot;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let frame = self.next?;
        self.next = frame.below.as_deref();
        self.remaining -= 1;
        Some(&frame.snapshot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Entries<'_> {}
