//! Text leaves: rope content partitioned into marked runs.

use crate::marks::Marks;
use crate::node::Key;
use ropey::Rope;
use std::ops::Range;

/// A run of characters sharing one mark set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct MarkRun {
    len: usize,
    marks: Marks,
}

/// One marked range of a [`Text`] node, as returned by [`Text::ranges`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRange {
    /// The text content of the range.
    pub text: String,
    /// Marks applied to every character of the range.
    pub marks: Marks,
}

impl TextRange {
    /// Create a marked range.
    #[must_use]
    pub fn new(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    /// Create an unmarked range.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Marks::NONE)
    }
}

/// Text-bearing leaf node.
///
/// Content lives in a rope so cloning a node for a new snapshot shares the
/// underlying chunks. Runs always cover the whole content, are never empty,
/// and adjacent runs never carry equal marks.
///
/// All offsets are character offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    key: Key,
    content: Rope,
    runs: Vec<MarkRun>,
}

impl Text {
    /// Create an empty text node.
    #[must_use]
    pub(crate) fn empty(key: Key) -> Self {
        Self {
            key,
            content: Rope::new(),
            runs: Vec::new(),
        }
    }

    /// Create a text node from marked ranges.
    #[must_use]
    pub(crate) fn from_ranges<'a, I>(key: Key, ranges: I) -> Self
    where
        I: IntoIterator<Item = &'a TextRange>,
    {
        let mut text = Self::empty(key);
        for range in ranges {
            let end = text.len();
            text.insert_with_marks(end, &range.text, range.marks);
        }
        text
    }

    /// Key of this node.
    #[must_use]
    pub fn key(&self) -> Key {
        self.key
    }

    /// Length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len_chars()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.len_chars() == 0
    }

    /// The plain text content.
    #[must_use]
    pub fn text(&self) -> String {
        self.content.to_string()
    }

    /// The content split into marked ranges.
    #[must_use]
    pub fn ranges(&self) -> Vec<TextRange> {
        let mut pos = 0;
        self.runs
            .iter()
            .map(|run| {
                let text = self.content.slice(pos..pos + run.len).to_string();
                pos += run.len;
                TextRange::new(text, run.marks)
            })
            .collect()
    }

    /// Marks a character typed at `offset` would receive.
    ///
    /// This is the mark set of the character before `offset`, or of the
    /// first character when `offset` is 0.
    #[must_use]
    pub fn marks_at(&self, offset: usize) -> Marks {
        let target = offset.saturating_sub(1);
        let mut pos = 0;
        for run in &self.runs {
            if target < pos + run.len {
                return run.marks;
            }
            pos += run.len;
        }
        self.runs.last().map_or(Marks::NONE, |run| run.marks)
    }

    /// Insert text at `offset`, inheriting the marks at that position.
    pub(crate) fn insert(&mut self, offset: usize, text: &str) {
        let marks = self.marks_at(offset);
        self.insert_with_marks(offset, text, marks);
    }

    pub(crate) fn insert_with_marks(&mut self, offset: usize, text: &str, marks: Marks) {
        let inserted = text.chars().count();
        if inserted == 0 {
            return;
        }
        let offset = offset.min(self.len());
        let idx = self.split_run_at(offset);
        self.runs.insert(
            idx,
            MarkRun {
                len: inserted,
                marks,
            },
        );
        self.content.insert(offset, text);
        self.coalesce();
    }

    /// Remove a character range.
    pub(crate) fn remove(&mut self, range: Range<usize>) {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start >= end {
            return;
        }
        let first = self.split_run_at(start);
        let last = self.split_run_at(end);
        self.runs.drain(first..last);
        self.content.remove(start..end);
        self.coalesce();
    }

    /// Split at `offset`, keeping `[0, offset)` and returning `[offset, len)`
    /// under `right_key`.
    pub(crate) fn split_off(&mut self, offset: usize, right_key: Key) -> Self {
        let offset = offset.min(self.len());
        let idx = self.split_run_at(offset);
        let runs = self.runs.split_off(idx);
        let content = self.content.split_off(offset);
        self.coalesce();
        let mut right = Self {
            key: right_key,
            content,
            runs,
        };
        right.coalesce();
        right
    }

    /// Append another node's content and marks.
    pub(crate) fn append(&mut self, other: &Self) {
        self.content.append(other.content.clone());
        self.runs.extend(other.runs.iter().copied());
        self.coalesce();
    }

    /// Add marks to every character in `range`.
    pub(crate) fn add_marks(&mut self, range: Range<usize>, marks: Marks) {
        self.map_marks(range, |current| current | marks);
    }

    /// Remove marks from every character in `range`.
    pub(crate) fn remove_marks(&mut self, range: Range<usize>, marks: Marks) {
        self.map_marks(range, |current| current - marks);
    }

    fn map_marks(&mut self, range: Range<usize>, f: impl Fn(Marks) -> Marks) {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start >= end {
            return;
        }
        let first = self.split_run_at(start);
        let last = self.split_run_at(end);
        for run in &mut self.runs[first..last] {
            run.marks = f(run.marks);
        }
        self.coalesce();
    }

    /// Ensure a run boundary at `offset`; returns the index of the first run
    /// starting at or after it.
    fn split_run_at(&mut self, offset: usize) -> usize {
        let mut pos = 0;
        for idx in 0..self.runs.len() {
            if pos == offset {
                return idx;
            }
            let run = self.runs[idx];
            if offset < pos + run.len {
                let left = offset - pos;
                self.runs[idx].len = left;
                self.runs.insert(
                    idx + 1,
                    MarkRun {
                        len: run.len - left,
                        marks: run.marks,
                    },
                );
                return idx + 1;
            }
            pos += run.len;
        }
        self.runs.len()
    }

    fn coalesce(&mut self) {
        let mut merged: Vec<MarkRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.len == 0 {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.marks == run.marks => last.len += run.len,
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}
