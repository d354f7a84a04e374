//! Editor state: a document, a selection and their history.
//!
//! [`State`] is the value an editor holds between keystrokes. Its editing
//! methods are pure: each returns a new State whose selection has been
//! placed where a user would expect the caret after that edit. History is
//! left alone; recording an undo step is the job of
//! [`Transform::apply`](crate::Transform::apply).
//!
//! # Examples
//!
//! ```
//! use richdoc::{Point, Selection, State};
//!
//! let state = State::builder()
//!     .document(richdoc::Document::builder().paragraph("Hello World").build().unwrap())
//!     .build()
//!     .unwrap();
//! let key = state.document().get_first_text().unwrap().key();
//! let state = state
//!     .with_selection(Selection::collapsed(Point::new(key, 5)))
//!     .unwrap();
//!
//! let next = state.insert_text(" there").unwrap();
//! assert_eq!(next.text(), "Hello there World");
//! assert_eq!(next.selection().focus().offset, 11);
//! ```

use crate::document::{Document, RangeEditing};
use crate::error::{Error, Result};
use crate::event::{EditorEvent, LogLevel, emit_event, emit_log};
use crate::history::{History, HistoryOptions, Snapshot};
use crate::marks::Marks;
use crate::raw::RawDocument;
use crate::selection::{Point, Selection};
use crate::transform::Transform;

/// Immutable editor state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    document: Document,
    selection: Selection,
    history: History,
    is_native: bool,
}

impl Default for State {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

impl State {
    /// A state over `document` with the caret at its start and empty history.
    #[must_use]
    pub fn new(document: Document) -> Self {
        let selection = start_of(&document);
        Self {
            document,
            selection,
            history: History::new(),
            is_native: false,
        }
    }

    /// Start building a state with optional overrides.
    #[must_use]
    pub fn builder() -> StateBuilder {
        StateBuilder::default()
    }

    /// Restore a state from plain data, caret at the start.
    pub fn from_raw(raw: &RawDocument) -> Result<Self> {
        Ok(Self::new(Document::from_raw(raw)?))
    }

    /// The plain-data form of the document.
    #[must_use]
    pub fn to_raw(&self) -> RawDocument {
        self.document.to_raw()
    }

    pub(crate) fn from_parts(
        document: Document,
        selection: Selection,
        history: History,
        is_native: bool,
    ) -> Self {
        Self {
            document,
            selection,
            history,
            is_native,
        }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether the host produced this state itself (for example from a
    /// native input event) rather than through the editor.
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.is_native
    }

    /// Plain text of the document.
    #[must_use]
    pub fn text(&self) -> String {
        self.document.text()
    }

    /// The document and selection, as recorded by history.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.document.clone(), self.selection)
    }

    /// Replace the document.
    ///
    /// The selection is kept as is; callers swapping in an unrelated
    /// document should follow up with [`with_selection`](Self::with_selection).
    #[must_use]
    pub fn with_document(&self, document: Document) -> Self {
        Self {
            document,
            ..self.clone()
        }
    }

    /// Replace the selection after checking it against the document.
    pub fn with_selection(&self, selection: Selection) -> Result<Self> {
        Ok(Self {
            selection: selection.normalize(&self.document)?,
            ..self.clone()
        })
    }

    #[must_use]
    pub fn with_history(&self, history: History) -> Self {
        Self {
            history,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_native(&self, is_native: bool) -> Self {
        Self {
            is_native,
            ..self.clone()
        }
    }

    /// Stage several edits and commit them as one history step.
    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform::new(self.clone())
    }

    /// Remove the selected content; the caret lands where it began.
    ///
    /// A collapsed selection has nothing to remove and returns `self`.
    pub fn delete(&self) -> Result<Self> {
        let selection = self.selection.normalize(&self.document)?;
        if selection.is_collapsed() {
            emit_log(LogLevel::Debug, "delete: selection is collapsed");
            return Ok(self.clone());
        }
        let document = self.document.delete_at_range(&selection)?;
        Ok(self.merge(document, selection.move_to_start()))
    }

    /// Remove `n` characters before the caret, or the selected content.
    ///
    /// At the start of a block the block merges into the previous one and
    /// the caret lands at the join.
    pub fn delete_backward(&self, n: usize) -> Result<Self> {
        let selection = self.selection.normalize(&self.document)?;
        if selection.is_collapsed() && n == 0 {
            return Ok(self.clone());
        }

        let after = if selection.is_expanded() {
            Some(selection.move_to_start())
        } else if self.document.is_at_block_start(selection.start())? {
            let block = self.document.get_closest_block(selection.start_key())?;
            match self.document.get_previous_node(block.key()) {
                Some(previous) => Some(Selection::at_end_of(previous)?),
                None => Some(selection),
            }
        } else if !selection.is_at_end_of(&self.document) {
            Some(selection.move_backward(&self.document, n)?)
        } else {
            None
        };

        let document = self.document.delete_backward_at_range(&selection, n)?;
        // At the very end of the document the caret follows the new end.
        let after = match after {
            Some(after) => after,
            None => Selection::at_end_of(&document)?,
        };
        let after = after.normalize(&document)?;
        Ok(self.merge(document, after))
    }

    /// Remove `n` characters after the caret, or the selected content.
    ///
    /// The caret does not move; an expanded selection collapses to its start.
    pub fn delete_forward(&self, n: usize) -> Result<Self> {
        let selection = self.selection.normalize(&self.document)?;
        let after = if selection.is_expanded() {
            selection.move_to_start()
        } else {
            selection
        };
        let document = self.document.delete_forward_at_range(&selection, n)?;
        let after = after.normalize(&document)?;
        Ok(self.merge(document, after))
    }

    /// Insert `text` at the caret, replacing any selected content. The caret
    /// ends up after the inserted text.
    pub fn insert_text(&self, text: &str) -> Result<Self> {
        let selection = self.selection.normalize(&self.document)?;
        let document = self.document.insert_at_range(&selection, text)?;
        let after = selection
            .move_to_start()
            .move_forward(&document, text.chars().count())?
            .normalize(&document)?;
        Ok(self.merge(document, after))
    }

    /// Split the block at the caret. The caret follows the trailing half
    /// into the new block.
    pub fn split(&self) -> Result<Self> {
        let selection = self.selection.normalize(&self.document)?;
        let document = self.document.split_at_range(&selection)?;
        let block = document.get_closest_block(selection.start_key())?;
        let next = document
            .get_next_node(block.key())
            .ok_or(Error::NotContainer { key: block.key() })?;
        let after = Selection::at_start_of(next)?;
        Ok(self.merge(document, after))
    }

    /// Add `marks` to the selected characters.
    pub fn add_mark(&self, marks: Marks) -> Result<Self> {
        let selection = self.selection.normalize(&self.document)?;
        let document = self.document.add_mark_at_range(&selection, marks)?;
        Ok(self.merge(document, selection))
    }

    /// Remove `marks` from the selected characters.
    pub fn remove_mark(&self, marks: Marks) -> Result<Self> {
        let selection = self.selection.normalize(&self.document)?;
        let document = self.document.remove_mark_at_range(&selection, marks)?;
        Ok(self.merge(document, selection))
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The state before the last committed transform, or `None`.
    #[must_use]
    pub fn undo(&self) -> Option<Self> {
        let (history, previous) = self.history.undo(self.snapshot())?;
        emit_event(&EditorEvent::Undone {
            undos: history.undos().len(),
            redos: history.redos().len(),
        });
        Some(Self::from_parts(
            previous.document,
            previous.selection,
            history,
            false,
        ))
    }

    /// The state the last undo stepped away from, or `None`.
    #[must_use]
    pub fn redo(&self) -> Option<Self> {
        let (history, following) = self.history.redo(self.snapshot())?;
        emit_event(&EditorEvent::Redone {
            undos: history.undos().len(),
            redos: history.redos().len(),
        });
        Some(Self::from_parts(
            following.document,
            following.selection,
            history,
            false,
        ))
    }

    fn merge(&self, document: Document, selection: Selection) -> Self {
        Self {
            document,
            selection,
            ..self.clone()
        }
    }
}

/// Raw range edits on the document. The selection is left untouched and
/// may no longer fit the document afterwards.
impl RangeEditing for State {
    fn delete_at_range(&self, range: &Selection) -> Result<Self> {
        Ok(self.with_document(self.document.delete_at_range(range)?))
    }

    fn delete_backward_at_range(&self, range: &Selection, n: usize) -> Result<Self> {
        Ok(self.with_document(self.document.delete_backward_at_range(range, n)?))
    }

    fn delete_forward_at_range(&self, range: &Selection, n: usize) -> Result<Self> {
        Ok(self.with_document(self.document.delete_forward_at_range(range, n)?))
    }

    fn insert_at_range(&self, range: &Selection, text: &str) -> Result<Self> {
        Ok(self.with_document(self.document.insert_at_range(range, text)?))
    }

    fn split_at_range(&self, range: &Selection) -> Result<Self> {
        Ok(self.with_document(self.document.split_at_range(range)?))
    }

    fn add_mark_at_range(&self, range: &Selection, marks: Marks) -> Result<Self> {
        Ok(self.with_document(self.document.add_mark_at_range(range, marks)?))
    }

    fn remove_mark_at_range(&self, range: &Selection, marks: Marks) -> Result<Self> {
        Ok(self.with_document(self.document.remove_mark_at_range(range, marks)?))
    }
}

/// Builder for [`State`]; every field is optional.
#[derive(Clone, Debug, Default)]
pub struct StateBuilder {
    document: Option<Document>,
    selection: Option<Selection>,
    history: Option<History>,
    history_options: HistoryOptions,
    native: bool,
}

impl StateBuilder {
    #[must_use]
    pub fn document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }

    /// Initial selection; defaults to a caret at the document start.
    #[must_use]
    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Existing history. Takes precedence over
    /// [`history_options`](Self::history_options).
    #[must_use]
    pub fn history(mut self, history: History) -> Self {
        self.history = Some(history);
        self
    }

    #[must_use]
    pub fn history_options(mut self, options: HistoryOptions) -> Self {
        self.history_options = options;
        self
    }

    #[must_use]
    pub fn native(mut self, native: bool) -> Self {
        self.native = native;
        self
    }

    /// Build the state, checking the selection against the document.
    pub fn build(self) -> Result<State> {
        let document = self.document.unwrap_or_default();
        let selection = match self.selection {
            Some(selection) => selection.normalize(&document)?,
            None => start_of(&document),
        };
        let history = self
            .history
            .unwrap_or_else(|| History::with_options(self.history_options));
        Ok(State::from_parts(document, selection, history, self.native))
    }
}

fn start_of(document: &Document) -> Selection {
    let key = document
        .get_first_text()
        .map_or_else(|| document.key(), |text| text.key());
    Selection::collapsed(Point::new(key, 0))
}
