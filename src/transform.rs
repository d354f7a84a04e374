//! Staged edits committed as one history step.
//!
//! A [`Transform`] starts from a [`State`], threads any number of edits
//! through it, and [`apply`](Transform::apply)s them as a single new State
//! carrying exactly one new undo entry.
//!
//! # Examples
//!
//! ```
//! use richdoc::{Document, State};
//!
//! let state = State::new(Document::builder().paragraph("Hi").build().unwrap());
//! let next = state
//!     .transform()
//!     .insert_text("Oh, ")
//!     .and_then(|t| t.split())
//!     .unwrap()
//!     .apply();
//!
//! assert_eq!(next.text(), "Oh, \nHi");
//! assert_eq!(next.history().undos().len(), 1);
//! assert_eq!(next.undo().unwrap().text(), "Hi");
//! ```

use crate::document::{Document, RangeEditing};
use crate::error::Result;
use crate::event::{EditorEvent, emit_event};
use crate::marks::Marks;
use crate::selection::Selection;
use crate::state::State;

/// A pending change to a [`State`].
#[derive(Clone, Debug)]
pub struct Transform {
    base: State,
    state: State,
    native: bool,
    save: bool,
}

impl Transform {
    pub(crate) fn new(state: State) -> Self {
        Self {
            base: state.clone(),
            state,
            native: false,
            save: true,
        }
    }

    /// The state the transform started from.
    #[must_use]
    pub fn base(&self) -> &State {
        &self.base
    }

    /// The staged state so far.
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        self.state.document()
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        self.state.selection()
    }

    /// Mark the committed state as produced by the host.
    #[must_use]
    pub fn native(self, native: bool) -> Self {
        Self { native, ..self }
    }

    /// Whether [`apply`](Self::apply) records an undo entry. On by default.
    #[must_use]
    pub fn save(self, save: bool) -> Self {
        Self { save, ..self }
    }

    pub fn delete(self) -> Result<Self> {
        let state = self.state.delete()?;
        Ok(Self { state, ..self })
    }

    pub fn delete_backward(self, n: usize) -> Result<Self> {
        let state = self.state.delete_backward(n)?;
        Ok(Self { state, ..self })
    }

    pub fn delete_forward(self, n: usize) -> Result<Self> {
        let state = self.state.delete_forward(n)?;
        Ok(Self { state, ..self })
    }

    pub fn insert_text(self, text: &str) -> Result<Self> {
        let state = self.state.insert_text(text)?;
        Ok(Self { state, ..self })
    }

    pub fn split(self) -> Result<Self> {
        let state = self.state.split()?;
        Ok(Self { state, ..self })
    }

    pub fn add_mark(self, marks: Marks) -> Result<Self> {
        let state = self.state.add_mark(marks)?;
        Ok(Self { state, ..self })
    }

    pub fn remove_mark(self, marks: Marks) -> Result<Self> {
        let state = self.state.remove_mark(marks)?;
        Ok(Self { state, ..self })
    }

    /// Move the selection.
    pub fn select(self, selection: Selection) -> Result<Self> {
        let state = self.state.with_selection(selection)?;
        Ok(Self { state, ..self })
    }

    /// Commit the staged edits.
    ///
    /// With saving on, the starting document and selection become one new
    /// undo entry and the redo stack is cleared, even when only the
    /// selection moved.
    #[must_use]
    pub fn apply(self) -> State {
        let history = if self.save {
            self.base.history().push(self.base.snapshot())
        } else {
            self.base.history().clone()
        };
        let state = self
            .state
            .with_history(history)
            .with_native(self.native);
        emit_event(&EditorEvent::Committed {
            undos: state.history().undos().len(),
            redos: state.history().redos().len(),
            native: self.native,
        });
        state
    }
}

impl RangeEditing for Transform {
    fn delete_at_range(&self, range: &Selection) -> Result<Self> {
        let state = self.state.delete_at_range(range)?;
        Ok(Self {
            state,
            ..self.clone()
        })
    }

    fn delete_backward_at_range(&self, range: &Selection, n: usize) -> Result<Self> {
        let state = self.state.delete_backward_at_range(range, n)?;
        Ok(Self {
            state,
            ..self.clone()
        })
    }

    fn delete_forward_at_range(&self, range: &Selection, n: usize) -> Result<Self> {
        let state = self.state.delete_forward_at_range(range, n)?;
        Ok(Self {
            state,
            ..self.clone()
        })
    }

    fn insert_at_range(&self, range: &Selection, text: &str) -> Result<Self> {
        let state = self.state.insert_at_range(range, text)?;
        Ok(Self {
            state,
            ..self.clone()
        })
    }

    fn split_at_range(&self, range: &Selection) -> Result<Self> {
        let state = self.state.split_at_range(range)?;
        Ok(Self {
            state,
            ..self.clone()
        })
    }

    fn add_mark_at_range(&self, range: &Selection, marks: Marks) -> Result<Self> {
        let state = self.state.add_mark_at_range(range, marks)?;
        Ok(Self {
            state,
            ..self.clone()
        })
    }

    fn remove_mark_at_range(&self, range: &Selection, marks: Marks) -> Result<Self> {
        let state = self.state.remove_mark_at_range(range, marks)?;
        Ok(Self {
            state,
            ..self.clone()
        })
    }
}
