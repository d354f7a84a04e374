//! `richdoc` - immutable rich-text document model
//!
//! A tree of blocks and marked text with value semantics: every edit returns
//! a new [`Document`] or [`State`] and shares untouched subtrees with the
//! old one. On top of the tree sit a validated [`Selection`], cursor-aware
//! editing on [`State`], staged commits through [`Transform`] and
//! snapshot-based undo/redo in [`History`].
//!
//! ```
//! use richdoc::{Document, State};
//!
//! let state = State::new(
//!     Document::builder()
//!         .paragraph("Foo")
//!         .paragraph("Bar")
//!         .build()
//!         .unwrap(),
//! );
//! let bar = state.document().texts()[1].key();
//! let state = state
//!     .with_selection(richdoc::Selection::collapsed(richdoc::Point::new(bar, 0)))
//!     .unwrap();
//!
//! let merged = state.transform().delete_backward(1).unwrap().apply();
//! assert_eq!(merged.text(), "FooBar");
//! assert_eq!(merged.selection().focus().offset, 3);
//! assert_eq!(merged.undo().unwrap().text(), "Foo\nBar");
//! ```

// Crate-level lint configuration
#![allow(clippy::module_name_repetitions)] // Allow document::DocumentBuilder etc
#![allow(clippy::missing_errors_doc)] // Every fallible edit fails the same ways, see Error
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::redundant_closure_for_method_calls)] // Closures over Arc<Node> read clearer
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::needless_collect)] // Collect for assertions is clear

pub mod document;
pub mod error;
pub mod event;
pub mod history;
pub mod marks;
pub mod node;
pub mod raw;
pub mod selection;
pub mod state;
pub mod transform;

// Re-export core types at crate root
pub use document::{Document, DocumentBuilder, RangeEditing};
pub use error::{Error, Result};
pub use event::{
    EditorEvent, LogLevel, clear_event_callback, emit_event, emit_log, set_event_callback,
    set_log_callback,
};
pub use history::{History, HistoryOptions, Snapshot};
pub use marks::Marks;
pub use node::{Container, Key, Node, Text, TextBounds, TextRange};
pub use raw::{RawDocument, RawNode, RawRange};
pub use selection::{Point, Selection};
pub use state::{State, StateBuilder};
pub use transform::Transform;
