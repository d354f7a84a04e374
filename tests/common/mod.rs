//! Shared helpers for integration tests.

#![allow(clippy::nursery)] // Test infra prioritizes clarity over pedantry
#![allow(clippy::pedantic)] // Test infra prioritizes clarity over pedantry
#![allow(dead_code)] // Not every test binary uses every helper

use richdoc::{Document, LogLevel, Point, Selection, State};
use tracing::Level;

/// Install a test subscriber and forward the crate's log callback into it.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_test_writer()
        .try_init();
    richdoc::set_log_callback(|level, message| match level {
        LogLevel::Debug => tracing::debug!(target: "richdoc", "{message}"),
        LogLevel::Info => tracing::info!(target: "richdoc", "{message}"),
        LogLevel::Warn => tracing::warn!(target: "richdoc", "{message}"),
        LogLevel::Error => tracing::error!(target: "richdoc", "{message}"),
    });
}

/// A document with one paragraph per entry.
pub fn paragraphs(texts: &[&str]) -> Document {
    texts
        .iter()
        .fold(Document::builder(), |builder, text| builder.paragraph(text))
        .build()
        .expect("paragraphs always form a valid document")
}

/// A state over `texts` with the caret in the `index`th Text node.
pub fn state_at(texts: &[&str], index: usize, offset: usize) -> State {
    let state = State::new(paragraphs(texts));
    let key = state.document().texts()[index].key();
    state
        .with_selection(Selection::collapsed(Point::new(key, offset)))
        .expect("caret inside the document")
}

/// Resolve a point to (text index, offset).
pub fn locate(document: &Document, point: Point) -> (usize, usize) {
    let index = document
        .texts()
        .iter()
        .position(|text| text.key() == point.key)
        .expect("point refers to a Text node");
    (index, point.offset)
}

/// The focus of a state's selection as (text index, offset).
pub fn caret(state: &State) -> (usize, usize) {
    locate(state.document(), state.selection().focus())
}
