//! Fuzz target for sequences of cursor edits.
//!
//! Builds a small document, places the caret, then runs arbitrary edits.
//! Every step must keep the tree valid and the selection inside it.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use richdoc::{Document, Marks, Point, Selection, State};

#[derive(Arbitrary, Debug)]
struct Session {
    paragraphs: Vec<String>,
    caret: (u8, u8),
    edits: Vec<Edit>,
}

#[derive(Arbitrary, Debug)]
enum Edit {
    Insert(String),
    DeleteBackward(u8),
    DeleteForward(u8),
    Delete,
    Split,
    Mark(u16),
    Extend(i8),
    Undo,
    Redo,
}

fuzz_target!(|session: Session| {
    let paragraphs: Vec<&str> = session.paragraphs.iter().take(8).map(String::as_str).collect();
    if paragraphs.is_empty() {
        return;
    }
    let document = paragraphs
        .iter()
        .fold(Document::builder(), |builder, text| builder.paragraph(text))
        .build()
        .unwrap();

    let texts = document.texts();
    let text = texts[usize::from(session.caret.0) % texts.len()];
    let caret = Point::new(text.key(), usize::from(session.caret.1) % (text.len() + 1));
    let mut state = State::new(document)
        .with_selection(Selection::collapsed(caret))
        .unwrap();

    for edit in session.edits.iter().take(32) {
        let transform = state.transform();
        let next = match edit {
            Edit::Insert(text) => transform.insert_text(text).map(|t| t.apply()),
            Edit::DeleteBackward(n) => transform.delete_backward(usize::from(*n % 8)).map(|t| t.apply()),
            Edit::DeleteForward(n) => transform.delete_forward(usize::from(*n % 8)).map(|t| t.apply()),
            Edit::Delete => transform.delete().map(|t| t.apply()),
            Edit::Split => transform.split().map(|t| t.apply()),
            Edit::Mark(bits) => transform
                .add_mark(Marks::from_bits_truncate(*bits))
                .map(|t| t.apply()),
            Edit::Extend(delta) => {
                let n = usize::from(delta.unsigned_abs());
                let selection = if *delta < 0 {
                    state.selection().extend_backward(state.document(), n)
                } else {
                    state.selection().extend_forward(state.document(), n)
                };
                selection.and_then(|selection| state.with_selection(selection))
            }
            Edit::Undo => Ok(state.undo().unwrap_or_else(|| state.clone())),
            Edit::Redo => Ok(state.redo().unwrap_or_else(|| state.clone())),
        };
        state = next.unwrap();
        assert!(state.document().validate().is_ok());
        assert!(state.selection().normalize(state.document()).is_ok());
    }
});
