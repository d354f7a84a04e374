//! Property-based tests for State editing and history.
//!
//! Uses proptest to verify the cursor and content laws over arbitrary
//! documents and positions.

mod common;

use common::{caret, paragraphs, state_at};
use proptest::prelude::*;
use richdoc::{Document, Point, RawDocument, RawNode, Selection, State, Transform};

// ============================================================================
// Strategies
// ============================================================================

/// Short paragraph text, mixing ASCII with multi-byte characters.
fn paragraph_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["a", "b", "Z", " ", "é", "中", "😀", "ß"]),
        0..12,
    )
    .prop_map(|parts| parts.concat())
}

fn inserted_text() -> impl Strategy<Value = String> {
    "[a-z é😀]{0,8}"
}

fn paragraph_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(paragraph_text(), 1..5)
}

/// A top-level block: a plain paragraph, a quote of paragraphs, or a
/// paragraph whose Text children surround a nested quote.
fn block() -> impl Strategy<Value = RawNode> {
    prop_oneof![
        3 => paragraph_text().prop_map(RawNode::paragraph),
        1 => prop::collection::vec(paragraph_text(), 1..3).prop_map(|texts| {
            RawNode::container("quote", texts.into_iter().map(RawNode::paragraph).collect())
        }),
        1 => (paragraph_text(), paragraph_text(), paragraph_text()).prop_map(
            |(before, inner, after)| {
                RawNode::container(
                    "paragraph",
                    vec![
                        RawNode::text(before),
                        RawNode::container("quote", vec![RawNode::paragraph(inner)]),
                        RawNode::text(after),
                    ],
                )
            }
        ),
    ]
}

fn nested_document() -> impl Strategy<Value = Document> {
    prop::collection::vec(block(), 1..5)
        .prop_map(|nodes| Document::from_raw(&RawDocument { nodes }).unwrap())
}

#[derive(Clone, Debug)]
enum Edit {
    Insert(String),
    DeleteBackward(usize),
    DeleteForward(usize),
    Split,
    MarkBold,
    Extend(i8),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        inserted_text().prop_map(Edit::Insert),
        (0usize..4).prop_map(Edit::DeleteBackward),
        (0usize..4).prop_map(Edit::DeleteForward),
        Just(Edit::Split),
        Just(Edit::MarkBold),
        (-12i8..12).prop_map(Edit::Extend),
    ]
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn as_strs(texts: &[String]) -> Vec<&str> {
    texts.iter().map(String::as_str).collect()
}

/// Flattened character position of (paragraph, offset) in `Document::text`.
fn flat_position(texts: &[String], index: usize, offset: usize) -> usize {
    texts[..index].iter().map(|text| char_len(text) + 1).sum::<usize>() + offset
}

// ============================================================================
// Editing Properties
// ============================================================================

proptest! {
    /// Inserting at a caret splices the text in and moves the caret past it.
    #[test]
    fn insert_moves_caret_by_inserted_length(
        text in paragraph_text(),
        inserted in inserted_text(),
        at in 0usize..64,
    ) {
        let k = at % (char_len(&text) + 1);
        let state = state_at(&[&text], 0, k);
        let next = state.insert_text(&inserted).unwrap();

        let mut expected: Vec<char> = text.chars().collect();
        expected.splice(k..k, inserted.chars());
        prop_assert_eq!(next.text(), expected.into_iter().collect::<String>());
        prop_assert!(next.selection().is_collapsed());
        prop_assert_eq!(caret(&next), (0, k + char_len(&inserted)));
    }

    /// Deleting a collapsed selection changes nothing.
    #[test]
    fn delete_on_collapsed_is_identity(texts in paragraph_list(), at in 0usize..64) {
        let index = at % texts.len();
        let offset = at % (char_len(&texts[index]) + 1);
        let state = state_at(&as_strs(&texts), index, offset);
        prop_assert_eq!(state.delete().unwrap(), state);
    }

    /// Deleting an expanded selection removes exactly its span and leaves the
    /// caret where the span began, whichever way the selection points.
    #[test]
    fn delete_collapses_to_start(
        texts in paragraph_list(),
        a in (0usize..8, 0usize..64),
        b in (0usize..8, 0usize..64),
    ) {
        let point = |(index, offset): (usize, usize)| {
            let index = index % texts.len();
            (index, offset % (char_len(&texts[index]) + 1))
        };
        let (a, b) = (point(a), point(b));
        let (flat_a, flat_b) = (
            flat_position(&texts, a.0, a.1),
            flat_position(&texts, b.0, b.1),
        );
        prop_assume!(flat_a != flat_b);

        let state = State::new(paragraphs(&as_strs(&texts)));
        let keys: Vec<_> = state.document().texts().iter().map(|text| text.key()).collect();
        let state = state
            .with_selection(Selection::new(
                Point::new(keys[a.0], a.1),
                Point::new(keys[b.0], b.1),
            ))
            .unwrap();
        let next = state.delete().unwrap();

        let (start, lo, hi) = if flat_a < flat_b { (a, flat_a, flat_b) } else { (b, flat_b, flat_a) };
        let flat: Vec<char> = state.text().chars().collect();
        let expected: String = flat[..lo].iter().chain(&flat[hi..]).collect();
        prop_assert_eq!(next.text(), expected);
        prop_assert!(next.selection().is_collapsed());
        prop_assert_eq!(caret(&next), start);
        prop_assert!(next.document().validate().is_ok());
    }

    /// Splitting at k yields the two halves as siblings, caret at the start
    /// of the second.
    #[test]
    fn split_places_caret_in_new_block(text in paragraph_text(), at in 0usize..64) {
        let k = at % (char_len(&text) + 1);
        let state = state_at(&[&text], 0, k);
        let next = state.split().unwrap();

        let chars: Vec<char> = text.chars().collect();
        let texts = next.document().texts();
        prop_assert_eq!(texts.len(), 2);
        prop_assert_eq!(texts[0].text(), chars[..k].iter().collect::<String>());
        prop_assert_eq!(texts[1].text(), chars[k..].iter().collect::<String>());
        prop_assert_eq!(next.document().nodes().len(), 2);
        prop_assert_eq!(caret(&next), (1, 0));
    }

    /// Backspace at a block start joins the block onto the previous one,
    /// caret at the join.
    #[test]
    fn delete_backward_merges_at_block_start(
        first in paragraph_text(),
        second in paragraph_text(),
    ) {
        let state = state_at(&[&first, &second], 1, 0);
        let next = state.delete_backward(1).unwrap();
        prop_assert_eq!(next.text(), format!("{first}{second}"));
        prop_assert_eq!(next.document().nodes().len(), 1);
        prop_assert_eq!(caret(&next), (0, char_len(&first)));
    }

    /// Every edit keeps the tree and the selection valid.
    #[test]
    fn edits_preserve_invariants(
        texts in paragraph_list(),
        at in 0usize..64,
        edits in prop::collection::vec(edit(), 0..12),
    ) {
        let index = at % texts.len();
        let offset = at % (char_len(&texts[index]) + 1);
        let mut state = state_at(&as_strs(&texts), index, offset);
        for edit in &edits {
            state = apply_edit(&state, edit);
            prop_assert!(state.document().validate().is_ok());
            prop_assert!(state.selection().normalize(state.document()).is_ok());
        }
    }

    /// Edits over quotes and mixed blocks keep the tree valid, and the
    /// plain text agrees with caret arithmetic.
    #[test]
    fn nested_edits_preserve_invariants(
        document in nested_document(),
        at in (0usize..16, 0usize..64),
        edits in prop::collection::vec(edit(), 0..16),
    ) {
        let mut state = caret_in(document, at);
        for edit in &edits {
            state = apply_edit(&state, edit);
            prop_assert!(state.document().validate().is_ok());
            prop_assert!(state.selection().normalize(state.document()).is_ok());

            let document = state.document();
            let start = Point::new(document.texts()[0].key(), 0);
            let total = char_len(&document.text());
            let end = Selection::at_end_of(document).unwrap().focus();
            prop_assert_eq!(document.point_forward(start, total).unwrap(), end);
            if total > 0 {
                prop_assert_ne!(document.point_forward(start, total - 1).unwrap(), end);
            }
        }
    }

    /// Committing edits one transform at a time and undoing them all returns
    /// to the starting document and selection.
    #[test]
    fn undo_reverses_every_commit(
        texts in paragraph_list(),
        at in 0usize..64,
        edits in prop::collection::vec(edit(), 0..12),
    ) {
        let index = at % texts.len();
        let offset = at % (char_len(&texts[index]) + 1);
        let start = state_at(&as_strs(&texts), index, offset);

        let mut state = start.clone();
        for edit in &edits {
            state = replay(state.transform(), edit).apply();
        }
        for _ in &edits {
            state = state.undo().unwrap_or(state);
        }
        prop_assert_eq!(state.document(), start.document());
        prop_assert_eq!(state.selection(), start.selection());
        prop_assert!(!state.can_undo());
    }

    /// The undo round trip also holds over nested documents.
    #[test]
    fn undo_reverses_nested_commits(
        document in nested_document(),
        at in (0usize..16, 0usize..64),
        edits in prop::collection::vec(edit(), 0..12),
    ) {
        let start = caret_in(document, at);
        let mut state = start.clone();
        for edit in &edits {
            state = replay(state.transform(), edit).apply();
        }
        for _ in &edits {
            state = state.undo().unwrap_or(state);
        }
        prop_assert_eq!(state.document(), start.document());
        prop_assert_eq!(state.selection(), start.selection());
    }
}

fn caret_in(document: Document, (index, offset): (usize, usize)) -> State {
    let texts = document.texts();
    let text = texts[index % texts.len()];
    let caret = Point::new(text.key(), offset % (text.len() + 1));
    State::new(document)
        .with_selection(Selection::collapsed(caret))
        .unwrap()
}

fn extended(selection: &Selection, document: &Document, delta: i8) -> Selection {
    let n = usize::from(delta.unsigned_abs());
    if delta < 0 {
        selection.extend_backward(document, n)
    } else {
        selection.extend_forward(document, n)
    }
    .unwrap()
}

fn apply_edit(state: &State, edit: &Edit) -> State {
    match edit {
        Edit::Insert(text) => state.insert_text(text),
        Edit::DeleteBackward(n) => state.delete_backward(*n),
        Edit::DeleteForward(n) => state.delete_forward(*n),
        Edit::Split => state.split(),
        Edit::MarkBold => state.add_mark(richdoc::Marks::BOLD),
        Edit::Extend(delta) => {
            state.with_selection(extended(state.selection(), state.document(), *delta))
        }
    }
    .unwrap()
}

fn replay(transform: Transform, edit: &Edit) -> Transform {
    match edit {
        Edit::Insert(text) => transform.insert_text(text),
        Edit::DeleteBackward(n) => transform.delete_backward(*n),
        Edit::DeleteForward(n) => transform.delete_forward(*n),
        Edit::Split => transform.split(),
        Edit::MarkBold => transform.add_mark(richdoc::Marks::BOLD),
        Edit::Extend(delta) => {
            let selection = extended(transform.selection(), transform.document(), *delta);
            transform.select(selection)
        }
    }
    .unwrap()
}
