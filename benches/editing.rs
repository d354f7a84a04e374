//! Editing performance benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{Criterion, criterion_group, criterion_main};
use richdoc::{Document, Point, RangeEditing, Selection, State};
use std::hint::black_box;

fn large_document(blocks: usize) -> Document {
    (0..blocks)
        .fold(Document::builder(), |builder, i| {
            builder.paragraph(&format!("Paragraph {i} with some text to edit."))
        })
        .build()
        .unwrap()
}

fn caret_in_middle(document: &Document) -> State {
    let texts = document.texts();
    let key = texts[texts.len() / 2].key();
    State::new(document.clone())
        .with_selection(Selection::collapsed(Point::new(key, 10)))
        .unwrap()
}

fn state_editing(c: &mut Criterion) {
    let state = caret_in_middle(&large_document(1_000));

    c.bench_function("state_insert_text_1k_blocks", |b| {
        b.iter(|| black_box(&state).insert_text(black_box("x")).unwrap());
    });

    c.bench_function("state_delete_backward_1k_blocks", |b| {
        b.iter(|| black_box(&state).delete_backward(black_box(1)).unwrap());
    });

    c.bench_function("state_split_1k_blocks", |b| {
        b.iter(|| black_box(&state).split().unwrap());
    });
}

fn typing_session(c: &mut Criterion) {
    let start = caret_in_middle(&large_document(200));

    c.bench_function("transform_type_100_chars", |b| {
        b.iter(|| {
            let mut state = start.clone();
            for _ in 0..100 {
                state = state.transform().insert_text("a").unwrap().apply();
            }
            black_box(state)
        });
    });
}

fn range_deletes(c: &mut Criterion) {
    let document = large_document(1_000);
    let texts = document.texts();
    let range = Selection::new(
        Point::new(texts[100].key(), 3),
        Point::new(texts[900].key(), 3),
    );

    c.bench_function("document_delete_800_blocks", |b| {
        b.iter(|| black_box(&document).delete_at_range(black_box(&range)).unwrap());
    });
}

criterion_group!(benches, state_editing, typing_session, range_deletes);
criterion_main!(benches);
