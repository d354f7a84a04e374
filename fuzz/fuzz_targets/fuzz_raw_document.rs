//! Fuzz target for loading documents from JSON.
//!
//! Anything serde accepts must either load into a valid document that
//! round-trips, or be rejected with an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use richdoc::{Document, RawDocument};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = serde_json::from_slice::<RawDocument>(data) else {
        return;
    };
    if let Ok(document) = Document::from_raw(&raw) {
        assert!(document.validate().is_ok());
        let again = Document::from_raw(&document.to_raw()).unwrap();
        assert_eq!(again, document);
    }
});
