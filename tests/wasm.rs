#![cfg(feature = "wasm")]

use serde_json::json;
use tracked_changes::wasm::*;
use wasm_bindgen_test::*;

#[wasm_bindgen_test(unsupported = test)]
fn test_tracked_text() {
    let mut text = TrackedTextHandle::new("hello world");

    assert!(text.replace(6, 11, "earth", "alice").is_ok());

    assert_eq!(text.text(), "hello earth");
    assert_eq!(text.start_text(), "hello world");
}

#[wasm_bindgen_test(unsupported = test)]
fn test_changes_json() {
    let mut text = TrackedTextHandle::new("hello world");
    assert!(text.replace(11, 11, "!", "bob").is_ok());

    let changes: serde_json::Value = serde_json::from_str(&text.changes_json().unwrap()).unwrap();

    assert_eq!(
        changes,
        json!([{
            "fromA": 11,
            "toA": 11,
            "fromB": 11,
            "toB": 12,
            "deleted": [],
            "inserted": [{ "length": 1, "data": "bob" }]
        }])
    );
}

#[wasm_bindgen_test(unsupported = test)]
fn test_simplified_changes_json() {
    let mut text = TrackedTextHandle::new("testing");
    assert!(text.replace(2, 4, "XY", "alice").is_ok());

    let changes: serde_json::Value =
        serde_json::from_str(&text.simplified_changes_json().unwrap()).unwrap();

    assert_eq!(changes[0]["fromA"], 0);
    assert_eq!(changes[0]["toB"], 7);
}

#[wasm_bindgen_test(unsupported = test)]
fn test_diff_texts() {
    let changes: serde_json::Value =
        serde_json::from_str(&diff_texts("hello world", "hello earth", "alice").unwrap()).unwrap();

    assert_eq!(changes.as_array().map(Vec::len), Some(1));
    assert_eq!(changes[0]["fromB"], 6);
    assert_eq!(changes[0]["toB"], 11);
}

#[wasm_bindgen_test(unsupported = test)]
fn test_diff_identical_texts() {
    assert_eq!(diff_texts("same", "same", "alice").unwrap(), "[]");
}
