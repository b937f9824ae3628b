//! Expose change tracking for plain text to WebAssembly.
use wasm_bindgen::prelude::*;

use crate::TrackedText;

#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc<'_> = wee_alloc::WeeAlloc::INIT;

/// WASM wrapper around `crate::TrackedText` labelling every change with the
/// name of its author.
#[wasm_bindgen(js_name = TrackedText)]
#[derive(Debug, Clone)]
pub struct TrackedTextHandle {
    inner: TrackedText<String>,
}

#[wasm_bindgen(js_class = TrackedText)]
impl TrackedTextHandle {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(text: &str) -> Self {
        set_panic_hook();

        TrackedTextHandle {
            inner: TrackedText::new(text),
        }
    }

    /// Replaces the characters `from..to` with `text`.
    ///
    /// # Errors
    ///
    /// If the range is inverted or reaches past the end of the text.
    pub fn replace(
        &mut self,
        from: usize,
        to: usize,
        text: &str,
        author: &str,
    ) -> Result<(), JsError> {
        self.inner = self.inner.replace(from, to, text, author.to_owned())?;
        Ok(())
    }

    #[must_use]
    pub fn text(&self) -> String { self.inner.text().to_owned() }

    #[wasm_bindgen(js_name = startText)]
    #[must_use]
    pub fn start_text(&self) -> String { self.inner.start_text() }

    /// The tracked changes as a JSON array of
    /// `{fromA, toA, fromB, toB, deleted, inserted}` records.
    ///
    /// # Errors
    ///
    /// If serialization to JSON fails which should not happen
    #[wasm_bindgen(js_name = changesJson)]
    pub fn changes_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(self.inner.changes())?)
    }

    /// Like `changesJson`, with changes to parts of words widened to the
    /// whole words.
    ///
    /// # Errors
    ///
    /// If serialization to JSON fails which should not happen
    #[wasm_bindgen(js_name = simplifiedChangesJson)]
    pub fn simplified_changes_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.inner.simplified_changes())?)
    }
}

/// Diffs two texts and returns the changes as JSON, in the format of
/// `TrackedText.changesJson`.
///
/// # Errors
///
/// If serialization to JSON fails which should not happen
#[wasm_bindgen(js_name = diffTexts)]
pub fn diff_texts(old: &str, new: &str, author: &str) -> Result<String, JsError> {
    set_panic_hook();

    Ok(serde_json::to_string(&TrackedText::diff(
        old,
        new,
        author.to_owned(),
    ))?)
}

fn set_panic_hook() {
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
