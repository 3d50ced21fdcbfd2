//! Thin `wasm-bindgen` surface over [`crate::suggest`].
//!
//! The core's public Rust API is
//! `suggest`/`gen_suggestions`/`suggestion_collector`; this module only
//! adapts it to a JS-friendly shape for consumers across the
//! `wasm-bindgen` boundary.

use crate::{suggest, SuggestOptions, Trie};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmTrie(Trie);

#[wasm_bindgen]
impl WasmTrie {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmTrie {
        WasmTrie(Trie::new())
    }

    pub fn insert(&mut self, word: &str) {
        self.0.insert(word);
    }
}

impl Default for WasmTrie {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns suggestions as a flat `[word, cost, word, cost, ...]` array,
/// the simplest shape to marshal across the `wasm-bindgen` boundary
/// without pulling in `serde-wasm-bindgen` for one call.
#[wasm_bindgen(js_name = suggest)]
pub fn suggest_js(trie: &WasmTrie, word: &str, num_suggestions: usize) -> js_sys::Array {
    let options = SuggestOptions::new().num_suggestions(num_suggestions.max(1));
    let results = suggest(&[&trie.0], word, options).unwrap_or_default();
    let out = js_sys::Array::new();
    for item in results {
        out.push(&JsValue::from_str(&item.word));
        out.push(&JsValue::from_f64(item.cost as f64));
    }
    out
}
