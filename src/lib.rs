//! Edit-distance spell-suggestion core over trie dictionaries.
//!
//! Given a query string and one or more word dictionaries represented as
//! prefix tries, [`suggest`] produces a ranked list of correction
//! candidates minimizing an edit-distance-like cost, using an A*-style
//! best-first search of the joint space of edit position x trie node.
//!
//! Dictionary compilation, tokenization, and compound-word joining live
//! outside this crate; see each module's doc comment for the slice of the
//! problem it owns.

pub mod collector;
pub mod heap;
pub mod location;
pub mod orthography;
pub mod search;
pub mod trie;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use collector::{SuggestOptions, SuggestionCollector};
pub use search::{CompoundMethod, SearchEngine, Suggestion};
pub use trie::Trie;

use thiserror::Error;

/// The core's narrow error surface. Empty queries and exhausted searches
/// are not errors; they are an empty result set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuggestError {
    #[error("numSuggestions must be at least 1, got {0}")]
    InvalidNumSuggestions(usize),
}

/// Ranked spelling corrections for `word`, searched across `tries` in
/// sequence and merged into one collector.
pub fn suggest(
    tries: &[&Trie],
    word: &str,
    options: SuggestOptions,
) -> Result<Vec<Suggestion>, SuggestError> {
    if options.num_suggestions < 1 {
        return Err(SuggestError::InvalidNumSuggestions(options.num_suggestions));
    }
    if word.is_empty() {
        return Ok(Vec::new());
    }

    let ignore_case = options.ignore_case;
    let mut collector = SuggestionCollector::new(word, options);
    let mut limit = collector.initial_bound();

    for trie in tries {
        let mut engine = SearchEngine::new(trie, word, ignore_case);
        while let Some(Suggestion { word, cost }) = engine.advance(Some(limit)) {
            limit = collector.accept(word, cost);
        }
    }

    Ok(collector.into_results())
}

/// Lower-level generator over one trie root, exposed for callers that
/// want to drive the search themselves.
pub fn gen_suggestions<'t>(
    root: &'t Trie,
    word: &str,
    ignore_case: bool,
    compound_method: CompoundMethod,
) -> SearchEngine<'t> {
    SearchEngine::with_compound_method(root, word, ignore_case, compound_method)
}

/// Constructs a collector for `word` with the given options.
pub fn suggestion_collector(word: impl Into<String>, options: SuggestOptions) -> SuggestionCollector {
    SuggestionCollector::new(word, options)
}
