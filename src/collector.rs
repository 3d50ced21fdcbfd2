//! A bounded ranked buffer of results that feeds a shrinking cost-limit
//! back into the search generator.

use crate::search::{Suggestion, BASE_COST};
use derive_new::new;

/// A predicate deciding whether a candidate should be accepted at all,
/// independent of rank or cost-limit filtering.
pub type Filter = Box<dyn Fn(&str, u32) -> bool>;

/// Option surface for [`SuggestionCollector`].
#[derive(new)]
pub struct SuggestOptions {
    #[new(value = "10")]
    pub num_suggestions: usize,
    /// Expressed in base-cost-edit units (multiplied by [`BASE_COST`] to
    /// compare against a candidate's raw cost), matching the `suggest`
    /// entry point's `numChanges` default.
    #[new(value = "5")]
    pub change_limit: u32,
    #[new(value = "false")]
    pub include_ties: bool,
    #[new(value = "false")]
    pub ignore_case: bool,
    #[new(default)]
    pub filter: Option<Filter>,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        SuggestOptions::new()
    }
}

impl SuggestOptions {
    pub fn num_suggestions(mut self, n: usize) -> Self {
        self.num_suggestions = n;
        self
    }

    pub fn change_limit(mut self, n: u32) -> Self {
        self.change_limit = n;
        self
    }

    pub fn include_ties(mut self, yes: bool) -> Self {
        self.include_ties = yes;
        self
    }

    pub fn ignore_case(mut self, yes: bool) -> Self {
        self.ignore_case = yes;
        self
    }

    pub fn filter(mut self, f: impl Fn(&str, u32) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(f));
        self
    }
}

/// Bounded, ranked buffer of accepted suggestions. Consumes `(word,
/// cost)` pairs and, on each acceptance attempt, returns the cost bound
/// the generator should honor going forward.
pub struct SuggestionCollector {
    options: SuggestOptions,
    items: Vec<Suggestion>,
}

impl SuggestionCollector {
    pub fn new(_query: impl Into<String>, options: SuggestOptions) -> Self {
        assert!(options.num_suggestions >= 1, "numSuggestions must be at least 1");
        Self {
            options,
            items: Vec::new(),
        }
    }

    /// The bound the generator should honor before any item has been
    /// accepted.
    pub fn initial_bound(&self) -> u32 {
        self.options.change_limit.saturating_mul(BASE_COST)
    }

    fn dedup_key(&self, word: &str) -> String {
        if self.options.ignore_case {
            word.to_lowercase()
        } else {
            word.to_string()
        }
    }

    fn find(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|s| self.dedup_key(&s.word) == key)
    }

    /// Attempts to accept `(word, cost)`, returning the (possibly
    /// tightened) cost bound the generator should honor on its next
    /// emission.
    pub fn accept(&mut self, word: String, cost: u32) -> u32 {
        let base_limit = self.initial_bound();
        if cost <= base_limit {
            let passes_filter = self
                .options
                .filter
                .as_ref()
                .map_or(true, |f| f(&word, cost));
            if passes_filter {
                let key = self.dedup_key(&word);
                let should_insert = match self.find(&key) {
                    Some(idx) => self.items[idx].cost > cost,
                    None => true,
                };
                if should_insert {
                    if let Some(idx) = self.find(&key) {
                        self.items.remove(idx);
                    }
                    let pos = self.items.partition_point(|s| s.cost <= cost);
                    self.items.insert(pos, Suggestion { word, cost });
                    self.trim();
                }
            }
        }
        self.current_bound()
    }

    fn trim(&mut self) {
        let n = self.options.num_suggestions;
        if self.items.len() <= n {
            return;
        }
        if self.options.include_ties {
            let boundary_cost = self.items[n - 1].cost;
            let cutoff = self.items.partition_point(|s| s.cost <= boundary_cost);
            self.items.truncate(cutoff.max(n));
        } else {
            self.items.truncate(n);
        }
    }

    fn current_bound(&self) -> u32 {
        let n = self.options.num_suggestions;
        if self.items.len() >= n {
            self.items[n - 1].cost
        } else {
            self.initial_bound()
        }
    }

    pub fn into_results(self) -> Vec<Suggestion> {
        self.items
    }

    pub fn results(&self) -> &[Suggestion] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_at_most_num_suggestions_without_ties() {
        let mut collector = SuggestionCollector::new("q", SuggestOptions::new().num_suggestions(2));
        collector.accept("a".into(), 10);
        collector.accept("b".into(), 20);
        collector.accept("c".into(), 5);
        assert_eq!(collector.results().len(), 2);
        assert_eq!(collector.results()[0].word, "c");
        assert_eq!(collector.results()[1].word, "a");
    }

    #[test]
    fn include_ties_keeps_all_matching_the_boundary_cost() {
        let mut collector =
            SuggestionCollector::new("q", SuggestOptions::new().num_suggestions(2).include_ties(true));
        collector.accept("a".into(), 10);
        collector.accept("b".into(), 10);
        collector.accept("c".into(), 10);
        collector.accept("d".into(), 50);
        assert_eq!(collector.results().len(), 3);
        assert!(collector.results().iter().all(|s| s.cost == 10));
    }

    #[test]
    fn ignore_case_prefers_the_cased_variant_at_lowest_cost() {
        let mut collector =
            SuggestionCollector::new("q", SuggestOptions::new().num_suggestions(5).ignore_case(true));
        collector.accept("Apple".into(), 100);
        collector.accept("apple".into(), 50);
        assert_eq!(collector.results().len(), 1);
        assert_eq!(collector.results()[0].word, "apple");
        assert_eq!(collector.results()[0].cost, 50);
    }

    #[test]
    fn results_are_nondecreasing_in_cost() {
        let mut collector = SuggestionCollector::new("q", SuggestOptions::new().num_suggestions(10));
        for (word, cost) in [("e", 5u32), ("a", 1), ("d", 4), ("b", 2), ("c", 3)] {
            collector.accept(word.into(), cost);
        }
        let costs: Vec<u32> = collector.results().iter().map(|s| s.cost).collect();
        let mut sorted = costs.clone();
        sorted.sort_unstable();
        assert_eq!(costs, sorted);
    }

    #[test]
    fn rejects_candidates_over_the_change_limit() {
        let mut collector = SuggestionCollector::new("q", SuggestOptions::new().change_limit(1));
        collector.accept("toofar".into(), BASE_COST * 2);
        assert!(collector.results().is_empty());
    }

    #[test]
    fn filter_predicate_can_reject_candidates() {
        let options = SuggestOptions {
            filter: Some(Box::new(|word: &str, _cost: u32| word.len() > 3)),
            ..SuggestOptions::new()
        };
        let mut collector = SuggestionCollector::new("q", options);
        collector.accept("hi".into(), 0);
        collector.accept("hello".into(), 0);
        assert_eq!(collector.results().len(), 1);
        assert_eq!(collector.results()[0].word, "hello");
    }
}
