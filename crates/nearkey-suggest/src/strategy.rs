// Suggestion strategy: the ordered generator pipeline and its options

use nearkey_core::keyboard::KeyboardLayout;
use nearkey_dict::DictError;

use crate::PrefixIndex;
use crate::generators::*;
use crate::status::SearchStatus;

/// Default minimum input length for the two-substitution pass.
pub const DEFAULT_EDIT_DISTANCE_2_MIN_LEN: usize = 4;

/// Default length of ranked suggestion lists.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Options controlling candidate generation and ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestOptions {
    /// Replace one key with a neighbour.
    pub nearby_substitution: bool,
    /// Replace two keys with neighbours.
    pub edit_distance_2: bool,
    /// Inputs shorter than this skip the two-substitution pass.
    pub edit_distance_2_min_len: usize,
    /// Insert one alphabet key.
    pub omission: bool,
    /// Drop one key.
    pub deletion: bool,
    /// Stop generating after this many checks. `None` means unlimited.
    pub max_checks: Option<usize>,
    /// Length of lists returned by `Autocorrect::suggestions`.
    pub max_suggestions: usize,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            nearby_substitution: true,
            edit_distance_2: true,
            edit_distance_2_min_len: DEFAULT_EDIT_DISTANCE_2_MIN_LEN,
            omission: true,
            deletion: true,
            max_checks: None,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

/// An ordered list of generators sharing one check budget.
pub struct SuggestionStrategy {
    max_checks: Option<usize>,
    generators: Vec<Box<dyn SuggestionGenerator>>,
}

impl SuggestionStrategy {
    pub fn new(max_checks: Option<usize>, generators: Vec<Box<dyn SuggestionGenerator>>) -> Self {
        Self {
            max_checks,
            generators,
        }
    }

    /// Run every generator in order until the budget is spent.
    pub fn generate(
        &self,
        index: &dyn PrefixIndex,
        status: &mut SearchStatus<'_>,
    ) -> Result<(), DictError> {
        status.set_max_checks(self.max_checks);
        for generator in &self.generators {
            if status.should_abort() {
                break;
            }
            generator.generate(index, status)?;
        }
        Ok(())
    }

    /// Number of passes.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

/// Build the typing strategy: the exact input, then one neighbour
/// substitution, two neighbour substitutions, one omitted key and one
/// extra key, each enabled by `options`.
pub fn typing_strategy(layout: &KeyboardLayout, options: &SuggestOptions) -> SuggestionStrategy {
    let mut generators: Vec<Box<dyn SuggestionGenerator>> = vec![Box::new(Exact)];
    if options.nearby_substitution {
        generators.push(Box::new(NearbySubstitution {
            layout: layout.clone(),
        }));
    }
    if options.edit_distance_2 {
        generators.push(Box::new(DoubleNearbySubstitution {
            layout: layout.clone(),
            min_len: options.edit_distance_2_min_len,
        }));
    }
    if options.omission {
        generators.push(Box::new(Omission {
            alphabet: layout.alphabet().to_vec(),
        }));
    }
    if options.deletion {
        generators.push(Box::new(Deletion));
    }
    SuggestionStrategy::new(options.max_checks, generators)
}

/// The typing strategy over US QWERTY with default options.
pub fn default_typing_strategy() -> SuggestionStrategy {
    typing_strategy(&KeyboardLayout::qwerty(), &SuggestOptions::default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use nearkey_core::candidate::Candidate;

    use super::*;

    /// Index that accepts nothing and counts probes.
    struct CountingIndex {
        probes: Cell<usize>,
    }

    impl PrefixIndex for CountingIndex {
        fn prefix_limit(&self) -> usize {
            6
        }

        fn may_contain(&self, _codes: &[u8]) -> bool {
            self.probes.set(self.probes.get() + 1);
            false
        }

        fn lookup_into(&self, _codes: &[u8], _out: &mut Vec<Candidate>) -> Result<(), DictError> {
            Ok(())
        }
    }

    fn count_probes(strategy: &SuggestionStrategy, input: &[u8]) -> usize {
        let index = CountingIndex { probes: Cell::new(0) };
        let mut status = SearchStatus::new(input);
        strategy.generate(&index, &mut status).unwrap();
        assert_eq!(status.checks(), index.probes.get());
        index.probes.get()
    }

    #[test]
    fn default_strategy_has_all_passes() {
        assert_eq!(default_typing_strategy().len(), 5);
    }

    #[test]
    fn disabled_passes_are_left_out() {
        let options = SuggestOptions {
            nearby_substitution: false,
            edit_distance_2: false,
            omission: false,
            deletion: false,
            ..SuggestOptions::default()
        };
        let strategy = typing_strategy(&KeyboardLayout::qwerty(), &options);
        assert_eq!(strategy.len(), 1);
        assert_eq!(count_probes(&strategy, b"door"), 1);
    }

    #[test]
    fn default_strategy_probe_count() {
        // "dog": exact 1, nearby 7+5+7, no double pass, omission 3*27,
        // deletion 2
        let expected = 1 + (7 + 5 + 7) + 3 * 27 + 2;
        assert_eq!(count_probes(&default_typing_strategy(), b"dog"), expected);
    }

    #[test]
    fn budget_caps_total_checks() {
        let options = SuggestOptions {
            max_checks: Some(10),
            ..SuggestOptions::default()
        };
        let strategy = typing_strategy(&KeyboardLayout::qwerty(), &options);
        assert_eq!(count_probes(&strategy, b"accred"), 10);
    }

    #[test]
    fn strategy_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SuggestionStrategy>();
    }
}
