// Autocorrect: top-level handle owning the dictionary, keyboard layout and
// typing strategy.
//
// The handle is immutable during a search: every call builds its own
// status and cursors, so one instance can serve any number of threads.

use nearkey_core::candidate::Candidate;
use nearkey_core::character::{string_to_codes, truncate_chars};
use nearkey_core::keyboard::KeyboardLayout;
use nearkey_dict::Dictionary;
use tracing::{debug, debug_span};

use crate::ranker::{Suggestion, rank_all, rank_best};
use crate::status::SearchStatus;
use crate::strategy::{SuggestOptions, SuggestionStrategy, typing_strategy};
use crate::{AutocorrectError, PrefixIndex};

/// Autocorrect handle over a prefix index.
///
/// ```
/// use nearkey_dict::DictionaryBuilder;
/// use nearkey_suggest::Autocorrect;
///
/// let mut builder = DictionaryBuilder::new(6)?.with_bloom_unit(1)?;
/// builder.insert("door", 120)?;
/// let autocorrect = Autocorrect::from_bytes(builder.build()?)?;
/// assert_eq!(autocorrect.suggest("dooe")?, "door");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Autocorrect<I = Dictionary> {
    index: I,
    layout: KeyboardLayout,
    options: SuggestOptions,
    strategy: SuggestionStrategy,
}

impl<D: AsRef<[u8]>> Autocorrect<Dictionary<D>> {
    /// Open a dictionary blob with the US QWERTY layout and default options.
    pub fn from_bytes(data: D) -> Result<Self, AutocorrectError> {
        let dictionary = Dictionary::from_bytes(data).map_err(AutocorrectError::Load)?;
        Ok(Self::new(dictionary))
    }
}

impl<I: PrefixIndex> Autocorrect<I> {
    pub fn new(index: I) -> Self {
        Self::with_layout(index, KeyboardLayout::qwerty())
    }

    pub fn with_layout(index: I, layout: KeyboardLayout) -> Self {
        let options = SuggestOptions::default();
        let strategy = typing_strategy(&layout, &options);
        Self {
            index,
            layout,
            options,
            strategy,
        }
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    pub fn options(&self) -> &SuggestOptions {
        &self.options
    }

    /// Replace all options at once.
    pub fn set_options(&mut self, options: SuggestOptions) {
        self.options = options;
        self.rebuild_strategy();
    }

    fn rebuild_strategy(&mut self) {
        self.strategy = typing_strategy(&self.layout, &self.options);
    }

    // =========================================================================
    // Option setters
    // =========================================================================

    /// Enable or disable the one-neighbour substitution pass.
    pub fn set_nearby_substitution(&mut self, value: bool) {
        self.options.nearby_substitution = value;
        self.rebuild_strategy();
    }

    /// Enable or disable the two-neighbour substitution pass.
    pub fn set_edit_distance_2(&mut self, value: bool) {
        self.options.edit_distance_2 = value;
        self.rebuild_strategy();
    }

    /// Set the minimum input length for the two-neighbour substitution pass.
    pub fn set_edit_distance_2_min_len(&mut self, value: usize) {
        self.options.edit_distance_2_min_len = value;
        self.rebuild_strategy();
    }

    /// Enable or disable the omitted-key pass.
    pub fn set_omission(&mut self, value: bool) {
        self.options.omission = value;
        self.rebuild_strategy();
    }

    /// Enable or disable the extra-key pass.
    pub fn set_deletion(&mut self, value: bool) {
        self.options.deletion = value;
        self.rebuild_strategy();
    }

    /// Limit the number of dictionary checks per search.
    pub fn set_max_checks(&mut self, value: Option<usize>) {
        self.options.max_checks = value;
        self.rebuild_strategy();
    }

    /// Set the length of lists returned by [`suggestions`](Self::suggestions).
    pub fn set_max_suggestions(&mut self, value: usize) {
        self.options.max_suggestions = value;
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Every dictionary word reached by some mutation of the typed prefix,
    /// in discovery order, duplicates included.
    pub fn candidates(&self, word: &str) -> Result<Vec<Candidate>, AutocorrectError> {
        if word.is_empty() {
            return Ok(Vec::new());
        }
        let prefix = truncate_chars(word, self.index.prefix_limit());
        let codes = string_to_codes(prefix);

        let mut status = SearchStatus::new(&codes);
        self.strategy.generate(&self.index, &mut status)?;
        debug!(
            checks = status.checks(),
            descents = status.descents(),
            candidates = status.candidates().len(),
            "generated candidates"
        );
        Ok(status.into_candidates())
    }

    /// The most likely intended word, or `word` itself when nothing in the
    /// dictionary comes close.
    pub fn suggest(&self, word: &str) -> Result<String, AutocorrectError> {
        let _span = debug_span!("suggest", word).entered();
        let candidates = self.candidates(word)?;
        Ok(match rank_best(word, &candidates) {
            Some(best) => best.word,
            None => word.to_string(),
        })
    }

    /// Up to `max_suggestions` distinct words, best first. Empty when
    /// nothing in the dictionary comes close.
    pub fn suggestions(&self, word: &str) -> Result<Vec<Suggestion>, AutocorrectError> {
        let _span = debug_span!("suggestions", word).entered();
        let candidates = self.candidates(word)?;
        Ok(rank_all(word, &candidates, self.options.max_suggestions))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
