//! Typo-tolerant word suggestion over a compiled nearkey dictionary.
//!
//! Given a partially or fully typed word, [`Autocorrect::suggest`] proposes
//! the most likely intended word. Candidates come from mutating the typed
//! prefix the way fingers slip on a keyboard (neighbouring keys, a missing
//! or an extra letter) and looking each mutation up in the dictionary; the
//! closest, most frequent candidate wins.
//!
//! # Architecture
//!
//! - [`generators`] -- one [`SuggestionGenerator`] per mutation pass
//! - [`status`] -- the shared candidate accumulator and check budget
//! - [`strategy`] -- ordered generator pipelines and their options
//! - [`ranker`] -- Levenshtein distance and the final selection
//! - [`autocorrect`] -- the [`Autocorrect`] handle tying it together

pub mod autocorrect;
pub mod generators;
pub mod ranker;
pub mod status;
pub mod strategy;

pub use autocorrect::Autocorrect;
pub use generators::SuggestionGenerator;
pub use ranker::{Levenshtein, Suggestion, levenshtein_distance, rank_all, rank_best};
pub use status::SearchStatus;
pub use strategy::{SuggestOptions, SuggestionStrategy, default_typing_strategy, typing_strategy};

use nearkey_core::candidate::Candidate;
use nearkey_dict::{DictError, Dictionary};

/// Error type for suggestion failures.
#[derive(Debug, thiserror::Error)]
pub enum AutocorrectError {
    /// The dictionary blob could not be opened.
    #[error("failed to load dictionary: {0}")]
    Load(#[source] DictError),

    /// A lookup ran into a structurally broken part of the dictionary.
    #[error("dictionary lookup failed: {0}")]
    Dictionary(#[from] DictError),
}

/// A prefix-searchable word index.
///
/// Generators only ever talk to the dictionary through this trait, so they
/// can be exercised against small in-memory fakes.
pub trait PrefixIndex {
    /// Maximum number of leading characters the index distinguishes.
    fn prefix_limit(&self) -> usize;

    /// Cheap pre-check. `false` means the prefix is definitely absent.
    fn may_contain(&self, codes: &[u8]) -> bool;

    /// Append every word stored under the key code prefix to `out`.
    fn lookup_into(&self, codes: &[u8], out: &mut Vec<Candidate>) -> Result<(), DictError>;
}

impl<D: AsRef<[u8]>> PrefixIndex for Dictionary<D> {
    fn prefix_limit(&self) -> usize {
        Dictionary::prefix_limit(self)
    }

    fn may_contain(&self, codes: &[u8]) -> bool {
        Dictionary::may_contain(self, codes)
    }

    fn lookup_into(&self, codes: &[u8], out: &mut Vec<Candidate>) -> Result<(), DictError> {
        self.trie().lookup_into(codes, out)
    }
}
