// Candidate generators: each applies one class of keyboard slip to the typed
// prefix and probes the dictionary with every resulting key code sequence.
//
// Position 0 is never deleted and nothing is inserted before it: the first
// letter of a word is assumed to be typed correctly.

use nearkey_core::character::codes_to_string;
use nearkey_core::keyboard::KeyboardLayout;
use nearkey_dict::DictError;
use tracing::trace;

use crate::PrefixIndex;
use crate::status::SearchStatus;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// One mutation pass over the input.
///
/// Generators hold only immutable tables, so one strategy can serve many
/// threads at once.
pub trait SuggestionGenerator: Send + Sync {
    /// Probe `index` with this pass's mutations of `status.input()`,
    /// appending every hit to `status`.
    fn generate(
        &self,
        index: &dyn PrefixIndex,
        status: &mut SearchStatus<'_>,
    ) -> Result<(), DictError>;
}

// ---------------------------------------------------------------------------
// Shared helper
// ---------------------------------------------------------------------------

/// Probe one key code sequence: consult the filter and, only if it admits
/// the sequence, collect the words stored under it.
pub fn check(
    index: &dyn PrefixIndex,
    status: &mut SearchStatus<'_>,
    codes: &[u8],
) -> Result<(), DictError> {
    if status.should_abort() {
        return Ok(());
    }
    status.charge();
    if !index.may_contain(codes) {
        return Ok(());
    }
    status.record_descent();
    trace!(probe = %codes_to_string(codes), "trie descent");
    index.lookup_into(codes, status.candidates_mut())
}

// =========================================================================
// Individual generators
// =========================================================================

/// The input as typed.
pub struct Exact;

impl SuggestionGenerator for Exact {
    fn generate(
        &self,
        index: &dyn PrefixIndex,
        status: &mut SearchStatus<'_>,
    ) -> Result<(), DictError> {
        let input = status.input();
        check(index, status, input)
    }
}

/// One key replaced by a physically neighbouring key.
pub struct NearbySubstitution {
    pub layout: KeyboardLayout,
}

impl SuggestionGenerator for NearbySubstitution {
    fn generate(
        &self,
        index: &dyn PrefixIndex,
        status: &mut SearchStatus<'_>,
    ) -> Result<(), DictError> {
        let mut buf = status.input().to_vec();
        for n in 0..buf.len() {
            if status.should_abort() {
                break;
            }
            let key = buf[n];
            for &near in self.layout.nearby(key) {
                buf[n] = near;
                check(index, status, &buf)?;
            }
            buf[n] = key;
        }
        Ok(())
    }
}

/// Two distinct keys each replaced by a neighbour.
///
/// Every unordered pair of positions is tried once. Inputs shorter than
/// `min_len` are skipped: on short words nearly every pair of neighbours
/// spells something.
pub struct DoubleNearbySubstitution {
    pub layout: KeyboardLayout,
    pub min_len: usize,
}

impl SuggestionGenerator for DoubleNearbySubstitution {
    fn generate(
        &self,
        index: &dyn PrefixIndex,
        status: &mut SearchStatus<'_>,
    ) -> Result<(), DictError> {
        let len = status.input_len();
        if len < self.min_len {
            return Ok(());
        }
        let mut buf = status.input().to_vec();
        for n in 0..len {
            for m in n + 1..len {
                if status.should_abort() {
                    return Ok(());
                }
                let (key1, key2) = (buf[n], buf[m]);
                for &near1 in self.layout.nearby(key1) {
                    for &near2 in self.layout.nearby(key2) {
                        buf[n] = near1;
                        buf[m] = near2;
                        check(index, status, &buf)?;
                    }
                }
                buf[n] = key1;
                buf[m] = key2;
            }
        }
        Ok(())
    }
}

/// One key missing: every alphabet key inserted after position 0.
///
/// The lengthened sequence must still fit the index's prefix limit, so at
/// most `prefix_limit - 1` input keys are kept.
pub struct Omission {
    pub alphabet: Vec<u8>,
}

impl SuggestionGenerator for Omission {
    fn generate(
        &self,
        index: &dyn PrefixIndex,
        status: &mut SearchStatus<'_>,
    ) -> Result<(), DictError> {
        let input = status.input();
        let len = input.len().min(index.prefix_limit().saturating_sub(1));
        let mut buf = vec![0u8; len + 1];
        for n in 1..=len {
            if status.should_abort() {
                break;
            }
            buf[..n].copy_from_slice(&input[..n]);
            buf[n + 1..].copy_from_slice(&input[n..len]);
            for &key in &self.alphabet {
                buf[n] = key;
                check(index, status, &buf)?;
            }
        }
        Ok(())
    }
}

/// One extra key: each key after position 0 removed in turn.
pub struct Deletion;

impl SuggestionGenerator for Deletion {
    fn generate(
        &self,
        index: &dyn PrefixIndex,
        status: &mut SearchStatus<'_>,
    ) -> Result<(), DictError> {
        let input = status.input();
        let mut buf = Vec::with_capacity(input.len());
        for n in 1..input.len() {
            buf.clear();
            buf.extend_from_slice(&input[..n]);
            buf.extend_from_slice(&input[n + 1..]);
            check(index, status, &buf)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
