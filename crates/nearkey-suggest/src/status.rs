// Search status: the shared candidate accumulator and check budget

use nearkey_core::candidate::Candidate;

/// State of one suggestion search.
///
/// Every generator appends to the same candidate list; duplicates are kept
/// and left for the ranker to resolve. Each `check` (one filter probe)
/// costs one unit via [`charge`](Self::charge). With a budget set, the
/// search stops once the budget is spent.
#[derive(Debug)]
pub struct SearchStatus<'a> {
    /// Key codes of the (truncated) input.
    input: &'a [u8],
    candidates: Vec<Candidate>,
    checks: usize,
    descents: usize,
    max_checks: Option<usize>,
}

impl<'a> SearchStatus<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            candidates: Vec::new(),
            checks: 0,
            descents: 0,
            max_checks: None,
        }
    }

    /// Limit the number of checks. `None` means unlimited.
    pub fn set_max_checks(&mut self, max_checks: Option<usize>) {
        self.max_checks = max_checks;
    }

    /// Returns `true` once the check budget is spent.
    pub fn should_abort(&self) -> bool {
        self.max_checks.is_some_and(|max| self.checks >= max)
    }

    /// Count one check.
    pub fn charge(&mut self) {
        self.checks += 1;
    }

    /// Count one trie descent (a check that passed the filter).
    pub fn record_descent(&mut self) {
        self.descents += 1;
    }

    /// The input key codes. The returned slice outlives the borrow of
    /// `self`, so generators can read it while pushing candidates.
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    pub fn checks(&self) -> usize {
        self.checks
    }

    pub fn descents(&self) -> usize {
        self.descents
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidates_mut(&mut self) -> &mut Vec<Candidate> {
        &mut self.candidates
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
