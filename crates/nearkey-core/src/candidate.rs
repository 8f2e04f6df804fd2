// Dictionary candidate produced by a prefix lookup.

/// A dictionary word together with its frequency weight.
///
/// Frequencies are single-byte weights; real dictionary entries are never 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub word: String,
    pub freq: u8,
}

impl Candidate {
    pub fn new(word: impl Into<String>, freq: u8) -> Self {
        Self {
            word: word.into(),
            freq,
        }
    }
}
