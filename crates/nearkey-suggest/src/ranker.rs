// Candidate ranking: edit distance to the typed word, then frequency

use hashbrown::HashSet;
use nearkey_core::candidate::Candidate;
use nearkey_core::character::truncate_chars;

/// A ranked suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub word: String,
    pub freq: u8,
    /// Edit distance between the typed word and the same number of
    /// leading characters of `word`.
    pub distance: usize,
}

/// Levenshtein distance calculator with a reusable scratch matrix.
///
/// Unit costs for insertion, deletion and substitution, compared over
/// Unicode scalar values.
#[derive(Debug, Default)]
pub struct Levenshtein {
    matrix: Vec<usize>,
    a: Vec<char>,
    b: Vec<char>,
}

impl Levenshtein {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distance(&mut self, a: &str, b: &str) -> usize {
        self.a.clear();
        self.a.extend(a.chars());
        self.b.clear();
        self.b.extend(b.chars());
        let (rows, cols) = (self.b.len(), self.a.len());
        if rows == 0 {
            return cols;
        }
        if cols == 0 {
            return rows;
        }

        let width = cols + 1;
        self.matrix.clear();
        self.matrix.resize((rows + 1) * width, 0);
        let m = &mut self.matrix;
        for i in 0..=rows {
            m[i * width] = i;
        }
        for j in 0..=cols {
            m[j] = j;
        }
        for i in 1..=rows {
            for j in 1..=cols {
                m[i * width + j] = if self.b[i - 1] == self.a[j - 1] {
                    m[(i - 1) * width + j - 1]
                } else {
                    1 + m[(i - 1) * width + j - 1]
                        .min(m[i * width + j - 1])
                        .min(m[(i - 1) * width + j])
                };
            }
        }
        m[rows * width + cols]
    }
}

/// One-shot Levenshtein distance.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    Levenshtein::new().distance(a, b)
}

/// Distance from `word` to the leading `word`-length characters of
/// `candidate`, so a completion of the typed word costs nothing.
fn prefix_distance(lev: &mut Levenshtein, word: &str, word_len: usize, candidate: &str) -> usize {
    lev.distance(word, truncate_chars(candidate, word_len))
}

/// Pick the best candidate for `word`.
///
/// The smallest distance wins; among equal distances the higher frequency
/// wins, and among full ties the earliest candidate. Returns `None` for an
/// empty candidate list.
pub fn rank_best(word: &str, candidates: &[Candidate]) -> Option<Suggestion> {
    let word_len = word.chars().count();
    let mut lev = Levenshtein::new();
    let mut best: Option<(usize, &Candidate)> = None;
    for candidate in candidates {
        let distance = prefix_distance(&mut lev, word, word_len, &candidate.word);
        let better = match best {
            None => true,
            Some((min, current)) => {
                distance < min || (distance == min && candidate.freq > current.freq)
            }
        };
        if better {
            best = Some((distance, candidate));
        }
    }
    best.map(|(distance, c)| Suggestion {
        word: c.word.clone(),
        freq: c.freq,
        distance,
    })
}

/// Rank distinct candidate words for `word`, best first, keeping at most
/// `limit`.
///
/// Ordered by distance, then descending frequency, then first appearance,
/// so the head of the list is always the [`rank_best`] pick.
pub fn rank_all(word: &str, candidates: &[Candidate], limit: usize) -> Vec<Suggestion> {
    let word_len = word.chars().count();
    let mut lev = Levenshtein::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(candidates.len());
    let mut ranked: Vec<Suggestion> = Vec::new();
    for candidate in candidates {
        if !seen.insert(candidate.word.as_str()) {
            continue;
        }
        ranked.push(Suggestion {
            word: candidate.word.clone(),
            freq: candidate.freq,
            distance: prefix_distance(&mut lev, word, word_len, &candidate.word),
        });
    }
    // Stable: equal keys keep first-appearance order.
    ranked.sort_by(|a, b| a.distance.cmp(&b.distance).then(b.freq.cmp(&a.freq)));
    ranked.truncate(limit);
    ranked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
