// Word list to dictionary blob compiler
//
// Words are split into an indexed prefix (the first `prefix_limit`
// characters, one trie edge each) and a suffix stored in the suffix list of
// the prefix's node. Nodes are serialized bottom-up: a node's own bytes
// (edges, terminator, suffix list) are followed by its child subtrees in
// edge order, so each edge delta is the length of the previous subtree and
// the first delta is the node's own length.

use std::collections::BTreeMap;

use nearkey_core::character::to_key;
use tracing::debug;

use crate::bloom::BloomFilterBuilder;
use crate::format::{self, DictHeader};
use crate::vlu::{vlu_len, write_vlu};
use crate::{NO_SUFFIXES, SUFFIXES_FOLLOW};

/// Default number of indexed leading characters.
pub const DEFAULT_PREFIX_LIMIT: u8 = 6;

/// Default bloom filter size, in 64 KiB units (512 KiB).
pub const DEFAULT_BLOOM_UNIT: u8 = 8;

/// Error type for invalid compiler input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("prefix limit must be at least 1")]
    InvalidPrefixLimit,
    #[error("bloom unit {0} is not a non-zero power of two")]
    InvalidBloomUnit(u8),
    #[error("empty word")]
    EmptyWord,
    #[error("word {0:?} has frequency 0")]
    ZeroFrequency(String),
    #[error("word {word:?} contains reserved character {ch:?} within its indexed prefix")]
    ReservedChar { word: String, ch: char },
    #[error("word {0:?} contains a NUL character")]
    NulChar(String),
    #[error("trie subtree exceeds the 32-bit offset range")]
    TooLarge,
}

#[derive(Debug, Default)]
struct BuildNode {
    children: BTreeMap<char, BuildNode>,
    suffixes: BTreeMap<String, u8>,
}

impl BuildNode {
    fn count(&self) -> usize {
        1 + self.children.values().map(BuildNode::count).sum::<usize>()
    }

    /// Set both hash bits for the key codes of every path below this node.
    fn mark(&self, codes: &mut Vec<u8>, bloom: &mut BloomFilterBuilder) {
        for (&ch, child) in &self.children {
            codes.push(to_key(ch));
            bloom.insert(codes);
            child.mark(codes, bloom);
            codes.pop();
        }
    }

    /// Terminator and suffix list.
    fn tail(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if self.suffixes.is_empty() {
            write_vlu(NO_SUFFIXES, &mut buf);
            return buf;
        }
        write_vlu(SUFFIXES_FOLLOW, &mut buf);
        for (suffix, &freq) in &self.suffixes {
            buf.push(freq);
            for c in suffix.chars() {
                write_vlu(c as u32, &mut buf);
            }
            write_vlu(0, &mut buf);
        }
        buf.push(0);
        buf
    }

    fn serialize(&self) -> Result<Vec<u8>, BuildError> {
        let subtrees = self
            .children
            .values()
            .map(BuildNode::serialize)
            .collect::<Result<Vec<_>, _>>()?;

        // deltas[0] is patched below once the node's own length is known.
        let mut deltas = std::iter::once(0)
            .chain(subtrees.iter().map(Vec::len))
            .take(subtrees.len())
            .map(|len| u32::try_from(len).map_err(|_| BuildError::TooLarge))
            .collect::<Result<Vec<u32>, _>>()?;

        let tail = self.tail();
        let edges_len = |first: u32| -> usize {
            self.children
                .keys()
                .zip(&deltas)
                .enumerate()
                .map(|(i, (&ch, &delta))| {
                    let delta = if i == 0 { first } else { delta };
                    vlu_len(ch as u32) + vlu_len(delta)
                })
                .sum()
        };

        // The first delta encodes the node's own length, which includes the
        // first delta's encoding. Grow until the two agree.
        let mut own_len = edges_len(0) + tail.len();
        loop {
            let first = u32::try_from(own_len).map_err(|_| BuildError::TooLarge)?;
            let next = edges_len(first) + tail.len();
            if next == own_len {
                break;
            }
            own_len = next;
        }
        if let Some(first) = deltas.first_mut() {
            *first = u32::try_from(own_len).map_err(|_| BuildError::TooLarge)?;
        }

        let total = own_len + subtrees.iter().map(Vec::len).sum::<usize>();
        let mut buf = Vec::with_capacity(total);
        for (&ch, &delta) in self.children.keys().zip(&deltas) {
            write_vlu(ch as u32, &mut buf);
            write_vlu(delta, &mut buf);
        }
        buf.extend_from_slice(&tail);
        debug_assert_eq!(buf.len(), own_len);
        for subtree in subtrees {
            buf.extend(subtree);
        }
        Ok(buf)
    }
}

/// Compiles a word list into a dictionary blob.
///
/// ```
/// use nearkey_dict::{Dictionary, DictionaryBuilder};
///
/// let mut builder = DictionaryBuilder::new(6)?.with_bloom_unit(1)?;
/// builder.insert("door", 120)?;
/// let dict = Dictionary::from_bytes(builder.build()?)?;
/// assert_eq!(dict.lookup_prefix(b"door")?[0].word, "door");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct DictionaryBuilder {
    prefix_limit: u8,
    bloom_unit: u8,
    root: BuildNode,
    words: usize,
}

impl DictionaryBuilder {
    pub fn new(prefix_limit: u8) -> Result<Self, BuildError> {
        if prefix_limit == 0 {
            return Err(BuildError::InvalidPrefixLimit);
        }
        Ok(Self {
            prefix_limit,
            bloom_unit: DEFAULT_BLOOM_UNIT,
            root: BuildNode::default(),
            words: 0,
        })
    }

    /// Set the bloom filter size in 64 KiB units.
    pub fn with_bloom_unit(mut self, unit: u8) -> Result<Self, BuildError> {
        format::validate_bloom_unit(unit).map_err(|_| BuildError::InvalidBloomUnit(unit))?;
        self.bloom_unit = unit;
        Ok(self)
    }

    /// Number of `insert` calls accepted so far, duplicates included.
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Add a word. Inserting the same word again adds to its frequency,
    /// saturating at 255.
    pub fn insert(&mut self, word: &str, freq: u8) -> Result<(), BuildError> {
        if word.is_empty() {
            return Err(BuildError::EmptyWord);
        }
        if freq == 0 {
            return Err(BuildError::ZeroFrequency(word.to_string()));
        }
        if word.contains('\0') {
            return Err(BuildError::NulChar(word.to_string()));
        }

        let split = word
            .char_indices()
            .nth(self.prefix_limit as usize)
            .map_or(word.len(), |(i, _)| i);
        let (prefix, suffix) = word.split_at(split);

        if let Some(ch) = prefix
            .chars()
            .find(|&c| c as u32 == SUFFIXES_FOLLOW || c as u32 == NO_SUFFIXES)
        {
            return Err(BuildError::ReservedChar {
                word: word.to_string(),
                ch,
            });
        }

        let mut node = &mut self.root;
        for ch in prefix.chars() {
            node = node.children.entry(ch).or_default();
        }
        let slot = node.suffixes.entry(suffix.to_string()).or_insert(0);
        *slot = slot.saturating_add(freq);
        self.words += 1;
        Ok(())
    }

    /// Serialize header, bloom filter and trie.
    pub fn build(&self) -> Result<Vec<u8>, BuildError> {
        let header = DictHeader {
            prefix_limit: self.prefix_limit,
            bloom_unit: self.bloom_unit,
        };
        let mut bloom = BloomFilterBuilder::new(header.bloom_size())
            .map_err(|_| BuildError::InvalidBloomUnit(self.bloom_unit))?;
        self.root.mark(&mut Vec::new(), &mut bloom);
        let trie = self.root.serialize()?;

        let mut blob = Vec::with_capacity(header.trie_offset() + trie.len());
        blob.extend_from_slice(&header.to_bytes());
        blob.extend(bloom.into_bytes());
        blob.extend(trie);

        debug!(
            words = self.words,
            nodes = self.root.count(),
            bytes = blob.len(),
            "compiled dictionary"
        );
        Ok(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dictionary, TrieStats};
    use nearkey_core::candidate::Candidate;
    use nearkey_core::character::string_to_codes;

    fn builder(prefix_limit: u8) -> DictionaryBuilder {
        DictionaryBuilder::new(prefix_limit)
            .unwrap()
            .with_bloom_unit(1)
            .unwrap()
    }

    fn sorted(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.sort_by(|a, b| a.word.cmp(&b.word));
        candidates
    }

    #[test]
    fn every_word_is_found_under_its_prefix() {
        let words = [
            ("door", 120),
            ("doors", 60),
            ("do", 200),
            ("accredit", 90),
            ("accreditation", 30),
            ("Paris", 80),
            ("caf\u{e9}", 70),
        ];
        let mut b = builder(6);
        for (w, f) in words {
            b.insert(w, f).unwrap();
        }
        let dict = Dictionary::from_bytes(b.build().unwrap()).unwrap();
        for (w, f) in words {
            let prefix: String = w.chars().take(6).collect();
            let found = dict.lookup_prefix(&string_to_codes(&prefix)).unwrap();
            assert!(
                found.contains(&Candidate::new(w, f)),
                "{w} missing from {found:?}"
            );
        }
    }

    #[test]
    fn lookup_is_fold_insensitive() {
        let mut b = builder(6);
        b.insert("Paris", 80).unwrap();
        b.insert("caf\u{e9}", 70).unwrap();
        let dict = Dictionary::from_bytes(b.build().unwrap()).unwrap();
        assert_eq!(dict.lookup_prefix(b"paris").unwrap(), vec![Candidate::new("Paris", 80)]);
        assert_eq!(
            dict.lookup_prefix(b"cafe").unwrap(),
            vec![Candidate::new("caf\u{e9}", 70)]
        );
    }

    #[test]
    fn duplicate_words_sum_and_saturate() {
        let mut b = builder(6);
        b.insert("door", 200).unwrap();
        b.insert("door", 100).unwrap();
        b.insert("dog", 3).unwrap();
        b.insert("dog", 4).unwrap();
        assert_eq!(b.len(), 4);
        let dict = Dictionary::from_bytes(b.build().unwrap()).unwrap();
        assert_eq!(dict.lookup_prefix(b"door").unwrap(), vec![Candidate::new("door", 255)]);
        assert_eq!(dict.lookup_prefix(b"dog").unwrap(), vec![Candidate::new("dog", 7)]);
    }

    #[test]
    fn output_is_independent_of_insertion_order() {
        let words = [("door", 1), ("dog", 2), ("accredit", 3), ("zebra", 4), ("do", 5)];
        let mut forward = builder(4);
        let mut backward = builder(4);
        for (w, f) in words {
            forward.insert(w, f).unwrap();
        }
        for (w, f) in words.iter().rev() {
            backward.insert(w, *f).unwrap();
        }
        assert_eq!(forward.build().unwrap(), backward.build().unwrap());
    }

    #[test]
    fn every_trie_path_passes_the_filter() {
        let mut b = builder(5);
        for w in ["door", "dooe", "accredit", "Zebra", "na\u{ef}ve"] {
            b.insert(w, 1).unwrap();
        }
        let dict = Dictionary::from_bytes(b.build().unwrap()).unwrap();
        for entry in dict.trie().entries().unwrap() {
            let codes = string_to_codes(&entry.word);
            for len in 1..=codes.len().min(5) {
                assert!(dict.may_contain(&codes[..len]), "{:?}", &codes[..len]);
            }
        }
    }

    #[test]
    fn wide_node_needs_multi_byte_first_delta() {
        // 64 two-byte edge characters: the root's own length exceeds 127.
        let mut b = builder(1);
        let chars: Vec<char> = (0xC0u32..0x100).filter_map(char::from_u32).collect();
        for &c in &chars {
            b.insert(&c.to_string(), 1).unwrap();
        }
        let dict = Dictionary::from_bytes(b.build().unwrap()).unwrap();
        let entries = dict.trie().entries().unwrap();
        let mut found: Vec<char> = entries.iter().filter_map(|e| e.word.chars().next()).collect();
        found.sort_unstable();
        assert_eq!(found, chars);
        assert_eq!(
            dict.validate().unwrap(),
            TrieStats {
                nodes: 65,
                edges: 64,
                entries: 64,
                max_depth: 1
            }
        );
    }

    #[test]
    fn many_words_round_trip() {
        let mut b = builder(3);
        let mut expected = Vec::new();
        for x in 'a'..='z' {
            for y in 'a'..='z' {
                let word = format!("{x}{y}{y}tail{x}");
                b.insert(&word, 1 + (x as u8 % 200)).unwrap();
                expected.push(Candidate::new(word, 1 + (x as u8 % 200)));
            }
        }
        let dict = Dictionary::from_bytes(b.build().unwrap()).unwrap();
        assert_eq!(sorted(dict.trie().entries().unwrap()), sorted(expected));
        assert_eq!(
            dict.lookup_prefix(b"qrr").unwrap(),
            vec![Candidate::new("qrrtailq", 1 + (b'q' % 200))]
        );
    }

    #[test]
    fn sentinel_characters_are_allowed_in_suffixes_only() {
        let mut b = builder(3);
        assert_eq!(
            b.insert("a#b", 1).unwrap_err(),
            BuildError::ReservedChar {
                word: "a#b".into(),
                ch: '#'
            }
        );
        assert!(matches!(
            b.insert("&&", 1).unwrap_err(),
            BuildError::ReservedChar { ch: '&', .. }
        ));
        b.insert("abc#&", 4).unwrap();
        let dict = Dictionary::from_bytes(b.build().unwrap()).unwrap();
        assert_eq!(dict.lookup_prefix(b"abc").unwrap(), vec![Candidate::new("abc#&", 4)]);
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(DictionaryBuilder::new(0).unwrap_err(), BuildError::InvalidPrefixLimit);
        assert_eq!(
            DictionaryBuilder::new(6).unwrap().with_bloom_unit(3).unwrap_err(),
            BuildError::InvalidBloomUnit(3)
        );
        let mut b = builder(6);
        assert_eq!(b.insert("", 1).unwrap_err(), BuildError::EmptyWord);
        assert_eq!(b.insert("door", 0).unwrap_err(), BuildError::ZeroFrequency("door".into()));
        assert_eq!(
            b.insert("doorstep\0", 1).unwrap_err(),
            BuildError::NulChar("doorstep\0".into())
        );
        assert!(b.is_empty());
    }

    #[test]
    fn empty_builder_yields_loadable_blob() {
        let blob = builder(6).build().unwrap();
        let dict = Dictionary::from_bytes(blob).unwrap();
        assert_eq!(dict.validate().unwrap().nodes, 1);
        assert!(dict.lookup_prefix(b"a").unwrap().is_empty());
    }
}
