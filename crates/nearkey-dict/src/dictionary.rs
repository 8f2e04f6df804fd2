// Loaded dictionary blob: header, bloom filter view and trie searcher

use nearkey_core::candidate::Candidate;
use tracing::debug;

use crate::bloom::BloomFilter;
use crate::format::{self, DictHeader};
use crate::trie::{TrieSearcher, TrieStats};
use crate::DictError;

/// An immutable, validated dictionary blob.
///
/// Generic over its backing storage so a blob can be owned (`Vec<u8>`),
/// borrowed (`&[u8]`) or memory-mapped. Nothing is copied or decoded up
/// front beyond the header; the bloom filter and trie are read in place.
///
/// A `Dictionary` is `Send + Sync` whenever its storage is: lookups keep
/// their read positions on the caller's stack.
pub struct Dictionary<D = Vec<u8>> {
    data: D,
    header: DictHeader,
}

impl<D: AsRef<[u8]>> std::fmt::Debug for Dictionary<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("prefix_limit", &self.header.prefix_limit)
            .field("bloom_size", &self.header.bloom_size())
            .field("trie_len", &self.trie_region().len())
            .finish()
    }
}

impl<D: AsRef<[u8]>> Dictionary<D> {
    /// Open a blob, validating its header and region sizes.
    ///
    /// The trie itself is checked lazily, on each lookup; call
    /// [`validate`](Self::validate) to walk it eagerly.
    pub fn from_bytes(data: D) -> Result<Self, DictError> {
        let header = format::parse_header(data.as_ref())?;
        let dict = Self { data, header };
        debug!(
            prefix_limit = header.prefix_limit,
            bloom_size = header.bloom_size(),
            trie_len = dict.trie_region().len(),
            "loaded dictionary"
        );
        Ok(dict)
    }

    pub fn header(&self) -> DictHeader {
        self.header
    }

    /// Maximum number of leading characters the trie indexes.
    pub fn prefix_limit(&self) -> usize {
        self.header.prefix_limit as usize
    }

    /// The raw blob.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn bloom_region(&self) -> &[u8] {
        let start = self.header.bloom_offset();
        &self.as_bytes()[start..start + self.header.bloom_size()]
    }

    fn trie_region(&self) -> &[u8] {
        &self.as_bytes()[self.header.trie_offset()..]
    }

    /// The membership filter.
    pub fn bloom(&self) -> BloomFilter<'_> {
        BloomFilter::from_validated(self.bloom_region())
    }

    /// The trie searcher.
    pub fn trie(&self) -> TrieSearcher<'_> {
        TrieSearcher::new(self.trie_region(), self.prefix_limit())
    }

    /// Whether the key codes may name an indexed prefix (both hashes set).
    pub fn may_contain(&self, codes: &[u8]) -> bool {
        self.bloom().may_contain(codes)
    }

    /// Words stored under the key code prefix. Does not consult the filter.
    pub fn lookup_prefix(&self, codes: &[u8]) -> Result<Vec<Candidate>, DictError> {
        self.trie().lookup_prefix(codes)
    }

    /// Walk the entire trie, failing on the first structural error.
    pub fn validate(&self) -> Result<TrieStats, DictError> {
        let stats = self.trie().stats()?;
        debug!(
            nodes = stats.nodes,
            edges = stats.edges,
            entries = stats.entries,
            "validated dictionary"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DictionaryBuilder;
    use crate::format::BLOOM_UNIT_BYTES;
    use nearkey_core::character::string_to_codes;

    fn build(words: &[(&str, u8)]) -> Vec<u8> {
        let mut builder = DictionaryBuilder::new(6).unwrap().with_bloom_unit(1).unwrap();
        for &(w, f) in words {
            builder.insert(w, f).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn opens_built_blob() {
        let blob = build(&[("door", 120), ("accredit", 90)]);
        let dict = Dictionary::from_bytes(blob).unwrap();
        assert_eq!(dict.prefix_limit(), 6);
        assert_eq!(dict.bloom().size(), BLOOM_UNIT_BYTES);
    }

    #[test]
    fn borrowed_storage_works() {
        let blob = build(&[("door", 120)]);
        let dict = Dictionary::from_bytes(blob.as_slice()).unwrap();
        assert_eq!(dict.lookup_prefix(b"door").unwrap(), vec![Candidate::new("door", 120)]);
    }

    #[test]
    fn long_words_are_split_at_prefix_limit() {
        let blob = build(&[("accredit", 90), ("accredited", 40)]);
        let dict = Dictionary::from_bytes(blob).unwrap();
        let mut found = dict.lookup_prefix(&string_to_codes("accred")).unwrap();
        found.sort_by(|a, b| a.word.cmp(&b.word));
        assert_eq!(
            found,
            vec![Candidate::new("accredit", 90), Candidate::new("accredited", 40)]
        );
        // Shorter prefixes hold no entries of their own.
        assert!(dict.lookup_prefix(b"accre").unwrap().is_empty());
    }

    #[test]
    fn validate_reports_stats() {
        let blob = build(&[("do", 1), ("door", 2), ("dog", 3)]);
        let dict = Dictionary::from_bytes(blob).unwrap();
        let stats = dict.validate().unwrap();
        assert_eq!(stats.entries, 3);
        // root, d, do, doo, door, dog
        assert_eq!(stats.nodes, 6);
        assert_eq!(stats.max_depth, 4);
    }

    #[test]
    fn corrupt_trie_fails_validation() {
        let mut blob = build(&[("door", 120)]);
        let trie_start = 2 + BLOOM_UNIT_BYTES;
        // Point the root's only edge far past the end of the blob.
        blob.truncate(trie_start);
        blob.extend_from_slice(&[b'd', 0x7F, b'&']);
        let dict = Dictionary::from_bytes(blob).unwrap();
        assert!(matches!(
            dict.validate().unwrap_err(),
            DictError::OffsetOutOfBounds { offset: 127, .. }
        ));
        assert!(dict.lookup_prefix(b"d").is_err());
    }

    #[test]
    fn trie_deeper_than_prefix_limit_fails_validation() {
        let mut blob = vec![6u8, 1];
        blob.resize(2 + BLOOM_UNIT_BYTES, 0);
        for _ in 0..20 {
            blob.extend_from_slice(&[b'a', 3, b'&']);
        }
        blob.push(b'&');
        let dict = Dictionary::from_bytes(blob).unwrap();
        assert_eq!(
            dict.validate().unwrap_err(),
            DictError::TooDeep { offset: 21, limit: 6 }
        );
    }

    #[test]
    fn rejects_bad_header() {
        let err = Dictionary::from_bytes(vec![6u8, 3, 0]).unwrap_err();
        assert_eq!(err, DictError::InvalidBloomUnit(3));
    }

    #[test]
    fn dictionary_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dictionary<Vec<u8>>>();
        assert_send_sync::<Dictionary<&'static [u8]>>();
    }
}
