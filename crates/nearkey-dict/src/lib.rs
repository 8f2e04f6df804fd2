//! Compiled dictionary blob for the nearkey autocorrect engine.
//!
//! A dictionary is one immutable byte buffer: a two-byte header, a bloom
//! filter bit array and a serialized, delta-offset prefix trie. This crate
//! decodes it without materializing the trie and can also compile one from
//! a word list.
//!
//! # Architecture
//!
//! - [`format`] -- header parsing and validation
//! - [`vlu`] -- variable-length unsigned integers and the bounds-checked cursor
//! - [`bloom`] -- the double-hashed membership filter
//! - [`trie`] -- prefix search over the serialized trie region
//! - [`dictionary`] -- the loaded blob tying filter and trie together
//! - [`builder`] -- word list to blob compiler

pub mod bloom;
pub mod builder;
pub mod dictionary;
pub mod format;
pub mod trie;
pub mod vlu;

pub use builder::{BuildError, DictionaryBuilder};
pub use dictionary::Dictionary;
pub use trie::{TrieSearcher, TrieStats};

/// Error type for malformed dictionary blobs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DictError {
    #[error("dictionary too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("prefix limit must be at least 1")]
    InvalidPrefixLimit,
    #[error("bloom unit {0} is not a non-zero power of two")]
    InvalidBloomUnit(u8),
    #[error("bloom filter size {0} is not a non-zero power of two")]
    InvalidBloomSize(usize),
    #[error("unexpected end of trie data at offset {offset}")]
    UnexpectedEnd { offset: usize },
    #[error("variable-length integer at offset {offset} does not fit in 32 bits")]
    VluOverflow { offset: usize },
    #[error("offset {offset} is outside the trie region ({len} bytes)")]
    OffsetOutOfBounds { offset: usize, len: usize },
    #[error("child offset {child} does not follow its node at {node}")]
    InvalidChildOffset { node: usize, child: usize },
    #[error("trie node at offset {offset} lies deeper than the prefix limit {limit}")]
    TooDeep { offset: usize, limit: usize },
    #[error("trie node at offset {node} is not laid out after node {previous}")]
    NodeOutOfOrder { node: usize, previous: usize },
    #[error("invalid character code {code:#x} at offset {offset}")]
    InvalidChar { code: u32, offset: usize },
}

/// Edge list terminator: a suffix list follows.
pub const SUFFIXES_FOLLOW: u32 = b'#' as u32;

/// Edge list terminator: no suffix list at this node.
pub const NO_SUFFIXES: u32 = b'&' as u32;
