//! Shared building blocks for the nearkey autocorrect engine.
//!
//! - [`character`] -- key normalization (case folding, diacritic stripping)
//! - [`keyboard`] -- keyboard adjacency tables
//! - [`candidate`] -- the `(word, frequency)` pair returned by lookups

pub mod candidate;
pub mod character;
pub mod keyboard;

pub use candidate::Candidate;
pub use keyboard::KeyboardLayout;
