// Key normalization: case folding, diacritic stripping, byte-code conversion
//
// Every character that takes part in a dictionary lookup is reduced to a
// single byte "key code". Matching against the trie and hashing for the
// bloom filter both operate on these codes.

/// Convert a character to its simple lowercase equivalent.
///
/// Uses Rust's built-in Unicode case mapping. For characters with
/// multi-character lowercase expansions, returns only the first character.
pub fn simple_lower(c: char) -> char {
    let mut iter = c.to_lowercase();
    iter.next().unwrap_or(c)
}

/// Fold an accented lowercase character to its base character.
///
/// Characters without a mapping are returned unchanged. The input is
/// expected to be lowercase already.
pub fn fold_diacritic(c: char) -> char {
    match c {
        '\u{00E0}'..='\u{00E5}' => 'a', // à á â ã ä å
        '\u{00E7}' => 'c',              // ç
        '\u{00E8}'..='\u{00EB}' => 'e', // è é ê ë
        '\u{00EC}'..='\u{00EF}' => 'i', // ì í î ï
        '\u{00F1}' => 'n',              // ñ
        '\u{00F2}'..='\u{00F6}' => 'o', // ò ó ô õ ö
        '\u{00F9}'..='\u{00FC}' => 'u', // ù ú û ü
        '\u{00FD}' | '\u{00FF}' => 'y', // ý ÿ
        '\u{2019}' => '\'',             // RIGHT SINGLE QUOTATION MARK
        _ => c,
    }
}

/// Map a raw input character to its lookup key code.
///
/// Lower-cases, folds diacritics, then truncates the code point to a byte.
/// Code points above U+00FF that survive folding alias onto Latin-1 codes;
/// the dictionary format only distinguishes byte-sized keys.
pub fn to_key(c: char) -> u8 {
    fold_diacritic(simple_lower(c)) as u32 as u8
}

/// Case- and diacritic-insensitive comparison of a character against a key code.
#[inline]
pub fn matches_key(c: char, code: u8) -> bool {
    to_key(c) == code
}

/// Convert a word into its key code sequence, one code per character.
pub fn string_to_codes(word: &str) -> Vec<u8> {
    word.chars().map(to_key).collect()
}

/// Convert key codes back into a string, reading each code as a Latin-1
/// code point.
pub fn codes_to_string(codes: &[u8]) -> String {
    codes.iter().map(|&b| char::from(b)).collect()
}

/// Return the prefix of `word` holding at most `limit` characters.
pub fn truncate_chars(word: &str, limit: usize) -> &str {
    match word.char_indices().nth(limit) {
        Some((idx, _)) => &word[..idx],
        None => word,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
