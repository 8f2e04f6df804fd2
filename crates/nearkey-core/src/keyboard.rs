// Keyboard adjacency model: which keys sit physically near each key.
//
// Feeds the substitution and insertion passes of the candidate generator.

use hashbrown::HashMap;

/// US QWERTY layout: each key with the keys surrounding it.
///
/// Table order is significant. It fixes the alphabet order used for
/// insertion candidates and the order in which substitutions are tried.
pub const QWERTY_US: &[(u8, &[u8])] = &[
    (b'q', b"was"),
    (b'w', b"qasde"),
    (b'e', b"wsdfr"),
    (b'r', b"edfgt"),
    (b't', b"rfghy"),
    (b'y', b"tghju"),
    (b'u', b"yhjki"),
    (b'i', b"ujklo"),
    (b'o', b"ikl'p"),
    (b'p', b"ol'"),
    (b'a', b"qws"),
    (b's', b"aqwedz"),
    (b'd', b"swerfxz"),
    (b'f', b"dertgcx"),
    (b'g', b"frtyhvc"),
    (b'h', b"gtyujbv"),
    (b'j', b"hyuiknb"),
    (b'k', b"juiolmn"),
    (b'l', b"kiop'm"),
    (b'\'', b"lop"),
    (b'z', b"sdx"),
    (b'x', b"zdfc"),
    (b'c', b"xfgv"),
    (b'v', b"cghb"),
    (b'b', b"vhjn"),
    (b'n', b"bjkm"),
    (b'm', b"nkl"),
];

/// Immutable key adjacency map plus the alphabet of known keys.
#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    /// Every key of the layout, in table order.
    alphabet: Vec<u8>,
    /// Key code to its ordered nearby keys.
    nearby: HashMap<u8, Vec<u8>>,
}

impl KeyboardLayout {
    /// Build a layout from a `(key, nearby keys)` table.
    ///
    /// Later duplicates of a key replace earlier ones but keep the key's
    /// first position in the alphabet.
    pub fn from_table(table: &[(u8, &[u8])]) -> Self {
        let mut alphabet = Vec::with_capacity(table.len());
        let mut nearby = HashMap::with_capacity(table.len());
        for &(key, keys) in table {
            if nearby.insert(key, keys.to_vec()).is_none() {
                alphabet.push(key);
            }
        }
        Self { alphabet, nearby }
    }

    /// The US QWERTY layout.
    pub fn qwerty() -> Self {
        Self::from_table(QWERTY_US)
    }

    /// Keys physically near `key`. Unknown keys (digits, punctuation the
    /// layout does not describe) have no neighbours.
    pub fn nearby(&self, key: u8) -> &[u8] {
        self.nearby.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All keys of the layout, in table order.
    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    pub fn len(&self) -> usize {
        self.alphabet.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alphabet.is_empty()
    }
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::qwerty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
