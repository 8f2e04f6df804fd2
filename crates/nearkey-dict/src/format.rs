// Dictionary blob header: prefix limit and bloom filter size

use crate::DictError;

/// Size of the dictionary header in bytes.
pub const HEADER_SIZE: usize = 2;

/// Bloom filter allocation unit (64 KiB).
pub const BLOOM_UNIT_BYTES: usize = 64 * 1024;

/// Parsed dictionary header.
///
/// The header occupies the first two bytes of a blob:
/// - byte 0: prefix limit (maximum number of indexed leading characters)
/// - byte 1: bloom unit (bloom filter size in 64 KiB units)
///
/// The bloom filter follows immediately, then the trie region runs to the
/// end of the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictHeader {
    pub prefix_limit: u8,
    pub bloom_unit: u8,
}

impl DictHeader {
    /// Bloom filter size in bytes.
    pub fn bloom_size(&self) -> usize {
        self.bloom_unit as usize * BLOOM_UNIT_BYTES
    }

    /// Byte offset of the bloom filter within the blob.
    pub fn bloom_offset(&self) -> usize {
        HEADER_SIZE
    }

    /// Byte offset of the trie root within the blob.
    pub fn trie_offset(&self) -> usize {
        HEADER_SIZE + self.bloom_size()
    }

    /// Serialize the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        [self.prefix_limit, self.bloom_unit]
    }
}

/// Check that a bloom unit yields a power-of-two filter size.
pub fn validate_bloom_unit(unit: u8) -> Result<(), DictError> {
    if unit.is_power_of_two() {
        Ok(())
    } else {
        Err(DictError::InvalidBloomUnit(unit))
    }
}

/// Parse and validate the header of a dictionary blob.
///
/// Also checks that the blob is long enough to hold the whole bloom filter
/// and at least one trie byte (the root's terminator).
pub fn parse_header(data: &[u8]) -> Result<DictHeader, DictError> {
    if data.len() < HEADER_SIZE {
        return Err(DictError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }

    let header = DictHeader {
        prefix_limit: data[0],
        bloom_unit: data[1],
    };

    if header.prefix_limit == 0 {
        return Err(DictError::InvalidPrefixLimit);
    }
    validate_bloom_unit(header.bloom_unit)?;

    let expected = header.trie_offset() + 1;
    if data.len() < expected {
        return Err(DictError::TooShort {
            expected,
            actual: data.len(),
        });
    }

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_blob(prefix_limit: u8, bloom_unit: u8, trie: &[u8]) -> Vec<u8> {
        let mut buf = vec![prefix_limit, bloom_unit];
        buf.resize(HEADER_SIZE + bloom_unit as usize * BLOOM_UNIT_BYTES, 0);
        buf.extend_from_slice(trie);
        buf
    }

    #[test]
    fn parse_valid_header() {
        let data = make_blob(6, 1, b"&");
        let header = parse_header(&data).unwrap();
        assert_eq!(header.prefix_limit, 6);
        assert_eq!(header.bloom_unit, 1);
        assert_eq!(header.bloom_size(), 65536);
        assert_eq!(header.trie_offset(), 65538);
    }

    #[test]
    fn reject_too_short() {
        let err = parse_header(&[6]).unwrap_err();
        assert_eq!(
            err,
            DictError::TooShort {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn reject_truncated_bloom_region() {
        let mut data = make_blob(6, 1, b"&");
        data.truncate(1000);
        let err = parse_header(&data).unwrap_err();
        assert!(matches!(err, DictError::TooShort { expected: 65539, actual: 1000 }));
    }

    #[test]
    fn reject_missing_trie_region() {
        let data = make_blob(6, 1, b"");
        let err = parse_header(&data).unwrap_err();
        assert!(matches!(err, DictError::TooShort { .. }));
    }

    #[test]
    fn reject_zero_prefix_limit() {
        let data = make_blob(0, 1, b"&");
        assert_eq!(parse_header(&data).unwrap_err(), DictError::InvalidPrefixLimit);
    }

    #[test]
    fn reject_non_power_of_two_bloom_unit() {
        let data = [6u8, 3];
        assert_eq!(parse_header(&data).unwrap_err(), DictError::InvalidBloomUnit(3));
        let data = [6u8, 0];
        assert_eq!(parse_header(&data).unwrap_err(), DictError::InvalidBloomUnit(0));
    }

    #[test]
    fn header_round_trips_through_bytes() {
        let header = DictHeader {
            prefix_limit: 6,
            bloom_unit: 8,
        };
        assert_eq!(header.to_bytes(), [6, 8]);
        assert_eq!(header.bloom_size(), 512 * 1024);
    }
}
