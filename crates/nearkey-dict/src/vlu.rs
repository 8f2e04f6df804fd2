// Variable-length unsigned integers and the trie read cursor
//
// VLU: little-endian base-128, seven data bits per byte, high bit set on
// every byte except the last (protobuf varint layout).

use crate::DictError;

/// Maximum encoded length of a 32-bit VLU.
pub const MAX_VLU_BYTES: usize = 5;

/// Append the VLU encoding of `value` to `out`.
pub fn write_vlu(mut value: u32, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Number of bytes `write_vlu` emits for `value`.
pub fn vlu_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// A read position over one byte region.
///
/// Cursors are cheap, `Copy`, and owned by whoever is reading: every level
/// of a trie descent holds its own, so nested reads never disturb each
/// other and one blob can be searched from many threads at once.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at `pos`. The position must address a
    /// byte inside `data`.
    pub fn new(data: &'a [u8], pos: usize) -> Result<Self, DictError> {
        if pos >= data.len() {
            return Err(DictError::OffsetOutOfBounds {
                offset: pos,
                len: data.len(),
            });
        }
        Ok(Self { data, pos })
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read one byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, DictError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(DictError::UnexpectedEnd { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read one VLU.
    pub fn read_vlu(&mut self) -> Result<u32, DictError> {
        let start = self.pos;
        let mut value: u64 = 0;
        for i in 0..MAX_VLU_BYTES {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return u32::try_from(value).map_err(|_| DictError::VluOverflow { offset: start });
            }
        }
        Err(DictError::VluOverflow { offset: start })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        write_vlu(value, &mut buf);
        buf
    }

    #[test]
    fn single_byte_values() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(0x23), vec![0x23]);
        assert_eq!(encode(127), vec![0x7F]);
    }

    #[test]
    fn multi_byte_values_match_protobuf_varints() {
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xAC, 0x02]);
        assert_eq!(encode(u32::MAX), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn vlu_len_matches_encoding() {
        for value in [0, 1, 127, 128, 16_383, 16_384, 2_097_151, 2_097_152, u32::MAX] {
            assert_eq!(vlu_len(value), encode(value).len(), "value {value}");
        }
    }

    #[test]
    fn cursor_reads_sequence() {
        let mut data = Vec::new();
        write_vlu(0xE9, &mut data);
        write_vlu(70_000, &mut data);
        data.push(42);
        let mut cursor = Cursor::new(&data, 0).unwrap();
        assert_eq!(cursor.read_vlu().unwrap(), 0xE9);
        assert_eq!(cursor.read_vlu().unwrap(), 70_000);
        assert_eq!(cursor.read_u8().unwrap(), 42);
        assert_eq!(cursor.position(), data.len());
    }

    #[test]
    fn cursor_rejects_out_of_bounds_start() {
        let data = [1u8, 2, 3];
        let err = Cursor::new(&data, 3).unwrap_err();
        assert_eq!(err, DictError::OffsetOutOfBounds { offset: 3, len: 3 });
    }

    #[test]
    fn unterminated_vlu_is_an_error() {
        let data = [0x80u8, 0x80];
        let mut cursor = Cursor::new(&data, 0).unwrap();
        assert_eq!(cursor.read_vlu().unwrap_err(), DictError::UnexpectedEnd { offset: 2 });
    }

    #[test]
    fn overlong_vlu_is_an_error() {
        let data = [0xFFu8, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        let mut cursor = Cursor::new(&data, 0).unwrap();
        assert_eq!(cursor.read_vlu().unwrap_err(), DictError::VluOverflow { offset: 0 });

        // Five bytes, but the last one carries bits past bit 31.
        let data = [0xFFu8, 0xFF, 0xFF, 0xFF, 0x1F];
        let mut cursor = Cursor::new(&data, 0).unwrap();
        assert_eq!(cursor.read_vlu().unwrap_err(), DictError::VluOverflow { offset: 0 });
    }
}
