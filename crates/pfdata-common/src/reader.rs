//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor over a borrowed byte slice.
//! Every read is bounds-checked and returns a slice into the original buffer,
//! so decoding an archive never copies a blob until the caller asks for it.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// All multi-byte integers are little-endian.
///
/// # Example
///
/// ```
/// use pfdata_common::BinaryReader;
///
/// let data = [0x03, 0x00, 0x00, 0x00, b'k', b'e', b'y'];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_str_u32().unwrap(), "key");
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Get the remaining bytes as a slice.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Read a little-endian u64.
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Read a byte run prefixed with a u32 length.
    pub fn read_bytes_u32(&mut self) -> Result<&'a [u8]> {
        let length = self.read_u32()? as usize;
        self.read_bytes(length)
    }

    /// Read a byte run prefixed with a u64 length.
    pub fn read_bytes_u64(&mut self) -> Result<&'a [u8]> {
        let length = self.read_u64()?;
        let length = usize::try_from(length).map_err(|_| Error::LengthOverflow(length))?;
        self.read_bytes(length)
    }

    /// Read a UTF-8 string prefixed with a u32 length.
    pub fn read_str_u32(&mut self) -> Result<&'a str> {
        let bytes = self.read_bytes_u32()?;
        std::str::from_utf8(bytes).map_err(Error::Utf8)
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Expect specific magic bytes.
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        let actual = self.read_bytes(expected.len())?;
        if actual != expected {
            return Err(Error::InvalidMagic {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            });
        }
        Ok(())
    }

    /// Fail unless every byte has been consumed.
    pub fn expect_end(&self) -> Result<()> {
        if !self.is_empty() {
            return Err(Error::ExpectedValue {
                expected: "end of buffer".to_string(),
                actual: format!("{} trailing bytes", self.remaining()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x04030201
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, // u64
        ];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.read_u64().unwrap(), 0xFFFF_FFFF);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_length_prefixed() {
        let data = [
            0x02, 0x00, 0x00, 0x00, b'o', b'k', //
            0x01, 0, 0, 0, 0, 0, 0, 0, 0xAB,
        ];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_str_u32().unwrap(), "ok");
        assert_eq!(reader.read_bytes_u64().unwrap(), &[0xAB]);
        assert!(reader.expect_end().is_ok());
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.peek_bytes(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(reader.remaining(), 4);
        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        assert!(matches!(
            reader.read_u32(),
            Err(Error::UnexpectedEof {
                needed: 4,
                available: 2
            })
        ));
    }

    #[test]
    fn test_length_prefix_past_end() {
        let data = [0xFF, 0x00, 0x00, 0x00, b'x'];
        let mut reader = BinaryReader::new(&data);

        assert!(reader.read_bytes_u32().is_err());
    }

    #[test]
    fn test_invalid_utf8_string() {
        let data = [0x01, 0x00, 0x00, 0x00, 0xFF];
        let mut reader = BinaryReader::new(&data);

        assert!(matches!(reader.read_str_u32(), Err(Error::Utf8(_))));
    }

    #[test]
    fn test_magic_and_trailing() {
        let data = b"PFDAxx";
        let mut reader = BinaryReader::new(data);

        assert!(reader.expect_magic(b"PFDA").is_ok());
        assert!(reader.expect_end().is_err());

        let mut reader = BinaryReader::new(data);
        assert!(matches!(
            reader.expect_magic(b"PFMF"),
            Err(Error::InvalidMagic { .. })
        ));
    }
}
