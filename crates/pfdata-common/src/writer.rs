//! Binary writer, the counterpart of [`BinaryReader`](crate::BinaryReader).

use zerocopy::{Immutable, IntoBytes};

use crate::{Error, Result};

/// Little-endian writer into an owned buffer.
///
/// # Example
///
/// ```
/// use pfdata_common::{BinaryReader, BinaryWriter};
///
/// let mut writer = BinaryWriter::new();
/// writer.write_str_u32("key").unwrap();
/// writer.write_bytes_u64(b"blob");
///
/// let bytes = writer.into_inner();
/// let mut reader = BinaryReader::new(&bytes);
/// assert_eq!(reader.read_str_u32().unwrap(), "key");
/// assert_eq!(reader.read_bytes_u64().unwrap(), b"blob");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with a pre-sized buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Borrow the bytes written so far.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Mutable access to already written bytes, for back-patching headers.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Consume the writer and return the buffer.
    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Write a little-endian u32.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Write a little-endian u64.
    #[inline]
    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Write a byte run prefixed with its u32 length.
    pub fn write_bytes_u32(&mut self, bytes: &[u8]) -> Result<()> {
        let length = u32::try_from(bytes.len()).map_err(|_| Error::FieldOverflow {
            length: bytes.len(),
            width: 32,
        })?;
        self.write_u32(length);
        self.write_bytes(bytes);
        Ok(())
    }

    /// Write a byte run prefixed with its u64 length.
    pub fn write_bytes_u64(&mut self, bytes: &[u8]) {
        self.write_u64(bytes.len() as u64);
        self.write_bytes(bytes);
    }

    /// Write a UTF-8 string prefixed with its u32 length.
    #[inline]
    pub fn write_str_u32(&mut self, value: &str) -> Result<()> {
        self.write_bytes_u32(value.as_bytes())
    }

    /// Write a struct using zerocopy.
    #[inline]
    pub fn write_struct<T: IntoBytes + Immutable>(&mut self, value: &T) {
        self.write_bytes(value.as_bytes());
    }
}
