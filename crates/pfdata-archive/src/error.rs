//! Error types for the archive crate.

use thiserror::Error;

use crate::keys::{DisplayKey, StorageKey};

/// Errors that can occur when working with resource archives.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file (or its embedded manifest) could not be decoded.
    #[error("corrupt archive: {0}")]
    CorruptArchive(#[from] Corruption),

    /// The archive could not be encoded.
    #[error("cannot encode archive: {0}")]
    Encode(#[source] pfdata_common::Error),

    /// Storage key not present in the archive.
    #[error("storage key not found: {0}")]
    NotFound(StorageKey),

    /// Display key not present in the manifest.
    #[error("display key not in manifest: {0}")]
    DisplayKeyNotFound(DisplayKey),

    /// The manifest blob may only be changed through `replace_manifest`.
    #[error("storage key {0} is reserved for the manifest")]
    ReservedKey(StorageKey),
}

/// Why an archive or manifest failed to decode.
#[derive(Debug, Error)]
pub enum Corruption {
    /// Truncated input, bad magic, bad length prefix or invalid UTF-8 key.
    #[error("{0}")]
    Framing(#[from] pfdata_common::Error),

    /// Format version this build does not understand.
    #[error("unsupported {container} version {found} (expected {expected})")]
    UnsupportedVersion {
        container: &'static str,
        found: u16,
        expected: u16,
    },

    /// A reserved header field is non-zero.
    #[error("reserved {container} header field is {value:#06x}, expected 0")]
    ReservedField { container: &'static str, value: u16 },

    /// CRC32C of the entry table does not match the header.
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// The same key appears twice.
    #[error("duplicate {container} key: {key}")]
    DuplicateKey { container: &'static str, key: String },

    /// Nested manifest blob failed to decode.
    #[error("manifest: {0}")]
    Manifest(#[source] Box<Corruption>),
}

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, Error>;
