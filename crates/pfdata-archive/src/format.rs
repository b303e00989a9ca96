//! On-disk header structures.
//!
//! ```text
//! archive:  "PFDA" ArchiveHeader  { key:u32-str, blob:u64-bytes } * entry_count
//! manifest: "PFMF" ManifestHeader { display:u32-str, storage:u32-str } * entry_count
//! ```
//!
//! All integers are little-endian. The archive checksum is CRC32C over every
//! byte following the archive header.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Archive header (without magic).
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct ArchiveHeader {
    /// Format version
    pub version: u16,
    /// Reserved, must be zero
    pub flags: u16,
    /// Number of entries, including the manifest entry
    pub entry_count: u32,
    /// CRC32C of the entry table
    pub checksum: u32,
}

impl ArchiveHeader {
    /// Magic bytes at the start of every archive.
    pub const MAGIC: &'static [u8; 4] = b"PFDA";

    /// The only version this crate reads and writes.
    pub const VERSION: u16 = 1;

    /// Size of magic plus header.
    pub const ENCODED_LEN: usize = Self::MAGIC.len() + std::mem::size_of::<Self>();
}

/// Manifest header (without magic).
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct ManifestHeader {
    /// Format version
    pub version: u16,
    /// Reserved, must be zero
    pub reserved: u16,
    /// Number of display key mappings
    pub entry_count: u32,
}

impl ManifestHeader {
    /// Magic bytes at the start of the manifest blob.
    pub const MAGIC: &'static [u8; 4] = b"PFMF";

    /// The only version this crate reads and writes.
    pub const VERSION: u16 = 1;
}

/// Smallest possible encoded archive entry: two empty length prefixes.
pub(crate) const MIN_ENTRY_LEN: usize = 4 + 8;

/// Smallest possible encoded manifest mapping.
pub(crate) const MIN_MAPPING_LEN: usize = 4 + 4;
