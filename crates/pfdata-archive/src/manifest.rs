//! The embedded manifest: display key to storage key.

use std::collections::HashMap;

use pfdata_common::{BinaryReader, BinaryWriter};
use tracing::trace;

use crate::error::Corruption;
use crate::format::{ManifestHeader, MIN_MAPPING_LEN};
use crate::keys::{DisplayKey, StorageKey};
use crate::{Error, Result};

/// Ordered mapping from display key to storage key.
///
/// Order is the order of the serialized blob, which is also the order the
/// catalog lists entries in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<(DisplayKey, StorageKey)>,
    index: HashMap<DisplayKey, usize>,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of display keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the manifest maps nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Map `display` to `storage`.
    ///
    /// An existing display key keeps its position and is re-pointed. Returns
    /// the previous storage key, if any.
    pub fn insert(&mut self, display: DisplayKey, storage: StorageKey) -> Option<StorageKey> {
        if let Some(&position) = self.index.get(&display) {
            return Some(std::mem::replace(&mut self.entries[position].1, storage));
        }
        self.index.insert(display.clone(), self.entries.len());
        self.entries.push((display, storage));
        None
    }

    /// Translate a display key into the storage key holding its blob.
    pub fn resolve(&self, display: &DisplayKey) -> Result<&StorageKey> {
        self.index
            .get(display)
            .map(|&position| &self.entries[position].1)
            .ok_or_else(|| Error::DisplayKeyNotFound(display.clone()))
    }

    /// Check whether any display key points at `storage`.
    pub fn references(&self, storage: &StorageKey) -> bool {
        self.entries.iter().any(|(_, s)| s == storage)
    }

    /// Iterate over mappings in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = (&DisplayKey, &StorageKey)> + '_ {
        self.entries.iter().map(|(d, s)| (d, s))
    }

    /// Decode a manifest blob.
    ///
    /// An empty blob decodes to an empty manifest.
    pub fn decode(data: &[u8]) -> std::result::Result<Self, Corruption> {
        if data.is_empty() {
            return Ok(Self::new());
        }

        let mut reader = BinaryReader::new(data);
        reader.expect_magic(ManifestHeader::MAGIC)?;
        let header: ManifestHeader = reader.read_struct()?;

        let version = header.version;
        if version != ManifestHeader::VERSION {
            return Err(Corruption::UnsupportedVersion {
                container: "manifest",
                found: version,
                expected: ManifestHeader::VERSION,
            });
        }
        let reserved = header.reserved;
        if reserved != 0 {
            return Err(Corruption::ReservedField {
                container: "manifest",
                value: reserved,
            });
        }

        let count = header.entry_count as usize;
        let mut manifest = Self {
            entries: Vec::with_capacity(count.min(reader.remaining() / MIN_MAPPING_LEN)),
            index: HashMap::new(),
        };

        for _ in 0..count {
            let display_key = DisplayKey::from(reader.read_str_u32()?);
            let storage = StorageKey::from(reader.read_str_u32()?);
            trace!(display = %display_key, %storage, "manifest entry");

            if manifest.insert(display_key.clone(), storage).is_some() {
                return Err(Corruption::DuplicateKey {
                    container: "manifest",
                    key: display_key.to_string(),
                });
            }
        }
        reader.expect_end()?;

        Ok(manifest)
    }

    /// Encode the manifest into a blob suitable for [`MANIFEST_KEY`](crate::MANIFEST_KEY).
    pub fn encode(&self) -> Result<Vec<u8>> {
        let count = u32::try_from(self.entries.len()).map_err(|_| {
            Error::Encode(pfdata_common::Error::FieldOverflow {
                length: self.entries.len(),
                width: 32,
            })
        })?;

        let mut writer = BinaryWriter::new();
        writer.write_bytes(ManifestHeader::MAGIC);
        writer.write_struct(&ManifestHeader {
            version: ManifestHeader::VERSION,
            reserved: 0,
            entry_count: count,
        });
        for (display, storage) in &self.entries {
            writer.write_str_u32(display.as_str()).map_err(Error::Encode)?;
            writer.write_str_u32(storage.as_str()).map_err(Error::Encode)?;
        }

        Ok(writer.into_inner())
    }
}

impl FromIterator<(DisplayKey, StorageKey)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (DisplayKey, StorageKey)>>(iter: I) -> Self {
        let mut manifest = Self::new();
        for (display, storage) in iter {
            manifest.insert(display, storage);
        }
        manifest
    }
}
