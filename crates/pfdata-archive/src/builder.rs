//! Assembling fresh archives.

use crate::keys::{DisplayKey, StorageKey};
use crate::manifest::Manifest;
use crate::store::ResourceStore;
use crate::{ArchiveCodec, Result};

/// Builds a [`ResourceStore`] from scratch.
///
/// The manifest entry is placed first when the manifest maps anything;
/// an archive built without any mapping has no manifest entry at all.
///
/// # Example
///
/// ```
/// use pfdata_archive::ArchiveBuilder;
///
/// let store = ArchiveBuilder::new()
///     .resource("scripts/main.py", "k1", b"print('x')".to_vec())
///     .raw("orphan", vec![0xFF])
///     .build()?;
///
/// assert_eq!(store.get(&"k1".into())?, b"print('x')");
/// assert_eq!(store.manifest().len(), 1);
/// # Ok::<(), pfdata_archive::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
    manifest: Manifest,
    entries: Vec<(StorageKey, Vec<u8>)>,
}

impl ArchiveBuilder {
    /// Start an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a blob under `storage` and map `display` to it.
    pub fn resource(
        mut self,
        display: impl Into<DisplayKey>,
        storage: impl Into<StorageKey>,
        blob: Vec<u8>,
    ) -> Self {
        let storage = storage.into();
        self.manifest.insert(display.into(), storage.clone());
        self.set(storage, blob);
        self
    }

    /// Add a blob no display key points at.
    pub fn raw(mut self, storage: impl Into<StorageKey>, blob: Vec<u8>) -> Self {
        self.set(storage.into(), blob);
        self
    }

    /// Replace the manifest wholesale.
    pub fn manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// Finish into a clean store.
    pub fn build(self) -> Result<ResourceStore> {
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        if !self.manifest.is_empty() {
            entries.push((StorageKey::manifest(), self.manifest.encode()?));
        }
        entries.extend(self.entries);
        Ok(ResourceStore::from_entries(entries)?)
    }

    /// Finish straight into archive bytes.
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        ArchiveCodec::encode(&self.build()?)
    }

    fn set(&mut self, storage: StorageKey, blob: Vec<u8>) {
        match self.entries.iter_mut().find(|(k, _)| *k == storage) {
            Some(entry) => entry.1 = blob,
            None => self.entries.push((storage, blob)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_entry_first() {
        let store = ArchiveBuilder::new()
            .raw("a", vec![1])
            .resource("rooms/intro.json", "b", b"{}".to_vec())
            .build()
            .unwrap();

        let keys: Vec<_> = store.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec![crate::MANIFEST_KEY, "a", "b"]);
    }

    #[test]
    fn test_same_storage_key_overwrites() {
        let store = ArchiveBuilder::new()
            .raw("a", vec![1])
            .raw("a", vec![2])
            .build()
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&"a".into()).unwrap(), &[2u8]);
    }

    #[test]
    fn test_to_bytes_decodes() {
        let bytes = ArchiveBuilder::new()
            .resource("fonts/ui.ttf", "f", vec![0, 1, 0, 0])
            .to_bytes()
            .unwrap();

        let store = ArchiveCodec::decode(&bytes).unwrap();
        assert_eq!(store.manifest().len(), 1);
    }
}
