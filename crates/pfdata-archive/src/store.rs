//! In-memory owner of an archive's blobs.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::Corruption;
use crate::keys::StorageKey;
use crate::manifest::Manifest;
use crate::{Error, Result};

/// The raw storage key to blob mapping of one archive, its decoded manifest,
/// and whether anything changed since the last load or save.
///
/// Entry order is preserved so an unedited save reproduces the original
/// entry table. The manifest blob stays in the entry table exactly as loaded;
/// the decoded [`Manifest`] is a read-only view of it.
#[derive(Debug, Clone)]
pub struct ResourceStore {
    entries: Vec<(StorageKey, Vec<u8>)>,
    index: HashMap<StorageKey, usize>,
    manifest: Manifest,
    dirty: bool,
}

impl ResourceStore {
    /// Build a clean store from raw entries.
    ///
    /// Fails on duplicate storage keys or a malformed manifest blob.
    pub fn from_entries(
        entries: Vec<(StorageKey, Vec<u8>)>,
    ) -> std::result::Result<Self, Corruption> {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, (key, _)) in entries.iter().enumerate() {
            if index.insert(key.clone(), position).is_some() {
                return Err(Corruption::DuplicateKey {
                    container: "archive",
                    key: key.to_string(),
                });
            }
        }

        let manifest = match index.get(crate::MANIFEST_KEY) {
            Some(&position) => Manifest::decode(&entries[position].1)
                .map_err(|e| Corruption::Manifest(Box::new(e)))?,
            None => Manifest::new(),
        };

        let store = Self {
            entries,
            index,
            manifest,
            dirty: false,
        };

        for (display_key, storage) in store.manifest.iter() {
            if !store.contains(storage) {
                warn!(
                    display = %display_key,
                    %storage,
                    "manifest entry points at a missing blob"
                );
            }
        }
        debug!(
            entries = store.entries.len(),
            manifest_entries = store.manifest.len(),
            "resource store ready"
        );

        Ok(store)
    }

    /// Get the blob stored under `key`.
    pub fn get(&self, key: &StorageKey) -> Result<&[u8]> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1.as_slice())
            .ok_or_else(|| Error::NotFound(key.clone()))
    }

    /// Replace the blob stored under an existing `key` and mark the store dirty.
    ///
    /// Never creates keys; the manifest blob can only be changed through
    /// [`replace_manifest`](Self::replace_manifest).
    pub fn put(&mut self, key: &StorageKey, blob: impl Into<Vec<u8>>) -> Result<()> {
        if key.is_manifest() {
            return Err(Error::ReservedKey(key.clone()));
        }
        let position = *self
            .index
            .get(key)
            .ok_or_else(|| Error::NotFound(key.clone()))?;

        self.entries[position].1 = blob.into();
        self.dirty = true;
        debug!(%key, "blob replaced");
        Ok(())
    }

    /// Encode `manifest` and embed it under the reserved key.
    ///
    /// The reserved entry is created at the front of the table if the
    /// archive had none.
    pub fn replace_manifest(&mut self, manifest: Manifest) -> Result<()> {
        let blob = manifest.encode()?;
        match self.index.get(crate::MANIFEST_KEY) {
            Some(&position) => self.entries[position].1 = blob,
            None => {
                self.entries.insert(0, (StorageKey::manifest(), blob));
                self.reindex();
            }
        }
        self.manifest = manifest;
        self.dirty = true;
        Ok(())
    }

    /// The decoded manifest.
    #[inline]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Check if `key` is present.
    #[inline]
    pub fn contains(&self, key: &StorageKey) -> bool {
        self.index.contains_key(key)
    }

    /// Number of entries, including the manifest entry.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the archive has no entries at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the store changed since it was loaded or last saved.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Iterate over every entry in archive order, manifest entry included.
    pub fn iter(&self) -> impl Iterator<Item = (&StorageKey, &[u8])> + Clone + '_ {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Iterate over storage keys of resources, skipping the manifest entry.
    pub fn resource_keys(&self) -> impl Iterator<Item = &StorageKey> + '_ {
        self.entries
            .iter()
            .map(|(k, _)| k)
            .filter(|k| !k.is_manifest())
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, (key, _))| (key.clone(), position))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::DisplayKey;

    fn store() -> ResourceStore {
        let manifest: Manifest = [(DisplayKey::from("scripts/main.py"), StorageKey::from("k1"))]
            .into_iter()
            .collect();
        ResourceStore::from_entries(vec![
            (StorageKey::manifest(), manifest.encode().unwrap()),
            (StorageKey::from("k1"), b"print('x')".to_vec()),
            (StorageKey::from("k2"), vec![0x89, b'P', b'N', b'G']),
        ])
        .unwrap()
    }

    #[test]
    fn test_get_and_not_found() {
        let store = store();
        assert_eq!(store.get(&"k1".into()).unwrap(), b"print('x')");
        assert!(matches!(store.get(&"nope".into()), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_put_marks_dirty() {
        let mut store = store();
        assert!(!store.is_dirty());

        store.put(&"k1".into(), b"print('y')".to_vec()).unwrap();
        assert!(store.is_dirty());
        assert_eq!(store.get(&"k1".into()).unwrap(), b"print('y')");
    }

    #[test]
    fn test_put_never_creates_keys() {
        let mut store = store();
        assert!(matches!(
            store.put(&"new".into(), b"x".to_vec()),
            Err(Error::NotFound(_))
        ));
        assert!(!store.is_dirty());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_put_rejects_manifest_key() {
        let mut store = store();
        assert!(matches!(
            store.put(&StorageKey::manifest(), Vec::new()),
            Err(Error::ReservedKey(_))
        ));
    }

    #[test]
    fn test_manifest_decoded() {
        let store = store();
        assert_eq!(
            store
                .manifest()
                .resolve(&"scripts/main.py".into())
                .unwrap()
                .as_str(),
            "k1"
        );
    }

    #[test]
    fn test_missing_manifest_is_empty() {
        let store =
            ResourceStore::from_entries(vec![(StorageKey::from("k1"), b"x".to_vec())]).unwrap();
        assert!(store.manifest().is_empty());
    }

    #[test]
    fn test_dangling_manifest_reference_loads() {
        let manifest: Manifest = [
            (DisplayKey::from("scripts/main.py"), StorageKey::from("k1")),
            (DisplayKey::from("sounds/gone.wav"), StorageKey::from("missing")),
        ]
        .into_iter()
        .collect();
        let store = ResourceStore::from_entries(vec![
            (StorageKey::manifest(), manifest.encode().unwrap()),
            (StorageKey::from("k1"), b"print('x')".to_vec()),
        ])
        .unwrap();

        assert_eq!(store.manifest().len(), 2);
        assert!(!store.contains(&"missing".into()));
        assert!(matches!(
            store.get(&"missing".into()),
            Err(Error::NotFound(_))
        ));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = ResourceStore::from_entries(vec![
            (StorageKey::from("k1"), b"a".to_vec()),
            (StorageKey::from("k1"), b"b".to_vec()),
        ]);
        assert!(matches!(result, Err(Corruption::DuplicateKey { .. })));
    }

    #[test]
    fn test_bad_manifest_blob_rejected() {
        let result = ResourceStore::from_entries(vec![(StorageKey::manifest(), b"junk".to_vec())]);
        assert!(matches!(result, Err(Corruption::Manifest(_))));
    }

    #[test]
    fn test_replace_manifest_creates_reserved_entry() {
        let mut store =
            ResourceStore::from_entries(vec![(StorageKey::from("k1"), b"x".to_vec())]).unwrap();
        let manifest: Manifest = [(DisplayKey::from("a.py"), StorageKey::from("k1"))]
            .into_iter()
            .collect();

        store.replace_manifest(manifest.clone()).unwrap();

        assert!(store.is_dirty());
        assert_eq!(store.manifest(), &manifest);
        assert_eq!(store.iter().next().unwrap().0, &StorageKey::manifest());
        assert_eq!(store.get(&"k1".into()).unwrap(), b"x");
    }

    #[test]
    fn test_resource_keys_skip_manifest() {
        let store = store();
        let keys: Vec<_> = store.resource_keys().map(StorageKey::as_str).collect();
        assert_eq!(keys, vec!["k1", "k2"]);
    }
}
