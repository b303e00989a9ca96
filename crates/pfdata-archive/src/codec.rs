//! Archive encoding, decoding, loading and saving.

use std::fs;
use std::io::Write;
use std::path::Path;

use pfdata_common::{crc, BinaryReader, BinaryWriter};
use tracing::{debug, info};

use crate::error::Corruption;
use crate::format::{ArchiveHeader, MIN_ENTRY_LEN};
use crate::keys::StorageKey;
use crate::store::ResourceStore;
use crate::{Error, Result};

/// Reads and writes archive files.
pub struct ArchiveCodec;

impl ArchiveCodec {
    /// Read the whole file at `path` and decode it.
    ///
    /// Returns a clean store. `Io` if the file cannot be read, `CorruptArchive`
    /// if the outer table or the nested manifest fails to decode.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ResourceStore> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let store = Self::decode(&data)?;

        info!(
            path = %path.display(),
            bytes = data.len(),
            entries = store.len(),
            "archive loaded"
        );
        Ok(store)
    }

    /// Decode an archive held in memory.
    pub fn decode(data: &[u8]) -> Result<ResourceStore> {
        let entries = Self::decode_entries(data)?;
        Ok(ResourceStore::from_entries(entries)?)
    }

    /// Encode the raw entry table of `store`, manifest blob included verbatim.
    pub fn encode(store: &ResourceStore) -> Result<Vec<u8>> {
        Self::encode_entries(store.iter(), store.len())
    }

    /// Encode `store` and write it to `path`.
    ///
    /// The bytes go to a temporary file in the destination directory which is
    /// then renamed over `path`, so a failed save leaves the previous file
    /// intact. The store is marked clean only after the rename succeeded.
    pub fn save<P: AsRef<Path>>(store: &mut ResourceStore, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = Self::encode(store)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(&data)?;
        if let Ok(existing) = fs::metadata(path) {
            temp.as_file().set_permissions(existing.permissions())?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        store.mark_clean();
        info!(path = %path.display(), bytes = data.len(), "archive saved");
        Ok(())
    }

    fn encode_entries<'a, I>(entries: I, count: usize) -> Result<Vec<u8>>
    where
        I: Iterator<Item = (&'a StorageKey, &'a [u8])> + Clone,
    {
        let entry_count = u32::try_from(count).map_err(|_| {
            Error::Encode(pfdata_common::Error::FieldOverflow {
                length: count,
                width: 32,
            })
        })?;

        let capacity = ArchiveHeader::ENCODED_LEN
            + entries
                .clone()
                .map(|(k, v)| MIN_ENTRY_LEN + k.as_str().len() + v.len())
                .sum::<usize>();
        let mut writer = BinaryWriter::with_capacity(capacity);

        writer.write_bytes(ArchiveHeader::MAGIC);
        writer.write_struct(&ArchiveHeader {
            version: ArchiveHeader::VERSION,
            flags: 0,
            entry_count,
            checksum: 0,
        });
        for (key, blob) in entries {
            writer.write_str_u32(key.as_str()).map_err(Error::Encode)?;
            writer.write_bytes_u64(blob);
        }

        // The checksum is the last header field.
        let checksum = crc::hash_bytes(&writer.as_slice()[ArchiveHeader::ENCODED_LEN..]);
        writer.as_mut_slice()[ArchiveHeader::ENCODED_LEN - 4..ArchiveHeader::ENCODED_LEN]
            .copy_from_slice(&checksum.to_le_bytes());

        debug!(entries = count, bytes = writer.len(), checksum, "archive encoded");
        Ok(writer.into_inner())
    }

    fn decode_entries(data: &[u8]) -> std::result::Result<Vec<(StorageKey, Vec<u8>)>, Corruption> {
        let mut reader = BinaryReader::new(data);
        reader.expect_magic(ArchiveHeader::MAGIC)?;
        let header: ArchiveHeader = reader.read_struct()?;

        let version = header.version;
        if version != ArchiveHeader::VERSION {
            return Err(Corruption::UnsupportedVersion {
                container: "archive",
                found: version,
                expected: ArchiveHeader::VERSION,
            });
        }
        let flags = header.flags;
        if flags != 0 {
            return Err(Corruption::ReservedField {
                container: "archive",
                value: flags,
            });
        }

        let expected = header.checksum;
        let actual = crc::hash_bytes(reader.remaining_bytes());
        if actual != expected {
            return Err(Corruption::ChecksumMismatch { expected, actual });
        }

        let count = header.entry_count as usize;
        let mut entries = Vec::with_capacity(count.min(reader.remaining() / MIN_ENTRY_LEN));
        for _ in 0..count {
            let key = StorageKey::from(reader.read_str_u32()?);
            let blob = reader.read_bytes_u64()?.to_vec();
            entries.push((key, blob));
        }
        reader.expect_end()?;

        debug!(entries = entries.len(), bytes = data.len(), "archive decoded");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ArchiveBuilder;
    use crate::keys::DisplayKey;
    use crate::manifest::Manifest;
    use crate::MANIFEST_KEY;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    fn scenario() -> ResourceStore {
        ArchiveBuilder::new()
            .resource("scripts/main.py", "k1", b"print('x')".to_vec())
            .resource("images/logo.png", "k2", PNG.to_vec())
            .build()
            .unwrap()
    }

    fn entries(store: &ResourceStore) -> Vec<(String, Vec<u8>)> {
        store
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_vec()))
            .collect()
    }

    #[test]
    fn test_decode_encode_is_identity() {
        let bytes = ArchiveCodec::encode(&scenario()).unwrap();
        let decoded = ArchiveCodec::decode(&bytes).unwrap();

        assert!(!decoded.is_dirty());
        assert_eq!(ArchiveCodec::encode(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_manifest_blob_preserved_verbatim() {
        let store = scenario();
        let original = store.get(&StorageKey::manifest()).unwrap().to_vec();

        let decoded = ArchiveCodec::decode(&ArchiveCodec::encode(&store).unwrap()).unwrap();
        assert_eq!(decoded.get(&StorageKey::manifest()).unwrap(), original.as_slice());
        assert_eq!(
            decoded.manifest().resolve(&DisplayKey::from("images/logo.png")).unwrap(),
            &StorageKey::from("k2")
        );
    }

    #[test]
    fn test_unrecognized_keys_survive() {
        let store = ArchiveBuilder::new()
            .resource("scripts/main.py", "k1", b"x".to_vec())
            .raw("orphan", vec![0xDE, 0xAD])
            .raw("data/unknown.bin", vec![1, 2, 3])
            .build()
            .unwrap();

        let decoded = ArchiveCodec::decode(&ArchiveCodec::encode(&store).unwrap()).unwrap();
        assert_eq!(entries(&decoded), entries(&store));
    }

    #[test]
    fn test_archive_without_manifest() {
        let store = ArchiveBuilder::new().raw("k1", b"x".to_vec()).build().unwrap();
        let decoded = ArchiveCodec::decode(&ArchiveCodec::encode(&store).unwrap()).unwrap();

        assert!(decoded.manifest().is_empty());
        assert!(!decoded.contains(&StorageKey::from(MANIFEST_KEY)));
    }

    #[test]
    fn test_not_an_archive() {
        assert!(matches!(
            ArchiveCodec::decode(b"this is plainly not an archive"),
            Err(Error::CorruptArchive(Corruption::Framing(_)))
        ));
        assert!(matches!(
            ArchiveCodec::decode(&[]),
            Err(Error::CorruptArchive(_))
        ));
    }

    #[test]
    fn test_truncated_archive() {
        let bytes = ArchiveCodec::encode(&scenario()).unwrap();
        let result = ArchiveCodec::decode(&bytes[..bytes.len() - 3]);

        assert!(matches!(result, Err(Error::CorruptArchive(_))));
    }

    #[test]
    fn test_flipped_byte_fails_checksum() {
        let mut bytes = ArchiveCodec::encode(&scenario()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;

        assert!(matches!(
            ArchiveCodec::decode(&bytes),
            Err(Error::CorruptArchive(Corruption::ChecksumMismatch { .. }))
        ));
    }

    #[test]
    fn test_unknown_version() {
        let mut bytes = ArchiveCodec::encode(&scenario()).unwrap();
        bytes[4] = 9;

        assert!(matches!(
            ArchiveCodec::decode(&bytes),
            Err(Error::CorruptArchive(Corruption::UnsupportedVersion { found: 9, .. }))
        ));
    }

    #[test]
    fn test_corrupt_nested_manifest() {
        let raw = [
            (StorageKey::manifest(), b"PFMF\x07\x00".to_vec()),
            (StorageKey::from("k1"), b"x".to_vec()),
        ];
        let bytes =
            ArchiveCodec::encode_entries(raw.iter().map(|(k, v)| (k, v.as_slice())), raw.len())
                .unwrap();

        assert!(matches!(
            ArchiveCodec::decode(&bytes),
            Err(Error::CorruptArchive(Corruption::Manifest(_)))
        ));
    }

    #[test]
    fn test_duplicate_storage_keys() {
        let raw = [
            (StorageKey::from("k1"), b"a".to_vec()),
            (StorageKey::from("k1"), b"b".to_vec()),
        ];
        let bytes =
            ArchiveCodec::encode_entries(raw.iter().map(|(k, v)| (k, v.as_slice())), raw.len())
                .unwrap();

        assert!(matches!(
            ArchiveCodec::decode(&bytes),
            Err(Error::CorruptArchive(Corruption::DuplicateKey { .. }))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ArchiveCodec::load(dir.path().join("missing.win")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.win");

        let mut store = scenario();
        store.put(&"k1".into(), b"print('y')".to_vec()).unwrap();
        ArchiveCodec::save(&mut store, &path).unwrap();
        assert!(!store.is_dirty());

        let loaded = ArchiveCodec::load(&path).unwrap();
        assert_eq!(entries(&loaded), entries(&store));
        assert_eq!(loaded.get(&"k1".into()).unwrap(), b"print('y')");
    }

    #[test]
    fn test_failed_save_keeps_original_and_dirty_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.win");
        let mut store = scenario();
        ArchiveCodec::save(&mut store, &path).unwrap();
        let original = fs::read(&path).unwrap();

        store.put(&"k1".into(), b"changed".to_vec()).unwrap();
        let bad_target = dir.path().join("no-such-dir").join("data.win");
        assert!(matches!(
            ArchiveCodec::save(&mut store, &bad_target),
            Err(Error::Io(_))
        ));

        assert!(store.is_dirty());
        assert_eq!(fs::read(&path).unwrap(), original);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.win");
        let mut store = scenario();
        ArchiveCodec::save(&mut store, &path).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        store.put(&"k1".into(), b"print('y')".to_vec()).unwrap();
        ArchiveCodec::save(&mut store, &path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_manifest_not_regenerated_on_save() {
        let mut store = scenario();
        let before = store.get(&StorageKey::manifest()).unwrap().to_vec();
        store.put(&"k1".into(), b"print('z')".to_vec()).unwrap();

        let decoded = ArchiveCodec::decode(&ArchiveCodec::encode(&store).unwrap()).unwrap();
        assert_eq!(decoded.get(&StorageKey::manifest()).unwrap(), before.as_slice());
    }

    proptest! {
        #[test]
        fn prop_unedited_round_trip(
            blobs in prop::collection::btree_map("[a-z0-9/._-]{1,16}", prop::collection::vec(any::<u8>(), 0..64), 0..12),
            mapped in prop::collection::vec(any::<bool>(), 12),
        ) {
            let mut manifest = Manifest::new();
            let mut builder = ArchiveBuilder::new();
            for (i, (key, blob)) in blobs.iter().enumerate() {
                if mapped[i] {
                    manifest.insert(DisplayKey::from(format!("res/{key}.py")), StorageKey::from(key.as_str()));
                }
                builder = builder.raw(key.as_str(), blob.clone());
            }
            let store = builder.manifest(manifest).build().unwrap();

            let bytes = ArchiveCodec::encode(&store).unwrap();
            let decoded = ArchiveCodec::decode(&bytes).unwrap();

            prop_assert_eq!(entries(&decoded), entries(&store));
            prop_assert_eq!(ArchiveCodec::encode(&decoded).unwrap(), bytes);
        }
    }
}
