//! Writing blobs out of the archive.

use std::fs;
use std::path::Path;

use pfdata_archive::{ResourceStore, StorageKey};
use tracing::info;

use crate::Result;

/// Write the blob stored under `key` to `dest`, byte for byte.
///
/// Returns the number of bytes written.
pub fn export_blob(store: &ResourceStore, key: &StorageKey, dest: impl AsRef<Path>) -> Result<usize> {
    let dest = dest.as_ref();
    let blob = store.get(key)?;
    fs::write(dest, blob)?;
    info!(%key, dest = %dest.display(), size = blob.len(), "blob exported");
    Ok(blob.len())
}
