//! Temporary files handed to external font and audio renderers.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use pfdata_archive::StorageKey;
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::Result;

/// What an artifact will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Font,
    Audio,
}

impl ArtifactKind {
    fn file_name(self, serial: u64) -> String {
        match self {
            ArtifactKind::Font => format!("font-{serial}.ttf"),
            ArtifactKind::Audio => format!("audio-{serial}"),
        }
    }
}

#[derive(Debug)]
struct Artifact {
    path: PathBuf,
    kind: ArtifactKind,
}

/// Scoped registry of materialized blobs.
///
/// Every file lives inside one private directory that is removed when the
/// registry is dropped, including during unwinding.
#[derive(Debug)]
pub struct PreviewArtifacts {
    dir: TempDir,
    tracked: HashMap<StorageKey, Artifact>,
    font: Option<StorageKey>,
    serial: u64,
}

impl PreviewArtifacts {
    /// Create a registry under the system temp directory.
    pub fn new() -> Result<Self> {
        Self::with_dir(tempfile::Builder::new().prefix("pfdata-").tempdir()?)
    }

    /// Create a registry under `parent`.
    pub fn new_in(parent: impl AsRef<Path>) -> Result<Self> {
        Self::with_dir(
            tempfile::Builder::new()
                .prefix("pfdata-")
                .tempdir_in(parent)?,
        )
    }

    fn with_dir(dir: TempDir) -> Result<Self> {
        debug!(dir = %dir.path().display(), "preview artifact directory created");
        Ok(Self {
            dir,
            tracked: HashMap::new(),
            font: None,
            serial: 0,
        })
    }

    /// Directory holding every artifact.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Write `bytes` to a file tracked under `key` and return its path.
    ///
    /// A key that is already tracked with the same kind has its file rewritten
    /// in place.
    pub fn materialize(
        &mut self,
        key: &StorageKey,
        bytes: &[u8],
        kind: ArtifactKind,
    ) -> Result<PathBuf> {
        let reusable = self
            .tracked
            .get(key)
            .filter(|a| a.kind == kind)
            .map(|a| a.path.clone());
        let path = match reusable {
            Some(path) => path,
            None => {
                self.release(key)?;
                self.serial += 1;
                self.dir.path().join(kind.file_name(self.serial))
            }
        };

        let mut file = fs::File::create(&path)?;
        file.write_all(bytes)?;
        file.sync_all()?;

        debug!(%key, path = %path.display(), size = bytes.len(), "artifact materialized");
        self.tracked.insert(
            key.clone(),
            Artifact {
                path: path.clone(),
                kind,
            },
        );
        Ok(path)
    }

    /// Materialize a font, deleting the previously materialized one.
    pub fn materialize_font(&mut self, key: &StorageKey, bytes: &[u8]) -> Result<PathBuf> {
        if let Some(previous) = self.font.take() {
            if previous != *key {
                self.release(&previous)?;
            }
        }
        let path = self.materialize(key, bytes, ArtifactKind::Font)?;
        self.font = Some(key.clone());
        Ok(path)
    }

    /// Path of a tracked artifact.
    pub fn path(&self, key: &StorageKey) -> Option<&Path> {
        self.tracked.get(key).map(|a| a.path.as_path())
    }

    /// Number of tracked artifacts.
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// Check if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Delete the artifact tracked under `key`, if any.
    pub fn release(&mut self, key: &StorageKey) -> Result<()> {
        if self.font.as_ref() == Some(key) {
            self.font = None;
        }
        if let Some(artifact) = self.tracked.remove(key) {
            remove_file(&artifact.path)?;
            debug!(%key, "artifact released");
        }
        Ok(())
    }

    /// Delete every tracked artifact. The directory itself stays.
    pub fn clear(&mut self) {
        for (key, artifact) in self.tracked.drain() {
            if let Err(e) = remove_file(&artifact.path) {
                warn!(%key, error = %e, "failed to remove artifact");
            }
        }
        self.font = None;
    }
}

fn remove_file(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
