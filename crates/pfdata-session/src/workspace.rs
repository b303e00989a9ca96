//! The application controller.
//!
//! A [`Workspace`] owns the loaded archive, the edit session and the preview
//! artifacts. Front ends drive it with plain method calls and supply the
//! [collaborators](crate::collaborators) it needs for paths and prompts.

use std::path::{Path, PathBuf};

use pfdata_archive::{ArchiveCodec, ResourceStore, StorageKey};
use tracing::{debug, info};

use crate::artifacts::{ArtifactKind, PreviewArtifacts};
use crate::catalog::{self, Catalog, Category, ManifestCatalog};
use crate::collaborators::{ConfirmPrompt, Confirmation, PathChooser};
use crate::export::export_blob;
use crate::session::{CommitOutcome, EditSession, Opened, Preview};
use crate::sniff::Content;
use crate::{Error, Result};

const APP_TITLE: &str = "PFDataViewer";

/// An archive loaded from disk together with its catalog.
#[derive(Debug)]
pub struct LoadedArchive {
    path: PathBuf,
    store: ResourceStore,
    catalog: Catalog,
}

impl LoadedArchive {
    /// Path saves go to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Storage keys no display key points at.
    pub fn orphans(&self) -> Vec<&StorageKey> {
        catalog::orphans(&self.store, self.store.manifest())
    }
}

/// Result of selecting a catalog entry.
#[derive(Debug, Clone)]
pub struct Selection {
    pub opened: Opened,
    /// Materialized file for font and sound previews.
    pub artifact: Option<PathBuf>,
}

/// What to do after an exit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    Exit,
    Stay,
}

/// Controller over one loaded archive at a time.
#[derive(Debug)]
pub struct Workspace {
    archive: Option<LoadedArchive>,
    session: EditSession,
    artifacts: PreviewArtifacts,
}

impl Workspace {
    pub fn new(artifacts: PreviewArtifacts) -> Self {
        Self {
            archive: None,
            session: EditSession::new(),
            artifacts,
        }
    }

    pub fn archive(&self) -> Option<&LoadedArchive> {
        self.archive.as_ref()
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn artifacts(&self) -> &PreviewArtifacts {
        &self.artifacts
    }

    /// Load the archive at `path`, replacing the current one.
    ///
    /// A failed load leaves the current archive and session untouched.
    /// Uncommitted edits of the replaced archive are dropped.
    pub fn open_archive(&mut self, path: impl AsRef<Path>) -> Result<&Catalog> {
        let path = path.as_ref();
        let store = ArchiveCodec::load(path)?;
        let catalog = ManifestCatalog::categorize(store.manifest());

        if let Some(entry) = self.session.discard() {
            debug!(display = %entry.display_key, "session closed by archive change");
        }
        self.artifacts.clear();

        let loaded = self.archive.insert(LoadedArchive {
            path: path.to_path_buf(),
            store,
            catalog,
        });
        Ok(&loaded.catalog)
    }

    /// Ask `chooser` for a path and open it. `None` if the user backed out.
    pub fn choose_and_open(&mut self, chooser: &mut dyn PathChooser) -> Result<Option<&Catalog>> {
        match chooser.choose_open() {
            Some(path) => self.open_archive(path).map(Some),
            None => Ok(None),
        }
    }

    /// Open the catalog entry `name` of `category`.
    ///
    /// The previously open resource is committed first. Fonts and sounds are
    /// also written to a preview artifact; if that fails the entry is still
    /// open.
    pub fn select(&mut self, category: Category, name: &str) -> Result<Selection> {
        let loaded = self.archive.as_mut().ok_or(Error::NoArchive)?;
        let entry = loaded
            .catalog
            .find(category, name)
            .cloned()
            .ok_or_else(|| Error::UnknownEntry {
                category,
                name: name.to_string(),
            })?;

        let opened = self.session.open(&mut loaded.store, &entry)?;
        let artifact = match &opened.preview {
            Preview::Font(bytes) => {
                Some(self.artifacts.materialize_font(&entry.storage_key, bytes)?)
            }
            Preview::Content(Content::Audio(bytes)) => Some(self.artifacts.materialize(
                &entry.storage_key,
                bytes,
                ArtifactKind::Audio,
            )?),
            // Sounds without a recognized signature still go to the player.
            _ if category == Category::Sounds => {
                let bytes = loaded.store.get(&entry.storage_key)?;
                Some(
                    self.artifacts
                        .materialize(&entry.storage_key, bytes, ArtifactKind::Audio)?,
                )
            }
            _ => None,
        };

        Ok(Selection { opened, artifact })
    }

    /// Replace the edit buffer of the open resource.
    pub fn set_buffer(&mut self, text: impl Into<String>) -> Result<()> {
        self.session.set_buffer(text)
    }

    /// Mutable access to the edit buffer of the open resource.
    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        self.session.buffer_mut()
    }

    /// Commit the open resource into the store.
    pub fn commit(&mut self) -> Result<CommitOutcome> {
        let loaded = self.archive.as_mut().ok_or(Error::NoArchive)?;
        self.session.commit(&mut loaded.store)
    }

    /// Commit, then write the archive back to where it was loaded from.
    pub fn save(&mut self) -> Result<()> {
        let loaded = self.archive.as_mut().ok_or(Error::NoArchive)?;
        self.session.commit(&mut loaded.store)?;
        ArchiveCodec::save(&mut loaded.store, &loaded.path)?;
        Ok(())
    }

    /// Commit, write the archive to `path` and make `path` the save target.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let loaded = self.archive.as_mut().ok_or(Error::NoArchive)?;
        self.session.commit(&mut loaded.store)?;
        ArchiveCodec::save(&mut loaded.store, path)?;
        loaded.path = path.to_path_buf();
        info!(path = %path.display(), "archive path changed");
        Ok(())
    }

    /// Ask `chooser` for a destination and save there. `false` if the user
    /// backed out.
    pub fn choose_and_save_as(&mut self, chooser: &mut dyn PathChooser) -> Result<bool> {
        let suggested = self.archive.as_ref().map(|a| a.path.clone());
        match chooser.choose_save(suggested.as_deref()) {
            Some(path) => self.save_as(path).map(|()| true),
            None => Ok(false),
        }
    }

    /// Export the stored bytes of the open resource.
    ///
    /// Uncommitted buffer edits are not included.
    pub fn export(&self, dest: impl AsRef<Path>) -> Result<usize> {
        let entry = self.session.current().ok_or(Error::NothingSelected)?;
        self.export_key(&entry.storage_key, dest)
    }

    /// Export the blob stored under `key`.
    pub fn export_key(&self, key: &StorageKey, dest: impl AsRef<Path>) -> Result<usize> {
        let loaded = self.archive.as_ref().ok_or(Error::NoArchive)?;
        export_blob(&loaded.store, key, dest)
    }

    /// Ask `chooser` for a destination, suggesting the open resource's
    /// display name, and export there. `None` if the user backed out.
    pub fn choose_and_export(&self, chooser: &mut dyn PathChooser) -> Result<Option<usize>> {
        let entry = self.session.current().ok_or(Error::NothingSelected)?;
        let suggested = PathBuf::from(&entry.display_name);
        match chooser.choose_save(Some(&suggested)) {
            Some(dest) => self.export_key(&entry.storage_key, dest).map(Some),
            None => Ok(None),
        }
    }

    /// Whether exiting now would lose anything.
    pub fn has_unsaved_changes(&self) -> bool {
        self.archive
            .as_ref()
            .is_some_and(|a| a.store.is_dirty() || self.session.has_pending_edit(&a.store))
    }

    /// Decide whether the application may exit.
    ///
    /// With unsaved changes, `prompt` is asked whether to save. A failed save
    /// is returned as an error and the caller should stay.
    pub fn request_exit(&mut self, prompt: &mut dyn ConfirmPrompt) -> Result<ExitDecision> {
        if !self.has_unsaved_changes() {
            return Ok(ExitDecision::Exit);
        }
        match prompt.confirm_save_changes() {
            Confirmation::Yes => {
                self.save()?;
                Ok(ExitDecision::Exit)
            }
            Confirmation::No => Ok(ExitDecision::Exit),
            Confirmation::Cancel => Ok(ExitDecision::Stay),
        }
    }

    /// Window title naming the loaded file.
    pub fn title(&self) -> String {
        let name = self
            .archive
            .as_ref()
            .and_then(|a| a.path.file_name())
            .map(|n| n.to_string_lossy());
        match name {
            Some(name) => format!("{APP_TITLE} [{name}]"),
            None => APP_TITLE.to_string(),
        }
    }
}
