//! The edit session: at most one open resource and its text buffer.
//!
//! ```text
//! Closed --open--> Open { entry, buffer }
//! Open   --open--> commit, then Open { next entry }
//! Open   --close-> commit, then Closed
//! ```
//!
//! Only rooms and scripts whose bytes decode as UTF-8 carry a buffer. Every
//! other open resource is read-only and commits are skipped for it.

use pfdata_archive::ResourceStore;
use tracing::debug;

use crate::catalog::{CatalogEntry, Category};
use crate::sniff::{Content, ContentSniffer};
use crate::{Error, Result};

/// How an opened resource should be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Text backed by the session's edit buffer.
    Editable(String),
    /// Font bytes, never sniffed.
    Font(Vec<u8>),
    /// Read-only classified content.
    Content(Content),
}

/// Result of a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The trimmed buffer differed and was stored.
    Written,
    /// The trimmed buffer matched the stored bytes.
    Unchanged,
    /// Nothing open, or the open resource is read-only.
    Skipped,
}

/// Returned by [`EditSession::open`].
#[derive(Debug, Clone)]
pub struct Opened {
    pub entry: CatalogEntry,
    pub preview: Preview,
    /// Outcome of committing the previously open resource.
    pub committed: CommitOutcome,
}

#[derive(Debug)]
struct OpenResource {
    entry: CatalogEntry,
    buffer: Option<String>,
}

/// Edit state machine bound to at most one resource.
#[derive(Debug, Default)]
pub struct EditSession {
    open: Option<OpenResource>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// The open entry, if any.
    pub fn current(&self) -> Option<&CatalogEntry> {
        self.open.as_ref().map(|o| &o.entry)
    }

    /// Whether the open resource has an edit buffer.
    pub fn is_editable(&self) -> bool {
        self.buffer().is_some()
    }

    pub fn buffer(&self) -> Option<&str> {
        self.open.as_ref().and_then(|o| o.buffer.as_deref())
    }

    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        self.open.as_mut().and_then(|o| o.buffer.as_mut())
    }

    /// Replace the whole edit buffer.
    pub fn set_buffer(&mut self, text: impl Into<String>) -> Result<()> {
        let open = self.open.as_mut().ok_or(Error::NothingSelected)?;
        match open.buffer.as_mut() {
            Some(buffer) => {
                *buffer = text.into();
                Ok(())
            }
            None => Err(Error::ReadOnly(open.entry.display_key.clone())),
        }
    }

    /// Commit the open resource, then open `entry`.
    ///
    /// If the commit fails the previous resource stays open. If `entry`'s
    /// storage key is missing from the store the session ends up closed.
    pub fn open(&mut self, store: &mut ResourceStore, entry: &CatalogEntry) -> Result<Opened> {
        let committed = self.commit(store)?;
        self.open = None;

        let blob = store.get(&entry.storage_key)?;
        let (preview, buffer) = if entry.category == Category::Fonts {
            (Preview::Font(blob.to_vec()), None)
        } else {
            match ContentSniffer::inspect(blob) {
                Content::Text(text) if entry.category.is_editable() => {
                    (Preview::Editable(text.clone()), Some(text))
                }
                content => (Preview::Content(content), None),
            }
        };

        debug!(
            display = %entry.display_key,
            storage = %entry.storage_key,
            editable = buffer.is_some(),
            "resource opened"
        );
        self.open = Some(OpenResource {
            entry: entry.clone(),
            buffer,
        });

        Ok(Opened {
            entry: entry.clone(),
            preview,
            committed,
        })
    }

    /// Write the trimmed buffer back if it differs from the stored blob.
    pub fn commit(&mut self, store: &mut ResourceStore) -> Result<CommitOutcome> {
        let Some(open) = &self.open else {
            return Ok(CommitOutcome::Skipped);
        };
        let Some(buffer) = &open.buffer else {
            return Ok(CommitOutcome::Skipped);
        };

        let key = &open.entry.storage_key;
        let trimmed = buffer.trim();
        if store.get(key)? == trimmed.as_bytes() {
            debug!(%key, "commit suppressed, content unchanged");
            return Ok(CommitOutcome::Unchanged);
        }

        store.put(key, trimmed.as_bytes())?;
        debug!(%key, size = trimmed.len(), "edit committed");
        Ok(CommitOutcome::Written)
    }

    /// Commit, then close.
    pub fn close(&mut self, store: &mut ResourceStore) -> Result<CommitOutcome> {
        let outcome = self.commit(store)?;
        self.open = None;
        Ok(outcome)
    }

    /// Close without committing, returning the entry that was open.
    pub fn discard(&mut self) -> Option<CatalogEntry> {
        self.open.take().map(|o| o.entry)
    }

    /// Whether [`commit`](Self::commit) would write.
    pub fn has_pending_edit(&self, store: &ResourceStore) -> bool {
        let Some(open) = &self.open else {
            return false;
        };
        let Some(buffer) = &open.buffer else {
            return false;
        };
        store
            .get(&open.entry.storage_key)
            .map(|stored| stored != buffer.trim().as_bytes())
            .unwrap_or(false)
    }
}
