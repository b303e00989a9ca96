//! Error types for the session crate.

use pfdata_archive::DisplayKey;
use thiserror::Error;

use crate::catalog::Category;

/// Errors surfaced by the catalog, edit session and workspace.
#[derive(Debug, Error)]
pub enum Error {
    /// Archive error (I/O, corrupt input, missing key).
    #[error(transparent)]
    Archive(#[from] pfdata_archive::Error),

    /// I/O error outside the archive file itself (export, preview artifacts).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation needs a loaded archive.
    #[error("no archive is open")]
    NoArchive,

    /// An operation needs an open resource.
    #[error("no resource is selected")]
    NothingSelected,

    /// No catalog entry matches.
    #[error("no {category} entry named {name}")]
    UnknownEntry { category: Category, name: String },

    /// The open resource has no edit buffer.
    #[error("{0} is read-only")]
    ReadOnly(DisplayKey),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, Error>;
