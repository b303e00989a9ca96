//! Browsing and editing PFData archives.
//!
//! This crate sits between [`pfdata_archive`] and a front end:
//!
//! - [`ManifestCatalog`] groups manifest entries into five fixed categories
//! - [`ContentSniffer`] decides how a blob is shown
//! - [`EditSession`] holds the one open resource and its edit buffer
//! - [`PreviewArtifacts`] owns temp files for font and audio renderers
//! - [`Workspace`] ties them together around one loaded archive
//!
//! # Example
//!
//! ```no_run
//! use pfdata_session::{Category, PreviewArtifacts, Workspace};
//!
//! let mut workspace = Workspace::new(PreviewArtifacts::new()?);
//! workspace.open_archive("game.pfd")?;
//!
//! workspace.select(Category::Scripts, "main.py")?;
//! workspace.set_buffer("print('hello')")?;
//! workspace.save()?;
//! # Ok::<(), pfdata_session::Error>(())
//! ```

mod artifacts;
mod catalog;
mod error;
mod export;
mod session;
mod sniff;
mod workspace;

pub mod collaborators;

pub use artifacts::{ArtifactKind, PreviewArtifacts};
pub use catalog::{
    orphans, Catalog, CatalogEntry, Category, CategoryGroup, ManifestCatalog, ParseCategoryError,
};
pub use collaborators::{ConfirmPrompt, Confirmation, ContentSurface, PathChooser};
pub use error::{Error, Result};
pub use export::export_blob;
pub use session::{CommitOutcome, EditSession, Opened, Preview};
pub use sniff::{Content, ContentKind, ContentSniffer};
pub use workspace::{ExitDecision, LoadedArchive, Selection, Workspace};
