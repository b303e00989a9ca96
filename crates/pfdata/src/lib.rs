//! PFData - resource archive reading, browsing and editing.
//!
//! This crate provides a unified interface to the PFData crates.
//!
//! # Crates
//!
//! - [`pfdata_common`] - Binary reading and writing, CRC32C
//! - [`pfdata_archive`] - Archive container, manifest and resource store
//! - [`pfdata_session`] - Catalog, content sniffing, edit session and workspace
//!
//! # Example
//!
//! ```no_run
//! use pfdata::prelude::*;
//!
//! let store = ArchiveCodec::load("game.pfd")?;
//! let catalog = ManifestCatalog::categorize(store.manifest());
//!
//! for entry in catalog.entries(Category::Scripts) {
//!     let blob = store.get(&entry.storage_key)?;
//!     println!("{} ({} bytes)", entry.display_key, blob.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use pfdata_archive as archive;
pub use pfdata_common as common;
pub use pfdata_session as session;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use pfdata_archive::{
        ArchiveBuilder, ArchiveCodec, DisplayKey, Manifest, ResourceStore, StorageKey,
    };
    pub use pfdata_session::{
        Catalog, CatalogEntry, Category, CommitOutcome, Content, ContentKind, ContentSniffer,
        EditSession, ManifestCatalog, Preview, PreviewArtifacts, Workspace,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
