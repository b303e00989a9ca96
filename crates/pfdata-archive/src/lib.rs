//! Resource archive reader and writer for PFData game files.
//!
//! A resource archive is a flat table of named blobs. One reserved entry,
//! [`MANIFEST_KEY`], holds a second, nested table mapping human-readable
//! display paths to the storage keys of the blobs they describe:
//!
//! - [`ArchiveCodec`] - load, decode, encode and atomically save archives
//! - [`ResourceStore`] - owned blob table with dirty tracking
//! - [`Manifest`] - ordered display key to storage key mapping
//! - [`StorageKey`] / [`DisplayKey`] - distinct key types for the two tables
//! - [`ArchiveBuilder`] - assemble archives from scratch
//!
//! Saving writes the blob table back exactly as held in memory. The manifest
//! blob is never regenerated from the decoded view, so entries this crate
//! does not understand survive a load/save cycle byte for byte.
//!
//! # Example
//!
//! ```no_run
//! use pfdata_archive::{ArchiveCodec, DisplayKey};
//!
//! let mut store = ArchiveCodec::load("data.win")?;
//!
//! let key = store.manifest().resolve(&DisplayKey::from("scripts/main.py"))?.clone();
//! store.put(&key, b"print('hello')".to_vec())?;
//!
//! ArchiveCodec::save(&mut store, "data.win")?;
//! # Ok::<(), pfdata_archive::Error>(())
//! ```

mod builder;
mod codec;
mod error;
mod keys;
mod manifest;
mod store;

pub mod format;

pub use builder::ArchiveBuilder;
pub use codec::ArchiveCodec;
pub use error::{Corruption, Error, Result};
pub use keys::{DisplayKey, StorageKey, MANIFEST_KEY};
pub use manifest::Manifest;
pub use store::ResourceStore;
