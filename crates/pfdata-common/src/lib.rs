//! Common utilities for PFData.
//!
//! This crate provides the low-level building blocks shared by the archive
//! and session crates:
//!
//! - [`BinaryReader`] - Zero-copy, bounds-checked reading from byte slices
//! - [`BinaryWriter`] - Little-endian writing into a growable buffer
//! - [`crc`] - CRC32C checksums used by the container format

mod error;
mod reader;
mod writer;

pub mod crc;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
