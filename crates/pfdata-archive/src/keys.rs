//! Storage and display keys.
//!
//! An archive is indexed by [`StorageKey`]s, opaque names chosen by whatever
//! tool packed the file. The manifest maps human-facing [`DisplayKey`]s such
//! as `rooms/intro.json` onto them. The two are kept as separate types so a
//! display path can never be used to index the blob table by accident; the
//! only bridge is [`Manifest::resolve`](crate::Manifest::resolve).

use std::borrow::Borrow;
use std::fmt;

/// Storage key holding the serialized manifest.
pub const MANIFEST_KEY: &str = "!META-INF/MANIFEST";

/// Opaque key of a blob inside the archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StorageKey(String);

impl StorageKey {
    /// Create a storage key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key reserved for the embedded manifest.
    pub fn manifest() -> Self {
        Self(MANIFEST_KEY.to_string())
    }

    /// Get the key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is the reserved manifest key.
    #[inline]
    pub fn is_manifest(&self) -> bool {
        self.0 == MANIFEST_KEY
    }
}

/// Human-facing, path-like key carrying a file extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DisplayKey(String);

impl DisplayKey {
    /// Create a display key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment, e.g. `intro.json` for `rooms/intro.json`.
    ///
    /// Both `/` and `\` separate segments.
    pub fn file_name(&self) -> &str {
        self.0
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(self.0.as_str())
    }
}

macro_rules! impl_key_conversions {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $ty {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

impl_key_conversions!(StorageKey);
impl_key_conversions!(DisplayKey);
