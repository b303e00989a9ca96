//! Grouping of manifest entries into the five fixed categories.

use std::fmt;
use std::str::FromStr;

use pfdata_archive::{DisplayKey, Manifest, ResourceStore, StorageKey};
use tracing::debug;

/// Resource category, derived from the display key's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Category {
    Fonts,
    Images,
    Rooms,
    Scripts,
    Sounds,
}

impl Category {
    /// All categories in display order, which is also match precedence.
    pub const ALL: [Category; 5] = [
        Category::Fonts,
        Category::Images,
        Category::Rooms,
        Category::Scripts,
        Category::Sounds,
    ];

    /// Heading shown for this category.
    pub fn name(self) -> &'static str {
        match self {
            Category::Fonts => "Fonts",
            Category::Images => "Images",
            Category::Rooms => "Rooms",
            Category::Scripts => "Scripts",
            Category::Sounds => "Sounds",
        }
    }

    /// Whether resources of this category get an edit buffer.
    #[inline]
    pub fn is_editable(self) -> bool {
        matches!(self, Category::Rooms | Category::Scripts)
    }

    /// Check whether `key` belongs to this category.
    ///
    /// Font, room and script suffixes are case-sensitive; image and sound
    /// suffixes are not.
    pub fn matches(self, key: &str) -> bool {
        match self {
            Category::Fonts => key.ends_with(".ttf"),
            Category::Images => [".png", ".jpg", ".jpeg", ".gif", ".bmp"]
                .iter()
                .any(|ext| ends_with_ignore_case(key, ext)),
            Category::Rooms => key.ends_with(".json"),
            Category::Scripts => key.ends_with(".py"),
            Category::Sounds => [".wav", ".ogg", ".mp3"]
                .iter()
                .any(|ext| ends_with_ignore_case(key, ext)),
        }
    }

    /// First category matching `key`, if any.
    pub fn of(key: &DisplayKey) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.matches(key.as_str()))
    }
}

fn ends_with_ignore_case(key: &str, suffix: &str) -> bool {
    let (key, suffix) = (key.as_bytes(), suffix.as_bytes());
    key.len() >= suffix.len() && key[key.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (expected fonts, images, rooms, scripts or sounds)")]
pub struct ParseCategoryError(String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// One manifest entry placed under a category.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CatalogEntry {
    pub display_name: String,
    pub display_key: DisplayKey,
    pub storage_key: StorageKey,
    pub category: Category,
}

/// Entries of one category in manifest order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CategoryGroup {
    pub category: Category,
    pub entries: Vec<CatalogEntry>,
}

/// Categorized view of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Catalog {
    groups: Vec<CategoryGroup>,
    uncategorized: Vec<(DisplayKey, StorageKey)>,
}

impl Catalog {
    /// Groups for every category, in [`Category::ALL`] order, empty ones included.
    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    /// Entries of a single category.
    pub fn entries(&self, category: Category) -> &[CatalogEntry] {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.entries.as_slice())
            .unwrap_or(&[])
    }

    /// Manifest entries whose extension matches no category.
    pub fn uncategorized(&self) -> &[(DisplayKey, StorageKey)] {
        &self.uncategorized
    }

    /// Number of categorized entries.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    /// Check if no entry was categorized.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locate an entry by full display key, falling back to the first entry
    /// whose display name matches.
    pub fn find(&self, category: Category, name: &str) -> Option<&CatalogEntry> {
        let entries = self.entries(category);
        entries
            .iter()
            .find(|e| e.display_key.as_str() == name)
            .or_else(|| entries.iter().find(|e| e.display_name == name))
    }
}

/// Builds a [`Catalog`] from a manifest.
pub struct ManifestCatalog;

impl ManifestCatalog {
    /// Group every manifest entry under the first category whose suffix rule
    /// matches its display key.
    pub fn categorize(manifest: &Manifest) -> Catalog {
        let mut groups: Vec<CategoryGroup> = Category::ALL
            .into_iter()
            .map(|category| CategoryGroup {
                category,
                entries: Vec::new(),
            })
            .collect();
        let mut uncategorized = Vec::new();

        for (display, storage) in manifest.iter() {
            let group = Category::of(display)
                .and_then(|category| groups.iter_mut().find(|g| g.category == category));
            match group {
                Some(group) => group.entries.push(CatalogEntry {
                    display_name: display.file_name().to_string(),
                    display_key: display.clone(),
                    storage_key: storage.clone(),
                    category: group.category,
                }),
                None => uncategorized.push((display.clone(), storage.clone())),
            }
        }

        debug!(
            categorized = groups.iter().map(|g| g.entries.len()).sum::<usize>(),
            uncategorized = uncategorized.len(),
            "manifest categorized"
        );

        Catalog {
            groups,
            uncategorized,
        }
    }
}

/// Storage keys present in the store that no display key points at.
///
/// The reserved manifest entry is never reported.
pub fn orphans<'a>(store: &'a ResourceStore, manifest: &Manifest) -> Vec<&'a StorageKey> {
    store
        .resource_keys()
        .filter(|key| !manifest.references(key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pfdata_archive::ArchiveBuilder;
    use pretty_assertions::assert_eq;

    fn manifest(keys: &[&str]) -> Manifest {
        keys.iter()
            .enumerate()
            .map(|(i, d)| (DisplayKey::from(*d), StorageKey::new(format!("k{i}"))))
            .collect()
    }

    fn names(catalog: &Catalog, category: Category) -> Vec<&str> {
        catalog
            .entries(category)
            .iter()
            .map(|e| e.display_key.as_str())
            .collect()
    }

    #[test]
    fn test_all_categories_present_in_order() {
        let catalog = ManifestCatalog::categorize(&Manifest::new());
        let order: Vec<_> = catalog.groups().iter().map(|g| g.category).collect();

        assert_eq!(order, Category::ALL.to_vec());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_suffix_rules() {
        let catalog = ManifestCatalog::categorize(&manifest(&[
            "fonts/ui.ttf",
            "fonts/UI.TTF",
            "img/a.PNG",
            "img/b.jpeg",
            "img/c.Bmp",
            "rooms/intro.json",
            "rooms/INTRO.JSON",
            "scripts/main.py",
            "sfx/boom.WAV",
            "sfx/theme.ogg",
            "notes.txt",
        ]));

        assert_eq!(names(&catalog, Category::Fonts), vec!["fonts/ui.ttf"]);
        assert_eq!(
            names(&catalog, Category::Images),
            vec!["img/a.PNG", "img/b.jpeg", "img/c.Bmp"]
        );
        assert_eq!(names(&catalog, Category::Rooms), vec!["rooms/intro.json"]);
        assert_eq!(names(&catalog, Category::Scripts), vec!["scripts/main.py"]);
        assert_eq!(
            names(&catalog, Category::Sounds),
            vec!["sfx/boom.WAV", "sfx/theme.ogg"]
        );

        let leftover: Vec<_> = catalog
            .uncategorized()
            .iter()
            .map(|(d, _)| d.as_str())
            .collect();
        assert_eq!(leftover, vec!["fonts/UI.TTF", "rooms/INTRO.JSON", "notes.txt"]);
    }

    #[test]
    fn test_every_entry_listed_once() {
        let keys = ["a.py", "b.json", "c.png", "d.ttf", "e.mp3", "f.bin", "g.py"];
        let catalog = ManifestCatalog::categorize(&manifest(&keys));

        assert_eq!(catalog.len() + catalog.uncategorized().len(), keys.len());
    }

    #[test]
    fn test_manifest_order_within_category() {
        let catalog = ManifestCatalog::categorize(&manifest(&["z.py", "a.py", "m.py"]));
        assert_eq!(names(&catalog, Category::Scripts), vec!["z.py", "a.py", "m.py"]);
    }

    #[test]
    fn test_display_name_is_last_segment() {
        let catalog = ManifestCatalog::categorize(&manifest(&["rooms/level1/intro.json"]));
        let entry = &catalog.entries(Category::Rooms)[0];

        assert_eq!(entry.display_name, "intro.json");
        assert_eq!(entry.storage_key.as_str(), "k0");
    }

    #[test]
    fn test_find_prefers_full_key() {
        let catalog =
            ManifestCatalog::categorize(&manifest(&["a/intro.json", "intro.json", "b/x.json"]));

        assert_eq!(
            catalog.find(Category::Rooms, "intro.json").unwrap().storage_key.as_str(),
            "k1"
        );
        assert_eq!(
            catalog.find(Category::Rooms, "x.json").unwrap().storage_key.as_str(),
            "k2"
        );
        assert!(catalog.find(Category::Scripts, "intro.json").is_none());
    }

    #[test]
    fn test_parse_category() {
        assert_eq!("scripts".parse::<Category>().unwrap(), Category::Scripts);
        assert_eq!("Rooms".parse::<Category>().unwrap(), Category::Rooms);
        assert!("music".parse::<Category>().is_err());
    }

    #[test]
    fn test_orphans() {
        let store = ArchiveBuilder::new()
            .resource("main.py", "k1", b"x".to_vec())
            .raw("stray", b"y".to_vec())
            .build()
            .unwrap();

        let found: Vec<_> = orphans(&store, store.manifest())
            .into_iter()
            .map(StorageKey::as_str)
            .collect();
        assert_eq!(found, vec!["stray"]);
    }
}
