//! Localization and asset path collaborators.
//!
//! The engine never embeds display text or image paths. It asks a
//! [`Localizer`] and an [`AssetResolver`] using a content key (a story name or
//! a map node key) and a category (`"stories"`, `"map"`).

use std::collections::HashMap;

use serde::Deserialize;

/// Looks up localized text.
pub trait Localizer {
    /// Localized text for `key` in `category`, or `default` when none exists.
    ///
    /// A non-empty `suffix` selects a sub-entry such as `title` or `text`.
    fn resolve(&self, default: &str, key: &str, category: &str, suffix: &str) -> String;
}

/// Resolves asset paths.
pub trait AssetResolver {
    /// Path of the asset for `key` in `category`.
    ///
    /// A non-empty `default` is used as the asset's name instead of the key.
    fn resolve_path(&self, default: &str, key: &str, category: &str, extension: &str) -> String;
}

/// In-memory string table keyed by `category.key[.suffix]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LocaleTable {
    entries: HashMap<String, String>,
}

impl LocaleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry under its full dotted key.
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(key.into(), text.into());
        self
    }

    /// Parse a flat JSON object of dotted keys.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Localizer for LocaleTable {
    fn resolve(&self, default: &str, key: &str, category: &str, suffix: &str) -> String {
        let mut full = format!("{category}.{key}");
        if !suffix.is_empty() {
            full.push('.');
            full.push_str(suffix);
        }
        self.entries
            .get(&full)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

/// Derives asset paths as `<root>/<category>/<name><extension>`.
///
/// Dots in the name become path separators, so `world.earth` maps to
/// `world/earth`. A default that already starts with the root is returned
/// unchanged, which keeps resolution idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPrefix {
    root: String,
}

impl AssetPrefix {
    /// Create a resolver rooted at `root`.
    pub fn new(root: impl Into<String>) -> Self {
        let root: String = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
        }
    }

    /// The root directory.
    pub fn root(&self) -> &str {
        &self.root
    }
}

impl AssetResolver for AssetPrefix {
    fn resolve_path(&self, default: &str, key: &str, category: &str, extension: &str) -> String {
        if !default.is_empty() && default.starts_with(&format!("{}/", self.root)) {
            return default.to_string();
        }
        let name = if default.is_empty() {
            key.replace('.', "/")
        } else {
            default.to_string()
        };
        format!("{}/{category}/{name}{extension}", self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_table_lookup_with_suffix() {
        let table = LocaleTable::new()
            .with("map.world.earth.title", "Earth")
            .with("stories.intro", "A quiet start.");
        assert_eq!(table.resolve("", "world.earth", "map", "title"), "Earth");
        assert_eq!(table.resolve("fallback", "intro", "stories", ""), "A quiet start.");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn locale_table_falls_back_to_default() {
        let table = LocaleTable::new();
        assert_eq!(table.resolve("Default", "intro", "stories", ""), "Default");
        assert_eq!(table.resolve("", "world.earth", "map", "text"), "");
    }

    #[test]
    fn locale_table_from_json() {
        let table = LocaleTable::from_json(r#"{"stories.intro": "Hello"}"#).unwrap();
        assert_eq!(table.resolve("", "intro", "stories", ""), "Hello");
    }

    #[test]
    fn asset_path_from_key() {
        let assets = AssetPrefix::new("/res/");
        assert_eq!(assets.root(), "/res");
        assert_eq!(
            assets.resolve_path("", "world.earth", "map", ".jpeg"),
            "/res/map/world/earth.jpeg"
        );
        assert_eq!(assets.resolve_path("", "intro", "stories", ""), "/res/stories/intro");
    }

    #[test]
    fn asset_path_from_default_name() {
        let assets = AssetPrefix::new("/res");
        assert_eq!(
            assets.resolve_path("intro.png", "intro", "stories", ""),
            "/res/stories/intro.png"
        );
    }

    #[test]
    fn rooted_default_is_unchanged() {
        let assets = AssetPrefix::new("/res");
        let once = assets.resolve_path("cover.png", "intro", "stories", "");
        let twice = assets.resolve_path(&once, "intro", "stories", "");
        assert_eq!(once, twice);
    }
}
