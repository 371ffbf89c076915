//! Engine configuration.

use serde::Deserialize;

/// Configuration for a game engine instance.
///
/// Every field has a default, so a TOML file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Namespace of story flags (`<story_module>.finished.<story>`).
    pub story_module: String,
    /// Namespace of the map overlay key (`<map_module>.allMaps`).
    pub map_module: String,
    /// Scene shown when a story is entered without an explicit scene.
    pub start_scene: String,
    /// Root directory prepended to derived asset paths.
    pub asset_root: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            story_module: "game-story".to_string(),
            map_module: "game-map".to_string(),
            start_scene: "start".to_string(),
            asset_root: "/resources/images".to_string(),
        }
    }
}

impl EngineConfig {
    /// Set the story flag namespace.
    pub fn with_story_module(mut self, module: impl Into<String>) -> Self {
        self.story_module = module.into();
        self
    }

    /// Set the map overlay namespace.
    pub fn with_map_module(mut self, module: impl Into<String>) -> Self {
        self.map_module = module.into();
        self
    }

    /// Set the default entry scene.
    pub fn with_start_scene(mut self, scene: impl Into<String>) -> Self {
        self.start_scene = scene.into();
        self
    }

    /// Set the asset root (a trailing `/` is dropped).
    pub fn with_asset_root(mut self, root: impl Into<String>) -> Self {
        let root: String = root.into();
        self.asset_root = root.trim_end_matches('/').to_string();
        self
    }
}
