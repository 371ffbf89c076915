use serde::{Deserialize, Serialize};

use crate::action::ActionOption;
use crate::map::LocationDef;
use crate::story::StoryDef;

/// All static authoring data of a game: stories, the action catalog, and the
/// location tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Story catalog.
    #[serde(default)]
    pub stories: Vec<StoryDef>,
    /// Action/option catalog.
    #[serde(default)]
    pub actions: Vec<ActionOption>,
    /// Top-level locations.
    #[serde(default)]
    pub maps: Vec<LocationDef>,
}

impl Content {
    /// Parse content from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Story definition by name.
    pub fn story(&self, name: &str) -> Option<&StoryDef> {
        self.stories.iter().find(|s| s.name == name)
    }

    /// Action definition by name.
    pub fn action(&self, name: &str) -> Option<&ActionOption> {
        self.actions.iter().find(|a| a.name == name)
    }
}
