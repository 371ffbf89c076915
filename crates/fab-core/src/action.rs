//! Shared action/option catalog.
//!
//! Menus name their options; the definitions live here once so several scenes
//! can offer the same choice.

use serde::{Deserialize, Serialize};

use crate::map::NodeId;

/// Where an option leads once selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Destination {
    /// A scene of the current story.
    Scene {
        /// Scene name.
        name: String,
    },
    /// Another story, `story` or `story.scene`.
    Story {
        /// Story identifier.
        identifier: String,
    },
    /// A map node.
    Map {
        /// Target node id.
        node: NodeId,
    },
    /// Finish the current story.
    Finish,
}

/// A flag written when an option is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagWrite {
    /// Full flag key.
    pub key: String,
    /// Value to store.
    pub value: String,
}

/// A selectable option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOption {
    /// Catalog name referenced by menus.
    pub name: String,
    /// Text shown to the player.
    pub label: String,
    /// Where the option leads.
    pub destination: Destination,
    /// Flags written on selection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<FlagWrite>,
}

impl ActionOption {
    /// Create an option with no side effects.
    pub fn new(name: impl Into<String>, label: impl Into<String>, destination: Destination) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            destination,
            effects: Vec::new(),
        }
    }

    /// Add a flag write.
    pub fn with_effect(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.effects.push(FlagWrite {
            key: key.into(),
            value: value.into(),
        });
        self
    }
}
