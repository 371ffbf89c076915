use serde::{Deserialize, Serialize};

/// One dialogue line, optionally attributed to a speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Speaker tag, `None` for narration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// The line text.
    pub text: String,
}

impl Line {
    /// A narration line.
    pub fn narration(text: impl Into<String>) -> Self {
        Self {
            speaker: None,
            text: text.into(),
        }
    }

    /// A line spoken by `speaker`.
    pub fn spoken(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: Some(speaker.into()),
            text: text.into(),
        }
    }
}

/// A branching choice point inside a scene.
///
/// Options are names into the shared action catalog, not embedded records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    /// Menu name, unique within its scene.
    pub name: String,
    /// Prompt shown above the choices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Line>,
    /// Option names in source order.
    pub options: Vec<String>,
}

impl Menu {
    /// Create an empty menu.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: None,
            options: Vec::new(),
        }
    }
}

/// How a scene ends when it has no menu to branch from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "target")]
pub enum SceneExit {
    /// Continue at another scene (`story.scene` for another story).
    Jump(String),
    /// End of the story.
    Return,
}

/// One screen of compiled dialogue/menu content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene name, unique within its script.
    pub name: String,
    /// Dialogue lines in source order.
    pub lines: Vec<Line>,
    /// Menus in source order.
    pub menus: Vec<Menu>,
    /// Explicit exit, if the script declared one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<SceneExit>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
            menus: Vec::new(),
            exit: None,
        }
    }

    /// First menu with the given name.
    pub fn menu(&self, name: &str) -> Option<&Menu> {
        self.menus.iter().find(|m| m.name == name)
    }
}
