use std::fmt;

use serde::{Deserialize, Serialize};

/// Narrative track a story belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoryKind {
    /// Main plot.
    #[default]
    MainLine,
    /// Optional side plot.
    SideLine,
}

impl fmt::Display for StoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoryKind::MainLine => write!(f, "main-line"),
            StoryKind::SideLine => write!(f, "side-line"),
        }
    }
}

/// Immutable authoring record for a story.
///
/// `cover` and `text` are defaults; the presentation values shown to the
/// player are derived from them by the localization pass and never written
/// back here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryDef {
    /// Unique story name.
    pub name: String,
    /// Narrative track.
    #[serde(rename = "type", default)]
    pub kind: StoryKind,
    /// Default cover path, empty to derive one from the name.
    #[serde(default)]
    pub cover: String,
    /// Default synopsis paragraphs.
    #[serde(default)]
    pub text: Vec<String>,
    /// Raw script source.
    #[serde(default)]
    pub script: String,
}

impl StoryDef {
    /// Create a story definition with the given name and script.
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StoryKind::MainLine,
            cover: String::new(),
            text: Vec::new(),
            script: script.into(),
        }
    }

    /// Set the narrative track.
    pub fn with_kind(mut self, kind: StoryKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the default cover path.
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = cover.into();
        self
    }

    /// Append a default synopsis paragraph.
    pub fn with_text(mut self, paragraph: impl Into<String>) -> Self {
        self.text.push(paragraph.into());
        self
    }
}

/// Presentation record of a story, as held by the story state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Story name (identity).
    pub name: String,
    /// Narrative track.
    #[serde(rename = "type")]
    pub kind: StoryKind,
    /// Resolved cover asset path.
    pub cover: String,
    /// Localized synopsis paragraphs.
    pub text: Vec<String>,
    /// Raw script source.
    pub script: String,
    /// Scene requested when the story was selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_scene: Option<String>,
}

impl Story {
    /// Name of the sentinel story held while nothing is active.
    pub const NONE: &'static str = "none";

    /// The sentinel "no story" record.
    pub fn none() -> Self {
        Self {
            name: Self::NONE.to_string(),
            kind: StoryKind::MainLine,
            cover: String::new(),
            text: Vec::new(),
            script: String::new(),
            next_scene: None,
        }
    }

    /// Whether this is the sentinel record.
    pub fn is_none(&self) -> bool {
        self.name == Self::NONE
    }
}

impl From<&StoryDef> for Story {
    fn from(def: &StoryDef) -> Self {
        Self {
            name: def.name.clone(),
            kind: def.kind,
            cover: def.cover.clone(),
            text: def.text.clone(),
            script: def.script.clone(),
            next_scene: None,
        }
    }
}
