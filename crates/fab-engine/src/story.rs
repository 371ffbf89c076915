//! Story state machine.
//!
//! Holds the presentation catalog, the active story and its compiled scenes.
//! The state is either idle (the sentinel story, no scenes) or active.

use fab_core::{ActionOption, Menu, Scene, Story, StoryDef};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::locale::{AssetResolver, Localizer};

const STORY_CATEGORY: &str = "stories";

/// The active story, its scenes, and the catalogs they draw from.
#[derive(Debug, Clone)]
pub struct StoryState {
    defs: Vec<StoryDef>,
    actions: Vec<ActionOption>,
    catalog: Vec<Story>,
    current: Story,
    scenes: Vec<Scene>,
    start_scene: String,
}

impl StoryState {
    /// Create an idle state over the given story and action catalogs.
    ///
    /// Presentation records start as plain copies of the definitions; call
    /// [`StoryState::init`] to localize them.
    pub fn new(defs: Vec<StoryDef>, actions: Vec<ActionOption>) -> Self {
        let catalog = defs.iter().map(Story::from).collect();
        Self {
            defs,
            actions,
            catalog,
            current: Story::none(),
            scenes: Vec::new(),
            start_scene: "start".to_string(),
        }
    }

    /// Set the scene used when no scene name is given.
    pub fn with_start_scene(mut self, scene: impl Into<String>) -> Self {
        self.start_scene = scene.into();
        self
    }

    /// Resolve display text and cover art of every story.
    ///
    /// Records are rebuilt from the immutable definitions each time, so
    /// calling this again yields the same catalog.
    pub fn init(&mut self, locale: &dyn Localizer, assets: &dyn AssetResolver) {
        self.catalog = self
            .defs
            .iter()
            .map(|def| {
                let default_text = def.text.join("\n");
                let text = locale.resolve(&default_text, &def.name, STORY_CATEGORY, "");
                let mut story = Story::from(def);
                story.text = text.lines().map(str::to_string).collect();
                story.cover = assets.resolve_path(&def.cover, &def.name, STORY_CATEGORY, "");
                story
            })
            .collect();

        if let Some(story) = self.catalog.iter().find(|s| s.name == self.current.name) {
            let next_scene = self.current.next_scene.take();
            self.current = story.clone();
            self.current.next_scene = next_scene;
        }
        debug!(stories = self.catalog.len(), "initialized story catalog");
    }

    /// Activate a story by `name` or `name.scene`.
    ///
    /// Returns `Ok(false)` and leaves the state untouched when the story is
    /// unknown. A script that fails to compile is an error and also leaves
    /// the previous story active.
    pub fn set_current_story(&mut self, identifier: &str) -> EngineResult<bool> {
        let mut parts = identifier.split('.');
        let name = parts.next().unwrap_or_default();
        let next_scene = parts.next().map(str::to_string);

        let Some(story) = self.catalog.iter().find(|s| s.name == name) else {
            warn!(story = name, "ignoring unknown story");
            return Ok(false);
        };

        let scenes = fab_script::compile(&story.script).map_err(|source| {
            warn!(story = name, "story script failed to compile");
            EngineError::Compile {
                story: name.to_string(),
                source,
            }
        })?;

        let mut story = story.clone();
        story.next_scene = next_scene;
        info!(
            story = %story.name,
            scene = story.next_scene.as_deref().unwrap_or(&self.start_scene),
            scenes = scenes.len(),
            "story activated"
        );
        self.current = story;
        self.scenes = scenes;
        Ok(true)
    }

    /// Return to the idle state.
    pub fn clear(&mut self) {
        self.current = Story::none();
        self.scenes.clear();
    }

    /// The active story, or the sentinel when idle.
    pub fn current(&self) -> &Story {
        &self.current
    }

    /// Whether a story is active.
    pub fn is_active(&self) -> bool {
        !self.current.is_none()
    }

    /// Compiled scenes of the active story.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Localized presentation records of every story.
    pub fn catalog(&self) -> &[Story] {
        &self.catalog
    }

    /// A scene of the active story; `None` means the start scene.
    pub fn story_scene(&self, name: Option<&str>) -> Option<&Scene> {
        let name = name.unwrap_or(&self.start_scene);
        self.scenes.iter().find(|s| s.name == name)
    }

    /// The scene requested on activation, or the start scene.
    pub fn entry_scene(&self) -> Option<&Scene> {
        self.story_scene(self.current.next_scene.as_deref())
    }

    /// Option names of a menu inside a scene.
    pub fn scene_options(&self, scene: &str, menu: &str) -> Option<&[String]> {
        self.story_scene(Some(scene))
            .and_then(|s| s.menu(menu))
            .map(|m: &Menu| m.options.as_slice())
    }

    /// Catalog entries whose names appear in `names`, in catalog order.
    pub fn options<S: AsRef<str>>(&self, names: &[S]) -> Vec<&ActionOption> {
        self.actions
            .iter()
            .filter(|a| names.iter().any(|n| n.as_ref() == a.name))
            .collect()
    }

    /// A catalog entry by name.
    pub fn action(&self, name: &str) -> Option<&ActionOption> {
        self.actions.iter().find(|a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{AssetPrefix, LocaleTable};
    use fab_core::Destination;

    const INTRO: &str = "label start:\n    \"Welcome.\"\n    menu first:\n        - go_on\n        - stay\nlabel chapter2:\n    \"Later.\"\n    return\n";

    fn state() -> StoryState {
        StoryState::new(
            vec![
                StoryDef::new("intro", INTRO).with_text("Where it begins."),
                StoryDef::new("empty", "label other:\n    return\n"),
                StoryDef::new("broken", "label a:\n    - stray\n"),
            ],
            vec![
                ActionOption::new("stay", "Stay", Destination::Finish),
                ActionOption::new(
                    "go_on",
                    "Go on",
                    Destination::Scene {
                        name: "chapter2".into(),
                    },
                ),
                ActionOption::new("unused", "Unused", Destination::Finish),
            ],
        )
    }

    #[test]
    fn starts_idle() {
        let s = state();
        assert!(!s.is_active());
        assert!(s.current().is_none());
        assert!(s.scenes().is_empty());
        assert!(s.story_scene(None).is_none());
    }

    #[test]
    fn set_current_story_with_scene() {
        let mut s = state();
        assert!(s.set_current_story("intro.chapter2").unwrap());
        assert_eq!(s.current().name, "intro");
        assert_eq!(s.current().next_scene.as_deref(), Some("chapter2"));
        assert_eq!(s.scenes().len(), 2);
        assert_eq!(s.entry_scene().map(|sc| sc.name.as_str()), Some("chapter2"));
    }

    #[test]
    fn unknown_story_is_a_no_op() {
        let mut s = state();
        s.set_current_story("intro").unwrap();
        assert!(!s.set_current_story("missing").unwrap());
        assert_eq!(s.current().name, "intro");
        assert_eq!(s.scenes().len(), 2);
    }

    #[test]
    fn compile_failure_keeps_previous_story() {
        let mut s = state();
        s.set_current_story("intro").unwrap();
        let err = s.set_current_story("broken").unwrap_err();
        assert!(matches!(err, EngineError::Compile { ref story, .. } if story == "broken"));
        assert_eq!(s.current().name, "intro");
        assert_eq!(s.scenes().len(), 2);
    }

    #[test]
    fn story_scene_defaults_to_start() {
        let mut s = state();
        s.set_current_story("intro").unwrap();
        assert_eq!(s.story_scene(None).unwrap().name, "start");
        assert_eq!(s.current().next_scene, None);

        s.set_current_story("empty").unwrap();
        assert!(s.story_scene(None).is_none());
        assert!(s.story_scene(Some("other")).is_some());
    }

    #[test]
    fn scene_options_two_level_lookup() {
        let mut s = state();
        s.set_current_story("intro").unwrap();
        assert_eq!(
            s.scene_options("start", "first").unwrap(),
            ["go_on".to_string(), "stay".to_string()]
        );
        assert!(s.scene_options("start", "nope").is_none());
        assert!(s.scene_options("nope", "first").is_none());
    }

    #[test]
    fn options_keep_catalog_order() {
        let s = state();
        let names: Vec<_> = s
            .options(&["go_on", "stay", "ghost"])
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["stay", "go_on"]);
    }

    #[test]
    fn init_is_idempotent() {
        let mut s = state();
        let locale = LocaleTable::new().with("stories.intro", "Localized intro.");
        let assets = AssetPrefix::new("/res");

        s.init(&locale, &assets);
        let once = s.catalog().to_vec();
        s.init(&locale, &assets);
        assert_eq!(s.catalog(), once.as_slice());

        let intro = &once[0];
        assert_eq!(intro.text, vec!["Localized intro."]);
        assert_eq!(intro.cover, "/res/stories/intro");
        assert_eq!(once[1].text, Vec::<String>::new());
    }

    #[test]
    fn init_refreshes_active_story() {
        let mut s = state();
        s.set_current_story("intro.chapter2").unwrap();
        s.init(&LocaleTable::new(), &AssetPrefix::new("/res"));
        assert_eq!(s.current().cover, "/res/stories/intro");
        assert_eq!(s.current().next_scene.as_deref(), Some("chapter2"));
    }

    #[test]
    fn clear_returns_to_idle() {
        let mut s = state();
        s.set_current_story("intro").unwrap();
        s.clear();
        assert!(!s.is_active());
        assert!(s.scenes().is_empty());
    }
}
