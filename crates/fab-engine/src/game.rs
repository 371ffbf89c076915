//! Game orchestrator.
//!
//! [`Game`] owns the story state, the map state and the collaborator ports.
//! Holding everything behind `&mut self` is what keeps story switches and
//! scene queries strictly sequenced.

use std::fmt;

use fab_core::{
    ActionOption, Content, Destination, FlagStore, LocationDef, MemoryFlags, MemoryStorage,
    NodeId, Scene, SceneExit, UserId, UserStorage, keys,
};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::gate::{self, Access};
use crate::locale::{AssetPrefix, AssetResolver, LocaleTable, Localizer};
use crate::map::{MapBuilder, MapState};
use crate::story::StoryState;

/// Which surface the player is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Reading a story.
    Story,
    /// Navigating the world map.
    #[default]
    Map,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Story => write!(f, "story"),
            Mode::Map => write!(f, "map"),
        }
    }
}

/// Outcome of following an option or a scene exit.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Show this scene.
    Scene(Scene),
    /// The destination scene does not exist; the caller decides what to do.
    Missing {
        /// Story that was searched.
        story: String,
        /// Scene that was asked for.
        scene: String,
    },
    /// An option led to a map node.
    Map {
        /// Requested node.
        node: NodeId,
        /// Access of the node; the player only moves, and the game only
        /// switches to the map, when it is enterable.
        access: Access,
    },
    /// The story was finished and the map loaded.
    Finished {
        /// Finished story.
        story: String,
    },
}

/// A running game: stories, map, flags and storage.
pub struct Game {
    config: EngineConfig,
    story: StoryState,
    maps: Vec<LocationDef>,
    map: MapState,
    mode: Mode,
    flags: Box<dyn FlagStore>,
    storage: Box<dyn UserStorage>,
    locale: Box<dyn Localizer>,
    assets: Box<dyn AssetResolver>,
    user: Option<UserId>,
    place: Option<NodeId>,
}

impl Game {
    /// Create a game over static content with in-memory ports.
    pub fn new(content: Content, config: EngineConfig) -> Self {
        let story = StoryState::new(content.stories, content.actions)
            .with_start_scene(config.start_scene.clone());
        let assets = AssetPrefix::new(config.asset_root.clone());
        Self {
            story,
            maps: content.maps,
            map: MapState::default(),
            mode: Mode::default(),
            flags: Box::new(MemoryFlags::new()),
            storage: Box::new(MemoryStorage::new()),
            locale: Box::new(LocaleTable::new()),
            assets: Box::new(assets),
            user: None,
            place: None,
            config,
        }
    }

    /// Use a different flag store.
    pub fn with_flags(mut self, flags: impl FlagStore + 'static) -> Self {
        self.flags = Box::new(flags);
        self
    }

    /// Use a different user storage.
    pub fn with_storage(mut self, storage: impl UserStorage + 'static) -> Self {
        self.storage = Box::new(storage);
        self
    }

    /// Use a different localizer.
    pub fn with_locale(mut self, locale: impl Localizer + 'static) -> Self {
        self.locale = Box::new(locale);
        self
    }

    /// Use a different asset resolver.
    pub fn with_assets(mut self, assets: impl AssetResolver + 'static) -> Self {
        self.assets = Box::new(assets);
        self
    }

    /// Play as `user`, enabling the persisted map overlay.
    pub fn with_user(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }

    /// Set the saved location the map opens at.
    pub fn with_place(mut self, place: impl Into<NodeId>) -> Self {
        self.place = Some(place.into());
        self
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current surface.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Story state.
    pub fn story(&self) -> &StoryState {
        &self.story
    }

    /// Map state; empty until the map is first loaded.
    pub fn map(&self) -> &MapState {
        &self.map
    }

    /// Flag store.
    pub fn flags(&self) -> &dyn FlagStore {
        self.flags.as_ref()
    }

    /// Saved location.
    pub fn place(&self) -> Option<&NodeId> {
        self.place.as_ref()
    }

    /// Localize the story catalog. Safe to call repeatedly.
    pub fn init_story(&mut self) {
        self.story.init(self.locale.as_ref(), self.assets.as_ref());
    }

    /// Activate a story by `name` or `name.scene`; see
    /// [`StoryState::set_current_story`].
    pub fn set_current_story(&mut self, identifier: &str) -> EngineResult<bool> {
        let activated = self.story.set_current_story(identifier)?;
        if activated {
            self.mode = Mode::Story;
        }
        Ok(activated)
    }

    /// A scene of the active story, `None` meaning the start scene.
    pub fn story_scene(&self, name: Option<&str>) -> Option<&Scene> {
        self.story.story_scene(name)
    }

    /// Option names of a menu inside a scene.
    pub fn scene_options(&self, scene: &str, menu: &str) -> Option<&[String]> {
        self.story.scene_options(scene, menu)
    }

    /// Catalog entries named in `names`, in catalog order.
    pub fn options<S: AsRef<str>>(&self, names: &[S]) -> Vec<&ActionOption> {
        self.story.options(names)
    }

    /// Activate a story and return its entry scene.
    pub fn enter_story(&mut self, identifier: &str) -> EngineResult<Step> {
        if self.set_current_story(identifier)? {
            let scene = self.story.current().next_scene.clone();
            Ok(self.scene_step(scene.as_deref()))
        } else {
            let mut parts = identifier.split('.');
            Ok(Step::Missing {
                story: parts.next().unwrap_or_default().to_string(),
                scene: parts
                    .next()
                    .unwrap_or(&self.config.start_scene)
                    .to_string(),
            })
        }
    }

    /// Record that `story` was finished, switch to the map and load it at
    /// the saved place.
    ///
    /// The flag is written first. If that write fails nothing else happens;
    /// if the map cannot be built the flag stays written but the mode and
    /// story are left as they were.
    pub fn story_finished(&mut self, story: &str) -> EngineResult<()> {
        let key = keys::finished_flag(&self.config.story_module, story);
        if let Err(e) = self.flags.set(&key, "1") {
            warn!(story, error = %e, "could not record story completion");
            return Err(e.into());
        }
        info!(story, flag = %key, "story finished");

        let map = self.build_map(self.place.as_ref())?;
        self.story.clear();
        self.map = map;
        self.mode = Mode::Map;
        Ok(())
    }

    /// (Re)build the map and show it, placing the player at `place`.
    pub fn load_map(&mut self, place: Option<&NodeId>) -> EngineResult<()> {
        self.map = self.build_map(place)?;
        self.mode = Mode::Map;
        Ok(())
    }

    /// Access of a node right now.
    pub fn access(&self, id: &NodeId) -> EngineResult<Access> {
        let node = self
            .map
            .node(id)
            .ok_or_else(|| EngineError::UnknownNode(id.clone()))?;
        Ok(gate::access(node, self.flags.as_ref())?)
    }

    /// Move to a node if its access allows it.
    ///
    /// Open and hidden nodes can be entered and switch the game to the map;
    /// disabled and locked ones leave the player, and the mode, where they
    /// are. Entering persists the overlay.
    pub fn enter(&mut self, id: &NodeId) -> EngineResult<Access> {
        if self.map.is_empty() {
            self.map = self.build_map(self.place.as_ref())?;
        }
        let access = self.access(id)?;
        if access.is_enterable() {
            self.map.visit(id, self.storage.as_mut())?;
            self.place = Some(id.clone());
            self.mode = Mode::Map;
        } else {
            debug!(node = %id, %access, "entry refused");
        }
        Ok(access)
    }

    /// Unlock a node for this player.
    pub fn unlock(&mut self, id: &NodeId) -> EngineResult<()> {
        if self.map.is_empty() {
            self.map = self.build_map(self.place.as_ref())?;
        }
        self.map.unlock(id, self.storage.as_mut())
    }

    /// Select an option: apply its flag writes, then follow its destination.
    ///
    /// The writes go to the flag store as one [`FlagStore::set_all`] call;
    /// if that fails the destination is not followed. A map destination is
    /// checked before anything is written. The writes record the choice,
    /// so they stay even when following the destination later fails.
    pub fn choose(&mut self, option: &str) -> EngineResult<Step> {
        let action = self
            .story
            .action(option)
            .cloned()
            .ok_or_else(|| EngineError::UnknownOption(option.to_string()))?;

        if let Destination::Map { node } = &action.destination {
            if self.map.is_empty() {
                self.map = self.build_map(self.place.as_ref())?;
            }
            if self.map.node(node).is_none() {
                return Err(EngineError::UnknownNode(node.clone()));
            }
        }

        self.flags.set_all(&action.effects)?;
        debug!(option, effects = action.effects.len(), "option chosen");

        match action.destination {
            Destination::Scene { name } => Ok(self.scene_step(Some(&name))),
            Destination::Story { identifier } => self.enter_story(&identifier),
            Destination::Map { node } => {
                let access = self.enter(&node)?;
                Ok(Step::Map { node, access })
            }
            Destination::Finish => self.finish_current(),
        }
    }

    /// Follow a scene's explicit exit.
    ///
    /// A dotted jump target switches story; a plain one stays in the
    /// current story.
    pub fn follow_exit(&mut self, exit: &SceneExit) -> EngineResult<Step> {
        match exit {
            SceneExit::Jump(target) if target.contains('.') => self.enter_story(target),
            SceneExit::Jump(target) => Ok(self.scene_step(Some(target))),
            SceneExit::Return => self.finish_current(),
        }
    }

    fn finish_current(&mut self) -> EngineResult<Step> {
        if !self.story.is_active() {
            return Err(EngineError::NoActiveStory);
        }
        let story = self.story.current().name.clone();
        self.story_finished(&story)?;
        Ok(Step::Finished { story })
    }

    fn scene_step(&self, name: Option<&str>) -> Step {
        match self.story.story_scene(name) {
            Some(scene) => Step::Scene(scene.clone()),
            None => Step::Missing {
                story: self.story.current().name.clone(),
                scene: name.unwrap_or(&self.config.start_scene).to_string(),
            },
        }
    }

    fn build_map(&self, place: Option<&NodeId>) -> EngineResult<MapState> {
        let builder = MapBuilder::new(&self.maps, self.locale.as_ref(), self.assets.as_ref());
        if self.map.is_empty() {
            MapState::load(
                &builder,
                self.storage.as_ref(),
                self.user,
                &self.config,
                place,
            )
        } else {
            self.map
                .reload(&builder, self.storage.as_ref(), &self.config, place)
        }
    }
}
