//! World map graph builder and navigation state.
//!
//! Building runs in three passes over the authoring tree:
//!
//! 1. [`assign_ids`] gives every location its id and parent id.
//! 2. [`flatten`] emits one [`MapNode`] per location, depth first, with
//!    localized text and a successor.
//! 3. [`merge_overlay`] appends defaults missing from the user's saved set.

use std::collections::HashSet;

use fab_core::map::content_key;
use fab_core::{FlagStore, LocationDef, MapNode, NodeId, StoreResult, UserId, UserStorage, keys};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::gate::{Access, access};
use crate::locale::{AssetResolver, Localizer};

const MAP_CATEGORY: &str = "map";
const COVER_EXTENSION: &str = ".jpeg";

/// Errors in the authoring tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// Two locations produce the same id.
    #[error("duplicate map node id: {id}")]
    DuplicateNode {
        /// The repeated id.
        id: NodeId,
    },
}

/// A location with its id and parent id assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLocation<'a> {
    /// Authoring record.
    pub def: &'a LocationDef,
    /// `<level>.<name>`.
    pub id: NodeId,
    /// Id of the traversal parent, `"root"` at the top.
    pub pid: NodeId,
    /// Placed children in authoring order.
    pub children: Vec<PlacedLocation<'a>>,
}

/// Assign ids and parent ids over the whole tree.
pub fn assign_ids(tree: &[LocationDef]) -> Vec<PlacedLocation<'_>> {
    place(tree, &NodeId::root())
}

fn place<'a>(defs: &'a [LocationDef], pid: &NodeId) -> Vec<PlacedLocation<'a>> {
    defs.iter()
        .map(|def| {
            let id = def.id();
            PlacedLocation {
                children: place(&def.children, &id),
                def,
                id,
                pid: pid.clone(),
            }
        })
        .collect()
}

/// Flatten a placed tree depth first, parents before their children.
///
/// A node with children advances to its first child; a leaf keeps the
/// successor its author declared.
pub fn flatten(
    placed: &[PlacedLocation<'_>],
    locale: &dyn Localizer,
    assets: &dyn AssetResolver,
) -> Result<Vec<MapNode>, MapError> {
    let mut nodes = Vec::new();
    let mut seen = HashSet::new();
    for location in placed {
        visit(location, locale, assets, &mut seen, &mut nodes)?;
    }
    Ok(nodes)
}

fn visit(
    location: &PlacedLocation<'_>,
    locale: &dyn Localizer,
    assets: &dyn AssetResolver,
    seen: &mut HashSet<NodeId>,
    out: &mut Vec<MapNode>,
) -> Result<(), MapError> {
    if !seen.insert(location.id.clone()) {
        return Err(MapError::DuplicateNode {
            id: location.id.clone(),
        });
    }

    let def = location.def;
    let key = content_key(def.level, &def.name);
    let next = match location.children.first() {
        Some(first) => Some(first.id.clone()),
        None => def.next.clone(),
    };

    out.push(MapNode {
        id: location.id.clone(),
        pid: location.pid.clone(),
        name: def.name.clone(),
        level: def.level,
        title: locale.resolve("", &key, MAP_CATEGORY, "title"),
        text: locale.resolve("", &key, MAP_CATEGORY, "text"),
        cover: assets.resolve_path("", &key, MAP_CATEGORY, COVER_EXTENSION),
        options: def.options.clone(),
        icon: def.icon.clone(),
        is_disabled: def.is_disabled,
        is_show: def.is_show != Some(false),
        order: def.order,
        is_locked: def.is_locked,
        condition: def.condition.clone(),
        next,
    });

    for child in &location.children {
        visit(child, locale, assets, seen, out)?;
    }
    Ok(())
}

/// Extend the user's saved nodes with every default whose id they lack.
///
/// Saved nodes are kept verbatim and in their saved order.
pub fn merge_overlay(mut user: Vec<MapNode>, defaults: Vec<MapNode>) -> Vec<MapNode> {
    let known: HashSet<NodeId> = user.iter().map(|n| n.id.clone()).collect();
    user.extend(defaults.into_iter().filter(|n| !known.contains(&n.id)));
    user
}

/// Builds map nodes from the authoring tree and the user's overlay.
pub struct MapBuilder<'a> {
    tree: &'a [LocationDef],
    locale: &'a dyn Localizer,
    assets: &'a dyn AssetResolver,
}

impl<'a> MapBuilder<'a> {
    /// Create a builder over a location tree.
    pub fn new(
        tree: &'a [LocationDef],
        locale: &'a dyn Localizer,
        assets: &'a dyn AssetResolver,
    ) -> Self {
        Self {
            tree,
            locale,
            assets,
        }
    }

    /// The default flattened nodes.
    pub fn defaults(&self) -> Result<Vec<MapNode>, MapError> {
        flatten(&assign_ids(self.tree), self.locale, self.assets)
    }

    /// Nodes for `user`, merged with their saved overlay when one exists.
    ///
    /// Without a user, or before the user has saved anything, the defaults
    /// are returned unmodified.
    pub fn build(
        &self,
        user: Option<UserId>,
        storage: &dyn UserStorage,
        map_module: &str,
    ) -> EngineResult<Vec<MapNode>> {
        let defaults = self.defaults()?;
        let Some(user) = user else {
            return Ok(defaults);
        };

        let key = keys::map_overlay(map_module);
        let Some(payload) = storage.find(user, &key)? else {
            return Ok(defaults);
        };
        let saved: Vec<MapNode> = serde_json::from_str(&payload)
            .map_err(|source| EngineError::Overlay { key, source })?;

        let saved_len = saved.len();
        let merged = merge_overlay(saved, defaults);
        debug!(
            %user,
            saved = saved_len,
            added = merged.len() - saved_len,
            "merged map overlay"
        );
        Ok(merged)
    }
}

/// The map graph the player navigates, with their current position.
#[derive(Debug, Clone, Default)]
pub struct MapState {
    nodes: Vec<MapNode>,
    current: Option<NodeId>,
    user: Option<UserId>,
    overlay_key: String,
}

impl MapState {
    /// Build the graph for `user` and place them at `place`.
    ///
    /// An unknown or absent place selects the first top-level node.
    pub fn load(
        builder: &MapBuilder<'_>,
        storage: &dyn UserStorage,
        user: Option<UserId>,
        config: &EngineConfig,
        place: Option<&NodeId>,
    ) -> EngineResult<Self> {
        let nodes = builder.build(user, storage, &config.map_module)?;
        Ok(Self::placed(nodes, user, config, place))
    }

    /// Rebuild the graph for the same user, keeping this state's nodes.
    ///
    /// Changes made in this session win over both the saved overlay and the
    /// defaults, so an unlock survives a rebuild even without a user to
    /// persist it for.
    pub fn reload(
        &self,
        builder: &MapBuilder<'_>,
        storage: &dyn UserStorage,
        config: &EngineConfig,
        place: Option<&NodeId>,
    ) -> EngineResult<Self> {
        let built = builder.build(self.user, storage, &config.map_module)?;
        let nodes = merge_overlay(self.nodes.clone(), built);
        Ok(Self::placed(nodes, self.user, config, place))
    }

    fn placed(
        nodes: Vec<MapNode>,
        user: Option<UserId>,
        config: &EngineConfig,
        place: Option<&NodeId>,
    ) -> Self {
        let mut state = Self {
            nodes,
            current: None,
            user,
            overlay_key: keys::map_overlay(&config.map_module),
        };
        state.current = place
            .filter(|id| state.node(id).is_some())
            .or_else(|| state.nodes.iter().find(|n| n.pid.is_root()).map(|n| &n.id))
            .cloned();
        info!(
            nodes = state.nodes.len(),
            place = state.current.as_ref().map(NodeId::as_str).unwrap_or("-"),
            "map loaded"
        );
        state
    }

    /// All nodes in graph order.
    pub fn nodes(&self) -> &[MapNode] {
        &self.nodes
    }

    /// Whether no map has been loaded.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A node by id.
    pub fn node(&self, id: &NodeId) -> Option<&MapNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// The node the player is at.
    pub fn current(&self) -> Option<&MapNode> {
        self.current.as_ref().and_then(|id| self.node(id))
    }

    /// Nodes whose parent is `pid`, sorted by `order` (unordered nodes last,
    /// ties in graph order).
    pub fn children(&self, pid: &NodeId) -> Vec<&MapNode> {
        let mut children: Vec<&MapNode> = self.nodes.iter().filter(|n| &n.pid == pid).collect();
        children.sort_by_key(|n| (n.order.is_none(), n.order));
        children
    }

    /// The successor of `id`, if it names a node in the graph.
    pub fn advance(&self, id: &NodeId) -> Option<&MapNode> {
        self.node(id)
            .and_then(|n| n.next.as_ref())
            .and_then(|next| self.node(next))
    }

    /// Children of `pid` with their access, hidden ones left out.
    pub fn listing(&self, pid: &NodeId, flags: &dyn FlagStore) -> StoreResult<Vec<(&MapNode, Access)>> {
        let mut out = Vec::new();
        for node in self.children(pid).into_iter().filter(|n| n.is_show) {
            out.push((node, access(node, flags)?));
        }
        Ok(out)
    }

    /// Move the player to `id` without touching storage.
    pub fn enter(&mut self, id: &NodeId) -> EngineResult<&MapNode> {
        let index = self.index_of(id)?;
        self.current = Some(id.clone());
        Ok(&self.nodes[index])
    }

    /// Unlock a node and persist the overlay.
    pub fn unlock(&mut self, id: &NodeId, storage: &mut dyn UserStorage) -> EngineResult<()> {
        let index = self.index_of(id)?;
        self.nodes[index].is_locked = false;
        info!(node = %id, "node unlocked");
        self.persist(storage)
    }

    /// Reveal a node, move the player there, and persist the overlay.
    pub fn visit(&mut self, id: &NodeId, storage: &mut dyn UserStorage) -> EngineResult<()> {
        let index = self.index_of(id)?;
        self.nodes[index].is_show = true;
        self.current = Some(id.clone());
        debug!(node = %id, "node visited");
        self.persist(storage)
    }

    fn index_of(&self, id: &NodeId) -> EngineResult<usize> {
        self.nodes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| EngineError::UnknownNode(id.clone()))
    }

    fn persist(&self, storage: &mut dyn UserStorage) -> EngineResult<()> {
        let Some(user) = self.user else {
            return Ok(());
        };
        let payload = serde_json::to_string(&self.nodes).map_err(EngineError::OverlayEncode)?;
        storage.save(user, &self.overlay_key, payload)?;
        debug!(%user, key = %self.overlay_key, "map overlay saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{AssetPrefix, LocaleTable};
    use fab_core::{Level, MemoryStorage, StoreError};

    fn tree() -> Vec<LocationDef> {
        vec![
            LocationDef::new(Level::World, "earth").with_child(
                LocationDef::new(Level::Region, "vale")
                    .with_child(
                        LocationDef::new(Level::Building, "inn")
                            .with_child(LocationDef::new(Level::Room, "inn").with_order(2))
                            .with_child(LocationDef::new(Level::Room, "cellar").with_order(1).locked()),
                    )
                    .with_child(LocationDef::new(Level::Building, "mill").with_next("region.vale")),
            ),
            LocationDef::new(Level::World, "moon").hidden(),
        ]
    }

    fn defaults() -> Vec<MapNode> {
        let tree = tree();
        let locale = LocaleTable::new();
        let assets = AssetPrefix::new("/res");
        MapBuilder::new(&tree, &locale, &assets).defaults().unwrap()
    }

    #[test]
    fn ids_and_parents() {
        let tree = tree();
        let placed = assign_ids(&tree);
        assert_eq!(placed[0].id.as_str(), "world.earth");
        assert!(placed[0].pid.is_root());
        let vale = &placed[0].children[0];
        assert_eq!(vale.id.as_str(), "region.vale");
        assert_eq!(vale.pid.as_str(), "world.earth");
        assert_eq!(vale.children[0].children[1].pid.as_str(), "building.inn");
    }

    #[test]
    fn flatten_is_depth_first() {
        let ids: Vec<_> = defaults().iter().map(|n| n.id.to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "world.earth",
                "region.vale",
                "building.inn",
                "room.inn",
                "room.cellar",
                "building.mill",
                "world.moon",
            ]
        );
    }

    #[test]
    fn next_is_first_child_or_declared() {
        let nodes = defaults();
        let next = |id: &str| {
            nodes
                .iter()
                .find(|n| n.id.as_str() == id)
                .and_then(|n| n.next.clone())
        };
        assert_eq!(next("world.earth"), Some(NodeId::from("region.vale")));
        assert_eq!(next("building.inn"), Some(NodeId::from("room.inn")));
        assert_eq!(next("building.mill"), Some(NodeId::from("region.vale")));
        assert_eq!(next("room.cellar"), None);
    }

    #[test]
    fn rooms_share_building_content() {
        let tree = tree();
        let locale = LocaleTable::new()
            .with("map.building.inn.title", "The Inn")
            .with("map.world.earth.text", "Home.");
        let assets = AssetPrefix::new("/res");
        let builder = MapBuilder::new(&tree, &locale, &assets);
        let nodes = builder.defaults().unwrap();
        let room = nodes.iter().find(|n| n.id.as_str() == "room.inn").unwrap();
        assert_eq!(room.title, "The Inn");
        assert_eq!(room.cover, "/res/map/building/inn.jpeg");
        assert_eq!(nodes[0].text, "Home.");
        assert_eq!(nodes[0].title, "");
    }

    #[test]
    fn visibility_defaults_to_shown() {
        let nodes = defaults();
        assert!(nodes[0].is_show);
        assert!(!nodes.last().unwrap().is_show);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let tree = vec![
            LocationDef::new(Level::World, "earth"),
            LocationDef::new(Level::World, "earth"),
        ];
        let locale = LocaleTable::new();
        let assets = AssetPrefix::new("/res");
        let builder = MapBuilder::new(&tree, &locale, &assets);
        assert_eq!(
            builder.defaults().unwrap_err(),
            MapError::DuplicateNode {
                id: NodeId::from("world.earth")
            }
        );
    }

    #[test]
    fn merge_preserves_user_nodes() {
        let defaults = defaults();
        let mut mine = defaults[0].clone();
        mine.title = "My Earth".into();
        mine.is_locked = true;

        let merged = merge_overlay(vec![mine.clone()], defaults[..2].to_vec());
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], mine);
        assert_eq!(merged[1].id.as_str(), "region.vale");
    }

    #[test]
    fn build_without_user_or_overlay_is_defaults() {
        let tree = tree();
        let locale = LocaleTable::new();
        let assets = AssetPrefix::new("/res");
        let builder = MapBuilder::new(&tree, &locale, &assets);
        let storage = MemoryStorage::new();
        assert_eq!(builder.build(None, &storage, "game-map").unwrap(), defaults());
        assert_eq!(
            builder.build(Some(UserId(7)), &storage, "game-map").unwrap(),
            defaults()
        );
    }

    #[test]
    fn build_merges_saved_overlay() {
        let tree = tree();
        let locale = LocaleTable::new();
        let assets = AssetPrefix::new("/res");
        let builder = MapBuilder::new(&tree, &locale, &assets);

        let mut saved = defaults()[1].clone();
        saved.is_locked = true;
        let mut storage = MemoryStorage::new();
        storage
            .save(
                UserId(7),
                "game-map.allMaps",
                serde_json::to_string(&vec![saved.clone()]).unwrap(),
            )
            .unwrap();

        let nodes = builder.build(Some(UserId(7)), &storage, "game-map").unwrap();
        assert_eq!(nodes.len(), 7);
        assert_eq!(nodes[0], saved);
        assert_eq!(nodes[1].id.as_str(), "world.earth");
    }

    #[test]
    fn corrupt_overlay_is_an_error() {
        let tree = tree();
        let locale = LocaleTable::new();
        let assets = AssetPrefix::new("/res");
        let builder = MapBuilder::new(&tree, &locale, &assets);
        let mut storage = MemoryStorage::new();
        storage
            .save(UserId(1), "game-map.allMaps", "not json".into())
            .unwrap();
        let err = builder.build(Some(UserId(1)), &storage, "game-map").unwrap_err();
        assert!(matches!(err, EngineError::Overlay { ref key, .. } if key == "game-map.allMaps"));
    }

    fn loaded(user: Option<UserId>, storage: &MemoryStorage, place: Option<&NodeId>) -> MapState {
        let tree = tree();
        let locale = LocaleTable::new();
        let assets = AssetPrefix::new("/res");
        let builder = MapBuilder::new(&tree, &locale, &assets);
        MapState::load(&builder, storage, user, &EngineConfig::default(), place).unwrap()
    }

    #[test]
    fn load_selects_place_or_first_root() {
        let storage = MemoryStorage::new();
        let state = loaded(None, &storage, Some(&NodeId::from("building.mill")));
        assert_eq!(state.current().unwrap().id.as_str(), "building.mill");

        let state = loaded(None, &storage, Some(&NodeId::from("nowhere.x")));
        assert_eq!(state.current().unwrap().id.as_str(), "world.earth");
    }

    #[test]
    fn children_sorted_by_order() {
        let state = loaded(None, &MemoryStorage::new(), None);
        let names: Vec<_> = state
            .children(&NodeId::from("building.inn"))
            .iter()
            .map(|n| n.id.to_string())
            .collect();
        assert_eq!(names, vec!["room.cellar", "room.inn"]);
        assert_eq!(state.children(&NodeId::root()).len(), 2);
    }

    #[test]
    fn advance_follows_next() {
        let state = loaded(None, &MemoryStorage::new(), None);
        assert_eq!(
            state.advance(&NodeId::from("world.earth")).unwrap().id.as_str(),
            "region.vale"
        );
        assert!(state.advance(&NodeId::from("room.cellar")).is_none());
    }

    #[test]
    fn unlock_writes_overlay_back() {
        let mut storage = MemoryStorage::new();
        let mut state = loaded(Some(UserId(3)), &storage, None);
        let cellar = NodeId::from("room.cellar");
        assert!(state.node(&cellar).unwrap().is_locked);

        state.unlock(&cellar, &mut storage).unwrap();
        assert!(!state.node(&cellar).unwrap().is_locked);

        let reloaded = loaded(Some(UserId(3)), &storage, None);
        assert!(!reloaded.node(&cellar).unwrap().is_locked);
        assert_eq!(reloaded.nodes().len(), 7);
    }

    #[test]
    fn visit_reveals_and_moves() {
        let mut storage = MemoryStorage::new();
        let mut state = loaded(Some(UserId(3)), &storage, None);
        let moon = NodeId::from("world.moon");
        state.visit(&moon, &mut storage).unwrap();
        assert!(state.node(&moon).unwrap().is_show);
        assert_eq!(state.current().unwrap().id, moon);
        assert!(storage.find(UserId(3), "game-map.allMaps").unwrap().is_some());
    }

    #[test]
    fn anonymous_changes_are_not_persisted() {
        let mut storage = MemoryStorage::new();
        let mut state = loaded(None, &storage, None);
        state.unlock(&NodeId::from("room.cellar"), &mut storage).unwrap();
        assert!(storage.find(UserId(0), "game-map.allMaps").unwrap().is_none());
    }

    #[test]
    fn reload_keeps_anonymous_changes() {
        let mut storage = MemoryStorage::new();
        let mut state = loaded(None, &storage, None);
        let cellar = NodeId::from("room.cellar");
        state.unlock(&cellar, &mut storage).unwrap();

        let tree = tree();
        let locale = LocaleTable::new();
        let assets = AssetPrefix::new("/res");
        let builder = MapBuilder::new(&tree, &locale, &assets);
        let reloaded = state
            .reload(&builder, &storage, &EngineConfig::default(), Some(&cellar))
            .unwrap();
        assert!(!reloaded.node(&cellar).unwrap().is_locked);
        assert_eq!(reloaded.nodes().len(), 7);
        assert_eq!(reloaded.current().unwrap().id, cellar);
    }

    #[test]
    fn listing_leaves_out_hidden_nodes() {
        let tree = vec![
            LocationDef::new(Level::Building, "bank")
                .with_child(LocationDef::new(Level::Room, "lobby"))
                .with_child(LocationDef::new(Level::Room, "vault").hidden().locked()),
        ];
        let locale = LocaleTable::new();
        let assets = AssetPrefix::new("/res");
        let builder = MapBuilder::new(&tree, &locale, &assets);
        let state =
            MapState::load(&builder, &MemoryStorage::new(), None, &EngineConfig::default(), None)
                .unwrap();
        let listing = state
            .listing(&NodeId::from("building.bank"), &fab_core::MemoryFlags::new())
            .unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].0.id.as_str(), "room.lobby");
        assert_eq!(listing[0].1, Access::Open);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let mut storage = MemoryStorage::new();
        let mut state = loaded(None, &storage, None);
        let err = state.unlock(&NodeId::from("room.void"), &mut storage).unwrap_err();
        assert!(matches!(err, EngineError::UnknownNode(_)));
        assert!(state.enter(&NodeId::from("room.void")).is_err());
    }

    struct FailingStorage;

    impl UserStorage for FailingStorage {
        fn find(&self, _: UserId, key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Read {
                key: key.to_string(),
                reason: "offline".into(),
            })
        }

        fn save(&mut self, _: UserId, key: &str, _: String) -> StoreResult<()> {
            Err(StoreError::Write {
                key: key.to_string(),
                reason: "offline".into(),
            })
        }
    }

    #[test]
    fn storage_failure_propagates() {
        let tree = tree();
        let locale = LocaleTable::new();
        let assets = AssetPrefix::new("/res");
        let builder = MapBuilder::new(&tree, &locale, &assets);
        let err = builder.build(Some(UserId(1)), &FailingStorage, "game-map").unwrap_err();
        assert!(matches!(err, EngineError::Store(StoreError::Read { .. })));
    }
}
