use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;

/// Depth class of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// A whole world.
    World,
    /// A region within a world.
    Region,
    /// A building within a region.
    Building,
    /// A room within a building.
    Room,
}

impl Level {
    /// Lowercase keyword used in ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::World => "world",
            Level::Region => "region",
            Level::Building => "building",
            Level::Room => "room",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque map node identifier.
///
/// Built only by [`NodeId::new`] as `<level>.<name>`; everything else treats
/// the value as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Parent id carried by top-level nodes.
    pub const ROOT: &'static str = "root";

    /// Build the id of a node from its level and name.
    pub fn new(level: Level, name: &str) -> Self {
        Self(format!("{level}.{name}"))
    }

    /// The `"root"` sentinel.
    pub fn root() -> Self {
        Self(Self::ROOT.to_string())
    }

    /// Whether this is the `"root"` sentinel.
    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Localization/asset key of a location.
///
/// Rooms share content with the building of the same name.
pub fn content_key(level: Level, name: &str) -> String {
    match level {
        Level::Room => NodeId::new(Level::Building, name).0,
        Level::World | Level::Region | Level::Building => NodeId::new(level, name).0,
    }
}

/// Authoring-time location tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDef {
    /// Location name.
    pub name: String,
    /// Depth class.
    pub level: Level,
    /// Child locations in authoring order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LocationDef>,
    /// Declared successor, used only when there are no children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<NodeId>,
    /// Action names offered at this location.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Greyed out in listings.
    #[serde(default)]
    pub is_disabled: bool,
    /// Listed in the UI; absent means shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_show: Option<bool>,
    /// Presentation order hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Locked flag.
    #[serde(default)]
    pub is_locked: bool,
    /// Flag predicate gating entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl LocationDef {
    /// Create a leaf location.
    pub fn new(level: Level, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level,
            children: Vec::new(),
            next: None,
            options: Vec::new(),
            icon: None,
            is_disabled: false,
            is_show: None,
            order: None,
            is_locked: false,
            condition: None,
        }
    }

    /// Append a child location.
    pub fn with_child(mut self, child: LocationDef) -> Self {
        self.children.push(child);
        self
    }

    /// Declare the successor used when this location is a leaf.
    pub fn with_next(mut self, next: impl Into<NodeId>) -> Self {
        self.next = Some(next.into());
        self
    }

    /// Set the gating condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Mark as locked.
    pub fn locked(mut self) -> Self {
        self.is_locked = true;
        self
    }

    /// Mark as hidden from listings.
    pub fn hidden(mut self) -> Self {
        self.is_show = Some(false);
        self
    }

    /// Set the presentation order hint.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// This location's id.
    pub fn id(&self) -> NodeId {
        NodeId::new(self.level, &self.name)
    }
}

/// One addressable location in the flattened navigation graph.
///
/// Field names follow the persisted overlay payload (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapNode {
    /// Node id, `<level>.<name>`.
    pub id: NodeId,
    /// Parent id, `"root"` for top-level nodes.
    pub pid: NodeId,
    /// Location name.
    pub name: String,
    /// Depth class.
    pub level: Level,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Localized description.
    #[serde(default)]
    pub text: String,
    /// Cover image path.
    #[serde(default)]
    pub cover: String,
    /// Action names offered here.
    #[serde(default)]
    pub options: Vec<String>,
    /// Icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Greyed out in listings.
    #[serde(default)]
    pub is_disabled: bool,
    /// Listed in the UI.
    #[serde(default = "default_true")]
    pub is_show: bool,
    /// Presentation order hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Locked flag.
    #[serde(default)]
    pub is_locked: bool,
    /// Flag predicate gating entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Node to advance to; the first child when there are children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<NodeId>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_format() {
        assert_eq!(NodeId::new(Level::Building, "inn").as_str(), "building.inn");
        assert!(NodeId::root().is_root());
        assert!(!NodeId::from("world.earth").is_root());
    }

    #[test]
    fn rooms_share_building_content() {
        assert_eq!(content_key(Level::Room, "inn"), "building.inn");
        assert_eq!(content_key(Level::Region, "coast"), "region.coast");
    }

    #[test]
    fn location_tree_from_json() {
        let def: LocationDef = serde_json::from_str(
            r#"{
                "name": "earth", "level": "world",
                "children": [
                    { "name": "coast", "level": "region", "isShow": false, "next": "region.hills" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(def.id().as_str(), "world.earth");
        assert_eq!(def.children[0].is_show, Some(false));
        assert_eq!(def.children[0].next, Some(NodeId::from("region.hills")));
    }

    #[test]
    fn map_node_defaults_when_parsing_overlay() {
        let node: MapNode = serde_json::from_str(
            r#"{ "id": "world.earth", "pid": "root", "name": "earth", "level": "world" }"#,
        )
        .unwrap();
        assert!(node.is_show);
        assert!(!node.is_locked);
        assert!(node.next.is_none());
    }
}
