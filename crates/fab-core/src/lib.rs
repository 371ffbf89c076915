//! Core types for Fabula: stories, scenes, actions, and the world map model.
//!
//! This crate defines the data model that scripts compile into and that the
//! engine navigates. It is independent of the script parser; authoring data
//! can be built programmatically or deserialized from JSON.

/// Shared action/option catalog referenced by menus.
pub mod action;
/// Flag predicates used to gate map nodes.
pub mod condition;
/// Bundle of all static authoring data.
pub mod content;
/// Error types used throughout the crate.
pub mod error;
/// Storage key construction.
pub mod keys;
/// Location tree, map nodes, and node identifiers.
pub mod map;
/// Compiled scene records.
pub mod scene;
/// Storage ports for flags and per-user data.
pub mod store;
/// Story definitions and presentation records.
pub mod story;

/// Re-export action types.
pub use action::{ActionOption, Destination, FlagWrite};
/// Re-export the condition type.
pub use condition::Condition;
/// Re-export the content bundle.
pub use content::Content;
/// Re-export error types.
pub use error::{StoreError, StoreResult};
/// Re-export map types.
pub use map::{Level, LocationDef, MapNode, NodeId};
/// Re-export scene types.
pub use scene::{Line, Menu, Scene, SceneExit};
/// Re-export storage ports.
pub use store::{FlagStore, MemoryFlags, MemoryStorage, UserId, UserStorage};
/// Re-export story types.
pub use story::{Story, StoryDef, StoryKind};
