//! Error types for the engine.

use fab_core::{NodeId, StoreError};
use fab_script::CompileError;
use thiserror::Error;

use crate::map::MapError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while driving stories and the map.
///
/// Lookup misses (unknown story, scene or menu) are not errors; those
/// operations return `Option`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A story script failed to compile; the previous story stays active.
    #[error("story \"{story}\": {source}")]
    Compile {
        /// Story whose script failed.
        story: String,
        /// Compiler diagnostics.
        #[source]
        source: CompileError,
    },

    /// A flag or user storage backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The persisted map overlay could not be parsed.
    #[error("corrupt map overlay under \"{key}\": {source}")]
    Overlay {
        /// Storage key of the overlay.
        key: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The map overlay could not be serialized for write-back.
    #[error("cannot serialize map overlay: {0}")]
    OverlayEncode(serde_json::Error),

    /// The location tree is malformed.
    #[error(transparent)]
    Map(#[from] MapError),

    /// A map node id that is not part of the current graph.
    #[error("unknown map node: {0}")]
    UnknownNode(NodeId),

    /// An option name missing from the action catalog.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// A story-level operation was issued while no story is active.
    #[error("no story is active")]
    NoActiveStory,
}
