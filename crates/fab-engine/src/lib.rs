//! Narrative and world-map engine for Fabula.
//!
//! Drives compiled stories, builds the navigable map graph from the
//! authoring tree and the player's saved overlay, and gates map access on
//! progress flags. [`Game`] ties the pieces together.

/// Engine configuration.
pub mod config;
/// Error types for the engine.
pub mod error;
/// Game orchestrator.
pub mod game;
/// Map access gate.
pub mod gate;
/// Content cross-checks.
pub mod lint;
/// Localization and asset ports.
pub mod locale;
/// Map graph builder and navigation state.
pub mod map;
/// Story state machine.
pub mod story;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use game::{Game, Mode, Step};
pub use gate::{Access, access};
pub use lint::{LintReport, lint_content};
pub use locale::{AssetPrefix, AssetResolver, LocaleTable, Localizer};
pub use map::{MapBuilder, MapError, MapState, assign_ids, flatten, merge_overlay};
pub use story::StoryState;
