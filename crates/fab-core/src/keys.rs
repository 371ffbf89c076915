//! Namespaced storage keys.
//!
//! Every key the engine reads or writes is built here so the format stays in
//! one place. Keys are `<module>.<rest>`.

/// Flag recording that a story was played to the end:
/// `<story_module>.finished.<story>`.
pub fn finished_flag(story_module: &str, story: &str) -> String {
    format!("{story_module}.finished.{story}")
}

/// Storage key of the user's persisted map overlay: `<map_module>.allMaps`.
pub fn map_overlay(map_module: &str) -> String {
    format!("{map_module}.allMaps")
}
