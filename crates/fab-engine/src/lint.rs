//! Cross-checks between stories, the action catalog and the map.

use std::collections::HashSet;

use fab_core::{Content, Destination, LocationDef, NodeId};
use fab_script::CompileResult;

/// Compilation result of one story.
#[derive(Debug, Clone)]
pub struct StoryLint {
    /// Story name.
    pub story: String,
    /// Compiler output, with unknown-option warnings added.
    pub result: CompileResult,
}

/// Everything wrong with a content bundle.
#[derive(Debug, Clone, Default)]
pub struct LintReport {
    /// Per-story diagnostics, in catalog order.
    pub stories: Vec<StoryLint>,
    /// Catalog problems that have no script location.
    pub problems: Vec<String>,
}

impl LintReport {
    /// Whether any story failed to compile.
    pub fn has_errors(&self) -> bool {
        self.stories.iter().any(|s| s.result.has_errors())
    }

    /// Whether there is nothing to report at all.
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty() && self.stories.iter().all(|s| s.result.diagnostics.is_empty())
    }
}

/// Compile every story and check every reference between catalogs.
pub fn lint_content(content: &Content) -> LintReport {
    let is_known = |name: &str| content.action(name).is_some();

    let stories: Vec<StoryLint> = content
        .stories
        .iter()
        .map(|def| StoryLint {
            story: def.name.clone(),
            result: fab_script::lint_source(&def.script, &is_known),
        })
        .collect();

    let scene_names: HashSet<&str> = stories
        .iter()
        .flat_map(|s| s.result.scenes.iter().map(|sc| sc.name.as_str()))
        .collect();
    let mut node_ids = HashSet::new();
    collect_ids(&content.maps, &mut node_ids);

    let mut problems = Vec::new();
    for action in &content.actions {
        match &action.destination {
            Destination::Scene { name } if !scene_names.contains(name.as_str()) => {
                problems.push(format!(
                    "option \"{}\" leads to scene \"{name}\" which no story defines",
                    action.name
                ));
            }
            Destination::Story { identifier } => {
                let story = identifier.split('.').next().unwrap_or_default();
                if content.story(story).is_none() {
                    problems.push(format!(
                        "option \"{}\" leads to unknown story \"{story}\"",
                        action.name
                    ));
                }
            }
            Destination::Map { node } if !node_ids.contains(node) => {
                problems.push(format!(
                    "option \"{}\" leads to unknown map node \"{node}\"",
                    action.name
                ));
            }
            _ => {}
        }
    }
    check_location_options(&content.maps, &is_known, &mut problems);

    LintReport { stories, problems }
}

fn collect_ids(defs: &[LocationDef], out: &mut HashSet<NodeId>) {
    for def in defs {
        out.insert(def.id());
        collect_ids(&def.children, out);
    }
}

fn check_location_options(
    defs: &[LocationDef],
    is_known: &dyn Fn(&str) -> bool,
    problems: &mut Vec<String>,
) {
    for def in defs {
        for option in def.options.iter().filter(|o| !is_known(o.as_str())) {
            problems.push(format!(
                "location \"{}\" offers unknown option \"{option}\"",
                def.id()
            ));
        }
        check_location_options(&def.children, is_known, problems);
    }
}
