use std::collections::HashMap;

use fab_core::scene::{Line, Menu, Scene, SceneExit};

use crate::ast::*;
use crate::diagnostics::{Code, Diagnostic, LineMap, Severity};
use crate::error::CompileError;
use crate::resolver::Resolver;

/// Result of compiling script source into scenes.
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// Compiled scenes in source order (may be partial if errors occurred).
    pub scenes: Vec<Scene>,
    /// Errors and warnings produced during compilation.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileResult {
    /// Returns `true` if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// The scene list, or every diagnostic if any of them is an error.
    pub fn into_scenes(self) -> Result<Vec<Scene>, CompileError> {
        if self.has_errors() {
            Err(CompileError {
                diagnostics: self.diagnostics,
            })
        } else {
            Ok(self.scenes)
        }
    }
}

/// Compile a parsed script into scenes.
///
/// Scenes the resolver flagged as duplicates are skipped; the resolver's
/// diagnostics come first in the result.
pub fn compile(script: &Script, resolver: &Resolver, lines: &LineMap) -> CompileResult {
    let mut compiler = Compiler {
        lines,
        diagnostics: Vec::new(),
    };

    let scenes = script
        .scenes
        .iter()
        .enumerate()
        .filter(|(index, decl)| resolver.is_canonical(&decl.node.name.node, *index))
        .map(|(_, decl)| compiler.compile_scene(&decl.node))
        .collect();

    let mut diagnostics = resolver.diagnostics.clone();
    diagnostics.append(&mut compiler.diagnostics);
    CompileResult {
        scenes,
        diagnostics,
    }
}

struct Compiler<'a> {
    lines: &'a LineMap,
    diagnostics: Vec<Diagnostic>,
}

impl Compiler<'_> {
    fn compile_scene(&mut self, decl: &SceneDecl) -> Scene {
        let mut scene = Scene::new(decl.name.node.clone());
        let mut menu_spans: HashMap<&str, &Span> = HashMap::new();

        for item in &decl.items {
            match &item.node {
                Item::Say(say) => scene.lines.push(line(say)),
                Item::Menu(menu) => {
                    if let Some(first) = menu_spans.get(menu.name.node.as_str()) {
                        self.diagnostics.push(
                            Diagnostic::error(
                                Code::DuplicateMenu,
                                menu.name.span.clone(),
                                format!(
                                    "duplicate menu \"{}\" in scene \"{}\" at line {} (first defined at line {})",
                                    menu.name.node,
                                    decl.name.node,
                                    self.lines.line_of(menu.name.span.start),
                                    self.lines.line_of(first.start),
                                ),
                            )
                            .with_label("redefined here")
                            .with_related((*first).clone(), "first defined here"),
                        );
                        continue;
                    }
                    menu_spans.insert(&menu.name.node, &menu.name.span);

                    if menu.choices.is_empty() {
                        self.diagnostics.push(
                            Diagnostic::warning(
                                Code::EmptyMenu,
                                menu.name.span.clone(),
                                format!(
                                    "menu \"{}\" in scene \"{}\" has no options",
                                    menu.name.node, decl.name.node
                                ),
                            )
                            .with_label("dead end"),
                        );
                    }

                    scene.menus.push(Menu {
                        name: menu.name.node.clone(),
                        prompt: menu.prompt.as_ref().map(|p| line(&p.node)),
                        options: menu.choices.iter().map(|c| c.node.clone()).collect(),
                    });
                }
                Item::Jump(target) => {
                    self.set_exit(&mut scene, SceneExit::Jump(target.node.clone()), &item.span)
                }
                Item::Return => self.set_exit(&mut scene, SceneExit::Return, &item.span),
            }
        }

        scene
    }

    fn set_exit(&mut self, scene: &mut Scene, exit: SceneExit, span: &Span) {
        if scene.exit.is_some() {
            self.diagnostics.push(
                Diagnostic::warning(
                    Code::UnreachableExit,
                    span.clone(),
                    format!("scene \"{}\" already ends earlier", scene.name),
                )
                .with_label("never reached"),
            );
        } else {
            scene.exit = Some(exit);
        }
    }
}

fn line(say: &SayStmt) -> Line {
    Line {
        speaker: say.speaker.clone(),
        text: say.text.clone(),
    }
}
