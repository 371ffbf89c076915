use std::collections::HashMap;

use crate::ast::{Script, Span};
use crate::diagnostics::{Code, Diagnostic, LineMap};

/// Information about a resolved scene name.
#[derive(Debug, Clone)]
pub struct ResolvedScene {
    /// Index of the declaring scene in [`Script::scenes`].
    pub index: usize,
    /// Span of the scene name.
    pub name_span: Span,
}

/// Scene-name resolver.
///
/// Pre-scans all `label` declarations and flags duplicates. The first
/// declaration of a name wins; later ones are reported and skipped by the
/// compiler.
pub struct Resolver {
    names: HashMap<String, ResolvedScene>,
    /// Diagnostics produced during resolution (duplicate scenes).
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolver {
    /// Build a Resolver by scanning all scene declarations in the AST.
    pub fn resolve(script: &Script, lines: &LineMap) -> Self {
        let mut names: HashMap<String, ResolvedScene> = HashMap::new();
        let mut diagnostics = Vec::new();

        for (index, scene) in script.scenes.iter().enumerate() {
            let name = &scene.node.name;
            if let Some(existing) = names.get(&name.node) {
                let first_line = lines.line_of(existing.name_span.start);
                let line = lines.line_of(name.span.start);
                diagnostics.push(
                    Diagnostic::error(
                        Code::DuplicateScene,
                        name.span.clone(),
                        format!(
                            "duplicate scene \"{}\" at line {line} (first defined at line {first_line})",
                            name.node
                        ),
                    )
                    .with_label("redefined here")
                    .with_related(existing.name_span.clone(), "first defined here"),
                );
            } else {
                names.insert(
                    name.node.clone(),
                    ResolvedScene {
                        index,
                        name_span: name.span.clone(),
                    },
                );
            }
        }

        Self { names, diagnostics }
    }

    /// Get the resolved scene info for a name.
    pub fn get(&self, name: &str) -> Option<&ResolvedScene> {
        self.names.get(name)
    }

    /// Whether the scene at `index` is the one a name resolves to.
    pub fn is_canonical(&self, name: &str, index: usize) -> bool {
        self.get(name).is_some_and(|r| r.index == index)
    }

    /// Number of distinct scene names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no scenes were resolved.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer, parser};

    fn resolve(source: &str) -> Resolver {
        let (tokens, _) = lexer::lex(source);
        let script = parser::parse(&tokens).unwrap();
        Resolver::resolve(&script, &LineMap::new(source))
    }

    #[test]
    fn unique_scenes_resolve() {
        let resolver = resolve("label a:\n    return\nlabel b:\n    return\n");
        assert_eq!(resolver.len(), 2);
        assert!(resolver.diagnostics.is_empty());
        assert!(resolver.is_canonical("b", 1));
    }

    #[test]
    fn duplicate_names_both_lines() {
        let resolver = resolve("label a:\n    return\nlabel a:\n    return\n");
        assert_eq!(resolver.len(), 1);
        assert_eq!(resolver.diagnostics.len(), 1);
        let diag = &resolver.diagnostics[0];
        assert_eq!(diag.code, Code::DuplicateScene);
        assert!(diag.message.contains("\"a\""));
        assert!(diag.message.contains("line 3"));
        assert!(diag.message.contains("line 1"));
        assert_eq!(diag.related.len(), 1);
        assert!(resolver.is_canonical("a", 0));
        assert!(!resolver.is_canonical("a", 1));
    }
}
