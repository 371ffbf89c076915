//! Catalog checks for authoring tools.
//!
//! Compilation never looks at the action catalog. These checks run on the
//! parsed script so warnings keep their source spans.

use crate::ast::{Item, Script};
use crate::diagnostics::{Code, Diagnostic};

/// Warn about every choice naming an option the catalog does not define.
pub fn check_options(script: &Script, is_known: &dyn Fn(&str) -> bool) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for scene in &script.scenes {
        for item in &scene.node.items {
            let Item::Menu(menu) = &item.node else {
                continue;
            };
            for choice in &menu.choices {
                if !is_known(&choice.node) {
                    diagnostics.push(
                        Diagnostic::warning(
                            Code::UnknownOption,
                            choice.span.clone(),
                            format!(
                                "menu \"{}\" offers unknown option \"{}\"",
                                menu.name.node, choice.node
                            ),
                        )
                        .with_label("not in the action catalog"),
                    );
                }
            }
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use crate::lint_source;
    use crate::diagnostics::Code;

    #[test]
    fn unknown_options_are_warned() {
        let source = "label a:\n    menu m:\n        - known\n        - missing\n";
        let result = lint_source(source, &|name: &str| name == "known");
        assert!(!result.has_errors());
        let warnings: Vec<_> = result.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, Code::UnknownOption);
        assert!(warnings[0].message.contains("\"missing\""));
        assert_eq!(&source[warnings[0].span.clone()], "missing");
    }

    #[test]
    fn all_known_is_clean() {
        let result = lint_source("label a:\n    menu m:\n        - x\n", &|_: &str| true);
        assert!(result.diagnostics.is_empty());
    }
}
