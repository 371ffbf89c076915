//! Screenplay script compiler.
//!
//! Turns the text of a story script into an ordered list of
//! [`Scene`](fab_core::Scene)s. Every failure is reported as a
//! [`Diagnostic`] carrying a source span, so authoring tools can render it
//! with [`diagnostics::render_diagnostics`].

/// Syntax tree produced by the parser.
pub mod ast;
/// Scene compilation from the syntax tree.
pub mod compiler;
/// Diagnostics and their terminal rendering.
pub mod diagnostics;
/// Compile failure type.
pub mod error;
/// Tokenizer.
pub mod lexer;
/// Catalog checks.
pub mod lint;
/// Line parser and block assembly.
pub mod parser;
/// Scene-name resolution.
pub mod resolver;

pub use compiler::CompileResult;
pub use diagnostics::Diagnostic;
pub use error::CompileError;

use diagnostics::{Code, LineMap};
use fab_core::Scene;

/// Compile script source, keeping partial output alongside diagnostics.
pub fn compile_source(source: &str) -> CompileResult {
    front_end(source).1
}

/// Compile script source into scenes, failing on any error diagnostic.
pub fn compile(source: &str) -> Result<Vec<Scene>, CompileError> {
    compile_source(source).into_scenes()
}

/// Compile and additionally warn about choices the catalog does not know.
pub fn lint_source(source: &str, is_known: &dyn Fn(&str) -> bool) -> CompileResult {
    let (script, mut result) = front_end(source);
    result
        .diagnostics
        .extend(lint::check_options(&script, is_known));
    result.diagnostics.sort_by_key(|d| d.span.start);
    result
}

fn front_end(source: &str) -> (ast::Script, CompileResult) {
    let (tokens, lex_errors) = lexer::lex(source);
    let mut diagnostics: Vec<Diagnostic> = lex_errors
        .into_iter()
        .map(|e| Diagnostic::error(Code::Lex, e.span, e.message))
        .collect();

    let (script, parse_errors) = parser::parse_lenient(&tokens);
    diagnostics.extend(
        parse_errors
            .into_iter()
            .map(|e| Diagnostic::error(e.code, e.span, e.message)),
    );

    let lines = LineMap::new(source);
    let resolver = resolver::Resolver::resolve(&script, &lines);
    let mut result = compiler::compile(&script, &resolver, &lines);
    result.diagnostics.extend(diagnostics);
    result.diagnostics.sort_by_key(|d| d.span.start);

    tracing::debug!(
        scenes = result.scenes.len(),
        diagnostics = result.diagnostics.len(),
        "compiled script"
    );
    (script, result)
}
