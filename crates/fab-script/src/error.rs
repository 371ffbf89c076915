//! Error type returned when a script fails to compile.

use crate::diagnostics::Diagnostic;

/// A script that failed to compile, with every diagnostic produced.
///
/// No scene set escapes a failed compilation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", summarize(.diagnostics))]
pub struct CompileError {
    /// All diagnostics, errors and warnings, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileError {
    /// Error-severity diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    let mut errors = diagnostics.iter().filter(|d| d.is_error());
    match (errors.next(), errors.count()) {
        (Some(first), 0) => format!("script failed to compile: {}", first.message),
        (Some(first), more) => format!(
            "script failed to compile: {} (and {more} more error{})",
            first.message,
            if more == 1 { "" } else { "s" }
        ),
        (None, _) => "script failed to compile".to_string(),
    }
}
