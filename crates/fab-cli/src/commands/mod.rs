pub mod check;
pub mod lint;
pub mod map;
pub mod play;
pub mod scenes;

use std::fs;
use std::path::Path;

use fab_core::Content;
use fab_engine::EngineConfig;
use fab_script::diagnostics::{Severity, render_diagnostics};
use fab_script::{CompileResult, Diagnostic};

/// Load the engine configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, String> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = read(path)?;
    let config = toml::from_str(&raw)
        .map_err(|e| format!("invalid config {}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load a content bundle from JSON.
fn load_content(path: &Path) -> Result<Content, String> {
    let raw = read(path)?;
    Content::from_json(&raw).map_err(|e| format!("invalid content {}: {e}", path.display()))
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}

/// Compile a script file and print diagnostics.
/// Returns the compile result if there are no errors.
fn compile_file(path: &Path) -> Result<CompileResult, String> {
    let source = read(path)?;
    let result = fab_script::compile_source(&source);
    print_diagnostics(&source, &path.display().to_string(), &result.diagnostics);

    if result.has_errors() {
        Err("compilation failed with errors".into())
    } else {
        Ok(result)
    }
}

/// Print diagnostics to stderr using ariadne.
fn print_diagnostics(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    let rendered = render_diagnostics(source, filename, diagnostics);
    eprint!("{rendered}");

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;

    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors,
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    } else {
        eprintln!(
            "  {} warning{}",
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    }
}
