use ariadne::{Color, Label, Report, ReportKind, Source};
use std::fmt;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Compilation fails.
    Error,
    /// Reported for authoring tools; compilation succeeds.
    Warning,
}

/// Machine-readable diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    /// Bad character or unterminated string.
    Lex,
    /// A line that matches no statement form.
    Syntax,
    /// A statement before the first `label`.
    StatementOutsideScene,
    /// A `- choice` line with no open menu block.
    ChoiceOutsideMenu,
    /// Two scenes with one name.
    DuplicateScene,
    /// Two menus with one name inside a scene.
    DuplicateMenu,
    /// A menu without choices.
    EmptyMenu,
    /// A second `jump`/`return` in one scene.
    UnreachableExit,
    /// A choice naming an option missing from the action catalog.
    UnknownOption,
}

/// A diagnostic message with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// Diagnostic category.
    pub code: Code,
    /// Primary byte range.
    pub span: std::ops::Range<usize>,
    /// Headline message.
    pub message: String,
    /// Text for the primary label.
    pub label: Option<String>,
    /// Secondary locations with their labels.
    pub related: Vec<(std::ops::Range<usize>, String)>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(code: Code, span: std::ops::Range<usize>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            span,
            message: message.into(),
            label: None,
            related: Vec::new(),
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(code: Code, span: std::ops::Range<usize>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            span,
            message: message.into(),
            label: None,
            related: Vec::new(),
        }
    }

    /// Set the primary label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach a secondary location.
    pub fn with_related(mut self, span: std::ops::Range<usize>, label: impl Into<String>) -> Self {
        self.related.push((span, label.into()));
        self
    }

    /// Whether this diagnostic fails compilation.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{prefix}: {}", self.message)
    }
}

/// Maps byte offsets to 1-based line numbers.
#[derive(Debug, Clone)]
pub struct LineMap {
    starts: Vec<usize>,
}

impl LineMap {
    /// Index the line starts of `source`.
    pub fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

/// Render diagnostics using ariadne for pretty terminal output.
pub fn render_diagnostics(source: &str, filename: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = Vec::new();

    for diag in diagnostics {
        let kind = match diag.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
        };
        let color = match diag.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
        };

        let span = (filename, diag.span.clone());
        let mut report = Report::build(kind, span).with_message(&diag.message);

        let label_text = diag.label.as_deref().unwrap_or(&diag.message);
        report = report.with_label(
            Label::new((filename, diag.span.clone()))
                .with_message(label_text)
                .with_color(color),
        );
        for (related, text) in &diag.related {
            report = report.with_label(
                Label::new((filename, related.clone()))
                    .with_message(text)
                    .with_color(Color::Blue),
            );
        }

        report
            .finish()
            .write((filename, Source::from(source)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::error(Code::ChoiceOutsideMenu, 0..5, "choice outside menu");
        assert_eq!(d.to_string(), "error: choice outside menu");
        let w = Diagnostic::warning(Code::EmptyMenu, 0..5, "menu \"m\" has no options");
        assert_eq!(w.to_string(), "warning: menu \"m\" has no options");
        assert!(d.is_error() && !w.is_error());
    }

    #[test]
    fn line_map_lookup() {
        let map = LineMap::new("label a:\n    \"x\"\nlabel b:");
        assert_eq!(map.line_of(0), 1);
        assert_eq!(map.line_of(8), 1);
        assert_eq!(map.line_of(9), 2);
        assert_eq!(map.line_of(17), 3);
    }

    #[test]
    fn render_produces_output() {
        let source = "label start:\n    \"Hi.\"\nlabel start:";
        let diags = vec![
            Diagnostic::error(Code::DuplicateScene, 29..34, "duplicate scene \"start\"")
                .with_label("redefined here")
                .with_related(6..11, "first defined here"),
        ];
        let output = render_diagnostics(source, "intro.fab", &diags);
        assert!(!output.is_empty());
        assert!(output.contains("duplicate scene"));
    }
}
