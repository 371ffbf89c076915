use std::path::Path;

use colored::Colorize;

pub fn run(content_path: &Path) -> Result<(), String> {
    let content = super::load_content(content_path)?;
    let report = fab_engine::lint_content(&content);

    for (def, story) in content.stories.iter().zip(&report.stories) {
        let filename = format!("{}#{}", content_path.display(), story.story);
        super::print_diagnostics(&def.script, &filename, &story.result.diagnostics);
    }
    for problem in &report.problems {
        println!("  {} {problem}", "warning:".yellow().bold());
    }

    if report.has_errors() {
        return Err("lint found errors".into());
    }
    if report.is_clean() {
        println!(
            "  No problems found in {} stories, {} options.",
            content.stories.len(),
            content.actions.len()
        );
    } else {
        let warnings: usize = report
            .stories
            .iter()
            .map(|s| s.result.warnings().count())
            .sum::<usize>()
            + report.problems.len();
        println!("  {warnings} warning{}", if warnings == 1 { "" } else { "s" });
    }

    Ok(())
}
