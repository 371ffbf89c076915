use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use fab_core::SceneExit;

pub fn run(script: &Path, json: bool) -> Result<(), String> {
    let result = super::compile_file(script)?;

    if json {
        let out = serde_json::to_string_pretty(&result.scenes)
            .map_err(|e| format!("cannot serialize scenes: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    if result.scenes.is_empty() {
        println!("  No scenes found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Scene", "Lines", "Menus", "Exit"]);

    for scene in &result.scenes {
        let menus = if scene.menus.is_empty() {
            "-".to_string()
        } else {
            scene
                .menus
                .iter()
                .map(|m| format!("{} ({})", m.name, m.options.len()))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let exit = match &scene.exit {
            Some(SceneExit::Jump(target)) => format!("jump {target}"),
            Some(SceneExit::Return) => "return".to_string(),
            None => "-".to_string(),
        };
        table.add_row(vec![
            scene.name.clone(),
            scene.lines.len().to_string(),
            menus,
            exit,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} scenes", result.scenes.len());

    Ok(())
}
