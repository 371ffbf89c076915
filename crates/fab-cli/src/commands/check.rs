use std::path::Path;

pub fn run(script: &Path) -> Result<(), String> {
    let result = super::compile_file(script)?;
    let menus: usize = result.scenes.iter().map(|s| s.menus.len()).sum();

    println!("  All checks passed for '{}'.", script.display());
    println!("  {} scenes, {} menus", result.scenes.len(), menus);

    Ok(())
}
