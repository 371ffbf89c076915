use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use fab_core::{MapNode, MemoryStorage, UserId, UserStorage, keys};
use fab_engine::{EngineConfig, Game};

use crate::store::FlagFile;

pub fn run(
    content_path: &Path,
    config: EngineConfig,
    flags: Option<&Path>,
    overlay: Option<&Path>,
    user: u64,
    json: bool,
) -> Result<(), String> {
    let content = super::load_content(content_path)?;
    let user = UserId(user);

    let mut storage = MemoryStorage::new();
    if let Some(path) = overlay {
        let payload = super::read(path)?;
        serde_json::from_str::<Vec<MapNode>>(&payload)
            .map_err(|e| format!("invalid overlay {}: {e}", path.display()))?;
        storage
            .save(user, &keys::map_overlay(&config.map_module), payload)
            .map_err(|e| e.to_string())?;
    }

    let mut game = Game::new(content, config)
        .with_flags(FlagFile::open(flags)?)
        .with_storage(storage)
        .with_user(user);
    game.init_story();
    game.load_map(None).map_err(|e| e.to_string())?;

    let nodes = game.map().nodes();
    if json {
        let out = serde_json::to_string_pretty(nodes)
            .map_err(|e| format!("cannot serialize map: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    if nodes.is_empty() {
        println!("  No locations found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Parent", "Title", "Next", "Access"]);

    for node in nodes {
        let access = game.access(&node.id).map_err(|e| e.to_string())?;
        let title = if node.title.is_empty() {
            node.name.clone()
        } else {
            node.title.clone()
        };
        let next = node
            .next
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        table.add_row(vec![
            node.id.to_string(),
            node.pid.to_string(),
            title,
            next,
            access.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} locations", nodes.len());

    Ok(())
}
