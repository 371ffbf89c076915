//! Scripted, non-interactive play-through of a story.

use std::path::Path;

use colored::Colorize;
use fab_core::{NodeId, Scene};
use fab_engine::{EngineConfig, Game, Step};

use crate::store::FlagFile;

/// Upper bound on followed exits, so cyclic jumps cannot hang the CLI.
const MAX_STEPS: usize = 1000;

/// Play `story`, picking `choices` in order at each menu.
pub fn run(
    content_path: &Path,
    config: EngineConfig,
    story: &str,
    choices: &[String],
    flags: Option<&Path>,
    place: Option<&str>,
) -> Result<(), String> {
    let content = super::load_content(content_path)?;
    let mut game = Game::new(content, config).with_flags(FlagFile::open(flags)?);
    if let Some(place) = place {
        game = game.with_place(NodeId::from(place));
    }
    game.init_story();

    let mut choices = choices.iter();
    let mut step = game.enter_story(story).map_err(|e| e.to_string())?;

    for _ in 0..MAX_STEPS {
        step = match step {
            Step::Scene(scene) => {
                print_scene(&game, &scene);
                if !scene.menus.is_empty() {
                    let Some(choice) = choices.next() else {
                        println!("  {}", "(waiting for a choice)".dimmed());
                        return Ok(());
                    };
                    if !scene.menus.iter().any(|m| m.options.contains(choice)) {
                        return Err(format!(
                            "option \"{choice}\" is not offered in scene \"{}\"",
                            scene.name
                        ));
                    }
                    println!("  {} {choice}", ">".green().bold());
                    game.choose(choice).map_err(|e| e.to_string())?
                } else if let Some(exit) = &scene.exit {
                    game.follow_exit(exit).map_err(|e| e.to_string())?
                } else {
                    println!("  {}", "(scene ends without an exit)".dimmed());
                    return Ok(());
                }
            }
            Step::Missing { story, scene } => {
                println!("  scene \"{scene}\" not found in story \"{story}\"");
                return Ok(());
            }
            Step::Map { node, access } if access.is_enterable() => {
                println!("  {} map node {node} ({access})", "Travel".bold());
                return Ok(());
            }
            Step::Map { node, access } => {
                println!("  {} map node {node} ({access})", "Blocked".yellow().bold());
                return Ok(());
            }
            Step::Finished { story } => {
                println!("  {} story \"{story}\"", "Finished".green().bold());
                if let Some(node) = game.map().current() {
                    println!("  map opened at {}", node.id);
                }
                return Ok(());
            }
        };
    }

    Err(format!("story did not settle after {MAX_STEPS} steps"))
}

fn print_scene(game: &Game, scene: &Scene) {
    println!(
        "  {} {}",
        format!("[{}]", game.story().current().name).dimmed(),
        scene.name.cyan().bold()
    );
    for line in &scene.lines {
        match &line.speaker {
            Some(speaker) => println!("  {}: {}", speaker.bold(), line.text),
            None => println!("  {}", line.text.italic()),
        }
    }
    for menu in &scene.menus {
        if let Some(prompt) = &menu.prompt {
            match &prompt.speaker {
                Some(speaker) => println!("  {}: {}", speaker.bold(), prompt.text),
                None => println!("  {}", prompt.text),
            }
        }
        for option in &menu.options {
            let label = game
                .story()
                .action(option)
                .map_or("(unknown option)", |a| a.label.as_str());
            println!("    - {option}  {}", label.dimmed());
        }
    }
}
