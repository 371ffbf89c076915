//! CLI frontend for the Fabula interactive-fiction engine.

mod commands;
mod store;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "fab",
    about = "Fabula: compile, inspect and play branching stories",
    version,
    propagate_version = true
)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a story script and report diagnostics
    Check {
        /// Script file
        script: PathBuf,
    },

    /// List the scenes of a story script
    Scenes {
        /// Script file
        script: PathBuf,

        /// Print compiled scenes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Cross-check stories, options and locations of a content bundle
    Lint {
        /// Content bundle (JSON)
        content: PathBuf,
    },

    /// Show the flattened world map
    Map {
        /// Content bundle (JSON)
        content: PathBuf,

        /// Flag file (JSON object) used to evaluate access
        #[arg(short, long)]
        flags: Option<PathBuf>,

        /// Saved overlay (JSON array of map nodes) to merge
        #[arg(long)]
        overlay: Option<PathBuf>,

        /// User the overlay belongs to
        #[arg(long, default_value = "1")]
        user: u64,

        /// Print nodes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a story non-interactively with a list of choices
    Play {
        /// Content bundle (JSON)
        content: PathBuf,

        /// Story to start, `story` or `story.scene`
        story: String,

        /// Option to pick at each menu, in order
        #[arg(short = 'o', long = "choose")]
        choices: Vec<String>,

        /// Flag file (JSON object); created or updated as flags are written
        #[arg(short, long)]
        flags: Option<PathBuf>,

        /// Saved location the map opens at after the story
        #[arg(long)]
        place: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = commands::load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Check { script } => commands::check::run(&script),
        Commands::Scenes { script, json } => commands::scenes::run(&script, json),
        Commands::Lint { content } => commands::lint::run(&content),
        Commands::Map {
            content,
            flags,
            overlay,
            user,
            json,
        } => commands::map::run(
            &content,
            config,
            flags.as_deref(),
            overlay.as_deref(),
            user,
            json,
        ),
        Commands::Play {
            content,
            story,
            choices,
            flags,
            place,
        } => commands::play::run(
            &content,
            config,
            &story,
            &choices,
            flags.as_deref(),
            place.as_deref(),
        ),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
