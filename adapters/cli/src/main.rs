#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Magic Maze levels headlessly.

mod checkpoints;
mod config;
mod headless;
mod levels;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use magic_maze_system_game_loop::{Collaborators, Session, SystemClock};

use crate::{
    checkpoints::FileCheckpoints,
    config::ConfigFile,
    headless::{LogGraphics, LogSound, ScriptedInput},
    levels::LevelLibrary,
};

/// Command-line arguments; each overrides the configuration file.
#[derive(Debug, Parser)]
#[command(name = "magic-maze", about = "Plays Magic Maze levels from a script")]
struct Args {
    /// TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Level to start on.
    #[arg(long)]
    level: Option<u32>,
    /// Seed for monster decisions.
    #[arg(long)]
    seed: Option<u64>,
    /// Directory holding levelN.txt files; the demo levels are used without it.
    #[arg(long, value_name = "DIR")]
    levels_dir: Option<PathBuf>,
    /// Input script, one frame per line.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
    /// Stops after this many frames.
    #[arg(long)]
    max_frames: Option<u64>,
    /// Checkpoint file used by the save command and by --resume.
    #[arg(long, value_name = "PATH")]
    checkpoint: Option<PathBuf>,
    /// Initial frame delay in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,
    /// Continue from the last saved checkpoint.
    #[arg(long)]
    resume: bool,
}

impl Args {
    fn overrides(&self) -> ConfigFile {
        ConfigFile {
            level: self.level,
            seed: self.seed,
            delay_ms: self.delay_ms,
            max_frames: self.max_frames,
            levels_dir: self.levels_dir.clone(),
            script: self.script.clone(),
            checkpoint: self.checkpoint.clone(),
        }
    }
}

/// Entry point for the Magic Maze command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let config = file.overridden_by(args.overrides());

    let script = match &config.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => String::new(),
    };

    let mut graphics = LogGraphics::default();
    let mut sound = LogSound::default();
    let mut input = ScriptedInput::parse(&script).context("invalid input script")?;
    let mut maps = LevelLibrary::new(config.levels_dir.clone());
    let mut checkpoints = FileCheckpoints::new(config.checkpoint_path());
    let mut clock = SystemClock::default();

    let io = Collaborators {
        graphics: &mut graphics,
        sound: &mut sound,
        input: &mut input,
        maps: &mut maps,
        checkpoints: &mut checkpoints,
        clock: &mut clock,
    };
    let settings = config.settings();
    let mut session = Session::new(io, settings);
    let outcome = if args.resume {
        session.resume()
    } else {
        session.run(settings.first_level, None)
    }
    .context("game session failed")?;
    let frames = session.frames();
    info!("{frames} frames, {} presented", graphics.flips());
    println!(
        "{:?} on level {} with score {} (life {}, mana {}, keys {})",
        outcome.state,
        outcome.level,
        outcome.status.score,
        outcome.status.life,
        outcome.status.mana,
        outcome.status.inventory.keys
    );
    Ok(())
}
