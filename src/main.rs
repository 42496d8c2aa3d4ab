//! Sprite Player headless viewer.
//!
//! Loads a sprite library, shows one sprite type in one animation state and
//! plays it for a number of frames, printing a JSON snapshot per frame:
//!
//! ```text
//! {"frame":0,"speed":1.0,"paused":false,"sprites":[{"image":"assets/sprite_types/knight/knight_idle_1.png","position":[250.0,250.0],"z_index":0}]}
//! ```
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults when missing) and the sprite library
//! 2. Select the sprite type and state, apply `--speed` / `--paused`
//! 3. For each frame: drain queued commands, tick, print the snapshot
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --data assets/sprite_types --sprite-type knight --state WALKING --frames 120
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};
use serde_json::json;

use spriteplayer::error::ConfigError;
use spriteplayer::events::scenecommand::SceneCommand;
use spriteplayer::loader::JsonSpriteLoader;
use spriteplayer::resources::playbackconfig::PlaybackConfig;
use spriteplayer::viewer::SpriteViewer;

/// Sprite Player headless viewer
#[derive(Parser)]
#[command(
    version,
    about = "Plays a sprite animation without a window and prints one JSON snapshot per frame."
)]
struct Cli {
    /// Directory holding sprite_type_list.json and one folder per sprite type.
    #[arg(long, value_name = "DIR", default_value = "assets/sprite_types")]
    data: PathBuf,

    /// Sprite type to show. Defaults to the first listed type.
    #[arg(long, value_name = "NAME")]
    sprite_type: Option<String>,

    /// Animation state to play. Defaults to the first state of the type.
    #[arg(long, value_name = "STATE")]
    state: Option<String>,

    /// Number of frames to play.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Ticks of real time between two frames.
    #[arg(long, default_value_t = 1.0)]
    dt: f32,

    /// Playback configuration file.
    #[arg(long, value_name = "PATH", default_value = "config.ini")]
    config: PathBuf,

    /// Override the initial speed factor.
    #[arg(long)]
    speed: Option<f32>,

    /// Start with playback paused.
    #[arg(long)]
    paused: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    // --------------- Configuration ---------------
    let mut config = PlaybackConfig::with_path(&cli.config);
    match config.load_from_file() {
        Ok(()) => info!("Loaded config from {}", cli.config.display()),
        Err(ConfigError::Read { .. }) if !cli.config.exists() => {
            info!(
                "No config at {}, using defaults",
                cli.config.display()
            );
        }
        Err(e) => warn!("{}; using defaults", e),
    }

    // --------------- Sprite library ---------------
    let loader = JsonSpriteLoader::new(&cli.data);
    let store = loader.load_library()?;
    let mut viewer = SpriteViewer::new(store, config);

    let sprite_type = match cli.sprite_type {
        Some(name) => name,
        None => viewer
            .sprite_type_names()
            .first()
            .cloned()
            .ok_or("sprite library is empty")?,
    };
    let states = viewer.select_sprite_type(&sprite_type)?;
    let state = match cli.state {
        Some(state) => state,
        None => states
            .first()
            .map(|s| s.to_string())
            .ok_or("sprite type has no animation states")?,
    };
    let id = viewer.select_state(&state)?;
    info!("Playing '{}' of '{}' as sprite {}", state, sprite_type, id);

    // Applied through the command queue like any other front-end input.
    let commands = viewer.command_sender();
    if let Some(speed) = cli.speed {
        commands.send(SceneCommand::SetSpeed(speed)).ok();
    }
    if cli.paused {
        commands.send(SceneCommand::Pause).ok();
    }

    // --------------- Main loop ---------------
    for frame in 0..cli.frames {
        viewer.pump_commands();
        let clock = viewer.director().clock();
        let line = json!({
            "frame": frame,
            "speed": clock.speed(),
            "paused": clock.is_paused(),
            "sprites": viewer.snapshot(),
        });
        println!("{}", serde_json::to_string(&line)?);
        viewer.tick(cli.dt);
    }
    Ok(())
}
