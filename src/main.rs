//! twodee demo entry point.
//!
//! Opens a window with three layers: a tiled playfield with rotating tiles
//! and a sprite following the pointer, a frame time overlay (`F11` for
//! details) and a menu (`Esc`). `M` pauses the music, `Space` runs the
//! script's `foo` handlers.
//!
//! ```sh
//! cargo run --release -- --objects 512
//! cargo run -- --headless --frames 300
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};

use twodee::app::Application;
use twodee::backend::RaylibPlatform;
use twodee::error::AppError;
use twodee::gameloop::{GameLoop, Platform, SystemClock};
use twodee::headless::{HeadlessPlatform, MemoryAssets};
use twodee::resources::audio::{setup_audio, shutdown_audio};
use twodee::resources::gameconfig::GameConfig;
use twodee::systems::audio::AudioTracks;

/// twodee layer, event and menu demo
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Start in fullscreen mode.
    #[arg(long)]
    fullscreen: bool,

    /// Initial number of rotating tiles.
    #[arg(long)]
    objects: Option<i32>,

    /// Start with the detailed debug overlay.
    #[arg(long)]
    debug: bool,

    /// Run without a window, audio or GPU assets.
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames (headless only).
    #[arg(long, default_value_t = 600)]
    frames: u64,
}

fn run(
    config: &GameConfig,
    cli: &Cli,
    platform: &mut dyn Platform,
    with_audio: bool,
) -> Result<u64, AppError> {
    let mut app = Application::new(config, platform.assets())?;
    app.state_mut().debug = cli.debug;

    let bridge = with_audio.then(setup_audio);
    if let Some(bridge) = bridge.as_ref() {
        app.attach_audio(
            bridge.tx_cmd.clone(),
            bridge.rx_msg.clone(),
            &AudioTracks::in_dir(&config.assets_dir),
        );
    }

    let mut game_loop = GameLoop::new(SystemClock, config.step());
    let result = game_loop.run(&mut app, platform);

    app.dispose();
    if let Some(bridge) = bridge {
        shutdown_audio(bridge);
    }
    result
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(cli.config.clone());
    if let Err(e) = config.load_from_file() {
        warn!("{}, using defaults", e);
    }
    if cli.fullscreen {
        config.fullscreen = true;
    }
    if let Some(objects) = cli.objects {
        config.objects = objects;
    }

    let (w, h) = config.window_size();
    let result = if cli.headless {
        info!("running headless for {} frames", cli.frames);
        let mut platform = HeadlessPlatform::new(MemoryAssets::from_disk(), w as i32, h as i32)
            .with_frame_limit(cli.frames);
        run(&config, &cli, &mut platform, false)
    } else {
        let mut platform = RaylibPlatform::new(&config);
        run(&config, &cli, &mut platform, true)
    };

    match result {
        Ok(iterations) => info!("bye after {} frames", iterations),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
