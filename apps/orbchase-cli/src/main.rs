mod player;
mod session;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use orbchase_input::PointerEvent;
use orbchase_kernel::GameConfig;
use orbchase_render::{DebugTextRenderer, RenderView, Renderer};
use orbchase_scene::{build_arena, build_sandbox, SceneGraph};

use player::Strategy;
use session::Session;

#[derive(Parser)]
#[command(name = "orbchase-cli", about = "Headless driver for the orb arena")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SceneChoice {
    Sandbox,
    Arena,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the default game config
    Info,
    /// Build a scene and print its nodes
    Scene {
        #[arg(value_enum)]
        which: SceneChoice,
        /// Dump the graph as JSON instead of a node listing
        #[arg(long)]
        json: bool,
    },
    /// Play the arena headlessly with a scripted player
    Play {
        /// RNG seed for orb placement
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Simulated seconds to run
        #[arg(long, default_value = "10")]
        seconds: f32,
        /// Frames per simulated second
        #[arg(long, default_value = "60")]
        fps: u32,
        /// JSON file overriding game tuning values
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "chase")]
        strategy: Strategy,
        /// Click "Click to Restart" whenever the run ends
        #[arg(long)]
        auto_restart: bool,
    },
    /// Run the same session twice and compare final state hashes
    Replay {
        #[arg(short, long, default_value = "42")]
        seed: u64,
        #[arg(long, default_value = "10")]
        seconds: f32,
        #[arg(long, value_enum, default_value = "chase")]
        strategy: Strategy,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("orbchase-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", orbchase_scene::crate_info());
            println!("render: {}", orbchase_render::crate_info());
            println!("input: {}", orbchase_input::crate_info());
            println!("default config:");
            println!("{}", GameConfig::default().to_json_pretty()?);
        }
        Commands::Scene { which, json } => {
            let mut scene = SceneGraph::new();
            let view = match which {
                SceneChoice::Sandbox => {
                    build_sandbox(&mut scene);
                    RenderView::first_person(glam::Vec3::ZERO, glam::Vec3::NEG_Z)
                }
                SceneChoice::Arena => {
                    build_arena(&mut scene, &GameConfig::default())?;
                    RenderView::follow(glam::Vec3::ZERO)
                }
            };
            if json {
                println!("{}", scene.to_json_pretty()?);
            } else {
                print!("{}", DebugTextRenderer::new().render(&scene, &view));
            }
        }
        Commands::Play {
            seed,
            seconds,
            fps,
            config,
            strategy,
            auto_restart,
        } => {
            let config = match config {
                Some(path) => GameConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => GameConfig::default(),
            };
            anyhow::ensure!(fps > 0, "--fps must be at least 1");
            println!("Play: seed={seed}, seconds={seconds}, fps={fps}, strategy={strategy:?}");

            let mut session = Session::new(config, seed, strategy)?;
            let dt = 1.0 / fps as f32;
            let mut last_hud = session.hud();
            println!("[{:>6.2}s] {last_hud}", 0.0);
            for frame in 1..=frame_count(seconds, fps) {
                session.frame(dt)?;
                if auto_restart && session.state().is_game_over() {
                    println!("[{:>6.2}s] {}", frame as f32 * dt, session.hud());
                    session.pointer(PointerEvent::RestartLabelClick)?;
                }
                let hud = session.hud();
                if hud != last_hud {
                    println!("[{:>6.2}s] {hud}", frame as f32 * dt);
                    last_hud = hud;
                }
            }
            let p = session.player_position();
            println!("Player: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
            println!("{}", session.summary());
        }
        Commands::Replay {
            seed,
            seconds,
            strategy,
        } => {
            println!("Deterministic replay: seed={seed}, seconds={seconds}");
            let fps = 60;
            let dt = 1.0 / fps as f32;
            let mut runs = Vec::with_capacity(2);
            for _ in 0..2 {
                let mut session = Session::new(GameConfig::default(), seed, strategy)?;
                for _ in 0..frame_count(seconds, fps) {
                    session.frame(dt)?;
                }
                runs.push(session.summary());
            }
            println!("Run 1: {}", runs[0]);
            println!("Run 2: {}", runs[1]);
            let matched = runs[0] == runs[1];
            println!("Match: {}", if matched { "OK" } else { "MISMATCH" });
            anyhow::ensure!(matched, "replay diverged");
        }
    }

    Ok(())
}

fn frame_count(seconds: f32, fps: u32) -> u64 {
    (seconds.max(0.0) * fps as f32).round() as u64
}
