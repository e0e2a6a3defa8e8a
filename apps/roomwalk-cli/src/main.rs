use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use roomwalk_config::RoomwalkConfig;
use roomwalk_input::{InputScript, ScriptPlayer};
use roomwalk_kernel::{FixedClock, FrameLoop, FrameReport, SimulationState};
use roomwalk_render::{DebugTextRenderer, Renderer};
use roomwalk_scene::Scene;
use roomwalk_tools::FrameInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roomwalk-cli", about = "Headless roomwalk driver")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// List scene objects with their world bounds
    Scene {
        /// Config file whose scene replaces the default room
        #[arg(long)]
        config: Option<PathBuf>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run an input script at a fixed 60 Hz clock and print the final frame
    Simulate {
        /// Input script, e.g. `KeyW:120,KeyW+KeyA:30,-:60`
        #[arg(short, long)]
        script: String,
        /// Print a summary line for every frame
        #[arg(long)]
        trace: bool,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run an input script twice and check both runs end in the same state
    Replay {
        #[arg(short, long)]
        script: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<RoomwalkConfig> {
    match path {
        Some(path) => RoomwalkConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(RoomwalkConfig::default()),
    }
}

/// Drive a fresh simulation through `script`, returning the final state and
/// the last frame's report.
fn run_script(
    config: &RoomwalkConfig,
    scene: &Scene,
    script: &InputScript,
    trace: bool,
) -> (SimulationState, Option<FrameReport>) {
    let mut frame_loop = FrameLoop::new(
        SimulationState::new(config.spawn),
        config.motion,
        FixedClock::sixty_hz(),
    );
    tracing::debug!(frames = script.total_frames(), gate = ?config.motion.gate, "running input script");
    let mut player = ScriptPlayer::new(script.clone());
    let mut last = None;
    while player.advance(&config.bindings, frame_loop.state_mut().flags_mut()) {
        let report = frame_loop.advance(scene);
        if trace {
            println!("{}", FrameInspector::summary(scene, frame_loop.state(), &report));
        }
        last = Some(report);
    }
    (frame_loop.state().clone(), last)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("roomwalk-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", roomwalk_input::crate_info());
            println!("render: {}", roomwalk_render::crate_info());
            println!("config: {}", roomwalk_config::crate_info());
            println!("tools: {}", roomwalk_tools::crate_info());
            let scene = Scene::default_room();
            println!(
                "default room: {} objects, {} lights",
                scene.objects().len(),
                scene.lights().len()
            );
        }
        Commands::Scene { config, json } => {
            let config = load_config(config.as_ref())?;
            let scene = config.build_scene()?;
            let objects = FrameInspector::objects(&scene);
            if json {
                println!("{}", serde_json::to_string_pretty(&objects)?);
            } else {
                for object in &objects {
                    println!("{object}");
                }
            }
        }
        Commands::Simulate {
            script,
            trace,
            config,
        } => {
            let config = load_config(config.as_ref())?;
            let scene = config.build_scene()?;
            let script = InputScript::parse(&script).context("parsing input script")?;
            let (state, last) = run_script(&config, &scene, &script, trace);

            let mut projection = config.projection;
            projection.resize(config.window.width, config.window.height);
            print!("{}", DebugTextRenderer::new().render(&scene, &state, &projection));
            if let Some(report) = last {
                println!("{}", FrameInspector::summary(&scene, &state, &report));
            }
        }
        Commands::Replay { script, config } => {
            let config = load_config(config.as_ref())?;
            let scene = config.build_scene()?;
            let script = InputScript::parse(&script).context("parsing input script")?;
            println!("Deterministic replay: {} frames", script.total_frames());

            let (first, _) = run_script(&config, &scene, &script, false);
            let (second, _) = run_script(&config, &scene, &script, false);
            println!("Run 1: frame={} hash={:#018x}", first.frame(), first.state_hash());
            println!("Run 2: frame={} hash={:#018x}", second.frame(), second.state_hash());
            if first.state_hash() != second.state_hash() {
                bail!("replay diverged");
            }
            println!("Match: OK");
        }
    }

    Ok(())
}
