use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use steer_cli::{
    apply_overrides, load_scene, load_settings, Mode, RunOptions, TargetScript, Toggle,
};
use steer_core::{Bounds, SingleBehavior, Vector2D};
use steer_shared::CombinationMode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Single,
    Crowd,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BehaviorArg {
    Seek,
    Flee,
    Pursue,
    Evade,
    Arrive,
    Wander,
}

impl From<BehaviorArg> for SingleBehavior {
    fn from(arg: BehaviorArg) -> Self {
        match arg {
            BehaviorArg::Seek => SingleBehavior::Seek,
            BehaviorArg::Flee => SingleBehavior::Flee,
            BehaviorArg::Pursue => SingleBehavior::Pursue,
            BehaviorArg::Evade => SingleBehavior::Evade,
            BehaviorArg::Arrive => SingleBehavior::Arrive,
            BehaviorArg::Wander => SingleBehavior::Wander,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CombinationArg {
    Priority,
    Weighted,
}

impl From<CombinationArg> for CombinationMode {
    fn from(arg: CombinationArg) -> Self {
        match arg {
            CombinationArg::Priority => CombinationMode::Priority,
            CombinationArg::Weighted => CombinationMode::Weighted,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless steering behaviors simulation", long_about = None)]
struct Args {
    /// Simulate the lone pilot or the path-following crowd
    #[arg(short, long, value_enum, default_value_t = ModeArg::Crowd)]
    mode: ModeArg,

    /// Behavior of the lone pilot
    #[arg(short, long, value_enum, default_value_t = BehaviorArg::Seek)]
    behavior: BehaviorArg,

    /// Blend wander with seek instead of running the selected pilot behavior
    #[arg(long)]
    blend: bool,

    /// Crowd combination strategy (overrides the settings file)
    #[arg(short, long, value_enum)]
    combination: Option<CombinationArg>,

    /// Crowd behaviors to switch off, comma separated
    #[arg(long, value_enum, value_delimiter = ',')]
    disable: Vec<Toggle>,

    /// Scene description JSON (defaults to the built-in scene)
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Steering settings JSON; missing fields keep their defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Emit every n-th frame
    #[arg(short, long, default_value_t = 1)]
    every: u64,

    /// Seed for spawning and wander jitter
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Target x position (defaults to the scene center)
    #[arg(long)]
    target_x: Option<f32>,

    /// Target y position (defaults to the scene center)
    #[arg(long)]
    target_y: Option<f32>,

    /// Move the target on a circle of this radius around its position
    #[arg(long, default_value_t = 0.0)]
    orbit_radius: f32,

    /// Radians the orbiting target advances per tick
    #[arg(long, default_value_t = 0.02)]
    orbit_speed: f32,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let scene = load_scene(args.scene.as_deref()).context("Failed to load scene")?;
    let mut settings = load_settings(args.settings.as_deref()).context("Failed to load settings")?;
    apply_overrides(&mut settings, args.combination.map(Into::into), &args.disable);

    let mode = match args.mode {
        ModeArg::Single => Mode::Single {
            behavior: args.behavior.into(),
            blend: args.blend,
        },
        ModeArg::Crowd => Mode::Crowd,
    };

    let center = Bounds::new(scene.width, scene.height).center();
    let anchor = Vector2D::new(
        args.target_x.unwrap_or(center.x),
        args.target_y.unwrap_or(center.y),
    );
    let target = if args.orbit_radius > 0.0 {
        TargetScript::Orbit {
            center: anchor,
            radius: args.orbit_radius,
            speed: args.orbit_speed,
        }
    } else {
        TargetScript::Fixed(anchor)
    };

    log::info!("Steering simulation starting...");
    log::info!(
        "Scene: {}x{}, {} waypoints, {} obstacles",
        scene.width,
        scene.height,
        scene.path.len(),
        scene.obstacles.len()
    );
    log::debug!("Settings: {:?}", settings);

    let options = RunOptions {
        mode,
        ticks: args.ticks,
        every: args.every,
        seed: args.seed,
        target,
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    steer_cli::run(&scene, &settings, &options, &mut out).context("Simulation error")?;

    Ok(())
}
