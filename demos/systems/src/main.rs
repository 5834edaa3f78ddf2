//! Movement demo: two objects, a movement system, and a logger listening for
//! its events.
//!
//! Object "a" has a position, a velocity and a direction and moves every
//! tick. Object "b" has no direction and stays put. With
//! `--disable-velocity`, a's velocity is disabled and it stays put too.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use components::{Direction, Name, Position, Velocity};
use demo_systems::{MoveLogger, MovementSystem};
use engine_app::{Scene, TickConfig, TickLoop, config};
use engine_component::Entity;

#[derive(Parser)]
#[command(name = "movement_demo", about = "Run the movement demo scene")]
struct Args {
    /// JSON tick config (tick_rate, max_ticks, schedule)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run; overrides the config
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Disable the moving object's velocity before the first tick
    #[arg(long)]
    disable_velocity: bool,
}

fn populate(scene: &mut Scene) -> (Entity, Entity) {
    let a = scene
        .create_game_object()
        .add_component(Name::new("a"))
        .add_component(Position::new(0.0, 0.0))
        .add_component(Velocity::new(5.0, 0.0))
        .add_component(Direction::Right)
        .entity();
    let b = scene
        .create_game_object()
        .add_component(Name::new("b"))
        .add_component(Position::new(0.0, 0.0))
        .add_component(Velocity::new(5.0, 0.0))
        .entity();
    (a, b)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("movement_demo=info".parse()?)
                .add_directive("demo_systems=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut tick_config = match &args.config {
        Some(path) => config::load(path)
            .with_context(|| format!("loading tick config from {}", path.display()))?,
        None => TickConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        tick_config.max_ticks = ticks;
    }

    let mut tick_loop = TickLoop::new(tick_config);
    let resources = tick_loop.resources_mut();
    let (a, b) = populate(resources.scene_mut());
    if args.disable_velocity
        && let Some(object) = resources.scene_mut().get_mut(a)
    {
        object.set_component_enabled::<Velocity>(false)?;
        info!(entity = %a, "velocity disabled");
    }

    let logger = MoveLogger::new();
    let history = logger.history();
    resources.add(MovementSystem::default());
    resources.add(logger);
    tick_loop.validate_schedule()?;

    info!("movement demo starting");
    tick_loop.run()?;

    for entity in [a, b] {
        let object = tick_loop
            .resources()
            .scene()
            .get(entity)
            .with_context(|| format!("{entity} vanished"))?;
        let position = object.component::<Position>()?;
        info!(
            name = %object.component::<Name>()?,
            x = position.0.x,
            y = position.0.y,
            "final position"
        );
    }
    info!(moves = history.total(), "movement demo complete");

    tick_loop.shutdown();
    Ok(())
}
