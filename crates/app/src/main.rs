use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dome_motion_core::{
    create, direction_labels, return_labels, BlockClock, Direction, EngineConfig, MemoryHost,
    MotionError, MotionHost, Point, ReturnMode, TrajectoryDescriptor, TrajectoryKind,
    TransportInfo,
};
use tracing_subscriber::EnvFilter;

fn main() -> dome_motion_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::List => {
            run_list();
            Ok(())
        }
        Commands::Simulate(args) => run_simulate(&config, &args),
    }
}

fn run_list() {
    for kind in TrajectoryKind::ALL {
        let directions = direction_labels(kind);
        let returns = return_labels(kind)
            .map(|labels| labels.join(" / "))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{kind:<10} directions: [{}]  returns: {returns}",
            directions.join(", ")
        );
    }
}

fn run_simulate(config: &EngineConfig, args: &SimulateArgs) -> dome_motion_core::Result<()> {
    let kind: TrajectoryKind = args.kind.parse()?;
    let direction = args
        .direction
        .as_deref()
        .map(str::parse::<Direction>)
        .transpose()?;
    let end_point = args.end.as_deref().map(parse_point).transpose()?;
    if !(args.bpm.is_finite() && args.bpm > 0.0) {
        return Err(MotionError::msg(format!("bpm must be positive, got {}", args.bpm)));
    }

    let descriptor = TrajectoryDescriptor {
        kind,
        direction,
        return_mode: if args.round_trip {
            ReturnMode::Return
        } else {
            ReturnMode::OneWay
        },
        duration: args.duration,
        repeat_count: args.repeats,
        sync_with_tempo: args.sync,
        source: args.source,
        end_point,
        seed: args.seed,
    };

    let mut host = MemoryHost::new(args.source + 1, config.dome_radius);
    host.place(args.source, Point::new(args.start_x, args.start_y));
    host.set_transport(TransportInfo {
        bpm: args.bpm,
        is_playing: true,
        ..TransportInfo::default()
    });

    let mut trajectory = create(&descriptor, &mut host, config)?;
    let mut clock = BlockClock::from_config(&config.audio);
    tracing::info!(
        %kind,
        direction = ?direction,
        block_seconds = clock.block_seconds(),
        "simulating trajectory"
    );

    let mut ticks = 0usize;
    loop {
        let tick = clock.advance(&host.transport());
        let done = trajectory.process(&mut host, tick.seconds, tick.beats);
        ticks += 1;

        if ticks % args.every.max(1) == 0 || done {
            if let Some(point) = host.last_move() {
                tracing::info!(
                    time = clock.time_seconds(),
                    progress = trajectory.progress(),
                    x = point.x,
                    y = point.y,
                    "position"
                );
            }
        }
        if done {
            break;
        }
    }

    tracing::info!(
        ticks,
        seconds = clock.time_seconds(),
        expected = trajectory.total_seconds(),
        "trajectory complete"
    );
    Ok(())
}

fn parse_point(text: &str) -> dome_motion_core::Result<Point> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| MotionError::msg(format!("expected `x,y`, got `{text}`")))?;
    let parse = |value: &str| {
        value
            .trim()
            .parse::<f32>()
            .map_err(|err| MotionError::msg(format!("invalid coordinate `{value}`: {err}")))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Dome trajectory motion engine", long_about = None)]
struct Cli {
    /// JSON engine configuration; defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every trajectory with its directions and return modes.
    List,
    /// Run a trajectory against an in-memory host until it completes.
    Simulate(SimulateArgs),
}

#[derive(clap::Args, Debug)]
struct SimulateArgs {
    /// Trajectory name, e.g. `circle` or `pendulum`.
    kind: String,
    /// Direction label, e.g. `counter-clockwise` or `fast`.
    #[arg(short, long)]
    direction: Option<String>,
    /// Length of one cycle in seconds, or in measures with `--sync`.
    #[arg(long, default_value_t = 2.0)]
    duration: f32,
    #[arg(long, default_value_t = 1.0)]
    repeats: f32,
    /// Count progress in host beats instead of seconds.
    #[arg(long)]
    sync: bool,
    #[arg(long, default_value_t = 120.0)]
    bpm: f64,
    /// Go to the end point and back within each cycle.
    #[arg(long)]
    round_trip: bool,
    /// End point as `x,y` for pendulum and spiral motions.
    #[arg(long)]
    end: Option<String>,
    #[arg(long, default_value_t = 0)]
    source: usize,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    start_x: f32,
    #[arg(long, default_value_t = 50.0, allow_hyphen_values = true)]
    start_y: f32,
    /// Seed for the random walk.
    #[arg(long)]
    seed: Option<u32>,
    /// Log the position every this many ticks.
    #[arg(long, default_value_t = 10)]
    every: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_end_points() {
        assert_eq!(parse_point("10, -2.5").unwrap(), Point::new(10.0, -2.5));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn cli_accepts_simulation_flags() {
        let cli = Cli::try_parse_from([
            "dome-motion",
            "simulate",
            "pendulum",
            "--end",
            "10,0",
            "--round-trip",
            "--start-x",
            "-20",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.kind, "pendulum");
                assert!(args.round_trip);
                assert_eq!(args.start_x, -20.0);
            }
            Commands::List => panic!("expected simulate"),
        }
    }
}
