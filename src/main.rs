//! Forest Survivors headless runner
//!
//! Loads a level and tuning, lets the autopilot play for a while through the
//! same fixed-step accumulator a windowed front-end would use, then prints
//! the final snapshot as JSON.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;

use forest_survivors::consts::*;
use forest_survivors::sim::{GameEvent, GameState, TickInput, tick};
use forest_survivors::{Level, Tuning};

/// Headless simulation of a Forest Survivors session
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level descriptor (JSON); the built-in arena when omitted
    #[arg(long)]
    level: Option<PathBuf>,
    /// Tuning overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Session seed; time-based when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,
    /// Presented frames per second fed to the accumulator
    #[arg(long, default_value_t = 30.0)]
    fps: f32,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    let _ = Builder::from_env(env).try_init();
}

/// Drives `tick` from variable frame deltas
struct Runner {
    state: GameState,
    input: TickInput,
    accumulator: f32,
}

impl Runner {
    fn new(state: GameState) -> Self {
        Self {
            state,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            accumulator: 0.0,
        }
    }

    /// Run simulation ticks for one presented frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.attack = false;
            self.input.roll = false;
            self.input.throw = false;
            self.input.start = false;
            self.input.restart = false;
        }

        for event in self.state.drain_events() {
            match event {
                GameEvent::GameOver { score } => log::info!("Run ended with score {score}"),
                GameEvent::CapRaised { .. } | GameEvent::Started => {}
                other => log::debug!("{other:?}"),
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let level = match &args.level {
        Some(path) => Level::load(path)?,
        None => Level::demo(),
    };
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    log::info!("Forest Survivors (headless) starting, seed {seed}");

    let frame_dt = 1.0 / args.fps.max(1.0);
    let frames = (args.seconds.max(0.0) / frame_dt).ceil() as u64;
    let mut runner = Runner::new(GameState::new(level, tuning, seed));
    for _ in 0..frames {
        runner.update(frame_dt);
    }

    let snapshot = runner.state.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
