//! Survival Sim entry point
//!
//! Parses the startup parameters and runs the simulation headless, driven
//! by a clock and an input source, with the in-memory scene registry as the
//! render binding.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;

use survival_sim::platform::{
    Autopilot, Clock, FixedClock, FrameTimer, IdleInput, InputSource, SystemClock,
};
use survival_sim::renderer::SceneRegistry;
use survival_sim::sim::{GameState, tick};
use survival_sim::{RunSummary, SimConfig};

/// Longest frame the simulation will take in one step (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Top-down survival scene: zombies, carriers and a race to the store
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Zombies entering per wave
    zombies: u32,
    /// Humans entering per wave
    humans: u32,
    /// Seconds between waves
    interval: f32,
    /// Chance per wave that an infected human turns into a zombie
    probability: f32,
    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many frames
    #[arg(long, default_value_t = 36_000)]
    frames: u64,
    /// Frame rate of the simulated clock
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Use the wall clock and pace frames in real time
    #[arg(long)]
    realtime: bool,
    /// Let the demo pilot steer the player
    #[arg(long)]
    autopilot: bool,
    /// Keep simulating after the run is won or lost
    #[arg(long)]
    keep_running: bool,
    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
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

/// Game instance holding all state
struct Game {
    state: GameState,
    scene: SceneRegistry,
    clock: Box<dyn Clock>,
    timer: FrameTimer,
    input: Box<dyn InputSource>,
}

impl Game {
    fn new(args: &Args, config: SimConfig, seed: u64) -> Self {
        let mut state = GameState::new(config, seed);
        let mut scene = SceneRegistry::new();
        state.attach_visuals(&mut scene);

        let mut clock: Box<dyn Clock> = if args.realtime {
            Box::new(SystemClock::new())
        } else {
            Box::new(FixedClock::with_fps(args.fps))
        };
        let mut timer = FrameTimer::new();
        timer.start(clock.now());

        let input: Box<dyn InputSource> = if args.autopilot {
            Box::new(Autopilot::default())
        } else {
            Box::new(IdleInput)
        };

        Self {
            state,
            scene,
            clock,
            timer,
            input,
        }
    }

    /// Run one frame
    fn update(&mut self) {
        let dt = self.timer.delta(self.clock.now()).min(MAX_FRAME_DT);
        let input = self.input.poll(&self.state);
        tick(&mut self.state, &input, dt, &mut self.scene);

        for event in &self.state.events {
            log::debug!("frame {}: {:?}", self.state.frame, event);
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match SimConfig::new(args.zombies, args.humans, args.interval, args.probability) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    log::info!("Zombies per wave: {}", config.zombies_per_wave);
    log::info!("Humans per wave: {}", config.humans_per_wave);
    log::info!("Wave interval: {}s", config.wave_interval);
    log::info!("Conversion probability: {}", config.conversion_probability);
    log::info!("Seed: {}", seed);

    let mut game = Game::new(&args, config, seed);
    log::info!(
        "Store on the {} side",
        if game.state.store.side > 0.0 { "right" } else { "left" }
    );

    let pace = Duration::from_secs_f64(1.0 / args.fps.max(1) as f64);
    while game.state.frame < args.frames {
        game.update();
        if game.state.phase.is_over() && !args.keep_running {
            break;
        }
        if args.realtime {
            std::thread::sleep(pace);
        }
    }

    let summary = RunSummary::from_state(&game.state);
    log::info!("{}", summary.headline());
    log::debug!("{} visuals still bound", game.scene.len());

    if args.json {
        match summary.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to encode summary: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
