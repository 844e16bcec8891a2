//! Doodle Jump headless driver
//!
//! Plays the role of the external fixed-timestep loop: feeds direction input,
//! steps the world and prints frames. There is no renderer.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use doodle_jump::settings::Settings;
use doodle_jump::sim::{DebugEvent, Direction, GameEvent, Listener, Snapshot, World};

/// Maximum simulation steps per frame to prevent spiral of death
const MAX_SUBSTEPS: u32 = 8;
/// Simulated frame length when not running in real time
const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "doodle-jump", about = "Run the platform jumper simulation headless")]
struct Args {
    /// Settings file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed override
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,
    /// Steer automatically towards the next platform below
    #[arg(long)]
    autopilot: bool,
    /// Print one JSON snapshot per frame to stdout
    #[arg(long)]
    json: bool,
    /// Start over this many times after dying
    #[arg(long, default_value_t = 0)]
    restarts: u32,
    /// Pace the loop against the wall clock
    #[arg(long)]
    realtime: bool,
}

/// Prints frames as JSON lines and forwards diagnostics to the log
struct JsonFrames {
    enabled: bool,
}

impl Listener for JsonFrames {
    fn debug(&mut self, event: &DebugEvent) {
        log::debug!("{}: {:?}", event.name(), event);
    }

    fn display(&mut self, snapshot: &Snapshot) {
        if !self.enabled {
            return;
        }
        match serde_json::to_string(snapshot) {
            Ok(line) => println!("{}", line),
            Err(e) => log::warn!("Failed to encode snapshot: {}", e),
        }
    }
}

/// Head for the closest platform below the avatar's feet
fn autopilot(world: &World) -> Direction {
    let feet = world.avatar.feet();
    let center = (feet.x1 + feet.x2) / 2.0;

    let target = world
        .platforms
        .iter()
        .filter(|p| p.top() >= feet.y)
        .min_by(|a, b| {
            a.top()
                .partial_cmp(&b.top())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match target {
        Some(platform) => {
            let platform_center = (platform.left() + platform.right()) / 2.0;
            let delta = platform_center - center;
            if delta > 4.0 {
                Direction::Right
            } else if delta < -4.0 {
                Direction::Left
            } else {
                Direction::None
            }
        }
        None => Direction::None,
    }
}

/// Fixed timestep driver state
struct Driver {
    world: World,
    settings: Settings,
    accumulator: f32,
    autopilot: bool,
    restarts_left: u32,
    best_score: u64,
    games: u32,
}

impl Driver {
    /// Run simulation steps covered by `dt` seconds of frame time.
    /// Returns false once the session is over.
    fn update(&mut self, dt: f32) -> bool {
        let step_dt = self.settings.step_dt();
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= step_dt && substeps < MAX_SUBSTEPS {
            if self.autopilot {
                let direction = autopilot(&self.world);
                self.world.set_direction_typed(direction);
            }
            self.world.advance(self.settings.steps_per_second);
            self.accumulator -= step_dt;
            substeps += 1;

            for event in self.world.drain_events() {
                if let GameEvent::Died { score } = event {
                    self.games += 1;
                    self.best_score = self.best_score.max(score);
                    log::info!("Game {} over: score {}", self.games, score);

                    if self.restarts_left == 0 {
                        return false;
                    }
                    self.restarts_left -= 1;
                    self.world.reset();
                }
            }
        }
        true
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    log::info!("Doodle Jump (headless) starting...");
    let mut world = World::new(&settings).context("creating world")?;
    world.set_listener(Box::new(JsonFrames { enabled: args.json }));
    log::info!("Game initialized with seed: {}", world.seed);

    let mut driver = Driver {
        world,
        settings,
        accumulator: 0.0,
        autopilot: args.autopilot,
        restarts_left: args.restarts,
        best_score: 0,
        games: 0,
    };

    let frames = (args.seconds / FRAME_DT).ceil() as u64;
    let mut last = Instant::now();
    for _ in 0..frames {
        let dt = if args.realtime {
            std::thread::sleep(Duration::from_secs_f32(FRAME_DT));
            let now = Instant::now();
            let elapsed = now.duration_since(last).as_secs_f32();
            last = now;
            elapsed
        } else {
            FRAME_DT
        };

        if !driver.update(dt) {
            break;
        }
    }

    if driver.world.is_alive() {
        driver.best_score = driver.best_score.max(driver.world.score);
    }
    log::info!(
        "Finished after {} game(s), best score {}",
        driver.games.max(1),
        driver.best_score
    );
    eprintln!("best score: {}", driver.best_score);
    Ok(())
}
