//! Tile Dash headless runner
//!
//! Plays a level with the demo autopilot and logs what happened. The browser
//! build drives the library through `tile_dash::wasm` instead.
//!
//! ```text
//! tile-dash [--level level.json] [--tuning tuning.json] [--ticks N] [--seed N]
//! ```
//!
//! Set `RUST_LOG=debug` to see every stomp and bump.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::fs;

    use tile_dash::consts::SIM_HZ;
    use tile_dash::sim::{Autopilot, GameEvent, RunStatus, Session};
    use tile_dash::{LevelLayout, Tuning};

    /// Runner options
    pub struct Options {
        pub level: Option<String>,
        pub tuning: Option<String>,
        /// Steps to simulate (default one minute)
        pub ticks: u64,
        pub seed: u64,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                level: None,
                tuning: None,
                ticks: 60 * SIM_HZ as u64,
                seed: 1,
            }
        }
    }

    pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
        let mut options = Options::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value"));
            match flag.as_str() {
                "--level" => options.level = Some(value()?),
                "--tuning" => options.tuning = Some(value()?),
                "--ticks" => {
                    options.ticks = value()?
                        .parse()
                        .map_err(|e| format!("--ticks: {e}"))?
                }
                "--seed" => {
                    options.seed = value()?
                        .parse()
                        .map_err(|e| format!("--seed: {e}"))?
                }
                other => return Err(format!("unknown argument `{other}`")),
            }
        }
        Ok(options)
    }

    pub fn run(options: &Options) -> Result<(), Box<dyn Error>> {
        let layout = match &options.level {
            Some(path) => LevelLayout::from_json(&fs::read_to_string(path)?)?,
            None => LevelLayout::sample(),
        };
        let tuning = match &options.tuning {
            Some(path) => Tuning::from_json(&fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };

        let mut session = Session::initialize(layout, tuning);
        let mut pilot = Autopilot::new(options.seed);
        log::info!("Autopilot seed {}, {} ticks", options.seed, options.ticks);

        let mut deaths = 0;
        let mut furthest = 0.0f32;
        for tick in 1..=options.ticks {
            let input = pilot.next_input(session.state());
            let snap = session.step(&input);
            if tick % SIM_HZ as u64 == 0 {
                session.second_elapsed();
            }

            furthest = furthest.max(snap.player.body.pos.x);
            deaths += snap
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::PlayerDied { .. }))
                .count();

            if snap.status == RunStatus::GameOver {
                log::info!("Run ended at tick {}", tick);
                break;
            }
        }

        let state = session.state();
        log::info!(
            "Score {} | coins {} | lives {} | time {} | deaths {} | furthest x {:.0}",
            state.scoreboard.score,
            state.scoreboard.coins,
            state.scoreboard.lives,
            state.scoreboard.time,
            deaths,
            furthest
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tile Dash (headless) starting...");

    let options = match native::parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = native::run(&options) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is WasmSession, this is just to satisfy the compiler
}
