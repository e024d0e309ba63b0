//! Browser binding
//!
//! Exposes a `Session` to JavaScript. Inputs are plain booleans and every
//! call that advances the game returns the snapshot as a JSON string.

use wasm_bindgen::prelude::*;

use crate::level::LevelLayout;
use crate::sim::{Autopilot, Session, Snapshot, StepInput};
use crate::tuning::Tuning;

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json(snapshot: &Snapshot) -> Result<String, JsValue> {
    serde_json::to_string(snapshot).map_err(to_js_error)
}

#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
    /// Attract mode driver
    autopilot: Option<Autopilot>,
}

#[wasm_bindgen]
impl WasmSession {
    /// Start on the bundled level, or on `layout_json` when given
    #[wasm_bindgen(constructor)]
    pub fn new(layout_json: Option<String>, tuning_json: Option<String>) -> Result<WasmSession, JsValue> {
        console_error_panic_hook::set_once();
        // Ignore the error when a previous session already installed the logger
        let _ = console_log::init_with_level(log::Level::Info);

        let session = match &layout_json {
            Some(layout) => Session::from_json(layout, tuning_json.as_deref()),
            None => {
                let tuning = match tuning_json.as_deref() {
                    Some(json) => Tuning::from_json(json),
                    None => Ok(Tuning::default()),
                };
                tuning.map(|t| Session::initialize(LevelLayout::sample(), t))
            }
        }
        .map_err(to_js_error)?;

        log::info!("Tile Dash session ready");
        Ok(Self {
            session,
            autopilot: None,
        })
    }

    /// One fixed step
    pub fn step(&mut self, left: bool, right: bool, jump: bool, run: bool) -> Result<String, JsValue> {
        let input = self.input(StepInput {
            left,
            right,
            jump,
            run,
        });
        to_json(&self.session.step(&input))
    }

    /// Advance by a wall-clock delta from requestAnimationFrame.
    ///
    /// The autopilot, when on, picks a fresh input for every substep.
    pub fn frame(
        &mut self,
        dt_ms: f64,
        left: bool,
        right: bool,
        jump: bool,
        run: bool,
    ) -> Result<String, JsValue> {
        let player = StepInput {
            left,
            right,
            jump,
            run,
        };
        let snapshot = match &mut self.autopilot {
            Some(pilot) => self.session.frame_with(dt_ms, |state| pilot.next_input(state)),
            None => self.session.frame(dt_ms, &player),
        };
        to_json(&snapshot)
    }

    pub fn second_elapsed(&mut self) {
        self.session.second_elapsed();
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Toggle attract mode; a seed enables it, `None` hands control back
    pub fn set_autopilot(&mut self, seed: Option<u64>) {
        self.autopilot = seed.map(Autopilot::new);
        log::info!("Autopilot: {}", self.autopilot.is_some());
    }
}

impl WasmSession {
    fn input(&mut self, player: StepInput) -> StepInput {
        match &mut self.autopilot {
            Some(pilot) => pilot.next_input(self.session.state()),
            None => player,
        }
    }
}
