//! Session facade
//!
//! Owns the level, tuning and live state, and hands out plain-data snapshots
//! for whatever draws the game. Hosts either call `step` once per fixed tick
//! (and `second_elapsed` once per second), or feed wall-clock deltas to
//! `frame` and let the accumulator do both. `frame_with` takes an input
//! source instead of a fixed input and asks it again before every substep.

use serde::{Deserialize, Serialize};

use super::block::Block;
use super::camera::Camera;
use super::player::Player;
use super::state::{Actor, GameEvent, GameState, RunStatus, Scoreboard};
use super::tick::{StepInput, second_elapsed, step};
use crate::consts::{MAX_SUBSTEPS, SIM_DT_MS, SIM_HZ};
use crate::error::LoadError;
use crate::level::LevelLayout;
use crate::tuning::Tuning;

/// Longest wall-clock delta a single frame may feed the accumulator
const MAX_FRAME_MS: f64 = 250.0;

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub player: Player,
    /// Active actors in ID order
    pub actors: Vec<Actor>,
    /// Every block, including destroyed ones
    pub blocks: Vec<Block>,
    pub scoreboard: Scoreboard,
    pub status: RunStatus,
    pub camera: Camera,
    /// Events since the previous snapshot
    pub events: Vec<GameEvent>,
}

/// One play session over a single level
#[derive(Debug, Clone)]
pub struct Session {
    layout: LevelLayout,
    tuning: Tuning,
    state: GameState,
    /// Unsimulated wall-clock time (ms)
    accumulator: f64,
    /// Steps taken by `frame` since the countdown last ticked
    steps_this_second: u32,
}

impl Session {
    pub fn initialize(layout: LevelLayout, tuning: Tuning) -> Self {
        let state = GameState::new(&layout, &tuning);
        Self {
            layout,
            tuning,
            state,
            accumulator: 0.0,
            steps_this_second: 0,
        }
    }

    /// Load a layout and optional tuning override from JSON
    pub fn from_json(layout_json: &str, tuning_json: Option<&str>) -> Result<Self, LoadError> {
        let layout = LevelLayout::from_json(layout_json)?;
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(json)?,
            None => Tuning::default(),
        };
        Ok(Self::initialize(layout, tuning))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Advance one fixed step
    pub fn step(&mut self, input: &StepInput) -> Snapshot {
        step(&mut self.state, input, &self.tuning);
        self.snapshot()
    }

    /// Level countdown; call once per elapsed second
    pub fn second_elapsed(&mut self) {
        second_elapsed(&mut self.state, &self.tuning);
    }

    /// Fresh run on the same level
    pub fn reset(&mut self) {
        self.state = GameState::new(&self.layout, &self.tuning);
        self.accumulator = 0.0;
        self.steps_this_second = 0;
        log::info!("Session reset");
    }

    /// Run as many fixed steps as `dt_ms` of wall-clock time covers
    pub fn frame(&mut self, dt_ms: f64, input: &StepInput) -> Snapshot {
        self.frame_with(dt_ms, |_| *input)
    }

    /// Like `frame`, polling `next_input` for each substep
    pub fn frame_with(
        &mut self,
        dt_ms: f64,
        mut next_input: impl FnMut(&GameState) -> StepInput,
    ) -> Snapshot {
        self.accumulator += dt_ms.clamp(0.0, MAX_FRAME_MS);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            let input = next_input(&self.state);
            step(&mut self.state, &input, &self.tuning);
            self.accumulator -= SIM_DT_MS;
            substeps += 1;

            self.steps_this_second += 1;
            if self.steps_this_second == SIM_HZ {
                self.steps_this_second = 0;
                second_elapsed(&mut self.state, &self.tuning);
            }
        }

        self.snapshot()
    }

    /// Current state as plain data; drains pending events
    pub fn snapshot(&mut self) -> Snapshot {
        let state = &mut self.state;
        Snapshot {
            tick: state.time_ticks,
            player: state.player.clone(),
            actors: state
                .actors
                .iter()
                .filter(|a| a.body.active)
                .cloned()
                .collect(),
            blocks: state.grid.blocks().to_vec(),
            scoreboard: state.scoreboard.clone(),
            status: state.status,
            camera: state.camera.clone(),
            events: state.drain_events(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::autopilot::Autopilot;

    fn session() -> Session {
        Session::initialize(LevelLayout::sample(), Tuning::default())
    }

    #[test]
    fn test_step_snapshot() {
        let mut session = session();
        let snap = session.step(&StepInput::default());
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.actors.len(), 18);
        assert_eq!(snap.blocks.len(), session.state().grid.blocks().len());
        assert_eq!(snap.status, RunStatus::Playing);
        assert_eq!(snap.scoreboard.lives, 3);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut session = session();
        let right = StepInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..120 {
            session.step(&right);
        }
        session.second_elapsed();
        session.reset();

        let state = session.state();
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.scoreboard.score, 0);
        assert_eq!(state.scoreboard.coins, 0);
        assert_eq!(state.scoreboard.lives, 3);
        assert_eq!(state.scoreboard.time, 400);
        assert_eq!(state.camera.x, 0.0);
        assert_eq!(state.actors.len(), 18);
    }

    #[test]
    fn test_frame_substeps_are_capped() {
        let mut session = session();
        let snap = session.frame(51.0, &StepInput::default());
        assert_eq!(snap.tick, 3);

        // A long stall is clamped, then capped at the substep limit
        let snap = session.frame(10_000.0, &StepInput::default());
        assert_eq!(snap.tick, 3 + MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_frame_with_polls_input_every_substep() {
        let mut session = session();
        let mut seen = Vec::new();
        session.frame_with(51.0, |state| {
            seen.push(state.time_ticks);
            StepInput::default()
        });
        assert_eq!(seen, vec![0, 1, 2]);

        seen.clear();
        session.frame_with(10_000.0, |state| {
            seen.push(state.time_ticks);
            StepInput::default()
        });
        assert_eq!(seen, (3..3 + MAX_SUBSTEPS as u64).collect::<Vec<_>>());
    }

    #[test]
    fn test_autopilot_frames_match_single_steps() {
        let mut framed = session();
        let mut stepped = session();
        let mut framed_pilot = Autopilot::new(5);
        let mut stepped_pilot = Autopilot::new(5);

        for _ in 0..30 {
            framed.frame_with(10_000.0, |state| framed_pilot.next_input(state));
        }
        for _ in 0..30 * MAX_SUBSTEPS {
            let input = stepped_pilot.next_input(stepped.state());
            stepped.step(&input);
            if stepped.state().time_ticks % SIM_HZ as u64 == 0 {
                stepped.second_elapsed();
            }
        }

        assert_eq!(framed.state().time_ticks, stepped.state().time_ticks);
        assert_eq!(
            framed.state().player.body.pos,
            stepped.state().player.body.pos
        );
        assert_eq!(framed.state().scoreboard, stepped.state().scoreboard);
    }

    #[test]
    fn test_frame_drives_countdown() {
        let mut session = session();
        for _ in 0..60 {
            session.frame(SIM_DT_MS + 0.01, &StepInput::default());
        }
        assert_eq!(session.state().time_ticks, 60);
        assert_eq!(session.state().scoreboard.time, 399);
    }

    #[test]
    fn test_events_reported_once() {
        let mut session = Session::initialize(LevelLayout::sample(), Tuning::default());
        for _ in 0..60 {
            session.step(&StepInput::default());
        }
        let jump = StepInput {
            jump: true,
            ..Default::default()
        };
        let snap = session.step(&jump);
        assert_eq!(snap.events, vec![GameEvent::Jumped]);
        let snap = session.step(&jump);
        assert!(snap.events.is_empty());
    }

    #[test]
    fn test_from_json_rejects_bad_tuning() {
        let layout = LevelLayout::sample().to_json().unwrap();
        assert!(Session::from_json(&layout, None).is_ok());
        assert!(matches!(
            Session::from_json(&layout, Some(r#"{ "gravity": -1.0 }"#)),
            Err(LoadError::InvalidTuning { field: "gravity", .. })
        ));
        assert!(matches!(
            Session::from_json("{", None),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut session = session();
        let snap = session.step(&StepInput::default());
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"scoreboard\""));
    }
}
