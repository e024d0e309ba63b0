//! Data-driven game balance
//!
//! Every physics constant, timer and score award the simulation uses.
//! Loaded from JSON; missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Physics, timer and scoring parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Kinematics (pixels per step) ===
    /// Downward acceleration added every step
    pub gravity: f32,
    /// Terminal falling speed
    pub max_fall_speed: f32,
    /// Vertical velocity applied on jump (negative is up)
    pub jump_velocity: f32,
    /// Upward velocity multiplier while jump is released mid-rise
    pub jump_cut: f32,
    /// Horizontal speed while walking
    pub walk_speed: f32,
    /// Horizontal speed while running
    pub run_speed: f32,
    /// Horizontal velocity multiplier with no input
    pub friction: f32,
    /// Below this horizontal speed the player stops dead
    pub stop_epsilon: f32,

    // === Enemies & items ===
    /// Patrol speed of walking enemies
    pub enemy_speed: f32,
    /// Speed of a kicked shell
    pub shell_kick_speed: f32,
    /// Upward velocity given to the player after a stomp
    pub stomp_bounce: f32,
    /// Slack (pixels) on the stomp test against the enemy midline
    pub stomp_tolerance: f32,
    /// Horizontal speed of a released power item
    pub item_speed: f32,
    /// Pixels per step a power item rises out of its block
    pub item_rise_speed: f32,
    /// How far past the leading edge the patrol rule looks
    pub probe_distance: f32,

    // === Blocks ===
    /// Bump offset after a successful question-block hit
    pub bump_offset_struck: f32,
    /// Bump offset after a hit with no state change
    pub bump_offset_thud: f32,
    /// Bump offset decay per step
    pub bump_decay: f32,

    // === Timers (steps) ===
    pub invulnerable_ticks: u32,
    pub squash_ticks: u32,
    pub shell_ticks: u32,

    // === Scoring ===
    pub score_stomp: u64,
    pub score_coin: u64,
    pub score_block: u64,
    pub score_power_up: u64,
    /// Coins needed for an extra life
    pub coins_per_life: u32,

    // === Run ===
    pub start_lives: u32,
    /// Level countdown in seconds
    pub start_time: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            max_fall_speed: 15.0,
            jump_velocity: -14.0,
            jump_cut: 0.85,
            walk_speed: 3.0,
            run_speed: 5.0,
            friction: 0.8,
            stop_epsilon: 0.1,

            enemy_speed: 1.0,
            shell_kick_speed: 10.0,
            stomp_bounce: -8.0,
            stomp_tolerance: 10.0,
            item_speed: 2.0,
            item_rise_speed: 1.0,
            probe_distance: 5.0,

            bump_offset_struck: 15.0,
            bump_offset_thud: 10.0,
            bump_decay: 2.0,

            // 3 seconds at 60 Hz
            invulnerable_ticks: 180,
            squash_ticks: 30,
            // 5 seconds at 60 Hz
            shell_ticks: 300,

            score_stomp: 100,
            score_coin: 200,
            score_block: 50,
            score_power_up: 1000,
            coins_per_life: 100,

            start_lives: 3,
            start_time: 400,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would make the simulation degenerate
    pub fn validate(&self) -> Result<(), LoadError> {
        let positive = [
            ("gravity", self.gravity),
            ("max_fall_speed", self.max_fall_speed),
            ("jump_velocity", -self.jump_velocity),
            ("walk_speed", self.walk_speed),
            ("run_speed", self.run_speed),
            ("friction", self.friction),
            ("enemy_speed", self.enemy_speed),
            ("shell_kick_speed", self.shell_kick_speed),
            ("item_rise_speed", self.item_rise_speed),
            ("coins_per_life", self.coins_per_life as f32),
            ("start_lives", self.start_lives as f32),
            ("start_time", self.start_time as f32),
        ];
        for (field, value) in positive {
            if value <= 0.0 || value.is_nan() {
                return Err(LoadError::InvalidTuning { field, value });
            }
        }
        Ok(())
    }

    /// Horizontal speed for the given run modifier
    #[inline]
    pub fn move_speed(&self, run: bool) -> f32 {
        if run { self.run_speed } else { self.walk_speed }
    }
}
