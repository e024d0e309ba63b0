//! Fixed timestep simulation step
//!
//! Advances the game state deterministically: kinematics and timers for
//! every entity, block animation, collisions, camera, then removal of
//! anything that went inactive.

use serde::{Deserialize, Serialize};

use super::collision;
use super::enemy::EnemyState;
use super::state::{ActorKind, DeathCause, GameEvent, GameState};
use crate::tuning::Tuning;

/// Input commands for a single step (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInput {
    /// Move left (wins over right)
    pub left: bool,
    pub right: bool,
    /// Held jump; releasing it mid-rise cuts the jump short
    pub jump: bool,
    /// Run instead of walk
    pub run: bool,
}

/// Advance the game state by one fixed timestep
pub fn step(state: &mut GameState, input: &StepInput, tuning: &Tuning) {
    if state.is_over() {
        return;
    }

    state.time_ticks += 1;

    if state.player.advance(input, tuning) {
        state.events.push(GameEvent::Jumped);
    }
    // Invulnerability does not save a fall
    if state.player.body.pos.y > state.kill_line() {
        state.kill_player(DeathCause::Fell, tuning);
        if state.is_over() {
            return;
        }
    }

    advance_actors(state, tuning);
    state.grid.animate(tuning.bump_decay);

    collision::resolve_all_tiles(state, tuning);
    collision::resolve_player_contacts(state, tuning);

    let level_width = state.grid.width_px();
    state.camera.follow(&state.player.body, level_width);

    state.prune();
}

/// Timers and kinematics for every non-player entity
fn advance_actors(state: &mut GameState, tuning: &Tuning) {
    let kill_line = state.kill_line();
    let level_width = state.grid.width_px();
    let grid = &state.grid;

    for actor in &mut state.actors {
        if !actor.body.active {
            continue;
        }

        match &mut actor.kind {
            ActorKind::Enemy(enemy) => {
                enemy.advance(&mut actor.body, grid, tuning);
                let gone = actor.body.right() < 0.0 || actor.body.pos.x > level_width;
                if enemy.state == EnemyState::Sliding && gone {
                    log::debug!("Shell {} left the level", actor.id);
                    actor.body.active = false;
                }
            }
            ActorKind::Coin(coin) => coin.advance(),
            ActorKind::Mushroom(mushroom) => mushroom.advance(&mut actor.body, grid, tuning),
        }

        if actor.body.pos.y > kill_line {
            actor.body.active = false;
        }
    }
}

/// One second of level time passed.
///
/// The clock stops at zero and every second spent there costs a life.
pub fn second_elapsed(state: &mut GameState, tuning: &Tuning) {
    if state.is_over() {
        return;
    }

    state.scoreboard.time -= 1;
    if state.scoreboard.time <= 0 {
        state.scoreboard.time = 0;
        state.kill_player(DeathCause::TimeUp, tuning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelLayout, SpawnKind};
    use crate::sim::block::{BlockKind, ItemKind};
    use crate::sim::player::PowerLevel;
    use crate::sim::state::{Actor, RunStatus};
    use glam::Vec2;

    fn run(state: &mut GameState, input: &StepInput, tuning: &Tuning, steps: usize) {
        for _ in 0..steps {
            step(state, input, tuning);
        }
    }

    fn flat(width: i32) -> LevelLayout {
        let mut layout = LevelLayout::new(width, 15);
        layout.ground(13);
        layout
    }

    #[test]
    fn test_player_falls_and_lands() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&LevelLayout::sample(), &tuning);
        run(&mut state, &StepInput::default(), &tuning, 90);
        assert!(state.player.body.grounded);
        assert_eq!(state.player.body.vel.y, 0.0);
        assert_eq!(state.player.body.bottom(), 416.0);
        assert_eq!(state.time_ticks, 90);
    }

    #[test]
    fn test_jump_needs_landing() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&flat(20), &tuning);
        run(&mut state, &StepInput::default(), &tuning, 60);
        state.drain_events();

        let jump = StepInput {
            jump: true,
            ..Default::default()
        };
        step(&mut state, &jump, &tuning);
        assert_eq!(state.drain_events(), vec![GameEvent::Jumped]);
        assert!((state.player.body.vel.y - (-13.4)).abs() < 1e-4);

        // No second jump while airborne
        for _ in 0..20 {
            step(&mut state, &jump, &tuning);
            assert!(!state.drain_events().contains(&GameEvent::Jumped));
        }
        assert!(!state.player.body.grounded);

        run(&mut state, &StepInput::default(), &tuning, 60);
        assert!(state.player.body.grounded);
        state.drain_events();
        step(&mut state, &jump, &tuning);
        assert_eq!(state.drain_events(), vec![GameEvent::Jumped]);
    }

    #[test]
    fn test_walker_removed_thirty_steps_after_stomp() {
        let tuning = Tuning::default();
        let mut layout = flat(20);
        layout.spawn(SpawnKind::Walker, 8, 11);
        let mut state = GameState::new(&layout, &tuning);
        let id = state.actors[0].id;
        {
            let body = &mut state.actors[0].body;
            body.pos.y = 388.0;
            body.grounded = true;
        }
        state.player.body.pos = Vec2::new(255.0, 354.0);
        state.player.body.vel.y = 3.0;

        step(&mut state, &StepInput::default(), &tuning);
        assert!(state.drain_events().contains(&GameEvent::EnemyStomped { id }));
        assert_eq!(state.scoreboard.score, 100);

        run(&mut state, &StepInput::default(), &tuning, 29);
        assert!(state.actor(id).is_some());
        step(&mut state, &StepInput::default(), &tuning);
        assert!(state.actor(id).is_none());
    }

    #[test]
    fn test_kicked_shell_never_reverts_and_stops_at_wall() {
        let tuning = Tuning::default();
        let mut layout = flat(20);
        layout
            .block(BlockKind::Brick, 2, 12)
            .block(BlockKind::Brick, 2, 11)
            .block(BlockKind::Brick, 17, 12)
            .block(BlockKind::Brick, 17, 11)
            .platform(8, 5, 3, BlockKind::Brick)
            .spawn(SpawnKind::Shelled, 5, 11);
        layout.player_spawn = Vec2::new(288.0, 128.0);
        let mut state = GameState::new(&layout, &tuning);
        run(&mut state, &StepInput::default(), &tuning, 30);

        {
            let Actor { body, kind, .. } = &mut state.actors[0];
            if let ActorKind::Enemy(enemy) = kind {
                enemy.stomp(body, 0.0, &tuning);
                enemy.stomp(body, 0.0, &tuning);
            }
        }

        step(&mut state, &StepInput::default(), &tuning);
        assert_eq!(state.actors[0].body.vel.x, tuning.shell_kick_speed);

        run(&mut state, &StepInput::default(), &tuning, 400);
        assert_eq!(state.actors.len(), 1);
        match &state.actors[0].kind {
            ActorKind::Enemy(enemy) => assert_eq!(enemy.state, EnemyState::Sliding),
            other => panic!("expected enemy, got {other:?}"),
        }
        // Halted flush against the right-hand wall
        assert_eq!(state.actors[0].body.vel.x, 0.0);
        assert_eq!(state.actors[0].body.right(), 544.0);
        assert_eq!(state.scoreboard.lives, 3);
    }

    #[test]
    fn test_walker_contact_kills_small_player() {
        let tuning = Tuning::default();
        let mut layout = flat(20);
        layout.spawn(SpawnKind::Walker, 6, 11);
        let mut state = GameState::new(&layout, &tuning);

        for _ in 0..200 {
            step(&mut state, &StepInput::default(), &tuning);
            if state.scoreboard.lives < 3 {
                break;
            }
        }
        assert_eq!(state.scoreboard.lives, 2);
        assert_eq!(state.player.power, PowerLevel::Small);
        assert_eq!(state.player.body.pos, Vec2::new(100.0, 100.0));
        assert_eq!(state.player.invulnerable_ticks, tuning.invulnerable_ticks);
        assert!(state.drain_events().contains(&GameEvent::PlayerDied {
            cause: DeathCause::Enemy
        }));
    }

    #[test]
    fn test_walker_contact_shrinks_big_player() {
        let tuning = Tuning::default();
        let mut layout = flat(20);
        layout.spawn(SpawnKind::Walker, 6, 11);
        let mut state = GameState::new(&layout, &tuning);
        state.player.grow();

        for _ in 0..200 {
            step(&mut state, &StepInput::default(), &tuning);
            if state.player.power == PowerLevel::Small {
                break;
            }
        }
        assert_eq!(state.player.power, PowerLevel::Small);
        assert_eq!(state.player.body.size.y, 32.0);
        assert_eq!(state.scoreboard.lives, 3);
        assert_eq!(state.player.invulnerable_ticks, tuning.invulnerable_ticks);

        // Invulnerable: walking through the walker again costs nothing
        run(&mut state, &StepInput::default(), &tuning, 60);
        assert_eq!(state.scoreboard.lives, 3);
    }

    #[test]
    fn test_falling_out_of_level_costs_life() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&LevelLayout::new(20, 15), &tuning);
        // Invulnerability does not help
        state.player.invulnerable_ticks = 1000;

        for _ in 0..100 {
            step(&mut state, &StepInput::default(), &tuning);
            if state.scoreboard.lives < 3 {
                break;
            }
        }
        assert_eq!(state.scoreboard.lives, 2);
        assert!(state.drain_events().contains(&GameEvent::PlayerDied {
            cause: DeathCause::Fell
        }));
    }

    #[test]
    fn test_countdown_at_zero_costs_a_life_every_second() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&LevelLayout::sample(), &tuning);
        state.scoreboard.time = 2;

        second_elapsed(&mut state, &tuning);
        assert_eq!(state.scoreboard.time, 1);
        assert_eq!(state.scoreboard.lives, 3);

        second_elapsed(&mut state, &tuning);
        assert_eq!(state.scoreboard.lives, 2);
        assert_eq!(state.scoreboard.time, 0);
        assert_eq!(state.status, RunStatus::Playing);

        second_elapsed(&mut state, &tuning);
        assert_eq!(state.scoreboard.lives, 1);
        assert_eq!(state.scoreboard.time, 0);

        second_elapsed(&mut state, &tuning);
        assert_eq!(state.scoreboard.lives, 0);
        assert_eq!(state.status, RunStatus::GameOver);

        let deaths = state
            .drain_events()
            .iter()
            .filter(|e| {
                **e == GameEvent::PlayerDied {
                    cause: DeathCause::TimeUp,
                }
            })
            .count();
        assert_eq!(deaths, 3);

        second_elapsed(&mut state, &tuning);
        assert_eq!(state.scoreboard.time, 0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_game_over_freezes_state() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&LevelLayout::sample(), &tuning);
        state.scoreboard.lives = 1;
        state.kill_player(DeathCause::Fell, &tuning);
        let before = serde_json::to_string(&state).unwrap();

        let input = StepInput {
            right: true,
            jump: true,
            ..Default::default()
        };
        run(&mut state, &input, &tuning, 10);
        second_elapsed(&mut state, &tuning);
        assert_eq!(serde_json::to_string(&state).unwrap(), before);
    }

    #[test]
    fn test_mushroom_rises_out_of_struck_block() {
        let tuning = Tuning::default();
        let mut layout = flat(20);
        layout.question(5, 9, ItemKind::Mushroom);
        let mut state = GameState::new(&layout, &tuning);
        state.player.body.pos = Vec2::new(162.0, 322.0);
        state.player.body.vel.y = -6.0;

        step(&mut state, &StepInput::default(), &tuning);
        assert_eq!(state.actors.len(), 1);
        assert!(
            state
                .grid
                .block_at(170.0, 300.0)
                .is_some_and(|b| b.struck && b.bump_offset > 0.0)
        );

        run(&mut state, &StepInput::default(), &tuning, 40);
        match &state.actors[0].kind {
            ActorKind::Mushroom(m) => assert!(!m.spawning),
            other => panic!("expected mushroom, got {other:?}"),
        }
        // Patrols on top of its own block
        assert_eq!(state.actors[0].body.bottom(), 288.0);
        assert!(state.actors[0].body.grounded);
    }

    #[test]
    fn test_camera_scrolls_with_player() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&flat(100), &tuning);
        let right = StepInput {
            right: true,
            run: true,
            ..Default::default()
        };
        run(&mut state, &right, &tuning, 120);
        assert!(state.camera.x > 0.0);
        assert!((state.camera.x - (state.player.body.pos.x - 1024.0 / 3.0)).abs() < 1e-3);
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let mut a = GameState::new(&LevelLayout::sample(), &tuning);
        let mut b = GameState::new(&LevelLayout::sample(), &tuning);

        for i in 0..600u32 {
            let input = StepInput {
                right: i % 200 < 150,
                left: i % 200 >= 180,
                jump: i % 45 < 20,
                run: i % 3 == 0,
            };
            step(&mut a, &input, &tuning);
            step(&mut b, &input, &tuning);
            if i % 60 == 59 {
                second_elapsed(&mut a, &tuning);
                second_elapsed(&mut b, &tuning);
            }
        }

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
