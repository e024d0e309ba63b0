//! Collision detection and response
//!
//! Tiles: each overlapping block is resolved along the side of shallowest
//! penetration, one block at a time in grid order, so a later block can undo
//! an earlier correction within the same step. Faces shared with a solid
//! neighbour are internal and never chosen, which keeps actors from snagging
//! on the seams of a flat floor.
//!
//! Entities: the player stomps, gets hurt by, or collects whatever it touches.

use glam::Vec2;

use super::block::{Block, BumpOutcome, ItemKind};
use super::body::{Aabb, Body};
use super::enemy::Stomp;
use super::grid::TileGrid;
use super::state::{ActorKind, GameEvent, GameState};
use crate::consts::TILE_SIZE;
use crate::tuning::Tuning;

/// Side of a block the mover made contact with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Landed on it
    Top,
    /// Hit it from below
    Bottom,
    /// Ran into its left face
    Left,
    /// Ran into its right face
    Right,
}

/// Penetration depth of a mover into a block, measured from each block face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlaps {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Overlaps {
    pub fn between(mover: &Aabb, block: &Aabb) -> Self {
        Self {
            left: mover.right() - block.left(),
            right: block.right() - mover.left(),
            top: mover.bottom() - block.top(),
            bottom: block.bottom() - mover.top(),
        }
    }

    /// Pick the contact side among exposed faces.
    ///
    /// Top only counts while descending and bottom only while rising; if the
    /// shallowest face is one of those and the mover is going the other way,
    /// there is no contact.
    pub fn contact_side(&self, faces: Faces, vel_y: f32) -> Option<Side> {
        let min = [
            (faces.top, self.top),
            (faces.bottom, self.bottom),
            (faces.left, self.left),
            (faces.right, self.right),
        ]
        .iter()
        .filter(|(exposed, _)| *exposed)
        .map(|(_, depth)| *depth)
        .fold(f32::INFINITY, f32::min);

        if faces.top && self.top == min && vel_y > 0.0 {
            Some(Side::Top)
        } else if faces.bottom && self.bottom == min && vel_y < 0.0 {
            Some(Side::Bottom)
        } else if faces.left && self.left == min {
            Some(Side::Left)
        } else if faces.right && self.right == min {
            Some(Side::Right)
        } else {
            None
        }
    }
}

/// Which faces of a block are exposed (not shared with a solid neighbour)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Faces {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Faces {
    pub const ALL: Faces = Faces {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };

    pub fn of(block: &Block, grid: &TileGrid) -> Self {
        let (x, y) = (block.tile_x, block.tile_y);
        Self {
            top: !grid.is_solid_cell(x, y - 1),
            bottom: !grid.is_solid_cell(x, y + 1),
            left: !grid.is_solid_cell(x - 1, y),
            right: !grid.is_solid_cell(x + 1, y),
        }
    }
}

/// A resolved block contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileContact {
    /// Block index in the grid
    pub block: usize,
    pub side: Side,
}

/// Push a body out of every solid block it overlaps.
///
/// `lifted` collides against bumped block positions (the player sees blocks
/// where they are drawn). Side contacts stop horizontal motion for every
/// body. Clears and recomputes `grounded`.
pub fn resolve_tiles(body: &mut Body, grid: &TileGrid, lifted: bool) -> Vec<TileContact> {
    body.grounded = false;
    let mut contacts = Vec::new();

    // One tile of margin covers anything a correction can push the body into
    let area = body.aabb().expanded(TILE_SIZE);
    for idx in grid.candidates(&area) {
        let block = grid.block(idx);
        let block_box = if lifted {
            block.bumped_aabb()
        } else {
            block.aabb()
        };

        let mover = body.aabb();
        if !mover.overlaps(&block_box) {
            continue;
        }

        let overlaps = Overlaps::between(&mover, &block_box);
        let Some(side) = overlaps.contact_side(Faces::of(block, grid), body.vel.y) else {
            continue;
        };

        match side {
            Side::Top => {
                body.pos.y = block_box.top() - body.size.y;
                body.vel.y = 0.0;
                body.grounded = true;
            }
            Side::Bottom => {
                body.pos.y = block_box.bottom();
                body.vel.y = 0.0;
            }
            Side::Left => {
                body.pos.x = block_box.left() - body.size.x;
                body.vel.x = 0.0;
            }
            Side::Right => {
                body.pos.x = block_box.right();
                body.vel.x = 0.0;
            }
        }
        contacts.push(TileContact { block: idx, side });
    }

    contacts
}

/// Entity vs tile pass for the player and every physical actor
pub fn resolve_all_tiles(state: &mut GameState, tuning: &Tuning) {
    let contacts = resolve_tiles(&mut state.player.body, &state.grid, true);
    for contact in contacts {
        match contact.side {
            Side::Top => state.player.land(),
            Side::Bottom => bump_block(state, contact.block, tuning),
            Side::Left | Side::Right => {}
        }
    }

    for actor in &mut state.actors {
        if actor.body.active && actor.is_physical() {
            resolve_tiles(&mut actor.body, &state.grid, false);
        }
    }
}

/// The player struck a block from below
fn bump_block(state: &mut GameState, idx: usize, tuning: &Tuning) {
    let power = state.player.power;
    let block = state.grid.block_mut(idx);
    let outcome = block.bump(power, tuning);
    let tile = (block.tile_x, block.tile_y);
    let pos = block.pos();

    match outcome {
        BumpOutcome::Released(item) => {
            state.scoreboard.score += tuning.score_block;
            log::debug!("Question block {:?} released {:?}", tile, item);
            match item {
                Some(ItemKind::Coin) => {
                    // Pops out above the block and is counted at once
                    state.collect_coin(pos + Vec2::new(4.0, -TILE_SIZE), tuning);
                }
                Some(ItemKind::Mushroom) => {
                    state.spawn_mushroom(pos, tuning);
                }
                None => {}
            }
            if let Some(item) = item {
                state.events.push(GameEvent::ItemReleased { tile, item });
            }
            state.events.push(GameEvent::BlockBumped { tile });
        }
        BumpOutcome::Shattered => {
            state.scoreboard.score += tuning.score_block;
            log::debug!("Brick {:?} shattered", tile);
            state.events.push(GameEvent::BlockShattered { tile });
        }
        BumpOutcome::Thud => {
            state.events.push(GameEvent::BlockBumped { tile });
        }
    }
}

/// What touching an actor did, applied once the actor borrow ends
enum Contact {
    Stomped { id: u32, stomp: Stomp },
    Hurt,
    Coin(Vec2),
    PowerUp,
}

/// Player vs enemies and collectibles
pub fn resolve_player_contacts(state: &mut GameState, tuning: &Tuning) {
    for i in 0..state.actors.len() {
        if state.is_over() {
            break;
        }

        let contact = {
            let player = &mut state.player;
            let actor = &mut state.actors[i];
            if !actor.body.active || !player.body.overlaps(&actor.body) {
                continue;
            }

            match &mut actor.kind {
                ActorKind::Enemy(enemy) => {
                    let descending = player.body.vel.y > 0.0;
                    let above_mid =
                        player.body.bottom() - tuning.stomp_tolerance < actor.body.mid_y();
                    if descending && above_mid {
                        let stomp = enemy.stomp(&mut actor.body, player.body.pos.x, tuning);
                        player.body.vel.y = tuning.stomp_bounce;
                        Some(Contact::Stomped {
                            id: actor.id,
                            stomp,
                        })
                    } else if !enemy.is_harmless() {
                        Some(Contact::Hurt)
                    } else {
                        None
                    }
                }
                ActorKind::Coin(coin) => coin
                    .collect(&mut actor.body)
                    .then(|| Contact::Coin(actor.body.pos)),
                ActorKind::Mushroom(mushroom) => {
                    mushroom.collect(&mut actor.body).then_some(Contact::PowerUp)
                }
            }
        };

        match contact {
            Some(Contact::Stomped { id, stomp }) => match stomp {
                Stomp::Squashed | Stomp::Shelled => {
                    state.scoreboard.score += tuning.score_stomp;
                    log::debug!("Enemy {} stomped ({:?})", id, stomp);
                    state.events.push(GameEvent::EnemyStomped { id });
                }
                Stomp::Kicked => {
                    log::debug!("Shell {} kicked", id);
                    state.events.push(GameEvent::ShellKicked { id });
                }
                Stomp::NoEffect => {}
            },
            Some(Contact::Hurt) => state.hurt_player(tuning),
            Some(Contact::Coin(at)) => state.collect_coin(at, tuning),
            Some(Contact::PowerUp) => {
                if state.player.grow() {
                    state.scoreboard.score += tuning.score_power_up;
                    log::debug!("Player powered up");
                    state.events.push(GameEvent::PoweredUp);
                }
            }
            None => {}
        }
    }
}
