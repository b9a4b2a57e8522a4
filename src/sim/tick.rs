//! Per-frame simulation tick
//!
//! Advances one session by a caller-supplied dt. The pipeline order while
//! running is fixed: input, clock, difficulty, score, movement, pruning,
//! spawning, collision. There is no sub-stepping; an oversized dt simply
//! moves the world further, and a fast obstacle may tunnel past the player.

use crate::consts::{DESPAWN_Z, SCORE_RATE};
use crate::sim::state::{GamePhase, GameState};
use crate::sim::{collision, spawn};

/// Input commands for a single tick (all one-shot, cleared by the caller)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Leave the menu and begin a run
    pub start: bool,
    /// Step one lane toward negative x
    pub move_left: bool,
    /// Step one lane toward positive x
    pub move_right: bool,
    /// From game over, reset into a fresh run
    pub restart: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.phase = GamePhase::Running;
            }
            return;
        }
        GamePhase::GameOver => {
            if input.restart {
                restart(state);
            }
            return;
        }
        GamePhase::Running => {}
    }

    state.time_ticks += 1;

    // Lane commands; left applies before right, both clamp at the edges
    if input.move_left {
        state.player.move_left();
    }
    if input.move_right {
        state.player.move_right();
    }

    state.elapsed += dt;
    state.speed = state.difficulty.speed_at(state.elapsed);
    state.score += dt * SCORE_RATE * state.speed;

    // The world moves toward the player; obstacles past the camera are gone
    let advance = state.speed * dt;
    for obstacle in &mut state.obstacles {
        obstacle.z += advance;
    }
    state.obstacles.retain(|o| o.z <= DESPAWN_Z);

    state.distance_since_spawn += advance;
    spawn::maybe_spawn_row(state);

    if collision::first_hit(&state.player, &state.obstacles).is_some() {
        state.player.alive = false;
        state.phase = GamePhase::GameOver;
    }
}

/// Hard reset into a fresh running session. The new seed is derived from
/// the old one so back-to-back runs see different obstacle scripts while a
/// whole session replay stays reproducible.
fn restart(state: &mut GameState) {
    let reseed = state
        .seed
        .wrapping_mul(2654435761)
        .wrapping_add(state.time_ticks);
    let difficulty = state.difficulty;
    *state = GameState::new_with_difficulty(reseed, difficulty);
    state.phase = GamePhase::Running;
}
