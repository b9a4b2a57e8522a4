//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, derived per row
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{first_hit, player_hits};
pub use spawn::{Difficulty, maybe_spawn_row};
pub use state::{GamePhase, GameState, Obstacle, PlayerState};
pub use tick::{TickInput, tick};
