//! Player/obstacle collision checks
//!
//! Collision is a lane-slot test, not a physics solve: the player's logical
//! lane index is authoritative, and an obstacle hits when it shares that
//! lane and its box overlaps the player's fixed z-window. The lateral check
//! is kept in world units so the lane geometry (lane width vs obstacle
//! width plus player radius) is what actually guarantees that adjacent
//! lanes never collide.

use crate::consts::{PLAYER_RADIUS, PLAYER_Z};
use crate::lane_x;
use crate::sim::state::{Obstacle, PlayerState};

/// True when the obstacle's box overlaps the player's x-extent
#[inline]
pub fn lateral_overlap(player_x: f32, obstacle: &Obstacle) -> bool {
    (lane_x(obstacle.lane) - player_x).abs() < obstacle.size.x / 2.0 + PLAYER_RADIUS
}

/// True when the obstacle's box overlaps the player's z-extent
#[inline]
pub fn forward_overlap(obstacle: &Obstacle) -> bool {
    (obstacle.z - PLAYER_Z).abs() < obstacle.size.z / 2.0 + PLAYER_RADIUS
}

/// Full overlap test against the player's current lane
pub fn player_hits(player: &PlayerState, obstacle: &Obstacle) -> bool {
    lateral_overlap(lane_x(player.lane), obstacle) && forward_overlap(obstacle)
}

/// First obstacle overlapping the player, in id (spawn) order
pub fn first_hit<'a>(player: &PlayerState, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    obstacles.iter().find(|o| player_hits(player, o))
}
