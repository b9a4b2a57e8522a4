//! Lane Dash - a 3-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, session state)
//! - `highscores`: Local best score and display name persistence
//! - `net`: Leaderboard HTTP client (fire-and-forget)

pub mod highscores;
pub mod net;
pub mod sim;

pub use sim::{Difficulty, GamePhase, GameState, TickInput, tick};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Number of lanes (player and obstacles are always in [0, LANE_COUNT))
    pub const LANE_COUNT: usize = 3;
    /// Lateral distance between adjacent lane centers
    pub const LANE_WIDTH: f32 = 1.6;
    /// Index of the lane the player starts in
    pub const CENTER_LANE: u8 = 1;

    /// Player capsule dimensions
    pub const PLAYER_RADIUS: f32 = 0.42;
    pub const PLAYER_HEIGHT: f32 = 1.25;
    /// Player is fixed at this height and depth; only the lane changes
    pub const PLAYER_Y: f32 = 0.95;
    pub const PLAYER_Z: f32 = 0.0;
    /// Visual lane-change speed (presentation only; the lane index is authoritative)
    pub const LANE_CHANGE_SPEED: f32 = 8.0;

    /// World boundaries: obstacles spawn far ahead (negative z) and advance
    /// toward positive z, despawning once they pass behind the camera
    pub const SPAWN_Z: f32 = -55.0;
    pub const DESPAWN_Z: f32 = 18.0;

    /// Obstacle size catalog (x, y, z extents); half-widths stay well under
    /// half a lane so rows never bleed into neighboring lanes
    pub const OBSTACLE_SIZES: [Vec3; 3] = [
        Vec3::new(0.8, 1.1, 1.1),
        Vec3::new(1.0, 1.0, 1.2),
        Vec3::new(0.9, 1.4, 1.2),
    ];

    /// Difficulty defaults
    pub const START_SPEED: f32 = 12.0;
    pub const MAX_SPEED: f32 = f32::INFINITY;
    pub const SPEED_RAMP: f32 = 0.25;

    /// Row spacing is expressed in world distance, not time, so the visual
    /// gap between rows stays stable as speed ramps up
    pub const BASE_GAP_Z: f32 = 12.0;
    pub const MIN_GAP_Z: f32 = 6.0;
    pub const GAP_SHRINK_FACTOR: f32 = 0.1;

    /// Maximum concurrently live rows; spawning skips (not queues) at the cap
    pub const MAX_ACTIVE_ROWS: usize = 5;
    /// Grace window: rows block a single lane for this many seconds
    pub const EARLY_GAME_SECS: f32 = 10.0;

    /// Score accrues at `SCORE_RATE * speed` per second
    pub const SCORE_RATE: f32 = 10.0;
}

/// World x-coordinate of a lane center
#[inline]
pub fn lane_x(lane: u8) -> f32 {
    (lane as f32 - (consts::LANE_COUNT as f32 - 1.0) / 2.0) * consts::LANE_WIDTH
}

/// World position of the player when standing in `lane`
#[inline]
pub fn player_position(lane: u8) -> Vec3 {
    Vec3::new(lane_x(lane), consts::PLAYER_Y, consts::PLAYER_Z)
}
