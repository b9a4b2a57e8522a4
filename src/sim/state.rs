//! Game state and core simulation types
//!
//! Everything a run consists of lives here: the phase machine, the player,
//! the obstacle registry, and the per-session counters. All randomness is
//! derived from the session seed so a run is fully reproducible.

use glam::Vec3;

use crate::consts::{CENTER_LANE, LANE_COUNT, START_SPEED};
use crate::sim::spawn::Difficulty;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start screen; the world is idle
    Menu,
    /// Active gameplay
    Running,
    /// Player hit an obstacle; world is frozen until restart
    GameOver,
}

/// A single box-shaped obstacle occupying one lane
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Unique per-session id, allocated in spawn order
    pub id: u32,
    /// Lane index in [0, LANE_COUNT)
    pub lane: u8,
    /// Forward coordinate; advances toward positive z each tick
    pub z: f32,
    /// Box extents (x, y, z)
    pub size: Vec3,
    /// Tick the obstacle's row spawned on; all members of a row share it
    pub spawned_tick: u64,
}

/// The player avatar. Position is a lane index; the world moves, not the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    pub lane: u8,
    pub alive: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            lane: CENTER_LANE,
            alive: true,
        }
    }
}

impl PlayerState {
    /// Step one lane toward negative x; clamps at the edge (no wraparound)
    pub fn move_left(&mut self) {
        if self.lane > 0 {
            self.lane -= 1;
        }
    }

    /// Step one lane toward positive x; clamps at the edge
    pub fn move_right(&mut self) {
        if usize::from(self.lane) + 1 < LANE_COUNT {
            self.lane += 1;
        }
    }
}

/// Complete simulation state for one session (deterministic)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed; every row's randomness is derived from it
    pub seed: u64,
    /// Difficulty curve parameters for this session
    pub difficulty: Difficulty,
    /// Current phase
    pub phase: GamePhase,
    /// Seconds of play time accumulated while running
    pub elapsed: f32,
    /// Current world speed (units/sec), derived from `elapsed`
    pub speed: f32,
    /// Score; accrues continuously while running
    pub score: f32,
    /// Player avatar
    pub player: PlayerState,
    /// Live obstacles (sorted by id for determinism)
    pub obstacles: Vec<Obstacle>,
    /// World distance travelled since the last row spawned
    pub distance_since_spawn: f32,
    /// Rows spawned so far; indexes the per-row seed derivation
    pub rows_spawned: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Set once the final score has been handed out for submission
    pub score_submitted: bool,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh session in the menu phase with default difficulty
    pub fn new(seed: u64) -> Self {
        Self::new_with_difficulty(seed, Difficulty::default())
    }

    /// Create a fresh session with explicit difficulty parameters
    pub fn new_with_difficulty(seed: u64, difficulty: Difficulty) -> Self {
        Self {
            seed,
            difficulty,
            phase: GamePhase::Menu,
            elapsed: 0.0,
            speed: difficulty.start_speed,
            score: 0.0,
            player: PlayerState::default(),
            obstacles: Vec::new(),
            distance_since_spawn: 0.0,
            rows_spawned: 0,
            time_ticks: 0,
            score_submitted: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Ensure obstacles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.id);
    }

    /// Number of live rows. Row members share a `spawned_tick` and sit
    /// contiguously in the id-sorted registry.
    pub fn active_rows(&self) -> usize {
        let mut rows = 0;
        let mut last_tick = None;
        for o in &self.obstacles {
            if last_tick != Some(o.spawned_tick) {
                rows += 1;
                last_tick = Some(o.spawned_tick);
            }
        }
        rows
    }

    /// One-shot: the final score to report after a game over. Returns `Some`
    /// exactly once per run; later calls (and calls in any other phase)
    /// return `None`.
    pub fn take_final_score(&mut self) -> Option<u64> {
        if self.phase == GamePhase::GameOver && !self.score_submitted {
            self.score_submitted = true;
            Some(self.score as u64)
        } else {
            None
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::OBSTACLE_SIZES;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.player.lane, CENTER_LANE);
        assert!(state.player.alive);
        assert_eq!(state.speed, START_SPEED);
        assert_eq!(state.score, 0.0);
        assert!(state.obstacles.is_empty());
        assert!(!state.score_submitted);
    }

    #[test]
    fn test_player_lane_clamps() {
        let mut player = PlayerState::default();
        player.move_left();
        assert_eq!(player.lane, 0);
        player.move_left();
        assert_eq!(player.lane, 0);
        player.move_right();
        player.move_right();
        assert_eq!(player.lane, 2);
        player.move_right();
        assert_eq!(player.lane, 2);
    }

    #[test]
    fn test_entity_ids_monotonic() {
        let mut state = GameState::new(1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_active_rows_counts_spawn_groups() {
        let mut state = GameState::new(7);
        for (tick, lane) in [(3u64, 0u8), (3, 2), (9, 1)] {
            let id = state.next_entity_id();
            state.obstacles.push(Obstacle {
                id,
                lane,
                z: -10.0,
                size: OBSTACLE_SIZES[0],
                spawned_tick: tick,
            });
        }
        assert_eq!(state.active_rows(), 2);
    }

    #[test]
    fn test_take_final_score_requires_game_over() {
        let mut state = GameState::new(3);
        assert_eq!(state.take_final_score(), None);
        state.phase = GamePhase::Running;
        assert_eq!(state.take_final_score(), None);
        state.phase = GamePhase::GameOver;
        state.score = 123.9;
        assert_eq!(state.take_final_score(), Some(123));
        assert_eq!(state.take_final_score(), None);
    }
}
