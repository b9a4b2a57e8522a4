//! Difficulty curve and obstacle row spawning
//!
//! Rows are planned in world distance rather than time: a new row is due
//! once the previous row has advanced one full gap past the spawn line, so
//! the on-screen spacing stays stable as the world speeds up. Each row's
//! randomness comes from a seed derived from the session seed and the row
//! index, which keeps runs reproducible without carrying live RNG state.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{
    BASE_GAP_Z, EARLY_GAME_SECS, GAP_SHRINK_FACTOR, LANE_COUNT, MAX_ACTIVE_ROWS, MAX_SPEED,
    MIN_GAP_Z, OBSTACLE_SIZES, SPAWN_Z, SPEED_RAMP, START_SPEED,
};
use crate::sim::state::{GameState, Obstacle};

/// Difficulty curve parameters. Speed ramps linearly with elapsed time and
/// the row gap shrinks linearly with speed, floored so a dodge always fits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    /// Speed at t=0 (units/sec)
    pub start_speed: f32,
    /// Speed gained per second of play
    pub ramp_rate: f32,
    /// Upper speed bound
    pub max_speed: f32,
    /// Row gap at speed 0 (world units)
    pub base_gap: f32,
    /// Smallest allowed row gap
    pub min_gap: f32,
    /// Gap units lost per unit of speed
    pub gap_shrink: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            start_speed: START_SPEED,
            ramp_rate: SPEED_RAMP,
            max_speed: MAX_SPEED,
            base_gap: BASE_GAP_Z,
            min_gap: MIN_GAP_Z,
            gap_shrink: GAP_SHRINK_FACTOR,
        }
    }
}

impl Difficulty {
    /// World speed after `elapsed` seconds of play
    pub fn speed_at(&self, elapsed: f32) -> f32 {
        (self.start_speed + elapsed * self.ramp_rate).clamp(self.start_speed, self.max_speed)
    }

    /// Spacing to the next row at the given speed
    pub fn gap_at(&self, speed: f32) -> f32 {
        (self.base_gap - self.gap_shrink * speed).max(self.min_gap)
    }
}

/// Spawn a new row if one is due and the registry has room. Called once per
/// running tick, after obstacles have advanced; emits at most one row.
pub fn maybe_spawn_row(state: &mut GameState) {
    let gap = state.difficulty.gap_at(state.speed);
    if state.distance_since_spawn < gap {
        return;
    }
    // At capacity the row is skipped, not queued; the distance accumulator
    // keeps running so the next free tick spawns immediately.
    if state.active_rows() >= MAX_ACTIVE_ROWS {
        return;
    }
    spawn_row(state);
}

fn spawn_row(state: &mut GameState) {
    let row_seed = (state.rows_spawned as u64)
        .wrapping_mul(2654435761)
        .wrapping_add(state.seed);
    let mut rng = Pcg32::seed_from_u64(row_seed);

    let easing = state.elapsed < EARLY_GAME_SECS;
    let k = blocked_lane_count(&mut rng, easing);
    let lanes = choose_lanes(&mut rng, k);

    let spawned_tick = state.time_ticks;
    for lane in lanes {
        let size = OBSTACLE_SIZES[rng.random_range(0..OBSTACLE_SIZES.len())];
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            lane,
            z: SPAWN_Z,
            size,
            spawned_tick,
        });
    }

    state.rows_spawned += 1;
    state.distance_since_spawn = 0.0;
    state.normalize_order();
}

/// Number of lanes the next row blocks: always 1 during the early-game
/// grace window, then 1 (60%) or 2 (40%). Never all lanes.
pub(crate) fn blocked_lane_count(rng: &mut Pcg32, easing: bool) -> usize {
    if easing {
        return 1;
    }
    if rng.random::<f32>() < 0.6 { 1 } else { 2 }
}

/// Pick `k` distinct lanes by shuffling the full lane set and taking a
/// prefix. `k` is at most LANE_COUNT - 1, so one lane is always open.
pub(crate) fn choose_lanes(rng: &mut Pcg32, k: usize) -> Vec<u8> {
    debug_assert!(k < LANE_COUNT);
    let mut lanes: [u8; LANE_COUNT] = std::array::from_fn(|i| i as u8);
    lanes.shuffle(rng);
    lanes[..k].to_vec()
}
