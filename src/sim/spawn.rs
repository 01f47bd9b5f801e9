//! Randomized spawn scheduling
//!
//! Two independent timers accumulate elapsed time until a rolled threshold
//! fires. Obstacle cadence is the difficulty lever: its interval shrinks as
//! score grows, floored to keep the run playable. Pickup cadence is constant.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{GameState, Obstacle, ObstacleKind, Pickup, PickupKind};
use crate::consts::*;

/// Roll the delay until the next obstacle. Narrows with score.
pub fn roll_obstacle_interval(rng: &mut Pcg32, score: u64) -> f32 {
    let jitter = rng.random::<f32>() * OBSTACLE_SPAWN_JITTER_MS;
    let base = OBSTACLE_SPAWN_BASE_MS - score as f32 * 0.5;
    (jitter + base).max(MIN_OBSTACLE_SPAWN_MS)
}

/// Roll the delay until the next pickup, uniform and score-independent
pub fn roll_item_interval(rng: &mut Pcg32) -> f32 {
    rng.random::<f32>() * (ITEM_SPAWN_MAX_MS - ITEM_SPAWN_MIN_MS) + ITEM_SPAWN_MIN_MS
}

/// Accumulate elapsed time on both timers and fire any spawns that are due
pub fn run_spawners(state: &mut GameState, delta_ms: f32) {
    state.obstacle_timer_ms += delta_ms;
    if state.obstacle_timer_ms >= state.next_obstacle_ms {
        spawn_obstacle(state);
        state.obstacle_timer_ms = 0.0;
        state.next_obstacle_ms = roll_obstacle_interval(&mut state.rng, state.score);
    }

    state.item_timer_ms += delta_ms;
    if state.item_timer_ms >= state.next_item_ms {
        spawn_pickup(state);
        state.item_timer_ms = 0.0;
        state.next_item_ms = roll_item_interval(&mut state.rng);
    }
}

/// Spawn a random-category obstacle at the right edge of the world
pub fn spawn_obstacle(state: &mut GameState) {
    let id = state.next_entity_id();
    let kind = ObstacleKind::sample(&mut state.rng);
    let start_x = state.viewport.width;
    state.obstacles.push(Obstacle::new(id, kind, start_x));
}

/// Spawn a random-category pickup at the right edge of the world
pub fn spawn_pickup(state: &mut GameState) {
    let id = state.next_entity_id();
    let kind = PickupKind::sample(&mut state.rng);
    let start_x = state.viewport.width;
    state.pickups.push(Pickup::new(id, kind, start_x));
}
