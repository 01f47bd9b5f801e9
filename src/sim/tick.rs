//! Per-frame simulation update
//!
//! One `tick` advances the whole session by a single frame. Ordering within a
//! tick is fixed: multiplier and grace countdown, then player physics, then
//! spawn checks, then per-entity movement, then collision resolution —
//! collisions always see this tick's post-movement positions.

use super::spawn;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Derive the physics time scale from an elapsed frame duration, clamped so a
/// long hitch (tab backgrounding) can't produce a multi-second physics step.
#[inline]
pub fn time_scale(delta_ms: f32) -> f32 {
    (delta_ms / REFERENCE_FRAME_MS).min(MAX_TIME_SCALE)
}

/// Advance the session by one frame of `delta_ms` elapsed wall time.
/// No-op unless the session is running; pausing takes effect at this
/// boundary. Side effects land in the state's event buffer.
pub fn tick(state: &mut GameState, delta_ms: f32) {
    if state.phase != GamePhase::Running {
        return;
    }
    let ts = time_scale(delta_ms);

    state.update_multiplier(delta_ms);

    // Grace window counts down on the same clock as everything else; expiry
    // re-enables damage
    if state.invincible && state.player.tick_grace(delta_ms) {
        state.invincible = false;
        state.events.push(GameEvent::GraceEnded);
    }

    state.player.update(ts);

    spawn::run_spawners(state, delta_ms);

    let speed = state.speed;
    for obstacle in &mut state.obstacles {
        obstacle.advance(speed, ts);
    }
    for pickup in &mut state.pickups {
        pickup.advance(speed, ts);
    }

    resolve_collisions(state);
}

/// Test every live entity against the player hitbox and retire spent ones.
/// The player hitbox is computed once; invincibility is re-read per entity so
/// a hit resolved earlier in the pass shields the rest of it.
fn resolve_collisions(state: &mut GameState) {
    let player_box = state.player.hitbox(&state.viewport);

    let mut i = 0;
    while i < state.obstacles.len() {
        let overlap = player_box.overlaps(&state.obstacles[i].hitbox(&state.viewport));
        if overlap && !state.invincible {
            state.obstacles[i].set_hit();
            let kind = state.obstacles[i].kind;
            state.events.push(GameEvent::ObstacleHit { kind });
            state.apply_damage();
        }
        i += 1;
    }

    // Surviving an obstacle's full pass is what scores: every scroll-off
    // awards a point, whether or not it was hit on the way
    let mut survived = 0u32;
    state.obstacles.retain(|o| {
        if o.marked_for_removal {
            survived += 1;
            false
        } else {
            true
        }
    });
    for _ in 0..survived {
        state.award(1);
    }

    let mut i = 0;
    while i < state.pickups.len() {
        let overlap = player_box.overlaps(&state.pickups[i].hitbox(&state.viewport));
        if overlap {
            let kind = state.pickups[i].kind;
            // Pickups are consumed on contact, no damaged-art grace period
            state.pickups.remove(i);
            if kind.is_bad() {
                if !state.invincible {
                    state.events.push(GameEvent::Slipped);
                    state.apply_damage();
                }
                // A bad pickup grabbed during the grace window is swallowed
                // with no effect
            } else {
                let awarded = state.award(kind.points());
                state.events.push(GameEvent::Collected { kind, awarded });
            }
            continue;
        }
        if state.pickups[i].marked_for_removal {
            state.pickups.remove(i);
            continue;
        }
        i += 1;
    }
}
