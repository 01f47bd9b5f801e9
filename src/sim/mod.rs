//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-paced updates scaled by a clamped time factor
//! - Seeded RNG only
//! - No rendering, audio, or platform dependencies (side effects are
//!   described by `GameEvent`s drained by the shell)

pub mod hitbox;
pub mod spawn;
pub mod state;
pub mod tick;

pub use hitbox::Hitbox;
pub use state::{
    GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Pickup, PickupKind, Player, Viewport,
};
pub use tick::{tick, time_scale};
