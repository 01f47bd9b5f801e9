//! Granny Dash - a side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (jump physics, spawning, collisions, scoring)
//! - `audio`: Sound effect and music routing with persisted mute toggles
//! - `settings`: User preference persistence
//! - `highscore`: Best-score tracking in LocalStorage

pub mod audio;
pub mod highscore;
pub mod settings;
pub mod sim;

pub use highscore::HighScore;
pub use settings::AudioSettings;

/// Game configuration constants
pub mod consts {
    /// Reference frame duration (60 Hz) used to derive the physics time scale
    pub const REFERENCE_FRAME_MS: f32 = 16.67;
    /// Time-scale clamp so a frame hitch (tab background) can't explode a physics step
    pub const MAX_TIME_SCALE: f32 = 4.0;

    /// Vertical units are percent of viewport height, measured bottom-up.
    /// Gravity per reference frame
    pub const GRAVITY: f32 = 0.065;
    /// First-jump launch velocity
    pub const JUMP_VELOCITY: f32 = 1.7;
    /// Second jump is shorter
    pub const DOUBLE_JUMP_MULTIPLIER: f32 = 0.5;
    /// Ground baseline (sidewalk height in the background art)
    pub const GROUND_Y_PCT: f32 = 22.0;

    /// World scroll speed at session start (px per reference frame)
    pub const INITIAL_SPEED: f32 = 7.0;
    /// Speed added at each score threshold crossing
    pub const SPEED_INCREMENT: f32 = 0.3;
    /// Score multiple that triggers a speed bump
    pub const SCORE_SPEED_THRESHOLD: u64 = 25;

    pub const MAX_LIVES: u8 = 5;
    /// Post-damage grace window
    pub const INVINCIBILITY_MS: f32 = 2000.0;
    /// Blink half-period while invincible
    pub const BLINK_PERIOD_MS: f32 = 100.0;

    /// Obstacle spawn cadence: interval shrinks with score, floored here
    pub const MIN_OBSTACLE_SPAWN_MS: f32 = 850.0;
    pub const OBSTACLE_SPAWN_BASE_MS: f32 = 1300.0;
    pub const OBSTACLE_SPAWN_JITTER_MS: f32 = 1000.0;
    /// Pickup cadence stays constant so reward pacing is predictable
    pub const ITEM_SPAWN_MIN_MS: f32 = 1500.0;
    pub const ITEM_SPAWN_MAX_MS: f32 = 2000.0;

    /// Entities are retired once fully past the left edge
    pub const OFFSCREEN_X: f32 = -100.0;
    /// Left/right hitbox inset to avoid edge-pixel collisions
    pub const HITBOX_INSET: f32 = 5.0;

    /// Player placement and hitbox trim
    pub const PLAYER_X: f32 = 60.0;
    pub const PLAYER_SPRITE_W: f32 = 150.0;
    pub const PLAYER_SPRITE_H: f32 = 180.0;
    pub const PLAYER_HITBOX_W: f32 = 54.0;
    pub const PLAYER_FOOT_INSET: f32 = 8.0;
    pub const PLAYER_HEAD_INSET: f32 = 25.0;

    /// Survival-time score multiplier: +0.5 every 10 s, capped at 5x
    pub const MULTIPLIER_STEP_MS: f32 = 10_000.0;
    pub const MULTIPLIER_STEP: f32 = 0.5;
    pub const MULTIPLIER_MAX: f32 = 5.0;

    pub const BGM_VOLUME: f64 = 0.5;
    pub const SFX_VOLUME: f64 = 0.8;
}
