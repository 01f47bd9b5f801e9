//! Game state and core simulation types
//!
//! The session aggregate (`GameState`) exclusively owns the player and the
//! live entity collections. Entities never reference the session or each
//! other; only the collision pass in `tick` cross-references them.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::hitbox::Hitbox;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No session yet (or a finished one was reset)
    Idle,
    /// Active gameplay
    Running,
    /// Session suspended, state preserved
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

/// Visible world dimensions in pixels. Entities spawn at `width` and scroll
/// left; vertical percent positions are resolved against `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert a bottom-up percent position to pixels
    #[inline]
    pub fn pct_to_px(&self, pct: f32) -> f32 {
        pct / 100.0 * self.height
    }
}

/// Side effects produced by the simulation, drained by the shell each frame
/// and mapped to audio cues, haptics, and DOM effects. The simulation never
/// waits on any of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A jump request was accepted (`count` is 1 or 2)
    Jumped { count: u8 },
    /// Player collided with an obstacle while vulnerable
    ObstacleHit { kind: ObstacleKind },
    /// Player stepped on a bad pickup while vulnerable
    Slipped,
    /// A good pickup was collected; `awarded` includes the multiplier
    Collected { kind: PickupKind, awarded: u64 },
    /// Score crossed a threshold and the world sped up
    SpeedIncreased { speed: f32 },
    /// Post-damage grace window opened
    GraceStarted,
    /// Grace window expired, damage is possible again
    GraceEnded,
    /// Lives reached zero; emitted exactly once per session
    GameOver { score: u64 },
}

/// The player character: vertical jump physics plus an invincibility countdown
#[derive(Debug, Clone)]
pub struct Player {
    /// Height above the viewport bottom, percent. Never below `GROUND_Y_PCT`.
    pub y: f32,
    /// Vertical velocity, percent per reference frame
    pub velocity: f32,
    /// 0 = grounded, 1 = first jump, 2 = double jump
    pub jump_count: u8,
    pub airborne: bool,
    /// Remaining invincibility grace, decremented by the tick clock
    pub grace_ms_left: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            y: GROUND_Y_PCT,
            velocity: 0.0,
            jump_count: 0,
            airborne: false,
            grace_ms_left: 0.0,
        }
    }

    /// Request a jump. Returns false when the double-jump limit is reached;
    /// rejected requests leave position and velocity untouched.
    pub fn jump(&mut self) -> bool {
        if !self.airborne {
            self.airborne = true;
            self.jump_count = 1;
            self.velocity = JUMP_VELOCITY;
            true
        } else if self.jump_count < 2 {
            self.jump_count = 2;
            self.velocity = JUMP_VELOCITY * DOUBLE_JUMP_MULTIPLIER;
            true
        } else {
            false
        }
    }

    /// Integrate gravity for one tick
    pub fn update(&mut self, time_scale: f32) {
        if !self.airborne && self.y == GROUND_Y_PCT {
            return;
        }

        self.velocity -= GRAVITY * time_scale;
        self.y += self.velocity * time_scale;

        if self.y <= GROUND_Y_PCT {
            self.y = GROUND_Y_PCT;
            self.velocity = 0.0;
            self.jump_count = 0;
            self.airborne = false;
        }
    }

    /// Open the grace window (does not touch the jump state machine)
    pub fn begin_grace(&mut self, duration_ms: f32) {
        self.grace_ms_left = duration_ms;
    }

    /// Count down the grace window; returns true on the tick it expires
    pub fn tick_grace(&mut self, delta_ms: f32) -> bool {
        if self.grace_ms_left <= 0.0 {
            return false;
        }
        self.grace_ms_left -= delta_ms;
        if self.grace_ms_left <= 0.0 {
            self.grace_ms_left = 0.0;
            return true;
        }
        false
    }

    /// Blink visual while invincible: dim on alternating 100 ms windows
    pub fn blink_dimmed(&self) -> bool {
        self.grace_ms_left > 0.0 && ((self.grace_ms_left / BLINK_PERIOD_MS) as u32) % 2 == 1
    }

    /// Hitbox trimmed well inside the sprite (narrow body, foot/head insets)
    pub fn hitbox(&self, viewport: &Viewport) -> Hitbox {
        let center = PLAYER_X + PLAYER_SPRITE_W / 2.0;
        let foot = viewport.pct_to_px(self.y);
        Hitbox::new(
            center - PLAYER_HITBOX_W / 2.0,
            center + PLAYER_HITBOX_W / 2.0,
            foot + PLAYER_FOOT_INSET,
            foot + PLAYER_SPRITE_H - PLAYER_HEAD_INSET,
        )
    }
}

/// Obstacle categories with fixed dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Pothole,
    Rock,
    Hydrant,
    Cat,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Pothole,
        ObstacleKind::Rock,
        ObstacleKind::Hydrant,
        ObstacleKind::Cat,
    ];

    pub fn sample(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn width(&self) -> f32 {
        match self {
            ObstacleKind::Pothole => 50.0,
            ObstacleKind::Rock => 40.0,
            ObstacleKind::Hydrant => 70.0,
            ObstacleKind::Cat => 50.0,
        }
    }

    pub fn height(&self) -> f32 {
        match self {
            ObstacleKind::Pothole => 20.0,
            ObstacleKind::Rock => 30.0,
            ObstacleKind::Hydrant => 90.0,
            ObstacleKind::Cat => 40.0,
        }
    }

    /// Only the cat has startled-variant art after a collision
    pub fn has_hit_variant(&self) -> bool {
        matches!(self, ObstacleKind::Cat)
    }
}

/// A ground obstacle scrolling leftward at world speed
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: f32,
    /// Damaged-art flag; the entity still scrolls off naturally so the
    /// variant stays visible
    pub hit: bool,
    pub marked_for_removal: bool,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, start_x: f32) -> Self {
        Self {
            id,
            kind,
            x: start_x,
            hit: false,
            marked_for_removal: false,
        }
    }

    pub fn advance(&mut self, speed: f32, time_scale: f32) {
        self.x -= speed * time_scale;
        if self.x < OFFSCREEN_X {
            self.marked_for_removal = true;
        }
    }

    pub fn set_hit(&mut self) {
        if self.kind.has_hit_variant() {
            self.hit = true;
        }
    }

    pub fn hitbox(&self, viewport: &Viewport) -> Hitbox {
        let ground = viewport.pct_to_px(GROUND_Y_PCT);
        Hitbox::new(
            self.x + HITBOX_INSET,
            self.x + self.kind.width() - HITBOX_INSET,
            ground,
            ground + self.kind.height(),
        )
    }
}

/// Pickup categories: point value, vertical band, and good/bad split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Apple,
    Orange,
    Cherry,
    Banana,
}

impl PickupKind {
    pub const ALL: [PickupKind; 4] = [
        PickupKind::Apple,
        PickupKind::Orange,
        PickupKind::Cherry,
        PickupKind::Banana,
    ];

    pub fn sample(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn points(&self) -> u32 {
        match self {
            PickupKind::Apple | PickupKind::Orange => 10,
            PickupKind::Cherry => 15,
            PickupKind::Banana => 0,
        }
    }

    /// Bad pickups route to the damage path instead of awarding points
    pub fn is_bad(&self) -> bool {
        matches!(self, PickupKind::Banana)
    }

    /// Fixed height band, percent above the viewport bottom. The banana sits
    /// at ground level so it catches a grounded run.
    pub fn band_pct(&self) -> f32 {
        match self {
            PickupKind::Apple => 47.0,
            PickupKind::Orange => 52.0,
            PickupKind::Cherry => 57.0,
            PickupKind::Banana => GROUND_Y_PCT,
        }
    }

    pub fn width(&self) -> f32 {
        match self {
            PickupKind::Banana => 50.0,
            _ => 30.0,
        }
    }

    pub fn height(&self) -> f32 {
        30.0
    }
}

/// A collectible (or hazard) item scrolling leftward at world speed
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub x: f32,
    pub marked_for_removal: bool,
}

impl Pickup {
    pub fn new(id: u32, kind: PickupKind, start_x: f32) -> Self {
        Self {
            id,
            kind,
            x: start_x,
            marked_for_removal: false,
        }
    }

    pub fn advance(&mut self, speed: f32, time_scale: f32) {
        self.x -= speed * time_scale;
        if self.x < OFFSCREEN_X {
            self.marked_for_removal = true;
        }
    }

    pub fn hitbox(&self, viewport: &Viewport) -> Hitbox {
        let bottom = viewport.pct_to_px(self.kind.band_pct());
        Hitbox::new(
            self.x + HITBOX_INSET,
            self.x + self.kind.width() - HITBOX_INSET,
            bottom,
            bottom + self.kind.height() - HITBOX_INSET,
        )
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// World scroll rate, px per reference frame. Monotonic within a run,
    /// forced to 0 at game over.
    pub speed: f32,
    pub invincible: bool,
    /// Accumulated unpaused play time
    pub survival_ms: f32,
    /// Survival-time score multiplier, 1.0 to MULTIPLIER_MAX
    pub multiplier: f32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub pickups: Vec<Pickup>,
    pub viewport: Viewport,
    /// Spawn scheduling: elapsed accumulators and rolled thresholds
    pub obstacle_timer_ms: f32,
    pub item_timer_ms: f32,
    pub next_obstacle_ms: f32,
    pub next_item_ms: f32,
    pub rng: Pcg32,
    /// Pending side effects for the shell
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh idle session with the given seed
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self {
            seed,
            phase: GamePhase::Idle,
            score: 0,
            lives: MAX_LIVES,
            speed: INITIAL_SPEED,
            invincible: false,
            survival_ms: 0.0,
            multiplier: 1.0,
            player: Player::new(),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            viewport,
            obstacle_timer_ms: 0.0,
            item_timer_ms: 0.0,
            next_obstacle_ms: 0.0,
            next_item_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Running or Paused: a session exists and the loop should stay armed
    pub fn is_active(&self) -> bool {
        matches!(self.phase, GamePhase::Running | GamePhase::Paused)
    }

    /// Reset all session state without activating
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.score = 0;
        self.lives = MAX_LIVES;
        self.speed = INITIAL_SPEED;
        self.invincible = false;
        self.survival_ms = 0.0;
        self.multiplier = 1.0;
        self.player = Player::new();
        self.obstacles.clear();
        self.pickups.clear();
        self.obstacle_timer_ms = 0.0;
        self.item_timer_ms = 0.0;
        self.next_obstacle_ms = 0.0;
        self.next_item_ms = 0.0;
        self.events.clear();
    }

    /// Reset and activate. Safe to call in any phase, including mid-run.
    pub fn start(&mut self) {
        self.reset();
        self.next_obstacle_ms = super::spawn::roll_obstacle_interval(&mut self.rng, self.score);
        self.next_item_ms = super::spawn::roll_item_interval(&mut self.rng);
        self.phase = GamePhase::Running;
    }

    /// Toggle pause; no-op unless a session is active
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => self.phase = GamePhase::Paused,
            GamePhase::Paused => self.phase = GamePhase::Running,
            _ => {}
        }
    }

    /// Jump request from any input source (key, touch, pointer). Requests
    /// past the double-jump limit are rejected, not queued.
    pub fn handle_input(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        if self.player.jump() {
            self.events.push(GameEvent::Jumped {
                count: self.player.jump_count,
            });
            true
        } else {
            false
        }
    }

    /// Take the pending side effects for the shell to act on
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add `base` points through the multiplier and ramp speed once for each
    /// score-threshold multiple crossed. Returns the awarded amount.
    pub(crate) fn award(&mut self, base: u32) -> u64 {
        if self.phase == GamePhase::GameOver {
            return 0;
        }
        let gained = (base as f32 * self.multiplier).floor() as u64;
        if gained == 0 {
            return 0;
        }
        let before = self.score;
        self.score += gained;

        let crossings = self.score / SCORE_SPEED_THRESHOLD - before / SCORE_SPEED_THRESHOLD;
        for _ in 0..crossings {
            self.speed += SPEED_INCREMENT;
            self.events.push(GameEvent::SpeedIncreased { speed: self.speed });
        }
        gained
    }

    /// Decrement lives unless invincible; opens the grace window or ends the
    /// session when the last life goes.
    pub(crate) fn apply_damage(&mut self) {
        // Terminal transition happens at most once; a second hit resolved on
        // the same tick must not re-fire it
        if self.invincible || self.phase != GamePhase::Running {
            return;
        }
        self.lives = self.lives.saturating_sub(1);

        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            self.speed = 0.0;
            self.events.push(GameEvent::GameOver { score: self.score });
        } else {
            self.invincible = true;
            self.player.begin_grace(INVINCIBILITY_MS);
            self.events.push(GameEvent::GraceStarted);
        }
    }

    /// Advance survival time and recompute the score multiplier
    pub(crate) fn update_multiplier(&mut self, delta_ms: f32) {
        self.survival_ms += delta_ms;
        let steps = (self.survival_ms / MULTIPLIER_STEP_MS).floor();
        self.multiplier = (1.0 + steps * MULTIPLIER_STEP).min(MULTIPLIER_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 720.0)
    }

    #[test]
    fn test_jump_state_machine() {
        let mut player = Player::new();
        assert!(!player.airborne);

        assert!(player.jump());
        assert!(player.airborne);
        assert_eq!(player.jump_count, 1);
        assert_eq!(player.velocity, JUMP_VELOCITY);

        assert!(player.jump());
        assert_eq!(player.jump_count, 2);
        assert_eq!(player.velocity, JUMP_VELOCITY * DOUBLE_JUMP_MULTIPLIER);

        // Third request is rejected and changes nothing
        let y = player.y;
        let v = player.velocity;
        assert!(!player.jump());
        assert_eq!(player.jump_count, 2);
        assert_eq!(player.y, y);
        assert_eq!(player.velocity, v);
    }

    #[test]
    fn test_player_lands_on_ground() {
        let mut player = Player::new();
        player.jump();

        let mut rose = false;
        for _ in 0..10_000 {
            player.update(1.0);
            assert!(player.y >= GROUND_Y_PCT);
            if player.y > GROUND_Y_PCT {
                rose = true;
            }
            if !player.airborne {
                break;
            }
        }
        assert!(rose);
        assert!(!player.airborne);
        assert_eq!(player.y, GROUND_Y_PCT);
        assert_eq!(player.velocity, 0.0);
        assert_eq!(player.jump_count, 0);
    }

    #[test]
    fn test_single_jump_clears_tallest_obstacle() {
        // Apex of the first jump must carry the hitbox over a hydrant
        let vp = viewport();
        let mut player = Player::new();
        player.jump();

        let mut apex_bottom: f32 = 0.0;
        while player.airborne {
            player.update(1.0);
            apex_bottom = apex_bottom.max(player.hitbox(&vp).bottom);
        }
        let hydrant_top = vp.pct_to_px(GROUND_Y_PCT) + ObstacleKind::Hydrant.height();
        assert!(apex_bottom > hydrant_top);
    }

    #[test]
    fn test_double_jump_at_apex_goes_strictly_higher() {
        // The second jump replaces velocity rather than adding to it, so its
        // timing matters: fired at the apex it extends the arc, fired
        // immediately it cuts the first arc short
        let single_apex = {
            let mut player = Player::new();
            player.jump();
            let mut max_y: f32 = 0.0;
            while player.airborne {
                player.update(1.0);
                max_y = max_y.max(player.y);
            }
            max_y
        };

        let apex_timed_double = {
            let mut player = Player::new();
            player.jump();
            let mut max_y: f32 = 0.0;
            while player.airborne {
                if player.jump_count == 1 && player.velocity <= 0.0 {
                    player.jump();
                }
                player.update(1.0);
                max_y = max_y.max(player.y);
            }
            max_y
        };

        let immediate_double = {
            let mut player = Player::new();
            player.jump();
            player.jump();
            let mut max_y: f32 = 0.0;
            while player.airborne {
                player.update(1.0);
                max_y = max_y.max(player.y);
            }
            max_y
        };

        assert!(apex_timed_double > single_apex);
        assert!(immediate_double < single_apex);
    }

    #[test]
    fn test_grace_countdown() {
        let mut player = Player::new();
        assert!(!player.tick_grace(16.0));

        player.begin_grace(100.0);
        assert!(!player.tick_grace(60.0));
        assert!(player.tick_grace(60.0));
        assert_eq!(player.grace_ms_left, 0.0);
        // Expiry fires only once
        assert!(!player.tick_grace(60.0));
    }

    #[test]
    fn test_award_applies_multiplier_and_ramps_speed() {
        let mut state = GameState::new(7, viewport());
        state.start();
        state.score = 24;

        let gained = state.award(1);
        assert_eq!(gained, 1);
        assert_eq!(state.score, 25);
        assert_eq!(state.speed, INITIAL_SPEED + SPEED_INCREMENT);

        // Next award within the same window: no further ramp
        state.award(1);
        assert_eq!(state.speed, INITIAL_SPEED + SPEED_INCREMENT);
    }

    #[test]
    fn test_award_jumping_past_threshold_ramps_once() {
        let mut state = GameState::new(7, viewport());
        state.start();
        state.score = 24;
        state.multiplier = 1.5;

        // 24 + floor(10 * 1.5) = 39 crosses 25 only
        state.award(10);
        assert_eq!(state.score, 39);
        assert_eq!(state.speed, INITIAL_SPEED + SPEED_INCREMENT);
    }

    #[test]
    fn test_damage_and_game_over() {
        let mut state = GameState::new(7, viewport());
        state.start();
        state.lives = 1;

        state.apply_damage();
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.speed, 0.0);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        );
    }

    #[test]
    fn test_damage_blocked_while_invincible() {
        let mut state = GameState::new(7, viewport());
        state.start();

        state.apply_damage();
        assert_eq!(state.lives, MAX_LIVES - 1);
        assert!(state.invincible);

        state.apply_damage();
        assert_eq!(state.lives, MAX_LIVES - 1);
    }

    #[test]
    fn test_handle_input_gated_by_phase() {
        let mut state = GameState::new(7, viewport());
        assert!(!state.handle_input());

        state.start();
        assert!(state.handle_input());

        state.toggle_pause();
        assert!(!state.handle_input());
    }

    #[test]
    fn test_toggle_pause_only_while_active() {
        let mut state = GameState::new(7, viewport());
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Idle);

        state.start();
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_multiplier_caps() {
        let mut state = GameState::new(7, viewport());
        state.start();
        state.update_multiplier(9_999.0);
        assert_eq!(state.multiplier, 1.0);
        state.update_multiplier(1.0);
        assert_eq!(state.multiplier, 1.5);
        state.update_multiplier(10_000_000.0);
        assert_eq!(state.multiplier, MULTIPLIER_MAX);
    }

    proptest! {
        /// Under any interleaving of jump requests and ticks, the player
        /// never sinks below ground and jump_count stays in {0, 1, 2}.
        #[test]
        fn prop_player_invariants(actions in prop::collection::vec(any::<bool>(), 0..500)) {
            let mut player = Player::new();
            for jump in actions {
                if jump {
                    player.jump();
                } else {
                    player.update(1.0);
                }
                prop_assert!(player.y >= GROUND_Y_PCT);
                prop_assert!(player.jump_count <= 2);
                prop_assert!(player.jump_count == 0 || player.airborne);
            }
        }
    }
}
