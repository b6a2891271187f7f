//! Stellar Guardian: a single-screen terminal space shooter.
//!
//! Core modules:
//! - `entities`: game entity types, pure data in canvas space
//! - `compute`: the per-frame simulation tick (pure, RNG injected)
//! - `display`: crossterm rendering, read-only over the state
//! - `report`: asynchronous post-run debrief strings
//! - `scores`: persistent top-10 score table
//! - `config`: environment-driven runtime knobs

pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod report;
pub mod scores;

/// Gameplay tuning constants.
///
/// The simulation runs in a fixed 800x600 canvas space regardless of the
/// terminal size; all lengths are canvas pixels, all durations are ticks.
pub mod consts {
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 7.0;
    pub const PLAYER_HP: i32 = 1;
    pub const PLAYER_COLOR: (u8, u8, u8) = (59, 130, 246);
    /// Ticks between shots while fire is held.
    pub const FIRE_COOLDOWN: u32 = 15;

    // Player collision box insets. The ship sprite is a triangle, so the
    // box is pulled in from the rectangular bounds: most at the sides,
    // least at the bottom where the hull is widest.
    pub const HITBOX_INSET_X: f32 = 12.0;
    pub const HITBOX_INSET_TOP: f32 = 10.0;
    pub const HITBOX_INSET_BOTTOM: f32 = 5.0;

    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_DAMAGE: i32 = 1;
    pub const BULLET_COLOR: (u8, u8, u8) = (251, 191, 36);

    /// Spawn interval at score zero, in ticks.
    pub const SPAWN_INTERVAL_BASE: u64 = 60;
    /// The interval never drops below this, no matter the score.
    pub const SPAWN_INTERVAL_MIN: u64 = 20;
    /// Score points per one-tick reduction of the spawn interval.
    pub const SPAWN_SCORE_DIVISOR: u32 = 250;

    // Score gates and draw thresholds for the heavier enemy kinds.
    pub const TANK_SCORE_GATE: u32 = 500;
    pub const TANK_DRAW_GATE: f32 = 0.8;
    pub const FAST_SCORE_GATE: u32 = 200;
    pub const FAST_DRAW_GATE: f32 = 0.6;

    /// Score needed to raise the wave counter by one.
    pub const WAVE_SCORE_STEP: u32 = 1000;

    pub const PARTICLES_PER_BURST: usize = 8;
    pub const PARTICLE_SIZE: f32 = 4.0;
    pub const PARTICLE_MAX_LIFE: f32 = 30.0;

    /// Stars drawn per frame; positions are derived, never stored.
    pub const STAR_COUNT: usize = 50;
}
