//! Game entity types: pure data, no logic.
//!
//! Every entity lives in canvas space and carries a `marked` deletion
//! flag. A marked entity no longer takes part in gameplay during the
//! current tick but is only physically removed in the end-of-tick
//! cleanup, so collision checks inside a tick see a consistent snapshot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Solid color as 8-bit RGB; converted to a terminal color at draw time.
pub type Rgb = (u8, u8, u8);

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in canvas space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Overlap test with strict inequalities: rectangles that merely
    /// share an edge do not collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

// ── Run status ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Playing,
    GameOver,
}

// ── Enemy kinds ──────────────────────────────────────────────────────────────

/// Closed set of raider types; everything about a kind (size, color,
/// durability, speed curve, bounty) is keyed off this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
}

impl EnemyKind {
    pub fn size(&self) -> (f32, f32) {
        match self {
            EnemyKind::Basic => (30.0, 30.0),
            EnemyKind::Fast => (25.0, 25.0),
            EnemyKind::Tank => (50.0, 50.0),
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            EnemyKind::Basic => (239, 68, 68),
            EnemyKind::Fast => (249, 115, 22),
            EnemyKind::Tank => (168, 85, 247),
        }
    }

    pub fn hit_points(&self) -> i32 {
        match self {
            EnemyKind::Basic => 1,
            EnemyKind::Fast => 1,
            EnemyKind::Tank => 3,
        }
    }

    /// Score awarded when this kind is destroyed.
    pub fn score_value(&self) -> u32 {
        match self {
            EnemyKind::Basic => 10,
            EnemyKind::Fast => 30,
            EnemyKind::Tank => 50,
        }
    }

    /// Descent speed in canvas pixels per tick. The mobile kinds pick up
    /// speed with the wave; tanks grind down at a fixed crawl.
    pub fn speed(&self, wave: u32) -> f32 {
        match self {
            EnemyKind::Basic => 2.0 + wave as f32 * 0.2,
            EnemyKind::Fast => 4.0 + wave as f32 * 0.3,
            EnemyKind::Tank => 1.0,
        }
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub speed: f32,
    /// Ticks remaining before the next shot is allowed.
    pub cooldown: u32,
    pub hp: i32,
    pub marked: bool,
}

impl Player {
    /// Fresh ship, centered just above the bottom edge.
    pub fn new() -> Self {
        Player {
            pos: Vec2::new(
                CANVAS_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                CANVAS_HEIGHT - PLAYER_HEIGHT - 20.0,
            ),
            speed: PLAYER_SPEED,
            cooldown: 0,
            hp: PLAYER_HP,
            marked: false,
        }
    }

    /// Full sprite bounds.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    /// Collision box, inset from the sprite bounds so the empty corners
    /// of the triangular hull cannot cause hits that look unfair.
    pub fn hitbox(&self) -> Rect {
        Rect::new(
            self.pos.x + HITBOX_INSET_X,
            self.pos.y + HITBOX_INSET_TOP,
            PLAYER_WIDTH - 2.0 * HITBOX_INSET_X,
            PLAYER_HEIGHT - HITBOX_INSET_TOP - HITBOX_INSET_BOTTOM,
        )
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub pos: Vec2,
    pub w: f32,
    pub h: f32,
    pub kind: EnemyKind,
    /// Downward speed, fixed at spawn from the kind and the wave then.
    pub speed: f32,
    pub hp: i32,
    pub marked: bool,
}

impl Enemy {
    /// Spawn at horizontal position `x`, just above the top edge.
    pub fn spawn(kind: EnemyKind, x: f32, wave: u32) -> Self {
        let (w, h) = kind.size();
        Enemy {
            pos: Vec2::new(x, -h),
            w,
            h,
            kind,
            speed: kind.speed(wave),
            hp: kind.hit_points(),
            marked: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.w, self.h)
    }

    pub fn color(&self) -> Rgb {
        self.kind.color()
    }
}

// ── Bullet ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Enemy fire would set this; nothing does today, but hostile
    /// bullets are already excluded from the enemy collision pass.
    pub hostile: bool,
    pub damage: i32,
    pub marked: bool,
}

impl Bullet {
    /// Player shot, centered on the ship's top edge.
    pub fn fired_from(player: &Player) -> Self {
        Bullet {
            pos: Vec2::new(
                player.pos.x + PLAYER_WIDTH / 2.0 - BULLET_WIDTH / 2.0,
                player.pos.y,
            ),
            vel: Vec2::new(0.0, -BULLET_SPEED),
            hostile: false,
            damage: BULLET_DAMAGE,
            marked: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, BULLET_WIDTH, BULLET_HEIGHT)
    }
}

// ── Particle ─────────────────────────────────────────────────────────────────

/// Explosion debris. Purely visual: particles never collide.
#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks; the draw layer fades by life / max_life.
    pub life: f32,
    pub max_life: f32,
    pub color: Rgb,
    pub marked: bool,
}

impl Particle {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PARTICLE_SIZE, PARTICLE_SIZE)
    }
}

// ── Run metrics ──────────────────────────────────────────────────────────────

/// Terminal snapshot of a run, taken once at the instant the run ends and
/// immutable afterward. This is the full payload the debrief reporter and
/// the score table receive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMetrics {
    pub score: u32,
    pub wave: u32,
    pub shots_fired: u32,
    pub enemies_destroyed: u32,
    /// enemies_destroyed / shots_fired, or 0 when nothing was fired.
    pub accuracy: f32,
}

impl GameMetrics {
    pub fn new(score: u32, wave: u32, shots_fired: u32, enemies_destroyed: u32) -> Self {
        let accuracy = if shots_fired > 0 {
            enemies_destroyed as f32 / shots_fired as f32
        } else {
            0.0
        };
        GameMetrics {
            score,
            wave,
            shots_fired,
            enemies_destroyed,
            accuracy,
        }
    }
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire per-run simulation state. Cloneable so pure update
/// functions can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    pub score: u32,
    /// Difficulty tier, a non-decreasing function of the score.
    pub wave: u32,
    pub frame: u64,
    pub shots_fired: u32,
    pub enemies_destroyed: u32,
    pub status: RunStatus,
    /// Present exactly when the run has terminated.
    pub metrics: Option<GameMetrics>,
}
