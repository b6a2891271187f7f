//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, an input snapshot and an RNG handle)
//! and returns a brand-new `GameState`. Side effects are limited to the
//! injected RNG.
//!
//! The tick runs its phases in a fixed order: movement, firing, spawning,
//! enemy advance, bullet resolution, particle aging, cleanup. Scoring and
//! removal are deferred through `marked` flags until the cleanup phase so
//! collision checks inside one tick always see the same snapshot.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::entities::{
    Bullet, Enemy, EnemyKind, GameMetrics, GameState, Particle, Player, Rgb, RunStatus,
};

// ── Input latch snapshot ─────────────────────────────────────────────────────

/// Held-state of the logical controls, sampled once per tick. Only the
/// current held state matters; presses shorter than one tick are lost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

// ── Difficulty curves ────────────────────────────────────────────────────────

/// Ticks between enemy spawns at a given score: shrinks from the base as
/// the score grows, floored at the minimum interval.
pub fn spawn_interval(score: u32) -> u64 {
    SPAWN_INTERVAL_BASE
        .saturating_sub((score / SPAWN_SCORE_DIVISOR) as u64)
        .max(SPAWN_INTERVAL_MIN)
}

/// Weighted enemy selection. `draw` is a uniform [0, 1) sample; tanks and
/// fast movers are gated behind score thresholds so the opening seconds
/// only ever see the baseline raider.
pub fn choose_enemy_kind(score: u32, draw: f32) -> EnemyKind {
    if score > TANK_SCORE_GATE && draw > TANK_DRAW_GATE {
        EnemyKind::Tank
    } else if score > FAST_SCORE_GATE && draw > FAST_DRAW_GATE {
        EnemyKind::Fast
    } else {
        EnemyKind::Basic
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh run: player centered above the bottom edge, all
/// collections empty, every counter zeroed. Restarting is exactly this.
pub fn init_state() -> GameState {
    GameState {
        player: Player::new(),
        enemies: Vec::new(),
        bullets: Vec::new(),
        particles: Vec::new(),
        score: 0,
        wave: 1,
        frame: 0,
        shots_fired: 0,
        enemies_destroyed: 0,
        status: RunStatus::Playing,
        metrics: None,
    }
}

// ── Explosions ───────────────────────────────────────────────────────────────

/// Push a burst of debris at `pos` in the source entity's color.
fn spawn_burst(particles: &mut Vec<Particle>, pos: Vec2, color: Rgb, rng: &mut impl Rng) {
    for _ in 0..PARTICLES_PER_BURST {
        particles.push(Particle {
            pos,
            vel: Vec2::new(
                (rng.gen::<f32>() - 0.5) * 10.0,
                (rng.gen::<f32>() - 0.5) * 10.0,
            ),
            life: 20.0 + rng.gen::<f32>() * 10.0,
            max_life: PARTICLE_MAX_LIFE,
            color,
            marked: false,
        });
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame. All randomness comes through
/// `rng` so callers control determinism (useful for tests with a seeded
/// RNG). Ticking a terminated run is a no-op.
pub fn tick(state: &GameState, input: &InputState, rng: &mut impl Rng) -> GameState {
    if state.status == RunStatus::GameOver {
        return state.clone();
    }

    let mut player = state.player.clone();
    let mut enemies = state.enemies.clone();
    let mut bullets = state.bullets.clone();
    let mut particles = state.particles.clone();
    let mut score = state.score;
    let mut wave = state.wave;
    let mut shots_fired = state.shots_fired;
    let mut enemies_destroyed = state.enemies_destroyed;
    let mut status = state.status;
    let mut metrics = state.metrics;

    // ── 1. Movement: both directions may apply, each clamped ─────────────────
    if input.left {
        player.pos.x = (player.pos.x - player.speed).max(0.0);
    }
    if input.right {
        player.pos.x = (player.pos.x + player.speed).min(CANVAS_WIDTH - PLAYER_WIDTH);
    }

    // ── 2. Cooldown & fire ───────────────────────────────────────────────────
    if player.cooldown > 0 {
        player.cooldown -= 1;
    }
    if input.fire && player.cooldown == 0 {
        bullets.push(Bullet::fired_from(&player));
        player.cooldown = FIRE_COOLDOWN;
        shots_fired += 1;
    }

    // ── 3. Spawn decision ────────────────────────────────────────────────────
    if state.frame % spawn_interval(score) == 0 {
        let kind = choose_enemy_kind(score, rng.gen::<f32>());
        let (w, _) = kind.size();
        let x = rng.gen_range(0.0..(CANVAS_WIDTH - w));
        enemies.push(Enemy::spawn(kind, x, wave));
    }

    // ── 4. Enemy advance & player contact ────────────────────────────────────
    let hitbox = player.hitbox();
    for enemy in enemies.iter_mut() {
        enemy.pos.y += enemy.speed;

        // Slipped past the bottom edge: silently gone, no score, no penalty
        if enemy.pos.y > CANVAS_HEIGHT {
            enemy.marked = true;
            continue;
        }

        if enemy.bounds().intersects(&hitbox) {
            spawn_burst(&mut particles, player.pos, PLAYER_COLOR, rng);
            // Termination latches once; further contacts this tick only
            // add debris
            if metrics.is_none() {
                status = RunStatus::GameOver;
                metrics = Some(GameMetrics::new(score, wave, shots_fired, enemies_destroyed));
            }
        }
    }

    // ── 5. Bullet advance & enemy contact ────────────────────────────────────
    for bullet in bullets.iter_mut() {
        bullet.pos += bullet.vel;

        if bullet.pos.y < 0.0 || bullet.pos.y > CANVAS_HEIGHT {
            bullet.marked = true;
        }
        if bullet.marked || bullet.hostile {
            continue;
        }

        for enemy in enemies.iter_mut() {
            if enemy.marked || !bullet.bounds().intersects(&enemy.bounds()) {
                continue;
            }
            bullet.marked = true;
            enemy.hp -= bullet.damage;
            if enemy.hp <= 0 {
                enemy.marked = true;
                spawn_burst(&mut particles, enemy.pos, enemy.color(), rng);
                score += enemy.kind.score_value();
                enemies_destroyed += 1;
                let reached = score / WAVE_SCORE_STEP + 1;
                if reached > wave {
                    wave = reached;
                }
            }
            // One enemy per bullet per tick, first match wins
            break;
        }
    }

    // ── 6. Particle aging ────────────────────────────────────────────────────
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life -= 1.0;
        if particle.life <= 0.0 {
            particle.marked = true;
        }
    }

    // ── 7. Cleanup: drop everything marked, advance the frame ────────────────
    enemies.retain(|e| !e.marked);
    bullets.retain(|b| !b.marked);
    particles.retain(|p| !p.marked);

    GameState {
        player,
        enemies,
        bullets,
        particles,
        score,
        wave,
        frame: state.frame + 1,
        shots_fired,
        enemies_destroyed,
        status,
        metrics,
    }
}
