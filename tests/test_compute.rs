use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use stellar_guardian::compute::*;
use stellar_guardian::consts::*;
use stellar_guardian::entities::*;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Fresh run with the frame counter nudged off the spawn boundary so
/// ticks stay free of random enemies unless a test wants them.
fn quiet_state() -> GameState {
    let mut s = init_state();
    s.frame = 1;
    s
}

const IDLE: InputState = InputState {
    left: false,
    right: false,
    fire: false,
};
const LEFT: InputState = InputState {
    left: true,
    right: false,
    fire: false,
};
const RIGHT: InputState = InputState {
    left: false,
    right: true,
    fire: false,
};
const FIRE: InputState = InputState {
    left: false,
    right: false,
    fire: true,
};

fn basic_at(x: f32, y: f32) -> Enemy {
    Enemy {
        pos: Vec2::new(x, y),
        w: 30.0,
        h: 30.0,
        kind: EnemyKind::Basic,
        speed: 2.0,
        hp: 1,
        marked: false,
    }
}

fn bullet_at(x: f32, y: f32) -> Bullet {
    Bullet {
        pos: Vec2::new(x, y),
        vel: Vec2::new(0.0, -BULLET_SPEED),
        hostile: false,
        damage: 1,
        marked: false,
    }
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_centered_above_bottom() {
    let s = init_state();
    assert_eq!(s.player.pos.x, 380.0); // (800 - 40) / 2
    assert_eq!(s.player.pos.y, 540.0); // 600 - 40 - 20
    assert_eq!(s.player.cooldown, 0);
    assert_eq!(s.player.hp, PLAYER_HP);
}

#[test]
fn init_state_empty_collections_and_zeroed_counters() {
    let s = init_state();
    assert!(s.enemies.is_empty());
    assert!(s.bullets.is_empty());
    assert!(s.particles.is_empty());
    assert_eq!(s.score, 0);
    assert_eq!(s.wave, 1);
    assert_eq!(s.frame, 0);
    assert_eq!(s.shots_fired, 0);
    assert_eq!(s.enemies_destroyed, 0);
    assert_eq!(s.status, RunStatus::Playing);
    assert!(s.metrics.is_none());
}

// ── movement ──────────────────────────────────────────────────────────────────

#[test]
fn move_left_by_speed() {
    let s = quiet_state();
    let s2 = tick(&s, &LEFT, &mut seeded_rng());
    assert_eq!(s2.player.pos.x, 373.0);
}

#[test]
fn move_right_by_speed() {
    let s = quiet_state();
    let s2 = tick(&s, &RIGHT, &mut seeded_rng());
    assert_eq!(s2.player.pos.x, 387.0);
}

#[test]
fn opposite_directions_cancel_out() {
    let s = quiet_state();
    let both = InputState {
        left: true,
        right: true,
        fire: false,
    };
    let s2 = tick(&s, &both, &mut seeded_rng());
    assert_eq!(s2.player.pos.x, 380.0);
}

#[test]
fn move_left_clamps_at_zero() {
    let mut s = quiet_state();
    s.player.pos.x = 3.0;
    let s2 = tick(&s, &LEFT, &mut seeded_rng());
    assert_eq!(s2.player.pos.x, 0.0);
}

#[test]
fn move_right_clamps_at_canvas_edge() {
    let mut s = quiet_state();
    s.player.pos.x = 758.0;
    let s2 = tick(&s, &RIGHT, &mut seeded_rng());
    assert_eq!(s2.player.pos.x, CANVAS_WIDTH - PLAYER_WIDTH);
}

#[test]
fn no_input_no_movement() {
    let s = quiet_state();
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.player.pos.x, 380.0);
}

#[test]
fn tick_does_not_mutate_original() {
    let s = quiet_state();
    let _ = tick(&s, &LEFT, &mut seeded_rng());
    assert_eq!(s.player.pos.x, 380.0);
    assert_eq!(s.frame, 1);
}

// ── firing ────────────────────────────────────────────────────────────────────

#[test]
fn fire_spawns_one_centered_bullet() {
    let s = quiet_state();
    let s2 = tick(&s, &FIRE, &mut seeded_rng());
    assert_eq!(s2.bullets.len(), 1);
    let b = &s2.bullets[0];
    // Centered on the top edge, already advanced by one tick of velocity
    assert_eq!(b.pos.x, 398.0); // 380 + 40/2 - 4/2
    assert_eq!(b.pos.y, 530.0); // 540 - 10
    assert_eq!(b.vel, Vec2::new(0.0, -BULLET_SPEED));
    assert!(!b.hostile);
    assert_eq!(b.damage, BULLET_DAMAGE);
    assert_eq!(s2.player.cooldown, FIRE_COOLDOWN);
    assert_eq!(s2.shots_fired, 1);
}

#[test]
fn fire_blocked_while_cooldown_positive() {
    let mut s = quiet_state();
    s.player.cooldown = 5;
    let s2 = tick(&s, &FIRE, &mut seeded_rng());
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.shots_fired, 0);
    assert_eq!(s2.player.cooldown, 4); // still decremented
}

#[test]
fn held_fire_shoots_once_per_cooldown_window() {
    let mut rng = seeded_rng();
    let mut s = quiet_state();
    for _ in 0..15 {
        s = tick(&s, &FIRE, &mut rng);
    }
    assert_eq!(s.shots_fired, 1);
    s = tick(&s, &FIRE, &mut rng);
    assert_eq!(s.shots_fired, 2); // 16th tick: cooldown hit zero again
}

#[test]
fn fire_and_move_apply_in_the_same_tick() {
    let s = quiet_state();
    let both = InputState {
        left: true,
        right: false,
        fire: true,
    };
    let s2 = tick(&s, &both, &mut seeded_rng());
    assert_eq!(s2.player.pos.x, 373.0);
    assert_eq!(s2.bullets.len(), 1);
    // Bullet is centered on the post-movement position
    assert_eq!(s2.bullets[0].pos.x, 373.0 + 18.0);
}

// ── spawning ──────────────────────────────────────────────────────────────────

#[test]
fn first_tick_spawns_a_basic_enemy() {
    // frame 0 is a multiple of every interval
    let s = init_state();
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.enemies.len(), 1);
    let e = &s2.enemies[0];
    assert_eq!(e.kind, EnemyKind::Basic); // score 0 always spawns Basic
    // Spawned just above the top edge, then advanced once
    assert!((e.pos.y - (-e.h + e.speed)).abs() < 1e-4);
    assert!(e.pos.x >= 0.0 && e.pos.x <= CANVAS_WIDTH - e.w);
}

#[test]
fn no_spawn_off_the_interval() {
    let s = quiet_state(); // frame 1
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert!(s2.enemies.is_empty());
}

#[test]
fn spawn_on_exact_interval_multiple() {
    let mut s = init_state();
    s.frame = 60;
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.enemies.len(), 1);

    s.frame = 59;
    let s3 = tick(&s, &IDLE, &mut seeded_rng());
    assert!(s3.enemies.is_empty());
}

#[test]
fn spawn_interval_shrinks_with_score_and_floors() {
    assert_eq!(spawn_interval(0), SPAWN_INTERVAL_BASE);
    assert_eq!(spawn_interval(249), SPAWN_INTERVAL_BASE);
    assert_eq!(spawn_interval(250), SPAWN_INTERVAL_BASE - 1);
    assert_eq!(spawn_interval(10_000), SPAWN_INTERVAL_MIN);
    assert_eq!(spawn_interval(20_000), SPAWN_INTERVAL_MIN);
    assert_eq!(spawn_interval(u32::MAX), SPAWN_INTERVAL_MIN);
}

#[test]
fn enemy_kind_gates() {
    // Below every gate: always the baseline raider
    assert_eq!(choose_enemy_kind(0, 0.99), EnemyKind::Basic);
    assert_eq!(choose_enemy_kind(200, 0.99), EnemyKind::Basic);
    // Fast unlocks above 200 with a draw above 0.6
    assert_eq!(choose_enemy_kind(201, 0.61), EnemyKind::Fast);
    assert_eq!(choose_enemy_kind(201, 0.6), EnemyKind::Basic);
    // Tank needs both score above 500 and a draw above 0.8
    assert_eq!(choose_enemy_kind(501, 0.81), EnemyKind::Tank);
    assert_eq!(choose_enemy_kind(500, 0.81), EnemyKind::Fast);
    assert_eq!(choose_enemy_kind(501, 0.8), EnemyKind::Fast);
    assert_eq!(choose_enemy_kind(501, 0.5), EnemyKind::Basic);
}

// ── enemy advance ─────────────────────────────────────────────────────────────

#[test]
fn enemies_descend_by_their_speed() {
    let mut s = quiet_state();
    s.enemies.push(basic_at(100.0, 100.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.enemies[0].pos.y, 102.0);
}

#[test]
fn escaped_enemy_vanishes_without_penalty() {
    let mut s = quiet_state();
    s.enemies.push(basic_at(100.0, 599.0)); // advances to 601
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.score, 0);
    assert_eq!(s2.enemies_destroyed, 0);
    assert!(s2.particles.is_empty());
    assert_eq!(s2.status, RunStatus::Playing);
}

#[test]
fn enemy_at_the_edge_is_kept() {
    let mut s = quiet_state();
    s.enemies.push(basic_at(100.0, 597.0)); // advances to 599
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.enemies.len(), 1);
}

// ── player contact & termination ──────────────────────────────────────────────

#[test]
fn contact_with_hitbox_terminates_the_run() {
    let mut s = quiet_state();
    // Player hitbox: x 392..408, y 550..575. Enemy advances to y 532..562.
    s.enemies.push(basic_at(390.0, 530.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.status, RunStatus::GameOver);
    assert!(s2.metrics.is_some());
    assert_eq!(s2.particles.len(), 8); // one burst at the player
}

#[test]
fn sprite_corner_overlap_does_not_count() {
    let mut s = quiet_state();
    // Overlaps the 40-wide sprite (380..420) but stops short of the
    // inset hitbox edge at 392
    s.enemies.push(basic_at(360.0, 530.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.status, RunStatus::Playing);
    assert!(s2.metrics.is_none());
}

#[test]
fn termination_latches_once_for_simultaneous_contacts() {
    let mut s = quiet_state();
    s.score = 300;
    s.enemies.push(basic_at(390.0, 530.0));
    s.enemies.push(basic_at(395.0, 531.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.status, RunStatus::GameOver);
    // Two bursts of debris, but a single snapshot
    assert_eq!(s2.particles.len(), 16);
    assert_eq!(s2.metrics.unwrap().score, 300);
}

#[test]
fn ticking_a_terminated_run_is_a_noop() {
    let mut s = quiet_state();
    s.enemies.push(basic_at(390.0, 530.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.status, RunStatus::GameOver);
    let s3 = tick(&s2, &FIRE, &mut seeded_rng());
    assert_eq!(s3.frame, s2.frame);
    assert_eq!(s3.metrics, s2.metrics);
    assert_eq!(s3.bullets.len(), s2.bullets.len());
}

#[test]
fn metrics_snapshot_carries_the_counters() {
    let mut s = quiet_state();
    s.score = 1234;
    s.wave = 2;
    s.shots_fired = 10;
    s.enemies_destroyed = 5;
    s.enemies.push(basic_at(390.0, 530.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    let m = s2.metrics.unwrap();
    assert_eq!(m.score, 1234);
    assert_eq!(m.wave, 2);
    assert_eq!(m.shots_fired, 10);
    assert_eq!(m.enemies_destroyed, 5);
    assert_eq!(m.accuracy, 0.5);
}

#[test]
fn accuracy_is_zero_when_nothing_was_fired() {
    let mut s = quiet_state();
    s.enemies.push(basic_at(390.0, 530.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.metrics.unwrap().accuracy, 0.0);
}

// ── bullets ───────────────────────────────────────────────────────────────────

#[test]
fn bullets_move_by_their_velocity() {
    let mut s = quiet_state();
    s.bullets.push(bullet_at(400.0, 300.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.bullets[0].pos.y, 290.0);
}

#[test]
fn bullet_discarded_above_the_top() {
    let mut s = quiet_state();
    s.bullets.push(bullet_at(400.0, 5.0)); // advances to -5
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert!(s2.bullets.is_empty());
}

#[test]
fn bullet_discarded_below_the_bottom() {
    let mut s = quiet_state();
    let mut b = bullet_at(400.0, 595.0);
    b.vel = Vec2::new(0.0, BULLET_SPEED);
    b.hostile = true;
    s.bullets.push(b); // advances to 605
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert!(s2.bullets.is_empty());
}

#[test]
fn hostile_bullets_never_damage_enemies() {
    let mut s = quiet_state();
    s.enemies.push(basic_at(390.0, 290.0)); // advances to 292..322
    let mut b = bullet_at(400.0, 300.0);
    b.vel = Vec2::new(0.0, BULLET_SPEED); // advances to 310, inside the box
    b.hostile = true;
    s.bullets.push(b);
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.enemies[0].hp, 1);
    assert_eq!(s2.bullets.len(), 1);
}

#[test]
fn kill_scores_once_and_cleans_up() {
    let mut s = quiet_state();
    s.enemies.push(basic_at(390.0, 320.0)); // advances to 322..352
    s.bullets.push(bullet_at(400.0, 340.0)); // advances to 330
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert!(s2.enemies.is_empty());
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.score, 10);
    assert_eq!(s2.enemies_destroyed, 1);
    assert_eq!(s2.particles.len(), 8);
    assert_eq!(s2.wave, 1);
}

#[test]
fn tank_soaks_hits_until_hp_runs_out() {
    let mut s = quiet_state();
    s.enemies.push(Enemy {
        pos: Vec2::new(390.0, 320.0),
        w: 50.0,
        h: 50.0,
        kind: EnemyKind::Tank,
        speed: 1.0,
        hp: 3,
        marked: false,
    });
    s.bullets.push(bullet_at(400.0, 340.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    // Bullet consumed, tank wounded but alive, nothing scored yet
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].hp, 2);
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.score, 0);
    assert_eq!(s2.enemies_destroyed, 0);
}

#[test]
fn wounded_tank_dies_on_the_last_hit() {
    let mut s = quiet_state();
    s.enemies.push(Enemy {
        pos: Vec2::new(390.0, 320.0),
        w: 50.0,
        h: 50.0,
        kind: EnemyKind::Tank,
        speed: 1.0,
        hp: 1,
        marked: false,
    });
    s.bullets.push(bullet_at(400.0, 340.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.score, 50);
    assert_eq!(s2.enemies_destroyed, 1);
}

#[test]
fn bullet_damages_only_the_first_overlapping_enemy() {
    let mut s = quiet_state();
    s.enemies.push(basic_at(390.0, 320.0));
    s.enemies.push(basic_at(390.0, 320.0)); // stacked on top
    s.bullets.push(bullet_at(400.0, 340.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.enemies.len(), 1); // exactly one destroyed
    assert_eq!(s2.score, 10);
    assert_eq!(s2.enemies_destroyed, 1);
}

// ── wave progression ──────────────────────────────────────────────────────────

#[test]
fn wave_rises_when_score_crosses_the_step() {
    let mut s = quiet_state();
    s.score = 990;
    s.enemies.push(basic_at(390.0, 320.0));
    s.bullets.push(bullet_at(400.0, 340.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.score, 1000);
    assert_eq!(s2.wave, 2);
}

#[test]
fn wave_three_at_two_and_a_half_thousand() {
    let mut s = quiet_state();
    s.score = 2490;
    s.wave = 2;
    s.enemies.push(basic_at(390.0, 320.0));
    s.bullets.push(bullet_at(400.0, 340.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.score, 2500);
    assert_eq!(s2.wave, 3);
}

#[test]
fn wave_never_decreases() {
    let mut s = quiet_state();
    s.score = 0;
    s.wave = 5;
    s.enemies.push(basic_at(390.0, 320.0));
    s.bullets.push(bullet_at(400.0, 340.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.wave, 5);
}

// ── particles ─────────────────────────────────────────────────────────────────

#[test]
fn particles_drift_and_age() {
    let mut s = quiet_state();
    s.particles.push(Particle {
        pos: Vec2::new(100.0, 100.0),
        vel: Vec2::new(1.0, -1.0),
        life: 5.0,
        max_life: PARTICLE_MAX_LIFE,
        color: (255, 0, 0),
        marked: false,
    });
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.particles[0].pos, Vec2::new(101.0, 99.0));
    assert_eq!(s2.particles[0].life, 4.0);
}

#[test]
fn spent_particles_are_removed() {
    let mut s = quiet_state();
    s.particles.push(Particle {
        pos: Vec2::new(100.0, 100.0),
        vel: Vec2::ZERO,
        life: 1.0,
        max_life: PARTICLE_MAX_LIFE,
        color: (255, 0, 0),
        marked: false,
    });
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert!(s2.particles.is_empty());
}

// ── frame counter & restart ───────────────────────────────────────────────────

#[test]
fn tick_advances_the_frame_counter() {
    let s = quiet_state();
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.frame, 2);
}

#[test]
fn restart_resets_every_field() {
    let mut rng = seeded_rng();
    let mut s = init_state();
    let busy = InputState {
        left: false,
        right: true,
        fire: true,
    };
    for _ in 0..70 {
        s = tick(&s, &busy, &mut rng);
    }
    assert!(s.shots_fired > 0);
    assert!(!s.enemies.is_empty() || !s.bullets.is_empty());

    let fresh = init_state();
    assert_eq!(fresh.player.pos.x, 380.0);
    assert_eq!(fresh.player.pos.y, 540.0);
    assert_eq!(fresh.player.cooldown, 0);
    assert!(fresh.enemies.is_empty());
    assert!(fresh.bullets.is_empty());
    assert!(fresh.particles.is_empty());
    assert_eq!(fresh.score, 0);
    assert_eq!(fresh.wave, 1);
    assert_eq!(fresh.frame, 0);
    assert_eq!(fresh.shots_fired, 0);
    assert_eq!(fresh.enemies_destroyed, 0);
    assert_eq!(fresh.status, RunStatus::Playing);
    assert!(fresh.metrics.is_none());
}
