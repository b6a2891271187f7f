//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state. No game logic is performed; this module only projects the
//! 800x600 canvas space onto the terminal cell grid and translates state
//! into queued terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::consts::*;
use crate::entities::{Enemy, EnemyKind, GameState, Player, Rect, Rgb, RunStatus};

// ── Colour palette (HUD chrome; entities carry their own colors) ─────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_WAVE: Color = Color::Cyan;
const C_HUD_BEST: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;
const C_INTEL: Color = Color::Magenta;
const C_STAR_BRIGHT: Color = Color::White;
const C_STAR_DIM: Color = Color::Rgb {
    r: 148,
    g: 163,
    b: 184,
};
const C_TANK_TRIM: Color = Color::White;

/// Placeholder shown on the game-over panel until the debrief arrives.
const DEBRIEF_PENDING: &str = "Receiving encrypted transmission...";

/// Presentation-only values that ride alongside the simulation state.
pub struct HudContext<'a> {
    /// Best score on the persistent table.
    pub best: u32,
    /// Transient command chatter flashed when a new wave rolls in.
    pub intel: Option<&'a str>,
    /// Debrief line for the game-over panel; `None` while in transit.
    pub debrief: Option<&'a str>,
}

// ── Canvas-to-cell projection ────────────────────────────────────────────────

/// Row 0 is the HUD, the last row is the controls hint; the playfield is
/// everything between.
const PLAY_TOP: u16 = 1;

struct Grid {
    cols: u16,
    rows: u16,
    play_rows: u16,
    sx: f32,
    sy: f32,
}

impl Grid {
    fn new(cols: u16, rows: u16) -> Self {
        let play_rows = rows.saturating_sub(2).max(1);
        Grid {
            cols,
            rows,
            play_rows,
            sx: cols as f32 / CANVAS_WIDTH,
            sy: play_rows as f32 / CANVAS_HEIGHT,
        }
    }

    /// Single canvas point to a playfield cell; `None` when off-grid.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let col = (x * self.sx).floor() as i32;
        let row = (y * self.sy).floor() as i32;
        if col < 0 || col >= self.cols as i32 || row < 0 || row >= self.play_rows as i32 {
            return None;
        }
        Some((col as u16, PLAY_TOP + row as u16))
    }

    /// Canvas rect to an inclusive cell box clipped to the playfield, as
    /// (col, row, cols, rows); `None` when fully outside.
    fn span(&self, r: &Rect) -> Option<(u16, u16, u16, u16)> {
        let c0 = ((r.x * self.sx).floor() as i32).max(0);
        let c1 = (((r.x + r.w) * self.sx).ceil() as i32 - 1).min(self.cols as i32 - 1);
        let r0 = ((r.y * self.sy).floor() as i32).max(0);
        let r1 = (((r.y + r.h) * self.sy).ceil() as i32 - 1).min(self.play_rows as i32 - 1);
        if c0 > c1 || r0 > r1 {
            return None;
        }
        Some((
            c0 as u16,
            PLAY_TOP + r0 as u16,
            (c1 - c0 + 1) as u16,
            (r1 - r0 + 1) as u16,
        ))
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Scale a color toward black: the terminal stand-in for alpha fade.
fn faded(rgb: Rgb, k: f32) -> Color {
    let k = k.clamp(0.0, 1.0);
    Color::Rgb {
        r: (rgb.0 as f32 * k) as u8,
        g: (rgb.1 as f32 * k) as u8,
        b: (rgb.2 as f32 * k) as u8,
    }
}

fn put<W: Write>(out: &mut W, col: u16, row: u16, text: &str, color: Color) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Public entry point ───────────────────────────────────────────────────────

/// Render one complete frame, back to front.
pub fn render<W: Write>(out: &mut W, state: &GameState, hud: &HudContext) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let grid = Grid::new(cols, rows);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_starfield(out, &grid, state.frame)?;

    if state.status == RunStatus::Playing {
        draw_player(out, &grid, &state.player, state.frame)?;
    }
    for enemy in &state.enemies {
        draw_enemy(out, &grid, enemy)?;
    }
    for bullet in &state.bullets {
        if let Some((col, row)) = grid.cell(bullet.pos.x + BULLET_WIDTH / 2.0, bullet.pos.y) {
            put(out, col, row, "║", to_color(BULLET_COLOR))?;
        }
    }
    for particle in &state.particles {
        if let Some((col, row)) = grid.cell(particle.pos.x, particle.pos.y) {
            let alpha = particle.life / particle.max_life;
            put(out, col, row, "•", faded(particle.color, alpha))?;
        }
    }

    draw_hud(out, &grid, state, hud)?;
    draw_controls_hint(out, &grid)?;

    if state.status == RunStatus::GameOver {
        draw_game_over(out, &grid, state, hud)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, grid.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Starfield ────────────────────────────────────────────────────────────────

/// Fixed-count scrolling starfield. Each star's position is a pure
/// function of its index and the frame counter, so no per-star state is
/// ever stored and the field still appears to drift downward.
fn draw_starfield<W: Write>(out: &mut W, grid: &Grid, frame: u64) -> std::io::Result<()> {
    let t = frame as f32;
    for i in 0..STAR_COUNT {
        let n = i as f32;
        let x = ((n * 132.1).sin() * 43758.5453 + t * 0.2).rem_euclid(CANVAS_WIDTH);
        let y = ((n * 432.1).cos() * 23421.123 + t * 1.5).rem_euclid(CANVAS_HEIGHT);
        if let Some((col, row)) = grid.cell(x, y) {
            let (glyph, color) = if i % 3 == 0 {
                ("·", C_STAR_BRIGHT)
            } else {
                (".", C_STAR_DIM)
            };
            put(out, col, row, glyph, color)?;
        }
    }
    Ok(())
}

// ── Entities ─────────────────────────────────────────────────────────────────

/// Apex-up triangle filling a cell box, one widening span per row.
fn fill_triangle<W: Write>(
    out: &mut W,
    col: u16,
    row: u16,
    w: u16,
    h: u16,
    color: Color,
) -> std::io::Result<()> {
    for i in 0..h {
        let frac = (i + 1) as f32 / h as f32;
        let span = ((w as f32 * frac).round() as u16).clamp(1, w);
        let start = col + (w - span) / 2;
        put(out, start, row + i, &"█".repeat(span as usize), color)?;
    }
    Ok(())
}

fn draw_player<W: Write>(
    out: &mut W,
    grid: &Grid,
    player: &Player,
    frame: u64,
) -> std::io::Result<()> {
    let Some((col, row, w, h)) = grid.span(&player.bounds()) else {
        return Ok(());
    };
    fill_triangle(out, col, row, w, h, to_color(PLAYER_COLOR))?;

    // Pulsing engine glow under the hull
    let glow_row = row + h;
    if glow_row < PLAY_TOP + grid.play_rows {
        let glyph = if (frame / 6) % 2 == 0 { "●" } else { "•" };
        put(out, col + w / 2, glow_row, glyph, to_color(PLAYER_COLOR))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, grid: &Grid, enemy: &Enemy) -> std::io::Result<()> {
    let Some((col, row, w, h)) = grid.span(&enemy.bounds()) else {
        return Ok(());
    };
    let color = to_color(enemy.color());
    match enemy.kind {
        EnemyKind::Fast => fill_triangle(out, col, row, w, h, color)?,
        EnemyKind::Basic | EnemyKind::Tank => {
            for i in 0..h {
                put(out, col, row + i, &"█".repeat(w as usize), color)?;
            }
            if enemy.kind == EnemyKind::Tank {
                draw_tank_trim(out, col, row, w, h)?;
            }
        }
    }
    Ok(())
}

/// Inner outline on the tank hull; collapses to a single accent cell when
/// the projection is too coarse for a full ring.
fn draw_tank_trim<W: Write>(
    out: &mut W,
    col: u16,
    row: u16,
    w: u16,
    h: u16,
) -> std::io::Result<()> {
    if w >= 3 && h >= 3 {
        for i in 1..h - 1 {
            for j in 1..w - 1 {
                if i == 1 || i == h - 2 || j == 1 || j == w - 2 {
                    put(out, col + j, row + i, "▒", C_TANK_TRIM)?;
                }
            }
        }
    } else if w >= 3 {
        put(out, col + w / 2, row + h / 2, "▪", C_TANK_TRIM)?;
    }
    Ok(())
}

// ── HUD (row 0) and hint row ─────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    grid: &Grid,
    state: &GameState,
    hud: &HudContext,
) -> std::io::Result<()> {
    put(out, 1, 0, &format!("SCORE {:>7}", state.score), C_HUD_SCORE)?;
    put(out, 16, 0, &format!("WAVE {:>3}", state.wave), C_HUD_WAVE)?;

    let best = format!("BEST {:>7}", hud.best);
    let col = grid.cols.saturating_sub(best.chars().count() as u16 + 1);
    if col > 26 {
        put(out, col, 0, &best, C_HUD_BEST)?;
    }

    if let Some(line) = hud.intel {
        let col = (grid.cols / 2).saturating_sub(line.chars().count() as u16 / 2);
        put(out, col, PLAY_TOP, line, C_INTEL)?;
    }
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, grid: &Grid) -> std::io::Result<()> {
    if grid.rows < 2 {
        return Ok(());
    }
    put(
        out,
        1,
        grid.rows - 1,
        "← → / A D : Steer   SPACE : Fire   Q : Quit",
        C_HINT,
    )
}

// ── Game-over overlay ────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    grid: &Grid,
    state: &GameState,
    hud: &HudContext,
) -> std::io::Result<()> {
    let Some(m) = state.metrics else {
        return Ok(());
    };

    let score_line = format!("SCORE {:>6}      WAVE {:>3}", m.score, m.wave);
    let kills_line = format!(
        "KILLS {:>6}  ACCURACY {:>3}%",
        m.enemies_destroyed,
        (m.accuracy * 100.0).floor() as u32
    );
    let debrief_line = format!("\"{}\"", hud.debrief.unwrap_or(DEBRIEF_PENDING));

    let lines: &[(&str, Color)] = &[
        ("╔══════════════════════════╗", Color::Red),
        ("║       SIGNAL  LOST       ║", Color::Red),
        ("╚══════════════════════════╝", Color::Red),
        ("", Color::Reset),
        (&score_line, Color::Yellow),
        (&kills_line, Color::Green),
        ("", Color::Reset),
        ("COMMAND DEBRIEF", C_INTEL),
        (&debrief_line, Color::White),
        ("", Color::Reset),
        ("R - Relaunch   ESC - Menu   Q - Quit", Color::White),
    ];

    let cx = grid.cols / 2;
    let start_row = (grid.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        if msg.is_empty() {
            continue;
        }
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        put(out, col, row, msg, *color)?;
    }
    Ok(())
}
