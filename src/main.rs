//! Stellar Guardian entry point: terminal setup, the input thread, the
//! menu, and the frame-paced game loop.

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;

use stellar_guardian::compute::{init_state, tick, InputState};
use stellar_guardian::config;
use stellar_guardian::display::{self, HudContext};
use stellar_guardian::entities::RunStatus;
use stellar_guardian::report::{self, ReportHandle};
use stellar_guardian::scores::ScoreTable;

// ── Input latch constants ─────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived
/// within this many frames.  Covers terminals that don't emit key-release
/// events: at 60 FPS this window (~133 ms) is refreshed by the OS
/// key-repeat stream before it can expire.
const HOLD_WINDOW: u64 = 8;

/// Frames the wave-intel chatter stays on screen (3 s at 60 FPS).
const INTEL_TTL: u32 = 180;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    best: u32,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "✦  STELLAR  GUARDIAN  ✦";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let subtitle = "ORBITAL DEFENSE LINE";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(subtitle.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(subtitle))?;

    if best > 0 {
        let best_str = format!("Best Score: {}", best);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(best_str.chars().count() as u16 / 2),
            cy.saturating_sub(3),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&best_str))?;
    }

    let help: &[&str] = &[
        "Raiders descend in waves; none may reach the line.",
        "",
        "← → / A D : Steer     SPACE : Fire",
    ];
    for (i, line) in help.iter().enumerate() {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(line.chars().count() as u16 / 2),
            cy.saturating_sub(1) + i as u16,
        ))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(*line))?;
    }

    let start_str = "[ENTER] Launch Mission";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(start_str.chars().count() as u16 / 2),
        cy + 3,
    ))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(start_str))?;

    let quit_str = "[Q] Quit";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(quit_str.chars().count() as u16 / 2),
        cy + 4,
    ))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(quit_str))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        if let Ok(Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        })) = rx.recv()
        {
            match code {
                KeyCode::Enter => return Ok(MenuResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum LoopExit {
    Menu,
    Quit,
}

/// Run one mission (and any in-place restarts) until the player leaves.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame the latch snapshot is
/// derived from the keys still "fresh" (within `HOLD_WINDOW` frames), so
/// fire and movement can be held simultaneously with no interference.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events remove keys on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire after `HOLD_WINDOW` quiet frames,
///   which is shorter than the repeat interval, so a held key stays live
///   while it keeps generating repeats.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    scores: &mut ScoreTable,
) -> std::io::Result<LoopExit> {
    let mut rng = thread_rng();
    let mut state = init_state();

    // Maps each held key to the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    let mut report: Option<ReportHandle> = None;
    let mut intel: Option<(&'static str, u32)> = None;
    let mut last_wave = state.wave;
    let frame_budget = config::frame_duration();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        })) = rx.try_recv()
        {
            match kind {
                // Press: record key + handle one-shot actions
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => {
                            return Ok(LoopExit::Quit);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(LoopExit::Quit);
                        }
                        KeyCode::Esc => {
                            return Ok(LoopExit::Menu);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if state.status == RunStatus::GameOver =>
                        {
                            // Restart: full state reset, fresh debrief
                            state = init_state();
                            report = None;
                            intel = None;
                            last_wave = state.wave;
                            key_frame.clear();
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Latch snapshot for this tick ──────────────────────────────────────
        let input = InputState {
            left: is_held(&key_frame, &KeyCode::Left, frame)
                || is_held(&key_frame, &KeyCode::Char('a'), frame)
                || is_held(&key_frame, &KeyCode::Char('A'), frame),
            right: is_held(&key_frame, &KeyCode::Right, frame)
                || is_held(&key_frame, &KeyCode::Char('d'), frame)
                || is_held(&key_frame, &KeyCode::Char('D'), frame),
            fire: is_held(&key_frame, &KeyCode::Char(' '), frame),
        };

        if state.status == RunStatus::Playing {
            state = tick(&state, &input, &mut rng);

            if state.wave > last_wave {
                intel = Some((report::pick_wave_intel(&mut rng), INTEL_TTL));
                last_wave = state.wave;
            }

            // Termination: forward the snapshot once, then only display
            if let Some(metrics) = state.metrics {
                if report.is_none() {
                    if let Ok(json) = serde_json::to_string(&metrics) {
                        log::info!("run terminated: {json}");
                    }
                    report = Some(report::request_report(&metrics));
                    if scores.record(&metrics).is_some() {
                        scores.save();
                    }
                }
            }
        }

        if let Some((_, ttl)) = intel.as_mut() {
            *ttl = ttl.saturating_sub(1);
        }
        if matches!(intel, Some((_, 0))) {
            intel = None;
        }

        let debrief = report.as_mut().and_then(|handle| handle.poll());
        let hud = HudContext {
            best: scores.best(),
            intel: intel.map(|(line, _)| line),
            debrief,
        };
        display::render(out, &state, &hud)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::init();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped, program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut scores = ScoreTable::load();

    loop {
        match show_menu(out, rx, scores.best())? {
            MenuResult::Quit => break,
            MenuResult::Start => match game_loop(out, rx, &mut scores)? {
                LoopExit::Quit => break,
                LoopExit::Menu => {}
            },
        }
    }
    Ok(())
}
