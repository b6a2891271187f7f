//! Post-run debrief generation.
//!
//! The simulation never blocks on this. A background thread waits out a
//! short simulated transmission delay, picks a phrase for the final
//! metrics, and hands it over a channel; the game-over screen polls the
//! handle once per frame. A dead channel resolves to a fixed fallback
//! line instead of an error, so a failed debrief can never stall the run
//! lifecycle.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

use crate::config;
use crate::entities::GameMetrics;

/// Shown when the debrief thread dies before delivering.
pub const FALLBACK_DEBRIEF: &str = "Transmission lost. Command sends its regards, pilot.";

// Scores below 1000: the command is not impressed.
const LOW_SCORE_PHRASES: &[&str] = &[
    "Cadet, that was embarrassing. Back to the academy.",
    "We lost a ship to sheer incompetence. Report filed.",
    "Your reflexes are too slow for this fleet. Improve.",
    "The fleet has no use for pilots who fall in the first wave.",
    "Pathetic. Simply pathetic.",
    "The simulator was on easy mode and you still failed.",
    "Millions spent on that ship, and you fly it into a rock.",
    "Your flight license is suspended pending review.",
    "Try keeping your eyes open next time, pilot.",
];

// Scores from 1000 through 5000: acceptable, with reservations.
const MID_SCORE_PHRASES: &[&str] = &[
    "Not bad, pilot. But the enemy still advances.",
    "Good work, though we expected more resistance.",
    "Acceptable performance. The sector survives another day.",
    "You have potential. Watch your flanks.",
    "Engagement closed. Report inconclusive.",
    "Fine marksmanship, but the evasion needs work.",
    "Not a total disaster, which counts as progress.",
    "Mission complete, with reservations.",
    "Solid. Not spectacular, but solid.",
    "You lived to fight another day. That is what matters.",
];

// Scores above 5000: legend material.
const HIGH_SCORE_PHRASES: &[&str] = &[
    "Outstanding work, ace. Star command salutes you.",
    "Incredible. You may be our last hope.",
    "Your aim is legendary. The enemy dreads your ship.",
    "Promotion imminent. Keep it up, commander.",
    "A masterful display of superiority.",
    "The bards will sing of this battle.",
    "The raider fleet is decimated. Superb.",
    "Never seen anyone fly like that before.",
    "You made it look easy. Impressive.",
];

/// Chatter flashed in the HUD when a new wave rolls in.
pub const WAVE_INTEL: &[&str] = &[
    "Multiple heat signatures detected.",
    "Brace: fresh raider flight inbound.",
    "Sensors read hostiles closing fast.",
    "They do not give up. Hold formation.",
    "Red alert. Contacts on the scope.",
    "The swarm approaches. Weapons free.",
    "Watch your flanks, pilot.",
];

/// Phrase pool for a final score: below 1000 the command is unimpressed,
/// beyond 5000 it is something else entirely.
pub fn phrase_pool(score: u32) -> &'static [&'static str] {
    if score < 1000 {
        LOW_SCORE_PHRASES
    } else if score <= 5000 {
        MID_SCORE_PHRASES
    } else {
        HIGH_SCORE_PHRASES
    }
}

/// One line of wave chatter.
pub fn pick_wave_intel(rng: &mut impl Rng) -> &'static str {
    WAVE_INTEL.choose(rng).copied().unwrap_or(FALLBACK_DEBRIEF)
}

// ── Debrief handle ───────────────────────────────────────────────────────────

/// One-shot handle for a pending debrief string.
pub struct ReportHandle {
    rx: Receiver<String>,
    resolved: Option<String>,
}

impl ReportHandle {
    /// Wrap an existing channel. Any transmission source that can feed a
    /// `String` down a channel can stand in for the built-in generator.
    pub fn from_receiver(rx: Receiver<String>) -> Self {
        ReportHandle { rx, resolved: None }
    }

    /// Non-blocking: `None` while the report is still in transit. A dead
    /// sender resolves to [`FALLBACK_DEBRIEF`] instead of an error.
    pub fn poll(&mut self) -> Option<&str> {
        if self.resolved.is_none() {
            match self.rx.try_recv() {
                Ok(line) => self.resolved = Some(line),
                Err(TryRecvError::Disconnected) => {
                    log::warn!("debrief channel closed before delivery, using fallback");
                    self.resolved = Some(FALLBACK_DEBRIEF.to_string());
                }
                Err(TryRecvError::Empty) => {}
            }
        }
        self.resolved.as_deref()
    }
}

/// Request the post-run debrief. Called exactly once per run termination;
/// the returned handle is polled from the game-over screen.
pub fn request_report(metrics: &GameMetrics) -> ReportHandle {
    request_report_after(metrics, config::report_delay())
}

/// Same as [`request_report`] with an explicit transmission delay.
pub fn request_report_after(metrics: &GameMetrics, delay: Duration) -> ReportHandle {
    let (tx, rx) = mpsc::channel();
    let score = metrics.score;
    thread::spawn(move || {
        // Dramatic pause: the debrief reads as an incoming transmission
        thread::sleep(delay);
        let line = phrase_pool(score)
            .choose(&mut thread_rng())
            .copied()
            .unwrap_or(FALLBACK_DEBRIEF);
        let _ = tx.send(line.to_string());
    });
    ReportHandle::from_receiver(rx)
}
