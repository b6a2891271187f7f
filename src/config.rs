//! Runtime configuration (not gameplay tuning): environment overrides
//! with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Frame cadence. The simulation is frame-locked, so this is effectively
/// the game-speed knob; the default 60 Hz matches the tuning of the
/// movement and spawn constants.
pub fn frame_duration() -> Duration {
    let fps = env::var("GUARDIAN_FPS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|&fps| fps > 0)
        .unwrap_or(60);
    Duration::from_millis(1000 / fps)
}

/// Simulated transmission delay before the debrief line arrives.
pub fn report_delay() -> Duration {
    let millis = env::var("GUARDIAN_REPORT_DELAY_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(600);
    Duration::from_millis(millis)
}

/// Score-table location: explicit override, else a dotfile in $HOME.
pub fn scores_path() -> PathBuf {
    if let Some(path) = env::var_os("GUARDIAN_SCORES_PATH") {
        return PathBuf::from(path);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".stellar_guardian_scores.json")
}
