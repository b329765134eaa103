use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::timer::{Mode, Settings};

/// Every state change in the engine produces an Event.
/// The presentation layer renders from them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_ms: u64,
        fire_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// An interval ran out and the engine flipped to the next mode.
    TimerCompleted {
        completed: Mode,
        next: Mode,
        session_count: u64,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        mode: Mode,
        running: bool,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    SettingsChanged {
        settings: Settings,
        at: DateTime<Utc>,
    },
    ThemeChanged {
        dark_mode: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        running: bool,
        remaining_ms: u64,
        total_ms: u64,
        /// 0.0 .. 1.0 progress within the current interval.
        progress: f64,
        display: String,
        accessibility_label: String,
        session_count: u64,
        settings: Settings,
        at: DateTime<Utc>,
    },
}
