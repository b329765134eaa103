//! User-adjustable timer settings.
//!
//! Settings are persisted as a JSON blob under a single key. Loading is
//! lenient: every field falls back to its default on its own, so a blob with
//! one bad value still keeps the others. Blobs written by older drivers use
//! `workMin`, `breakMin` and `vibEnabled`, which are accepted as aliases.

use serde::Serialize;
use serde_json::{Map, Value};

use super::mode::Mode;

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
pub const MIN_MINUTES: u32 = 1;

const MS_PER_MINUTE: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    work_minutes: u32,
    break_minutes: u32,
    sound_enabled: bool,
    vibration_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            sound_enabled: false,
            vibration_enabled: true,
        }
    }
}

impl Settings {
    /// Build settings, clamping both durations to at least one minute.
    pub fn new(
        work_minutes: u32,
        break_minutes: u32,
        sound_enabled: bool,
        vibration_enabled: bool,
    ) -> Self {
        Self {
            work_minutes: work_minutes.max(MIN_MINUTES),
            break_minutes: break_minutes.max(MIN_MINUTES),
            sound_enabled,
            vibration_enabled,
        }
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn vibration_enabled(&self) -> bool {
        self.vibration_enabled
    }

    /// Interval length for `mode` in milliseconds.
    pub fn duration_ms(&self, mode: Mode) -> u64 {
        let minutes = match mode {
            Mode::Work => self.work_minutes,
            Mode::Break => self.break_minutes,
        };
        u64::from(minutes) * MS_PER_MINUTE
    }

    /// Apply a one-minute adjustment and return the new value.
    pub fn adjust(&mut self, field: SettingField, adjustment: Adjustment) -> u32 {
        let slot = match field {
            SettingField::WorkMinutes => &mut self.work_minutes,
            SettingField::BreakMinutes => &mut self.break_minutes,
        };
        *slot = adjustment.apply(*slot);
        *slot
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    pub fn toggle_vibration(&mut self) -> bool {
        self.vibration_enabled = !self.vibration_enabled;
        self.vibration_enabled
    }

    /// Serialize to the persisted JSON blob.
    pub fn to_json(&self) -> String {
        // Four scalar fields; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse a persisted blob, falling back field by field to defaults.
    ///
    /// Never fails: a missing blob, invalid JSON or a non-object value all
    /// produce [`Settings::default`].
    pub fn from_stored(raw: Option<&str>) -> Self {
        let defaults = Self::default();
        let Some(raw) = raw else {
            return defaults;
        };
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "stored settings are not valid JSON, using defaults");
                return defaults;
            }
        };
        let Some(obj) = value.as_object() else {
            tracing::debug!("stored settings are not an object, using defaults");
            return defaults;
        };

        Self {
            work_minutes: read_minutes(obj, &["workMinutes", "workMin"])
                .unwrap_or(defaults.work_minutes),
            break_minutes: read_minutes(obj, &["breakMinutes", "breakMin"])
                .unwrap_or(defaults.break_minutes),
            sound_enabled: read_bool(obj, &["soundEnabled"]).unwrap_or(defaults.sound_enabled),
            vibration_enabled: read_bool(obj, &["vibrationEnabled", "vibEnabled"])
                .unwrap_or(defaults.vibration_enabled),
        }
    }
}

fn read_minutes(obj: &Map<String, Value>, keys: &[&str]) -> Option<u32> {
    keys.iter()
        .find_map(|key| obj.get(*key))
        .and_then(Value::as_u64)
        .filter(|&n| n >= u64::from(MIN_MINUTES))
        .and_then(|n| u32::try_from(n).ok())
}

fn read_bool(obj: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|key| obj.get(*key)).and_then(Value::as_bool)
}

/// A duration setting the user can adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingField {
    WorkMinutes,
    BreakMinutes,
}

impl SettingField {
    /// The mode whose duration this field controls.
    pub fn mode(self) -> Mode {
        match self {
            SettingField::WorkMinutes => Mode::Work,
            SettingField::BreakMinutes => Mode::Break,
        }
    }
}

/// One-minute step applied by an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    Increment,
    Decrement,
}

impl Adjustment {
    fn apply(self, minutes: u32) -> u32 {
        match self {
            Adjustment::Increment => minutes.saturating_add(1),
            Adjustment::Decrement => minutes.saturating_sub(1),
        }
        .max(MIN_MINUTES)
    }
}
