use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which of the two interval types is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Work,
    Break,
}

impl Mode {
    /// The mode that follows this one when an interval completes.
    pub fn other(self) -> Self {
        match self {
            Mode::Work => Mode::Break,
            Mode::Break => Mode::Work,
        }
    }

    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Work => "Work",
            Mode::Break => "Break",
        }
    }

    /// Label exposed to assistive technology.
    pub fn accessibility_label(self) -> &'static str {
        match self {
            Mode::Work => "Work timer",
            Mode::Break => "Break timer",
        }
    }

    pub fn notification_title(self) -> &'static str {
        match self {
            Mode::Work => "Work complete",
            Mode::Break => "Break complete",
        }
    }

    pub fn notification_body(self) -> &'static str {
        match self {
            Mode::Work => "Time for a break",
            Mode::Break => "Back to work",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(Mode::Work),
            "break" => Ok(Mode::Break),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// Render milliseconds as `MM:SS`, flooring to whole seconds.
///
/// Minutes are not wrapped at 60, so a 90 minute interval shows `90:00`.
pub fn format_clock(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_flips_between_modes() {
        assert_eq!(Mode::Work.other(), Mode::Break);
        assert_eq!(Mode::Break.other(), Mode::Work);
    }

    #[test]
    fn notification_text_is_keyed_by_mode() {
        assert_eq!(Mode::Work.notification_title(), "Work complete");
        assert_eq!(Mode::Work.notification_body(), "Time for a break");
        assert_eq!(Mode::Break.notification_title(), "Break complete");
        assert_eq!(Mode::Break.notification_body(), "Back to work");
    }

    #[test]
    fn default_mode_is_work() {
        assert_eq!(Mode::default(), Mode::Work);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("WORK".parse::<Mode>().unwrap(), Mode::Work);
        assert_eq!(" break ".parse::<Mode>().unwrap(), Mode::Break);
        assert!("nap".parse::<Mode>().is_err());
    }

    #[test]
    fn format_clock_floors_partial_seconds() {
        assert_eq!(format_clock(25 * 60_000), "25:00");
        assert_eq!(format_clock(59_999), "00:59");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(90 * 60_000 + 5_000), "90:05");
    }
}
