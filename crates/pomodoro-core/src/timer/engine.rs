//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads or read a clock: every command takes `now` in epoch
//! milliseconds and the caller is responsible for calling `tick()` whenever
//! it wakes up. Remaining time while running is derived from an absolute
//! target, so irregular or missed ticks never cause drift.
//!
//! ## State Transitions
//!
//! ```text
//! Idle-Work  --start-->  Running-Work  --tick to zero-->  Idle-Break (sessions + 1)
//! Idle-Break --start-->  Running-Break --tick to zero-->  Idle-Work
//! Running-*  --pause-->  Idle-* (frozen remaining)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Settings::default(), 0);
//! let transition = engine.start(now_ms);
//! // execute transition.effects, then in a loop:
//! engine.tick(now_ms);
//! ```

use serde::Serialize;

use super::mode::{format_clock, Mode};
use super::settings::{Adjustment, SettingField, Settings};
use crate::clock::datetime_from_ms;
use crate::effects::{Effect, FeedbackCue, NotificationRequest, Transition};
use crate::events::Event;

/// Core timer engine.
///
/// `target_ms` is `Some` exactly while the timer is running, which is the
/// only representation of "running".
#[derive(Debug, Clone, Serialize)]
pub struct TimerEngine {
    settings: Settings,
    mode: Mode,
    /// Authoritative while idle; last derived value while running.
    remaining_ms: u64,
    /// Epoch milliseconds at which the running interval ends.
    target_ms: Option<u64>,
    session_count: u64,
}

impl TimerEngine {
    /// Create an engine idle in work mode with a full work interval.
    pub fn new(settings: Settings, session_count: u64) -> Self {
        Self {
            settings,
            mode: Mode::Work,
            remaining_ms: settings.duration_ms(Mode::Work),
            target_ms: None,
            session_count,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.target_ms.is_some()
    }

    /// Remaining time as of the last command.
    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Remaining time as of `now`, derived from the target while running.
    pub fn remaining_at(&self, now: u64) -> u64 {
        match self.target_ms {
            Some(target) => target.saturating_sub(now),
            None => self.remaining_ms,
        }
    }

    pub fn target_ms(&self) -> Option<u64> {
        self.target_ms
    }

    pub fn session_count(&self) -> u64 {
        self.session_count
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn duration_of(&self, mode: Mode) -> u64 {
        self.settings.duration_ms(mode)
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self, now: u64) -> f64 {
        let total = self.duration_of(self.mode);
        if total == 0 {
            return 0.0;
        }
        let remaining = self.remaining_at(now).min(total);
        1.0 - (remaining as f64 / total as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: u64) -> Event {
        let remaining_ms = self.remaining_at(now);
        Event::StateSnapshot {
            mode: self.mode,
            running: self.is_running(),
            remaining_ms,
            total_ms: self.duration_of(self.mode),
            progress: self.progress(now),
            display: format_clock(remaining_ms),
            accessibility_label: self.mode.accessibility_label().to_string(),
            session_count: self.session_count,
            settings: self.settings,
            at: datetime_from_ms(now),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start counting down from the current remaining time.
    ///
    /// Starting a running timer is a no-op.
    pub fn start(&mut self, now: u64) -> Transition {
        if self.is_running() {
            return Transition::none();
        }
        let target = now.saturating_add(self.remaining_ms);
        self.target_ms = Some(target);

        tracing::debug!(mode = %self.mode, remaining_ms = self.remaining_ms, "timer started");
        Transition::new(Event::TimerStarted {
            mode: self.mode,
            remaining_ms: self.remaining_ms,
            fire_at: datetime_from_ms(target),
            at: datetime_from_ms(now),
        })
        .with(Effect::CancelNotifications)
        .with(Effect::ScheduleNotification {
            request: self.notification_for(target),
        })
        .with_if(self.vibration(), Effect::Feedback { cue: FeedbackCue::Start })
        .with(Effect::ArmTicker)
    }

    /// Freeze the countdown. Pausing an idle timer is a no-op.
    pub fn pause(&mut self, now: u64) -> Transition {
        let Some(target) = self.target_ms else {
            return Transition::none();
        };
        self.remaining_ms = target.saturating_sub(now);
        self.target_ms = None;

        tracing::debug!(mode = %self.mode, remaining_ms = self.remaining_ms, "timer paused");
        Transition::new(Event::TimerPaused {
            mode: self.mode,
            remaining_ms: self.remaining_ms,
            at: datetime_from_ms(now),
        })
        .with(Effect::CancelNotifications)
        .with_if(self.vibration(), Effect::Feedback { cue: FeedbackCue::Pause })
        .with(Effect::DisarmTicker)
    }

    /// Stop and restore the full duration of the current mode.
    pub fn reset(&mut self, now: u64) -> Transition {
        self.target_ms = None;
        self.remaining_ms = self.duration_of(self.mode);

        tracing::debug!(mode = %self.mode, "timer reset");
        Transition::new(Event::TimerReset {
            mode: self.mode,
            remaining_ms: self.remaining_ms,
            at: datetime_from_ms(now),
        })
        .with(Effect::CancelNotifications)
        .with_if(self.vibration(), Effect::Feedback { cue: FeedbackCue::Reset })
        .with(Effect::DisarmTicker)
    }

    /// Recompute remaining time. Completes the interval when it reaches zero.
    ///
    /// Safe to call at any frequency: one late call produces the same end
    /// state as many punctual ones. A no-op while idle.
    pub fn tick(&mut self, now: u64) -> Transition {
        let Some(target) = self.target_ms else {
            return Transition::none();
        };
        self.remaining_ms = target.saturating_sub(now);
        if self.remaining_ms > 0 {
            return Transition::none();
        }
        self.target_ms = None;
        self.complete(now)
    }

    /// Change a duration by one minute, never below one minute.
    ///
    /// An idle timer showing the adjusted mode picks up the new duration
    /// immediately. A running countdown is left alone so its scheduled
    /// notification stays valid.
    pub fn adjust_setting(
        &mut self,
        field: SettingField,
        adjustment: Adjustment,
        now: u64,
    ) -> Transition {
        let minutes = self.settings.adjust(field, adjustment);
        if !self.is_running() && field.mode() == self.mode {
            self.remaining_ms = self.duration_of(self.mode);
        }

        tracing::debug!(?field, minutes, "setting adjusted");
        self.settings_changed(now)
    }

    pub fn toggle_sound(&mut self, now: u64) -> Transition {
        self.settings.toggle_sound();
        self.settings_changed(now)
    }

    pub fn toggle_vibration(&mut self, now: u64) -> Transition {
        self.settings.toggle_vibration();
        self.settings_changed(now)
    }

    /// Manually select a mode.
    ///
    /// While idle the remaining time becomes the new mode's full duration.
    /// While running the countdown keeps its target, and the pending
    /// notification is re-issued for the same instant with the new mode's
    /// text so the label and the alert agree.
    pub fn switch_mode(&mut self, mode: Mode, now: u64) -> Transition {
        if mode == self.mode {
            return Transition::none();
        }
        self.mode = mode;

        let mut effects = Vec::new();
        match self.target_ms {
            None => self.remaining_ms = self.duration_of(mode),
            Some(target) => {
                effects.push(Effect::CancelNotifications);
                effects.push(Effect::ScheduleNotification {
                    request: self.notification_for(target),
                });
            }
        }

        tracing::debug!(%mode, running = self.is_running(), "mode switched");
        Transition {
            event: Some(Event::ModeSwitched {
                mode,
                running: self.is_running(),
                remaining_ms: self.remaining_at(now),
                at: datetime_from_ms(now),
            }),
            effects,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// The single completion path. Called by `tick` once the target passes.
    fn complete(&mut self, now: u64) -> Transition {
        let completed = self.mode;
        let mut effects = vec![Effect::DisarmTicker];
        if completed == Mode::Work {
            self.session_count += 1;
            effects.push(Effect::PersistSessionCount {
                count: self.session_count,
            });
        }
        self.mode = completed.other();
        self.remaining_ms = self.duration_of(self.mode);

        tracing::debug!(%completed, sessions = self.session_count, "interval completed");
        Transition {
            event: Some(Event::TimerCompleted {
                completed,
                next: self.mode,
                session_count: self.session_count,
                at: datetime_from_ms(now),
            }),
            effects,
        }
    }

    fn settings_changed(&self, now: u64) -> Transition {
        Transition::new(Event::SettingsChanged {
            settings: self.settings,
            at: datetime_from_ms(now),
        })
        .with(Effect::PersistSettings {
            settings: self.settings,
        })
    }

    fn notification_for(&self, fire_at_ms: u64) -> NotificationRequest {
        NotificationRequest::for_mode(self.mode, fire_at_ms, self.settings.sound_enabled())
    }

    fn vibration(&self) -> bool {
        self.settings.vibration_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: u64 = 60_000;

    fn engine() -> TimerEngine {
        TimerEngine::new(Settings::default(), 0)
    }

    #[test]
    fn starts_idle_in_work_mode() {
        let engine = engine();
        assert_eq!(engine.mode(), Mode::Work);
        assert!(!engine.is_running());
        assert_eq!(engine.remaining_ms(), 25 * MIN);
        assert_eq!(engine.target_ms(), None);
    }

    #[test]
    fn start_sets_target_and_schedules_notification() {
        let mut engine = engine();
        let t = engine.start(1_000);
        assert!(engine.is_running());
        assert_eq!(engine.target_ms(), Some(1_000 + 25 * MIN));
        assert_eq!(t.effects[0], Effect::CancelNotifications);
        let request = t.scheduled_notification().unwrap();
        assert_eq!(request.fire_at_ms, 1_000 + 25 * MIN);
        assert_eq!(request.title, "Work complete");
        assert!(!request.sound);
        assert!(t.contains(&Effect::Feedback { cue: FeedbackCue::Start }));
        assert!(t.contains(&Effect::ArmTicker));
    }

    #[test]
    fn start_while_running_is_a_noop() {
        let mut engine = engine();
        engine.start(0);
        let t = engine.start(5_000);
        assert!(t.is_empty());
        assert_eq!(engine.target_ms(), Some(25 * MIN));
    }

    #[test]
    fn restart_schedules_for_current_remaining_time() {
        let mut engine = engine();
        engine.start(0);
        engine.pause(10 * MIN);
        let t = engine.start(20 * MIN);
        assert_eq!(t.scheduled_notification().unwrap().fire_at_ms, 35 * MIN);
    }

    #[test]
    fn pause_freezes_remaining_and_cancels() {
        let mut engine = engine();
        engine.start(0);
        let t = engine.pause(90_000);
        assert!(!engine.is_running());
        assert_eq!(engine.remaining_ms(), 25 * MIN - 90_000);
        assert!(t.contains(&Effect::CancelNotifications));
        assert!(t.contains(&Effect::Feedback { cue: FeedbackCue::Pause }));
        assert!(t.contains(&Effect::DisarmTicker));
        assert_eq!(engine.remaining_at(10 * MIN), 25 * MIN - 90_000);
    }

    #[test]
    fn pause_twice_equals_pause_once() {
        let mut engine = engine();
        engine.start(0);
        engine.pause(5_000);
        let once = format!("{engine:?}");
        let t = engine.pause(9_000);
        assert!(t.is_empty());
        assert_eq!(format!("{engine:?}"), once);
    }

    #[test]
    fn reset_restores_full_duration() {
        let mut engine = engine();
        engine.start(0);
        engine.tick(3 * MIN);
        let t = engine.reset(3 * MIN);
        assert!(!engine.is_running());
        assert_eq!(engine.remaining_ms(), 25 * MIN);
        assert!(t.contains(&Effect::CancelNotifications));
        assert!(t.contains(&Effect::Feedback { cue: FeedbackCue::Reset }));
    }

    #[test]
    fn feedback_suppressed_when_vibration_disabled() {
        let mut engine = TimerEngine::new(Settings::new(25, 5, false, false), 0);
        let started = engine.start(0);
        let paused = engine.pause(1);
        let reset = engine.reset(2);
        for t in [started, paused, reset] {
            assert!(!t
                .effects
                .iter()
                .any(|e| matches!(e, Effect::Feedback { .. })));
        }
    }

    #[test]
    fn tick_derives_remaining_from_target() {
        let mut engine = engine();
        engine.start(0);
        let t = engine.tick(MIN);
        assert!(t.is_empty());
        assert_eq!(engine.remaining_ms(), 24 * MIN);
    }

    #[test]
    fn tick_while_idle_is_a_noop() {
        let mut engine = engine();
        assert!(engine.tick(99 * MIN).is_empty());
        assert_eq!(engine.remaining_ms(), 25 * MIN);
    }

    #[test]
    fn work_completion_flips_mode_and_counts_session() {
        let mut engine = engine();
        engine.start(0);
        engine.tick(MIN);
        let t = engine.tick(25 * MIN);
        assert!(!engine.is_running());
        assert_eq!(engine.mode(), Mode::Break);
        assert_eq!(engine.remaining_ms(), 5 * MIN);
        assert_eq!(engine.session_count(), 1);
        assert!(t.contains(&Effect::PersistSessionCount { count: 1 }));
        assert!(t.contains(&Effect::DisarmTicker));
        match t.event {
            Some(Event::TimerCompleted {
                completed, next, ..
            }) => {
                assert_eq!(completed, Mode::Work);
                assert_eq!(next, Mode::Break);
            }
            other => panic!("Expected TimerCompleted, got {other:?}"),
        }
    }

    #[test]
    fn break_completion_does_not_count() {
        let mut engine = TimerEngine::new(Settings::default(), 7);
        engine.switch_mode(Mode::Break, 0);
        engine.start(0);
        let t = engine.tick(5 * MIN);
        assert_eq!(engine.mode(), Mode::Work);
        assert_eq!(engine.session_count(), 7);
        assert_eq!(engine.remaining_ms(), 25 * MIN);
        assert!(!t
            .effects
            .iter()
            .any(|e| matches!(e, Effect::PersistSessionCount { .. })));
    }

    #[test]
    fn completion_fires_once() {
        let mut engine = engine();
        engine.start(0);
        assert!(engine.tick(30 * MIN).event.is_some());
        assert!(engine.tick(31 * MIN).is_empty());
        assert_eq!(engine.session_count(), 1);
    }

    #[test]
    fn late_tick_matches_regular_ticks() {
        let mut late = engine();
        let mut regular = engine();
        late.start(0);
        regular.start(0);

        late.tick(25 * MIN + 10_000);
        let mut now = 0;
        while regular.is_running() {
            now += 500;
            regular.tick(now);
        }

        assert_eq!(late.mode(), regular.mode());
        assert_eq!(late.remaining_ms(), regular.remaining_ms());
        assert_eq!(late.session_count(), regular.session_count());
        assert_eq!(late.is_running(), regular.is_running());
    }

    #[test]
    fn adjust_while_idle_updates_current_mode_only() {
        let mut engine = engine();
        let t = engine.adjust_setting(SettingField::WorkMinutes, Adjustment::Increment, 0);
        assert_eq!(engine.remaining_ms(), 26 * MIN);
        assert!(t.contains(&Effect::PersistSettings {
            settings: *engine.settings()
        }));

        engine.adjust_setting(SettingField::BreakMinutes, Adjustment::Decrement, 0);
        assert_eq!(engine.settings().break_minutes(), 4);
        assert_eq!(engine.remaining_ms(), 26 * MIN);
    }

    #[test]
    fn adjust_while_running_leaves_countdown() {
        let mut engine = engine();
        engine.start(0);
        engine.adjust_setting(SettingField::WorkMinutes, Adjustment::Decrement, MIN);
        assert_eq!(engine.settings().work_minutes(), 24);
        assert_eq!(engine.target_ms(), Some(25 * MIN));
        engine.tick(2 * MIN);
        assert_eq!(engine.remaining_ms(), 23 * MIN);
    }

    #[test]
    fn adjust_never_goes_below_one_minute() {
        let mut engine = TimerEngine::new(Settings::new(1, 5, false, true), 0);
        engine.adjust_setting(SettingField::WorkMinutes, Adjustment::Decrement, 0);
        engine.adjust_setting(SettingField::WorkMinutes, Adjustment::Decrement, 0);
        assert_eq!(engine.settings().work_minutes(), 1);
        assert_eq!(engine.remaining_ms(), MIN);
    }

    #[test]
    fn toggles_flip_and_persist() {
        let mut engine = engine();
        let t = engine.toggle_sound(0);
        assert!(engine.settings().sound_enabled());
        assert!(t.contains(&Effect::PersistSettings {
            settings: *engine.settings()
        }));
        engine.toggle_vibration(0);
        assert!(!engine.settings().vibration_enabled());
    }

    #[test]
    fn switch_mode_while_idle_loads_new_duration() {
        let mut engine = engine();
        engine.start(0);
        engine.pause(MIN);
        let t = engine.switch_mode(Mode::Break, MIN);
        assert_eq!(engine.mode(), Mode::Break);
        assert_eq!(engine.remaining_ms(), 5 * MIN);
        assert!(t.effects.is_empty());
        match t.event {
            Some(Event::ModeSwitched { remaining_ms, .. }) => assert_eq!(remaining_ms, 5 * MIN),
            other => panic!("Expected ModeSwitched, got {other:?}"),
        }
    }

    #[test]
    fn switch_mode_while_running_reissues_notification() {
        let mut engine = engine();
        engine.start(0);
        let t = engine.switch_mode(Mode::Break, MIN);
        assert!(engine.is_running());
        assert_eq!(engine.target_ms(), Some(25 * MIN));
        assert_eq!(t.effects[0], Effect::CancelNotifications);
        let request = t.scheduled_notification().unwrap();
        assert_eq!(request.fire_at_ms, 25 * MIN);
        assert_eq!(request.title, "Break complete");

        engine.tick(25 * MIN);
        assert_eq!(engine.mode(), Mode::Work);
        assert_eq!(engine.session_count(), 0);
    }

    #[test]
    fn switch_to_same_mode_is_a_noop() {
        let mut engine = engine();
        assert!(engine.switch_mode(Mode::Work, 0).is_empty());
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let mut engine = engine();
        engine.start(0);
        match engine.snapshot(60_500) {
            Event::StateSnapshot {
                mode,
                running,
                remaining_ms,
                display,
                accessibility_label,
                ..
            } => {
                assert_eq!(mode, Mode::Work);
                assert!(running);
                assert_eq!(remaining_ms, 24 * MIN - 500);
                assert_eq!(display, "23:59");
                assert_eq!(accessibility_label, "Work timer");
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut engine = TimerEngine::new(Settings::new(10, 5, false, true), 0);
        assert_eq!(engine.progress(0), 0.0);
        engine.start(0);
        assert!((engine.progress(5 * MIN) - 0.5).abs() < 1e-9);
    }
}
