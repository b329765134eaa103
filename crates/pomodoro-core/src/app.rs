//! Adapter between the pure engine and the platform providers.
//!
//! [`PomodoroApp`] owns one [`TimerEngine`], loads persisted state once at
//! startup, stamps every user intent with the current time and carries out
//! the effects the engine returns. Provider failures are logged and
//! swallowed: the in-memory engine stays authoritative for the lifetime of
//! the process.
//!
//! Ticker effects are left to the shell, which owns the async runtime.

use crate::clock::{datetime_from_ms, Clock, SystemClock};
use crate::effects::{Effect, Transition};
use crate::events::Event;
use crate::providers::{FeedbackProvider, KeyValueStore, NotificationProvider};
use crate::storage::StorageKeys;
use crate::timer::{Adjustment, Mode, SettingField, Settings, TimerEngine};

pub struct PomodoroApp<S, N = (), F = (), C = SystemClock> {
    engine: TimerEngine,
    store: S,
    notifier: N,
    feedback: F,
    clock: C,
    keys: StorageKeys,
    dark_mode: bool,
    notifications_permitted: bool,
}

impl<S, N, F, C> PomodoroApp<S, N, F, C>
where
    S: KeyValueStore,
    N: NotificationProvider,
    F: FeedbackProvider,
    C: Clock,
{
    /// Load settings, session count and theme from `store` and request
    /// notification permission. Never fails: unreadable values fall back to
    /// their defaults.
    pub fn open(store: S, mut notifier: N, feedback: F, clock: C, keys: StorageKeys) -> Self {
        let settings = Settings::from_stored(read(&store, &keys.settings_key).as_deref());
        let session_count = parse_session_count(read(&store, &keys.counter_key).as_deref());
        let dark_mode = read(&store, &keys.theme_key).as_deref() == Some("1");

        let notifications_permitted = notifier.request_permission();
        if !notifications_permitted {
            tracing::info!("notification permission denied, completion alerts disabled");
        }

        tracing::debug!(?settings, session_count, dark_mode, "pomodoro state loaded");
        Self {
            engine: TimerEngine::new(settings, session_count),
            store,
            notifier,
            feedback,
            clock,
            keys,
            dark_mode,
            notifications_permitted,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot(self.clock.now_ms())
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn notifications_permitted(&self) -> bool {
        self.notifications_permitted
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    // ── Intents ──────────────────────────────────────────────────────

    pub fn start(&mut self) -> Transition {
        self.run(|engine, now| engine.start(now))
    }

    /// Freeze the countdown. An interval that already ran out completes
    /// instead, and that completion is returned.
    pub fn pause(&mut self) -> Transition {
        self.run_caught_up(|engine, now| engine.pause(now))
    }

    /// Restore the full duration of the current mode. An interval that
    /// already ran out completes instead, and that completion is returned.
    pub fn reset(&mut self) -> Transition {
        self.run_caught_up(|engine, now| engine.reset(now))
    }

    /// Bring the engine up to date. Call on every ticker wake-up and when
    /// the shell returns to the foreground.
    pub fn tick(&mut self) -> Transition {
        self.run(|engine, now| engine.tick(now))
    }

    pub fn adjust_setting(&mut self, field: SettingField, adjustment: Adjustment) -> Transition {
        self.run(|engine, now| engine.adjust_setting(field, adjustment, now))
    }

    pub fn toggle_sound(&mut self) -> Transition {
        self.run(|engine, now| engine.toggle_sound(now))
    }

    pub fn toggle_vibration(&mut self) -> Transition {
        self.run(|engine, now| engine.toggle_vibration(now))
    }

    pub fn switch_mode(&mut self, mode: Mode) -> Transition {
        self.run(|engine, now| engine.switch_mode(mode, now))
    }

    /// Flip the light/dark flag and persist it.
    pub fn toggle_dark_mode(&mut self) -> Transition {
        self.dark_mode = !self.dark_mode;
        let value = if self.dark_mode { "1" } else { "0" };
        if let Err(e) = self.store.set(&self.keys.theme_key, value) {
            tracing::warn!(error = %e, "failed to persist theme");
        }
        Transition::new(Event::ThemeChanged {
            dark_mode: self.dark_mode,
            at: datetime_from_ms(self.clock.now_ms()),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn run(&mut self, command: impl FnOnce(&mut TimerEngine, u64) -> Transition) -> Transition {
        let now = self.clock.now_ms();
        let transition = command(&mut self.engine, now);
        self.apply(&transition);
        transition
    }

    /// Run `command` only if a catch-up tick did not complete the interval.
    fn run_caught_up(
        &mut self,
        command: impl FnOnce(&mut TimerEngine, u64) -> Transition,
    ) -> Transition {
        let caught_up = self.tick();
        if caught_up.event.is_some() {
            return caught_up;
        }
        self.run(command)
    }

    fn apply(&mut self, transition: &Transition) {
        for effect in &transition.effects {
            match effect {
                Effect::CancelNotifications => {
                    if let Err(e) = self.notifier.cancel_all() {
                        tracing::warn!(error = %e, "failed to cancel notifications");
                    }
                }
                Effect::ScheduleNotification { request } => {
                    if !self.notifications_permitted {
                        tracing::debug!("notification not delivered, permission denied");
                        continue;
                    }
                    if let Err(e) = self.notifier.schedule_at(request) {
                        tracing::warn!(error = %e, "failed to schedule notification");
                    }
                }
                Effect::Feedback { cue } => self.feedback.signal(*cue),
                Effect::PersistSettings { settings } => {
                    if let Err(e) = self.store.set(&self.keys.settings_key, &settings.to_json()) {
                        tracing::warn!(error = %e, "failed to persist settings");
                    }
                }
                Effect::PersistSessionCount { count } => {
                    if let Err(e) = self.store.set(&self.keys.counter_key, &count.to_string()) {
                        tracing::warn!(error = %e, count, "failed to persist session count");
                    }
                }
                Effect::ArmTicker | Effect::DisarmTicker => {}
            }
        }
    }
}

/// Parse the persisted session counter; anything unreadable counts as zero.
pub fn parse_session_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0)
}

fn read<S: KeyValueStore>(store: &S, key: &str) -> Option<String> {
    store.get(key).unwrap_or_else(|e| {
        tracing::warn!(error = %e, key, "failed to read persisted value");
        None
    })
}
