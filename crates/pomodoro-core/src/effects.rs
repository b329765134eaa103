//! Side-effect requests emitted by the timer engine.
//!
//! The engine never talks to a platform API. Each command returns a
//! [`Transition`] holding the lifecycle event (if any) and the effects the
//! caller must carry out, in order.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clock::datetime_from_ms;
use crate::events::Event;
use crate::timer::{Mode, Settings};

/// Feedback cue for the haptic/audio provider.
///
/// Mobile providers map these to a medium impact, a selection tick and a
/// warning pattern respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCue {
    Start,
    Pause,
    Reset,
}

/// A completion alert to be delivered at an absolute time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub sound: bool,
    /// Epoch milliseconds at which the alert should fire.
    pub fire_at_ms: u64,
}

impl NotificationRequest {
    /// The alert announcing the end of a `mode` interval.
    pub fn for_mode(mode: Mode, fire_at_ms: u64, sound: bool) -> Self {
        Self {
            title: mode.notification_title().to_string(),
            body: mode.notification_body().to_string(),
            sound,
            fire_at_ms,
        }
    }

    pub fn fire_at(&self) -> DateTime<Utc> {
        datetime_from_ms(self.fire_at_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Drop every pending notification.
    CancelNotifications,
    /// Schedule the single pending completion notification.
    ScheduleNotification { request: NotificationRequest },
    Feedback { cue: FeedbackCue },
    PersistSettings { settings: Settings },
    PersistSessionCount { count: u64 },
    /// Start the periodic tick driver, replacing any existing one.
    ArmTicker,
    /// Stop the periodic tick driver.
    DisarmTicker,
}

/// Result of one engine command.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transition {
    pub event: Option<Event>,
    pub effects: Vec<Effect>,
}

impl Transition {
    /// A command that changed nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(event: Event) -> Self {
        Self {
            event: Some(event),
            effects: Vec::new(),
        }
    }

    pub fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_if(self, condition: bool, effect: Effect) -> Self {
        if condition {
            self.with(effect)
        } else {
            self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.event.is_none() && self.effects.is_empty()
    }

    /// The notification scheduled by this transition, if any.
    pub fn scheduled_notification(&self) -> Option<&NotificationRequest> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::ScheduleNotification { request } => Some(request),
            _ => None,
        })
    }

    pub fn contains(&self, effect: &Effect) -> bool {
        self.effects.contains(effect)
    }
}
