//! Platform collaborators the adapter drives.
//!
//! Each trait is the narrow surface a shell must supply: a string key-value
//! store, a notification scheduler and a feedback sink. The unit type
//! implements the notification and feedback traits as silent no-ops.

use crate::effects::{FeedbackCue, NotificationRequest};
use crate::error::Result;

/// String-valued persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Delivers completion alerts while the shell is not in the foreground.
pub trait NotificationProvider {
    /// Ask the platform for permission. Returns whether alerts may be shown.
    fn request_permission(&mut self) -> bool {
        true
    }

    /// Drop every pending alert.
    fn cancel_all(&mut self) -> Result<()>;

    /// Schedule one alert at `request.fire_at_ms`.
    fn schedule_at(&mut self, request: &NotificationRequest) -> Result<()>;
}

/// Fire-and-forget haptic or audio cue.
pub trait FeedbackProvider {
    fn signal(&mut self, cue: FeedbackCue);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

impl NotificationProvider for () {
    fn cancel_all(&mut self) -> Result<()> {
        Ok(())
    }

    fn schedule_at(&mut self, _request: &NotificationRequest) -> Result<()> {
        Ok(())
    }
}

impl FeedbackProvider for () {
    fn signal(&mut self, _cue: FeedbackCue) {}
}
