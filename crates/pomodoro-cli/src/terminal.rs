//! Terminal stand-ins for the platform notification and feedback providers.

use std::io::Write;
use std::time::Duration;

use pomodoro_core::error::Result;
use pomodoro_core::{
    Clock, CoreError, FeedbackCue, FeedbackProvider, NotificationProvider, NotificationRequest,
    SystemClock,
};
use tokio::task::JoinHandle;

const BELL: &str = "\x07";

/// Prints the completion alert when its time comes.
///
/// Holds at most one pending alert as a sleeping task on the current tokio
/// runtime; scheduling replaces it and cancelling aborts it.
pub struct TerminalNotifier {
    enabled: bool,
    pending: Option<JoinHandle<()>>,
}

impl TerminalNotifier {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            pending: None,
        }
    }
}

impl NotificationProvider for TerminalNotifier {
    fn request_permission(&mut self) -> bool {
        self.enabled
    }

    fn cancel_all(&mut self) -> Result<()> {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
        Ok(())
    }

    fn schedule_at(&mut self, request: &NotificationRequest) -> Result<()> {
        let handle = tokio::runtime::Handle::try_current().map_err(|e| {
            CoreError::Notification {
                message: e.to_string(),
            }
        })?;
        self.cancel_all()?;

        let delay = request.fire_at_ms.saturating_sub(SystemClock.now_ms());
        let alert = request.clone();
        self.pending = Some(handle.spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            let bell = if alert.sound { BELL } else { "" };
            println!("\n{bell}** {}: {} **", alert.title, alert.body);
        }));
        tracing::debug!(fire_at = %request.fire_at(), "notification scheduled");
        Ok(())
    }
}

impl Drop for TerminalNotifier {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

/// Rings the terminal bell on start, pause and reset.
pub struct TerminalFeedback;

impl FeedbackProvider for TerminalFeedback {
    fn signal(&mut self, cue: FeedbackCue) {
        tracing::debug!(?cue, "feedback");
        print!("{BELL}");
        let _ = std::io::stdout().flush();
    }
}
