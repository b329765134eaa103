pub mod config;
pub mod settings;
pub mod stats;
pub mod theme;
pub mod timer;

use pomodoro_core::{
    Config, Database, FeedbackProvider, NotificationProvider, PomodoroApp, SystemClock,
};

/// Open the app over the on-disk store with the given providers.
pub fn open_app<'a, N, F>(
    db: &'a Database,
    config: &Config,
    notifier: N,
    feedback: F,
) -> PomodoroApp<&'a Database, N, F, SystemClock>
where
    N: NotificationProvider,
    F: FeedbackProvider,
{
    PomodoroApp::open(db, notifier, feedback, SystemClock, config.storage.clone())
}
