//! Line-oriented presentation shell for `pomodoro timer run`.

use std::io::Write;
use std::str::FromStr;

use pomodoro_core::{
    format_clock, Adjustment, Clock, Event, FeedbackProvider, KeyValueStore, Mode,
    NotificationProvider, PomodoroApp, SettingField, Transition,
};

pub const HELP: &str = "\
commands: <enter>/t start-or-pause  s start  p pause  r reset
          w+ w- b+ b-  adjust work/break minutes
          work break m  switch mode
          sound vib dark  toggles
          status help q";

/// One user intent typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    StartOrPause,
    Start,
    Pause,
    Reset,
    Adjust(SettingField, Adjustment),
    SwitchTo(Mode),
    SwitchOther,
    ToggleSound,
    ToggleVibration,
    ToggleDark,
    Status,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Adjustment::{Decrement, Increment};
        use SettingField::{BreakMinutes, WorkMinutes};

        let cmd = match s.trim().to_ascii_lowercase().as_str() {
            "" | "t" | "toggle" => ShellCommand::StartOrPause,
            "s" | "start" => ShellCommand::Start,
            "p" | "pause" => ShellCommand::Pause,
            "r" | "reset" => ShellCommand::Reset,
            "w+" => ShellCommand::Adjust(WorkMinutes, Increment),
            "w-" => ShellCommand::Adjust(WorkMinutes, Decrement),
            "b+" => ShellCommand::Adjust(BreakMinutes, Increment),
            "b-" => ShellCommand::Adjust(BreakMinutes, Decrement),
            "work" => ShellCommand::SwitchTo(Mode::Work),
            "break" => ShellCommand::SwitchTo(Mode::Break),
            "m" | "switch" => ShellCommand::SwitchOther,
            "sound" => ShellCommand::ToggleSound,
            "vib" | "vibration" => ShellCommand::ToggleVibration,
            "dark" | "theme" => ShellCommand::ToggleDark,
            "status" => ShellCommand::Status,
            "h" | "help" | "?" => ShellCommand::Help,
            "q" | "quit" | "exit" => ShellCommand::Quit,
            other => return Err(format!("unknown command: {other} (type 'help')")),
        };
        Ok(cmd)
    }
}

impl ShellCommand {
    /// Forward the intent to the app. `Status`, `Help` and `Quit` are
    /// handled by the shell and change nothing here.
    pub fn dispatch<S, N, F, C>(self, app: &mut PomodoroApp<S, N, F, C>) -> Transition
    where
        S: KeyValueStore,
        N: NotificationProvider,
        F: FeedbackProvider,
        C: Clock,
    {
        match self {
            ShellCommand::StartOrPause if app.engine().is_running() => app.pause(),
            ShellCommand::StartOrPause | ShellCommand::Start => app.start(),
            ShellCommand::Pause => app.pause(),
            ShellCommand::Reset => app.reset(),
            ShellCommand::Adjust(field, adjustment) => app.adjust_setting(field, adjustment),
            ShellCommand::SwitchTo(mode) => app.switch_mode(mode),
            ShellCommand::SwitchOther => {
                let next = app.engine().mode().other();
                app.switch_mode(next)
            }
            ShellCommand::ToggleSound => app.toggle_sound(),
            ShellCommand::ToggleVibration => app.toggle_vibration(),
            ShellCommand::ToggleDark => app.toggle_dark_mode(),
            ShellCommand::Status | ShellCommand::Help | ShellCommand::Quit => Transition::none(),
        }
    }
}

/// Single status line, redrawn only when its text changes.
#[derive(Default)]
pub struct View {
    last: Option<String>,
}

impl View {
    pub fn status_line<S, N, F, C>(app: &PomodoroApp<S, N, F, C>) -> String
    where
        S: KeyValueStore,
        N: NotificationProvider,
        F: FeedbackProvider,
        C: Clock,
    {
        let engine = app.engine();
        let settings = engine.settings();
        let state = if engine.is_running() { "running" } else { "paused" };
        format!(
            "{:<5} {}  {:<7}  Sessions {}  work {}m break {}m  sound {} vib {}  {}",
            engine.mode().label(),
            format_clock(engine.remaining_at(app.now_ms())),
            state,
            engine.session_count(),
            settings.work_minutes(),
            settings.break_minutes(),
            on_off(settings.sound_enabled()),
            on_off(settings.vibration_enabled()),
            if app.dark_mode() { "dark" } else { "light" },
        )
    }

    pub fn render<S, N, F, C>(&mut self, app: &PomodoroApp<S, N, F, C>)
    where
        S: KeyValueStore,
        N: NotificationProvider,
        F: FeedbackProvider,
        C: Clock,
    {
        let line = Self::status_line(app);
        if self.last.as_deref() == Some(line.as_str()) {
            return;
        }
        print!("\r\x1b[2K{line}");
        let _ = std::io::stdout().flush();
        self.last = Some(line);
    }

    /// Print lifecycle events that deserve their own line.
    pub fn report(&mut self, transition: &Transition) {
        if let Some(Event::TimerCompleted {
            completed,
            next,
            session_count,
            ..
        }) = &transition.event
        {
            println!(
                "\n{completed} interval complete. Sessions: {session_count}. Up next: {next}."
            );
            self.last = None;
        }
    }

    /// Force the next render to print even if nothing changed.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomodoro_core::{Database, ManualClock, StorageKeys};

    fn app<'a>(
        db: &'a Database,
        clock: &ManualClock,
    ) -> PomodoroApp<&'a Database, (), (), ManualClock> {
        PomodoroApp::open(db, (), (), clock.clone(), StorageKeys::default())
    }

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!("s".parse::<ShellCommand>(), Ok(ShellCommand::Start));
        assert_eq!(" Pause ".parse::<ShellCommand>(), Ok(ShellCommand::Pause));
        assert_eq!("".parse::<ShellCommand>(), Ok(ShellCommand::StartOrPause));
        assert_eq!(
            "w-".parse::<ShellCommand>(),
            Ok(ShellCommand::Adjust(SettingField::WorkMinutes, Adjustment::Decrement))
        );
        assert_eq!("break".parse::<ShellCommand>(), Ok(ShellCommand::SwitchTo(Mode::Break)));
        assert_eq!("q".parse::<ShellCommand>(), Ok(ShellCommand::Quit));
        assert!("launch".parse::<ShellCommand>().is_err());
    }

    #[test]
    fn start_or_pause_follows_running_state() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::new(0);
        let mut app = app(&db, &clock);

        ShellCommand::StartOrPause.dispatch(&mut app);
        assert!(app.engine().is_running());
        clock.advance(1_000);
        ShellCommand::StartOrPause.dispatch(&mut app);
        assert!(!app.engine().is_running());
        assert_eq!(app.engine().remaining_ms(), 25 * 60_000 - 1_000);
    }

    #[test]
    fn switch_other_flips_mode() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::new(0);
        let mut app = app(&db, &clock);
        ShellCommand::SwitchOther.dispatch(&mut app);
        assert_eq!(app.engine().mode(), Mode::Break);
        assert_eq!(app.engine().remaining_ms(), 5 * 60_000);
    }

    #[test]
    fn completion_report_forces_redraw() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::new(0);
        let mut app = app(&db, &clock);
        let mut view = View::default();

        view.render(&app);
        assert!(view.last.is_some());
        app.start();
        clock.advance(25 * 60_000);
        view.report(&app.tick());
        assert!(view.last.is_none());
    }

    #[test]
    fn status_line_shows_mode_clock_and_count() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::new(0);
        let mut app = app(&db, &clock);
        app.start();
        clock.advance(61_000);
        let line = View::status_line(&app);
        assert!(line.starts_with("Work  23:59  running"), "{line}");
        assert!(line.contains("Sessions 0"));
        assert!(line.ends_with("light"));
    }
}
