use clap::Subcommand;
use pomodoro_core::{Config, Database, Mode, Ticker};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::open_app;
use crate::shell::{ShellCommand, View, HELP};
use crate::terminal::{TerminalFeedback, TerminalNotifier};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run an interactive timer session in the foreground
    Run {
        /// Mode to begin in
        #[arg(long, default_value = "work")]
        mode: Mode,
        /// Start the countdown immediately
        #[arg(long)]
        start: bool,
    },
    /// Print the state a fresh session starts from as JSON
    Status,
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run { mode, start } => run_session(config, mode, start),
        TimerAction::Status => {
            let db = Database::open()?;
            let app = open_app(&db, config, (), ());
            println!("{}", serde_json::to_string_pretty(&app.snapshot())?);
            Ok(())
        }
    }
}

fn run_session(
    config: &Config,
    mode: Mode,
    autostart: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let notifier = TerminalNotifier::new(config.notifications.enabled);
        let mut app = open_app(&db, config, notifier, TerminalFeedback);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new(config.timer.tick_interval(), tx);
        let mut view = View::default();

        app.switch_mode(mode);
        if autostart {
            ticker.apply(&app.start());
        }

        println!("{HELP}");
        view.render(&app);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                Some(tick) = rx.recv() => {
                    if !ticker.is_current(tick) {
                        continue;
                    }
                    let transition = app.tick();
                    ticker.apply(&transition);
                    view.report(&transition);
                    view.render(&app);
                }
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    let command = match line.parse::<ShellCommand>() {
                        Ok(command) => command,
                        Err(e) => {
                            println!("\n{e}");
                            view.invalidate();
                            view.render(&app);
                            continue;
                        }
                    };

                    // Catch up first, as a foregrounded app would.
                    let caught_up = app.tick();
                    ticker.apply(&caught_up);
                    view.report(&caught_up);

                    match command {
                        ShellCommand::Quit => break,
                        ShellCommand::Help => println!("\n{HELP}"),
                        ShellCommand::Status => {
                            println!("\n{}", serde_json::to_string_pretty(&app.snapshot())?);
                        }
                        command => {
                            let transition = command.dispatch(&mut app);
                            ticker.apply(&transition);
                            view.report(&transition);
                        }
                    }
                    view.invalidate();
                    view.render(&app);
                }
            }
        }

        ticker.disarm();
        println!();
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
