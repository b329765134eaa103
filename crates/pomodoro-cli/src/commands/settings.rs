use clap::{Subcommand, ValueEnum};
use pomodoro_core::{Adjustment, Config, Database, SettingField};

use super::open_app;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print current settings as JSON
    Show,
    /// Change the work duration by one minute
    Work {
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Change the break duration by one minute
    Break {
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Toggle the notification sound
    Sound,
    /// Toggle vibration/feedback cues
    Vibration,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

impl From<Direction> for Adjustment {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Adjustment::Increment,
            Direction::Down => Adjustment::Decrement,
        }
    }
}

pub fn run(action: SettingsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut app = open_app(&db, config, (), ());

    match action {
        SettingsAction::Show => {}
        SettingsAction::Work { direction } => {
            app.adjust_setting(SettingField::WorkMinutes, direction.into());
        }
        SettingsAction::Break { direction } => {
            app.adjust_setting(SettingField::BreakMinutes, direction.into());
        }
        SettingsAction::Sound => {
            app.toggle_sound();
        }
        SettingsAction::Vibration => {
            app.toggle_vibration();
        }
    }

    println!("{}", serde_json::to_string_pretty(app.engine().settings())?);
    Ok(())
}
