use clap::Subcommand;
use pomodoro_core::{Config, Database};
use serde_json::json;

use super::open_app;

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
}

pub fn run(action: ThemeAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut app = open_app(&db, config, (), ());

    if let ThemeAction::Toggle = action {
        app.toggle_dark_mode();
    }
    let theme = if app.dark_mode() { "dark" } else { "light" };
    println!("{}", serde_json::to_string_pretty(&json!({ "theme": theme }))?);
    Ok(())
}
