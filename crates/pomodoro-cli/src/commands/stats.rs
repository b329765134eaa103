use pomodoro_core::{Config, Database};
use serde_json::json;

use super::open_app;

pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let app = open_app(&db, config, (), ());
    let stats = json!({ "sessions": app.engine().session_count() });
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
