mod engine;
mod mode;
mod settings;
mod ticker;

pub use engine::TimerEngine;
pub use mode::{format_clock, Mode};
pub use settings::{
    Adjustment, SettingField, Settings, DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES, MIN_MINUTES,
};
pub use ticker::{Tick, Ticker, DEFAULT_TICK_INTERVAL};
