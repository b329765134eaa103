//! # Pomodoro Core Library
//!
//! This library provides the core logic for a Pomodoro countdown timer that
//! alternates work and break intervals. Shells (the CLI here, a mobile or web
//! UI elsewhere) own presentation and platform APIs; everything with an
//! invariant lives in this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine. Commands take the
//!   current time and return a [`Transition`] describing the side effects
//!   the caller must perform, so the engine never touches a platform API
//! - **Adapter**: [`PomodoroApp`] loads persisted state, timestamps intents
//!   and executes effects against the [`providers`]
//! - **Ticker**: A single periodic driver that wakes the shell to call `tick()`
//! - **Storage**: SQLite key-value persistence and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`PomodoroApp`]: Effect-executing adapter
//! - [`Database`]: Key-value persistence
//! - [`Config`]: Application configuration management

pub mod app;
pub mod clock;
pub mod effects;
pub mod error;
pub mod events;
pub mod providers;
pub mod storage;
pub mod timer;

pub use app::PomodoroApp;
pub use clock::{Clock, ManualClock, SystemClock};
pub use effects::{Effect, FeedbackCue, NotificationRequest, Transition};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use providers::{FeedbackProvider, KeyValueStore, NotificationProvider};
pub use storage::{Config, Database, StorageKeys};
pub use timer::{format_clock, Adjustment, Mode, SettingField, Settings, Tick, Ticker, TimerEngine};
