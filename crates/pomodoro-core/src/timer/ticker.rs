//! Periodic tick driver.
//!
//! At most one driver task is alive per [`Ticker`]. Arming always tears the
//! previous task down first, and every tick carries the generation it was
//! armed with so ticks already queued by a stale task can be discarded.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::effects::{Effect, Transition};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// One wake-up from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
}

pub struct Ticker {
    period: Duration,
    tx: UnboundedSender<Tick>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new(period: Duration, tx: UnboundedSender<Tick>) -> Self {
        Self {
            period,
            tx,
            generation: 0,
            task: None,
        }
    }

    /// Spawn a fresh driver, replacing any existing one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self) {
        self.disarm();
        self.generation += 1;

        let tick = Tick {
            generation: self.generation,
        };
        let tx = self.tx.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            // After a suspension one catch-up tick is enough.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(tick).is_err() {
                    break;
                }
            }
        }));
        tracing::trace!(generation = self.generation, "ticker armed");
    }

    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::trace!(generation = self.generation, "ticker disarmed");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    /// Whether `tick` came from the live driver.
    pub fn is_current(&self, tick: Tick) -> bool {
        self.is_armed() && tick.generation == self.generation
    }

    /// Follow the arm/disarm requests of an engine transition.
    pub fn apply(&mut self, transition: &Transition) {
        for effect in &transition.effects {
            match effect {
                Effect::ArmTicker => self.arm(),
                Effect::DisarmTicker => self.disarm(),
                _ => {}
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.disarm();
    }
}
