//! Cancellable, reschedulable repeating timer
//!
//! A [`StepTimer`] owns at most one live tokio task. Scheduling again aborts the
//! previous task before spawning the new one, and dropping the timer aborts
//! whatever is live.

use bb84_core::{Bb84Error, Result};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Whether a tick callback wants to keep firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    /// Fire again after the next period
    Continue,
    /// End the timer task
    Stop,
}

#[derive(Debug)]
struct LiveTimer {
    task: JoinHandle<()>,
    period: Duration,
}

/// Single-slot repeating timer on the ambient tokio runtime
#[derive(Debug, Default)]
pub struct StepTimer {
    live: Option<LiveTimer>,
}

impl StepTimer {
    /// Create an unarmed timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `tick` every `period`, first after one full period
    ///
    /// Replaces any live schedule. Fails without touching the current schedule
    /// when `period` is zero or no tokio runtime is running.
    pub fn schedule<F>(&mut self, period: Duration, mut tick: F) -> Result<()>
    where
        F: FnMut() -> TickControl + Send + 'static,
    {
        if period.is_zero() {
            return Err(Bb84Error::invalid_config(
                "timer period must be greater than 0",
            ));
        }
        let runtime = Handle::try_current()
            .map_err(|e| Bb84Error::runtime(format!("auto-run needs a tokio runtime: {e}")))?;

        self.cancel();
        let task = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tick() == TickControl::Stop {
                    break;
                }
            }
        });
        self.live = Some(LiveTimer { task, period });
        Ok(())
    }

    /// Abort the live schedule; returns whether one was still running
    pub fn cancel(&mut self) -> bool {
        match self.live.take() {
            Some(live) => {
                let was_running = !live.task.is_finished();
                live.task.abort();
                was_running
            }
            None => false,
        }
    }

    /// A schedule exists and its task has not ended
    pub fn is_armed(&self) -> bool {
        self.live
            .as_ref()
            .is_some_and(|live| !live.task.is_finished())
    }

    /// Period of the live schedule
    pub fn period(&self) -> Option<Duration> {
        self.live
            .as_ref()
            .filter(|live| !live.task.is_finished())
            .map(|live| live.period)
    }
}

impl Drop for StepTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
