//! Cancellable, single-slot scheduled tasks.
//!
//! A [`Debouncer`] holds at most one pending value. Scheduling a new value
//! replaces the pending one and restarts the delay, so only the value that
//! survives a full quiet period is ever delivered. The owner awaits
//! [`Debouncer::settled`] inside its event loop; dropping that future leaves
//! the pending value in place.

use std::future;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};

#[derive(Debug)]
struct Scheduled<T> {
    deadline: Instant,
    value: T,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Scheduled<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `value`, cancelling whatever was pending. Returns the
    /// cancelled value.
    pub fn schedule(&mut self, value: T) -> Option<T> {
        let previous = self.cancel();
        self.pending = Some(Scheduled {
            deadline: Instant::now() + self.delay,
            value,
        });
        previous
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|scheduled| scheduled.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|scheduled| &scheduled.value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|scheduled| scheduled.deadline)
    }

    /// Waits for the pending value to settle. Never resolves while nothing
    /// is scheduled.
    pub async fn settled(&mut self) -> T {
        let Some(deadline) = self.deadline() else {
            return future::pending().await;
        };
        sleep_until(deadline).await;
        match self.pending.take() {
            Some(scheduled) => scheduled.value,
            None => future::pending().await,
        }
    }
}
