use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Duration, MissedTickBehavior},
};

use super::{clock::Clock, countdown::remaining_seconds};

/// One-second countdown task for a single timer.
///
/// The task is owned by this value and aborted when it is dropped, so replacing a
/// widget's ticker never leaves the old one running. After expiry it keeps
/// publishing zero.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
    remaining: watch::Receiver<u64>,
}

impl Ticker {
    /// Must be called from within a tokio runtime.
    pub fn start(end_at: DateTime<Utc>, clock: Arc<dyn Clock>) -> Self {
        let (tx, rx) = watch::channel(remaining_seconds(end_at, clock.now()));

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(remaining_seconds(end_at, clock.now())).is_err() {
                    break;
                }
            }
        });

        Self { handle, remaining: rx }
    }

    /// Seconds left as of the latest tick.
    pub fn remaining(&self) -> u64 {
        *self.remaining.borrow()
    }

    /// A receiver that observes every tick; it errors once the ticker is gone.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.remaining.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
