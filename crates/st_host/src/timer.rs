//! Cancellable timers that post [`Action::TimerElapsed`] back to the controller queue.

use std::collections::HashMap;
use std::time::Duration;

use st_app::{Action, Ticket, TimerKind};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// One slot per [`TimerKind`]. Scheduling a kind aborts whatever was pending in its slot,
/// so a replaced timer never fires.
pub struct Timers {
    tx: UnboundedSender<Action>,
    slots: HashMap<TimerKind, JoinHandle<()>>,
}

impl Timers {
    pub fn new(tx: UnboundedSender<Action>) -> Self {
        Self {
            tx,
            slots: HashMap::new(),
        }
    }

    /// One-shot timer.
    pub fn schedule(&mut self, kind: TimerKind, ticket: Ticket, delay: Duration) {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Action::TimerElapsed { kind, ticket });
        });
        self.replace(kind, handle);
    }

    /// Periodic timer; the first tick comes one `interval` from now.
    ///
    /// A zero interval is raised to [`MIN_PERIOD`].
    pub fn start_periodic(&mut self, kind: TimerKind, ticket: Ticket, interval: Duration) {
        let interval = if interval < MIN_PERIOD {
            log::warn!("{kind:?} interval {interval:?} too short, using {MIN_PERIOD:?}");
            MIN_PERIOD
        } else {
            interval
        };
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if tx.send(Action::TimerElapsed { kind, ticket }).is_err() {
                    break;
                }
            }
        });
        self.replace(kind, handle);
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        if let Some(handle) = self.slots.remove(&kind) {
            handle.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.slots.drain() {
            handle.abort();
        }
    }

    /// True while a timer of `kind` is pending or running.
    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.slots.get(&kind).is_some_and(|h| !h.is_finished())
    }

    fn replace(&mut self, kind: TimerKind, handle: JoinHandle<()>) {
        if let Some(old) = self.slots.insert(kind, handle) {
            old.abort();
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
