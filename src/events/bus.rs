//! # Event bus for broadcasting executor events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from the admission path, completion hooks and
//! subscriber workers.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                      Receivers (any):
//!   execute/submit ──┐
//!   completion     ──┼──────► Bus ───────► subscriber listener ──► SubscriberSet
//!   cancel_waiting ──┤  (broadcast chan)  └► Executor::subscribe() (user receivers)
//!   setters        ──┘
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks, so it is safe under the executor lock.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no receivers at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for executor events.
///
/// Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped.
    #[inline]
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Builds and publishes an event only if at least one receiver is listening.
    #[inline]
    pub fn publish_with(&self, build: impl FnOnce() -> Event) {
        if self.has_receivers() {
            self.publish(build());
        }
    }

    /// True if at least one receiver is listening.
    #[inline]
    pub fn has_receivers(&self) -> bool {
        self.tx.receiver_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn receiver_sees_events_published_after_subscribe() {
        let bus = Bus::new(8);
        bus.publish(Event::new(EventKind::Drained));
        assert!(!bus.has_receivers());

        let mut rx = bus.subscribe();
        assert!(bus.has_receivers());
        bus.publish(Event::new(EventKind::TaskQueued).with_job(3));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::TaskQueued);
        assert_eq!(ev.job, Some(3));
    }

    #[tokio::test]
    async fn publish_with_builds_events_only_for_listeners() {
        let bus = Bus::new(8);
        let mut built = 0;
        bus.publish_with(|| {
            built += 1;
            Event::new(EventKind::Drained)
        });
        assert_eq!(built, 0);

        let mut rx = bus.subscribe();
        bus.publish_with(|| {
            built += 1;
            Event::new(EventKind::Drained)
        });
        assert_eq!(built, 1);
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::Drained);
    }
}
