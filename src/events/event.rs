//! # Executor events.
//!
//! The [`EventKind`] enum classifies what happened to a job or to the executor:
//! - **Admission events**: dispatched, queued, overload outcomes
//! - **Completion events**: finished, failed, drained to idle
//! - **Diagnostic events**: bookkeeping reset, pool refusal, subscriber trouble
//!
//! The [`Event`] struct carries metadata such as the job id, task name and the
//! occupancy of the running set and waiting queue at the time of the event.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Events about admissions and completions are published while the executor lock is
//! held, so their `seq` order matches the order of the state changes.
//!
//! ## Example
//! ```rust
//! use taskgate::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskQueued)
//!     .with_task("fetch-feed")
//!     .with_job(7)
//!     .with_occupancy(4, 1);
//!
//! assert_eq!(ev.kind, EventKind::TaskQueued);
//! assert_eq!(ev.task.as_deref(), Some("fetch-feed"));
//! assert_eq!(ev.waiting, Some(1));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of executor events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Admission ===
    /// Job entered the running set and was handed to the worker pool.
    ///
    /// Sets: `task`, `job`, `running`, `waiting`; `reason` is `"admitted"` for a direct
    /// admission or `"promoted"` when it came from the waiting queue.
    TaskDispatched,

    /// Job was appended to the waiting queue.
    ///
    /// Sets: `task`, `job`, `running`, `waiting`.
    TaskQueued,

    /// Waiting job was evicted by `DiscardOldestInQueue` / `DiscardNewestInQueue`.
    ///
    /// Sets: `task`, `job` (the evicted job), `reason` (policy name).
    TaskEvicted,

    /// New job was dropped on arrival (`DiscardCurrentTask`, or an eviction policy with a
    /// zero-capacity queue).
    ///
    /// Sets: `task`, `reason` (policy name).
    TaskDiscarded,

    /// New job was refused with an error (`RejectWithError`).
    ///
    /// Sets: `task`, `running`, `waiting`.
    TaskRejected,

    /// New job is running inline on the submitter (`CallerRuns`).
    ///
    /// Sets: `task`.
    CallerRuns,

    /// Waiting job was removed by `cancel_waiting`.
    ///
    /// Sets: `task`, `job`.
    TaskCanceled,

    // === Completion ===
    /// Job body finished successfully.
    ///
    /// Sets: `task`, `job`.
    TaskFinished,

    /// Job body returned an error or panicked.
    ///
    /// Sets: `task`, `job`, `reason` (error message).
    TaskFailed,

    /// Last running job completed and the waiting queue is empty.
    Drained,

    // === Diagnostics ===
    /// A completion did not find its job in the running set; the running set was cleared.
    ///
    /// Sets: `task`, `job`, `running` (entries discarded).
    BookkeepingReset,

    /// The worker pool refused a dispatched job; the job never runs.
    ///
    /// Sets: `task`, `job`, `reason`.
    PoolRefused,

    /// Limits or policies were changed at runtime.
    ///
    /// Sets: `reason` (`"key=value"`).
    ConfigChanged,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `task` (subscriber name), `reason` (panic message).
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `task` (subscriber name), `reason`.
    SubscriberOverflow,
}

/// Executor event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Job id, if applicable.
    pub job: Option<u64>,
    /// Running set size after the change.
    pub running: Option<usize>,
    /// Waiting queue size after the change.
    pub waiting: Option<usize>,
    /// Human-readable reason (errors, policy names, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            job: None,
            running: None,
            waiting: None,
            reason: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a job id.
    #[inline]
    pub fn with_job(mut self, job: u64) -> Self {
        self.job = Some(job);
        self
    }

    /// Attaches running/waiting sizes.
    #[inline]
    pub fn with_occupancy(mut self, running: usize, waiting: usize) -> Self {
        self.running = Some(running);
        self.waiting = Some(waiting);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }
}
