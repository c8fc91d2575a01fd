//! # Overload policy.
//!
//! [`OverloadPolicy`] disposes of a new task that arrives while both the running set and
//! the waiting queue are at capacity.
//!
//! | Policy                  | Waiting queue              | New task                   |
//! |-------------------------|----------------------------|----------------------------|
//! | `DiscardOldestInQueue`  | head evicted               | appended at tail           |
//! | `DiscardNewestInQueue`  | tail evicted               | appended at tail           |
//! | `CallerRuns`            | unchanged                  | runs inline on the caller  |
//! | `DiscardCurrentTask`    | unchanged                  | dropped                    |
//! | `RejectWithError`       | unchanged                  | submitter gets an error    |
//!
//! [`OverloadPolicy::apply`] is a pure function over a `VecDeque`, independent of locking
//! and dispatch, so every branch can be exercised with plain values.
//!
//! ## Zero-capacity queue
//! With `queue_size = 0` there is nothing to evict. The two eviction policies then drop
//! the incoming task instead (the queue stays empty).

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Disposition of a new task when the executor is saturated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverloadPolicy {
    /// Evict the oldest waiting task, enqueue the new one (default).
    ///
    /// Use when recent requests matter more than old ones that have waited too long.
    #[default]
    DiscardOldestInQueue,

    /// Evict the most recently queued task, enqueue the new one.
    DiscardNewestInQueue,

    /// Run the new task on the submitting context, outside the executor.
    ///
    /// Natural backpressure: the submitter slows down to the pace of execution.
    CallerRuns,

    /// Silently drop the new task.
    DiscardCurrentTask,

    /// Refuse the new task with [`SubmitError::Rejected`](crate::SubmitError::Rejected).
    RejectWithError,
}

/// Result of applying an [`OverloadPolicy`] to a saturated queue.
#[derive(Debug, PartialEq, Eq)]
pub enum Overflow<T> {
    /// The incoming item was enqueued at the tail; `evicted` was removed and never runs.
    Evicted {
        /// The item pushed out of the queue.
        evicted: T,
    },
    /// The incoming item must run on the caller. Queue unchanged.
    RunInCaller(T),
    /// The incoming item is dropped. Queue unchanged.
    Discarded(T),
    /// The incoming item is refused with an error. Queue unchanged.
    Rejected(T),
}

impl OverloadPolicy {
    /// Applies the policy to a saturated `queue` for the `incoming` item.
    ///
    /// # Example
    /// ```
    /// use std::collections::VecDeque;
    /// use taskgate::{OverloadPolicy, Overflow};
    ///
    /// let mut q: VecDeque<_> = [1, 2].into();
    /// let out = OverloadPolicy::DiscardOldestInQueue.apply(&mut q, 3);
    /// assert_eq!(out, Overflow::Evicted { evicted: 1 });
    /// assert_eq!(q, [2, 3]);
    /// ```
    pub fn apply<T>(self, queue: &mut VecDeque<T>, incoming: T) -> Overflow<T> {
        match self {
            OverloadPolicy::DiscardOldestInQueue => match queue.pop_front() {
                Some(evicted) => {
                    queue.push_back(incoming);
                    Overflow::Evicted { evicted }
                }
                None => Overflow::Discarded(incoming),
            },
            OverloadPolicy::DiscardNewestInQueue => match queue.pop_back() {
                Some(evicted) => {
                    queue.push_back(incoming);
                    Overflow::Evicted { evicted }
                }
                None => Overflow::Discarded(incoming),
            },
            OverloadPolicy::CallerRuns => Overflow::RunInCaller(incoming),
            OverloadPolicy::DiscardCurrentTask => Overflow::Discarded(incoming),
            OverloadPolicy::RejectWithError => Overflow::Rejected(incoming),
        }
    }

    /// Stable kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            OverloadPolicy::DiscardOldestInQueue => "discard-oldest-in-queue",
            OverloadPolicy::DiscardNewestInQueue => "discard-newest-in-queue",
            OverloadPolicy::CallerRuns => "caller-runs",
            OverloadPolicy::DiscardCurrentTask => "discard-current-task",
            OverloadPolicy::RejectWithError => "reject-with-error",
        }
    }
}

impl fmt::Display for OverloadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverloadPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "discardoldestinqueue" | "discardoldest" => Ok(OverloadPolicy::DiscardOldestInQueue),
            "discardnewestinqueue" | "discardnewest" => Ok(OverloadPolicy::DiscardNewestInQueue),
            "callerruns" => Ok(OverloadPolicy::CallerRuns),
            "discardcurrenttask" | "discardcurrent" => Ok(OverloadPolicy::DiscardCurrentTask),
            "rejectwitherror" | "reject" => Ok(OverloadPolicy::RejectWithError),
            _ => Err(ConfigError::UnknownPolicy {
                kind: "overload",
                name: s.to_string(),
            }),
        }
    }
}
