//! # Introspection: counters and a printable state dump.
//!
//! [`ExecutorStats`] is a snapshot of monotonically increasing counters kept by the
//! executor. [`ExecutorInfo`] bundles those counters with the current limits, policies,
//! occupancy and the worker pool state; its `Display` output is meant for logs.
//!
//! ```text
//! ___________________________
//! limits (core - queue): 2 - 64
//! tasks (running - waiting): 2 - 5
//! policies (schedule - overload): first-in-first-run - discard-oldest-in-queue
//! pool: tokio multi-thread workers=8 (active - completed - dispatched - refused): 2 - 40 - 42 - 0
//! ...
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::policies::{OverloadPolicy, SchedulePolicy};
use crate::pool::PoolState;

/// Live counters, updated with relaxed atomics.
#[derive(Default)]
pub(crate) struct Counters {
    pub submitted: AtomicU64,
    pub dispatched: AtomicU64,
    pub queued: AtomicU64,
    pub evicted: AtomicU64,
    pub discarded: AtomicU64,
    pub rejected: AtomicU64,
    pub caller_runs: AtomicU64,
    pub completed: AtomicU64,
    pub failed: AtomicU64,
    pub canceled: AtomicU64,
    pub refused: AtomicU64,
    pub resets: AtomicU64,
}

impl Counters {
    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ExecutorStats {
        let get = |c: &AtomicU64| c.load(Ordering::Relaxed);
        ExecutorStats {
            submitted: get(&self.submitted),
            dispatched: get(&self.dispatched),
            queued: get(&self.queued),
            evicted: get(&self.evicted),
            discarded: get(&self.discarded),
            rejected: get(&self.rejected),
            caller_runs: get(&self.caller_runs),
            completed: get(&self.completed),
            failed: get(&self.failed),
            canceled: get(&self.canceled),
            refused: get(&self.refused),
            resets: get(&self.resets),
        }
    }
}

/// Counter snapshot.
///
/// Counters are read one by one, so a snapshot taken under load may be slightly skewed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecutorStats {
    /// Calls to `execute`/`submit` with a task.
    pub submitted: u64,
    /// Jobs handed to the worker pool (admitted or promoted).
    pub dispatched: u64,
    /// Jobs appended to the waiting queue, including after an eviction.
    pub queued: u64,
    /// Waiting jobs evicted by `DiscardOldestInQueue`/`DiscardNewestInQueue`.
    pub evicted: u64,
    /// Incoming jobs dropped by `DiscardCurrentTask`.
    pub discarded: u64,
    /// Incoming jobs refused by `RejectWithError`.
    pub rejected: u64,
    /// Jobs run inline by `CallerRuns`.
    pub caller_runs: u64,
    /// Task bodies that returned `Ok`.
    pub completed: u64,
    /// Task bodies that returned `Err` or panicked.
    pub failed: u64,
    /// Waiting jobs removed by `cancel_waiting`.
    pub canceled: u64,
    /// Jobs the worker pool refused.
    pub refused: u64,
    /// Running-set resets after a bookkeeping mismatch.
    pub resets: u64,
}

/// Point-in-time view of an executor.
#[derive(Clone, Debug)]
pub struct ExecutorInfo {
    /// Concurrency ceiling.
    pub core_size: usize,
    /// Waiting queue capacity.
    pub queue_size: usize,
    /// Order in which waiting jobs are promoted.
    pub schedule: SchedulePolicy,
    /// What happens to submissions once both lanes are full.
    pub overload: OverloadPolicy,
    /// Names of running tasks, longest-running first.
    pub running: Vec<String>,
    /// Names of waiting tasks, head of the queue first.
    pub waiting: Vec<String>,
    /// State of the worker pool, which may be shared with other executors.
    pub pool: PoolState,
    /// Counters since creation.
    pub stats: ExecutorStats,
}

impl fmt::Display for ExecutorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(f, "___________________________")?;
        writeln!(f, "limits (core - queue): {} - {}", self.core_size, self.queue_size)?;
        writeln!(
            f,
            "tasks (running - waiting): {} - {}",
            self.running.len(),
            self.waiting.len()
        )?;
        writeln!(
            f,
            "policies (schedule - overload): {} - {}",
            self.schedule, self.overload
        )?;
        writeln!(f, "{}", self.pool)?;
        writeln!(
            f,
            "jobs (submitted - dispatched - completed - failed): {} - {} - {} - {}",
            s.submitted, s.dispatched, s.completed, s.failed
        )?;
        writeln!(
            f,
            "overload (queued - evicted - discarded - rejected - caller-runs): {} - {} - {} - {} - \
             {}",
            s.queued, s.evicted, s.discarded, s.rejected, s.caller_runs
        )?;
        writeln!(
            f,
            "other (canceled - refused - resets): {} - {} - {}",
            s.canceled, s.refused, s.resets
        )?;
        writeln!(f, "running: {:?}", self.running)?;
        write!(f, "waiting: {:?}", self.waiting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_bumps() {
        let c = Counters::default();
        Counters::bump(&c.submitted);
        Counters::bump(&c.submitted);
        Counters::bump(&c.evicted);

        let s = c.snapshot();
        assert_eq!(s.submitted, 2);
        assert_eq!(s.evicted, 1);
        assert_eq!(s.completed, 0);
    }

    #[test]
    fn display_lists_limits_and_queue() {
        let info = ExecutorInfo {
            core_size: 2,
            queue_size: 8,
            schedule: SchedulePolicy::LastInFirstRun,
            overload: OverloadPolicy::CallerRuns,
            running: vec!["a".into(), "b".into()],
            waiting: vec!["c".into()],
            pool: PoolState {
                kind: "manual".into(),
                ..PoolState::default()
            },
            stats: ExecutorStats::default(),
        };

        let text = info.to_string();
        assert!(text.contains("limits (core - queue): 2 - 8"));
        assert!(text.contains("tasks (running - waiting): 2 - 1"));
        assert!(text.contains("last-in-first-run - caller-runs"));
        assert!(text.contains("pool: manual"));
        assert!(text.contains(r#"waiting: ["c"]"#));
    }
}
