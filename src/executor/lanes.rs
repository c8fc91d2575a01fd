//! # Lanes: running set and waiting queue.
//!
//! [`Lanes`] is the bookkeeping core of the executor. It holds both bounded collections
//! and the limits/policies that govern them, and makes every admission and rescheduling
//! decision. It never runs or dispatches anything itself: callers act on the returned
//! [`Admission`] / [`Job`] values while still holding the executor lock.
//!
//! ```text
//!            admit(job)
//!                │
//!    running < core_size ? ──yes──► reserve(job) ─► Admission::Run(job)
//!                │no
//!    waiting < queue_size ? ─yes──► push_back    ─► Admission::Queued
//!                │no
//!                └──────────────► overload.apply ─► Admission::Overflow(..)
//!
//!            release(id)
//!                ├─ found      ─► Release::Removed
//!                └─ not found  ─► clear running  ─► Release::Reset { cleared }
//!
//!            promote()
//!                └─ running < core_size && waiting non-empty
//!                       ─► schedule.next(waiting) ─► reserve ─► Some(job)
//! ```
//!
//! ## Invariants
//! - `running.len() <= core_size` after every `admit`/`promote`.
//! - `waiting.len() <= queue_size` after every `admit`.
//! - A job id is in at most one collection.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use crate::executor::job::{Job, JobId};
use crate::policies::{Overflow, OverloadPolicy, SchedulePolicy};
use crate::tasks::TaskRef;

/// Limits and policies, changeable at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Limits {
    pub core_size: usize,
    pub queue_size: usize,
    pub schedule: SchedulePolicy,
    pub overload: OverloadPolicy,
}

/// Entry of the running set.
pub(crate) struct Running {
    pub task: TaskRef,
    pub started_at: Instant,
}

/// Outcome of [`Lanes::admit`].
#[derive(Debug)]
pub(crate) enum Admission {
    /// Reserved a running slot; the caller must dispatch the job.
    Run(Job),
    /// Appended to the waiting queue.
    Queued,
    /// Both collections were full; the overload policy decided.
    Overflow(Overflow<Job>),
}

/// Outcome of [`Lanes::release`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Release {
    Removed,
    /// The id was missing; the running set was cleared.
    Reset { cleared: usize },
}

pub(crate) struct Lanes {
    pub limits: Limits,
    running: HashMap<JobId, Running>,
    waiting: VecDeque<Job>,
}

impl Lanes {
    pub(crate) fn new(limits: Limits) -> Self {
        Self {
            limits,
            running: HashMap::with_capacity(limits.core_size),
            waiting: VecDeque::new(),
        }
    }

    pub(crate) fn admit(&mut self, job: Job) -> Admission {
        if self.running.len() < self.limits.core_size {
            self.reserve(&job);
            Admission::Run(job)
        } else if self.waiting.len() < self.limits.queue_size {
            self.waiting.push_back(job);
            Admission::Queued
        } else {
            Admission::Overflow(self.limits.overload.apply(&mut self.waiting, job))
        }
    }

    /// Removes a finished job from the running set.
    ///
    /// A missing id means the bookkeeping is out of sync. The whole running set is
    /// dropped so that capacity can never leak and block admissions forever.
    pub(crate) fn release(&mut self, id: JobId) -> Release {
        if self.running.remove(&id).is_some() {
            return Release::Removed;
        }
        let cleared = self.running.len();
        self.running.clear();
        Release::Reset { cleared }
    }

    /// Moves the next waiting job into the running set, if a slot is free.
    pub(crate) fn promote(&mut self) -> Option<Job> {
        if self.running.len() >= self.limits.core_size {
            return None;
        }
        let job = self.limits.schedule.next(&mut self.waiting)?;
        self.reserve(&job);
        Some(job)
    }

    /// Removes every waiting job wrapping `task`, preserving the order of the rest.
    pub(crate) fn cancel(&mut self, task: &TaskRef) -> Vec<Job> {
        if !self.waiting.iter().any(|job| job.is_task(task)) {
            return Vec::new();
        }
        let (removed, kept): (VecDeque<Job>, VecDeque<Job>) =
            std::mem::take(&mut self.waiting)
                .into_iter()
                .partition(|job| job.is_task(task));
        self.waiting = kept;
        removed.into()
    }

    pub(crate) fn running_len(&self) -> usize {
        self.running.len()
    }

    pub(crate) fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.running.is_empty() && self.waiting.is_empty()
    }

    /// Names of running tasks, longest-running first.
    pub(crate) fn running_names(&self) -> Vec<String> {
        let mut entries: Vec<&Running> = self.running.values().collect();
        entries.sort_by_key(|r| r.started_at);
        entries.iter().map(|r| r.task.name().to_string()).collect()
    }

    /// Names of waiting tasks, head first.
    pub(crate) fn waiting_names(&self) -> Vec<String> {
        self.waiting.iter().map(|j| j.task().name().to_string()).collect()
    }

    fn reserve(&mut self, job: &Job) {
        self.running.insert(
            job.id(),
            Running {
                task: job.task().clone(),
                started_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::TaskError;
    use crate::tasks::TaskFn;

    fn task(name: &'static str) -> TaskRef {
        TaskFn::arc(name, || async { Ok::<(), TaskError>(()) })
    }

    fn lanes(core_size: usize, queue_size: usize, overload: OverloadPolicy) -> Lanes {
        Lanes::new(Limits {
            core_size,
            queue_size,
            schedule: SchedulePolicy::FirstInFirstRun,
            overload,
        })
    }

    fn run_id(adm: Admission) -> JobId {
        match adm {
            Admission::Run(job) => job.id(),
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn fills_running_then_waiting_then_overflows() {
        let mut l = lanes(2, 1, OverloadPolicy::RejectWithError);

        run_id(l.admit(Job::new(task("a"))));
        run_id(l.admit(Job::new(task("b"))));
        assert!(matches!(l.admit(Job::new(task("c"))), Admission::Queued));
        match l.admit(Job::new(task("d"))) {
            Admission::Overflow(Overflow::Rejected(job)) => assert_eq!(job.task().name(), "d"),
            other => panic!("unexpected {other:?}"),
        }

        assert_eq!((l.running_len(), l.waiting_len()), (2, 1));
    }

    #[test]
    fn release_then_promote_follows_schedule() {
        let mut l = lanes(1, 3, OverloadPolicy::DiscardCurrentTask);
        let a = run_id(l.admit(Job::new(task("a"))));
        for name in ["b", "c", "d"] {
            l.admit(Job::new(task(name)));
        }

        assert_eq!(l.promote().map(|j| j.id()), None, "no free slot yet");
        assert_eq!(l.release(a), Release::Removed);

        l.limits.schedule = SchedulePolicy::LastInFirstRun;
        let next = l.promote().unwrap();
        assert_eq!(next.task().name(), "d");
        assert_eq!(l.waiting_names(), ["b", "c"]);
        assert_eq!(l.running_names(), ["d"]);
    }

    #[test]
    fn unknown_release_clears_running_set() {
        let mut l = lanes(3, 0, OverloadPolicy::DiscardCurrentTask);
        run_id(l.admit(Job::new(task("a"))));
        run_id(l.admit(Job::new(task("b"))));

        let stray = Job::new(task("stray")).id();
        assert_eq!(l.release(stray), Release::Reset { cleared: 2 });
        assert_eq!(l.running_len(), 0);
        assert!(l.is_idle());
    }

    #[test]
    fn cancel_removes_all_matching_and_keeps_order() {
        let mut l = lanes(1, 10, OverloadPolicy::DiscardCurrentTask);
        let dup = task("dup");
        run_id(l.admit(Job::new(Arc::clone(&dup))));
        l.admit(Job::new(Arc::clone(&dup)));
        l.admit(Job::new(task("x")));
        l.admit(Job::new(Arc::clone(&dup)));
        l.admit(Job::new(task("y")));

        let removed = l.cancel(&dup);
        assert_eq!(removed.len(), 2);
        assert_eq!(l.waiting_names(), ["x", "y"]);
        assert_eq!(l.running_len(), 1, "running job is untouched");
        assert!(l.cancel(&task("dup")).is_empty(), "same name, different reference");
    }

    #[test]
    fn shrinking_core_blocks_promotion_until_below_limit() {
        let mut l = lanes(2, 4, OverloadPolicy::DiscardCurrentTask);
        let a = run_id(l.admit(Job::new(task("a"))));
        run_id(l.admit(Job::new(task("b"))));
        l.admit(Job::new(task("c")));

        l.limits.core_size = 1;
        l.release(a);
        assert!(l.promote().is_none());
        assert_eq!(l.waiting_len(), 1);
    }
}
