//! # Jobs: one record per accepted submission.
//!
//! A [`Job`] ties a [`TaskRef`] to a process-unique [`JobId`] and, for `submit`, the
//! sending half of its [`TaskHandle`]. Jobs live in exactly one place at a time: the
//! waiting queue, or (as a [`JobId`]) the running set while their future is on the pool.
//!
//! Dropping a job that never ran closes its handle, which then resolves to
//! [`TaskError::Dropped`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::oneshot;

use crate::error::TaskError;
use crate::executor::handle::TaskHandle;
use crate::tasks::{TaskRef, same_task};

static NEXT_JOB: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an accepted submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(u64);

impl JobId {
    fn next() -> Self {
        JobId(NEXT_JOB.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric id.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

pub(crate) type Completion = oneshot::Sender<Result<(), TaskError>>;

pub(crate) struct Job {
    id: JobId,
    task: TaskRef,
    done: Option<Completion>,
}

impl Job {
    /// Job without a handle (`execute`).
    pub(crate) fn new(task: TaskRef) -> Self {
        Self {
            id: JobId::next(),
            task,
            done: None,
        }
    }

    /// Job paired with a handle (`submit`).
    pub(crate) fn with_handle(task: TaskRef) -> (Self, TaskHandle) {
        let (tx, rx) = oneshot::channel();
        let id = JobId::next();
        let job = Self {
            id,
            task,
            done: Some(tx),
        };
        (job, TaskHandle::new(id, rx))
    }

    pub(crate) fn id(&self) -> JobId {
        self.id
    }

    pub(crate) fn task(&self) -> &TaskRef {
        &self.task
    }

    pub(crate) fn name(&self) -> Arc<str> {
        Arc::from(self.task.name())
    }

    /// True if this job wraps exactly `task` (reference equality).
    pub(crate) fn is_task(&self, task: &TaskRef) -> bool {
        same_task(&self.task, task)
    }

    /// Resolves the handle (if any) without running the task.
    pub(crate) fn resolve(self, result: Result<(), TaskError>) {
        if let Some(done) = self.done {
            let _ = done.send(result);
        }
    }

    pub(crate) fn into_parts(self) -> (JobId, TaskRef, Option<Completion>) {
        (self.id, self.task, self.done)
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("task", &self.task.name())
            .field("handle", &self.done.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskFn;

    fn noop() -> TaskRef {
        TaskFn::arc("noop", || async { Ok::<(), TaskError>(()) })
    }

    #[test]
    fn duplicate_submissions_get_distinct_ids() {
        let task = noop();
        let a = Job::new(Arc::clone(&task));
        let b = Job::new(Arc::clone(&task));
        assert_ne!(a.id(), b.id());
        assert!(a.is_task(&task) && b.is_task(&task));
        assert!(!a.is_task(&noop()));
    }

    #[tokio::test]
    async fn dropped_job_resolves_handle_as_dropped() {
        let (job, handle) = Job::with_handle(noop());
        assert_eq!(handle.job(), job.id());
        drop(job);
        assert_eq!(handle.await, Err(TaskError::Dropped));
    }

    #[tokio::test]
    async fn resolve_delivers_result() {
        let (job, handle) = Job::with_handle(noop());
        job.resolve(Err(TaskError::Canceled));
        assert_eq!(handle.await, Err(TaskError::Canceled));
    }
}
