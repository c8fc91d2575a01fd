//! # Worker pools.
//!
//! A [`WorkerPool`] runs dispatched [`Work`] concurrently. It has no admission logic of its
//! own: all capacity control happens in the [`Executor`](crate::Executor), which never
//! dispatches more than `core_size` jobs at a time.
//!
//! ```text
//!   Executor A ──┐
//!                ├──► Arc<dyn WorkerPool> ──► worker threads
//!   Executor B ──┘        (shared)
//! ```
//!
//! A pool is built once and handed to each executor explicitly, so process-wide thread
//! usage stays bounded while every executor keeps its own limits. Tests inject a fake pool.
//!
//! ## Contents
//! - [`WorkerPool`] trait
//! - [`Work`] one dispatched job (id, name, future)
//! - [`Refusal`] work handed back by a pool that refused it
//! - [`PoolState`] snapshot for diagnostics
//! - [`RuntimePool`] tokio-backed implementation

mod runtime;

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::PoolError;

pub use runtime::RuntimePool;

/// One unit of dispatched work.
///
/// Wraps the job's future together with identifying metadata a pool may use for naming
/// or tracing. Completion bookkeeping is part of the future itself.
pub struct Work {
    id: u64,
    name: Arc<str>,
    fut: BoxFuture<'static, ()>,
}

impl Work {
    pub(crate) fn new(id: u64, name: Arc<str>, fut: BoxFuture<'static, ()>) -> Self {
        Self { id, name, fut }
    }

    /// Job id assigned by the executor.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Task name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Consumes the work item and returns its future.
    pub fn into_future(self) -> BoxFuture<'static, ()> {
        self.fut
    }
}

impl fmt::Debug for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Work")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Work a pool refused to run, returned to the caller together with the reason.
///
/// The executor drops the work only after releasing its lock, so `Drop` impls of the
/// captured task may call back into the executor.
#[derive(Debug)]
pub struct Refusal {
    /// The refused work item; it has not been polled.
    pub work: Work,
    /// Why the pool refused.
    pub error: PoolError,
}

impl Refusal {
    /// Pairs a refused work item with the reason.
    pub fn new(work: Work, error: PoolError) -> Self {
        Self { work, error }
    }
}

/// Executes dispatched work concurrently.
///
/// Implementations must neither run nor drop the work inside `dispatch`: the executor
/// calls `dispatch` while holding its lock.
pub trait WorkerPool: Send + Sync + 'static {
    /// Hands `work` to a worker.
    ///
    /// On `Err` the work item is handed back inside the [`Refusal`]; it will never run.
    fn dispatch(&self, work: Work) -> Result<(), Refusal>;

    /// Snapshot of the pool's lifecycle state and counters.
    fn state(&self) -> PoolState;
}

/// Diagnostic snapshot of a worker pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolState {
    /// Short description of the pool implementation.
    pub kind: String,
    /// Number of worker threads, when known.
    pub workers: Option<usize>,
    /// Work items currently executing.
    pub active: u64,
    /// Work items accepted since creation.
    pub dispatched: u64,
    /// Work items that ran to the end.
    pub completed: u64,
    /// Work items refused.
    pub refused: u64,
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool: {}", self.kind)?;
        if let Some(w) = self.workers {
            write!(f, " workers={w}")?;
        }
        write!(
            f,
            " (active - completed - dispatched - refused): {} - {} - {} - {}",
            self.active, self.completed, self.dispatched, self.refused
        )
    }
}
