//! Test doubles shared by unit tests.
//!
//! [`ManualPool`] stores dispatched work instead of running it, so a test decides exactly
//! when each job finishes. Work is popped under the pool lock and awaited outside it, which
//! lets completion hooks dispatch follow-up jobs into the same pool.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::{PoolError, TaskError};
use crate::pool::{PoolState, Refusal, Work, WorkerPool};
use crate::tasks::{TaskFn, TaskRef};

#[derive(Default)]
pub(crate) struct ManualPool {
    queue: Mutex<VecDeque<Work>>,
    refuse: AtomicBool,
    dispatched: AtomicU64,
    completed: AtomicU64,
    refused: AtomicU64,
}

impl ManualPool {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Makes every following `dispatch` fail.
    pub(crate) fn set_refusing(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    pub(crate) fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    pub(crate) fn pending_names(&self) -> Vec<String> {
        self.queue.lock().iter().map(|w| w.name().to_string()).collect()
    }

    /// Runs the oldest dispatched work item to completion. Returns false if none is pending.
    pub(crate) async fn run_next(&self) -> bool {
        let work = self.queue.lock().pop_front();
        self.run(work).await
    }

    /// Runs the oldest pending work item for task `name`.
    pub(crate) async fn run_named(&self, name: &str) -> bool {
        let work = {
            let mut queue = self.queue.lock();
            queue
                .iter()
                .position(|w| w.name() == name)
                .and_then(|pos| queue.remove(pos))
        };
        self.run(work).await
    }

    /// Runs work until nothing is pending, including work dispatched along the way.
    pub(crate) async fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_next().await {
            ran += 1;
        }
        ran
    }

    async fn run(&self, work: Option<Work>) -> bool {
        match work {
            Some(work) => {
                work.into_future().await;
                self.completed.fetch_add(1, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }
}

impl WorkerPool for ManualPool {
    fn dispatch(&self, work: Work) -> Result<(), Refusal> {
        if self.refuse.load(Ordering::SeqCst) {
            self.refused.fetch_add(1, Ordering::SeqCst);
            let error = PoolError::Refused {
                reason: format!("manual pool refusing {}", work.name()),
            };
            return Err(Refusal::new(work, error));
        }
        self.dispatched.fetch_add(1, Ordering::SeqCst);
        self.queue.lock().push_back(work);
        Ok(())
    }

    fn state(&self) -> PoolState {
        let dispatched = self.dispatched.load(Ordering::SeqCst);
        let completed = self.completed.load(Ordering::SeqCst);
        PoolState {
            kind: "manual".to_string(),
            workers: None,
            active: dispatched.saturating_sub(completed),
            dispatched,
            completed,
            refused: self.refused.load(Ordering::SeqCst),
        }
    }
}

/// Shared log of task names in the order their bodies ran.
pub(crate) type RunLog = Arc<Mutex<Vec<String>>>;

/// Task that appends its name to `log` when it runs.
pub(crate) fn logged(name: &'static str, log: &RunLog) -> TaskRef {
    let log = Arc::clone(log);
    TaskFn::arc(name, move || {
        let log = Arc::clone(&log);
        async move {
            log.lock().push(name.to_string());
            Ok::<(), TaskError>(())
        }
    })
}

pub(crate) fn noop(name: &'static str) -> TaskRef {
    TaskFn::arc(name, || async { Ok::<(), TaskError>(()) })
}
