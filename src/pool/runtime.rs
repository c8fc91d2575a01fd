//! # Tokio-backed worker pool.
//!
//! [`RuntimePool`] spawns work onto a [`tokio::runtime::Handle`]. A multi-thread runtime
//! gives the executor what it needs from a pool: one worker per core by default, no
//! buffering policy of its own, and cheap hand-off.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskgate::{Executor, ExecutorConfig, RuntimePool, WorkerPool};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), taskgate::ConfigError> {
//! // One pool, many executors.
//! let pool: Arc<dyn WorkerPool> = Arc::new(RuntimePool::current()?);
//!
//! let images = Executor::builder(ExecutorConfig::sized(2))
//!     .with_pool(Arc::clone(&pool))
//!     .build()?;
//! let api = Executor::builder(ExecutorConfig::sized(4))
//!     .with_pool(pool)
//!     .build()?;
//! # let _ = (images, api);
//! # Ok(()) }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::runtime::{Handle, RuntimeFlavor};

use crate::error::ConfigError;
use crate::pool::{PoolState, Refusal, Work, WorkerPool};

#[derive(Default)]
struct Counters {
    dispatched: AtomicU64,
    completed: AtomicU64,
}

/// Worker pool spawning onto a tokio runtime.
#[derive(Clone)]
pub struct RuntimePool {
    handle: Handle,
    counters: Arc<Counters>,
}

impl RuntimePool {
    /// Creates a pool on top of an existing runtime handle.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Creates a pool on the runtime the caller is running in.
    pub fn current() -> Result<Self, ConfigError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| ConfigError::NoRuntime)
    }

    /// Underlying runtime handle.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl WorkerPool for RuntimePool {
    fn dispatch(&self, work: Work) -> Result<(), Refusal> {
        let counters = Arc::clone(&self.counters);
        counters.dispatched.fetch_add(1, Ordering::Relaxed);

        let fut = work.into_future();
        self.handle.spawn(async move {
            fut.await;
            counters.completed.fetch_add(1, Ordering::Relaxed);
        });
        Ok(())
    }

    fn state(&self) -> PoolState {
        let dispatched = self.counters.dispatched.load(Ordering::Relaxed);
        let completed = self.counters.completed.load(Ordering::Relaxed);
        let kind = match self.handle.runtime_flavor() {
            RuntimeFlavor::CurrentThread => "tokio current-thread",
            RuntimeFlavor::MultiThread => "tokio multi-thread",
            _ => "tokio",
        };
        PoolState {
            kind: kind.to_string(),
            workers: Some(self.handle.metrics().num_workers()),
            active: dispatched.saturating_sub(completed),
            dispatched,
            completed,
            refused: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runs_work_and_counts_it() {
        let pool = RuntimePool::current().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();
        let work = Work::new(
            1,
            "probe".into(),
            Box::pin(async move {
                let _ = tx.send(());
            }),
        );

        pool.dispatch(work).unwrap();
        rx.await.unwrap();
        tokio::task::yield_now().await;

        let state = pool.state();
        assert_eq!(state.dispatched, 1);
        assert_eq!(state.kind, "tokio current-thread");
        assert_eq!(state.workers, Some(1));
    }

    #[test]
    fn current_without_runtime_is_config_error() {
        assert_eq!(RuntimePool::current().err(), Some(ConfigError::NoRuntime));
    }
}
