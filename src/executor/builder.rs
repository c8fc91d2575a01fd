//! # Executor builder.
//!
//! [`ExecutorBuilder`] validates an [`ExecutorConfig`] and wires the runtime pieces:
//!
//! ```text
//! build()
//!   ├─► cfg.validate()
//!   ├─► pool: with_pool(..) or RuntimePool::current()
//!   ├─► Bus::new(cfg.bus_capacity_clamped())
//!   └─► subscribers non-empty?
//!          └─► SubscriberSet + listener task (Bus ─► SubscriberSet::emit)
//! ```
//!
//! The listener stops when the executor is dropped. Events already on the bus are
//! drained and delivered to subscribers before their workers shut down.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::oneshot;

use crate::error::ConfigError;
use crate::events::Bus;
use crate::executor::config::ExecutorConfig;
use crate::executor::core::Executor;
use crate::pool::{RuntimePool, WorkerPool};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for constructing an [`Executor`] with a custom pool or subscribers.
pub struct ExecutorBuilder {
    cfg: ExecutorConfig,
    pool: Option<Arc<dyn WorkerPool>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl ExecutorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: ExecutorConfig) -> Self {
        Self {
            cfg,
            pool: None,
            subscribers: Vec::new(),
        }
    }

    /// Runs jobs on `pool` instead of the current tokio runtime.
    ///
    /// Pass clones of the same `Arc` to share one pool between executors.
    pub fn with_pool(mut self, pool: Arc<dyn WorkerPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive executor events through dedicated workers with bounded
    /// queues. Requires a tokio runtime at `build` time.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Validates the configuration and builds the executor.
    ///
    /// Fails with [`ConfigError::NoRuntime`] if a runtime is needed (no explicit pool, or
    /// subscribers present) and none is running.
    pub fn build(self) -> Result<Executor, ConfigError> {
        self.cfg.validate()?;

        let pool: Arc<dyn WorkerPool> = match self.pool {
            Some(pool) => pool,
            None => Arc::new(RuntimePool::current()?),
        };
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        let listener_stop = if self.subscribers.is_empty() {
            None
        } else {
            let runtime = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;
            let _guard = runtime.enter();
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            let mut rx = bus.subscribe();
            let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

            runtime.spawn(async move {
                loop {
                    tokio::select! {
                        biased;
                        res = rx.recv() => match res {
                            Ok(ev) => set.emit(&ev),
                            Err(RecvError::Lagged(_)) => continue,
                            Err(RecvError::Closed) => break,
                        },
                        _ = &mut stop_rx => {
                            loop {
                                match rx.try_recv() {
                                    Ok(ev) => set.emit(&ev),
                                    Err(TryRecvError::Lagged(_)) => continue,
                                    Err(_) => break,
                                }
                            }
                            break;
                        }
                    }
                }
                set.shutdown().await;
            });
            Some(stop_tx)
        };

        Ok(Executor::from_parts(&self.cfg, pool, bus, listener_stop))
    }
}
