//! # taskgate
//!
//! **taskgate** is a bounded-concurrency task executor for async Rust.
//!
//! It caps how many tasks run at once (`core_size`), buffers excess work in a bounded
//! waiting queue (`queue_size`), and applies an explicit [`OverloadPolicy`] once both are
//! full. When a running task completes, the next waiting task is picked by the
//! [`SchedulePolicy`]. Built for clients that must cap in-flight operations without
//! unbounded worker growth.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!       execute(task) / submit(task)            execute(task) / submit(task)
//!                  │                                       │
//! ┌────────────────▼──────────────────┐   ┌────────────────▼──────────────────┐
//! │ Executor A                        │   │ Executor B                        │
//! │  - Lanes (one mutex)              │   │  - Lanes                          │
//! │     running set  ≤ core_size      │   │     running set  ≤ core_size      │
//! │     waiting queue ≤ queue_size    │   │     waiting queue ≤ queue_size    │
//! │  - SchedulePolicy / OverloadPolicy│   │  - SchedulePolicy / OverloadPolicy│
//! │  - Bus (broadcast events)         │   │  - Bus                            │
//! └────────────────┬──────────────────┘   └────────────────┬──────────────────┘
//!                  │ dispatch(Work)                        │
//!                  ▼                                       ▼
//!        ┌──────────────────────────────────────────────────────────┐
//!        │        Arc<dyn WorkerPool>  (shared, e.g. RuntimePool)   │
//!        └──────────────────────────────────────────────────────────┘
//!
//! Bus ──► subscriber listener ──► SubscriberSet ──► worker per subscriber ──► on_event()
//! ```
//!
//! ### Lifecycle of a job
//! ```text
//! submit(task)
//!   ├─ running < core_size   ─► running set ─► pool ─► run_once(task)
//!   ├─ waiting < queue_size  ─► waiting queue
//!   └─ both full             ─► OverloadPolicy
//!        ├─ DiscardOldestInQueue ─► evict waiting head, enqueue
//!        ├─ DiscardNewestInQueue ─► evict waiting tail, enqueue
//!        ├─ CallerRuns           ─► run inline on the caller
//!        ├─ DiscardCurrentTask   ─► drop the new task
//!        └─ RejectWithError      ─► Err(SubmitError::Rejected)
//!
//! run_once(task) finished
//!   ├─► remove from running set (missing ─► clear running set, BookkeepingReset)
//!   ├─► SchedulePolicy picks next waiting job ─► pool
//!   └─► resolve TaskHandle
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                         |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Executor**      | Admission, completion scheduling, runtime reconfiguration| [`Executor`], [`ExecutorBuilder`]          |
//! | **Policies**      | Dequeue order and overload disposition                   | [`SchedulePolicy`], [`OverloadPolicy`]     |
//! | **Worker pools**  | Shared execution backends                                | [`WorkerPool`], [`RuntimePool`]            |
//! | **Tasks**         | Units of work with reference identity                    | [`Task`], [`TaskFn`], [`TaskRef`]          |
//! | **Subscriber API**| Hook into job lifecycle events                           | [`Subscribe`], [`Event`]                   |
//! | **Errors**        | Typed errors for config, admission and task outcomes     | [`ConfigError`], [`SubmitError`], [`TaskError`] |
//! | **Configuration** | Limits and policies, from code or environment            | [`ExecutorConfig`]                         |
//!
//! ## Optional features
//! - `logging`: exports the built-in [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskgate::{Executor, ExecutorConfig, OverloadPolicy, TaskError, TaskFn, TaskRef};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = ExecutorConfig::sized(2).with_overload(OverloadPolicy::CallerRuns);
//!     let exec = Executor::new(cfg)?;
//!
//!     let fetch: TaskRef = TaskFn::arc("fetch", || async {
//!         tokio::time::sleep(std::time::Duration::from_millis(10)).await;
//!         Ok::<(), TaskError>(())
//!     });
//!
//!     let mut handles = Vec::new();
//!     for _ in 0..8 {
//!         handles.push(exec.submit(Arc::clone(&fetch)).await?);
//!     }
//!     for h in handles {
//!         h.await?;
//!     }
//!     println!("{}", exec.info());
//!     Ok(())
//! }
//! ```
mod error;
mod events;
mod executor;
mod policies;
mod pool;
mod subscribers;
mod tasks;

#[cfg(test)]
mod test_utils;

// ---- Public re-exports ----

pub use error::{ConfigError, PoolError, SubmitError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use executor::{
    Executor, ExecutorBuilder, ExecutorConfig, ExecutorInfo, ExecutorStats, JobId,
    QUEUE_SLOTS_PER_CORE, TaskHandle,
};
pub use policies::{Overflow, OverloadPolicy, SchedulePolicy};
pub use pool::{PoolState, Refusal, RuntimePool, Work, WorkerPool};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{BoxTaskFuture, Task, TaskFn, TaskRef, same_task};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
