//! # Executor runtime.
//!
//! - [`Executor`] admission, completion scheduling and runtime reconfiguration
//! - [`ExecutorBuilder`] wiring of pool, bus and subscribers
//! - [`ExecutorConfig`] limits and policies
//! - [`TaskHandle`] outcome of a submitted task
//! - [`ExecutorInfo`] / [`ExecutorStats`] introspection
//!
//! Internals: `lanes` (running set + waiting queue), `job` (one record per submission),
//! `runner` (panic-safe single execution).

mod builder;
mod config;
mod core;
mod handle;
mod info;
mod job;
mod lanes;
mod runner;


pub use builder::ExecutorBuilder;
pub use config::{ExecutorConfig, QUEUE_SLOTS_PER_CORE};
pub use self::core::Executor;
pub use handle::TaskHandle;
pub use info::{ExecutorInfo, ExecutorStats};
pub use job::JobId;

pub(crate) use runner::panic_message;
