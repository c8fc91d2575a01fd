//! # Task abstractions.
//!
//! This module provides the core task-related types:
//! - [`Task`] - trait for implementing async units of work
//! - [`TaskFn`] - function-based task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//!
//! The executor identifies a task by **reference**: two `TaskRef`s are the same task
//! if they point at the same allocation (see [`same_task`]).

mod task;
mod task_fn;

pub use task::{BoxTaskFuture, Task, TaskRef, same_task};
pub use task_fn::TaskFn;
