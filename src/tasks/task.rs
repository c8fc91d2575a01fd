//! # Task abstraction.
//!
//! A [`Task`] has a human-readable [`name`](Task::name) and produces a fresh future per
//! [`spawn`](Task::spawn). The executor never inspects a task beyond these two methods.
//!
//! The common handle type is [`TaskRef`], an `Arc<dyn Task>` suitable for sharing across
//! executors and worker threads. Submitting the same `TaskRef` several times creates
//! several independent jobs; [`Executor::cancel_waiting`](crate::Executor::cancel_waiting)
//! matches them by reference.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::TaskError;

/// Boxed future returned by [`Task::spawn`].
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// Shared handle to a task.
pub type TaskRef = Arc<dyn Task>;

/// # Asynchronous unit of work.
///
/// # Example
/// ```
/// use taskgate::{BoxTaskFuture, Task, TaskError};
///
/// struct Ping;
///
/// impl Task for Ping {
///     fn name(&self) -> &str { "ping" }
///
///     fn spawn(&self) -> BoxTaskFuture {
///         Box::pin(async { Ok::<(), TaskError>(()) })
///     }
/// }
/// ```
pub trait Task: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Creates the future for one execution of this task.
    fn spawn(&self) -> BoxTaskFuture;
}

/// True if `a` and `b` refer to the same task allocation.
///
/// Only the data pointer is compared; vtable pointers of the same type may differ
/// between codegen units.
#[inline]
pub fn same_task(a: &TaskRef, b: &TaskRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
