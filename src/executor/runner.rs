//! # Run a single execution of a task.
//!
//! [`run_once`] drives the task's future to completion and converts a panic into
//! [`TaskError::Panicked`], so the completion hook always runs and the slot is always
//! released.
//!
//! ```text
//! task.spawn() ─► Ok(())           ─► Ok(())
//!              ─► Err(e)           ─► Err(e)
//!              ─► panic (anywhere) ─► Err(Panicked { reason })
//! ```

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::error::TaskError;
use crate::tasks::Task;

/// Executes `task` once, catching panics from both `spawn` and the future.
pub(crate) async fn run_once(task: &dyn Task) -> Result<(), TaskError> {
    match AssertUnwindSafe(async { task.spawn().await }).catch_unwind().await {
        Ok(res) => res,
        Err(panic) => Err(TaskError::Panicked {
            reason: panic_message(panic.as_ref()),
        }),
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
