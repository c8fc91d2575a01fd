//! # Task handle.
//!
//! [`TaskHandle`] is returned by [`Executor::submit`](crate::Executor::submit) and resolves
//! once the job reaches a terminal state:
//!
//! ```text
//! ran to completion        ─► Ok(()) / Err(Fail | Fatal)
//! panicked                 ─► Err(Panicked)
//! removed by cancel_waiting ─► Err(Canceled)
//! evicted / discarded /
//! refused by the pool      ─► Err(Dropped)
//! ```
//!
//! Dropping the handle does not affect the job.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::TaskError;
use crate::executor::job::JobId;

/// Future resolving to the outcome of a submitted task.
#[derive(Debug)]
#[must_use = "dropping a TaskHandle discards the task outcome"]
pub struct TaskHandle {
    job: JobId,
    rx: oneshot::Receiver<Result<(), TaskError>>,
}

impl TaskHandle {
    pub(crate) fn new(job: JobId, rx: oneshot::Receiver<Result<(), TaskError>>) -> Self {
        Self { job, rx }
    }

    /// Id of the job backing this handle.
    pub fn job(&self) -> JobId {
        self.job
    }
}

impl Future for TaskHandle {
    type Output = Result<(), TaskError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.unwrap_or(Err(TaskError::Dropped)))
    }
}
