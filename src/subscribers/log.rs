//! # Logging subscriber.
//!
//! [`LogWriter`] renders executor events through `tracing`: routine admission and
//! completion at `debug`, overload outcomes at `warn`, diagnostics at `error`.
//!
//! ## Output format
//! ```text
//! [dispatched] task=fetch job=3 running=2 waiting=0 via=admitted
//! [queued] task=fetch job=4 running=2 waiting=1
//! [evicted] task=fetch job=4 policy=discard-oldest-in-queue
//! [finished] task=fetch job=3
//! [drained]
//! ```
//!
//! ## Example
//! ```no_run
//! # use std::sync::Arc;
//! # use taskgate::{Executor, ExecutorConfig, LogWriter, Subscribe};
//! # async fn demo() -> Result<(), taskgate::ConfigError> {
//! let exec = Executor::builder(ExecutorConfig::default())
//!     .with_subscribers(vec![Arc::new(LogWriter) as Arc<dyn Subscribe>])
//!     .build()?;
//! # let _ = exec;
//! # Ok(()) }
//! ```

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Subscriber forwarding events to `tracing`.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::TaskDispatched => debug!(
                "[dispatched] task={task} job={:?} running={:?} waiting={:?} via={}",
                e.job,
                e.running,
                e.waiting,
                e.reason.as_deref().unwrap_or("admitted")
            ),
            EventKind::TaskQueued => debug!(
                "[queued] task={task} job={:?} running={:?} waiting={:?}",
                e.job, e.running, e.waiting
            ),
            EventKind::TaskFinished => debug!("[finished] task={task} job={:?}", e.job),
            EventKind::TaskFailed => warn!(
                "[failed] task={task} job={:?} err={:?}",
                e.job, e.reason
            ),
            EventKind::TaskCanceled => debug!("[canceled] task={task} job={:?}", e.job),
            EventKind::Drained => debug!("[drained]"),
            EventKind::TaskEvicted => warn!(
                "[evicted] task={task} job={:?} policy={:?}",
                e.job, e.reason
            ),
            EventKind::TaskDiscarded => warn!("[discarded] task={task} policy={:?}", e.reason),
            EventKind::TaskRejected => warn!(
                "[rejected] task={task} running={:?} waiting={:?}",
                e.running, e.waiting
            ),
            EventKind::CallerRuns => warn!("[caller-runs] task={task}"),
            EventKind::ConfigChanged => debug!("[config] {:?}", e.reason),
            EventKind::BookkeepingReset => error!(
                "[bookkeeping-reset] task={task} job={:?} cleared={:?}",
                e.job, e.running
            ),
            EventKind::PoolRefused => error!(
                "[pool-refused] task={task} job={:?} err={:?}",
                e.job, e.reason
            ),
            EventKind::SubscriberPanicked | EventKind::SubscriberOverflow => {
                warn!("[subscriber] name={task} {:?}", e.reason)
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
