//! # Executor: admission and completion scheduling.
//!
//! [`Executor`] owns the [`Lanes`] (running set and waiting queue) behind one mutex and
//! hands admitted jobs to a shared [`WorkerPool`].
//!
//! ## Admission
//! ```text
//! execute(task) / submit(task)
//!   └─► lock ─► Lanes::admit(job)
//!         ├─ Run(job)      ─► dispatch(job) ─► pool
//!         ├─ Queued        ─► TaskQueued
//!         └─ Overflow(..)
//!              ├─ Evicted     ─► TaskQueued + TaskEvicted (evicted job dropped after unlock)
//!              ├─ Discarded   ─► TaskDiscarded
//!              ├─ Rejected    ─► Err(SubmitError::Rejected)
//!              └─ RunInCaller ─► unlock ─► run task inline ─► return
//! ```
//!
//! ## Completion
//! ```text
//! pool worker: run_once(task)
//!   └─► lock ─► Lanes::release(id)
//!   │            └─ missing id ─► running set cleared, BookkeepingReset
//!   │        ─► Lanes::promote() ─► dispatch(next)   (at most one)
//!   │        ─► idle? ─► Drained
//!   └─► unlock ─► resolve TaskHandle
//! ```
//!
//! ## Rules
//! - The lock is never held across `.await` and never while a task body runs.
//! - Jobs that will never run are dropped after the lock is released. This includes work
//!   a pool refused, which comes back inside a [`Refusal`](crate::pool::Refusal).
//! - Events are only built when the bus has a receiver.
//! - A task's handle resolves only after its slot has been released.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, error, warn};

use crate::error::{ConfigError, SubmitError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::executor::builder::ExecutorBuilder;
use crate::executor::config::ExecutorConfig;
use crate::executor::handle::TaskHandle;
use crate::executor::info::{Counters, ExecutorInfo, ExecutorStats};
use crate::executor::job::{Job, JobId};
use crate::executor::lanes::{Admission, Lanes, Limits, Release};
use crate::executor::runner::run_once;
use crate::policies::{Overflow, OverloadPolicy, SchedulePolicy};
use crate::pool::{Refusal, Work, WorkerPool};
use crate::tasks::TaskRef;

/// Bounded-concurrency task executor.
///
/// At most `core_size` tasks run at once; up to `queue_size` more wait in a queue; once
/// both are full the [`OverloadPolicy`] decides what happens to the next submission.
///
/// Cheap to clone: clones share the same lanes, pool and event bus.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use taskgate::{Executor, ExecutorConfig, OverloadPolicy, TaskError, TaskFn, TaskRef};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let cfg = ExecutorConfig::sized(2).with_overload(OverloadPolicy::RejectWithError);
/// let exec = Executor::new(cfg)?;
///
/// let hello: TaskRef = TaskFn::arc("hello", || async {
///     println!("hello from the pool");
///     Ok::<(), TaskError>(())
/// });
///
/// let handle = exec.submit(Arc::clone(&hello)).await?;
/// handle.await?;
/// # Ok(()) }
/// ```
#[derive(Clone)]
pub struct Executor {
    shared: Arc<Shared>,
}

pub(crate) struct Shared {
    lanes: Mutex<Lanes>,
    pool: Arc<dyn WorkerPool>,
    bus: Bus,
    counters: Counters,
    /// Dropped together with the executor; tells the subscriber listener to drain and stop.
    _listener_stop: Option<oneshot::Sender<()>>,
}

impl Executor {
    /// Creates an executor on the current tokio runtime, without subscribers.
    ///
    /// Equivalent to `Executor::builder(cfg).build()`.
    pub fn new(cfg: ExecutorConfig) -> Result<Self, ConfigError> {
        ExecutorBuilder::new(cfg).build()
    }

    /// Starts building an executor with a custom pool or subscribers.
    pub fn builder(cfg: ExecutorConfig) -> ExecutorBuilder {
        ExecutorBuilder::new(cfg)
    }

    /// Assembles an executor from validated parts.
    pub(crate) fn from_parts(
        cfg: &ExecutorConfig,
        pool: Arc<dyn WorkerPool>,
        bus: Bus,
        listener_stop: Option<oneshot::Sender<()>>,
    ) -> Self {
        let limits = Limits {
            core_size: cfg.core_size,
            queue_size: cfg.queue_size,
            schedule: cfg.schedule,
            overload: cfg.overload,
        };
        debug!(
            core_size = cfg.core_size,
            queue_size = cfg.queue_size,
            schedule = %cfg.schedule,
            overload = %cfg.overload,
            "executor created"
        );
        Self {
            shared: Arc::new(Shared {
                lanes: Mutex::new(Lanes::new(limits)),
                pool,
                bus,
                counters: Counters::default(),
                _listener_stop: listener_stop,
            }),
        }
    }

    /// Submits a task for execution, discarding its outcome.
    ///
    /// Passing `None` is a no-op. Returns `Err` only under
    /// [`OverloadPolicy::RejectWithError`]. Under [`OverloadPolicy::CallerRuns`] the task
    /// body runs to completion on the caller before this returns.
    pub async fn execute(&self, task: impl Into<Option<TaskRef>>) -> Result<(), SubmitError> {
        let Some(task) = task.into() else {
            return Ok(());
        };
        if let Some(job) = self.shared.admit(Job::new(task))? {
            self.shared.run_in_caller(job).await;
        }
        Ok(())
    }

    /// Submits a task and returns a handle resolving to its outcome.
    ///
    /// Admission is the same as [`Executor::execute`]. A task that never runs (evicted,
    /// discarded, canceled, refused by the pool) resolves its handle with an error for
    /// which [`TaskError::never_ran`] is true.
    pub async fn submit(&self, task: TaskRef) -> Result<TaskHandle, SubmitError> {
        let (job, handle) = Job::with_handle(task);
        if let Some(job) = self.shared.admit(job)? {
            self.shared.run_in_caller(job).await;
        }
        Ok(handle)
    }

    /// Removes every waiting job wrapping `task` (reference equality).
    ///
    /// Returns `true` if at least one job was removed. Running jobs are not affected.
    pub fn cancel_waiting(&self, task: &TaskRef) -> bool {
        let s = &self.shared;
        let removed = {
            let mut lanes = s.lanes.lock();
            let removed = lanes.cancel(task);
            for job in &removed {
                s.bus.publish_with(|| {
                    Event::new(EventKind::TaskCanceled)
                        .with_task(job.name())
                        .with_job(job.id().as_u64())
                        .with_occupancy(lanes.running_len(), lanes.waiting_len())
                });
            }
            removed
        };
        if removed.is_empty() {
            return false;
        }

        debug!(task = task.name(), removed = removed.len(), "waiting jobs canceled");
        for job in removed {
            Counters::bump(&s.counters.canceled);
            job.resolve(Err(TaskError::Canceled));
        }
        true
    }

    /// Changes the concurrency ceiling.
    ///
    /// Raising it promotes waiting jobs right away. Lowering it preempts nothing: running
    /// jobs finish and promotion resumes once the running set is below the new limit.
    pub fn set_core_size(&self, core_size: usize) -> Result<(), ConfigError> {
        if core_size == 0 {
            return Err(ConfigError::InvalidCoreSize { value: 0 });
        }
        let s = &self.shared;
        let mut refused = Vec::new();
        {
            let mut lanes = s.lanes.lock();
            lanes.limits.core_size = core_size;
            let promoted = s.fill(&mut lanes, usize::MAX, &mut refused);

            debug!(core_size, promoted, "core size changed");
            s.publish_config(&lanes, format!("core_size={core_size}"));
        }
        drop(refused);
        Ok(())
    }

    /// Changes the waiting queue capacity.
    ///
    /// Shrinking below the current queue length evicts nothing; the queue drains naturally
    /// and overload applies until it is below the new limit.
    pub fn set_queue_size(&self, queue_size: usize) {
        let s = &self.shared;
        let mut lanes = s.lanes.lock();
        lanes.limits.queue_size = queue_size;

        debug!(queue_size, "queue size changed");
        s.publish_config(&lanes, format!("queue_size={queue_size}"));
    }

    /// Changes which waiting job is promoted next.
    pub fn set_schedule_policy(&self, schedule: SchedulePolicy) {
        let s = &self.shared;
        let mut lanes = s.lanes.lock();
        lanes.limits.schedule = schedule;
        s.publish_config(&lanes, format!("schedule={schedule}"));
    }

    /// Changes what happens to submissions once both lanes are full.
    pub fn set_overload_policy(&self, overload: OverloadPolicy) {
        let s = &self.shared;
        let mut lanes = s.lanes.lock();
        lanes.limits.overload = overload;
        s.publish_config(&lanes, format!("overload={overload}"));
    }

    /// Number of jobs currently in the running set.
    pub fn running_count(&self) -> usize {
        self.shared.lanes.lock().running_len()
    }

    /// Number of jobs in the waiting queue.
    pub fn waiting_count(&self) -> usize {
        self.shared.lanes.lock().waiting_len()
    }

    /// Current concurrency ceiling.
    pub fn core_size(&self) -> usize {
        self.shared.lanes.lock().limits.core_size
    }

    /// Current waiting queue capacity.
    pub fn queue_size(&self) -> usize {
        self.shared.lanes.lock().limits.queue_size
    }

    /// Policy picking the next waiting job to promote.
    pub fn schedule_policy(&self) -> SchedulePolicy {
        self.shared.lanes.lock().limits.schedule
    }

    /// Policy applied once both the running set and the waiting queue are full.
    pub fn overload_policy(&self) -> OverloadPolicy {
        self.shared.lanes.lock().limits.overload
    }

    /// Receiver for executor events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }

    /// Snapshot of the executor counters.
    pub fn stats(&self) -> ExecutorStats {
        self.shared.counters.snapshot()
    }

    /// Snapshot of limits, policies, occupancy, pool state and counters.
    pub fn info(&self) -> ExecutorInfo {
        let (limits, running, waiting) = {
            let lanes = self.shared.lanes.lock();
            (lanes.limits, lanes.running_names(), lanes.waiting_names())
        };
        ExecutorInfo {
            core_size: limits.core_size,
            queue_size: limits.queue_size,
            schedule: limits.schedule,
            overload: limits.overload,
            running,
            waiting,
            pool: self.shared.pool.state(),
            stats: self.stats(),
        }
    }
}

impl Shared {
    /// Places `job` according to the lanes and overload policy.
    ///
    /// Returns `Ok(Some(job))` when the caller must run the job inline.
    fn admit(self: &Arc<Self>, job: Job) -> Result<Option<Job>, SubmitError> {
        Counters::bump(&self.counters.submitted);
        let name = job.name();
        let id = job.id().as_u64();

        let mut dropped: Option<Job> = None;
        let mut refused = Vec::new();
        let outcome = {
            let mut lanes = self.lanes.lock();
            match lanes.admit(job) {
                Admission::Run(job) => {
                    self.dispatch(&mut lanes, job, "admitted", &mut refused);
                    Ok(None)
                }
                Admission::Queued => {
                    self.queued(&lanes, &name, id);
                    Ok(None)
                }
                Admission::Overflow(overflow) => {
                    let policy = lanes.limits.overload;
                    let running = lanes.running_len();
                    let waiting = lanes.waiting_len();
                    warn!(
                        task = %name,
                        job = id,
                        running,
                        waiting,
                        policy = %policy,
                        "executor overloaded"
                    );

                    match overflow {
                        Overflow::Evicted { evicted } => {
                            Counters::bump(&self.counters.evicted);
                            self.bus.publish_with(|| {
                                Event::new(EventKind::TaskEvicted)
                                    .with_task(evicted.name())
                                    .with_job(evicted.id().as_u64())
                                    .with_occupancy(running, waiting)
                                    .with_reason(policy.as_str())
                            });
                            self.queued(&lanes, &name, id);
                            dropped = Some(evicted);
                            Ok(None)
                        }
                        Overflow::Discarded(job) => {
                            Counters::bump(&self.counters.discarded);
                            self.bus.publish_with(|| {
                                Event::new(EventKind::TaskDiscarded)
                                    .with_task(Arc::clone(&name))
                                    .with_job(id)
                                    .with_occupancy(running, waiting)
                                    .with_reason(policy.as_str())
                            });
                            dropped = Some(job);
                            Ok(None)
                        }
                        Overflow::Rejected(job) => {
                            Counters::bump(&self.counters.rejected);
                            self.bus.publish_with(|| {
                                Event::new(EventKind::TaskRejected)
                                    .with_task(Arc::clone(&name))
                                    .with_job(id)
                                    .with_occupancy(running, waiting)
                            });
                            dropped = Some(job);
                            Err(SubmitError::Rejected {
                                task: Arc::clone(&name),
                                running,
                                waiting,
                            })
                        }
                        Overflow::RunInCaller(job) => {
                            Counters::bump(&self.counters.caller_runs);
                            self.bus.publish_with(|| {
                                Event::new(EventKind::CallerRuns)
                                    .with_task(Arc::clone(&name))
                                    .with_job(id)
                                    .with_occupancy(running, waiting)
                            });
                            Ok(Some(job))
                        }
                    }
                }
            }
        };
        drop(dropped);
        drop(refused);
        outcome
    }

    fn queued(&self, lanes: &Lanes, name: &Arc<str>, id: u64) {
        Counters::bump(&self.counters.queued);
        debug!(task = %name, job = id, waiting = lanes.waiting_len(), "task queued");
        self.bus.publish_with(|| {
            Event::new(EventKind::TaskQueued)
                .with_task(Arc::clone(name))
                .with_job(id)
                .with_occupancy(lanes.running_len(), lanes.waiting_len())
        });
    }

    /// Hands a job whose slot is already reserved to the pool.
    ///
    /// Returns `false` if the pool refused it; the slot is released again and the refused
    /// work is pushed to `refused`, to be dropped by the caller once the lock is released.
    fn dispatch(
        self: &Arc<Self>,
        lanes: &mut Lanes,
        job: Job,
        via: &'static str,
        refused: &mut Vec<Work>,
    ) -> bool {
        let (id, task, done) = job.into_parts();
        let name: Arc<str> = Arc::from(task.name());

        let shared = Arc::clone(self);
        let fut = async move {
            let result = run_once(task.as_ref()).await;
            shared.complete(id, &task, &result);
            if let Some(done) = done {
                let _ = done.send(result);
            }
        };

        match self
            .pool
            .dispatch(Work::new(id.as_u64(), Arc::clone(&name), Box::pin(fut)))
        {
            Ok(()) => {
                Counters::bump(&self.counters.dispatched);
                debug!(
                    task = %name,
                    job = %id,
                    running = lanes.running_len(),
                    via,
                    "task dispatched"
                );
                self.bus.publish_with(|| {
                    Event::new(EventKind::TaskDispatched)
                        .with_task(name)
                        .with_job(id.as_u64())
                        .with_occupancy(lanes.running_len(), lanes.waiting_len())
                        .with_reason(via)
                });
                true
            }
            Err(Refusal { work, error: err }) => {
                refused.push(work);
                lanes.release(id);
                Counters::bump(&self.counters.refused);
                error!(task = %name, job = %id, error = %err, "worker pool refused task");
                self.bus.publish_with(|| {
                    Event::new(EventKind::PoolRefused)
                        .with_task(name)
                        .with_job(id.as_u64())
                        .with_occupancy(lanes.running_len(), lanes.waiting_len())
                        .with_reason(err.to_string())
                });
                false
            }
        }
    }

    /// Promotes and dispatches up to `max` waiting jobs; returns how many were dispatched.
    ///
    /// Refused jobs do not count towards `max`.
    fn fill(
        self: &Arc<Self>,
        lanes: &mut Lanes,
        max: usize,
        refused: &mut Vec<Work>,
    ) -> usize {
        let mut dispatched = 0;
        while dispatched < max {
            let Some(job) = lanes.promote() else {
                break;
            };
            if self.dispatch(lanes, job, "promoted", refused) {
                dispatched += 1;
            }
        }
        dispatched
    }

    /// Completion hook: runs once per dispatched job after its body finished.
    fn complete(self: &Arc<Self>, id: JobId, task: &TaskRef, result: &Result<(), TaskError>) {
        self.record_outcome(id, task, result);

        let mut refused = Vec::new();
        let mut lanes = self.lanes.lock();
        if let Release::Reset { cleared } = lanes.release(id) {
            Counters::bump(&self.counters.resets);
            error!(
                task = task.name(),
                job = %id,
                cleared,
                "completed job missing from running set, running set cleared"
            );
            self.bus.publish_with(|| {
                Event::new(EventKind::BookkeepingReset)
                    .with_task(task.name())
                    .with_job(id.as_u64())
                    .with_occupancy(cleared, lanes.waiting_len())
            });
        }

        self.fill(&mut lanes, 1, &mut refused);
        if lanes.is_idle() {
            debug!("all tasks completed");
            self.bus.publish_with(|| Event::new(EventKind::Drained));
        }
        drop(lanes);
        drop(refused);
    }

    /// Runs a `CallerRuns` job on the current task. No lane is touched.
    async fn run_in_caller(&self, job: Job) {
        let (id, task, done) = job.into_parts();
        debug!(task = task.name(), job = %id, "running task in caller");

        let result = run_once(task.as_ref()).await;
        self.record_outcome(id, &task, &result);
        if let Some(done) = done {
            let _ = done.send(result);
        }
    }

    fn record_outcome(&self, id: JobId, task: &TaskRef, result: &Result<(), TaskError>) {
        match result {
            Ok(()) => Counters::bump(&self.counters.completed),
            Err(err) => {
                Counters::bump(&self.counters.failed);
                debug!(task = task.name(), job = %id, error = %err, "task failed");
            }
        }
        self.bus.publish_with(|| {
            let ev = match result {
                Ok(()) => Event::new(EventKind::TaskFinished),
                Err(err) => Event::new(EventKind::TaskFailed).with_reason(err.to_string()),
            };
            ev.with_task(task.name()).with_job(id.as_u64())
        });
    }

    fn publish_config(&self, lanes: &Lanes, change: String) {
        self.bus.publish_with(|| {
            Event::new(EventKind::ConfigChanged)
                .with_occupancy(lanes.running_len(), lanes.waiting_len())
                .with_reason(change)
        });
    }
}
