//! Error types used by the executor, worker pools and tasks.
//!
//! This module defines four error enums:
//!
//! - [`ConfigError`]: invalid configuration (raised synchronously, nothing is changed).
//! - [`SubmitError`]: a submission refused by the overload policy.
//! - [`TaskError`]: the outcome of a task that failed or never ran.
//! - [`PoolError`]: a worker pool refusing dispatched work.
//!
//! All types provide `as_label` (stable snake_case strings for logs/metrics).

use std::sync::Arc;

use thiserror::Error;

/// # Errors produced while configuring an executor.
///
/// Returned by [`ExecutorConfig::validate`](crate::ExecutorConfig::validate), the builder
/// and the runtime setters. A failed call never mutates executor state.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `core_size` must be at least 1.
    #[error("core size must be positive, got {value}")]
    InvalidCoreSize {
        /// The rejected value.
        value: i64,
    },

    /// `queue_size` must not be negative.
    #[error("queue size must not be negative, got {value}")]
    InvalidQueueSize {
        /// The rejected value.
        value: i64,
    },

    /// A policy name was absent or not recognized.
    #[error("unknown {kind} policy: {name:?}")]
    UnknownPolicy {
        /// Policy family (`schedule` or `overload`).
        kind: &'static str,
        /// The rejected name.
        name: String,
    },

    /// A configuration value could not be parsed.
    #[error("malformed value for {key}: {value:?}")]
    Malformed {
        /// Configuration key.
        key: &'static str,
        /// The raw value.
        value: String,
    },

    /// No worker pool was supplied and no tokio runtime is available to build one.
    #[error("no worker pool configured and no tokio runtime is running")]
    NoRuntime,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskgate::ConfigError;
    ///
    /// let err = ConfigError::InvalidCoreSize { value: 0 };
    /// assert_eq!(err.as_label(), "config_invalid_core_size");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidCoreSize { .. } => "config_invalid_core_size",
            ConfigError::InvalidQueueSize { .. } => "config_invalid_queue_size",
            ConfigError::UnknownPolicy { .. } => "config_unknown_policy",
            ConfigError::Malformed { .. } => "config_malformed",
            ConfigError::NoRuntime => "config_no_runtime",
        }
    }
}

/// # Errors returned by [`Executor::submit`](crate::Executor::submit) and
/// [`Executor::execute`](crate::Executor::execute).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Both the running set and the waiting queue were full and the overload policy is
    /// [`OverloadPolicy::RejectWithError`](crate::OverloadPolicy::RejectWithError).
    #[error("task '{task}' rejected: executor overloaded (running={running}, waiting={waiting})")]
    Rejected {
        /// Name of the rejected task.
        task: Arc<str>,
        /// Running set size at rejection time.
        running: usize,
        /// Waiting queue size at rejection time.
        waiting: usize,
    },
}

impl SubmitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SubmitError::Rejected { .. } => "submit_rejected",
        }
    }

    /// Name of the task this error refers to.
    pub fn task(&self) -> &str {
        match self {
            SubmitError::Rejected { task, .. } => task,
        }
    }
}

/// # Errors produced by task execution.
///
/// A [`TaskHandle`](crate::TaskHandle) resolves to `Err(TaskError)` either because the task
/// body failed, or because the task never ran at all.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Non-recoverable error reported by the task.
    #[error("fatal error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// Task execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task body panicked.
    #[error("task panicked: {reason}")]
    Panicked {
        /// Panic payload rendered as text.
        reason: String,
    },

    /// Task was removed from the waiting queue by `cancel_waiting`.
    #[error("removed from waiting queue")]
    Canceled,

    /// Task never ran: evicted or discarded by the overload policy, or refused by the pool.
    #[error("dropped before running")]
    Dropped,
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskgate::TaskError;
    ///
    /// let err = TaskError::Fail { error: "boom".into() };
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fatal { .. } => "task_fatal",
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Canceled => "task_canceled",
            TaskError::Dropped => "task_dropped",
        }
    }

    /// True if the task body never started.
    ///
    /// # Example
    /// ```
    /// use taskgate::TaskError;
    ///
    /// assert!(TaskError::Dropped.never_ran());
    /// assert!(!TaskError::Fatal { error: "nope".into() }.never_ran());
    /// ```
    pub fn never_ran(&self) -> bool {
        matches!(self, TaskError::Canceled | TaskError::Dropped)
    }
}

/// # Errors produced by a [`WorkerPool`](crate::WorkerPool).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The pool refused the work item; it will never run.
    #[error("work refused by pool: {reason}")]
    Refused {
        /// Why the pool refused.
        reason: String,
    },
}

impl PoolError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            PoolError::Refused { .. } => "pool_refused",
        }
    }
}
