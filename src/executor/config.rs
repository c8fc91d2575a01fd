//! # Executor configuration.
//!
//! Provides [`ExecutorConfig`], the limits and policies of one [`Executor`](crate::Executor).
//!
//! Config is used in two ways:
//! 1. **Construction**: `Executor::builder(config).build()` validates it once.
//! 2. **Runtime changes**: `Executor::set_core_size`, `set_queue_size`,
//!    `set_schedule_policy`, `set_overload_policy` adjust a live executor.
//!
//! ## Environment
//! [`ExecutorConfig::from_env`] reads `TASKGATE_*` variables on top of the defaults:
//!
//! | Variable                    | Field          |
//! |-----------------------------|----------------|
//! | `TASKGATE_CORE_SIZE`        | `core_size`    |
//! | `TASKGATE_QUEUE_SIZE`       | `queue_size`   |
//! | `TASKGATE_SCHEDULE_POLICY`  | `schedule`     |
//! | `TASKGATE_OVERLOAD_POLICY`  | `overload`     |
//! | `TASKGATE_BUS_CAPACITY`     | `bus_capacity` |
//!
//! Empty variables count as unset. Malformed values are errors, not silently defaulted.

use std::thread;

use crate::error::ConfigError;
use crate::policies::{OverloadPolicy, SchedulePolicy};

/// Waiting-queue slots per core slot when `queue_size` is derived.
pub const QUEUE_SLOTS_PER_CORE: usize = 32;

/// Limits and policies of an executor.
///
/// ## Field semantics
/// - `core_size`: maximum number of jobs running at once (`>= 1`)
/// - `queue_size`: maximum number of jobs waiting (`0` = no buffering)
/// - `schedule`: which waiting job runs next
/// - `overload`: what happens to a new job when both are full
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by `Bus`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Concurrent execution ceiling.
    pub core_size: usize,
    /// Waiting queue ceiling.
    pub queue_size: usize,
    /// Dequeue order for waiting jobs.
    pub schedule: SchedulePolicy,
    /// Disposition of new jobs when saturated.
    pub overload: OverloadPolicy,
    /// Capacity of the event bus.
    pub bus_capacity: usize,
}

impl ExecutorConfig {
    /// Config with the given `core_size` and a derived `queue_size` of
    /// `core_size × 32`; policies default.
    pub fn sized(core_size: usize) -> Self {
        Self {
            core_size,
            queue_size: core_size.saturating_mul(QUEUE_SLOTS_PER_CORE),
            ..Self::default()
        }
    }

    /// Config from untyped limits, as they come from flags or config files.
    ///
    /// # Example
    /// ```
    /// use taskgate::{ConfigError, ExecutorConfig};
    ///
    /// let cfg = ExecutorConfig::try_with_limits(2, 0).unwrap();
    /// assert_eq!((cfg.core_size, cfg.queue_size), (2, 0));
    ///
    /// assert_eq!(
    ///     ExecutorConfig::try_with_limits(2, -1),
    ///     Err(ConfigError::InvalidQueueSize { value: -1 })
    /// );
    /// ```
    pub fn try_with_limits(core_size: i64, queue_size: i64) -> Result<Self, ConfigError> {
        Ok(Self {
            core_size: checked_core_size(core_size)?,
            queue_size: checked_queue_size(queue_size)?,
            ..Self::default()
        })
    }

    /// Returns a copy with the given schedule policy.
    pub fn with_schedule(mut self, schedule: SchedulePolicy) -> Self {
        self.schedule = schedule;
        self
    }

    /// Returns a copy with the given overload policy.
    pub fn with_overload(mut self, overload: OverloadPolicy) -> Self {
        self.overload = overload;
        self
    }

    /// Checks the invariants the executor relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.core_size == 0 {
            return Err(ConfigError::InvalidCoreSize { value: 0 });
        }
        Ok(())
    }

    /// Reads `TASKGATE_*` environment variables on top of [`ExecutorConfig::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    ///
    /// When only `TASKGATE_CORE_SIZE` is given, `queue_size` is derived from it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut cfg = match get("TASKGATE_CORE_SIZE") {
            Some(v) => Self::sized(checked_core_size(parse_int("TASKGATE_CORE_SIZE", &v)?)?),
            None => Self::default(),
        };
        if let Some(v) = get("TASKGATE_QUEUE_SIZE") {
            cfg.queue_size = checked_queue_size(parse_int("TASKGATE_QUEUE_SIZE", &v)?)?;
        }
        if let Some(v) = get("TASKGATE_SCHEDULE_POLICY") {
            cfg.schedule = v.parse()?;
        }
        if let Some(v) = get("TASKGATE_OVERLOAD_POLICY") {
            cfg.overload = v.parse()?;
        }
        if let Some(v) = get("TASKGATE_BUS_CAPACITY") {
            cfg.bus_capacity = v
                .trim()
                .parse()
                .map_err(|_| malformed("TASKGATE_BUS_CAPACITY", &v))?;
        }
        Ok(cfg)
    }

    /// Bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for ExecutorConfig {
    /// Default configuration:
    ///
    /// - `core_size` = available parallelism (1 if unknown)
    /// - `queue_size` = `core_size × 32`
    /// - `schedule` = `FirstInFirstRun`
    /// - `overload` = `DiscardOldestInQueue`
    /// - `bus_capacity` = 1024
    fn default() -> Self {
        let core_size = thread::available_parallelism().map_or(1, |n| n.get());
        Self {
            core_size,
            queue_size: core_size * QUEUE_SLOTS_PER_CORE,
            schedule: SchedulePolicy::default(),
            overload: OverloadPolicy::default(),
            bus_capacity: 1024,
        }
    }
}

fn parse_int(key: &'static str, raw: &str) -> Result<i64, ConfigError> {
    raw.trim().parse::<i64>().map_err(|_| malformed(key, raw))
}

fn malformed(key: &'static str, raw: &str) -> ConfigError {
    ConfigError::Malformed {
        key,
        value: raw.to_string(),
    }
}

fn checked_core_size(value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value)
        .ok()
        .filter(|n| *n > 0)
        .ok_or(ConfigError::InvalidCoreSize { value })
}

fn checked_queue_size(value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::InvalidQueueSize { value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_derives_queue_from_core() {
        let cfg = ExecutorConfig::default();
        assert!(cfg.core_size >= 1);
        assert_eq!(cfg.queue_size, cfg.core_size * 32);
        assert_eq!(cfg.schedule, SchedulePolicy::FirstInFirstRun);
        assert_eq!(cfg.overload, OverloadPolicy::DiscardOldestInQueue);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_core_size_is_invalid() {
        let mut cfg = ExecutorConfig::sized(3);
        assert_eq!(cfg.queue_size, 96);
        cfg.core_size = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidCoreSize { value: 0 }));
    }

    #[test]
    fn untyped_limits_are_checked() {
        assert_eq!(
            ExecutorConfig::try_with_limits(0, 4),
            Err(ConfigError::InvalidCoreSize { value: 0 })
        );
        assert_eq!(
            ExecutorConfig::try_with_limits(-3, 4),
            Err(ConfigError::InvalidCoreSize { value: -3 })
        );
        assert_eq!(
            ExecutorConfig::try_with_limits(1, -1),
            Err(ConfigError::InvalidQueueSize { value: -1 })
        );
        assert!(ExecutorConfig::try_with_limits(1, 0).is_ok());
    }

    #[test]
    fn env_overrides_defaults() {
        let cfg = ExecutorConfig::from_lookup(lookup(&[
            ("TASKGATE_CORE_SIZE", "4"),
            ("TASKGATE_SCHEDULE_POLICY", "lifo"),
            ("TASKGATE_OVERLOAD_POLICY", "caller-runs"),
        ]))
        .unwrap();

        assert_eq!(cfg.core_size, 4);
        assert_eq!(cfg.queue_size, 128);
        assert_eq!(cfg.schedule, SchedulePolicy::LastInFirstRun);
        assert_eq!(cfg.overload, OverloadPolicy::CallerRuns);
    }

    #[test]
    fn env_empty_values_are_unset() {
        let cfg = ExecutorConfig::from_lookup(lookup(&[
            ("TASKGATE_QUEUE_SIZE", "0"),
            ("TASKGATE_OVERLOAD_POLICY", "  "),
        ]))
        .unwrap();
        assert_eq!(cfg.queue_size, 0);
        assert_eq!(cfg.overload, OverloadPolicy::DiscardOldestInQueue);
    }

    #[test]
    fn env_bad_values_are_errors() {
        let err =
            ExecutorConfig::from_lookup(lookup(&[("TASKGATE_QUEUE_SIZE", "-2")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidQueueSize { value: -2 });

        let err =
            ExecutorConfig::from_lookup(lookup(&[("TASKGATE_CORE_SIZE", "many")])).unwrap_err();
        assert_eq!(err.as_label(), "config_malformed");

        let err = ExecutorConfig::from_lookup(lookup(&[("TASKGATE_SCHEDULE_POLICY", "random")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPolicy { kind: "schedule", .. }));
    }
}
