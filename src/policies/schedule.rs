//! # Schedule policy.
//!
//! [`SchedulePolicy`] decides which waiting job is admitted when a running slot frees up.
//!
//! - [`SchedulePolicy::FirstInFirstRun`] pops the **head** (oldest arrival). Fair,
//!   latency-ordered (default).
//! - [`SchedulePolicy::LastInFirstRun`] pops the **tail** (newest arrival). Prefers fresh
//!   work over stale work, e.g. a list screen that only cares about the latest page.
//!
//! ```text
//!  waiting: [ a  b  c  d ]
//!             ▲        ▲
//!  FirstIn ───┘        └─── LastIn
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Ordering used to pick the next waiting job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SchedulePolicy {
    /// Admit the earliest arrival first (FIFO).
    #[default]
    FirstInFirstRun,
    /// Admit the most recent arrival first (LIFO).
    LastInFirstRun,
}

impl SchedulePolicy {
    /// Pops the next item from `queue` according to this policy.
    ///
    /// # Example
    /// ```
    /// use std::collections::VecDeque;
    /// use taskgate::SchedulePolicy;
    ///
    /// let mut q: VecDeque<_> = [1, 2, 3].into();
    /// assert_eq!(SchedulePolicy::FirstInFirstRun.next(&mut q), Some(1));
    /// assert_eq!(SchedulePolicy::LastInFirstRun.next(&mut q), Some(3));
    /// assert_eq!(q, [2]);
    /// ```
    #[inline]
    pub fn next<T>(self, queue: &mut VecDeque<T>) -> Option<T> {
        match self {
            SchedulePolicy::FirstInFirstRun => queue.pop_front(),
            SchedulePolicy::LastInFirstRun => queue.pop_back(),
        }
    }

    /// Stable kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            SchedulePolicy::FirstInFirstRun => "first-in-first-run",
            SchedulePolicy::LastInFirstRun => "last-in-first-run",
        }
    }
}

impl fmt::Display for SchedulePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchedulePolicy {
    type Err = ConfigError;

    /// Accepts kebab-case (`first-in-first-run`), snake_case, CamelCase and the
    /// short forms `fifo` / `lifo`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "firstinfirstrun" | "fifo" => Ok(SchedulePolicy::FirstInFirstRun),
            "lastinfirstrun" | "lifo" => Ok(SchedulePolicy::LastInFirstRun),
            _ => Err(ConfigError::UnknownPolicy {
                kind: "schedule",
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_drains_in_arrival_order() {
        let mut q: VecDeque<_> = ["a", "b", "c"].into();
        let order: Vec<_> =
            std::iter::from_fn(|| SchedulePolicy::FirstInFirstRun.next(&mut q)).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn lifo_drains_newest_first() {
        let mut q: VecDeque<_> = ["a", "b", "c"].into();
        let order: Vec<_> =
            std::iter::from_fn(|| SchedulePolicy::LastInFirstRun.next(&mut q)).collect();
        assert_eq!(order, ["c", "b", "a"]);
    }

    #[test]
    fn empty_queue_yields_nothing() {
        let mut q: VecDeque<u8> = VecDeque::new();
        assert_eq!(SchedulePolicy::FirstInFirstRun.next(&mut q), None);
        assert_eq!(SchedulePolicy::LastInFirstRun.next(&mut q), None);
    }

    #[test]
    fn parses_common_spellings() {
        for s in ["first-in-first-run", "FirstInFirstRun", "first_in_first_run", "FIFO"] {
            assert_eq!(s.parse::<SchedulePolicy>(), Ok(SchedulePolicy::FirstInFirstRun), "{s}");
        }
        assert_eq!("lifo".parse::<SchedulePolicy>(), Ok(SchedulePolicy::LastInFirstRun));
        assert_eq!(
            SchedulePolicy::LastInFirstRun.to_string().parse::<SchedulePolicy>(),
            Ok(SchedulePolicy::LastInFirstRun)
        );
    }

    #[test]
    fn absent_or_unknown_name_is_config_error() {
        let err = "".parse::<SchedulePolicy>().unwrap_err();
        assert_eq!(err.as_label(), "config_unknown_policy");
        assert!("round-robin".parse::<SchedulePolicy>().is_err());
    }
}
