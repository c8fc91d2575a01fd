//! Scheduling and overload policies.
//!
//! This module groups the two closed policy families the executor consults.
//!
//! ## Contents
//! - [`SchedulePolicy`] which waiting job is admitted next (FIFO / LIFO)
//! - [`OverloadPolicy`] what happens to a new job when everything is full
//! - [`Overflow`] outcome of [`OverloadPolicy::apply`]
//!
//! ## Quick wiring
//! ```text
//! Executor::execute(task)
//!      └─► running full, waiting full ─► overload.apply(&mut waiting, job)
//!
//! job completes
//!      └─► schedule.next(&mut waiting) ─► dispatch
//! ```
//!
//! ## Defaults
//! - `SchedulePolicy::FirstInFirstRun`
//! - `OverloadPolicy::DiscardOldestInQueue`

mod overload;
mod schedule;

pub use overload::{Overflow, OverloadPolicy};
pub use schedule::SchedulePolicy;

/// Lowercases and strips separators so `caller-runs`, `caller_runs` and `CallerRuns`
/// compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
