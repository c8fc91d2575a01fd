//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per spawn.
//! There is no hidden state shared between runs; if the body needs shared state,
//! capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use taskgate::{TaskFn, TaskRef, TaskError};
//!
//! let t: TaskRef = TaskFn::arc("fetch", || async move {
//!     // do work...
//!     Ok::<_, TaskError>(())
//! });
//!
//! assert_eq!(t.name(), "fetch");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use crate::error::TaskError;
use crate::tasks::task::{BoxTaskFuture, Task};

/// Function-backed task implementation.
#[derive(Debug)]
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`](crate::TaskRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> Task for TaskFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(&self) -> BoxTaskFuture {
        Box::pin((self.f)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{TaskRef, same_task};

    #[tokio::test]
    async fn spawn_creates_fresh_future_each_time() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let t: TaskRef = TaskFn::arc("count", move || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok::<(), TaskError>(())
            }
        });

        t.spawn().await.unwrap();
        t.spawn().await.unwrap();
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn identity_is_by_reference() {
        let a: TaskRef = TaskFn::arc("same", || async { Ok::<(), TaskError>(()) });
        let b: TaskRef = TaskFn::arc("same", || async { Ok::<(), TaskError>(()) });
        let a2 = Arc::clone(&a);

        assert!(same_task(&a, &a2));
        assert!(!same_task(&a, &b));
    }
}
