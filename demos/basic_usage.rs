//! # Example: basic_usage
//!
//! Runs eight short downloads through an executor that allows two at a time.
//!
//! Demonstrates how to:
//! - Define a task using [`TaskFn`].
//! - Submit it repeatedly and await each [`TaskHandle`](taskgate::TaskHandle).
//! - Print [`Executor::info`] while work is in flight.
//!
//! ## Flow
//! ```text
//! submit(download) x8
//!     ├─► 2 ─► running set ─► RuntimePool
//!     └─► 6 ─► waiting queue
//! each completion ─► next waiting job (FIFO) ─► RuntimePool
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_usage
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use taskgate::{Executor, ExecutorConfig, TaskError, TaskFn, TaskRef};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Two concurrent jobs, up to eight waiting
    let cfg = ExecutorConfig {
        queue_size: 8,
        ..ExecutorConfig::sized(2)
    };
    let exec = Executor::new(cfg)?;

    // 2. One task, submitted many times; each run is a separate job
    let counter = Arc::new(AtomicUsize::new(0));
    let download: TaskRef = {
        let counter = Arc::clone(&counter);
        TaskFn::arc("download", move || {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                println!("[download] #{n} started");
                tokio::time::sleep(Duration::from_millis(200)).await;
                println!("[download] #{n} done");
                Ok::<(), TaskError>(())
            }
        })
    };

    let mut handles = Vec::new();
    for _ in 0..8 {
        handles.push(exec.submit(Arc::clone(&download)).await?);
    }
    println!("{}", exec.info());

    // 3. Wait for every job
    for h in handles {
        h.await?;
    }
    println!("{}", exec.info());
    Ok(())
}
