//! # Example: overload
//!
//! Saturates a tiny executor under each overload policy and shows what happens to the
//! extra submissions. Events are logged through [`LogWriter`].
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example overload --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use taskgate::{
    Executor, ExecutorConfig, LogWriter, OverloadPolicy, Subscribe, TaskError, TaskFn, TaskRef,
};
use tracing_subscriber::EnvFilter;

fn slow(name: &'static str) -> TaskRef {
    TaskFn::arc(name, move || async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        println!("  [{name}] ran");
        Ok::<(), TaskError>(())
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let policies = [
        OverloadPolicy::DiscardOldestInQueue,
        OverloadPolicy::DiscardNewestInQueue,
        OverloadPolicy::CallerRuns,
        OverloadPolicy::DiscardCurrentTask,
        OverloadPolicy::RejectWithError,
    ];

    for policy in policies {
        println!("== {policy} (core=1, queue=1) ==");
        let cfg = ExecutorConfig {
            queue_size: 1,
            ..ExecutorConfig::sized(1)
        }
        .with_overload(policy);
        let exec = Executor::builder(cfg)
            .with_subscribers(vec![Arc::new(LogWriter) as Arc<dyn Subscribe>])
            .build()?;

        let mut handles = Vec::new();
        for name in ["a", "b", "c"] {
            match exec.submit(slow(name)).await {
                Ok(h) => handles.push((name, h)),
                Err(e) => println!("  [{name}] {e}"),
            }
        }
        for (name, h) in handles {
            if let Err(e) = h.await {
                println!("  [{name}] {e}");
            }
        }
        println!("{}\n", exec.info());
    }
    Ok(())
}
