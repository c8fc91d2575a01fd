//! End-to-end behavior on a real multi-thread tokio runtime.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use taskgate::{
    Executor, ExecutorConfig, OverloadPolicy, RuntimePool, SubmitError, TaskError, TaskFn,
    TaskRef, WorkerPool,
};
use tokio::sync::Notify;

/// Task that tracks how many copies of itself run at once.
fn probe(name: &'static str, live: Arc<AtomicUsize>, peak: Arc<AtomicUsize>) -> TaskRef {
    TaskFn::arc(name, move || {
        let live = Arc::clone(&live);
        let peak = Arc::clone(&peak);
        async move {
            let now = live.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            live.fetch_sub(1, Ordering::SeqCst);
            Ok::<(), TaskError>(())
        }
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrency_never_exceeds_core_size() -> anyhow::Result<()> {
    let exec = Executor::new(ExecutorConfig {
        queue_size: 64,
        ..ExecutorConfig::sized(3)
    })?;
    let live = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let task = probe("probe", Arc::clone(&live), Arc::clone(&peak));

    let mut handles = Vec::new();
    for _ in 0..40 {
        handles.push(exec.submit(Arc::clone(&task)).await?);
    }
    for h in handles {
        h.await?;
    }

    assert!(peak.load(Ordering::SeqCst) <= 3);
    assert_eq!(exec.running_count(), 0);
    assert_eq!(exec.waiting_count(), 0);
    assert_eq!(exec.stats().completed, 40);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_pool_keeps_per_executor_limits() -> anyhow::Result<()> {
    let pool: Arc<dyn WorkerPool> = Arc::new(RuntimePool::current()?);
    let small = Executor::builder(ExecutorConfig::sized(1))
        .with_pool(Arc::clone(&pool))
        .build()?;
    let large = Executor::builder(ExecutorConfig::sized(2))
        .with_pool(Arc::clone(&pool))
        .build()?;

    let (small_live, small_peak) = (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)));
    let (large_live, large_peak) = (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)));
    let small_task = probe("small", small_live, Arc::clone(&small_peak));
    let large_task = probe("large", large_live, Arc::clone(&large_peak));

    let mut handles = Vec::new();
    for _ in 0..10 {
        handles.push(small.submit(Arc::clone(&small_task)).await?);
        handles.push(large.submit(Arc::clone(&large_task)).await?);
    }
    for h in handles {
        h.await?;
    }

    assert_eq!(small_peak.load(Ordering::SeqCst), 1);
    assert!(large_peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(pool.state().dispatched, 20);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reject_while_single_slot_is_busy() -> anyhow::Result<()> {
    let exec = Executor::new(ExecutorConfig {
        queue_size: 0,
        overload: OverloadPolicy::RejectWithError,
        ..ExecutorConfig::sized(1)
    })?;

    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let gated: TaskRef = {
        let started = Arc::clone(&started);
        let release = Arc::clone(&release);
        TaskFn::arc("A", move || {
            let started = Arc::clone(&started);
            let release = Arc::clone(&release);
            async move {
                started.notify_one();
                release.notified().await;
                Ok::<(), TaskError>(())
            }
        })
    };

    let a = exec.submit(gated).await?;
    started.notified().await;

    let b: TaskRef = TaskFn::arc("B", || async { Ok::<(), TaskError>(()) });
    match exec.execute(b).await {
        Err(SubmitError::Rejected { task, .. }) => assert_eq!(&*task, "B"),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(exec.running_count(), 1);

    release.notify_one();
    a.await?;
    assert_eq!(exec.running_count(), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn caller_runs_on_the_submitting_task() -> anyhow::Result<()> {
    let exec = Executor::new(ExecutorConfig {
        queue_size: 0,
        overload: OverloadPolicy::CallerRuns,
        ..ExecutorConfig::sized(1)
    })?;

    let release = Arc::new(Notify::new());
    let blocker: TaskRef = {
        let release = Arc::clone(&release);
        TaskFn::arc("blocker", move || {
            let release = Arc::clone(&release);
            async move {
                release.notified().await;
                Ok::<(), TaskError>(())
            }
        })
    };
    let blocked = exec.submit(blocker).await?;

    let ran = Arc::new(AtomicUsize::new(0));
    let inline: TaskRef = {
        let ran = Arc::clone(&ran);
        TaskFn::arc("inline", move || {
            let ran = Arc::clone(&ran);
            async move {
                ran.fetch_add(1, Ordering::SeqCst);
                Ok::<(), TaskError>(())
            }
        })
    };
    exec.execute(inline).await?;
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert_eq!(exec.running_count(), 1);

    release.notify_one();
    blocked.await?;
    Ok(())
}
