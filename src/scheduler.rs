use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::Config;
use crate::sync::ThreadWatcher;

/// Initialize and start the thread-polling scheduler.
///
/// Convergence is polling, not push: the job periodically refreshes the
/// watcher, which replaces its snapshot wholesale from the canonical store.
pub async fn start_scheduler(
    config: Arc<Config>,
    watcher: Arc<ThreadWatcher>,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let interval = Duration::from_secs(config.thread_poll_seconds.max(1));
    info!("Scheduling thread poll every {:?}", interval);

    let job = Job::new_repeated_async(interval, move |_uuid, _l| {
        let watcher = Arc::clone(&watcher);
        Box::pin(async move {
            let refreshed = tokio::task::spawn_blocking(move || watcher.refresh()).await;
            match refreshed {
                Ok(Ok(outcome)) => {
                    if !outcome.new_activity.is_empty() {
                        info!(
                            "Thread poll: {} thread(s) with new activity (of {})",
                            outcome.new_activity.len(),
                            outcome.thread_count
                        );
                    }
                }
                Ok(Err(e)) => error!("Thread poll failed: {}", e),
                Err(e) => error!("Thread poll task failed: {}", e),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    info!("✓ Scheduler started");

    Ok(scheduler)
}
