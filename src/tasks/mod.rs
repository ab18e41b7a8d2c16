use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::CacheBackend;
use crate::jobs::JobType;
use crate::state::AppState;

pub mod cache_warm;

pub async fn start_scheduler(state: AppState) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    if let Some(schedule) = state.config.cache_warm_schedule.clone() {
        let queue = state.job_queue.clone();
        let warm_job = Job::new_async(schedule.as_str(), move |_uuid, _lock| {
            let queue = queue.clone();
            Box::pin(async move {
                if let Err(e) = queue.submit(JobType::CacheWarm { service: None }).await {
                    tracing::error!("Failed to queue scheduled cache warm: {}", e);
                }
            })
        })?;
        scheduler.add(warm_job).await?;
        tracing::info!("Scheduled cache warm on '{}'", schedule);
    }

    if state.config.cache_backend == CacheBackend::Memory {
        let cache = state.cache.clone();
        // Every minute
        let sweep_job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
            let cache = cache.clone();
            Box::pin(async move {
                cache.evict_expired();
            })
        })?;
        scheduler.add(sweep_job).await?;
    }

    scheduler.start().await?;

    Ok(scheduler)
}
