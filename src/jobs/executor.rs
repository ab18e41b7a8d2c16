use anyhow::Result;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    jobs::{
        queue::JobMessage,
        record::{JobRecord, JobType},
    },
    state::AppState,
    tasks::cache_warm,
};

/// Background job executor that processes jobs from the queue
pub struct JobExecutor {
    state: AppState,
    receiver: mpsc::UnboundedReceiver<JobMessage>,
}

impl JobExecutor {
    pub fn new(state: AppState, receiver: mpsc::UnboundedReceiver<JobMessage>) -> Self {
        Self { state, receiver }
    }

    /// Start the job executor loop
    pub async fn start(mut self) {
        tracing::info!("Job executor started");

        while let Some(message) = self.receiver.recv().await {
            tracing::info!(
                "Processing job {} ({:?})",
                message.job_id,
                message.job_type
            );

            // Spawn each job in its own task to allow concurrent processing
            let state = self.state.clone();
            tokio::spawn(async move {
                if let Err(e) = Self::execute_job(state, message).await {
                    tracing::error!("Job execution failed: {}", e);
                }
            });
        }

        tracing::warn!("Job executor stopped - queue closed");
    }

    /// Execute a single job, recording each status transition in the store
    pub async fn execute_job(state: AppState, message: JobMessage) -> Result<JobRecord> {
        let mut record = Self::load_record(&state, message.job_id, message.job_type).await;
        if record.status.is_finished() {
            tracing::warn!(
                "Job {} already {}, skipping",
                record.id,
                record.status.as_str()
            );
            return Ok(record);
        }

        record.mark_running();
        if let Err(e) = record.save(&state.cache).await {
            tracing::error!("Failed to update job status to running: {}", e);
        }

        let result = match message.job_type {
            JobType::CacheWarm { service } => cache_warm::run_cache_warm(&state, service).await,
        };

        match result {
            Ok(items) => {
                tracing::info!("Job {} completed successfully ({} entries)", record.id, items);
                record.mark_completed(items);
            }
            Err(e) => {
                tracing::error!("Job {} failed: {}", record.id, e);
                record.mark_failed(e.to_string());
            }
        }

        record.save(&state.cache).await?;
        Ok(record)
    }

    /// The stored record, or a fresh one if it expired or the store lost it.
    async fn load_record(state: &AppState, job_id: Uuid, job_type: JobType) -> JobRecord {
        match JobRecord::load(&state.cache, job_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::warn!("Job {} not found in store, recreating record", job_id);
                JobRecord {
                    id: job_id,
                    ..JobRecord::new(job_type)
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load job {}: {}", job_id, e);
                JobRecord {
                    id: job_id,
                    ..JobRecord::new(job_type)
                }
            }
        }
    }
}
