use anyhow::Result;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::jobs::record::{JobRecord, JobType};
use crate::services::CacheService;

/// Message sent to the job queue
#[derive(Debug, Clone)]
pub struct JobMessage {
    pub job_id: Uuid,
    pub job_type: JobType,
}

/// Job queue for async background task processing
#[derive(Clone)]
pub struct JobQueue {
    sender: mpsc::UnboundedSender<JobMessage>,
    cache: CacheService,
}

impl JobQueue {
    /// Create a new job queue and return (queue, receiver)
    pub fn new(cache: CacheService) -> (Self, mpsc::UnboundedReceiver<JobMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender, cache }, receiver)
    }

    /// Record a pending job in the store and submit it to the queue
    pub async fn submit(&self, job_type: JobType) -> Result<JobRecord> {
        let record = JobRecord::new(job_type);
        record.save(&self.cache).await?;

        let message = JobMessage {
            job_id: record.id,
            job_type,
        };

        self.sender
            .send(message)
            .map_err(|e| anyhow::anyhow!("Failed to submit job: {}", e))?;

        tracing::info!("Job {} ({:?}) submitted to queue", record.id, job_type);

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::record::JobStatus;
    use crate::services::Service;

    #[tokio::test]
    async fn test_submit_records_and_enqueues() {
        let cache = CacheService::in_memory();
        let (queue, mut receiver) = JobQueue::new(cache.clone());

        let job_type = JobType::CacheWarm {
            service: Some(Service::Sonarr),
        };
        let record = queue.submit(job_type).await.unwrap();

        let message = receiver.recv().await.unwrap();
        assert_eq!(message.job_id, record.id);
        assert_eq!(message.job_type, job_type);

        let stored = JobRecord::load(&cache, record.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn test_submit_fails_when_receiver_dropped() {
        let (queue, receiver) = JobQueue::new(CacheService::in_memory());
        drop(receiver);

        let result = queue.submit(JobType::CacheWarm { service: None }).await;
        assert!(result.is_err());
    }
}
