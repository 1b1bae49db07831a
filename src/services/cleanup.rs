use tokio_cron_scheduler::{JobScheduler, Job};
use crate::verification::VerificationRegistry;
use std::sync::Arc;

/// Periodically purges expired verification codes from the registry.
pub struct CleanupService {
    registry: Arc<VerificationRegistry>,
    schedule: String,
    scheduler: JobScheduler,
}

impl CleanupService {
    pub async fn new(
        registry: Arc<VerificationRegistry>,
        schedule: impl Into<String>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            registry,
            schedule: schedule.into(),
            scheduler,
        })
    }

    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let registry = self.registry.clone();

        let cleanup_job = Job::new_async(self.schedule.as_str(), move |_uuid, _l| {
            let registry = registry.clone();
            Box::pin(async move {
                sweep(&registry);
            })
        })?;

        self.scheduler.add(cleanup_job).await?;
        self.scheduler.start().await?;

        tracing::info!("Cleanup service started with schedule '{}'", self.schedule);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    // Manual trigger for testing
    pub fn sweep_now(&self) -> usize {
        sweep(&self.registry)
    }
}

fn sweep(registry: &VerificationRegistry) -> usize {
    let now = registry.clock().now();
    let removed = registry.sweep_expired(now);
    tracing::debug!("Cleanup pass removed {} expired verification codes", removed);
    removed
}
