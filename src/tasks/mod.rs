use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::health::{HealthMonitor, ValidationTarget};

pub mod source_watcher;

/// Run a full validation on `schedule` (cron syntax with seconds) and log
/// one summary line per run.
pub async fn start_health_schedule(
    monitor: Arc<HealthMonitor>,
    schedule: &str,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let health_job = Job::new_async(schedule, move |_uuid, _lock| {
        let monitor = monitor.clone();
        Box::pin(async move {
            match monitor.validate(ValidationTarget::All).await {
                Ok(report) => {
                    let rate = report.lowest_validation_rate().unwrap_or(100.0);
                    if report.has_errors() {
                        tracing::warn!(
                            errors = report.statistics.error_count,
                            warnings = report.statistics.warning_count,
                            validation_rate = rate,
                            "Scheduled health check found errors"
                        );
                    } else {
                        tracing::info!(
                            warnings = report.statistics.warning_count,
                            validation_rate = rate,
                            "Scheduled health check passed"
                        );
                    }
                }
                Err(e) => tracing::error!("Scheduled health check failed: {}", e),
            }
        })
    })?;
    scheduler.add(health_job).await?;

    scheduler.start().await?;
    tracing::info!(schedule, "Health monitor scheduled");

    Ok(scheduler)
}
