use std::time::Duration;

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{error::AppError, service::route::registry::EditorRegistry};

/// How long an editor holding unsaved edits is kept; matches the session lifetime.
const DIRTY_EDITOR_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Starts the idle editor eviction scheduler
///
/// This scheduler runs every ten minutes and drops editors from the registry
/// that have not been used recently:
/// - Editors without unsaved edits after `idle_ttl`
/// - Editors with unsaved edits after seven days
///
/// # Arguments
/// - `editors`: Registry of routing editors
/// - `idle_ttl`: Idle time after which a clean editor is dropped
pub async fn start_scheduler(editors: EditorRegistry, idle_ttl: Duration) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_editors = editors.clone();

    let job = Job::new_async("0 */10 * * * *", move |_uuid, _lock| {
        let editors = job_editors.clone();

        Box::pin(async move {
            evict_idle_editors(&editors, idle_ttl).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Editor eviction scheduler started");

    Ok(())
}

/// Drops idle editors and logs how many were removed
async fn evict_idle_editors(editors: &EditorRegistry, idle_ttl: Duration) {
    let dirty_ttl = DIRTY_EDITOR_TTL.max(idle_ttl);
    let evicted = editors.evict_idle(idle_ttl, dirty_ttl).await;

    if evicted > 0 {
        tracing::info!(
            "Evicted {} idle routing editors, {} remaining",
            evicted,
            editors.len().await
        );
    }
}
