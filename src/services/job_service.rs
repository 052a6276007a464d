use std::sync::Arc;

use uuid::Uuid;

use crate::backend::Backend;
use crate::cache::{QueryCache, QueryKey, QueryScope};
use crate::dto::job_dto::{CreateJobPayload, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{Job, JobPatch, JobWithCounts};

#[derive(Clone)]
pub struct JobService {
    backend: Arc<dyn Backend>,
    cache: QueryCache,
}

impl JobService {
    pub fn new(backend: Arc<dyn Backend>, cache: QueryCache) -> Self {
        Self { backend, cache }
    }

    pub async fn list(&self) -> Result<Vec<JobWithCounts>> {
        let backend = self.backend.clone();
        self.cache
            .get_or_fetch(QueryKey::scope(QueryScope::Jobs), || async move {
                backend.list_jobs().await
            })
            .await
    }

    pub async fn create(&self, payload: CreateJobPayload) -> Result<Job> {
        let job = self.backend.create_job(payload.into_new_job()?).await?;
        self.invalidate(JobWriteScope::JobOnly);
        tracing::info!(job_id = %job.id, title = %job.title, "job created");
        Ok(job)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateJobPayload) -> Result<Job> {
        let patch = payload.into_patch()?;
        if patch == JobPatch::default() {
            return Err(Error::BadRequest("No fields to update".to_string()));
        }
        let job = self.backend.update_job(id, patch).await?;
        self.invalidate(JobWriteScope::EmbeddedRows);
        tracing::info!(job_id = %id, "job updated");
        Ok(job)
    }

    /// Deletes the job. Its applications are removed with it, so every view
    /// that lists applications is refreshed as well.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.backend.delete_job(id).await?;
        self.invalidate(JobWriteScope::Cascade);
        tracing::info!(job_id = %id, "job deleted");
        Ok(())
    }

    fn invalidate(&self, scope: JobWriteScope) {
        let mut keys = vec![
            QueryKey::scope(QueryScope::Jobs),
            QueryKey::scope(QueryScope::DashboardStats),
        ];
        if scope != JobWriteScope::JobOnly {
            // Job title and location are embedded in application rows.
            keys.extend([
                QueryKey::scope(QueryScope::Applications),
                QueryKey::scope(QueryScope::ApplicationDetail),
                QueryKey::scope(QueryScope::InterviewSchedule),
                QueryKey::scope(QueryScope::RecentApplications),
            ]);
        }
        self.cache.invalidate(&keys);
        if scope == JobWriteScope::Cascade {
            self.cache.invalidate_applicants();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobWriteScope {
    JobOnly,
    EmbeddedRows,
    Cascade,
}
