use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::backend::Backend;
use crate::cache::{QueryCache, QueryKey, QueryScope};
use crate::dto::application_dto::{ApplicationListResponse, UpdateApplicationPayload};
use crate::error::{Error, Result};
use crate::filter::{distinct_wilayas, filter_applications, ApplicationCriteria};
use crate::models::application::{
    Application, ApplicationPatch, ApplicationStatus, BulkStatusOutcome, InterviewSlot,
    StatusUpdateOutcome,
};
use crate::pipeline::controller::{application_write_keys, PipelineController};
use crate::utils::time::now;

pub const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Clone)]
pub struct ApplicationService {
    backend: Arc<dyn Backend>,
    cache: QueryCache,
}

impl ApplicationService {
    pub fn new(backend: Arc<dyn Backend>, cache: QueryCache) -> Self {
        Self { backend, cache }
    }

    async fn all(&self) -> Result<Vec<Application>> {
        let backend = self.backend.clone();
        self.cache
            .get_or_fetch(QueryKey::scope(QueryScope::Applications), || async move {
                backend.list_applications().await
            })
            .await
    }

    pub async fn list(&self, criteria: ApplicationCriteria) -> Result<ApplicationListResponse> {
        let all = self.all().await?;
        let wilayas = distinct_wilayas(&all);
        let items = filter_applications(&all, &criteria);
        tracing::debug!(total = all.len(), matched = items.len(), "applications filtered");
        Ok(ApplicationListResponse {
            total: items.len(),
            items,
            wilayas,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Application> {
        let backend = self.backend.clone();
        let found: Option<Application> = self
            .cache
            .get_or_fetch(
                QueryKey::with_params(QueryScope::ApplicationDetail, id),
                || async move { backend.get_application(id).await },
            )
            .await?;
        found.ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    pub async fn pipeline(&self, id: Uuid) -> Result<PipelineController> {
        let application = self.get(id).await?;
        Ok(PipelineController::new(
            application,
            self.backend.clone(),
            self.cache.clone(),
        ))
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<StatusUpdateOutcome> {
        let outcome = self.backend.update_application_status(id, status).await?;
        if !outcome.success {
            tracing::warn!(application_id = %id, %status, message = %outcome.message, "status update refused");
            return Err(Error::BadRequest(outcome.message));
        }
        self.cache.invalidate(&application_write_keys(id));
        tracing::info!(application_id = %id, %status, "application status updated");
        Ok(outcome)
    }

    pub async fn bulk_update_status(
        &self,
        ids: Vec<Uuid>,
        status: ApplicationStatus,
    ) -> Result<BulkStatusOutcome> {
        let requested = ids.len();
        let outcome = self
            .backend
            .bulk_update_application_status(ids, status)
            .await?;
        self.cache.invalidate(&[
            QueryKey::scope(QueryScope::ApplicationDetail),
            QueryKey::scope(QueryScope::Applications),
            QueryKey::scope(QueryScope::InterviewSchedule),
            QueryKey::scope(QueryScope::DashboardStats),
            QueryKey::scope(QueryScope::RecentApplications),
        ]);
        tracing::info!(
            requested,
            updated = outcome.updated_count,
            %status,
            "bulk status update"
        );
        Ok(outcome)
    }

    pub async fn update_fields(
        &self,
        id: Uuid,
        payload: UpdateApplicationPayload,
    ) -> Result<Application> {
        let patch = ApplicationPatch::from(payload);
        if patch.is_empty() {
            return Err(Error::BadRequest("No fields to update".to_string()));
        }
        self.get(id).await?;
        self.backend.update_application_fields(id, patch).await?;
        self.cache.invalidate(&application_write_keys(id));
        self.get(id).await
    }

    /// Interview calendar, earliest first. With `upcoming_only` the list is
    /// narrowed to the next seven days.
    pub async fn interview_schedule(&self, upcoming_only: bool) -> Result<Vec<InterviewSlot>> {
        let backend = self.backend.clone();
        let slots: Vec<InterviewSlot> = self
            .cache
            .get_or_fetch(QueryKey::scope(QueryScope::InterviewSchedule), || async move {
                backend.list_interview_schedule().await
            })
            .await?;
        if !upcoming_only {
            return Ok(slots);
        }
        let start = now();
        let end = start + Duration::days(UPCOMING_WINDOW_DAYS);
        Ok(slots
            .into_iter()
            .filter(|slot| slot.interview_date >= start && slot.interview_date <= end)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;

    fn service(backend: MockBackend) -> ApplicationService {
        ApplicationService::new(Arc::new(backend), QueryCache::new(60))
    }

    #[tokio::test]
    async fn refused_status_update_is_a_bad_request() {
        let mut backend = MockBackend::new();
        backend
            .expect_update_application_status()
            .times(1)
            .returning(|_, _| {
                Ok(StatusUpdateOutcome {
                    success: false,
                    message: "Application not found".to_string(),
                })
            });
        let err = service(backend)
            .update_status(Uuid::new_v4(), ApplicationStatus::Reviewing)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(msg) if msg == "Application not found"));
    }

    #[tokio::test]
    async fn list_is_fetched_once_while_fresh() {
        let mut backend = MockBackend::new();
        backend
            .expect_list_applications()
            .times(1)
            .returning(|| Ok(Vec::new()));
        let svc = service(backend);
        svc.list(ApplicationCriteria::default()).await.unwrap();
        let second = svc.list(ApplicationCriteria::default()).await.unwrap();
        assert_eq!(second.total, 0);
    }

    #[tokio::test]
    async fn empty_patch_never_reaches_the_backend() {
        let mut backend = MockBackend::new();
        backend.expect_update_application_fields().never();
        backend.expect_get_application().never();
        let err = service(backend)
            .update_fields(Uuid::new_v4(), UpdateApplicationPayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }
}
