//! Contract with the remote data service that owns persistence, storage,
//! auth and roles.

pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::error::Result;
use crate::models::applicant::{Applicant, ApplicantPatch, ApplicantSearch, ApplicantSummary};
use crate::models::application::{
    Application, ApplicationPatch, ApplicationStatus, BulkStatusOutcome, InterviewSlot,
    StatusUpdateOutcome,
};
use crate::models::job::{Job, JobPatch, JobWithCounts, NewJob};
use crate::models::role::{AppRole, CreatedUser, NewUser};
use crate::models::stats::{DashboardStats, RecentApplication};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// All applications, newest first, with job and applicant embedded.
    async fn list_applications(&self) -> Result<Vec<Application>>;

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>>;

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<StatusUpdateOutcome>;

    async fn bulk_update_application_status(
        &self,
        ids: Vec<Uuid>,
        status: ApplicationStatus,
    ) -> Result<BulkStatusOutcome>;

    async fn update_application_fields(&self, id: Uuid, patch: ApplicationPatch) -> Result<()>;

    /// Applications with an interview date, earliest first.
    async fn list_interview_schedule(&self) -> Result<Vec<InterviewSlot>>;

    async fn list_applicants(&self, search: ApplicantSearch) -> Result<Vec<ApplicantSummary>>;

    async fn get_applicant(&self, id: Uuid) -> Result<Option<Applicant>>;

    async fn update_applicant(&self, id: Uuid, patch: ApplicantPatch) -> Result<()>;

    async fn update_applicant_rating(&self, id: Uuid, rating: i32) -> Result<()>;

    async fn list_jobs(&self) -> Result<Vec<JobWithCounts>>;

    async fn create_job(&self, job: NewJob) -> Result<Job>;

    async fn update_job(&self, id: Uuid, patch: JobPatch) -> Result<Job>;

    /// Removes the job; its applications go with it.
    async fn delete_job(&self, id: Uuid) -> Result<()>;

    async fn dashboard_stats(&self) -> Result<DashboardStats>;

    async fn recent_applications(&self, limit: u32) -> Result<Vec<RecentApplication>>;

    /// Stores the object and returns its public URL.
    async fn upload_file(
        &self,
        bucket: String,
        path: String,
        content_type: String,
        body: Bytes,
    ) -> Result<String>;

    async fn check_role(&self, user_id: Uuid, role: AppRole) -> Result<bool>;

    async fn create_user(&self, user: NewUser) -> Result<CreatedUser>;
}
