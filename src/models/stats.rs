use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DashboardStats {
    pub total_jobs: i64,
    pub open_jobs: i64,
    pub closed_jobs: i64,
    pub total_applicants: i64,
    pub total_applications: i64,
    pub pending_applications: i64,
    pub reviewing_applications: i64,
    pub shortlisted_applications: i64,
    pub offered_applications: i64,
    pub accepted_applications: i64,
    pub rejected_applications: i64,
    pub applications_today: i64,
    pub applications_this_week: i64,
    pub applications_this_month: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecentApplication {
    pub application_id: Uuid,
    pub applicant_id: Uuid,
    pub applicant_name: String,
    #[serde(default)]
    pub applicant_email: Option<String>,
    #[serde(default)]
    pub applicant_avatar_url: Option<String>,
    pub job_id: Uuid,
    pub job_title: String,
    pub status: String,
    pub applied_at: DateTime<Utc>,
}
