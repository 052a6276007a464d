use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::lenient::deserialize_enum_or_default;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Open,
    Closed,
    OnHold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: String,
    #[serde(default, deserialize_with = "deserialize_enum_or_default")]
    pub job_type: JobType,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub max_applicants: Option<i32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn is_deadline_passed(&self, today: NaiveDate) -> bool {
        self.deadline.map(|deadline| deadline < today).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobWithCounts {
    #[serde(flatten)]
    pub job: Job,
    #[serde(default)]
    pub total_applications: i64,
    #[serde(default)]
    pub is_deadline_passed: bool,
}

/// Job projection embedded in application rows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobRef {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub job_type: JobType,
    pub salary_range: Option<String>,
    pub status: JobStatus,
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_applicants: Option<i32>,
}

/// Partial job update. The outer `None` leaves a column untouched; `Some(None)`
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_applicants: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_row_flattens_job_fields() {
        let row: JobWithCounts = serde_json::from_value(json!({
            "id": "0b8e6c57-45c9-4a4e-b6a5-9b0a51a1c001",
            "title": "Accountant",
            "location": "Alger",
            "job_type": "part_time",
            "status": "on_hold",
            "deadline": "2026-01-31",
            "total_applications": 12,
            "is_deadline_passed": true
        }))
        .unwrap();
        assert_eq!(row.job.job_type, JobType::PartTime);
        assert_eq!(row.job.status, JobStatus::OnHold);
        assert_eq!(row.total_applications, 12);
        assert!(row.job.is_deadline_passed(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
        assert!(!row.job.is_deadline_passed(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()));
    }

    #[test]
    fn unknown_job_type_reads_as_default() {
        let job: Job = serde_json::from_value(json!({
            "id": "0b8e6c57-45c9-4a4e-b6a5-9b0a51a1c002",
            "title": "Driver",
            "location": "Oran",
            "job_type": "seasonal"
        }))
        .unwrap();
        assert_eq!(job.job_type, JobType::FullTime);
    }
}
