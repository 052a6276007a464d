use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::Result;
use crate::models::job::{JobPatch, JobStatus, JobType, NewJob};
use crate::utils::validation::{non_blank, require_text};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[serde(default)]
    pub job_type: JobType,
    pub salary_range: Option<String>,
    #[serde(default)]
    pub status: JobStatus,
    pub deadline: Option<NaiveDate>,
    pub image_url: Option<String>,
    #[validate(range(min = 1))]
    pub max_applicants: Option<i32>,
}

impl CreateJobPayload {
    /// Trims the text fields; blank optional ones are stored as null.
    pub fn into_new_job(self) -> Result<NewJob> {
        Ok(NewJob {
            title: require_text("Title", &self.title)?,
            description: non_blank(self.description),
            location: require_text("Location", &self.location)?,
            job_type: self.job_type,
            salary_range: non_blank(self.salary_range),
            status: self.status,
            deadline: self.deadline,
            image_url: non_blank(self.image_url),
            max_applicants: self.max_applicants,
        })
    }
}

/// Partial update. Sending an empty string for an optional text field clears
/// it; `clear_deadline` removes the deadline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub salary_range: Option<String>,
    pub status: Option<JobStatus>,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub clear_deadline: bool,
    pub image_url: Option<String>,
    #[validate(range(min = 1))]
    pub max_applicants: Option<i32>,
}

impl UpdateJobPayload {
    pub fn into_patch(self) -> Result<JobPatch> {
        let title = self
            .title
            .map(|t| require_text("Title", &t))
            .transpose()?;
        let location = self
            .location
            .map(|l| require_text("Location", &l))
            .transpose()?;
        let deadline = if self.clear_deadline {
            Some(None)
        } else {
            self.deadline.map(Some)
        };
        Ok(JobPatch {
            title,
            description: self.description.map(|d| non_blank(Some(d))),
            location,
            job_type: self.job_type,
            salary_range: self.salary_range.map(|s| non_blank(Some(s))),
            status: self.status,
            deadline,
            image_url: self.image_url.map(|u| non_blank(Some(u))),
            max_applicants: self.max_applicants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn blank_optionals_become_null_on_create() {
        let payload: CreateJobPayload = serde_json::from_value(json!({
            "title": "  Data Analyst ",
            "location": "Oran",
            "description": "   ",
            "salary_range": "",
            "deadline": "2026-12-31"
        }))
        .unwrap();
        payload.validate().unwrap();
        let job = payload.into_new_job().unwrap();
        assert_eq!(job.title, "Data Analyst");
        assert_eq!(job.description, None);
        assert_eq!(job.salary_range, None);
        assert_eq!(job.job_type, JobType::FullTime);
        assert_eq!(job.status, JobStatus::Open);
        assert_eq!(job.deadline, NaiveDate::from_ymd_opt(2026, 12, 31));
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let payload: CreateJobPayload =
            serde_json::from_value(json!({ "title": "   ", "location": "Oran" })).unwrap();
        assert!(matches!(payload.into_new_job(), Err(Error::BadRequest(_))));

        let missing: CreateJobPayload =
            serde_json::from_value(json!({ "title": "", "location": "Oran" })).unwrap();
        assert!(missing.validate().is_err());
    }

    #[test]
    fn update_clears_blank_fields() {
        let patch = UpdateJobPayload {
            description: Some(" ".to_string()),
            clear_deadline: true,
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.deadline, Some(None));
        assert_eq!(patch.title, None);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "description": null, "deadline": null })
        );
    }
}
