use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::applicant::{Applicant, ApplicantRef};
use super::job::JobRef;
use super::lenient::deserialize_lenient_enum;
use crate::pipeline::stage::RecruitmentStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewing,
    Shortlisted,
    Offered,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewing,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Offered,
        ApplicationStatus::Rejected,
        ApplicationStatus::Accepted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Offered => "offered",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown application status '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Sent,
    Accepted,
    Declined,
    Negotiating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FinalDecision {
    Hired,
    Rejected,
}

impl FinalDecision {
    pub fn from_status(status: &str) -> Option<Self> {
        match status {
            "accepted" => Some(FinalDecision::Hired),
            "rejected" => Some(FinalDecision::Rejected),
            _ => None,
        }
    }
}

/// One candidate's submission to one job, with the job and applicant embedded
/// when the backend query selects them.
///
/// `status` keeps the persisted string as-is so legacy values still decode.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub status: String,
    #[serde(default)]
    pub cv_url: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hr_notes: Option<String>,
    #[serde(default)]
    pub test_stage_notes: Option<String>,
    #[serde(default)]
    pub interview_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub interview_notes: Option<String>,
    #[serde(default)]
    pub technical_score: Option<i32>,
    #[serde(default)]
    pub proposed_salary: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_enum")]
    pub offer_status: Option<OfferStatus>,
    #[serde(default)]
    pub final_notes: Option<String>,
    #[serde(default)]
    pub job: Option<JobRef>,
    #[serde(default)]
    pub applicant: Option<Applicant>,
}

impl Application {
    pub fn final_decision(&self) -> Option<FinalDecision> {
        FinalDecision::from_status(&self.status)
    }
}

/// Field update for a single application. Serialized as the PATCH body, so
/// `None` fields are omitted and left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hr_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_stage_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_status: Option<OfferStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_notes: Option<String>,
}

impl ApplicationPatch {
    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ApplicationPatch::default()
    }

    /// Puts `notes` into the column owned by `stage`. Returns false for a
    /// stage without a notes column.
    pub fn set_stage_notes(&mut self, stage: RecruitmentStage, notes: String) -> bool {
        let slot = match stage {
            RecruitmentStage::Applied => &mut self.hr_notes,
            RecruitmentStage::TestStage => &mut self.test_stage_notes,
            RecruitmentStage::Interview => &mut self.interview_notes,
            RecruitmentStage::Offer => return false,
            RecruitmentStage::Decision => &mut self.final_notes,
        };
        *slot = Some(notes);
        true
    }

    /// Mirrors a successful write onto a locally held copy.
    pub fn apply_to(&self, application: &mut Application) {
        if let Some(status) = self.status {
            application.status = status.as_str().to_string();
        }
        if let Some(notes) = &self.hr_notes {
            application.hr_notes = Some(notes.clone());
        }
        if let Some(notes) = &self.test_stage_notes {
            application.test_stage_notes = Some(notes.clone());
        }
        if let Some(date) = self.interview_date {
            application.interview_date = Some(date);
        }
        if let Some(notes) = &self.interview_notes {
            application.interview_notes = Some(notes.clone());
        }
        if let Some(score) = self.technical_score {
            application.technical_score = Some(score);
        }
        if let Some(salary) = &self.proposed_salary {
            application.proposed_salary = Some(salary.clone());
        }
        if let Some(offer) = self.offer_status {
            application.offer_status = Some(offer);
        }
        if let Some(notes) = &self.final_notes {
            application.final_notes = Some(notes.clone());
        }
    }
}

/// Row of the interview calendar.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InterviewSlot {
    pub id: Uuid,
    pub status: String,
    pub interview_date: DateTime<Utc>,
    #[serde(default)]
    pub job: Option<JobRef>,
    #[serde(default)]
    pub applicant: Option<ApplicantRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkStatusOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub updated_count: i64,
}
