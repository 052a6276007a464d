use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::filter::ApplicationCriteria;
use crate::models::application::{
    Application, ApplicationPatch, ApplicationStatus, FinalDecision, OfferStatus,
};
use crate::pipeline::controller::{PipelineController, TimelineStep};
use crate::pipeline::stage::RecruitmentStage;

/// Query string of `GET /api/applications`. Every field is optional; `0` for
/// the numeric bounds means "no bound".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub job_id: Option<Uuid>,
    pub gender: Option<String>,
    pub wilaya: Option<String>,
    pub min_rating: Option<i32>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl From<ApplicationListQuery> for ApplicationCriteria {
    fn from(q: ApplicationListQuery) -> Self {
        Self {
            status_tab: q.status,
            search_text: q.search,
            job_id: q.job_id,
            gender: q.gender,
            wilaya: q.wilaya,
            min_rating: q.min_rating,
            min_age: q.min_age,
            max_age: q.max_age,
            date_from: q.date_from,
            date_to: q.date_to,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationListResponse {
    pub items: Vec<Application>,
    pub total: usize,
    /// Regions present in the unfiltered list, for the region picker.
    pub wilayas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdatePayload {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BulkStatusPayload {
    #[validate(length(min = 1, max = 500))]
    pub application_ids: Vec<Uuid>,
    pub status: ApplicationStatus,
}

/// Field edits outside the pipeline actions. Status changes go through the
/// status endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateApplicationPayload {
    pub hr_notes: Option<String>,
    pub test_stage_notes: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
    pub interview_notes: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub technical_score: Option<i32>,
    #[validate(length(max = 100))]
    pub proposed_salary: Option<String>,
    pub offer_status: Option<OfferStatus>,
    pub final_notes: Option<String>,
}

impl From<UpdateApplicationPayload> for ApplicationPatch {
    fn from(p: UpdateApplicationPayload) -> Self {
        Self {
            status: None,
            hr_notes: p.hr_notes,
            test_stage_notes: p.test_stage_notes,
            interview_date: p.interview_date,
            interview_notes: p.interview_notes,
            technical_score: p.technical_score,
            proposed_salary: p.proposed_salary,
            offer_status: p.offer_status,
            final_notes: p.final_notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineViewQuery {
    pub view: Option<RecruitmentStage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct AdvancePayload {
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct DecisionPayload {
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StageNotesPayload {
    pub stage: RecruitmentStage,
    #[validate(length(max = 5000))]
    pub notes: String,
}

/// Everything the pipeline page renders for one application.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PipelineResponse {
    pub application: Application,
    pub current_stage: RecruitmentStage,
    pub active_stage: RecruitmentStage,
    pub final_decision: Option<FinalDecision>,
    pub timeline: Vec<TimelineStep>,
    pub applicant_name: String,
    pub applicant_initials: String,
    pub applicant_avatar: Option<String>,
    pub education_summary: Option<String>,
}

impl From<&PipelineController> for PipelineResponse {
    fn from(ctl: &PipelineController) -> Self {
        let application = ctl.application().clone();
        let applicant = application.applicant.as_ref();
        let applicant_name = applicant
            .map(|a| a.display_name())
            .unwrap_or_else(|| "Unknown".to_string());
        let applicant_initials = applicant
            .map(|a| a.initials())
            .unwrap_or_else(|| "?".to_string());
        let applicant_avatar = applicant.map(|a| a.resolved_avatar());
        let education_summary = applicant.map(|a| a.education_summary());
        Self {
            current_stage: ctl.current_stage(),
            active_stage: ctl.active_stage(),
            final_decision: ctl.final_decision(),
            timeline: ctl.timeline(),
            applicant_name,
            applicant_initials,
            applicant_avatar,
            education_summary,
            application,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewQuery {
    /// Only interviews between now and seven days from now.
    #[serde(default)]
    pub upcoming: bool,
}
