use axum::Json;
use utoipa::OpenApi;

use crate::dto::admin_dto::{CreateUserPayload, CreateUserResponse};
use crate::dto::applicant_dto::{
    ApplicantResponse, RatingPayload, SkillsInput, UpdateApplicantPayload, UploadResponse,
};
use crate::dto::application_dto::{
    AdvancePayload, ApplicationListResponse, BulkStatusPayload, DecisionPayload,
    PipelineResponse, StageNotesPayload, StatusUpdatePayload, UpdateApplicationPayload,
};
use crate::dto::job_dto::{CreateJobPayload, UpdateJobPayload};
use crate::models::applicant::{
    Applicant, ApplicantRef, ApplicantSummary, EducationEntry, ExperienceEntry,
};
use crate::models::application::{
    Application, ApplicationStatus, BulkStatusOutcome, FinalDecision, InterviewSlot,
    OfferStatus, StatusUpdateOutcome,
};
use crate::models::job::{Job, JobRef, JobStatus, JobType, JobWithCounts};
use crate::models::stats::{DashboardStats, RecentApplication};
use crate::pipeline::controller::TimelineStep;
use crate::pipeline::stage::RecruitmentStage;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::applications::list_applications,
        super::applications::bulk_update_status,
        super::applications::get_application,
        super::applications::update_application,
        super::applications::update_status,
        super::applications::get_pipeline,
        super::applications::advance,
        super::applications::reject,
        super::applications::hire,
        super::applications::save_notes,
        super::applications::list_interviews,
        super::applicants::list_applicants,
        super::applicants::get_applicant,
        super::applicants::update_applicant,
        super::applicants::rate_applicant,
        super::applicants::upload_cv,
        super::applicants::upload_avatar,
        super::jobs::list_jobs,
        super::jobs::create_job,
        super::jobs::update_job,
        super::jobs::delete_job,
        super::dashboard::get_stats,
        super::dashboard::get_recent,
        super::admin::create_user,
    ),
    components(schemas(
        Application,
        ApplicationStatus,
        OfferStatus,
        FinalDecision,
        InterviewSlot,
        StatusUpdateOutcome,
        BulkStatusOutcome,
        Applicant,
        ApplicantRef,
        ApplicantSummary,
        EducationEntry,
        ExperienceEntry,
        Job,
        JobRef,
        JobStatus,
        JobType,
        JobWithCounts,
        DashboardStats,
        RecentApplication,
        RecruitmentStage,
        TimelineStep,
        ApplicationListResponse,
        StatusUpdatePayload,
        BulkStatusPayload,
        UpdateApplicationPayload,
        AdvancePayload,
        DecisionPayload,
        StageNotesPayload,
        PipelineResponse,
        ApplicantResponse,
        SkillsInput,
        UpdateApplicantPayload,
        RatingPayload,
        UploadResponse,
        CreateJobPayload,
        UpdateJobPayload,
        CreateUserPayload,
        CreateUserResponse,
    )),
    tags(
        (name = "recruitment-admin", description = "Recruitment dashboard API")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
