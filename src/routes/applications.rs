use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{
        AdvancePayload, ApplicationListQuery, ApplicationListResponse, BulkStatusPayload,
        DecisionPayload, InterviewQuery, PipelineResponse, PipelineViewQuery, StageNotesPayload,
        StatusUpdatePayload, UpdateApplicationPayload,
    },
    error::{Error, Result},
    models::application::{Application, BulkStatusOutcome, InterviewSlot, StatusUpdateOutcome},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/applications",
    params(
        ("status" = Option<String>, Query, description = "Status tab; 'all' disables the filter"),
        ("search" = Option<String>, Query, description = "Applicant name, email or job title"),
        ("job_id" = Option<Uuid>, Query, description = "Restrict to one job"),
        ("gender" = Option<String>, Query, description = "Applicant gender"),
        ("wilaya" = Option<String>, Query, description = "Applicant region"),
        ("min_rating" = Option<i32>, Query, description = "Minimum applicant rating; 0 means any"),
        ("min_age" = Option<i32>, Query, description = "Minimum applicant age; 0 means any"),
        ("max_age" = Option<i32>, Query, description = "Maximum applicant age; 0 means any"),
        ("date_from" = Option<String>, Query, description = "Applied at or after (RFC 3339)"),
        ("date_to" = Option<String>, Query, description = "Applied at or before (RFC 3339)")
    ),
    responses(
        (status = 200, description = "Filtered applications", body = ApplicationListResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let result = state.application_service.list(query.into()).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/applications/bulk-status",
    request_body = BulkStatusPayload,
    responses(
        (status = 200, description = "Statuses updated", body = BulkStatusOutcome),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn bulk_update_status(
    State(state): State<AppState>,
    Json(payload): Json<BulkStatusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let outcome = state
        .application_service
        .bulk_update_status(payload.application_ids, payload.status)
        .await?;
    Ok(Json(outcome))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application found", body = Application),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.get(id).await?;
    Ok(Json(application))
}

#[utoipa::path(
    patch,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationPayload,
    responses(
        (status = 200, description = "Application updated", body = Application),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state.application_service.update_fields(id, payload).await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = StatusUpdatePayload,
    responses(
        (status = 200, description = "Status updated", body = StatusUpdateOutcome),
        (status = 400, description = "Update refused by the backend")
    )
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdatePayload>,
) -> Result<impl IntoResponse> {
    let outcome = state
        .application_service
        .update_status(id, payload.status)
        .await?;
    Ok(Json(outcome))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}/pipeline",
    params(
        ("id" = Uuid, Path, description = "Application ID"),
        ("view" = Option<String>, Query, description = "Stage panel to show; defaults to the current stage")
    ),
    responses(
        (status = 200, description = "Pipeline state", body = PipelineResponse),
        (status = 400, description = "Requested stage not reached yet"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_pipeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PipelineViewQuery>,
) -> Result<impl IntoResponse> {
    let mut controller = state.application_service.pipeline(id).await?;
    if let Some(stage) = query.view {
        controller.select_stage(stage)?;
    }
    Ok(Json(PipelineResponse::from(&controller)))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/pipeline/advance",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = AdvancePayload,
    responses(
        (status = 200, description = "Moved to the next stage", body = PipelineResponse),
        (status = 400, description = "Application cannot advance")
    )
)]
#[axum::debug_handler]
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdvancePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let mut controller = state.application_service.pipeline(id).await?;
    controller
        .advance(payload.notes, payload.interview_date)
        .await?;
    Ok(Json(PipelineResponse::from(&controller)))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/pipeline/reject",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = DecisionPayload,
    responses(
        (status = 200, description = "Application rejected", body = PipelineResponse),
        (status = 400, description = "Final decision already made")
    )
)]
#[axum::debug_handler]
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let mut controller = state.application_service.pipeline(id).await?;
    controller.reject(payload.notes).await?;
    Ok(Json(PipelineResponse::from(&controller)))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/pipeline/hire",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = DecisionPayload,
    responses(
        (status = 200, description = "Applicant hired", body = PipelineResponse),
        (status = 400, description = "Application is not at the offer stage")
    )
)]
#[axum::debug_handler]
pub async fn hire(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let mut controller = state.application_service.pipeline(id).await?;
    controller.hire(payload.notes).await?;
    Ok(Json(PipelineResponse::from(&controller)))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/pipeline/notes",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = StageNotesPayload,
    responses(
        (status = 200, description = "Notes saved", body = PipelineResponse),
        (status = 400, description = "Stage keeps no notes or decision already made")
    )
)]
#[axum::debug_handler]
pub async fn save_notes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StageNotesPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let mut controller = state.application_service.pipeline(id).await?;
    if !controller.save_notes(payload.stage, payload.notes).await? {
        return Err(Error::BadRequest(format!(
            "Stage '{}' does not keep notes",
            payload.stage
        )));
    }
    Ok(Json(PipelineResponse::from(&controller)))
}

#[utoipa::path(
    get,
    path = "/api/interviews",
    params(
        ("upcoming" = Option<bool>, Query, description = "Only interviews within the next seven days")
    ),
    responses(
        (status = 200, description = "Interview calendar", body = [InterviewSlot])
    )
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    Query(query): Query<InterviewQuery>,
) -> Result<impl IntoResponse> {
    let slots = state
        .application_service
        .interview_schedule(query.upcoming)
        .await?;
    Ok(Json(slots))
}
