use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::{CreateJobPayload, UpdateJobPayload},
    error::Result,
    models::job::{Job, JobWithCounts},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    responses(
        (status = 200, description = "Jobs with application counts", body = [JobWithCounts])
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list().await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created", body = Job),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = Job),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(id, payload).await?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 204, description = "Job and its applications deleted")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
