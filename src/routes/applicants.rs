use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::applicant_dto::{
        ApplicantListQuery, ApplicantResponse, RatingPayload, UpdateApplicantPayload,
        UploadResponse,
    },
    error::{Error, Result},
    models::applicant::{ApplicantPatch, ApplicantSummary},
    services::applicant_service::UploadKind,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/applicants",
    params(
        ("search" = Option<String>, Query, description = "Name or email"),
        ("gender" = Option<String>, Query, description = "Gender"),
        ("wilaya" = Option<String>, Query, description = "Region"),
        ("min_age" = Option<i32>, Query, description = "Minimum age; 0 means any"),
        ("max_age" = Option<i32>, Query, description = "Maximum age; 0 means any"),
        ("min_rating" = Option<i32>, Query, description = "Minimum rating; 0 means any")
    ),
    responses(
        (status = 200, description = "Matching applicants", body = [ApplicantSummary])
    )
)]
#[axum::debug_handler]
pub async fn list_applicants(
    State(state): State<AppState>,
    Query(query): Query<ApplicantListQuery>,
) -> Result<impl IntoResponse> {
    let applicants = state.applicant_service.search(query.into()).await?;
    Ok(Json(applicants))
}

#[utoipa::path(
    get,
    path = "/api/applicants/{id}",
    params(
        ("id" = Uuid, Path, description = "Applicant ID")
    ),
    responses(
        (status = 200, description = "Applicant found", body = ApplicantResponse),
        (status = 404, description = "Applicant not found")
    )
)]
#[axum::debug_handler]
pub async fn get_applicant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let applicant = state.applicant_service.get(id).await?;
    Ok(Json(ApplicantResponse::from(applicant)))
}

#[utoipa::path(
    patch,
    path = "/api/applicants/{id}",
    params(
        ("id" = Uuid, Path, description = "Applicant ID")
    ),
    request_body = UpdateApplicantPayload,
    responses(
        (status = 200, description = "Profile updated", body = ApplicantResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Applicant not found")
    )
)]
#[axum::debug_handler]
pub async fn update_applicant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApplicantPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let applicant = state
        .applicant_service
        .update(id, ApplicantPatch::from(payload))
        .await?;
    Ok(Json(ApplicantResponse::from(applicant)))
}

#[utoipa::path(
    put,
    path = "/api/applicants/{id}/rating",
    params(
        ("id" = Uuid, Path, description = "Applicant ID")
    ),
    request_body = RatingPayload,
    responses(
        (status = 200, description = "Rating saved", body = ApplicantResponse),
        (status = 400, description = "Rating outside 1..=5")
    )
)]
#[axum::debug_handler]
pub async fn rate_applicant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RatingPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let applicant = state.applicant_service.rate(id, payload.rating).await?;
    Ok(Json(ApplicantResponse::from(applicant)))
}

#[utoipa::path(
    post,
    path = "/api/applicants/{id}/cv",
    params(
        ("id" = Uuid, Path, description = "Applicant ID")
    ),
    request_body(content = String, description = "PDF or Word document in the `file` field", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "CV stored", body = UploadResponse),
        (status = 400, description = "Unsupported file")
    )
)]
#[axum::debug_handler]
pub async fn upload_cv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    upload(state, id, UploadKind::Cv, multipart).await
}

#[utoipa::path(
    post,
    path = "/api/applicants/{id}/avatar",
    params(
        ("id" = Uuid, Path, description = "Applicant ID")
    ),
    request_body(content = String, description = "JPEG, PNG or WebP image in the `file` field", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Avatar stored", body = UploadResponse),
        (status = 400, description = "Unsupported file")
    )
)]
#[axum::debug_handler]
pub async fn upload_avatar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    upload(state, id, UploadKind::Avatar, multipart).await
}

async fn upload(
    state: AppState,
    id: Uuid,
    kind: UploadKind,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_default();
        let body = field.bytes().await?;
        let url = state
            .applicant_service
            .upload(id, kind, &content_type, body)
            .await?;
        return Ok((StatusCode::CREATED, Json(UploadResponse { url })));
    }
    Err(Error::BadRequest("Missing 'file' field".to_string()))
}
