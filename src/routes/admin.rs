use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::admin_dto::{CreateUserPayload, CreateUserResponse},
    error::Result,
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller is not an admin")
    )
)]
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let role = payload.role;
    let user = state
        .admin_service
        .create_user(caller.id, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(CreateUserResponse::new(user, role))))
}
