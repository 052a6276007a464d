use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

/// Authenticated caller, inserted into request extensions by
/// [`require_bearer_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

fn reject(status: StatusCode, code: &str) -> Response {
    (status, Json(json!({ "error": code }))).into_response()
}

fn bearer_token(req: &Request) -> Result<&str, Response> {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "missing_authorization"));
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err(reject(StatusCode::UNAUTHORIZED, "bad_authorization"));
    };
    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "unsupported_scheme"))
}

pub fn decode_claims(token: &str, secret: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims)
}

pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&req) {
        Ok(token) => token,
        Err(response) => return response,
    };
    let Some(claims) = decode_claims(token, &state.config.jwt_secret) else {
        return reject(StatusCode::UNAUTHORIZED, "invalid_token");
    };
    let Ok(id) = Uuid::parse_str(&claims.sub) else {
        return reject(StatusCode::UNAUTHORIZED, "invalid_subject");
    };
    req.extensions_mut().insert(AuthUser { id });
    req.extensions_mut().insert(claims);
    next.run(req).await
}

/// Lets the request through only when the authenticated caller holds the
/// admin role according to the backend. Must run after
/// [`require_bearer_auth`].
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(user) = req.extensions().get::<AuthUser>().copied() else {
        return reject(StatusCode::UNAUTHORIZED, "missing_authorization");
    };
    match state.admin_service.is_admin(user.id).await {
        Ok(true) => next.run(req).await,
        Ok(false) => {
            tracing::warn!(user_id = %user.id, path = %req.uri().path(), "admin route refused");
            reject(StatusCode::FORBIDDEN, "forbidden")
        }
        Err(err) => err.into_response(),
    }
}
