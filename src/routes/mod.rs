pub mod admin;
pub mod applicants;
pub mod applications;
pub mod dashboard;
pub mod docs;
pub mod health;
pub mod jobs;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    auth::{require_admin, require_bearer_auth},
    cors::cors_layer,
    rate_limit::rps_middleware,
};
use crate::AppState;

/// Uploads are capped per kind in the applicant service; this only bounds
/// the raw request.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let admin_api = Router::new()
        .route("/api/admin/users", post(admin::create_user))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    let api = Router::new()
        .route("/api/openapi.json", get(docs::openapi_json))
        .route("/api/applications", get(applications::list_applications))
        .route(
            "/api/applications/bulk-status",
            post(applications::bulk_update_status),
        )
        .route(
            "/api/applications/:id",
            get(applications::get_application).patch(applications::update_application),
        )
        .route(
            "/api/applications/:id/status",
            post(applications::update_status),
        )
        .route(
            "/api/applications/:id/pipeline",
            get(applications::get_pipeline),
        )
        .route(
            "/api/applications/:id/pipeline/advance",
            post(applications::advance),
        )
        .route(
            "/api/applications/:id/pipeline/reject",
            post(applications::reject),
        )
        .route(
            "/api/applications/:id/pipeline/hire",
            post(applications::hire),
        )
        .route(
            "/api/applications/:id/pipeline/notes",
            post(applications::save_notes),
        )
        .route("/api/interviews", get(applications::list_interviews))
        .route("/api/applicants", get(applicants::list_applicants))
        .route(
            "/api/applicants/:id",
            get(applicants::get_applicant).patch(applicants::update_applicant),
        )
        .route("/api/applicants/:id/rating", put(applicants::rate_applicant))
        .route("/api/applicants/:id/cv", post(applicants::upload_cv))
        .route("/api/applicants/:id/avatar", post(applicants::upload_avatar))
        .route(
            "/api/jobs",
            get(jobs::list_jobs).post(jobs::create_job),
        )
        .route(
            "/api/jobs/:id",
            axum::routing::patch(jobs::update_job).delete(jobs::delete_job),
        )
        .route("/api/dashboard/stats", get(dashboard::get_stats))
        .route("/api/dashboard/recent", get(dashboard::get_recent))
        .merge(admin_api)
        .route_layer(from_fn_with_state(state.clone(), require_bearer_auth))
        .layer(from_fn_with_state(
            state.rate_limiter.clone(),
            rps_middleware,
        ));

    let base_routes = Router::new().route("/health", get(health::health));

    base_routes
        .merge(api)
        .with_state(state.clone())
        .layer(cors_layer(state.config.cors_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
