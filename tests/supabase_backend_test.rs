use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use recruitment_admin::{
    backend::{supabase::SupabaseBackend, Backend},
    error::Error,
    models::application::ApplicationStatus,
};

const KEY: &str = "service-role-key";

#[derive(Debug, Clone, PartialEq)]
struct Seen {
    route: String,
    apikey: Option<String>,
    content_type: Option<String>,
    body: JsonValue,
    size: usize,
}

type Log = Arc<Mutex<Vec<Seen>>>;

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn list_applications_rejected() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "code": "42703",
            "message": "column applications.score does not exist"
        })),
    )
        .into_response()
}

async fn rpc(
    State(log): State<Log>,
    Path(function): Path<String>,
    headers: HeaderMap,
    Json(body): Json<JsonValue>,
) -> Response {
    log.lock().unwrap().push(Seen {
        route: format!("rpc/{}", function),
        apikey: header_value(&headers, "apikey"),
        content_type: None,
        body,
        size: 0,
    });
    match function.as_str() {
        "update_application_status" => Json(json!([{
            "success": false,
            "message": "Invalid status transition"
        }]))
        .into_response(),
        "get_dashboard_stats" => {
            (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn store_object(
    State(log): State<Log>,
    Path((bucket, path)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    log.lock().unwrap().push(Seen {
        route: format!("storage/{}/{}", bucket, path),
        apikey: header_value(&headers, "apikey"),
        content_type: header_value(&headers, header::CONTENT_TYPE.as_str()),
        body: JsonValue::Null,
        size: body.len(),
    });
    Json(json!({ "Key": format!("{}/{}", bucket, path) })).into_response()
}

async fn spawn_fake_supabase() -> (SupabaseBackend, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/rest/v1/applications", get(list_applications_rejected))
        .route("/rest/v1/rpc/:function", post(rpc))
        .route("/storage/v1/object/:bucket/*path", post(store_object))
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let backend = SupabaseBackend::new(&format!("http://{}/", addr), KEY.to_string(), 5).unwrap();
    (backend, log)
}

#[tokio::test]
async fn postgrest_client_error_maps_to_bad_request() {
    let (backend, _log) = spawn_fake_supabase().await;

    let err = backend.list_applications().await.unwrap_err();
    match &err {
        Error::Backend { status, message } => {
            assert_eq!(*status, 400);
            assert_eq!(message, "column applications.score does not exist");
        }
        other => panic!("expected backend error, got {:?}", other),
    }
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn server_failure_maps_to_bad_gateway() {
    let (backend, _log) = spawn_fake_supabase().await;

    let err = backend.dashboard_stats().await.unwrap_err();
    match &err {
        Error::Backend { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected backend error, got {:?}", other),
    }
    assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn status_rpc_refusal_is_decoded_not_raised() {
    let (backend, log) = spawn_fake_supabase().await;
    let id = Uuid::new_v4();

    let outcome = backend
        .update_application_status(id, ApplicationStatus::Offered)
        .await
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Invalid status transition");

    let seen = log.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].route, "rpc/update_application_status");
    assert_eq!(seen[0].apikey.as_deref(), Some(KEY));
    assert_eq!(
        seen[0].body,
        json!({ "application_id_param": id, "new_status": "offered" })
    );
}

#[tokio::test]
async fn upload_returns_public_object_url() {
    let (backend, log) = spawn_fake_supabase().await;

    let url = backend
        .upload_file(
            "applicant-files".to_string(),
            "cvs/abc-1700000000000.pdf".to_string(),
            "application/pdf".to_string(),
            Bytes::from_static(b"%PDF-1.4 test"),
        )
        .await
        .unwrap();
    assert!(url.starts_with("http://127.0.0.1:"));
    assert!(url.ends_with("/storage/v1/object/public/applicant-files/cvs/abc-1700000000000.pdf"));

    let seen = log.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].route, "storage/applicant-files/cvs/abc-1700000000000.pdf");
    assert_eq!(seen[0].content_type.as_deref(), Some("application/pdf"));
    assert_eq!(seen[0].apikey.as_deref(), Some(KEY));
    assert_eq!(seen[0].size, 13);
}
