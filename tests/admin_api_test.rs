use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

use recruitment_admin::{
    backend::memory::InMemoryBackend,
    config::{BackendMode, Config},
    models::{
        applicant::Applicant,
        application::Application,
        job::{Job, JobStatus, JobType},
        role::AppRole,
    },
    routes::build_router,
    AppState,
};

const SECRET: &str = "test_secret_key";

struct Fixture {
    app: Router,
    backend: InMemoryBackend,
    alger_job: Uuid,
    oran_job: Uuid,
    amina: Uuid,
    pending_app: Uuid,
    offered_app: Uuid,
}

fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        jwt_secret: SECRET.to_string(),
        backend_mode: BackendMode::Memory,
        backend_url: String::new(),
        backend_api_key: String::new(),
        backend_timeout_secs: 5,
        storage_bucket: "applicant-files".to_string(),
        cache_ttl_secs: 60,
        admin_rps: 1000,
        cors_origin: None,
    }
}

fn job(title: &str, location: &str) -> Job {
    Job {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        location: location.to_string(),
        job_type: JobType::FullTime,
        salary_range: None,
        status: JobStatus::Open,
        deadline: None,
        image_url: None,
        max_applicants: None,
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

fn applicant(name: &str, email: &str, gender: &str, wilaya: &str, age: i32) -> Applicant {
    Applicant {
        id: Uuid::new_v4(),
        full_name: Some(name.to_string()),
        first_name: None,
        last_name: None,
        email: email.to_string(),
        phone: None,
        address: None,
        gender: Some(gender.to_string()),
        wilaya: Some(wilaya.to_string()),
        age: Some(age),
        avatar_url: None,
        rating: Some(3),
        skills: vec!["excel".to_string()],
        education: Vec::new(),
        experience: Vec::new(),
        cv_url: None,
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

fn application(job_id: Uuid, applicant_id: Uuid, status: &str, hours_ago: i64) -> Application {
    Application {
        id: Uuid::new_v4(),
        job_id,
        applicant_id,
        status: status.to_string(),
        cv_url: None,
        cover_letter: None,
        applied_at: Utc::now() - Duration::hours(hours_ago),
        updated_at: None,
        hr_notes: None,
        test_stage_notes: None,
        interview_date: None,
        interview_notes: None,
        technical_score: None,
        proposed_salary: None,
        offer_status: None,
        final_notes: None,
        job: None,
        applicant: None,
    }
}

fn fixture() -> Fixture {
    let backend = InMemoryBackend::new();

    let alger = job("Accountant", "Alger");
    let oran = job("Data Analyst", "Oran");
    let amina = applicant("Amina Benali", "amina@example.com", "female", "Alger", 27);
    let karim = applicant("Karim Haddad", "karim@example.com", "male", "Oran", 34);

    let pending = application(alger.id, amina.id, "pending", 1);
    let offered = application(oran.id, amina.id, "offered", 48);
    let reviewing = application(alger.id, karim.id, "reviewing", 72);

    let ids = (alger.id, oran.id, amina.id, pending.id, offered.id);
    backend.insert_job(alger).unwrap();
    backend.insert_job(oran).unwrap();
    backend.insert_applicant(amina).unwrap();
    backend.insert_applicant(karim).unwrap();
    backend.insert_application(pending).unwrap();
    backend.insert_application(offered).unwrap();
    backend.insert_application(reviewing).unwrap();

    let state = AppState::new(test_config(), Arc::new(backend.clone()));
    Fixture {
        app: build_router(state),
        backend,
        alger_job: ids.0,
        oran_job: ids.1,
        amina: ids.2,
        pending_app: ids.3,
        offered_app: ids.4,
    }
}

fn bearer(user: Uuid) -> String {
    #[derive(serde::Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
        role: Option<String>,
    }
    let exp = (Utc::now() + Duration::hours(1)).timestamp() as usize;
    let token = encode(
        &Header::default(),
        &Claims {
            sub: user.to_string(),
            exp,
            role: None,
        },
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("sign token");
    format!("Bearer {}", token)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    send_as(app, Uuid::new_v4(), method, uri, body).await
}

async fn send_as(
    app: &Router,
    user: Uuid,
    method: &str,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", bearer(user));
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, json)
}

#[tokio::test]
async fn health_is_open_and_api_requires_a_token() {
    let fx = fixture();

    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = fx.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder().uri("/api/jobs").body(Body::empty()).unwrap();
    let resp = fx.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/api/jobs")
        .header("authorization", "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let resp = fx.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn applications_are_filtered_from_query_parameters() {
    let fx = fixture();

    let (status, body) = send(&fx.app, "GET", "/api/applications", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["wilayas"], json!(["Alger", "Oran"]));
    // newest first, with the applicant embedded
    assert_eq!(body["items"][0]["id"], json!(fx.pending_app));
    assert_eq!(body["items"][0]["applicant"]["full_name"], "Amina Benali");

    let (_, body) = send(&fx.app, "GET", "/api/applications?status=all&wilaya=Alger", None).await;
    assert_eq!(body["total"], 2);

    let (_, body) = send(&fx.app, "GET", "/api/applications?status=reviewing", None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["applicant"]["full_name"], "Karim Haddad");

    let (_, body) = send(&fx.app, "GET", "/api/applications?search=data%20ANALYST", None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], json!(fx.offered_app));

    let uri = format!("/api/applications?job_id={}&min_age=30&max_age=0", fx.alger_job);
    let (_, body) = send(&fx.app, "GET", &uri, None).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn pipeline_moves_forward_one_stage_at_a_time() {
    let fx = fixture();
    let base = format!("/api/applications/{}/pipeline", fx.pending_app);

    let (status, body) = send(&fx.app, "GET", &base, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_stage"], "applied");
    assert_eq!(body["timeline"][0]["current"], true);
    assert_eq!(body["applicant_initials"], "AB");

    let (status, _) = send(&fx.app, "GET", &format!("{}?view=offer", base), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &fx.app,
        "POST",
        &format!("{}/advance", base),
        Some(json!({ "notes": "solid CV" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_stage"], "test_stage");
    assert_eq!(body["application"]["status"], "reviewing");
    assert_eq!(body["application"]["hr_notes"], "solid CV");

    let interview_at = (Utc::now() + Duration::days(2)).to_rfc3339();
    let (status, body) = send(
        &fx.app,
        "POST",
        &format!("{}/advance", base),
        Some(json!({ "interview_date": interview_at })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_stage"], "interview");

    // the interview now shows on the upcoming calendar
    let (_, slots) = send(&fx.app, "GET", "/api/interviews?upcoming=true", None).await;
    assert_eq!(slots.as_array().map(Vec::len), Some(1));
    assert_eq!(slots[0]["id"], json!(fx.pending_app));

    let (status, body) = send(
        &fx.app,
        "POST",
        &format!("{}/reject", base),
        Some(json!({ "notes": "weak system design" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_decision"], "rejected");
    assert_eq!(body["application"]["interview_notes"], "weak system design");

    let (status, body) = send(&fx.app, "POST", &format!("{}/advance", base), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("final decision"));

    let (_, detail) = send(&fx.app, "GET", &format!("/api/applications/{}", fx.pending_app), None).await;
    assert_eq!(detail["status"], "rejected");
}

#[tokio::test]
async fn offers_close_with_hire_not_advance() {
    let fx = fixture();
    let base = format!("/api/applications/{}/pipeline", fx.offered_app);

    let (status, _) = send(&fx.app, "POST", &format!("{}/advance", base), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &fx.app,
        "POST",
        &format!("{}/notes", base),
        Some(json!({ "stage": "offer", "notes": "n/a" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &fx.app,
        "POST",
        &format!("{}/hire", base),
        Some(json!({ "notes": "starts in May" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_decision"], "hired");
    assert_eq!(body["timeline"][4]["completed"], true);

    let (_, stats) = send(&fx.app, "GET", "/api/dashboard/stats", None).await;
    assert_eq!(stats["accepted_applications"], 1);
    assert_eq!(stats["offered_applications"], 0);
}

#[tokio::test]
async fn status_rpc_refusal_is_a_bad_request() {
    let fx = fixture();
    let uri = format!("/api/applications/{}/status", Uuid::new_v4());
    let (status, body) = send(&fx.app, "POST", &uri, Some(json!({ "status": "reviewing" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Application not found");

    let (status, body) = send(
        &fx.app,
        "POST",
        "/api/applications/bulk-status",
        Some(json!({
            "application_ids": [fx.pending_app, fx.offered_app],
            "status": "shortlisted"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated_count"], 2);
}

#[tokio::test]
async fn jobs_are_validated_and_deletes_cascade() {
    let fx = fixture();

    let (status, _) = send(
        &fx.app,
        "POST",
        "/api/jobs",
        Some(json!({ "title": "   ", "location": "Alger" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = send(
        &fx.app,
        "POST",
        "/api/jobs",
        Some(json!({
            "title": "HR Assistant",
            "location": "Constantine",
            "description": "",
            "deadline": "2030-01-31"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["description"], JsonValue::Null);
    assert_eq!(created["job_type"], "full_time");

    let (_, jobs) = send(&fx.app, "GET", "/api/jobs", None).await;
    assert_eq!(jobs.as_array().map(Vec::len), Some(3));

    let (status, _) = send(&fx.app, "DELETE", &format!("/api/jobs/{}", fx.oran_job), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&fx.app, "GET", "/api/applications", None).await;
    assert_eq!(body["total"], 2);
    let (status, _) = send(&fx.app, "GET", &format!("/api/applications/{}", fx.offered_app), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn applicant_rating_and_profile_edits() {
    let fx = fixture();
    let uri = format!("/api/applicants/{}", fx.amina);

    let (status, _) = send(&fx.app, "PUT", &format!("{}/rating", uri), Some(json!({ "rating": 6 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&fx.app, "PUT", &format!("{}/rating", uri), Some(json!({ "rating": 5 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 5);

    let (status, body) = send(
        &fx.app,
        "PATCH",
        &uri,
        Some(json!({ "skills": "accounting, sage ,", "wilaya": "Blida" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skills"], json!(["accounting", "sage"]));
    assert_eq!(body["display_name"], "Amina Benali");
    assert!(body["avatar"].as_str().unwrap().starts_with("/avatars/woman/"));

    let (_, found) = send(&fx.app, "GET", "/api/applicants?wilaya=Blida&min_rating=5", None).await;
    assert_eq!(found.as_array().map(Vec::len), Some(1));
    assert_eq!(found[0]["total_applications"], 2);
}

#[tokio::test]
async fn cv_upload_stores_file_and_links_profile() {
    let fx = fixture();
    let boundary = "X-RECRUITMENT-BOUNDARY";
    let multipart = |content_type: &str| {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cv.pdf\"\r\nContent-Type: {ct}\r\n\r\n%PDF-1.4 test\r\n--{b}--\r\n",
            b = boundary,
            ct = content_type
        )
    };
    let upload = |content_type: &str| {
        Request::builder()
            .method("POST")
            .uri(format!("/api/applicants/{}/cv", fx.amina))
            .header("authorization", bearer(Uuid::new_v4()))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(multipart(content_type)))
            .unwrap()
    };

    let resp = fx.app.clone().oneshot(upload("image/png")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = fx.app.clone().oneshot(upload("application/pdf")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    let url = body["url"].as_str().unwrap().to_string();
    assert!(url.starts_with(&format!("memory://applicant-files/cvs/{}-", fx.amina)));
    assert!(url.ends_with(".pdf"));
    assert!(fx.backend.stored_file(&url).unwrap().is_some());

    let (_, profile) = send(&fx.app, "GET", &format!("/api/applicants/{}", fx.amina), None).await;
    assert_eq!(profile["cv_url"], json!(url));
}

#[tokio::test]
async fn only_admins_create_users() {
    let fx = fixture();
    let payload = json!({
        "email": "Recruiter@Example.com",
        "password": "s3cure-password",
        "role": "user"
    });

    let stranger = Uuid::new_v4();
    let (status, _) = send_as(&fx.app, stranger, "POST", "/api/admin/users", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = Uuid::new_v4();
    fx.backend.grant_role(admin, AppRole::Admin).unwrap();
    let (status, body) = send_as(&fx.app, admin, "POST", "/api/admin/users", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "recruiter@example.com");
    assert_eq!(body["role"], "user");
    assert_eq!(fx.backend.users().unwrap().len(), 1);

    let (status, _) = send_as(
        &fx.app,
        admin,
        "POST",
        "/api/admin/users",
        Some(json!({ "email": "not-an-email", "password": "s3cure-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn openapi_document_lists_the_pipeline_routes() {
    let fx = fixture();
    let (status, doc) = send(&fx.app, "GET", "/api/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/applications/{id}/pipeline/advance"].is_object());
    assert!(doc["paths"]["/api/admin/users"].is_object());
}
