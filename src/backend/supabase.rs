use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use super::Backend;
use crate::error::{Error, Result};
use crate::models::applicant::{Applicant, ApplicantPatch, ApplicantSearch, ApplicantSummary};
use crate::models::application::{
    Application, ApplicationPatch, ApplicationStatus, BulkStatusOutcome, InterviewSlot,
    StatusUpdateOutcome,
};
use crate::models::job::{Job, JobPatch, JobWithCounts, NewJob};
use crate::models::role::{AppRole, CreatedUser, NewUser};
use crate::models::stats::{DashboardStats, RecentApplication};

const APPLICATION_SELECT: &str = "*,job:jobs(id,title,location),applicant:applicants(*)";
const INTERVIEW_SELECT: &str = "id,status,interview_date,job:jobs(id,title,location),applicant:applicants(id,full_name,email,avatar_url,gender)";

/// PostgREST / storage / auth-admin client for a Supabase project.
#[derive(Clone)]
pub struct SupabaseBackend {
    client: Client,
    base_url: Url,
    api_key: String,
}

#[derive(Serialize)]
struct SearchApplicantsArgs<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    search_term: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_gender: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_wilaya: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_rating: Option<i32>,
}

impl SupabaseBackend {
    pub fn new(base_url: &str, api_key: String, timeout_secs: u64) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid BACKEND_URL '{}': {}", base_url, e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        info!(url = %base_url, timeout_secs, "remote backend client ready");
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config("BACKEND_URL cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments.iter().flat_map(|s| s.split('/')));
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn table(&self, method: Method, table: &str) -> Result<RequestBuilder> {
        Ok(self.request(method, self.endpoint(&["rest", "v1", table])?))
    }

    async fn rpc<A, T>(&self, function: &str, args: &A) -> Result<T>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(function, "backend rpc");
        let url = self.endpoint(&["rest", "v1", "rpc", function])?;
        let response = self.request(Method::POST, url).json(args).send().await?;
        let response = check(response, function).await?;
        Ok(response.json::<T>().await?)
    }

    /// RPCs that return a table yield a list; the first row is the answer.
    async fn rpc_row<A, T>(&self, function: &str, args: &A) -> Result<T>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let rows: Vec<T> = self.rpc(function, args).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::Backend {
                status: 502,
                message: format!("{} returned no rows", function),
            })
    }

    fn id_filter(id: Uuid) -> (&'static str, String) {
        ("id", format!("eq.{}", id))
    }
}

async fn check(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<JsonValue>(&body)
        .ok()
        .and_then(|value| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|k| value.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or(body);
    warn!(status = status.as_u16(), context, %message, "backend request failed");
    Err(Error::Backend {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl Backend for SupabaseBackend {
    async fn list_applications(&self) -> Result<Vec<Application>> {
        let response = self
            .table(Method::GET, "applications")?
            .query(&[("select", APPLICATION_SELECT), ("order", "applied_at.desc")])
            .send()
            .await?;
        Ok(check(response, "list_applications").await?.json().await?)
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        let response = self
            .table(Method::GET, "applications")?
            .query(&[("select", APPLICATION_SELECT.to_string()), Self::id_filter(id)])
            .send()
            .await?;
        let rows: Vec<Application> = check(response, "get_application").await?.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<StatusUpdateOutcome> {
        self.rpc_row(
            "update_application_status",
            &json!({ "application_id_param": id, "new_status": status }),
        )
        .await
    }

    async fn bulk_update_application_status(
        &self,
        ids: Vec<Uuid>,
        status: ApplicationStatus,
    ) -> Result<BulkStatusOutcome> {
        self.rpc_row(
            "bulk_update_application_status",
            &json!({ "application_ids": ids, "new_status": status }),
        )
        .await
    }

    async fn update_application_fields(&self, id: Uuid, patch: ApplicationPatch) -> Result<()> {
        let response = self
            .table(Method::PATCH, "applications")?
            .query(&[Self::id_filter(id)])
            .header("Prefer", "return=minimal")
            .json(&patch)
            .send()
            .await?;
        check(response, "update_application_fields").await?;
        Ok(())
    }

    async fn list_interview_schedule(&self) -> Result<Vec<InterviewSlot>> {
        let response = self
            .table(Method::GET, "applications")?
            .query(&[
                ("select", INTERVIEW_SELECT),
                ("interview_date", "not.is.null"),
                ("order", "interview_date.asc"),
            ])
            .send()
            .await?;
        Ok(check(response, "list_interview_schedule").await?.json().await?)
    }

    async fn list_applicants(&self, search: ApplicantSearch) -> Result<Vec<ApplicantSummary>> {
        let args = SearchApplicantsArgs {
            search_term: search.search_term.as_deref(),
            filter_gender: search.gender.as_deref(),
            filter_wilaya: search.wilaya.as_deref(),
            min_age: search.min_age,
            max_age: search.max_age,
            min_rating: search.min_rating,
        };
        self.rpc("search_applicants_filtered", &args).await
    }

    async fn get_applicant(&self, id: Uuid) -> Result<Option<Applicant>> {
        let response = self
            .table(Method::GET, "applicants")?
            .query(&[("select", "*".to_string()), Self::id_filter(id)])
            .send()
            .await?;
        let rows: Vec<Applicant> = check(response, "get_applicant").await?.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn update_applicant(&self, id: Uuid, patch: ApplicantPatch) -> Result<()> {
        let response = self
            .table(Method::PATCH, "applicants")?
            .query(&[Self::id_filter(id)])
            .header("Prefer", "return=minimal")
            .json(&patch)
            .send()
            .await?;
        check(response, "update_applicant").await?;
        Ok(())
    }

    async fn update_applicant_rating(&self, id: Uuid, rating: i32) -> Result<()> {
        let response = self
            .table(Method::PATCH, "applicants")?
            .query(&[Self::id_filter(id)])
            .header("Prefer", "return=minimal")
            .json(&json!({ "rating": rating }))
            .send()
            .await?;
        check(response, "update_applicant_rating").await?;
        Ok(())
    }

    async fn list_jobs(&self) -> Result<Vec<JobWithCounts>> {
        self.rpc("get_all_jobs_with_counts", &json!({})).await
    }

    async fn create_job(&self, job: NewJob) -> Result<Job> {
        let response = self
            .table(Method::POST, "jobs")?
            .header("Prefer", "return=representation")
            .json(&job)
            .send()
            .await?;
        let rows: Vec<Job> = check(response, "create_job").await?.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::Internal("job insert returned no row".to_string()))
    }

    async fn update_job(&self, id: Uuid, patch: JobPatch) -> Result<Job> {
        let response = self
            .table(Method::PATCH, "jobs")?
            .query(&[Self::id_filter(id)])
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;
        let rows: Vec<Job> = check(response, "update_job").await?.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", id)))
    }

    async fn delete_job(&self, id: Uuid) -> Result<()> {
        let response = self
            .table(Method::DELETE, "jobs")?
            .query(&[Self::id_filter(id)])
            .send()
            .await?;
        check(response, "delete_job").await?;
        Ok(())
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let rows: Vec<DashboardStats> = self.rpc("get_dashboard_stats", &json!({})).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn recent_applications(&self, limit: u32) -> Result<Vec<RecentApplication>> {
        self.rpc("get_recent_applications", &json!({ "limit_count": limit }))
            .await
    }

    async fn upload_file(
        &self,
        bucket: String,
        path: String,
        content_type: String,
        body: Bytes,
    ) -> Result<String> {
        let url = self.endpoint(&["storage", "v1", "object", &bucket, &path])?;
        let size = body.len();
        let response = self
            .request(Method::POST, url)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        check(response, "upload_file").await?;
        let public = self.endpoint(&["storage", "v1", "object", "public", &bucket, &path])?;
        info!(%bucket, %path, size, "file uploaded");
        Ok(public.to_string())
    }

    async fn check_role(&self, user_id: Uuid, role: AppRole) -> Result<bool> {
        self.rpc(
            "has_role",
            &json!({ "_user_id": user_id, "_role": role.as_str() }),
        )
        .await
    }

    async fn create_user(&self, user: NewUser) -> Result<CreatedUser> {
        let url = self.endpoint(&["auth", "v1", "admin", "users"])?;
        let response = self
            .request(Method::POST, url)
            .json(&json!({
                "email": user.email,
                "password": user.password,
                "email_confirm": true,
                "user_metadata": { "full_name": user.full_name },
            }))
            .send()
            .await?;
        let created: CreatedUser = check(response, "create_user").await?.json().await?;

        let response = self
            .table(Method::POST, "user_roles")?
            .header("Prefer", "return=minimal")
            .json(&json!({ "user_id": created.id, "role": user.role.as_str() }))
            .send()
            .await?;
        check(response, "assign_role").await?;
        info!(user_id = %created.id, role = user.role.as_str(), "user created");
        Ok(created)
    }
}
