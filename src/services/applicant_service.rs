use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use crate::backend::Backend;
use crate::cache::{QueryCache, QueryKey, QueryScope};
use crate::error::{Error, Result};
use crate::filter::{filter_applicants, ApplicantCriteria};
use crate::models::applicant::{Applicant, ApplicantPatch, ApplicantSearch, ApplicantSummary};
use crate::utils::time::now;

pub const MAX_CV_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

/// Kind of file attached to an applicant profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Cv,
    Avatar,
}

impl UploadKind {
    fn folder(&self) -> &'static str {
        match self {
            UploadKind::Cv => "cvs",
            UploadKind::Avatar => "avatars",
        }
    }

    fn max_bytes(&self) -> usize {
        match self {
            UploadKind::Cv => MAX_CV_BYTES,
            UploadKind::Avatar => MAX_AVATAR_BYTES,
        }
    }

    /// File extension for an accepted content type.
    pub fn extension_for(&self, content_type: &str) -> Option<&'static str> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match (self, mime.as_str()) {
            (UploadKind::Cv, "application/pdf") => Some("pdf"),
            (UploadKind::Cv, "application/msword") => Some("doc"),
            (
                UploadKind::Cv,
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ) => Some("docx"),
            (UploadKind::Avatar, "image/jpeg" | "image/jpg") => Some("jpg"),
            (UploadKind::Avatar, "image/png") => Some("png"),
            (UploadKind::Avatar, "image/webp") => Some("webp"),
            _ => None,
        }
    }

    fn rejection(&self) -> &'static str {
        match self {
            UploadKind::Cv => "Please upload a PDF or Word document",
            UploadKind::Avatar => "Please upload a valid image file (JPG, PNG, or WebP)",
        }
    }
}

#[derive(Clone)]
pub struct ApplicantService {
    backend: Arc<dyn Backend>,
    cache: QueryCache,
    bucket: String,
}

impl ApplicantService {
    pub fn new(backend: Arc<dyn Backend>, cache: QueryCache, bucket: String) -> Self {
        Self {
            backend,
            cache,
            bucket,
        }
    }

    /// Backend search, refined locally with the same criteria so rows the
    /// remote function matched loosely are dropped.
    pub async fn search(&self, search: ApplicantSearch) -> Result<Vec<ApplicantSummary>> {
        let fingerprint = serde_json::to_string(&search)?;
        let backend = self.backend.clone();
        let remote = search.clone();
        let rows: Vec<ApplicantSummary> = self
            .cache
            .get_or_fetch(
                QueryKey::with_params(QueryScope::Applicants, fingerprint),
                || async move { backend.list_applicants(remote).await },
            )
            .await?;
        let criteria = ApplicantCriteria {
            search_text: search.search_term,
            gender: search.gender,
            wilaya: search.wilaya,
            min_rating: search.min_rating,
            min_age: search.min_age,
            max_age: search.max_age,
        };
        Ok(filter_applicants(&rows, &criteria))
    }

    pub async fn get(&self, id: Uuid) -> Result<Applicant> {
        let backend = self.backend.clone();
        let found: Option<Applicant> = self
            .cache
            .get_or_fetch(
                QueryKey::with_params(QueryScope::ApplicantDetail, id),
                || async move { backend.get_applicant(id).await },
            )
            .await?;
        found.ok_or_else(|| Error::NotFound(format!("Applicant {} not found", id)))
    }

    pub async fn update(&self, id: Uuid, patch: ApplicantPatch) -> Result<Applicant> {
        if patch.is_empty() {
            return Err(Error::BadRequest("No fields to update".to_string()));
        }
        self.get(id).await?;
        self.backend.update_applicant(id, patch).await?;
        self.invalidate_after_write();
        tracing::info!(applicant_id = %id, "applicant profile updated");
        self.get(id).await
    }

    pub async fn rate(&self, id: Uuid, rating: i32) -> Result<Applicant> {
        if !(1..=5).contains(&rating) {
            return Err(Error::BadRequest(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        self.get(id).await?;
        self.backend.update_applicant_rating(id, rating).await?;
        self.invalidate_after_write();
        self.get(id).await
    }

    /// Stores the file and points the profile at its public URL.
    pub async fn upload(
        &self,
        id: Uuid,
        kind: UploadKind,
        content_type: &str,
        body: Bytes,
    ) -> Result<String> {
        let ext = kind
            .extension_for(content_type)
            .ok_or_else(|| Error::BadRequest(kind.rejection().to_string()))?;
        if body.is_empty() {
            return Err(Error::BadRequest("Uploaded file is empty".to_string()));
        }
        if body.len() > kind.max_bytes() {
            return Err(Error::BadRequest(format!(
                "File size must be less than {}MB",
                kind.max_bytes() / (1024 * 1024)
            )));
        }
        self.get(id).await?;

        let path = format!(
            "{}/{}-{}.{}",
            kind.folder(),
            id,
            now().timestamp_millis(),
            ext
        );
        let size = body.len();
        let url = self
            .backend
            .upload_file(
                self.bucket.clone(),
                path.clone(),
                content_type.to_string(),
                body,
            )
            .await?;

        let patch = match kind {
            UploadKind::Cv => ApplicantPatch {
                cv_url: Some(url.clone()),
                ..Default::default()
            },
            UploadKind::Avatar => ApplicantPatch {
                avatar_url: Some(url.clone()),
                ..Default::default()
            },
        };
        self.backend.update_applicant(id, patch).await?;
        self.invalidate_after_write();
        tracing::info!(applicant_id = %id, %path, size, "applicant file uploaded");
        Ok(url)
    }

    /// Applicant rows are embedded in application listings too.
    fn invalidate_after_write(&self) {
        self.cache.invalidate_applicants();
        self.cache.invalidate(&[
            QueryKey::scope(QueryScope::Applications),
            QueryKey::scope(QueryScope::ApplicationDetail),
            QueryKey::scope(QueryScope::InterviewSchedule),
            QueryKey::scope(QueryScope::RecentApplications),
        ]);
    }
}
