//! Process-local backend used for local runs (`BACKEND_MODE=memory`) and the
//! test suite. Implements the same observable semantics as the remote
//! service: cascading job deletes, filtered applicant search and aggregate
//! dashboard counts.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Backend;
use crate::error::{Error, Result};
use crate::filter::{filter_applicants, ApplicantCriteria};
use crate::models::applicant::{
    Applicant, ApplicantPatch, ApplicantRef, ApplicantSearch, ApplicantSummary,
};
use crate::models::application::{
    Application, ApplicationPatch, ApplicationStatus, BulkStatusOutcome, InterviewSlot,
    StatusUpdateOutcome,
};
use crate::models::job::{Job, JobPatch, JobRef, JobStatus, JobWithCounts, NewJob};
use crate::models::role::{AppRole, CreatedUser, NewUser};
use crate::models::stats::{DashboardStats, RecentApplication};
use crate::utils::time::{days_before, now, start_of_day, today};

#[derive(Debug, Default)]
struct MemoryState {
    jobs: Vec<Job>,
    applicants: Vec<Applicant>,
    applications: Vec<Application>,
    roles: HashMap<Uuid, HashSet<AppRole>>,
    users: Vec<CreatedUser>,
    files: HashMap<String, Bytes>,
}

impl MemoryState {
    fn embed(&self, application: &Application) -> Application {
        let mut row = application.clone();
        row.job = self
            .jobs
            .iter()
            .find(|j| j.id == application.job_id)
            .map(|j| JobRef {
                id: j.id,
                title: j.title.clone(),
                location: Some(j.location.clone()),
            });
        row.applicant = self
            .applicants
            .iter()
            .find(|a| a.id == application.applicant_id)
            .cloned();
        row
    }

    fn applications_newest_first(&self) -> Vec<&Application> {
        let mut rows: Vec<&Application> = self.applications.iter().collect();
        rows.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        rows
    }

    fn set_status(&mut self, id: Uuid, status: ApplicationStatus) -> bool {
        match self.applications.iter_mut().find(|a| a.id == id) {
            Some(application) => {
                application.status = status.as_str().to_string();
                application.updated_at = Some(now());
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|e| Error::Internal(format!("memory backend lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|e| Error::Internal(format!("memory backend lock poisoned: {}", e)))
    }

    pub fn insert_job(&self, job: Job) -> Result<()> {
        self.write()?.jobs.push(job);
        Ok(())
    }

    pub fn insert_applicant(&self, applicant: Applicant) -> Result<()> {
        self.write()?.applicants.push(applicant);
        Ok(())
    }

    /// Stores the bare row; embedded job/applicant are rebuilt on read.
    pub fn insert_application(&self, mut application: Application) -> Result<()> {
        application.job = None;
        application.applicant = None;
        self.write()?.applications.push(application);
        Ok(())
    }

    pub fn grant_role(&self, user_id: Uuid, role: AppRole) -> Result<()> {
        self.write()?.roles.entry(user_id).or_default().insert(role);
        Ok(())
    }

    pub fn stored_file(&self, public_url: &str) -> Result<Option<Bytes>> {
        Ok(self.read()?.files.get(public_url).cloned())
    }

    pub fn users(&self) -> Result<Vec<CreatedUser>> {
        Ok(self.read()?.users.clone())
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn list_applications(&self) -> Result<Vec<Application>> {
        let state = self.read()?;
        Ok(state
            .applications_newest_first()
            .into_iter()
            .map(|a| state.embed(a))
            .collect())
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        let state = self.read()?;
        Ok(state
            .applications
            .iter()
            .find(|a| a.id == id)
            .map(|a| state.embed(a)))
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<StatusUpdateOutcome> {
        let mut state = self.write()?;
        if state.set_status(id, status) {
            Ok(StatusUpdateOutcome {
                success: true,
                message: format!("Application status updated to {}", status),
            })
        } else {
            Ok(StatusUpdateOutcome {
                success: false,
                message: "Application not found".to_string(),
            })
        }
    }

    async fn bulk_update_application_status(
        &self,
        ids: Vec<Uuid>,
        status: ApplicationStatus,
    ) -> Result<BulkStatusOutcome> {
        let mut state = self.write()?;
        let updated_count = ids
            .iter()
            .filter(|id| state.set_status(**id, status))
            .count() as i64;
        Ok(BulkStatusOutcome {
            success: updated_count > 0,
            message: format!("{} applications updated to {}", updated_count, status),
            updated_count,
        })
    }

    async fn update_application_fields(&self, id: Uuid, patch: ApplicationPatch) -> Result<()> {
        let mut state = self.write()?;
        if let Some(application) = state.applications.iter_mut().find(|a| a.id == id) {
            patch.apply_to(application);
            application.updated_at = Some(now());
        }
        Ok(())
    }

    async fn list_interview_schedule(&self) -> Result<Vec<InterviewSlot>> {
        let state = self.read()?;
        let mut slots: Vec<InterviewSlot> = state
            .applications
            .iter()
            .filter_map(|a| {
                let interview_date = a.interview_date?;
                let row = state.embed(a);
                Some(InterviewSlot {
                    id: row.id,
                    status: row.status,
                    interview_date,
                    job: row.job,
                    applicant: row.applicant.map(|p| ApplicantRef {
                        id: p.id,
                        full_name: p.full_name,
                        email: Some(p.email),
                        avatar_url: p.avatar_url,
                        gender: p.gender,
                    }),
                })
            })
            .collect();
        slots.sort_by_key(|slot| slot.interview_date);
        Ok(slots)
    }

    async fn list_applicants(&self, search: ApplicantSearch) -> Result<Vec<ApplicantSummary>> {
        let state = self.read()?;
        let summaries: Vec<ApplicantSummary> = state
            .applicants
            .iter()
            .map(|a| ApplicantSummary {
                id: a.id,
                full_name: Some(a.display_name()),
                email: a.email.clone(),
                phone: a.phone.clone(),
                gender: a.gender.clone(),
                wilaya: a.wilaya.clone(),
                age: a.age,
                rating: a.rating,
                avatar_url: a.avatar_url.clone(),
                skills: a.skills.clone(),
                total_applications: state
                    .applications
                    .iter()
                    .filter(|app| app.applicant_id == a.id)
                    .count() as i64,
            })
            .collect();
        let criteria = ApplicantCriteria {
            search_text: search.search_term,
            gender: search.gender,
            wilaya: search.wilaya,
            min_rating: search.min_rating,
            min_age: search.min_age,
            max_age: search.max_age,
        };
        Ok(filter_applicants(&summaries, &criteria))
    }

    async fn get_applicant(&self, id: Uuid) -> Result<Option<Applicant>> {
        Ok(self.read()?.applicants.iter().find(|a| a.id == id).cloned())
    }

    async fn update_applicant(&self, id: Uuid, patch: ApplicantPatch) -> Result<()> {
        let mut state = self.write()?;
        let Some(applicant) = state.applicants.iter_mut().find(|a| a.id == id) else {
            return Ok(());
        };
        let ApplicantPatch {
            full_name,
            email,
            phone,
            address,
            gender,
            wilaya,
            age,
            skills,
            education,
            experience,
            avatar_url,
            cv_url,
        } = patch;
        if full_name.is_some() {
            applicant.full_name = full_name;
        }
        if let Some(email) = email {
            applicant.email = email;
        }
        if phone.is_some() {
            applicant.phone = phone;
        }
        if address.is_some() {
            applicant.address = address;
        }
        if gender.is_some() {
            applicant.gender = gender;
        }
        if wilaya.is_some() {
            applicant.wilaya = wilaya;
        }
        if age.is_some() {
            applicant.age = age;
        }
        if let Some(skills) = skills {
            applicant.skills = skills;
        }
        if let Some(education) = education {
            applicant.education = education;
        }
        if let Some(experience) = experience {
            applicant.experience = experience;
        }
        if avatar_url.is_some() {
            applicant.avatar_url = avatar_url;
        }
        if cv_url.is_some() {
            applicant.cv_url = cv_url;
        }
        applicant.updated_at = Some(now());
        Ok(())
    }

    async fn update_applicant_rating(&self, id: Uuid, rating: i32) -> Result<()> {
        let mut state = self.write()?;
        if let Some(applicant) = state.applicants.iter_mut().find(|a| a.id == id) {
            applicant.rating = Some(rating);
            applicant.updated_at = Some(now());
        }
        Ok(())
    }

    async fn list_jobs(&self) -> Result<Vec<JobWithCounts>> {
        let state = self.read()?;
        let today = today();
        let mut jobs: Vec<JobWithCounts> = state
            .jobs
            .iter()
            .map(|job| JobWithCounts {
                total_applications: state
                    .applications
                    .iter()
                    .filter(|a| a.job_id == job.id)
                    .count() as i64,
                is_deadline_passed: job.is_deadline_passed(today),
                job: job.clone(),
            })
            .collect();
        jobs.sort_by(|a, b| b.job.created_at.cmp(&a.job.created_at));
        Ok(jobs)
    }

    async fn create_job(&self, job: NewJob) -> Result<Job> {
        let created_at = now();
        let row = Job {
            id: Uuid::new_v4(),
            title: job.title,
            description: job.description,
            location: job.location,
            job_type: job.job_type,
            salary_range: job.salary_range,
            status: job.status,
            deadline: job.deadline,
            image_url: job.image_url,
            max_applicants: job.max_applicants,
            created_at: Some(created_at),
            updated_at: Some(created_at),
        };
        self.write()?.jobs.push(row.clone());
        Ok(row)
    }

    async fn update_job(&self, id: Uuid, patch: JobPatch) -> Result<Job> {
        let mut state = self.write()?;
        let job = state
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", id)))?;
        if let Some(title) = patch.title {
            job.title = title;
        }
        if let Some(description) = patch.description {
            job.description = description;
        }
        if let Some(location) = patch.location {
            job.location = location;
        }
        if let Some(job_type) = patch.job_type {
            job.job_type = job_type;
        }
        if let Some(salary_range) = patch.salary_range {
            job.salary_range = salary_range;
        }
        if let Some(status) = patch.status {
            job.status = status;
        }
        if let Some(deadline) = patch.deadline {
            job.deadline = deadline;
        }
        if let Some(image_url) = patch.image_url {
            job.image_url = image_url;
        }
        if patch.max_applicants.is_some() {
            job.max_applicants = patch.max_applicants;
        }
        job.updated_at = Some(now());
        Ok(job.clone())
    }

    async fn delete_job(&self, id: Uuid) -> Result<()> {
        let mut state = self.write()?;
        state.jobs.retain(|j| j.id != id);
        state.applications.retain(|a| a.job_id != id);
        Ok(())
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let state = self.read()?;
        let now = now();
        let day_start = start_of_day(now);
        let week_start = days_before(now, 7);
        let month_start = days_before(now, 30);
        let count_status = |status: ApplicationStatus| {
            state
                .applications
                .iter()
                .filter(|a| a.status == status.as_str())
                .count() as i64
        };
        let count_since = |since: DateTime<Utc>| {
            state
                .applications
                .iter()
                .filter(|a| a.applied_at >= since)
                .count() as i64
        };

        Ok(DashboardStats {
            total_jobs: state.jobs.len() as i64,
            open_jobs: state.jobs.iter().filter(|j| j.status == JobStatus::Open).count() as i64,
            closed_jobs: state
                .jobs
                .iter()
                .filter(|j| j.status == JobStatus::Closed)
                .count() as i64,
            total_applicants: state.applicants.len() as i64,
            total_applications: state.applications.len() as i64,
            pending_applications: count_status(ApplicationStatus::Pending),
            reviewing_applications: count_status(ApplicationStatus::Reviewing),
            shortlisted_applications: count_status(ApplicationStatus::Shortlisted),
            offered_applications: count_status(ApplicationStatus::Offered),
            accepted_applications: count_status(ApplicationStatus::Accepted),
            rejected_applications: count_status(ApplicationStatus::Rejected),
            applications_today: count_since(day_start),
            applications_this_week: count_since(week_start),
            applications_this_month: count_since(month_start),
        })
    }

    async fn recent_applications(&self, limit: u32) -> Result<Vec<RecentApplication>> {
        let state = self.read()?;
        Ok(state
            .applications_newest_first()
            .into_iter()
            .take(limit as usize)
            .map(|a| {
                let row = state.embed(a);
                let applicant = row.applicant.as_ref();
                RecentApplication {
                    application_id: row.id,
                    applicant_id: row.applicant_id,
                    applicant_name: applicant
                        .map(|p| p.display_name())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    applicant_email: applicant.map(|p| p.email.clone()),
                    applicant_avatar_url: applicant.and_then(|p| p.avatar_url.clone()),
                    job_id: row.job_id,
                    job_title: row
                        .job
                        .as_ref()
                        .map(|j| j.title.clone())
                        .unwrap_or_default(),
                    status: row.status.clone(),
                    applied_at: row.applied_at,
                }
            })
            .collect())
    }

    async fn upload_file(
        &self,
        bucket: String,
        path: String,
        _content_type: String,
        body: Bytes,
    ) -> Result<String> {
        let url = format!("memory://{}/{}", bucket, path);
        self.write()?.files.insert(url.clone(), body);
        Ok(url)
    }

    async fn check_role(&self, user_id: Uuid, role: AppRole) -> Result<bool> {
        Ok(self
            .read()?
            .roles
            .get(&user_id)
            .map_or(false, |roles| roles.contains(&role)))
    }

    async fn create_user(&self, user: NewUser) -> Result<CreatedUser> {
        let mut state = self.write()?;
        if state.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(Error::Backend {
                status: 422,
                message: "A user with this email address has already been registered".to_string(),
            });
        }
        let created = CreatedUser {
            id: Uuid::new_v4(),
            email: user.email,
        };
        state.users.push(created.clone());
        state.roles.entry(created.id).or_default().insert(user.role);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobType;
    use chrono::Duration;

    fn job() -> Job {
        Job {
            id: Uuid::new_v4(),
            title: "Accountant".to_string(),
            description: None,
            location: "Alger".to_string(),
            job_type: JobType::FullTime,
            salary_range: None,
            status: JobStatus::Open,
            deadline: None,
            image_url: None,
            max_applicants: None,
            created_at: Some(now()),
            updated_at: None,
        }
    }

    fn application(job_id: Uuid, status: &str, applied_days_ago: i64) -> Application {
        Application {
            id: Uuid::new_v4(),
            job_id,
            applicant_id: Uuid::new_v4(),
            status: status.to_string(),
            cv_url: None,
            cover_letter: None,
            applied_at: now() - Duration::days(applied_days_ago),
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

    #[tokio::test]
    async fn stats_count_statuses_and_windows() {
        let backend = InMemoryBackend::new();
        let j = job();
        backend.insert_job(j.clone()).unwrap();
        backend.insert_application(application(j.id, "pending", 0)).unwrap();
        backend.insert_application(application(j.id, "pending", 3)).unwrap();
        backend.insert_application(application(j.id, "rejected", 20)).unwrap();
        backend.insert_application(application(j.id, "accepted", 90)).unwrap();

        let stats = backend.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_jobs, 1);
        assert_eq!(stats.open_jobs, 1);
        assert_eq!(stats.total_applications, 4);
        assert_eq!(stats.pending_applications, 2);
        assert_eq!(stats.rejected_applications, 1);
        assert_eq!(stats.accepted_applications, 1);
        assert_eq!(stats.applications_this_week, 2);
        assert_eq!(stats.applications_this_month, 3);
    }

    #[tokio::test]
    async fn deleting_a_job_removes_its_applications() {
        let backend = InMemoryBackend::new();
        let keep = job();
        let drop = job();
        backend.insert_job(keep.clone()).unwrap();
        backend.insert_job(drop.clone()).unwrap();
        backend.insert_application(application(keep.id, "pending", 1)).unwrap();
        backend.insert_application(application(drop.id, "pending", 1)).unwrap();

        backend.delete_job(drop.id).await.unwrap();
        let remaining = backend.list_applications().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].job_id, keep.id);
        assert_eq!(remaining[0].job.as_ref().map(|j| j.title.as_str()), Some("Accountant"));
        assert_eq!(backend.list_jobs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn interview_schedule_is_sorted_and_skips_unscheduled() {
        let backend = InMemoryBackend::new();
        let j = job();
        let mut later = application(j.id, "shortlisted", 1);
        later.interview_date = Some(now() + Duration::days(5));
        let mut sooner = application(j.id, "shortlisted", 1);
        sooner.interview_date = Some(now() + Duration::days(1));
        let (later_id, sooner_id) = (later.id, sooner.id);
        backend.insert_job(j.clone()).unwrap();
        backend.insert_application(later).unwrap();
        backend.insert_application(sooner).unwrap();
        backend.insert_application(application(j.id, "pending", 1)).unwrap();

        let slots = backend.list_interview_schedule().await.unwrap();
        let ids: Vec<Uuid> = slots.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![sooner_id, later_id]);
    }

    #[tokio::test]
    async fn duplicate_user_email_is_rejected() {
        let backend = InMemoryBackend::new();
        let user = NewUser {
            email: "hr@example.com".to_string(),
            password: "password123".to_string(),
            full_name: None,
            role: AppRole::Admin,
        };
        let created = backend.create_user(user.clone()).await.unwrap();
        assert!(backend.check_role(created.id, AppRole::Admin).await.unwrap());
        assert!(!backend.check_role(created.id, AppRole::User).await.unwrap());
        assert!(matches!(
            backend.create_user(user).await,
            Err(Error::Backend { status: 422, .. })
        ));
    }
}
