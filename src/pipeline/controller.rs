//! Drives one application through the hiring pipeline.
//!
//! The controller tracks two stages: the one the record is actually in
//! (derived from its status) and the one whose panel is being viewed. Every
//! action results in a single field update against the backend followed by
//! invalidation of the cached views that show the application.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::stage::{stage_to_status, status_to_stage, RecruitmentStage};
use crate::backend::Backend;
use crate::cache::{QueryCache, QueryKey, QueryScope};
use crate::error::{Error, Result};
use crate::models::application::{
    Application, ApplicationPatch, ApplicationStatus, FinalDecision, OfferStatus,
};

pub const MIN_TECHNICAL_SCORE: i32 = 1;
pub const MAX_TECHNICAL_SCORE: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimelineStep {
    pub stage: RecruitmentStage,
    pub label: String,
    pub description: String,
    pub completed: bool,
    pub current: bool,
    pub clickable: bool,
    pub active: bool,
}

/// Cache keys touched by any write to application `id`.
pub fn application_write_keys(id: impl std::fmt::Display) -> Vec<QueryKey> {
    vec![
        QueryKey::with_params(QueryScope::ApplicationDetail, id),
        QueryKey::scope(QueryScope::Applications),
        QueryKey::scope(QueryScope::InterviewSchedule),
        QueryKey::scope(QueryScope::DashboardStats),
        QueryKey::scope(QueryScope::RecentApplications),
    ]
}

pub struct PipelineController {
    application: Application,
    active: RecruitmentStage,
    backend: Arc<dyn Backend>,
    cache: QueryCache,
}

impl PipelineController {
    pub fn new(application: Application, backend: Arc<dyn Backend>, cache: QueryCache) -> Self {
        let active = status_to_stage(&application.status);
        Self {
            application,
            active,
            backend,
            cache,
        }
    }

    pub fn application(&self) -> &Application {
        &self.application
    }

    pub fn into_application(self) -> Application {
        self.application
    }

    pub fn current_stage(&self) -> RecruitmentStage {
        status_to_stage(&self.application.status)
    }

    pub fn active_stage(&self) -> RecruitmentStage {
        self.active
    }

    /// Switches the viewed panel. Stages the record has not reached yet are
    /// not viewable.
    pub fn select_stage(&mut self, stage: RecruitmentStage) -> Result<()> {
        let current = self.current_stage();
        if stage.index() > current.index() {
            return Err(Error::BadRequest(format!(
                "Stage '{}' has not been reached yet (current stage is '{}')",
                stage, current
            )));
        }
        self.active = stage;
        Ok(())
    }

    pub fn final_decision(&self) -> Option<FinalDecision> {
        self.application.final_decision()
    }

    pub fn is_frozen(&self) -> bool {
        self.final_decision().is_some()
    }

    pub fn timeline(&self) -> Vec<TimelineStep> {
        let current = self.current_stage();
        let decided = self.is_frozen();
        RecruitmentStage::ALL
            .into_iter()
            .map(|stage| TimelineStep {
                stage,
                label: stage.label().to_string(),
                description: stage.description().to_string(),
                completed: stage.index() < current.index() || (decided && stage == current),
                current: stage == current,
                clickable: stage.index() <= current.index(),
                active: stage == self.active,
            })
            .collect()
    }

    /// Writes `notes` into the column owned by `stage`. Returns `false`
    /// without touching the backend when the stage keeps no notes.
    pub async fn save_notes(&mut self, stage: RecruitmentStage, notes: String) -> Result<bool> {
        self.ensure_open()?;
        let mut patch = ApplicationPatch::default();
        if !patch.set_stage_notes(stage, notes) {
            return Ok(false);
        }
        self.commit(patch).await?;
        Ok(true)
    }

    /// Moves the application one stage forward. The offer stage is left only
    /// through `hire` or `reject`.
    pub async fn advance(
        &mut self,
        notes: Option<String>,
        interview_date: Option<DateTime<Utc>>,
    ) -> Result<RecruitmentStage> {
        self.ensure_open()?;
        let current = self.current_stage();
        let next = match current.next() {
            Some(RecruitmentStage::Decision) | None => {
                return Err(Error::BadRequest(
                    "An offer must be closed with a hire or reject decision".to_string(),
                ))
            }
            Some(next) => next,
        };

        let mut patch = ApplicationPatch::status(stage_to_status(next));
        if let Some(notes) = notes {
            patch.set_stage_notes(current, notes);
        }
        patch.interview_date = interview_date;
        self.commit(patch).await?;

        tracing::info!(
            application_id = %self.application.id,
            from = %current,
            to = %next,
            "application advanced"
        );
        Ok(next)
    }

    pub async fn reject(&mut self, notes: Option<String>) -> Result<()> {
        self.ensure_open()?;
        let current = self.current_stage();
        let mut patch = ApplicationPatch::status(ApplicationStatus::Rejected);
        if let Some(notes) = notes {
            if !patch.set_stage_notes(current, notes.clone()) {
                patch.final_notes = Some(notes);
            }
        }
        self.commit(patch).await?;
        tracing::info!(application_id = %self.application.id, at = %current, "application rejected");
        Ok(())
    }

    pub async fn hire(&mut self, notes: Option<String>) -> Result<()> {
        self.ensure_open()?;
        let current = self.current_stage();
        if current != RecruitmentStage::Offer {
            return Err(Error::BadRequest(format!(
                "Only applications at the offer stage can be hired (current stage is '{}')",
                current
            )));
        }
        let mut patch = ApplicationPatch::status(ApplicationStatus::Accepted);
        patch.final_notes = notes;
        self.commit(patch).await?;
        tracing::info!(application_id = %self.application.id, "application hired");
        Ok(())
    }

    pub async fn record_interview_date(&mut self, date: DateTime<Utc>) -> Result<()> {
        self.ensure_open()?;
        self.commit(ApplicationPatch {
            interview_date: Some(date),
            ..Default::default()
        })
        .await
    }

    pub async fn record_technical_score(&mut self, score: i32) -> Result<()> {
        self.ensure_open()?;
        if !(MIN_TECHNICAL_SCORE..=MAX_TECHNICAL_SCORE).contains(&score) {
            return Err(Error::BadRequest(format!(
                "Technical score must be between {} and {}",
                MIN_TECHNICAL_SCORE, MAX_TECHNICAL_SCORE
            )));
        }
        self.commit(ApplicationPatch {
            technical_score: Some(score),
            ..Default::default()
        })
        .await
    }

    pub async fn record_proposed_salary(&mut self, salary: String) -> Result<()> {
        self.ensure_open()?;
        self.commit(ApplicationPatch {
            proposed_salary: Some(salary),
            ..Default::default()
        })
        .await
    }

    pub async fn record_offer_status(&mut self, status: OfferStatus) -> Result<()> {
        self.ensure_open()?;
        self.commit(ApplicationPatch {
            offer_status: Some(status),
            ..Default::default()
        })
        .await
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_frozen() {
            return Err(Error::BadRequest(
                "A final decision has already been made for this application".to_string(),
            ));
        }
        Ok(())
    }

    async fn commit(&mut self, patch: ApplicationPatch) -> Result<()> {
        let id = self.application.id;
        self.backend
            .update_application_fields(id, patch.clone())
            .await?;
        self.cache.invalidate(&application_write_keys(id));

        patch.apply_to(&mut self.application);
        // The viewed panel follows the record when its stage moves.
        if patch.status.is_some() {
            self.active = self.current_stage();
        }
        Ok(())
    }
}
