//! In-memory narrowing of fetched lists.
//!
//! Every criterion is optional and the supplied ones are AND-ed. Filtering is
//! stable and never mutates its input.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::applicant::ApplicantSummary;
use crate::models::application::Application;

pub const ALL_STATUSES: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCriteria {
    pub status_tab: Option<String>,
    pub search_text: Option<String>,
    pub job_id: Option<Uuid>,
    pub gender: Option<String>,
    pub wilaya: Option<String>,
    pub min_rating: Option<i32>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl ApplicationCriteria {
    pub fn is_empty(&self) -> bool {
        self.status().is_none()
            && self.search().is_none()
            && self.job_id.is_none()
            && non_blank(&self.gender).is_none()
            && non_blank(&self.wilaya).is_none()
            && positive(self.min_rating).is_none()
            && positive(self.min_age).is_none()
            && positive(self.max_age).is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    fn status(&self) -> Option<&str> {
        non_blank(&self.status_tab).filter(|s| *s != ALL_STATUSES)
    }

    fn search(&self) -> Option<String> {
        non_blank(&self.search_text).map(str::to_lowercase)
    }

    pub fn matches(&self, application: &Application) -> bool {
        let applicant = application.applicant.as_ref();

        if let Some(status) = self.status() {
            if application.status != status {
                return false;
            }
        }

        if let Some(needle) = self.search() {
            let name = applicant
                .map(|a| a.display_name())
                .unwrap_or_else(|| "Unknown".to_string());
            let email = applicant.map(|a| a.email.as_str());
            let title = application.job.as_ref().map(|j| j.title.as_str());
            let hit = contains_folded(&name, &needle)
                || email.map_or(false, |e| contains_folded(e, &needle))
                || title.map_or(false, |t| contains_folded(t, &needle));
            if !hit {
                return false;
            }
        }

        if let Some(job_id) = self.job_id {
            let actual = application.job.as_ref().map(|j| j.id).unwrap_or(application.job_id);
            if actual != job_id {
                return false;
            }
        }

        if let Some(gender) = non_blank(&self.gender) {
            if applicant.and_then(|a| a.gender.as_deref()) != Some(gender) {
                return false;
            }
        }

        if let Some(wilaya) = non_blank(&self.wilaya) {
            if applicant.and_then(|a| a.wilaya.as_deref()) != Some(wilaya) {
                return false;
            }
        }

        let rating = applicant.and_then(|a| a.rating);
        let age = applicant.and_then(|a| a.age);
        if !within_bounds(rating, positive(self.min_rating), None) {
            return false;
        }
        if !within_bounds(age, positive(self.min_age), positive(self.max_age)) {
            return false;
        }

        if let Some(from) = self.date_from {
            if application.applied_at < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if application.applied_at > to {
                return false;
            }
        }

        true
    }
}

pub fn filter_applications(
    applications: &[Application],
    criteria: &ApplicationCriteria,
) -> Vec<Application> {
    if criteria.is_empty() {
        return applications.to_vec();
    }
    applications
        .iter()
        .filter(|application| criteria.matches(application))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantCriteria {
    pub search_text: Option<String>,
    pub gender: Option<String>,
    pub wilaya: Option<String>,
    pub min_rating: Option<i32>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

impl ApplicantCriteria {
    pub fn matches(&self, applicant: &ApplicantSummary) -> bool {
        if let Some(needle) = non_blank(&self.search_text).map(str::to_lowercase) {
            let hit = contains_folded(&applicant.display_name(), &needle)
                || contains_folded(&applicant.email, &needle);
            if !hit {
                return false;
            }
        }
        if let Some(gender) = non_blank(&self.gender) {
            if applicant.gender.as_deref() != Some(gender) {
                return false;
            }
        }
        if let Some(wilaya) = non_blank(&self.wilaya) {
            if applicant.wilaya.as_deref() != Some(wilaya) {
                return false;
            }
        }
        within_bounds(applicant.rating, positive(self.min_rating), None)
            && within_bounds(applicant.age, positive(self.min_age), positive(self.max_age))
    }
}

pub fn filter_applicants(
    applicants: &[ApplicantSummary],
    criteria: &ApplicantCriteria,
) -> Vec<ApplicantSummary> {
    applicants
        .iter()
        .filter(|applicant| criteria.matches(applicant))
        .cloned()
        .collect()
}

/// Sorted, de-duplicated regions of the applicants in `applications`.
pub fn distinct_wilayas(applications: &[Application]) -> Vec<String> {
    applications
        .iter()
        .filter_map(|a| a.applicant.as_ref()?.wilaya.clone())
        .filter(|w| !w.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// The dashboard sends `0` for "no bound".
fn positive(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v > 0)
}

fn contains_folded(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

/// Inclusive bounds; a missing value fails as soon as any bound is set.
fn within_bounds(value: Option<i32>, min: Option<i32>, max: Option<i32>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
}
