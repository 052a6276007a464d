use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::lenient::{deserialize_lenient_list, deserialize_text_flexible};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "deserialize_text_flexible")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text_flexible")]
    pub school: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text_flexible")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "deserialize_text_flexible")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text_flexible")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text_flexible")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Applicant {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub wilaya: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_lenient_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_list")]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "deserialize_lenient_list")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub cv_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Applicant {
    pub fn display_name(&self) -> String {
        display_name(
            self.full_name.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
        )
    }

    pub fn initials(&self) -> String {
        initials(&self.display_name())
    }

    /// Stored avatar, or the generated placeholder for this applicant.
    pub fn resolved_avatar(&self) -> String {
        self.avatar_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| fallback_avatar(self.gender.as_deref(), &self.id.to_string()))
    }

    /// Latest education entry rendered as one line.
    pub fn education_summary(&self) -> String {
        let Some(latest) = self.education.first() else {
            return "Not specified".to_string();
        };
        let mut parts = Vec::new();
        if let Some(degree) = latest.degree.as_deref().filter(|s| !s.trim().is_empty()) {
            parts.push(degree.trim().to_string());
        }
        if let Some(school) = latest.school.as_deref().filter(|s| !s.trim().is_empty()) {
            parts.push(format!("at {}", school.trim()));
        }
        if let Some(year) = latest.year.as_deref().filter(|s| !s.trim().is_empty()) {
            parts.push(format!("({})", year.trim()));
        }
        if parts.is_empty() {
            "Not specified".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// Row returned by the filtered applicant search.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicantSummary {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub wilaya: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_list")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub total_applications: i64,
}

impl ApplicantSummary {
    pub fn display_name(&self) -> String {
        display_name(self.full_name.as_deref(), None, None)
    }
}

/// Slim applicant projection embedded in interview listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicantRef {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wilaya: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<ExperienceEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_url: Option<String>,
}

impl ApplicantPatch {
    pub fn is_empty(&self) -> bool {
        *self == ApplicantPatch::default()
    }
}

/// Search arguments forwarded to the backend's filtered applicant search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantSearch {
    pub search_term: Option<String>,
    pub gender: Option<String>,
    pub wilaya: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub min_rating: Option<i32>,
}

/// Full name first, then first + last, then "Unknown".
pub fn display_name(full: Option<&str>, first: Option<&str>, last: Option<&str>) -> String {
    let full = full.unwrap_or_default().trim();
    if !full.is_empty() {
        return full.to_string();
    }
    let combined = format!(
        "{} {}",
        first.unwrap_or_default().trim(),
        last.unwrap_or_default().trim()
    );
    let combined = combined.trim();
    if !combined.is_empty() {
        return combined.to_string();
    }
    "Unknown".to_string()
}

pub fn initials(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|part| part.chars().next())
        .collect();
    if initials.is_empty() {
        "??".to_string()
    } else {
        initials.to_uppercase()
    }
}

/// Deterministic placeholder picked from eight avatars per gender folder.
pub fn fallback_avatar(gender: Option<&str>, id: &str) -> String {
    let hash: u32 = id.chars().map(|c| c as u32).sum();
    let number = hash % 8 + 1;
    let folder = if gender == Some("female") { "woman" } else { "man" };
    format!("/avatars/{}/{}.svg", folder, number)
}
