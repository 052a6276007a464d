use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::applicant::{
    Applicant, ApplicantPatch, ApplicantSearch, EducationEntry, ExperienceEntry,
};
use crate::utils::validation::{clean_skills, non_blank, split_skills};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicantListQuery {
    pub search: Option<String>,
    pub gender: Option<String>,
    pub wilaya: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub min_rating: Option<i32>,
}

impl From<ApplicantListQuery> for ApplicantSearch {
    fn from(q: ApplicantListQuery) -> Self {
        let bound = |v: Option<i32>| v.filter(|n| *n > 0);
        Self {
            search_term: non_blank(q.search),
            gender: non_blank(q.gender),
            wilaya: non_blank(q.wilaya),
            min_age: bound(q.min_age),
            max_age: bound(q.max_age),
            min_rating: bound(q.min_rating),
        }
    }
}

/// Applicant profile with the derived display fields the dashboard shows.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApplicantResponse {
    #[serde(flatten)]
    pub applicant: Applicant,
    pub display_name: String,
    pub initials: String,
    pub avatar: String,
    pub education_summary: String,
}

impl From<Applicant> for ApplicantResponse {
    fn from(applicant: Applicant) -> Self {
        Self {
            display_name: applicant.display_name(),
            initials: applicant.initials(),
            avatar: applicant.resolved_avatar(),
            education_summary: applicant.education_summary(),
            applicant,
        }
    }
}

/// Skills arrive either as a list or as comma-separated text.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Text(String),
}

impl SkillsInput {
    pub fn into_list(self) -> Vec<String> {
        match self {
            SkillsInput::List(items) => clean_skills(items),
            SkillsInput::Text(text) => split_skills(&text),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateApplicantPayload {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub wilaya: Option<String>,
    #[validate(range(min = 14, max = 100))]
    pub age: Option<i32>,
    pub skills: Option<SkillsInput>,
    pub education: Option<Vec<EducationEntry>>,
    pub experience: Option<Vec<ExperienceEntry>>,
}

impl From<UpdateApplicantPayload> for ApplicantPatch {
    fn from(p: UpdateApplicantPayload) -> Self {
        Self {
            full_name: non_blank(p.full_name),
            email: non_blank(p.email),
            phone: non_blank(p.phone),
            address: non_blank(p.address),
            gender: non_blank(p.gender),
            wilaya: non_blank(p.wilaya),
            age: p.age,
            skills: p.skills.map(SkillsInput::into_list),
            education: p.education,
            experience: p.experience,
            avatar_url: None,
            cv_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RatingPayload {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn skills_accept_list_or_text() {
        let payload: UpdateApplicantPayload =
            serde_json::from_value(json!({ "skills": "rust,  sql, " })).unwrap();
        let patch = ApplicantPatch::from(payload);
        assert_eq!(patch.skills, Some(vec!["rust".to_string(), "sql".to_string()]));

        let payload: UpdateApplicantPayload =
            serde_json::from_value(json!({ "skills": [" excel ", ""] })).unwrap();
        assert_eq!(
            ApplicantPatch::from(payload).skills,
            Some(vec!["excel".to_string()])
        );
    }

    #[test]
    fn zero_bounds_are_dropped_from_search() {
        let search = ApplicantSearch::from(ApplicantListQuery {
            search: Some("  ".to_string()),
            min_age: Some(0),
            max_age: Some(30),
            ..Default::default()
        });
        assert_eq!(search.search_term, None);
        assert_eq!(search.min_age, None);
        assert_eq!(search.max_age, Some(30));
    }

    #[test]
    fn rating_outside_one_to_five_is_invalid() {
        assert!(RatingPayload { rating: 6 }.validate().is_err());
        assert!(RatingPayload { rating: 0 }.validate().is_err());
        assert!(RatingPayload { rating: 5 }.validate().is_ok());
    }
}
