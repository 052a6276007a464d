//! Translation between the persisted application status and the five-stage
//! hiring pipeline shown on the dashboard.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::application::ApplicationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecruitmentStage {
    Applied,
    TestStage,
    Interview,
    Offer,
    Decision,
}

impl RecruitmentStage {
    pub const ALL: [RecruitmentStage; 5] = [
        RecruitmentStage::Applied,
        RecruitmentStage::TestStage,
        RecruitmentStage::Interview,
        RecruitmentStage::Offer,
        RecruitmentStage::Decision,
    ];

    pub fn index(&self) -> usize {
        match self {
            RecruitmentStage::Applied => 0,
            RecruitmentStage::TestStage => 1,
            RecruitmentStage::Interview => 2,
            RecruitmentStage::Offer => 3,
            RecruitmentStage::Decision => 4,
        }
    }

    pub fn next(&self) -> Option<RecruitmentStage> {
        RecruitmentStage::ALL.get(self.index() + 1).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecruitmentStage::Applied => "applied",
            RecruitmentStage::TestStage => "test_stage",
            RecruitmentStage::Interview => "interview",
            RecruitmentStage::Offer => "offer",
            RecruitmentStage::Decision => "decision",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecruitmentStage::Applied => "Applied",
            RecruitmentStage::TestStage => "Test Stage",
            RecruitmentStage::Interview => "Interview",
            RecruitmentStage::Offer => "Offer",
            RecruitmentStage::Decision => "Decision",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RecruitmentStage::Applied => "Initial application received",
            RecruitmentStage::TestStage => "Technical assessment and evaluation",
            RecruitmentStage::Interview => "Interview scheduling and feedback",
            RecruitmentStage::Offer => "Salary negotiation and offer",
            RecruitmentStage::Decision => "Final hiring decision",
        }
    }
}

impl std::fmt::Display for RecruitmentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecruitmentStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecruitmentStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown recruitment stage '{}'", s))
    }
}

/// Stage an application is in, given its persisted status.
///
/// Total over all strings: anything unrecognised lands on `Applied`.
pub fn status_to_stage(status: &str) -> RecruitmentStage {
    match status {
        "pending" => RecruitmentStage::Applied,
        "reviewing" => RecruitmentStage::TestStage,
        "shortlisted" => RecruitmentStage::Interview,
        "offered" => RecruitmentStage::Offer,
        "accepted" | "rejected" => RecruitmentStage::Decision,
        _ => RecruitmentStage::Applied,
    }
}

/// Status written when an application is moved into `stage`.
///
/// `Decision` maps to `Accepted` only as a default; the hire/reject actions
/// choose the terminal status explicitly.
pub fn stage_to_status(stage: RecruitmentStage) -> ApplicationStatus {
    match stage {
        RecruitmentStage::Applied => ApplicationStatus::Pending,
        RecruitmentStage::TestStage => ApplicationStatus::Reviewing,
        RecruitmentStage::Interview => ApplicationStatus::Shortlisted,
        RecruitmentStage::Offer => ApplicationStatus::Offered,
        RecruitmentStage::Decision => ApplicationStatus::Accepted,
    }
}
