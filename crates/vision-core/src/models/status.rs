//! Status and category enumerations for submissions.

use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle status of a vision submission.
///
/// Statuses are totally ordered: `started` < `step-1-in-progress` <
/// `step-2-in-progress` < ... < `completed`. The store only accepts writes
/// that move a submission forward in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubmissionStatus {
    /// Created by the sign-up form, nothing else has happened yet
    #[default]
    Started,

    /// The user has reached builder step N
    StepInProgress(u32),

    /// Vision narrative and action plan have been generated and saved
    Completed,
}

impl SubmissionStatus {
    /// Position of the status in the lifecycle order.
    pub fn rank(&self) -> u64 {
        match self {
            SubmissionStatus::Started => 0,
            SubmissionStatus::StepInProgress(step) => u64::from(*step) + 1,
            SubmissionStatus::Completed => u64::MAX,
        }
    }

    /// Whether the submission has reached its terminal state.
    pub fn is_completed(&self) -> bool {
        matches!(self, SubmissionStatus::Completed)
    }

    /// Convert to database string representation
    pub fn as_db_string(&self) -> String {
        match self {
            SubmissionStatus::Started => "started".to_string(),
            SubmissionStatus::StepInProgress(step) => format!("step-{step}-in-progress"),
            SubmissionStatus::Completed => "completed".to_string(),
        }
    }
}

impl PartialOrd for SubmissionStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SubmissionStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "started" => Ok(SubmissionStatus::Started),
            "completed" => Ok(SubmissionStatus::Completed),
            other => other
                .strip_prefix("step-")
                .and_then(|rest| rest.strip_suffix("-in-progress"))
                .and_then(|step| step.parse::<u32>().ok())
                .map(SubmissionStatus::StepInProgress)
                .ok_or_else(|| format!("Invalid submission status: {s}")),
        }
    }
}

impl Serialize for SubmissionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_db_string())
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Area of life a vision is scoped to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AreaOfLife {
    HealthFitness,
    CareerBusiness,
    FinancesWealth,
    RelationshipsLove,
    FamilyFriends,
    PersonalGrowth,
    FunRecreation,
    SpiritualityPurpose,
}

impl AreaOfLife {
    /// All known areas, in the order the sign-up form offers them.
    pub const ALL: [AreaOfLife; 8] = [
        AreaOfLife::HealthFitness,
        AreaOfLife::CareerBusiness,
        AreaOfLife::FinancesWealth,
        AreaOfLife::RelationshipsLove,
        AreaOfLife::FamilyFriends,
        AreaOfLife::PersonalGrowth,
        AreaOfLife::FunRecreation,
        AreaOfLife::SpiritualityPurpose,
    ];

    /// Stable key used in storage and on the wire.
    pub fn key(&self) -> &'static str {
        match self {
            AreaOfLife::HealthFitness => "health-fitness",
            AreaOfLife::CareerBusiness => "career-business",
            AreaOfLife::FinancesWealth => "finances-wealth",
            AreaOfLife::RelationshipsLove => "relationships-love",
            AreaOfLife::FamilyFriends => "family-friends",
            AreaOfLife::PersonalGrowth => "personal-growth",
            AreaOfLife::FunRecreation => "fun-recreation",
            AreaOfLife::SpiritualityPurpose => "spirituality-purpose",
        }
    }

    /// Human readable label used in prompts and emails.
    pub fn label(&self) -> &'static str {
        match self {
            AreaOfLife::HealthFitness => "Health & Fitness",
            AreaOfLife::CareerBusiness => "Career & Business",
            AreaOfLife::FinancesWealth => "Finances & Wealth",
            AreaOfLife::RelationshipsLove => "Relationships & Love",
            AreaOfLife::FamilyFriends => "Family & Friends",
            AreaOfLife::PersonalGrowth => "Personal Growth",
            AreaOfLife::FunRecreation => "Fun & Recreation",
            AreaOfLife::SpiritualityPurpose => "Spirituality & Purpose",
        }
    }
}

impl FromStr for AreaOfLife {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        AreaOfLife::ALL
            .into_iter()
            .find(|area| area.key() == key)
            .ok_or_else(|| format!("Invalid area of life: {s}"))
    }
}
