//! Stage identifiers and status.

use crate::errors::PromptBuildError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one of the fixed content-generation stages.
///
/// Variants are declared in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageId {
    /// Builds the content calendar and strategy.
    Planning,
    /// Generates concrete content ideas from the plan.
    Brainstorming,
    /// Writes production-ready copy for the best ideas.
    Creative,
    /// Surveys competitors in the niche.
    #[serde(alias = "competitor")]
    CompetitorAnalysis,
    /// Scores and critiques the content.
    Evaluation,
    /// Lays out the publishing timeline.
    Scheduling,
}

impl StageId {
    /// Every stage, in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::Planning,
        Self::Brainstorming,
        Self::Creative,
        Self::CompetitorAnalysis,
        Self::Evaluation,
        Self::Scheduling,
    ];

    /// Returns the canonical identifier string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Brainstorming => "brainstorming",
            Self::Creative => "creative",
            Self::CompetitorAnalysis => "competitor-analysis",
            Self::Evaluation => "evaluation",
            Self::Scheduling => "scheduling",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageId {
    type Err = PromptBuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(Self::Planning),
            "brainstorming" => Ok(Self::Brainstorming),
            "creative" => Ok(Self::Creative),
            "competitor-analysis" | "competitor" => Ok(Self::CompetitorAnalysis),
            "evaluation" => Ok(Self::Evaluation),
            "scheduling" => Ok(Self::Scheduling),
            other => Err(PromptBuildError::unknown_stage(other)),
        }
    }
}

/// The execution status of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage has not run since the last reset.
    #[default]
    Pending,
    /// Stage is currently running.
    Running,
    /// Stage produced output.
    Completed,
    /// Stage failed; its output holds the error text.
    Failed,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl StageStatus {
    /// Returns true if the status represents a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the status indicates success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if the status indicates failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_id_round_trips_through_str() {
        for id in StageId::ALL {
            assert_eq!(id.as_str().parse::<StageId>().unwrap(), id);
        }
    }

    #[test]
    fn test_competitor_alias() {
        assert_eq!("competitor".parse::<StageId>().unwrap(), StageId::CompetitorAnalysis);

        let parsed: StageId = serde_json::from_str(r#""competitor""#).unwrap();
        assert_eq!(parsed, StageId::CompetitorAnalysis);
    }

    #[test]
    fn test_unknown_stage_id_is_rejected() {
        let err = "publishing".parse::<StageId>().unwrap_err();
        assert_eq!(err, PromptBuildError::unknown_stage("publishing"));
    }

    #[test]
    fn test_stage_id_serialize() {
        let json = serde_json::to_string(&StageId::CompetitorAnalysis).unwrap();
        assert_eq!(json, r#""competitor-analysis""#);
    }

    #[test]
    fn test_stage_status_display() {
        assert_eq!(StageStatus::Pending.to_string(), "pending");
        assert_eq!(StageStatus::Running.to_string(), "running");
        assert_eq!(StageStatus::Completed.to_string(), "completed");
        assert_eq!(StageStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_stage_status_is_terminal() {
        assert!(StageStatus::Completed.is_terminal());
        assert!(StageStatus::Failed.is_terminal());
        assert!(!StageStatus::Pending.is_terminal());
        assert!(!StageStatus::Running.is_terminal());
    }

    #[test]
    fn test_stage_status_serialize() {
        let json = serde_json::to_string(&StageStatus::Completed).unwrap();
        assert_eq!(json, r#""completed""#);

        let deserialized: StageStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, StageStatus::Completed);
    }
}
