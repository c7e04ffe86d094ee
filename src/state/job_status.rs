/// Job status definitions for tracking crawl lifecycle
///
/// This module defines the states a crawl job moves through and which
/// transitions between them are legal.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the current lifecycle state of a crawl job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    // ===== Active States =====
    /// Job has been accepted but its task has not started
    Initializing,

    /// Task is draining the frontier
    Crawling,

    // ===== Terminal States =====
    /// All pages crawled and every artifact written
    Completed,

    /// A fatal fault stopped the job
    Failed,
}

impl JobStatus {
    /// Returns true if this is a terminal state (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the job's task may still change its state
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the transition `self -> next` is allowed
    ///
    /// Transitions are monotonic:
    ///
    /// | From | To |
    /// |------|----|
    /// | Initializing | Crawling, Failed |
    /// | Crawling | Completed, Failed |
    /// | Completed | (none) |
    /// | Failed | (none) |
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Initializing, Self::Crawling)
                | (Self::Initializing, Self::Failed)
                | (Self::Crawling, Self::Completed)
                | (Self::Crawling, Self::Failed)
        )
    }

    /// Converts the status to its wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Crawling => "crawling",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parses a status from its wire representation
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "initializing" => Some(Self::Initializing),
            "crawling" => Some(Self::Crawling),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns all possible job states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Initializing,
            Self::Crawling,
            Self::Completed,
            Self::Failed,
        ]
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!JobStatus::Initializing.is_terminal());
        assert!(!JobStatus::Crawling.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_forward_transitions() {
        assert!(JobStatus::Initializing.can_transition_to(JobStatus::Crawling));
        assert!(JobStatus::Initializing.can_transition_to(JobStatus::Failed));
        assert!(JobStatus::Crawling.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Crawling.can_transition_to(JobStatus::Failed));
    }

    #[test]
    fn test_no_transition_out_of_terminal_states() {
        for terminal in [JobStatus::Completed, JobStatus::Failed] {
            for next in JobStatus::all_states() {
                assert!(
                    !terminal.can_transition_to(next),
                    "{terminal} -> {next} must be rejected"
                );
            }
        }
    }

    #[test]
    fn test_no_backward_or_self_transitions() {
        assert!(!JobStatus::Crawling.can_transition_to(JobStatus::Initializing));
        assert!(!JobStatus::Crawling.can_transition_to(JobStatus::Crawling));
        assert!(!JobStatus::Initializing.can_transition_to(JobStatus::Completed));
    }

    #[test]
    fn test_round_trip_strings() {
        for status in JobStatus::all_states() {
            assert_eq!(JobStatus::from_str_opt(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::from_str_opt("paused"), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&JobStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
