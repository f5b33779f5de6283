//! Case types
//!
//! A [`Case`] is filed from a [`CaseInput`]. Its core facts never change after
//! filing; only [`CaseStatus`] moves forward as the session progresses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::argument::Role;
use crate::error::{CourtError, CourtResult};

/// Opaque case identifier
pub type CaseId = Uuid;

/// A party bound to the plaintiff or defendant role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Handle shown in transcripts
    pub username: String,
    /// Free-form description of the party
    #[serde(default)]
    pub description: String,
}

impl Party {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// Lifecycle status of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Filed, not started
    Pending,
    /// Arguments or judging in progress
    Active,
    /// All judges have evaluated
    Judged,
    /// Verdict rendered
    Resolved,
    /// Verdict under appeal
    Appealed,
}

impl CaseStatus {
    fn successor(self) -> Option<CaseStatus> {
        match self {
            CaseStatus::Pending => Some(CaseStatus::Active),
            CaseStatus::Active => Some(CaseStatus::Judged),
            CaseStatus::Judged => Some(CaseStatus::Resolved),
            CaseStatus::Resolved => Some(CaseStatus::Appealed),
            CaseStatus::Appealed => None,
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseStatus::Pending => "pending",
            CaseStatus::Active => "active",
            CaseStatus::Judged => "judged",
            CaseStatus::Resolved => "resolved",
            CaseStatus::Appealed => "appealed",
        };
        f.write_str(s)
    }
}

/// Everything needed to file a case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseInput {
    /// Dispute category (e.g. "Beef Resolution")
    pub case_type: String,
    pub plaintiff: Party,
    pub defendant: Party,
    /// One-paragraph summary of the dispute
    pub summary: String,
    /// Supporting evidence lines, optional
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl CaseInput {
    pub fn new(case_type: &str, plaintiff: Party, defendant: Party, summary: &str) -> Self {
        Self {
            case_type: case_type.to_string(),
            plaintiff,
            defendant,
            summary: summary.to_string(),
            evidence: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }

    /// Check required fields are populated
    pub fn validate(&self) -> CourtResult<()> {
        let required = [
            ("plaintiff", self.plaintiff.username.as_str()),
            ("defendant", self.defendant.username.as_str()),
            ("type", self.case_type.as_str()),
            ("summary", self.summary.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CourtError::validation(format!("missing case field: {}", field)));
            }
        }

        if self
            .plaintiff
            .username
            .trim()
            .eq_ignore_ascii_case(self.defendant.username.trim())
        {
            return Err(CourtError::validation(
                "plaintiff and defendant must be different parties",
            ));
        }

        Ok(())
    }
}

/// A filed dispute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub case_type: String,
    pub plaintiff: Party,
    pub defendant: Party,
    pub summary: String,
    pub evidence: Vec<String>,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
}

impl Case {
    /// File a new case with a fresh identifier
    pub fn file(input: CaseInput) -> CourtResult<Self> {
        Self::file_with_id(Uuid::new_v4(), input)
    }

    /// File a case under a caller-chosen identifier (replays, tests)
    pub fn file_with_id(id: CaseId, input: CaseInput) -> CourtResult<Self> {
        input.validate()?;
        Ok(Self {
            id,
            case_type: input.case_type,
            plaintiff: input.plaintiff,
            defendant: input.defendant,
            summary: input.summary,
            evidence: input.evidence,
            status: CaseStatus::Pending,
            created_at: Utc::now(),
        })
    }

    /// Party bound to a role
    pub fn party(&self, role: Role) -> &Party {
        match role {
            Role::Plaintiff => &self.plaintiff,
            Role::Defendant => &self.defendant,
        }
    }

    /// Move the status one step forward; skipping or rewinding is rejected
    pub fn advance_status(&mut self, next: CaseStatus) -> CourtResult<()> {
        if self.status.successor() != Some(next) {
            return Err(CourtError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CaseInput {
        CaseInput::new(
            "Beef Resolution",
            Party::new("Alice"),
            Party::new("Bob"),
            "Alice says Bob copied her mint strategy.",
        )
    }

    #[test]
    fn test_file_case() {
        let case = Case::file(input()).unwrap();
        assert_eq!(case.status, CaseStatus::Pending);
        assert_eq!(case.party(Role::Defendant).username, "Bob");
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut missing_summary = input();
        missing_summary.summary = "  ".to_string();
        let err = Case::file(missing_summary).unwrap_err();
        assert_eq!(err, CourtError::validation("missing case field: summary"));

        let mut missing_defendant = input();
        missing_defendant.defendant = Party::new("");
        assert!(Case::file(missing_defendant).is_err());
    }

    #[test]
    fn test_same_party_rejected() {
        let mut same = input();
        same.defendant = Party::new("alice");
        assert!(Case::file(same).is_err());
    }

    #[test]
    fn test_status_only_moves_forward() {
        let mut case = Case::file(input()).unwrap();
        assert!(case.advance_status(CaseStatus::Resolved).is_err());
        case.advance_status(CaseStatus::Active).unwrap();
        case.advance_status(CaseStatus::Judged).unwrap();
        case.advance_status(CaseStatus::Resolved).unwrap();
        assert!(case.advance_status(CaseStatus::Active).is_err());
        assert_eq!(case.status, CaseStatus::Resolved);
    }
}
