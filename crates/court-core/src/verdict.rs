//! Verdict records

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::argument::Role;

/// Outcome of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictWinner {
    Plaintiff,
    Defendant,
    /// No side reached the majority threshold
    Split,
}

impl VerdictWinner {
    /// The winning role, if any
    pub fn role(self) -> Option<Role> {
        match self {
            VerdictWinner::Plaintiff => Some(Role::Plaintiff),
            VerdictWinner::Defendant => Some(Role::Defendant),
            VerdictWinner::Split => None,
        }
    }
}

impl From<Role> for VerdictWinner {
    fn from(role: Role) -> Self {
        match role {
            Role::Plaintiff => VerdictWinner::Plaintiff,
            Role::Defendant => VerdictWinner::Defendant,
        }
    }
}

impl fmt::Display for VerdictWinner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictWinner::Plaintiff => f.write_str("plaintiff"),
            VerdictWinner::Defendant => f.write_str("defendant"),
            VerdictWinner::Split => f.write_str("split"),
        }
    }
}

/// Final tally, derived from the full evaluation set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalVerdict {
    pub winner: VerdictWinner,
    pub plaintiff_votes: u32,
    pub defendant_votes: u32,
    pub total_votes: u32,
    /// Mean judge confidence (0.0 - 1.0)
    pub confidence: f64,
    pub is_unanimous: bool,
    /// |plaintiff_votes - defendant_votes|
    pub margin: u32,
    /// Close votes and splits may be appealed
    pub appeal_allowed: bool,
}

/// Recommended consequence for the losing party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sanction {
    Dismissed,
    FormalWarning,
    PostingRestriction,
    Suspension,
}

impl fmt::Display for Sanction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sanction::Dismissed => "No sanction - case dismissed",
            Sanction::FormalWarning => "Formal warning issued",
            Sanction::PostingRestriction => "24h posting restriction",
            Sanction::Suspension => "48h community suspension",
        };
        f.write_str(s)
    }
}
