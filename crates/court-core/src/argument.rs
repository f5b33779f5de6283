//! Arguments posted by the two parties

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CourtError, CourtResult};

/// Shortest accepted argument, in characters
pub const MIN_ARGUMENT_CHARS: usize = 50;
/// Longest accepted argument, in characters
pub const MAX_ARGUMENT_CHARS: usize = 1000;

/// Side of the dispute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Plaintiff,
    Defendant,
}

impl Role {
    /// Both roles in posting order
    pub const ALL: [Role; 2] = [Role::Plaintiff, Role::Defendant];

    /// The opposing side
    pub fn opponent(self) -> Role {
        match self {
            Role::Plaintiff => Role::Defendant,
            Role::Defendant => Role::Plaintiff,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Plaintiff => "plaintiff",
            Role::Defendant => "defendant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CourtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plaintiff" | "p" => Ok(Role::Plaintiff),
            "defendant" | "d" => Ok(Role::Defendant),
            other => Err(CourtError::validation(format!("unknown role '{}'", other))),
        }
    }
}

/// A single argument in the case transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// Who argued
    pub role: Role,
    /// Round number (1-based)
    pub round: u32,
    /// Argument text
    pub content: String,
    /// Self-reported confidence (0.0 - 1.0)
    pub confidence: f64,
    /// True when the text came from the templated fallback instead of the generator
    pub fallback: bool,
    /// When the argument was produced
    pub posted_at: DateTime<Utc>,
}

impl Argument {
    /// Create an argument from generated or caller-supplied text
    pub fn new(role: Role, round: u32, content: impl Into<String>, confidence: f64) -> Self {
        Self {
            role,
            round,
            content: content.into(),
            confidence,
            fallback: false,
            posted_at: Utc::now(),
        }
    }

    /// Create an argument produced by the fallback path
    pub fn fallback(role: Role, round: u32, content: impl Into<String>, confidence: f64) -> Self {
        Self {
            fallback: true,
            ..Self::new(role, round, content, confidence)
        }
    }

    /// Length of the content in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Check round, length band and confidence range
    pub fn validate(&self) -> CourtResult<()> {
        if self.round == 0 {
            return Err(CourtError::validation("round numbers start at 1"));
        }
        check_content_length(&self.content)?;
        check_confidence(self.confidence)
    }
}

/// Reject text outside the accepted length band
pub fn check_content_length(content: &str) -> CourtResult<()> {
    let len = content.chars().count();
    if len < MIN_ARGUMENT_CHARS {
        return Err(CourtError::validation(format!(
            "argument too short ({} < {} chars)",
            len, MIN_ARGUMENT_CHARS
        )));
    }
    if len > MAX_ARGUMENT_CHARS {
        return Err(CourtError::validation(format!(
            "argument too long ({} > {} chars)",
            len, MAX_ARGUMENT_CHARS
        )));
    }
    Ok(())
}

/// Reject confidences outside [0, 1] (NaN included)
pub fn check_confidence(confidence: f64) -> CourtResult<()> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(CourtError::validation(format!(
            "confidence {} outside [0, 1]",
            confidence
        )));
    }
    Ok(())
}
