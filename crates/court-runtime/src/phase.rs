//! Case phase machine with a legal-transition table and a transition log.
//!
//! ```text
//! Idle -> Arguments{1}
//! Arguments{r} -> Arguments{r+1} | Judging{0}
//! Judging{n} -> Judging{n+1} | Verdict
//! Verdict -> Resolved
//! Resolved -> Appealed
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use court_core::{CourtError, CourtResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum CasePhase {
    Idle,
    /// Collecting arguments for `round`
    Arguments { round: u32 },
    /// `recorded` evaluations committed so far
    Judging { recorded: u32 },
    Verdict,
    Resolved,
    Appealed,
}

impl CasePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Appealed)
    }
}

impl fmt::Display for CasePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Arguments { round } => write!(f, "arguments(round {})", round),
            Self::Judging { recorded } => write!(f, "judging({} recorded)", recorded),
            Self::Verdict => write!(f, "verdict"),
            Self::Resolved => write!(f, "resolved"),
            Self::Appealed => write!(f, "appealed"),
        }
    }
}

fn is_legal_transition(from: CasePhase, to: CasePhase) -> bool {
    use CasePhase::*;

    match (from, to) {
        (Idle, Arguments { round }) => round == 1,
        (Arguments { round: a }, Arguments { round: b }) => b == a + 1,
        (Arguments { .. }, Judging { recorded }) => recorded == 0,
        (Judging { recorded: a }, Judging { recorded: b }) => b == a + 1,
        (Judging { .. }, Verdict) => true,
        (Verdict, Resolved) => true,
        (Resolved, Appealed) => true,
        _ => false,
    }
}

/// A single recorded phase change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: CasePhase,
    pub to: CasePhase,
    /// Milliseconds since the machine was created
    pub elapsed_ms: u64,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PhaseMachine {
    current: CasePhase,
    log: Vec<TransitionRecord>,
    created: Instant,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            current: CasePhase::Idle,
            log: Vec::new(),
            created: Instant::now(),
        }
    }

    pub fn current(&self) -> CasePhase {
        self.current
    }

    pub fn log(&self) -> &[TransitionRecord] {
        &self.log
    }

    /// Move to `to` if the edge is legal, recording it
    pub fn advance(&mut self, to: CasePhase, reason: Option<&str>) -> CourtResult<()> {
        let from = self.current;
        if !is_legal_transition(from, to) {
            tracing::warn!(%from, %to, "illegal phase transition rejected");
            return Err(CourtError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        self.log.push(TransitionRecord {
            from,
            to,
            elapsed_ms: self.created.elapsed().as_millis() as u64,
            at: Utc::now(),
            reason: reason.map(str::to_string),
        });
        self.current = to;
        tracing::debug!(%from, %to, "phase advanced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_path() {
        let mut machine = PhaseMachine::new();
        machine.advance(CasePhase::Arguments { round: 1 }, Some("start")).unwrap();
        machine.advance(CasePhase::Arguments { round: 2 }, None).unwrap();
        machine.advance(CasePhase::Judging { recorded: 0 }, None).unwrap();
        machine.advance(CasePhase::Judging { recorded: 1 }, None).unwrap();
        machine.advance(CasePhase::Verdict, None).unwrap();
        machine.advance(CasePhase::Resolved, None).unwrap();
        machine.advance(CasePhase::Appealed, Some("close vote")).unwrap();

        assert!(machine.current().is_terminal());
        assert_eq!(machine.log().len(), 7);
        assert_eq!(machine.log()[0].reason.as_deref(), Some("start"));
    }

    #[test]
    fn test_illegal_edges() {
        let mut machine = PhaseMachine::new();
        assert!(machine.advance(CasePhase::Judging { recorded: 0 }, None).is_err());
        assert!(machine.advance(CasePhase::Arguments { round: 2 }, None).is_err());

        machine.advance(CasePhase::Arguments { round: 1 }, None).unwrap();
        assert!(matches!(
            machine.advance(CasePhase::Arguments { round: 3 }, None),
            Err(CourtError::InvalidTransition { .. })
        ));
        assert!(machine.advance(CasePhase::Resolved, None).is_err());
        assert_eq!(machine.log().len(), 1);
    }

    #[test]
    fn test_phase_serializes_tagged() {
        let json = serde_json::to_value(CasePhase::Arguments { round: 3 }).unwrap();
        assert_eq!(json["name"], "arguments");
        assert_eq!(json["round"], 3);
    }
}
