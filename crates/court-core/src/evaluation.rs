//! Judge evaluations and four-axis score sheets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::argument::{check_confidence, Role};
use crate::error::{CourtError, CourtResult};
use crate::judge::JudgeProfile;

/// Highest score on any axis
pub const MAX_AXIS_SCORE: u8 = 100;

/// Scoring axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Logic,
    Evidence,
    Rebuttal,
    Clarity,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::Logic, Axis::Evidence, Axis::Rebuttal, Axis::Clarity];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Axis::Logic => "logic",
            Axis::Evidence => "evidence",
            Axis::Rebuttal => "rebuttal",
            Axis::Clarity => "clarity",
        };
        f.write_str(s)
    }
}

/// One side's scores, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisScores {
    pub logic: u8,
    pub evidence: u8,
    pub rebuttal: u8,
    pub clarity: u8,
}

impl AxisScores {
    pub fn new(logic: u8, evidence: u8, rebuttal: u8, clarity: u8) -> Self {
        Self {
            logic,
            evidence,
            rebuttal,
            clarity,
        }
    }

    /// Same score on every axis
    pub fn uniform(score: u8) -> Self {
        Self::new(score, score, score, score)
    }

    pub fn get(&self, axis: Axis) -> u8 {
        match axis {
            Axis::Logic => self.logic,
            Axis::Evidence => self.evidence,
            Axis::Rebuttal => self.rebuttal,
            Axis::Clarity => self.clarity,
        }
    }

    pub fn set(&mut self, axis: Axis, score: u8) {
        match axis {
            Axis::Logic => self.logic = score,
            Axis::Evidence => self.evidence = score,
            Axis::Rebuttal => self.rebuttal = score,
            Axis::Clarity => self.clarity = score,
        }
    }

    pub fn total(&self) -> u32 {
        Axis::ALL.iter().map(|a| u32::from(self.get(*a))).sum()
    }

    /// Mean of the four axes; the side's overall strength
    pub fn mean(&self) -> f64 {
        f64::from(self.total()) / Axis::ALL.len() as f64
    }

    fn validate(&self, role: Role) -> CourtResult<()> {
        for axis in Axis::ALL {
            let score = self.get(axis);
            if score > MAX_AXIS_SCORE {
                return Err(CourtError::validation(format!(
                    "{} {} score {} above {}",
                    role, axis, score, MAX_AXIS_SCORE
                )));
            }
        }
        Ok(())
    }
}

/// Scores for both sides from one judge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSheet {
    pub plaintiff: AxisScores,
    pub defendant: AxisScores,
}

impl ScoreSheet {
    pub fn new(plaintiff: AxisScores, defendant: AxisScores) -> Self {
        Self {
            plaintiff,
            defendant,
        }
    }

    pub fn side(&self, role: Role) -> &AxisScores {
        match role {
            Role::Plaintiff => &self.plaintiff,
            Role::Defendant => &self.defendant,
        }
    }

    /// mean(plaintiff) - mean(defendant)
    pub fn mean_difference(&self) -> f64 {
        self.plaintiff.mean() - self.defendant.mean()
    }

    /// Side with the higher mean. Equal means go to the defendant.
    pub fn leader(&self) -> Role {
        if self.plaintiff.mean() > self.defendant.mean() {
            Role::Plaintiff
        } else {
            Role::Defendant
        }
    }

    pub fn validate(&self) -> CourtResult<()> {
        self.plaintiff.validate(Role::Plaintiff)?;
        self.defendant.validate(Role::Defendant)
    }
}

/// One judge's evaluation of the whole case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeEvaluation {
    pub judge_id: String,
    pub judge_name: String,
    /// Round the evaluation was taken at (the closing round)
    pub round: u32,
    pub scores: ScoreSheet,
    pub reasoning: String,
    /// Always equal to `scores.leader()`
    pub winner: Role,
    /// Judge-reported confidence (0.0 - 1.0), if any
    pub confidence: Option<f64>,
    /// Copied from the judge profile at evaluation time
    pub weight: f64,
    /// True when the scores came from the seeded fallback rubric
    pub fallback: bool,
    pub evaluated_at: DateTime<Utc>,
}

impl JudgeEvaluation {
    /// Build an evaluation; the winner is derived from the scores
    pub fn new(judge: &JudgeProfile, round: u32, scores: ScoreSheet, reasoning: &str) -> Self {
        Self {
            judge_id: judge.id.clone(),
            judge_name: judge.name.clone(),
            round,
            winner: scores.leader(),
            scores,
            reasoning: reasoning.to_string(),
            confidence: None,
            weight: judge.weight,
            fallback: false,
            evaluated_at: Utc::now(),
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn as_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    /// Reported confidence, or the winning side's mean score scaled to [0, 1]
    pub fn effective_confidence(&self) -> f64 {
        self.confidence
            .unwrap_or_else(|| self.scores.side(self.winner).mean() / f64::from(MAX_AXIS_SCORE))
    }

    /// Structural checks applied before an evaluation is recorded
    pub fn validate(&self) -> CourtResult<()> {
        if self.judge_id.trim().is_empty() {
            return Err(CourtError::validation("evaluation has no judge id"));
        }
        if self.round == 0 {
            return Err(CourtError::validation("round numbers start at 1"));
        }
        self.scores.validate()?;
        if self.winner != self.scores.leader() {
            return Err(CourtError::validation(format!(
                "winner {} disagrees with scores (leader {})",
                self.winner,
                self.scores.leader()
            )));
        }
        if let Some(confidence) = self.confidence {
            check_confidence(confidence)?;
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(CourtError::validation(format!(
                "judge weight {} must be finite and non-negative",
                self.weight
            )));
        }
        Ok(())
    }
}
