//! # Court Core
//!
//! Core types for the court engine:
//! - [`Case`] — a filed dispute between two [`Party`] values
//! - [`Argument`] — one side's statement in a round
//! - [`JudgeProfile`] / [`JudgeEvaluation`] — the panel and its four-axis scores
//! - [`Health`] — bounded per-side credibility
//! - [`FinalVerdict`] — the vote tally
//! - [`DeliberationSeed`] — reproducible entropy keyed on case, judge and round
//!
//! ```rust
//! use court_core::{AxisScores, JudgeBias, JudgeEvaluation, JudgeProfile, Role, ScoreSheet};
//!
//! let judge = JudgeProfile::new("portdev", "PortDev", JudgeBias::Technical);
//! let sheet = ScoreSheet::new(AxisScores::uniform(75), AxisScores::uniform(75));
//! let eval = JudgeEvaluation::new(&judge, 1, sheet, "Too close to call.");
//!
//! // Equal means resolve to the defendant
//! assert_eq!(eval.winner, Role::Defendant);
//! ```

pub mod argument;
pub mod case;
pub mod error;
pub mod evaluation;
pub mod health;
pub mod judge;
pub mod seed;
pub mod verdict;

pub use argument::{check_content_length, Argument, Role, MAX_ARGUMENT_CHARS, MIN_ARGUMENT_CHARS};
pub use case::{Case, CaseId, CaseInput, CaseStatus, Party};
pub use error::{CourtError, CourtResult};
pub use evaluation::{Axis, AxisScores, JudgeEvaluation, ScoreSheet, MAX_AXIS_SCORE};
pub use health::{Health, HealthDelta, MAX_HEALTH};
pub use judge::{JudgeBias, JudgeProfile};
pub use seed::DeliberationSeed;
pub use verdict::{FinalVerdict, Sanction, VerdictWinner};
