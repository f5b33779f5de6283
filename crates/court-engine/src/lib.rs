//! # Court Engine
//!
//! The deliberation engine: who judges, how arguments are written, how they are
//! scored, and how scores become credibility damage and a verdict.
//!
//! ## Key Types
//!
//! - [`JudgeRegistry`] — the fixed six-judge panel
//! - [`ArgumentGenerator`] — one side's argument per round, with seeded fallbacks
//! - [`Scorer`] — [`RubricScorer`] (seeded, deterministic) and [`LlmScorer`]
//! - [`HealthModel`] — evaluation to damage, live and archive meters
//! - [`finalize`] — evaluation set to [`court_core::FinalVerdict`]
//!
//! ## Quick Start
//!
//! ```rust
//! use court_core::{Argument, Case, CaseInput, Party, Role};
//! use court_engine::{finalize, EvaluationContext, JudgeRegistry, RubricScorer, DEFAULT_MAJORITY};
//!
//! let case = Case::file(CaseInput::new(
//!     "Exploit Theft",
//!     Party::new("Alice"),
//!     Party::new("Bob"),
//!     "Bob resubmitted Alice's disclosed exploit.",
//! ))
//! .unwrap();
//! let arguments: Vec<Argument> = Vec::new();
//!
//! let evaluations: Vec<_> = JudgeRegistry::standard()
//!     .iter()
//!     .map(|judge| {
//!         RubricScorer.score(&EvaluationContext { judge, case: &case, round: 1, arguments: &arguments })
//!     })
//!     .collect();
//!
//! let verdict = finalize(&evaluations, DEFAULT_MAJORITY);
//! assert_eq!(verdict.total_votes, 6);
//! ```

pub mod arguments;
pub mod config;
pub mod health;
pub mod registry;
pub mod scoring;
pub mod signals;
pub mod verdict;

pub use arguments::{
    accept_generated, fallback_content, truncate_at_word, ArgumentGenerator, FALLBACK_CONFIDENCE,
    GENERATED_CONFIDENCE,
};
pub use config::CourtConfig;
pub use health::{CredibilityMeters, HealthModel};
pub use registry::JudgeRegistry;
pub use scoring::{
    bias_profile, parse_score_sheet, reasoning_for, BiasProfile, EvaluationContext, LlmScorer,
    ParsedSheet, RubricScorer, Scorer,
};
pub use signals::{check_policy, policy_violation, ArgumentSignals};
pub use verdict::{finalize, sanction_for, DEFAULT_MAJORITY};
