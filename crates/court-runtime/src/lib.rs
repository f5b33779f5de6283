//! # Court Runtime
//!
//! Case sessions on Tokio. A [`Court`] holds many independent cases; each case is
//! a strictly ordered pipeline guarded by its own lock:
//!
//! ```text
//! idle -> arguments(1..N) -> judging(0..M) -> verdict -> resolved [-> appealed]
//! ```
//!
//! Judges deliberate concurrently against a frozen argument log and their
//! evaluations are committed in panel order.
//!
//! ```rust
//! use std::sync::Arc;
//! use court_core::{CaseInput, Party};
//! use court_engine::CourtConfig;
//! use court_llm::MockProvider;
//! use court_runtime::Court;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let court = Court::builder(Arc::new(MockProvider::smart()))
//!     .config(CourtConfig { max_rounds: 1, ..CourtConfig::default() })
//!     .build()
//!     .unwrap();
//!
//! let snapshot = court
//!     .run_case(CaseInput::new(
//!         "Exploit Theft",
//!         Party::new("Alice"),
//!         Party::new("Bob"),
//!         "Bob resubmitted Alice's disclosed exploit.",
//!     ))
//!     .await
//!     .unwrap();
//! assert_eq!(snapshot.evaluations.len(), 6);
//! assert!(snapshot.verdict.is_some());
//! # }
//! ```

pub mod court;
pub mod deliberation;
pub mod events;
pub mod phase;
pub mod session;

pub use court::{Court, CourtBuilder, SUBMITTED_CONFIDENCE};
pub use events::{CourtEvent, VerdictAnnouncement};
pub use phase::{CasePhase, PhaseMachine, TransitionRecord};
pub use session::{Appeal, CaseSession, CaseSnapshot, Claim, WorkOrder};
