//! One case's mutable state
//!
//! All methods are synchronous and run under the session lock. Slow work
//! (generation, scoring) happens between a `reserve_*` call and the matching
//! `commit_*` call, with the lock released. A [`Claim`] covers that window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

use court_core::{
    Argument, Case, CaseId, CaseStatus, CourtError, CourtResult, FinalVerdict, Health,
    JudgeEvaluation, JudgeProfile, Role, Sanction,
};
use court_engine::{finalize, sanction_for, CourtConfig, CredibilityMeters, HealthModel, JudgeRegistry};

use crate::events::{headline, CourtEvent, VerdictAnnouncement};
use crate::phase::{CasePhase, PhaseMachine, TransitionRecord};

/// A filed appeal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appeal {
    pub appellant: Role,
    pub grounds: String,
    pub filed_at: DateTime<Utc>,
}

/// Read model for a case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSnapshot {
    pub case: Case,
    pub status: CaseStatus,
    pub phase: CasePhase,
    /// Current argument round, or the closing round once arguments are done
    pub round: u32,
    /// Live meter
    pub health: Health,
    /// Archive meter
    pub archive_health: Health,
    pub arguments: Vec<Argument>,
    pub evaluations: Vec<JudgeEvaluation>,
    pub verdict: Option<FinalVerdict>,
    pub sanction: Option<Sanction>,
    pub appeal: Option<Appeal>,
    pub transitions: Vec<TransitionRecord>,
}

/// Inputs handed to a scorer or generator while the lock is released
#[derive(Debug, Clone)]
pub struct WorkOrder {
    pub case: Case,
    pub round: u32,
    pub arguments: Vec<Argument>,
}

/// What a [`Claim`] holds on the session
#[derive(Debug, Clone, PartialEq, Eq)]
enum Held {
    Argument(Role, u32),
    Judges(Vec<String>),
}

/// An argument slot or judge votes reserved on a shared session.
///
/// Dropping a claim that was never settled hands the reservation back, so a
/// caller that abandons the call mid-generation leaves the slot retryable.
#[derive(Debug)]
pub struct Claim {
    session: Arc<Mutex<CaseSession>>,
    held: Option<Held>,
}

impl Claim {
    pub fn argument(session: Arc<Mutex<CaseSession>>, role: Role, round: u32) -> Self {
        Self {
            session,
            held: Some(Held::Argument(role, round)),
        }
    }

    pub fn judges(session: Arc<Mutex<CaseSession>>, judge_ids: Vec<String>) -> Self {
        Self {
            session,
            held: Some(Held::Judges(judge_ids)),
        }
    }

    /// Mark the reservation as consumed. Call under the session lock, before committing.
    pub fn settle(&mut self) {
        self.held = None;
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        let Some(held) = self.held.take() else {
            return;
        };
        match self.session.try_lock() {
            Ok(mut session) => session.release(&held),
            Err(_) => match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let session = self.session.clone();
                    handle.spawn(async move {
                        session.lock().await.release(&held);
                    });
                }
                Err(_) => {
                    tracing::warn!(?held, "reservation dropped outside a runtime, slot stays claimed");
                }
            },
        }
    }
}

#[derive(Debug)]
pub struct CaseSession {
    case: Case,
    max_rounds: u32,
    majority: u32,
    panel_size: usize,
    health_model: HealthModel,
    machine: PhaseMachine,
    arguments: Vec<Argument>,
    evaluations: Vec<JudgeEvaluation>,
    meters: CredibilityMeters,
    verdict: Option<FinalVerdict>,
    sanction: Option<Sanction>,
    appeal: Option<Appeal>,
    pending_slots: HashSet<(Role, u32)>,
    pending_judges: HashSet<String>,
    events: broadcast::Sender<CourtEvent>,
}

impl CaseSession {
    pub fn new(
        case: Case,
        config: &CourtConfig,
        panel_size: usize,
        events: broadcast::Sender<CourtEvent>,
    ) -> Self {
        Self {
            case,
            max_rounds: config.max_rounds,
            majority: config.majority,
            panel_size,
            health_model: HealthModel::from_config(config),
            machine: PhaseMachine::new(),
            arguments: Vec::new(),
            evaluations: Vec::new(),
            meters: CredibilityMeters::default(),
            verdict: None,
            sanction: None,
            appeal: None,
            pending_slots: HashSet::new(),
            pending_judges: HashSet::new(),
            events,
        }
    }

    pub fn id(&self) -> CaseId {
        self.case.id
    }

    pub fn phase(&self) -> CasePhase {
        self.machine.current()
    }

    pub fn verdict(&self) -> Option<&FinalVerdict> {
        self.verdict.as_ref()
    }

    fn emit(&self, event: CourtEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// idle -> arguments(1)
    pub fn start(&mut self) -> CourtResult<()> {
        self.machine
            .advance(CasePhase::Arguments { round: 1 }, Some("case started"))?;
        self.case.advance_status(CaseStatus::Active)?;
        self.emit(CourtEvent::CaseStarted {
            case_id: self.case.id,
            case_type: self.case.case_type.clone(),
            plaintiff: self.case.plaintiff.username.clone(),
            defendant: self.case.defendant.username.clone(),
            max_rounds: self.max_rounds,
        });
        Ok(())
    }

    /// The slot that must be filled next, ignoring reservations
    pub fn next_slot(&self) -> Option<(Role, u32)> {
        match self.phase() {
            CasePhase::Arguments { round } => {
                let role = if self.arguments.len() % 2 == 0 {
                    Role::Plaintiff
                } else {
                    Role::Defendant
                };
                Some((role, round))
            }
            _ => None,
        }
    }

    /// Claim `(role, round)` for an in-flight argument
    pub fn reserve_argument(&mut self, role: Role, round: u32) -> CourtResult<WorkOrder> {
        if round == 0 || round > self.max_rounds {
            return Err(CourtError::validation(format!(
                "round {} outside 1..={}",
                round, self.max_rounds
            )));
        }
        if self.pending_slots.contains(&(role, round)) {
            return Err(CourtError::ordering(format!(
                "{} argument for round {} is already in flight",
                role, round
            )));
        }
        let expected = self.next_slot().ok_or_else(|| {
            CourtError::ordering(format!("arguments are closed (phase {})", self.phase()))
        })?;
        if !self.pending_slots.is_empty() || expected != (role, round) {
            return Err(CourtError::ordering(format!(
                "expected {} argument for round {}, got {} for round {}",
                expected.0, expected.1, role, round
            )));
        }

        self.pending_slots.insert((role, round));
        Ok(self.work_order(round))
    }

    /// Drop a reservation without posting
    pub fn release_argument(&mut self, role: Role, round: u32) {
        self.pending_slots.remove(&(role, round));
    }

    /// Append a reserved argument and advance rounds/phase
    pub fn commit_argument(&mut self, argument: Argument) -> CourtResult<()> {
        let slot = (argument.role, argument.round);
        if !self.pending_slots.remove(&slot) {
            return Err(CourtError::ordering(format!(
                "{} argument for round {} was not reserved",
                argument.role, argument.round
            )));
        }
        argument.validate()?;

        let (role, round) = slot;
        self.arguments.push(argument.clone());
        tracing::info!(case_id = %self.case.id, %role, round, fallback = argument.fallback, "argument posted");
        self.emit(CourtEvent::ArgumentPosted {
            case_id: self.case.id,
            argument,
        });

        if role == Role::Defendant {
            self.emit(CourtEvent::RoundCompleted {
                case_id: self.case.id,
                round,
            });
            if round < self.max_rounds {
                self.machine
                    .advance(CasePhase::Arguments { round: round + 1 }, None)?;
            } else {
                self.machine
                    .advance(CasePhase::Judging { recorded: 0 }, Some("arguments closed"))?;
                tracing::info!(case_id = %self.case.id, judges = self.panel_size, "judging started");
                self.emit(CourtEvent::JudgingStarted {
                    case_id: self.case.id,
                    judges: self.panel_size,
                });
            }
        }
        Ok(())
    }

    fn ensure_judging(&self) -> CourtResult<()> {
        match self.phase() {
            CasePhase::Judging { .. } => Ok(()),
            other => Err(CourtError::ordering(format!(
                "judges cannot vote during phase {}",
                other
            ))),
        }
    }

    /// Claim a judge's vote
    pub fn reserve_judge(&mut self, judge_id: &str) -> CourtResult<WorkOrder> {
        self.ensure_judging()?;
        if self.evaluations.iter().any(|e| e.judge_id == judge_id) {
            return Err(CourtError::ordering(format!(
                "judge '{}' has already voted",
                judge_id
            )));
        }
        if !self.pending_judges.insert(judge_id.to_string()) {
            return Err(CourtError::ordering(format!(
                "judge '{}' is already deliberating",
                judge_id
            )));
        }
        Ok(self.work_order(self.max_rounds))
    }

    /// Claim every judge that has neither voted nor been claimed, in registry order
    pub fn reserve_remaining(
        &mut self,
        registry: &JudgeRegistry,
    ) -> CourtResult<(Vec<JudgeProfile>, WorkOrder)> {
        self.ensure_judging()?;
        let judges: Vec<JudgeProfile> = registry
            .iter()
            .filter(|j| !self.pending_judges.contains(&j.id))
            .filter(|j| !self.evaluations.iter().any(|e| e.judge_id == j.id))
            .cloned()
            .collect();
        for judge in &judges {
            self.pending_judges.insert(judge.id.clone());
        }
        Ok((judges, self.work_order(self.max_rounds)))
    }

    pub fn release_judge(&mut self, judge_id: &str) {
        self.pending_judges.remove(judge_id);
    }

    fn release(&mut self, held: &Held) {
        match held {
            Held::Argument(role, round) => self.release_argument(*role, *round),
            Held::Judges(ids) => {
                for id in ids {
                    self.release_judge(id);
                }
            }
        }
        tracing::debug!(case_id = %self.case.id, ?held, "abandoned reservation released");
    }

    /// Record a reserved evaluation, apply its damage, and finalize after the last judge
    pub fn commit_evaluation(&mut self, evaluation: JudgeEvaluation) -> CourtResult<()> {
        if !self.pending_judges.remove(&evaluation.judge_id) {
            return Err(CourtError::ordering(format!(
                "judge '{}' was not reserved",
                evaluation.judge_id
            )));
        }
        evaluation.validate()?;

        let (meters, delta) = self.health_model.apply(&self.meters, &evaluation);
        self.meters = meters;
        self.evaluations.push(evaluation.clone());

        let recorded = self.evaluations.len() as u32;
        self.machine
            .advance(CasePhase::Judging { recorded }, None)?;

        tracing::info!(
            case_id = %self.case.id,
            judge = %evaluation.judge_id,
            winner = %evaluation.winner,
            damage = delta.damage,
            fallback = evaluation.fallback,
            "evaluation recorded"
        );
        self.emit(CourtEvent::EvaluationRecorded {
            case_id: self.case.id,
            evaluation,
            delta,
            health: self.meters.live,
        });

        if self.evaluations.len() >= self.panel_size {
            self.finalize()?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> CourtResult<()> {
        let verdict = finalize(&self.evaluations, self.majority);
        self.machine.advance(CasePhase::Verdict, None)?;
        self.case.advance_status(CaseStatus::Judged)?;

        let sanction = sanction_for(&verdict, &self.meters.archive);
        self.machine
            .advance(CasePhase::Resolved, Some("verdict rendered"))?;
        self.case.advance_status(CaseStatus::Resolved)?;

        metrics::counter!("court_cases_resolved_total", "winner" => verdict.winner.to_string())
            .increment(1);
        tracing::info!(
            case_id = %self.case.id,
            winner = %verdict.winner,
            plaintiff_votes = verdict.plaintiff_votes,
            defendant_votes = verdict.defendant_votes,
            unanimous = verdict.is_unanimous,
            "verdict reached"
        );

        self.emit(CourtEvent::VerdictReached {
            case_id: self.case.id,
            verdict: verdict.clone(),
            health: self.meters.live,
            archive: self.meters.archive,
            sanction,
        });
        self.verdict = Some(verdict);
        self.sanction = Some(sanction);
        Ok(())
    }

    /// resolved -> appealed, once, by a party entitled to appeal
    pub fn file_appeal(&mut self, appellant: Role, grounds: &str) -> CourtResult<Appeal> {
        if grounds.trim().is_empty() {
            return Err(CourtError::validation("appeal grounds are empty"));
        }
        if self.appeal.is_some() {
            return Err(CourtError::AppealRejected(
                "an appeal has already been filed".to_string(),
            ));
        }
        let verdict = self.verdict.as_ref().ok_or_else(|| {
            CourtError::AppealRejected(format!("no verdict yet (phase {})", self.phase()))
        })?;
        if !verdict.appeal_allowed {
            return Err(CourtError::AppealRejected(format!(
                "margin of {} votes is not appealable",
                verdict.margin
            )));
        }
        if let Some(winner) = verdict.winner.role() {
            if winner == appellant {
                return Err(CourtError::AppealRejected(format!(
                    "the prevailing {} cannot appeal",
                    appellant
                )));
            }
        }

        self.machine
            .advance(CasePhase::Appealed, Some("appeal filed"))?;
        self.case.advance_status(CaseStatus::Appealed)?;

        let appeal = Appeal {
            appellant,
            grounds: grounds.trim().to_string(),
            filed_at: Utc::now(),
        };
        tracing::info!(case_id = %self.case.id, %appellant, "appeal filed");
        self.emit(CourtEvent::AppealFiled {
            case_id: self.case.id,
            appellant,
            grounds: appeal.grounds.clone(),
        });
        self.appeal = Some(appeal.clone());
        Ok(appeal)
    }

    fn work_order(&self, round: u32) -> WorkOrder {
        WorkOrder {
            case: self.case.clone(),
            round,
            arguments: self.arguments.clone(),
        }
    }

    fn current_round(&self) -> u32 {
        match self.phase() {
            CasePhase::Idle => 0,
            CasePhase::Arguments { round } => round,
            _ => self.max_rounds,
        }
    }

    pub fn snapshot(&self) -> CaseSnapshot {
        CaseSnapshot {
            case: self.case.clone(),
            status: self.case.status,
            phase: self.phase(),
            round: self.current_round(),
            health: self.meters.live,
            archive_health: self.meters.archive,
            arguments: self.arguments.clone(),
            evaluations: self.evaluations.clone(),
            verdict: self.verdict.clone(),
            sanction: self.sanction,
            appeal: self.appeal.clone(),
            transitions: self.machine.log().to_vec(),
        }
    }

    /// Outbound summary; only once a verdict exists
    pub fn announcement(&self) -> Option<VerdictAnnouncement> {
        let verdict = self.verdict.as_ref()?;
        let sanction = self.sanction.unwrap_or(Sanction::Dismissed);
        Some(VerdictAnnouncement {
            case_id: self.case.id,
            case_type: self.case.case_type.clone(),
            winner: verdict.winner,
            plaintiff_votes: verdict.plaintiff_votes,
            defendant_votes: verdict.defendant_votes,
            final_health: self.meters.archive,
            summary: self.case.summary.clone(),
            plaintiff: self.case.plaintiff.clone(),
            defendant: self.case.defendant.clone(),
            sanction,
            headline: headline(
                &self.case.case_type,
                &self.case.plaintiff,
                &self.case.defendant,
                verdict,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use court_core::{AxisScores, CaseInput, JudgeBias, Party, ScoreSheet, VerdictWinner};

    fn session(max_rounds: u32, panel: usize) -> CaseSession {
        let case = Case::file(CaseInput::new(
            "Plagiarism",
            Party::new("Alice"),
            Party::new("Bob"),
            "Bob copied Alice's report.",
        ))
        .unwrap();
        let config = CourtConfig {
            max_rounds,
            ..CourtConfig::default()
        };
        let (tx, _) = broadcast::channel(64);
        let mut session = CaseSession::new(case, &config, panel, tx);
        session.start().unwrap();
        session
    }

    fn arg(role: Role, round: u32) -> Argument {
        Argument::new(role, round, "x".repeat(60), 0.8)
    }

    fn post(session: &mut CaseSession, role: Role, round: u32) -> CourtResult<()> {
        session.reserve_argument(role, round)?;
        session.commit_argument(arg(role, round))
    }

    #[test]
    fn test_alternation_enforced() {
        let mut s = session(2, 6);
        assert!(matches!(
            s.reserve_argument(Role::Defendant, 1),
            Err(CourtError::OrderingViolation(_))
        ));
        post(&mut s, Role::Plaintiff, 1).unwrap();
        assert!(matches!(
            s.reserve_argument(Role::Plaintiff, 1),
            Err(CourtError::OrderingViolation(_))
        ));
        assert!(matches!(
            s.reserve_argument(Role::Plaintiff, 2),
            Err(CourtError::OrderingViolation(_))
        ));
        post(&mut s, Role::Defendant, 1).unwrap();
        assert_eq!(s.phase(), CasePhase::Arguments { round: 2 });
        assert!(matches!(
            s.reserve_argument(Role::Plaintiff, 3),
            Err(CourtError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_dropped_claim_returns_slot() {
        let shared = Arc::new(Mutex::new(session(1, 6)));

        shared.lock().await.reserve_argument(Role::Plaintiff, 1).unwrap();
        drop(Claim::argument(shared.clone(), Role::Plaintiff, 1));
        assert!(shared.lock().await.reserve_argument(Role::Plaintiff, 1).is_ok());

        // Settled claims leave the reservation to the commit
        let mut claim = Claim::argument(shared.clone(), Role::Plaintiff, 1);
        claim.settle();
        drop(claim);
        assert!(matches!(
            shared.lock().await.reserve_argument(Role::Plaintiff, 1),
            Err(CourtError::OrderingViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_claim_dropped_while_locked_releases_later() {
        let shared = Arc::new(Mutex::new(session(1, 6)));
        shared.lock().await.reserve_argument(Role::Plaintiff, 1).unwrap();

        {
            let _held = shared.lock().await;
            drop(Claim::argument(shared.clone(), Role::Plaintiff, 1));
        }
        tokio::task::yield_now().await;

        assert!(shared.lock().await.reserve_argument(Role::Plaintiff, 1).is_ok());
    }

    #[test]
    fn test_in_flight_slot_blocks_duplicates() {
        let mut s = session(1, 6);
        s.reserve_argument(Role::Plaintiff, 1).unwrap();
        assert!(matches!(
            s.reserve_argument(Role::Plaintiff, 1),
            Err(CourtError::OrderingViolation(_))
        ));
        s.release_argument(Role::Plaintiff, 1);
        assert!(s.reserve_argument(Role::Plaintiff, 1).is_ok());
    }

    #[test]
    fn test_judging_and_verdict() {
        let mut s = session(1, 2);
        post(&mut s, Role::Plaintiff, 1).unwrap();
        post(&mut s, Role::Defendant, 1).unwrap();
        assert_eq!(s.phase(), CasePhase::Judging { recorded: 0 });

        for id in ["a", "b"] {
            s.reserve_judge(id).unwrap();
            let judge = JudgeProfile::new(id, id, JudgeBias::Merit);
            let sheet = ScoreSheet::new(AxisScores::uniform(80), AxisScores::uniform(70));
            s.commit_evaluation(JudgeEvaluation::new(&judge, 1, sheet, "")).unwrap();
        }
        assert!(matches!(s.reserve_judge("a"), Err(CourtError::OrderingViolation(_))));

        let snapshot = s.snapshot();
        assert_eq!(snapshot.phase, CasePhase::Resolved);
        assert_eq!(snapshot.status, CaseStatus::Resolved);
        assert_eq!(snapshot.health.defendant, 94);
        // majority of 4 on a two-judge panel cannot be met
        assert_eq!(snapshot.verdict.unwrap().winner, VerdictWinner::Split);
        assert!(s.announcement().is_some());
    }
}
