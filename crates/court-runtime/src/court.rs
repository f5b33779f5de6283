//! Court - owns case sessions and exposes the case operations

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};

use court_core::{
    check_content_length, Argument, Case, CaseId, CaseInput, CourtError, CourtResult, FinalVerdict,
    JudgeEvaluation, Role,
};
use court_engine::{
    check_policy, ArgumentGenerator, CourtConfig, EvaluationContext, JudgeRegistry, LlmScorer,
    RubricScorer, Scorer,
};
use court_llm::LlmProvider;

use crate::deliberation::evaluate_panel;
use crate::events::{CourtEvent, VerdictAnnouncement};
use crate::session::{Appeal, CaseSession, CaseSnapshot, Claim};

/// Confidence recorded for caller-supplied arguments
pub const SUBMITTED_CONFIDENCE: f64 = 0.8;

const EVENT_CAPACITY: usize = 256;

/// Builder for [`Court`]
pub struct CourtBuilder {
    provider: Arc<dyn LlmProvider>,
    config: CourtConfig,
    registry: Option<JudgeRegistry>,
    scorer: Option<Arc<dyn Scorer>>,
    llm_judges: bool,
}

impl CourtBuilder {
    pub fn config(mut self, config: CourtConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the standard six-judge panel
    pub fn registry(mut self, registry: JudgeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Use a custom scorer
    pub fn scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Have the text-generation collaborator judge, with the rubric as fallback
    pub fn llm_judges(mut self, enabled: bool) -> Self {
        self.llm_judges = enabled;
        self
    }

    pub fn build(self) -> CourtResult<Court> {
        self.config
            .validate()
            .map_err(|e| CourtError::validation(e.to_string()))?;
        let registry = self
            .registry
            .unwrap_or_else(|| JudgeRegistry::standard().clone());
        let majority = self.config.majority as usize;
        if majority > registry.len() {
            return Err(CourtError::validation(format!(
                "majority {} exceeds panel size {}",
                self.config.majority,
                registry.len()
            )));
        }
        // Both sides could reach the threshold on a tied panel
        if majority * 2 <= registry.len() {
            return Err(CourtError::validation(format!(
                "majority {} must be more than half of the {}-judge panel",
                self.config.majority,
                registry.len()
            )));
        }

        let timeout = self.config.generation_timeout();
        let scorer: Arc<dyn Scorer> = match (self.scorer, self.llm_judges) {
            (Some(scorer), _) => scorer,
            (None, true) => Arc::new(LlmScorer::new(self.provider.clone(), timeout)),
            (None, false) => Arc::new(RubricScorer::new()),
        };
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        tracing::info!(
            provider = %self.provider.name(),
            scorer = %scorer.name(),
            judges = registry.len(),
            max_rounds = self.config.max_rounds,
            "court ready"
        );

        Ok(Court {
            generator: ArgumentGenerator::new(self.provider, timeout),
            config: self.config,
            registry: Arc::new(registry),
            scorer,
            sessions: RwLock::new(HashMap::new()),
            events,
        })
    }
}

/// Runs any number of independent cases
pub struct Court {
    config: CourtConfig,
    registry: Arc<JudgeRegistry>,
    generator: ArgumentGenerator,
    scorer: Arc<dyn Scorer>,
    sessions: RwLock<HashMap<CaseId, Arc<Mutex<CaseSession>>>>,
    events: broadcast::Sender<CourtEvent>,
}

impl Court {
    pub fn builder(provider: Arc<dyn LlmProvider>) -> CourtBuilder {
        CourtBuilder {
            provider,
            config: CourtConfig::default(),
            registry: None,
            scorer: None,
            llm_judges: false,
        }
    }

    /// Court with default settings and the rubric scorer
    pub fn new(provider: Arc<dyn LlmProvider>) -> CourtResult<Self> {
        Self::builder(provider).build()
    }

    pub fn config(&self) -> &CourtConfig {
        &self.config
    }

    pub fn registry(&self) -> &JudgeRegistry {
        &self.registry
    }

    async fn session(&self, case_id: CaseId) -> CourtResult<Arc<Mutex<CaseSession>>> {
        self.sessions
            .read()
            .await
            .get(&case_id)
            .cloned()
            .ok_or_else(|| CourtError::NotFound(format!("case {}", case_id)))
    }

    /// File a case and open round 1
    pub async fn start_case(&self, input: CaseInput) -> CourtResult<CaseId> {
        let case = Case::file(input)?;
        let case_id = case.id;
        let session = Arc::new(Mutex::new(CaseSession::new(
            case,
            &self.config,
            self.registry.len(),
            self.events.clone(),
        )));

        self.sessions.write().await.insert(case_id, session.clone());
        session.lock().await.start()?;

        metrics::counter!("court_cases_started_total").increment(1);
        tracing::info!(case_id = %case_id, "case started");
        Ok(case_id)
    }

    /// Post the next argument. `None` content asks the generator to write it.
    pub async fn post_argument(
        &self,
        case_id: CaseId,
        role: Role,
        round: u32,
        content: Option<String>,
    ) -> CourtResult<Argument> {
        let content = match content {
            Some(text) => {
                let text = text.trim().to_string();
                check_content_length(&text)?;
                check_policy(&text)?;
                Some(text)
            }
            None => None,
        };

        let session = self.session(case_id).await?;
        let order = session.lock().await.reserve_argument(role, round)?;
        let mut claim = Claim::argument(session.clone(), role, round);

        let argument = match content {
            Some(text) => Argument::new(role, round, text, SUBMITTED_CONFIDENCE),
            None => {
                self.generator
                    .generate(role, &order.case, round, &order.arguments)
                    .await
            }
        };

        let mut guard = session.lock().await;
        claim.settle();
        guard.commit_argument(argument.clone())?;
        Ok(argument)
    }

    /// Record one judge's evaluation
    pub async fn post_judge_evaluation(
        &self,
        case_id: CaseId,
        judge_id: &str,
    ) -> CourtResult<JudgeEvaluation> {
        let judge = self.registry.get(judge_id)?;
        let session = self.session(case_id).await?;
        let order = session.lock().await.reserve_judge(&judge.id)?;
        let mut claim = Claim::judges(session.clone(), vec![judge.id.clone()]);

        let evaluation = self
            .scorer
            .evaluate(&EvaluationContext {
                judge,
                case: &order.case,
                round: order.round,
                arguments: &order.arguments,
            })
            .await;

        let mut guard = session.lock().await;
        claim.settle();
        guard.commit_evaluation(evaluation.clone())?;
        Ok(evaluation)
    }

    /// Evaluate every judge that has not voted, concurrently, committing in panel order
    pub async fn deliberate(&self, case_id: CaseId) -> CourtResult<Vec<JudgeEvaluation>> {
        let session = self.session(case_id).await?;
        let (judges, order) = session.lock().await.reserve_remaining(&self.registry)?;
        let mut claim = Claim::judges(session.clone(), judges.iter().map(|j| j.id.clone()).collect());
        tracing::info!(case_id = %case_id, judges = judges.len(), "deliberating");

        let evaluations = evaluate_panel(
            self.scorer.as_ref(),
            &judges,
            &order,
            self.config.judge_concurrency,
        )
        .await;

        let mut guard = session.lock().await;
        claim.settle();
        for (idx, evaluation) in evaluations.iter().enumerate() {
            if let Err(e) = guard.commit_evaluation(evaluation.clone()) {
                for rest in &evaluations[idx + 1..] {
                    guard.release_judge(&rest.judge_id);
                }
                return Err(e);
            }
        }
        Ok(evaluations)
    }

    /// Drive a case from filing to verdict with generated arguments
    pub async fn run_case(&self, input: CaseInput) -> CourtResult<CaseSnapshot> {
        let case_id = self.start_case(input).await?;
        for round in 1..=self.config.max_rounds {
            for role in Role::ALL {
                self.post_argument(case_id, role, round, None).await?;
            }
        }
        self.deliberate(case_id).await?;
        self.get_case_state(case_id).await
    }

    pub async fn get_verdict(&self, case_id: CaseId) -> CourtResult<Option<FinalVerdict>> {
        let session = self.session(case_id).await?;
        let guard = session.lock().await;
        Ok(guard.verdict().cloned())
    }

    pub async fn get_case_state(&self, case_id: CaseId) -> CourtResult<CaseSnapshot> {
        let session = self.session(case_id).await?;
        let snapshot = session.lock().await.snapshot();
        Ok(snapshot)
    }

    pub async fn file_appeal(
        &self,
        case_id: CaseId,
        appellant: Role,
        grounds: &str,
    ) -> CourtResult<Appeal> {
        let session = self.session(case_id).await?;
        let appeal = session.lock().await.file_appeal(appellant, grounds)?;
        Ok(appeal)
    }

    /// Stream of events for every case in this court
    pub fn subscribe(&self) -> broadcast::Receiver<CourtEvent> {
        self.events.subscribe()
    }

    /// Outbound summary, `None` until the case is resolved
    pub async fn announcement(&self, case_id: CaseId) -> CourtResult<Option<VerdictAnnouncement>> {
        let session = self.session(case_id).await?;
        let announcement = session.lock().await.announcement();
        Ok(announcement)
    }
}
