//! Concurrent judge evaluation

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;

use court_core::{JudgeEvaluation, JudgeProfile};
use court_engine::{EvaluationContext, Scorer};

use crate::session::WorkOrder;

/// Evaluate `judges` against one frozen argument log, at most `concurrency` at a
/// time. Results come back in the order of `judges`.
pub async fn evaluate_panel(
    scorer: &dyn Scorer,
    judges: &[JudgeProfile],
    order: &WorkOrder,
    concurrency: usize,
) -> Vec<JudgeEvaluation> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    let tasks = judges.iter().map(|judge| {
        let semaphore = semaphore.clone();
        async move {
            // The semaphore is never closed; a failed acquire just runs unthrottled
            let _permit = semaphore.acquire().await.ok();
            let ctx = EvaluationContext {
                judge,
                case: &order.case,
                round: order.round,
                arguments: &order.arguments,
            };
            scorer.evaluate(&ctx).await
        }
    });

    join_all(tasks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use court_core::{Case, CaseInput, Party};
    use court_engine::{JudgeRegistry, RubricScorer};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct CountingScorer {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Scorer for CountingScorer {
        fn name(&self) -> &str {
            "counting"
        }

        async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> JudgeEvaluation {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            RubricScorer.score(ctx)
        }
    }

    fn order() -> WorkOrder {
        WorkOrder {
            case: Case::file(CaseInput::new(
                "Plagiarism",
                Party::new("Alice"),
                Party::new("Bob"),
                "Bob copied Alice's report.",
            ))
            .unwrap(),
            round: 1,
            arguments: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_results_follow_registry_order() {
        let judges: Vec<JudgeProfile> = JudgeRegistry::standard().iter().cloned().collect();
        let results = evaluate_panel(&RubricScorer, &judges, &order(), 6).await;
        let ids: Vec<&str> = results.iter().map(|e| e.judge_id.as_str()).collect();
        assert_eq!(ids, ["portdev", "mikeweb", "keone", "james", "harpal", "anago"]);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let judges: Vec<JudgeProfile> = JudgeRegistry::standard().iter().cloned().collect();
        let scorer = CountingScorer::default();
        evaluate_panel(&scorer, &judges, &order(), 2).await;
        assert!(scorer.peak.load(Ordering::SeqCst) <= 2);
    }
}
