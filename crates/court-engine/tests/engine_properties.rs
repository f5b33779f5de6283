//! Property tests for the credibility meters, verdict reduction and rubric

use court_core::{
    Argument, AxisScores, Case, CaseInput, JudgeBias, JudgeEvaluation, JudgeProfile, Party, Role,
    ScoreSheet, MAX_HEALTH,
};
use court_engine::{finalize, CredibilityMeters, EvaluationContext, HealthModel, JudgeRegistry, RubricScorer};
use proptest::prelude::*;
use uuid::Uuid;

fn axis_scores() -> impl Strategy<Value = AxisScores> {
    (0u8..=100, 0u8..=100, 0u8..=100, 0u8..=100)
        .prop_map(|(l, e, r, c)| AxisScores::new(l, e, r, c))
}

fn evaluation() -> impl Strategy<Value = JudgeEvaluation> {
    (axis_scores(), axis_scores(), 0.0f64..3.0, "[a-z]{1,8}").prop_map(|(p, d, weight, id)| {
        let judge = JudgeProfile::new(&id, &id, JudgeBias::Merit).with_weight(weight);
        JudgeEvaluation::new(&judge, 1, ScoreSheet::new(p, d), "")
    })
}

proptest! {
    #[test]
    fn meters_stay_in_bounds(
        evaluations in prop::collection::vec(evaluation(), 0..40),
        factor in 0.0f64..2.0,
        floor in 0u8..=100,
    ) {
        let model = HealthModel::new(factor, floor);
        let mut meters = CredibilityMeters::default();
        for evaluation in &evaluations {
            meters = model.apply(&meters, evaluation).0;
            for role in Role::ALL {
                prop_assert!(meters.live.get(role) >= floor);
                prop_assert!(meters.live.get(role) <= MAX_HEALTH);
                prop_assert!(meters.archive.get(role) <= MAX_HEALTH);
                prop_assert!(meters.archive.get(role) <= meters.live.get(role));
            }
        }
    }

    #[test]
    fn finalize_ignores_order(
        mut evaluations in prop::collection::vec(evaluation(), 0..8),
        majority in 1u32..6,
    ) {
        let forward = finalize(&evaluations, majority);
        evaluations.reverse();
        let reversed = finalize(&evaluations, majority);

        prop_assert_eq!(forward.winner, reversed.winner);
        prop_assert_eq!(forward.plaintiff_votes, reversed.plaintiff_votes);
        prop_assert_eq!(forward.total_votes as usize, evaluations.len());
        prop_assert_eq!(forward.margin, forward.plaintiff_votes.abs_diff(forward.defendant_votes));
        prop_assert!((forward.confidence - reversed.confidence).abs() < 1e-9);
    }

    #[test]
    fn per_judge_winner_tracks_means(p in axis_scores(), d in axis_scores()) {
        let judge = JudgeProfile::new("x", "X", JudgeBias::Protocol);
        let evaluation = JudgeEvaluation::new(&judge, 1, ScoreSheet::new(p, d), "");
        let expected = if p.mean() > d.mean() { Role::Plaintiff } else { Role::Defendant };
        prop_assert_eq!(evaluation.winner, expected);
    }

    #[test]
    fn rubric_is_reproducible(round in 1u32..=6, content in "[a-z ]{50,200}") {
        let case = Case::file_with_id(
            Uuid::from_u128(42),
            CaseInput::new("Attribution", Party::new("Alice"), Party::new("Bob"), "Who found it first."),
        )
        .unwrap();
        let arguments = vec![
            Argument::new(Role::Plaintiff, 1, content.clone(), 0.8),
            Argument::new(Role::Defendant, 1, content, 0.8),
        ];
        for judge in JudgeRegistry::standard().iter() {
            let ctx = EvaluationContext { judge, case: &case, round, arguments: &arguments };
            let a = RubricScorer.score(&ctx);
            let b = RubricScorer.score(&ctx);
            prop_assert_eq!(a.scores, b.scores);
            prop_assert!(a.validate().is_ok());
        }
    }
}
