//! Benchmarks for rubric scoring and verdict reduction

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use court_core::{Argument, Case, CaseInput, Party, Role};
use court_engine::{finalize, EvaluationContext, JudgeRegistry, RubricScorer, DEFAULT_MAJORITY};

fn sample_case() -> (Case, Vec<Argument>) {
    let case = Case::file(CaseInput::new(
        "Exploit Theft",
        Party::new("Alice"),
        Party::new("Bob"),
        "Bob resubmitted Alice's disclosed exploit as his own.",
    ))
    .expect("valid case");

    let arguments = (1..=6)
        .flat_map(|round| {
            [
                Argument::new(
                    Role::Plaintiff,
                    round,
                    "The commit timestamp and blockchain proof document the timeline before the report.",
                    0.8,
                ),
                Argument::new(
                    Role::Defendant,
                    round,
                    "Our audit logs show independent research; the matching implementation is coincidence.",
                    0.8,
                ),
            ]
        })
        .collect();
    (case, arguments)
}

fn bench_rubric_panel(c: &mut Criterion) {
    let (case, arguments) = sample_case();
    let registry = JudgeRegistry::standard();

    c.bench_function("rubric_six_judges_six_rounds", |b| {
        b.iter(|| {
            let evaluations: Vec<_> = registry
                .iter()
                .map(|judge| {
                    RubricScorer.score(&EvaluationContext {
                        judge,
                        case: &case,
                        round: 6,
                        arguments: black_box(&arguments),
                    })
                })
                .collect();
            finalize(&evaluations, DEFAULT_MAJORITY)
        })
    });
}

criterion_group!(benches, bench_rubric_panel);
criterion_main!(benches);
