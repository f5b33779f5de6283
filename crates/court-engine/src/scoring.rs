//! Judge scoring
//!
//! [`RubricScorer`] is a seeded, deterministic rubric: a base draw per axis,
//! keyword signals from the arguments, and a per-bias adjustment.
//! [`LlmScorer`] asks the text-generation collaborator for a score sheet in the
//! judge's persona and falls back to the rubric when the reply is unusable.

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use court_core::{
    Argument, Axis, AxisScores, Case, DeliberationSeed, JudgeBias, JudgeEvaluation, JudgeProfile,
    Role, ScoreSheet, MAX_AXIS_SCORE,
};
use court_llm::{complete_within, LlmProvider, LlmRequest};

use crate::signals::ArgumentSignals;

/// Everything a judge looks at
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub judge: &'a JudgeProfile,
    pub case: &'a Case,
    /// Round the evaluation is recorded at (the closing round)
    pub round: u32,
    /// Full argument log, both sides, in posting order
    pub arguments: &'a [Argument],
}

impl<'a> EvaluationContext<'a> {
    pub fn by_role(&self, role: Role) -> impl Iterator<Item = &'a Argument> + '_ {
        self.arguments.iter().filter(move |a| a.role == role)
    }
}

/// How a judge archetype leans
#[derive(Debug, Clone, Copy)]
pub struct BiasProfile {
    /// Axis that gets the vocabulary bonus
    pub emphasis: Axis,
    /// Terms this judge rewards
    pub vocabulary: &'static [&'static str],
    /// Points added to the emphasised axis; positive favours the plaintiff
    pub skew: i8,
}

pub fn bias_profile(bias: JudgeBias) -> BiasProfile {
    match bias {
        JudgeBias::Technical => BiasProfile {
            emphasis: Axis::Evidence,
            vocabulary: &["code", "commit", "implementation", "exploit", "benchmark"],
            skew: 0,
        },
        JudgeBias::Community => BiasProfile {
            emphasis: Axis::Clarity,
            vocabulary: &["community", "reputation", "witness", "peers", "trust"],
            skew: 0,
        },
        JudgeBias::OnChain => BiasProfile {
            emphasis: Axis::Evidence,
            vocabulary: &["blockchain", "on-chain", "transaction", "timestamp", "hash"],
            skew: 2,
        },
        JudgeBias::Governance => BiasProfile {
            emphasis: Axis::Logic,
            vocabulary: &["precedent", "rule", "policy", "ruling", "burden"],
            skew: -2,
        },
        JudgeBias::Merit => BiasProfile {
            emphasis: Axis::Rebuttal,
            vocabulary: &["track record", "contribution", "quality", "results", "history"],
            skew: 0,
        },
        JudgeBias::Protocol => BiasProfile {
            emphasis: Axis::Logic,
            vocabulary: &["disclosure", "procedure", "protocol", "guideline", "compliance"],
            skew: 0,
        },
    }
}

/// Produces one judge's evaluation of a case
#[async_trait]
pub trait Scorer: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Never fails: unusable input degrades to a fallback evaluation
    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> JudgeEvaluation;
}

/// Seeded rubric; identical inputs give identical scores
#[derive(Debug, Clone, Copy, Default)]
pub struct RubricScorer;

impl RubricScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, ctx: &EvaluationContext<'_>) -> JudgeEvaluation {
        let seed = DeliberationSeed::for_evaluation(&ctx.case.id, &ctx.judge.id, ctx.round);
        let mut rng = seed.rng();
        let profile = bias_profile(ctx.judge.bias);

        let plaintiff = side_scores(&mut rng, Role::Plaintiff, ctx, &profile);
        let defendant = side_scores(&mut rng, Role::Defendant, ctx, &profile);
        let sheet = ScoreSheet::new(plaintiff, defendant);

        tracing::debug!(
            case_id = %ctx.case.id,
            judge = %ctx.judge.id,
            seed = %seed.fingerprint(),
            plaintiff = plaintiff.mean(),
            defendant = defendant.mean(),
            "rubric scored"
        );

        let reasoning = reasoning_for(ctx.judge, &sheet);
        JudgeEvaluation::new(ctx.judge, ctx.round, sheet, &reasoning)
    }
}

#[async_trait]
impl Scorer for RubricScorer {
    fn name(&self) -> &str {
        "rubric"
    }

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> JudgeEvaluation {
        self.score(ctx)
    }
}

fn side_scores<R: Rng>(
    rng: &mut R,
    role: Role,
    ctx: &EvaluationContext<'_>,
    profile: &BiasProfile,
) -> AxisScores {
    let (low, high) = match role {
        Role::Plaintiff => (70, 90),
        Role::Defendant => (65, 85),
    };

    // Draw count is fixed so the stream position never depends on the text
    let mut raw = [0i32; 4];
    for slot in raw.iter_mut() {
        *slot = rng.random_range(low..=high);
    }
    let rebuttal_jitter = rng.random_range(-3..=8);
    let clarity_jitter = rng.random_range(-5..=5);

    let signals = ArgumentSignals::analyze(role, ctx.arguments);
    let mut adjust = |axis: Axis, delta: i32| raw[axis_index(axis)] += delta;

    if signals.logic_hits > 0 || signals.causal_links > 0 {
        adjust(Axis::Logic, 10);
    }
    if signals.evidence_hits > 0 || signals.specifics > 0 {
        adjust(Axis::Evidence, 8);
    }
    adjust(Axis::Evidence, 2 * signals.technical_hits.min(2) as i32);
    adjust(Axis::Rebuttal, rebuttal_jitter + signals.rebuttals.min(3) as i32);
    adjust(Axis::Clarity, clarity_jitter - 2 * signals.loaded_terms.min(3) as i32);

    let hits = ArgumentSignals::vocabulary_hits(role, ctx.arguments, profile.vocabulary);
    adjust(profile.emphasis, (2 * hits).min(6) as i32);
    match (profile.skew.signum(), role) {
        (1, Role::Plaintiff) | (-1, Role::Defendant) => {
            adjust(profile.emphasis, i32::from(profile.skew).abs())
        }
        _ => {}
    }

    let clamp = |v: i32| v.clamp(0, i32::from(MAX_AXIS_SCORE)) as u8;
    AxisScores::new(clamp(raw[0]), clamp(raw[1]), clamp(raw[2]), clamp(raw[3]))
}

fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::Logic => 0,
        Axis::Evidence => 1,
        Axis::Rebuttal => 2,
        Axis::Clarity => 3,
    }
}

/// Reasoning text in the judge's voice, naming the stronger side
pub fn reasoning_for(judge: &JudgeProfile, sheet: &ScoreSheet) -> String {
    let winner = sheet.leader();
    let (w, l) = (winner.as_str(), winner.opponent().as_str());
    let body = match judge.bias {
        JudgeBias::Technical => format!(
            "The {w}'s account held up under technical scrutiny; the {l} left the implementation questions open."
        ),
        JudgeBias::Community => format!(
            "Weighing the effect on the community, the {w} made the more credible case and the {l} did not answer the concerns raised."
        ),
        JudgeBias::OnChain => format!(
            "The verifiable record lines up with the {w}'s timeline. The {l}'s version is not supported by the data."
        ),
        JudgeBias::Governance => format!(
            "Applying the established rules, the {w} met the burden the record requires while the {l} relied on assertion."
        ),
        JudgeBias::Merit => format!(
            "On the quality of the work presented, the {w} showed more substance than the {l}."
        ),
        JudgeBias::Protocol => format!(
            "The {w} documented their conduct against the expected procedure; the {l} left gaps in the disclosure trail."
        ),
    };

    let mut text = if judge.catchphrase.is_empty() {
        body
    } else {
        format!("{}. {}", judge.catchphrase, body)
    };
    if sheet.mean_difference().abs() < 2.0 {
        text.push_str(" A narrow call.");
    }
    text
}

/// Asks the collaborator to judge, with the rubric as fallback
#[derive(Debug, Clone)]
pub struct LlmScorer {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
    rubric: RubricScorer,
}

impl LlmScorer {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            rubric: RubricScorer,
        }
    }

    fn request(&self, ctx: &EvaluationContext<'_>) -> LlmRequest {
        let judge = ctx.judge;
        let system = format!(
            "You are {}, {} on a six-judge panel. {}. Your motto: \"{}\". \
             Score both sides strictly on the arguments in front of you.",
            judge.name, judge.title, judge.personality, judge.catchphrase
        );

        let mut prompt = format!(
            "CASE: {} vs {}\nTYPE: {}\nSUMMARY: {}\n",
            ctx.case.plaintiff.username,
            ctx.case.defendant.username,
            ctx.case.case_type,
            ctx.case.summary
        );
        for role in Role::ALL {
            prompt.push_str(&format!("\n{} ARGUMENTS:\n", role.as_str().to_uppercase()));
            for arg in ctx.by_role(role) {
                prompt.push_str(&format!("[round {}] {}\n", arg.round, arg.content));
            }
        }
        prompt.push_str(
            "\nReturn your score sheet as JSON only, every score an integer 0-100:\n\
             {\"plaintiff\":{\"logic\":0,\"evidence\":0,\"rebuttal\":0,\"clarity\":0},\
             \"defendant\":{\"logic\":0,\"evidence\":0,\"rebuttal\":0,\"clarity\":0},\
             \"reasoning\":\"...\",\"confidence\":0.0}",
        );

        LlmRequest::with_role(&system, &prompt)
            .temperature(0.2)
            .max_tokens(400)
    }

    fn fallback(&self, ctx: &EvaluationContext<'_>, reason: &str) -> JudgeEvaluation {
        tracing::warn!(
            case_id = %ctx.case.id,
            judge = %ctx.judge.id,
            reason,
            fallback = true,
            "judge reply unusable, using rubric"
        );
        metrics::counter!("court_evaluation_fallbacks_total").increment(1);
        self.rubric.score(ctx).as_fallback()
    }
}

#[async_trait]
impl Scorer for LlmScorer {
    fn name(&self) -> &str {
        "llm"
    }

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> JudgeEvaluation {
        let reply =
            match complete_within(self.provider.as_ref(), self.request(ctx), self.timeout).await {
                Ok(response) => response.content,
                Err(e) => return self.fallback(ctx, &e.to_string()),
            };

        let parsed = match parse_score_sheet(&reply) {
            Ok(parsed) => parsed,
            Err(reason) => return self.fallback(ctx, &reason),
        };

        let reasoning = match parsed.reasoning {
            Some(text) if !text.trim().is_empty() => text,
            _ => reasoning_for(ctx.judge, &parsed.sheet),
        };
        // Winner always comes from the means, never from the reply
        let evaluation = JudgeEvaluation::new(ctx.judge, ctx.round, parsed.sheet, &reasoning);
        match parsed.confidence {
            Some(confidence) => evaluation.with_confidence(confidence),
            None => evaluation,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawScores {
    logic: i64,
    evidence: i64,
    rebuttal: i64,
    clarity: i64,
}

#[derive(Debug, Deserialize)]
struct RawSheet {
    plaintiff: RawScores,
    defendant: RawScores,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// A validated score sheet from a judge's reply
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSheet {
    pub sheet: ScoreSheet,
    pub reasoning: Option<String>,
    pub confidence: Option<f64>,
}

/// Extract and range-check the JSON object in a judge's reply
pub fn parse_score_sheet(reply: &str) -> Result<ParsedSheet, String> {
    let start = reply.find('{').ok_or("no JSON object in reply")?;
    let end = reply.rfind('}').ok_or("no JSON object in reply")?;
    if end < start {
        return Err("no JSON object in reply".to_string());
    }

    let raw: RawSheet =
        serde_json::from_str(&reply[start..=end]).map_err(|e| format!("bad score JSON: {}", e))?;

    let sheet = ScoreSheet::new(
        to_axis_scores(&raw.plaintiff, Role::Plaintiff)?,
        to_axis_scores(&raw.defendant, Role::Defendant)?,
    );
    if let Some(confidence) = raw.confidence {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(format!("confidence {} outside [0, 1]", confidence));
        }
    }

    Ok(ParsedSheet {
        sheet,
        reasoning: raw.reasoning,
        confidence: raw.confidence,
    })
}

fn to_axis_scores(raw: &RawScores, role: Role) -> Result<AxisScores, String> {
    let check = |axis: &str, value: i64| {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= MAX_AXIS_SCORE)
            .ok_or_else(|| format!("{} {} score {} outside 0-100", role, axis, value))
    };
    Ok(AxisScores::new(
        check("logic", raw.logic)?,
        check("evidence", raw.evidence)?,
        check("rebuttal", raw.rebuttal)?,
        check("clarity", raw.clarity)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::JudgeRegistry;
    use court_core::{CaseInput, Party};
    use court_llm::MockProvider;

    fn case() -> Case {
        Case::file(CaseInput::new(
            "Exploit Theft",
            Party::new("Alice"),
            Party::new("Bob"),
            "Bob resubmitted Alice's disclosed exploit as his own.",
        ))
        .unwrap()
    }

    fn arguments() -> Vec<Argument> {
        vec![
            Argument::new(
                Role::Plaintiff,
                1,
                "The commit timestamp on 2024-03-01 is proof that the exploit code existed before Bob's report.",
                0.8,
            ),
            Argument::new(
                Role::Defendant,
                1,
                "My audit logs show independent research, and the matching implementation is coincidence.",
                0.8,
            ),
        ]
    }

    #[test]
    fn test_rubric_is_deterministic() {
        let case = case();
        let args = arguments();
        let judge = JudgeRegistry::standard().get("portdev").unwrap();
        let ctx = EvaluationContext {
            judge,
            case: &case,
            round: 1,
            arguments: &args,
        };

        let a = RubricScorer.score(&ctx);
        let b = RubricScorer.score(&ctx);
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.reasoning, b.reasoning);
        assert!(!a.fallback);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_rubric_varies_by_judge() {
        let case = case();
        let args = arguments();
        let sheets: Vec<ScoreSheet> = JudgeRegistry::standard()
            .iter()
            .map(|judge| {
                RubricScorer
                    .score(&EvaluationContext {
                        judge,
                        case: &case,
                        round: 1,
                        arguments: &args,
                    })
                    .scores
            })
            .collect();
        assert!(sheets.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_reasoning_names_leader() {
        let judge = JudgeRegistry::standard().get("james").unwrap();
        let sheet = ScoreSheet::new(AxisScores::uniform(70), AxisScores::uniform(80));
        let text = reasoning_for(judge, &sheet);
        assert!(text.starts_with("Rules are rules."));
        assert!(text.contains("the defendant met the burden"));
    }

    #[test]
    fn test_parse_score_sheet() {
        let reply = "Here you go:\n{\"plaintiff\":{\"logic\":80,\"evidence\":75,\"rebuttal\":70,\"clarity\":85},\
                     \"defendant\":{\"logic\":60,\"evidence\":65,\"rebuttal\":70,\"clarity\":70},\
                     \"reasoning\":\"Solid\",\"confidence\":0.9}\nThanks";
        let parsed = parse_score_sheet(reply).unwrap();
        assert_eq!(parsed.sheet.plaintiff.logic, 80);
        assert_eq!(parsed.confidence, Some(0.9));

        assert!(parse_score_sheet("no json here").is_err());
        assert!(parse_score_sheet(
            "{\"plaintiff\":{\"logic\":180,\"evidence\":75,\"rebuttal\":70,\"clarity\":85},\
              \"defendant\":{\"logic\":60,\"evidence\":65,\"rebuttal\":70,\"clarity\":70}}"
        )
        .is_err());
    }

    #[tokio::test]
    async fn test_llm_scorer_uses_reply() {
        let case = case();
        let args = arguments();
        let judge = JudgeRegistry::standard().get("keone").unwrap();
        let scorer = LlmScorer::new(Arc::new(MockProvider::smart()), Duration::from_secs(1));
        let eval = scorer
            .evaluate(&EvaluationContext {
                judge,
                case: &case,
                round: 1,
                arguments: &args,
            })
            .await;
        assert!(!eval.fallback);
        assert_eq!(eval.winner, Role::Plaintiff);
        assert_eq!(eval.confidence, Some(0.72));
    }

    #[tokio::test]
    async fn test_llm_scorer_falls_back_on_garbage() {
        let case = case();
        let args = arguments();
        let judge = JudgeRegistry::standard().get("keone").unwrap();
        let ctx = EvaluationContext {
            judge,
            case: &case,
            round: 1,
            arguments: &args,
        };
        let scorer = LlmScorer::new(
            Arc::new(MockProvider::constant("I refuse to use numbers.")),
            Duration::from_secs(1),
        );
        let eval = scorer.evaluate(&ctx).await;
        assert!(eval.fallback);
        assert_eq!(eval.scores, RubricScorer.score(&ctx).scores);
    }
}
