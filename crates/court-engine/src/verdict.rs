//! Verdict aggregation

use court_core::{FinalVerdict, Health, JudgeEvaluation, Role, Sanction, VerdictWinner};

/// Votes needed for an outright result on the six-judge panel
pub const DEFAULT_MAJORITY: u32 = 4;

/// Reduce the evaluation set to a verdict. Pure; order of `evaluations` is irrelevant.
pub fn finalize(evaluations: &[JudgeEvaluation], majority: u32) -> FinalVerdict {
    let plaintiff_votes = evaluations
        .iter()
        .filter(|e| e.winner == Role::Plaintiff)
        .count() as u32;
    let defendant_votes = evaluations.len() as u32 - plaintiff_votes;
    let total_votes = plaintiff_votes + defendant_votes;

    let winner = if plaintiff_votes >= majority {
        VerdictWinner::Plaintiff
    } else if defendant_votes >= majority {
        VerdictWinner::Defendant
    } else {
        VerdictWinner::Split
    };

    let confidence = if evaluations.is_empty() {
        0.0
    } else {
        evaluations
            .iter()
            .map(JudgeEvaluation::effective_confidence)
            .sum::<f64>()
            / evaluations.len() as f64
    };

    let margin = plaintiff_votes.abs_diff(defendant_votes);

    FinalVerdict {
        winner,
        plaintiff_votes,
        defendant_votes,
        total_votes,
        confidence,
        is_unanimous: total_votes > 0 && (plaintiff_votes == 0 || defendant_votes == 0),
        margin,
        appeal_allowed: margin <= 1 || winner == VerdictWinner::Split,
    }
}

/// Recommended consequence for the losing side, from the archive meter
pub fn sanction_for(verdict: &FinalVerdict, archive: &Health) -> Sanction {
    let loser = match verdict.winner.role() {
        Some(winner) => winner.opponent(),
        None => return Sanction::Dismissed,
    };
    match archive.get(loser) {
        0 => Sanction::Suspension,
        h if h < 30 => Sanction::PostingRestriction,
        h if h < 50 => Sanction::FormalWarning,
        _ => Sanction::Dismissed,
    }
}
