//! Event stream and outbound announcement shape

use serde::{Deserialize, Serialize};

use court_core::{
    Argument, CaseId, FinalVerdict, Health, HealthDelta, JudgeEvaluation, Party, Role, Sanction,
    VerdictWinner,
};

/// Everything observers see, tagged by `event` in JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CourtEvent {
    CaseStarted {
        case_id: CaseId,
        case_type: String,
        plaintiff: String,
        defendant: String,
        max_rounds: u32,
    },
    ArgumentPosted {
        case_id: CaseId,
        argument: Argument,
    },
    RoundCompleted {
        case_id: CaseId,
        round: u32,
    },
    JudgingStarted {
        case_id: CaseId,
        judges: usize,
    },
    EvaluationRecorded {
        case_id: CaseId,
        evaluation: JudgeEvaluation,
        delta: HealthDelta,
        /// Live meter after the delta
        health: Health,
    },
    VerdictReached {
        case_id: CaseId,
        verdict: FinalVerdict,
        health: Health,
        archive: Health,
        sanction: Sanction,
    },
    AppealFiled {
        case_id: CaseId,
        appellant: Role,
        grounds: String,
    },
}

impl CourtEvent {
    pub fn case_id(&self) -> CaseId {
        match self {
            Self::CaseStarted { case_id, .. }
            | Self::ArgumentPosted { case_id, .. }
            | Self::RoundCompleted { case_id, .. }
            | Self::JudgingStarted { case_id, .. }
            | Self::EvaluationRecorded { case_id, .. }
            | Self::VerdictReached { case_id, .. }
            | Self::AppealFiled { case_id, .. } => *case_id,
        }
    }
}

/// What a notification collaborator needs to report a resolved case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictAnnouncement {
    pub case_id: CaseId,
    pub case_type: String,
    pub winner: VerdictWinner,
    pub plaintiff_votes: u32,
    pub defendant_votes: u32,
    /// Archive meter at resolution
    pub final_health: Health,
    pub summary: String,
    pub plaintiff: Party,
    pub defendant: Party,
    pub sanction: Sanction,
    pub headline: String,
}

pub(crate) fn headline(
    case_type: &str,
    plaintiff: &Party,
    defendant: &Party,
    verdict: &FinalVerdict,
) -> String {
    let tally = format!("{}-{}", verdict.plaintiff_votes, verdict.defendant_votes);
    match verdict.winner {
        VerdictWinner::Plaintiff => format!(
            "VERDICT: {} prevails over {} {} in {}",
            plaintiff.username, defendant.username, tally, case_type
        ),
        VerdictWinner::Defendant => format!(
            "VERDICT: {} cleared of {}'s claim {} in {}",
            defendant.username, plaintiff.username, tally, case_type
        ),
        VerdictWinner::Split => format!(
            "SPLIT PANEL: {} vs {} ends {} in {}",
            plaintiff.username, defendant.username, tally, case_type
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_event_tagging() {
        let event = CourtEvent::RoundCompleted {
            case_id: Uuid::nil(),
            round: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "round_completed");
        assert_eq!(json["round"], 2);

        let back: CourtEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.case_id(), Uuid::nil());
    }

    #[test]
    fn test_headline_tally() {
        let verdict = FinalVerdict {
            winner: VerdictWinner::Plaintiff,
            plaintiff_votes: 5,
            defendant_votes: 1,
            total_votes: 6,
            confidence: 0.8,
            is_unanimous: false,
            margin: 4,
            appeal_allowed: false,
        };
        let text = headline("Exploit Theft", &Party::new("Alice"), &Party::new("Bob"), &verdict);
        assert_eq!(text, "VERDICT: Alice prevails over Bob 5-1 in Exploit Theft");
    }
}
