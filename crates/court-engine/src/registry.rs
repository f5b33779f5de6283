//! The judging panel

use once_cell::sync::Lazy;
use std::collections::HashSet;

use court_core::{CourtError, CourtResult, JudgeBias, JudgeProfile};

static STANDARD: Lazy<JudgeRegistry> = Lazy::new(|| JudgeRegistry {
    judges: vec![
        JudgeProfile::new("portdev", "PortDev", JudgeBias::Technical)
            .with_title("Technical Architect")
            .with_personality("Technical evidence specialist")
            .with_catchphrase("Show me the code"),
        JudgeProfile::new("mikeweb", "MikeWeb", JudgeBias::Community)
            .with_title("Community Builder")
            .with_personality("Community impact assessor")
            .with_catchphrase("Community first"),
        JudgeProfile::new("keone", "Keone", JudgeBias::OnChain)
            .with_title("Blockchain Expert")
            .with_personality("On-chain data analyst")
            .with_catchphrase("On-chain never lies"),
        JudgeProfile::new("james", "James", JudgeBias::Governance)
            .with_title("Governance Lead")
            .with_personality("Governance precedent keeper")
            .with_catchphrase("Rules are rules"),
        JudgeProfile::new("harpal", "Harpal", JudgeBias::Merit)
            .with_title("Senior Developer")
            .with_personality("Merit-based evaluator")
            .with_catchphrase("Results speak"),
        JudgeProfile::new("anago", "Anago", JudgeBias::Protocol)
            .with_title("Protocol Researcher")
            .with_personality("Protocol adherence guardian")
            .with_catchphrase("Evidence or nothing"),
    ],
});

/// Ordered, read-only set of judges. Order is the commit order for evaluations.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeRegistry {
    judges: Vec<JudgeProfile>,
}

impl JudgeRegistry {
    /// The six-judge panel
    pub fn standard() -> &'static JudgeRegistry {
        &STANDARD
    }

    /// Custom panel; ids must be unique and weights finite and non-negative
    pub fn new(judges: Vec<JudgeProfile>) -> CourtResult<Self> {
        if judges.is_empty() {
            return Err(CourtError::validation("judge panel is empty"));
        }
        let mut seen = HashSet::new();
        for judge in &judges {
            if judge.id.trim().is_empty() {
                return Err(CourtError::validation("judge id is blank"));
            }
            if !seen.insert(judge.id.as_str()) {
                return Err(CourtError::validation(format!(
                    "duplicate judge id '{}'",
                    judge.id
                )));
            }
            if !judge.weight.is_finite() || judge.weight < 0.0 {
                return Err(CourtError::validation(format!(
                    "judge '{}' has invalid weight {}",
                    judge.id, judge.weight
                )));
            }
        }
        Ok(Self { judges })
    }

    pub fn get(&self, judge_id: &str) -> CourtResult<&JudgeProfile> {
        self.judges
            .iter()
            .find(|j| j.id == judge_id)
            .ok_or_else(|| CourtError::NotFound(format!("judge '{}'", judge_id)))
    }

    /// Registry position of a judge
    pub fn position(&self, judge_id: &str) -> Option<usize> {
        self.judges.iter().position(|j| j.id == judge_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &JudgeProfile> {
        self.judges.iter()
    }

    pub fn len(&self) -> usize {
        self.judges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.judges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_panel() {
        let registry = JudgeRegistry::standard();
        assert_eq!(registry.len(), 6);
        let keone = registry.get("keone").unwrap();
        assert_eq!(keone.bias, JudgeBias::OnChain);
        assert_eq!(keone.weight, 1.0);
        assert_eq!(registry.position("anago"), Some(5));
    }

    #[test]
    fn test_unknown_judge() {
        assert!(matches!(
            JudgeRegistry::standard().get("judy"),
            Err(CourtError::NotFound(_))
        ));
    }

    #[test]
    fn test_custom_panel_rejects_duplicates() {
        let judge = JudgeProfile::new("a", "A", JudgeBias::Merit);
        assert!(JudgeRegistry::new(vec![judge.clone(), judge]).is_err());
        assert!(JudgeRegistry::new(vec![]).is_err());
        assert!(JudgeRegistry::new(vec![
            JudgeProfile::new("b", "B", JudgeBias::Merit).with_weight(f64::NAN)
        ])
        .is_err());
    }
}
