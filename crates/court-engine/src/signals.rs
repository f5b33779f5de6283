//! Text heuristics used by the rubric scorer, and the content policy

use once_cell::sync::Lazy;
use regex::Regex;

use court_core::{Argument, CourtError, CourtResult, Role};

static GAME_VOCABULARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(health|hp|damage|game|win|lose)\b")
        .expect("GAME_VOCABULARY regex should compile")
});

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d[\d,.:/-]*\b").expect("NUMBER regex should compile"));

/// First game-mechanics word in `content`, if any
pub fn policy_violation(content: &str) -> Option<String> {
    GAME_VOCABULARY
        .find(content)
        .map(|m| m.as_str().to_lowercase())
}

/// Reject content that talks about game mechanics
pub fn check_policy(content: &str) -> CourtResult<()> {
    match policy_violation(content) {
        Some(word) => Err(CourtError::validation(format!(
            "argument mentions game vocabulary ('{}')",
            word
        ))),
        None => Ok(()),
    }
}

/// Keyword families each side tends to lean on
struct SideVocabulary {
    evidence: &'static [&'static str],
    technical: &'static [&'static str],
    logic: &'static [&'static str],
}

const PLAINTIFF_VOCABULARY: SideVocabulary = SideVocabulary {
    evidence: &["blockchain", "timestamp", "proof"],
    technical: &["code", "technical", "exploit"],
    logic: &["timeline", "pattern", "document"],
};

const DEFENDANT_VOCABULARY: SideVocabulary = SideVocabulary {
    evidence: &["logs", "audit", "research"],
    technical: &["method", "analysis", "implementation"],
    logic: &["independent", "zero", "coincidence"],
};

const REBUTTAL_MARKERS: &[&str] = &[
    "however",
    "contrary",
    "my opponent",
    "opposing counsel",
    "the plaintiff",
    "the defendant",
    "fails to",
    "does not explain",
];

const CAUSAL_MARKERS: &[&str] = &["because", "therefore", "which shows", "as a result", "leads to"];

const LOADED_LANGUAGE: &[&str] = &[
    "obviously",
    "clearly",
    "undeniable",
    "definitely",
    "absolutely",
    "everyone knows",
];

/// What one side's arguments contain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgumentSignals {
    pub evidence_hits: u32,
    pub technical_hits: u32,
    pub logic_hits: u32,
    /// Numbers, dates and other concrete figures
    pub specifics: u32,
    pub rebuttals: u32,
    pub causal_links: u32,
    pub loaded_terms: u32,
    pub words: u32,
}

impl ArgumentSignals {
    /// Scan every argument posted by `role`
    pub fn analyze(role: Role, arguments: &[Argument]) -> Self {
        let vocabulary = match role {
            Role::Plaintiff => &PLAINTIFF_VOCABULARY,
            Role::Defendant => &DEFENDANT_VOCABULARY,
        };

        let mut signals = Self::default();
        for argument in arguments.iter().filter(|a| a.role == role) {
            let text = argument.content.to_lowercase();
            signals.evidence_hits += count_terms(&text, vocabulary.evidence);
            signals.technical_hits += count_terms(&text, vocabulary.technical);
            signals.logic_hits += count_terms(&text, vocabulary.logic);
            signals.rebuttals += count_terms(&text, REBUTTAL_MARKERS);
            signals.causal_links += count_terms(&text, CAUSAL_MARKERS);
            signals.loaded_terms += count_terms(&text, LOADED_LANGUAGE);
            signals.specifics += NUMBER.find_iter(&text).count() as u32;
            signals.words += text.split_whitespace().count() as u32;
        }
        signals
    }

    /// Hits from an arbitrary vocabulary over the same arguments
    pub fn vocabulary_hits(role: Role, arguments: &[Argument], vocabulary: &[&str]) -> u32 {
        arguments
            .iter()
            .filter(|a| a.role == role)
            .map(|a| count_terms(&a.content.to_lowercase(), vocabulary))
            .sum()
    }
}

/// Distinct terms present (each term counts once per text)
fn count_terms(text: &str, terms: &[&str]) -> u32 {
    terms.iter().filter(|t| text.contains(*t)).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_matches_whole_words_only() {
        assert_eq!(
            policy_violation("They will lose the case."),
            Some("lose".to_string())
        );
        assert_eq!(policy_violation("HP dropped"), Some("hp".to_string()));
        assert!(policy_violation("The window shows a winner-takes-all rule.").is_none());
        assert!(policy_violation("Their gameplay notes").is_none());
        assert!(check_policy("We ask the panel to weigh the evidence.").is_ok());
        assert!(check_policy("This is just a game to them.").is_err());
    }

    #[test]
    fn test_analyze_counts_side_vocabulary() {
        let args = vec![
            Argument::new(
                Role::Plaintiff,
                1,
                "The blockchain timestamp from 2024-03-01 is proof. However the defendant fails to explain the timeline.",
                0.8,
            ),
            Argument::new(
                Role::Defendant,
                1,
                "Our audit logs show independent research. Obviously this is coincidence.",
                0.8,
            ),
        ];

        let p = ArgumentSignals::analyze(Role::Plaintiff, &args);
        assert_eq!(p.evidence_hits, 3);
        assert_eq!(p.logic_hits, 1);
        assert!(p.rebuttals >= 2);
        assert!(p.specifics >= 1);

        let d = ArgumentSignals::analyze(Role::Defendant, &args);
        assert_eq!(d.evidence_hits, 3);
        assert_eq!(d.logic_hits, 2);
        assert_eq!(d.loaded_terms, 1);
    }
}
