//! Credibility damage from judge evaluations

use serde::{Deserialize, Serialize};

use court_core::{Health, HealthDelta, JudgeEvaluation, Role, MAX_HEALTH};

use crate::config::CourtConfig;

/// Live (display) and archive (record) meters, fed the same deltas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CredibilityMeters {
    /// Clamped to [live_floor, 100]
    pub live: Health,
    /// Clamped to [0, 100]
    pub archive: Health,
}

/// Turns evaluations into damage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthModel {
    pub damage_factor: f64,
    pub live_floor: u8,
}

impl Default for HealthModel {
    fn default() -> Self {
        Self::from_config(&CourtConfig::default())
    }
}

impl HealthModel {
    pub fn new(damage_factor: f64, live_floor: u8) -> Self {
        Self {
            damage_factor,
            live_floor: live_floor.min(MAX_HEALTH),
        }
    }

    pub fn from_config(config: &CourtConfig) -> Self {
        Self::new(config.damage_factor, config.live_floor)
    }

    /// round(|diff| * damage_factor * weight) against the lower-scoring side
    pub fn delta(&self, evaluation: &JudgeEvaluation) -> HealthDelta {
        let diff = evaluation.scores.mean_difference();
        if diff == 0.0 {
            return HealthDelta::none(&evaluation.judge_id);
        }

        let target = if diff > 0.0 {
            Role::Defendant
        } else {
            Role::Plaintiff
        };
        let raw = (diff.abs() * self.damage_factor * evaluation.weight).round();
        let damage = if raw.is_finite() {
            raw.clamp(0.0, f64::from(MAX_HEALTH)) as u8
        } else {
            0
        };

        HealthDelta {
            judge_id: evaluation.judge_id.clone(),
            target: Some(target),
            damage,
            score_diff: diff,
        }
    }

    /// Apply one evaluation to both meters
    pub fn apply(
        &self,
        meters: &CredibilityMeters,
        evaluation: &JudgeEvaluation,
    ) -> (CredibilityMeters, HealthDelta) {
        let delta = self.delta(evaluation);
        let next = CredibilityMeters {
            live: meters.live.apply(&delta, self.live_floor),
            archive: meters.archive.apply(&delta, 0),
        };
        (next, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use court_core::{AxisScores, JudgeBias, JudgeProfile, ScoreSheet};

    fn eval(p: u8, d: u8, weight: f64) -> JudgeEvaluation {
        let judge = JudgeProfile::new("harpal", "Harpal", JudgeBias::Merit).with_weight(weight);
        JudgeEvaluation::new(
            &judge,
            1,
            ScoreSheet::new(AxisScores::uniform(p), AxisScores::uniform(d)),
            "",
        )
    }

    #[test]
    fn test_delta_targets_lower_side() {
        let model = HealthModel::default();
        let delta = model.delta(&eval(80, 70, 1.0));
        assert_eq!(delta.target, Some(Role::Defendant));
        assert_eq!(delta.damage, 3);

        let delta = model.delta(&eval(60, 80, 1.0));
        assert_eq!(delta.target, Some(Role::Plaintiff));
        assert_eq!(delta.damage, 6);
    }

    #[test]
    fn test_equal_means_do_nothing() {
        let (meters, delta) = HealthModel::default().apply(&CredibilityMeters::default(), &eval(75, 75, 1.0));
        assert_eq!(delta.target, None);
        assert_eq!(meters, CredibilityMeters::default());
    }

    #[test]
    fn test_weight_scales_damage() {
        let model = HealthModel::default();
        assert_eq!(model.delta(&eval(80, 70, 2.0)).damage, 6);
        assert_eq!(model.delta(&eval(80, 70, 0.0)).damage, 0);
    }

    #[test]
    fn test_live_and_archive_floors_differ() {
        let model = HealthModel::default();
        let mut meters = CredibilityMeters::default();
        for _ in 0..4 {
            meters = model.apply(&meters, &eval(100, 0, 1.0)).0;
        }
        assert_eq!(meters.live.defendant, 10);
        assert_eq!(meters.archive.defendant, 0);
        assert_eq!(meters.live.plaintiff, 100);
    }
}
