//! Credibility meters

use serde::{Deserialize, Serialize};

use crate::argument::Role;

/// Full credibility
pub const MAX_HEALTH: u8 = 100;

/// Per-side credibility, both sides start full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Health {
    pub plaintiff: u8,
    pub defendant: u8,
}

impl Default for Health {
    fn default() -> Self {
        Self::full()
    }
}

impl Health {
    pub fn full() -> Self {
        Self {
            plaintiff: MAX_HEALTH,
            defendant: MAX_HEALTH,
        }
    }

    pub fn get(&self, role: Role) -> u8 {
        match role {
            Role::Plaintiff => self.plaintiff,
            Role::Defendant => self.defendant,
        }
    }

    /// Apply a delta, keeping both sides within [floor, 100]
    pub fn apply(&self, delta: &HealthDelta, floor: u8) -> Health {
        let floor = floor.min(MAX_HEALTH);
        let mut next = *self;
        if let Some(target) = delta.target {
            let current = next.get(target);
            let value = current.saturating_sub(delta.damage).max(floor);
            match target {
                Role::Plaintiff => next.plaintiff = value,
                Role::Defendant => next.defendant = value,
            }
        }
        next.plaintiff = next.plaintiff.clamp(floor, MAX_HEALTH);
        next.defendant = next.defendant.clamp(floor, MAX_HEALTH);
        next
    }
}

/// Credibility change produced by one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDelta {
    /// Judge whose evaluation produced the delta
    pub judge_id: String,
    /// Side losing credibility; `None` when the means were equal
    pub target: Option<Role>,
    /// Points removed from the target
    pub damage: u8,
    /// mean(plaintiff) - mean(defendant) for the evaluation
    pub score_diff: f64,
}

impl HealthDelta {
    pub fn none(judge_id: &str) -> Self {
        Self {
            judge_id: judge_id.to_string(),
            target: None,
            damage: 0,
            score_diff: 0.0,
        }
    }
}
