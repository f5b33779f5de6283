//! Judge identities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scoring archetype of a judge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JudgeBias {
    /// Code quality, specificity
    Technical,
    /// Community dynamics, reputation
    Community,
    /// Blockchain data, timestamps
    OnChain,
    /// Rules and precedent
    Governance,
    /// Results and impact
    Merit,
    /// Methodology and procedure
    Protocol,
}

impl JudgeBias {
    pub fn as_str(self) -> &'static str {
        match self {
            JudgeBias::Technical => "technical",
            JudgeBias::Community => "community",
            JudgeBias::OnChain => "on-chain",
            JudgeBias::Governance => "governance",
            JudgeBias::Merit => "merit",
            JudgeBias::Protocol => "protocol",
        }
    }
}

impl fmt::Display for JudgeBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A judge on the panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeProfile {
    /// Stable lowercase identifier (e.g. "portdev")
    pub id: String,
    /// Display name
    pub name: String,
    pub bias: JudgeBias,
    /// Short title (e.g. "Technical Architect")
    pub title: String,
    /// Persona text used in prompts
    pub personality: String,
    pub catchphrase: String,
    /// Multiplier on the credibility damage this judge deals
    pub weight: f64,
}

impl JudgeProfile {
    pub fn new(id: &str, name: &str, bias: JudgeBias) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            bias,
            title: String::new(),
            personality: String::new(),
            catchphrase: String::new(),
            weight: 1.0,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_personality(mut self, personality: &str) -> Self {
        self.personality = personality.to_string();
        self
    }

    pub fn with_catchphrase(mut self, catchphrase: &str) -> Self {
        self.catchphrase = catchphrase.to_string();
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}
