//! Deliberation settings
//!
//! Environment variables:
//! - `COURT_MAX_ROUNDS` (default 6)
//! - `COURT_DAMAGE_FACTOR` (default 0.3)
//! - `COURT_LIVE_FLOOR` (default 10)
//! - `COURT_MAJORITY` (default 4)
//! - `COURT_JUDGE_CONCURRENCY` (default 6)
//! - `COURT_GENERATION_TIMEOUT_SECS` (default 60)

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use court_llm::ConfigError;

/// Upper bound on rounds per case
pub const MAX_ROUNDS_LIMIT: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourtConfig {
    /// Rounds per case; each round is one plaintiff and one defendant argument
    pub max_rounds: u32,
    /// Multiplier from mean score difference to credibility damage
    pub damage_factor: f64,
    /// Lower clamp for the live meter (the archive meter clamps at 0)
    pub live_floor: u8,
    /// Votes needed to win outright
    pub majority: u32,
    /// Judges evaluated at once during deliberation
    pub judge_concurrency: usize,
    /// Guard on every text-generation call
    pub generation_timeout_secs: u64,
}

impl Default for CourtConfig {
    fn default() -> Self {
        Self {
            max_rounds: 6,
            damage_factor: 0.3,
            live_floor: 10,
            majority: 4,
            judge_concurrency: 6,
            generation_timeout_secs: 60,
        }
    }
}

impl CourtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            max_rounds: parse_or(&lookup, "COURT_MAX_ROUNDS", defaults.max_rounds)?,
            damage_factor: parse_or(&lookup, "COURT_DAMAGE_FACTOR", defaults.damage_factor)?,
            live_floor: parse_or(&lookup, "COURT_LIVE_FLOOR", defaults.live_floor)?,
            majority: parse_or(&lookup, "COURT_MAJORITY", defaults.majority)?,
            judge_concurrency: parse_or(
                &lookup,
                "COURT_JUDGE_CONCURRENCY",
                defaults.judge_concurrency,
            )?,
            generation_timeout_secs: parse_or(
                &lookup,
                "COURT_GENERATION_TIMEOUT_SECS",
                defaults.generation_timeout_secs,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == 0 || self.max_rounds > MAX_ROUNDS_LIMIT {
            return Err(invalid(format!(
                "max_rounds must be between 1 and {}, got {}",
                MAX_ROUNDS_LIMIT, self.max_rounds
            )));
        }
        if !self.damage_factor.is_finite() || self.damage_factor < 0.0 {
            return Err(invalid(format!(
                "damage_factor must be finite and non-negative, got {}",
                self.damage_factor
            )));
        }
        if self.live_floor > court_core::MAX_HEALTH {
            return Err(invalid(format!(
                "live_floor must be at most {}, got {}",
                court_core::MAX_HEALTH,
                self.live_floor
            )));
        }
        if self.majority == 0 {
            return Err(invalid("majority must be at least 1".to_string()));
        }
        if self.judge_concurrency == 0 {
            return Err(invalid("judge_concurrency must be at least 1".to_string()));
        }
        if self.generation_timeout_secs == 0 {
            return Err(invalid("generation timeout must be at least 1s".to_string()));
        }
        Ok(())
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::Invalid(msg)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| invalid(format!("{} has unparseable value '{}'", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CourtConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, CourtConfig::default());
        assert_eq!(config.generation_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_overrides_and_errors() {
        let config = CourtConfig::from_lookup(|k| match k {
            "COURT_MAX_ROUNDS" => Some("3".into()),
            "COURT_DAMAGE_FACTOR" => Some("0.5".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.max_rounds, 3);
        assert_eq!(config.damage_factor, 0.5);

        let err = CourtConfig::from_lookup(|k| (k == "COURT_MAX_ROUNDS").then(|| "0".into()));
        assert!(matches!(err, Err(ConfigError::Invalid(_))));

        let err = CourtConfig::from_lookup(|k| (k == "COURT_LIVE_FLOOR").then(|| "ten".into()));
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }
}
