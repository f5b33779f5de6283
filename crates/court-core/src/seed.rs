//! Reproducible entropy for scoring and fallback content
//!
//! Every random draw in the engine comes from a [`DeliberationSeed`], a SHA-256
//! digest of the inputs that identify the draw. Same inputs, same numbers.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

use crate::argument::Role;
use crate::case::CaseId;

/// 32-byte seed derived from case, actor and round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeliberationSeed([u8; 32]);

impl DeliberationSeed {
    /// Seed for one judge's evaluation of a case at a round
    pub fn for_evaluation(case_id: &CaseId, judge_id: &str, round: u32) -> Self {
        Self::derive(b"court/evaluation", case_id, judge_id.as_bytes(), round)
    }

    /// Seed for a fallback argument
    pub fn for_argument(case_id: &CaseId, role: Role, round: u32) -> Self {
        Self::derive(b"court/argument", case_id, role.as_str().as_bytes(), round)
    }

    fn derive(domain: &[u8], case_id: &CaseId, actor: &[u8], round: u32) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        hasher.update([0u8]);
        hasher.update(case_id.as_bytes());
        // Length prefix keeps ("ab", 1) and ("a", ...) from colliding
        hasher.update((actor.len() as u32).to_le_bytes());
        hasher.update(actor);
        hasher.update(round.to_le_bytes());
        Self(hasher.finalize().into())
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Fresh RNG positioned at the start of this seed's stream
    pub fn rng(&self) -> StdRng {
        StdRng::from_seed(self.0)
    }

    /// Short hex form for logs
    pub fn fingerprint(&self) -> String {
        hex::encode(&self.0[..8])
    }
}
