//! Quorum fraction: mirrors GovernorVotesQuorumFraction.
//!
//! Required participation is `floor(supply * quorum_bp / 10_000)`, computed
//! in integers without forming the full product so large supplies cannot
//! overflow. Truncation is toward zero, same as the plain product-then-divide
//! form.

use serde::{Deserialize, Serialize};

use crate::foundation::config::{BPS_DENOMINATOR, QUORUM_BP};
use crate::foundation::error::{GovernorError, GovernorResult};
use crate::foundation::types::Weight;

/// Quorum required for a given supply snapshot.
///
/// `floor(s * bp / D) == (s / D) * bp + ((s % D) * bp) / D` exactly, and the
/// second product stays below `D * bp`.
pub fn quorum(supply_snapshot: Weight, quorum_bp: u32) -> Weight {
    let denominator = BPS_DENOMINATOR as Weight;
    let bp = quorum_bp as Weight;
    let whole = (supply_snapshot / denominator).saturating_mul(bp);
    let fraction = (supply_snapshot % denominator) * bp / denominator;
    whole.saturating_add(fraction)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumPolicy {
    quorum_bp: u32,
}

impl Default for QuorumPolicy {
    fn default() -> Self {
        QuorumPolicy { quorum_bp: QUORUM_BP }
    }
}

impl QuorumPolicy {
    pub fn new(quorum_bp: u32) -> Self {
        QuorumPolicy { quorum_bp }
    }

    pub fn quorum_bp(&self) -> u32 {
        self.quorum_bp
    }

    pub fn required(&self, supply_snapshot: Weight) -> Weight {
        quorum(supply_snapshot, self.quorum_bp)
    }

    /// Fails with `QuorumNotReached` unless `yes + no` meets the threshold.
    pub fn check_quorum(&self, yes: Weight, no: Weight, supply_snapshot: Weight) -> GovernorResult<()> {
        let participation = yes.saturating_add(no);
        let required = self.required(supply_snapshot);
        if participation < required {
            return Err(GovernorError::QuorumNotReached {
                participation,
                required,
            });
        }
        Ok(())
    }
}
