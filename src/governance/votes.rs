//! Voting power source: the GovernorVotes seam.
//!
//! The engine never holds balances. It asks a `VotePowerOracle` for an
//! account's power and the total supply at a historical snapshot. Answers
//! for a given snapshot must never change, which is what makes votes immune
//! to token movement after a proposal is created.

use std::rc::Rc;

use crate::foundation::config::SNAPSHOT_LAG;
use crate::foundation::types::{AccountId, Timepoint, Weight};

/// Point-in-time voting power. Mirrors `IVotes.getPastVotes` /
/// `getPastTotalSupply`.
pub trait VotePowerOracle {
    /// Voting power `account` held at `snapshot`.
    fn voting_power_at(&self, account: &AccountId, snapshot: Timepoint) -> Weight;

    /// Total supply at `snapshot`. Quorum denominator.
    fn total_supply_at(&self, snapshot: Timepoint) -> Weight;
}

impl<T: VotePowerOracle + ?Sized> VotePowerOracle for Rc<T> {
    fn voting_power_at(&self, account: &AccountId, snapshot: Timepoint) -> Weight {
        (**self).voting_power_at(account, snapshot)
    }

    fn total_supply_at(&self, snapshot: Timepoint) -> Weight {
        (**self).total_supply_at(snapshot)
    }
}

impl<T: VotePowerOracle + ?Sized> VotePowerOracle for Box<T> {
    fn voting_power_at(&self, account: &AccountId, snapshot: Timepoint) -> Weight {
        (**self).voting_power_at(account, snapshot)
    }

    fn total_supply_at(&self, snapshot: Timepoint) -> Weight {
        (**self).total_supply_at(snapshot)
    }
}

/// Latest snapshot that is final at `now`: one unit behind the current time.
pub fn latest_finalized_snapshot(now: Timepoint) -> Timepoint {
    now.saturating_sub(SNAPSHOT_LAG)
}
