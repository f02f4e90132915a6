//! Simple counting: mirrors GovernorCountingSimple without abstain.
//!
//! Two options: For and Against. Each ledger entry carries the yes/no
//! accumulators, the total-supply snapshot captured at creation (the quorum
//! denominator) and one receipt per voter. Entries are 1:1 with proposals.
//!
//! Vote succeeds when `yes > no`. Quorum counts `yes + no`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{GovernorError, GovernorResult};
use crate::foundation::types::{AccountId, ProposalId, Support, Tally, VoteReceipt, Weight};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct LedgerEntry {
    tally: Tally,
    receipts: BTreeMap<AccountId, VoteReceipt>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteLedger {
    entries: Vec<LedgerEntry>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the entry for a freshly created proposal. `id` must be the next
    /// slot so the ledger stays aligned with the proposal store.
    pub fn initialize(&mut self, id: ProposalId, supply_snapshot: Weight) -> GovernorResult<()> {
        let entries = self.len();
        if id != entries {
            return Err(GovernorError::LedgerOutOfSync { id, entries });
        }
        self.entries.push(LedgerEntry {
            tally: Tally {
                yes: 0,
                no: 0,
                supply_snapshot,
            },
            receipts: BTreeMap::new(),
        });
        Ok(())
    }

    /// Add `weight` to one side. Zero weight leaves the tally unchanged.
    /// On overflow nothing is written.
    pub fn add_vote(&mut self, id: ProposalId, weight: Weight, support: Support) -> GovernorResult<()> {
        let entry = self.entry_mut(id)?;
        let side = match support {
            Support::For => &mut entry.tally.yes,
            Support::Against => &mut entry.tally.no,
        };
        *side = side.checked_add(weight).ok_or(GovernorError::Overflow)?;
        Ok(())
    }

    /// Record that `voter` has voted. Fails if a receipt already exists.
    pub fn mark_voted(&mut self, id: ProposalId, voter: AccountId, receipt: VoteReceipt) -> GovernorResult<()> {
        let entry = self.entry_mut(id)?;
        if entry.receipts.contains_key(&voter) {
            return Err(GovernorError::AlreadyVoted { id, voter });
        }
        entry.receipts.insert(voter, receipt);
        Ok(())
    }

    /// Count a vote and write its receipt as one step: either both land or
    /// neither does.
    pub fn record_vote(
        &mut self,
        id: ProposalId,
        voter: AccountId,
        weight: Weight,
        support: Support,
    ) -> GovernorResult<()> {
        if self.has_voted(id, &voter) {
            return Err(GovernorError::AlreadyVoted { id, voter });
        }
        self.add_vote(id, weight, support)?;
        self.mark_voted(id, voter, VoteReceipt { support, weight })
    }

    /// Undo a `record_vote`. Used only by rollback.
    pub(crate) fn retract_vote(
        &mut self,
        id: ProposalId,
        voter: &AccountId,
        weight: Weight,
        support: Support,
    ) -> GovernorResult<()> {
        let entry = self.entry_mut(id)?;
        let side = match support {
            Support::For => &mut entry.tally.yes,
            Support::Against => &mut entry.tally.no,
        };
        *side = side.checked_sub(weight).ok_or(GovernorError::Overflow)?;
        entry.receipts.remove(voter);
        Ok(())
    }

    /// Undo the latest `initialize`. Used only by rollback.
    pub(crate) fn pop(&mut self) {
        self.entries.pop();
    }

    pub fn tally(&self, id: ProposalId) -> GovernorResult<Tally> {
        self.entry(id).map(|entry| entry.tally)
    }

    pub fn has_voted(&self, id: ProposalId, voter: &AccountId) -> bool {
        self.entry(id)
            .map(|entry| entry.receipts.contains_key(voter))
            .unwrap_or(false)
    }

    pub fn receipt(&self, id: ProposalId, voter: &AccountId) -> Option<VoteReceipt> {
        self.entry(id).ok()?.receipts.get(voter).copied()
    }

    /// Number of voters on a proposal.
    pub fn voter_count(&self, id: ProposalId) -> GovernorResult<usize> {
        self.entry(id).map(|entry| entry.receipts.len())
    }

    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recompute tallies from receipts and compare with the accumulators.
    pub(crate) fn verify_entry(&self, id: ProposalId) -> GovernorResult<()> {
        let entry = self.entry(id)?;
        let mut yes: Weight = 0;
        let mut no: Weight = 0;
        for receipt in entry.receipts.values() {
            let side = match receipt.support {
                Support::For => &mut yes,
                Support::Against => &mut no,
            };
            *side = side.checked_add(receipt.weight).ok_or(GovernorError::Overflow)?;
        }
        if yes != entry.tally.yes || no != entry.tally.no {
            return Err(GovernorError::CorruptState(format!(
                "proposal {} tally ({}, {}) disagrees with receipts ({}, {})",
                id, entry.tally.yes, entry.tally.no, yes, no
            )));
        }
        Ok(())
    }

    fn entry(&self, id: ProposalId) -> GovernorResult<&LedgerEntry> {
        let count = self.len();
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.entries.get(idx))
            .ok_or(GovernorError::OutOfRange { id, count })
    }

    fn entry_mut(&mut self, id: ProposalId) -> GovernorResult<&mut LedgerEntry> {
        let count = self.len();
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.entries.get_mut(idx))
            .ok_or(GovernorError::OutOfRange { id, count })
    }
}
