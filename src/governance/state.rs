//! Everything the governor persists, in one value.
//!
//! Keeping the stores together lets the state encode as a single document.
//! While an execution runs, every mutation goes through this type and is
//! journaled, so a failed downstream call can be undone entry by entry
//! without copying the history.

use serde::{Deserialize, Serialize};

use crate::foundation::error::{GovernorError, GovernorResult};
use crate::foundation::types::{AccountId, Proposal, ProposalId, Support, Weight};
use crate::governance::access::AccessPolicy;
use crate::governance::counting::VoteLedger;
use crate::governance::events::GovernorEvent;
use crate::governance::proposals::ProposalStore;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorState {
    pub(crate) proposals: ProposalStore,
    pub(crate) ledger: VoteLedger,
    pub(crate) access: AccessPolicy,
    pub(crate) events: Vec<GovernorEvent>,
    #[serde(skip)]
    journal: Option<Journal>,
}

/// One reversible mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Undo {
    Opened,
    Voted { id: ProposalId, voter: AccountId, weight: Weight, support: Support },
    Executed(ProposalId),
    Allowed(AccountId),
    Disallowed(AccountId),
}

/// Mutations made since `begin_journal`, plus the event log length then.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Journal {
    events_len: usize,
    entries: Vec<Undo>,
}

impl GovernorState {
    /// Empty state for the governor at `engine`.
    pub fn new(engine: AccountId) -> Self {
        GovernorState {
            proposals: ProposalStore::new(),
            ledger: VoteLedger::new(),
            access: AccessPolicy::new(engine),
            events: Vec::new(),
            journal: None,
        }
    }

    pub fn proposals(&self) -> &ProposalStore {
        &self.proposals
    }

    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    pub fn access(&self) -> &AccessPolicy {
        &self.access
    }

    pub fn events(&self) -> &[GovernorEvent] {
        &self.events
    }

    pub fn engine(&self) -> AccountId {
        self.access.engine()
    }

    /// Append a proposal and open its ledger entry together.
    pub(crate) fn open_proposal(&mut self, proposal: Proposal, supply_snapshot: Weight) -> GovernorResult<ProposalId> {
        let next = self.proposals.count();
        if self.ledger.len() != next {
            return Err(GovernorError::LedgerOutOfSync {
                id: next,
                entries: self.ledger.len(),
            });
        }
        let id = self.proposals.append(proposal);
        if let Err(err) = self.ledger.initialize(id, supply_snapshot) {
            self.proposals.pop();
            return Err(err);
        }
        self.record(Undo::Opened);
        Ok(id)
    }

    pub(crate) fn record_vote(
        &mut self,
        id: ProposalId,
        voter: AccountId,
        weight: Weight,
        support: Support,
    ) -> GovernorResult<()> {
        self.ledger.record_vote(id, voter, weight, support)?;
        self.record(Undo::Voted { id, voter, weight, support });
        Ok(())
    }

    pub(crate) fn mark_executed(&mut self, id: ProposalId) -> GovernorResult<()> {
        self.proposals.mark_executed(id)?;
        self.record(Undo::Executed(id));
        Ok(())
    }

    pub(crate) fn allow(&mut self, caller: &AccountId, target: AccountId) -> GovernorResult<()> {
        if self.access.allow(caller, target)? {
            self.record(Undo::Allowed(target));
        }
        Ok(())
    }

    pub(crate) fn disallow(&mut self, caller: &AccountId, target: AccountId) -> GovernorResult<()> {
        self.access.disallow(caller, target)?;
        self.record(Undo::Disallowed(target));
        Ok(())
    }

    pub(crate) fn emit(&mut self, event: GovernorEvent) {
        self.events.push(event);
    }

    /// Start journaling mutations. Replaces any journal left open.
    pub(crate) fn begin_journal(&mut self) {
        self.journal = Some(Journal {
            events_len: self.events.len(),
            entries: Vec::new(),
        });
    }

    /// Keep every journaled mutation.
    pub(crate) fn commit_journal(&mut self) {
        self.journal = None;
    }

    /// Undo every journaled mutation, newest first, and drop the events
    /// emitted since `begin_journal`.
    pub(crate) fn rollback_journal(&mut self) -> GovernorResult<()> {
        let Some(journal) = self.journal.take() else {
            return Ok(());
        };
        for undo in journal.entries.into_iter().rev() {
            match undo {
                Undo::Opened => {
                    self.proposals.pop();
                    self.ledger.pop();
                }
                Undo::Voted { id, voter, weight, support } => {
                    self.ledger.retract_vote(id, &voter, weight, support)?;
                }
                Undo::Executed(id) => self.proposals.unmark_executed(id)?,
                Undo::Allowed(target) => self.access.revert_allow(&target),
                Undo::Disallowed(target) => self.access.revert_disallow(target),
            }
        }
        self.events.truncate(journal.events_len);
        Ok(())
    }

    fn record(&mut self, undo: Undo) {
        if let Some(journal) = self.journal.as_mut() {
            journal.entries.push(undo);
        }
    }

    /// Structural invariants: ledger aligned with proposals, tallies equal
    /// to their receipts, access policy intact.
    pub fn validate(&self) -> GovernorResult<()> {
        if self.ledger.len() != self.proposals.count() {
            return Err(GovernorError::CorruptState(format!(
                "{} ledger entries for {} proposals",
                self.ledger.len(),
                self.proposals.count()
            )));
        }
        for (id, _proposal) in self.proposals.iter() {
            self.ledger.verify_entry(id)?;
        }
        self.access.validate()
    }
}
