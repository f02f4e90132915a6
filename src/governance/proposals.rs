//! Append-only proposal storage.
//!
//! Ids are vector indices: contiguous from 0, never reused, never removed.
//! The only mutation after `append` is the one-way `executed` flag.

use serde::{Deserialize, Serialize};

use crate::foundation::error::{GovernorError, GovernorResult};
use crate::foundation::types::{Proposal, ProposalId};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalStore {
    proposals: Vec<Proposal>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new proposal and return its id.
    pub fn append(&mut self, proposal: Proposal) -> ProposalId {
        let id = self.proposals.len() as ProposalId;
        self.proposals.push(proposal);
        id
    }

    pub fn get(&self, id: ProposalId) -> GovernorResult<&Proposal> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.proposals.get(idx))
            .ok_or(GovernorError::OutOfRange {
                id,
                count: self.count(),
            })
    }

    /// Flip `executed` to true. The caller has already rejected executed
    /// proposals.
    pub fn mark_executed(&mut self, id: ProposalId) -> GovernorResult<()> {
        let count = self.count();
        let proposal = usize::try_from(id)
            .ok()
            .and_then(|idx| self.proposals.get_mut(idx))
            .ok_or(GovernorError::OutOfRange { id, count })?;
        debug_assert!(!proposal.executed, "mark_executed on executed proposal");
        proposal.executed = true;
        Ok(())
    }

    /// Undo `mark_executed`. Used only by rollback.
    pub(crate) fn unmark_executed(&mut self, id: ProposalId) -> GovernorResult<()> {
        let count = self.count();
        let proposal = usize::try_from(id)
            .ok()
            .and_then(|idx| self.proposals.get_mut(idx))
            .ok_or(GovernorError::OutOfRange { id, count })?;
        proposal.executed = false;
        Ok(())
    }

    /// Undo the latest `append`. Used only by rollback.
    pub(crate) fn pop(&mut self) -> Option<Proposal> {
        self.proposals.pop()
    }

    pub fn count(&self) -> u64 {
        self.proposals.len() as u64
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProposalId, &Proposal)> {
        self.proposals
            .iter()
            .enumerate()
            .map(|(idx, p)| (idx as ProposalId, p))
    }
}
