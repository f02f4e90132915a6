//! Audit-trail events.
//!
//! Events are part of engine state: an execution that rolls back also drops
//! every event emitted while it ran.

use serde::{Deserialize, Serialize};

use crate::foundation::types::{AccountId, DescriptionHash, ProposalId, Support, Weight};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernorEvent {
    ProposalCreated {
        id: ProposalId,
        proposer: AccountId,
        description_hash: DescriptionHash,
    },
    Voted {
        id: ProposalId,
        voter: AccountId,
        support: Support,
        weight: Weight,
    },
    Executed {
        id: ProposalId,
    },
    TargetAllowed {
        target: AccountId,
    },
    TargetDisallowed {
        target: AccountId,
    },
}

impl GovernorEvent {
    /// Proposal the event belongs to, if any.
    pub fn proposal_id(&self) -> Option<ProposalId> {
        match self {
            GovernorEvent::ProposalCreated { id, .. }
            | GovernorEvent::Voted { id, .. }
            | GovernorEvent::Executed { id } => Some(*id),
            GovernorEvent::TargetAllowed { .. } | GovernorEvent::TargetDisallowed { .. } => None,
        }
    }
}
