//! Gate chains run before creation and before execution.
//!
//! Each policy sees a read-only view of the state and either passes or
//! rejects. The chain runs policies in insertion order and stops at the
//! first rejection. The standard chain is the access gate (pre-create) and
//! the quorum gate (pre-execute); embedders may append their own.

use tracing::debug;

use crate::foundation::error::GovernorResult;
use crate::foundation::types::{AccountId, Proposal, ProposalId, Tally, Timepoint};
use crate::governance::quorum::QuorumPolicy;
use crate::governance::state::GovernorState;

/// A proposal about to be created.
#[derive(Clone, Copy, Debug)]
pub struct CreateRequest<'a> {
    pub proposer: AccountId,
    pub target: AccountId,
    pub payload: &'a [u8],
    pub now: Timepoint,
}

/// A proposal about to be executed, with its final tally.
#[derive(Clone, Copy, Debug)]
pub struct ExecuteRequest<'a> {
    pub id: ProposalId,
    pub proposal: &'a Proposal,
    pub tally: Tally,
    pub now: Timepoint,
}

pub trait GovernancePolicy {
    fn name(&self) -> &'static str;

    fn before_create(&self, _state: &GovernorState, _request: &CreateRequest<'_>) -> GovernorResult<()> {
        Ok(())
    }

    fn before_execute(&self, _state: &GovernorState, _request: &ExecuteRequest<'_>) -> GovernorResult<()> {
        Ok(())
    }
}

/// Whitelist / self-operation gate backed by the state's access policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessGate;

impl GovernancePolicy for AccessGate {
    fn name(&self) -> &'static str {
        "access"
    }

    fn before_create(&self, state: &GovernorState, request: &CreateRequest<'_>) -> GovernorResult<()> {
        state.access().check_access(&request.target, request.payload)
    }
}

impl GovernancePolicy for QuorumPolicy {
    fn name(&self) -> &'static str {
        "quorum"
    }

    fn before_execute(&self, _state: &GovernorState, request: &ExecuteRequest<'_>) -> GovernorResult<()> {
        self.check_quorum(request.tally.yes, request.tally.no, request.tally.supply_snapshot)
    }
}

#[derive(Default)]
pub struct PolicyChain {
    policies: Vec<Box<dyn GovernancePolicy>>,
}

impl PolicyChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Access gate followed by the quorum gate.
    pub fn standard(quorum: QuorumPolicy) -> Self {
        let mut chain = Self::new();
        chain.push(AccessGate);
        chain.push(quorum);
        chain
    }

    pub fn push(&mut self, policy: impl GovernancePolicy + 'static) {
        self.policies.push(Box::new(policy));
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.policies.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn run_before_create(&self, state: &GovernorState, request: &CreateRequest<'_>) -> GovernorResult<()> {
        for policy in &self.policies {
            policy.before_create(state, request).inspect_err(|err| {
                debug!(policy = policy.name(), error = %err, "create gate rejected");
            })?;
        }
        Ok(())
    }

    pub fn run_before_execute(&self, state: &GovernorState, request: &ExecuteRequest<'_>) -> GovernorResult<()> {
        for policy in &self.policies {
            policy.before_execute(state, request).inspect_err(|err| {
                debug!(policy = policy.name(), id = request.id, error = %err, "execute gate rejected");
            })?;
        }
        Ok(())
    }
}
