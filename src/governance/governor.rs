//! Governor core logic: the proposal lifecycle.
//!
//!   create_proposal() → vote() → execute()
//!
//! ## Proposal States
//!
//! Pending → Expired
//!         ↘ ExpiredApproved → Executed
//!
//! A proposal that never passes simply stays `Expired`; nothing is pruned.
//!
//! ## Execution Safety
//!
//! - Reentrancy guard held for the whole of `execute`
//! - `executed` written before the target is invoked
//! - Mutations journaled while the target runs and undone if it fails, so
//!   a failed execution leaves no trace (flag, nested votes, nested
//!   proposals, events)
//!
//! ## Whitelist Administration
//!
//! `allow` / `disallow` succeed only inside the self-call dispatch of an
//! executing proposal that targets the governor. Presenting the governor's
//! identity as caller is not enough.

use std::cell::{Ref, RefCell};

use tracing::{debug, info, warn};

use crate::foundation::config::GovernorConfig;
use crate::foundation::data::{decode_state, encode_state};
use crate::foundation::error::{GovernorError, GovernorResult};
use crate::foundation::types::*;
use crate::governance::calldata::SelfCall;
use crate::governance::events::GovernorEvent;
use crate::governance::guard::ReentrancyGuard;
use crate::governance::policy::{CreateRequest, ExecuteRequest, GovernancePolicy, PolicyChain};
use crate::governance::quorum::QuorumPolicy;
use crate::governance::state::GovernorState;
use crate::governance::targets::{CallTarget, Invocation, TargetRegistry};
use crate::governance::votes::{latest_finalized_snapshot, VotePowerOracle};

pub struct Governor {
    config: GovernorConfig,
    state: RefCell<GovernorState>,
    oracle: Box<dyn VotePowerOracle>,
    targets: TargetRegistry,
    policies: PolicyChain,
    guard: ReentrancyGuard,
    self_dispatch: ReentrancyGuard,
}

impl Governor {
    /// Governor at identity `engine` with an empty whitelist.
    pub fn new(
        engine: AccountId,
        config: GovernorConfig,
        oracle: impl VotePowerOracle + 'static,
    ) -> GovernorResult<Self> {
        Self::with_state(config, GovernorState::new(engine), oracle)
    }

    /// Governor resuming from previously persisted state.
    pub fn with_state(
        config: GovernorConfig,
        state: GovernorState,
        oracle: impl VotePowerOracle + 'static,
    ) -> GovernorResult<Self> {
        config.validate()?;
        state.validate()?;
        Ok(Governor {
            config,
            state: RefCell::new(state),
            oracle: Box::new(oracle),
            targets: TargetRegistry::new(),
            policies: PolicyChain::standard(QuorumPolicy::new(config.quorum_bp)),
            guard: ReentrancyGuard::new(),
            self_dispatch: ReentrancyGuard::new(),
        })
    }

    /// Governor resuming from CBOR bytes produced by `export_state`.
    pub fn restore(
        config: GovernorConfig,
        bytes: &[u8],
        oracle: impl VotePowerOracle + 'static,
    ) -> GovernorResult<Self> {
        Self::with_state(config, decode_state(bytes)?, oracle)
    }

    /// Make `account` reachable from execution.
    pub fn register_target(&mut self, account: AccountId, target: impl CallTarget + 'static) {
        self.targets.register(account, target);
    }

    /// Append a policy to the gate chain. It runs after the standard gates.
    pub fn add_policy(&mut self, policy: impl GovernancePolicy + 'static) {
        self.policies.push(policy);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Write operations
    // ═══════════════════════════════════════════════════════════════════

    /// Create a proposal. Mirrors Governor.propose().
    ///
    /// Requirements:
    ///   - (target, payload) passes the pre-creation gate chain
    ///   - caller has voting power at the latest finalized snapshot
    pub fn create_proposal(
        &self,
        ctx: &CallContext,
        target: AccountId,
        payload: Vec<u8>,
        description_hash: DescriptionHash,
    ) -> GovernorResult<ProposalId> {
        let request = CreateRequest {
            proposer: ctx.caller,
            target,
            payload: &payload,
            now: ctx.now,
        };
        self.policies.run_before_create(&self.state.borrow(), &request)?;

        let snapshot = latest_finalized_snapshot(ctx.now);
        if self.oracle.voting_power_at(&ctx.caller, snapshot) == 0 {
            return Err(GovernorError::ProposerNotEligible(ctx.caller));
        }

        let deadline = ctx
            .now
            .checked_add(self.config.voting_period)
            .ok_or(GovernorError::Overflow)?;
        let supply_snapshot = self.oracle.total_supply_at(snapshot);

        let proposal = Proposal {
            proposer: ctx.caller,
            target,
            deadline,
            snapshot,
            executed: false,
            description_hash,
            payload,
        };

        let mut state = self.state.borrow_mut();
        let id = state.open_proposal(proposal, supply_snapshot)?;
        state.emit(GovernorEvent::ProposalCreated {
            id,
            proposer: ctx.caller,
            description_hash,
        });

        info!(
            id,
            proposer = %ctx.caller,
            callee = %target,
            deadline,
            snapshot,
            "proposal created"
        );
        Ok(id)
    }

    /// Cast a vote. Mirrors Governor.castVote(). Returns the weight counted.
    ///
    /// Weight is the caller's power at the proposal snapshot, never the
    /// current balance.
    pub fn vote(&self, ctx: &CallContext, id: ProposalId, support: impl Into<Support>) -> GovernorResult<Weight> {
        let support = support.into();
        let (deadline, snapshot) = {
            let state = self.state.borrow();
            let proposal = state.proposals.get(id)?;
            (proposal.deadline, proposal.snapshot)
        };

        if ctx.now >= deadline {
            return Err(GovernorError::ProposalExpired { id, deadline });
        }
        if self.state.borrow().ledger.has_voted(id, &ctx.caller) {
            return Err(GovernorError::AlreadyVoted { id, voter: ctx.caller });
        }

        let weight = self.oracle.voting_power_at(&ctx.caller, snapshot);
        if weight == 0 {
            return Err(GovernorError::NoVotingPower {
                voter: ctx.caller,
                snapshot,
            });
        }

        let mut state = self.state.borrow_mut();
        state.record_vote(id, ctx.caller, weight, support)?;
        state.emit(GovernorEvent::Voted {
            id,
            voter: ctx.caller,
            support,
            weight,
        });

        info!(id, voter = %ctx.caller, ?support, %weight, "vote cast");
        Ok(weight)
    }

    /// Execute a passed proposal. Mirrors Governor.execute().
    ///
    /// Check order: guard, id, executed, deadline, approval, gate chain
    /// (quorum). The executed flag is set before the target runs; a target
    /// failure undoes every mutation made since the flag was written.
    pub fn execute(&self, ctx: &CallContext, id: ProposalId) -> GovernorResult<()> {
        let _entered = self.guard.enter().inspect_err(|_| {
            warn!(id, caller = %ctx.caller, "reentrant execute rejected");
        })?;

        let (proposal, tally) = {
            let state = self.state.borrow();
            (state.proposals.get(id)?.clone(), state.ledger.tally(id)?)
        };

        if proposal.executed {
            return Err(GovernorError::AlreadyExecuted(id));
        }
        if ctx.now < proposal.deadline {
            return Err(GovernorError::VotingNotFinished {
                id,
                deadline: proposal.deadline,
            });
        }
        if !tally.approved() {
            return Err(GovernorError::NotApproved {
                yes: tally.yes,
                no: tally.no,
            });
        }

        let request = ExecuteRequest {
            id,
            proposal: &proposal,
            tally,
            now: ctx.now,
        };
        self.policies.run_before_execute(&self.state.borrow(), &request)?;

        {
            let mut state = self.state.borrow_mut();
            state.begin_journal();
            if let Err(err) = state.mark_executed(id) {
                state.commit_journal();
                return Err(err);
            }
        }

        if let Err(err) = self.invoke(ctx, id, &proposal) {
            self.state.borrow_mut().rollback_journal()?;
            warn!(id, callee = %proposal.target, error = %err, "execution rolled back");
            return Err(err);
        }

        let mut state = self.state.borrow_mut();
        state.commit_journal();
        state.emit(GovernorEvent::Executed { id });
        info!(id, callee = %proposal.target, "proposal executed");
        Ok(())
    }

    /// Whitelist `target`. Fails with `CallerNotSelf` unless called by the
    /// self-call dispatch of an executing, self-targeted proposal.
    pub fn allow(&self, ctx: &CallContext, target: AccountId) -> GovernorResult<()> {
        self.require_self_dispatch(ctx)?;
        let mut state = self.state.borrow_mut();
        state.allow(&ctx.caller, target)?;
        state.emit(GovernorEvent::TargetAllowed { target });
        Ok(())
    }

    /// Remove `target` from the whitelist. Same restriction as `allow`.
    pub fn disallow(&self, ctx: &CallContext, target: AccountId) -> GovernorResult<()> {
        self.require_self_dispatch(ctx)?;
        let mut state = self.state.borrow_mut();
        state.disallow(&ctx.caller, target)?;
        state.emit(GovernorEvent::TargetDisallowed { target });
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Read operations
    // ═══════════════════════════════════════════════════════════════════

    pub fn engine_id(&self) -> AccountId {
        self.state.borrow().engine()
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    pub fn proposal(&self, id: ProposalId) -> GovernorResult<Proposal> {
        self.state.borrow().proposals.get(id).cloned()
    }

    pub fn proposal_count(&self) -> u64 {
        self.state.borrow().proposals.count()
    }

    /// Yes, no and the supply snapshot of a proposal.
    pub fn tally(&self, id: ProposalId) -> GovernorResult<Tally> {
        self.state.borrow().ledger.tally(id)
    }

    /// Participation a proposal needs to be quorate.
    pub fn quorum_required(&self, id: ProposalId) -> GovernorResult<Weight> {
        let tally = self.tally(id)?;
        Ok(QuorumPolicy::new(self.config.quorum_bp).required(tally.supply_snapshot))
    }

    pub fn has_voted(&self, id: ProposalId, voter: &AccountId) -> bool {
        self.state.borrow().ledger.has_voted(id, voter)
    }

    pub fn receipt(&self, id: ProposalId, voter: &AccountId) -> Option<VoteReceipt> {
        self.state.borrow().ledger.receipt(id, voter)
    }

    pub fn is_allowed_target(&self, target: &AccountId) -> bool {
        self.state.borrow().access.is_allowed_target(target)
    }

    pub fn is_allowed_self_operation(&self, target: &AccountId, selector: &Selector) -> bool {
        self.state.borrow().access.is_allowed_self_operation(target, selector)
    }

    /// Lifecycle position at `now`. Approval here covers the built-in
    /// majority and quorum rules; extra policies are only consulted by
    /// `execute`.
    pub fn state(&self, id: ProposalId, now: Timepoint) -> GovernorResult<ProposalState> {
        let state = self.state.borrow();
        let proposal = state.proposals.get(id)?;
        if proposal.executed {
            return Ok(ProposalState::Executed);
        }
        if now < proposal.deadline {
            return Ok(ProposalState::Pending);
        }
        let tally = state.ledger.tally(id)?;
        let quorate = QuorumPolicy::new(self.config.quorum_bp)
            .check_quorum(tally.yes, tally.no, tally.supply_snapshot)
            .is_ok();
        if tally.approved() && quorate {
            Ok(ProposalState::ExpiredApproved)
        } else {
            Ok(ProposalState::Expired)
        }
    }

    pub fn events(&self) -> Vec<GovernorEvent> {
        self.state.borrow().events.clone()
    }

    /// Borrow the full state for inspection.
    pub fn state_view(&self) -> Ref<'_, GovernorState> {
        self.state.borrow()
    }

    /// True while an `execute` call is in flight.
    pub fn is_executing(&self) -> bool {
        self.guard.is_entered()
    }

    /// Encode the state to CBOR. Refused mid-execution, when the state may
    /// still be rolled back.
    pub fn export_state(&self) -> GovernorResult<Vec<u8>> {
        if self.is_executing() {
            return Err(GovernorError::ReentrantCall);
        }
        encode_state(&self.state.borrow())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Internal helpers
    // ═══════════════════════════════════════════════════════════════════

    fn invoke(&self, ctx: &CallContext, id: ProposalId, proposal: &Proposal) -> GovernorResult<()> {
        let engine = self.engine_id();
        let failed = |reason: String| GovernorError::TargetCallFailed {
            target: proposal.target,
            reason,
        };

        if proposal.target == engine {
            debug!(id, "dispatching self-call");
            return self
                .dispatch_self_call(&CallContext::new(engine, ctx.now), &proposal.payload)
                .map_err(|err| failed(err.to_string()));
        }

        let endpoint = self
            .targets
            .get(&proposal.target)
            .ok_or_else(|| failed("no endpoint registered".to_string()))?;
        let call = Invocation {
            caller: engine,
            now: ctx.now,
            proposal_id: id,
            payload: &proposal.payload,
        };
        endpoint.invoke(self, &call).map_err(|err| failed(err.0))
    }

    fn dispatch_self_call(&self, ctx: &CallContext, payload: &[u8]) -> GovernorResult<()> {
        let call = SelfCall::decode(payload)?;
        let _dispatching = self.self_dispatch.enter()?;
        match call {
            SelfCall::Allow(target) => self.allow(ctx, target),
            SelfCall::Disallow(target) => self.disallow(ctx, target),
        }
    }

    fn require_self_dispatch(&self, ctx: &CallContext) -> GovernorResult<()> {
        if !self.self_dispatch.is_entered() {
            warn!(caller = %ctx.caller, "whitelist edit outside self-call rejected");
            return Err(GovernorError::CallerNotSelf(ctx.caller));
        }
        Ok(())
    }
}
