//! Execution safety tests.
//!
//! - Reentrancy: a target calling back into `execute` is rejected
//! - Effects before interaction: `executed` is visible to the target
//! - Rollback: a failing target leaves no trace, nested effects included
//! - Self-administration: only the governor edits its whitelist

use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::error::{GovernorError, GovernorResult, TargetError};
use crate::foundation::types::*;
use crate::governance::calldata::*;
use crate::governance::events::GovernorEvent;
use crate::governance::governor::Governor;
use crate::governance::targets::{CallTarget, Invocation};
use crate::tests::*;

type Slot<T> = Rc<RefCell<Option<T>>>;

fn slot<T>() -> Slot<T> {
    Rc::new(RefCell::new(None))
}

/// Calls `execute(reenter_id)` from inside its own invocation.
struct Reenter {
    reenter_id: ProposalId,
    outcome: Slot<GovernorResult<()>>,
    propagate: bool,
}

impl CallTarget for Reenter {
    fn invoke(&self, governor: &Governor, call: &Invocation<'_>) -> Result<(), TargetError> {
        let nested = governor.execute(&CallContext::new(call.caller, call.now), self.reenter_id);
        *self.outcome.borrow_mut() = Some(nested.clone());
        if self.propagate {
            nested?;
        }
        Ok(())
    }
}

/// Observes the governor mid-execution.
struct Inspector {
    seen: Slot<(bool, bool, GovernorResult<Vec<u8>>)>,
}

impl CallTarget for Inspector {
    fn invoke(&self, governor: &Governor, call: &Invocation<'_>) -> Result<(), TargetError> {
        let executed = governor.proposal(call.proposal_id)?.executed;
        *self.seen.borrow_mut() = Some((executed, governor.is_executing(), governor.export_state()));
        Ok(())
    }
}

/// Votes and proposes from inside its invocation, then fails.
struct MeddleThenFail {
    vote_on: ProposalId,
}

impl CallTarget for MeddleThenFail {
    fn invoke(&self, governor: &Governor, call: &Invocation<'_>) -> Result<(), TargetError> {
        governor.vote(&CallContext::new(carol(), call.now), self.vote_on, true)?;
        governor.create_proposal(
            &CallContext::new(bob(), call.now),
            engine_account(),
            encode_allow(&dave()),
            desc("nested"),
        )?;
        Err(TargetError::new("insufficient treasury funds"))
    }
}

/// Whitelist treasury, then open a proposal against it. Returns
/// (proposal id, time at which it becomes executable).
fn treasury_proposal(governor: &Governor) -> (ProposalId, Timepoint) {
    let now = whitelist(governor, treasury(), T0);
    let id = governor
        .create_proposal(&ctx(alice(), now), treasury(), vec![0, 0, 0, 9], desc("pay"))
        .unwrap();
    governor.vote(&ctx(alice(), now + 1), id, true).unwrap();
    (id, now + PERIOD)
}

// ═══════════════════════════════════════════════════════════════════════
// Reentrancy
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_reentrant_execute_same_proposal_rejected() {
    let (mut governor, _token) = build_dao();
    let outcome = slot();
    // Proposal ids: 0 = whitelist, 1 = treasury call
    governor.register_target(
        treasury(),
        Reenter { reenter_id: 1, outcome: Rc::clone(&outcome), propagate: false },
    );
    let (id, ready) = treasury_proposal(&governor);
    assert_eq!(id, 1);

    governor.execute(&ctx(alice(), ready), id).unwrap();
    assert_eq!(*outcome.borrow(), Some(Err(GovernorError::ReentrantCall)));
    assert!(governor.proposal(id).unwrap().executed);
    assert!(!governor.is_executing());
}

#[test]
fn test_reentrant_execute_other_proposal_rejected() {
    let (mut governor, _token) = build_dao();
    let outcome = slot();
    governor.register_target(
        treasury(),
        Reenter { reenter_id: 2, outcome: Rc::clone(&outcome), propagate: false },
    );
    let (id, ready) = treasury_proposal(&governor);

    // A second, independently passed proposal
    let other = governor
        .create_proposal(&ctx(alice(), ready - PERIOD), engine_account(), encode_allow(&carol()), desc("o"))
        .unwrap();
    assert_eq!(other, 2);
    governor.vote(&ctx(bob(), ready - PERIOD + 1), other, true).unwrap();

    governor.execute(&ctx(alice(), ready), id).unwrap();
    assert_eq!(*outcome.borrow(), Some(Err(GovernorError::ReentrantCall)));
    assert!(!governor.proposal(other).unwrap().executed);

    // Guard released: the other proposal executes normally afterwards
    governor.execute(&ctx(alice(), ready), other).unwrap();
    assert!(governor.is_allowed_target(&carol()));
}

#[test]
fn test_propagated_reentrancy_rolls_back() {
    let (mut governor, _token) = build_dao();
    let outcome = slot();
    governor.register_target(
        treasury(),
        Reenter { reenter_id: 1, outcome: Rc::clone(&outcome), propagate: true },
    );
    let (id, ready) = treasury_proposal(&governor);

    let result = governor.execute(&ctx(alice(), ready), id);
    assert_eq!(
        result,
        Err(GovernorError::TargetCallFailed {
            target: treasury(),
            reason: "reentrant call into execute".to_string(),
        })
    );
    assert!(!governor.proposal(id).unwrap().executed);
    assert!(!governor.is_executing());
}

#[test]
fn test_guard_released_after_failed_checks() {
    let (governor, _token) = build_dao();
    assert!(governor.execute(&ctx(alice(), T0), 0).is_err());
    assert!(!governor.is_executing());
}

// ═══════════════════════════════════════════════════════════════════════
// Effects before interaction
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_executed_visible_during_invocation() {
    let (mut governor, _token) = build_dao();
    let seen = slot();
    governor.register_target(treasury(), Inspector { seen: Rc::clone(&seen) });
    let (id, ready) = treasury_proposal(&governor);

    governor.execute(&ctx(alice(), ready), id).unwrap();
    let (executed, executing, export) = seen.borrow_mut().take().unwrap();
    assert!(executed, "executed flag is written before the target runs");
    assert!(executing);
    assert_eq!(export, Err(GovernorError::ReentrantCall));
    assert!(governor.export_state().is_ok());
}

// ═══════════════════════════════════════════════════════════════════════
// Rollback
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_failed_target_rolls_back_nested_effects() {
    let (mut governor, _token) = build_dao();
    let (id, ready) = treasury_proposal(&governor);

    // Open proposal that the target will vote on mid-execution
    let open = governor
        .create_proposal(&ctx(alice(), ready - 1), engine_account(), encode_allow(&carol()), desc("open"))
        .unwrap();
    governor.register_target(treasury(), MeddleThenFail { vote_on: open });

    let count_before = governor.proposal_count();
    let events_before = governor.events();

    let result = governor.execute(&ctx(alice(), ready), id);
    assert_eq!(
        result,
        Err(GovernorError::TargetCallFailed {
            target: treasury(),
            reason: "insufficient treasury funds".to_string(),
        })
    );

    assert!(!governor.proposal(id).unwrap().executed);
    assert!(!governor.has_voted(open, &carol()));
    assert_eq!(governor.tally(open).unwrap().yes, 0);
    assert_eq!(governor.proposal_count(), count_before);
    assert_eq!(governor.events(), events_before);
    assert!(!governor.events().contains(&GovernorEvent::Executed { id }));
}

#[test]
fn test_nested_effects_kept_on_success() {
    struct VoteInside(ProposalId);
    impl CallTarget for VoteInside {
        fn invoke(&self, governor: &Governor, call: &Invocation<'_>) -> Result<(), TargetError> {
            governor.vote(&CallContext::new(carol(), call.now), self.0, true)?;
            Ok(())
        }
    }

    let (mut governor, _token) = build_dao();
    let (id, ready) = treasury_proposal(&governor);
    let open = governor
        .create_proposal(&ctx(alice(), ready - 1), engine_account(), encode_allow(&carol()), desc("open"))
        .unwrap();
    governor.register_target(treasury(), VoteInside(open));

    governor.execute(&ctx(alice(), ready), id).unwrap();
    assert!(governor.has_voted(open, &carol()));
}

// ═══════════════════════════════════════════════════════════════════════
// Self-administration
// ═══════════════════════════════════════════════════════════════════════

/// Tries to edit the whitelist with the identity it was invoked under.
struct Escalate {
    outcome: Slot<GovernorResult<()>>,
}

impl CallTarget for Escalate {
    fn invoke(&self, governor: &Governor, call: &Invocation<'_>) -> Result<(), TargetError> {
        let as_engine = CallContext::new(call.caller, call.now);
        let grown = governor.allow(&as_engine, eve());
        let shrunk = governor.disallow(&as_engine, treasury());
        *self.outcome.borrow_mut() = Some(grown.and(shrunk));
        Ok(())
    }
}

#[test]
fn test_downstream_target_cannot_edit_whitelist() {
    let (mut governor, _token) = build_dao();
    let outcome = slot();
    governor.register_target(treasury(), Escalate { outcome: Rc::clone(&outcome) });
    let (id, ready) = treasury_proposal(&governor);

    governor.execute(&ctx(alice(), ready), id).unwrap();
    assert_eq!(
        *outcome.borrow(),
        Some(Err(GovernorError::CallerNotSelf(engine_account())))
    );
    assert!(!governor.is_allowed_target(&eve()));
    assert!(governor.is_allowed_target(&treasury()));
}

#[test]
fn test_engine_identity_outside_execute_rejected() {
    let (governor, _token) = build_dao();
    let as_engine = ctx(governor.engine_id(), T0);
    assert_eq!(
        governor.allow(&as_engine, eve()),
        Err(GovernorError::CallerNotSelf(engine_account()))
    );

    whitelist(&governor, treasury(), T0);
    assert_eq!(
        governor.disallow(&as_engine, treasury()),
        Err(GovernorError::CallerNotSelf(engine_account()))
    );
    assert!(!governor.is_allowed_target(&eve()));
    assert!(governor.is_allowed_target(&treasury()));
}

#[test]
fn test_proposer_cannot_allow_directly() {
    let (governor, _token) = build_dao();
    for caller in [alice(), bob(), eve(), AccountId::ZERO] {
        assert_eq!(
            governor.allow(&ctx(caller, T0), treasury()),
            Err(GovernorError::CallerNotSelf(caller))
        );
    }
    assert!(!governor.is_allowed_target(&treasury()));
}

#[test]
fn test_self_target_rejects_non_whitelist_selector() {
    let (governor, _token) = build_dao();
    let payload = encode_call(crate::crypto::hash::selector("transfer(account,amount)"), &[0u8; 36]);
    assert!(matches!(
        governor.create_proposal(&ctx(alice(), T0), engine_account(), payload, desc("drain")),
        Err(GovernorError::SelectorNotAllowed(_))
    ));
}

#[test]
fn test_engine_cannot_whitelist_itself() {
    let (governor, _token) = build_dao();
    let id = governor
        .create_proposal(&ctx(alice(), T0), engine_account(), encode_allow(&engine_account()), desc("self"))
        .unwrap();
    governor.vote(&ctx(alice(), T0 + 1), id, true).unwrap();
    let result = governor.execute(&ctx(alice(), T0 + PERIOD), id);
    assert!(matches!(result, Err(GovernorError::TargetCallFailed { .. })));
    assert!(!governor.is_allowed_target(&engine_account()));
}
