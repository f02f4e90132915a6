use crate::foundation::error::GovernorError;
use crate::foundation::types::*;
use crate::governance::events::GovernorEvent;
use crate::governance::state::GovernorState;
use crate::tests::*;

fn proposal() -> Proposal {
    Proposal {
        proposer: alice(),
        target: engine_account(),
        deadline: 1_000,
        snapshot: 9,
        executed: false,
        description_hash: desc("p"),
        payload: vec![0, 0, 0, 1],
    }
}

/// State with one proposal, a vote and a whitelisted treasury.
fn populated() -> GovernorState {
    let mut state = GovernorState::new(engine_account());
    let id = state.open_proposal(proposal(), 1_000).unwrap();
    state.record_vote(id, bob(), 300, Support::For).unwrap();
    state.allow(&engine_account(), treasury()).unwrap();
    state.emit(GovernorEvent::ProposalCreated { id, proposer: alice(), description_hash: desc("p") });
    state
}

#[test]
fn test_rollback_undoes_every_mutation() {
    let mut state = populated();
    let before = state.clone();

    state.begin_journal();
    state.mark_executed(0).unwrap();
    let id = state.open_proposal(proposal(), 2_000).unwrap();
    state.record_vote(id, carol(), 200, Support::Against).unwrap();
    state.record_vote(0, carol(), 200, Support::For).unwrap();
    state.allow(&engine_account(), dave()).unwrap();
    state.disallow(&engine_account(), treasury()).unwrap();
    state.emit(GovernorEvent::Executed { id: 0 });

    state.rollback_journal().unwrap();
    assert_eq!(state, before);
    assert!(state.validate().is_ok());
}

#[test]
fn test_rollback_keeps_already_listed_target() {
    let mut state = populated();
    state.begin_journal();
    // Already whitelisted: nothing to undo
    state.allow(&engine_account(), treasury()).unwrap();
    state.rollback_journal().unwrap();
    assert!(state.access().is_allowed_target(&treasury()));
}

#[test]
fn test_commit_keeps_mutations() {
    let mut state = populated();
    state.begin_journal();
    state.mark_executed(0).unwrap();
    state.commit_journal();
    state.rollback_journal().unwrap();
    assert!(state.proposals().get(0).unwrap().executed);
}

#[test]
fn test_failed_mutation_not_journaled() {
    let mut state = populated();
    let before = state.clone();
    state.begin_journal();
    assert_eq!(
        state.record_vote(0, bob(), 1, Support::Against),
        Err(GovernorError::AlreadyVoted { id: 0, voter: bob() })
    );
    state.rollback_journal().unwrap();
    assert_eq!(state, before);
}

#[test]
fn test_unjournaled_mutations_stay() {
    let mut state = populated();
    state.record_vote(0, carol(), 200, Support::Against).unwrap();
    state.rollback_journal().unwrap();
    assert!(state.ledger().has_voted(0, &carol()));
}
