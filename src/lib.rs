//! Token DAO Governor: an OpenZeppelin-style Governor core.
//!
//! # Architecture
//!
//! The engine mirrors the Governor contracts (v4.x), reduced to a
//! for/against counting model with a target whitelist governed by the DAO
//! itself:
//!
//! | OZ Component                | Module                          |
//! |-----------------------------|---------------------------------|
//! | Governor.sol                | governance::governor            |
//! | GovernorCountingSimple.sol  | governance::counting            |
//! | GovernorVotes.sol           | governance::votes               |
//! | GovernorVotesQuorumFraction | governance::quorum              |
//! | ReentrancyGuard.sol         | governance::guard               |
//! | ERC20Votes                  | token::checkpoints              |
//! | GovernorSettings.sol        | foundation::config              |
//!
//! # Lifecycle
//!
//! - `create_proposal`: gate the (target, payload) pair, snapshot supply
//! - `vote`: count snapshot weight once per voter
//! - `execute`: after the deadline, if approved and quorate
//! - `allow`/`disallow`: whitelist edits, reachable only through a
//!   self-targeted proposal
//!
//! # State
//!
//! All mutable state lives in one `GovernorState` value. It is journaled
//! around every downstream call and can be exported as CBOR.

pub mod foundation;
pub mod crypto;
pub mod governance;
pub mod token;


pub use foundation::config::GovernorConfig;
pub use foundation::error::{ConfigError, ErrorCategory, GovernorError, GovernorResult, TargetError};
pub use foundation::types::{
    AccountId, CallContext, DescriptionHash, Proposal, ProposalId, ProposalState, Selector, Support, Tally,
    Timepoint, VoteReceipt, Weight,
};
pub use governance::events::GovernorEvent;
pub use governance::governor::Governor;
pub use governance::policy::{CreateRequest, ExecuteRequest, GovernancePolicy};
pub use governance::targets::{CallTarget, Invocation};
pub use governance::votes::VotePowerOracle;
pub use token::checkpoints::CheckpointVotes;
