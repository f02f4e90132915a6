//! Error types and return codes.
//!
//! Every failure aborts the whole call. `GovernorError::code()` keeps the
//! negative `i32` return codes a host boundary reports, and
//! `GovernorError::category()` groups variants by how a caller should treat
//! them. Nothing here is retried by the engine.

use crate::foundation::config::SELECTOR_SIZE;
use crate::foundation::types::{AccountId, ProposalId, Selector, Timepoint, Weight};

/// Result type for Governor operations
pub type GovernorResult<T> = Result<T, GovernorError>;

/// Governor errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GovernorError {
    #[error("proposal {id} out of range (count {count})")]
    OutOfRange { id: ProposalId, count: u64 },

    #[error("payload too short: {len} bytes, selector needs {}", SELECTOR_SIZE)]
    PayloadTooShort { len: usize },

    #[error("malformed calldata for {selector}: {reason}")]
    MalformedCalldata { selector: Selector, reason: String },

    #[error("proposer {0} has no voting power at the latest finalized snapshot")]
    ProposerNotEligible(AccountId),

    #[error("voter {voter} has no voting power at snapshot {snapshot}")]
    NoVotingPower { voter: AccountId, snapshot: Timepoint },

    #[error("selector {0} is not an allowed self-operation")]
    SelectorNotAllowed(Selector),

    #[error("target {0} is not whitelisted")]
    TargetNotWhitelisted(AccountId),

    #[error("caller {0} is not the governor itself")]
    CallerNotSelf(AccountId),

    #[error("proposal {id} voting closed at {deadline}")]
    ProposalExpired { id: ProposalId, deadline: Timepoint },

    #[error("proposal {id} voting open until {deadline}")]
    VotingNotFinished { id: ProposalId, deadline: Timepoint },

    #[error("{voter} already voted on proposal {id}")]
    AlreadyVoted { id: ProposalId, voter: AccountId },

    #[error("proposal {0} already executed")]
    AlreadyExecuted(ProposalId),

    #[error("target {0} is unknown or already disallowed")]
    UnknownOrAlreadyDisallowed(AccountId),

    #[error("the null identity cannot be whitelisted")]
    ZeroTargetRejected,

    #[error("the governor cannot whitelist itself")]
    SelfTargetRejected,

    #[error("quorum not reached: {participation} of {required} required")]
    QuorumNotReached { participation: Weight, required: Weight },

    #[error("proposal not approved: {yes} for, {no} against")]
    NotApproved { yes: Weight, no: Weight },

    #[error("call to target {target} failed: {reason}")]
    TargetCallFailed { target: AccountId, reason: String },

    #[error("reentrant call into execute")]
    ReentrantCall,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("vote ledger out of sync: initialize({id}) with {entries} entries")]
    LedgerOutOfSync { id: ProposalId, entries: u64 },

    #[error("state codec error: {0}")]
    StateCodec(String),

    #[error("corrupt state: {0}")]
    CorruptState(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// How a caller should read an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InputValidation,
    Authorization,
    Temporal,
    StateConflict,
    Approval,
    Downstream,
    Concurrency,
    Internal,
}

impl GovernorError {
    pub fn category(&self) -> ErrorCategory {
        use GovernorError::*;
        match self {
            OutOfRange { .. } | PayloadTooShort { .. } | MalformedCalldata { .. } => {
                ErrorCategory::InputValidation
            }
            ProposerNotEligible(_)
            | NoVotingPower { .. }
            | SelectorNotAllowed(_)
            | TargetNotWhitelisted(_)
            | CallerNotSelf(_) => ErrorCategory::Authorization,
            ProposalExpired { .. } | VotingNotFinished { .. } => ErrorCategory::Temporal,
            AlreadyVoted { .. }
            | AlreadyExecuted(_)
            | UnknownOrAlreadyDisallowed(_)
            | ZeroTargetRejected
            | SelfTargetRejected => ErrorCategory::StateConflict,
            QuorumNotReached { .. } | NotApproved { .. } => ErrorCategory::Approval,
            TargetCallFailed { .. } => ErrorCategory::Downstream,
            ReentrantCall => ErrorCategory::Concurrency,
            Overflow | LedgerOutOfSync { .. } | StateCodec(_) | CorruptState(_) | Config(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// Stable host return code. Success is `SUCCESS` (1); errors are negative.
    pub fn code(&self) -> i32 {
        use GovernorError::*;
        match self {
            OutOfRange { .. } => ERR_OUT_OF_RANGE,
            PayloadTooShort { .. } => ERR_PAYLOAD_TOO_SHORT,
            MalformedCalldata { .. } => ERR_MALFORMED_CALLDATA,
            ProposerNotEligible(_) => ERR_PROPOSER_NOT_ELIGIBLE,
            NoVotingPower { .. } => ERR_NO_VOTING_POWER,
            SelectorNotAllowed(_) => ERR_SELECTOR_NOT_ALLOWED,
            TargetNotWhitelisted(_) => ERR_TARGET_NOT_WHITELISTED,
            CallerNotSelf(_) => ERR_CALLER_NOT_SELF,
            ProposalExpired { .. } => ERR_PROPOSAL_EXPIRED,
            VotingNotFinished { .. } => ERR_VOTING_NOT_FINISHED,
            AlreadyVoted { .. } => ERR_ALREADY_VOTED,
            AlreadyExecuted(_) => ERR_ALREADY_EXECUTED,
            UnknownOrAlreadyDisallowed(_) => ERR_UNKNOWN_OR_DISALLOWED,
            ZeroTargetRejected => ERR_ZERO_TARGET,
            SelfTargetRejected => ERR_SELF_TARGET,
            QuorumNotReached { .. } => ERR_QUORUM_NOT_MET,
            NotApproved { .. } => ERR_NOT_APPROVED,
            TargetCallFailed { .. } => ERR_TARGET_CALL_FAILED,
            ReentrantCall => ERR_REENTRANT,
            Overflow => ERR_OVERFLOW,
            LedgerOutOfSync { .. } => ERR_LEDGER_OUT_OF_SYNC,
            StateCodec(_) => ERR_STATE_CODEC,
            CorruptState(_) => ERR_CORRUPT_STATE,
            Config(_) => ERR_BAD_CONFIG,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RETURN CODES
// ═══════════════════════════════════════════════════════════════════════

pub const SUCCESS: i32 = 1;
pub const ERR_OUT_OF_RANGE: i32 = -1;
pub const ERR_PAYLOAD_TOO_SHORT: i32 = -2;
pub const ERR_NOT_APPROVED: i32 = -3;
pub const ERR_MALFORMED_CALLDATA: i32 = -4;
pub const ERR_PROPOSER_NOT_ELIGIBLE: i32 = -5;
pub const ERR_BAD_CONFIG: i32 = -6;
pub const ERR_ALREADY_VOTED: i32 = -7;
pub const ERR_PROPOSAL_EXPIRED: i32 = -8;
pub const ERR_NO_VOTING_POWER: i32 = -9;
pub const ERR_VOTING_NOT_FINISHED: i32 = -10;
pub const ERR_SELECTOR_NOT_ALLOWED: i32 = -11;
pub const ERR_TARGET_NOT_WHITELISTED: i32 = -12;
pub const ERR_CALLER_NOT_SELF: i32 = -13;
pub const ERR_ALREADY_EXECUTED: i32 = -14;
pub const ERR_UNKNOWN_OR_DISALLOWED: i32 = -15;
pub const ERR_ZERO_TARGET: i32 = -16;
pub const ERR_QUORUM_NOT_MET: i32 = -17;
pub const ERR_SELF_TARGET: i32 = -18;
pub const ERR_OVERFLOW: i32 = -19;
pub const ERR_REENTRANT: i32 = -20;
pub const ERR_TARGET_CALL_FAILED: i32 = -21;
pub const ERR_LEDGER_OUT_OF_SYNC: i32 = -22;
pub const ERR_STATE_CODEC: i32 = -23;
pub const ERR_CORRUPT_STATE: i32 = -24;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("voting period must be greater than zero")]
    ZeroVotingPeriod,

    #[error("quorum {0} bp exceeds 10000")]
    QuorumOutOfRange(u32),

    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("failed to serialize config: {0}")]
    Serialize(String),

    #[error("failed to read config file '{path}': {reason}")]
    Io { path: String, reason: String },
}

/// Failure reported by a downstream target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TargetError(pub String);

impl TargetError {
    pub fn new(reason: impl Into<String>) -> Self {
        TargetError(reason.into())
    }
}

impl From<GovernorError> for TargetError {
    fn from(err: GovernorError) -> Self {
        TargetError(err.to_string())
    }
}
