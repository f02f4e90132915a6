//! Core types for the Governor.
//!
//! Identities, proposal records and vote tallies. These mirror the Governor
//! `ProposalCore` struct and the simple-counting tallies, widened to
//! `u128` weights.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::config::*;

/// Point in time in seconds. Snapshots are timepoints too.
pub type Timepoint = u64;

/// Voting weight / token amount.
pub type Weight = u128;

/// Sequential proposal index.
pub type ProposalId = u64;

/// Content hash of an off-core proposal description.
pub type DescriptionHash = [u8; DESCRIPTION_HASH_SIZE];

/// A 20-byte account identity. The all-zero id is the null identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AccountId(pub [u8; ACCOUNT_ID_SIZE]);

impl AccountId {
    pub const ZERO: AccountId = AccountId([0u8; ACCOUNT_ID_SIZE]);

    pub const fn new(bytes: [u8; ACCOUNT_ID_SIZE]) -> Self {
        AccountId(bytes)
    }

    /// Build from a slice of exactly `ACCOUNT_ID_SIZE` bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; ACCOUNT_ID_SIZE] = bytes.try_into().ok()?;
        Some(AccountId(array))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ACCOUNT_ID_SIZE]
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_SIZE] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", hex::encode(self.0))
    }
}

/// 4-byte operation discriminator at the head of a payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Selector(pub [u8; SELECTOR_SIZE]);

impl Selector {
    /// Read the selector from the first bytes of a payload.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        let head = payload.get(..SELECTOR_SIZE)?;
        let array: [u8; SELECTOR_SIZE] = head.try_into().ok()?;
        Some(Selector(array))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector(0x{})", hex::encode(self.0))
    }
}

/// Identity and clock of the current call. Time is supplied by the host,
/// never read by the engine itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: AccountId,
    pub now: Timepoint,
}

impl CallContext {
    pub fn new(caller: AccountId, now: Timepoint) -> Self {
        CallContext { caller, now }
    }
}

/// Side of a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Support {
    Against,
    For,
}

impl From<bool> for Support {
    fn from(support: bool) -> Self {
        if support {
            Support::For
        } else {
            Support::Against
        }
    }
}

impl Support {
    pub fn is_for(self) -> bool {
        matches!(self, Support::For)
    }
}

/// A governance proposal. Every field except `executed` is fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Account that created the proposal
    pub proposer: AccountId,
    /// Account invoked on execution
    pub target: AccountId,
    /// Voting closes at this time (exclusive)
    pub deadline: Timepoint,
    /// Timepoint for every voting-power lookup of this proposal
    pub snapshot: Timepoint,
    /// Set once, by a successful execution
    pub executed: bool,
    /// Content hash of the description text
    pub description_hash: DescriptionHash,
    /// Opaque invocation payload (selector ‖ arguments)
    pub payload: Vec<u8>,
}

impl Proposal {
    /// Operation discriminator of the payload, if the payload carries one.
    pub fn selector(&self) -> Option<Selector> {
        Selector::from_payload(&self.payload)
    }
}

/// Vote tallies of one proposal plus its quorum denominator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: Weight,
    pub no: Weight,
    /// Total supply at the proposal snapshot
    pub supply_snapshot: Weight,
}

impl Tally {
    /// Total participation (yes + no)
    pub fn participation(&self) -> Weight {
        self.yes.saturating_add(self.no)
    }

    /// Strict majority: ties fail
    pub fn approved(&self) -> bool {
        self.yes > self.no
    }
}

/// What a voter cast on a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub support: Support,
    pub weight: Weight,
}

/// Lifecycle position of a proposal at a given time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalState {
    /// Before deadline, not executed
    Pending,
    /// After deadline, not approved or not quorate
    Expired,
    /// After deadline, approved and quorate, awaiting execution
    ExpiredApproved,
    /// Terminal
    Executed,
}
