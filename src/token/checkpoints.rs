//! Checkpointed voting token: mirrors OpenZeppelin ERC20Votes.
//!
//! Every balance change writes a checkpoint `(timepoint, value)` for the
//! accounts involved and for the total supply. Historical lookups take the
//! last checkpoint at or before the requested timepoint, so a snapshot that
//! has already passed never changes, no matter what moves afterwards.
//!
//! Checkpoints for one history must be written in non-decreasing timepoint
//! order; a second write at the same timepoint overwrites the first.

use std::cell::RefCell;
use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::foundation::types::{AccountId, Timepoint, Weight};
use crate::governance::votes::VotePowerOracle;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("balance of {account} is {balance}, needs {needed}")]
    InsufficientBalance {
        account: AccountId,
        balance: Weight,
        needed: Weight,
    },
    #[error("token arithmetic overflow")]
    Overflow,
    #[error("checkpoint at {at} precedes latest checkpoint at {latest}")]
    NonMonotonicTimepoint { at: Timepoint, latest: Timepoint },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Checkpoint {
    at: Timepoint,
    value: Weight,
}

/// Ordered value history for one account (or the supply).
#[derive(Debug, Clone, Default)]
struct History {
    checkpoints: Vec<Checkpoint>,
}

impl History {
    fn latest(&self) -> Weight {
        self.checkpoints.last().map_or(0, |c| c.value)
    }

    /// Upper lookup: value of the last checkpoint with `at <= timepoint`.
    fn at(&self, timepoint: Timepoint) -> Weight {
        let idx = self.checkpoints.partition_point(|c| c.at <= timepoint);
        if idx == 0 {
            0
        } else {
            self.checkpoints[idx - 1].value
        }
    }

    fn check(&self, at: Timepoint) -> Result<(), TokenError> {
        match self.checkpoints.last() {
            Some(last) if at < last.at => Err(TokenError::NonMonotonicTimepoint { at, latest: last.at }),
            _ => Ok(()),
        }
    }

    fn push(&mut self, at: Timepoint, value: Weight) {
        match self.checkpoints.last_mut() {
            Some(last) if last.at == at => last.value = value,
            _ => self.checkpoints.push(Checkpoint { at, value }),
        }
    }
}

#[derive(Debug, Default)]
struct Book {
    balances: BTreeMap<AccountId, History>,
    supply: History,
}

/// In-memory checkpointed token. Mutations take `&self` so the token can be
/// shared (e.g. via `Rc`) between a governor and the code moving balances.
#[derive(Debug, Default)]
pub struct CheckpointVotes {
    book: RefCell<Book>,
}

impl CheckpointVotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` new tokens for `to` at timepoint `at`.
    pub fn mint(&self, to: &AccountId, amount: Weight, at: Timepoint) -> Result<(), TokenError> {
        let mut book = self.book.borrow_mut();
        let book = &mut *book;
        let account = book.balances.entry(*to).or_default();
        account.check(at)?;
        book.supply.check(at)?;

        let balance = account.latest().checked_add(amount).ok_or(TokenError::Overflow)?;
        let supply = book.supply.latest().checked_add(amount).ok_or(TokenError::Overflow)?;
        account.push(at, balance);
        book.supply.push(at, supply);

        debug!(account = %to, %amount, at, "minted");
        Ok(())
    }

    /// Destroy `amount` of `from`'s tokens at timepoint `at`.
    pub fn burn(&self, from: &AccountId, amount: Weight, at: Timepoint) -> Result<(), TokenError> {
        let mut book = self.book.borrow_mut();
        let book = &mut *book;
        let account = book.balances.entry(*from).or_default();
        account.check(at)?;
        book.supply.check(at)?;

        let balance = account.latest();
        let remaining = balance.checked_sub(amount).ok_or(TokenError::InsufficientBalance {
            account: *from,
            balance,
            needed: amount,
        })?;
        let supply = book.supply.latest().saturating_sub(amount);
        account.push(at, remaining);
        book.supply.push(at, supply);

        debug!(account = %from, %amount, at, "burned");
        Ok(())
    }

    /// Move `amount` from `from` to `to` at timepoint `at`. Supply unchanged.
    pub fn transfer(&self, from: &AccountId, to: &AccountId, amount: Weight, at: Timepoint) -> Result<(), TokenError> {
        if from == to {
            return Ok(());
        }
        let mut book = self.book.borrow_mut();
        let sender = book.balances.get(from).cloned().unwrap_or_default();
        let receiver = book.balances.get(to).cloned().unwrap_or_default();
        sender.check(at)?;
        receiver.check(at)?;

        let balance = sender.latest();
        let remaining = balance.checked_sub(amount).ok_or(TokenError::InsufficientBalance {
            account: *from,
            balance,
            needed: amount,
        })?;
        let credited = receiver.latest().checked_add(amount).ok_or(TokenError::Overflow)?;

        book.balances.entry(*from).or_default().push(at, remaining);
        book.balances.entry(*to).or_default().push(at, credited);

        debug!(from = %from, to = %to, %amount, at, "transferred");
        Ok(())
    }

    /// Current balance.
    pub fn balance_of(&self, account: &AccountId) -> Weight {
        self.book.borrow().balances.get(account).map_or(0, History::latest)
    }

    pub fn total_supply(&self) -> Weight {
        self.book.borrow().supply.latest()
    }

    /// Mirrors ERC20Votes.getPastVotes().
    pub fn past_votes(&self, account: &AccountId, timepoint: Timepoint) -> Weight {
        self.book.borrow().balances.get(account).map_or(0, |h| h.at(timepoint))
    }

    /// Mirrors ERC20Votes.getPastTotalSupply().
    pub fn past_total_supply(&self, timepoint: Timepoint) -> Weight {
        self.book.borrow().supply.at(timepoint)
    }
}

impl VotePowerOracle for CheckpointVotes {
    fn voting_power_at(&self, account: &AccountId, snapshot: Timepoint) -> Weight {
        self.past_votes(account, snapshot)
    }

    fn total_supply_at(&self, snapshot: Timepoint) -> Weight {
        self.past_total_supply(snapshot)
    }
}
