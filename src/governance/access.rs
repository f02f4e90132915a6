//! Target whitelist and self-operation allowlist.
//!
//! The whitelist starts empty. The only way to grow or shrink it is a passed
//! proposal that targets the governor itself with one of the two
//! pre-authorized selectors; `allow` / `disallow` reject every caller except
//! the governor's own identity. There is no admin role.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::crypto::hash::{ALLOW_TARGET_SELECTOR, DISALLOW_TARGET_SELECTOR};
use crate::foundation::error::{GovernorError, GovernorResult};
use crate::foundation::types::{AccountId, Selector};
use crate::governance::calldata::split_selector;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    engine: AccountId,
    allowed_targets: BTreeSet<AccountId>,
    self_operations: BTreeSet<Selector>,
}

impl AccessPolicy {
    /// Policy for the governor at `engine`, with the two whitelist
    /// operations pre-authorized on it.
    pub fn new(engine: AccountId) -> Self {
        AccessPolicy {
            engine,
            allowed_targets: BTreeSet::new(),
            self_operations: Self::default_self_operations(),
        }
    }

    fn default_self_operations() -> BTreeSet<Selector> {
        [ALLOW_TARGET_SELECTOR, DISALLOW_TARGET_SELECTOR].into_iter().collect()
    }

    pub fn engine(&self) -> AccountId {
        self.engine
    }

    /// Gate a proposal's (target, payload) pair.
    pub fn check_access(&self, target: &AccountId, payload: &[u8]) -> GovernorResult<()> {
        let (selector, _args) = split_selector(payload)?;
        if *target == self.engine {
            if !self.self_operations.contains(&selector) {
                return Err(GovernorError::SelectorNotAllowed(selector));
            }
            return Ok(());
        }
        if !self.allowed_targets.contains(target) {
            return Err(GovernorError::TargetNotWhitelisted(*target));
        }
        Ok(())
    }

    /// Whitelist `target`. Only the governor may call this. Returns whether
    /// the target was newly added.
    pub fn allow(&mut self, caller: &AccountId, target: AccountId) -> GovernorResult<bool> {
        self.require_self(caller)?;
        if target.is_zero() {
            return Err(GovernorError::ZeroTargetRejected);
        }
        if target == self.engine {
            return Err(GovernorError::SelfTargetRejected);
        }
        let inserted = self.allowed_targets.insert(target);
        if inserted {
            info!(account = %target, "target whitelisted");
        }
        Ok(inserted)
    }

    /// Remove `target` from the whitelist. Only the governor may call this.
    pub fn disallow(&mut self, caller: &AccountId, target: AccountId) -> GovernorResult<()> {
        self.require_self(caller)?;
        if !self.allowed_targets.remove(&target) {
            return Err(GovernorError::UnknownOrAlreadyDisallowed(target));
        }
        info!(account = %target, "target removed from whitelist");
        Ok(())
    }

    pub(crate) fn revert_allow(&mut self, target: &AccountId) {
        self.allowed_targets.remove(target);
    }

    pub(crate) fn revert_disallow(&mut self, target: AccountId) {
        self.allowed_targets.insert(target);
    }

    pub fn is_allowed_target(&self, target: &AccountId) -> bool {
        self.allowed_targets.contains(target)
    }

    /// True only for the governor's own identity paired with one of the
    /// pre-authorized selectors.
    pub fn is_allowed_self_operation(&self, target: &AccountId, selector: &Selector) -> bool {
        *target == self.engine && self.self_operations.contains(selector)
    }

    pub fn allowed_targets(&self) -> impl Iterator<Item = &AccountId> {
        self.allowed_targets.iter()
    }

    /// Structural checks for restored state.
    pub(crate) fn validate(&self) -> GovernorResult<()> {
        if self.self_operations != Self::default_self_operations() {
            return Err(GovernorError::CorruptState(
                "self-operation set differs from the whitelist operations".to_string(),
            ));
        }
        if self.allowed_targets.contains(&AccountId::ZERO) {
            return Err(GovernorError::CorruptState("null identity in whitelist".to_string()));
        }
        if self.allowed_targets.contains(&self.engine) {
            return Err(GovernorError::CorruptState("governor in its own whitelist".to_string()));
        }
        Ok(())
    }

    fn require_self(&self, caller: &AccountId) -> GovernorResult<()> {
        if *caller != self.engine {
            return Err(GovernorError::CallerNotSelf(*caller));
        }
        Ok(())
    }
}
