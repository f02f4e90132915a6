//! Downstream call targets.
//!
//! A target is whatever a proposal invokes on execution. It receives the
//! governor itself so it may call back in; the reentrancy guard decides what
//! such a callback is allowed to do.

use std::collections::HashMap;
use std::rc::Rc;

use crate::foundation::error::TargetError;
use crate::foundation::types::{AccountId, ProposalId, Timepoint};
use crate::governance::governor::Governor;

/// One downstream invocation.
#[derive(Clone, Copy, Debug)]
pub struct Invocation<'a> {
    /// Always the governor's own identity
    pub caller: AccountId,
    pub now: Timepoint,
    pub proposal_id: ProposalId,
    pub payload: &'a [u8],
}

pub trait CallTarget {
    fn invoke(&self, governor: &Governor, call: &Invocation<'_>) -> Result<(), TargetError>;
}

impl<F> CallTarget for F
where
    F: Fn(&Governor, &Invocation<'_>) -> Result<(), TargetError>,
{
    fn invoke(&self, governor: &Governor, call: &Invocation<'_>) -> Result<(), TargetError> {
        self(governor, call)
    }
}

/// Endpoints reachable from execution, keyed by identity.
#[derive(Default, Clone)]
pub struct TargetRegistry {
    targets: HashMap<AccountId, Rc<dyn CallTarget>>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `account` to an endpoint, replacing any previous binding.
    pub fn register(&mut self, account: AccountId, target: impl CallTarget + 'static) {
        self.targets.insert(account, Rc::new(target));
    }

    pub fn get(&self, account: &AccountId) -> Option<Rc<dyn CallTarget>> {
        self.targets.get(account).cloned()
    }
}
