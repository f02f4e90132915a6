//! Payload layout: `selector (4 bytes) ‖ arguments`.
//!
//! Downstream targets interpret their own arguments. The engine only decodes
//! payloads addressed to itself, where the two whitelist operations take a
//! single 20-byte account.

use crate::crypto::hash::{ALLOW_TARGET_SELECTOR, DISALLOW_TARGET_SELECTOR};
use crate::foundation::config::{ACCOUNT_ID_SIZE, SELECTOR_SIZE};
use crate::foundation::error::{GovernorError, GovernorResult};
use crate::foundation::types::{AccountId, Selector};

/// Concatenate a selector and raw arguments.
pub fn encode_call(selector: Selector, args: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(SELECTOR_SIZE + args.len());
    payload.extend_from_slice(&selector.0);
    payload.extend_from_slice(args);
    payload
}

/// Split a payload into its selector and argument bytes.
pub fn split_selector(payload: &[u8]) -> GovernorResult<(Selector, &[u8])> {
    let selector = Selector::from_payload(payload).ok_or(GovernorError::PayloadTooShort {
        len: payload.len(),
    })?;
    Ok((selector, &payload[SELECTOR_SIZE..]))
}

/// An administrative call the engine makes on itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelfCall {
    Allow(AccountId),
    Disallow(AccountId),
}

impl SelfCall {
    pub fn selector(&self) -> Selector {
        match self {
            SelfCall::Allow(_) => ALLOW_TARGET_SELECTOR,
            SelfCall::Disallow(_) => DISALLOW_TARGET_SELECTOR,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let account = match self {
            SelfCall::Allow(account) | SelfCall::Disallow(account) => account,
        };
        encode_call(self.selector(), account.as_bytes())
    }

    pub fn decode(payload: &[u8]) -> GovernorResult<Self> {
        let (selector, args) = split_selector(payload)?;
        let wrap: fn(AccountId) -> SelfCall = if selector == ALLOW_TARGET_SELECTOR {
            SelfCall::Allow
        } else if selector == DISALLOW_TARGET_SELECTOR {
            SelfCall::Disallow
        } else {
            return Err(GovernorError::SelectorNotAllowed(selector));
        };
        let account = AccountId::from_slice(args).ok_or_else(|| GovernorError::MalformedCalldata {
            selector,
            reason: format!("expected {} argument bytes, got {}", ACCOUNT_ID_SIZE, args.len()),
        })?;
        Ok(wrap(account))
    }
}

/// Payload for a proposal that whitelists `target`.
pub fn encode_allow(target: &AccountId) -> Vec<u8> {
    SelfCall::Allow(*target).encode()
}

/// Payload for a proposal that removes `target` from the whitelist.
pub fn encode_disallow(target: &AccountId) -> Vec<u8> {
    SelfCall::Disallow(*target).encode()
}
