use crate::crypto::hash::*;
use crate::foundation::error::GovernorError;
use crate::foundation::types::*;
use crate::governance::access::AccessPolicy;
use crate::governance::calldata::*;
use crate::tests::*;

fn policy() -> AccessPolicy {
    AccessPolicy::new(engine_account())
}

// ═══════════════════════════════════════════════════════════════════════
// Bootstrap
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_whitelist_starts_empty() {
    let access = policy();
    assert_eq!(access.allowed_targets().count(), 0);
    assert!(!access.is_allowed_target(&treasury()));
    assert!(!access.is_allowed_target(&engine_account()));
}

#[test]
fn test_self_operations_preauthorized() {
    let access = policy();
    assert!(access.is_allowed_self_operation(&engine_account(), &ALLOW_TARGET_SELECTOR));
    assert!(access.is_allowed_self_operation(&engine_account(), &DISALLOW_TARGET_SELECTOR));
    assert!(!access.is_allowed_self_operation(&engine_account(), &selector("mint(account,amount)")));
}

#[test]
fn test_self_operation_only_on_engine() {
    let access = policy();
    assert!(!access.is_allowed_self_operation(&treasury(), &ALLOW_TARGET_SELECTOR));
}

// ═══════════════════════════════════════════════════════════════════════
// check_access
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_check_access_self_allow_payload() {
    let access = policy();
    assert!(access.check_access(&engine_account(), &encode_allow(&treasury())).is_ok());
    assert!(access.check_access(&engine_account(), &encode_disallow(&treasury())).is_ok());
}

#[test]
fn test_check_access_self_unknown_selector() {
    let access = policy();
    let payload = encode_call(selector("upgrade(code)"), &[0u8; 8]);
    assert_eq!(
        access.check_access(&engine_account(), &payload),
        Err(GovernorError::SelectorNotAllowed(selector("upgrade(code)")))
    );
}

#[test]
fn test_check_access_short_payload() {
    let access = policy();
    assert_eq!(
        access.check_access(&engine_account(), &[1, 2, 3]),
        Err(GovernorError::PayloadTooShort { len: 3 })
    );
    assert_eq!(
        access.check_access(&treasury(), &[]),
        Err(GovernorError::PayloadTooShort { len: 0 })
    );
}

#[test]
fn test_check_access_unlisted_target() {
    let access = policy();
    assert_eq!(
        access.check_access(&treasury(), &[0, 0, 0, 1]),
        Err(GovernorError::TargetNotWhitelisted(treasury()))
    );
}

#[test]
fn test_check_access_listed_target_any_selector() {
    let mut access = policy();
    access.allow(&engine_account(), treasury()).unwrap();
    assert!(access.check_access(&treasury(), &[9, 9, 9, 9]).is_ok());
    assert!(access.check_access(&treasury(), &[9, 9, 9, 9, 1, 2]).is_ok());
}

// ═══════════════════════════════════════════════════════════════════════
// allow / disallow
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_allow_requires_self() {
    let mut access = policy();
    assert_eq!(
        access.allow(&alice(), treasury()),
        Err(GovernorError::CallerNotSelf(alice()))
    );
    assert!(!access.is_allowed_target(&treasury()));
}

#[test]
fn test_allow_rejects_zero() {
    let mut access = policy();
    assert_eq!(
        access.allow(&engine_account(), AccountId::ZERO),
        Err(GovernorError::ZeroTargetRejected)
    );
}

#[test]
fn test_allow_rejects_engine() {
    let mut access = policy();
    assert_eq!(
        access.allow(&engine_account(), engine_account()),
        Err(GovernorError::SelfTargetRejected)
    );
}

#[test]
fn test_allow_idempotent() {
    let mut access = policy();
    assert_eq!(access.allow(&engine_account(), treasury()), Ok(true));
    assert_eq!(access.allow(&engine_account(), treasury()), Ok(false));
    assert_eq!(access.allowed_targets().count(), 1);
}

#[test]
fn test_disallow_requires_self() {
    let mut access = policy();
    access.allow(&engine_account(), treasury()).unwrap();
    assert_eq!(
        access.disallow(&bob(), treasury()),
        Err(GovernorError::CallerNotSelf(bob()))
    );
    assert!(access.is_allowed_target(&treasury()));
}

#[test]
fn test_disallow_removes() {
    let mut access = policy();
    access.allow(&engine_account(), treasury()).unwrap();
    access.disallow(&engine_account(), treasury()).unwrap();
    assert!(!access.is_allowed_target(&treasury()));
}

#[test]
fn test_disallow_unknown_fails() {
    let mut access = policy();
    assert_eq!(
        access.disallow(&engine_account(), treasury()),
        Err(GovernorError::UnknownOrAlreadyDisallowed(treasury()))
    );
    access.allow(&engine_account(), treasury()).unwrap();
    access.disallow(&engine_account(), treasury()).unwrap();
    assert_eq!(
        access.disallow(&engine_account(), treasury()),
        Err(GovernorError::UnknownOrAlreadyDisallowed(treasury()))
    );
}

#[test]
fn test_fresh_policy_validates() {
    let access = policy();
    assert!(access.validate().is_ok());
}
