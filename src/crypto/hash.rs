//! Deterministic hashing for selectors and proposal descriptions.
//!
//! Selectors are derived from operation signatures with an FNV-1a pass plus
//! a final avalanche fold down to 32 bits. The derivation is a `const fn`
//! so the pre-authorized self-operation selectors are compile-time constants.
//!
//! Description hashes bind a proposal to its off-core text with SHA-256.

use sha2::{Digest, Sha256};

use crate::foundation::config::{ALLOW_TARGET_SIGNATURE, DISALLOW_TARGET_SIGNATURE};
use crate::foundation::types::{DescriptionHash, Selector};

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Derive the 4-byte selector of an operation signature such as
/// `"allow(account)"`. Big-endian bytes of the folded hash.
pub const fn selector(signature: &str) -> Selector {
    let bytes = signature.as_bytes();
    let mut h: u64 = FNV_OFFSET_BASIS;

    let mut i = 0;
    while i < bytes.len() {
        h ^= bytes[i] as u64;
        h = h.wrapping_mul(FNV_PRIME);
        i += 1;
    }

    // Final avalanche: fold 64-bit down to 32-bit with mixing
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51afd7ed558ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ceb9fe1a85ec53);
    h ^= h >> 33;

    Selector((h as u32).to_be_bytes())
}

/// Selector of the whitelist-grow self-operation.
pub const ALLOW_TARGET_SELECTOR: Selector = selector(ALLOW_TARGET_SIGNATURE);

/// Selector of the whitelist-shrink self-operation.
pub const DISALLOW_TARGET_SELECTOR: Selector = selector(DISALLOW_TARGET_SIGNATURE);

/// SHA-256 of a proposal description.
pub fn description_hash(description: &str) -> DescriptionHash {
    let digest = Sha256::digest(description.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
