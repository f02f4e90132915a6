//! Persisted state format: CBOR via `ciborium`.
//!
//! The whole engine state (proposals, vote ledger, access policy, event log)
//! encodes as one CBOR document. Decoding re-checks the structural
//! invariants before the state is handed back to an engine, so a truncated
//! or hand-edited document cannot smuggle in a misaligned ledger or an
//! extra self-operation.

use serde::{de::DeserializeOwned, Serialize};

use crate::foundation::error::{GovernorError, GovernorResult};
use crate::governance::state::GovernorState;

/// Serialize any value to CBOR bytes.
pub fn to_cbor<T: Serialize>(value: &T) -> GovernorResult<Vec<u8>> {
    let mut bytes = Vec::new();
    ciborium::into_writer(value, &mut bytes)
        .map_err(|e| GovernorError::StateCodec(format!("encode: {:?}", e)))?;
    Ok(bytes)
}

/// Deserialize any value from CBOR bytes.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> GovernorResult<T> {
    ciborium::from_reader(bytes).map_err(|e| GovernorError::StateCodec(format!("decode: {:?}", e)))
}

/// Encode engine state for storage.
pub fn encode_state(state: &GovernorState) -> GovernorResult<Vec<u8>> {
    to_cbor(state)
}

/// Decode engine state and validate it.
pub fn decode_state(bytes: &[u8]) -> GovernorResult<GovernorState> {
    let state: GovernorState = from_cbor(bytes)?;
    state.validate()?;
    Ok(state)
}
