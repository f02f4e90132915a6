//! Constants and runtime settings for the Governor.
//!
//! ## Settings Mapping
//!
//! | Governor setting   | Here                           |
//! |--------------------|--------------------------------|
//! | votingPeriod()     | `GovernorConfig::voting_period` |
//! | quorumNumerator()  | `GovernorConfig::quorum_bp`     |
//! | quorumDenominator  | `BPS_DENOMINATOR`               |
//! | clock lag          | `SNAPSHOT_LAG`                  |
//!
//! Settings load from TOML. `voting_period` accepts either integer seconds
//! or a human-readable duration:
//!
//! ```toml
//! voting_period = "3days"
//! quorum_bp = 1000
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::foundation::error::ConfigError;
use crate::foundation::types::Timepoint;

/// Size of an account identity in bytes (RIPEMD160-sized id)
pub const ACCOUNT_ID_SIZE: usize = 20;

/// Size of an operation discriminator at the head of every payload
pub const SELECTOR_SIZE: usize = 4;

/// Size of a proposal description hash (SHA-256)
pub const DESCRIPTION_HASH_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════
// GOVERNANCE SETTINGS
// ═══════════════════════════════════════════════════════════════════════

/// Duration in seconds that voting remains open after creation.
/// Default: 3 days (259200 seconds)
pub const VOTING_PERIOD: u64 = 259_200;

/// Quorum in basis points of the snapshot total supply.
/// Default: 1000 bp = 10%
pub const QUORUM_BP: u32 = 1_000;

/// Basis points denominator
pub const BPS_DENOMINATOR: u32 = 10_000;

/// How far behind "now" the latest finalized snapshot sits. Power movement
/// within the creation instant cannot influence the proposal.
pub const SNAPSHOT_LAG: Timepoint = 1;

// ═══════════════════════════════════════════════════════════════════════
// SELF-OPERATION SIGNATURES
// ═══════════════════════════════════════════════════════════════════════

/// Signature of the whitelist-grow operation the engine may call on itself
pub const ALLOW_TARGET_SIGNATURE: &str = "allow(account)";

/// Signature of the whitelist-shrink operation the engine may call on itself
pub const DISALLOW_TARGET_SIGNATURE: &str = "disallow(account)";

/// Runtime settings for a Governor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GovernorConfig {
    /// Voting window in seconds
    #[serde(
        serialize_with = "serialize_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub voting_period: u64,
    /// Quorum numerator in basis points (0..=10000)
    pub quorum_bp: u32,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            voting_period: VOTING_PERIOD,
            quorum_bp: QUORUM_BP,
        }
    }
}

impl GovernorConfig {
    pub fn new(voting_period: u64, quorum_bp: u32) -> Result<Self, ConfigError> {
        let config = Self {
            voting_period,
            quorum_bp,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable by the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.voting_period == 0 {
            return Err(ConfigError::ZeroVotingPeriod);
        }
        if self.quorum_bp > BPS_DENOMINATOR {
            return Err(ConfigError::QuorumOutOfRange(self.quorum_bp));
        }
        Ok(())
    }

    /// Parse and validate settings from TOML text. Missing keys take defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GovernorConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Parse a duration given as seconds ("259200") or humantime ("3days", "72h").
pub fn parse_duration_secs(input: &str) -> Result<u64, ConfigError> {
    let trimmed = input.trim();
    if let Ok(secs) = trimmed.parse::<u64>() {
        return Ok(secs);
    }
    humantime::parse_duration(trimmed)
        .map(|d| d.as_secs())
        .map_err(|e| ConfigError::InvalidDuration {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DurationRepr {
    Secs(u64),
    Human(String),
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match DurationRepr::deserialize(deserializer)? {
        DurationRepr::Secs(secs) => Ok(secs),
        DurationRepr::Human(text) => parse_duration_secs(&text).map_err(serde::de::Error::custom),
    }
}

fn serialize_duration<S>(secs: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let text = humantime::format_duration(Duration::from_secs(*secs)).to_string();
    serializer.serialize_str(&text)
}
