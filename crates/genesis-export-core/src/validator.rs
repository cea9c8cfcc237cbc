//! Validator-facing records: the delegated provider's view, the neutral
//! snapshot record, and per-validator signing info.

use serde::{Deserialize, Serialize};

use crate::types::ConsAddress;

/// A validator as the delegated validator-set provider reports it.
///
/// On a consumer chain this is the cross-chain validator entry: its authority
/// comes from the provider chain, not from local stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedValidator {
    /// Consensus address.
    pub address: ConsAddress,
    /// Voting power as assigned by the provider.
    pub power: i64,
    /// Consensus public key, if the provider tracks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<Vec<u8>>,
}

impl DelegatedValidator {
    /// Create a delegated validator without a public key.
    pub fn new(address: ConsAddress, power: i64) -> Self {
        Self {
            address,
            power,
            pub_key: None,
        }
    }

    /// Attach a consensus public key.
    pub fn with_pub_key(mut self, pub_key: impl Into<Vec<u8>>) -> Self {
        self.pub_key = Some(pub_key.into());
        self
    }
}

/// A validator entry in an exported snapshot.
///
/// A read-only projection of a [`DelegatedValidator`]; it holds no reference
/// back to the source record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRecord {
    pub address: ConsAddress,
    pub power: i64,
}

impl From<&DelegatedValidator> for ValidatorRecord {
    fn from(v: &DelegatedValidator) -> Self {
        Self {
            address: v.address.clone(),
            power: v.power,
        }
    }
}

/// Slashing bookkeeping for one validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningInfo {
    /// The validator this record belongs to.
    pub address: ConsAddress,
    /// Height at which infraction tracking began.
    pub start_height: u64,
    /// Index into the missed-blocks bit array.
    pub index_offset: u64,
    /// Jailed until this time (Unix ms); 0 if never jailed.
    pub jailed_until_ms: i64,
    /// Permanently removed from the set after a double sign.
    pub tombstoned: bool,
    /// Missed blocks in the current window.
    pub missed_blocks_counter: u64,
}

impl SigningInfo {
    /// A fresh record that started tracking at `start_height`.
    pub fn new(address: ConsAddress, start_height: u64) -> Self {
        Self {
            address,
            start_height,
            index_offset: 0,
            jailed_until_ms: 0,
            tombstoned: false,
            missed_blocks_counter: 0,
        }
    }

    /// The same record with its tracking restarted at height zero.
    ///
    /// Every other field is carried over unchanged.
    pub fn reset_for_zero_height(&self) -> Self {
        Self {
            start_height: 0,
            ..self.clone()
        }
    }
}
