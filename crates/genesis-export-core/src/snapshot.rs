//! The exported snapshot handed back to the caller.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical::{parse_app_state, AppStateDocument};
use crate::crypto::StateDigest;
use crate::error::CoreError;
use crate::validator::ValidatorRecord;

/// Consensus parameters, passed through without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams(pub Bytes);

impl ConsensusParams {
    /// Wrap an encoded params blob.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Get the raw blob.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A complete, self-contained export of application state.
///
/// Built once per export call; the caller owns it outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedState {
    /// Canonical indented JSON, keyed by module name.
    pub app_state: Bytes,
    /// Validator set, in provider order.
    pub validators: Vec<ValidatorRecord>,
    /// Height the next chain starts from: 0 for zero-height exports,
    /// otherwise last committed height + 1.
    pub height: u64,
    /// Opaque consensus parameters.
    pub consensus_params: ConsensusParams,
}

impl ExportedState {
    /// Blake3 digest of the app-state bytes.
    pub fn app_state_digest(&self) -> StateDigest {
        StateDigest::hash(&self.app_state)
    }

    /// Parse the app state back into a module-keyed document.
    pub fn app_state_document(&self) -> Result<AppStateDocument, CoreError> {
        parse_app_state(&self.app_state)
    }

    /// Sum of all validator powers.
    pub fn total_power(&self) -> i64 {
        self.validators.iter().map(|v| v.power).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConsAddress;

    #[test]
    fn test_total_power_and_document() {
        let state = ExportedState {
            app_state: Bytes::from_static(b"{\n  \"bank\": {}\n}"),
            validators: vec![
                ValidatorRecord {
                    address: ConsAddress::from_bytes(vec![1; 20]),
                    power: 50,
                },
                ValidatorRecord {
                    address: ConsAddress::from_bytes(vec![2; 20]),
                    power: 30,
                },
            ],
            height: 101,
            consensus_params: ConsensusParams::default(),
        };

        assert_eq!(state.total_power(), 80);
        let doc = state.app_state_document().unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(state.app_state_digest(), StateDigest::hash(&state.app_state));
    }
}
