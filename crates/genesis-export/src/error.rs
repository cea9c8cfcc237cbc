//! Error types for the exporter.

use genesis_export_core::{ConsAddress, CoreError, ValidationError};
use genesis_export_store::{InvariantViolation, StoreError};
use thiserror::Error;

/// Errors reading the delegated validator set.
#[derive(Debug, Error)]
pub enum ValidatorSetError {
    /// The provider could not be read.
    #[error("validator set provider failed: {0}")]
    Provider(#[source] StoreError),

    /// The provider returned no validators; a chain started from this
    /// snapshot could never produce a block.
    #[error("empty validator set")]
    Empty,

    /// A record failed structural validation.
    #[error("invalid validator set: {0}")]
    Invalid(#[from] ValidationError),
}

/// Unrecoverable errors from zero-height preparation.
///
/// Signing infos may already be partially rewritten when one of these is
/// raised, so none of them can be retried in place.
#[derive(Debug, Error)]
pub enum FatalError {
    /// State invariants were already broken before export.
    #[error("invariant violation: {0}")]
    InvariantViolation(#[from] InvariantViolation),

    /// A signing-info rewrite failed to persist.
    #[error("failed to persist signing info for {address}: {source}")]
    Persistence {
        address: ConsAddress,
        #[source]
        source: StoreError,
    },

    /// The signing-info cursor could not be opened.
    #[error("failed to iterate signing infos: {0}")]
    SigningInfoIteration(#[source] StoreError),
}

/// Errors that can occur during an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The last committed height could not be read.
    #[error("failed to read chain head: {0}")]
    ChainHead(#[source] StoreError),

    /// The committed height is the last representable one; there is no
    /// next height to start a chain at.
    #[error("no height after committed height {0}")]
    HeightOverflow(u64),

    /// Module state aggregation failed.
    #[error("module state aggregation failed: {0}")]
    Aggregation(#[source] StoreError),

    /// The combined document could not be rendered.
    #[error("failed to encode app state: {0}")]
    Encoding(#[from] CoreError),

    /// Validator set read failed or was empty.
    #[error("validator set error: {0}")]
    ValidatorSet(#[from] ValidatorSetError),

    /// Consensus params could not be read.
    #[error("failed to read consensus params: {0}")]
    ConsensusParams(#[source] StoreError),

    /// Zero-height preparation failed and the halt policy returned it.
    #[error("fatal: {0}")]
    Fatal(#[from] FatalError),
}

impl ExportError {
    /// Whether this error left state in a condition needing an operator.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExportError::Fatal(_))
    }

    /// Whether this error is the empty-validator-set rejection.
    pub fn is_empty_validator_set(&self) -> bool {
        matches!(self, ExportError::ValidatorSet(ValidatorSetError::Empty))
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
