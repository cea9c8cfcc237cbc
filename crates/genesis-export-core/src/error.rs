//! Error types for the export core.

use thiserror::Error;

use crate::types::ConsAddress;

/// Core errors that can occur while building or decoding export types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid module name: {0:?}")]
    InvalidModuleName(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Validation errors for validator records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("validator {address} has negative power {power}")]
    NegativePower { address: ConsAddress, power: i64 },

    #[error("validator at index {0} has an empty address")]
    EmptyAddress(usize),

    #[error("duplicate validator address {0}")]
    DuplicateAddress(ConsAddress),

    #[error("total voting power overflows i64")]
    PowerOverflow,
}
