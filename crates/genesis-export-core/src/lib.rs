//! # Genesis Export Core
//!
//! Pure types for exporting chain state: validator records, signing info,
//! the height-pinned export context, and the canonical app-state document.
//!
//! This crate contains no I/O, no storage, no logging. It is pure data plus
//! the rules for rendering it deterministically.
//!
//! ## Key Types
//!
//! - [`ExportedState`] - The snapshot handed to the caller
//! - [`ValidatorRecord`] - A validator entry in the snapshot
//! - [`DelegatedValidator`] - A validator as the delegated provider reports it
//! - [`SigningInfo`] - Per-validator slashing bookkeeping
//! - [`ExportContext`] - Height-pinned handle for one export call
//!
//! ## Canonicalization
//!
//! App state is rendered as two-space indented JSON with sorted keys. See the
//! [`canonical`] module.

pub mod canonical;
pub mod context;
pub mod crypto;
pub mod error;
pub mod snapshot;
pub mod types;
pub mod validation;
pub mod validator;

pub use canonical::{canonical_app_state, parse_app_state, AppStateDocument};
pub use context::ExportContext;
pub use crypto::StateDigest;
pub use error::{CoreError, ValidationError};
pub use snapshot::{ConsensusParams, ExportedState};
pub use types::{ConsAddress, ModuleName};
pub use validation::{validate_validator_record, validate_validator_records};
pub use validator::{DelegatedValidator, SigningInfo, ValidatorRecord};
