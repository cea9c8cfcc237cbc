//! Collaborator traits: the interfaces the exporter reads state through.
//!
//! The exporter never touches module state directly. Everything it needs
//! comes through these traits, which lets it run against the in-memory
//! backend in tests and against a real node's stores in production.
//!
//! All traits are synchronous. An export is a single flow of control with no
//! suspension points.

use std::ops::ControlFlow;

use genesis_export_core::{
    AppStateDocument, ConsAddress, ConsensusParams, DelegatedValidator, ExportContext,
    ModuleName, SigningInfo,
};
use thiserror::Error;

use crate::error::Result;

/// Source of the last committed block height.
pub trait ChainHead: Send + Sync {
    /// Height of the last committed block.
    fn last_block_height(&self) -> Result<u64>;
}

/// Produces the combined genesis document for a set of modules.
pub trait ModuleAggregator: Send + Sync {
    /// Export genesis for the named modules, keyed by module name.
    ///
    /// An empty `modules` slice means every registered module.
    fn aggregate_genesis(
        &self,
        ctx: &ExportContext,
        modules: &[ModuleName],
    ) -> Result<AppStateDocument>;
}

/// A broken invariant, as reported by an [`InvariantChecker`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invariant {module}/{route} broken: {message}")]
pub struct InvariantViolation {
    /// Module owning the invariant.
    pub module: String,
    /// Route of the invariant within the module.
    pub route: String,
    /// What the invariant found.
    pub message: String,
}

/// Global consistency checks over module state.
///
/// A checker only reports. Whether a violation halts the process is up to
/// the caller.
pub trait InvariantChecker: Send + Sync {
    /// Run every registered invariant, returning the first violation.
    fn assert_invariants(&self, ctx: &ExportContext) -> std::result::Result<(), InvariantViolation>;
}

/// A cursor over a snapshot of signing-info records.
///
/// Records are materialized when the cursor is opened, so writing back
/// through [`SigningInfoStore::set_signing_info`] while walking the cursor
/// is safe.
#[derive(Debug)]
pub struct SigningInfoCursor {
    records: std::vec::IntoIter<SigningInfo>,
}

impl SigningInfoCursor {
    /// Create a cursor over the given records.
    pub fn new(records: Vec<SigningInfo>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }

    /// Records not yet yielded.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl Iterator for SigningInfoCursor {
    type Item = SigningInfo;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

/// Per-validator signing-info persistence (slashing bookkeeping).
pub trait SigningInfoStore: Send + Sync {
    /// Open a cursor over every signing-info record.
    fn signing_info_cursor(&self, ctx: &ExportContext) -> Result<SigningInfoCursor>;

    /// Get the signing info for one validator.
    fn get_signing_info(
        &self,
        ctx: &ExportContext,
        address: &ConsAddress,
    ) -> Result<Option<SigningInfo>>;

    /// Write a validator's signing info, replacing any existing record.
    fn set_signing_info(
        &self,
        ctx: &ExportContext,
        address: &ConsAddress,
        info: &SigningInfo,
    ) -> Result<()>;

    /// Visit every record until the visitor breaks.
    fn iterate_signing_infos(
        &self,
        ctx: &ExportContext,
        visit: &mut dyn FnMut(&SigningInfo) -> ControlFlow<()>,
    ) -> Result<()> {
        for info in self.signing_info_cursor(ctx)? {
            if visit(&info).is_break() {
                break;
            }
        }
        Ok(())
    }
}

/// The delegated validator-set provider.
///
/// On a consumer chain the validator set is assigned by the provider chain;
/// this trait exposes that assignment, not locally bonded stake.
pub trait ValidatorSetProvider: Send + Sync {
    /// All validators currently in the delegated set, in provider order.
    fn all_validators(&self, ctx: &ExportContext) -> Result<Vec<DelegatedValidator>>;
}

/// Access to the consensus parameters in effect.
pub trait ConsensusParamsSource: Send + Sync {
    /// Consensus parameters at the context's height.
    fn consensus_params(&self, ctx: &ExportContext) -> Result<ConsensusParams>;
}
