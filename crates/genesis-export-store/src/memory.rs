//! In-memory chain state implementing the collaborator traits.
//!
//! This is primarily for testing and for embedding the exporter in tools
//! that assemble state by hand. Nothing is persisted.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use genesis_export_core::{
    ConsAddress, ConsensusParams, DelegatedValidator, ExportContext, SigningInfo,
};

use crate::error::{Result, StoreError};
use crate::traits::{
    ChainHead, ConsensusParamsSource, SigningInfoCursor, SigningInfoStore, ValidatorSetProvider,
};

/// In-memory chain state.
///
/// Serves the chain head, the delegated validator set, signing infos and
/// consensus params. Thread-safe via RwLock.
pub struct MemoryChain {
    inner: RwLock<MemoryChainInner>,
}

struct MemoryChainInner {
    /// Height of the last committed block.
    last_block_height: u64,

    /// Delegated validators, in provider order.
    validators: Vec<DelegatedValidator>,

    /// Signing infos indexed by consensus address.
    signing_infos: BTreeMap<ConsAddress, SigningInfo>,

    /// Consensus params blob.
    consensus_params: ConsensusParams,

    /// Number of signing-info writes served.
    signing_info_writes: u64,
}

impl MemoryChain {
    /// Create an empty chain at height 0.
    pub fn new() -> Self {
        Self::at_height(0)
    }

    /// Create an empty chain whose last committed block is `height`.
    pub fn at_height(height: u64) -> Self {
        Self {
            inner: RwLock::new(MemoryChainInner {
                last_block_height: height,
                validators: Vec::new(),
                signing_infos: BTreeMap::new(),
                consensus_params: ConsensusParams::default(),
                signing_info_writes: 0,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryChainInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryChainInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    /// Advance the committed height by one block.
    pub fn commit_block(&self) -> Result<u64> {
        let mut inner = self.write()?;
        inner.last_block_height += 1;
        Ok(inner.last_block_height)
    }

    /// Set the committed height.
    pub fn set_last_block_height(&self, height: u64) -> Result<()> {
        self.write()?.last_block_height = height;
        Ok(())
    }

    /// Replace the delegated validator set.
    pub fn set_validators(&self, validators: Vec<DelegatedValidator>) -> Result<()> {
        self.write()?.validators = validators;
        Ok(())
    }

    /// Append one validator to the delegated set.
    pub fn push_validator(&self, validator: DelegatedValidator) -> Result<()> {
        self.write()?.validators.push(validator);
        Ok(())
    }

    /// Replace the consensus params blob.
    pub fn set_consensus_params(&self, params: ConsensusParams) -> Result<()> {
        self.write()?.consensus_params = params;
        Ok(())
    }

    /// Insert a signing info keyed by its own address.
    ///
    /// Seeding state this way does not count as a signing-info write.
    pub fn insert_signing_info(&self, info: SigningInfo) -> Result<()> {
        self.write()?.signing_infos.insert(info.address.clone(), info);
        Ok(())
    }

    /// Snapshot of every signing info, in address order.
    pub fn signing_infos(&self) -> Result<Vec<SigningInfo>> {
        Ok(self.read()?.signing_infos.values().cloned().collect())
    }

    /// Number of signing-info writes served through [`SigningInfoStore`].
    pub fn signing_info_writes(&self) -> Result<u64> {
        Ok(self.read()?.signing_info_writes)
    }
}

impl Default for MemoryChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainHead for MemoryChain {
    fn last_block_height(&self) -> Result<u64> {
        Ok(self.read()?.last_block_height)
    }
}

impl ValidatorSetProvider for MemoryChain {
    fn all_validators(&self, _ctx: &ExportContext) -> Result<Vec<DelegatedValidator>> {
        Ok(self.read()?.validators.clone())
    }
}

impl ConsensusParamsSource for MemoryChain {
    fn consensus_params(&self, _ctx: &ExportContext) -> Result<ConsensusParams> {
        Ok(self.read()?.consensus_params.clone())
    }
}

impl SigningInfoStore for MemoryChain {
    fn signing_info_cursor(&self, _ctx: &ExportContext) -> Result<SigningInfoCursor> {
        Ok(SigningInfoCursor::new(self.signing_infos()?))
    }

    fn get_signing_info(
        &self,
        _ctx: &ExportContext,
        address: &ConsAddress,
    ) -> Result<Option<SigningInfo>> {
        Ok(self.read()?.signing_infos.get(address).cloned())
    }

    fn set_signing_info(
        &self,
        _ctx: &ExportContext,
        address: &ConsAddress,
        info: &SigningInfo,
    ) -> Result<()> {
        if &info.address != address {
            return Err(StoreError::InvalidData(format!(
                "signing info for {} stored under {}",
                info.address, address
            )));
        }

        let mut inner = self.write()?;
        inner.signing_infos.insert(address.clone(), info.clone());
        inner.signing_info_writes += 1;
        Ok(())
    }
}
