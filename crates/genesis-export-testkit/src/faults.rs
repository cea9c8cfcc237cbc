//! Fault injection: collaborators that fail on demand.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use genesis_export_core::{ConsAddress, DelegatedValidator, ExportContext, ModuleName, SigningInfo};
use genesis_export_store::{
    ModuleExporter, Result, SigningInfoCursor, SigningInfoStore, StoreError, ValidatorSetProvider,
};
use serde_json::Value;

/// A validator-set provider whose backend is unreachable.
pub struct UnavailableValidators;

impl ValidatorSetProvider for UnavailableValidators {
    fn all_validators(&self, _ctx: &ExportContext) -> Result<Vec<DelegatedValidator>> {
        Err(StoreError::Unavailable("provider chain unreachable".into()))
    }
}

/// Wraps a signing-info store and fails the `fail_at`-th write (1-based).
///
/// Writes before it go through to the inner store; nothing is written at or
/// after the failing call unless the caller keeps going.
pub struct FailingSigningInfoStore {
    inner: Arc<dyn SigningInfoStore>,
    fail_at: usize,
    attempts: AtomicUsize,
}

impl FailingSigningInfoStore {
    pub fn new(inner: Arc<dyn SigningInfoStore>, fail_at: usize) -> Self {
        Self {
            inner,
            fail_at,
            attempts: AtomicUsize::new(0),
        }
    }

    /// Write attempts seen so far, including the failed one.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl SigningInfoStore for FailingSigningInfoStore {
    fn signing_info_cursor(&self, ctx: &ExportContext) -> Result<SigningInfoCursor> {
        self.inner.signing_info_cursor(ctx)
    }

    fn get_signing_info(
        &self,
        ctx: &ExportContext,
        address: &ConsAddress,
    ) -> Result<Option<SigningInfo>> {
        self.inner.get_signing_info(ctx, address)
    }

    fn set_signing_info(
        &self,
        ctx: &ExportContext,
        address: &ConsAddress,
        info: &SigningInfo,
    ) -> Result<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt == self.fail_at {
            return Err(StoreError::Unavailable(format!(
                "write {} for {} rejected",
                attempt, address
            )));
        }
        self.inner.set_signing_info(ctx, address, info)
    }
}

/// A module whose export always fails.
pub struct FailingModule {
    name: ModuleName,
}

impl FailingModule {
    pub fn new(name: ModuleName) -> Self {
        Self { name }
    }
}

impl ModuleExporter for FailingModule {
    fn name(&self) -> &ModuleName {
        &self.name
    }

    fn export_genesis(&self, _ctx: &ExportContext) -> Result<Value> {
        Err(StoreError::ModuleExport {
            module: self.name.clone(),
            reason: "store iterator closed".into(),
        })
    }
}
