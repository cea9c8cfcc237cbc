//! Zero-height preparation: rewrites per-validator bookkeeping so the
//! exported state is valid as height zero of a new chain.

use std::sync::Arc;

use genesis_export_core::ExportContext;
use genesis_export_store::{InvariantChecker, SigningInfoStore};

use crate::error::FatalError;

/// What a zero-height pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroHeightReport {
    /// Signing infos whose start height was reset.
    pub signing_infos_reset: usize,
    /// Validators exempt from zero-height jailing, as passed in.
    pub jail_allowed: Vec<String>,
}

/// Prepares state for a zero-height export.
///
/// Runs against the same context as the rest of the export. The only state
/// it mutates is signing info.
pub struct ZeroHeightPreparer {
    invariants: Arc<dyn InvariantChecker>,
    signing_infos: Arc<dyn SigningInfoStore>,
}

impl ZeroHeightPreparer {
    /// Create a preparer.
    pub fn new(
        invariants: Arc<dyn InvariantChecker>,
        signing_infos: Arc<dyn SigningInfoStore>,
    ) -> Self {
        Self {
            invariants,
            signing_infos,
        }
    }

    /// Assert invariants, then restart infraction tracking at height zero
    /// for every validator.
    ///
    /// `jail_allowed_addrs` is carried through to the report; no jailing is
    /// performed here.
    ///
    /// # Errors
    ///
    /// Any error is fatal. The first persistence failure stops the rewrite,
    /// leaving later records untouched.
    pub fn prepare(
        &self,
        ctx: &ExportContext,
        jail_allowed_addrs: &[String],
    ) -> Result<ZeroHeightReport, FatalError> {
        // 1. Never export from broken state
        self.invariants.assert_invariants(ctx)?;

        // 2. Reset start height on every signing info
        let cursor = self
            .signing_infos
            .signing_info_cursor(ctx)
            .map_err(FatalError::SigningInfoIteration)?;

        let mut reset = 0;
        for info in cursor {
            let updated = info.reset_for_zero_height();
            self.signing_infos
                .set_signing_info(ctx, &info.address, &updated)
                .map_err(|source| FatalError::Persistence {
                    address: info.address.clone(),
                    source,
                })?;
            reset += 1;
        }

        tracing::debug!(
            signing_infos_reset = reset,
            jail_allowed = jail_allowed_addrs.len(),
            height = ctx.height(),
            "prepared state for zero-height export"
        );

        Ok(ZeroHeightReport {
            signing_infos_reset: reset,
            jail_allowed: jail_allowed_addrs.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genesis_export_core::{ConsAddress, SigningInfo};
    use genesis_export_store::{
        InvariantRegistry, MemoryChain, SigningInfoCursor, StoreError,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn addr(byte: u8) -> ConsAddress {
        ConsAddress::from_bytes(vec![byte; 20])
    }

    fn seeded_chain(n: u8) -> Arc<MemoryChain> {
        let chain = MemoryChain::at_height(100);
        for b in 1..=n {
            chain
                .insert_signing_info(SigningInfo::new(addr(b), 10 * b as u64))
                .unwrap();
        }
        Arc::new(chain)
    }

    /// Delegates to a memory chain but fails the n-th write.
    struct FailOnWrite {
        inner: Arc<MemoryChain>,
        fail_at: usize,
        writes: AtomicUsize,
    }

    impl SigningInfoStore for FailOnWrite {
        fn signing_info_cursor(
            &self,
            ctx: &ExportContext,
        ) -> genesis_export_store::Result<SigningInfoCursor> {
            self.inner.signing_info_cursor(ctx)
        }

        fn get_signing_info(
            &self,
            ctx: &ExportContext,
            address: &ConsAddress,
        ) -> genesis_export_store::Result<Option<SigningInfo>> {
            self.inner.get_signing_info(ctx, address)
        }

        fn set_signing_info(
            &self,
            ctx: &ExportContext,
            address: &ConsAddress,
            info: &SigningInfo,
        ) -> genesis_export_store::Result<()> {
            let n = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
            if n == self.fail_at {
                return Err(StoreError::Unavailable("disk full".into()));
            }
            self.inner.set_signing_info(ctx, address, info)
        }
    }

    #[test]
    fn test_resets_every_start_height() {
        let chain = seeded_chain(4);
        let preparer = ZeroHeightPreparer::new(Arc::new(InvariantRegistry::new()), chain.clone());

        let jail = vec!["cosmosvalcons1abc".to_string()];
        let report = preparer.prepare(&ExportContext::pinned(100), &jail).unwrap();

        assert_eq!(report.signing_infos_reset, 4);
        assert_eq!(report.jail_allowed, jail);
        assert!(chain
            .signing_infos()
            .unwrap()
            .iter()
            .all(|i| i.start_height == 0));
    }

    #[test]
    fn test_no_signing_infos_is_fine() {
        let chain = seeded_chain(0);
        let preparer = ZeroHeightPreparer::new(Arc::new(InvariantRegistry::new()), chain);
        let report = preparer.prepare(&ExportContext::pinned(100), &[]).unwrap();
        assert_eq!(report.signing_infos_reset, 0);
    }

    #[test]
    fn test_invariant_violation_stops_before_rewrite() {
        let chain = seeded_chain(3);
        let mut invariants = InvariantRegistry::new();
        invariants.register("bank", "nonnegative-outstanding", |_| {
            Err("negative balance for account".into())
        });
        let preparer = ZeroHeightPreparer::new(Arc::new(invariants), chain.clone());

        let err = preparer.prepare(&ExportContext::pinned(100), &[]).unwrap_err();
        assert!(matches!(err, FatalError::InvariantViolation(ref v) if v.module == "bank"));
        assert_eq!(chain.signing_info_writes().unwrap(), 0);
        assert!(chain
            .signing_infos()
            .unwrap()
            .iter()
            .all(|i| i.start_height != 0));
    }

    #[test]
    fn test_persistence_failure_aborts_immediately() {
        let chain = seeded_chain(5);
        let store = Arc::new(FailOnWrite {
            inner: chain.clone(),
            fail_at: 3,
            writes: AtomicUsize::new(0),
        });
        let preparer = ZeroHeightPreparer::new(Arc::new(InvariantRegistry::new()), store.clone());

        let err = preparer.prepare(&ExportContext::pinned(100), &[]).unwrap_err();
        match err {
            FatalError::Persistence { address, .. } => assert_eq!(address, addr(3)),
            other => panic!("unexpected error: {other}"),
        }

        // Third write failed, nothing after it was attempted
        assert_eq!(store.writes.load(Ordering::SeqCst), 3);
        let infos = chain.signing_infos().unwrap();
        assert_eq!(infos[0].start_height, 0);
        assert_eq!(infos[1].start_height, 0);
        assert_eq!(infos[2].start_height, 30);
        assert_eq!(infos[3].start_height, 40);
        assert_eq!(infos[4].start_height, 50);
    }
}
