//! The export coordinator: turns live chain state into a portable snapshot.

use std::collections::BTreeSet;
use std::sync::Arc;

use bytes::Bytes;
use genesis_export_core::{canonical_app_state, ExportContext, ExportedState, ModuleName};
use genesis_export_store::{
    ChainHead, ConsensusParamsSource, InvariantChecker, ModuleAggregator, SigningInfoStore,
    ValidatorSetProvider,
};

use crate::config::{ExportConfig, HaltPolicy};
use crate::error::{ExportError, Result};
use crate::validators::ValidatorSetReader;
use crate::zero_height::ZeroHeightPreparer;

/// Everything the coordinator reads state through.
#[derive(Clone)]
pub struct Collaborators {
    pub chain_head: Arc<dyn ChainHead>,
    pub aggregator: Arc<dyn ModuleAggregator>,
    pub invariants: Arc<dyn InvariantChecker>,
    pub signing_infos: Arc<dyn SigningInfoStore>,
    pub validators: Arc<dyn ValidatorSetProvider>,
    pub consensus_params: Arc<dyn ConsensusParamsSource>,
}

impl Collaborators {
    /// Wire collaborators where one backend serves all chain-level reads.
    pub fn from_chain<C>(
        chain: Arc<C>,
        aggregator: Arc<dyn ModuleAggregator>,
        invariants: Arc<dyn InvariantChecker>,
    ) -> Self
    where
        C: ChainHead + SigningInfoStore + ValidatorSetProvider + ConsensusParamsSource + 'static,
    {
        Self {
            chain_head: chain.clone(),
            aggregator,
            invariants,
            signing_infos: chain.clone(),
            validators: chain.clone(),
            consensus_params: chain,
        }
    }
}

/// Orchestrates an export.
///
/// Pins a context at the last committed height, optionally prepares state
/// for a zero-height start, aggregates module genesis, reads the delegated
/// validator set and consensus params, and assembles an [`ExportedState`].
///
/// The caller must keep block processing from mutating state for the
/// duration of [`ExportCoordinator::export`].
pub struct ExportCoordinator {
    chain_head: Arc<dyn ChainHead>,
    aggregator: Arc<dyn ModuleAggregator>,
    consensus_params: Arc<dyn ConsensusParamsSource>,
    preparer: ZeroHeightPreparer,
    validator_reader: ValidatorSetReader,
    config: ExportConfig,
}

impl ExportCoordinator {
    /// Create a coordinator.
    pub fn new(collaborators: Collaborators, config: ExportConfig) -> Self {
        Self {
            chain_head: collaborators.chain_head,
            aggregator: collaborators.aggregator,
            consensus_params: collaborators.consensus_params,
            preparer: ZeroHeightPreparer::new(
                collaborators.invariants,
                collaborators.signing_infos,
            ),
            validator_reader: ValidatorSetReader::new(
                collaborators.validators,
                config.validate_validator_set,
            ),
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export application state and the validator set.
    ///
    /// - `for_zero_height`: report height 0 and rewrite signing infos so the
    ///   snapshot is a valid starting point for a new chain.
    /// - `jail_allowed_addrs`: passed through to zero-height preparation.
    /// - `modules_to_export`: empty means every registered module.
    ///
    /// Either a complete [`ExportedState`] is returned or an error; never a
    /// partial snapshot.
    pub fn export(
        &self,
        for_zero_height: bool,
        jail_allowed_addrs: &[String],
        modules_to_export: &[ModuleName],
    ) -> Result<ExportedState> {
        let committed = self
            .chain_head
            .last_block_height()
            .map_err(ExportError::ChainHead)?;

        // Read as if pending settlements for the next block had already run
        let ctx = ExportContext::pinned(committed);


        let modules: Vec<ModuleName> = modules_to_export
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        tracing::info!(
            committed,
            for_zero_height,
            modules = modules.len(),
            "starting state export"
        );

        // The consensus engine starts the new chain at committed + 1
        let height = if for_zero_height {
            self.prepare_zero_height(&ctx, jail_allowed_addrs)?;
            0
        } else {
            committed
                .checked_add(1)
                .ok_or(ExportError::HeightOverflow(committed))?
        };

        let doc = self
            .aggregator
            .aggregate_genesis(&ctx, &modules)
            .map_err(|e| {
                tracing::warn!(error = %e, "module state aggregation failed");
                ExportError::Aggregation(e)
            })?;

        let app_state = canonical_app_state(&doc)?;

        let validators = self.validator_reader.read(&ctx).map_err(|e| {
            tracing::warn!(error = %e, "validator set read failed");
            ExportError::ValidatorSet(e)
        })?;

        let consensus_params = self
            .consensus_params
            .consensus_params(&ctx)
            .map_err(ExportError::ConsensusParams)?;

        let exported = ExportedState {
            app_state: Bytes::from(app_state),
            validators,
            height,
            consensus_params,
        };

        tracing::info!(
            height = exported.height,
            modules = doc.len(),
            validators = exported.validators.len(),
            app_state_digest = %exported.app_state_digest(),
            "state export complete"
        );

        Ok(exported)
    }

    /// Run zero-height preparation under the configured halt policy.
    fn prepare_zero_height(&self, ctx: &ExportContext, jail_allowed_addrs: &[String]) -> Result<()> {
        match self.preparer.prepare(ctx, jail_allowed_addrs) {
            Ok(report) => {
                tracing::info!(
                    signing_infos_reset = report.signing_infos_reset,
                    jail_allowed = report.jail_allowed.len(),
                    "zero-height preparation done"
                );
                Ok(())
            }
            Err(fatal) => {
                tracing::error!(error = %fatal, "zero-height preparation failed, export aborted");
                match self.config.halt_policy {
                    HaltPolicy::Panic => panic!("zero-height preparation failed: {}", fatal),
                    HaltPolicy::Propagate => Err(ExportError::Fatal(fatal)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genesis_export_core::{
        ConsAddress, ConsensusParams, DelegatedValidator, SigningInfo, ValidatorRecord,
    };
    use genesis_export_store::{
        InvariantRegistry, MemoryChain, ModuleRegistry, StaticModule, StoreError,
    };
    use serde_json::json;

    fn addr(byte: u8) -> ConsAddress {
        ConsAddress::from_bytes(vec![byte; 20])
    }

    fn name(s: &str) -> ModuleName {
        ModuleName::new(s).unwrap()
    }

    fn chain() -> Arc<MemoryChain> {
        let chain = MemoryChain::at_height(100);
        chain
            .set_validators(vec![
                DelegatedValidator::new(addr(1), 50),
                DelegatedValidator::new(addr(2), 30),
                DelegatedValidator::new(addr(3), 20),
            ])
            .unwrap();
        for b in 1..=3 {
            chain
                .insert_signing_info(SigningInfo::new(addr(b), 40 + b as u64))
                .unwrap();
        }
        chain
            .set_consensus_params(ConsensusParams::from_bytes(&b"max_gas=-1"[..]))
            .unwrap();
        Arc::new(chain)
    }

    fn registry() -> Arc<ModuleRegistry> {
        let mut reg = ModuleRegistry::new();
        for m in ["auth", "bank", "ccvconsumer"] {
            reg.register(Arc::new(StaticModule::new(name(m), json!({ "module": m }))))
                .unwrap();
        }
        Arc::new(reg)
    }

    fn coordinator(chain: Arc<MemoryChain>, config: ExportConfig) -> ExportCoordinator {
        ExportCoordinator::new(
            Collaborators::from_chain(chain, registry(), Arc::new(InvariantRegistry::new())),
            config,
        )
    }

    #[test]
    fn test_export_at_next_height() {
        let exporter = coordinator(chain(), ExportConfig::propagating());
        let exported = exporter.export(false, &[], &[]).unwrap();

        assert_eq!(exported.height, 101);
        assert_eq!(exported.total_power(), 100);
        assert_eq!(exported.app_state_document().unwrap().len(), 3);
        assert_eq!(exported.consensus_params.as_bytes(), b"max_gas=-1");
        assert_eq!(
            exported.validators[0],
            ValidatorRecord {
                address: addr(1),
                power: 50
            }
        );
    }

    #[test]
    fn test_next_height_overflow_is_error() {
        let chain = chain();
        chain.set_last_block_height(u64::MAX).unwrap();
        let exporter = coordinator(chain, ExportConfig::propagating());

        let err = exporter.export(false, &[], &[]).unwrap_err();
        assert!(matches!(err, ExportError::HeightOverflow(u64::MAX)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_zero_height_export_at_max_height() {
        let chain = chain();
        chain.set_last_block_height(u64::MAX).unwrap();
        let exporter = coordinator(chain, ExportConfig::propagating());

        assert_eq!(exporter.export(true, &[], &[]).unwrap().height, 0);
    }

    #[test]
    fn test_non_zero_height_export_leaves_signing_infos() {
        let chain = chain();
        let exporter = coordinator(chain.clone(), ExportConfig::propagating());
        exporter.export(false, &[], &[]).unwrap();

        assert_eq!(chain.signing_info_writes().unwrap(), 0);
        assert!(chain
            .signing_infos()
            .unwrap()
            .iter()
            .all(|i| i.start_height > 40));
    }

    #[test]
    fn test_zero_height_export() {
        let chain = chain();
        let exporter = coordinator(chain.clone(), ExportConfig::propagating());
        let exported = exporter.export(true, &[], &[]).unwrap();

        assert_eq!(exported.height, 0);
        assert!(chain
            .signing_infos()
            .unwrap()
            .iter()
            .all(|i| i.start_height == 0));
    }

    #[test]
    fn test_duplicate_module_names_collapse() {
        let exporter = coordinator(chain(), ExportConfig::propagating());
        let exported = exporter
            .export(false, &[], &[name("bank"), name("bank")])
            .unwrap();
        let doc = exported.app_state_document().unwrap();
        assert_eq!(doc.len(), 1);
        assert!(doc.contains_key(&name("bank")));
    }

    #[test]
    fn test_unknown_module_is_aggregation_error() {
        let exporter = coordinator(chain(), ExportConfig::propagating());
        let err = exporter.export(false, &[], &[name("gov")]).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Aggregation(StoreError::UnknownModule(_))
        ));
    }

    #[test]
    fn test_empty_validator_set_is_error() {
        let chain = chain();
        chain.set_validators(vec![]).unwrap();
        let exporter = coordinator(chain, ExportConfig::propagating());

        let err = exporter.export(false, &[], &[]).unwrap_err();
        assert!(err.is_empty_validator_set());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_broken_invariant_propagates_when_configured() {
        let chain = chain();
        let mut invariants = InvariantRegistry::new();
        invariants.register("staking", "supply", |_| Err("supply mismatch".into()));
        let exporter = ExportCoordinator::new(
            Collaborators::from_chain(chain.clone(), registry(), Arc::new(invariants)),
            ExportConfig::propagating(),
        );

        let err = exporter.export(true, &[], &[]).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(chain.signing_info_writes().unwrap(), 0);
    }

    #[test]
    #[should_panic(expected = "zero-height preparation failed")]
    fn test_broken_invariant_halts_by_default() {
        let mut invariants = InvariantRegistry::new();
        invariants.register("staking", "supply", |_| Err("supply mismatch".into()));
        let exporter = ExportCoordinator::new(
            Collaborators::from_chain(chain(), registry(), Arc::new(invariants)),
            ExportConfig::default(),
        );

        let _ = exporter.export(true, &[], &[]);
    }

    #[test]
    fn test_broken_invariant_ignored_without_zero_height() {
        let mut invariants = InvariantRegistry::new();
        invariants.register("staking", "supply", |_| Err("supply mismatch".into()));
        let exporter = ExportCoordinator::new(
            Collaborators::from_chain(chain(), registry(), Arc::new(invariants)),
            ExportConfig::default(),
        );

        assert_eq!(exporter.export(false, &[], &[]).unwrap().height, 101);
    }
}
