//! Test fixtures and helpers.
//!
//! Common chain setups for export tests.

use std::ops::ControlFlow;
use std::sync::Arc;

use genesis_export::{Collaborators, ExportConfig, ExportCoordinator};
use genesis_export_core::{
    ConsAddress, ConsensusParams, DelegatedValidator, ExportContext, ModuleName, SigningInfo,
};
use genesis_export_store::{
    InvariantRegistry, InvariantResult, MemoryChain, ModuleAggregator, ModuleRegistry,
    SigningInfoStore, SlashingModule, StaticModule,
};
use serde_json::{json, Value};

/// Consensus params blob used by fixtures.
pub const FIXTURE_CONSENSUS_PARAMS: &[u8] = b"block.max_bytes=22020096;block.max_gas=-1";

/// Deterministic 20-byte consensus address for validator `index`.
pub fn validator_address(index: usize) -> ConsAddress {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xca;
    bytes[12..20].copy_from_slice(&(index as u64).to_be_bytes());
    ConsAddress::from_bytes(bytes.to_vec())
}

/// Parse a module name that is known to be valid.
pub fn module_name(name: &str) -> ModuleName {
    match ModuleName::new(name) {
        Ok(m) => m,
        Err(e) => panic!("fixture module name {:?} invalid: {}", name, e),
    }
}

/// A chain with a delegated validator set, signing infos and modules.
///
/// The default fixture matches the reference scenario: committed height
/// 100, three validators with powers 50, 30 and 20, and the modules
/// `auth`, `bank`, `ccvconsumer` and `slashing`.
pub struct ChainFixture {
    pub chain: Arc<MemoryChain>,
    pub modules: Arc<ModuleRegistry>,
    pub invariants: Arc<InvariantRegistry>,
}

impl ChainFixture {
    /// The reference chain.
    pub fn new() -> Self {
        FixtureBuilder::new().build()
    }

    /// Start building a custom chain.
    pub fn builder() -> FixtureBuilder {
        FixtureBuilder::new()
    }

    /// Build a coordinator over this chain.
    pub fn coordinator(&self, config: ExportConfig) -> ExportCoordinator {
        self.coordinator_with(self.modules.clone(), config)
    }

    /// Build a coordinator with a different aggregator.
    pub fn coordinator_with(
        &self,
        aggregator: Arc<dyn ModuleAggregator>,
        config: ExportConfig,
    ) -> ExportCoordinator {
        ExportCoordinator::new(
            Collaborators::from_chain(self.chain.clone(), aggregator, self.invariants.clone()),
            config,
        )
    }

    /// Names of every registered module, in registration order.
    pub fn module_names(&self) -> Vec<ModuleName> {
        self.modules.names()
    }

    /// Committed height of the chain.
    pub fn committed_height(&self) -> u64 {
        use genesis_export_store::ChainHead;
        match self.chain.last_block_height() {
            Ok(h) => h,
            Err(e) => panic!("fixture chain head unreadable: {}", e),
        }
    }

    /// Snapshot of every signing info.
    pub fn signing_infos(&self) -> Vec<SigningInfo> {
        match self.chain.signing_infos() {
            Ok(infos) => infos,
            Err(e) => panic!("fixture signing infos unreadable: {}", e),
        }
    }
}

impl Default for ChainFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ChainFixture`].
pub struct FixtureBuilder {
    height: u64,
    powers: Vec<i64>,
    start_heights: Option<Vec<u64>>,
    static_modules: Vec<(String, Value)>,
    slashing_module: bool,
    standard_invariants: bool,
    extra_invariants: Vec<(String, String, InvariantFn)>,
}

type InvariantFn = Box<dyn Fn(&ExportContext) -> InvariantResult + Send + Sync>;

impl FixtureBuilder {
    /// The reference configuration.
    pub fn new() -> Self {
        Self {
            height: 100,
            powers: vec![50, 30, 20],
            start_heights: None,
            static_modules: vec![
                ("auth".into(), json!({ "accounts": [], "params": { "max_memo_characters": 256 } })),
                ("bank".into(), json!({ "balances": [], "supply": ["100stake"] })),
                ("ccvconsumer".into(), json!({ "params": { "enabled": true }, "provider_client_id": "07-tendermint-0" })),
            ],
            slashing_module: true,
            standard_invariants: true,
            extra_invariants: Vec::new(),
        }
    }

    /// Last committed height.
    pub fn height(mut self, height: u64) -> Self {
        self.height = height;
        self
    }

    /// Validator powers; one validator per entry, addresses from
    /// [`validator_address`].
    pub fn powers(mut self, powers: &[i64]) -> Self {
        self.powers = powers.to_vec();
        self
    }

    /// Signing-info start heights, one per validator. Defaults to
    /// `height - index` for validator `index`, floored at 1.
    pub fn start_heights(mut self, heights: &[u64]) -> Self {
        self.start_heights = Some(heights.to_vec());
        self
    }

    /// Replace the static modules.
    pub fn static_modules(mut self, modules: Vec<(String, Value)>) -> Self {
        self.static_modules = modules;
        self
    }

    /// Whether to register the `slashing` module.
    pub fn slashing_module(mut self, enabled: bool) -> Self {
        self.slashing_module = enabled;
        self
    }

    /// Whether to register the standard slashing invariant.
    pub fn standard_invariants(mut self, enabled: bool) -> Self {
        self.standard_invariants = enabled;
        self
    }

    /// Register an additional invariant.
    pub fn invariant<F>(mut self, module: &str, route: &str, check: F) -> Self
    where
        F: Fn(&ExportContext) -> InvariantResult + Send + Sync + 'static,
    {
        self.extra_invariants
            .push((module.into(), route.into(), Box::new(check)));
        self
    }

    /// Build the fixture.
    pub fn build(self) -> ChainFixture {
        let chain = Arc::new(MemoryChain::at_height(self.height));

        let validators: Vec<DelegatedValidator> = self
            .powers
            .iter()
            .enumerate()
            .map(|(i, &power)| {
                DelegatedValidator::new(validator_address(i), power).with_pub_key(vec![i as u8; 32])
            })
            .collect();
        expect_ok(chain.set_validators(validators));

        for i in 0..self.powers.len() {
            let start = match &self.start_heights {
                Some(heights) => heights.get(i).copied().unwrap_or(1),
                None => self.height.saturating_sub(i as u64).max(1),
            };
            let mut info = SigningInfo::new(validator_address(i), start);
            info.index_offset = (i as u64) * 3;
            info.missed_blocks_counter = i as u64;
            expect_ok(chain.insert_signing_info(info));
        }

        expect_ok(chain.set_consensus_params(ConsensusParams::from_bytes(
            FIXTURE_CONSENSUS_PARAMS,
        )));

        let mut modules = ModuleRegistry::new();
        for (name, genesis) in self.static_modules {
            expect_ok(modules.register(Arc::new(StaticModule::new(module_name(&name), genesis))));
        }
        if self.slashing_module {
            expect_ok(modules.register(Arc::new(expect_ok(SlashingModule::new(chain.clone())))));
        }

        let mut invariants = InvariantRegistry::new();
        if self.standard_invariants {
            let store: Arc<dyn SigningInfoStore> = chain.clone();
            invariants.register("slashing", "start-height-not-in-future", move |ctx| {
                start_heights_not_in_future(store.as_ref(), ctx)
            });
        }
        for (module, route, check) in self.extra_invariants {
            invariants.register(module, route, check);
        }

        ChainFixture {
            chain,
            modules: Arc::new(modules),
            invariants: Arc::new(invariants),
        }
    }
}

impl Default for FixtureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// No validator can have started infraction tracking after the committed
/// height.
pub fn start_heights_not_in_future(
    store: &dyn SigningInfoStore,
    ctx: &ExportContext,
) -> InvariantResult {
    let mut broken = None;
    store
        .iterate_signing_infos(ctx, &mut |info| {
            if info.start_height > ctx.height() {
                broken = Some(format!(
                    "validator {} started tracking at {} after committed height {}",
                    info.address,
                    info.start_height,
                    ctx.height()
                ));
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .map_err(|e| e.to_string())?;

    match broken {
        Some(message) => Err(message),
        None => Ok(()),
    }
}

fn expect_ok<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("fixture setup failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_fixture() {
        let fixture = ChainFixture::new();
        assert_eq!(fixture.committed_height(), 100);
        assert_eq!(fixture.module_names().len(), 4);
        assert_eq!(fixture.signing_infos().len(), 3);
        assert!(fixture.signing_infos().iter().all(|i| i.start_height > 0));
    }

    #[test]
    fn test_validator_addresses_unique() {
        let a: Vec<_> = (0..16).map(validator_address).collect();
        for i in 0..a.len() {
            for j in (i + 1)..a.len() {
                assert_ne!(a[i], a[j]);
            }
        }
    }

    #[test]
    fn test_standard_invariant_catches_future_start_height() {
        use genesis_export_store::InvariantChecker;

        let fixture = ChainFixture::builder()
            .height(10)
            .powers(&[5, 5])
            .start_heights(&[3, 11])
            .build();

        let violation = fixture
            .invariants
            .assert_invariants(&ExportContext::pinned(10))
            .unwrap_err();
        assert_eq!(violation.route, "start-height-not-in-future");
    }
}
