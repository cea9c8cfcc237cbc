//! Proptest generators for property-based testing.

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::Value;

use genesis_export_core::{ConsAddress, DelegatedValidator, ModuleName};

use crate::fixtures::{module_name, ChainFixture};

/// Generate a random 20-byte consensus address.
pub fn cons_address() -> impl Strategy<Value = ConsAddress> {
    any::<[u8; 20]>().prop_map(|bytes| ConsAddress::from_bytes(bytes.to_vec()))
}

/// Generate a voting power that keeps any set of up to 64 validators far
/// from overflowing.
pub fn power() -> impl Strategy<Value = i64> {
    0i64..=1_000_000_000i64
}

/// Generate a validator set with distinct addresses.
pub fn validator_set(max_len: usize) -> impl Strategy<Value = Vec<DelegatedValidator>> {
    prop::collection::btree_map(cons_address(), power(), 1..=max_len).prop_map(|set| {
        set.into_iter()
            .map(|(address, power)| DelegatedValidator::new(address, power))
            .collect()
    })
}

/// Generate a module name.
pub fn module() -> impl Strategy<Value = ModuleName> {
    "[a-z][a-z0-9]{0,15}".prop_map(|s| module_name(&s))
}

/// Generate a small JSON value to stand in for a module's genesis state.
pub fn genesis_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9 ]{0,12}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Parameters for generating a chain.
#[derive(Debug, Clone)]
pub struct ChainParams {
    pub height: u64,
    pub powers: Vec<i64>,
    pub modules: Vec<(String, Value)>,
}

impl ChainParams {
    /// Build the chain these parameters describe.
    pub fn build(&self) -> ChainFixture {
        ChainFixture::builder()
            .height(self.height)
            .powers(&self.powers)
            .static_modules(self.modules.clone())
            .build()
    }

    /// Sum of all powers.
    pub fn total_power(&self) -> i64 {
        self.powers.iter().sum()
    }
}

impl Arbitrary for ChainParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            1u64..=1_000_000u64, // committed height
            prop::collection::vec(power(), 1..=16),
            prop::collection::btree_map(
                "[a-z][a-z0-9]{0,11}".prop_filter("reserved", |s| s != "slashing"),
                genesis_value(),
                0..6,
            ),
        )
            .prop_map(|(height, powers, modules)| ChainParams {
                height,
                powers,
                modules: modules.into_iter().collect(),
            })
            .boxed()
    }
}

/// Generate a non-empty subsequence of `names`, which must not be empty.
pub fn module_subset(names: Vec<ModuleName>) -> impl Strategy<Value = Vec<ModuleName>> {
    let len = names.len();
    prop::sample::subsequence(names, 1..=len)
}

/// Distinct names in a selection.
pub fn distinct(names: &[ModuleName]) -> BTreeSet<ModuleName> {
    names.iter().cloned().collect()
}
